//! Inclusive `u64` ranges written as `start-end`

use anyhow::{anyhow, bail, Context};
use std::fmt;
use std::str::FromStr;

/// An inclusive range of IDs, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdRange {
    start: u64,
    end: u64,
}

impl IdRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: u64, end: u64) -> anyhow::Result<Self> {
        if start > end {
            bail!("range start {} is greater than end {}", start, end);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn contains(&self, value: u64) -> bool {
        (self.start..=self.end).contains(&value)
    }

    /// Number of integers covered by the range, saturating at `u64::MAX`
    pub fn size(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    /// Move the end forward to `end` if that grows the range
    pub fn extend_end(&mut self, end: u64) {
        self.end = self.end.max(end);
    }

    /// The part of this range overlapping `[lo, hi]`, if any
    pub fn intersect(&self, lo: u64, hi: u64) -> Option<IdRange> {
        let start = self.start.max(lo);
        let end = self.end.min(hi);
        (start <= end).then_some(IdRange { start, end })
    }
}

impl FromStr for IdRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow!("expected `start-end`, got {:?}", s))?;
        let start = start
            .trim()
            .parse()
            .with_context(|| format!("invalid range start {:?}", start))?;
        let end = end
            .trim()
            .parse()
            .with_context(|| format!("invalid range end {:?}", end))?;
        IdRange::new(start, end)
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
