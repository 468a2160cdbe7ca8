//! Invalid product IDs: numbers made of a digit pattern repeated several times
//!
//! Repeated numbers are generated directly instead of scanning the ranges.
//! Writing a `p`-digit pattern `reps` times equals `pattern * factor` where
//! `factor = 1 + 10^p + 10^(2p) + ... + 10^((reps - 1)p)`, so for each total
//! digit length the feasible patterns form a contiguous window derived from
//! the range bounds.

use std::collections::BTreeSet;
use anyhow::anyhow;
use aoc_solver::{AnimatedPartSolver, AnimationStep, AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use crate::utils::range::IdRange;
use crate::utils::{emit, StepSink};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, animated)]
#[aoc(year = 2025, day = 2, tags = ["2025", "math"])]
pub struct Solver;

/// How many times the pattern must be written out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repetitions {
    /// Exactly twice, e.g. `6464`
    Twice,
    /// Two or more times, e.g. `121212`
    AtLeastTwice,
}

impl Repetitions {
    fn allows(self, reps: u32) -> bool {
        match self {
            Repetitions::Twice => reps == 2,
            Repetitions::AtLeastTwice => reps >= 2,
        }
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<IdRange>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .enumerate()
            .map(|(idx, entry)| {
                entry
                    .parse::<IdRange>()
                    .map_err(|e| anyhow!("(range {}) {:#}", idx + 1, e))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))
    }
}

fn digit_count(n: u64) -> u32 {
    n.checked_ilog10().unwrap_or(0) + 1
}

/// `1 + 10^p + ... + 10^((reps - 1)p)`, or `None` if it overflows
fn repetition_factor(pattern_len: u32, reps: u32) -> Option<u64> {
    let base = 10u64.checked_pow(pattern_len)?;
    (0..reps).try_fold((0u64, 1u64), |(factor, multiplier), i| {
        let factor = factor.checked_add(multiplier)?;
        // The multiplier after the last term is never used and may overflow
        let multiplier = if i + 1 < reps {
            multiplier.checked_mul(base)?
        } else {
            multiplier
        };
        Some((factor, multiplier))
    })
    .map(|(factor, _)| factor)
}

/// All repeated-pattern numbers inside `range`
pub fn repeated_in_range(range: &IdRange, repetitions: Repetitions) -> BTreeSet<u64> {
    let mut found = BTreeSet::new();

    for total_digits in digit_count(range.start())..=digit_count(range.end()) {
        let min_with_digits = 10u64.pow(total_digits - 1);
        let max_with_digits = 10u64
            .checked_pow(total_digits)
            .map_or(u64::MAX, |p| p - 1);
        let Some(window) = range.intersect(min_with_digits, max_with_digits) else {
            continue;
        };

        for pattern_len in (1..=total_digits / 2).filter(|p| total_digits % p == 0) {
            let reps = total_digits / pattern_len;
            if !repetitions.allows(reps) {
                continue;
            }
            let Some(factor) = repetition_factor(pattern_len, reps) else {
                continue;
            };

            let min_pattern = 10u64.pow(pattern_len - 1);
            let max_pattern = 10u64.pow(pattern_len) - 1;
            let first = min_pattern.max(window.start().div_ceil(factor));
            let last = max_pattern.min(window.end() / factor);

            found.extend(
                (first..=last)
                    .map(|pattern| pattern * factor)
                    .filter(|&value| window.contains(value)),
            );
        }
    }

    found
}

/// Sum of the distinct repeated-pattern numbers over all ranges
pub fn sum_invalid_ids(
    ranges: &[IdRange],
    repetitions: Repetitions,
    mut on_step: StepSink<'_>,
) -> Result<u64, SolveError> {
    let mut invalid_ids = BTreeSet::new();
    let mut total = 0u64;

    for range in ranges {
        let found = repeated_in_range(range, repetitions);
        for &id in &found {
            if invalid_ids.insert(id) {
                total = total
                    .checked_add(id)
                    .ok_or_else(|| SolveError::failed("invalid ID sum overflows u64"))?;
            }
        }
        emit(&mut on_step, || {
            let mut preview: Vec<String> = found.iter().take(5).map(u64::to_string).collect();
            if found.len() > preview.len() {
                preview.push(format!("... {} more", found.len() - preview.len()));
            }
            AnimationStep::new(format!("Scanned shelf {}", range), preview, total)
        });
    }

    emit(&mut on_step, || {
        AnimationStep::message(format!("{} distinct invalid IDs", invalid_ids.len()), total)
    });
    Ok(total)
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        sum_invalid_ids(shared, Repetitions::Twice, None).map(|total| total.to_string())
    }
}

impl AnimatedPartSolver<1> for Solver {
    fn solve_animated(
        shared: &mut Self::SharedData<'_>,
        on_step: &mut dyn FnMut(AnimationStep),
    ) -> Result<String, SolveError> {
        sum_invalid_ids(shared, Repetitions::Twice, Some(on_step)).map(|total| total.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        sum_invalid_ids(shared, Repetitions::AtLeastTwice, None).map(|total| total.to_string())
    }
}

impl AnimatedPartSolver<2> for Solver {
    fn solve_animated(
        shared: &mut Self::SharedData<'_>,
        on_step: &mut dyn FnMut(AnimationStep),
    ) -> Result<String, SolveError> {
        sum_invalid_ids(shared, Repetitions::AtLeastTwice, Some(on_step))
            .map(|total| total.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;
    use proptest::prelude::*;

    const EXAMPLE: &str = "11-22,95-115,998-1012,1188511880-1188511890,222220-222224,\
1698522-1698528,446443-446449,38593856-38593862,565653-565659,\
824824821-824824827,2121212118-2121212124";

    fn range(start: u64, end: u64) -> IdRange {
        IdRange::new(start, end).unwrap()
    }

    fn is_repeated(n: u64, repetitions: Repetitions) -> bool {
        let digits = n.to_string();
        let len = digits.len();
        (1..=len / 2)
            .filter(|p| len % p == 0 && repetitions.allows((len / p) as u32))
            .any(|p| digits.as_bytes().chunks(p).all(|chunk| chunk == &digits.as_bytes()[..p]))
    }

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(shared.len(), 11);
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "1227775554");
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "4174379265");
    }

    #[test]
    fn test_two_digit_doubles() {
        let found = repeated_in_range(&range(10, 99), Repetitions::Twice);
        assert_eq!(found.len(), 9);
        assert_eq!(found.iter().sum::<u64>(), 495);
    }

    #[test]
    fn test_overlapping_ranges_are_deduplicated() {
        let ranges = [range(10, 40), range(20, 60)];
        // 11, 22, 33, 44, 55
        assert_eq!(sum_invalid_ids(&ranges, Repetitions::Twice, None).unwrap(), 165);
    }

    #[test]
    fn test_at_least_twice_includes_odd_lengths() {
        let found = repeated_in_range(&range(100, 1000), Repetitions::AtLeastTwice);
        assert_eq!(found, BTreeSet::from([111, 222, 333, 444, 555, 666, 777, 888, 999]));
        assert!(repeated_in_range(&range(100, 999), Repetitions::Twice).is_empty());
    }

    #[test]
    fn test_wide_range_without_scanning() {
        // 1..=10^12 holds 9 + 90 + 900 + 9000 + 90000 + 900000 doubled numbers
        let found = repeated_in_range(&range(1, 1_000_000_000_000), Repetitions::Twice);
        assert_eq!(found.len(), 999_999);
    }

    #[test]
    fn test_near_u64_max() {
        let found = repeated_in_range(&range(u64::MAX - 10, u64::MAX), Repetitions::AtLeastTwice);
        assert!(found.is_empty());
    }

    #[test]
    fn test_sum_overflow_is_reported() {
        // 1844674406 and 1844674407 written twice both fit in u64, their sum does not
        let ranges = [range(18_446_744_061_844_674_406, 18_446_744_071_844_674_407)];
        let found = repeated_in_range(&ranges[0], Repetitions::Twice);
        assert_eq!(
            found,
            BTreeSet::from([18_446_744_061_844_674_406, 18_446_744_071_844_674_407])
        );
        assert!(matches!(
            sum_invalid_ids(&ranges, Repetitions::Twice, None),
            Err(SolveError::SolveFailed(_))
        ));
    }

    #[test]
    fn test_empty_and_malformed_input() {
        assert!(Solver::parse("").unwrap().is_empty());
        assert!(Solver::parse("11-22,,").is_ok());
        assert!(Solver::parse("11-22,abc").is_err());
        assert!(Solver::parse("30-20").is_err());
    }

    proptest! {
        #[test]
        fn prop_matches_brute_force(start in 1u64..10_000, len in 0u64..3_000) {
            let range = range(start, start + len);
            for repetitions in [Repetitions::Twice, Repetitions::AtLeastTwice] {
                let expected: BTreeSet<u64> = (range.start()..=range.end())
                    .filter(|&n| is_repeated(n, repetitions))
                    .collect();
                prop_assert_eq!(repeated_in_range(&range, repetitions), expected);
            }
        }

        #[test]
        fn prop_animated_matches_plain(bounds in prop::collection::vec((1u64..100_000, 0u64..100_000), 0..6)) {
            let ranges: Vec<IdRange> = bounds.into_iter().map(|(s, l)| range(s, s + l)).collect();
            let mut steps = 0usize;
            let animated =
                sum_invalid_ids(&ranges, Repetitions::AtLeastTwice, Some(&mut |_| steps += 1)).unwrap();
            prop_assert_eq!(animated, sum_invalid_ids(&ranges, Repetitions::AtLeastTwice, None).unwrap());
            prop_assert_eq!(steps, ranges.len() + 1);
        }
    }
}
