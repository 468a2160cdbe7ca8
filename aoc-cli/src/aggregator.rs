//! Result aggregator for ordering parallel solver results
//!
//! Buffers and orders results for streaming output using two min-heaps:
//! - One for expected keys (what we're waiting for)
//! - One for received results (buffered until their turn)

use crate::executor::{SolverResult, WorkItem};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Key for ordering results (year, day, part) - ordered ascending
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Clone, Copy)]
pub struct ResultKey {
    pub year: u16,
    pub day: u8,
    pub part: u8,
}

impl From<&SolverResult> for ResultKey {
    fn from(r: &SolverResult) -> Self {
        Self {
            year: r.year,
            day: r.day,
            part: r.part,
        }
    }
}

/// Wrapper for min-heap ordering of SolverResult
struct OrderedResult(SolverResult);

impl Ord for OrderedResult {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse ordering for min-heap (smallest first)
        ResultKey::from(&other.0).cmp(&ResultKey::from(&self.0))
    }
}

impl PartialOrd for OrderedResult {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for OrderedResult {}

impl PartialEq for OrderedResult {
    fn eq(&self, other: &Self) -> bool {
        ResultKey::from(&self.0) == ResultKey::from(&other.0)
    }
}

/// Aggregator that buffers results and emits them in sorted order
pub struct ResultAggregator {
    /// Min-heap of expected keys (next to output is at top)
    expected: BinaryHeap<Reverse<ResultKey>>,
    /// Min-heap of received results waiting to be output
    pending: BinaryHeap<OrderedResult>,
}

impl ResultAggregator {
    /// Create aggregator from list of expected keys
    pub fn new(expected_keys: Vec<ResultKey>) -> Self {
        Self {
            expected: expected_keys.into_iter().map(Reverse).collect(),
            pending: BinaryHeap::new(),
        }
    }

    /// Expect one result for every part of every work item
    pub fn for_work_items(work_items: &[WorkItem]) -> Self {
        Self::new(
            work_items
                .iter()
                .flat_map(|w| {
                    w.parts.clone().map(move |part| ResultKey {
                        year: w.year,
                        day: w.day,
                        part,
                    })
                })
                .collect(),
        )
    }

    /// Add a result and return any results ready for output (in order)
    pub fn add(&mut self, result: SolverResult) -> Vec<SolverResult> {
        self.pending.push(OrderedResult(result));

        // Emit results while pending min matches expected min
        let mut ready = Vec::new();
        while let (Some(Reverse(next_expected)), Some(top_pending)) =
            (self.expected.peek(), self.pending.peek())
        {
            if ResultKey::from(&top_pending.0) != *next_expected {
                break;
            }
            self.expected.pop();
            if let Some(OrderedResult(result)) = self.pending.pop() {
                ready.push(result);
            }
        }
        ready
    }

    /// Drain remaining results in order (for final output)
    pub fn drain(&mut self) -> Vec<SolverResult> {
        let mut results: Vec<_> = self.pending.drain().map(|o| o.0).collect();
        results.sort_by_key(|r| ResultKey::from(r));
        results
    }

    /// Check if all expected results have been received
    pub fn is_complete(&self) -> bool {
        self.expected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn make_result(year: u16, day: u8, part: u8) -> SolverResult {
        SolverResult {
            year,
            day,
            part,
            answer: Ok(format!("{}_{}_{}", year, day, part)),
            solve_duration: TimeDelta::milliseconds(10),
            parse_duration: Some(TimeDelta::milliseconds(5)),
            steps: Vec::new(),
        }
    }

    #[test]
    fn test_in_order_results() {
        let keys = vec![
            ResultKey {
                year: 2025,
                day: 1,
                part: 1,
            },
            ResultKey {
                year: 2025,
                day: 1,
                part: 2,
            },
        ];
        let mut agg = ResultAggregator::new(keys);

        // Add in order
        let ready = agg.add(make_result(2025, 1, 1));
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].part, 1);

        let ready = agg.add(make_result(2025, 1, 2));
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].part, 2);

        assert!(agg.is_complete());
    }

    #[test]
    fn test_out_of_order_results() {
        let keys = vec![
            ResultKey {
                year: 2025,
                day: 1,
                part: 1,
            },
            ResultKey {
                year: 2025,
                day: 1,
                part: 2,
            },
            ResultKey {
                year: 2025,
                day: 2,
                part: 1,
            },
        ];
        let mut agg = ResultAggregator::new(keys);

        // Add out of order - part 2 before part 1
        let ready = agg.add(make_result(2025, 1, 2));
        assert!(ready.is_empty()); // Waiting for part 1

        let ready = agg.add(make_result(2025, 2, 1));
        assert!(ready.is_empty()); // Still waiting for 2025/1/1

        // Now add the missing one
        let ready = agg.add(make_result(2025, 1, 1));
        assert_eq!(ready.len(), 3); // All three should be ready now
        assert_eq!(ready[0].part, 1);
        assert_eq!(ready[0].day, 1);
        assert_eq!(ready[1].part, 2);
        assert_eq!(ready[1].day, 1);
        assert_eq!(ready[2].part, 1);
        assert_eq!(ready[2].day, 2);
    }

    #[test]
    fn test_drain_remaining() {
        let keys = vec![
            ResultKey {
                year: 2025,
                day: 1,
                part: 1,
            },
            ResultKey {
                year: 2025,
                day: 1,
                part: 2,
            },
        ];
        let mut agg = ResultAggregator::new(keys);

        // Add only part 2 (out of order)
        agg.add(make_result(2025, 1, 2));

        // Drain should return it
        let remaining = agg.drain();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].part, 2);
    }

    #[test]
    fn test_failed_results_keep_their_place() {
        let keys = (1..=2)
            .map(|day| ResultKey {
                year: 2025,
                day,
                part: 1,
            })
            .collect();
        let mut agg = ResultAggregator::new(keys);

        let mut failed = make_result(2025, 2, 1);
        failed.answer = Err(aoc_solver::SolverError::NotFound(2025, 2));
        assert!(agg.add(failed).is_empty());

        let ready = agg.add(make_result(2025, 1, 1));
        assert_eq!(ready.len(), 2);
        assert!(ready[0].answer.is_ok());
        assert!(ready[1].answer.is_err());
        assert!(agg.is_complete());
        assert!(agg.drain().is_empty());
    }

    #[test]
    fn test_reversed_stream_comes_out_sorted() {
        let work_items: Vec<WorkItem> = (1..=3)
            .map(|day| WorkItem {
                year: 2025,
                day,
                parts: 1..=2,
            })
            .collect();
        let mut agg = ResultAggregator::for_work_items(&work_items);

        let mut emitted = Vec::new();
        for day in (1..=3).rev() {
            for part in (1..=2).rev() {
                emitted.extend(agg.add(make_result(2025, day, part)));
            }
        }

        let order: Vec<ResultKey> = emitted.iter().map(ResultKey::from).collect();
        let expected: Vec<ResultKey> = (1..=3)
            .flat_map(|day| {
                (1..=2).map(move |part| ResultKey {
                    year: 2025,
                    day,
                    part,
                })
            })
            .collect();
        assert_eq!(order, expected);
        assert!(agg.is_complete());
    }

    #[test]
    fn test_unexpected_result_is_held_until_drain() {
        let work_items = [WorkItem {
            year: 2025,
            day: 4,
            parts: 2..=2,
        }];
        let mut agg = ResultAggregator::for_work_items(&work_items);

        assert!(agg.add(make_result(2025, 4, 1)).is_empty());
        assert!(!agg.is_complete());

        let remaining = agg.drain();
        assert_eq!(remaining.len(), 1);
        assert_eq!(ResultKey::from(&remaining[0]).part, 1);
    }
}
