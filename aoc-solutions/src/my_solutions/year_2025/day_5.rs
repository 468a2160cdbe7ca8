use anyhow::{anyhow, Context};
use aoc_solver::{AnimatedPartSolver, AnimationStep, AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use log::debug;
use crate::utils::{emit, is_sampled_step, StepSink};
use crate::utils::range::IdRange;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, animated)]
#[aoc(year = 2025, day = 5, tags = ["2025", "intervals", "binary-search"])]
pub struct Solver;

/// Fresh-ingredient database: merged ranges plus the IDs to check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    /// Sorted, disjoint and non-adjacent
    pub fresh: Vec<IdRange>,
    pub ids: Vec<u64>,
}

impl AocParser for Solver {
    type SharedData<'a> = Inventory;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut ranges = Vec::new();
        let mut ids = Vec::new();
        let mut in_id_block = false;

        for (line_idx, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                in_id_block |= !ranges.is_empty();
                continue;
            }

            if in_id_block {
                let id = line
                    .parse::<u64>()
                    .with_context(|| format!("invalid ingredient ID {:?}", line))
                    .map_err(|e| line_error(line_idx, e))?;
                ids.push(id);
            } else {
                let range = line
                    .parse::<IdRange>()
                    .map_err(|e| line_error(line_idx, e))?;
                ranges.push(range);
            }
        }

        let range_count = ranges.len();
        let fresh = merge_ranges(ranges);
        debug!("merged {} fresh ranges into {}", range_count, fresh.len());
        Ok(Inventory { fresh, ids })
    }
}

fn line_error(line_idx: usize, e: anyhow::Error) -> ParseError {
    ParseError::InvalidFormat(anyhow!("(line {}) {:#}", line_idx + 1, e).to_string())
}

/// Sort by start and coalesce overlapping or touching ranges
pub fn merge_ranges(mut ranges: Vec<IdRange>) -> Vec<IdRange> {
    ranges.sort_unstable();

    let mut merged: Vec<IdRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start() <= last.end().saturating_add(1) => {
                last.extend_end(range.end());
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Binary search over merged ranges for the one that could hold `id`
pub fn is_in_ranges(id: u64, merged: &[IdRange]) -> bool {
    let candidates = merged.partition_point(|range| range.start() <= id);
    candidates > 0 && merged[candidates - 1].contains(id)
}

pub fn count_fresh(inventory: &Inventory, mut on_step: StepSink<'_>) -> u64 {
    let mut fresh = 0u64;

    for (index, &id) in inventory.ids.iter().enumerate() {
        let is_fresh = is_in_ranges(id, &inventory.fresh);
        if is_fresh {
            fresh += 1;
        }
        if is_sampled_step(index) {
            emit(&mut on_step, || {
                let verdict = if is_fresh { "fresh" } else { "spoiled" };
                AnimationStep::message(format!("Ingredient {} is {}", id, verdict), fresh)
            });
        }
    }

    emit(&mut on_step, || {
        AnimationStep::new(
            format!("{} of {} ingredients are fresh", fresh, inventory.ids.len()),
            render_ranges(&inventory.fresh),
            fresh,
        )
    });
    fresh
}

/// Number of distinct IDs covered by the merged ranges
pub fn total_fresh_ids(
    inventory: &Inventory,
    mut on_step: StepSink<'_>,
) -> Result<u64, SolveError> {
    let mut total = 0u64;

    for (index, range) in inventory.fresh.iter().enumerate() {
        total = (range.end() - range.start())
            .checked_add(1)
            .and_then(|size| total.checked_add(size))
            .ok_or_else(|| SolveError::failed("fresh ID count overflows u64"))?;
        if is_sampled_step(index) {
            emit(&mut on_step, || {
                AnimationStep::message(format!("Range {} covers {} IDs", range, range.size()), total)
            });
        }
    }

    emit(&mut on_step, || {
        AnimationStep::new(
            format!("{} merged ranges cover {} IDs", inventory.fresh.len(), total),
            render_ranges(&inventory.fresh),
            total,
        )
    });
    Ok(total)
}

fn render_ranges(ranges: &[IdRange]) -> Vec<String> {
    const SHOWN: usize = 8;
    let mut lines: Vec<String> = ranges.iter().take(SHOWN).map(|r| format!("[{}]", r)).collect();
    if ranges.len() > SHOWN {
        lines.push(format!("... {} more", ranges.len() - SHOWN));
    }
    lines
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(count_fresh(shared, None).to_string())
    }
}

impl AnimatedPartSolver<1> for Solver {
    fn solve_animated(
        shared: &mut Self::SharedData<'_>,
        on_step: &mut dyn FnMut(AnimationStep),
    ) -> Result<String, SolveError> {
        Ok(count_fresh(shared, Some(on_step)).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        total_fresh_ids(shared, None).map(|total| total.to_string())
    }
}

impl AnimatedPartSolver<2> for Solver {
    fn solve_animated(
        shared: &mut Self::SharedData<'_>,
        on_step: &mut dyn FnMut(AnimationStep),
    ) -> Result<String, SolveError> {
        total_fresh_ids(shared, Some(on_step)).map(|total| total.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;
    use proptest::prelude::*;

    const EXAMPLE: &str = "3-5\n10-14\n16-20\n12-18\n\n1\n5\n8\n11\n17\n32\n";

    fn range(start: u64, end: u64) -> IdRange {
        IdRange::new(start, end).unwrap()
    }

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(shared.fresh, vec![range(3, 5), range(10, 20)]);
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "3");
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "14");
    }

    #[test]
    fn test_merge_overlapping() {
        let merged = merge_ranges(vec![range(10, 14), range(3, 5), range(12, 18)]);
        assert_eq!(merged, vec![range(3, 5), range(10, 18)]);
        assert!(is_in_ranges(17, &merged));
        assert!(!is_in_ranges(7, &merged));
        let inventory = Inventory { fresh: merged, ids: vec![17] };
        assert_eq!(count_fresh(&inventory, None), 1);
        assert_eq!(total_fresh_ids(&inventory, None).unwrap(), 12);
    }

    #[test]
    fn test_merge_adjacent_and_contained() {
        let merged = merge_ranges(vec![range(1, 3), range(4, 6), range(2, 2), range(8, 9)]);
        assert_eq!(merged, vec![range(1, 6), range(8, 9)]);
        let merged = merge_ranges(vec![range(0, u64::MAX), range(5, 7)]);
        assert_eq!(merged, vec![range(0, u64::MAX)]);
        let inventory = Inventory { fresh: merged, ids: vec![] };
        assert!(total_fresh_ids(&inventory, None).is_err());
    }

    #[test]
    fn test_is_in_ranges_bounds() {
        let merged = vec![range(3, 5), range(10, 18)];
        assert!(!is_in_ranges(0, &merged));
        assert!(is_in_ranges(3, &merged));
        assert!(is_in_ranges(18, &merged));
        assert!(!is_in_ranges(19, &merged));
        assert!(!is_in_ranges(4, &[]));
    }

    #[test]
    fn test_missing_id_block() {
        let mut shared = Solver::parse("3-5\n10-14\n").unwrap();
        assert!(shared.ids.is_empty());
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "0");
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "8");
    }

    #[test]
    fn test_empty_and_malformed_input() {
        let mut shared = Solver::parse("").unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "0");
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "0");
        let err = Solver::parse("3-5\nx-9\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
        assert!(Solver::parse("3-5\n\nabc\n").is_err());
    }

    fn ranges_strategy() -> impl Strategy<Value = Vec<IdRange>> {
        prop::collection::vec((0u64..200, 0u64..20), 0..15)
            .prop_map(|bounds| bounds.into_iter().map(|(s, l)| range(s, s + l)).collect())
    }

    proptest! {
        #[test]
        fn prop_merge_preserves_membership(ranges in ranges_strategy()) {
            let merged = merge_ranges(ranges.clone());
            for pair in merged.windows(2) {
                prop_assert!(pair[0].end() + 1 < pair[1].start());
            }
            for id in 0u64..230 {
                let expected = ranges.iter().any(|r| r.contains(id));
                prop_assert_eq!(is_in_ranges(id, &merged), expected);
            }
            let covered = (0u64..230).filter(|&id| ranges.iter().any(|r| r.contains(id))).count() as u64;
            let inventory = Inventory { fresh: merged, ids: Vec::new() };
            prop_assert_eq!(total_fresh_ids(&inventory, None).unwrap(), covered);
        }
    }
}
