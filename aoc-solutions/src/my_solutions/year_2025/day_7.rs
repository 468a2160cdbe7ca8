use std::collections::{BTreeMap, BTreeSet};
use aoc_solver::{AnimatedPartSolver, AnimationStep, AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use crate::utils::grid::CharGrid;
use crate::utils::{emit, is_sampled_step, StepSink};

const START: u8 = b'S';
const SPLITTER: u8 = b'^';
const BEAM: char = '|';

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, animated)]
#[aoc(year = 2025, day = 7, tags = ["2025", "grid", "simulation"])]
pub struct Solver;

impl AocParser for Solver {
    type SharedData<'a> = CharGrid;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        Ok(CharGrid::parse(input))
    }
}

/// Columns a beam at `col` moves to on `row`: itself, or both sides of a splitter
///
/// Columns outside the grid are dropped; cells past a short row are empty.
fn next_columns(grid: &CharGrid, row: usize, col: usize) -> (bool, [Option<usize>; 2]) {
    if grid.get(row, col) == Some(SPLITTER) {
        let left = col.checked_sub(1);
        let right = Some(col + 1).filter(|&c| c < grid.width());
        (true, [left, right])
    } else {
        (false, [Some(col), None])
    }
}

fn render_row(grid: &CharGrid, row: usize, beams: impl IntoIterator<Item = usize>) -> Vec<String> {
    let mut line: Vec<char> = (0..grid.width())
        .map(|col| grid.get(row, col).map_or('.', char::from))
        .collect();
    for col in beams {
        if line[col] != char::from(SPLITTER) {
            line[col] = BEAM;
        }
    }
    vec![line.into_iter().collect()]
}

/// Number of times a beam hits a splitter, beams on the same column merging
pub fn count_splits(grid: &CharGrid, mut on_step: StepSink<'_>) -> u64 {
    let Some((start_row, start_col)) = grid.positions_of(START).next() else {
        emit(&mut on_step, || AnimationStep::message("No beam source", 0));
        return 0;
    };

    let mut beams = BTreeSet::from([start_col]);
    let mut splits = 0u64;

    for row in start_row + 1..grid.height() {
        let mut next = BTreeSet::new();
        for &col in &beams {
            let (split, targets) = next_columns(grid, row, col);
            if split {
                splits += 1;
            }
            next.extend(targets.into_iter().flatten());
        }
        beams = next;

        if is_sampled_step(row - start_row - 1) {
            emit(&mut on_step, || {
                AnimationStep::new(
                    format!("Row {}: {} beams", row, beams.len()),
                    render_row(grid, row, beams.iter().copied()),
                    splits,
                )
            });
        }
        if beams.is_empty() {
            break;
        }
    }

    emit(&mut on_step, || {
        AnimationStep::message(format!("Beam split {} times", splits), splits)
    });
    splits
}

/// Number of distinct paths from the source to the bottom of the grid
pub fn count_timelines(
    grid: &CharGrid,
    mut on_step: StepSink<'_>,
) -> Result<u64, SolveError> {
    let Some((start_row, start_col)) = grid.positions_of(START).next() else {
        emit(&mut on_step, || AnimationStep::message("No beam source", 0));
        return Ok(0);
    };
    let overflow = || SolveError::failed("timeline count overflows u64");

    let mut timelines = BTreeMap::from([(start_col, 1u64)]);

    for row in start_row + 1..grid.height() {
        let mut next: BTreeMap<usize, u64> = BTreeMap::new();
        for (&col, &count) in &timelines {
            let (_, targets) = next_columns(grid, row, col);
            for target in targets.into_iter().flatten() {
                let slot = next.entry(target).or_default();
                *slot = slot.checked_add(count).ok_or_else(overflow)?;
            }
        }
        timelines = next;

        if on_step.is_some() && is_sampled_step(row - start_row - 1) {
            let total = total_timelines(&timelines).ok_or_else(overflow)?;
            emit(&mut on_step, || {
                AnimationStep::new(
                    format!("Row {}: {} timelines over {} columns", row, total, timelines.len()),
                    render_row(grid, row, timelines.keys().copied()),
                    total,
                )
            });
        }
        if timelines.is_empty() {
            break;
        }
    }

    let total = total_timelines(&timelines).ok_or_else(overflow)?;
    emit(&mut on_step, || AnimationStep::message(format!("{} timelines", total), total));
    Ok(total)
}

fn total_timelines(timelines: &BTreeMap<usize, u64>) -> Option<u64> {
    timelines.values().try_fold(0u64, |acc, &n| acc.checked_add(n))
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(count_splits(shared, None).to_string())
    }
}

impl AnimatedPartSolver<1> for Solver {
    fn solve_animated(
        shared: &mut Self::SharedData<'_>,
        on_step: &mut dyn FnMut(AnimationStep),
    ) -> Result<String, SolveError> {
        Ok(count_splits(shared, Some(on_step)).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        count_timelines(shared, None).map(|total| total.to_string())
    }
}

impl AnimatedPartSolver<2> for Solver {
    fn solve_animated(
        shared: &mut Self::SharedData<'_>,
        on_step: &mut dyn FnMut(AnimationStep),
    ) -> Result<String, SolveError> {
        count_timelines(shared, Some(on_step)).map(|total| total.to_string())
    }
}
