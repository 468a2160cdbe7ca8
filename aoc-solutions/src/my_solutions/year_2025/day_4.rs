use aoc_solver::{AnimatedPartSolver, AnimationStep, AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use crate::utils::grid::CharGrid;
use crate::utils::{emit, is_sampled_step, StepSink};

const ROLL: u8 = b'@';
const EMPTY: u8 = b'.';
const MARKED: u8 = b'x';
const CROWDED: usize = 4;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, animated)]
#[aoc(year = 2025, day = 4, tags = ["2025", "grid", "simulation"])]
pub struct Solver;

impl AocParser for Solver {
    type SharedData<'a> = CharGrid;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        Ok(CharGrid::parse(input))
    }
}

/// Rolls that have fewer than 4 rolls among their 8 neighbours
pub fn accessible_rolls(grid: &CharGrid) -> Vec<(usize, usize)> {
    grid.positions_of(ROLL)
        .filter(|&(r, c)| grid.count_neighbors(r, c, ROLL) < CROWDED)
        .collect()
}

fn render_marked(grid: &CharGrid, marked: &[(usize, usize)]) -> Vec<String> {
    let mut view = grid.clone();
    for &(r, c) in marked {
        view.set(r, c, MARKED);
    }
    view.render()
}

pub fn count_accessible(grid: &CharGrid, mut on_step: StepSink<'_>) -> u64 {
    let accessible = accessible_rolls(grid);
    let count = accessible.len() as u64;
    emit(&mut on_step, || {
        AnimationStep::new(
            format!("{} rolls reachable by forklift", count),
            render_marked(grid, &accessible),
            count,
        )
    });
    count
}

/// Remove every accessible roll at once, round after round, until none is
/// left accessible; returns the number of rolls removed
pub fn remove_accessible(grid: &mut CharGrid, mut on_step: StepSink<'_>) -> u64 {
    let mut removed = 0u64;

    for round in 0.. {
        let accessible = accessible_rolls(grid);
        if accessible.is_empty() {
            break;
        }
        removed += accessible.len() as u64;

        if is_sampled_step(round) {
            emit(&mut on_step, || {
                AnimationStep::new(
                    format!("Round {}: removing {} rolls", round + 1, accessible.len()),
                    render_marked(grid, &accessible),
                    removed,
                )
            });
        }
        for &(r, c) in &accessible {
            grid.set(r, c, EMPTY);
        }
    }

    emit(&mut on_step, || {
        AnimationStep::new(format!("{} rolls removed", removed), grid.render(), removed)
    });
    removed
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(count_accessible(shared, None).to_string())
    }
}

impl AnimatedPartSolver<1> for Solver {
    fn solve_animated(
        shared: &mut Self::SharedData<'_>,
        on_step: &mut dyn FnMut(AnimationStep),
    ) -> Result<String, SolveError> {
        Ok(count_accessible(shared, Some(on_step)).to_string())
    }
}

// Removal works on a copy so both parts see the parsed grid
impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(remove_accessible(&mut shared.clone(), None).to_string())
    }
}

impl AnimatedPartSolver<2> for Solver {
    fn solve_animated(
        shared: &mut Self::SharedData<'_>,
        on_step: &mut dyn FnMut(AnimationStep),
    ) -> Result<String, SolveError> {
        Ok(remove_accessible(&mut shared.clone(), Some(on_step)).to_string())
    }
}
