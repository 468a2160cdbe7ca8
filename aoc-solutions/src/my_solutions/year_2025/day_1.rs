use std::str::FromStr;
use anyhow::anyhow;
use aoc_solver::{AnimatedPartSolver, AnimationStep, AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use crate::utils::{emit, is_sampled_step, StepSink};

const DIAL_SIZE: u64 = 100;
const DIAL_START: u64 = 50;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, animated)]
#[aoc(year = 2025, day = 1, tags = ["2025", "math"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    pub direction: Direction,
    pub distance: u64,
}

impl Rotation {
    /// Dial position after applying this rotation from `position`, always in `0..100`
    pub fn apply(&self, position: u64) -> u64 {
        let step = self.distance % DIAL_SIZE;
        match self.direction {
            Direction::Left => (position + DIAL_SIZE - step) % DIAL_SIZE,
            Direction::Right => (position + step) % DIAL_SIZE,
        }
    }

    /// How many times the dial points at 0 while rotating from `position`,
    /// counting the final click
    pub fn zero_passes(&self, position: u64) -> u64 {
        let full_turns = self.distance / DIAL_SIZE;
        let rest = self.distance % DIAL_SIZE;
        let reaches_zero = match self.direction {
            Direction::Left => position != 0 && rest >= position,
            Direction::Right => rest + position >= DIAL_SIZE,
        };
        full_turns + u64::from(reaches_zero)
    }
}

impl FromStr for Rotation {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let direction = match line.as_bytes().first() {
            Some(b'L') => Direction::Left,
            Some(b'R') => Direction::Right,
            _ => return Err(anyhow!("first character need to be 'L' or 'R'")),
        };

        <u64 as FromStr>::from_str(&line[1..])
            .map(|distance| Rotation { direction, distance })
            .map_err(|e| anyhow!("invalid rotate value {:?}: {}", &line[1..], e))
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Rotation>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .lines()
            .enumerate()
            .map(|(line_idx, line)| (line_idx, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .map(|(line_idx, line)| {
                line.parse::<Rotation>()
                    .map_err(|e| anyhow!("(line {}) {}", line_idx + 1, e))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))
    }
}

/// Position of the dial after every rotation has been applied
pub fn final_position(rotations: &[Rotation]) -> u64 {
    rotations
        .iter()
        .fold(DIAL_START, |position, rotation| rotation.apply(position))
}

/// Number of rotations that leave the dial pointing at 0
pub fn count_zero_stops(rotations: &[Rotation], mut on_step: StepSink<'_>) -> u64 {
    let (_, zero_counts) = rotations.iter().enumerate().fold(
        (DIAL_START, 0u64),
        |(position, mut zero_counts), (index, rotation)| {
            let next = rotation.apply(position);
            if next == 0 {
                zero_counts += 1;
            }
            if is_sampled_step(index) {
                emit(&mut on_step, || {
                    AnimationStep::new(
                        format!("Rotation {}: {}", index + 1, describe(rotation)),
                        render_dial(position, next),
                        zero_counts,
                    )
                });
            }
            (next, zero_counts)
        },
    );

    emit(&mut on_step, || {
        AnimationStep::message(format!("Dial stopped at 0 {} times", zero_counts), zero_counts)
    });
    zero_counts
}

/// Number of clicks, over all rotations, at which the dial points at 0
pub fn count_zero_passes(
    rotations: &[Rotation],
    mut on_step: StepSink<'_>,
) -> Result<u64, SolveError> {
    let mut position = DIAL_START;
    let mut pass_zero_counts = 0u64;

    for (index, rotation) in rotations.iter().enumerate() {
        let passes = rotation.zero_passes(position);
        let next = rotation.apply(position);
        pass_zero_counts = pass_zero_counts
            .checked_add(passes)
            .ok_or_else(|| SolveError::failed("zero pass count overflows u64"))?;
        if is_sampled_step(index) {
            emit(&mut on_step, || {
                AnimationStep::new(
                    format!(
                        "Rotation {}: {} passes 0 {} time(s)",
                        index + 1,
                        describe(rotation),
                        passes
                    ),
                    render_dial(position, next),
                    pass_zero_counts,
                )
            });
        }
        position = next;
    }

    emit(&mut on_step, || {
        AnimationStep::message(
            format!("Dial passed 0 {} times", pass_zero_counts),
            pass_zero_counts,
        )
    });
    Ok(pass_zero_counts)
}

fn describe(rotation: &Rotation) -> String {
    let direction = match rotation.direction {
        Direction::Left => 'L',
        Direction::Right => 'R',
    };
    format!("{}{}", direction, rotation.distance)
}

fn render_dial(from: u64, to: u64) -> Vec<String> {
    // One marker per 10 positions
    let mut track: Vec<char> = vec!['-'; (DIAL_SIZE / 10) as usize];
    track[(to / 10) as usize] = '*';
    vec![
        format!("dial {:>2} -> {:>2}", from, to),
        format!("0 [{}] 99", track.into_iter().collect::<String>()),
    ]
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(count_zero_stops(shared, None).to_string())
    }
}

impl AnimatedPartSolver<1> for Solver {
    fn solve_animated(
        shared: &mut Self::SharedData<'_>,
        on_step: &mut dyn FnMut(AnimationStep),
    ) -> Result<String, SolveError> {
        Ok(count_zero_stops(shared, Some(on_step)).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        count_zero_passes(shared, None).map(|total| total.to_string())
    }
}

impl AnimatedPartSolver<2> for Solver {
    fn solve_animated(
        shared: &mut Self::SharedData<'_>,
        on_step: &mut dyn FnMut(AnimationStep),
    ) -> Result<String, SolveError> {
        count_zero_passes(shared, Some(on_step)).map(|total| total.to_string())
    }
}
