//! Cephalopod math worksheet
//!
//! Problems sit side by side in column blocks separated by all-blank columns.
//! The bottom line holds one operator per block. Operands are read either
//! left to right along each row, or top to bottom down each column.

use std::ops::RangeInclusive;
use aoc_solver::{AnimatedPartSolver, AnimationStep, AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use log::debug;
use crate::utils::{emit, is_sampled_step, StepSink};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, animated)]
#[aoc(year = 2025, day = 6, tags = ["2025", "parsing"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Multiply,
}

impl Operator {
    /// `*` wins over `+` when a block somehow carries both
    fn find(segment: &[u8]) -> Option<Self> {
        if segment.contains(&b'*') {
            Some(Operator::Multiply)
        } else if segment.contains(&b'+') {
            Some(Operator::Add)
        } else {
            None
        }
    }

    fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Multiply => '*',
        }
    }

    /// Sum or product of `operands`, `None` on overflow
    pub fn apply(self, operands: &[u64]) -> Option<u64> {
        match self {
            Operator::Add => operands.iter().try_fold(0u64, |acc, &n| acc.checked_add(n)),
            Operator::Multiply => operands.iter().try_fold(1u64, |acc, &n| acc.checked_mul(n)),
        }
    }
}

/// How operands are read out of a problem block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// One operand per row
    Rows,
    /// One operand per column, digits top to bottom
    Columns,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub columns: RangeInclusive<usize>,
    pub operator: Operator,
}

#[derive(Debug, Clone)]
pub struct Worksheet<'a> {
    /// Number rows, without the operator row
    pub rows: Vec<&'a str>,
    pub problems: Vec<Problem>,
}

/// The bytes of `line` within `columns`, clipped to the line's length
fn segment<'l>(line: &'l str, columns: &RangeInclusive<usize>) -> &'l [u8] {
    let bytes = line.as_bytes();
    let start = (*columns.start()).min(bytes.len());
    let end = (*columns.end() + 1).min(bytes.len());
    &bytes[start..end]
}

/// Maximal runs of columns where at least one line has a non-space
pub fn find_blocks(lines: &[&str]) -> Vec<RangeInclusive<usize>> {
    let width = lines.iter().map(|line| line.len()).max().unwrap_or(0);
    let is_separator = |col: usize| {
        lines
            .iter()
            .all(|line| !matches!(line.as_bytes().get(col), Some(&b) if b != b' '))
    };

    let mut blocks = Vec::new();
    let mut block_start = None;
    for col in 0..width {
        match (is_separator(col), block_start) {
            (false, None) => block_start = Some(col),
            (true, Some(start)) => {
                blocks.push(start..=col - 1);
                block_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = block_start {
        blocks.push(start..=width - 1);
    }
    blocks
}

impl AocParser for Solver {
    type SharedData<'a> = Worksheet<'a>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let lines: Vec<&str> = input
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .collect();

        let Some((operator_row, rows)) = lines.split_last() else {
            return Ok(Worksheet {
                rows: Vec::new(),
                problems: Vec::new(),
            });
        };

        let problems = find_blocks(&lines)
            .into_iter()
            .map(|columns| match Operator::find(segment(operator_row, &columns)) {
                Some(operator) => Ok(Problem { columns, operator }),
                None => Err(ParseError::MissingData(format!(
                    "no operator below columns {}..={}",
                    columns.start(),
                    columns.end()
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!("worksheet has {} problems over {} rows", problems.len(), rows.len());

        Ok(Worksheet {
            rows: rows.to_vec(),
            problems,
        })
    }
}

fn parse_digits(digits: impl IntoIterator<Item = u8>) -> Option<u64> {
    digits.into_iter().try_fold(0u64, |acc, digit| {
        acc.checked_mul(10)?.checked_add(u64::from(digit - b'0'))
    })
}

/// Operands of one problem read in the given orientation
///
/// Row segments that are blank or hold anything but digits are skipped, as are
/// columns without digits.
pub fn operands(
    rows: &[&str],
    columns: &RangeInclusive<usize>,
    orientation: Orientation,
) -> Result<Vec<u64>, SolveError> {
    let overflow = || SolveError::failed(format!("operand in columns {:?} overflows u64", columns));

    match orientation {
        Orientation::Rows => rows
            .iter()
            .map(|row| segment(row, columns).trim_ascii())
            .filter(|digits| !digits.is_empty() && digits.iter().all(u8::is_ascii_digit))
            .map(|digits| parse_digits(digits.iter().copied()).ok_or_else(overflow))
            .collect(),
        Orientation::Columns => columns
            .clone()
            .map(|col| {
                rows.iter()
                    .filter_map(|row| row.as_bytes().get(col).copied())
                    .filter(u8::is_ascii_digit)
                    .collect::<Vec<u8>>()
            })
            .filter(|digits| !digits.is_empty())
            .map(|digits| parse_digits(digits).ok_or_else(overflow))
            .collect(),
    }
}

/// Grand total of every problem on the worksheet
pub fn grand_total(
    worksheet: &Worksheet<'_>,
    orientation: Orientation,
    mut on_step: StepSink<'_>,
) -> Result<u64, SolveError> {
    let mut total = 0u64;

    for (index, problem) in worksheet.problems.iter().enumerate() {
        let values = operands(&worksheet.rows, &problem.columns, orientation)?;
        let answer = problem.operator.apply(&values).ok_or_else(|| {
            SolveError::failed(format!("problem {} overflows u64", index + 1))
        })?;
        total = total
            .checked_add(answer)
            .ok_or_else(|| SolveError::failed("grand total overflows u64"))?;

        if is_sampled_step(index) {
            emit(&mut on_step, || {
                let expression = values
                    .iter()
                    .map(u64::to_string)
                    .collect::<Vec<_>>()
                    .join(&format!(" {} ", problem.operator.symbol()));
                AnimationStep::new(
                    format!("Problem {}: {} = {}", index + 1, expression, answer),
                    render_block(&worksheet.rows, &problem.columns),
                    total,
                )
            });
        }
    }

    emit(&mut on_step, || {
        AnimationStep::message(
            format!("Grand total of {} problems", worksheet.problems.len()),
            total,
        )
    });
    Ok(total)
}

fn render_block(rows: &[&str], columns: &RangeInclusive<usize>) -> Vec<String> {
    rows.iter()
        .map(|row| format!("|{}|", String::from_utf8_lossy(segment(row, columns))))
        .collect()
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        grand_total(shared, Orientation::Rows, None).map(|total| total.to_string())
    }
}

impl AnimatedPartSolver<1> for Solver {
    fn solve_animated(
        shared: &mut Self::SharedData<'_>,
        on_step: &mut dyn FnMut(AnimationStep),
    ) -> Result<String, SolveError> {
        grand_total(shared, Orientation::Rows, Some(on_step)).map(|total| total.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        grand_total(shared, Orientation::Columns, None).map(|total| total.to_string())
    }
}

impl AnimatedPartSolver<2> for Solver {
    fn solve_animated(
        shared: &mut Self::SharedData<'_>,
        on_step: &mut dyn FnMut(AnimationStep),
    ) -> Result<String, SolveError> {
        grand_total(shared, Orientation::Columns, Some(on_step)).map(|total| total.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;

    const EXAMPLE: &str = concat!(
        "123 328  51 64 \n",
        " 45 64  387 23 \n",
        "  6 98  215 314\n",
        "*   +   *   +  \n",
    );

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(shared.problems.len(), 4);
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "4277556");
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "3263827");
    }

    #[test]
    fn test_blocks_and_operators() {
        let shared = Solver::parse(EXAMPLE).unwrap();
        let blocks: Vec<_> = shared.problems.iter().map(|p| p.columns.clone()).collect();
        assert_eq!(blocks, vec![0..=2, 4..=6, 8..=10, 12..=14]);
        let ops: Vec<_> = shared.problems.iter().map(|p| p.operator).collect();
        assert_eq!(
            ops,
            vec![Operator::Multiply, Operator::Add, Operator::Multiply, Operator::Add]
        );
    }

    #[test]
    fn test_operands_by_orientation() {
        let shared = Solver::parse(EXAMPLE).unwrap();
        let columns = &shared.problems[0].columns;
        assert_eq!(operands(&shared.rows, columns, Orientation::Rows).unwrap(), vec![123, 45, 6]);
        assert_eq!(operands(&shared.rows, columns, Orientation::Columns).unwrap(), vec![1, 24, 356]);
    }

    #[test]
    fn test_short_lines_are_padded() {
        // The second row stops before the second block
        let mut shared = Solver::parse("12 3\n45\n+  *\n").unwrap();
        assert_eq!(shared.problems.len(), 2);
        // (12 + 45) + 3
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "60");
        // (14 + 25) + 3
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "42");
    }

    #[test]
    fn test_missing_operator_is_rejected() {
        let err = Solver::parse("1 2\n3 4\n+  \n").unwrap_err();
        assert!(matches!(err, ParseError::MissingData(_)), "{}", err);
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut shared = Solver::parse("99999999999\n99999999999\n*\n").unwrap();
        let err = Solver::solve_part(&mut shared, 1).unwrap_err();
        assert!(err.to_string().contains("overflows"), "{}", err);
        let mut shared = Solver::parse("999999999999999999999\n+\n").unwrap();
        assert!(Solver::solve_part(&mut shared, 1).is_err());
    }

    #[test]
    fn test_empty_input() {
        let mut shared = Solver::parse("\n\n").unwrap();
        assert!(shared.problems.is_empty());
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "0");
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "0");
    }

    #[test]
    fn test_animated_matches_plain() {
        let shared = Solver::parse(EXAMPLE).unwrap();
        for orientation in [Orientation::Rows, Orientation::Columns] {
            let mut steps = Vec::new();
            let mut record = |step: AnimationStep| steps.push(step);
            let animated = grand_total(&shared, orientation, Some(&mut record)).unwrap();
            assert_eq!(animated, grand_total(&shared, orientation, None).unwrap());
            assert_eq!(steps.len(), shared.problems.len() + 1);
            assert_eq!(steps.last().map(|s| s.current_value), Some(animated));
        }
    }
}
