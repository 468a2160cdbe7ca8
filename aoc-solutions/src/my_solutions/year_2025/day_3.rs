use std::str::FromStr;
use anyhow::{anyhow, bail, Context};
use aoc_solver::{AnimatedPartSolver, AnimationStep, AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use crate::utils::{emit, is_sampled_step, StepSink};

const PART1_SELECTION: usize = 2;
const PART2_SELECTION: usize = 12;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, animated)]
#[aoc(year = 2025, day = 3, tags = ["2025", "greedy"])]
pub struct Solver;

/// One battery bank, optionally carrying its own selection counts
///
/// Line format: `<digits> [k1 [k2]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    pub digits: Vec<u8>,
    pub part1_k: Option<usize>,
    pub part2_k: Option<usize>,
}

impl Bank {
    pub fn selection(&self, part: Part) -> usize {
        match part {
            Part::One => self.part1_k.unwrap_or(PART1_SELECTION),
            Part::Two => self.part2_k.unwrap_or(PART2_SELECTION),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    One,
    Two,
}

impl FromStr for Bank {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split_whitespace();
        let bank = fields.next().ok_or_else(|| anyhow!("empty bank"))?;
        let digits = bank
            .bytes()
            .map(|b| match b {
                b'0'..=b'9' => Ok(b - b'0'),
                _ => Err(anyhow!("invalid battery {:?} in bank {:?}", b as char, bank)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut counts = fields.map(|field| {
            field
                .parse::<usize>()
                .with_context(|| format!("invalid selection count {:?}", field))
        });
        let part1_k = counts.next().transpose()?;
        let part2_k = counts.next().transpose()?;
        if counts.next().is_some() {
            bail!("expected at most two selection counts");
        }

        Ok(Bank {
            digits,
            part1_k,
            part2_k,
        })
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Bank>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .lines()
            .enumerate()
            .map(|(line_idx, line)| (line_idx, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .map(|(line_idx, line)| {
                line.parse::<Bank>()
                    .map_err(|e| anyhow!("(line {}) {:#}", line_idx + 1, e))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))
    }
}

/// Positions of the `k` digits forming the largest number, in bank order
///
/// Each pick takes the largest digit that still leaves enough digits for the
/// remaining picks, preferring the earliest on ties.
pub fn select_positions(digits: &[u8], k: usize) -> Vec<usize> {
    if k >= digits.len() {
        return (0..digits.len()).collect();
    }

    let mut positions = Vec::with_capacity(k);
    let mut search_start = 0;
    for remaining in (1..=k).rev() {
        let last_valid = digits.len() - remaining;
        let mut best = search_start;
        for pos in search_start + 1..=last_valid {
            if digits[pos] > digits[best] {
                best = pos;
                if digits[best] == 9 {
                    break;
                }
            }
        }
        positions.push(best);
        search_start = best + 1;
    }
    positions
}

fn to_number(digits: impl IntoIterator<Item = u8>) -> Option<u64> {
    digits.into_iter().try_fold(0u64, |acc, digit| {
        acc.checked_mul(10)?.checked_add(u64::from(digit))
    })
}

/// The largest number formed by `k` digits of the bank kept in order, or
/// `None` if it does not fit in a `u64`
pub fn max_selection(digits: &[u8], k: usize) -> Option<u64> {
    to_number(select_positions(digits, k).into_iter().map(|pos| digits[pos]))
}

/// Sum of the best selections over all banks
pub fn total_joltage(
    banks: &[Bank],
    part: Part,
    mut on_step: StepSink<'_>,
) -> Result<u64, SolveError> {
    let mut total = 0u64;

    for (index, bank) in banks.iter().enumerate() {
        let k = bank.selection(part);
        let positions = select_positions(&bank.digits, k);
        let joltage = to_number(positions.iter().map(|&pos| bank.digits[pos]))
            .ok_or_else(|| SolveError::failed(format!("bank {}: {} digits overflow u64", index + 1, k)))?;
        total = total
            .checked_add(joltage)
            .ok_or_else(|| SolveError::failed("total joltage overflows u64"))?;

        if is_sampled_step(index) {
            emit(&mut on_step, || {
                AnimationStep::new(
                    format!("Bank {}: picked {} -> {}", index + 1, k, joltage),
                    render_bank(&bank.digits, &positions),
                    total,
                )
            });
        }
    }

    emit(&mut on_step, || {
        AnimationStep::message(format!("Total joltage of {} banks", banks.len()), total)
    });
    Ok(total)
}

fn render_bank(digits: &[u8], positions: &[usize]) -> Vec<String> {
    const SHOWN: usize = 60;
    let bank: String = digits.iter().take(SHOWN).map(|&d| char::from(b'0' + d)).collect();
    let mut marks = vec![' '; bank.len()];
    for &pos in positions.iter().filter(|&&pos| pos < SHOWN) {
        marks[pos] = '^';
    }
    vec![bank, marks.into_iter().collect::<String>().trim_end().to_string()]
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        total_joltage(shared, Part::One, None).map(|total| total.to_string())
    }
}

impl AnimatedPartSolver<1> for Solver {
    fn solve_animated(
        shared: &mut Self::SharedData<'_>,
        on_step: &mut dyn FnMut(AnimationStep),
    ) -> Result<String, SolveError> {
        total_joltage(shared, Part::One, Some(on_step)).map(|total| total.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        total_joltage(shared, Part::Two, None).map(|total| total.to_string())
    }
}

impl AnimatedPartSolver<2> for Solver {
    fn solve_animated(
        shared: &mut Self::SharedData<'_>,
        on_step: &mut dyn FnMut(AnimationStep),
    ) -> Result<String, SolveError> {
        total_joltage(shared, Part::Two, Some(on_step)).map(|total| total.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;
    use proptest::prelude::*;

    const EXAMPLE: &str = "987654321111111\n811111111111119\n234234234234278\n818181911112111\n";

    fn digits(s: &str) -> Vec<u8> {
        s.bytes().map(|b| b - b'0').collect()
    }

    fn brute_force(digits: &[u8], k: usize) -> u64 {
        (0u32..1 << digits.len())
            .filter(|mask| mask.count_ones() as usize == k)
            .map(|mask| {
                to_number((0..digits.len()).filter(|i| mask & (1 << i) != 0).map(|i| digits[i]))
                    .unwrap()
            })
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "357");
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "3121910778619");
    }

    #[test]
    fn test_descending_bank() {
        assert_eq!(max_selection(&digits("987654321"), 2), Some(98));
        assert_eq!(max_selection(&digits("818181911112111"), 2), Some(92));
    }

    #[test]
    fn test_ties_prefer_earliest() {
        assert_eq!(select_positions(&digits("9919"), 2), vec![0, 1]);
        assert_eq!(max_selection(&digits("9919"), 3), Some(999));
    }

    #[test]
    fn test_selection_covers_whole_bank() {
        assert_eq!(max_selection(&digits("4213"), 4), Some(4213));
        assert_eq!(max_selection(&digits("4213"), 9), Some(4213));
        assert_eq!(max_selection(&digits("4213"), 0), Some(0));
    }

    #[test]
    fn test_overflow_is_reported() {
        let long = "9".repeat(25);
        assert_eq!(max_selection(&digits(&long), 25), None);
        let mut shared = Solver::parse(&format!("{} 2 25", long)).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "99");
        assert!(matches!(
            Solver::solve_part(&mut shared, 2),
            Err(SolveError::SolveFailed(_))
        ));
    }

    #[test]
    fn test_embedded_selection_counts() {
        let mut shared = Solver::parse("12345 3\n98765 1 4\n").unwrap();
        assert_eq!(shared[0].part1_k, Some(3));
        assert_eq!(shared[0].part2_k, None);
        // 345 + 9
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "354");
        // 12345 + 9876
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "22221");
    }

    #[test]
    fn test_empty_and_malformed_input() {
        let mut shared = Solver::parse("\n  \n").unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "0");
        assert!(Solver::parse("12a4").is_err());
        assert!(Solver::parse("1234 x").is_err());
        assert!(Solver::parse("1234 1 2 3").is_err());
    }

    proptest! {
        #[test]
        fn prop_greedy_is_optimal(bank in prop::collection::vec(1u8..=9, 1..12), k in 1usize..12) {
            let k = k.min(bank.len());
            let best = max_selection(&bank, k).unwrap();
            prop_assert_eq!(best, brute_force(&bank, k));
            prop_assert_eq!(best.to_string().len(), k);
        }

        #[test]
        fn prop_animated_matches_plain(banks in prop::collection::vec(prop::collection::vec(1u8..=9, 1..30), 0..20)) {
            let banks: Vec<Bank> = banks
                .into_iter()
                .map(|digits| Bank { digits, part1_k: None, part2_k: None })
                .collect();
            let mut last = None;
            let mut record = |step: AnimationStep| last = Some(step.current_value);
            let animated = total_joltage(&banks, Part::Two, Some(&mut record)).unwrap();
            prop_assert_eq!(animated, total_joltage(&banks, Part::Two, None).unwrap());
            prop_assert_eq!(last, Some(animated));
        }
    }
}
