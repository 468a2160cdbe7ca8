//! End-to-end checks of the 2025 solutions through the plugin registry

use aoc_solver::{AnimationStep, SolverError, SolverRegistry, SolverRegistryBuilder};

// Reference the crate so the linker keeps its plugin submissions
use aoc_solutions as _;

const EXAMPLES: [(u8, &str, &str, &str); 7] = [
    (1, "L68\nL30\nR48\nL5\nR60\nL55\nL1\nL99\nR14\nL82\n", "3", "6"),
    (
        2,
        "11-22,95-115,998-1012,1188511880-1188511890,222220-222224,\
         1698522-1698528,446443-446449,38593856-38593862,565653-565659,\
         824824821-824824827,2121212118-2121212124",
        "1227775554",
        "4174379265",
    ),
    (
        3,
        "987654321111111\n811111111111119\n234234234234278\n818181911112111\n",
        "357",
        "3121910778619",
    ),
    (
        4,
        "..@@.@@@@.\n@@@.@.@.@@\n@@@@@.@.@@\n@.@@@@..@.\n@@.@@@@.@@\n\
         .@@@@@@@.@\n.@.@.@.@@@\n@.@@@.@@@@\n.@@@@@@@@.\n@.@.@@@.@.\n",
        "13",
        "43",
    ),
    (5, "3-5\n10-14\n16-20\n12-18\n\n1\n5\n8\n11\n17\n32\n", "3", "14"),
    (
        6,
        "123 328  51 64 \n 45 64  387 23 \n  6 98  215 314\n*   +   *   +  \n",
        "4277556",
        "3263827",
    ),
    (
        7,
        ".......S.......\n...............\n.......^.......\n...............\n\
         ......^.^......\n...............\n.....^.^.^.....\n...............\n\
         ....^.^...^....\n...............\n...^.^...^.^...\n...............\n\
         ..^...^.....^..\n...............\n.^.^.^.^.^...^.\n...............\n",
        "21",
        "40",
    ),
];

fn registry_2025() -> SolverRegistry {
    SolverRegistryBuilder::new()
        .register_solver_plugins(|plugin| plugin.tags.contains(&"2025"))
        .expect("plugins register without conflicts")
        .build()
}

#[test]
fn test_all_days_registered() {
    let registry = registry_2025();
    let days: Vec<(u16, u8, u8)> = registry
        .storage()
        .iter_info()
        .map(|info| (info.year, info.day, info.parts))
        .collect();
    assert_eq!(days, (1..=7).map(|day| (2025, day, 2)).collect::<Vec<_>>());
}

#[test]
fn test_examples_end_to_end() {
    let registry = registry_2025();
    for (day, input, part1, part2) in EXAMPLES {
        let mut solver = registry.create_solver(2025, day, input).unwrap();
        assert_eq!((solver.year(), solver.day(), solver.parts()), (2025, day, 2));
        assert_eq!(solver.solve(1).unwrap().answer, part1, "day {} part 1", day);
        assert_eq!(solver.solve(2).unwrap().answer, part2, "day {} part 2", day);
        // Solving again gives the same answers
        assert_eq!(solver.solve(1).unwrap().answer, part1, "day {} part 1 rerun", day);
        assert!(solver.solve(3).is_err());
    }
}

#[test]
fn test_animated_answers_match() {
    let registry = registry_2025();
    for (day, input, part1, part2) in EXAMPLES {
        let mut solver = registry.create_solver(2025, day, input).unwrap();
        for (part, expected) in [(1, part1), (2, part2)] {
            let mut steps: Vec<AnimationStep> = Vec::new();
            let result = solver
                .solve_animated(part, &mut |step| steps.push(step))
                .unwrap();
            assert_eq!(result.answer, expected, "day {} part {}", day, part);
            let last = steps.last().expect("at least one step");
            assert_eq!(last.current_value.to_string(), expected, "day {} part {}", day, part);
        }
    }
}

#[test]
fn test_tag_filtering() {
    let registry = SolverRegistryBuilder::new()
        .register_solver_plugins(|plugin| plugin.tags.contains(&"grid"))
        .unwrap()
        .build();
    assert!(registry.storage().contains(2025, 4));
    assert!(registry.storage().contains(2025, 7));
    assert!(!registry.storage().contains(2025, 1));
    assert!(matches!(
        registry.create_solver(2025, 1, ""),
        Err(SolverError::NotFound(2025, 1))
    ));
}

#[test]
fn test_malformed_inputs_fail_to_parse() {
    let registry = registry_2025();
    for (day, input) in [(1, "X12"), (2, "1-2-3"), (3, "12z"), (5, "5-1"), (6, "1 2\n3 4\n-  \n")] {
        let result = registry.create_solver(2025, day, input);
        assert!(
            matches!(result, Err(SolverError::ParseError(_))),
            "day {} accepted {:?}",
            day,
            input
        );
    }
}

#[test]
fn test_empty_inputs_give_zero() {
    let registry = registry_2025();
    for day in 1..=7 {
        let mut solver = registry.create_solver(2025, day, "").unwrap();
        assert_eq!(solver.solve(1).unwrap().answer, "0", "day {}", day);
        assert_eq!(solver.solve(2).unwrap().answer, "0", "day {}", day);
    }
}
