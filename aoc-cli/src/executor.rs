//! Parallel executor for running solvers

use crate::cli::ParallelizeBy;
use crate::config::Config;
use crate::error::{ArcExecutorError, ExecutorError};
use crate::inputs::InputStore;
use aoc_solver::{AnimationStep, DynSolver, ParseError, SolveError, SolverError, SolverRegistry};
use chrono::TimeDelta;
use itertools::Itertools;
use log::{debug, warn};
use rayon::prelude::*;
use std::ops::RangeInclusive;
use std::sync::mpsc::Sender;

/// Result from a single solver execution
pub struct SolverResult {
    pub year: u16,
    pub day: u8,
    pub part: u8,
    pub answer: Result<String, SolverError>,
    pub solve_duration: TimeDelta,
    /// Parse time of the instance that solved this part, if parsing succeeded
    pub parse_duration: Option<TimeDelta>,
    /// Animation steps, only collected when animating
    pub steps: Vec<AnimationStep>,
}

/// Work item representing a solver to execute
pub struct WorkItem {
    pub year: u16,
    pub day: u8,
    pub parts: RangeInclusive<u8>,
}

/// Parallel executor for running solvers
pub struct Executor {
    sync_executor_config: SyncExecutorConfig,
    thread_pool: rayon::ThreadPool,
}

pub struct SyncExecutorConfig {
    registry: SolverRegistry,
    inputs: InputStore,
    parallelize_by: ParallelizeBy,
    animate: bool,
    year_filter: Option<u16>,
    day_filter: Option<u8>,
    part_filter: Option<u8>,
}

impl Executor {
    /// Create a new executor from config
    pub fn new(registry: SolverRegistry, config: &Config) -> Result<Self, ExecutorError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.thread_count)
            .build()
            .map_err(|e| ExecutorError::ThreadPool(e.to_string()))?;

        Ok(Self {
            sync_executor_config: SyncExecutorConfig {
                registry,
                inputs: InputStore::new(config.input_dir.clone()),
                parallelize_by: config.parallelize_by,
                animate: config.animate,
                year_filter: config.year_filter,
                day_filter: config.day_filter,
                part_filter: config.part_filter,
            },
            thread_pool,
        })
    }

    /// Collect work items by filtering from registry metadata
    pub fn collect_work_items(&self) -> Vec<WorkItem> {
        let cfg = &self.sync_executor_config;
        cfg.registry
            .storage()
            .iter_info()
            .filter(|info| cfg.year_filter.is_none_or(|y| info.year == y))
            .filter(|info| cfg.day_filter.is_none_or(|d| info.day == d))
            .map(|info| WorkItem {
                year: info.year,
                day: info.day,
                parts: self.filter_parts(info.parts),
            })
            .filter(|w| !w.parts.is_empty())
            .collect()
    }

    /// Year/day pairs among the work items whose input file is missing
    pub fn missing_inputs(&self) -> Vec<(u16, u8)> {
        let inputs = &self.sync_executor_config.inputs;
        self.collect_work_items()
            .iter()
            .filter(|w| !inputs.contains(w.year, w.day))
            .map(|w| (w.year, w.day))
            .collect()
    }

    /// Filter parts based on config.part_filter and solver's max parts
    #[allow(clippy::reversed_empty_ranges)]
    fn filter_parts(&self, max_parts: u8) -> RangeInclusive<u8> {
        match self.sync_executor_config.part_filter {
            Some(p) if p <= max_parts => p..=p,
            Some(_) => 1..=0,
            None => 1..=max_parts,
        }
    }

    /// Execute all work items and send results to channel
    pub fn execute(&self, tx: Sender<SolverResult>) -> Result<(), ArcExecutorError> {
        let work_items = self.collect_work_items();

        match self.sync_executor_config.parallelize_by {
            ParallelizeBy::Sequential => {
                let mut collected_error: Option<ArcExecutorError> = None;
                for work in work_items {
                    if let Err(e) = run_solver(&work, &tx, &self.sync_executor_config) {
                        collected_error = Some(ArcExecutorError::combine_opt(collected_error, e));
                    }
                }
                collected_error.map_or(Ok(()), Err)
            }
            ParallelizeBy::Year => {
                let by_year: Vec<Vec<WorkItem>> = work_items
                    .into_iter()
                    .chunk_by(|w| w.year)
                    .into_iter()
                    .map(|(_, group)| group.collect())
                    .collect();

                self.execute_parallel_grouped(by_year, &tx)
            }
            // Part additionally splits each work item inside run_solver
            ParallelizeBy::Day | ParallelizeBy::Part => self.execute_parallel(work_items, &tx),
        }
    }

    /// Execute work items in parallel, collecting errors
    fn execute_parallel(
        &self,
        work_items: Vec<WorkItem>,
        tx: &Sender<SolverResult>,
    ) -> Result<(), ArcExecutorError> {
        let sync_executor_config = &self.sync_executor_config;

        self.thread_pool.install(|| {
            work_items
                .into_par_iter()
                .map(|work| run_solver(&work, tx, sync_executor_config).err())
                .reduce_with(|err1, err2| match (err1, err2) {
                    (Some(err1), Some(err2)) => Some(ArcExecutorError::combine(err1, err2)),
                    (err1, err2) => err1.or(err2),
                })
                .unwrap_or_default()
                .map_or(Ok(()), Err)
        })
    }

    /// Execute grouped work items in parallel (for year-level parallelism)
    fn execute_parallel_grouped(
        &self,
        groups: Vec<Vec<WorkItem>>,
        tx: &Sender<SolverResult>,
    ) -> Result<(), ArcExecutorError> {
        let sync_executor_config = &self.sync_executor_config;

        self.thread_pool.install(|| {
            groups
                .into_par_iter()
                .map(|items| {
                    let mut err = None;
                    for work in items {
                        if let Err(e) = run_solver(&work, tx, sync_executor_config) {
                            err = Some(ArcExecutorError::combine_opt(err, e))
                        }
                    }
                    err
                })
                .reduce_with(|err1, err2| match (err1, err2) {
                    (Some(err1), Some(err2)) => Some(ArcExecutorError::combine(err1, err2)),
                    (err1, err2) => err1.or(err2),
                })
                .unwrap_or_default()
                .map_or(Ok(()), Err)
        })
    }
}

fn send(tx: &Sender<SolverResult>, result: SolverResult) -> Result<(), ArcExecutorError> {
    tx.send(result)
        .map_err(|_| ExecutorError::ChannelSend.into())
}

fn error_result(year: u16, day: u8, part: u8, error: SolverError) -> SolverResult {
    SolverResult {
        year,
        day,
        part,
        answer: Err(error),
        solve_duration: TimeDelta::zero(),
        parse_duration: None,
        steps: Vec::new(),
    }
}

/// Copy of a solver error for reporting it once per part
fn replicate(error: &SolverError) -> SolverError {
    match error {
        SolverError::NotFound(year, day) => SolverError::NotFound(*year, *day),
        SolverError::InvalidYearDay(year, day) => SolverError::InvalidYearDay(*year, *day),
        SolverError::ParseError(e) => SolverError::ParseError(e.clone()),
        SolverError::SolveError(e) => SolverError::SolveError(SolveError::failed(e.to_string())),
    }
}

/// Parse the input into a solver, or report the failure for every part
///
/// Returns `Ok(None)` once the failure has been reported.
fn create_or_report<'a>(
    registry: &SolverRegistry,
    work: &WorkItem,
    parts: RangeInclusive<u8>,
    input: &'a str,
    tx: &Sender<SolverResult>,
) -> Result<Option<Box<dyn DynSolver + 'a>>, ArcExecutorError> {
    match registry.create_solver(work.year, work.day, input) {
        Ok(solver) => Ok(Some(solver)),
        Err(e) => {
            warn!("{}/day{:02}: {}", work.year, work.day, e);
            for part in parts {
                send(tx, error_result(work.year, work.day, part, replicate(&e)))?;
            }
            Ok(None)
        }
    }
}

/// Read the input of one work item and solve its parts
fn run_solver(
    work: &WorkItem,
    tx: &Sender<SolverResult>,
    sync_executor_config: &SyncExecutorConfig,
) -> Result<(), ArcExecutorError> {
    let input = match sync_executor_config.inputs.read(work.year, work.day) {
        Ok(input) => input,
        Err(source) => {
            let error = ExecutorError::InputRead {
                year: work.year,
                day: work.day,
                source,
            };
            warn!("{}", error);
            let message = error.to_string();
            for part in work.parts.clone() {
                let missing = SolverError::ParseError(ParseError::MissingData(message.clone()));
                send(tx, error_result(work.year, work.day, part, missing))?;
            }
            return Ok(());
        }
    };

    if matches!(sync_executor_config.parallelize_by, ParallelizeBy::Part) {
        run_solver_parts_parallel(work, &input, tx, sync_executor_config)
    } else {
        run_solver_sequential(work, &input, tx, sync_executor_config)
    }
}

/// Run solver with part-level parallelism, buffering results to emit in order
fn run_solver_parts_parallel(
    work: &WorkItem,
    input: &str,
    tx: &Sender<SolverResult>,
    sync_executor_config: &SyncExecutorConfig,
) -> Result<(), ArcExecutorError> {
    let (result_tx, result_rx) = std::sync::mpsc::channel();
    let registry = &sync_executor_config.registry;
    let animate = sync_executor_config.animate;

    // Each part parses its own instance
    work.parts
        .clone()
        .into_par_iter()
        .for_each_with(result_tx, |rtx, part| {
            if let Ok(Some(mut solver)) = create_or_report(registry, work, part..=part, input, rtx) {
                rtx.send(solve_part_internal(work, part, &mut *solver, animate))
                    .ok();
            }
        });

    // Buffer and emit results in part order
    let mut buffer: [Option<SolverResult>; 2] = [None, None];
    let start_part = *work.parts.start();
    let mut next_part = start_part;

    for result in result_rx {
        let idx = (result.part - start_part) as usize;
        if idx < buffer.len() {
            buffer[idx] = Some(result);
        }
        while let Some(result) = buffer
            .get_mut((next_part - start_part) as usize)
            .and_then(Option::take)
        {
            send(tx, result)?;
            next_part += 1;
        }
    }
    Ok(())
}

/// Solve the parts one after another on a scoped thread, forwarding results as they arrive
fn run_solver_sequential(
    work: &WorkItem,
    input: &str,
    tx: &Sender<SolverResult>,
    sync_executor_config: &SyncExecutorConfig,
) -> Result<(), ArcExecutorError> {
    let (solve_tx, solve_rx) = std::sync::mpsc::channel();
    let registry = &sync_executor_config.registry;
    let animate = sync_executor_config.animate;

    std::thread::scope(|s| {
        s.spawn(move || {
            let Ok(Some(mut solver)) =
                create_or_report(registry, work, work.parts.clone(), input, &solve_tx)
            else {
                return;
            };
            for part in work.parts.clone() {
                if solve_tx
                    .send(solve_part_internal(work, part, &mut *solver, animate))
                    .is_err()
                {
                    break;
                }
            }
        });

        for result in solve_rx {
            send(tx, result)?;
        }
        Ok(())
    })
}

/// Solve a single part, collecting animation steps when asked to
fn solve_part_internal(
    work: &WorkItem,
    part: u8,
    solver: &mut dyn DynSolver,
    animate: bool,
) -> SolverResult {
    debug!("running {}/day{:02} part {}", work.year, work.day, part);

    let mut steps = Vec::new();
    let outcome = if animate {
        solver.solve_animated(part, &mut |step| steps.push(step))
    } else {
        solver.solve(part)
    };

    let (answer, solve_duration) = match outcome {
        Ok(result) => {
            let duration = result.duration();
            (Ok(result.answer), duration)
        }
        Err(e) => (Err(SolverError::from(e)), TimeDelta::zero()),
    };

    SolverResult {
        year: work.year,
        day: work.day,
        part,
        answer,
        solve_duration,
        parse_duration: Some(solver.parse_duration()),
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::SolverRegistryBuilder;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const DAY1_EXAMPLE: &str = "L68\nL30\nR48\nL5\nR60\nL55\nL1\nL99\nR14\nL82\n";
    const DAY5_EXAMPLE: &str = "3-5\n10-14\n16-20\n12-18\n\n1\n5\n8\n11\n17\n32\n";

    fn config(input_dir: &Path, parallelize_by: ParallelizeBy) -> Config {
        Config {
            year_filter: Some(2025),
            day_filter: None,
            part_filter: None,
            tags: Vec::new(),
            input_dir: input_dir.to_path_buf(),
            thread_count: 2,
            parallelize_by,
            animate: false,
            quiet: true,
        }
    }

    fn executor(config: &Config) -> Executor {
        let registry = SolverRegistryBuilder::new()
            .register_solver_plugins(|plugin| plugin.tags.contains(&"2025"))
            .unwrap()
            .build();
        Executor::new(registry, config).unwrap()
    }

    fn run(executor: &Executor) -> Vec<SolverResult> {
        let (tx, rx) = std::sync::mpsc::channel();
        executor.execute(tx).unwrap();
        let mut results: Vec<SolverResult> = rx.into_iter().collect();
        results.sort_by_key(|r| (r.year, r.day, r.part));
        results
    }

    fn answer(results: &[SolverResult], day: u8, part: u8) -> Option<&str> {
        results
            .iter()
            .find(|r| r.day == day && r.part == part)
            .and_then(|r| r.answer.as_deref().ok())
    }

    #[test]
    fn test_every_parallelization_level() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("2025_day01.txt"), DAY1_EXAMPLE).unwrap();
        fs::write(temp.path().join("2025_day05.txt"), DAY5_EXAMPLE).unwrap();

        for level in [
            ParallelizeBy::Sequential,
            ParallelizeBy::Year,
            ParallelizeBy::Day,
            ParallelizeBy::Part,
        ] {
            let executor = executor(&config(temp.path(), level));
            let results = run(&executor);
            assert_eq!(results.len(), 14, "{:?}", level);
            assert_eq!(answer(&results, 1, 1), Some("3"));
            assert_eq!(answer(&results, 1, 2), Some("6"));
            assert_eq!(answer(&results, 5, 1), Some("3"));
            assert_eq!(answer(&results, 5, 2), Some("14"));
            // Days without an input file report an error per part
            assert_eq!(results.iter().filter(|r| r.answer.is_err()).count(), 10);
        }
    }

    #[test]
    fn test_missing_inputs_and_filters() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("2025_day01.txt"), DAY1_EXAMPLE).unwrap();

        let mut cfg = config(temp.path(), ParallelizeBy::Day);
        cfg.day_filter = Some(1);
        cfg.part_filter = Some(2);
        let executor = executor(&cfg);
        assert!(executor.missing_inputs().is_empty());
        let work = executor.collect_work_items();
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].parts, 2..=2);

        let results = run(&executor);
        assert_eq!(results.len(), 1);
        assert_eq!(answer(&results, 1, 2), Some("6"));
        assert!(results[0].parse_duration.is_some());

        let executor = self::executor(&config(temp.path(), ParallelizeBy::Day));
        assert_eq!(executor.missing_inputs(), (2..=7).map(|day| (2025, day)).collect::<Vec<_>>());
    }

    #[test]
    fn test_parse_failure_reported_per_part() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("2025_day01.txt"), "X1\n").unwrap();

        let mut cfg = config(temp.path(), ParallelizeBy::Sequential);
        cfg.day_filter = Some(1);
        let results = run(&executor(&cfg));
        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|r| matches!(r.answer, Err(SolverError::ParseError(_)))));
    }

    #[test]
    fn test_animate_collects_steps() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("2025_day05.txt"), DAY5_EXAMPLE).unwrap();

        let mut cfg = config(temp.path(), ParallelizeBy::Sequential);
        cfg.day_filter = Some(5);
        cfg.animate = true;
        let results = run(&executor(&cfg));
        assert_eq!(results.len(), 2);
        for result in &results {
            let last = result.steps.last().expect("steps collected");
            assert_eq!(
                result.answer.as_deref().ok(),
                Some(last.current_value.to_string().as_str())
            );
        }
    }
}
