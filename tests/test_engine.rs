use godsel::{
    error::{GeneticError, Result},
    evolution::{
        EngineBuilder, EngineOptions, Evaluator, LogLevel, NeverStopEarly, RoundReport,
        StopAtFirstSuccess,
    },
    individual::Individual,
    selection::{Direction, RankedCandidate, Score},
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

/// Individual with a unique id per object and a depth that grows by one per successor.
/// Tracks how many instances are alive.
#[derive(Debug)]
struct Lineage {
    id: usize,
    depth: u32,
    next_id: Arc<AtomicUsize>,
    alive: Arc<AtomicUsize>,
}

impl Lineage {
    fn seed(next_id: &Arc<AtomicUsize>, alive: &Arc<AtomicUsize>) -> Self {
        alive.fetch_add(1, Ordering::SeqCst);
        Lineage {
            id: usize::MAX,
            depth: 0,
            next_id: Arc::clone(next_id),
            alive: Arc::clone(alive),
        }
    }
}

impl Individual for Lineage {
    fn produce_successor(&self) -> Self {
        self.alive.fetch_add(1, Ordering::SeqCst);
        Lineage {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            depth: self.depth + 1,
            next_id: Arc::clone(&self.next_id),
            alive: Arc::clone(&self.alive),
        }
    }

    fn describe(&self) -> String {
        format!("{}", self.id)
    }
}

impl Drop for Lineage {
    fn drop(&mut self) {
        self.alive.fetch_sub(1, Ordering::SeqCst);
    }
}

fn counters() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)))
}

fn options(
    population: usize,
    successors: usize,
    threads: usize,
    cycles: usize,
    direction: Direction,
) -> EngineOptions {
    EngineOptions::new(population, successors, 1, threads, cycles, direction, LogLevel::None)
}

fn by_id(individual: &Lineage) -> Result<Score> {
    Ok(Score::failed(individual.id as f64))
}

fn by_depth(individual: &Lineage) -> Result<Score> {
    Ok(Score::failed(individual.depth as f64))
}

fn collect_reports() -> (
    Arc<Mutex<Vec<RoundReport>>>,
    impl FnMut(&RoundReport) + Send + 'static,
) {
    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reports);
    (reports, move |report: &RoundReport| {
        sink.lock().unwrap().push(report.clone())
    })
}

#[test]
fn test_single_round_keeps_lowest_scores() {
    let (next_id, alive) = counters();
    let survivors = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&survivors);

    let engine = EngineBuilder::new()
        .with_options(options(4, 2, 1, 1, Direction::Minimize))
        .with_seed(Lineage::seed(&next_id, &alive))
        .with_evaluator(by_id)
        .with_stop_condition(move |ranked: &[RankedCandidate], _round: usize| {
            seen.lock().unwrap().extend_from_slice(ranked);
            false
        })
        .build()
        .unwrap();

    let winner = engine.run().unwrap();

    let survivors = survivors.lock().unwrap();
    assert_eq!(
        *survivors,
        vec![
            RankedCandidate::new(0, Score::failed(0.0)),
            RankedCandidate::new(1, Score::failed(1.0)),
        ]
    );
    assert_eq!(winner.score.value, 0.0);
    assert_eq!(winner.individual.id, 0);
    assert_eq!(winner.rounds, 1);
}

#[test]
fn test_elite_carries_into_slot_zero() {
    let (next_id, alive) = counters();
    let (reports, reporter) = collect_reports();

    // A single worker evaluates slots in order, so the first id evaluated
    // in a round is the one in slot 0. Each round also persists its best
    // once, through the same evaluator.
    let first_evaluated = Arc::new(Mutex::new(Vec::<(usize, usize)>::new()));
    let calls = Arc::new(AtomicUsize::new(0));
    let log = Arc::clone(&first_evaluated);
    let counter = Arc::clone(&calls);
    let population_size = 6;
    let calls_per_round = population_size + 1;
    let evaluator = move |individual: &Lineage| -> Result<Score> {
        let call = counter.fetch_add(1, Ordering::SeqCst);
        if call % calls_per_round == 0 {
            log.lock()
                .unwrap()
                .push((call / calls_per_round + 1, individual.id));
        }
        // Prefer the highest id so the elite changes every round.
        Ok(Score::failed(individual.id as f64))
    };

    let engine = EngineBuilder::new()
        .with_options(options(population_size, 2, 1, 4, Direction::Maximize))
        .with_seed(Lineage::seed(&next_id, &alive))
        .with_evaluator(evaluator)
        .with_stop_condition(NeverStopEarly)
        .with_reporter(reporter)
        .build()
        .unwrap();
    engine.run().unwrap();

    let reports = reports.lock().unwrap();
    let first_evaluated = first_evaluated.lock().unwrap();
    assert_eq!(reports.len(), 4);
    for report in reports.iter().take(3) {
        let (_, slot_zero) = first_evaluated[report.round];
        assert_eq!(report.round + 1, first_evaluated[report.round].0);
        assert_eq!(report.best_description, slot_zero.to_string());
    }
}

#[test]
fn test_stop_at_first_success_ends_early() {
    let (next_id, alive) = counters();
    let (reports, reporter) = collect_reports();
    let evaluator = |individual: &Lineage| -> Result<Score> {
        Ok(Score::new(individual.depth >= 3, individual.depth as f64))
    };

    let winner = EngineBuilder::new()
        .with_options(options(10, 3, 2, 50, Direction::Maximize))
        .with_seed(Lineage::seed(&next_id, &alive))
        .with_evaluator(evaluator)
        .with_stop_condition(StopAtFirstSuccess)
        .with_reporter(reporter)
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(winner.rounds, 3);
    assert!(winner.score.success);
    assert_eq!(winner.individual.depth, 3);
    assert_eq!(reports.lock().unwrap().len(), 3);
}

#[test]
fn test_never_stop_early_runs_full_budget() {
    let (next_id, alive) = counters();
    let (reports, reporter) = collect_reports();
    let evaluator = |_: &Lineage| -> Result<Score> { Ok(Score::succeeded(1.0)) };

    let winner = EngineBuilder::new()
        .with_options(options(8, 2, 2, 7, Direction::Minimize))
        .with_seed(Lineage::seed(&next_id, &alive))
        .with_evaluator(evaluator)
        .with_stop_condition(NeverStopEarly)
        .with_reporter(reporter)
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(winner.rounds, 7);
    let rounds: Vec<usize> = reports.lock().unwrap().iter().map(|r| r.round).collect();
    assert_eq!(rounds, (1..=7).collect::<Vec<_>>());
}

#[test]
fn test_only_the_winner_survives_the_run() {
    let (next_id, alive) = counters();
    let seeds = vec![
        Lineage::seed(&next_id, &alive),
        Lineage::seed(&next_id, &alive),
        Lineage::seed(&next_id, &alive),
    ];

    let winner = EngineBuilder::new()
        .with_options(options(40, 5, 4, 6, Direction::Minimize))
        .with_seeds(seeds)
        .with_evaluator(by_depth)
        .with_stop_condition(NeverStopEarly)
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(alive.load(Ordering::SeqCst), 1);
    drop(winner);
    assert_eq!(alive.load(Ordering::SeqCst), 0);
}

#[test]
fn test_survivors_outnumber_each_worker_slice() {
    let (next_id, alive) = counters();
    let survivors = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&survivors);

    // Six workers of one individual each, four survivors per round.
    let engine = EngineBuilder::new()
        .with_options(EngineOptions::new(
            6,
            4,
            1,
            6,
            2,
            Direction::Minimize,
            LogLevel::None,
        ))
        .with_seed(Lineage::seed(&next_id, &alive))
        .with_evaluator(by_id)
        .with_stop_condition(move |ranked: &[RankedCandidate], _round: usize| {
            seen.lock().unwrap().push(ranked.to_vec());
            false
        })
        .build()
        .unwrap();
    assert_eq!(engine.num_threads(), 6);

    let winner = engine.run().unwrap();

    let survivors = survivors.lock().unwrap();
    assert_eq!(survivors.len(), 2);
    let first: Vec<(usize, f64)> = survivors[0]
        .iter()
        .map(|c| (c.index, c.score.value))
        .collect();
    assert_eq!(first, vec![(0, 0.0), (1, 1.0), (2, 2.0), (3, 3.0)]);
    assert!(survivors.iter().all(|ranked| ranked.len() == 4));
    assert_eq!(winner.rounds, 2);
    assert_eq!(winner.individual.id, 0);
    drop(winner);
    assert_eq!(alive.load(Ordering::SeqCst), 0);
}

#[test]
fn test_round_statistics_merge_across_workers() {
    let (next_id, alive) = counters();
    let (reports, reporter) = collect_reports();

    EngineBuilder::new()
        .with_options(options(100, 10, 4, 1, Direction::Minimize))
        .with_seed(Lineage::seed(&next_id, &alive))
        .with_evaluator(by_id)
        .with_stop_condition(NeverStopEarly)
        .with_reporter(reporter)
        .build()
        .unwrap()
        .run()
        .unwrap();

    let reports = reports.lock().unwrap();
    let report = &reports[0];
    // ids 0..100
    assert!((report.mean - 49.5).abs() < 1e-9);
    assert!((report.sigma - ((100.0f64 * 100.0 - 1.0) / 12.0).sqrt()).abs() < 1e-9);
    assert_eq!(report.best, Score::failed(0.0));
    assert!(report.mean_change_percent.is_none());
}

#[test]
fn test_round_over_round_changes_are_reported() {
    let (next_id, alive) = counters();
    let (reports, reporter) = collect_reports();

    EngineBuilder::new()
        .with_options(options(10, 2, 2, 3, Direction::Maximize))
        .with_seed(Lineage::seed(&next_id, &alive))
        .with_evaluator(by_depth)
        .with_stop_condition(NeverStopEarly)
        .with_reporter(reporter)
        .build()
        .unwrap()
        .run()
        .unwrap();

    let reports = reports.lock().unwrap();
    assert!(reports[0].best_change_percent.is_none());
    // Best depth goes 1 -> 2 -> 3.
    assert_eq!(reports[1].best_change_percent, Some(100.0));
    assert_eq!(reports[2].best_change_percent, Some(50.0));
    assert!(reports[1].mean_change_percent.unwrap() > 0.0);
}

#[test]
fn test_evaluation_error_aborts_run() {
    let (next_id, alive) = counters();
    let evaluator = |individual: &Lineage| -> Result<Score> {
        if individual.id == 17 {
            return Err(GeneticError::Evaluation("fitness oracle unavailable".to_string()));
        }
        Ok(Score::failed(0.0))
    };

    let result = EngineBuilder::new()
        .with_options(options(32, 4, 4, 10, Direction::Minimize))
        .with_seed(Lineage::seed(&next_id, &alive))
        .with_evaluator(evaluator)
        .with_stop_condition(NeverStopEarly)
        .build()
        .unwrap()
        .run();

    match result {
        Err(GeneticError::Evaluation(msg)) => assert_eq!(msg, "fitness oracle unavailable"),
        other => panic!("Expected Evaluation error, got {:?}", other.map(|w| w.score)),
    }
    assert_eq!(alive.load(Ordering::SeqCst), 0);
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let (next_id, alive) = counters();

    let oversized = EngineBuilder::new()
        .with_options(options(4, 5, 1, 1, Direction::Minimize))
        .with_seed(Lineage::seed(&next_id, &alive))
        .with_evaluator(by_id)
        .with_stop_condition(NeverStopEarly)
        .build();
    assert!(matches!(oversized, Err(GeneticError::Configuration(_))));

    let no_seeds = EngineBuilder::<Lineage, _>::new()
        .with_options(options(4, 2, 1, 1, Direction::Minimize))
        .with_evaluator(by_id)
        .with_stop_condition(NeverStopEarly)
        .build();
    match no_seeds {
        Err(GeneticError::Configuration(msg)) => assert!(msg.contains("Seed list")),
        _ => panic!("Expected Configuration error"),
    }

    let no_stop = EngineBuilder::new()
        .with_options(options(4, 2, 1, 1, Direction::Minimize))
        .with_seed(Lineage::seed(&next_id, &alive))
        .with_evaluator(by_id)
        .build();
    assert!(matches!(no_stop, Err(GeneticError::Configuration(_))));
}

/// Records the destination of every persisted individual.
struct RecordingEvaluator {
    destinations: Arc<Mutex<Vec<String>>>,
}

impl Evaluator<Lineage> for RecordingEvaluator {
    fn evaluate(&self, individual: &Lineage) -> Result<Score> {
        by_depth(individual)
    }

    fn evaluate_to(&self, individual: &Lineage, destination: &str) -> Result<Score> {
        self.destinations
            .lock()
            .unwrap()
            .push(format!("{}:{}", destination, individual.depth));
        self.evaluate(individual)
    }
}

#[test]
fn test_best_is_persisted_each_round() {
    let (next_id, alive) = counters();
    let destinations = Arc::new(Mutex::new(Vec::new()));
    let evaluator = RecordingEvaluator {
        destinations: Arc::clone(&destinations),
    };

    EngineBuilder::new()
        .with_options(options(6, 2, 2, 3, Direction::Maximize))
        .with_seed(Lineage::seed(&next_id, &alive))
        .with_evaluator(evaluator)
        .with_stop_condition(NeverStopEarly)
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(
        *destinations.lock().unwrap(),
        vec!["1.log:1", "2.log:2", "3.log:3"]
    );
}

#[test]
fn test_verbose_tracing_reporter() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let (next_id, alive) = counters();
    let opts = EngineOptions::new(12, 3, 4, 3, 2, Direction::Minimize, LogLevel::Verbose);

    let engine = EngineBuilder::new()
        .with_options(opts)
        .with_seed(Lineage::seed(&next_id, &alive))
        .with_evaluator(by_depth)
        .with_stop_condition(NeverStopEarly)
        .build()
        .unwrap();
    assert_eq!(engine.num_threads(), 3);
    assert_eq!(engine.options().get_min_thread_workload_size(), 4);
    assert_eq!(engine.options().get_max_num_threads(), 3);
    assert_eq!(engine.options().get_num_cycles(), 2);

    let result = engine.run().unwrap();
    assert_eq!(result.score, Score::failed(1.0));
}
