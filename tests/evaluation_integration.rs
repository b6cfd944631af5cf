use amlz::engines::evaluation::FecConfig;
use amlz::instructions::{Algorithm, Instruction, Op};
use amlz::memory::{MemoryLayout, Vector, FEATURES_VECTOR_ADDRESS, PREDICTIONS_SCALAR_ADDRESS};
use amlz::types::RandomSeedT;
use amlz::{
    AmlzError, Dataset, EvalType, Evaluator, Example, FitnessFunction, FunctionalCache, RandomAlgorithmGenerator,
    TrainAndValidate,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;

const F: usize = 4;

/// Delegates to the standard scorer and counts calls.
#[derive(Default)]
struct CountingScorer {
    calls: AtomicUsize,
    inner: TrainAndValidate,
}

impl FitnessFunction<F> for CountingScorer {
    fn fitness(
        &self,
        algorithm: &Algorithm,
        dataset: &Dataset<F>,
        layout: &MemoryLayout,
        seed: RandomSeedT,
    ) -> amlz::Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fitness(algorithm, dataset, layout, seed)
    }
}

impl FitnessFunction<F> for &CountingScorer {
    fn fitness(
        &self,
        algorithm: &Algorithm,
        dataset: &Dataset<F>,
        layout: &MemoryLayout,
        seed: RandomSeedT,
    ) -> amlz::Result<f64> {
        (**self).fitness(algorithm, dataset, layout, seed)
    }
}

struct OutOfRangeScorer;

impl FitnessFunction<F> for OutOfRangeScorer {
    fn fitness(&self, _: &Algorithm, _: &Dataset<F>, _: &MemoryLayout, _: RandomSeedT) -> amlz::Result<f64> {
        Ok(1.5)
    }
}

fn dataset(seed: RandomSeedT) -> Dataset<F> {
    Dataset::scalar_linear_regression(seed, 50, 50).unwrap()
}

fn scratch_constant() -> Algorithm {
    Algorithm::new(vec![], vec![Instruction::scalar_const(5, 0.5)], vec![])
}

#[test]
fn test_second_evaluation_hits_cache() {
    let cache = FunctionalCache::unbounded();
    let scorer = CountingScorer::default();
    let layout = MemoryLayout::default();
    assert_eq!(layout.scalar_addresses, 20);
    let evaluator = Evaluator::<F, &CountingScorer>::new(&cache, &scorer, layout, FecConfig::default()).unwrap();
    let data = dataset(1);

    let first = evaluator.evaluate(&scratch_constant(), &data).unwrap();
    let second = evaluator.evaluate(&scratch_constant(), &data).unwrap();

    assert_eq!(first, second);
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(evaluator.full_evaluations(), 1);
    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.size, 1);
}

#[test]
fn test_equivalent_program_reuses_cached_fitness() {
    let cache = FunctionalCache::unbounded();
    let scorer = CountingScorer::default();
    let evaluator =
        Evaluator::<F, &CountingScorer>::new(&cache, &scorer, MemoryLayout::default(), FecConfig::default()).unwrap();
    let data = dataset(1);

    // Writes scratch registers only, so it predicts 0 like the constant program.
    let other = Algorithm::new(
        vec![Instruction::scalar_const(9, 3.0)],
        vec![Instruction::new(Op::ScalarSum, 9, 9, 10)],
        vec![Instruction::no_op()],
    );
    let a = evaluator.evaluate(&scratch_constant(), &data).unwrap();
    let b = evaluator.evaluate(&other, &data).unwrap();
    assert_eq!(a, b);
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_out_of_range_fitness_is_rejected_and_not_cached() {
    let cache = FunctionalCache::unbounded();
    let evaluator =
        Evaluator::<F, OutOfRangeScorer>::new(&cache, OutOfRangeScorer, MemoryLayout::default(), FecConfig::default())
            .unwrap();

    let err = evaluator.evaluate(&scratch_constant(), &dataset(1)).unwrap_err();
    assert!(matches!(err, AmlzError::FitnessOutOfRange(v) if v == 1.5));
    assert!(!err.discards_candidate());
    assert!(cache.is_empty());
}

#[test]
fn test_task_change_resets_cache() {
    let cache = FunctionalCache::unbounded();
    let scorer = CountingScorer::default();
    let evaluator =
        Evaluator::<F, &CountingScorer>::new(&cache, &scorer, MemoryLayout::default(), FecConfig::default()).unwrap();

    evaluator.evaluate(&scratch_constant(), &dataset(1)).unwrap();
    evaluator.evaluate(&scratch_constant(), &dataset(2)).unwrap();
    evaluator.evaluate(&scratch_constant(), &dataset(2)).unwrap();

    assert_eq!(scorer.calls.load(Ordering::SeqCst), 2);
    let stats = cache.stats();
    assert_eq!(stats.resets, 1);
    assert_eq!(stats.size, 1);
    assert_eq!(stats.hits, 1);
}

#[test]
fn test_parallel_evaluation_matches_sequential() {
    let data = dataset(3);
    let candidates: Vec<Algorithm> = (0..40)
        .map(|k| {
            Algorithm::new(
                vec![],
                vec![Instruction::scalar_const(PREDICTIONS_SCALAR_ADDRESS, f64::from(k) / 10.0)],
                vec![],
            )
        })
        .collect();

    let sequential_cache = FunctionalCache::unbounded();
    let sequential = Evaluator::<F>::new(
        &sequential_cache,
        TrainAndValidate::default(),
        MemoryLayout::default(),
        FecConfig::default(),
    )
    .unwrap();
    let expected: Vec<_> = candidates
        .iter()
        .map(|candidate| sequential.evaluate(candidate, &data).unwrap())
        .collect();

    let shared_cache = FunctionalCache::unbounded();
    let parallel = Evaluator::<F>::new(
        &shared_cache,
        TrainAndValidate::default(),
        MemoryLayout::default(),
        FecConfig::default(),
    )
    .unwrap();
    // Every candidate is submitted four times so threads race on the same fingerprints.
    let results: Vec<_> = (0..candidates.len() * 4)
        .into_par_iter()
        .map(|i| (i % candidates.len(), parallel.evaluate(&candidates[i % candidates.len()], &data).unwrap()))
        .collect();

    for (index, fitness) in results {
        assert_eq!(fitness, expected[index]);
    }
    assert_eq!(shared_cache.len(), candidates.len());
    assert_eq!(parallel.full_evaluations(), candidates.len() as u64);
}

/// Ten validation examples with `x0 = 0` followed by two with `x0 = 1`, all
/// labelled 1. The default fingerprint only looks at the first ten.
fn threshold_dataset() -> Dataset<F> {
    let example = |x0: f64| Example {
        features: Vector([x0, 0.0, 0.0, 0.0]),
        label: 1.0,
    };
    let mut valid = vec![example(0.0); 10];
    valid.extend([example(1.0), example(1.0)]);
    Dataset::new(vec![example(0.0); 10], valid, EvalType::RmsError).unwrap()
}

/// Predicts `heaviside(x0 - 0.5)`: zero on the fingerprinted examples, one
/// on the trailing two.
fn threshold_on_first_feature() -> Algorithm {
    Algorithm::new(
        vec![Instruction::new(Op::VectorConstSet, 0, 0, 3)
            .with_indices(0, 0)
            .with_activation(1.0)],
        vec![
            Instruction::new(Op::VectorInnerProduct, FEATURES_VECTOR_ADDRESS, 3, 2),
            Instruction::scalar_const(4, 0.5),
            Instruction::new(Op::ScalarDiff, 2, 4, 5),
            Instruction::new(Op::ScalarHeaviside, 5, 0, PREDICTIONS_SCALAR_ADDRESS),
        ],
        vec![],
    )
}

#[test]
fn test_fingerprint_twins_with_different_fitness() {
    let data = threshold_dataset();
    let silent = Algorithm::default();
    let threshold = threshold_on_first_feature();
    let score_alone = |algorithm: &Algorithm| {
        let cache = FunctionalCache::unbounded();
        Evaluator::<F>::new(&cache, TrainAndValidate::default(), MemoryLayout::default(), FecConfig::default())
            .unwrap()
            .evaluate(algorithm, &data)
            .unwrap()
    };
    assert_ne!(score_alone(&silent), score_alone(&threshold));

    // Sharing a cache, whichever is scored first decides both.
    let cache = FunctionalCache::unbounded();
    let evaluator =
        Evaluator::<F>::new(&cache, TrainAndValidate::default(), MemoryLayout::default(), FecConfig::default())
            .unwrap();
    let first = evaluator.evaluate(&silent, &data).unwrap();
    assert_eq!(evaluator.evaluate(&threshold, &data).unwrap(), first);
    assert_eq!(first, score_alone(&silent));
}

#[test]
fn test_racing_fingerprint_twins_share_one_evaluation() {
    let data = threshold_dataset();
    let silent = Algorithm::default();
    let threshold = threshold_on_first_feature();

    for _ in 0..100 {
        let cache = FunctionalCache::unbounded();
        let scorer = CountingScorer::default();
        let evaluator =
            Evaluator::<F, &CountingScorer>::new(&cache, &scorer, MemoryLayout::default(), FecConfig::default())
                .unwrap();
        let barrier = Barrier::new(2);

        let [a, b] = std::thread::scope(|scope| {
            [&silent, &threshold]
                .map(|candidate| {
                    let (evaluator, barrier, data) = (&evaluator, &barrier, &data);
                    scope.spawn(move || {
                        barrier.wait();
                        evaluator.evaluate(candidate, data)
                    })
                })
                .map(|handle| handle.join().unwrap())
        });

        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a, b);
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }
}

#[test]
fn test_random_candidates_are_scored_reproducibly() {
    let layout = MemoryLayout::default();
    let generator = RandomAlgorithmGenerator::new(layout, Op::ALL.to_vec(), F).unwrap();
    let data = dataset(4);
    let mut rng = StdRng::seed_from_u64(99);
    let candidates: Vec<Algorithm> = (0..25).map(|_| generator.generate(&mut rng).unwrap()).collect();

    let score_all = || {
        let cache = FunctionalCache::unbounded();
        let evaluator =
            Evaluator::<F>::new(&cache, TrainAndValidate::default(), layout, FecConfig::default())
                .unwrap()
                .with_seed(5);
        candidates
            .iter()
            .map(|candidate| evaluator.evaluate(candidate, &data).unwrap())
            .collect::<Vec<_>>()
    };
    let first = score_all();
    assert_eq!(first, score_all());
    assert!(first.iter().all(|f| (0.0..=1.0).contains(&f.value())));
}
