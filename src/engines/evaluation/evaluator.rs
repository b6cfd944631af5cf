use super::fingerprint::{fingerprint, task_signature, FecConfig};
use super::fitness::{FitnessFunction, TrainAndValidate};
use crate::data::{Dataset, FunctionalCache};
use crate::error::Result;
use crate::instructions::Algorithm;
use crate::memory::MemoryLayout;
use crate::types::{Fitness, RandomSeedT};
use crate::utils::derive_seed;
use log::{debug, warn};
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_MAX_INSTRUCTIONS: usize = 100;

const FINGERPRINT_BRANCH: RandomSeedT = 1;
const EVALUATION_BRANCH: RandomSeedT = 2;

/// Scores candidates, consulting the functional cache before running the
/// full fitness function.
///
/// The cache is borrowed, not owned: whoever creates it decides its lifetime
/// and can share it between evaluators. Evaluators of different tasks sharing
/// one cache keep resetting it but never see each other's entries.
pub struct Evaluator<'c, const F: usize, E = TrainAndValidate> {
    cache: &'c FunctionalCache,
    scorer: E,
    layout: MemoryLayout,
    fec: FecConfig,
    max_instructions: usize,
    seed: RandomSeedT,
    full_evaluations: AtomicU64,
}

impl<'c, const F: usize, E: FitnessFunction<F>> Evaluator<'c, F, E> {
    pub fn new(cache: &'c FunctionalCache, scorer: E, layout: MemoryLayout, fec: FecConfig) -> Result<Self> {
        layout.validate()?;
        Ok(Self {
            cache,
            scorer,
            layout,
            fec,
            max_instructions: DEFAULT_MAX_INSTRUCTIONS,
            seed: 0,
            full_evaluations: AtomicU64::new(0),
        })
    }

    pub fn with_seed(mut self, seed: RandomSeedT) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_instructions(mut self, max_instructions: usize) -> Self {
        self.max_instructions = max_instructions;
        self
    }

    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    pub fn cache(&self) -> &FunctionalCache {
        self.cache
    }

    /// Number of times the fitness function actually ran.
    pub fn full_evaluations(&self) -> u64 {
        self.full_evaluations.load(Ordering::Relaxed)
    }

    pub fn evaluate(&self, algorithm: &Algorithm, dataset: &Dataset<F>) -> Result<Fitness> {
        algorithm.validate(&self.layout, F, self.max_instructions)?;
        let task = task_signature(dataset, &self.layout, &self.fec, self.seed)?;
        self.cache.bind_task(task);

        let fingerprint = fingerprint(
            algorithm,
            dataset,
            &self.layout,
            &self.fec,
            derive_seed(self.seed, FINGERPRINT_BRANCH),
        )?;
        self.cache.get_or_insert_with(task, fingerprint, || {
            self.full_evaluations.fetch_add(1, Ordering::Relaxed);
            let raw = self
                .scorer
                .fitness(algorithm, dataset, &self.layout, derive_seed(self.seed, EVALUATION_BRANCH))?;
            let fitness = Fitness::new(raw).map_err(|err| {
                warn!("Fitness function returned {} for {}, outside [0, 1]", raw, fingerprint);
                err
            })?;
            debug!("Evaluated {} -> {}", fingerprint, fitness);
            Ok(fitness)
        })
    }
}
