use amlz::config::ConfigManager;
use amlz::instructions::Op;
use amlz::utils::derive_seed;
use amlz::{Evaluator, FunctionalCache, RandomAlgorithmGenerator, TrainAndValidate};
use anyhow::Context;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

const FEATURE_SIZE: usize = 4;
const DEFAULT_POPULATION: u64 = 1000;
const GENERATION_BRANCH: u64 = 3;

/// `amlz [config.toml] [population]`
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let manager = ConfigManager::new();
    if let Some(path) = args.next() {
        manager
            .load_from_file(&path)
            .with_context(|| format!("loading {}", path))?;
    }
    let population: u64 = match args.next() {
        Some(raw) => raw.parse().with_context(|| format!("invalid population {:?}", raw))?,
        None => DEFAULT_POPULATION,
    };
    let config = manager.get();

    let layout = config.vm.layout()?;
    let dataset = config.task.dataset::<FEATURE_SIZE>()?;
    let cache = FunctionalCache::new(config.cache.policy());
    let evaluator = Evaluator::<FEATURE_SIZE>::new(
        &cache,
        TrainAndValidate::new(config.evaluation.max_abs_error),
        layout,
        config.evaluation.fec(),
    )?
    .with_seed(config.evaluation.seed)
    .with_max_instructions(config.vm.max_instructions);

    // Components must stay strictly below the configured limit.
    let component_size = config.vm.max_instructions.saturating_sub(1).min(6);
    let generator = RandomAlgorithmGenerator::new(layout, Op::ALL.to_vec(), FEATURE_SIZE)?.with_sizes(
        component_size.min(4),
        component_size,
        component_size,
    );
    let root = derive_seed(config.evaluation.seed, GENERATION_BRANCH);

    info!(
        "Evaluating {} random candidates on a {:?} task ({} train / {} valid)",
        population,
        dataset.eval_type,
        dataset.train.len(),
        dataset.valid.len()
    );

    let scored = (0..population)
        .into_par_iter()
        .map(|index| -> amlz::Result<Option<(u64, amlz::Fitness)>> {
            let mut rng = StdRng::seed_from_u64(derive_seed(root, index));
            let algorithm = generator.generate(&mut rng)?;
            match evaluator.evaluate(&algorithm, &dataset) {
                Ok(fitness) => Ok(Some((index, fitness))),
                Err(err) if err.discards_candidate() => {
                    warn!("Discarding candidate {}: {}", index, err);
                    Ok(None)
                }
                Err(err) => Err(err),
            }
        })
        .collect::<amlz::Result<Vec<_>>>()?;

    let best = scored
        .iter()
        .flatten()
        .max_by(|a, b| a.1.value().total_cmp(&b.1.value()));
    match best {
        Some((index, fitness)) => info!("Best candidate {} with fitness {}", index, fitness),
        None => warn!("No candidate survived evaluation"),
    }

    let stats = cache.stats();
    info!(
        "Cache: {} entries, {} hits, {} misses ({:.1}% hit rate), {} full evaluations",
        stats.size,
        stats.hits,
        stats.misses,
        100.0 * stats.hit_rate(),
        evaluator.full_evaluations()
    );
    Ok(())
}
