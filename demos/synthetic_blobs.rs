use rand::prelude::*;
use rand_distr::Normal;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use vartree::{Embedding, EmbeddingSet, HealthCheck, ReductionConfig, ReductionTree};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Stand-in for a trained network's middle layer: three labeled Gaussian
    // blobs in 4 dimensions, each offset along a different column.
    //
    // Pass `-v` to see the per-split debug events.
    let verbose = std::env::args().any(|a| a == "-v");
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut rng = StdRng::seed_from_u64(1);
    let noise = Normal::new(0.0, 0.15)?;
    let classes = [("setosa", 0usize), ("versicolor", 1), ("virginica", 2)];

    let mut records = Vec::new();
    for (label, axis) in classes {
        for _ in 0..50 {
            let features = (0..4)
                .map(|k| {
                    let center = if k == axis { 1.0 } else { 0.2 };
                    center + noise.sample(&mut rng)
                })
                .collect();
            records.push(Embedding::new(label, records.len(), features));
        }
    }

    let set = EmbeddingSet::from_records(records)?;
    let tree = ReductionTree::build(set, ReductionConfig::new().with_max_depth(2))?;

    let health = tree.health_check();
    if !health.is_healthy() {
        eprintln!("{health}");
    }

    println!("{}", tree.report().markdown());
    Ok(())
}
