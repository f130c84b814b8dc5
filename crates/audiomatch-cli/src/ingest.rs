//! Fingerprinting of the sources taking part in a run

use crate::operands::Source;
use anyhow::{Context, Result};
use audiomatch_core::{fingerprint_file, FingerprintStore, MatchConfig};
use rayon::prelude::*;

/// Decode and fingerprint every source in parallel. Any ingestion failure
/// aborts the run.
pub fn build_store(sources: &[Source], config: &MatchConfig) -> Result<FingerprintStore> {
    let start = std::time::Instant::now();

    let fingerprinted: Vec<_> = sources
        .par_iter()
        .map(|source| {
            log::debug!("Fingerprinting: {}", source.path.display());
            let (fingerprint, duration) = fingerprint_file(&source.path, config).with_context(|| {
                format!("{} does not exist or is not supported", source.path.display())
            })?;
            Ok((source.key.clone(), fingerprint, duration))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut store = FingerprintStore::new();
    for (key, fingerprint, duration) in fingerprinted {
        store.insert(key, fingerprint, duration);
    }

    log::info!(
        "Fingerprinted {} sources in {:.2}s",
        store.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(store)
}
