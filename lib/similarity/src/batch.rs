//! Batch orchestration
//!
//! A run validates K, checks that the batch is single-domain with unique ids,
//! encodes every record once, hands the encoded batch to the configured
//! strategy and assembles the results in input order. A run either succeeds
//! completely or returns an error with no partial output.

use crate::cluster::ClusterSample;
use crate::config::{EngineConfig, StrategyKind};
use crate::result::{assemble, RankedResult};
use crate::topk::ExactTopK;
use crate::RankingStrategy;
use ahash::AHashSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smartsimilar_core::{
    AttributeRecord, Domain, EncodedAttributes, Error, Result, SimilarCount, SimilarityModel,
};
use std::time::Instant;
use tracing::info;

/// A validated, encoded, read-only view of a batch
#[derive(Debug)]
pub struct EncodedBatch<'a> {
    model: SimilarityModel,
    records: &'a [AttributeRecord],
    encoded: Vec<EncodedAttributes>,
}

impl<'a> EncodedBatch<'a> {
    /// Encode a batch, failing on mixed domains, unknown codes or duplicate ids
    ///
    /// The domain of the first record is the domain of the batch.
    pub fn new(records: &'a [AttributeRecord]) -> Result<Self> {
        let domain = records.first().map(|r| r.domain()).unwrap_or(Domain::Sunglasses);
        let mut seen = AHashSet::with_capacity(records.len());
        let mut encoded = Vec::with_capacity(records.len());

        for record in records {
            if record.domain() != domain {
                return Err(Error::DomainMismatch {
                    expected: domain,
                    actual: record.domain(),
                });
            }
            if !seen.insert(record.id) {
                return Err(Error::DuplicateRecordId(record.id));
            }
            encoded.push(record.attributes.encode()?);
        }

        Ok(Self {
            model: SimilarityModel::new(domain),
            records,
            encoded,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn domain(&self) -> Domain {
        self.model.domain()
    }

    pub fn model(&self) -> &SimilarityModel {
        &self.model
    }

    pub fn id(&self, index: usize) -> u64 {
        self.records[index].id
    }

    pub fn brand(&self, index: usize) -> &str {
        &self.records[index].brand
    }

    pub fn encoded(&self, index: usize) -> &EncodedAttributes {
        &self.encoded[index]
    }

    pub fn encoded_all(&self) -> &[EncodedAttributes] {
        &self.encoded
    }
}

/// Runs one batch through the configured ranking strategy
#[derive(Debug, Clone, Default)]
pub struct SimilarityEngine {
    config: EngineConfig,
}

impl SimilarityEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rank a batch using the configured seed, or an OS-seeded generator
    pub fn run(&self, records: &[AttributeRecord], k: i64) -> Result<Vec<RankedResult>> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.run_with_rng(records, k, &mut rng)
    }

    /// Rank a batch drawing randomness from `rng`
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        records: &[AttributeRecord],
        k: i64,
        rng: &mut R,
    ) -> Result<Vec<RankedResult>> {
        let k = SimilarCount::new(k)?;
        let batch = EncodedBatch::new(records)?;
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let ranked = match self.config.strategy {
            StrategyKind::Exact => {
                let strategy = ExactTopK::new(self.config.chunk_size, self.config.scan_order);
                self.rank_with(&strategy, &batch, k, rng)
            }
            StrategyKind::Clustered => {
                let strategy = ClusterSample::new(self.config.packing_factor, self.config.max_iterations);
                self.rank_with(&strategy, &batch, k, rng)
            }
        };

        info!(
            "Ranked {} {} records (k={}) with {} strategy in {:?}",
            batch.len(),
            batch.domain(),
            k,
            self.config.strategy,
            start.elapsed()
        );

        Ok(assemble(&batch, ranked))
    }

    fn rank_with<S: RankingStrategy, R: Rng + ?Sized>(
        &self,
        strategy: &S,
        batch: &EncodedBatch<'_>,
        k: SimilarCount,
        rng: &mut R,
    ) -> Vec<Vec<usize>> {
        tracing::debug!("Running {} strategy", strategy.name());
        strategy.rank(batch, k, rng)
    }
}
