//! # SmartSimilar Similarity
//!
//! Batch ranking engine producing "you may also like" lists for a catalog.
//!
//! ## Strategies
//!
//! - **Exact** ([`ExactTopK`]): scores every pair of records and fills K slots
//!   with a greedy first-lower-slot-wins rule. Deterministic for a given scan
//!   order, parallel over records in fixed-size chunks.
//! - **Clustered** ([`ClusterSample`]): one-hot encodes the attributes, groups
//!   records with k-means and samples each record's similar set from its own
//!   cluster.
//!
//! Both route candidates through the same [`BrandPolicy`], which only lets
//! same-brand products in when other brands run out.
//!
//! ## Example
//!
//! ```rust
//! use smartsimilar_core::{AttributeRecord, Attributes};
//! use smartsimilar_similarity::{EngineConfig, SimilarityEngine};
//!
//! let attrs = Attributes::Sunglasses { sex: 1200, material: 414, shape: 1229, color: 1250 };
//! let records = vec![
//!     AttributeRecord::new(1, "Aviator", "Ray-Ban", attrs),
//!     AttributeRecord::new(2, "Aviator II", "Ray-Ban", attrs),
//!     AttributeRecord::new(3, "Pilot", "Polaroid", attrs),
//! ];
//!
//! let engine = SimilarityEngine::new(EngineConfig::default());
//! let results = engine.run(&records, 1).unwrap();
//! assert_eq!(results[0].similar_ids(), &[3]);
//! ```
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Records   │────>│   Encoded   │────>│  Strategy   │
//! │ (raw codes) │     │    Batch    │     │ (exact/knn) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │   Ranked    │<────│    Brand    │
//!                     │   Results   │     │   Policy    │
//!                     └─────────────┘     └─────────────┘
//! ```

pub mod batch;
pub mod brand;
pub mod cluster;
pub mod config;
pub mod result;
pub mod topk;

pub use batch::{EncodedBatch, SimilarityEngine};
pub use brand::{Admission, BrandPolicy, InOrder};
pub use cluster::{cluster_count, ClusterSample, KMeans, DEFAULT_MAX_ITERATIONS, DEFAULT_PACKING_FACTOR};
pub use config::{EngineConfig, ScanOrder, StrategyKind};
pub use result::{assemble, RankedResult};
pub use topk::{ExactTopK, GreedySlots, DEFAULT_CHUNK_SIZE};

use rand::Rng;
use smartsimilar_core::SimilarCount;

/// A way of choosing each record's similar candidates within a batch
pub trait RankingStrategy {
    fn name(&self) -> &'static str;

    /// Candidate indices per record, in batch order, self excluded
    fn rank<R: Rng + ?Sized>(&self, batch: &EncodedBatch<'_>, k: SimilarCount, rng: &mut R) -> Vec<Vec<usize>>;
}
