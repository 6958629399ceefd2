//! # SmartSimilar
//!
//! Batch "you may also like" recommendations for an eyewear catalog.
//!
//! Each product is described by categorical attributes (sex, material, shape,
//! color and, for medical frames, rim type) and a brand. For every product the
//! engine picks up to K (1..=8) other products, scored by weighted attribute
//! affinity and preferring other brands over the product's own.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! smartsimilar export.tsv --similar-count 5 --format sql > similar.sql
//! smartsimilar export.tsv --strategy clustered --seed 42 --format json
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use smartsimilar::prelude::*;
//!
//! let attrs = Attributes::Sunglasses { sex: 1200, material: 414, shape: 1229, color: 1250 };
//! let records = vec![
//!     AttributeRecord::new(1, "Aviator", "Ray-Ban", attrs),
//!     AttributeRecord::new(2, "Pilot", "Polaroid", attrs),
//! ];
//!
//! let engine = SimilarityEngine::new(EngineConfig::default());
//! let results = engine.run(&records, 5).unwrap();
//! assert_eq!(results[0].similar_ids(), &[2]);
//! ```
//!
//! ## Crate Structure
//!
//! - `smartsimilar-core` - Domains, attribute codec and scoring model
//! - `smartsimilar-similarity` - Ranking strategies, brand policy, batch engine
//! - `smartsimilar-catalog` - Catalog export parsing and SQL output

// Re-export core types
pub use smartsimilar_core::{
    score, AttributeRecord, Attributes, Dimension, Domain, Error, Result, ScoreBreakdown,
    SimilarCount, SimilarityModel, MAX_SIMILAR_COUNT,
};

// Re-export engine
pub use smartsimilar_similarity::{
    ClusterSample, EngineConfig, ExactTopK, RankedResult, RankingStrategy, ScanOrder,
    SimilarityEngine, StrategyKind,
};

// Re-export catalog glue
pub use smartsimilar_catalog::{parse_catalog, read_catalog, render_sql, Catalog, CatalogError, SqlTarget};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AttributeRecord, Attributes, Domain, EngineConfig, Error, RankedResult, Result,
        ScanOrder, SimilarityEngine, SimilarityModel, StrategyKind,
    };
}
