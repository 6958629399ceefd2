//! # SmartSimilar Core
//!
//! Core library for the SmartSimilar recommendation engine.
//!
//! This crate holds the static product domains and the scoring model:
//!
//! - [`Domain`] - Product family (sunglasses or medical frames) with its
//!   vocabularies, affinity matrices and weights
//! - [`AttributeRecord`] - A catalog product with domain-tagged [`Attributes`]
//! - [`SimilarityModel`] - Weighted affinity score between two records
//! - [`SimilarCount`] - Validated number of similar products per record
//!
//! ## Example
//!
//! ```rust
//! use smartsimilar_core::{AttributeRecord, Attributes, Domain, SimilarityModel};
//!
//! let a = AttributeRecord::new(1, "Aviator", "Ray-Ban",
//!     Attributes::Sunglasses { sex: 1200, material: 414, shape: 1229, color: 1250 });
//! let b = AttributeRecord::new(2, "Round", "Polaroid",
//!     Attributes::Sunglasses { sex: 1200, material: 414, shape: 1233, color: 1250 });
//!
//! let model = SimilarityModel::new(Domain::Sunglasses);
//! let score = model.score(&a, &b).unwrap();
//! assert!(score < model.max_score());
//! ```

pub mod count;
pub mod domain;
pub mod error;
pub mod model;
pub mod record;

pub use count::{SimilarCount, MAX_SIMILAR_COUNT, MIN_SIMILAR_COUNT};
pub use domain::{AffinityMatrix, Dimension, DimensionModel, Domain, MAX_DIMENSIONS};
pub use error::{Error, Result};
pub use model::{score, ScoreBreakdown, SimilarityModel};
pub use record::{AttributeRecord, Attributes, EncodedAttributes};
