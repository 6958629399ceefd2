use crate::domain::{Dimension, Domain};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid similar count: {0} (expected 1..={max})", max = crate::MAX_SIMILAR_COUNT)]
    InvalidSimilarCount(i64),

    #[error("Unknown {dimension} code {code} for {domain} domain")]
    UnknownAttributeCode {
        domain: Domain,
        dimension: Dimension,
        code: u32,
    },

    #[error("Domain mismatch: expected {expected}, got {actual}")]
    DomainMismatch { expected: Domain, actual: Domain },

    #[error("Duplicate record id in batch: {0}")]
    DuplicateRecordId(u64),
}
