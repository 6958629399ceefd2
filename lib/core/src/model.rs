//! Weighted affinity scoring
//!
//! The score between two records is the sum over the domain's dimensions of
//! `affinity[a][b] * weight`. Scores are integers, symmetric, and a record
//! scored against itself reaches [`Domain::max_score`].

use crate::domain::{Dimension, Domain};
use crate::error::{Error, Result};
use crate::record::{AttributeRecord, EncodedAttributes};
use serde::Serialize;

/// Scores records of a single domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityModel {
    domain: Domain,
}

impl SimilarityModel {
    pub fn new(domain: Domain) -> Self {
        Self { domain }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn max_score(&self) -> u32 {
        self.domain.max_score()
    }

    /// Score two raw records
    ///
    /// Fails with [`Error::DomainMismatch`] if either record is outside the
    /// model's domain, and with [`Error::UnknownAttributeCode`] if a code is
    /// missing from the vocabulary.
    pub fn score(&self, a: &AttributeRecord, b: &AttributeRecord) -> Result<u32> {
        let (a, b) = self.encode_pair(a, b)?;
        Ok(self.score_encoded(&a, &b))
    }

    /// Score two already encoded records of this model's domain
    #[inline]
    pub fn score_encoded(&self, a: &EncodedAttributes, b: &EncodedAttributes) -> u32 {
        debug_assert_eq!(a.domain(), self.domain);
        debug_assert_eq!(b.domain(), self.domain);

        self.domain
            .dimensions()
            .iter()
            .zip(a.indices().iter().zip(b.indices()))
            .map(|(model, (&x, &y))| model.weighted(x as usize, y as usize))
            .sum()
    }

    /// Per-dimension breakdown of a score
    pub fn explain(&self, a: &AttributeRecord, b: &AttributeRecord) -> Result<ScoreBreakdown> {
        let (a, b) = self.encode_pair(a, b)?;
        let contributions: Vec<(Dimension, u32)> = self
            .domain
            .dimensions()
            .iter()
            .zip(a.indices().iter().zip(b.indices()))
            .map(|(model, (&x, &y))| (model.dimension, model.weighted(x as usize, y as usize)))
            .collect();
        let total = contributions.iter().map(|(_, c)| c).sum();

        Ok(ScoreBreakdown { total, contributions })
    }

    fn encode_pair(
        &self,
        a: &AttributeRecord,
        b: &AttributeRecord,
    ) -> Result<(EncodedAttributes, EncodedAttributes)> {
        for record in [a, b] {
            if record.domain() != self.domain {
                return Err(Error::DomainMismatch {
                    expected: self.domain,
                    actual: record.domain(),
                });
            }
        }
        Ok((a.attributes.encode()?, b.attributes.encode()?))
    }
}

/// Score two records of `domain`
pub fn score(domain: Domain, a: &AttributeRecord, b: &AttributeRecord) -> Result<u32> {
    SimilarityModel::new(domain).score(a, b)
}

/// Weighted contribution of each dimension to a score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub total: u32,
    pub contributions: Vec<(Dimension, u32)>,
}
