use crate::error::{Error, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// Lower bound of the requested similar count
pub const MIN_SIMILAR_COUNT: usize = 1;

/// Upper bound of the requested similar count (storefront display slots)
pub const MAX_SIMILAR_COUNT: usize = 8;

/// Number of similar products requested per record, validated to `1..=8`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimilarCount(usize);

impl SimilarCount {
    pub fn new(k: i64) -> Result<Self> {
        if k < MIN_SIMILAR_COUNT as i64 || k > MAX_SIMILAR_COUNT as i64 {
            return Err(Error::InvalidSimilarCount(k));
        }
        Ok(Self(k as usize))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Effective result size for a batch: `min(k, batch_size - 1)`
    pub fn capped(self, batch_size: usize) -> usize {
        self.0.min(batch_size.saturating_sub(1))
    }
}

impl TryFrom<i64> for SimilarCount {
    type Error = Error;

    fn try_from(k: i64) -> Result<Self> {
        Self::new(k)
    }
}

impl fmt::Display for SimilarCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for SimilarCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0 as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert_eq!(SimilarCount::new(1).unwrap().get(), 1);
        assert_eq!(SimilarCount::new(8).unwrap().get(), 8);
        assert_eq!(SimilarCount::new(0), Err(Error::InvalidSimilarCount(0)));
        assert_eq!(SimilarCount::new(9), Err(Error::InvalidSimilarCount(9)));
        assert_eq!(SimilarCount::new(-3), Err(Error::InvalidSimilarCount(-3)));
    }

    #[test]
    fn test_capped() {
        let k = SimilarCount::new(5).unwrap();
        assert_eq!(k.capped(100), 5);
        assert_eq!(k.capped(3), 2);
        assert_eq!(k.capped(1), 0);
        assert_eq!(k.capped(0), 0);
    }

    #[test]
    fn test_try_from() {
        let k: SimilarCount = 4i64.try_into().unwrap();
        assert_eq!(k.to_string(), "4");
    }
}
