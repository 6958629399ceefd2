//! Product domains and their attribute tables
//!
//! A domain fixes which attribute dimensions exist, the vocabulary of raw
//! catalog codes for each dimension, the affinity matrix between vocabulary
//! entries and the weight of the dimension in the overall score.
//!
//! All tables are static data. Both domains share the same affinity matrices
//! and differ in their vocabularies and weights.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of dimensions any domain defines
pub const MAX_DIMENSIONS: usize = 5;

/// Product family of a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Sunglasses: sex, material, shape, color
    Sunglasses,
    /// Medical frames: sex, material, shape, color, rim type
    Medical,
}

impl Domain {
    /// Dimension models in record tuple order
    pub fn dimensions(self) -> &'static [DimensionModel] {
        match self {
            Domain::Sunglasses => &SUNGLASSES,
            Domain::Medical => &MEDICAL,
        }
    }

    /// Number of attribute dimensions
    pub fn dimension_count(self) -> usize {
        self.dimensions().len()
    }

    /// Get the model of a single dimension
    pub fn dimension(self, dimension: Dimension) -> Option<&'static DimensionModel> {
        self.dimensions().iter().find(|d| d.dimension == dimension)
    }

    /// Map a raw catalog code to its dense index within the dimension's vocabulary
    pub fn encode(self, dimension: Dimension, code: u32) -> Result<usize> {
        self.dimension(dimension)
            .and_then(|model| model.index_of(code))
            .ok_or(Error::UnknownAttributeCode {
                domain: self,
                dimension,
                code,
            })
    }

    /// Highest score two records of this domain can reach
    pub fn max_score(self) -> u32 {
        self.dimensions()
            .iter()
            .map(|d| d.affinity.max() * d.weight)
            .sum()
    }

    /// Length of the one-hot feature vector for this domain
    pub fn feature_len(self) -> usize {
        self.dimensions().iter().map(|d| d.vocabulary.len()).sum()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Sunglasses => write!(f, "sunglasses"),
            Domain::Medical => write!(f, "medical"),
        }
    }
}

/// Categorical attribute dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Sex,
    Material,
    Shape,
    Color,
    Rim,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Sex => "sex",
            Dimension::Material => "material",
            Dimension::Shape => "shape",
            Dimension::Color => "color",
            Dimension::Rim => "rim",
        };
        f.write_str(name)
    }
}

/// Square symmetric affinity table stored row-major
#[derive(Debug)]
pub struct AffinityMatrix {
    size: usize,
    values: &'static [u32],
}

impl AffinityMatrix {
    const fn new(size: usize, values: &'static [u32]) -> Self {
        Self { size, values }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Affinity between two dense indices
    #[inline]
    pub fn get(&self, a: usize, b: usize) -> u32 {
        self.values[a * self.size + b]
    }

    /// Largest entry of the table (the diagonal value)
    pub fn max(&self) -> u32 {
        self.values.iter().copied().max().unwrap_or(0)
    }
}

/// Vocabulary, affinity table and weight of one dimension
#[derive(Debug)]
pub struct DimensionModel {
    pub dimension: Dimension,
    /// Raw catalog codes in matrix row order
    pub vocabulary: &'static [u32],
    pub affinity: &'static AffinityMatrix,
    pub weight: u32,
}

impl DimensionModel {
    pub fn index_of(&self, code: u32) -> Option<usize> {
        self.vocabulary.iter().position(|&c| c == code)
    }

    /// Weighted affinity between two dense indices
    #[inline]
    pub fn weighted(&self, a: usize, b: usize) -> u32 {
        self.affinity.get(a, b) * self.weight
    }
}

// Sunglasses vocabularies
const SUN_SEX: [u32; 4] = [1200, 1201, 1202, 1219];
const SUN_MATERIAL: [u32; 3] = [414, 415, 1124];
const SUN_SHAPE: [u32; 6] = [1229, 1233, 1231, 1230, 1232, 1234];
const SUN_COLOR: [u32; 16] = [
    1250, 1248, 1249, 1237, 1242, 1236, 1241, 1240, 1247, 1246, 1239, 1244, 1243, 1245, 1253, 1254,
];

// Medical vocabularies
const MED_SEX: [u32; 4] = [1208, 1209, 1210, 1220];
const MED_MATERIAL: [u32; 3] = [1203, 1204, 1212];
const MED_SHAPE: [u32; 6] = [1261, 1265, 1263, 1262, 1264, 1266];
const MED_COLOR: [u32; 16] = [
    1267, 1268, 1269, 1270, 1271, 1272, 1273, 1274, 1275, 1276, 1277, 1278, 1279, 1280, 1281, 1282,
];
const MED_RIM: [u32; 3] = [1258, 1259, 1260];

#[rustfmt::skip]
static SEX_AFFINITY: AffinityMatrix = AffinityMatrix::new(4, &[
    10,  0,  9,  0,
     0, 10,  9,  0,
     9,  9, 10,  0,
     0,  0,  0, 10,
]);

#[rustfmt::skip]
static MATERIAL_AFFINITY: AffinityMatrix = AffinityMatrix::new(3, &[
    10,  3,  7,
     3, 10,  7,
     7,  7, 10,
]);

#[rustfmt::skip]
static SHAPE_AFFINITY: AffinityMatrix = AffinityMatrix::new(6, &[
    10,  5,  1,  0,  3,  3,
     5, 10,  9,  3,  0,  0,
     1,  9, 10,  4,  6,  1,
     0,  3,  4, 10,  1,  7,
     3,  0,  6,  1, 10,  8,
     3,  0,  1,  7,  8, 10,
]);

#[rustfmt::skip]
static COLOR_AFFINITY: AffinityMatrix = AffinityMatrix::new(16, &[
    10,  9,  7,  0,  2,  0,  0,  0,  6,  0,  0,  0,  0,  0,  2,  0,
     9, 10,  8,  0,  0,  0,  0,  5,  1,  0,  0,  0,  0,  0,  1,  0,
     7,  8, 10,  0,  0,  0,  0,  0,  0,  0,  0,  0,  5,  2,  0,  0,
     0,  0,  0, 10,  9,  0,  4,  0,  0,  3,  1,  0,  1,  0,  3,  0,
     2,  0,  0,  9, 10,  0,  4,  0,  0,  0,  1,  3,  3,  0,  7,  0,
     0,  0,  0,  0,  0, 10,  0,  0,  3,  2,  0,  0,  0,  2,  0,  6,
     0,  0,  0,  4,  4,  0, 10,  0,  0,  1,  6,  2,  0,  0,  0,  0,
     0,  5,  0,  0,  0,  0,  0, 10,  0,  0,  0,  0,  0,  0,  0,  0,
     6,  1,  0,  0,  0,  3,  0,  0, 10,  9,  0,  0,  0,  0,  0,  2,
     0,  0,  0,  3,  0,  2,  1,  0,  9, 10,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  1,  1,  0,  6,  0,  0,  0, 10,  8,  3,  2,  1,  0,
     0,  0,  0,  0,  3,  0,  2,  0,  0,  0,  8, 10,  7,  1,  2,  0,
     0,  0,  5,  1,  3,  0,  0,  0,  0,  0,  3,  7, 10,  6,  1,  0,
     0,  0,  2,  0,  0,  2,  0,  0,  0,  0,  2,  1,  6, 10,  0,  0,
     2,  1,  0,  3,  7,  0,  0,  0,  0,  0,  1,  2,  1,  0, 10,  0,
     0,  0,  0,  0,  0,  6,  0,  0,  2,  0,  0,  0,  0,  0,  0, 10,
]);

#[rustfmt::skip]
static RIM_AFFINITY: AffinityMatrix = AffinityMatrix::new(3, &[
    10,  5,  0,
     5, 10,  5,
     0,  5, 10,
]);

static SUNGLASSES: [DimensionModel; 4] = [
    DimensionModel { dimension: Dimension::Sex, vocabulary: &SUN_SEX, affinity: &SEX_AFFINITY, weight: 1000 },
    DimensionModel { dimension: Dimension::Material, vocabulary: &SUN_MATERIAL, affinity: &MATERIAL_AFFINITY, weight: 50 },
    DimensionModel { dimension: Dimension::Shape, vocabulary: &SUN_SHAPE, affinity: &SHAPE_AFFINITY, weight: 500 },
    DimensionModel { dimension: Dimension::Color, vocabulary: &SUN_COLOR, affinity: &COLOR_AFFINITY, weight: 100 },
];

static MEDICAL: [DimensionModel; 5] = [
    DimensionModel { dimension: Dimension::Sex, vocabulary: &MED_SEX, affinity: &SEX_AFFINITY, weight: 1000 },
    DimensionModel { dimension: Dimension::Material, vocabulary: &MED_MATERIAL, affinity: &MATERIAL_AFFINITY, weight: 50 },
    DimensionModel { dimension: Dimension::Shape, vocabulary: &MED_SHAPE, affinity: &SHAPE_AFFINITY, weight: 700 },
    DimensionModel { dimension: Dimension::Color, vocabulary: &MED_COLOR, affinity: &COLOR_AFFINITY, weight: 400 },
    DimensionModel { dimension: Dimension::Rim, vocabulary: &MED_RIM, affinity: &RIM_AFFINITY, weight: 200 },
];

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAINS: [Domain; 2] = [Domain::Sunglasses, Domain::Medical];

    #[test]
    fn test_matrices_are_symmetric_with_max_diagonal() {
        for domain in DOMAINS {
            for model in domain.dimensions() {
                let m = model.affinity;
                assert_eq!(m.size(), model.vocabulary.len(), "{} {}", domain, model.dimension);
                for i in 0..m.size() {
                    assert_eq!(m.get(i, i), m.max());
                    for j in 0..m.size() {
                        assert_eq!(m.get(i, j), m.get(j, i), "{} [{},{}]", model.dimension, i, j);
                    }
                }
            }
        }
    }

    #[test]
    fn test_vocabulary_codes_are_unique() {
        for domain in DOMAINS {
            for model in domain.dimensions() {
                for (i, code) in model.vocabulary.iter().enumerate() {
                    assert_eq!(model.index_of(*code), Some(i));
                }
            }
        }
    }

    #[test]
    fn test_encode_known_codes() {
        assert_eq!(Domain::Sunglasses.encode(Dimension::Sex, 1200).unwrap(), 0);
        assert_eq!(Domain::Sunglasses.encode(Dimension::Shape, 1234).unwrap(), 5);
        assert_eq!(Domain::Sunglasses.encode(Dimension::Color, 1254).unwrap(), 15);
        assert_eq!(Domain::Medical.encode(Dimension::Material, 1212).unwrap(), 2);
        assert_eq!(Domain::Medical.encode(Dimension::Rim, 1259).unwrap(), 1);
    }

    #[test]
    fn test_encode_unknown_code() {
        // Sport shape exists in the storefront enumeration but has no affinity row
        let err = Domain::Sunglasses.encode(Dimension::Shape, 1326).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownAttributeCode {
                domain: Domain::Sunglasses,
                dimension: Dimension::Shape,
                code: 1326,
            }
        );

        // Medical codes are not valid in the sunglasses vocabulary
        assert!(Domain::Sunglasses.encode(Dimension::Sex, 1208).is_err());
    }

    #[test]
    fn test_rim_only_exists_for_medical() {
        assert!(Domain::Sunglasses.dimension(Dimension::Rim).is_none());
        assert!(matches!(
            Domain::Sunglasses.encode(Dimension::Rim, 1258),
            Err(Error::UnknownAttributeCode { dimension: Dimension::Rim, .. })
        ));
    }

    #[test]
    fn test_max_score() {
        assert_eq!(Domain::Sunglasses.max_score(), 10 * (1000 + 50 + 500 + 100));
        assert_eq!(Domain::Medical.max_score(), 10 * (1000 + 50 + 700 + 400 + 200));
    }

    #[test]
    fn test_feature_len() {
        assert_eq!(Domain::Sunglasses.feature_len(), 4 + 3 + 6 + 16);
        assert_eq!(Domain::Medical.feature_len(), 4 + 3 + 6 + 16 + 3);
    }

    #[test]
    fn test_domain_serde() {
        let json = serde_json::to_string(&Domain::Medical).unwrap();
        assert_eq!(json, "\"medical\"");
        let parsed: Domain = serde_json::from_str("\"sunglasses\"").unwrap();
        assert_eq!(parsed, Domain::Sunglasses);
    }
}
