use crate::domain::{Dimension, Domain, MAX_DIMENSIONS};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Domain-tagged categorical attributes of a product, as raw catalog codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "lowercase")]
pub enum Attributes {
    Sunglasses {
        sex: u32,
        material: u32,
        shape: u32,
        color: u32,
    },
    Medical {
        sex: u32,
        material: u32,
        shape: u32,
        color: u32,
        rim: u32,
    },
}

impl Attributes {
    pub fn domain(&self) -> Domain {
        match self {
            Attributes::Sunglasses { .. } => Domain::Sunglasses,
            Attributes::Medical { .. } => Domain::Medical,
        }
    }

    /// Raw code for a dimension, `None` if the domain has no such dimension
    pub fn code(&self, dimension: Dimension) -> Option<u32> {
        match (*self, dimension) {
            (Attributes::Sunglasses { sex, .. }, Dimension::Sex)
            | (Attributes::Medical { sex, .. }, Dimension::Sex) => Some(sex),
            (Attributes::Sunglasses { material, .. }, Dimension::Material)
            | (Attributes::Medical { material, .. }, Dimension::Material) => Some(material),
            (Attributes::Sunglasses { shape, .. }, Dimension::Shape)
            | (Attributes::Medical { shape, .. }, Dimension::Shape) => Some(shape),
            (Attributes::Sunglasses { color, .. }, Dimension::Color)
            | (Attributes::Medical { color, .. }, Dimension::Color) => Some(color),
            (Attributes::Medical { rim, .. }, Dimension::Rim) => Some(rim),
            (Attributes::Sunglasses { .. }, Dimension::Rim) => None,
        }
    }

    /// Encode every dimension to its dense vocabulary index
    pub fn encode(&self) -> Result<EncodedAttributes> {
        let domain = self.domain();
        let mut indices = [0u8; MAX_DIMENSIONS];
        for (slot, model) in indices.iter_mut().zip(domain.dimensions()) {
            // Every dimension of the domain is present in its own variant
            let code = self.code(model.dimension).unwrap_or(u32::MAX);
            *slot = domain.encode(model.dimension, code)? as u8;
        }
        Ok(EncodedAttributes { domain, indices })
    }
}

/// A catalog product as handed over by the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub id: u64,
    pub name: String,
    pub brand: String,
    pub attributes: Attributes,
}

impl AttributeRecord {
    pub fn new(id: u64, name: impl Into<String>, brand: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id,
            name: name.into(),
            brand: brand.into(),
            attributes,
        }
    }

    pub fn domain(&self) -> Domain {
        self.attributes.domain()
    }
}

/// Attributes mapped to dense indices, ready for table lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodedAttributes {
    domain: Domain,
    indices: [u8; MAX_DIMENSIONS],
}

impl EncodedAttributes {
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Dense indices in dimension order
    pub fn indices(&self) -> &[u8] {
        &self.indices[..self.domain.dimension_count()]
    }

    /// One-hot expansion of every dimension, concatenated in dimension order
    pub fn one_hot(&self) -> Vec<f32> {
        let mut features = vec![0.0f32; self.domain.feature_len()];
        let mut offset = 0;
        for (model, &index) in self.domain.dimensions().iter().zip(self.indices()) {
            features[offset + index as usize] = 1.0;
            offset += model.vocabulary.len();
        }
        features
    }
}
