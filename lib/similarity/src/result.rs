//! Result assembly
//!
//! Maps the strategies' index lists back to external record ids.

use crate::batch::EncodedBatch;
use serde::{Deserialize, Serialize};

/// Similar products of one source record, most preferred first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedResult {
    #[serde(rename = "id")]
    source_id: u64,
    #[serde(rename = "similar")]
    similar_ids: Vec<u64>,
}

impl RankedResult {
    pub fn new(source_id: u64, similar_ids: Vec<u64>) -> Self {
        Self { source_id, similar_ids }
    }

    pub fn source_id(&self) -> u64 {
        self.source_id
    }

    pub fn similar_ids(&self) -> &[u64] {
        &self.similar_ids
    }

    pub fn len(&self) -> usize {
        self.similar_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.similar_ids.is_empty()
    }
}

/// Attach each record's ranked candidate indices as external ids
pub fn assemble(batch: &EncodedBatch<'_>, ranked: Vec<Vec<usize>>) -> Vec<RankedResult> {
    ranked
        .into_iter()
        .enumerate()
        .map(|(source, candidates)| {
            let similar_ids = candidates.into_iter().map(|c| batch.id(c)).collect();
            RankedResult::new(batch.id(source), similar_ids)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartsimilar_core::{AttributeRecord, Attributes};

    #[test]
    fn test_assemble_maps_ids() {
        let attrs = Attributes::Sunglasses { sex: 1200, material: 414, shape: 1229, color: 1250 };
        let records = vec![
            AttributeRecord::new(501, "a", "x", attrs),
            AttributeRecord::new(502, "b", "y", attrs),
            AttributeRecord::new(503, "c", "z", attrs),
        ];
        let batch = EncodedBatch::new(&records).unwrap();
        let results = assemble(&batch, vec![vec![2, 1], vec![0], vec![]]);

        assert_eq!(results[0], RankedResult::new(501, vec![503, 502]));
        assert_eq!(results[1].similar_ids(), &[501]);
        assert!(results[2].is_empty());
    }

    #[test]
    fn test_serialize_shape() {
        let result = RankedResult::new(7, vec![3, 9]);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"id":7,"similar":[3,9]}"#);
    }
}
