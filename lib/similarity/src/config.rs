//! Engine configuration

use crate::batch::EncodedBatch;
use crate::cluster::{DEFAULT_MAX_ITERATIONS, DEFAULT_PACKING_FACTOR};
use crate::topk::DEFAULT_CHUNK_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which ranking strategy a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Exact pairwise scoring with greedy slot admission
    #[default]
    Exact,
    /// k-means clustering followed by random sampling
    Clustered,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Exact => f.write_str("exact"),
            StrategyKind::Clustered => f.write_str("clustered"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(StrategyKind::Exact),
            "clustered" | "cluster" => Ok(StrategyKind::Clustered),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

/// Order in which the exact strategy scans candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOrder {
    /// The order records were supplied in
    #[default]
    BatchOrder,
    /// Ascending record id, independent of input order
    AscendingId,
}

impl ScanOrder {
    /// Candidate indices in scan order
    pub fn arrange(self, batch: &EncodedBatch<'_>) -> Vec<usize> {
        let mut order: Vec<usize> = (0..batch.len()).collect();
        if self == ScanOrder::AscendingId {
            order.sort_by_key(|&i| batch.id(i));
        }
        order
    }
}

impl FromStr for ScanOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "batch" | "batch_order" => Ok(ScanOrder::BatchOrder),
            "id" | "ascending_id" => Ok(ScanOrder::AscendingId),
            other => Err(format!("unknown scan order '{}'", other)),
        }
    }
}

/// Configuration of a similarity run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Records per synchronization step of the exact strategy
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default)]
    pub scan_order: ScanOrder,

    /// Average cluster size relative to K for the clustered strategy
    #[serde(default = "default_packing_factor")]
    pub packing_factor: usize,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Seed for the random source; seeded from the OS when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_packing_factor() -> usize {
    DEFAULT_PACKING_FACTOR
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            scan_order: ScanOrder::default(),
            packing_factor: DEFAULT_PACKING_FACTOR,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.strategy, StrategyKind::Exact);
        assert_eq!(config.chunk_size, 100);
        assert_eq!(config.packing_factor, 5);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: EngineConfig = serde_json::from_str(r#"{"strategy": "clustered", "seed": 7}"#).unwrap();
        assert_eq!(config.strategy, StrategyKind::Clustered);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.scan_order, ScanOrder::BatchOrder);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Exact".parse::<StrategyKind>().unwrap(), StrategyKind::Exact);
        assert_eq!("cluster".parse::<StrategyKind>().unwrap(), StrategyKind::Clustered);
        assert!("knn".parse::<StrategyKind>().is_err());
        assert_eq!("ascending-id".parse::<ScanOrder>().unwrap(), ScanOrder::AscendingId);
        assert_eq!("batch".parse::<ScanOrder>().unwrap(), ScanOrder::BatchOrder);
    }
}
