//! Exact pairwise ranking
//!
//! Every record is scored against every other record of the batch. Admission
//! into the K result slots follows a single-pass positional rule: a candidate
//! takes the first slot whose held score is strictly lower than its own and
//! overwrites it. Nothing is shifted and the slots are never re-sorted, so
//! the result depends on the scan order when scores tie or arrive in rising
//! order. This is deliberately not a true top-K.

use crate::batch::EncodedBatch;
use crate::brand::{Admission, BrandPolicy};
use crate::config::ScanOrder;
use crate::RankingStrategy;
use rand::Rng;
use rayon::prelude::*;
use smartsimilar_core::SimilarCount;
use tracing::debug;

/// Default number of records processed per synchronization step
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Fixed-capacity slot buffer with first-lower-slot-wins admission
#[derive(Debug, Clone)]
pub struct GreedySlots {
    // None is the sentinel below any valid score
    slots: Vec<Option<(u32, usize)>>,
}

impl GreedySlots {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Held scores in slot order, `None` for empty slots
    #[cfg(test)]
    pub(crate) fn scores(&self) -> Vec<Option<u32>> {
        self.slots.iter().map(|s| s.map(|(score, _)| score)).collect()
    }
}

impl Admission for GreedySlots {
    fn offer(&mut self, candidate: usize, score: u32) {
        for slot in self.slots.iter_mut() {
            let lower = match slot {
                Some((held, _)) => *held < score,
                None => true,
            };
            if lower {
                *slot = Some((score, candidate));
                return;
            }
        }
    }

    fn is_saturated(&self) -> bool {
        false
    }

    fn into_candidates(self) -> Vec<usize> {
        self.slots.into_iter().flatten().map(|(_, c)| c).collect()
    }
}

/// Exact pairwise strategy, parallel over records in fixed-size chunks
#[derive(Debug, Clone)]
pub struct ExactTopK {
    chunk_size: usize,
    scan_order: ScanOrder,
}

impl Default for ExactTopK {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, ScanOrder::default())
    }
}

impl ExactTopK {
    pub fn new(chunk_size: usize, scan_order: ScanOrder) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            scan_order,
        }
    }

    /// Rank a single source record against the candidates in `order`
    pub fn rank_one(&self, batch: &EncodedBatch<'_>, source: usize, order: &[usize], capacity: usize) -> Vec<usize> {
        let model = batch.model();
        let source_attrs = batch.encoded(source);
        let mut policy = BrandPolicy::new(batch.brand(source), capacity, GreedySlots::new(capacity));

        for &candidate in order {
            if candidate == source {
                continue;
            }
            let score = model.score_encoded(source_attrs, batch.encoded(candidate));
            policy.offer(candidate, batch.brand(candidate), score);
        }

        policy.finish()
    }
}

impl RankingStrategy for ExactTopK {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn rank<R: Rng + ?Sized>(&self, batch: &EncodedBatch<'_>, k: SimilarCount, _rng: &mut R) -> Vec<Vec<usize>> {
        let n = batch.len();
        let capacity = k.capped(n);
        let order = self.scan_order.arrange(batch);
        let mut ranked = Vec::with_capacity(n);

        for start in (0..n).step_by(self.chunk_size) {
            let end = (start + self.chunk_size).min(n);
            let chunk: Vec<Vec<usize>> = (start..end)
                .into_par_iter()
                .map(|source| self.rank_one(batch, source, &order, capacity))
                .collect();
            ranked.extend(chunk);
            debug!("Exact ranking: {}/{} records done", end, n);
        }

        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use smartsimilar_core::{AttributeRecord, Attributes};

    fn sun(id: u64, brand: &str, sex: u32, shape: u32, color: u32) -> AttributeRecord {
        AttributeRecord::new(
            id,
            format!("frame-{}", id),
            brand,
            Attributes::Sunglasses { sex, material: 414, shape, color },
        )
    }

    fn ids(batch: &EncodedBatch<'_>, ranked: &[usize]) -> Vec<u64> {
        ranked.iter().map(|&i| batch.id(i)).collect()
    }

    #[test]
    fn test_greedy_slots_first_lower_slot_wins() {
        let mut slots = GreedySlots::new(3);
        slots.offer(0, 5);
        // 7 beats slot 0 and overwrites it, slot 1 stays empty
        slots.offer(1, 7);
        assert_eq!(slots.scores(), vec![Some(7), None, None]);
        // ties do not displace, they fall through to the next lower slot
        slots.offer(2, 7);
        assert_eq!(slots.scores(), vec![Some(7), Some(7), None]);
        slots.offer(3, 1);
        assert_eq!(slots.scores(), vec![Some(7), Some(7), Some(1)]);
        slots.offer(4, 3);
        assert_eq!(slots.scores(), vec![Some(7), Some(7), Some(3)]);
        assert_eq!(slots.into_candidates(), vec![1, 2, 4]);
    }

    #[test]
    fn test_greedy_slots_admit_zero_score() {
        let mut slots = GreedySlots::new(2);
        slots.offer(9, 0);
        assert_eq!(slots.into_candidates(), vec![9]);
    }

    #[test]
    fn test_rising_scores_keep_only_first_slot() {
        // Candidates arrive in strictly rising score order against record 0
        let records = vec![
            sun(1, "a", 1200, 1229, 1250),
            sun(2, "b", 1219, 1230, 1236), // low affinity to record 1
            sun(3, "c", 1202, 1230, 1236),
            sun(4, "d", 1200, 1229, 1248),
        ];
        let batch = EncodedBatch::new(&records).unwrap();
        let strategy = ExactTopK::default();
        let order: Vec<usize> = (0..4).collect();
        let ranked = strategy.rank_one(&batch, 0, &order, 3);
        assert_eq!(ids(&batch, &ranked), vec![4]);
    }

    #[test]
    fn test_self_is_never_ranked() {
        let records: Vec<AttributeRecord> = (0..20)
            .map(|i| sun(i, &format!("brand-{}", i % 4), 1200 + (i as u32 % 3), 1229, 1250))
            .collect();
        let batch = EncodedBatch::new(&records).unwrap();
        let k = SimilarCount::new(8).unwrap();
        let ranked = ExactTopK::new(7, ScanOrder::BatchOrder).rank(&batch, k, &mut StdRng::seed_from_u64(0));

        assert_eq!(ranked.len(), 20);
        for (source, similar) in ranked.iter().enumerate() {
            assert!(similar.len() <= 8);
            assert!(!similar.contains(&source));
        }
    }

    #[test]
    fn test_prefers_other_brand_with_equal_score() {
        let records = vec![
            sun(1, "ray-ban", 1200, 1229, 1250),
            sun(2, "ray-ban", 1200, 1229, 1250),
            sun(3, "polaroid", 1200, 1229, 1250),
            sun(4, "vogue", 1200, 1229, 1250),
        ];
        let batch = EncodedBatch::new(&records).unwrap();
        let k = SimilarCount::new(1).unwrap();
        let ranked = ExactTopK::default().rank(&batch, k, &mut StdRng::seed_from_u64(0));
        assert_eq!(ids(&batch, &ranked[0]), vec![3]);
        assert_eq!(ids(&batch, &ranked[1]), vec![3]);
    }

    #[test]
    fn test_chunking_does_not_change_results() {
        let records: Vec<AttributeRecord> = (0..57)
            .map(|i| {
                let shapes = [1229, 1233, 1231, 1230, 1232, 1234];
                let colors = [1250, 1248, 1249, 1237, 1242];
                sun(i, &format!("b{}", i % 5), 1200 + (i as u32 % 2), shapes[i as usize % 6], colors[i as usize % 5])
            })
            .collect();
        let batch = EncodedBatch::new(&records).unwrap();
        let k = SimilarCount::new(5).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let single = ExactTopK::new(1000, ScanOrder::BatchOrder).rank(&batch, k, &mut rng);
        let chunked = ExactTopK::new(4, ScanOrder::BatchOrder).rank(&batch, k, &mut rng);
        assert_eq!(single, chunked);
    }

    #[test]
    fn test_scan_order_by_id() {
        // Two equally scored candidates: the first scanned wins the single slot
        let records = vec![
            sun(30, "a", 1200, 1229, 1250),
            sun(20, "b", 1200, 1229, 1250),
            sun(10, "c", 1200, 1229, 1250),
        ];
        let batch = EncodedBatch::new(&records).unwrap();
        let k = SimilarCount::new(1).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let by_batch = ExactTopK::new(10, ScanOrder::BatchOrder).rank(&batch, k, &mut rng);
        let by_id = ExactTopK::new(10, ScanOrder::AscendingId).rank(&batch, k, &mut rng);
        assert_eq!(ids(&batch, &by_batch[0]), vec![20]);
        assert_eq!(ids(&batch, &by_id[0]), vec![10]);
    }
}
