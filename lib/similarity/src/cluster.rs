//! Cluster-then-sample ranking
//!
//! Records are one-hot encoded and grouped with k-means. The similar set of a
//! record is a random sample of its own cluster. This trades exactness for
//! scale: sampled records share a cluster, they are not guaranteed to be the
//! globally most similar ones.

use crate::batch::EncodedBatch;
use crate::brand::{BrandPolicy, InOrder};
use crate::RankingStrategy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use smartsimilar_core::SimilarCount;
use tracing::debug;

/// Default ratio between average cluster size and K
pub const DEFAULT_PACKING_FACTOR: usize = 5;

/// Default cap on Lloyd iterations
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Number of clusters for a batch: `floor(n / (k * packing))`, at least 1, at most `n`
pub fn cluster_count(batch_size: usize, k: SimilarCount, packing_factor: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    (batch_size / (k.get() * packing_factor.max(1))).clamp(1, batch_size)
}

/// Lloyd's k-means over dense feature rows
#[derive(Debug, Clone)]
pub struct KMeans {
    clusters: usize,
    max_iterations: usize,
}

impl KMeans {
    pub fn new(clusters: usize, max_iterations: usize) -> Self {
        Self {
            clusters,
            max_iterations: max_iterations.max(1),
        }
    }

    /// Assign each row to a cluster id in `0..clusters`
    pub fn fit<R: Rng + ?Sized>(&self, rows: &[Vec<f32>], rng: &mut R) -> Vec<usize> {
        let n = rows.len();
        let k = self.clusters.min(n);
        if k <= 1 {
            return vec![0; n];
        }

        let mut centroids = self.seed_centroids(rows, k, rng);
        let mut assignments = vec![usize::MAX; n];

        for iteration in 0..self.max_iterations {
            let next: Vec<usize> = rows.par_iter().map(|row| nearest(row, &centroids)).collect();
            let changed = next.iter().zip(&assignments).filter(|(a, b)| a != b).count();
            assignments = next;

            if changed == 0 {
                debug!("k-means converged after {} iterations", iteration);
                break;
            }

            let dim = rows[0].len();
            let mut sums = vec![vec![0.0f32; dim]; k];
            let mut counts = vec![0usize; k];
            for (row, &cluster) in rows.iter().zip(&assignments) {
                counts[cluster] += 1;
                for (s, v) in sums[cluster].iter_mut().zip(row) {
                    *s += v;
                }
            }

            // Empty clusters keep their previous centroid
            for ((centroid, sum), &count) in centroids.iter_mut().zip(sums).zip(&counts) {
                if count > 0 {
                    *centroid = sum.into_iter().map(|s| s / count as f32).collect();
                }
            }
        }

        assignments
    }

    /// k-means++ seeding: first centroid uniform, then D² weighted
    fn seed_centroids<R: Rng + ?Sized>(&self, rows: &[Vec<f32>], k: usize, rng: &mut R) -> Vec<Vec<f32>> {
        let n = rows.len();
        let mut centroids = Vec::with_capacity(k);
        centroids.push(rows[rng.random_range(0..n)].clone());

        let mut distances: Vec<f32> = rows.iter().map(|r| squared_distance(r, &centroids[0])).collect();

        while centroids.len() < k {
            let total: f32 = distances.iter().sum();
            let next = if total > 0.0 {
                let mut target = rng.random::<f32>() * total;
                let mut chosen = n - 1;
                for (i, &d) in distances.iter().enumerate() {
                    if d > 0.0 && target < d {
                        chosen = i;
                        break;
                    }
                    target -= d;
                }
                chosen
            } else {
                // Every row coincides with a centroid
                rng.random_range(0..n)
            };

            let centroid = rows[next].clone();
            for (d, row) in distances.iter_mut().zip(rows) {
                *d = d.min(squared_distance(row, &centroid));
            }
            centroids.push(centroid);
        }

        centroids
    }
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index of the closest centroid, lowest index on ties
fn nearest(row: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best = 0;
    let mut best_distance = f32::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(row, centroid);
        if d < best_distance {
            best_distance = d;
            best = i;
        }
    }
    best
}

/// Clustering strategy with per-record random sampling
#[derive(Debug, Clone)]
pub struct ClusterSample {
    packing_factor: usize,
    max_iterations: usize,
}

impl Default for ClusterSample {
    fn default() -> Self {
        Self::new(DEFAULT_PACKING_FACTOR, DEFAULT_MAX_ITERATIONS)
    }
}

impl ClusterSample {
    pub fn new(packing_factor: usize, max_iterations: usize) -> Self {
        Self {
            packing_factor: packing_factor.max(1),
            max_iterations,
        }
    }

    /// Group the batch into clusters of record indices, in batch order
    pub fn clusters<R: Rng + ?Sized>(&self, batch: &EncodedBatch<'_>, k: SimilarCount, rng: &mut R) -> Vec<Vec<usize>> {
        let count = cluster_count(batch.len(), k, self.packing_factor);
        let rows: Vec<Vec<f32>> = batch.encoded_all().iter().map(|e| e.one_hot()).collect();
        let assignments = KMeans::new(count, self.max_iterations).fit(&rows, rng);

        let mut clusters = vec![Vec::new(); count];
        for (record, cluster) in assignments.into_iter().enumerate() {
            clusters[cluster].push(record);
        }
        clusters
    }

    fn sample_one(&self, batch: &EncodedBatch<'_>, source: usize, members: &[usize], k: SimilarCount, seed: u64) -> Vec<usize> {
        let capacity = k.capped(members.len());
        let mut pool: Vec<usize> = members.iter().copied().filter(|&m| m != source).collect();
        pool.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut policy = BrandPolicy::new(batch.brand(source), capacity, InOrder::new(capacity));
        for candidate in pool {
            if policy.is_saturated() {
                break;
            }
            policy.offer(candidate, batch.brand(candidate), 0);
        }
        policy.finish()
    }
}

impl RankingStrategy for ClusterSample {
    fn name(&self) -> &'static str {
        "clustered"
    }

    fn rank<R: Rng + ?Sized>(&self, batch: &EncodedBatch<'_>, k: SimilarCount, rng: &mut R) -> Vec<Vec<usize>> {
        let n = batch.len();
        let clusters = self.clusters(batch, k, rng);
        debug!("Formed {} clusters over {} records", clusters.len(), n);

        let mut membership = vec![0usize; n];
        for (cluster, members) in clusters.iter().enumerate() {
            for &record in members {
                membership[record] = cluster;
            }
        }

        // Per-record seeds are drawn up front so results do not depend on thread scheduling
        let seeds: Vec<u64> = (0..n).map(|_| rng.next_u64()).collect();

        (0..n)
            .into_par_iter()
            .map(|source| self.sample_one(batch, source, &clusters[membership[source]], k, seeds[source]))
            .collect()
    }
}
