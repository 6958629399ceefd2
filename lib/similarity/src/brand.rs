//! Brand deprioritization
//!
//! Candidates of the source record's own brand are held back in a deferred
//! queue. They only reach the result when the pool did not contain enough
//! candidates of other brands to fill it, and then in the order they were
//! deferred.

use std::collections::VecDeque;

/// Primary admission rule of a ranking strategy
pub trait Admission {
    /// Offer a candidate with its score against the source record
    fn offer(&mut self, candidate: usize, score: u32);

    /// True once no further offer can change the outcome
    fn is_saturated(&self) -> bool;

    /// Admitted candidates in result order
    fn into_candidates(self) -> Vec<usize>;
}

/// Admits candidates in arrival order until capacity is reached
#[derive(Debug, Clone)]
pub struct InOrder {
    capacity: usize,
    admitted: Vec<usize>,
}

impl InOrder {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            admitted: Vec::with_capacity(capacity),
        }
    }
}

impl Admission for InOrder {
    fn offer(&mut self, candidate: usize, _score: u32) {
        if self.admitted.len() < self.capacity {
            self.admitted.push(candidate);
        }
    }

    fn is_saturated(&self) -> bool {
        self.admitted.len() >= self.capacity
    }

    fn into_candidates(self) -> Vec<usize> {
        self.admitted
    }
}

/// Routes candidates between the primary admission and the same-brand queue
#[derive(Debug)]
pub struct BrandPolicy<'a, A> {
    source_brand: &'a str,
    capacity: usize,
    primary: A,
    deferred: VecDeque<usize>,
    other_brands: usize,
}

impl<'a, A: Admission> BrandPolicy<'a, A> {
    pub fn new(source_brand: &'a str, capacity: usize, primary: A) -> Self {
        Self {
            source_brand,
            capacity,
            primary,
            deferred: VecDeque::new(),
            other_brands: 0,
        }
    }

    /// True once more candidates cannot change the result
    pub fn is_saturated(&self) -> bool {
        self.other_brands >= self.capacity && self.primary.is_saturated()
    }

    pub fn offer(&mut self, candidate: usize, brand: &str, score: u32) {
        if brand == self.source_brand {
            if self.deferred.len() < self.capacity {
                self.deferred.push_back(candidate);
            }
        } else {
            self.other_brands += 1;
            self.primary.offer(candidate, score);
        }
    }

    /// Final candidate list: primary admissions, then same-brand backfill
    pub fn finish(self) -> Vec<usize> {
        let mut result = self.primary.into_candidates();
        result.truncate(self.capacity);

        if self.other_brands < self.capacity {
            let room = self.capacity - result.len();
            result.extend(self.deferred.into_iter().take(room));
        }

        result
    }
}
