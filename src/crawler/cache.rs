//! Bounded negative caches
//!
//! URLs already proven to be non-HTML (when followed as links) or non-image (when
//! fetched as images) are remembered so repeated references do not cost another
//! request. Each set holds a fixed number of URLs and forgets the oldest first.

use std::collections::{HashSet, VecDeque};

/// Insertion-ordered set with a fixed capacity
///
/// When full, inserting a new value evicts the oldest one.
#[derive(Debug, Clone)]
pub struct BoundedSet {
    capacity: usize,
    order: VecDeque<String>,
    members: HashSet<String>,
}

impl BoundedSet {
    /// Creates an empty set holding at most `capacity` values (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }

    /// Inserts a value, evicting the oldest if the set is full
    ///
    /// Returns false if the value was already present (its age is not refreshed).
    pub fn insert(&mut self, value: &str) -> bool {
        if self.members.contains(value) {
            return false;
        }

        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }

        self.order.push_back(value.to_string());
        self.members.insert(value.to_string());
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.members.contains(value)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// The two negative caches kept for one crawl
#[derive(Debug, Clone)]
pub struct NegativeCache {
    /// URLs that answered with a non-HTML content type when fetched as pages
    pub invalid_html: BoundedSet,

    /// URLs that answered with a non-image content type when fetched as images
    pub invalid_images: BoundedSet,
}

impl NegativeCache {
    pub fn new(html_capacity: usize, image_capacity: usize) -> Self {
        Self {
            invalid_html: BoundedSet::new(html_capacity),
            invalid_images: BoundedSet::new(image_capacity),
        }
    }
}

impl Default for NegativeCache {
    fn default() -> Self {
        Self::new(1000, 1000)
    }
}
