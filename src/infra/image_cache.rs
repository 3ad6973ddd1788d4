//! Bounded in-memory image cache with a pluggable eviction policy.

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use crate::infra::config::{EvictionKind, ImageConfig};

/// Decides which entry leaves the cache when it is full.
pub trait EvictionPolicy: Send {
    fn on_insert(&mut self, key: &str);
    fn on_access(&mut self, key: &str);
    fn on_remove(&mut self, key: &str);
    /// Next key to evict, if any is tracked.
    fn victim(&mut self) -> Option<String>;
}

impl<P: EvictionPolicy + ?Sized> EvictionPolicy for Box<P> {
    fn on_insert(&mut self, key: &str) {
        (**self).on_insert(key)
    }

    fn on_access(&mut self, key: &str) {
        (**self).on_access(key)
    }

    fn on_remove(&mut self, key: &str) {
        (**self).on_remove(key)
    }

    fn victim(&mut self) -> Option<String> {
        (**self).victim()
    }
}

/// Least recently used entry goes first.
#[derive(Debug, Default)]
pub struct Lru {
    order: VecDeque<String>,
}

impl EvictionPolicy for Lru {
    fn on_insert(&mut self, key: &str) {
        self.on_remove(key);
        self.order.push_back(key.to_owned());
    }

    fn on_access(&mut self, key: &str) {
        self.on_insert(key);
    }

    fn on_remove(&mut self, key: &str) {
        self.order.retain(|existing| existing != key);
    }

    fn victim(&mut self) -> Option<String> {
        self.order.front().cloned()
    }
}

/// Oldest insertion goes first; reads do not refresh an entry.
#[derive(Debug, Default)]
pub struct Fifo {
    order: VecDeque<String>,
}

impl EvictionPolicy for Fifo {
    fn on_insert(&mut self, key: &str) {
        if !self.order.iter().any(|existing| existing == key) {
            self.order.push_back(key.to_owned());
        }
    }

    fn on_access(&mut self, _key: &str) {}

    fn on_remove(&mut self, key: &str) {
        self.order.retain(|existing| existing != key);
    }

    fn victim(&mut self) -> Option<String> {
        self.order.front().cloned()
    }
}

pub fn policy_for(kind: EvictionKind) -> Box<dyn EvictionPolicy> {
    match kind {
        EvictionKind::Lru => Box::new(Lru::default()),
        EvictionKind::Fifo => Box::new(Fifo::default()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedImage {
    pub content_type: Option<String>,
    pub bytes: Arc<[u8]>,
}

/// URL-keyed cache owned by the image loader. Capacity counts entries.
pub struct ImageCache<P: EvictionPolicy> {
    capacity: usize,
    entries: HashMap<String, CachedImage>,
    policy: P,
}

impl ImageCache<Box<dyn EvictionPolicy>> {
    pub fn from_config(config: &ImageConfig) -> Self {
        Self::new(config.cache_capacity, policy_for(config.eviction))
    }
}

impl<P: EvictionPolicy> ImageCache<P> {
    pub fn new(capacity: usize, policy: P) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&mut self, url: &str) -> Option<CachedImage> {
        let image = self.entries.get(url).cloned()?;
        self.policy.on_access(url);
        Some(image)
    }

    /// Stores `image`, evicting as needed. A zero-capacity cache stores nothing.
    pub fn insert(&mut self, url: &str, image: CachedImage) {
        if self.capacity == 0 {
            return;
        }

        if !self.entries.contains_key(url) {
            while self.entries.len() >= self.capacity {
                let Some(victim) = self.policy.victim() else {
                    break;
                };
                self.entries.remove(&victim);
                self.policy.on_remove(&victim);
                tracing::debug!(url = %victim, "image evicted from cache");
            }
        }

        self.entries.insert(url.to_owned(), image);
        self.policy.on_insert(url);
    }
}
