use std::collections::hash_map::DefaultHasher;
use std::hash::BuildHasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A [`BuildHasher`] that records how many hashers it has built, so tests can confirm that a
/// collection really hashes through the builder it was given.
#[derive(Debug, Clone, Default)]
pub struct CountingHasherBuilder {
    pub built: Arc<AtomicUsize>,
}

impl CountingHasherBuilder {
    pub fn built(&self) -> usize {
        self.built.load(Ordering::SeqCst)
    }
}

impl BuildHasher for CountingHasherBuilder {
    type Hasher = DefaultHasher;

    fn build_hasher(&self) -> Self::Hasher {
        self.built.fetch_add(1, Ordering::SeqCst);
        DefaultHasher::new()
    }
}
