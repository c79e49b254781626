//! Deterministic stand-ins for the collaborators, used by unit tests.

use async_trait::async_trait;
use faqx_core::{Embedder, Error, Neighbor, NeighborSearch, Paraphraser, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns a fixed vector (zeros by default), or fails every call.
pub struct FakeEmbedder {
    vector: Vec<f32>,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self::returning(vec![0.0; dim])
    }

    pub fn returning(vector: Vec<f32>) -> Self {
        Self {
            vector,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(0)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::collaborator("embedder", "connection refused"));
        }
        Ok(self.vector.clone())
    }
}

/// Index whose distance to row `i` is fixed up front, whatever the query.
pub struct ScriptedIndex {
    distances: Vec<f32>,
    queries: AtomicUsize,
    last_k: Mutex<Option<usize>>,
}

impl ScriptedIndex {
    pub fn new(distances: Vec<f32>) -> Self {
        Self {
            distances,
            queries: AtomicUsize::new(0),
            last_k: Mutex::new(None),
        }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn last_k(&self) -> Option<usize> {
        *self.last_k.lock()
    }
}

impl NeighborSearch for ScriptedIndex {
    fn len(&self) -> usize {
        self.distances.len()
    }

    fn dim(&self) -> usize {
        4
    }

    fn nearest(&self, _query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        *self.last_k.lock() = Some(k);

        let mut ranked: Vec<Neighbor> = self
            .distances
            .iter()
            .enumerate()
            .map(|(ordinal, &distance)| Neighbor { ordinal, distance })
            .collect();
        ranked.sort();
        ranked.truncate(k);
        Ok(ranked)
    }
}

/// Echoes the user prompt back, or fails every call.
pub struct EchoParaphraser {
    fail: bool,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<(String, String)>>,
}

impl EchoParaphraser {
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<(String, String)> {
        self.last_prompt.lock().clone()
    }
}

#[async_trait]
impl Paraphraser for EchoParaphraser {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock() = Some((system_prompt.to_string(), user_prompt.to_string()));
        if self.fail {
            return Err(Error::collaborator("paraphraser", "rate limited"));
        }
        Ok(format!("  {}\n", user_prompt))
    }
}
