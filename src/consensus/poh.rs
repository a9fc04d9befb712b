//! Proof-of-history: a sequential SHA-256 chain with events mixed in.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PohEntry {
    pub seq: u64,
    pub hash: String,
    pub event: Option<String>,
}

fn next_hash(prev: &str, event: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prev.as_bytes());
    if let Some(event) = event {
        hasher.update(event.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, Serialize)]
pub struct PohTimeline {
    seed: String,
    entries: Vec<PohEntry>,
}

impl PohTimeline {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[PohEntry] {
        &self.entries
    }

    fn origin(&self) -> String {
        next_hash(&self.seed, None)
    }

    pub fn tip(&self) -> String {
        self.entries
            .last()
            .map(|e| e.hash.clone())
            .unwrap_or_else(|| self.origin())
    }

    fn append(&mut self, event: Option<String>) -> &PohEntry {
        let hash = next_hash(&self.tip(), event.as_deref());
        self.entries.push(PohEntry {
            seq: self.entries.len() as u64 + 1,
            hash,
            event,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn tick(&mut self) -> &PohEntry {
        self.append(None)
    }

    pub fn ticks(&mut self, count: usize) {
        for _ in 0..count {
            self.tick();
        }
    }

    /// Mix `event` into the next hash, timestamping it in sequence order.
    pub fn record(&mut self, event: impl Into<String>) -> &PohEntry {
        self.append(Some(event.into()))
    }

    /// Replay the whole chain from the seed.
    pub fn verify(&self) -> bool {
        let mut prev = self.origin();
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.seq != i as u64 + 1 {
                return false;
            }
            let expected = next_hash(&prev, entry.event.as_deref());
            if entry.hash != expected {
                return false;
            }
            prev = expected;
        }
        true
    }
}
