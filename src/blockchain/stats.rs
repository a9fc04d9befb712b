use serde::{Deserialize, Serialize};

/// Hash-rate figures of a single nonce search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MiningStats {
    pub hashes_computed: u64,
    pub elapsed_ms: f64,
    /// Hashes per second.
    pub hash_rate: f64,
}

impl MiningStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_hash_rate(&mut self) {
        if self.elapsed_ms > 0.0 {
            self.hash_rate = (self.hashes_computed as f64) / (self.elapsed_ms / 1000.0);
        }
    }

    pub fn format_hash_rate(&self) -> String {
        if self.hash_rate >= 1_000_000_000.0 {
            format!("{:.2} GH/s", self.hash_rate / 1_000_000_000.0)
        } else if self.hash_rate >= 1_000_000.0 {
            format!("{:.2} MH/s", self.hash_rate / 1_000_000.0)
        } else if self.hash_rate >= 1_000.0 {
            format!("{:.2} KH/s", self.hash_rate / 1_000.0)
        } else {
            format!("{:.2} H/s", self.hash_rate)
        }
    }
}
