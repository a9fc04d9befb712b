//! Linear nonce search for the hashing demo.

use actix_web::rt::task::yield_now;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::block::{digest, is_valid_hash};
use super::stats::MiningStats;
use super::{MAX_DIFFICULTY, YIELD_INTERVAL};
use crate::error::{DemoError, DemoResult};

/// Result of a nonce search. Exhaustion is a normal outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MineOutcome {
    Found { nonce: u64, hash: String },
    NotFound,
}

impl MineOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, MineOutcome::Found { .. })
    }
}

/// Outcome plus the hash-rate figures of the search that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineReport {
    pub outcome: MineOutcome,
    pub stats: MiningStats,
}

/// Heights start at 1.
pub fn validate_height(height: u64) -> DemoResult<()> {
    if height == 0 {
        return Err(DemoError::InvalidInput("height must be positive".into()));
    }
    Ok(())
}

pub fn validate_difficulty(difficulty: u32) -> DemoResult<()> {
    if difficulty > MAX_DIFFICULTY {
        return Err(DemoError::InvalidInput(format!(
            "difficulty must be between 0 and {MAX_DIFFICULTY}"
        )));
    }
    Ok(())
}

/// Scan `start..=end`, returning the first qualifying nonce and how many
/// hashes were computed.
fn scan_range(
    height: u64,
    data: &[u8],
    difficulty: u32,
    start: u64,
    end: u64,
) -> (Option<(u64, String)>, u64) {
    let mut hashes = 0u64;
    let mut nonce = start;
    loop {
        let hash = digest(height, nonce, data);
        hashes += 1;
        if is_valid_hash(&hash, difficulty) {
            return (Some((nonce, hash)), hashes);
        }
        if nonce == end {
            return (None, hashes);
        }
        nonce += 1;
    }
}

fn finish(found: Option<(u64, String)>, hashes: u64, started: Instant) -> MineReport {
    let mut stats = MiningStats::new();
    stats.hashes_computed = hashes;
    stats.elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    stats.update_hash_rate();

    let outcome = match found {
        Some((nonce, hash)) => MineOutcome::Found { nonce, hash },
        None => MineOutcome::NotFound,
    };
    debug!(
        "POW - scan done found={} hashes={} rate={}",
        outcome.is_found(),
        stats.hashes_computed,
        stats.format_hash_rate()
    );
    MineReport { outcome, stats }
}

/// Search `0..=max_nonce` for the lowest qualifying nonce, yielding to the
/// executor every [`YIELD_INTERVAL`] nonces so other tasks on the worker keep
/// running. Dropping the future abandons the scan at the next yield point.
pub async fn search_cooperative(
    height: u64,
    data: &[u8],
    difficulty: u32,
    max_nonce: u64,
) -> DemoResult<MineReport> {
    validate_height(height)?;
    validate_difficulty(difficulty)?;
    let started = Instant::now();
    let mut total = 0u64;
    let mut start = 0u64;

    loop {
        let end = start.saturating_add(YIELD_INTERVAL - 1).min(max_nonce);
        let (found, hashes) = scan_range(height, data, difficulty, start, end);
        total += hashes;
        if found.is_some() || end == max_nonce {
            return Ok(finish(found, total, started));
        }
        start = end + 1;
        yield_now().await;
    }
}
