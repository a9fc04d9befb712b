pub mod block;
pub mod miner;
pub mod model;
pub mod stats;

pub use block::{DemoBlock, digest, is_valid_hash};
pub use miner::{MineOutcome, search_cooperative};
pub use model::DemoChain;
pub use stats::MiningStats;

/// Default Proof-of-Work difficulty (number of leading hex zeros).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Highest difficulty the demo accepts; beyond this a browser-sized search is hopeless.
pub const MAX_DIFFICULTY: u32 = 7;

/// Default upper bound for the nonce scan.
pub const DEFAULT_MAX_NONCE: u64 = 500_000;

/// Iterations between cooperative yields in the async scan.
pub const YIELD_INTERVAL: u64 = 5_000;

/// Previous-hash shown on the first block of a demo chain.
pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";
