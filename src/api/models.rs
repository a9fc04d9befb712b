use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::access::{
    AccessDecision, Gated, LimitKind, MemoryRecorder, Permission, PermissionGate, PlanLimits,
    PlanTier,
};
use crate::article::ArticleStore;
use crate::blockchain::{DemoBlock, DemoChain, MineOutcome, MiningStats};
use crate::config::Config;
use crate::consensus::bft::StepRecord;
use crate::consensus::{DelegateTally, PohEntry, SelectionRecord, StakePool, Validator};
use crate::mock::MockStore;
use crate::prefs::PreferenceStore;

/// Blocks in the editable chain demo.
pub const DEMO_CHAIN_LEN: usize = 5;

/// Shared application state: demo chain, stake pool, content, mocks and preferences.
pub struct AppState {
    pub config: Config,
    pub chain: Mutex<DemoChain>,
    pub stake_pool: Mutex<StakePool>,
    pub articles: Mutex<ArticleStore>,
    pub mocks: Mutex<MockStore>,
    pub prefs: PreferenceStore,
    pub gate: PermissionGate,
    pub usage: Arc<MemoryRecorder>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let usage = Arc::new(MemoryRecorder::new());
        let stake_pool = StakePool::with_validators(vec![
            Validator::new("validator-a", 300.0),
            Validator::new("validator-b", 500.0),
            Validator::new("validator-c", 200.0),
        ])
        .unwrap_or_default();
        Self {
            chain: Mutex::new(DemoChain::new(DEMO_CHAIN_LEN, config.default_difficulty)),
            stake_pool: Mutex::new(stake_pool),
            articles: Mutex::new(ArticleStore::seeded(config.page_size_max)),
            mocks: Mutex::new(MockStore::new()),
            prefs: PreferenceStore::open(config.prefs_path.clone()),
            gate: PermissionGate::with_recorder(usage.clone()),
            usage,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/* ---------- PoW API Models ---------- */

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MineRequest {
    pub height: u64,
    #[serde(default)]
    pub data: String,
    pub difficulty: Option<u32>,
    pub max_nonce: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MineResponse {
    pub outcome: MineOutcome,
    pub stats: MiningStats,
    pub hash_rate_display: String,
    pub difficulty: u32,
    pub max_nonce: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashRequest {
    pub height: u64,
    pub nonce: u64,
    #[serde(default)]
    pub data: String,
    pub difficulty: Option<u32>,
}

#[derive(Serialize)]
pub struct HashResponse {
    pub hash: String,
    pub valid: bool,
    pub difficulty: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainResponse {
    pub difficulty: u32,
    pub valid: bool,
    pub blocks: Vec<ChainBlockView>,
}

#[derive(Serialize)]
pub struct ChainBlockView {
    #[serde(flatten)]
    pub block: DemoBlock,
    pub signed: bool,
}

#[derive(Deserialize)]
pub struct EditBlockRequest {
    pub data: Option<String>,
    pub nonce: Option<u64>,
}

/* ---------- Consensus API Models ---------- */

#[derive(Deserialize)]
pub struct SelectRequest {
    /// Draw from these instead of the shared pool; nothing is logged.
    pub validators: Option<Vec<Validator>>,
    pub seed: Option<u64>,
}

#[derive(Serialize)]
pub struct SelectResponse {
    pub selected: Option<Validator>,
    pub record: Option<SelectionRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolResponse {
    pub validators: Vec<Validator>,
    pub total_stake: f64,
    pub log: Vec<SelectionRecord>,
}

#[derive(Deserialize)]
pub struct StakeRequest {
    pub id: String,
    pub amount: f64,
}

#[derive(Deserialize)]
pub struct BallotRequest {
    pub voter: String,
    pub stake: f64,
    pub candidate: String,
}

#[derive(Deserialize)]
pub struct ElectRequest {
    pub candidates: Vec<String>,
    #[serde(default)]
    pub ballots: Vec<BallotRequest>,
    pub seats: usize,
}

#[derive(Serialize)]
pub struct ElectResponse {
    pub producers: Vec<DelegateTally>,
    pub tally: Vec<DelegateTally>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BftRequest {
    pub nodes: usize,
    #[serde(default)]
    pub faulty: Vec<usize>,
    pub random_faults: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BftResponse {
    pub outcome: crate::consensus::Phase,
    pub fault_tolerance: usize,
    pub quorum: usize,
    pub faulty: Vec<usize>,
    pub trace: Vec<StepRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PohRequest {
    pub seed: String,
    #[serde(default)]
    pub ticks_between: usize,
    #[serde(default)]
    pub events: Vec<String>,
}

#[derive(Serialize)]
pub struct PohResponse {
    pub entries: Vec<PohEntry>,
    pub tip: String,
    pub verified: bool,
}

/* ---------- Access API Models ---------- */

#[derive(Deserialize)]
pub struct AccessRequest {
    pub permission: Permission,
    pub plan: PlanTier,
    pub fallback: Option<String>,
}

#[derive(Serialize)]
pub struct AccessResponse {
    pub decision: AccessDecision,
    pub render: Gated<Permission>,
}

#[derive(Deserialize)]
pub struct LimitRequest {
    pub plan: PlanTier,
    pub kind: LimitKind,
    pub used: u64,
}

#[derive(Serialize)]
pub struct PlanView {
    pub tier: PlanTier,
    pub permissions: Vec<Permission>,
    pub limits: PlanLimits,
}

/* ---------- Preference API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct TabPreference {
    pub tab: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchQuery {
    pub timeout_ms: Option<u64>,
}

#[derive(Serialize)]
pub struct TabChange {
    pub tab: String,
    pub changed: bool,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub enabled: bool,
}
