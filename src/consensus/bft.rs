//! Single-round PBFT walk-through: pre-prepare, prepare, commit.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DemoError, DemoResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    PrePrepare,
    Prepare,
    Commit,
    Decided,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Decided | Phase::Failed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BftNode {
    pub id: usize,
    pub faulty: bool,
}

/// What happened on one `step()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub phase: Phase,
    pub votes: usize,
    pub quorum: usize,
    pub note: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BftRound {
    nodes: Vec<BftNode>,
    leader: usize,
    phase: Phase,
    trace: Vec<StepRecord>,
}

impl BftRound {
    /// `faulty` lists node ids that withhold their votes. Node 0 leads.
    pub fn new(n: usize, faulty: &[usize]) -> DemoResult<Self> {
        if n == 0 {
            return Err(DemoError::InvalidInput("need at least one node".into()));
        }
        if let Some(bad) = faulty.iter().find(|&&id| id >= n) {
            return Err(DemoError::InvalidInput(format!(
                "faulty node {bad} out of range 0..{n}"
            )));
        }
        let nodes = (0..n)
            .map(|id| BftNode {
                id,
                faulty: faulty.contains(&id),
            })
            .collect();
        Ok(Self {
            nodes,
            leader: 0,
            phase: Phase::Idle,
            trace: Vec::new(),
        })
    }

    /// Mark `faulty_count` distinct nodes as faulty at random.
    pub fn with_random_faults<R: Rng + ?Sized>(
        n: usize,
        faulty_count: usize,
        rng: &mut R,
    ) -> DemoResult<Self> {
        if faulty_count > n {
            return Err(DemoError::InvalidInput(format!(
                "cannot mark {faulty_count} of {n} nodes faulty"
            )));
        }
        let faulty = rand::seq::index::sample(rng, n, faulty_count).into_vec();
        Self::new(n, &faulty)
    }

    pub fn nodes(&self) -> &[BftNode] {
        &self.nodes
    }

    pub fn trace(&self) -> &[StepRecord] {
        &self.trace
    }

    /// Faults tolerated: `f = (n - 1) / 3`.
    pub fn fault_tolerance(&self) -> usize {
        (self.nodes.len() - 1) / 3
    }

    /// Matching votes needed: `2f + 1`.
    pub fn quorum(&self) -> usize {
        2 * self.fault_tolerance() + 1
    }

    fn honest_votes(&self) -> usize {
        self.nodes.iter().filter(|n| !n.faulty).count()
    }

    fn record(&mut self, phase: Phase, votes: usize, note: impl Into<String>) {
        let quorum = self.quorum();
        self.phase = phase;
        self.trace.push(StepRecord {
            phase,
            votes,
            quorum,
            note: note.into(),
        });
    }

    /// Advance one phase. Terminal phases do not move.
    pub fn step(&mut self) -> Phase {
        let quorum = self.quorum();
        match self.phase {
            Phase::Idle => {
                if self.nodes[self.leader].faulty {
                    self.record(Phase::Failed, 0, "leader is faulty, no proposal");
                } else {
                    self.record(Phase::PrePrepare, 1, "leader broadcast proposal");
                }
            }
            Phase::PrePrepare => {
                let votes = self.honest_votes();
                if votes >= quorum {
                    self.record(Phase::Prepare, votes, "prepare quorum reached");
                } else {
                    self.record(Phase::Failed, votes, "prepare quorum missed");
                }
            }
            Phase::Prepare => {
                let votes = self.honest_votes();
                if votes >= quorum {
                    self.record(Phase::Commit, votes, "commit quorum reached");
                } else {
                    self.record(Phase::Failed, votes, "commit quorum missed");
                }
            }
            Phase::Commit => {
                let votes = self.honest_votes();
                self.record(Phase::Decided, votes, "value decided");
            }
            Phase::Decided | Phase::Failed => {}
        }
        debug!("BFT - phase={:?} quorum={}", self.phase, quorum);
        self.phase
    }

    /// Step until `Decided` or `Failed`.
    pub fn run(&mut self) -> Phase {
        while !self.phase.is_terminal() {
            self.step();
        }
        self.phase
    }
}
