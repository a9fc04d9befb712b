use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{DemoError, DemoResult};

/// Vote total for one delegate candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegateTally {
    pub candidate: String,
    pub votes: f64,
    pub voters: usize,
}

/// Stake-weighted delegate voting. Each voter backs one candidate; a later
/// ballot from the same voter replaces the earlier one.
#[derive(Debug, Default)]
pub struct DelegateElection {
    candidates: BTreeSet<String>,
    // voter -> (candidate, stake)
    ballots: BTreeMap<String, (String, f64)>,
}

impl DelegateElection {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            ballots: BTreeMap::new(),
        }
    }

    pub fn cast_vote(&mut self, voter: &str, stake: f64, candidate: &str) -> DemoResult<()> {
        if !stake.is_finite() || stake < 0.0 {
            return Err(DemoError::InvalidInput(format!(
                "vote stake must be non-negative, got {stake}"
            )));
        }
        if !self.candidates.contains(candidate) {
            return Err(DemoError::NotFound(format!("candidate {candidate}")));
        }
        self.ballots
            .insert(voter.to_string(), (candidate.to_string(), stake));
        Ok(())
    }

    /// All candidates ordered by votes (desc), ties by candidate id.
    pub fn tally(&self) -> Vec<DelegateTally> {
        let mut totals: BTreeMap<&str, (f64, usize)> = self
            .candidates
            .iter()
            .map(|c| (c.as_str(), (0.0, 0)))
            .collect();
        for (candidate, stake) in self.ballots.values() {
            if let Some(entry) = totals.get_mut(candidate.as_str()) {
                entry.0 += stake;
                entry.1 += 1;
            }
        }

        let mut out: Vec<DelegateTally> = totals
            .into_iter()
            .map(|(candidate, (votes, voters))| DelegateTally {
                candidate: candidate.to_string(),
                votes,
                voters,
            })
            .collect();
        out.sort_by(|a, b| {
            b.votes
                .partial_cmp(&a.votes)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.candidate.cmp(&b.candidate))
        });
        out
    }

    /// The `n` active block producers.
    pub fn elect(&self, n: usize) -> Vec<DelegateTally> {
        let mut tally = self.tally();
        tally.truncate(n);
        tally
    }
}
