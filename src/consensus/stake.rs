use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DemoError, DemoResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    pub id: String,
    pub stake: f64,
}

impl Validator {
    pub fn new(id: impl Into<String>, stake: f64) -> Self {
        Self {
            id: id.into(),
            stake,
        }
    }
}

/// Draw one validator with probability proportional to its stake.
///
/// A uniform value in `[0, total)` is compared against running sums in list
/// order. Returns `None` when the list is empty or total stake is zero.
pub fn select_weighted<'a, R: Rng + ?Sized>(
    validators: &'a [Validator],
    rng: &mut R,
) -> Option<&'a Validator> {
    let total: f64 = validators.iter().map(|v| v.stake.max(0.0)).sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }

    let draw = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for v in validators {
        cumulative += v.stake.max(0.0);
        if draw < cumulative {
            return Some(v);
        }
    }
    // float rounding can leave `draw` a hair above the final sum
    validators.iter().rev().find(|v| v.stake > 0.0)
}

/// One entry in the append-only selection log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub round: u64,
    pub validator_id: String,
    pub stake: f64,
    /// Stake share of the selected validator at draw time, in `[0, 1]`.
    pub share: f64,
}

/// Validator set for the proof-of-stake demo.
#[derive(Debug, Default)]
pub struct StakePool {
    validators: Vec<Validator>,
    log: Vec<SelectionRecord>,
    round: u64,
}

impl StakePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validators(validators: Vec<Validator>) -> DemoResult<Self> {
        let mut pool = Self::new();
        for v in validators {
            pool.add_validator(v)?;
        }
        Ok(pool)
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn log(&self) -> &[SelectionRecord] {
        &self.log
    }

    pub fn total_stake(&self) -> f64 {
        self.validators.iter().map(|v| v.stake).sum()
    }

    pub fn add_validator(&mut self, validator: Validator) -> DemoResult<()> {
        check_amount(validator.stake)?;
        if self.validators.iter().any(|v| v.id == validator.id) {
            return Err(DemoError::Conflict(format!(
                "validator {} already exists",
                validator.id
            )));
        }
        self.validators.push(validator);
        Ok(())
    }

    fn find_mut(&mut self, id: &str) -> DemoResult<&mut Validator> {
        self.validators
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| DemoError::NotFound(format!("validator {id}")))
    }

    pub fn stake(&mut self, id: &str, amount: f64) -> DemoResult<f64> {
        check_amount(amount)?;
        let v = self.find_mut(id)?;
        v.stake += amount;
        Ok(v.stake)
    }

    pub fn unstake(&mut self, id: &str, amount: f64) -> DemoResult<f64> {
        check_amount(amount)?;
        let v = self.find_mut(id)?;
        if amount > v.stake {
            return Err(DemoError::InvalidInput(format!(
                "cannot unstake {amount} from {id}: only {} staked",
                v.stake
            )));
        }
        v.stake -= amount;
        Ok(v.stake)
    }

    /// Draw the next validator and append it to the log.
    pub fn select<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&SelectionRecord> {
        let total = self.total_stake();
        let chosen = select_weighted(&self.validators, rng)?.clone();
        self.round += 1;
        debug!(
            "POS - round={} selected={} stake={}",
            self.round, chosen.id, chosen.stake
        );
        self.log.push(SelectionRecord {
            round: self.round,
            share: chosen.stake / total,
            validator_id: chosen.id,
            stake: chosen.stake,
        });
        self.log.last()
    }
}

fn check_amount(amount: f64) -> DemoResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(DemoError::InvalidInput(format!(
            "stake must be a non-negative number, got {amount}"
        )));
    }
    Ok(())
}
