//! State machines behind the consensus demos.

pub mod bft;
pub mod dpos;
pub mod poh;
pub mod stake;

pub use bft::{BftRound, Phase};
pub use dpos::{DelegateElection, DelegateTally};
pub use poh::{PohEntry, PohTimeline};
pub use stake::{SelectionRecord, StakePool, Validator, select_weighted};
