pub mod gate;
pub mod plan;

pub use gate::{AccessDecision, Gated, MemoryRecorder, PermissionGate};
pub use plan::{LimitKind, Permission, PlanLimits, PlanTier};
