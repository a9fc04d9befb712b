use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{LimitKind, Permission, PlanTier};
use crate::error::DemoResult;

/// Outcome of a permission or limit check. Denial is a normal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: String,
    /// Cheapest tier that would allow the request, when denied.
    pub required_tier: Option<PlanTier>,
}

pub fn check(permission: Permission, plan: PlanTier) -> AccessDecision {
    if plan.grants(permission) {
        return AccessDecision {
            allowed: true,
            reason: format!("{} plan includes {permission}", plan.display_name()),
            required_tier: None,
        };
    }
    let required = PlanTier::cheapest_with(permission);
    let reason = match required {
        Some(tier) => format!(
            "{permission} requires the {} plan or higher",
            tier.display_name()
        ),
        None => format!("{permission} is not available on any plan"),
    };
    AccessDecision {
        allowed: false,
        reason,
        required_tier: required,
    }
}

/// Whether `used` more units of `kind` stay within the plan's cap.
pub fn within_limit(plan: PlanTier, kind: LimitKind, used: u64) -> AccessDecision {
    match plan.limits().limit(kind) {
        None => AccessDecision {
            allowed: true,
            reason: "unlimited".to_string(),
            required_tier: None,
        },
        Some(max) if used < max => AccessDecision {
            allowed: true,
            reason: format!("{} of {max} used", used),
            required_tier: None,
        },
        Some(max) => AccessDecision {
            allowed: false,
            reason: format!("limit of {max} reached on the {} plan", plan.display_name()),
            required_tier: PlanTier::ALL
                .into_iter()
                .find(|t| *t > plan && t.limits().limit(kind).is_none_or(|m| m > used)),
        },
    }
}

/// A gate check, as handed to the usage recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub permission: Permission,
    pub plan: PlanTier,
    pub allowed: bool,
}

/// Sink for usage metrics. Failures never affect the gate decision.
pub trait UsageRecorder: Send + Sync {
    fn record(&self, event: &UsageEvent) -> DemoResult<()>;
}

/// Most recent events kept by [`MemoryRecorder`]; older ones only count.
pub const RECENT_USAGE_CAP: usize = 50;

/// Totals plus the latest events, newest last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageSummary {
    pub total: u64,
    pub denied: u64,
    pub recent: Vec<UsageEvent>,
}

#[derive(Debug, Default)]
struct UsageLog {
    total: u64,
    denied: u64,
    recent: VecDeque<UsageEvent>,
}

/// In-process usage metric: running counts and a bounded window of events.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    log: Mutex<UsageLog>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> UsageSummary {
        let log = self.log.lock().expect("mutex poisoned");
        UsageSummary {
            total: log.total,
            denied: log.denied,
            recent: log.recent.iter().cloned().collect(),
        }
    }
}

impl UsageRecorder for MemoryRecorder {
    fn record(&self, event: &UsageEvent) -> DemoResult<()> {
        let mut log = self.log.lock().expect("mutex poisoned");
        log.total += 1;
        if !event.allowed {
            log.denied += 1;
        }
        if log.recent.len() == RECENT_USAGE_CAP {
            log.recent.pop_front();
        }
        log.recent.push_back(event.clone());
        Ok(())
    }
}

/// Either the gated content or the text shown in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Gated<T> {
    Content(T),
    Fallback(String),
}

pub fn default_upgrade_prompt(decision: &AccessDecision) -> String {
    match decision.required_tier {
        Some(tier) => format!(
            "Upgrade to the {} plan to unlock this feature. ({})",
            tier.display_name(),
            decision.reason
        ),
        None => format!("This feature is unavailable. ({})", decision.reason),
    }
}

/// Decides between gated content and a fallback for the caller's plan.
#[derive(Clone, Default)]
pub struct PermissionGate {
    recorder: Option<Arc<dyn UsageRecorder>>,
}

impl PermissionGate {
    pub fn with_recorder(recorder: Arc<dyn UsageRecorder>) -> Self {
        Self {
            recorder: Some(recorder),
        }
    }

    pub fn check(&self, permission: Permission, plan: PlanTier) -> AccessDecision {
        let decision = check(permission, plan);
        if !decision.allowed {
            debug!("GATE - denied {permission} on {:?}: {}", plan, decision.reason);
        }
        if let Some(recorder) = &self.recorder {
            let event = UsageEvent {
                permission,
                plan,
                allowed: decision.allowed,
            };
            if let Err(e) = recorder.record(&event) {
                warn!("GATE - usage metric dropped: {e}");
            }
        }
        decision
    }

    /// Build `content` only when allowed; otherwise return `fallback` or
    /// the default upgrade prompt. The decision is made (and recorded) once.
    pub fn render<T>(
        &self,
        permission: Permission,
        plan: PlanTier,
        content: impl FnOnce() -> T,
        fallback: Option<String>,
    ) -> (AccessDecision, Gated<T>) {
        let decision = self.check(permission, plan);
        let out = if decision.allowed {
            Gated::Content(content())
        } else {
            Gated::Fallback(fallback.unwrap_or_else(|| default_upgrade_prompt(&decision)))
        };
        (decision, out)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Gated, MemoryRecorder, PermissionGate, RECENT_USAGE_CAP, UsageEvent, UsageRecorder,
        check, within_limit,
    };
    use crate::access::{LimitKind, Permission, PlanTier};
    use crate::error::{DemoError, DemoResult};
    use std::sync::Arc;

    struct BrokenRecorder;

    impl UsageRecorder for BrokenRecorder {
        fn record(&self, _event: &UsageEvent) -> DemoResult<()> {
            Err(DemoError::InvalidInput("metrics backend down".into()))
        }
    }

    #[test]
    fn free_plan_gets_upgrade_prompt_for_pos() {
        let gate = PermissionGate::default();
        let (decision, out) = gate.render(
            Permission::PosAccess,
            PlanTier::Free,
            || "staking demo",
            None,
        );
        assert!(!decision.allowed);
        match out {
            Gated::Fallback(text) => assert!(text.contains("Monthly")),
            Gated::Content(_) => panic!("free plan must not see pos demo"),
        }
    }

    #[test]
    fn custom_fallback_wins_and_content_is_not_built() {
        let gate = PermissionGate::default();
        let (_, out): (_, Gated<&str>) = gate.render(
            Permission::BftAccess,
            PlanTier::Monthly,
            || panic!("content must not be built"),
            Some("subscribe!".into()),
        );
        assert_eq!(out, Gated::Fallback("subscribe!".into()));
    }

    #[test]
    fn allowed_plan_renders_children() {
        let gate = PermissionGate::default();
        let (decision, out) = gate.render(Permission::PosAccess, PlanTier::Yearly, || 42, None);
        assert!(decision.allowed);
        assert_eq!(out, Gated::Content(42));
        assert!(check(Permission::PowAccess, PlanTier::Free).allowed);
    }

    #[test]
    fn usage_is_recorded_once_per_render_and_failures_ignored() {
        let recorder = Arc::new(MemoryRecorder::new());
        let gate = PermissionGate::with_recorder(recorder.clone());
        gate.render(Permission::PosAccess, PlanTier::Free, || (), None);
        gate.render(Permission::PosAccess, PlanTier::Lifetime, || (), None);
        let summary = recorder.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.denied, 1);
        assert!(!summary.recent[0].allowed);
        assert!(summary.recent[1].allowed);

        let broken = PermissionGate::with_recorder(Arc::new(BrokenRecorder));
        assert!(broken.check(Permission::PohAccess, PlanTier::Yearly).allowed);
    }

    #[test]
    fn recorder_keeps_a_bounded_window() {
        let recorder = MemoryRecorder::new();
        for i in 0..(RECENT_USAGE_CAP + 10) {
            let event = UsageEvent {
                permission: Permission::PowAccess,
                plan: PlanTier::Free,
                allowed: i % 2 == 0,
            };
            recorder.record(&event).unwrap();
        }
        let summary = recorder.summary();
        assert_eq!(summary.total, (RECENT_USAGE_CAP + 10) as u64);
        assert_eq!(summary.denied, 30);
        assert_eq!(summary.recent.len(), RECENT_USAGE_CAP);
        // oldest kept is event #10, which was allowed
        assert!(summary.recent[0].allowed);
    }

    #[test]
    fn usage_limits() {
        assert!(within_limit(PlanTier::Free, LimitKind::ArticleViews, 9).allowed);
        let denied = within_limit(PlanTier::Free, LimitKind::ArticleViews, 10);
        assert!(!denied.allowed);
        assert_eq!(denied.required_tier, Some(PlanTier::Monthly));
        assert!(within_limit(PlanTier::Lifetime, LimitKind::Exports, 1_000_000).allowed);
        assert_eq!(
            within_limit(PlanTier::Free, LimitKind::Exports, 0).required_tier,
            Some(PlanTier::Monthly)
        );
    }
}
