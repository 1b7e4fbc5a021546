//! The ordered role rules applied to a resolved credential.

use super::{PolicyTable, Route};
use crate::{DecisionReason, Verdict};

/// Outcome of a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    /// The rule does not apply; try the next one.
    Continue,
    /// The rule produced the final verdict.
    Done(Verdict),
}

/// One role rule. Rules run in [`Rule::ORDER`]; the first `Done` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rule {
    AdminTier,
    SuperadminLanding,
    DashboardTier,
}

impl Rule {
    /// Admin before superadmin landing before dashboard.
    pub(crate) const ORDER: [Rule; 3] =
        [Rule::AdminTier, Rule::SuperadminLanding, Rule::DashboardTier];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Rule::AdminTier => "admin_tier",
            Rule::SuperadminLanding => "superadmin_landing",
            Rule::DashboardTier => "dashboard_tier",
        }
    }

    pub(crate) fn apply(self, table: &PolicyTable, route: &Route, role: Option<&str>) -> Step {
        let redirects = table.redirects();
        match self {
            Rule::AdminTier => {
                if table.admin().matches(route.path()) && !table.admin().permits(role) {
                    return Step::Done(Verdict::redirect(
                        &redirects.dashboard,
                        DecisionReason::AdminRoleRequired,
                        route.class(),
                    ));
                }
            },
            Rule::SuperadminLanding => {
                if table.is_landing(route.path()) && role == Some(table.superadmin_role()) {
                    return Step::Done(Verdict::redirect(
                        &redirects.admin_users,
                        DecisionReason::SuperadminLanding,
                        route.class(),
                    ));
                }
            },
            Rule::DashboardTier => {
                if table.dashboard().matches(route.path()) && !table.dashboard().permits(role) {
                    return Step::Done(Verdict::redirect(
                        &redirects.sign_in,
                        DecisionReason::DashboardRoleRequired,
                        route.class(),
                    ));
                }
            },
        }
        Step::Continue
    }
}

/// Runs every rule in order, allowing when none fires.
pub(crate) fn evaluate(table: &PolicyTable, route: &Route, role: Option<&str>) -> Verdict {
    for rule in Rule::ORDER {
        if let Step::Done(verdict) = rule.apply(table, route, role) {
            tracing::trace!(rule = rule.name(), reason = %verdict.reason(), "rule matched");
            return verdict;
        }
    }
    Verdict::allow(DecisionReason::Authorized, route.class())
}
