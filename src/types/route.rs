//! Route classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The access tier a request path falls into.
///
/// Classification is a pure function of the path and the
/// [`PolicyTable`](crate::policy::PolicyTable). When a path matches more than one
/// list, the precedence is `Public > AdminProtected > DashboardProtected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// Reachable without a credential (sign-in, sign-up, password recovery).
    Public,
    /// Admin area; requires an admin-tier role.
    AdminProtected,
    /// Dashboard area; requires a dashboard-tier role.
    DashboardProtected,
    /// Matches no list. Needs a credential but no particular role.
    Unclassified,
}

impl RouteClass {
    /// Returns `true` for the two role-protected tiers.
    pub fn is_protected(&self) -> bool {
        matches!(self, RouteClass::AdminProtected | RouteClass::DashboardProtected)
    }

    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Public => "public",
            RouteClass::AdminProtected => "admin",
            RouteClass::DashboardProtected => "dashboard",
            RouteClass::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
