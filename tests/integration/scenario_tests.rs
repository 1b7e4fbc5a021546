//! End-to-end decisions for the storefront policy.

use std::time::Duration;

use storefront_gate::auth::FaultKind;
use storefront_gate::testing::{PendingResolver, ScriptedResolver};
use storefront_gate::{
    Decision, DecisionReason, Gate, GateRequest, Resolution, RouteMatcher,
};
use test_case::test_case;

use crate::common::redirect;

fn absent() -> Resolution {
    Resolution::Absent
}

fn role(role: &str) -> Resolution {
    Resolution::role(role)
}

#[test_case("/auth/sign-in", absent(), Decision::Allow, DecisionReason::PublicPath ; "sign in without credential")]
#[test_case("/admin/users", role("STAKEHOLDER"), redirect("/dashboard"), DecisionReason::AdminRoleRequired ; "stakeholder on admin")]
#[test_case("/admin/users", role("SUPERADMIN"), Decision::Allow, DecisionReason::Authorized ; "superadmin on admin")]
#[test_case("/dashboard", role("SUPERADMIN"), redirect("/admin/users"), DecisionReason::SuperadminLanding ; "superadmin on dashboard")]
#[test_case("/dashboard", role("ADMINISTRATOR"), Decision::Allow, DecisionReason::Authorized ; "administrator on dashboard")]
#[test_case("/dashboard", absent(), redirect("/auth/sign-in"), DecisionReason::MissingCredential ; "dashboard without credential")]
#[test_case("/dashboard", Resolution::fault(FaultKind::Malformed, "corrupt"), redirect("/auth/sign-in"), DecisionReason::CredentialFault ; "dashboard with corrupt credential")]
#[test_case("/auth/sign-in/../../admin/users", absent(), redirect("/auth/sign-in"), DecisionReason::MissingCredential ; "dot segments do not reach public")]
#[test_case("/admin/users", Resolution::Resolved(storefront_gate::Credential::new()), redirect("/dashboard"), DecisionReason::AdminRoleRequired ; "credential without role on admin")]
#[test_case("/", role("SUPERADMIN"), redirect("/admin/users"), DecisionReason::SuperadminLanding ; "superadmin on root")]
#[test_case("/dashboard/orders", role("SUPERADMIN"), redirect("/auth/sign-in"), DecisionReason::DashboardRoleRequired ; "superadmin on nested dashboard")]
#[test_case("/dashboard", role("CUSTOMER"), redirect("/auth/sign-in"), DecisionReason::DashboardRoleRequired ; "customer on dashboard")]
#[test_case("/api/admin/orders", role("ADMINISTRATOR"), redirect("/dashboard"), DecisionReason::AdminRoleRequired ; "administrator on admin api")]
#[test_case("/products/7", role("CUSTOMER"), Decision::Allow, DecisionReason::Authorized ; "customer on storefront")]
#[test_case("/auth/forgot-password", Resolution::fault(FaultKind::Expired, "old"), Decision::Allow, DecisionReason::PublicPath ; "public ignores faults")]
#[tokio::test]
async fn test_storefront_scenarios(
    path: &str,
    resolution: Resolution,
    expected: Decision,
    reason: DecisionReason,
) {
    let gate = Gate::default();
    let resolver = ScriptedResolver::new(resolution);

    let verdict = gate.evaluate(&GateRequest::new(path), &resolver).await;

    assert_eq!(verdict.decision(), &expected, "{path}");
    assert_eq!(verdict.reason(), reason, "{path}");
}

#[tokio::test(start_paused = true)]
async fn test_resolver_that_never_answers_redirects_after_timeout() {
    let gate = Gate::default();
    let started = tokio::time::Instant::now();

    let verdict = gate.evaluate(&GateRequest::new("/dashboard"), &PendingResolver).await;

    assert_eq!(verdict.decision(), &redirect("/auth/sign-in"));
    assert_eq!(verdict.reason(), DecisionReason::ResolutionTimeout);
    assert!(started.elapsed() >= Duration::from_secs(2));
}

#[test]
fn test_static_assets_never_reach_the_gate() {
    let matcher = RouteMatcher::default();
    assert!(!matcher.matches("/_next/static/chunk.js"));
    assert!(matcher.matches("/dashboard"));
}

#[tokio::test]
async fn test_public_path_never_resolves_credential() {
    let gate = Gate::default();
    let resolver = ScriptedResolver::role("SUPERADMIN");

    for path in ["/auth/sign-in", "/auth/sign-up", "/api/auth/signin", "/api/auth/signup"] {
        gate.evaluate(&GateRequest::new(path), &resolver).await;
    }

    assert_eq!(resolver.call_count(), 0);
}

#[tokio::test]
async fn test_metrics_follow_decisions() {
    let gate = Gate::default();

    gate.evaluate(&GateRequest::new("/auth/sign-in"), &ScriptedResolver::absent()).await;
    gate.evaluate(&GateRequest::new("/dashboard"), &ScriptedResolver::absent()).await;
    gate.evaluate(&GateRequest::new("/dashboard"), &ScriptedResolver::fault(FaultKind::Expired)).await;
    gate.evaluate(&GateRequest::new("/dashboard"), &ScriptedResolver::role("SUPERADMIN")).await;

    let snapshot = gate.metrics().snapshot();
    assert_eq!(snapshot.evaluations, 4);
    assert_eq!(snapshot.allowed, 1);
    assert_eq!(snapshot.redirected, 3);
    assert_eq!(snapshot.missing_credential, 1);
    assert_eq!(snapshot.credential_faults, 1);
    assert_eq!(snapshot.superadmin_landings, 1);
}
