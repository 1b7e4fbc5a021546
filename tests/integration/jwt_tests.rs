//! The gate driven by real session tokens.

use anyhow::Result;
use http::header;
use storefront_gate::auth::{JwtConfig, JwtResolver};
use storefront_gate::{Decision, DecisionReason, Gate, GateRequest};
use test_case::test_case;

use crate::common::{expired_token, jwt_resolver, redirect, session_token, sign};

fn with_bearer(path: &str, token: &str) -> GateRequest {
    GateRequest::new(path).with_header(header::AUTHORIZATION, format!("Bearer {token}"))
}

fn with_cookie(path: &str, token: &str) -> GateRequest {
    GateRequest::new(path)
        .with_header(header::COOKIE, format!("theme=dark; next-auth.session-token={token}"))
}

#[test_case("/admin/users", Some("SUPERADMIN"), Decision::Allow ; "superadmin on admin")]
#[test_case("/admin/users", Some("STAKEHOLDER"), redirect("/dashboard") ; "stakeholder on admin")]
#[test_case("/admin/users", Some(" SUPERADMIN "), redirect("/dashboard") ; "padded superadmin on admin")]
#[test_case("/dashboard", Some("SUPERADMIN"), redirect("/admin/users") ; "superadmin landing")]
#[test_case("/dashboard", Some("ADMINISTRATOR"), Decision::Allow ; "administrator on dashboard")]
#[test_case("/admin", None, redirect("/dashboard") ; "token without role on admin")]
#[test_case("/dashboard", None, redirect("/auth/sign-in") ; "token without role on dashboard")]
#[tokio::test]
async fn test_signed_session(path: &str, role: Option<&str>, expected: Decision) -> Result<()> {
    let gate = Gate::default();
    let token = session_token(role)?;

    let bearer = gate.evaluate(&with_bearer(path, &token), &jwt_resolver()).await;
    let cookie = gate.evaluate(&with_cookie(path, &token), &jwt_resolver()).await;

    assert_eq!(bearer.decision(), &expected);
    assert_eq!(cookie.decision(), &expected);
    Ok(())
}

#[tokio::test]
async fn test_corrupt_token_redirects_to_sign_in() -> Result<()> {
    let gate = Gate::default();
    let mut token = session_token(Some("ADMINISTRATOR"))?;
    token.truncate(token.len() - 4);
    token.push_str("AAAA");

    let verdict = gate.evaluate(&with_cookie("/dashboard", &token), &jwt_resolver()).await;

    assert_eq!(verdict.decision(), &redirect("/auth/sign-in"));
    assert_eq!(verdict.reason(), DecisionReason::CredentialFault);
    Ok(())
}

#[tokio::test]
async fn test_expired_token_redirects_to_sign_in() -> Result<()> {
    let gate = Gate::default();
    let token = expired_token("SUPERADMIN")?;

    let verdict = gate.evaluate(&with_bearer("/admin/users", &token), &jwt_resolver()).await;

    assert_eq!(verdict.decision(), &redirect("/auth/sign-in"));
    assert_eq!(verdict.reason(), DecisionReason::CredentialFault);
    assert_eq!(gate.metrics().snapshot().credential_faults, 1);
    Ok(())
}

#[tokio::test]
async fn test_no_token_is_missing_credential() {
    let gate = Gate::default();
    let verdict = gate.evaluate(&GateRequest::new("/dashboard"), &jwt_resolver()).await;
    assert_eq!(verdict.reason(), DecisionReason::MissingCredential);
}

#[tokio::test]
async fn test_custom_role_claim() -> Result<()> {
    let resolver = JwtResolver::new(
        JwtConfig::builder()
            .secret(crate::common::SECRET)
            .role_claim("userRole")
            .build(),
    )?;
    let token = sign(&serde_json::json!({
        "sub": "user_9",
        "userRole": "STAKEHOLDER",
        "exp": jsonwebtoken::get_current_timestamp() + 600,
    }))?;

    let verdict = Gate::default().evaluate(&with_bearer("/dashboard", &token), &resolver).await;
    assert_eq!(verdict.decision(), &Decision::Allow);
    Ok(())
}
