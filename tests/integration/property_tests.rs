//! Property tests for the decision function.
//!
//! These run against [`PolicyTable::decide`], the synchronous core that
//! `Gate::evaluate` delegates to once the credential is resolved.

use proptest::prelude::*;
use storefront_gate::auth::FaultKind;
use storefront_gate::policy::PolicyTable;
use storefront_gate::{Credential, Decision, Resolution};

use crate::common::{ROLES, redirect};

const PUBLIC: [&str; 5] =
    ["/auth/sign-in", "/auth/sign-up", "/auth/forgot-password", "/api/auth/signin", "/api/auth/signup"];
const ADMIN: [&str; 3] = ["/admin", "/api/admin", "/admin/users"];

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9-]{1,12}",
        Just(".".to_string()),
        Just("..".to_string()),
        Just("%2e%2e".to_string()),
        Just(String::new()),
    ]
}

fn any_path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 0..6).prop_map(|segments| format!("/{}", segments.join("/")))
}

fn suffix() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z0-9-]{1,10}", 0..3).prop_map(|segments| {
        segments.iter().map(|s| format!("/{s}")).collect::<String>()
    })
}

fn any_role() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        prop::sample::select(ROLES.to_vec()).prop_map(|r| Some(r.to_string())),
        "[A-Z_]{1,12}".prop_map(Some),
    ]
}

fn any_resolution() -> impl Strategy<Value = Resolution> {
    prop_oneof![
        Just(Resolution::Absent),
        prop::sample::select(vec![
            FaultKind::Malformed,
            FaultKind::Expired,
            FaultKind::InvalidSignature,
            FaultKind::InvalidClaims,
            FaultKind::Unavailable,
            FaultKind::Timeout,
        ])
        .prop_map(|kind| Resolution::fault(kind, "generated")),
        any_role().prop_map(|role| {
            let credential = Credential::new().with_subject("user_1");
            Resolution::Resolved(match role {
                Some(role) => credential.with_role(role),
                None => credential,
            })
        }),
    ]
}

proptest! {
    #[test]
    fn prop_public_paths_always_allow(
        public in prop::sample::select(PUBLIC.to_vec()),
        suffix in suffix(),
        resolution in any_resolution(),
    ) {
        let path = format!("{public}{suffix}");
        let verdict = PolicyTable::default().decide(&path, &resolution);
        prop_assert_eq!(verdict.decision(), &Decision::Allow);
    }

    #[test]
    fn prop_unresolved_credentials_fail_closed(
        path in any_path(),
        fault in prop::bool::ANY,
    ) {
        let table = PolicyTable::default();
        prop_assume!(!table.route(&path).is_public());

        let resolution = if fault {
            Resolution::fault(FaultKind::InvalidSignature, "generated")
        } else {
            Resolution::Absent
        };
        let verdict = table.decide(&path, &resolution);
        prop_assert_eq!(verdict.decision(), &redirect("/auth/sign-in"));
    }

    #[test]
    fn prop_admin_paths_need_admin_role(
        admin in prop::sample::select(ADMIN.to_vec()),
        suffix in suffix(),
        role in any_role(),
    ) {
        let path = format!("{admin}{suffix}");
        let credential = match &role {
            Some(role) => Credential::for_role(role.as_str()),
            None => Credential::new(),
        };
        let verdict = PolicyTable::default().decide(&path, &Resolution::Resolved(credential));

        if role.as_deref() == Some("SUPERADMIN") {
            prop_assert_eq!(verdict.decision(), &Decision::Allow);
        } else {
            prop_assert_eq!(verdict.decision(), &redirect("/dashboard"));
        }
    }

    #[test]
    fn prop_superadmin_landing_wins(path in prop::sample::select(vec!["/", "/dashboard", "/dashboard/", "//"])) {
        let verdict = PolicyTable::default().decide(path, &Resolution::role("SUPERADMIN"));
        prop_assert_eq!(verdict.decision(), &redirect("/admin/users"));
    }

    #[test]
    fn prop_dashboard_gate(suffix in "(/[a-z0-9-]{1,10}){1,3}", role in any_role()) {
        let path = format!("/dashboard{suffix}");
        let resolution = match &role {
            Some(role) => Resolution::role(role.as_str()),
            None => Resolution::Resolved(Credential::new()),
        };
        let verdict = PolicyTable::default().decide(&path, &resolution);

        match role.as_deref() {
            Some("ADMINISTRATOR") | Some("STAKEHOLDER") => {
                prop_assert_eq!(verdict.decision(), &Decision::Allow);
            },
            _ => prop_assert_eq!(verdict.decision(), &redirect("/auth/sign-in")),
        }
    }

    #[test]
    fn prop_every_input_gets_one_decision(path in ".{0,64}", resolution in any_resolution()) {
        let table = PolicyTable::default();
        let verdict = table.decide(&path, &resolution);

        let targets = [
            &table.redirects().sign_in,
            &table.redirects().dashboard,
            &table.redirects().admin_users,
        ];
        match verdict.decision() {
            Decision::Allow => {},
            Decision::Redirect(target) => prop_assert!(targets.contains(&target)),
        }

        // Without a verified credential only public paths are allowed.
        if resolution.credential().is_none() {
            prop_assert_eq!(verdict.decision().is_allowed(), table.route(&path).is_public());
        }
    }
}
