//! Shared proptest generators for bootstrap domain types.

use mongodb::bson::{Bson, Document};
use proptest::prelude::*;
use testbed_bootstrap::{Principal, Role, RoleGrant, SeedScript, SeedStep};

/// Generate partition names, biased toward the seeded ones.
pub fn partition_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("mydb".to_string()),
        Just("embulk_test".to_string()),
        "[a-z][a-z0-9_]{2,12}",
    ]
}

/// Generate valid usernames.
pub fn username_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{3,15}"
}

/// Generate passwords.
pub fn password_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{8,32}"
}

/// Generate certificate distinguished names.
pub fn certificate_subject_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9.-]{3,24}".prop_map(|cn| format!("CN={cn}"))
}

/// Generate grantable roles.
pub fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::ReadWrite), Just(Role::UserAdminAnyDatabase)]
}

/// Generate role grants.
pub fn role_grant_strategy() -> impl Strategy<Value = RoleGrant> {
    (role_strategy(), partition_strategy())
        .prop_map(|(role, partition)| RoleGrant::new(role, partition))
}

/// Generate local principals with one to three grants.
pub fn local_principal_strategy() -> impl Strategy<Value = Principal> {
    (
        username_strategy(),
        password_strategy(),
        prop::collection::vec((role_strategy(), partition_strategy()), 1..4),
    )
        .prop_map(|(username, password, grants)| {
            grants.into_iter().fold(
                Principal::local(username, password),
                |principal, (role, partition)| principal.with_role(role, partition),
            )
        })
}

/// Generate certificate principals with one to three grants.
pub fn x509_principal_strategy() -> impl Strategy<Value = Principal> {
    (
        certificate_subject_strategy(),
        prop::collection::vec((role_strategy(), partition_strategy()), 1..4),
    )
        .prop_map(|(subject, grants)| {
            grants
                .into_iter()
                .fold(Principal::x509(subject), |principal, (role, partition)| {
                    principal.with_role(role, partition)
                })
        })
}

/// Generate small flat documents with string keys and integer values.
pub fn document_strategy() -> impl Strategy<Value = Document> {
    prop::collection::btree_map("[a-z]{1,8}", any::<i32>(), 1..5).prop_map(|fields| {
        fields
            .into_iter()
            .map(|(key, value)| (key, Bson::Int32(value)))
            .collect()
    })
}

/// Build a script of user-creation steps, one per username, on a partition.
#[must_use]
pub fn user_script(partition: &str, usernames: &[String]) -> SeedScript {
    usernames
        .iter()
        .fold(SeedScript::new("generated"), |script, username| {
            script.with_step(SeedStep::CreateUser {
                database: partition.to_string(),
                principal: Principal::local(username, "generated_pw")
                    .with_role(Role::ReadWrite, partition),
                write_concern: None,
            })
        })
}
