//! End-to-end seed-script tests over the mock administrative executor.
//!
//! These verify the observable outcomes of a bootstrap run: which
//! principals exist on which partitions afterwards, which role grants they
//! carry, what the sample collection holds, and what a re-run does.

use mongodb::bson::from_document;
use test_utils::fixtures::{SeedCredentials, expected_product};
use test_utils::generators::{user_script, username_strategy};
use test_utils::mocks::MockAdminCommands;
use testbed_bootstrap::script::{
    ADMIN_PARTITION, APP_PARTITION, CONNECTOR_PARTITION, SAMPLE_COLLECTION,
};
use testbed_bootstrap::tracing_config::{TracingConfig, init_tracing};
use testbed_bootstrap::{EXTERNAL_AUTH_DB, Product, SeedScript, apply};

use proptest::prelude::*;

fn init() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| init_tracing(&TracingConfig::default().with_log_level("warn")));
}

#[tokio::test]
async fn baseline_registers_application_user() {
    init();
    let mock = MockAdminCommands::new();
    let credentials = SeedCredentials::application();

    let summary = apply(&mock, &SeedScript::baseline()).await.unwrap();

    assert_eq!(summary.users_created, 2);
    assert_eq!(summary.documents_inserted, 0);

    let user = mock
        .user(APP_PARTITION, &credentials.username)
        .await
        .expect("application user registered");
    assert_eq!(user.get_str("pwd"), Ok(credentials.password.as_str()));
    assert_eq!(
        mock.roles_of(APP_PARTITION, &credentials.username).await,
        [("readWrite".to_string(), APP_PARTITION.to_string())]
    );
}

#[tokio::test]
async fn baseline_grants_certificate_principal() {
    init();
    let mock = MockAdminCommands::new();

    apply(&mock, &SeedScript::baseline()).await.unwrap();

    let user = mock
        .user(EXTERNAL_AUTH_DB, "CN=localhost")
        .await
        .expect("certificate principal registered");
    assert!(!user.contains_key("pwd"));
    let write_concern = user.get_document("writeConcern").expect("write concern present");
    assert_eq!(
        write_concern,
        &mongodb::bson::doc! { "w": "majority", "wtimeout": 5000_i64 }
    );
    assert_eq!(
        mock.roles_of(EXTERNAL_AUTH_DB, "CN=localhost").await,
        [
            ("readWrite".to_string(), APP_PARTITION.to_string()),
            (
                "userAdminAnyDatabase".to_string(),
                ADMIN_PARTITION.to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn extended_seeds_second_partition_and_sample_document() {
    init();
    let mock = MockAdminCommands::new();
    let credentials = SeedCredentials::application();

    let summary = apply(&mock, &SeedScript::extended()).await.unwrap();

    assert_eq!(summary.users_created, 3);
    assert_eq!(summary.documents_inserted, 1);

    // The application principal exists on both partitions.
    assert_eq!(
        mock.users_in(APP_PARTITION).await,
        [credentials.username.clone()]
    );
    assert_eq!(
        mock.users_in(CONNECTOR_PARTITION).await,
        [credentials.username.clone()]
    );
    assert_eq!(
        mock.roles_of(CONNECTOR_PARTITION, &credentials.username).await,
        [("readWrite".to_string(), CONNECTOR_PARTITION.to_string())]
    );

    // Exactly one document, equal to the sample record.
    let documents = mock.documents(CONNECTOR_PARTITION, SAMPLE_COLLECTION).await;
    assert_eq!(documents, [expected_product()]);

    let product: Product = from_document(documents.into_iter().next().unwrap()).unwrap();
    assert_eq!(product, Product::sample());
}

#[tokio::test]
async fn extended_certificate_grants_cover_both_partitions() {
    init();
    let mock = MockAdminCommands::new();

    apply(&mock, &SeedScript::extended()).await.unwrap();

    assert_eq!(
        mock.roles_of(EXTERNAL_AUTH_DB, "CN=localhost").await,
        [
            ("readWrite".to_string(), APP_PARTITION.to_string()),
            ("readWrite".to_string(), CONNECTOR_PARTITION.to_string()),
            (
                "userAdminAnyDatabase".to_string(),
                ADMIN_PARTITION.to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn reapplying_fails_on_duplicate_principal() {
    init();
    let mock = MockAdminCommands::new();

    apply(&mock, &SeedScript::baseline()).await.unwrap();
    let issued_first_run = mock.issued_count().await;

    let err = apply(&mock, &SeedScript::baseline()).await.unwrap_err();

    assert!(err.is_duplicate_principal());
    // The failing step aborted the run: exactly one further command was
    // attempted, and nothing from the first run was rolled back.
    assert_eq!(mock.issued_count().await, issued_first_run + 1);
    assert_eq!(
        mock.users_in(APP_PARTITION).await,
        [SeedCredentials::application().username]
    );
}

#[tokio::test]
async fn empty_script_applies_nothing() {
    init();
    let mock = MockAdminCommands::new();

    let summary = apply(&mock, &SeedScript::new("empty")).await.unwrap();

    assert_eq!(summary.users_created, 0);
    assert_eq!(summary.documents_inserted, 0);
    assert_eq!(mock.issued_count().await, 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Steps are issued strictly in declared order, whatever the script.
    #[test]
    fn prop_steps_issue_in_declared_order(
        usernames in prop::collection::hash_set(username_strategy(), 1..6),
    ) {
        let usernames: Vec<String> = usernames.into_iter().collect();
        let script = user_script("mydb", &usernames);

        tokio_test::block_on(async {
            let mock = MockAdminCommands::new();
            apply(&mock, &script).await.unwrap();

            let issued: Vec<String> = mock
                .issued()
                .await
                .iter()
                .map(|entry| entry.command.get_str("createUser").unwrap_or("?").to_string())
                .collect();
            assert_eq!(issued, usernames);
        });
    }
}
