//! Bulk "save all" under both failure policies.

use dancemode_client::api::{BulkPolicy, StepOutcome};
use dancemode_core::models::{BulkResource, SaveAllBatch};
use dancemode_integration_tests::{TestContext, bulk_json, ok, rejected};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

const BATCH: &str = r#"
replace_existing: false
venues:
  - name: Ballhaus
    address: Auguststrasse 24, Berlin
    capacity: 300
packages:
  - name: Full Pass
    description: All workshops and parties
    price: 149.0
    duration_days: 3
    max_participants: 80
events:
  - title: Friday Social
    description: Live band
    start_date: 2025-06-06T20:00:00Z
    end_date: 2025-06-07T02:00:00Z
    venue_id: 00000000-0000-0000-0000-000000000064
    max_participants: 200
    price: 15.0
    event_type: Social
"#;

fn batch() -> SaveAllBatch {
    serde_yaml::from_str(BATCH).unwrap()
}

async fn mount_step(ctx: &TestContext, resource: &str, response: ResponseTemplate, calls: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/api/data/bulk/{resource}")))
        .respond_with(response)
        .expect(calls)
        .mount(&ctx.server)
        .await;
}

fn created(count: usize) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(ok(bulk_json(count, &[])))
}

#[tokio::test]
async fn test_all_steps_succeed_in_order() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/api/data/bulk/venues"))
        .and(body_partial_json(json!({
            "replace_existing": false,
            "data": [{ "name": "Ballhaus", "capacity": 300 }],
        })))
        .respond_with(created(1))
        .expect(1)
        .mount(&ctx.server)
        .await;
    mount_step(&ctx, "packages", created(1), 1).await;
    mount_step(&ctx, "events", created(1), 1).await;

    let report = ctx
        .client
        .api()
        .save_all(&batch(), BulkPolicy::ContinueOnError)
        .await;

    assert!(report.is_success());
    assert_eq!(report.success_count(), 3);

    let order: Vec<String> = ctx
        .server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(
        order,
        vec![
            "/api/data/bulk/venues",
            "/api/data/bulk/packages",
            "/api/data/bulk/events"
        ]
    );
}

#[tokio::test]
async fn test_continue_policy_runs_steps_after_failure() {
    let ctx = TestContext::new().await;
    mount_step(&ctx, "venues", created(1), 1).await;
    mount_step(
        &ctx,
        "packages",
        ResponseTemplate::new(500).set_body_json(rejected("database locked")),
        1,
    )
    .await;
    mount_step(&ctx, "events", created(1), 1).await;

    let report = ctx
        .client
        .api()
        .save_all(&batch(), BulkPolicy::ContinueOnError)
        .await;

    assert!(!report.is_success());
    assert!(!report.was_aborted());
    assert!(matches!(
        report.outcome(BulkResource::Packages),
        Some(StepOutcome::Failed(message)) if message.contains("database locked")
    ));
    assert_eq!(report.success_count(), 2);
}

#[tokio::test]
async fn test_abort_policy_skips_remaining_steps() {
    let ctx = TestContext::new().await;
    mount_step(&ctx, "venues", created(1), 1).await;
    mount_step(
        &ctx,
        "packages",
        ResponseTemplate::new(500).set_body_string("boom"),
        1,
    )
    .await;
    mount_step(&ctx, "events", created(1), 0).await;

    let report = ctx
        .client
        .api()
        .save_all(&batch(), BulkPolicy::AbortOnError)
        .await;

    assert!(report.was_aborted());
    assert_eq!(report.outcome(BulkResource::Events), Some(&StepOutcome::Skipped));
    assert_eq!(report.success_count(), 1);
}

#[tokio::test]
async fn test_abort_policy_treats_record_errors_as_failure() {
    let ctx = TestContext::new().await;
    mount_step(
        &ctx,
        "venues",
        ResponseTemplate::new(200).set_body_json(ok(bulk_json(0, &["Venue name already exists"]))),
        1,
    )
    .await;
    mount_step(&ctx, "packages", created(1), 0).await;
    mount_step(&ctx, "events", created(1), 0).await;

    let report = ctx
        .client
        .api()
        .save_all(&batch(), BulkPolicy::AbortOnError)
        .await;

    assert_eq!(report.error_count(), 1);
    assert_eq!(report.outcome(BulkResource::Packages), Some(&StepOutcome::Skipped));
    assert_eq!(report.outcome(BulkResource::Events), Some(&StepOutcome::Skipped));
}

#[tokio::test]
async fn test_empty_resources_are_not_sent() {
    let ctx = TestContext::new().await;
    mount_step(&ctx, "venues", created(1), 0).await;
    mount_step(&ctx, "packages", created(1), 1).await;
    mount_step(&ctx, "events", created(1), 0).await;

    let mut batch = batch();
    batch.venues.clear();
    batch.events.clear();

    let report = ctx
        .client
        .api()
        .save_all(&batch, BulkPolicy::AbortOnError)
        .await;

    assert!(report.is_success());
    assert_eq!(report.outcome(BulkResource::Venues), Some(&StepOutcome::Empty));
}

#[tokio::test]
async fn test_unauthorized_ends_run_under_continue_policy() {
    let ctx = TestContext::new().await;
    ctx.sign_in("expired");
    mount_step(&ctx, "venues", ResponseTemplate::new(401), 1).await;
    mount_step(&ctx, "packages", created(1), 0).await;
    mount_step(&ctx, "events", created(1), 0).await;

    let report = ctx
        .client
        .api()
        .save_all(&batch(), BulkPolicy::ContinueOnError)
        .await;

    assert!(report.was_aborted());
    assert!(!ctx.client.state().is_authenticated());
}
