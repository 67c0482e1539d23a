//! Maintenance request tests: creation and the forward-only status
//! workflow shared with the invoice lifecycle.

mod common;

use common::{TestApp, TEST_TENANT_ID};
use hostel_core::error::AppError;
use hostel_service::models::{CreateMaintenanceRequest, RequestPriority, RequestStatus};
use hostel_service::services::ListRequestsFilter;

fn request(title: &str, priority: RequestPriority) -> CreateMaintenanceRequest {
    CreateMaintenanceRequest {
        room_id: "101".to_string(),
        tenant_id: TEST_TENANT_ID.to_string(),
        title: title.to_string(),
        description: "The air conditioner is leaking".to_string(),
        images: vec!["maintenance/leak.jpg".to_string()],
        priority,
    }
}

#[tokio::test]
async fn new_requests_start_open() {
    let app = TestApp::new();

    let created = app
        .maintenance
        .create_request(request("Leaking AC", RequestPriority::High))
        .await
        .expect("create request");

    assert_eq!(created.status, RequestStatus::Open);
    assert_eq!(created.priority, RequestPriority::High);
    assert!(!created.request_id.is_empty());

    let stored = app
        .maintenance
        .get(&created.request_id)
        .await
        .expect("fetch")
        .expect("persisted");
    assert_eq!(stored.title, "Leaking AC");
    assert_eq!(stored.images, vec!["maintenance/leak.jpg".to_string()]);
}

#[tokio::test]
async fn requests_walk_the_workflow_forward() {
    let app = TestApp::new();
    let created = app
        .maintenance
        .create_request(request("Broken lock", RequestPriority::Medium))
        .await
        .expect("create request");

    let in_progress = app
        .maintenance
        .set_status(&created.request_id, RequestStatus::InProgress)
        .await
        .expect("open -> in_progress");
    assert_eq!(in_progress.status, RequestStatus::InProgress);

    let resolved = app
        .maintenance
        .set_status(&created.request_id, RequestStatus::Resolved)
        .await
        .expect("in_progress -> resolved");
    assert_eq!(resolved.status, RequestStatus::Resolved);

    let closed = app
        .maintenance
        .set_status(&created.request_id, RequestStatus::Closed)
        .await
        .expect("resolved -> closed");
    assert_eq!(closed.status, RequestStatus::Closed);
}

#[tokio::test]
async fn backward_moves_are_rejected() {
    let app = TestApp::new();
    let created = app
        .maintenance
        .create_request(request("Flickering light", RequestPriority::Low))
        .await
        .expect("create request");

    app.maintenance
        .set_status(&created.request_id, RequestStatus::Resolved)
        .await
        .expect("open -> resolved");

    let err = app
        .maintenance
        .set_status(&created.request_id, RequestStatus::InProgress)
        .await
        .expect_err("resolved cannot go back to in_progress");
    assert!(matches!(err, AppError::InvalidTransition(_)));
}

#[tokio::test]
async fn closed_requests_cannot_be_reopened() {
    let app = TestApp::new();
    let created = app
        .maintenance
        .create_request(request("Clogged drain", RequestPriority::Medium))
        .await
        .expect("create request");

    app.maintenance
        .set_status(&created.request_id, RequestStatus::Closed)
        .await
        .expect("open -> closed");

    for next in [
        RequestStatus::Open,
        RequestStatus::InProgress,
        RequestStatus::Resolved,
    ] {
        let err = app
            .maintenance
            .set_status(&created.request_id, next)
            .await
            .expect_err("closed is terminal");
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }
}

#[tokio::test]
async fn listing_filters_by_status_and_tenant() {
    let app = TestApp::new();

    let first = app
        .maintenance
        .create_request(request("First", RequestPriority::Low))
        .await
        .expect("create");
    app.maintenance
        .create_request(CreateMaintenanceRequest {
            tenant_id: "tenant-other".to_string(),
            ..request("Second", RequestPriority::High)
        })
        .await
        .expect("create");

    app.maintenance
        .set_status(&first.request_id, RequestStatus::InProgress)
        .await
        .expect("transition");

    let open_only = app
        .maintenance
        .list(&ListRequestsFilter {
            status: Some(RequestStatus::Open),
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(open_only.len(), 1);
    assert_eq!(open_only[0].title, "Second");

    let for_tenant = app
        .maintenance
        .list(&ListRequestsFilter {
            tenant_id: Some(TEST_TENANT_ID.to_string()),
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(for_tenant.len(), 1);
    assert_eq!(for_tenant[0].title, "First");

    let everything = app
        .maintenance
        .list(&ListRequestsFilter::default())
        .await
        .expect("list");
    assert_eq!(everything.len(), 2);
}
