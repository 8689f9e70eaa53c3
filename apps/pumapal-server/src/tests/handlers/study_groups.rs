//! Study group route tests: status codes, bodies and error shapes.

use super::super::common::*;
use pumapal_api::{ErrorBody, LeaveResponse, StudyGroupDto, LAST_MEMBER_LEFT};
use serde_json::json;

const ANA: &str = "ana@valenciacollege.edu";

async fn created(app: &TestApp, course: &str) -> StudyGroupDto {
    let resp = app.create(&create_body(course, "Ana", ANA)).await;
    assert_eq!(resp.status(), 201);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn handler_create_returns_201_with_wire_shape() {
    let app = spawn_app().await;

    let mut body = create_body("chm 1045c", "Ana", ANA);
    body["groupTitle"] = json!("Chem crew");
    body["showOwnerEmail"] = json!(null);
    let resp = app.create(&body).await;
    assert_eq!(resp.status(), 201);

    let v: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(v["course"], "CHM 1045C");
    assert_eq!(v["groupTitle"], "Chem crew");
    assert_eq!(v["ownerEmail"], ANA);
    assert_eq!(v["createdBy"], ANA);
    assert_eq!(v["showOwnerEmail"], true);
    assert_eq!(v["location"], "");
    assert_eq!(v["meetingTime"], "18:30");
    assert_eq!(v["attendees"], json!([{ "name": "Ana", "email": ANA }]));
    assert!(v["id"].as_str().is_some());
}

#[tokio::test]
async fn handler_create_validation_errors() {
    let app = spawn_app().await;

    let resp = app.create(&json!({ "course": "CHM1045C" })).await;
    assert_eq!(resp.status(), 400);
    let err: ErrorBody = resp.json().await.unwrap();
    assert_eq!(err.error, "Missing required fields");

    let resp = app
        .create(&create_body("CHM1045C", "Ana", "ana@gmail.com"))
        .await;
    assert_eq!(resp.status(), 400);
    let err: ErrorBody = resp.json().await.unwrap();
    assert!(err.error.contains("valenciacollege.edu"));

    let mut body = create_body("CHM1045C", "Ana", ANA);
    body["date"] = json!("next tuesday");
    let resp = app.create(&body).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn handler_malformed_json_is_rejected() {
    let app = spawn_app().await;

    let resp = app
        .client
        .post(app.api(""))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let err: ErrorBody = resp.json().await.unwrap();
    assert!(!err.error.is_empty());
}

#[tokio::test]
async fn handler_unreadable_bodies_use_error_shape() {
    let app = spawn_app().await;

    let wrong_type = app
        .client
        .post(app.api("/search"))
        .json(&json!({ "course": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_type.status(), 400);
    assert!(wrong_type.json::<ErrorBody>().await.is_ok());

    let no_content_type = app
        .client
        .post(app.api(""))
        .body(create_body("CHM1045C", "Ana", ANA).to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(no_content_type.status(), 400);
    let err: ErrorBody = no_content_type.json().await.unwrap();
    assert!(err.error.contains("Content-Type"));
}

#[tokio::test]
async fn handler_list_returns_created_groups() {
    let app = spawn_app().await;
    created(&app, "CHM1045C").await;
    created(&app, "MAC2311").await;

    let resp = app.client.get(app.api("")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let groups: Vec<StudyGroupDto> = resp.json().await.unwrap();
    assert_eq!(groups.len(), 2);
}

#[tokio::test]
async fn handler_search_normalizes_query() {
    let app = spawn_app().await;
    let chem = created(&app, "CHM 1045C").await;
    created(&app, "MAC 2311").await;

    let resp = app
        .client
        .post(app.api("/search"))
        .json(&json!({ "course": "chm1045c" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let hits: Vec<StudyGroupDto> = resp.json().await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, chem.id);

    for bad in [json!({ "course": "   " }), json!({})] {
        let resp = app
            .client
            .post(app.api("/search"))
            .json(&bad)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
    }
}

#[tokio::test]
async fn handler_get_and_unknown_ids() {
    let app = spawn_app().await;
    let g = created(&app, "CHM1045C").await;

    let resp = app.get(&g.id).await;
    assert_eq!(resp.status(), 200);
    let got: StudyGroupDto = resp.json().await.unwrap();
    assert_eq!(got, g);

    let resp = app.get("0190a0b0-0000-7000-8000-000000000000").await;
    assert_eq!(resp.status(), 404);
    let err: ErrorBody = resp.json().await.unwrap();
    assert_eq!(err.error, "Group not found");

    let resp = app.get("not-an-id").await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn handler_update_owner_only() {
    let app = spawn_app().await;
    let g = created(&app, "CHM1045C").await;
    app.join(&g.id, "Ben", "ben@valenciacollege.edu").await;

    let resp = app
        .client
        .put(app.api(&format!("/{}", g.id)))
        .json(&json!({ "email": "ben@valenciacollege.edu", "notes": "mine now" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    let err: ErrorBody = resp.json().await.unwrap();
    assert_eq!(err.error, "Only the group owner can edit this group");

    let resp = app
        .client
        .put(app.api(&format!("/{}", g.id)))
        .json(&json!({
            "email": ANA,
            "location": "Room 4-120",
            "showOwnerEmail": false,
            "ownerEmail": "ben@valenciacollege.edu",
            "course": "PHY2048"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: StudyGroupDto = resp.json().await.unwrap();
    assert_eq!(updated.location, "Room 4-120");
    assert!(!updated.show_owner_email);
    assert_eq!(updated.owner_email, ANA);
    assert_eq!(updated.course, "CHM1045C");
    assert_eq!(updated.version, g.version + 2);

    let resp = app
        .client
        .put(app.api(&format!("/{}", g.id)))
        .json(&json!({ "notes": "anonymous" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = app
        .client
        .put(app.api("/0190a0b0-0000-7000-8000-000000000000"))
        .json(&json!({ "email": ANA }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn handler_delete_is_idempotent() {
    let app = spawn_app().await;
    let g = created(&app, "CHM1045C").await;

    let url = app.api(&format!("/{}", g.id));
    let resp = app.client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), 204);
    assert_eq!(app.get(&g.id).await.status(), 404);

    let resp = app.client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), 204);
}

#[tokio::test]
async fn handler_join_and_leave_errors() {
    let app = spawn_app().await;
    let g = created(&app, "CHM1045C").await;

    let resp = app
        .client
        .post(app.api(&format!("/{}/join", g.id)))
        .json(&json!({ "email": "ben@valenciacollege.edu" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let err: ErrorBody = resp.json().await.unwrap();
    assert_eq!(err.error, "Name and email are required");

    let resp = app.leave(&g.id, "zed@valenciacollege.edu").await;
    assert_eq!(resp.status(), 400);
    let err: ErrorBody = resp.json().await.unwrap();
    assert_eq!(err.error, "User is not in this group");

    let resp = app
        .join("0190a0b0-0000-7000-8000-000000000000", "Ben", "ben@valenciacollege.edu")
        .await;
    assert_eq!(resp.status(), 404);

    let resp = app.leave("0190a0b0-0000-7000-8000-000000000000", ANA).await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn handler_leave_last_member_reports_deletion() {
    let app = spawn_app().await;
    let g = created(&app, "CHM1045C").await;

    let resp = app.leave(&g.id, ANA).await;
    assert_eq!(resp.status(), 200);
    let v: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(v, json!({ "deleted": true, "message": LAST_MEMBER_LEFT }));

    let body: LeaveResponse = serde_json::from_value(v).unwrap();
    assert!(matches!(body, LeaveResponse::Deleted(_)));
}
