//! A study group's whole life over HTTP.

use super::super::common::*;
use pumapal_api::{LeaveResponse, StudyGroupDto};
use serde_json::json;

#[tokio::test]
async fn group_lifecycle_create_search_join_leave() {
    let app = spawn_app().await;
    let ana = "ana@valenciacollege.edu";
    let ben = "ben@mail.valenciacollege.edu";

    // Create: course normalized, creator is sole attendee and owner
    let resp = app.create(&create_body("chm1045c", "Ana", ana)).await;
    assert_eq!(resp.status(), 201);
    let group: StudyGroupDto = resp.json().await.unwrap();
    assert_eq!(group.course, "CHM1045C");
    assert_eq!(group.owner_email, ana);
    assert_eq!(group.attendees.len(), 1);

    // Search with different spacing and case
    let hits: Vec<StudyGroupDto> = app
        .client
        .post(app.api("/search"))
        .json(&json!({ "course": "CHM 1045 C" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, group.id);

    // Second student joins, twice
    let joined: StudyGroupDto = app.join(&group.id, "Ben", ben).await.json().await.unwrap();
    assert_eq!(joined.attendees.len(), 2);
    let again: StudyGroupDto = app.join(&group.id, "Ben", ben).await.json().await.unwrap();
    assert_eq!(again.attendees.len(), 2);

    // Owner leaves: ownership moves to the remaining member
    let resp = app.leave(&group.id, ana).await;
    assert_eq!(resp.status(), 200);
    let LeaveResponse::Group(after) = resp.json::<LeaveResponse>().await.unwrap() else {
        panic!("group should survive the owner leaving");
    };
    assert_eq!(after.owner_email, ben);
    assert_eq!(after.attendees.len(), 1);

    // Last member leaves: group is gone
    let resp = app.leave(&group.id, ben).await;
    assert!(matches!(
        resp.json::<LeaveResponse>().await.unwrap(),
        LeaveResponse::Deleted(_)
    ));
    assert_eq!(app.get(&group.id).await.status(), 404);
}

#[tokio::test]
async fn past_group_absent_from_listing() {
    let app = spawn_app().await;

    let mut body = create_body("MAC2311", "Ana", "ana@valenciacollege.edu");
    body["date"] = json!(days_from_today(-1).to_string());
    let past: StudyGroupDto = app.create(&body).await.json().await.unwrap();

    let listed: Vec<StudyGroupDto> = app
        .client
        .get(app.api(""))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.iter().all(|g| g.id != past.id));

    assert_eq!(app.server.sweep_expired(crate::server::today()).await.unwrap(), 1);
    assert_eq!(app.get(&past.id).await.status(), 404);
}
