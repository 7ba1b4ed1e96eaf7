//! Tour execution API tests.

use axum::http::StatusCode;
use futures::future::join_all;
use pretty_assertions::assert_eq;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::common::{
    guide_token, id_of, tourist_token, tourist_token_for, Purchases, TestApp, TOURIST_ID,
};

fn timestamp(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_start_complete_and_restart() {
    let app = TestApp::new();
    let tour = app.published_tour().await;
    let token = tourist_token();

    let (status, body) = app.start(tour.id, &token).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["execution"]["status"], "active");
    assert_eq!(body["execution"]["tourist_id"], TOURIST_ID);
    assert_eq!(body["execution"]["tour_id"], tour.id);
    assert_eq!(
        body["purchase_token"],
        format!("token-{}-{}", TOURIST_ID, tour.id)
    );
    let execution_id = id_of(&body["execution"]);

    let (status, _) = app.start(tour.id, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .post_auth(
            &format!("/api/executions/{}/complete", execution_id),
            json!({}),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["execution"]["status"], "completed");

    let (status, body) = app.start(tour.id, &token).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_ne!(id_of(&body["execution"]), execution_id);
}

#[tokio::test]
async fn test_concurrent_starts_admit_exactly_one() {
    let app = TestApp::new();
    let tour = app.published_tour().await;
    let token = tourist_token();

    let attempts = (0..8).map(|_| app.start(tour.id, &token));
    let results = join_all(attempts).await;

    let created = results
        .iter()
        .filter(|(status, _)| *status == StatusCode::CREATED)
        .count();
    let conflicts = results
        .iter()
        .filter(|(status, _)| *status == StatusCode::CONFLICT)
        .count();
    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);
}

#[tokio::test]
async fn test_start_requires_purchase() {
    let app = TestApp::with_purchases(Purchases::NotPurchased);
    let tour = app.published_tour().await;

    let (status, body) = app.start(tour.id, &tourist_token()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You must purchase this tour before starting it");
}

#[tokio::test]
async fn test_start_fails_closed_when_purchases_down() {
    let app = TestApp::with_purchases(Purchases::Down);
    let tour = app.published_tour().await;

    let (status, _) = app.start(tour.id, &tourist_token()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = app.get_auth("/api/executions/active", &tourist_token()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_start_rejects_draft_tour() {
    let app = TestApp::new();
    let tour_id = app.create_tour("Draft").await;

    let (status, _) = app.start(tour_id, &tourist_token()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_start_requires_token() {
    let app = TestApp::new();
    let tour = app.published_tour().await;

    let (status, body) = app
        .send(
            axum::http::Method::POST,
            &format!("/api/tours/{}/start", tour.id),
            Some(json!({ "latitude": 45.0, "longitude": 19.0 })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authorization header required");
}

#[tokio::test]
async fn test_location_in_overlap_completes_first_in_order_once() {
    let app = TestApp::new();
    let tour = app.published_tour().await;
    let token = tourist_token();

    let (_, body) = app.start(tour.id, &token).await;
    let execution_id = id_of(&body["execution"]);
    let uri = format!("/api/executions/{}/location", execution_id);

    // Within range of key points 2 and 3; 3 is closer.
    let ping = json!({ "latitude": 45.0012, "longitude": 19.0 });

    let (status, body) = app.put_auth(&uri, ping.clone(), &token).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(id_of(&body["nearby_keypoint"]), tour.key_points[1]);
    assert_eq!(body["completed"], true);

    let (status, body) = app.put_auth(&uri, ping, &token).await;
    assert_eq!(status, StatusCode::OK);

    // 2 is done; the next ping matches 3.
    assert_eq!(id_of(&body["nearby_keypoint"]), tour.key_points[2]);

    let (status, body) = app
        .get_auth(&format!("/api/executions/{}/keypoints", execution_id), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let completed: Vec<i64> = body["completed_keypoints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["key_point_id"].as_i64().unwrap())
        .collect();
    assert_eq!(completed, vec![tour.key_points[1], tour.key_points[2]]);
}

#[tokio::test]
async fn test_far_location_reports_nothing() {
    let app = TestApp::new();
    let tour = app.published_tour().await;
    let token = tourist_token();

    let (_, body) = app.start(tour.id, &token).await;
    let execution_id = id_of(&body["execution"]);
    let started_activity = timestamp(&body["execution"]["last_activity"]);

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let (status, body) = app
        .put_auth(
            &format!("/api/executions/{}/location", execution_id),
            json!({ "latitude": 44.0, "longitude": 20.0 }),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "nearby_keypoint": null, "completed": false }));

    let (_, body) = app.get_auth("/api/executions/active", &token).await;
    assert!(timestamp(&body["execution"]["last_activity"]) > started_activity);
    assert_eq!(body["completed_keypoints"], json!([]));
}

#[tokio::test]
async fn test_location_validation() {
    let app = TestApp::new();
    let tour = app.published_tour().await;
    let token = tourist_token();

    let (_, body) = app.start(tour.id, &token).await;
    let execution_id = id_of(&body["execution"]);

    let (status, body) = app
        .put_auth(
            &format!("/api/executions/{}/location", execution_id),
            json!({ "latitude": 95.0, "longitude": 19.0 }),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "latitude: Latitude must be between -90 and 90");

    let (status, body) = app
        .put_auth(
            &format!("/api/executions/{}/location", execution_id),
            json!({ "latitude": 45.0 }),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10002);
    assert!(
        body["message"].as_str().unwrap().contains("longitude"),
        "{body}"
    );

    let (status, _) = app
        .put_auth(
            "/api/executions/not-a-number/location",
            json!({ "latitude": 45.0, "longitude": 19.0 }),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_other_tourist_cannot_touch_execution() {
    let app = TestApp::new();
    let tour = app.published_tour().await;

    let (_, body) = app.start(tour.id, &tourist_token()).await;
    let execution_id = id_of(&body["execution"]);
    let intruder = tourist_token_for(TOURIST_ID + 1);

    let (status, _) = app
        .put_auth(
            &format!("/api/executions/{}/location", execution_id),
            json!({ "latitude": 45.0, "longitude": 19.0 }),
            &intruder,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post_auth(
            &format!("/api/executions/{}/abandon", execution_id),
            json!({}),
            &intruder,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .put_auth(
            "/api/executions/999/location",
            json!({ "latitude": 45.0, "longitude": 19.0 }),
            &intruder,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_terminated_execution_rejects_further_actions() {
    let app = TestApp::new();
    let tour = app.published_tour().await;
    let token = tourist_token();

    let (_, body) = app.start(tour.id, &token).await;
    let execution_id = id_of(&body["execution"]);

    let (status, body) = app
        .post_auth(
            &format!("/api/executions/{}/abandon", execution_id),
            json!({}),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["execution"]["status"], "abandoned");
    let abandoned_at = body["execution"]["abandoned_at"].clone();
    assert!(abandoned_at.is_string());

    for action in ["abandon", "complete"] {
        let (status, _) = app
            .post_auth(
                &format!("/api/executions/{}/{}", execution_id, action),
                json!({}),
                &token,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "second {action}");
    }

    let (status, _) = app
        .put_auth(
            &format!("/api/executions/{}/location", execution_id),
            json!({ "latitude": 45.0, "longitude": 19.0 }),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app
        .get_auth(&format!("/api/executions/{}/keypoints", execution_id), &token)
        .await;
    assert_eq!(body["completed_keypoints"], json!([]));
}

#[tokio::test]
async fn test_manual_key_point_completion() {
    let app = TestApp::new();
    let tour = app.published_tour().await;
    let token = tourist_token();

    let (_, body) = app.start(tour.id, &token).await;
    let execution_id = id_of(&body["execution"]);
    let uri = format!(
        "/api/executions/{}/keypoints/{}/complete",
        execution_id, tour.key_points[0]
    );

    let (status, body) = app.post_auth(&uri, json!({}), &token).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(id_of(&body["keypoint"]), tour.key_points[0]);
    assert_eq!(body["completed"], true);

    let (status, body) = app.post_auth(&uri, json!({}), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"], false);

    // A key point from another tour
    let other = app.create_tour("Other").await;
    let foreign = app.add_key_point(other, 1, 10.0, 10.0).await;
    let (status, _) = app
        .post_auth(
            &format!("/api/executions/{}/keypoints/{}/complete", execution_id, foreign),
            json!({}),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_active_view_includes_tour_and_key_points() {
    let app = TestApp::new();
    let tour = app.published_tour().await;
    let token = tourist_token();

    let (status, _) = app.get_auth("/api/executions/active", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.start(tour.id, &token).await;

    let (status, body) = app.get_auth("/api/executions/active", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(id_of(&body["tour"]), tour.id);
    assert_eq!(body["keypoints"].as_array().unwrap().len(), 3);
    assert_eq!(body["keypoints"][0]["order"], 1);

    // Guides walk tours too; their executions are separate.
    let (status, _) = app.get_auth("/api/executions/active", &guide_token()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_walked_tour_and_key_point_cannot_be_deleted() {
    let app = TestApp::new();
    let tour = app.published_tour().await;
    let token = tourist_token();

    let (_, body) = app.start(tour.id, &token).await;
    let execution_id = id_of(&body["execution"]);
    app.post_auth(
        &format!(
            "/api/executions/{}/keypoints/{}/complete",
            execution_id, tour.key_points[0]
        ),
        json!({}),
        &token,
    )
    .await;

    let (status, body) = app
        .delete_auth(
            &format!("/api/tours/{}/keypoints/{}", tour.id, tour.key_points[0]),
            &guide_token(),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    assert_eq!(body["code"], 10005);

    let (status, _) = app
        .delete_auth(&format!("/api/tours/{}", tour.id), &guide_token())
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .get_auth(&format!("/api/executions/{}/keypoints", execution_id), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed_keypoints"].as_array().unwrap().len(), 1);
}
