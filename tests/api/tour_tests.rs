//! Catalog and review API tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{guide_token, id_of, token, tourist_token, TestApp, GUIDE_ID};

#[tokio::test]
async fn test_create_tour_starts_as_draft() {
    let app = TestApp::new();

    let (status, body) = app
        .post_auth(
            "/api/tours",
            json!({ "name": "Fortress", "description": "Walls", "difficulty": 2 }),
            &guide_token(),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "draft");
    assert_eq!(body["price"], 0.0);
    assert_eq!(body["author_id"], GUIDE_ID);
    assert_eq!(body["tags"], json!([]));

    let (_, mine) = app.get_auth("/api/tours/my", &guide_token()).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (_, published) = app.get("/api/tours").await;
    assert_eq!(published, json!([]));
}

#[tokio::test]
async fn test_authoring_requires_guide_role() {
    let app = TestApp::new();
    let body = json!({ "name": "Fortress", "description": "Walls", "difficulty": 2 });

    let (status, _) = app.post_auth("/api/tours", body.clone(), &tourist_token()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Tokens without a role get no fallback when no stakeholders database is wired
    let no_role = token(json!({ "sub": "5" }));
    let (status, _) = app.post_auth("/api/tours", body.clone(), &no_role).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(axum::http::Method::POST, "/api/tours", Some(body), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let app = TestApp::new();

    let (status, body) = app.get_auth("/api/tours/my", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn test_create_tour_validation() {
    let app = TestApp::new();

    let (status, body) = app
        .post_auth(
            "/api/tours",
            json!({ "name": "Fortress", "description": "Walls", "difficulty": 9 }),
            &guide_token(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "difficulty: Difficulty must be 1 (easy), 2 (medium) or 3 (hard)"
    );
}

#[tokio::test]
async fn test_publish_requires_key_points_and_travel_time() {
    let app = TestApp::new();
    let tour_id = app.create_tour("Quay").await;
    let publish = format!("/api/tours/{}/publish", tour_id);

    app.add_key_point(tour_id, 1, 45.0, 19.0).await;
    let (status, _) = app.post_auth(&publish, json!({}), &guide_token()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.add_key_point(tour_id, 2, 45.01, 19.0).await;
    let (status, _) = app.post_auth(&publish, json!({}), &guide_token()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.post_auth(
        &format!("/api/tours/{}/travel-times", tour_id),
        json!({ "transport_type": "bicycle", "duration_min": 20 }),
        &guide_token(),
    )
    .await;

    let (status, body) = app.post_auth(&publish, json!({}), &guide_token()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "published");
    assert!(body["published_at"].is_string());

    let (_, listed) = app.get("/api/tours").await;
    assert_eq!(id_of(&listed[0]), tour_id);

    let (status, body) = app
        .post_auth(&format!("/api/tours/{}/archive", tour_id), json!({}), &guide_token())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "archived");

    let (status, _) = app
        .post_auth(&format!("/api/tours/{}/archive", tour_id), json!({}), &guide_token())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, archived) = app.get("/api/tours/status/archived").await;
    assert_eq!(archived.as_array().unwrap().len(), 1);

    let (status, _) = app.get("/api/tours/status/unknown").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_key_points_drive_tour_length() {
    let app = TestApp::new();
    let tour_id = app.create_tour("Length").await;

    app.add_key_point(tour_id, 1, 45.0, 19.0).await;
    let second = app.add_key_point(tour_id, 2, 45.01, 19.0).await;

    let (_, tour) = app.get(&format!("/api/tours/{}", tour_id)).await;
    assert_eq!(tour["total_length_km"], 1.11);

    let (status, _) = app
        .delete_auth(&format!("/api/tours/{}/keypoints/{}", tour_id, second), &guide_token())
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, tour) = app.get(&format!("/api/tours/{}", tour_id)).await;
    assert_eq!(tour["total_length_km"], 0.0);
}

#[tokio::test]
async fn test_key_point_reads() {
    let app = TestApp::new();
    let tour_id = app.create_tour("Reads").await;
    let second = app.add_key_point(tour_id, 2, 45.01, 19.0).await;
    let first = app.add_key_point(tour_id, 1, 45.0, 19.0).await;

    let (_, listed) = app.get(&format!("/api/tours/{}/keypoints", tour_id)).await;
    let ids: Vec<i64> = listed.as_array().unwrap().iter().map(id_of).collect();
    assert_eq!(ids, vec![first, second]);

    let (status, body) = app
        .get(&format!("/api/tours/{}/keypoints/first", tour_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(id_of(&body), first);

    let (status, body) = app
        .put_auth(
            &format!("/api/tours/{}/keypoints/{}", tour_id, second),
            json!({ "name": "Renamed" }),
            &guide_token(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["order"], 2);
}

#[tokio::test]
async fn test_only_author_can_modify() {
    let app = TestApp::new();
    let tour_id = app.create_tour("Mine").await;
    let other_guide = token(json!({ "sub": GUIDE_ID + 1, "role": "vodic" }));

    let (status, _) = app
        .put_auth(
            &format!("/api/tours/{}", tour_id),
            json!({ "name": "Stolen" }),
            &other_guide,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .delete_auth(&format!("/api/tours/{}", tour_id), &other_guide)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put_auth(
            &format!("/api/tours/{}", tour_id),
            json!({ "price": 12.5 }),
            &guide_token(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 12.5);
    assert_eq!(body["name"], "Mine");

    let (status, _) = app
        .delete_auth(&format!("/api/tours/{}", tour_id), &guide_token())
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/tours/{}", tour_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_travel_time_upsert_and_delete() {
    let app = TestApp::new();
    let tour_id = app.create_tour("Times").await;
    let uri = format!("/api/tours/{}/travel-times", tour_id);

    let (_, first) = app
        .post_auth(&uri, json!({ "transport_type": "car", "duration_min": 30 }), &guide_token())
        .await;
    let (status, second) = app
        .post_auth(&uri, json!({ "transport_type": "car", "duration_min": 25 }), &guide_token())
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(id_of(&first), id_of(&second));

    let (_, listed) = app.get(&uri).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["duration_min"], 25);

    let (status, body) = app
        .post_auth(&uri, json!({ "transport_type": "plane", "duration_min": 5 }), &guide_token())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10002);

    let (status, _) = app
        .delete_auth(&format!("{}/{}", uri, id_of(&first)), &guide_token())
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = app.get(&uri).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_tours_for_tourists_carry_first_key_point() {
    let app = TestApp::new();
    let tour = app.published_tour().await;
    app.create_tour("Hidden draft").await;

    let (status, body) = app.get("/api/tours/for-tourists").await;
    assert_eq!(status, StatusCode::OK);
    let tours = body.as_array().unwrap();
    assert_eq!(tours.len(), 1);
    assert_eq!(id_of(&tours[0]), tour.id);
    assert_eq!(id_of(&tours[0]["first_keypoint"]), tour.key_points[0]);
}

#[tokio::test]
async fn test_reviews() {
    let app = TestApp::new();
    let tour = app.published_tour().await;
    let uri = format!("/api/tours/{}/reviews", tour.id);

    let (status, body) = app
        .post_auth(
            &uri,
            json!({ "rating": 6, "comment": "Great", "visit_date": "2024-05-01" }),
            &tourist_token(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = app
        .post_auth(
            &uri,
            json!({
                "rating": 5,
                "comment": "Great views",
                "visit_date": "2024-05-01",
                "images": ["https://img.example.com/1.jpg"],
            }),
            &tourist_token(),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["visit_date"], "2024-05-01");

    let (_, listed) = app.get(&uri).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["comment"], "Great views");

    let (status, _) = app
        .post_auth(
            "/api/tours/424242/reviews",
            json!({ "rating": 4, "comment": "?", "visit_date": "2024-05-01" }),
            &tourist_token(),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
