mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use helpers::app::{make_test_app, multipart_request, response_json};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use serial_test::serial;
use tower::ServiceExt;
use util::state::AppState;

// The institution defaults configured in tests: (16.466167, 80.674499), 50 m.
const CAMPUS_LAT: &str = "16.466167";
const CAMPUS_LON: &str = "80.674499";

async fn open_session(state: &AppState) -> String {
    db::models::attendance_session::Model::create(state.db(), 10, None, "http://localhost:5173")
        .await
        .unwrap()
        .session_token
}

fn submission_fields<'a>(
    token: &'a str,
    roll_no: &'a str,
    lat: &'a str,
    lon: &'a str,
) -> Vec<(&'a str, &'a str)> {
    vec![
        ("session_token", token),
        ("roll_no", roll_no),
        ("name", "Asha Rao"),
        ("branch", "CSE"),
        ("section", "A"),
        ("location_lat", lat),
        ("location_lon", lon),
    ]
}

#[tokio::test]
#[serial]
async fn valid_submission_is_stored_and_selfie_is_retrievable() {
    let test_app = make_test_app().await;
    let token = open_session(&test_app.state).await;

    let response = test_app
        .app
        .clone()
        .oneshot(multipart_request(
            "/attendance/mark",
            &submission_fields(&token, "208W1A1201", CAMPUS_LAT, CAMPUS_LON),
            Some(("selfie", "image/jpeg", b"\xff\xd8\xff\xe0fake-jpeg")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["roll_no"], "208W1A1201");

    let filename = body["data"]["selfie_path"].as_str().unwrap().to_owned();
    let response = test_app
        .app
        .oneshot(
            Request::builder()
                .uri(format!("/utils/selfies/{filename}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "image/jpeg"
    );
}

#[tokio::test]
#[serial]
async fn duplicate_submission_is_a_conflict() {
    let test_app = make_test_app().await;
    let token = open_session(&test_app.state).await;
    let fields = submission_fields(&token, "208W1A1202", CAMPUS_LAT, CAMPUS_LON);

    let first = test_app
        .app
        .clone()
        .oneshot(multipart_request("/attendance/mark", &fields, None))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = test_app
        .app
        .oneshot(multipart_request("/attendance/mark", &fields, None))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = response_json(second).await;
    assert_eq!(body["error"], "DUPLICATE_ATTENDANCE");
    assert!(body["details"]["first_marked_at"].as_str().is_some());
}

#[tokio::test]
#[serial]
async fn expired_session_is_rejected_before_anything_else() {
    let test_app = make_test_app().await;

    let now = Utc::now();
    db::models::attendance_session::ActiveModel {
        session_token: Set("expired-token".into()),
        venue_id: Set(None),
        qr_payload: Set("http://localhost:5173/mark-attendance/expired-token".into()),
        created_at: Set(now - Duration::minutes(20)),
        expires_at: Set(now - Duration::minutes(5)),
        ..Default::default()
    }
    .insert(test_app.state.db())
    .await
    .unwrap();

    let response = test_app
        .app
        .oneshot(multipart_request(
            "/attendance/mark",
            &submission_fields("expired-token", "208W1A1203", CAMPUS_LAT, CAMPUS_LON),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "SESSION_EXPIRED");
}

#[tokio::test]
#[serial]
async fn unknown_session_is_rejected_and_audited() {
    let test_app = make_test_app().await;

    let response = test_app
        .app
        .oneshot(multipart_request(
            "/attendance/mark",
            &submission_fields("no-such-token", "208W1A1204", CAMPUS_LAT, CAMPUS_LON),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "SESSION_NOT_FOUND");

    let logs = db::models::flagged_log::Entity::find()
        .all(test_app.state.db())
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].reason, "Session Not Found");
    assert_eq!(logs[0].roll_no, "208W1A1204");
}

#[tokio::test]
#[serial]
async fn out_of_range_location_is_forbidden() {
    let test_app = make_test_app().await;
    let token = open_session(&test_app.state).await;

    // Mumbai, several hundred kilometers from the campus default.
    let response = test_app
        .app
        .oneshot(multipart_request(
            "/attendance/mark",
            &submission_fields(&token, "208W1A1205", "19.0760", "72.8777"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = response_json(response).await;
    assert_eq!(body["error"], "LOCATION_OUT_OF_RANGE");
    assert!(body["details"]["distance_m"].as_f64().unwrap() > 50.0);
    assert_eq!(body["details"]["max_distance_m"].as_f64().unwrap(), 50.0);
}

#[tokio::test]
#[serial]
async fn bad_coordinates_are_client_errors() {
    let test_app = make_test_app().await;
    let token = open_session(&test_app.state).await;

    // Eight decimal places on latitude.
    let response = test_app
        .app
        .clone()
        .oneshot(multipart_request(
            "/attendance/mark",
            &submission_fields(&token, "208W1A1206", "16.12345678", CAMPUS_LON),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "COORDINATE_PRECISION");

    // Not a number at all.
    let response = test_app
        .app
        .clone()
        .oneshot(multipart_request(
            "/attendance/mark",
            &submission_fields(&token, "208W1A1206", "north-of-the-gate", CAMPUS_LON),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "COORDINATE_PARSE_ERROR");

    // Latitude beyond the poles.
    let response = test_app
        .app
        .oneshot(multipart_request(
            "/attendance/mark",
            &submission_fields(&token, "208W1A1206", "91.0", CAMPUS_LON),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "INVALID_COORDINATES");

    // Client bugs are not audited.
    let logs = db::models::flagged_log::Entity::find()
        .all(test_app.state.db())
        .await
        .unwrap();
    assert!(logs.is_empty());
}

#[tokio::test]
#[serial]
async fn disallowed_selfie_type_is_rejected_before_session_lookup() {
    let test_app = make_test_app().await;

    // The token does not even exist; the file check must win.
    let response = test_app
        .app
        .oneshot(multipart_request(
            "/attendance/mark",
            &submission_fields("no-such-token", "208W1A1207", CAMPUS_LAT, CAMPUS_LON),
            Some(("selfie", "text/plain", b"not an image")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "FILE_TYPE_NOT_ALLOWED");
}

#[tokio::test]
#[serial]
async fn missing_required_fields_are_unprocessable() {
    let test_app = make_test_app().await;

    let response = test_app
        .app
        .oneshot(multipart_request(
            "/attendance/mark",
            &[("roll_no", "208W1A1208"), ("name", "Asha Rao")],
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert_eq!(body["success"], false);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("session_token")
    );
}

#[tokio::test]
#[serial]
async fn venue_bound_session_uses_the_venue_geofence() {
    let test_app = make_test_app().await;
    let db = test_app.state.db();

    let inst = db::models::institution::Model::create(db, "Saracity University", "Hyderabad")
        .await
        .unwrap();
    let venue = db::models::venue::Model::create(db, inst.id, "IT Hall", 17.4446, 78.3498, 200.0)
        .await
        .unwrap();
    let session = db::models::attendance_session::Model::create(
        db,
        10,
        Some(venue.id),
        "http://localhost:5173",
    )
    .await
    .unwrap();

    // At the venue center, far outside the institution default fence.
    let response = test_app
        .app
        .oneshot(multipart_request(
            "/attendance/mark",
            &submission_fields(&session.session_token, "208W1A1209", "17.4446", "78.3498"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}
