//! End-to-end tests for the attendance validation pipeline against a
//! file-backed SQLite database, with the audit logger on its own connection
//! exactly as in production.

use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use db::models::{attendance_record, attendance_session, flagged_log, institution, venue};
use db::test_utils::setup_paired_test_db;
use services::attendance_pipeline::{
    AttendancePipeline, AttendanceRejection, AttendanceSubmission, PipelineError, SelfieUpload,
    UploadPolicy,
};
use services::audit::AuditLogger;
use services::selfie_storage::SelfieStorage;
use services::venue_registry::{GeofenceDefaults, VenueRegistry};

const IT_HALL: (f64, f64) = (17.4446, 78.3498);

struct TestCtx {
    db: DatabaseConnection,
    pipeline: Arc<AttendancePipeline>,
    session: attendance_session::Model,
    venue: venue::Model,
    _dirs: (tempfile::TempDir, tempfile::TempDir),
}

async fn setup() -> TestCtx {
    let (db, audit_db, db_dir) = setup_paired_test_db().await;

    let inst = institution::Model::create(&db, "Saracity University", "Hyderabad")
        .await
        .expect("create institution");
    let venue = venue::Model::create(&db, inst.id, "IT Hall", IT_HALL.0, IT_HALL.1, 200.0)
        .await
        .expect("create venue");
    let session = attendance_session::Model::create(&db, 30, Some(venue.id), "http://localhost")
        .await
        .expect("create session");

    let selfie_dir = tempfile::tempdir().expect("selfie dir");
    let pipeline = AttendancePipeline::new(
        db.clone(),
        AuditLogger::new(audit_db),
        VenueRegistry::new(GeofenceDefaults {
            lat: 16.466167,
            lon: 80.674499,
            radius_m: 50.0,
            label: "Main Campus".into(),
        }),
        SelfieStorage::new(selfie_dir.path()),
        UploadPolicy {
            max_bytes: 1024 * 1024,
            allowed_types: vec!["image/jpeg".into(), "image/png".into()],
        },
    );

    TestCtx {
        db,
        pipeline: Arc::new(pipeline),
        session,
        venue,
        _dirs: (db_dir, selfie_dir),
    }
}

fn submission(token: &str, roll_no: &str, lat: &str, lon: &str) -> AttendanceSubmission {
    AttendanceSubmission {
        session_token: token.to_owned(),
        roll_no: roll_no.to_owned(),
        name: format!("Test Student {roll_no}"),
        email: Some(format!("{roll_no}@example.com")),
        phone: Some("9876543210".into()),
        branch: "IT".into(),
        section: "A".into(),
        location_lat: lat.to_owned(),
        location_lon: lon.to_owned(),
        selfie: Some(SelfieUpload {
            bytes: b"\xff\xd8\xff\xe0fakejpeg\xff\xd9".to_vec(),
            content_type: "image/jpeg".into(),
        }),
    }
}

async fn flagged_for(db: &DatabaseConnection, roll_no: &str) -> Vec<flagged_log::Model> {
    flagged_log::Entity::find()
        .filter(flagged_log::Column::RollNo.eq(roll_no))
        .all(db)
        .await
        .expect("query flagged logs")
}

fn rejection(err: PipelineError) -> AttendanceRejection {
    match err {
        PipelineError::Rejected(r) => r,
        other => panic!("expected a typed rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn submission_inside_the_geofence_is_accepted() {
    let ctx = setup().await;

    let record = ctx
        .pipeline
        .process(
            submission(&ctx.session.session_token, "208W1A12001", "17.4449", "78.3502"),
            Utc::now(),
        )
        .await
        .expect("valid submission accepted");

    assert!(record.is_valid_location);
    assert_eq!(record.venue_id, Some(ctx.venue.id));
    assert_eq!(record.location_lat, 17.4449);
    assert!(record.selfie_path.is_some());
    assert!(flagged_for(&ctx.db, "208W1A12001").await.is_empty());
}

#[tokio::test]
async fn cross_city_submission_is_rejected_and_audited() {
    let ctx = setup().await;

    // Mumbai, ~620 km from the Hyderabad venue.
    let err = ctx
        .pipeline
        .process(
            submission(&ctx.session.session_token, "208W1A12002", "19.0760", "72.8777"),
            Utc::now(),
        )
        .await
        .unwrap_err();

    match rejection(err) {
        AttendanceRejection::LocationOutOfRange {
            distance_m,
            max_distance_m,
            venue,
            ..
        } => {
            assert!(distance_m > 600_000.0, "got {distance_m} m");
            assert_eq!(max_distance_m, 200.0);
            assert_eq!(venue, "IT Hall");
        }
        other => panic!("expected LocationOutOfRange, got {other:?}"),
    }

    let logs = flagged_for(&ctx.db, "208W1A12002").await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].reason, "Location Out of Range");
    assert!(logs[0].details.contains("IT Hall"));

    // The rejected attempt never produced an attendance row.
    let count = attendance_record::Entity::find()
        .filter(attendance_record::Column::RollNo.eq("208W1A12002"))
        .all(&ctx.db)
        .await
        .unwrap();
    assert!(count.is_empty());
}

#[tokio::test]
async fn duplicate_submission_is_rejected_with_the_original_timestamp() {
    let ctx = setup().await;
    let token = ctx.session.session_token.clone();

    let first = ctx
        .pipeline
        .process(submission(&token, "208W1A12003", "17.4449", "78.3502"), Utc::now())
        .await
        .expect("first submission accepted");

    let err = ctx
        .pipeline
        .process(submission(&token, "208W1A12003", "17.4449", "78.3502"), Utc::now())
        .await
        .unwrap_err();

    match rejection(err) {
        AttendanceRejection::DuplicateAttendance { first_marked_at } => {
            assert_eq!(first_marked_at, first.timestamp);
        }
        other => panic!("expected DuplicateAttendance, got {other:?}"),
    }

    let logs = flagged_for(&ctx.db, "208W1A12003").await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].reason, "Duplicate Attendance");
}

#[tokio::test]
async fn expiry_takes_precedence_over_duplicate() {
    let ctx = setup().await;
    let token = ctx.session.session_token.clone();

    ctx.pipeline
        .process(submission(&token, "208W1A12004", "17.4449", "78.3502"), Utc::now())
        .await
        .expect("first submission accepted");

    // Expire the session one second into the past.
    let mut active: attendance_session::ActiveModel = ctx.session.clone().into();
    active.expires_at = Set(Utc::now() - Duration::seconds(1));
    active.update(&ctx.db).await.unwrap();

    let err = ctx
        .pipeline
        .process(submission(&token, "208W1A12004", "17.4449", "78.3502"), Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(
        rejection(err),
        AttendanceRejection::SessionExpired { .. }
    ));

    let logs = flagged_for(&ctx.db, "208W1A12004").await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].reason, "Expired Session");
}

#[tokio::test]
async fn unknown_session_is_rejected_and_audited() {
    let ctx = setup().await;

    let err = ctx
        .pipeline
        .process(
            submission("no-such-token", "208W1A12005", "17.4449", "78.3502"),
            Utc::now(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        rejection(err),
        AttendanceRejection::SessionNotFound { .. }
    ));

    let logs = flagged_for(&ctx.db, "208W1A12005").await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].reason, "Session Not Found");
    assert_eq!(logs[0].session_token, "no-such-token");
}

#[tokio::test]
async fn coordinate_failures_are_not_audited() {
    let ctx = setup().await;
    let token = ctx.session.session_token.clone();

    // 8 decimal places on latitude.
    let err = ctx
        .pipeline
        .process(
            submission(&token, "208W1A12006", "16.12345678", "78.3502"),
            Utc::now(),
        )
        .await
        .unwrap_err();
    match rejection(err) {
        AttendanceRejection::CoordinatePrecision {
            lat_decimals,
            lon_decimals,
        } => {
            assert_eq!(lat_decimals, 8);
            assert_eq!(lon_decimals, 4);
        }
        other => panic!("expected CoordinatePrecision, got {other:?}"),
    }

    // Out-of-range latitude.
    let err = ctx
        .pipeline
        .process(submission(&token, "208W1A12006", "91.0", "78.3502"), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(
        rejection(err),
        AttendanceRejection::InvalidCoordinate { .. }
    ));

    assert!(flagged_for(&ctx.db, "208W1A12006").await.is_empty());
}

#[tokio::test]
async fn file_sanity_failures_come_before_everything_else() {
    let ctx = setup().await;

    // Oversized selfie on a nonexistent session still reports the file
    // problem: stage 1 runs before stage 3.
    let mut sub = submission("no-such-token", "208W1A12007", "17.4449", "78.3502");
    sub.selfie = Some(SelfieUpload {
        bytes: vec![0u8; 2 * 1024 * 1024],
        content_type: "image/jpeg".into(),
    });
    let err = ctx.pipeline.process(sub, Utc::now()).await.unwrap_err();
    assert!(matches!(
        rejection(err),
        AttendanceRejection::FileSizeTooLarge { .. }
    ));

    let mut sub = submission(&ctx.session.session_token, "208W1A12007", "17.4449", "78.3502");
    sub.selfie = Some(SelfieUpload {
        bytes: b"plain".to_vec(),
        content_type: "text/plain".into(),
    });
    let err = ctx.pipeline.process(sub, Utc::now()).await.unwrap_err();
    assert!(matches!(
        rejection(err),
        AttendanceRejection::FileTypeNotAllowed { .. }
    ));

    assert!(flagged_for(&ctx.db, "208W1A12007").await.is_empty());
}

#[tokio::test]
async fn concurrent_same_roll_submissions_yield_exactly_one_success() {
    let ctx = setup().await;
    let token = ctx.session.session_token.clone();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let pipeline = ctx.pipeline.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            pipeline
                .process(submission(&token, "208W1A12008", "17.4449", "78.3502"), Utc::now())
                .await
        }));
    }

    let mut successes = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.expect("task completed") {
            Ok(_) => successes += 1,
            Err(PipelineError::Rejected(AttendanceRejection::DuplicateAttendance { .. })) => {
                duplicates += 1
            }
            Err(other) => panic!("unexpected outcome: {other:?}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(duplicates, 7);

    let rows = attendance_record::Entity::find()
        .filter(attendance_record::Column::RollNo.eq("208W1A12008"))
        .all(&ctx.db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn audit_entries_survive_a_rollback_on_the_primary_connection() {
    let (db, audit_db, _dir) = setup_paired_test_db().await;
    let audit = AuditLogger::new(audit_db);

    // The audit write commits on its own connection...
    audit
        .record(
            "some-token",
            "208W1A12009",
            services::audit::FlagReason::LocationOutOfRange,
            "620123.00 m from IT Hall (allowed 200.00 m)",
        )
        .await;

    // ...so a transaction rolled back on the primary connection afterwards
    // cannot take it down with it.
    {
        use sea_orm::TransactionTrait;
        let txn = db.begin().await.unwrap();
        flagged_log::Model::create(&txn, "doomed", "r", "Duplicate Attendance", "x")
            .await
            .unwrap();
        txn.rollback().await.unwrap();
    }

    let logs = flagged_log::Entity::find()
        .filter(flagged_log::Column::RollNo.eq("208W1A12009"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].reason, "Location Out of Range");

    let doomed = flagged_log::Entity::find()
        .filter(flagged_log::Column::SessionToken.eq("doomed"))
        .all(&db)
        .await
        .unwrap();
    assert!(doomed.is_empty());
}
