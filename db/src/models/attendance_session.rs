use chrono::{DateTime, Duration, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::DatabaseConnection;
use sea_orm::entity::prelude::*;
use uuid::Uuid;

/// A QR session row in the `qr_sessions` table.
///
/// Sessions carry no status column: a session is expired exactly when the
/// wall clock has passed `expires_at`, computed on every read. They are never
/// deleted by the core, only superseded by newer ones.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "qr_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub session_token: String,
    pub venue_id: Option<i64>,
    pub qr_payload: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::venue::Entity",
        from = "Column::VenueId",
        to = "super::venue::Column::Id"
    )]
    Venue,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
}

impl Related<super::venue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Venue.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Longest session window a caller may request, in minutes (24 hours).
pub const MAX_SESSION_MINUTES: i64 = 1440;

impl Model {
    /// Creates a session with a fresh unguessable token.
    ///
    /// `duration_minutes` must lie in `(0, 1440]`; anything else is rejected
    /// before touching the database. The QR payload is the frontend URL that
    /// embeds the token; rendering it to an image happens elsewhere.
    pub async fn create(
        db: &DatabaseConnection,
        duration_minutes: i64,
        venue_id: Option<i64>,
        frontend_url: &str,
    ) -> Result<Self, DbErr> {
        use sea_orm::ActiveModelTrait;

        if duration_minutes <= 0 || duration_minutes > MAX_SESSION_MINUTES {
            return Err(DbErr::Custom(format!(
                "Session duration must be between 1 and {MAX_SESSION_MINUTES} minutes"
            )));
        }

        if let Some(vid) = venue_id {
            let exists = super::venue::Entity::find_by_id(vid).one(db).await?;
            if exists.is_none() {
                return Err(DbErr::RecordNotFound(format!("Venue ID {vid} not found")));
            }
        }

        let token = Uuid::new_v4().to_string();
        let now = Utc::now();

        ActiveModel {
            session_token: Set(token.clone()),
            venue_id: Set(venue_id),
            qr_payload: Set(format!("{frontend_url}/mark-attendance/{token}")),
            created_at: Set(now),
            expires_at: Set(now + Duration::minutes(duration_minutes)),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_by_token(
        db: &DatabaseConnection,
        token: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::SessionToken.eq(token))
            .one(db)
            .await
    }

    /// Expiry is a derived predicate, not stored state.
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whole seconds until expiry; zero once expired.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}
