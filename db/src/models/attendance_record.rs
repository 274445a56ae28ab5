use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use sea_orm::entity::prelude::*;

/// An accepted attendance submission in the `attendances` table.
///
/// Rows are written exactly once by the validation pipeline and never
/// mutated. The `(session_token, roll_no)` pair is covered by a unique index;
/// the application-level duplicate check is a fast path only, the index is
/// the invariant of last resort under concurrent submission.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_token: String,
    pub roll_no: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub branch: String,
    pub section: String,
    pub location_lat: f64,
    pub location_lon: f64,
    pub is_valid_location: bool,
    pub venue_id: Option<i64>,
    pub selfie_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attendance_session::Entity",
        from = "Column::SessionToken",
        to = "super::attendance_session::Column::SessionToken"
    )]
    Session,
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Returns the existing record for `(session_token, roll_no)` if the
    /// student already marked attendance in this session.
    pub async fn find_duplicate(
        db: &DatabaseConnection,
        session_token: &str,
        roll_no: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::SessionToken.eq(session_token))
            .filter(Column::RollNo.eq(roll_no))
            .one(db)
            .await
    }
}
