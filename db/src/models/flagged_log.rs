use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::ConnectionTrait;
use sea_orm::entity::prelude::*;

/// An append-only audit entry in the `flagged_logs` table.
///
/// `session_token` is a weak reference by convention: there is deliberately
/// no foreign key back to `qr_sessions`, so an entry survives even if the
/// session row disappears later.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "flagged_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_token: String,
    pub roll_no: String,
    pub reason: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C>(
        db: &C,
        session_token: &str,
        roll_no: &str,
        reason: &str,
        details: &str,
    ) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        use sea_orm::ActiveModelTrait;

        ActiveModel {
            session_token: Set(session_token.to_owned()),
            roll_no: Set(roll_no.to_owned()),
            reason: Set(reason.to_owned()),
            details: Set(details.to_owned()),
            timestamp: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }
}
