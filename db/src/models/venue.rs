use sea_orm::DatabaseConnection;
use sea_orm::entity::prelude::*;

/// Represents a venue in the `venues` table.
///
/// A venue carries its own geofence (center + radius) and belongs to exactly
/// one institution. Rows are treated as immutable once a session references
/// them; there is no update path in the core.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "venues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub institution_id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::institution::Entity",
        from = "Column::InstitutionId",
        to = "super::institution::Column::Id"
    )]
    Institution,
    #[sea_orm(has_many = "super::attendance_session::Entity")]
    Sessions,
}

impl Related<super::institution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Institution.def()
    }
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        institution_id: i64,
        name: &str,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> Result<Self, DbErr> {
        use sea_orm::{ActiveModelTrait, ActiveValue::Set};

        if radius_meters <= 0.0 {
            return Err(DbErr::Custom("Venue radius must be positive".into()));
        }

        ActiveModel {
            institution_id: Set(institution_id),
            name: Set(name.to_owned()),
            latitude: Set(latitude),
            longitude: Set(longitude),
            radius_meters: Set(radius_meters),
            ..Default::default()
        }
        .insert(db)
        .await
    }
}
