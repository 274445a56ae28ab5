use sea_orm::DatabaseConnection;
use sea_orm::entity::prelude::*;

/// Represents an institution in the `institutions` table.
///
/// An institution owns zero or more venues and provides the fallback
/// geofence center for sessions that are not bound to a venue.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "institutions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub city: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::venue::Entity")]
    Venues,
}

impl Related<super::venue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Venues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        name: &str,
        city: &str,
    ) -> Result<Self, DbErr> {
        use sea_orm::{ActiveValue::Set, ActiveModelTrait};

        ActiveModel {
            name: Set(name.to_owned()),
            city: Set(city.to_owned()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_by_name(
        db: &DatabaseConnection,
        name: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find().filter(Column::Name.eq(name)).one(db).await
    }
}
