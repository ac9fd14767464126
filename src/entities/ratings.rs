use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ratings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub artifact_id: i32,
    pub source: String,
    /// Nullable: a scraper may record a source it could not score.
    pub value: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::artifacts::Entity",
        from = "Column::ArtifactId",
        to = "super::artifacts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Artifact,
}

impl Related<super::artifacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artifact.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
