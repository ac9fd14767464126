use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "backlog_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub backlog_id: i64,
    pub artifact_id: i32,
    pub manual_rank: Option<i64>,
    pub elo: f64,
    pub added_at: String,
    /// JSON array of entry-scoped tags, distinct from the artifact's own.
    pub tags: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::backlogs::Entity",
        from = "Column::BacklogId",
        to = "super::backlogs::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Backlog,
    #[sea_orm(
        belongs_to = "super::artifacts::Entity",
        from = "Column::ArtifactId",
        to = "super::artifacts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Artifact,
}

impl Related<super::backlogs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Backlog.def()
    }
}

impl Related<super::artifacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artifact.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
