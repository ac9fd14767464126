use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "genres")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::genre_map::Entity")]
    GenreMap,
}

impl Related<super::genre_map::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GenreMap.def()
    }
}

impl Related<super::artifacts::Entity> for Entity {
    fn to() -> RelationDef {
        super::genre_map::Relation::Artifact.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::genre_map::Relation::Genre.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
