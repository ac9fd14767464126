use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "artifacts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub kind: String,
    pub parent_id: Option<i32>,
    /// 1-based position among siblings.
    pub child_index: Option<i32>,
    pub duration_secs: Option<i64>,
    /// Release instant as an integer epoch-millisecond string.
    pub release_date: Option<String>,
    pub description: Option<String>,
    /// JSON array of free-form tags.
    pub tags: Option<String>,
    pub added_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_states::Entity")]
    UserStates,
    #[sea_orm(has_many = "super::ratings::Entity")]
    Ratings,
    #[sea_orm(has_many = "super::links::Entity")]
    Links,
    #[sea_orm(has_many = "super::genre_map::Entity")]
    GenreMap,
    #[sea_orm(has_many = "super::backlog_entries::Entity")]
    BacklogEntries,
    #[sea_orm(has_many = "super::wishlist_overrides::Entity")]
    WishlistOverrides,
}

impl Related<super::user_states::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserStates.def()
    }
}

impl Related<super::ratings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl Related<super::links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Links.def()
    }
}

impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        super::genre_map::Relation::Genre.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::genre_map::Relation::Artifact.def().rev())
    }
}

impl Related<super::backlog_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BacklogEntries.def()
    }
}

impl Related<super::wishlist_overrides::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WishlistOverrides.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
