use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_states::Entity")]
    UserStates,
    #[sea_orm(has_many = "super::backlogs::Entity")]
    Backlogs,
    #[sea_orm(has_many = "super::wishlist_overrides::Entity")]
    WishlistOverrides,
}

impl Related<super::user_states::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserStates.def()
    }
}

impl Related<super::backlogs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Backlogs.def()
    }
}

impl Related<super::wishlist_overrides::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WishlistOverrides.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
