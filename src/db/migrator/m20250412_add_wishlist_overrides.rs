use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(WishlistOverrides)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_wishlist_overrides_user_artifact")
                    .table(crate::entities::wishlist_overrides::Entity)
                    .col(crate::entities::wishlist_overrides::Column::UserId)
                    .col(crate::entities::wishlist_overrides::Column::ArtifactId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_states_user_artifact")
                    .table(crate::entities::user_states::Entity)
                    .col(crate::entities::user_states::Column::UserId)
                    .col(crate::entities::user_states::Column::ArtifactId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_backlog_entries_backlog")
                    .table(crate::entities::backlog_entries::Entity)
                    .col(crate::entities::backlog_entries::Column::BacklogId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_backlog_entries_backlog")
                    .table(crate::entities::backlog_entries::Entity)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_states_user_artifact")
                    .table(crate::entities::user_states::Entity)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(WishlistOverrides).to_owned())
            .await?;
        Ok(())
    }
}
