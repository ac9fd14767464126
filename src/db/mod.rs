use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::artifact::ArtifactRepository;
pub use repositories::backlog::BacklogRepository;
pub use repositories::state::UserStateRepository;
pub use repositories::user::{User, UserRepository};

/// Handle to the SQLite store. Cheap to clone; all repositories share the
/// underlying connection pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        migrator::Migrator::up(&conn, None).await?;
        info!("Database ready: {db_url}");

        Ok(Self { conn })
    }

    #[must_use]
    pub fn artifacts(&self) -> ArtifactRepository {
        ArtifactRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn states(&self) -> UserStateRepository {
        UserStateRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn backlogs(&self) -> BacklogRepository {
        BacklogRepository::new(self.conn.clone())
    }
}
