pub mod artifact_service;
pub use artifact_service::{ArtifactError, ArtifactService, ArtifactSummary};

pub mod artifact_service_impl;
pub use artifact_service_impl::SeaOrmArtifactService;

pub mod backlog_service;
pub use backlog_service::{BacklogError, BacklogService};

pub mod backlog_service_impl;
pub use backlog_service_impl::SeaOrmBacklogService;

pub mod user_service;
pub use user_service::{UserError, UserService};

pub mod user_service_impl;
pub use user_service_impl::SeaOrmUserService;
