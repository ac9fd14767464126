pub mod artifact;
pub mod backlog;
pub mod progress;
pub mod rating;

pub use artifact::{ArtifactNode, ExternalLink, NewArtifact, OngoingProgress, TreeError, UserState};
pub use backlog::{Backlog, BacklogItem};
pub use progress::Progress;
pub use rating::RatingEntry;
