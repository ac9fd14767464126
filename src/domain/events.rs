//! Domain events for the application.
//!
//! Services publish these over a broadcast bus to notify interested parties
//! of state changes. The default subscriber is a logger task that mirrors
//! events into tracing output.

use serde::Serialize;

use crate::domain::{ArtifactId, BacklogId, UserId, WatchStatus};

/// Events emitted by the service layer.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum NotificationEvent {
    ArtifactAdded {
        artifact_id: ArtifactId,
        title: String,
    },
    ArtifactDeleted {
        artifact_id: ArtifactId,
        removed: usize,
    },

    StatusChanged {
        user_id: UserId,
        artifact_id: ArtifactId,
        status: WatchStatus,
        cascaded: usize,
    },
    ScoreChanged {
        user_id: UserId,
        artifact_id: ArtifactId,
        score: f64,
    },

    BacklogCreated {
        backlog_id: BacklogId,
        title: String,
    },
    EntryAdded {
        backlog_id: BacklogId,
        artifact_id: ArtifactId,
    },
    EntryRemoved {
        backlog_id: BacklogId,
        artifact_id: ArtifactId,
    },
    DuelRecorded {
        backlog_id: BacklogId,
        winner: ArtifactId,
        loser: ArtifactId,
    },

    UserRegistered {
        user_id: UserId,
        username: String,
    },

    Error {
        message: String,
    },
}
