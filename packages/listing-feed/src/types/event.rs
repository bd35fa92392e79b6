//! Events pushed to the subscriber of a streaming session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::listing::Listing;

/// One event on the wire: `{ "type": ..., ...payload, "timestamp": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    #[serde(flatten)]
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Status {
        message: String,
    },
    BatchStart {
        /// 1-based batch number
        batch: usize,
        offset: usize,
        size: usize,
    },
    #[serde(rename = "property")]
    Record {
        data: Box<Listing>,
        #[serde(rename = "isDemo")]
        is_demo: bool,
    },
    Error {
        message: String,
    },
    Complete {
        total: usize,
        #[serde(rename = "isDemo")]
        is_demo: bool,
    },
}

impl StreamEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }

    pub fn status(message: impl Into<String>) -> Self {
        Self::new(EventKind::Status {
            message: message.into(),
        })
    }

    pub fn batch_start(batch: usize, offset: usize, size: usize) -> Self {
        Self::new(EventKind::BatchStart {
            batch,
            offset,
            size,
        })
    }

    pub fn record(listing: Listing, is_demo: bool) -> Self {
        Self::new(EventKind::Record {
            data: Box::new(listing),
            is_demo,
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(EventKind::Error {
            message: message.into(),
        })
    }

    pub fn complete(total: usize, is_demo: bool) -> Self {
        Self::new(EventKind::Complete { total, is_demo })
    }

    /// The wire `type` discriminator.
    pub fn event_type(&self) -> &'static str {
        match self.kind {
            EventKind::Status { .. } => "status",
            EventKind::BatchStart { .. } => "batch_start",
            EventKind::Record { .. } => "property",
            EventKind::Error { .. } => "error",
            EventKind::Complete { .. } => "complete",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, EventKind::Complete { .. })
    }
}
