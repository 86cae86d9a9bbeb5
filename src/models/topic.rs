//! Topic model: a fact-check request under moderation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{EntityStatus, Listable};
use crate::services::lifecycle;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopicStatus {
    Pending,
    Answered,
    Rejected,
    Approved,
}

impl EntityStatus for TopicStatus {
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Answered,
        Self::Rejected,
        Self::Approved,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Answered => "ANSWERED",
            Self::Rejected => "REJECTED",
            Self::Approved => "APPROVED",
        }
    }

    fn can_transition_to(&self, next: &Self) -> bool {
        lifecycle::is_valid_topic_transition(self, next)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub code: String,
    pub status: TopicStatus,
    pub description: String,
    pub create_date: DateTime<Utc>,
    pub count_of_message_group: i64,
    pub count_of_total_message: i64,
}

impl Listable for Topic {
    type Status = TopicStatus;
    const KIND: &'static str = "topic";

    fn id(&self) -> &str {
        &self.id
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn text(&self) -> &str {
        &self.description
    }

    fn status(&self) -> TopicStatus {
        self.status
    }

    fn set_status(&mut self, status: TopicStatus) {
        self.status = status;
    }
}

/// Request body for an explicit status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}
