//! Topic audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    UpdateAnswer,
    Approved,
    Rejected,
}

impl AuditAction {
    /// Human-readable label shown in the audit timeline.
    pub fn description(&self) -> &'static str {
        match self {
            Self::UpdateAnswer => "Update answer",
            Self::Approved => "Approve",
            Self::Rejected => "Reject",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicAuditLog {
    pub id: Uuid,
    pub avatar_url: String,
    pub username: String,
    pub action_date: DateTime<Utc>,
    #[serde(rename = "status")]
    pub action: AuditAction,
    pub detail: String,
    pub topic_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLog {
    pub username: String,
    pub avatar_url: String,
    pub action: AuditAction,
    pub detail: String,
    pub topic_id: String,
}

/// Query parameters for the audit timeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogFilters {
    #[serde(default, deserialize_with = "crate::models::criteria::comma_separated")]
    pub types: Option<Vec<AuditAction>>,
}
