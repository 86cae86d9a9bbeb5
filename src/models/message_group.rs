//! Message group model: user messages clustered by identical text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{EntityStatus, Listable};
use crate::services::lifecycle;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MessageGroupStatus {
    #[serde(rename = "MGROUP_PENDING")]
    Pending,
    #[serde(rename = "MGROUP_APPROVED")]
    Approved,
    #[serde(rename = "MGROUP_ASSIGNED")]
    Assigned,
    #[serde(rename = "MGROUP_REJECTED")]
    Rejected,
}

impl EntityStatus for MessageGroupStatus {
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Approved,
        Self::Assigned,
        Self::Rejected,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "MGROUP_PENDING",
            Self::Approved => "MGROUP_APPROVED",
            Self::Assigned => "MGROUP_ASSIGNED",
            Self::Rejected => "MGROUP_REJECTED",
        }
    }

    fn can_transition_to(&self, next: &Self) -> bool {
        lifecycle::is_valid_message_group_transition(self, next)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageGroup {
    pub id: String,
    pub status: MessageGroupStatus,
    pub topic_id: String,
    pub name: String,
    pub text: String,
    pub text_sha1: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listable for MessageGroup {
    type Status = MessageGroupStatus;
    const KIND: &'static str = "message group";

    fn id(&self) -> &str {
        &self.id
    }

    fn code(&self) -> &str {
        &self.name
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn status(&self) -> MessageGroupStatus {
        self.status
    }

    fn set_status(&mut self, status: MessageGroupStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    fn parent_id(&self) -> Option<&str> {
        Some(&self.topic_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names_match_serde() {
        for status in MessageGroupStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_str());
        }
    }

    #[test]
    fn set_status_touches_updated_at() {
        let stamp = DateTime::<Utc>::default();
        let mut group = MessageGroup {
            id: "1".to_string(),
            status: MessageGroupStatus::Pending,
            topic_id: "1".to_string(),
            name: "group".to_string(),
            text: "text".to_string(),
            text_sha1: String::new(),
            language: "th".to_string(),
            created_at: stamp,
            updated_at: stamp,
        };
        group.set_status(MessageGroupStatus::Approved);
        assert_eq!(group.status, MessageGroupStatus::Approved);
        assert!(group.updated_at > stamp);
        assert_eq!(group.parent_id(), Some("1"));
    }
}
