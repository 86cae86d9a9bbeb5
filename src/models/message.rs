//! User-submitted message attached to a topic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub code: String,
    pub message: String,
    pub create_date: DateTime<Utc>,
    pub count_of_message_group: i64,
    pub topic_id: String,
}
