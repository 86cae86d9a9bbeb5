//! Topic verdicts and answers returned to end users of the ask interface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerType {
    Real,
    Fake,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicAnswer {
    pub answer: String,
    #[serde(rename = "type")]
    pub answer_type: AnswerType,
    pub topic_id: String,
}

/// Request body for creating or replacing a topic's answer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateAnswer {
    #[validate(length(min = 1, max = 4000, message = "answer must be 1-4000 characters"))]
    pub answer: String,
    #[serde(rename = "type")]
    pub answer_type: AnswerType,
}

/// Request body for the end-user ask interface.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AskMessage {
    #[validate(length(min = 1, max = 2000, message = "message must be 1-2000 characters"))]
    pub message: String,
}

/// Reply to an asked message. `answer` is present exactly when `has_answer` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AskAnswer {
    pub id: String,
    pub code: String,
    pub topic_id: String,
    pub message: String,
    pub create_date: DateTime<Utc>,
    pub has_answer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl AskAnswer {
    pub fn answered(
        id: &str,
        code: &str,
        topic_id: &str,
        message: &str,
        answer: &str,
        create_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            code: code.to_string(),
            topic_id: topic_id.to_string(),
            message: message.to_string(),
            create_date,
            has_answer: true,
            answer: Some(answer.to_string()),
        }
    }

    pub fn unanswered(
        id: &str,
        code: &str,
        topic_id: &str,
        message: &str,
        create_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            code: code.to_string(),
            topic_id: topic_id.to_string(),
            message: message.to_string(),
            create_date,
            has_answer: false,
            answer: None,
        }
    }
}
