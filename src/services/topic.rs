//! Topic moderation workflows: approve, reject and answer, each leaving an
//! audit entry.

use validator::Validate;

use super::listing::ListingService;
use super::records::RecordStore;
use crate::errors::AppError;
use crate::models::answer::{TopicAnswer, UpdateAnswer};
use crate::models::audit::{AuditAction, CreateAuditLog};
use crate::models::topic::{Topic, TopicStatus};

async fn record(
    records: &RecordStore,
    actor: &str,
    topic: &Topic,
    action: AuditAction,
    detail: String,
) {
    records
        .append_audit(CreateAuditLog {
            username: actor.to_string(),
            avatar_url: String::new(),
            action,
            detail,
            topic_id: topic.id.clone(),
        })
        .await;
}

pub async fn approve(
    topics: &ListingService<Topic>,
    records: &RecordStore,
    actor: &str,
    id: &str,
) -> Result<Topic, AppError> {
    let topic = topics.update_status(id, TopicStatus::Approved).await?;
    let detail = format!("Approved topic {}", topic.code);
    record(records, actor, &topic, AuditAction::Approved, detail).await;
    Ok(topic)
}

pub async fn reject(
    topics: &ListingService<Topic>,
    records: &RecordStore,
    actor: &str,
    id: &str,
) -> Result<Topic, AppError> {
    let topic = topics.update_status(id, TopicStatus::Rejected).await?;
    let detail = format!("Rejected topic {}", topic.code);
    record(records, actor, &topic, AuditAction::Rejected, detail).await;
    Ok(topic)
}

/// Store the topic's answer. A pending topic becomes answered.
pub async fn update_answer(
    topics: &ListingService<Topic>,
    records: &RecordStore,
    actor: &str,
    id: &str,
    update: UpdateAnswer,
) -> Result<TopicAnswer, AppError> {
    update.validate()?;

    let mut topic = topics.find_by_id(id).await?;
    if topic.status == TopicStatus::Pending {
        topic = topics.update_status(id, TopicStatus::Answered).await?;
    }

    let answer = records.upsert_answer(&topic.id, &update);
    let detail = format!("{:?} verdict: {}", answer.answer_type, answer.answer);
    record(records, actor, &topic, AuditAction::UpdateAnswer, detail).await;
    tracing::info!(topic_id = %topic.id, verdict = ?answer.answer_type, "Topic answer updated");
    Ok(answer)
}
