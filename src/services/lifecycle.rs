//! Moderation state machines for topics and message groups.
//!
//! Validates that status changes follow the allowed graph before a data
//! source is asked to persist them.

use crate::errors::AppError;
use crate::models::entity::EntityStatus;
use crate::models::message_group::MessageGroupStatus;
use crate::models::topic::TopicStatus;

/// Check whether a topic status transition is valid per the moderation graph.
pub fn is_valid_topic_transition(from: &TopicStatus, to: &TopicStatus) -> bool {
    matches!(
        (from, to),
        (TopicStatus::Pending, TopicStatus::Answered)
            | (TopicStatus::Pending, TopicStatus::Approved)
            | (TopicStatus::Pending, TopicStatus::Rejected)
            | (TopicStatus::Answered, TopicStatus::Approved)
            | (TopicStatus::Answered, TopicStatus::Rejected)
            // Rejected topics can be reopened
            | (TopicStatus::Rejected, TopicStatus::Pending)
    )
}

/// Check whether a message group status transition is valid.
pub fn is_valid_message_group_transition(
    from: &MessageGroupStatus,
    to: &MessageGroupStatus,
) -> bool {
    matches!(
        (from, to),
        (MessageGroupStatus::Pending, MessageGroupStatus::Approved)
            | (MessageGroupStatus::Pending, MessageGroupStatus::Rejected)
            | (MessageGroupStatus::Approved, MessageGroupStatus::Assigned)
            | (MessageGroupStatus::Approved, MessageGroupStatus::Rejected)
            | (MessageGroupStatus::Rejected, MessageGroupStatus::Pending)
    )
}

/// Statuses reachable from `from`.
pub fn next_statuses<S: EntityStatus>(from: &S) -> Vec<S> {
    S::ALL
        .iter()
        .copied()
        .filter(|to| from.can_transition_to(to))
        .collect()
}

/// Validate a transition, returning an error describing the rejected edge.
pub fn validate_transition<S: EntityStatus>(from: &S, to: &S) -> Result<(), AppError> {
    if from.can_transition_to(to) {
        return Ok(());
    }
    let allowed = next_statuses(from)
        .iter()
        .map(|status| status.as_str())
        .collect::<Vec<_>>();
    let allowed = if allowed.is_empty() {
        "none".to_string()
    } else {
        allowed.join(", ")
    };
    Err(AppError::InvalidTransition(format!(
        "Cannot transition from {} to {} (allowed: {allowed})",
        from.as_str(),
        to.as_str()
    )))
}
