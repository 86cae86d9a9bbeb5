//! Dashboard statistics aggregation.

use serde::Serialize;

use super::listing::{ListingService, StatusCounts, StatusPartition, TotalScope};
use super::records::{RecordStore, VerdictSplit};
use crate::errors::AppError;
use crate::models::criteria::Criteria;
use crate::models::message_group::{MessageGroup, MessageGroupStatus};
use crate::models::topic::{Topic, TopicStatus};

/// Statuses counted in the message group "total" tab.
pub const ACTIVE_MESSAGE_GROUP_STATUSES: [MessageGroupStatus; 2] =
    [MessageGroupStatus::Pending, MessageGroupStatus::Approved];

/// Aggregated statistics for the overview page.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub topics: StatusCounts,
    pub message_groups: StatusCounts,
    pub verdicts: VerdictSplit,
}

/// Fetch all dashboard statistics concurrently.
pub async fn get_stats(
    topics: &ListingService<Topic>,
    message_groups: &ListingService<MessageGroup>,
    records: &RecordStore,
) -> Result<DashboardStats, AppError> {
    let topic_partitions = StatusPartition::per_status();
    let group_partitions = StatusPartition::per_status();
    let group_scope = TotalScope::Statuses(ACTIVE_MESSAGE_GROUP_STATUSES.to_vec());

    let topic_criteria = Criteria::<TopicStatus>::default();
    let group_criteria = Criteria::<MessageGroupStatus>::default();
    let (topic_counts, group_counts) = tokio::try_join!(
        topics.count_by_status_partitions(&topic_criteria, &topic_partitions, &TotalScope::Union),
        message_groups.count_by_status_partitions(&group_criteria, &group_partitions, &group_scope),
    )?;

    Ok(DashboardStats {
        topics: topic_counts,
        message_groups: group_counts,
        verdicts: records.verdict_split(),
    })
}
