//! Auxiliary topic records kept in memory: messages, answers, the audit
//! trail and replies to asked messages.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::fixtures;
use crate::models::answer::{AnswerType, AskAnswer, TopicAnswer, UpdateAnswer};
use crate::models::audit::{AuditAction, CreateAuditLog, TopicAuditLog};
use crate::models::message::Message;

/// Topic answers split by verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerdictSplit {
    pub real: i64,
    pub fake: i64,
}

#[derive(Debug, Default)]
pub struct RecordStore {
    messages: Vec<Message>,
    answers: DashMap<String, TopicAnswer>,
    audit_logs: RwLock<Vec<TopicAuditLog>>,
    ask_answers: DashMap<String, AskAnswer>,
    /// Asked message text to reply id.
    asked: DashMap<String, String>,
    ask_counter: AtomicU64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the mock dataset.
    pub fn with_fixtures() -> Self {
        let ask_answers = fixtures::ask_answers();
        let store = Self {
            messages: fixtures::messages(),
            answers: DashMap::new(),
            audit_logs: RwLock::new(fixtures::audit_logs()),
            ask_answers: DashMap::new(),
            asked: DashMap::new(),
            ask_counter: AtomicU64::new(ask_answers.len() as u64),
        };
        for answer in fixtures::answers() {
            store.answers.insert(answer.topic_id.clone(), answer);
        }
        for reply in ask_answers {
            store.asked.insert(reply.message.clone(), reply.id.clone());
            store.ask_answers.insert(reply.id.clone(), reply);
        }
        store
    }

    pub fn messages_for_topic(&self, topic_id: &str) -> Vec<Message> {
        self.messages
            .iter()
            .filter(|m| m.topic_id == topic_id)
            .cloned()
            .collect()
    }

    pub fn answer_for_topic(&self, topic_id: &str) -> Option<TopicAnswer> {
        self.answers.get(topic_id).map(|entry| entry.value().clone())
    }

    /// Create or replace a topic's answer. Pending replies to messages under
    /// the topic receive the new text.
    pub fn upsert_answer(&self, topic_id: &str, update: &UpdateAnswer) -> TopicAnswer {
        let answer = TopicAnswer {
            answer: update.answer.clone(),
            answer_type: update.answer_type,
            topic_id: topic_id.to_string(),
        };
        self.answers.insert(topic_id.to_string(), answer.clone());

        for mut reply in self.ask_answers.iter_mut() {
            if reply.topic_id == topic_id {
                reply.has_answer = true;
                reply.answer = Some(answer.answer.clone());
            }
        }
        answer
    }

    pub fn verdict_split(&self) -> VerdictSplit {
        self.answers
            .iter()
            .fold(VerdictSplit::default(), |mut split, entry| {
                match entry.answer_type {
                    AnswerType::Real => split.real += 1,
                    AnswerType::Fake => split.fake += 1,
                }
                split
            })
    }

    /// Audit entries of one topic, optionally restricted to some actions.
    /// An empty action list does not filter.
    pub async fn audit_logs(
        &self,
        topic_id: &str,
        types: Option<&[AuditAction]>,
    ) -> Vec<TopicAuditLog> {
        let types = types.filter(|t| !t.is_empty());
        self.audit_logs
            .read()
            .await
            .iter()
            .filter(|log| log.topic_id == topic_id)
            .filter(|log| types.map_or(true, |t| t.contains(&log.action)))
            .cloned()
            .collect()
    }

    pub async fn append_audit(&self, entry: CreateAuditLog) -> TopicAuditLog {
        let log = TopicAuditLog {
            id: Uuid::now_v7(),
            avatar_url: entry.avatar_url,
            username: entry.username,
            action_date: Utc::now(),
            action: entry.action,
            detail: entry.detail,
            topic_id: entry.topic_id,
        };
        self.audit_logs.write().await.push(log.clone());
        tracing::debug!(
            topic_id = %log.topic_id,
            action = log.action.description(),
            "Audit entry recorded"
        );
        log
    }

    /// Reply to an asked message. Exact repeats of an earlier question get
    /// the stored reply; anything new is recorded unanswered. The message
    /// entry stays locked until the reply exists, so concurrent first asks
    /// of the same text share one reply.
    pub fn ask(&self, message: &str) -> AskAnswer {
        let slot = self.asked.entry(message.to_string());
        if let Entry::Occupied(known) = &slot {
            if let Some(reply) = self.ask_answers.get(known.get()) {
                return reply.value().clone();
            }
        }

        let seq = self.ask_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let reply = AskAnswer::unanswered(
            &seq.to_string(),
            &format!("ANS{seq:03}"),
            "",
            message,
            Utc::now(),
        );
        self.ask_answers.insert(reply.id.clone(), reply.clone());
        match slot {
            Entry::Occupied(mut known) => {
                known.insert(reply.id.clone());
            }
            Entry::Vacant(vacant) => {
                vacant.insert(reply.id.clone());
            }
        }
        tracing::info!(id = %reply.id, code = %reply.code, "New question recorded");
        reply
    }

    pub fn get_ask_answer(&self, id: &str) -> Option<AskAnswer> {
        self.ask_answers.get(id).map(|entry| entry.value().clone())
    }
}
