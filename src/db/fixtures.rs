//! Built-in mock dataset served when no remote API is configured.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::models::answer::{AnswerType, AskAnswer, TopicAnswer};
use crate::models::audit::{AuditAction, TopicAuditLog};
use crate::models::message::Message;
use crate::models::message_group::{MessageGroup, MessageGroupStatus};
use crate::models::topic::{Topic, TopicStatus};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

pub fn topics() -> Vec<Topic> {
    use TopicStatus::*;

    let rows = [
        (Pending, "This is the first topic.", at(2023, 10, 1, 10, 0), 3, 12),
        (Answered, "This is the second topic.", at(2023, 10, 2, 14, 30), 5, 20),
        (Rejected, "This is the third topic.", at(2023, 10, 3, 9, 15), 1, 5),
        (Approved, "This is the fourth topic.", at(2023, 10, 4, 11, 45), 4, 18),
        (Pending, "Drinking hot water cures the flu.", at(2023, 10, 5, 8, 20), 2, 9),
        (Pending, "Banks will close all branches next month.", at(2023, 10, 6, 16, 5), 1, 3),
        (Answered, "New tax on mobile top-ups starts in January.", at(2023, 10, 7, 13, 40), 2, 7),
        (Approved, "Vaccine certificates are no longer required for travel.", at(2023, 10, 8, 10, 10), 3, 15),
        (Rejected, "Free electricity for every household this summer.", at(2023, 10, 9, 19, 0), 1, 2),
        (Pending, "Lemon juice detects counterfeit banknotes.", at(2023, 10, 10, 7, 55), 1, 4),
        (Answered, "Flood warning issued for the whole northern region.", at(2023, 10, 11, 12, 25), 2, 11),
        (Approved, "Government lottery moves to online-only sales.", at(2023, 10, 12, 18, 30), 1, 6),
    ];

    rows.into_iter()
        .enumerate()
        .map(|(i, (status, description, create_date, groups, messages))| Topic {
            id: (i + 1).to_string(),
            code: format!("T{:03}", i + 1),
            status,
            description: description.to_string(),
            create_date,
            count_of_message_group: groups,
            count_of_total_message: messages,
        })
        .collect()
}

pub fn message_groups() -> Vec<MessageGroup> {
    use MessageGroupStatus::*;

    let rows = [
        ("1", Pending, "hot water flu", "Is it true hot water cures the flu?", "en"),
        ("1", Approved, "hot water flu th", "ดื่มน้ำร้อนรักษาไข้หวัดได้จริงไหม", "th"),
        ("1", Pending, "flu remedy", "Hot water every morning stops the flu", "en"),
        ("2", Assigned, "branch closure", "Are banks closing all branches?", "en"),
        ("2", Rejected, "bank rumor", "Someone said my bank closes next month", "en"),
        ("3", Pending, "top-up tax", "Will top-ups be taxed from January?", "en"),
        ("4", Approved, "travel vaccine", "Do I still need a vaccine certificate to travel?", "en"),
        ("4", Pending, "travel rules", "New travel rules without vaccine papers", "en"),
        ("5", Rejected, "free power", "Free electricity for everyone this summer", "en"),
        ("6", Pending, "lemon banknote", "Lemon juice shows fake banknotes", "en"),
    ];

    rows.into_iter()
        .enumerate()
        .map(|(i, (topic_id, status, name, text, language))| {
            let created_at = at(2023, 10, 1 + i as u32, 9, 0);
            MessageGroup {
                id: (i + 1).to_string(),
                status,
                topic_id: topic_id.to_string(),
                name: name.to_string(),
                text: text.to_string(),
                text_sha1: format!("{:040x}", i + 1),
                language: language.to_string(),
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}

pub fn messages() -> Vec<Message> {
    let topic_ids = ["1", "1", "1", "2", "2", "3", "3", "4", "4"];
    topic_ids
        .into_iter()
        .enumerate()
        .map(|(i, topic_id)| Message {
            id: (i + 1).to_string(),
            code: format!("MSG{:03}", i + 1),
            message: format!("This is message {}", i + 1),
            create_date: at(2023, 10, 1, 8 + i as u32, 0),
            count_of_message_group: 1,
            topic_id: topic_id.to_string(),
        })
        .collect()
}

pub fn answers() -> Vec<TopicAnswer> {
    vec![
        TopicAnswer {
            answer: "This claim has been verified by multiple independent sources.".to_string(),
            answer_type: AnswerType::Real,
            topic_id: "1".to_string(),
        },
        TopicAnswer {
            answer: "Official government reports confirm this statement is accurate.".to_string(),
            answer_type: AnswerType::Real,
            topic_id: "3".to_string(),
        },
        TopicAnswer {
            answer: "Fact-checkers have debunked this claim as false.".to_string(),
            answer_type: AnswerType::Fake,
            topic_id: "4".to_string(),
        },
    ]
}

pub fn audit_logs() -> Vec<TopicAuditLog> {
    use AuditAction::*;

    let rows = [
        ("1", 1, UpdateAnswer, "Created new topic", at(2023, 10, 1, 10, 0)),
        ("1", 1, UpdateAnswer, "Test test", at(2023, 10, 2, 10, 0)),
        ("1", 1, Approved, "Updated topic title", at(2023, 10, 1, 12, 0)),
        ("1", 1, UpdateAnswer, "Added initial comments", at(2023, 10, 1, 14, 0)),
        ("2", 2, Rejected, "Updated topic description", at(2023, 10, 2, 11, 30)),
        ("2", 2, Approved, "Added new section", at(2023, 10, 2, 13, 45)),
        ("3", 3, UpdateAnswer, "Deleted irrelevant content", at(2023, 10, 3, 12, 45)),
        ("3", 3, Rejected, "Updated references", at(2023, 10, 3, 15, 0)),
        ("4", 4, UpdateAnswer, "Added new comments", at(2023, 10, 4, 14, 15)),
        ("4", 4, Approved, "Replied to comment", at(2023, 10, 4, 16, 30)),
    ];

    rows.into_iter()
        .enumerate()
        .map(|(i, (topic_id, user, action, detail, action_date))| TopicAuditLog {
            id: Uuid::from_u128(i as u128 + 1),
            avatar_url: format!("/assets/avatars/mockup/{user}.jpg"),
            username: format!("user{user}"),
            action_date,
            action,
            detail: detail.to_string(),
            topic_id: topic_id.to_string(),
        })
        .collect()
}

pub fn ask_answers() -> Vec<AskAnswer> {
    vec![
        AskAnswer::answered("1", "ANS001", "1", "hello", "This is answer", at(2023, 10, 1, 9, 0)),
        AskAnswer::unanswered("2", "ANS002", "2", "User ask", at(2023, 10, 2, 9, 0)),
    ]
}
