//! Domain models, DTOs and the listing primitives shared by every entity kind.

pub mod answer;
pub mod audit;
pub mod criteria;
pub mod entity;
pub mod message;
pub mod message_group;
pub mod pagination;
pub mod topic;
