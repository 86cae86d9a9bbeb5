//! Business logic services.

pub mod cache;
pub mod dashboard;
pub mod filter;
pub mod lifecycle;
pub mod listing;
pub mod records;
pub mod topic;
