//! Shared domain layer for Feedboard.
//!
//! Holds the types, validation rules, and error taxonomy used by every
//! other crate in the workspace: the canonical [`feedback::FeedbackItem`]
//! entity, the [`error::CoreError`] domain error, and the id/timestamp
//! aliases in [`types`].

pub mod error;
pub mod feedback;
pub mod types;
