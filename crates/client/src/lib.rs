//! Client-side live feed for Feedboard.
//!
//! The heart of this crate is [`FeedSession`]: it owns the in-memory
//! feedback list for one viewing session, merges live change
//! notifications into it, and drives the optimistic delete path. The
//! session depends on two injected boundaries, a [`ChangeSource`] for
//! notifications and a [`FeedbackBackend`] for mutations, so tests can
//! run it entirely in memory.
//!
//! The binary entrypoint (`feedboard-watch`) lives in `main.rs`.

pub mod backend;
pub mod feed;
pub mod session;
pub mod source;

pub use backend::{BackendError, FeedbackBackend, HttpBackend};
pub use feed::LiveFeed;
pub use session::FeedSession;
pub use source::{ChangeSource, ChangeSubscription, WsChangeSource};
