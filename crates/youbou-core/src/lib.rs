//! Core domain types for the anonymous request relay.
//!
//! Holds everything that does not depend on HTTP or on the chat platform:
//! the error taxonomy, text sanitization, the identity vault that hides
//! submitter identifiers, and the submission record store.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;
pub mod sanitize;
pub mod storage;
pub mod vault;

pub use error::{Result, YoubouError};
pub use models::{ChannelId, EncryptedUserId, MessageTs, VoteSummary, VoteTally};
pub use sanitize::{sanitize, MAX_SUBMISSION_CHARS};
pub use storage::{InMemorySubmissionStore, SubmissionStore};
pub use vault::IdentityVault;
