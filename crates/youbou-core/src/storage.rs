//! Submission record storage.
//!
//! Associates each relayed message with its sealed submitter so a post can be
//! traced back for moderation. Handlers only see the [`SubmissionStore`]
//! trait; the process wires in [`InMemorySubmissionStore`], and a durable
//! implementation can be swapped in without touching the relay.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::Result,
    models::{EncryptedUserId, MessageTs},
};

/// Storage operations required by the submission relay.
#[async_trait]
pub trait SubmissionStore: Send + Sync + 'static {
    /// Records the sealed submitter of a posted message.
    ///
    /// Message timestamps are unique per channel; recording the same
    /// timestamp twice keeps the last submitter.
    async fn record(&self, ts: MessageTs, submitter: EncryptedUserId) -> Result<()>;

    /// Returns the number of recorded submissions.
    async fn count(&self) -> Result<usize>;
}

/// Process-memory submission store.
///
/// Records are lost on restart and never evicted.
#[derive(Debug, Clone, Default)]
pub struct InMemorySubmissionStore {
    records: Arc<RwLock<HashMap<MessageTs, EncryptedUserId>>>,
}

impl InMemorySubmissionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every record, for inspection in tests and tooling.
    pub async fn snapshot(&self) -> HashMap<MessageTs, EncryptedUserId> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn record(&self, ts: MessageTs, submitter: EncryptedUserId) -> Result<()> {
        self.records.write().await.insert(ts, submitter);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}
