// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Condition waiter: polls the live object until every condition holds.

use crate::error::{CrError, Result};
use crate::types::condition::ConditionSpec;
use crate::types::document::ResourceDocument;
use crate::types::identity::ResourceIdentity;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Source of live documents for the waiter
#[async_trait]
pub trait ResourceReader: Send + Sync {
    async fn read(&self, identity: &ResourceIdentity) -> Result<ResourceDocument>;
}

pub struct ConditionWaiter<'a, R: ResourceReader + ?Sized> {
    reader: &'a R,
    poll_interval: Duration,
}

impl<'a, R: ResourceReader + ?Sized> ConditionWaiter<'a, R> {
    pub fn new(reader: &'a R, poll_interval: Duration) -> Self {
        Self {
            reader,
            poll_interval,
        }
    }

    /// Wait until all conditions hold and return the last observed document.
    ///
    /// Conditions are awaited in order, each against its own deadline starting
    /// when the wait for that condition begins. A document already observed
    /// is checked before polling again. A missing object or path counts as
    /// "not yet"; any other read failure ends the wait.
    ///
    /// Conditions met earlier are not checked again, so the returned document
    /// is only guaranteed to satisfy the last condition.
    #[instrument(skip(self, conditions, cancel), fields(resource = %identity, conditions = conditions.len()))]
    pub async fn wait_for(
        &self,
        identity: &ResourceIdentity,
        conditions: &[ConditionSpec],
        cancel: &CancellationToken,
    ) -> Result<ResourceDocument> {
        let mut observed: Option<ResourceDocument> = None;

        for (index, condition) in conditions.iter().enumerate() {
            if observed.as_ref().is_some_and(|doc| condition.is_satisfied(doc)) {
                debug!("Condition {} already satisfied", condition);
                continue;
            }

            let deadline = condition.timeout.deadline_from(Instant::now());
            debug!("Waiting for {} (timeout {})", condition, condition.timeout);

            loop {
                observed = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(CrError::CanceledError(identity.to_string())),
                    result = self.observe(identity) => result?,
                };

                if observed.as_ref().is_some_and(|doc| condition.is_satisfied(doc)) {
                    info!("Condition {} satisfied", condition);
                    break;
                }

                let now = Instant::now();
                if now >= deadline {
                    let unmet = conditions[index..]
                        .iter()
                        .filter(|c| observed.as_ref().map_or(true, |doc| !c.is_satisfied(doc)))
                        .cloned()
                        .collect();
                    return Err(CrError::TimeoutError {
                        resource: identity.to_string(),
                        unmet,
                    });
                }

                let pause = self.poll_interval.min(deadline.saturating_duration_since(now));
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(CrError::CanceledError(identity.to_string())),
                    _ = sleep(pause) => {}
                }
            }
        }

        match observed {
            Some(doc) => Ok(doc),
            None => self.reader.read(identity).await,
        }
    }

    async fn observe(&self, identity: &ResourceIdentity) -> Result<Option<ResourceDocument>> {
        match self.reader.read(identity).await {
            Ok(doc) => Ok(Some(doc)),
            Err(CrError::NotFoundError(_)) => {
                debug!("{} not found yet", identity);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
