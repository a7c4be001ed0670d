// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Apply client: one round trip per operation, structured failures.

use crate::config::Config;
use crate::error::{CrError, Result};
use crate::types::condition::ConditionSpec;
use crate::types::document::ResourceDocument;
use crate::types::identity::{ApplyOptions, ResourceIdentity};
use crate::wait::{ConditionWaiter, ResourceReader};
use async_trait::async_trait;
use kube::{
    api::{DeleteParams, DynamicObject, Patch, PatchParams},
    Api, Client,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Creates, updates, reads and deletes resources addressed by a [`ResourceIdentity`]
#[derive(Clone)]
pub struct ApplyClient {
    client: Client,
    config: Config,
}

impl ApplyClient {
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn api(&self, identity: &ResourceIdentity) -> Api<DynamicObject> {
        let ar = identity.api_resource();
        match &identity.namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &ar),
            None => Api::all_with(self.client.clone(), &ar),
        }
    }

    /// Create or update the resource with a server-side apply patch.
    ///
    /// The document must carry the identity's apiVersion and a kind; missing
    /// metadata.name/namespace are filled from the identity.
    #[instrument(skip(self, document, options), fields(resource = %identity, manager = %options.field_manager, force = options.force_conflicts))]
    pub async fn apply(
        &self,
        identity: &ResourceIdentity,
        document: ResourceDocument,
        options: &ApplyOptions,
    ) -> Result<ResourceDocument> {
        if options.field_manager.is_empty() {
            return Err(CrError::EncodeError("field manager must not be empty".to_string()));
        }

        let mut document = document;
        document
            .validate_for(identity)
            .and_then(|_| document.ensure_metadata(identity))
            .map_err(|e| CrError::EncodeError(e.to_string()))?;

        let body = document.into_value();
        let size = serde_json::to_vec(&body)
            .map_err(|e| CrError::EncodeError(e.to_string()))?
            .len();
        debug!("Applying {} bytes", size);

        let mut params = PatchParams::apply(&options.field_manager).validation_strict();
        if options.force_conflicts {
            params = params.force();
        }

        let applied = self
            .api(identity)
            .patch(&identity.name, &params, &Patch::Apply(&body))
            .await
            .map_err(apply_error)?;

        let applied = into_document(applied)?;
        info!(
            "Applied {} (resourceVersion {})",
            identity,
            applied.resource_version().unwrap_or("unknown")
        );
        Ok(applied)
    }

    /// Fetch the live object
    #[instrument(skip(self), fields(resource = %identity))]
    pub async fn read(&self, identity: &ResourceIdentity) -> Result<ResourceDocument> {
        let object = self
            .api(identity)
            .get(&identity.name)
            .await
            .map_err(|e| match e {
                kube::Error::Api(err) if err.code == 404 => CrError::NotFoundError(identity.to_string()),
                kube::Error::SerdeError(err) => CrError::DecodeError(err.to_string()),
                other => CrError::ReadError(server_message(&other)),
            })?;

        into_document(object)
    }

    /// Delete the object; an already absent object counts as deleted
    #[instrument(skip(self), fields(resource = %identity))]
    pub async fn delete(&self, identity: &ResourceIdentity) -> Result<()> {
        let params = DeleteParams {
            propagation_policy: self.config.delete_propagation.clone(),
            ..Default::default()
        };

        match self.api(identity).delete(&identity.name, &params).await {
            Ok(_) => {
                info!("Deleted {}", identity);
                Ok(())
            }
            Err(kube::Error::Api(err)) if err.code == 404 => {
                debug!("{} already absent", identity);
                Ok(())
            }
            Err(e) => Err(CrError::DeleteError(server_message(&e))),
        }
    }

    /// Apply, then block until every condition holds.
    ///
    /// Returns the last observed document, or the applied one when there are
    /// no conditions.
    pub async fn apply_and_wait(
        &self,
        identity: &ResourceIdentity,
        document: ResourceDocument,
        options: &ApplyOptions,
        conditions: &[ConditionSpec],
        cancel: &CancellationToken,
    ) -> Result<ResourceDocument> {
        let applied = self.apply(identity, document, options).await?;
        if conditions.is_empty() {
            return Ok(applied);
        }

        ConditionWaiter::new(self, self.config.poll_interval)
            .wait_for(identity, conditions, cancel)
            .await
    }
}

#[async_trait]
impl ResourceReader for ApplyClient {
    async fn read(&self, identity: &ResourceIdentity) -> Result<ResourceDocument> {
        ApplyClient::read(self, identity).await
    }
}

const SSA_CONFLICT_PREFIX: &str = "Apply failed with";

fn into_document(object: DynamicObject) -> Result<ResourceDocument> {
    let value = serde_json::to_value(object).map_err(|e| CrError::DecodeError(e.to_string()))?;
    ResourceDocument::from_value(value).map_err(|e| CrError::DecodeError(e.to_string()))
}

/// Only field-manager conflicts from server-side apply become `ConflictError`;
/// other 409s (e.g. a stale resourceVersion) cannot be forced through.
fn apply_error(err: kube::Error) -> CrError {
    match err {
        kube::Error::Api(resp) if resp.code == 409 && resp.message.starts_with(SSA_CONFLICT_PREFIX) => {
            CrError::ConflictError(resp.message)
        }
        kube::Error::SerdeError(e) => CrError::DecodeError(e.to_string()),
        kube::Error::BuildRequest(e) => CrError::EncodeError(e.to_string()),
        other => CrError::ApplyError(server_message(&other)),
    }
}

/// The server's own message for API errors, the full error otherwise
fn server_message(err: &kube::Error) -> String {
    match err {
        kube::Error::Api(resp) => format!("{} ({}): {}", resp.reason, resp.code, resp.message),
        other => other.to_string(),
    }
}
