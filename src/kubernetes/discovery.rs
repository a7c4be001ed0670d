// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resolution of resource identities through API discovery.

use crate::error::{CrError, Result};
use crate::import;
use crate::types::document::ResourceDocument;
use crate::types::identity::ResourceIdentity;
use kube::core::GroupVersionKind;
use kube::discovery::{self, ApiResource, Scope};
use kube::Client;
use tracing::{debug, instrument};

/// Builds [`ResourceIdentity`] values by asking the API server for the plural
/// name and scope of a kind
#[derive(Clone)]
pub struct IdentityResolver {
    client: Client,
    default_namespace: String,
}

impl IdentityResolver {
    pub fn new(client: Client, default_namespace: impl Into<String>) -> Self {
        Self {
            client,
            default_namespace: default_namespace.into(),
        }
    }

    /// Resolve the identity addressed by a document's apiVersion, kind and metadata
    pub async fn resolve_document(&self, document: &ResourceDocument) -> Result<ResourceIdentity> {
        let api_version = document
            .api_version()
            .ok_or_else(|| CrError::InvalidDocument("missing apiVersion".to_string()))?;
        let kind = document
            .kind()
            .ok_or_else(|| CrError::InvalidDocument("missing kind".to_string()))?;
        let name = document
            .name()
            .ok_or_else(|| CrError::InvalidDocument("missing metadata.name".to_string()))?;

        self.resolve(api_version, kind, document.namespace(), name).await
    }

    /// Resolve an identity, defaulting the namespace for namespaced kinds
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        api_version: &str,
        kind: &str,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<ResourceIdentity> {
        let (ar, namespaced) = self.discover(api_version, kind).await?;
        let namespace = namespace.filter(|ns| !ns.is_empty());

        let namespace = match (namespaced, namespace) {
            (true, Some(ns)) => Some(ns.to_string()),
            (true, None) => Some(self.default_namespace.clone()),
            (false, None) => None,
            (false, Some(ns)) => {
                return Err(CrError::InvalidIdentity(format!(
                    "{} is cluster-scoped but namespace {} was given",
                    kind, ns
                )))
            }
        };

        ResourceIdentity::new(ar.group, ar.version, ar.kind, ar.plural, namespace, name)
    }

    /// Resolve an import ID for the given kind
    #[instrument(skip(self))]
    pub async fn resolve_import(
        &self,
        api_version: &str,
        kind: &str,
        key: &str,
    ) -> Result<ResourceIdentity> {
        let (ar, namespaced) = self.discover(api_version, kind).await?;
        let key = import::decode_for_scope(key, namespaced)?;

        ResourceIdentity::new(ar.group, ar.version, ar.kind, ar.plural, key.namespace, key.name)
    }

    async fn discover(&self, api_version: &str, kind: &str) -> Result<(ApiResource, bool)> {
        let (group, version) = parse_api_version(api_version)?;
        let gvk = GroupVersionKind::gvk(group, version, kind);

        let (ar, caps) = discovery::pinned_kind(&self.client, &gvk)
            .await
            .map_err(|e| match e {
                kube::Error::Api(err) if err.code == 404 => CrError::Discovery(format!(
                    "API version {} is not served by the cluster",
                    api_version
                )),
                other => CrError::Discovery(format!(
                    "Failed to discover {} {}: {}",
                    api_version, kind, other
                )),
            })?;

        let namespaced = caps.scope == Scope::Namespaced;
        debug!(
            "Discovered {} {} as {} (namespaced: {})",
            api_version, kind, ar.plural, namespaced
        );

        Ok((ar, namespaced))
    }
}

/// Split an apiVersion into (group, version); the core group is empty
pub fn parse_api_version(api_version: &str) -> Result<(&str, &str)> {
    let (group, version) = match api_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", api_version),
    };

    if version.is_empty() || version.contains('/') || (group.is_empty() && api_version.contains('/')) {
        return Err(CrError::InvalidIdentity(format!(
            "invalid apiVersion {:?}",
            api_version
        )));
    }

    Ok((group, version))
}
