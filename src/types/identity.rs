// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Addressing of a single object on the cluster.

use crate::error::{CrError, Result};
use kube::core::{ApiResource, GroupVersionKind};
use std::fmt;

/// The (group, version, resource, namespace, name) tuple that locates an object
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceIdentity {
    /// API group, empty for the core group
    pub group: String,
    pub version: String,
    /// Singular kind, e.g. `Certificate`
    pub kind: String,
    /// Plural resource name used in URLs, e.g. `certificates`
    pub resource_kind: String,
    /// Present iff the kind is namespace-scoped
    pub namespace: Option<String>,
    pub name: String,
}

impl ResourceIdentity {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
        resource_kind: impl Into<String>,
        namespace: Option<String>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let identity = ResourceIdentity {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
            resource_kind: resource_kind.into(),
            namespace,
            name: name.into(),
        };

        if identity.name.is_empty() {
            return Err(CrError::InvalidIdentity("name must not be empty".to_string()));
        }
        if identity.version.is_empty() {
            return Err(CrError::InvalidIdentity(format!(
                "version must not be empty for {}",
                identity.name
            )));
        }
        if identity.resource_kind.is_empty() {
            return Err(CrError::InvalidIdentity(format!(
                "resource kind must not be empty for {}",
                identity.name
            )));
        }
        if identity.namespace.as_deref() == Some("") {
            return Err(CrError::InvalidIdentity(format!(
                "namespace must not be empty for {}",
                identity.name
            )));
        }

        Ok(identity)
    }

    /// `group/version`, or the bare version for the core group
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// The kube API resource descriptor used to build dynamic API handles
    pub fn api_resource(&self) -> ApiResource {
        let gvk = GroupVersionKind::gvk(&self.group, &self.version, &self.kind);
        ApiResource::from_gvk_with_plural(&gvk, &self.resource_kind)
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{} {}/{}", self.api_version(), self.resource_kind, ns, self.name),
            None => write!(f, "{}/{} {}", self.api_version(), self.resource_kind, self.name),
        }
    }
}

/// Options for a server-side apply request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Actor credited with ownership of the applied fields
    pub field_manager: String,
    /// Overwrite fields owned by other managers instead of failing
    pub force_conflicts: bool,
}
