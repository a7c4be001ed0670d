// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Conversion between import IDs and object locations.

use crate::error::{CrError, Result};

/// Namespace and name carried by an import ID
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportKey {
    pub namespace: Option<String>,
    pub name: String,
}

/// Decode a namespaced import ID of the form `"<namespace>/<name>"`
pub fn decode(key: &str) -> Result<ImportKey> {
    match key.split_once('/') {
        Some((namespace, name))
            if !namespace.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok(ImportKey {
                namespace: Some(namespace.to_string()),
                name: name.to_string(),
            })
        }
        _ => Err(CrError::ImportFormatError(key.to_string())),
    }
}

/// Decode an import ID according to the scope of the kind: cluster-scoped
/// kinds take a bare `"<name>"`
pub fn decode_for_scope(key: &str, namespaced: bool) -> Result<ImportKey> {
    if namespaced {
        return decode(key);
    }
    if key.is_empty() || key.contains('/') {
        return Err(CrError::ImportFormatError(key.to_string()));
    }
    Ok(ImportKey {
        namespace: None,
        name: key.to_string(),
    })
}

pub fn encode(namespace: &str, name: &str) -> String {
    format!("{}/{}", namespace, name)
}

/// Encode an optional namespace, producing a bare name for cluster-scoped objects
pub fn encode_for_scope(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) => encode(ns, name),
        None => name.to_string(),
    }
}
