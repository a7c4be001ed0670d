// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Schema-free representation of a full resource body.

use crate::constants::server_fields;
use crate::error::{CrError, Result};
use crate::types::condition::{FieldPath, PathSegment};
use crate::types::identity::ResourceIdentity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A resource body (apiVersion, kind, metadata, spec, status) as an untyped tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceDocument(Map<String, Value>);

impl ResourceDocument {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(ResourceDocument(map)),
            other => Err(CrError::InvalidDocument(format!(
                "expected an object, got {}",
                type_name(&other)
            ))),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(yaml)
            .map_err(|e| CrError::InvalidDocument(format!("invalid YAML: {}", e)))?;
        Self::from_value(value)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.0).map_err(|e| CrError::EncodeError(e.to_string()))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn api_version(&self) -> Option<&str> {
        self.0.get("apiVersion").and_then(Value::as_str)
    }

    pub fn kind(&self) -> Option<&str> {
        self.0.get("kind").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata_str("name")
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata_str("namespace")
    }

    pub fn resource_version(&self) -> Option<&str> {
        self.metadata_str("resourceVersion")
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.0
            .get("metadata")
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
    }

    /// Resolve a field path against the whole document
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let mut segments = path.segments().iter();
        let first = match segments.next()? {
            PathSegment::Key(key) => self.0.get(key)?,
            PathSegment::Index(_) => return None,
        };
        segments.try_fold(first, |current, segment| match segment {
            PathSegment::Key(key) => current.as_object()?.get(key),
            PathSegment::Index(i) => current.as_array()?.get(*i),
        })
    }

    /// Check that apiVersion matches the identity and a kind is present
    pub fn validate_for(&self, identity: &ResourceIdentity) -> Result<()> {
        let expected = identity.api_version();
        match self.api_version() {
            Some(v) if v == expected => {}
            Some(v) => {
                return Err(CrError::InvalidDocument(format!(
                    "apiVersion {} does not match {}",
                    v, expected
                )))
            }
            None => return Err(CrError::InvalidDocument("missing apiVersion".to_string())),
        }
        match self.kind() {
            Some(k) if !k.is_empty() => Ok(()),
            _ => Err(CrError::InvalidDocument("missing kind".to_string())),
        }
    }

    /// Fill metadata.name/namespace from the identity, rejecting mismatches
    pub fn ensure_metadata(&mut self, identity: &ResourceIdentity) -> Result<()> {
        let metadata = self
            .0
            .entry("metadata")
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(metadata) = metadata.as_object_mut() else {
            return Err(CrError::InvalidDocument("metadata is not an object".to_string()));
        };

        set_or_check(metadata, "name", &identity.name)?;
        match &identity.namespace {
            Some(ns) => set_or_check(metadata, "namespace", ns)?,
            None => {
                if metadata.get("namespace").and_then(Value::as_str).is_some_and(|s| !s.is_empty()) {
                    return Err(CrError::InvalidDocument(format!(
                        "{} is cluster-scoped but metadata.namespace is set",
                        identity.resource_kind
                    )));
                }
            }
        }
        Ok(())
    }

    /// A copy without status and server-maintained metadata, for comparisons
    pub fn without_server_fields(&self) -> ResourceDocument {
        let mut map = self.0.clone();
        map.remove("status");
        if let Some(Value::Object(metadata)) = map.get_mut("metadata") {
            for field in server_fields::METADATA {
                metadata.remove(*field);
            }
        }
        ResourceDocument(map)
    }
}

impl TryFrom<Value> for ResourceDocument {
    type Error = CrError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

fn set_or_check(metadata: &mut Map<String, Value>, key: &str, expected: &str) -> Result<()> {
    match metadata.get(key).and_then(Value::as_str) {
        Some(current) if current == expected => Ok(()),
        Some(current) => Err(CrError::InvalidDocument(format!(
            "metadata.{} is {:?}, expected {:?}",
            key, current, expected
        ))),
        None => {
            metadata.insert(key.to_string(), Value::String(expected.to_string()));
            Ok(())
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
