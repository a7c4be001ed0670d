// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::condition::ConditionSpec;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrError {
    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Failed to encode resource document: {0}")]
    EncodeError(String),

    #[error("Failed to decode server response: {0}")]
    DecodeError(String),

    #[error("Field ownership conflict (retry with force to take ownership): {0}")]
    ConflictError(String),

    #[error("Resource {0} not found")]
    NotFoundError(String),

    #[error("Apply failed: {0}")]
    ApplyError(String),

    #[error("Read failed: {0}")]
    ReadError(String),

    #[error("Delete failed: {0}")]
    DeleteError(String),

    #[error("Timed out waiting for {resource}: unmet conditions [{}]", format_conditions(.unmet))]
    TimeoutError {
        resource: String,
        unmet: Vec<ConditionSpec>,
    },

    #[error("Wait for {0} was canceled")]
    CanceledError(String),

    #[error("Invalid import ID {0:?}: expected \"namespace/name\"")]
    ImportFormatError(String),

    #[error("Invalid resource identity: {0}")]
    InvalidIdentity(String),

    #[error("Invalid resource document: {0}")]
    InvalidDocument(String),

    #[error("Invalid field path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Invalid wait timeout {0:?}")]
    InvalidTimeout(String),

    #[error("Discovery failed: {0}")]
    Discovery(String),
}

impl CrError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CrError::NotFoundError(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, CrError::ConflictError(_))
    }
}

fn format_conditions(conditions: &[ConditionSpec]) -> String {
    conditions
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, CrError>;
