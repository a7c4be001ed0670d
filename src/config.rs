// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{wait::POLL_INTERVAL_SECS, DEFAULT_FIELD_MANAGER, DEFAULT_NAMESPACE};
use crate::types::identity::ApplyOptions;
use anyhow::{anyhow, Context, Result};
use kube::api::PropagationPolicy;
use std::env;
use std::time::Duration;

/// Client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Field manager credited with ownership of applied fields
    pub field_manager: String,
    /// Take ownership of fields held by other managers instead of failing
    pub force_conflicts: bool,
    /// Namespace for namespaced kinds when neither document nor import key names one
    pub default_namespace: String,
    /// Interval between reads while waiting for conditions
    pub poll_interval: Duration,
    pub delete_propagation: Option<PropagationPolicy>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
            force_conflicts: false,
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
            delete_propagation: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let field_manager =
            env::var("CRKIT_FIELD_MANAGER").unwrap_or(defaults.field_manager);
        if field_manager.is_empty() {
            return Err(anyhow!("CRKIT_FIELD_MANAGER must not be empty"));
        }

        let force_conflicts = match env::var("CRKIT_FORCE_CONFLICTS") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("CRKIT_FORCE_CONFLICTS is not a boolean: {}", v))?,
            Err(_) => defaults.force_conflicts,
        };

        let default_namespace =
            env::var("CRKIT_DEFAULT_NAMESPACE").unwrap_or(defaults.default_namespace);

        let poll_interval = match env::var("CRKIT_POLL_INTERVAL") {
            Ok(v) => humantime::parse_duration(&v)
                .with_context(|| format!("CRKIT_POLL_INTERVAL is not a duration: {}", v))?,
            Err(_) => defaults.poll_interval,
        };

        let delete_propagation = match env::var("CRKIT_DELETE_PROPAGATION") {
            Ok(v) => Some(parse_propagation(&v)?),
            Err(_) => None,
        };

        Ok(Config {
            field_manager,
            force_conflicts,
            default_namespace,
            poll_interval,
            delete_propagation,
        })
    }

    /// Apply options carrying the configured defaults
    pub fn apply_options(&self) -> ApplyOptions {
        ApplyOptions {
            field_manager: self.field_manager.clone(),
            force_conflicts: self.force_conflicts,
        }
    }
}

fn parse_propagation(value: &str) -> Result<PropagationPolicy> {
    match value {
        "Foreground" => Ok(PropagationPolicy::Foreground),
        "Background" => Ok(PropagationPolicy::Background),
        "Orphan" => Ok(PropagationPolicy::Orphan),
        other => Err(anyhow!(
            "CRKIT_DELETE_PROPAGATION must be Foreground, Background or Orphan, got {}",
            other
        )),
    }
}
