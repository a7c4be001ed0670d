// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client creation from the environment or a kubeconfig file.

use crate::error::{CrError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Create a Kubernetes client.
///
/// Without a kubeconfig path the configuration is inferred (in-cluster
/// service account or `KUBECONFIG`); `context` selects a kubeconfig context.
#[instrument]
pub async fn create_client(kubeconfig: Option<&Path>, context: Option<&str>) -> Result<Client> {
    let config = match kubeconfig {
        Some(path) => config_from_file(path, context).await?,
        None if context.is_some() => {
            let options = KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            };
            KConfig::from_kubeconfig(&options)
                .await
                .map_err(|e| CrError::KubeconfigError(e.to_string()))?
        }
        None => KConfig::infer()
            .await
            .map_err(|e| CrError::KubeconfigError(format!("could not infer configuration: {}", e)))?,
    };

    info!("Using cluster {}", config.cluster_url);

    Client::try_from(config)
        .map_err(|e| CrError::KubeconfigError(format!("could not create client: {}", e)))
}

/// Load a client configuration from a kubeconfig file
async fn config_from_file(path: &Path, context: Option<&str>) -> Result<KConfig> {
    debug!("Reading kubeconfig from {}", path.display());

    let kubeconfig = Kubeconfig::read_from(path)
        .map_err(|e| CrError::KubeconfigError(format!("{}: {}", path.display(), e)))?;

    let options = KubeConfigOptions {
        context: context.map(String::from),
        ..Default::default()
    };

    KConfig::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(|e| CrError::KubeconfigError(e.to_string()))
}
