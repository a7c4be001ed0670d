// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crkit::config::Config;
use crkit::kubernetes::{create_client, IdentityResolver};
use crkit::types::{ConditionSpec, ResourceDocument, WaitTimeout};
use crkit::ApplyClient;

#[derive(Parser, Debug)]
#[command(name = "crkit", version, about = "Apply, read and delete Kubernetes custom resources")]
struct Cli {
    /// Path to a kubeconfig file (default: inferred from the environment)
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long, global = true)]
    context: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update a resource with server-side apply
    Apply {
        /// Manifest file, or "-" for stdin
        #[arg(short = 'f', long = "filename")]
        file: String,
        /// Take ownership of fields managed by others
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
        /// Field manager name (overrides CRKIT_FIELD_MANAGER)
        #[arg(long)]
        field_manager: Option<String>,
        /// Wait condition "PATH=VALUE" or "PATH"; repeatable
        #[arg(long = "wait")]
        wait: Vec<String>,
        /// Timeout for each wait condition: "0" checks once, negative waits indefinitely
        #[arg(long, default_value = "5m", allow_hyphen_values = true)]
        timeout: String,
    },
    /// Print the live resource
    Get {
        /// e.g. "cert-manager.io/v1"
        api_version: String,
        /// e.g. "Certificate"
        kind: String,
        /// "namespace/name", or "name" for cluster-scoped kinds
        key: String,
    },
    /// Delete a resource; succeeds if it is already gone
    Delete {
        api_version: String,
        kind: String,
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    let client = create_client(cli.kubeconfig.as_deref(), cli.context.as_deref()).await?;
    let resolver = IdentityResolver::new(client.clone(), config.default_namespace.clone());

    match cli.command {
        Commands::Apply {
            file,
            force,
            field_manager,
            wait,
            timeout,
        } => {
            if let Some(manager) = field_manager {
                config.field_manager = manager;
            }
            config.force_conflicts |= force;

            let timeout = WaitTimeout::parse(&timeout)?;
            let conditions = wait
                .iter()
                .map(|w| ConditionSpec::parse(w, timeout))
                .collect::<crkit::Result<Vec<_>>>()?;

            let document = ResourceDocument::from_yaml(&read_manifest(&file)?)?;
            let identity = resolver.resolve_document(&document).await?;
            let options = config.apply_options();
            let apply_client = ApplyClient::new(client, config);

            let cancel = CancellationToken::new();
            let trigger = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, canceling");
                    trigger.cancel();
                }
            });

            info!("Applying {}", identity);
            let result = apply_client
                .apply_and_wait(&identity, document, &options, &conditions, &cancel)
                .await?;
            print!("{}", result.to_yaml()?);
        }
        Commands::Get {
            api_version,
            kind,
            key,
        } => {
            let identity = resolver.resolve_import(&api_version, &kind, &key).await?;
            let document = ApplyClient::new(client, config).read(&identity).await?;
            print!("{}", document.to_yaml()?);
        }
        Commands::Delete {
            api_version,
            kind,
            key,
        } => {
            let identity = resolver.resolve_import(&api_version, &kind, &key).await?;
            ApplyClient::new(client, config).delete(&identity).await?;
            println!("{} deleted", identity);
        }
    }

    Ok(())
}

fn read_manifest(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read manifest from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read manifest {}", file))
    }
}
