use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{error, info};

use driftsync::config::ProviderConfig;
use driftsync::manifest::{CdnServiceEntry, Manifest, MountTargetEntry};
use driftsync::provider::{CdnApiClient, FilestoreApiClient};
use driftsync::reconcile::{reconcile_cdn_service, reconcile_mount_target, Reconciliation};
use driftsync::Error;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Converge the resources in a manifest to their desired state
    Apply(ApplyArgs),
    /// Show version information
    Version,
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Path to the desired-state manifest (YAML)
    #[arg(long, short = 'f')]
    file: PathBuf,

    /// Base URL of the filesystem provider API
    #[arg(long, env = "FILESTORE_ENDPOINT")]
    filestore_endpoint: Option<String>,

    /// API token for the filesystem provider
    #[arg(long, env = "FILESTORE_API_TOKEN", hide_env_values = true)]
    filestore_api_token: Option<String>,

    /// Base URL of the CDN provider API
    #[arg(long, env = "CDN_ENDPOINT")]
    cdn_endpoint: Option<String>,

    /// API token for the CDN provider
    #[arg(long, env = "CDN_API_TOKEN", hide_env_values = true)]
    cdn_api_token: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    match args.command {
        Commands::Version => {
            println!("driftsync v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Apply(apply_args) => run_apply(apply_args).await,
    }
}

async fn run_apply(args: ApplyArgs) -> Result<(), Error> {
    driftsync::telemetry::init_tracing(args.log_json);

    let manifest = Manifest::from_path(&args.file)?;
    if manifest.is_empty() {
        info!("Manifest {} contains no resources", args.file.display());
        return Ok(());
    }

    // Clients are constructed, and credentials validated, before any
    // resource of their kind is touched.
    let filestore = if manifest.mount_targets.is_empty() {
        None
    } else {
        Some(filestore_client(&args)?)
    };
    let cdn = if manifest.cdn_services.is_empty() {
        None
    } else {
        Some(cdn_client(&args)?)
    };

    if let Some(client) = &filestore {
        for entry in &manifest.mount_targets {
            apply_mount_target(entry, client).await?;
        }
    }
    if let Some(client) = &cdn {
        for entry in &manifest.cdn_services {
            apply_cdn_service(entry, client).await?;
        }
    }

    Ok(())
}

async fn apply_mount_target(entry: &MountTargetEntry, client: &FilestoreApiClient) -> Result<(), Error> {
    match reconcile_mount_target(entry.state, &entry.spec, client).await {
        Ok(result) => report("mountTarget", &result),
        Err(e) => {
            error!("Mount target reconciliation failed: {}", e);
            report_failure("mountTarget", &e)?;
            Err(e)
        }
    }
}

async fn apply_cdn_service(entry: &CdnServiceEntry, client: &CdnApiClient) -> Result<(), Error> {
    match reconcile_cdn_service(entry.state, &entry.spec, client).await {
        Ok(result) => report("cdnService", &result),
        Err(e) => {
            error!("CDN service {} reconciliation failed: {}", entry.spec.name, e);
            report_failure("cdnService", &e)?;
            Err(e)
        }
    }
}

/// Print a per-resource result envelope on stdout
fn report<H: serde::Serialize>(kind: &str, result: &Reconciliation<H>) -> Result<(), Error> {
    let envelope = json!({
        "kind": kind,
        "changed": result.changed,
        "resource": result.resource,
    });
    println!("{}", serde_json::to_string(&envelope)?);
    Ok(())
}

fn report_failure(kind: &str, error: &Error) -> Result<(), Error> {
    let envelope = json!({
        "kind": kind,
        "failed": true,
        "msg": error.to_string(),
    });
    println!("{}", serde_json::to_string(&envelope)?);
    Ok(())
}

fn filestore_client(args: &ApplyArgs) -> Result<FilestoreApiClient, Error> {
    let endpoint = args.filestore_endpoint.clone().ok_or_else(|| {
        Error::ConfigError(
            "--filestore-endpoint is required when the manifest contains mount targets"
                .to_string(),
        )
    })?;
    let token = args.filestore_api_token.clone().ok_or_else(|| {
        Error::AuthError(
            "--filestore-api-token is required when the manifest contains mount targets"
                .to_string(),
        )
    })?;
    FilestoreApiClient::new(&ProviderConfig::new(endpoint, token))
}

fn cdn_client(args: &ApplyArgs) -> Result<CdnApiClient, Error> {
    let endpoint = args.cdn_endpoint.clone().ok_or_else(|| {
        Error::ConfigError(
            "--cdn-endpoint is required when the manifest contains CDN services".to_string(),
        )
    })?;
    let token = args.cdn_api_token.clone().ok_or_else(|| {
        Error::AuthError(
            "--cdn-api-token is required when the manifest contains CDN services".to_string(),
        )
    })?;
    CdnApiClient::new(&ProviderConfig::new(endpoint, token))
}
