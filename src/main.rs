//! # iam-cert
//!
//! Command-line entry point for reconciling one AWS IAM server certificate.
//!
//! ## Usage
//!
//! ```bash
//! # Upload (or confirm) a certificate
//! iam-cert --state present --name very_ssl --path /cloudfront/ \
//!   --cert-file cert.pem --key-file key.pem --cert-chain-file chain.pem
//!
//! # Rename and move an existing certificate
//! iam-cert --state present --name very_ssl --new-name new_very_ssl --new-path /new/
//!
//! # Delete, previewing first
//! iam-cert --state absent --name very_ssl --check
//!
//! # Parameters from a file, flags override
//! iam-cert --params cert.yaml --output text
//! ```
//!
//! The result document is written to stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use iam_cert::config::{CertificateParams, ConnectionConfig, ToolConfig};
use iam_cert::model::{CertificateState, DesiredState, PrivateKey};
use iam_cert::observability::init_tracing;
use iam_cert::provider::AwsIamCertificateStore;
use iam_cert::reconciler::{self, validate_desired_state, Outcome, ReconcileError};
use iam_cert::report::{self, OutputFormat};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Manage AWS IAM server certificates declaratively
#[derive(Debug, Parser)]
#[command(name = "iam-cert", version)]
#[command(about = "Upload, rename, move and delete AWS IAM server certificates", long_about = None)]
struct Cli {
    /// YAML or JSON parameter file; flags override its values
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,

    /// Whether the certificate should exist
    #[arg(long, value_enum)]
    state: Option<CertificateState>,

    /// Name of the server certificate
    #[arg(long)]
    name: Option<String>,

    /// Path of the certificate, used when uploading (defaults to /)
    #[arg(long)]
    path: Option<String>,

    /// File holding the PEM encoded certificate body
    #[arg(long, value_name = "FILE")]
    cert_file: Option<PathBuf>,

    /// File holding the PEM encoded private key
    #[arg(long, value_name = "FILE")]
    key_file: Option<PathBuf>,

    /// File holding the PEM encoded certificate chain
    #[arg(long, value_name = "FILE")]
    cert_chain_file: Option<PathBuf>,

    /// Rename the certificate to this name
    #[arg(long)]
    new_name: Option<String>,

    /// Move the certificate to this path
    #[arg(long)]
    new_path: Option<String>,

    /// Allow uploading a body already stored under another name
    #[arg(long)]
    dup_ok: bool,

    /// AWS region (IAM is global; defaults to us-east-1 when nothing resolves)
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Named AWS profile
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Override the IAM endpoint URL
    #[arg(long, env = "IAM_CERT_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Assume this role before running
    #[arg(long)]
    role_arn: Option<String>,

    /// Report what would change without changing anything
    #[arg(long)]
    check: bool,

    /// Result rendering
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,
}

impl Cli {
    fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            region: self.region.clone(),
            profile: self.profile.clone(),
            endpoint_url: self.endpoint_url.clone(),
            role_arn: self.role_arn.clone(),
        }
    }

    /// Parameters given as flags
    fn flag_params(&self) -> Result<CertificateParams> {
        Ok(CertificateParams {
            state: self.state,
            name: self.name.clone(),
            path: self.path.clone(),
            cert: self.cert_file.as_deref().map(read_pem).transpose()?,
            key: self
                .key_file
                .as_deref()
                .map(read_pem)
                .transpose()?
                .map(PrivateKey::new),
            cert_chain: self.cert_chain_file.as_deref().map(read_pem).transpose()?,
            new_name: self.new_name.clone(),
            new_path: self.new_path.clone(),
            dup_ok: self.dup_ok.then_some(true),
        })
    }

    /// File parameters overlaid with flag parameters
    fn params(&self) -> Result<CertificateParams> {
        let base = match &self.params {
            Some(path) => CertificateParams::from_file(path)?,
            None => CertificateParams::default(),
        };
        Ok(base.merge(self.flag_params()?))
    }
}

fn read_pem(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_desired_state(cli: &Cli) -> Result<DesiredState, ReconcileError> {
    let params = cli
        .params()
        .map_err(|e| ReconcileError::InvalidParameters(format!("{e:#}")))?;
    let desired = DesiredState::try_from(params)?;
    validate_desired_state(&desired)?;
    Ok(desired)
}

async fn execute(cli: &Cli) -> Result<Outcome, ReconcileError> {
    let desired = load_desired_state(cli)?;
    let store = AwsIamCertificateStore::connect(&cli.connection()).await?;

    if cli.check {
        reconciler::preview(&store, &desired).await
    } else {
        reconciler::run(&store, &desired).await
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // rustls 0.23+ needs a process-wide crypto provider before any TLS use
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("rustls crypto provider already installed");
    }

    let tool_config = ToolConfig::from_env();
    if let Err(e) = init_tracing(&tool_config) {
        eprintln!("{e:#}");
    }

    let cli = Cli::parse();
    info!("Starting iam-cert");

    let result = execute(&cli).await;
    match &result {
        Ok(outcome) => info!(
            changed = outcome.changed,
            action = %outcome.action,
            "Reconciliation finished"
        ),
        Err(e) => warn!(kind = ?e.kind(), "Reconciliation failed: {}", e),
    }

    match report::render_result(&result, cli.output) {
        Ok(document) => println!("{document}"),
        Err(e) => error!("{e:#}"),
    }

    ExitCode::from(report::exit_code(&result))
}
