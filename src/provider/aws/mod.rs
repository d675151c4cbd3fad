//! # AWS IAM Server Certificate Client
//!
//! Client for the server certificate operations of the AWS IAM API.
//!
//! This module provides functionality to:
//! - List server certificates (following pagination markers)
//! - Fetch a certificate body and its metadata
//! - Upload, rename/move and delete server certificates

pub mod auth;

use crate::config::ConnectionConfig;
use crate::constants::DEFAULT_REGION;
use crate::model::{
    CertificateBody, CertificateMetadata, CertificateUpdate, CertificateUpload, StoredCertificate,
};
use crate::provider::{CertificateStore, RemoteError, RemoteOperation};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_iam::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_iam::primitives::DateTime;
use aws_sdk_iam::types::ServerCertificateMetadata;
use aws_sdk_iam::Client as IamClient;
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, debug_span, info, info_span, Instrument};

pub use auth::SessionError;

/// AWS IAM server certificate store
pub struct AwsIamCertificateStore {
    client: IamClient,
    region: String,
}

impl std::fmt::Debug for AwsIamCertificateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsIamCertificateStore")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl AwsIamCertificateStore {
    /// Build SDK config for `config`, verify credentials and create the client
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, SessionError> {
        let sdk_config = auth::create_sdk_config(config).await?;
        Ok(Self::from_sdk_config(&sdk_config))
    }

    /// Wrap an already loaded SDK config
    #[must_use]
    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        let region = sdk_config
            .region()
            .map_or_else(|| DEFAULT_REGION.to_string(), ToString::to_string);
        Self {
            client: IamClient::new(sdk_config),
            region,
        }
    }
}

/// Convert an SDK error into a `RemoteError`, keeping the service message
fn remote_error<E>(operation: RemoteOperation, err: &E) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let message = match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (Some(code), None) => code.to_string(),
        _ => DisplayErrorContext(err).to_string(),
    };
    RemoteError::new(operation, message)
}

fn to_utc(timestamp: &DateTime) -> Option<chrono::DateTime<Utc>> {
    chrono::DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

fn metadata_from(metadata: &ServerCertificateMetadata) -> CertificateMetadata {
    CertificateMetadata {
        name: metadata.server_certificate_name().to_string(),
        id: metadata.server_certificate_id().to_string(),
        arn: metadata.arn().to_string(),
        path: metadata.path().to_string(),
        upload_date: metadata.upload_date().and_then(to_utc),
        expiration: metadata.expiration().and_then(to_utc),
    }
}

#[async_trait]
impl CertificateStore for AwsIamCertificateStore {
    async fn list_certificates(&self) -> Result<Vec<CertificateMetadata>, RemoteError> {
        let span = debug_span!("aws.iam.certificate.list", region = %self.region);
        let start = Instant::now();

        async move {
            let mut pages = self
                .client
                .list_server_certificates()
                .into_paginator()
                .send();

            let mut certificates = Vec::new();
            while let Some(page) = pages.next().await {
                let page = page.map_err(|e| remote_error(RemoteOperation::List, &e))?;
                certificates.extend(
                    page.server_certificate_metadata_list()
                        .iter()
                        .map(metadata_from),
                );
            }

            debug!(
                count = certificates.len(),
                duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "Listed IAM server certificates"
            );
            Ok(certificates)
        }
        .instrument(span)
        .await
    }

    async fn get_certificate(&self, name: &str) -> Result<StoredCertificate, RemoteError> {
        let span = debug_span!("aws.iam.certificate.get", certificate.name = name);

        async move {
            let output = self
                .client
                .get_server_certificate()
                .server_certificate_name(name)
                .send()
                .await
                .map_err(|e| remote_error(RemoteOperation::Get, &e))?;

            let certificate = output.server_certificate().ok_or_else(|| {
                RemoteError::new(
                    RemoteOperation::Get,
                    format!("Response for {name} carried no server certificate"),
                )
            })?;
            let metadata = certificate.server_certificate_metadata().ok_or_else(|| {
                RemoteError::new(
                    RemoteOperation::Get,
                    format!("Response for {name} carried no certificate metadata"),
                )
            })?;

            Ok(StoredCertificate {
                metadata: metadata_from(metadata),
                body: CertificateBody::new(certificate.certificate_body()),
                chain: certificate.certificate_chain().map(ToString::to_string),
            })
        }
        .instrument(span)
        .await
    }

    async fn upload_certificate(&self, upload: CertificateUpload<'_>) -> Result<(), RemoteError> {
        let span = info_span!(
            "aws.iam.certificate.upload",
            certificate.name = upload.name,
            certificate.path = upload.path,
            certificate.fingerprint = %upload.body.fingerprint(),
        );

        async move {
            info!("Uploading IAM server certificate: {}", upload.name);
            self.client
                .upload_server_certificate()
                .server_certificate_name(upload.name)
                .path(upload.path)
                .certificate_body(upload.body.as_str())
                .private_key(upload.private_key.expose_secret())
                .set_certificate_chain(upload.chain.map(ToString::to_string))
                .send()
                .await
                .map_err(|e| remote_error(RemoteOperation::Upload, &e))?;
            Ok(())
        }
        .instrument(span)
        .await
    }

    async fn update_certificate(
        &self,
        name: &str,
        update: &CertificateUpdate,
    ) -> Result<(), RemoteError> {
        let span = info_span!(
            "aws.iam.certificate.update",
            certificate.name = name,
            certificate.new_name = update.new_name.as_deref(),
            certificate.new_path = update.new_path.as_deref(),
        );

        async move {
            info!("Updating IAM server certificate: {}", name);
            self.client
                .update_server_certificate()
                .server_certificate_name(name)
                .set_new_server_certificate_name(update.new_name.clone())
                .set_new_path(update.new_path.clone())
                .send()
                .await
                .map_err(|e| remote_error(RemoteOperation::Update, &e))?;
            Ok(())
        }
        .instrument(span)
        .await
    }

    async fn delete_certificate(&self, name: &str) -> Result<(), RemoteError> {
        let span = info_span!("aws.iam.certificate.delete", certificate.name = name);

        async move {
            info!("Deleting IAM server certificate: {}", name);
            self.client
                .delete_server_certificate()
                .server_certificate_name(name)
                .send()
                .await
                .map_err(|e| remote_error(RemoteOperation::Delete, &e))?;
            Ok(())
        }
        .instrument(span)
        .await
    }
}
