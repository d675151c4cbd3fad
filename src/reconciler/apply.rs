//! # Plan Execution
//!
//! Fetches the inventory, plans, and executes the plan against a
//! [`CertificateStore`]. At most one mutating call is issued per run.

use crate::model::{
    CertificateState, CertificateUpdate, CertificateUpload, DesiredState, Inventory,
    InventoryEntry, StoredCertificate,
};
use crate::provider::{CertificateStore, RemoteError};
use crate::reconciler::outcome::{unchanged_message, Outcome};
use crate::reconciler::plan::{plan, Plan};
use crate::reconciler::ReconcileError;
use tracing::{debug, info, info_span, Instrument};

/// List every certificate, then fetch each body
pub async fn fetch_inventory(store: &dyn CertificateStore) -> Result<Inventory, RemoteError> {
    let listed = store.list_certificates().await?;
    let mut entries = Vec::with_capacity(listed.len());

    for metadata in listed {
        let stored = store.get_certificate(&metadata.name).await?;
        entries.push(InventoryEntry {
            name: metadata.name,
            body: stored.body,
        });
    }

    let inventory = Inventory::new(entries);
    debug!(
        names = ?inventory.names().collect::<Vec<_>>(),
        "Fetched inventory of {} server certificates",
        inventory.len()
    );
    Ok(inventory)
}

/// Execute the plan for `desired` against a fresh `inventory`
pub async fn reconcile(
    store: &dyn CertificateStore,
    desired: &DesiredState,
    inventory: &Inventory,
) -> Result<Outcome, ReconcileError> {
    let plan = plan(desired, inventory)?;
    info!(
        certificate.name = %desired.name,
        action = %plan.action(),
        "Planned server certificate action"
    );

    execute(store, desired, plan)
        .await
        .map_err(|err| attach_body(err, desired))
}

/// Fetch the inventory and reconcile `desired`
pub async fn run(
    store: &dyn CertificateStore,
    desired: &DesiredState,
) -> Result<Outcome, ReconcileError> {
    let span = info_span!(
        "reconcile",
        certificate.name = %desired.name,
        state = desired.state.as_str(),
    );

    async move {
        let inventory = fetch_inventory(store)
            .await
            .map_err(|err| attach_body(err.into(), desired))?;
        reconcile(store, desired, &inventory).await
    }
    .instrument(span)
    .await
}

/// Report what `run` would do without issuing any mutating call
pub async fn preview(
    store: &dyn CertificateStore,
    desired: &DesiredState,
) -> Result<Outcome, ReconcileError> {
    let span = info_span!(
        "preview",
        certificate.name = %desired.name,
        state = desired.state.as_str(),
    );

    async move {
        let inventory = fetch_inventory(store)
            .await
            .map_err(|err| attach_body(err.into(), desired))?;
        let plan = plan(desired, &inventory)?;
        info!(action = %plan.action(), "Check mode: no changes will be made");

        match plan {
            Plan::Update { source, update } => {
                let stored = store
                    .get_certificate(&source)
                    .await
                    .map_err(|err| attach_body(err.into(), desired))?;
                let update = skip_move_to_stored_path(update, &stored);
                if update.is_empty() {
                    Ok(Outcome::unchanged(
                        &stored,
                        unchanged_message(desired, &source),
                    ))
                } else {
                    Ok(Outcome::planned(&Plan::Update { source, update }, desired))
                }
            }
            other => Ok(Outcome::planned(&other, desired)),
        }
    }
    .instrument(span)
    .await
}

async fn execute(
    store: &dyn CertificateStore,
    desired: &DesiredState,
    plan: Plan,
) -> Result<Outcome, ReconcileError> {
    match plan {
        Plan::Create => create(store, desired).await,
        Plan::Update { source, update } => update_existing(store, desired, &source, update).await,
        Plan::Unchanged { name } => {
            let stored = store.get_certificate(&name).await?;
            Ok(Outcome::unchanged(&stored, unchanged_message(desired, &name)))
        }
        Plan::Delete { name } => {
            store.delete_certificate(&name).await?;
            info!("Deleted server certificate {}", name);
            Ok(Outcome::deleted(&name))
        }
        Plan::AlreadyAbsent { name } => {
            debug!("Server certificate {} already absent", name);
            Ok(Outcome::already_absent(&name))
        }
    }
}

async fn create(
    store: &dyn CertificateStore,
    desired: &DesiredState,
) -> Result<Outcome, ReconcileError> {
    let (Some(body), Some(private_key)) = (&desired.body, &desired.private_key) else {
        return Err(ReconcileError::InvalidParameters(
            "cert and key are required to upload a new certificate".to_string(),
        ));
    };

    store
        .upload_certificate(CertificateUpload {
            name: &desired.name,
            path: &desired.path,
            body,
            private_key,
            chain: desired.chain.as_deref(),
        })
        .await?;
    info!("Uploaded server certificate {}", desired.name);

    let stored = store.get_certificate(&desired.name).await?;
    Ok(Outcome::created(&stored))
}

async fn update_existing(
    store: &dyn CertificateStore,
    desired: &DesiredState,
    source: &str,
    update: CertificateUpdate,
) -> Result<Outcome, ReconcileError> {
    let stored = store.get_certificate(source).await?;
    let update = skip_move_to_stored_path(update, &stored);

    if update.is_empty() {
        return Ok(Outcome::unchanged(
            &stored,
            unchanged_message(desired, source),
        ));
    }

    store.update_certificate(source, &update).await?;
    info!("Updated server certificate {}", source);
    Ok(Outcome::updated(&stored, &update))
}

/// Drop a move to the path `stored` already has
fn skip_move_to_stored_path(
    mut update: CertificateUpdate,
    stored: &StoredCertificate,
) -> CertificateUpdate {
    if update.new_path.as_deref() == Some(stored.metadata.path.as_str()) {
        debug!(
            "Server certificate {} is already at path {}",
            stored.metadata.name, stored.metadata.path
        );
        update.new_path = None;
    }
    update
}

/// Present-state failures carry the attempted body; the key is never attached
fn attach_body(err: ReconcileError, desired: &DesiredState) -> ReconcileError {
    match err {
        ReconcileError::RemoteService { source, .. }
            if desired.state == CertificateState::Present =>
        {
            ReconcileError::remote_with_body(source, desired.body.clone())
        }
        other => other,
    }
}
