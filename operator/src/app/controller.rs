//! Convergence loop and per-component reconciliation for the TodoApp CRD.

use std::{sync::Arc, time::Duration};

use kube::{api::ListParams, client::Client, Api, ResourceExt};
use tracing::{debug, error, info, warn};

use crate::app::{
    extract::{component_spec, ComponentConfig},
    workload::{self, Role},
    TodoApp,
};
use crate::utils::{
    create_or_update_deployment, create_or_update_service, Context, Convergence, Sleep, TokioSleep,
};

/// Namespace in which TodoApp resources are reconciled.
pub const NAMESPACE: &str = "default";

/// Fixed pause between convergence cycles.
pub const CYCLE_INTERVAL: Duration = Duration::from_secs(30);

/// Errors produced by the reconcile functions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error from the k8s api.
    #[error("Kube error: {source}")]
    Kube {
        /// The kube client error
        #[from]
        source: kube::Error,
    },
}

/// Start the convergence loop for the TodoApp CRD.
///
/// Only client construction can fail; after that the loop runs for the
/// lifetime of the process.
pub async fn run() -> anyhow::Result<()> {
    let k_client = Client::try_default().await?;
    let cx = Arc::new(Context::new(k_client));
    run_loop(cx, TokioSleep, CYCLE_INTERVAL).await;
    Ok(())
}

/// Drive convergence cycles forever with a fixed pause between them.
///
/// A failed cycle is reported and the next one proceeds on schedule, there
/// is no backoff or jitter.
pub(crate) async fn run_loop(cx: Arc<Context>, sleep: impl Sleep, interval: Duration) {
    loop {
        if let Err(err) = run_cycle(&cx).await {
            error!(%err, "convergence cycle failed");
        }
        sleep.sleep(interval).await;
    }
}

/// Run one convergence cycle over all TodoApp resources.
///
/// The desired state is re-read from the cluster every cycle, nothing is
/// cached in between. A listing failure ends the cycle before any reconcile
/// work happens. A per-component failure is reported and the cycle
/// continues with the next component or application.
pub(crate) async fn run_cycle(cx: &Context) -> Result<(), Error> {
    let apps: Api<TodoApp> = Api::namespaced(cx.k_client.clone(), NAMESPACE);
    let list = apps.list(&ListParams::default()).await?;
    info!(count = list.items.len(), "found TodoApp resources");

    for app in list.items {
        let name = app.name_any();
        let ns = app.namespace().unwrap_or_else(|| NAMESPACE.to_owned());
        for role in Role::ALL {
            let Some(spec) = component_spec(&app.spec, role) else {
                debug!(app = %name, role = role.name(), "component not declared, skipping");
                continue;
            };
            if spec.image.is_missing() {
                // The empty image is passed through and surfaces as a
                // cluster-side failure, see ComponentSpec::into_config.
                warn!(app = %name, role = role.name(), "component image missing or not a string");
            }
            let config = spec.into_config();
            info!(
                app = %name,
                role = role.name(),
                image = %config.image,
                replicas = config.replicas,
                "reconciling component"
            );
            if let Err(err) = reconcile_component(cx, &ns, &name, role, &config).await {
                error!(app = %name, role = role.name(), %err, "error reconciling component");
            }
        }
    }
    Ok(())
}

/// Ensure the Deployment and Service for one component match its config.
///
/// The Deployment is reconciled first. When it fails the Service step is
/// skipped, other components and applications are unaffected.
async fn reconcile_component(
    cx: &Context,
    ns: &str,
    app: &str,
    role: Role,
    config: &ComponentConfig,
) -> Result<(), Error> {
    let deployment_name = role.workload_name(app);
    let spec = workload::deployment_spec(role, app, &config.image, config.replicas);
    match create_or_update_deployment(cx, ns, &deployment_name, spec).await? {
        Convergence::Created => info!(name = %deployment_name, "created deployment"),
        Convergence::Updated => info!(name = %deployment_name, "updated deployment"),
    }

    let service_name = role.service_name(app);
    match create_or_update_service(cx, ns, &service_name, workload::service_spec(role, app)).await?
    {
        Convergence::Created => info!(name = %service_name, "created service"),
        Convergence::Updated => info!(name = %service_name, "updated service"),
    }
    Ok(())
}
