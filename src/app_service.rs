use crate::api::ApiClient;
use crate::app_state::AppEvent;
use crate::console::{FetchTicket, MutationRequest};
use log::{info, warn};
use tokio::sync::mpsc;

/// Work sent from the UI loop to the background actor. `epoch` identifies
/// the screen mount that asked for it.
#[derive(Debug, Clone)]
pub enum ApiJob {
    Fetch { epoch: u64, ticket: FetchTicket },
    Mutate { epoch: u64, request: MutationRequest },
}

pub async fn run_job(api: &ApiClient, job: ApiJob, tx: &mpsc::UnboundedSender<AppEvent>) {
    let event = match job {
        ApiJob::Fetch { epoch, ticket } => {
            let result = ticket.run(api).await;
            if let Err(e) = &result {
                warn!("fetch {} failed: {}", ticket.collection().label(), e);
                let _ = tx.send(AppEvent::Log(format!(
                    "✗ loading {} failed: {}",
                    ticket.collection().label(),
                    e
                )));
            }
            AppEvent::Fetched {
                epoch,
                ticket,
                result,
            }
        }
        ApiJob::Mutate { epoch, request } => {
            let result = request.execute(api).await;
            match &result {
                Ok(()) => info!("{} {} succeeded", request.method, request.url),
                Err(e) => warn!("{} {} failed: {}", request.method, request.url, e),
            }
            AppEvent::Mutated {
                epoch,
                request,
                result,
            }
        }
    };
    let _ = tx.send(event);
}

/// Background actor: one task per job so a slow request never blocks the
/// next one.
pub async fn run_actor(
    api: ApiClient,
    mut job_rx: mpsc::UnboundedReceiver<ApiJob>,
    evt_tx: mpsc::UnboundedSender<AppEvent>,
) {
    while let Some(job) = job_rx.recv().await {
        let api = api.clone();
        let tx = evt_tx.clone();
        tokio::spawn(async move {
            run_job(&api, job, &tx).await;
        });
    }
    info!("job channel closed, actor stopping");
}
