//! Fixed-concurrency pool of fetch workers
//!
//! Two channels connect the pool to the coordinator: a bounded dispatch
//! channel (coordinator → workers, capacity = worker count for natural
//! backpressure) and a results channel (workers → coordinator). Workers pull
//! tasks FIFO from the shared dispatch receiver. Closing the dispatch sender
//! drains the pool: each worker finishes its in-flight task, sees the closed
//! channel, and drops its results sender; the results channel closes once the
//! last worker exits.

use crate::crawler::fetcher::{fetch_destination, FetchOutcome, FetchTask};
use crate::graph::DestinationResult;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// Handle to the spawned workers, used to await their shutdown
pub struct FetchPool {
    workers: Vec<JoinHandle<()>>,
}

impl FetchPool {
    /// Spawns `count` workers sharing one HTTP client
    pub fn spawn(
        client: Client,
        count: usize,
    ) -> (Self, mpsc::Sender<FetchTask>, mpsc::Receiver<FetchOutcome>) {
        let (dispatch_tx, dispatch_rx) = mpsc::channel::<FetchTask>(count.max(1));
        let (results_tx, results_rx) = mpsc::channel::<FetchOutcome>(count.max(1));

        let dispatch_rx = Arc::new(Mutex::new(dispatch_rx));

        let workers = (0..count)
            .map(|id| {
                let client = client.clone();
                let dispatch_rx = Arc::clone(&dispatch_rx);
                let results_tx = results_tx.clone();
                tokio::spawn(worker_loop(id, client, dispatch_rx, results_tx))
            })
            .collect();

        (Self { workers }, dispatch_tx, results_rx)
    }

    /// Awaits all workers after the dispatch channel has been closed
    pub async fn join(self) {
        for handle in self.workers {
            let _ = handle.await;
        }
    }
}

async fn worker_loop(
    id: usize,
    client: Client,
    dispatch_rx: Arc<Mutex<mpsc::Receiver<FetchTask>>>,
    results_tx: mpsc::Sender<FetchOutcome>,
) {
    loop {
        // The guard must drop before the fetch so other workers can pull
        let task = {
            let mut rx = dispatch_rx.lock().await;
            rx.recv().await
        };

        let Some(task) = task else {
            tracing::trace!("worker {} draining: dispatch closed", id);
            break;
        };

        tracing::debug!("worker {} fetching {}", id, task.url);
        let outcome = fetch_guarded(&client, task).await;

        if results_tx.send(outcome).await.is_err() {
            // Coordinator hung up; nothing left to report to
            break;
        }
    }
}

/// Runs one fetch in its own task so a panic inside the fetch path is
/// contained and reported as a transport failure for that URL
async fn fetch_guarded(client: &Client, task: FetchTask) -> FetchOutcome {
    let url = task.url.clone();
    let client = client.clone();

    match tokio::spawn(async move { fetch_destination(&client, &task).await }).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!("fetch task for {} failed: {}", url, e);
            FetchOutcome {
                result: DestinationResult::connection_failed(&url),
                links: Vec::new(),
            }
        }
    }
}
