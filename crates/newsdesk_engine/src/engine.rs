use std::sync::{mpsc, Arc};
use std::thread;

use newsdesk_core::NewsRequest;
use newsdesk_logging::{desk_debug, desk_info};
use tokio_util::sync::CancellationToken;

use crate::fetch::NewsFetcher;
use crate::{EngineError, EngineEvent};

enum EngineCommand {
    Fetch {
        generation: u64,
        request: NewsRequest,
    },
}

/// Runs fetches on a background tokio runtime.
///
/// A new fetch cancels the one in flight; its completion is never reported.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(fetcher: Arc<dyn NewsFetcher>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("newsdesk-fetch")
            .build()?;

        thread::spawn(move || {
            let mut in_flight: Option<CancellationToken> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Fetch {
                        generation,
                        request,
                    } => {
                        if let Some(previous) = in_flight.take() {
                            previous.cancel();
                        }
                        let token = CancellationToken::new();
                        in_flight = Some(token.clone());
                        runtime.spawn(run_fetch(
                            fetcher.clone(),
                            generation,
                            request,
                            token,
                            event_tx.clone(),
                        ));
                    }
                }
            }
            desk_debug!("Engine command channel closed");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn fetch(&self, generation: u64, request: NewsRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Fetch {
            generation,
            request,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn run_fetch(
    fetcher: Arc<dyn NewsFetcher>,
    generation: u64,
    request: NewsRequest,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    desk_info!(
        "Fetch generation={} query={:?} category={}",
        generation,
        request.query,
        request.category
    );
    tokio::select! {
        _ = token.cancelled() => {
            desk_debug!("Fetch generation={} superseded", generation);
        }
        result = fetcher.fetch(&request) => {
            let _ = event_tx.send(EngineEvent::FetchCompleted { generation, result });
        }
    }
}
