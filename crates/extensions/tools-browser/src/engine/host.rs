//! Engine host: the dedicated thread that owns an [`Engine`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{Engine, EngineError, EngineFactory, LoadSignal, LoadingState};

type Reply = oneshot::Sender<Result<String, EngineError>>;

/// Work posted to the engine thread. Each request carries its own identity,
/// deadline and reply channel.
pub(crate) struct EngineRequest {
    id: u64,
    payload: String,
    deadline: Instant,
    reply: Reply,
}

pub(crate) enum EngineCommand {
    Navigate(EngineRequest),
    Evaluate(EngineRequest),
    Shutdown(oneshot::Sender<()>),
}

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the engine thread.
///
/// Commands are serviced strictly in FIFO order. A command whose deadline has
/// already passed when it reaches the front of the queue is dropped without
/// running; a result whose caller has gone away is discarded.
pub struct EngineHost {
    commands: mpsc::UnboundedSender<EngineCommand>,
    loading: watch::Receiver<LoadingState>,
    next_id: AtomicU64,
}

impl EngineHost {
    /// Spawn the engine thread and build the engine on it.
    pub async fn spawn(factory: EngineFactory) -> Result<Self, EngineError> {
        let (signal, loading) = LoadSignal::channel();
        let (commands, queue) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        std::thread::Builder::new()
            .name("webnav-engine".to_string())
            .spawn(move || run_engine_thread(factory, signal, queue, ready_tx))
            .map_err(|e| EngineError::Launch(e.to_string()))?;

        ready_rx.await.map_err(|_| EngineError::Disconnected)??;

        info!("Browser engine thread started");
        Ok(Self {
            commands,
            loading,
            next_id: AtomicU64::new(1),
        })
    }

    /// Receiver for the engine's load state.
    pub fn loading(&self) -> watch::Receiver<LoadingState> {
        self.loading.clone()
    }

    /// Whether the engine thread is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    /// Queue a navigation. The reply arrives once the navigation is issued.
    pub(crate) fn post_navigate(
        &self,
        url: &str,
        deadline: Instant,
    ) -> Result<(u64, oneshot::Receiver<Result<String, EngineError>>), EngineError> {
        self.post(url, deadline, EngineCommand::Navigate)
    }

    /// Queue a script evaluation.
    pub(crate) fn post_evaluate(
        &self,
        script: &str,
        deadline: Instant,
    ) -> Result<(u64, oneshot::Receiver<Result<String, EngineError>>), EngineError> {
        self.post(script, deadline, EngineCommand::Evaluate)
    }

    fn post(
        &self,
        payload: &str,
        deadline: Instant,
        wrap: fn(EngineRequest) -> EngineCommand,
    ) -> Result<(u64, oneshot::Receiver<Result<String, EngineError>>), EngineError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (reply, rx) = oneshot::channel();
        let request = EngineRequest {
            id,
            payload: payload.to_string(),
            deadline,
            reply,
        };
        self.commands
            .send(wrap(request))
            .map_err(|_| EngineError::Disconnected)?;
        Ok((id, rx))
    }

    /// Stop the engine thread, waiting briefly for the engine to shut down.
    pub async fn shutdown(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.commands.send(EngineCommand::Shutdown(ack_tx)).is_err() {
            return;
        }
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, ack_rx).await.is_err() {
            warn!("Browser engine did not acknowledge shutdown in time");
        }
    }
}

impl Drop for EngineHost {
    fn drop(&mut self) {
        let (ack_tx, _) = oneshot::channel();
        let _ = self.commands.send(EngineCommand::Shutdown(ack_tx));
    }
}

fn run_engine_thread(
    factory: EngineFactory,
    signal: LoadSignal,
    queue: mpsc::UnboundedReceiver<EngineCommand>,
    ready: oneshot::Sender<Result<(), EngineError>>,
) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            let _ = ready.send(Err(EngineError::Launch(e.to_string())));
            return;
        }
    };

    runtime.block_on(async move {
        let engine = match factory(signal).await {
            Ok(engine) => engine,
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };
        if ready.send(Ok(())).is_err() {
            return;
        }
        serve(engine, queue).await;
    });
}

async fn serve(mut engine: Box<dyn Engine>, mut queue: mpsc::UnboundedReceiver<EngineCommand>) {
    let mut shutdown_ack = None;

    while let Some(command) = queue.recv().await {
        match command {
            EngineCommand::Navigate(request) => {
                let Some(request) = admit(request, "navigate") else {
                    continue;
                };
                let outcome =
                    tokio::time::timeout_at(request.deadline, engine.navigate(&request.payload))
                        .await
                        .map(|result| result.map(|()| request.payload.clone()));
                finish(request, "navigate", outcome);
            }
            EngineCommand::Evaluate(request) => {
                let Some(request) = admit(request, "evaluate") else {
                    continue;
                };
                let outcome =
                    tokio::time::timeout_at(request.deadline, engine.evaluate(&request.payload))
                        .await;
                finish(request, "evaluate", outcome);
            }
            EngineCommand::Shutdown(ack) => {
                shutdown_ack = Some(ack);
                break;
            }
        }
    }

    if let Err(e) = engine.shutdown().await {
        warn!("Browser engine shutdown failed: {}", e);
    }
    info!("Browser engine thread stopped");
    if let Some(ack) = shutdown_ack {
        let _ = ack.send(());
    }
}

fn admit(request: EngineRequest, kind: &str) -> Option<EngineRequest> {
    if Instant::now() >= request.deadline || request.reply.is_closed() {
        debug!("Dropping expired {} request {}", kind, request.id);
        return None;
    }
    debug!("Engine running {} request {}", kind, request.id);
    Some(request)
}

fn finish(
    request: EngineRequest,
    kind: &str,
    outcome: Result<Result<String, EngineError>, tokio::time::error::Elapsed>,
) {
    let result = outcome.unwrap_or(Err(EngineError::DeadlineExceeded));
    if request.reply.send(result).is_err() {
        warn!("Discarding late {} result for request {}", kind, request.id);
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
