//! Background owner of the analysis client for the TUI.
//!
//! The TUI poll loop is synchronous and must keep drawing while a request
//! is in flight. The client therefore lives in a single tokio task that runs
//! commands one after another; outcomes come back over a std channel the
//! loop drains with `try_recv` on every tick.

use std::sync::mpsc;
use std::time::Duration;

use forge_client::{AnalysisClient, AnalysisError, Reply};
use forge_models::{AnalysisInput, ComplexityMode};
use tokio::runtime::Handle;
use tokio::sync::mpsc as async_mpsc;
use tracing::debug;

use crate::error::{AppError, Result};

/// Work for the client task.
#[derive(Debug)]
pub enum WorkerCommand {
    /// Start a new analysis, taking at least `minimum`.
    Analyze {
        /// Source to analyze.
        input: AnalysisInput,
        /// Minimum time before the outcome is reported.
        minimum: Duration,
    },
    /// Send a follow-up in the current session.
    FollowUp {
        /// Text as typed, or a canned action prompt.
        text: String,
        /// Steering applied to the text.
        mode: ComplexityMode,
    },
}

/// Outcome reported back to the poll loop.
#[derive(Debug)]
pub enum WorkerEvent {
    /// The first analysis finished.
    Analyzed(std::result::Result<Reply, AnalysisError>),
    /// A follow-up finished.
    Replied(std::result::Result<Reply, AnalysisError>),
}

/// Handle to the client task.
pub struct ClientWorker {
    commands: async_mpsc::UnboundedSender<WorkerCommand>,
    events: mpsc::Receiver<WorkerEvent>,
}

impl ClientWorker {
    /// Move `client` into a task on `handle`.
    pub fn spawn(handle: &Handle, mut client: AnalysisClient) -> Self {
        let (command_tx, mut command_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();

        handle.spawn(async move {
            while let Some(command) = command_rx.recv().await {
                let event = match command {
                    WorkerCommand::Analyze { input, minimum } => {
                        WorkerEvent::Analyzed(client.start_analysis_paced(input, minimum).await)
                    }
                    WorkerCommand::FollowUp { text, mode } => {
                        WorkerEvent::Replied(client.send_follow_up(&text, mode).await)
                    }
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
            debug!("Client worker stopped");
        });

        Self {
            commands: command_tx,
            events: event_rx,
        }
    }

    /// Queue a command.
    pub fn send(&self, command: WorkerCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| AppError::WorkerStopped)
    }

    /// Next finished outcome, without blocking.
    pub fn try_recv(&self) -> Option<WorkerEvent> {
        self.events.try_recv().ok()
    }

    /// Next finished outcome, waiting up to `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<WorkerEvent> {
        self.events.recv_timeout(timeout).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{overloaded, ScriptedProvider};

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_worker_runs_commands_in_order() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (client, provider) = ScriptedProvider::new()
            .reply_text("Summary")
            .reply_text("Answer")
            .into_client();
        let worker = ClientWorker::spawn(runtime.handle(), client);

        worker
            .send(WorkerCommand::Analyze {
                input: AnalysisInput::url("https://a.com", false),
                minimum: Duration::ZERO,
            })
            .unwrap();
        worker
            .send(WorkerCommand::FollowUp {
                text: "explain X".into(),
                mode: ComplexityMode::Expert,
            })
            .unwrap();

        match worker.recv_timeout(WAIT) {
            Some(WorkerEvent::Analyzed(Ok(reply))) => assert_eq!(reply.text, "Summary"),
            other => panic!("unexpected event: {:?}", other),
        }
        match worker.recv_timeout(WAIT) {
            Some(WorkerEvent::Replied(Ok(reply))) => assert_eq!(reply.text, "Answer"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(provider.sent_texts()[1], "(Mode: PhD Expert Level) explain X");
    }

    #[test]
    fn test_worker_reports_failures() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (client, _) = ScriptedProvider::new().fail(overloaded()).into_client();
        let worker = ClientWorker::spawn(runtime.handle(), client);

        worker
            .send(WorkerCommand::FollowUp {
                text: "too early".into(),
                mode: ComplexityMode::Standard,
            })
            .unwrap();
        assert!(matches!(
            worker.recv_timeout(WAIT),
            Some(WorkerEvent::Replied(Err(AnalysisError::SessionNotInitialized)))
        ));

        worker
            .send(WorkerCommand::Analyze {
                input: AnalysisInput::url("https://a.com", false),
                minimum: Duration::ZERO,
            })
            .unwrap();
        assert!(matches!(
            worker.recv_timeout(WAIT),
            Some(WorkerEvent::Analyzed(Err(AnalysisError::AnalysisFailure(_))))
        ));
    }

    #[test]
    fn test_try_recv_empty() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (client, _) = ScriptedProvider::new().into_client();
        let worker = ClientWorker::spawn(runtime.handle(), client);
        assert!(worker.try_recv().is_none());
    }
}
