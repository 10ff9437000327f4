//! Interaction controller: runs transport calls as tasks and applies their
//! results to [`ControllerState`] as they arrive.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::state::{ControllerState, OpId};
use crate::client::{ClientError, UsageService};
use crate::usage::{ChatRequest, ChatResponse, UsageRow};

/// Result of a finished transport call, delivered back to the controller
#[derive(Debug)]
pub enum Completion {
    /// A summary refresh finished
    Summary {
        op: OpId,
        result: Result<Vec<UsageRow>, ClientError>,
    },
    /// A chat submission finished
    Chat {
        op: OpId,
        result: Result<ChatResponse, ClientError>,
    },
}

/// What applying a completion did to the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Rows were replaced by a fresh summary
    SummaryUpdated { op: OpId },
    /// A summary refresh failed
    SummaryFailed { op: OpId, message: String },
    /// A chat answer was stored and a follow-up refresh started
    ChatAnswered { op: OpId, refresh: OpId },
    /// A chat submission failed
    ChatFailed { op: OpId, message: String },
}

/// Orchestrates summary refreshes and chat submissions.
///
/// Overlapping operations are allowed. Nothing is cancelled: each spawned
/// call applies its result when it arrives, so a stale response can
/// overwrite a newer one.
pub struct InteractionController<S: UsageService> {
    service: Arc<S>,
    state: ControllerState,
    next_op: OpId,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<S: UsageService> InteractionController<S> {
    /// Create a controller around a service
    pub fn new(service: S) -> Self {
        Self::from_shared(Arc::new(service))
    }

    /// Create a controller around an already-shared service
    pub fn from_shared(service: Arc<S>) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            service,
            state: ControllerState::new(),
            next_op: 1,
            completion_tx,
            completion_rx,
        }
    }

    /// Current dashboard state
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Whether any call has not reported back yet
    pub fn has_in_flight(&self) -> bool {
        self.state.summary_in_flight() > 0 || self.state.chat_in_flight() > 0
    }

    /// Initial load: fetch the usage summary
    pub fn start(&mut self) -> OpId {
        info!("Loading initial usage summary");
        self.refresh_summary()
    }

    /// Start a summary refresh. Must be called within a tokio runtime.
    pub fn refresh_summary(&mut self) -> OpId {
        let op = self.allocate_op();
        self.state.begin_summary();
        debug!(op, "summary refresh started");

        let service = Arc::clone(&self.service);
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = service.fetch_usage_summary().await;
            // Receiver gone means the controller was dropped
            let _ = tx.send(Completion::Summary { op, result });
        });

        op
    }

    /// Start a chat submission. Must be called within a tokio runtime.
    ///
    /// Empty fields are not rejected here; the service decides.
    pub fn submit_chat(&mut self, req: ChatRequest) -> OpId {
        let op = self.allocate_op();
        self.state.begin_chat();
        debug!(op, model = %req.model, user_label = %req.user_label, "chat submission started");

        let service = Arc::clone(&self.service);
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = service.submit_chat(req).await;
            let _ = tx.send(Completion::Chat { op, result });
        });

        op
    }

    /// Apply one completion to the state
    pub fn apply(&mut self, completion: Completion) -> ControllerEvent {
        match completion {
            Completion::Summary { op, result } => {
                let failure = result.as_ref().err().map(|e| e.to_string());
                self.state.finish_summary(result);
                match failure {
                    None => {
                        debug!(op, rows = self.state.rows().len(), "summary refresh finished");
                        ControllerEvent::SummaryUpdated { op }
                    }
                    Some(message) => {
                        warn!(op, "summary refresh failed: {}", message);
                        ControllerEvent::SummaryFailed { op, message }
                    }
                }
            }
            Completion::Chat { op, result } => {
                let failure = result.as_ref().err().map(|e| e.to_string());
                if self.state.finish_chat(result) {
                    debug!(op, "chat answered, refreshing summary");
                    let refresh = self.refresh_summary();
                    ControllerEvent::ChatAnswered { op, refresh }
                } else {
                    let message = failure.unwrap_or_default();
                    warn!(op, "chat submission failed: {}", message);
                    ControllerEvent::ChatFailed { op, message }
                }
            }
        }
    }

    /// Apply every completion that has already arrived, without waiting
    pub fn poll_completions(&mut self) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        while let Ok(completion) = self.completion_rx.try_recv() {
            events.push(self.apply(completion));
        }
        events
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<ControllerEvent> {
        if !self.has_in_flight() {
            return None;
        }
        let completion = self.completion_rx.recv().await?;
        Some(self.apply(completion))
    }

    fn allocate_op(&mut self) -> OpId {
        let op = self.next_op;
        self.next_op += 1;
        op
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Status;
    use pretty_assertions::assert_eq;
    use tokio::sync::oneshot;

    /// A call the test has to release explicitly
    enum Call {
        Summary(oneshot::Sender<Result<Vec<UsageRow>, ClientError>>),
        Chat(
            ChatRequest,
            oneshot::Sender<Result<ChatResponse, ClientError>>,
        ),
    }

    /// Service whose calls block until the test answers them
    struct GatedService {
        calls: mpsc::UnboundedSender<Call>,
    }

    impl UsageService for GatedService {
        async fn submit_chat(&self, req: ChatRequest) -> Result<ChatResponse, ClientError> {
            let (tx, rx) = oneshot::channel();
            let _ = self.calls.send(Call::Chat(req, tx));
            rx.await
                .unwrap_or_else(|_| Err(ClientError::transport("gate dropped")))
        }

        async fn fetch_usage_summary(&self) -> Result<Vec<UsageRow>, ClientError> {
            let (tx, rx) = oneshot::channel();
            let _ = self.calls.send(Call::Summary(tx));
            rx.await
                .unwrap_or_else(|_| Err(ClientError::transport("gate dropped")))
        }
    }

    fn gated() -> (
        InteractionController<GatedService>,
        mpsc::UnboundedReceiver<Call>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (InteractionController::new(GatedService { calls: tx }), rx)
    }

    async fn next_summary_gate(
        calls: &mut mpsc::UnboundedReceiver<Call>,
    ) -> oneshot::Sender<Result<Vec<UsageRow>, ClientError>> {
        match calls.recv().await {
            Some(Call::Summary(gate)) => gate,
            _ => panic!("expected a summary call"),
        }
    }

    async fn next_chat_gate(
        calls: &mut mpsc::UnboundedReceiver<Call>,
    ) -> (
        ChatRequest,
        oneshot::Sender<Result<ChatResponse, ClientError>>,
    ) {
        match calls.recv().await {
            Some(Call::Chat(req, gate)) => (req, gate),
            _ => panic!("expected a chat call"),
        }
    }

    fn row(model: &str, user: &str, input: u64, output: u64) -> UsageRow {
        UsageRow {
            model: model.to_string(),
            user_label: user.to_string(),
            total_input_tokens: input,
            total_output_tokens: output,
        }
    }

    fn chat_request() -> ChatRequest {
        ChatRequest {
            api_key: "sk-test".to_string(),
            model: "gpt-5-mini".to_string(),
            user_label: "alice".to_string(),
            prompt: "Say hello".to_string(),
        }
    }

    #[tokio::test]
    async fn test_start_loads_summary() {
        let (mut controller, mut calls) = gated();
        let op = controller.start();
        assert_eq!(controller.state().status(), Status::SummaryLoading);

        let gate = next_summary_gate(&mut calls).await;
        gate.send(Ok(vec![
            row("gpt-4o", "alice", 10, 5),
            row("gpt-4o", "bob", 7, 3),
            row("gpt-4o-mini", "alice", 2, 1),
        ]))
        .unwrap();

        let event = controller.next_completion().await;
        assert_eq!(event, Some(ControllerEvent::SummaryUpdated { op }));
        assert_eq!(controller.state().status(), Status::Idle);
        assert_eq!(controller.state().rows().len(), 3);

        let totals: Vec<(&str, u64, u64)> = controller
            .state()
            .totals()
            .iter()
            .map(|t| (t.model.as_str(), t.input_tokens, t.output_tokens))
            .collect();
        assert_eq!(totals, vec![("gpt-4o", 17, 8), ("gpt-4o-mini", 2, 1)]);
    }

    #[tokio::test]
    async fn test_start_failure_is_not_fatal() {
        let (mut controller, mut calls) = gated();
        let op = controller.start();

        let gate = next_summary_gate(&mut calls).await;
        gate.send(Err(ClientError::transport("connection refused")))
            .unwrap();

        let event = controller.next_completion().await;
        assert_eq!(
            event,
            Some(ControllerEvent::SummaryFailed {
                op,
                message: "connection refused".to_string(),
            })
        );
        assert!(!controller.has_in_flight());
        assert_eq!(controller.state().error(), Some("connection refused"));
        assert!(controller.next_completion().await.is_none());
    }

    #[tokio::test]
    async fn test_chat_success_triggers_refresh() {
        let (mut controller, mut calls) = gated();
        let op = controller.submit_chat(chat_request());
        assert_eq!(controller.state().status(), Status::ChatSubmitting);

        let (req, gate) = next_chat_gate(&mut calls).await;
        assert_eq!(req, chat_request());
        gate.send(Ok(ChatResponse {
            content: "Hello!".to_string(),
        }))
        .unwrap();

        let event = controller.next_completion().await.unwrap();
        let refresh = match event {
            ControllerEvent::ChatAnswered { op: answered, refresh } => {
                assert_eq!(answered, op);
                refresh
            }
            other => panic!("unexpected event {:?}", other),
        };
        assert_eq!(controller.state().response().unwrap().content, "Hello!");
        assert_eq!(controller.state().status(), Status::SummaryLoading);

        let gate = next_summary_gate(&mut calls).await;
        gate.send(Ok(vec![row("gpt-5-mini", "alice", 5, 3)])).unwrap();

        assert_eq!(
            controller.next_completion().await,
            Some(ControllerEvent::SummaryUpdated { op: refresh })
        );
        assert_eq!(controller.state().totals()[0].output_tokens, 3);
        assert_eq!(controller.state().status(), Status::Idle);
    }

    #[tokio::test]
    async fn test_chat_failure_leaves_state_untouched() {
        let (mut controller, mut calls) = gated();

        controller.start();
        let gate = next_summary_gate(&mut calls).await;
        gate.send(Ok(vec![row("gpt-4o", "alice", 10, 5)])).unwrap();
        controller.next_completion().await;

        controller.submit_chat(chat_request());
        let (_, gate) = next_chat_gate(&mut calls).await;
        gate.send(Ok(ChatResponse {
            content: "first answer".to_string(),
        }))
        .unwrap();
        controller.next_completion().await;
        let gate = next_summary_gate(&mut calls).await;
        gate.send(Ok(vec![row("gpt-4o", "alice", 20, 9)])).unwrap();
        controller.next_completion().await;

        let op = controller.submit_chat(chat_request());
        let (_, gate) = next_chat_gate(&mut calls).await;
        gate.send(Err(ClientError::RequestFailed {
            status: 500,
            body: "rate limit exceeded".to_string(),
        }))
        .unwrap();

        assert_eq!(
            controller.next_completion().await,
            Some(ControllerEvent::ChatFailed {
                op,
                message: "rate limit exceeded".to_string(),
            })
        );
        let state = controller.state();
        assert_eq!(state.error(), Some("rate limit exceeded"));
        assert_eq!(state.response().unwrap().content, "first answer");
        assert_eq!(state.rows(), &[row("gpt-4o", "alice", 20, 9)]);
        // No refresh follows a failed chat
        assert!(!controller.has_in_flight());
    }

    #[tokio::test]
    async fn test_initial_refresh_landing_late_keeps_chat_error() {
        let (mut controller, mut calls) = gated();

        let initial = controller.start();
        let summary_gate = next_summary_gate(&mut calls).await;

        controller.submit_chat(chat_request());
        let (_, chat_gate) = next_chat_gate(&mut calls).await;
        chat_gate
            .send(Err(ClientError::RequestFailed {
                status: 500,
                body: "rate limit exceeded".to_string(),
            }))
            .unwrap();
        controller.next_completion().await;
        assert_eq!(controller.state().error(), Some("rate limit exceeded"));

        summary_gate
            .send(Ok(vec![row("gpt-4o", "alice", 10, 5)]))
            .unwrap();
        assert_eq!(
            controller.next_completion().await,
            Some(ControllerEvent::SummaryUpdated { op: initial })
        );

        let state = controller.state();
        assert_eq!(state.rows(), &[row("gpt-4o", "alice", 10, 5)]);
        assert_eq!(state.error(), Some("rate limit exceeded"));
        assert_eq!(
            state.status(),
            Status::Error("rate limit exceeded".to_string())
        );
    }

    #[tokio::test]
    async fn test_first_issued_summary_arriving_last_wins() {
        let (mut controller, mut calls) = gated();

        let first = controller.refresh_summary();
        let first_gate = next_summary_gate(&mut calls).await;
        let second = controller.refresh_summary();
        let second_gate = next_summary_gate(&mut calls).await;

        second_gate
            .send(Ok(vec![row("from-second", "a", 2, 2)]))
            .unwrap();
        assert_eq!(
            controller.next_completion().await,
            Some(ControllerEvent::SummaryUpdated { op: second })
        );
        assert_eq!(controller.state().rows()[0].model, "from-second");

        first_gate
            .send(Ok(vec![row("from-first", "a", 1, 1)]))
            .unwrap();
        assert_eq!(
            controller.next_completion().await,
            Some(ControllerEvent::SummaryUpdated { op: first })
        );

        assert_eq!(controller.state().rows(), &[row("from-first", "a", 1, 1)]);
        assert_eq!(controller.state().totals()[0].model, "from-first");
    }

    #[tokio::test]
    async fn test_overlapping_submissions_are_tracked_independently() {
        let (mut controller, mut calls) = gated();

        let a = controller.submit_chat(chat_request());
        let (_, gate_a) = next_chat_gate(&mut calls).await;
        let b = controller.submit_chat(chat_request());
        let (_, gate_b) = next_chat_gate(&mut calls).await;
        assert_ne!(a, b);
        assert_eq!(controller.state().chat_in_flight(), 2);

        // B answers first, then A: the slot holds A's answer
        gate_b
            .send(Ok(ChatResponse {
                content: "b".to_string(),
            }))
            .unwrap();
        controller.next_completion().await;
        gate_a
            .send(Ok(ChatResponse {
                content: "a".to_string(),
            }))
            .unwrap();
        controller.next_completion().await;

        assert_eq!(controller.state().response().unwrap().content, "a");
        assert_eq!(controller.state().chat_in_flight(), 0);
        assert_eq!(controller.state().summary_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_poll_completions_drains_arrived_results() {
        let (mut controller, mut calls) = gated();
        assert!(controller.poll_completions().is_empty());

        let op = controller.refresh_summary();
        let gate = next_summary_gate(&mut calls).await;
        gate.send(Ok(vec![])).unwrap();

        // Let the spawned task forward the result
        let mut events = Vec::new();
        while events.is_empty() {
            tokio::task::yield_now().await;
            events = controller.poll_completions();
        }
        assert_eq!(events, vec![ControllerEvent::SummaryUpdated { op }]);
        assert!(!controller.has_in_flight());
    }
}
