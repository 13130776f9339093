use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::api::ConvertResponse;
use crate::config::FailureMode;
use crate::page::{Page, SubmitEvent};
use crate::transport::Transport;

/// Shown in the output when a submission fails in defensive mode.
pub const FAILURE_MESSAGE: &str = "An error occurred while processing your request.";

/// What a settled submission did to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    Alerted,
    Failed,
    /// A newer submission was issued before this one settled.
    Stale,
}

pub struct FormSubmitHandler {
    transport: Transport,
    page: Arc<dyn Page>,
    failure_mode: FailureMode,
    latest: AtomicU64,
}

impl FormSubmitHandler {
    pub fn new(transport: Transport, page: Arc<dyn Page>, failure_mode: FailureMode) -> Self {
        Self {
            transport,
            page,
            failure_mode,
            latest: AtomicU64::new(0),
        }
    }

    pub fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// Handles a form submission.
    ///
    /// The default action is prevented, the query is read and a request token
    /// is taken before this returns. The returned future performs the request
    /// and renders the result; it can be awaited in place or spawned.
    pub fn on_submit(
        self: &Arc<Self>,
        event: &mut SubmitEvent,
    ) -> impl Future<Output = Outcome> + Send + 'static {
        event.prevent_default();
        let query = self.page.query();
        let token = self.issue_token();
        debug!(token, query = %query, "submitting query");

        let this = Arc::clone(self);
        async move { this.settle(token, &query).await }
    }

    fn issue_token(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }

    async fn settle(&self, token: u64, query: &str) -> Outcome {
        let result = self.transport.submit(query).await;

        if let Err(err) = &result {
            error!(token, error = %err, "submission failed");
        }

        if !self.is_latest(token) {
            debug!(token, "dropping stale response");
            return Outcome::Stale;
        }

        match result {
            Ok(ConvertResponse::Output(text)) => {
                self.page.set_output(&text);
                Outcome::Rendered
            }
            Ok(ConvertResponse::Error(message)) => {
                info!(token, message = %message, "server reported an error");
                self.page.alert(&message);
                Outcome::Alerted
            }
            Err(_) => {
                if self.failure_mode == FailureMode::Defensive {
                    self.page.set_output(FAILURE_MESSAGE);
                }
                Outcome::Failed
            }
        }
    }
}
