pub mod api;
pub mod config;
pub mod handler;
pub mod page;
pub mod terminal;
pub mod transport;

use std::sync::Arc;

use reqwest::Client;

pub use config::{ClientConfig, ConfigError, FailureMode};
pub use handler::{FormSubmitHandler, Outcome, FAILURE_MESSAGE};
pub use page::{MemoryPage, Page, SubmitEvent};
pub use transport::{SubmitError, Transport};

/// Wires a handler for `page` against the endpoint described by `cfg`.
pub fn build_handler(
    cfg: &ClientConfig,
    page: Arc<dyn Page>,
) -> Result<Arc<FormSubmitHandler>, url::ParseError> {
    let transport = Transport::new(Client::new(), cfg)?;
    Ok(Arc::new(FormSubmitHandler::new(
        transport,
        page,
        cfg.failure_mode,
    )))
}
