use std::sync::{Mutex, MutexGuard, PoisonError};

pub trait Page: Send + Sync {
    fn query(&self) -> String;

    /// Replaces the output content with plain text.
    fn set_output(&self, text: &str);

    /// Shows `message` and blocks further interaction until acknowledged.
    fn alert(&self, message: &str);
}

#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Default)]
pub struct MemoryPage {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    query: String,
    output: String,
    alerts: Vec<String>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(output: impl Into<String>) -> Self {
        let page = Self::new();
        page.lock().output = output.into();
        page
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.lock().query = query.into();
    }

    pub fn output(&self) -> String {
        self.lock().output.clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.lock().alerts.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Page for MemoryPage {
    fn query(&self) -> String {
        self.lock().query.clone()
    }

    fn set_output(&self, text: &str) {
        self.lock().output = text.to_string();
    }

    fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_event_starts_with_default_action() {
        let mut event = SubmitEvent::new();
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
    }

    #[test]
    fn memory_page_replaces_output_and_collects_alerts() {
        let page = MemoryPage::with_output("old");
        page.set_output("new");
        page.alert("first");
        page.alert("second");
        assert_eq!(page.output(), "new");
        assert_eq!(page.alerts(), vec!["first", "second"]);
    }
}
