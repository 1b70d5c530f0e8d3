use async_trait::async_trait;
use huddle_protocol::{EventHit, RetrievalResult, ToolError};
use huddle_tools::{CalendarLookup, WorkspaceSearch};
use parking_lot::Mutex;

/// Search returning canned hits (or an error) and recording requested limits.
#[derive(Debug, Default)]
pub struct StubSearch {
    hits: Vec<RetrievalResult>,
    fail: bool,
    limits: Mutex<Vec<usize>>,
}

impl StubSearch {
    pub fn new(hits: Vec<RetrievalResult>) -> Self {
        Self {
            hits,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Limits passed to each search call, in call order.
    pub fn limits(&self) -> Vec<usize> {
        self.limits.lock().clone()
    }
}

#[async_trait]
impl WorkspaceSearch for StubSearch {
    async fn search(
        &self,
        _workspace_id: &str,
        _query: &str,
        limit: usize,
    ) -> Result<Vec<RetrievalResult>, ToolError> {
        self.limits.lock().push(limit);
        if self.fail {
            return Err(ToolError::Transport("search offline".to_string()));
        }
        Ok(self.hits.iter().take(limit).cloned().collect())
    }
}

/// Calendar returning canned events (or an error) and recording month scopes.
#[derive(Debug, Default)]
pub struct StubCalendar {
    events: Vec<EventHit>,
    fail: bool,
    scopes: Mutex<Vec<(u32, i32)>>,
}

impl StubCalendar {
    pub fn new(events: Vec<EventHit>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `(month, year)` of each lookup, in call order.
    pub fn scopes(&self) -> Vec<(u32, i32)> {
        self.scopes.lock().clone()
    }
}

#[async_trait]
impl CalendarLookup for StubCalendar {
    async fn events(&self, _workspace_id: &str, month: u32, year: i32) -> Result<Vec<EventHit>, ToolError> {
        self.scopes.lock().push((month, year));
        if self.fail {
            return Err(ToolError::Status {
                status: 500,
                body: "calendar error".to_string(),
            });
        }
        Ok(self.events.clone())
    }
}
