//! Calendar-like event lookup scoped to one month.

use crate::http::{require_url, send_json};
use async_trait::async_trait;
use huddle_protocol::{EventHit, RetrievalResult, ToolError};
use log::debug;
use reqwest::Client;
use serde_json::Value;

/// Events of a workspace within a calendar month.
#[async_trait]
pub trait CalendarLookup: Send + Sync {
    /// `month` is 1-based.
    async fn events(&self, workspace_id: &str, month: u32, year: i32) -> Result<Vec<EventHit>, ToolError>;
}

/// Calendar service reached over HTTP with
/// `GET <url>?workspaceId=..&month=..&year=..`.
#[derive(Debug, Clone)]
pub struct HttpCalendarLookup {
    client: Client,
    url: Option<String>,
}

impl HttpCalendarLookup {
    pub fn new(client: Client, url: Option<String>) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl CalendarLookup for HttpCalendarLookup {
    async fn events(&self, workspace_id: &str, month: u32, year: i32) -> Result<Vec<EventHit>, ToolError> {
        let url = require_url(&self.url, "calendar")?;
        let request = self.client.get(url).query(&[
            ("workspaceId", workspace_id.to_string()),
            ("month", month.to_string()),
            ("year", year.to_string()),
        ]);
        let raw: Vec<Value> = send_json(request, "calendar").await?;
        let events = raw
            .into_iter()
            .map(event_from_value)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "calendar lookup finished (workspace_id={}, month={}, year={}, events={})",
            workspace_id,
            month,
            year,
            events.len()
        );
        Ok(events)
    }
}

/// Decode one calendar entry; entries without a type tag are events.
fn event_from_value(mut value: Value) -> Result<EventHit, ToolError> {
    if let Value::Object(map) = &mut value {
        map.entry("type").or_insert_with(|| Value::from("event"));
    }
    match serde_json::from_value(value) {
        Ok(RetrievalResult::Event(event)) => Ok(event),
        Ok(other) => Err(ToolError::Decode(format!(
            "calendar returned a {} record",
            other.type_tag()
        ))),
        Err(err) => Err(ToolError::Decode(format!("calendar: {err}"))),
    }
}
