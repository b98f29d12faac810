//! Analytics: fire-and-forget usage events.
//!
//! The workflow service records events and never reads them back.
//! `AppState` carries an `Arc<dyn AnalyticsSink>`; the production sink fans out
//! to tracing and, when a database is configured, to Postgres.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    SessionStarted,
    JdGenerated,
    FollowupSubmitted,
    ToolInvoked,
    SessionFinalized,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::SessionStarted => "session_started",
            EventName::JdGenerated => "jd_generated",
            EventName::FollowupSubmitted => "followup_submitted",
            EventName::ToolInvoked => "tool_invoked",
            EventName::SessionFinalized => "session_finalized",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsEvent {
    pub timestamp: DateTime<Utc>,
    pub event_name: EventName,
    pub details: Value,
}

impl AnalyticsEvent {
    pub fn now(event_name: EventName, details: Value) -> Self {
        Self {
            timestamp: Utc::now(),
            event_name,
            details,
        }
    }
}

/// Append-only sink for analytics events. Must not block or fail the caller.
pub trait AnalyticsSink: Send + Sync {
    fn record(&self, event: AnalyticsEvent);
}

/// Writes each event as a structured log line.
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn record(&self, event: AnalyticsEvent) {
        info!(
            event = event.event_name.as_str(),
            details = %event.details,
            "[Analytics] {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
    }
}

/// Inserts events into `analytics_events` from a background task.
pub struct PgAnalyticsSink {
    pool: PgPool,
}

impl PgAnalyticsSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AnalyticsSink for PgAnalyticsSink {
    fn record(&self, event: AnalyticsEvent) {
        let pool = self.pool.clone();
        let AnalyticsEvent {
            timestamp,
            event_name,
            details,
        } = event;

        tokio::spawn(async move {
            let result = sqlx::query(
                r#"
                INSERT INTO analytics_events (occurred_at, event_name, details)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(timestamp)
            .bind(event_name.as_str())
            .bind(details)
            .execute(&pool)
            .await;

            if let Err(e) = result {
                warn!("Failed to persist analytics event {}: {e}", event_name.as_str());
            }
        });
    }
}

/// Keeps events in memory. Used by tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemorySink {
    events: std::sync::Mutex<Vec<AnalyticsEvent>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn names(&self) -> Vec<EventName> {
        self.events().into_iter().map(|e| e.event_name).collect()
    }
}

#[cfg(test)]
impl AnalyticsSink for MemorySink {
    fn record(&self, event: AnalyticsEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Forwards every event to each inner sink.
pub struct FanoutSink {
    sinks: Vec<Arc<dyn AnalyticsSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn AnalyticsSink>>) -> Self {
        Self { sinks }
    }
}

impl AnalyticsSink for FanoutSink {
    fn record(&self, event: AnalyticsEvent) {
        for sink in &self.sinks {
            sink.record(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_serializes_snake_case_name() {
        let event = AnalyticsEvent::now(EventName::ToolInvoked, json!({"tool": "web_search"}));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event_name"], "tool_invoked");
        assert_eq!(value["details"]["tool"], "web_search");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_fanout_reaches_every_sink() {
        let a = Arc::new(MemorySink::new());
        let b = Arc::new(MemorySink::new());
        let sinks: Vec<Arc<dyn AnalyticsSink>> = vec![
            a.clone() as Arc<dyn AnalyticsSink>,
            b.clone() as Arc<dyn AnalyticsSink>,
            Arc::new(TracingSink),
        ];
        let fanout = FanoutSink::new(sinks);

        fanout.record(AnalyticsEvent::now(EventName::SessionStarted, json!({"role": "SRE"})));
        fanout.record(AnalyticsEvent::now(EventName::JdGenerated, Value::Null));

        assert_eq!(a.names(), vec![EventName::SessionStarted, EventName::JdGenerated]);
        assert_eq!(b.events().len(), 2);
    }
}
