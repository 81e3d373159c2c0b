//! Debug timeline: a monotonically-timestamped log of stage transitions,
//! exported as the optional debug bundle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub stage: String,
    pub timestamp: DateTime<Utc>,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugTimeline {
    pub events: Vec<TimelineEvent>,
}

impl DebugTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stage: impl Into<String>) {
        self.events.push(TimelineEvent { stage: stage.into(), timestamp: Utc::now(), detail: None });
    }

    pub fn record_with_detail(&mut self, stage: impl Into<String>, detail: impl Into<String>) {
        self.events.push(TimelineEvent { stage: stage.into(), timestamp: Utc::now(), detail: Some(detail.into()) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_recorded_in_order() {
        let mut timeline = DebugTimeline::new();
        timeline.record("ingest");
        timeline.record("script");
        assert_eq!(timeline.events.len(), 2);
        assert_eq!(timeline.events[0].stage, "ingest");
        assert_eq!(timeline.events[1].stage, "script");
        assert!(timeline.events[1].timestamp >= timeline.events[0].timestamp);
    }
}
