use std::sync::Mutex;

/// Sink for (category, action, label) usage events. Injected so tests can
/// substitute a recording implementation.
pub trait Analytics: Send + Sync {
    fn track(&self, category: &str, action: &str, label: Option<&str>);
}

/// Default sink: events go to the diagnostic log and nowhere else.
pub struct LogAnalytics;

impl Analytics for LogAnalytics {
    fn track(&self, category: &str, action: &str, label: Option<&str>) {
        log::info!(
            "analytics: category={} action={} label={}",
            category,
            action,
            label.unwrap_or("-")
        );
    }
}

/// Keeps every tracked event in memory. Used by tests to assert on the
/// events a component produced.
#[derive(Default)]
pub struct RecordingAnalytics {
    events: Mutex<Vec<(String, String, Option<String>)>>,
}

impl RecordingAnalytics {
    pub fn events(&self) -> Vec<(String, String, Option<String>)> {
        self.events.lock().expect("analytics lock poisoned").clone()
    }
}

impl Analytics for RecordingAnalytics {
    fn track(&self, category: &str, action: &str, label: Option<&str>) {
        self.events
            .lock()
            .expect("analytics lock poisoned")
            .push((
                category.to_string(),
                action.to_string(),
                label.map(str::to_string),
            ));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn recording_sink_keeps_events_in_order() {
        let sink = RecordingAnalytics::default();

        sink.track("Response Pane", "View", Some("Headers"));
        sink.track("Response", "Save Cancel", None);

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].2.as_deref(), Some("Headers"));
        assert_eq!(events[1].1, "Save Cancel");
    }
}
