use geobind_rs_protocol::{EventSink, InvocationEvent, InvocationEventPayload};
use parking_lot::Mutex;

/// Event sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<InvocationEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<InvocationEvent> {
        self.events.lock().clone()
    }

    /// Short names of the recorded payload kinds, in order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .iter()
            .map(|event| match event.payload {
                InvocationEventPayload::Submitted { .. } => "submitted",
                InvocationEventPayload::Completed { .. } => "completed",
                InvocationEventPayload::Failed { .. } => "failed",
            })
            .collect()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: InvocationEvent) {
        self.events.lock().push(event);
    }
}
