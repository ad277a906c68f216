//! Timing of extension load and execution phases.
//!
//! A [`Profiler`] belongs to one compilation session. Clones share the same
//! span table, so the session can hand it to every component that needs to
//! record timings. A disabled profiler ignores every call.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::extensions::classify::extension_root_name;

/// Receives the `start|<key>` and `end|<key>` events.
pub trait ProfileSink: Send + Sync {
    fn emit(&self, event: &str);
}

/// Forwards profile events to `tracing` at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProfileSink;

impl ProfileSink for TracingProfileSink {
    fn emit(&self, event: &str) {
        tracing::trace!(target: "compext::profile", "{event}");
    }
}

/// Keeps every emitted event in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingProfileSink {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingProfileSink {
    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ProfileSink for RecordingProfileSink {
    fn emit(&self, event: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSpan {
    /// Aggregation bucket the duration is added to.
    pub bucket: String,
    pub task: String,
    pub start: Instant,
    /// Set once the span completes.
    pub duration: Option<Duration>,
}

#[derive(Debug, Default)]
struct ProfilerState {
    spans: HashMap<String, ProfileSpan>,
    buckets: BTreeMap<String, Duration>,
}

#[derive(Clone)]
pub struct Profiler {
    enabled: bool,
    sink: Arc<dyn ProfileSink>,
    state: Arc<Mutex<ProfilerState>>,
}

impl Default for Profiler {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for Profiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profiler")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl Profiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            sink: Arc::new(TracingProfileSink),
            state: Arc::new(Mutex::new(ProfilerState::default())),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn with_sink(mut self, sink: impl ProfileSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Open a span for `key`. `bucket` defaults to the key itself.
    pub fn start_profile(&self, key: &str, bucket: Option<&str>) {
        if !self.enabled {
            return;
        }
        self.sink.emit(&format!("start|{key}"));
        let span = ProfileSpan {
            bucket: bucket.unwrap_or(key).to_string(),
            task: key.to_string(),
            start: Instant::now(),
            duration: None,
        };
        self.lock().spans.insert(key.to_string(), span);
    }

    /// Close the span for `key` and add its duration to the span's bucket.
    ///
    /// # Panics
    /// If no span was started for `key`. That is a bug in the caller, not
    /// something an extension can cause.
    pub fn complete_profile(&self, key: &str) {
        if !self.enabled {
            return;
        }
        {
            let mut state = self.lock();
            let ProfilerState { spans, buckets } = &mut *state;
            let Some(span) = spans.get_mut(key) else {
                panic!("Completed profile did not have a corresponding start.");
            };
            let elapsed = span.start.elapsed();
            span.duration = Some(elapsed);
            *buckets.entry(span.bucket.clone()).or_default() += elapsed;
        }
        self.sink.emit(&format!("end|{key}"));
    }

    /// Open a `<task>|<qualified_name>` span bucketed under the extension's
    /// root name, so all exports of one module aggregate together.
    pub fn start_extension_profile(&self, qualified_name: &str, task: &str) {
        if !self.enabled {
            return;
        }
        let key = extension_task_key(qualified_name, task);
        self.start_profile(&key, Some(extension_root_name(qualified_name)));
    }

    pub fn complete_extension_profile(&self, qualified_name: &str, task: &str) {
        if !self.enabled {
            return;
        }
        self.complete_profile(&extension_task_key(qualified_name, task));
    }

    pub fn span(&self, key: &str) -> Option<ProfileSpan> {
        self.lock().spans.get(key).cloned()
    }

    pub fn bucket_total(&self, bucket: &str) -> Option<Duration> {
        self.lock().buckets.get(bucket).copied()
    }

    /// Accumulated time per bucket, ordered by bucket name.
    pub fn report(&self) -> Vec<(String, Duration)> {
        self.lock()
            .buckets
            .iter()
            .map(|(bucket, total)| (bucket.clone(), *total))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ProfilerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn extension_task_key(qualified_name: &str, task: &str) -> String {
    format!("{task}|{qualified_name}")
}
