use std::{
    io,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    config::ProviderOptions,
    engine::{ExecutionEngine, RunOptions},
    formatter::color::SupportsColor,
    group::TestGroup,
    library::{BehaviorTemplate, ContextProvider, SharedLibrary},
    outcome::TestStatus,
    registry::{self, RegistryId},
    selector::Selection,
    test::{TestCase, TestMeta},
};

/// A cloneable in-memory writer.
#[derive(Debug, Default, Clone)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SupportsColor for SharedBuffer {
    fn supports_color(&self) -> bool {
        false
    }
}

struct FeatureTemplate {
    feature: String,
}

impl BehaviorTemplate for FeatureTemplate {
    fn examples(&self, provider: &str, options: &ProviderOptions) -> Vec<TestCase> {
        let image = options
            .get("image")
            .and_then(|image| image.as_str())
            .unwrap_or("default");
        vec![TestCase::from_fn(
            format!("{provider} {} ({image})", self.feature),
            || (),
        )]
    }
}

/// A library with one passing case per feature.
pub fn library(features: &[&str]) -> SharedLibrary {
    let mut library = SharedLibrary::new();
    for feature in features {
        library.provider_feature(
            *feature,
            FeatureTemplate {
                feature: feature.to_string(),
            },
        );
    }
    library
}

#[derive(Debug, Default, Clone)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: String) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Logs `<label> before <case>` and `<label> after <case>: <status>`.
#[derive(Debug, Default)]
pub struct RecordingContext {
    label: String,
    log: EventLog,
}

impl RecordingContext {
    pub fn new(label: &str, log: &EventLog) -> Self {
        Self {
            label: label.to_string(),
            log: log.clone(),
        }
    }
}

impl ContextProvider for RecordingContext {
    fn before_case(&self, _: &TestGroup, case: &TestMeta) {
        self.log.push(format!("{} before {}", self.label, case.name));
    }

    fn after_case(&self, _: &TestGroup, case: &TestMeta, status: &TestStatus) {
        let status = match status.failed() {
            true => "failed",
            false => "passed",
        };
        self.log
            .push(format!("{} after {}: {status}", self.label, case.name));
    }
}

pub struct PanickingTeardown;

impl ContextProvider for PanickingTeardown {
    fn after_case(&self, _: &TestGroup, _: &TestMeta, _: &TestStatus) {
        panic!("teardown failed");
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    #[default]
    Record,
    Fail(&'static str),
    Panic,
}

/// What a [`RecordingEngine`] saw when it was called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub components: Vec<String>,
    pub skipped: Vec<String>,
    pub active: Option<RegistryId>,
    pub active_components: Vec<String>,
    pub options: RunOptions,
}

/// An engine that runs nothing and reports what it was handed.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub mode: EngineMode,
    pub calls: usize,
}

impl RecordingEngine {
    pub fn failing(msg: &'static str) -> Self {
        Self {
            mode: EngineMode::Fail(msg),
            calls: 0,
        }
    }

    pub fn panicking() -> Self {
        Self {
            mode: EngineMode::Panic,
            calls: 0,
        }
    }
}

impl ExecutionEngine for RecordingEngine {
    type Report = RecordedCall;
    type Error = String;

    fn run(&mut self, selection: &Selection, options: &RunOptions) -> Result<RecordedCall, String> {
        self.calls += 1;
        match self.mode {
            EngineMode::Record => (),
            EngineMode::Fail(msg) => return Err(msg.to_string()),
            EngineMode::Panic => panic!("engine exploded"),
        }

        let active = registry::active();
        Ok(RecordedCall {
            components: selection.components().map(String::from).collect(),
            skipped: selection.skipped_components().map(String::from).collect(),
            active: active.as_ref().map(|active| active.id()),
            active_components: active
                .as_ref()
                .map(|active| active.components().map(String::from).collect())
                .unwrap_or_default(),
            options: options.clone(),
        })
    }
}
