use std::{
    io,
    sync::{Arc, LazyLock, Mutex},
};

use acceptest::{
    HarnessConfig, Runner, SharedLibrary, SimpleEngine,
    config::ProviderOptions,
    engine::RunOptions,
    formatter::{
        FormatterId,
        acceptance::AcceptanceFormatter,
        color::{ColorSetting, SupportsColor},
    },
    group::TestGroup,
    library::ContextProvider,
    outcome::TestStatus,
    test::{TestCase, TestMeta},
};
use regex::Regex;

#[derive(Debug, Default, Clone)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::other("poison error"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SupportsColor for Buffer {
    fn supports_color(&self) -> bool {
        false
    }
}

impl Buffer {
    pub fn contents(&self) -> String {
        let guard = self.0.lock().unwrap();
        String::from_utf8(guard.to_vec()).unwrap()
    }
}

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"finished in \d+\.\d{2}s").unwrap());

pub fn sanitize_duration(input: &str) -> String {
    DURATION_RE
        .replace_all(input, "finished in <duration>")
        .into_owned()
}

/// Records which cases a shared context wrapped.
#[derive(Debug, Default, Clone)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl ContextProvider for Journal {
    fn before_case(&self, group: &TestGroup, case: &TestMeta) {
        self.0
            .lock()
            .unwrap()
            .push(format!("{} :: {}", group.name, case.name));
    }

    fn after_case(&self, _: &TestGroup, _: &TestMeta, status: &TestStatus) {
        if status.failed() {
            self.0.lock().unwrap().push(String::from("failed"));
        }
    }
}

fn up(provider: &str, options: &ProviderOptions) -> Vec<TestCase> {
    let image = options
        .get("image")
        .and_then(|image| image.as_str())
        .map(String::from);
    vec![
        TestCase::from_fn(format!("boots {provider}"), || ()),
        TestCase::from_fn(
            format!("uses image {}", image.as_deref().unwrap_or("none")),
            move || match image.as_deref() {
                Some("alpine") => Ok(()),
                other => Err(format!("unexpected image {other:?}")),
            },
        ),
    ]
}

fn halt(_: &str, _: &ProviderOptions) -> Vec<TestCase> {
    vec![TestCase::from_fn("halts", || ())]
}

/// `up` and `halt` for every provider, the `journal` context available.
pub fn library(journal: &Journal) -> SharedLibrary {
    let mut library = SharedLibrary::new();
    library.register_context("journal", journal.clone());
    library.provider_feature("up", up).provider_feature("halt", halt);
    library
}

pub const CONFIG: &str = r#"{
    "providers": [
        { "name": "virtualbox", "options": { "image": "alpine" } },
        { "name": "docker", "options": { "contexts": ["journal"], "image": "alpine" } }
    ]
}"#;

pub fn config() -> HarnessConfig {
    HarnessConfig::from_json_str(CONFIG).unwrap()
}

pub struct Fixture {
    pub runner: Runner<SimpleEngine, Buffer>,
    pub output: Buffer,
    pub notices: Buffer,
    pub journal: Journal,
}

pub fn fixture(config: &HarnessConfig) -> Fixture {
    let output = Buffer::default();
    let notices = Buffer::default();
    let journal = Journal::default();

    let engine = SimpleEngine::new().with_formatter(
        FormatterId::ACCEPTANCE,
        AcceptanceFormatter::default().with_target(output.clone()),
    );
    let runner = Runner::new(config, &library(&journal), engine)
        .unwrap()
        .with_notice_target(notices.clone())
        .with_run_options(RunOptions::default().with_color(ColorSetting::Never));

    Fixture {
        runner,
        output,
        notices,
        journal,
    }
}
