use std::process::ExitCode;

use acceptest::{
    HarnessConfig, Runner, SharedLibrary, SimpleEngine,
    config::ProviderOptions,
    group::TestGroup,
    library::ContextProvider,
    outcome::TestStatus,
    test::{TestCase, TestMeta},
};

const CONFIG: &str = r#"{
    "providers": [
        { "name": "virtualbox", "options": { "contexts": ["box"], "box": "bento/ubuntu" } },
        { "name": "docker", "options": { "image": "alpine" } }
    ]
}"#;

struct BoxContext;

impl ContextProvider for BoxContext {
    fn before_case(&self, group: &TestGroup, _: &TestMeta) {
        if let Some(component) = group.component() {
            println!("    (importing box for {component})");
        }
    }

    fn after_case(&self, _: &TestGroup, case: &TestMeta, status: &TestStatus) {
        if status.failed() {
            println!("    (keeping box of {} for inspection)", case.name);
        }
    }
}

fn up(provider: &str, options: &ProviderOptions) -> Vec<TestCase> {
    let source = options
        .get("image")
        .or_else(|| options.get("box"))
        .and_then(|source| source.as_str())
        .unwrap_or("default")
        .to_string();
    vec![
        TestCase::from_fn(format!("boots from {source}"), || ()),
        TestCase::from_fn(format!("{provider} answers ssh"), || ()),
    ]
}

fn halt(provider: &str, _: &ProviderOptions) -> Vec<TestCase> {
    let forced = TestCase::from_fn("halts with force", || ());
    vec![
        TestCase::from_fn("halts gracefully", || ()),
        match provider {
            "docker" => forced.with_ignore("containers are always stopped forcefully"),
            _ => forced,
        },
    ]
}

fn main() -> ExitCode {
    let mut library = SharedLibrary::new();
    library.register_context("box", BoxContext);
    library.provider_feature("up", up).provider_feature("halt", halt);

    let config = match HarnessConfig::from_json_str(CONFIG) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut runner = match Runner::new(&config, &library, SimpleEngine::default()) {
        Ok(runner) => runner,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--list") {
        for component in runner.components() {
            println!("{component}");
        }
        return ExitCode::SUCCESS;
    }

    match runner.run(args) {
        Ok(report) => report.exit_code(),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
