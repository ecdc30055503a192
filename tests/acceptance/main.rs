use std::process::ExitCode;

use acceptest::{
    HarnessConfig, HarnessError, ProviderConfig, Runner, SimpleEngine,
    registry::{self, Registry},
};
use pretty_assertions::assert_eq;
use regex::Regex;
use serial_test::serial;

mod support;

use support::*;

#[test]
#[serial]
fn single_component_run() {
    let mut fixture = fixture(&config());

    let report = fixture.runner.run(["provider/virtualbox/up"]).unwrap();

    assert_eq!(report.exit_code(), ExitCode::SUCCESS);
    assert_eq!(
        fixture.notices.contents(),
        "Skipping: provider/virtualbox/halt\n\
         Skipping: provider/docker/up\n\
         Skipping: provider/docker/halt\n"
    );
    assert_eq!(
        sanitize_duration(&fixture.output.contents()),
        "\nrunning 1 group (3 skipped)\n\
         \n\
         provider/virtualbox/up\n    \
         boots virtualbox ... ok\n    \
         uses image alpine ... ok\n\
         \n\
         test result: ok. 2 passed; 0 failed; 0 ignored; 3 skipped; finished in <duration>\n"
    );
    assert!(fixture.journal.entries().is_empty());
}

#[test]
#[serial]
fn empty_request_runs_the_whole_matrix() {
    let mut fixture = fixture(&config());

    let report = fixture.runner.run_all().unwrap();

    let groups: Vec<_> = report.groups.iter().map(|g| g.group.as_ref()).collect();
    assert_eq!(
        groups,
        [
            "provider/virtualbox/up",
            "provider/virtualbox/halt",
            "provider/docker/up",
            "provider/docker/halt",
        ]
    );
    assert_eq!(report.passed(), 6);
    assert!(report.skipped.is_empty());
    assert!(fixture.notices.contents().is_empty());
    assert_eq!(
        fixture.journal.entries(),
        [
            "provider/docker/up :: boots docker",
            "provider/docker/up :: uses image alpine",
            "provider/docker/halt :: halts",
        ]
    );
}

#[test]
#[serial]
fn unmatched_component_skips_everything() {
    let mut fixture = fixture(&config());

    let report = fixture.runner.run(["provider/nomatch/up"]).unwrap();

    assert_eq!(report.outcomes().count(), 0);
    assert_eq!(report.skipped.len(), 4);
    assert_eq!(report.exit_code(), ExitCode::SUCCESS);
    assert_eq!(fixture.notices.contents().lines().count(), 4);
    let output = sanitize_duration(&fixture.output.contents());
    assert!(output.ends_with(
        "test result: ok. 0 passed; 0 failed; 0 ignored; 4 skipped; finished in <duration>\n"
    ));
}

#[test]
#[serial]
fn failing_case_fails_the_run() {
    let config = HarnessConfig::new()
        .with_provider(ProviderConfig::new("docker").with_context("journal"));
    let mut fixture = fixture(&config);

    let report = fixture.runner.run(["provider/docker/up"]).unwrap();

    assert_eq!(report.failed(), 1);
    assert_eq!(report.exit_code(), ExitCode::FAILURE);
    assert_eq!(
        fixture.journal.entries(),
        [
            "provider/docker/up :: boots docker",
            "provider/docker/up :: uses image none",
            "failed",
        ]
    );
    let output = fixture.output.contents();
    assert!(output.contains("    uses image none ... FAILED\n"));
    assert!(output.contains(
        "---- provider/docker/up :: uses image none ----\nError: \"unexpected image None\"\n"
    ));
}

#[test]
#[serial]
fn components_survive_runs() {
    let mut fixture = fixture(&config());
    let components: Vec<String> = fixture
        .runner
        .components()
        .into_iter()
        .map(String::from)
        .collect();

    fixture.runner.run(["provider/docker/halt"]).unwrap();
    fixture.runner.run(["provider/virtualbox/up"]).unwrap();

    assert_eq!(fixture.runner.components(), components);
    let format = Regex::new(r"^provider/(virtualbox|docker)/(up|halt)$").unwrap();
    assert!(components.iter().all(|c| format.is_match(c)));
}

#[test]
#[serial]
fn active_registry_is_restored_after_run() {
    let outer = Registry::new();
    let guard = outer.activate().unwrap();

    let mut fixture = fixture(&config());
    fixture.runner.run(["provider/docker/up"]).unwrap();

    assert_eq!(registry::active().map(|active| active.id()), Some(outer.id()));
    guard.deactivate();
    assert!(registry::active().is_none());
}

#[test]
fn unknown_context_is_rejected_up_front() {
    let config = HarnessConfig::new()
        .with_provider(ProviderConfig::new("docker").with_context("snapshot"));
    let err = Runner::new(&config, &library(&Journal::default()), SimpleEngine::default())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown shared context \"snapshot\" requested by provider/docker/up"
    );
    assert!(matches!(err, HarnessError::UnknownContext { .. }));
}
