use std::{
    any::Any,
    borrow::Cow,
    collections::HashMap,
    fmt::{self, Debug},
    io,
    panic::{AssertUnwindSafe, catch_unwind},
    time::Instant,
};

use thiserror::Error;

use crate::{
    engine::{ExecutionEngine, RunOptions},
    formatter::{
        FmtCaseOutcome, FmtErrors, FmtEvent, FmtGroupEnd, FmtGroupStart, FmtRunOutcomes,
        FmtRunStart, FormatError, FormatterId, TestFormatter, acceptance::AcceptanceFormatter,
        no::NoFormatter,
    },
    group::TestGroup,
    ignore::IgnoreStatus,
    outcome::{TestFailure, TestOutcome, TestStatus},
    report::{GroupOutcomes, TestReport},
    selector::Selection,
    test::TestCase,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("no formatter registered as {0:?}")]
    UnknownFormatter(FormatterId),
}

/// Runs selected groups sequentially on the calling thread.
///
/// Cases run in group order, every case wrapped in the `before_case` and
/// `after_case` hooks of the group's shared contexts. A panic in a case or in a
/// hook fails that case and the run carries on.
///
/// Formatter events are handed to a dedicated formatter thread so slow output
/// does not hold up the cases.
pub struct SimpleEngine {
    formatters: HashMap<FormatterId, Box<dyn TestFormatter>>,
}

impl Debug for SimpleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatters: Vec<_> = self.formatters.keys().map(|id| id.0.as_ref()).collect();
        formatters.sort_unstable();
        f.debug_struct("SimpleEngine")
            .field("formatters", &formatters)
            .finish()
    }
}

impl Default for SimpleEngine {
    fn default() -> Self {
        Self::new()
            .with_formatter(FormatterId::ACCEPTANCE, AcceptanceFormatter::default())
            .with_formatter(FormatterId::NONE, NoFormatter)
    }
}

impl SimpleEngine {
    /// An engine without any formatter registered.
    pub fn new() -> Self {
        Self {
            formatters: HashMap::new(),
        }
    }

    pub fn with_formatter(
        mut self,
        id: FormatterId,
        formatter: impl TestFormatter + 'static,
    ) -> Self {
        self.formatters.insert(id, Box::new(formatter));
        self
    }

    pub fn downcast_panic_err(err: Box<dyn Any + Send + 'static>) -> String {
        err.downcast::<&'static str>()
            .map(|s| s.to_string())
            .or_else(|err| err.downcast::<String>().map(|s| *s))
            .unwrap_or_else(|_| String::from("non-string panic payload"))
    }
}

impl ExecutionEngine for SimpleEngine {
    type Report = TestReport;
    type Error = EngineError;

    fn run(
        &mut self,
        selection: &Selection,
        options: &RunOptions,
    ) -> Result<TestReport, EngineError> {
        let now = Instant::now();
        let formatter = self
            .formatters
            .get_mut(&options.formatter)
            .ok_or_else(|| EngineError::UnknownFormatter(options.formatter.clone()))?;
        formatter.set_color_setting(options.color);

        if selection.tagged_len() == 0 && !selection.skipped.is_empty() {
            log::warn!("no requested component matched, running untagged groups only");
        }

        let mut fmt_errors: Vec<(FormatError, io::Error)> = Vec::new();
        fmt_errors.push_on_error(
            formatter
                .fmt_run_start(FmtRunStart {
                    groups: selection.groups.len(),
                    cases: selection.groups.iter().map(|g| g.case_count()).sum(),
                    skipped: selection.skipped.len(),
                })
                .map_err(|err| (FormatError::RunStart, err)),
        );

        let (groups, formatter, mut fmt_errors) = std::thread::scope(move |scope| {
            let (ftx, frx) = crossbeam_channel::bounded::<FmtEvent>(16);
            let fmt_thread = scope.spawn(move || {
                while let Ok(event) = frx.recv() {
                    fmt_errors.push_on_error(event.dispatch(&mut **formatter));
                }
                (formatter, fmt_errors)
            });

            let groups: Vec<_> = selection
                .groups
                .iter()
                .map(|group| run_group(group, &ftx))
                .collect();

            drop(ftx);
            let (formatter, fmt_errors) = fmt_thread
                .join()
                .expect("format thread should join without issues");

            (groups, formatter, fmt_errors)
        });

        let duration = now.elapsed();
        fmt_errors.push_on_error(
            formatter
                .fmt_run_outcomes(FmtRunOutcomes {
                    groups: &groups,
                    skipped: selection.skipped.len(),
                    duration,
                })
                .map_err(|err| (FormatError::RunOutcomes, err)),
        );

        Ok(TestReport {
            groups,
            skipped: selection.skipped_components().map(String::from).collect(),
            duration,
            fmt_errors,
        })
    }
}

fn run_group(group: &TestGroup, ftx: &crossbeam_channel::Sender<FmtEvent>) -> GroupOutcomes {
    // A gone formatter thread only means output is lost, the run goes on.
    let _ = ftx.send(FmtEvent::GroupStart(FmtGroupStart {
        name: group.name.clone(),
        component: group.component().map(String::from),
        cases: group.case_count(),
    }));

    let mut outcomes = Vec::with_capacity(group.case_count());
    for case in group.cases() {
        let now = Instant::now();
        let status = run_case(group, case);
        let outcome = TestOutcome {
            status,
            duration: now.elapsed(),
        };
        let _ = ftx.send(FmtEvent::CaseOutcome(FmtCaseOutcome {
            group: group.name.clone(),
            name: case.name.clone(),
            outcome: outcome.clone(),
        }));
        outcomes.push((case.name.clone(), outcome));
    }

    let outcomes = GroupOutcomes {
        group: group.name.clone(),
        component: group.component().map(String::from),
        outcomes,
    };
    let _ = ftx.send(FmtEvent::GroupEnd(FmtGroupEnd {
        name: group.name.clone(),
        failed: outcomes.failed(),
    }));
    outcomes
}

fn run_case(group: &TestGroup, case: &TestCase) -> TestStatus {
    match &case.ignore {
        IgnoreStatus::Run => (),
        IgnoreStatus::Ignore => return TestStatus::Ignored { reason: None },
        IgnoreStatus::IgnoreWithReason(reason) => {
            return TestStatus::Ignored {
                reason: Some(Cow::clone(reason)),
            };
        }
    }

    let mut status = catch_unwind(AssertUnwindSafe(|| {
        for context in &group.contexts {
            context.provider().before_case(group, &case.meta);
        }
        case.call()
    }))
    .map(TestStatus::from)
    .unwrap_or_else(|err| {
        TestStatus::Failed(TestFailure::Panicked(SimpleEngine::downcast_panic_err(err)))
    });

    for context in group.contexts.iter().rev() {
        let after = catch_unwind(AssertUnwindSafe(|| {
            context.provider().after_case(group, &case.meta, &status)
        }));
        if let Err(err) = after {
            let msg = SimpleEngine::downcast_panic_err(err);
            log::warn!(
                "shared context {} panicked after {} :: {}: {msg}",
                context.name(),
                group.name,
                case.name
            );
            if !status.failed() {
                status = TestStatus::Failed(TestFailure::Panicked(msg));
            }
        }
    }

    status
}
