use std::{borrow::Cow, io, process::ExitCode, time::Duration};

use crate::{formatter::FormatError, outcome::TestOutcome};

pub type TestOutcomes = Vec<(Cow<'static, str>, TestOutcome)>;

/// Outcomes of all cases of one group, in execution order.
#[derive(Debug, Clone)]
pub struct GroupOutcomes {
    pub group: Cow<'static, str>,
    pub component: Option<String>,
    pub outcomes: TestOutcomes,
}

impl GroupOutcomes {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.failed()).count()
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub struct TestReport {
    pub groups: Vec<GroupOutcomes>,
    /// Components that were not part of the run.
    pub skipped: Vec<String>,
    pub duration: Duration,
    pub fmt_errors: Vec<(FormatError, io::Error)>,
}

impl TestReport {
    pub fn outcomes(&self) -> impl Iterator<Item = &(Cow<'static, str>, TestOutcome)> {
        self.groups.iter().flat_map(|group| group.outcomes.iter())
    }

    pub fn passed(&self) -> usize {
        self.outcomes().filter(|(_, o)| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes().filter(|(_, o)| o.failed()).count()
    }

    pub fn ignored(&self) -> usize {
        self.outcomes().filter(|(_, o)| o.ignored()).count()
    }

    /// Whether no executed case failed.
    ///
    /// A run without any case counts as a success.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn exit_code(&self) -> ExitCode {
        match self.is_success() {
            true => ExitCode::SUCCESS,
            false => ExitCode::FAILURE,
        }
    }
}
