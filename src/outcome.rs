use std::{borrow::Cow, time::Duration};

use crate::test::TestResult;

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct TestOutcome {
    pub status: TestStatus,
    pub duration: Duration,
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        self.status.passed()
    }

    pub fn ignored(&self) -> bool {
        self.status.ignored()
    }

    pub fn failed(&self) -> bool {
        self.status.failed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestStatus {
    Passed,
    Ignored { reason: Option<Cow<'static, str>> },
    Failed(TestFailure),
}

impl TestStatus {
    pub fn passed(&self) -> bool {
        matches!(self, TestStatus::Passed)
    }

    pub fn ignored(&self) -> bool {
        matches!(self, TestStatus::Ignored { .. })
    }

    pub fn failed(&self) -> bool {
        matches!(self, TestStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestFailure {
    /// The test returned an error.
    Error(String),
    /// The test panicked.
    Panicked(String),
}

impl TestFailure {
    pub fn message(&self) -> &str {
        match self {
            TestFailure::Error(msg) | TestFailure::Panicked(msg) => msg,
        }
    }
}

impl From<TestResult> for TestStatus {
    fn from(value: TestResult) -> Self {
        match value.0 {
            Ok(_) => TestStatus::Passed,
            Err(err) => TestStatus::Failed(TestFailure::Error(err)),
        }
    }
}
