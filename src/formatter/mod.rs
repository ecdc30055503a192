//! Formatting of harness runs.
//!
//! The execution engine reports progress as a sequence of events, a
//! [`TestFormatter`] turns those events into output. Formatters are picked by
//! [`FormatterId`], which is what the runner passes to the engine.
//!
//! Formatting errors never abort a run. They are collected together with the
//! [`FormatError`] naming the event that failed and end up in the
//! [`TestReport`](crate::report::TestReport).

use std::{borrow::Cow, fmt, io, time::Duration};

use crate::{outcome::TestOutcome, report::GroupOutcomes};

pub mod acceptance;
pub mod color;
pub mod no;

use color::ColorSetting;

/// Name of a formatter known to an execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatterId(pub Cow<'static, str>);

impl FormatterId {
    /// The acceptance formatter, see [`acceptance::AcceptanceFormatter`].
    pub const ACCEPTANCE: Self = Self(Cow::Borrowed("acceptance"));

    /// The silent formatter, see [`no::NoFormatter`].
    pub const NONE: Self = Self(Cow::Borrowed("none"));

    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for FormatterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmtRunStart {
    pub groups: usize,
    pub cases: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmtGroupStart {
    pub name: Cow<'static, str>,
    pub component: Option<String>,
    pub cases: usize,
}

#[derive(Debug, Clone)]
pub struct FmtCaseOutcome {
    pub group: Cow<'static, str>,
    pub name: Cow<'static, str>,
    pub outcome: TestOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmtGroupEnd {
    pub name: Cow<'static, str>,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct FmtRunOutcomes<'o> {
    pub groups: &'o [GroupOutcomes],
    pub skipped: usize,
    pub duration: Duration,
}

/// Which formatter call produced a formatting error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    RunStart,
    GroupStart,
    CaseOutcome,
    GroupEnd,
    RunOutcomes,
}

/// Receives the events of a harness run.
///
/// Every method defaults to doing nothing, implement the ones you care about.
pub trait TestFormatter: Send {
    /// Called once before the run with the presentation options of the run.
    fn set_color_setting(&mut self, color: ColorSetting) {
        let _ = color;
    }

    fn fmt_run_start(&mut self, data: FmtRunStart) -> io::Result<()> {
        let _ = data;
        Ok(())
    }

    fn fmt_group_start(&mut self, data: FmtGroupStart) -> io::Result<()> {
        let _ = data;
        Ok(())
    }

    fn fmt_case_outcome(&mut self, data: FmtCaseOutcome) -> io::Result<()> {
        let _ = data;
        Ok(())
    }

    fn fmt_group_end(&mut self, data: FmtGroupEnd) -> io::Result<()> {
        let _ = data;
        Ok(())
    }

    fn fmt_run_outcomes(&mut self, data: FmtRunOutcomes<'_>) -> io::Result<()> {
        let _ = data;
        Ok(())
    }
}

/// Events streamed from the engine to the formatter thread.
#[derive(Debug)]
pub(crate) enum FmtEvent {
    GroupStart(FmtGroupStart),
    CaseOutcome(FmtCaseOutcome),
    GroupEnd(FmtGroupEnd),
}

impl FmtEvent {
    pub(crate) fn dispatch(
        self,
        formatter: &mut dyn TestFormatter,
    ) -> Result<(), (FormatError, io::Error)> {
        match self {
            FmtEvent::GroupStart(data) => formatter
                .fmt_group_start(data)
                .map_err(|err| (FormatError::GroupStart, err)),
            FmtEvent::CaseOutcome(data) => formatter
                .fmt_case_outcome(data)
                .map_err(|err| (FormatError::CaseOutcome, err)),
            FmtEvent::GroupEnd(data) => formatter
                .fmt_group_end(data)
                .map_err(|err| (FormatError::GroupEnd, err)),
        }
    }
}

pub(crate) trait FmtErrors {
    fn push_on_error(&mut self, res: Result<(), (FormatError, io::Error)>);
}

impl FmtErrors for Vec<(FormatError, io::Error)> {
    fn push_on_error(&mut self, res: Result<(), (FormatError, io::Error)>) {
        if let Err(err) = res {
            log::warn!("formatter failed on {:?}: {}", err.0, err.1);
            self.push(err);
        }
    }
}
