//! The formatter the acceptance runner selects by default.
//!
//! Output is grouped by component:
//!
//! ```text
//! running 2 groups (2 skipped)
//!
//! provider/docker/up
//!     boots ... ok
//!     answers ssh ... FAILED
//!
//! failures:
//!
//! ---- provider/docker/up :: answers ssh ----
//! Error: "connection refused"
//!
//! test result: FAILED. 1 passed; 1 failed; 0 ignored; 2 skipped; finished in 0.01s
//! ```

use std::io;

use crate::{
    formatter::{
        color::{ColorSetting, SupportsColor, paint, palette::*},
        *,
    },
    outcome::{TestFailure, TestStatus},
};

#[derive(Debug)]
pub struct AcceptanceFormatter<W: io::Write> {
    target: W,
    color_setting: ColorSetting,
}

impl Default for AcceptanceFormatter<io::Stdout> {
    fn default() -> Self {
        Self {
            target: io::stdout(),
            color_setting: Default::default(),
        }
    }
}

impl<W: io::Write> AcceptanceFormatter<W> {
    pub fn with_target<WithTarget: io::Write>(
        self,
        with_target: WithTarget,
    ) -> AcceptanceFormatter<WithTarget> {
        AcceptanceFormatter {
            target: with_target,
            color_setting: self.color_setting,
        }
    }

    pub fn with_color_setting(self, color_setting: impl Into<ColorSetting>) -> Self {
        AcceptanceFormatter {
            color_setting: color_setting.into(),
            ..self
        }
    }
}

impl<W: io::Write + SupportsColor> AcceptanceFormatter<W> {
    /// Return whether this formatter will currently emit colored output.
    pub fn use_color(&self) -> bool {
        self.color_setting.resolve(&self.target)
    }

    fn paint(&mut self, color: &str, text: &str) -> io::Result<()> {
        let use_color = self.use_color();
        paint(&mut self.target, use_color, color, text)
    }

    fn paint_skipped(&mut self, skipped: usize) -> io::Result<()> {
        let text = format!("{skipped} skipped");
        match skipped {
            0 => write!(self.target, "{text}"),
            _ => self.paint(SKIPPED, &text),
        }
    }
}

impl<W: io::Write + SupportsColor + Send> TestFormatter for AcceptanceFormatter<W> {
    fn set_color_setting(&mut self, color: ColorSetting) {
        self.color_setting = color;
    }

    fn fmt_run_start(&mut self, data: FmtRunStart) -> io::Result<()> {
        match data.groups {
            1 => write!(self.target, "\nrunning 1 group")?,
            count => write!(self.target, "\nrunning {count} groups")?,
        }
        if data.skipped > 0 {
            write!(self.target, " (")?;
            self.paint_skipped(data.skipped)?;
            write!(self.target, ")")?;
        }
        writeln!(self.target)
    }

    fn fmt_group_start(&mut self, data: FmtGroupStart) -> io::Result<()> {
        writeln!(self.target)?;
        self.paint(COMPONENT, &data.name)?;
        writeln!(self.target)
    }

    fn fmt_case_outcome(&mut self, data: FmtCaseOutcome) -> io::Result<()> {
        write!(self.target, "    {} ... ", data.name)?;
        match &data.outcome.status {
            TestStatus::Passed => self.paint(PASSED, "ok")?,
            TestStatus::Ignored { reason: None } => self.paint(IGNORED, "ignored")?,
            TestStatus::Ignored {
                reason: Some(reason),
            } => {
                self.paint(IGNORED, "ignored")?;
                write!(self.target, ", {reason}")?;
            }
            TestStatus::Failed(_) => self.paint(FAILED, "FAILED")?,
        }
        writeln!(self.target)
    }

    fn fmt_run_outcomes(&mut self, data: FmtRunOutcomes<'_>) -> io::Result<()> {
        let failures: Vec<_> = data
            .groups
            .iter()
            .flat_map(|group| {
                group.outcomes.iter().filter_map(move |(name, outcome)| {
                    let TestStatus::Failed(failure) = &outcome.status else {
                        return None;
                    };
                    Some((&group.group, name, failure))
                })
            })
            .collect();

        if !failures.is_empty() {
            writeln!(self.target)?;
            writeln!(self.target, "failures:")?;
            for (group, name, failure) in failures.iter() {
                writeln!(self.target)?;
                writeln!(self.target, "---- {group} :: {name} ----")?;
                match failure {
                    TestFailure::Error(err) => writeln!(self.target, "Error: {err}")?,
                    TestFailure::Panicked(msg) => writeln!(self.target, "panicked: {msg}")?,
                }
            }
        }

        let passed = data
            .groups
            .iter()
            .flat_map(|g| g.outcomes.iter())
            .filter(|(_, o)| o.passed())
            .count();
        let ignored = data
            .groups
            .iter()
            .flat_map(|g| g.outcomes.iter())
            .filter(|(_, o)| o.ignored())
            .count();
        let failed = failures.len();

        writeln!(self.target)?;
        write!(self.target, "test result: ")?;
        match failed {
            0 => self.paint(PASSED, "ok")?,
            _ => self.paint(FAILED, "FAILED")?,
        }
        write!(
            self.target,
            ". {passed} passed; {failed} failed; {ignored} ignored; "
        )?;
        self.paint_skipped(data.skipped)?;
        writeln!(
            self.target,
            "; finished in {:.2}s",
            data.duration.as_secs_f64()
        )
    }
}
