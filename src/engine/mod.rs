//! Execution engines.
//!
//! The harness does not run tests itself. Once a selection is made, it is
//! handed to an [`ExecutionEngine`] together with the presentation
//! [`RunOptions`], and whatever report the engine produces is passed back to
//! the caller untouched.
//!
//! [`SimpleEngine`] is the engine shipped with the crate. It runs groups one
//! after another on the calling thread.

use crate::{
    formatter::{FormatterId, color::ColorSetting},
    selector::Selection,
};

mod simple;
pub use simple::*;

/// Presentation options handed to the engine for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub color: ColorSetting,
    pub formatter: FormatterId,
}

impl Default for RunOptions {
    /// Colored output through the acceptance formatter.
    fn default() -> Self {
        Self {
            color: ColorSetting::Always,
            formatter: FormatterId::ACCEPTANCE,
        }
    }
}

impl RunOptions {
    pub fn with_color(self, color: impl Into<ColorSetting>) -> Self {
        Self {
            color: color.into(),
            ..self
        }
    }

    pub fn with_formatter(self, formatter: FormatterId) -> Self {
        Self { formatter, ..self }
    }
}

/// Something that can execute a [`Selection`].
///
/// `run` is blocking, it returns only once every selected group finished.
/// Engines may read the process wide
/// [active registry](crate::registry::active) while running, the runner keeps
/// it pointed at the selection for the duration of the call.
pub trait ExecutionEngine {
    type Report;
    type Error;

    fn run(
        &mut self,
        selection: &Selection,
        options: &RunOptions,
    ) -> Result<Self::Report, Self::Error>;
}

impl<E: ExecutionEngine + ?Sized> ExecutionEngine for &mut E {
    type Report = E::Report;
    type Error = E::Error;

    fn run(
        &mut self,
        selection: &Selection,
        options: &RunOptions,
    ) -> Result<Self::Report, Self::Error> {
        (**self).run(selection, options)
    }
}
