//! Colored output of the acceptance formatter.

use std::io;

/// When to emit ANSI colors.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum ColorSetting {
    /// Color only if the target is a terminal.
    #[default]
    Automatic,
    Always,
    Never,
}

impl ColorSetting {
    /// Decide for a concrete target.
    pub fn resolve(self, target: &impl SupportsColor) -> bool {
        match self {
            ColorSetting::Automatic => target.supports_color(),
            ColorSetting::Always => true,
            ColorSetting::Never => false,
        }
    }
}

impl From<bool> for ColorSetting {
    fn from(value: bool) -> Self {
        match value {
            true => Self::Always,
            false => Self::Never,
        }
    }
}

/// ANSI colors by what they mark in a run.
pub(crate) mod palette {
    pub const RESET: &str = "\x1b[0m";
    pub const PASSED: &str = "\x1b[32m";
    pub const FAILED: &str = "\x1b[31m";
    pub const IGNORED: &str = "\x1b[33m";
    pub const SKIPPED: &str = "\x1b[35m";
    pub const COMPONENT: &str = "\x1b[1;36m";
}

/// Write `text`, wrapped in `color` if `use_color` is set.
pub(crate) fn paint(
    target: &mut impl io::Write,
    use_color: bool,
    color: &str,
    text: &str,
) -> io::Result<()> {
    match use_color {
        true => write!(target, "{color}{text}{}", palette::RESET),
        false => write!(target, "{text}"),
    }
}

pub trait SupportsColor {
    fn supports_color(&self) -> bool;
}

impl<T: io::IsTerminal> SupportsColor for T {
    fn supports_color(&self) -> bool {
        self.is_terminal()
    }
}
