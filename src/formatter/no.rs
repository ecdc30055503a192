use crate::formatter::TestFormatter;

/// A formatter that produces no output.
///
/// Useful when the caller only cares about the returned
/// [`TestReport`](crate::report::TestReport), for example when the harness is
/// embedded into another system that does its own reporting.
#[derive(Debug, Default, Clone)]
pub struct NoFormatter;

impl TestFormatter for NoFormatter {}
