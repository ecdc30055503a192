//! The acceptance runner.
//!
//! A [`Runner`] ties everything together: it owns a private [`Registry`] that
//! is filled once from the provider matrix, and every [`Runner::run`] call
//!
//! 1. activates that registry,
//! 2. selects the requested components, printing a notice per skipped one,
//! 3. hands the selection to the [`ExecutionEngine`],
//! 4. deactivates the registry again, no matter how the engine returned.
//!
//! Selection never prunes the registry itself, so runs with different
//! component sets can follow each other on the same runner and
//! [`Runner::components`] always lists every generated component.
//!
//! The active registry slot is process wide. Running two runners at the same
//! time from different threads is not supported.

use std::io;

use crate::{
    config::HarnessConfig,
    engine::{ExecutionEngine, RunOptions},
    error::{HarnessError, RunError},
    factory::GroupFactory,
    library::SharedLibrary,
    registry::Registry,
    selector::Selector,
};

#[derive(Debug)]
pub struct Runner<Engine, W = io::Stdout> {
    registry: Registry,
    engine: Engine,
    options: RunOptions,
    notice_target: W,
}

impl<Engine: ExecutionEngine> Runner<Engine> {
    /// Build the runner's registry from `config` and `library`.
    ///
    /// Fails if a provider asks for an unknown shared context, a feature has no
    /// behavior template or two groups end up with the same component.
    pub fn new(
        config: &HarnessConfig,
        library: &SharedLibrary,
        engine: Engine,
    ) -> Result<Self, HarnessError> {
        let mut registry = Registry::new();
        let groups = GroupFactory::new(library).build(&mut registry, config)?;
        log::debug!(
            "runner registry {} built with {groups} groups",
            registry.id()
        );

        Ok(Self {
            registry,
            engine,
            options: RunOptions::default(),
            notice_target: io::stdout(),
        })
    }
}

impl<Engine: ExecutionEngine, W: io::Write> Runner<Engine, W> {
    /// Write skip notices to `target` instead of stdout.
    pub fn with_notice_target<WithTarget: io::Write>(
        self,
        target: WithTarget,
    ) -> Runner<Engine, WithTarget> {
        Runner {
            registry: self.registry,
            engine: self.engine,
            options: self.options,
            notice_target: target,
        }
    }

    pub fn with_run_options(self, options: RunOptions) -> Self {
        Self { options, ..self }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Whether a run is in progress.
    pub fn is_running(&self) -> bool {
        self.registry.is_active()
    }

    /// Every component this runner generated, in generation order.
    pub fn components(&self) -> Vec<&str> {
        self.registry.components().collect()
    }

    /// Run the requested components.
    ///
    /// An empty request runs everything. Components that do not exist are
    /// silently ignored. The engine's report or error is returned as is.
    pub fn run<I>(&mut self, requested: I) -> Result<Engine::Report, RunError<Engine::Error>>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let guard = self.registry.activate()?;

        let selection = Selector::new(requested)
            .with_target(&mut self.notice_target)
            .select(self.registry.groups());
        if let Err(err) = self.notice_target.flush() {
            log::warn!("could not flush skip notices: {err}");
        }
        guard.publish(&selection.groups);
        log::debug!(
            "running {} groups, {} skipped",
            selection.groups.len(),
            selection.skipped.len()
        );

        let result = self.engine.run(&selection, &self.options);
        guard.deactivate();
        result.map_err(RunError::Engine)
    }

    /// Run every component.
    pub fn run_all(&mut self) -> Result<Engine::Report, RunError<Engine::Error>> {
        self.run(std::iter::empty::<String>())
    }
}
