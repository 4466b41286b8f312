use crate::agents::command_runner::CommandRunner;
use crate::agents::tool_locator::ToolLocator;
use crate::config::RunConfig;
use crate::error::{StepId, StepOutcome};
use crate::utils::catalog::Catalog;
use crate::utils::console::Console;

/// Read-only collaborators shared by every step of a run.
pub struct StepContext<'a> {
    pub config: &'a RunConfig,
    pub catalog: &'a Catalog,
    pub console: &'a Console,
    pub runner: &'a dyn CommandRunner,
    pub tools: &'a dyn ToolLocator,
}

impl StepContext<'_> {
    pub fn info(&self, key: &str) {
        self.console.info(&self.catalog.message(key));
    }

    pub fn success(&self, key: &str) {
        self.console.success(&self.catalog.message(key));
    }

    pub fn warn(&self, key: &str) {
        self.console.warn(&self.catalog.message(key));
    }

    pub fn error(&self, key: &str) {
        self.console.error(&self.catalog.message(key));
    }
}

/// One stage of the update pipeline.
pub trait Step {
    fn id(&self) -> StepId;

    /// Whether the run configuration asks for this step at all.
    fn enabled(&self, _config: &RunConfig) -> bool {
        true
    }

    fn execute(&self, ctx: &StepContext<'_>) -> StepOutcome;
}
