//! Test doubles for the pipeline seams.

use crate::agents::command_runner::{CommandRunner, command_line};
use crate::agents::preflight::Reachability;
use crate::agents::step::StepContext;
use crate::agents::tool_locator::ToolLocator;
use crate::config::RunConfig;
use crate::error::{Result, UubuError};
use crate::utils::catalog::Catalog;
use crate::utils::console::Console;
use crate::utils::console::capture::{SharedBuffer, console_with_input};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Records every command line and answers from a script.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<String>>,
    outputs: HashMap<String, String>,
    failures: HashSet<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, line: &str, output: &str) -> Self {
        self.outputs.insert(line.to_string(), output.to_string());
        self
    }

    /// Fail every command line starting with `prefix`.
    pub fn failing(mut self, prefix: &str) -> Self {
        self.failures.insert(prefix.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, line: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == line).count()
    }

    pub fn ran(&self, line: &str) -> bool {
        self.count(line) > 0
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let line = command_line(program, args);
        self.calls.borrow_mut().push(line.clone());

        let output = self.outputs.get(&line).cloned().unwrap_or_default();
        if self.failures.iter().any(|prefix| line.starts_with(prefix.as_str())) {
            return Err(UubuError::Command {
                command: line,
                reason: "exit status: 1".to_string(),
                output,
            });
        }
        Ok(output)
    }
}

/// Pretends exactly the listed programs are installed.
#[derive(Default)]
pub struct FakeTools(HashSet<String>);

impl FakeTools {
    pub fn with(programs: &[&str]) -> Self {
        Self(programs.iter().map(|p| p.to_string()).collect())
    }
}

impl ToolLocator for FakeTools {
    fn exists(&self, program: &str) -> bool {
        self.0.contains(program)
    }
}

/// Owns everything a [`StepContext`] borrows.
pub struct Harness {
    pub config: RunConfig,
    pub catalog: Catalog,
    pub console: Console,
    pub output: SharedBuffer,
    pub runner: RecordingRunner,
    pub tools: FakeTools,
}

impl Harness {
    pub fn new(runner: RecordingRunner, tools: FakeTools) -> Self {
        Self::with_input(runner, tools, "")
    }

    pub fn with_input(runner: RecordingRunner, tools: FakeTools, input: &str) -> Self {
        let (console, output) = console_with_input(input);
        Self {
            config: RunConfig::default(),
            catalog: Catalog::load("en").expect("english catalog"),
            console,
            output,
            runner,
            tools,
        }
    }

    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    pub fn ctx(&self) -> StepContext<'_> {
        StepContext {
            config: &self.config,
            catalog: &self.catalog,
            console: &self.console,
            runner: &self.runner,
            tools: &self.tools,
        }
    }

    pub fn printed(&self) -> String {
        self.output.contents()
    }
}

/// Network probe with a fixed answer.
pub struct ScriptedProbe(Option<String>);

impl ScriptedProbe {
    pub fn reachable() -> Self {
        Self(None)
    }

    pub fn unreachable(reason: &str) -> Self {
        Self(Some(reason.to_string()))
    }
}

impl Reachability for ScriptedProbe {
    fn probe(&self) -> Result<()> {
        match &self.0 {
            None => Ok(()),
            Some(reason) => Err(UubuError::Network(reason.clone())),
        }
    }
}
