use crate::agents::step::{Step, StepContext};
use crate::config::RunConfig;
use crate::error::{StepFailure, StepId, StepOutcome, UubuError};
use std::fs;
use std::path::{Path, PathBuf};

pub const REBOOT_MARKER: &str = "/var/run/reboot-required";
pub const REBOOT_PACKAGES: &str = "/var/run/reboot-required.pkgs";

/// Looks for the reboot-required marker and offers to reboot.
pub struct RebootCheckStep {
    marker: PathBuf,
    packages: PathBuf,
}

impl Default for RebootCheckStep {
    fn default() -> Self {
        Self::new(REBOOT_MARKER, REBOOT_PACKAGES)
    }
}

impl RebootCheckStep {
    pub fn new<P: AsRef<Path>>(marker: P, packages: P) -> Self {
        Self {
            marker: marker.as_ref().to_path_buf(),
            packages: packages.as_ref().to_path_buf(),
        }
    }
}

/// True when the trimmed, lowercased answer is one of `accepted`.
pub fn is_affirmative(answer: &str, accepted: &[String]) -> bool {
    let answer = answer.trim().to_lowercase();
    accepted.iter().any(|yes| *yes == answer)
}

impl Step for RebootCheckStep {
    fn id(&self) -> StepId {
        StepId::RebootCheck
    }

    fn enabled(&self, config: &RunConfig) -> bool {
        config.check_reboot_needed
    }

    fn execute(&self, ctx: &StepContext<'_>) -> StepOutcome {
        if !self.marker.exists() {
            ctx.success("no_reboot");
            return Ok(());
        }

        ctx.warn("reboot_required");
        ctx.warn("reboot_message");

        if let Ok(packages) = fs::read_to_string(&self.packages) {
            ctx.info("affected_packages");
            ctx.console.raw(&packages);
        }

        let answer = ctx
            .console
            .prompt(&ctx.catalog.message("reboot_prompt"))
            .map_err(|e| StepFailure::advisory(self.id(), UubuError::Io(e)))?;

        if is_affirmative(&answer, &ctx.catalog.yes_answers()) {
            ctx.info("rebooting");
            ctx.runner
                .run_elevated("reboot", &[])
                .map_err(|err| StepFailure::advisory(self.id(), err))?;
            return Ok(());
        }

        ctx.warn("reboot_later");
        Ok(())
    }
}
