use crate::agents::step::{Step, StepContext};
use crate::config::RunConfig;
use crate::error::{StepFailure, StepId, StepOutcome};

/// Catalog keys a store refresh reports with.
struct StoreMessages {
    missing: &'static str,
    progress: &'static str,
    failed: &'static str,
    done: &'static str,
}

/// Refresh of a secondary packaging system (Snap, Flatpak), skipped when its
/// tool is not installed.
pub struct StoreRefreshStep {
    id: StepId,
    program: &'static str,
    args: &'static [&'static str],
    elevated: bool,
    messages: StoreMessages,
}

impl StoreRefreshStep {
    pub fn snap() -> Self {
        Self {
            id: StepId::Snap,
            program: "snap",
            args: &["refresh"],
            elevated: true,
            messages: StoreMessages {
                missing: "snap_missing",
                progress: "updating_snap",
                failed: "snap_error",
                done: "snap_updated",
            },
        }
    }

    pub fn flatpak() -> Self {
        Self {
            id: StepId::Flatpak,
            program: "flatpak",
            args: &["update", "-y"],
            elevated: false,
            messages: StoreMessages {
                missing: "flatpak_missing",
                progress: "updating_flatpak",
                failed: "flatpak_error",
                done: "flatpak_updated",
            },
        }
    }
}

impl Step for StoreRefreshStep {
    fn id(&self) -> StepId {
        self.id
    }

    fn enabled(&self, config: &RunConfig) -> bool {
        match self.id {
            StepId::Snap => config.update_snap,
            StepId::Flatpak => config.update_flatpak,
            _ => true,
        }
    }

    fn execute(&self, ctx: &StepContext<'_>) -> StepOutcome {
        if !ctx.tools.exists(self.program) {
            ctx.warn(self.messages.missing);
            return Err(StepFailure::skipped(self.id));
        }

        ctx.info(self.messages.progress);
        let result = if self.elevated {
            ctx.runner.run_elevated(self.program, self.args)
        } else {
            ctx.runner.run(self.program, self.args)
        };

        match result {
            Ok(_) => {
                ctx.success(self.messages.done);
                Ok(())
            }
            Err(err) => {
                ctx.warn(self.messages.failed);
                Err(StepFailure::advisory(self.id, err))
            }
        }
    }
}
