use crate::agents::{
    NetworkCheck, PackageUpdateStep, PrivilegeCheck, Reachability, RebootCheckStep, SnapshotStep,
    Step, StepContext, StoreRefreshStep,
};
use crate::error::{Result, Severity, StepFailure, StepId, UubuError};
use jiff::Zoned;

const BANNER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fixed, linear sequence of update steps.
///
/// Fatal failures stop the run; advisory ones are reported and the next step
/// runs anyway.
pub struct Workflow {
    steps: Vec<Box<dyn Step>>,
}

impl Workflow {
    pub fn new(steps: Vec<Box<dyn Step>>) -> Self {
        Self { steps }
    }

    /// privilege → network → snapshot → packages → snap → flatpak → reboot
    pub fn standard(
        privilege: PrivilegeCheck,
        probe: Box<dyn Reachability>,
        reboot: RebootCheckStep,
    ) -> Self {
        Self::new(vec![
            Box::new(privilege),
            Box::new(NetworkCheck::new(probe)),
            Box::new(SnapshotStep),
            Box::new(PackageUpdateStep),
            Box::new(StoreRefreshStep::snap()),
            Box::new(StoreRefreshStep::flatpak()),
            Box::new(reboot),
        ])
    }

    pub fn run(&self, ctx: &StepContext<'_>) -> Result<()> {
        ctx.success("app_title");
        ctx.console.info(&ctx.catalog.format("start_time", &[&now()]));
        ctx.console.blank();

        for step in &self.steps {
            if !step.enabled(ctx.config) {
                tracing::debug!("step '{}' disabled by configuration", step.id());
                continue;
            }

            tracing::debug!("step '{}' starting", step.id());
            if let Err(failure) = step.execute(ctx) {
                Self::handle_failure(ctx, failure)?;
            }

            if is_separated(step.id()) {
                ctx.console.blank();
            }
        }

        ctx.success("app_finished");
        ctx.console.info(&ctx.catalog.format("end_time", &[&now()]));
        Ok(())
    }

    fn handle_failure(ctx: &StepContext<'_>, failure: StepFailure) -> Result<()> {
        let step = failure.step;
        if let Some(UubuError::Command { command, output, .. }) = &failure.cause {
            tracing::debug!("output of `{command}`:\n{output}");
        }

        match failure.severity {
            Severity::Fatal => {
                if let Some(key) = failure_message_key(step) {
                    ctx.console.error(&ctx.catalog.format(key, &[&failure.cause_text()]));
                }
                Err(UubuError::Aborted {
                    step,
                    source: Box::new(failure),
                })
            }
            Severity::Advisory => {
                let text = failure.cause_text();
                match failure_message_key(step) {
                    Some(key) => ctx.console.warn(&ctx.catalog.format(key, &[&text])),
                    None => ctx.console.warn(&text),
                }
                Ok(())
            }
            Severity::Informational => {
                tracing::debug!("step '{step}' skipped");
                Ok(())
            }
        }
    }
}

/// Catalog key used to report a failed step, when it has one.
fn failure_message_key(step: StepId) -> Option<&'static str> {
    match step {
        StepId::Snapshot => Some("error_snapshot"),
        StepId::PackageUpdate => Some("error_update"),
        StepId::Snap => Some("error_snap"),
        StepId::Flatpak => Some("error_flatpak"),
        StepId::RebootCheck => Some("error_reboot"),
        // The preflight checks print their own localized explanation.
        StepId::Privilege | StepId::Network => None,
    }
}

/// Steps followed by an empty line in the output.
fn is_separated(step: StepId) -> bool {
    matches!(
        step,
        StepId::Snapshot | StepId::PackageUpdate | StepId::Snap | StepId::Flatpak
    )
}

fn now() -> String {
    Zoned::now().strftime(BANNER_TIME_FORMAT).to_string()
}
