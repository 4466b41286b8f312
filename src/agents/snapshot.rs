use crate::agents::step::{Step, StepContext};
use crate::config::RunConfig;
use crate::error::{StepFailure, StepId, StepOutcome};
use jiff::Zoned;

pub const SNAPSHOT_TOOL: &str = "timeshift";

/// Characters that must never reach the snapshot tool's comment argument.
const FORBIDDEN_CHARS: &[char] = &[
    ';', '|', '&', '`', '$', '(', ')', '{', '}', '[', ']', '<', '>',
];

/// Replace a comment containing shell metacharacters with a fixed one.
///
/// The comment template comes from a translation file, so it is treated as
/// untrusted input.
pub fn sanitize_comment(candidate: &str, timestamp: &str) -> String {
    if candidate.contains(FORBIDDEN_CHARS) {
        tracing::warn!("snapshot comment rejected, using fallback");
        return format!("System update snapshot - {timestamp}");
    }
    candidate.to_string()
}

/// Timeshift restore point taken before anything is upgraded.
pub struct SnapshotStep;

impl Step for SnapshotStep {
    fn id(&self) -> StepId {
        StepId::Snapshot
    }

    fn enabled(&self, config: &RunConfig) -> bool {
        config.create_snapshot
    }

    fn execute(&self, ctx: &StepContext<'_>) -> StepOutcome {
        if !ctx.tools.exists(SNAPSHOT_TOOL) {
            ctx.warn("timeshift_missing");
            return Err(StepFailure::skipped(self.id()));
        }

        ctx.info("creating_snapshot");

        let timestamp = Zoned::now().strftime("%Y-%m-%d %H:%M").to_string();
        let candidate = ctx.catalog.format("before_update", &[&timestamp]);
        let comment = sanitize_comment(&candidate, &timestamp);

        match ctx.runner.run_elevated(
            SNAPSHOT_TOOL,
            &["--create", "--comments", &comment, "--scripted"],
        ) {
            Ok(_) => {
                ctx.success("snapshot_success");
                Ok(())
            }
            Err(err) => {
                ctx.warn("snapshot_failed");
                Err(StepFailure::advisory(self.id(), err))
            }
        }
    }
}
