use crate::agents::step::{Step, StepContext};
use crate::error::{StepFailure, StepId, StepOutcome};

const APT: &str = "apt";

/// Banners apt prints ahead of the package list, in the locales we have met.
const LISTING_BANNERS: &[&str] = &["Listing", "En train de lister"];

/// Notice apt writes to stderr whenever stdout is not a terminal.
const APT_CLI_WARNING: &str = "WARNING: apt does not have a stable CLI interface";

/// Extract package lines from `apt list --upgradable` output.
///
/// The first line is the listing banner; blank lines are dropped. apt's
/// scripting warning and a banner it pushed down are dropped wherever they
/// land on the combined stream.
pub fn parse_upgradable(output: &str) -> Vec<String> {
    output
        .trim()
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with(APT_CLI_WARNING))
        .filter(|line| !LISTING_BANNERS.iter().any(|banner| line.contains(banner)))
        .map(str::to_string)
        .collect()
}

/// The mandatory apt pass: refresh, list, upgrade, autoremove, autoclean.
pub struct PackageUpdateStep;

impl PackageUpdateStep {
    /// Runs an apt sub-step whose failure only deserves a warning.
    fn run_advisory(ctx: &StepContext<'_>, progress_key: &str, error_key: &str, args: &[&str]) {
        ctx.info(progress_key);
        if let Err(err) = ctx.runner.run_elevated(APT, args) {
            tracing::debug!("{err}");
            ctx.warn(error_key);
        }
    }
}

impl Step for PackageUpdateStep {
    fn id(&self) -> StepId {
        StepId::PackageUpdate
    }

    fn execute(&self, ctx: &StepContext<'_>) -> StepOutcome {
        ctx.info("update_start");

        ctx.info("update_packages");
        ctx.runner.run_elevated(APT, &["update"]).map_err(|err| {
            ctx.error("update_error");
            StepFailure::fatal(self.id(), err)
        })?;

        let listing = ctx
            .runner
            .run(APT, &["list", "--upgradable"])
            .map_err(|err| {
                ctx.error("check_packages");
                StepFailure::fatal(self.id(), err)
            })?;

        let upgradable = parse_upgradable(&listing);
        if upgradable.is_empty() {
            ctx.success("no_packages");
            return Ok(());
        }

        ctx.console.warn(&ctx.catalog.format("packages_count", &[&upgradable.len()]));
        ctx.info("packages_list");
        for line in &upgradable {
            ctx.console.line(line);
        }
        ctx.console.blank();

        if ctx.config.distribution_upgrade {
            Self::run_advisory(ctx, "dist_upgrade", "upgrade_error", &["dist-upgrade", "-y"]);
        } else {
            Self::run_advisory(ctx, "upgrade", "upgrade_error", &["upgrade", "-y"]);
        }
        Self::run_advisory(ctx, "removing_obsolete", "autoremove_error", &["autoremove", "-y"]);
        Self::run_advisory(ctx, "cleaning_cache", "autoclean_error", &["autoclean"]);

        ctx.success("update_finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::command_runner::{CommandRunner, SystemRunner};
    use crate::agents::testing::{FakeTools, Harness, RecordingRunner};
    use crate::config::RunConfig;
    use crate::error::Severity;

    const LISTING: &str = "Listing... Done
firefox/noble-updates,noble-security 130.0.1+build1-0ubuntu1 amd64 [upgradable from: 129.0.2+build1-0ubuntu1]
libreoffice-core/noble-updates 1:24.2.5-0ubuntu0.24.04.1 amd64 [upgradable from: 1:24.2.4-0ubuntu0.24.04.1]
";

    fn runner_with_listing(listing: &str) -> RecordingRunner {
        RecordingRunner::new().with_output("apt list --upgradable", listing)
    }

    #[test]
    fn parse_drops_header() {
        let packages = parse_upgradable(LISTING);
        assert_eq!(packages.len(), 2);
        assert!(packages[0].starts_with("firefox/"));
    }

    #[test]
    fn parse_drops_whitespace_lines() {
        let output = "Listing... Done\n   \npkg-a/noble 1.0 amd64\n\t\npkg-b/noble 2.0 amd64\n";
        assert_eq!(
            parse_upgradable(output),
            vec!["pkg-a/noble 1.0 amd64", "pkg-b/noble 2.0 amd64"]
        );
    }

    #[test]
    fn parse_header_only_is_empty() {
        assert!(parse_upgradable("Listing... Done\n").is_empty());
        assert!(parse_upgradable("").is_empty());
    }

    #[test]
    fn parse_skips_banner_after_apt_warning() {
        let output = "\nWARNING: apt does not have a stable CLI interface. Use with caution in scripts.\n\nEn train de lister… Fait\nvim/noble 2:9.1 amd64\n";
        assert_eq!(parse_upgradable(output), vec!["vim/noble 2:9.1 amd64"]);
    }

    #[test]
    fn parse_drops_apt_warning_after_banner() {
        let output = "Listing... Done\n\nWARNING: apt does not have a stable CLI interface. Use with caution in scripts.\n\n";
        assert!(parse_upgradable(output).is_empty());
    }

    #[test]
    fn real_runner_output_with_warning_has_no_packages() {
        let script = "echo 'Listing... Done'; echo >&2; \
            echo 'WARNING: apt does not have a stable CLI interface. Use with caution in scripts.' >&2; \
            echo >&2";
        let output = SystemRunner::new().run("sh", &["-c", script]).unwrap();
        assert!(parse_upgradable(&output).is_empty(), "parsed from {output:?}");
    }

    #[test]
    fn nothing_to_update_skips_upgrade() {
        let h = Harness::new(runner_with_listing("Listing... Done\n"), FakeTools::default());
        PackageUpdateStep.execute(&h.ctx()).unwrap();

        assert_eq!(h.runner.calls(), vec!["sudo apt update", "apt list --upgradable"]);
        assert!(h.printed().contains("nothing to update"));
    }

    #[test]
    fn upgrades_and_cleans_up() {
        let h = Harness::new(runner_with_listing(LISTING), FakeTools::default());
        PackageUpdateStep.execute(&h.ctx()).unwrap();

        assert_eq!(
            h.runner.calls(),
            vec![
                "sudo apt update",
                "apt list --upgradable",
                "sudo apt upgrade -y",
                "sudo apt autoremove -y",
                "sudo apt autoclean",
            ]
        );
        let printed = h.printed();
        assert!(printed.contains("2 package(s) can be upgraded."));
        assert!(printed.contains("libreoffice-core/noble-updates"));
        assert!(printed.contains("System packages updated."));
    }

    #[test]
    fn dist_upgrade_replaces_upgrade() {
        let config = RunConfig {
            distribution_upgrade: true,
            ..RunConfig::default()
        };
        let h = Harness::new(runner_with_listing(LISTING), FakeTools::default()).config(config);
        PackageUpdateStep.execute(&h.ctx()).unwrap();

        assert!(h.runner.ran("sudo apt dist-upgrade -y"));
        assert!(!h.runner.ran("sudo apt upgrade -y"));
    }

    #[test]
    fn refresh_failure_is_fatal() {
        let runner = runner_with_listing(LISTING).failing("sudo apt update");
        let h = Harness::new(runner, FakeTools::default());
        let failure = PackageUpdateStep.execute(&h.ctx()).unwrap_err();

        assert_eq!(failure.severity, Severity::Fatal);
        assert_eq!(h.runner.calls(), vec!["sudo apt update"]);
        assert!(h.printed().contains("Failed to refresh package lists."));
    }

    #[test]
    fn listing_failure_is_fatal() {
        let runner = RecordingRunner::new().failing("apt list");
        let h = Harness::new(runner, FakeTools::default());
        let failure = PackageUpdateStep.execute(&h.ctx()).unwrap_err();

        assert_eq!(failure.severity, Severity::Fatal);
        assert!(!h.runner.ran("sudo apt upgrade -y"));
    }

    #[test]
    fn later_failures_only_warn() {
        let runner = runner_with_listing(LISTING)
            .failing("sudo apt upgrade")
            .failing("sudo apt autoremove")
            .failing("sudo apt autoclean");
        let h = Harness::new(runner, FakeTools::default());
        PackageUpdateStep.execute(&h.ctx()).unwrap();

        assert_eq!(h.runner.calls().len(), 5);
        let printed = h.printed();
        assert!(printed.contains("Package upgrade reported errors."));
        assert!(printed.contains("Could not remove obsolete packages."));
        assert!(printed.contains("Could not clean the package cache."));
        assert!(printed.contains("System packages updated."));
    }
}
