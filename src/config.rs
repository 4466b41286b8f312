use crate::cli::Cli;

/// Toggles fixed before the pipeline starts and only read afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub create_snapshot: bool,
    pub update_snap: bool,
    pub update_flatpak: bool,
    pub check_reboot_needed: bool,
    /// Run `dist-upgrade` instead of `upgrade`; never both.
    pub distribution_upgrade: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            create_snapshot: false,
            update_snap: true,
            update_flatpak: true,
            check_reboot_needed: true,
            distribution_upgrade: false,
        }
    }
}

impl RunConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let defaults = Self::default();
        Self {
            create_snapshot: cli.snapshot || defaults.create_snapshot,
            update_snap: defaults.update_snap && !cli.no_snap,
            update_flatpak: defaults.update_flatpak && !cli.no_flatpak,
            check_reboot_needed: defaults.check_reboot_needed && !cli.no_reboot,
            distribution_upgrade: cli.dist_upgrade || defaults.distribution_upgrade,
        }
    }
}
