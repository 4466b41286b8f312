use crate::utils::catalog::Catalog;
use clap::{ArgAction, Parser};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD_TIME: Option<&str> = option_env!("UUBU_BUILD_TIME");
const GIT_COMMIT: Option<&str> = option_env!("UUBU_GIT_COMMIT");

/// Help and version are rendered from the message catalog, so clap's own
/// flags are disabled and re-declared as plain switches.
#[derive(Parser, Debug)]
#[command(
    name = "uubu",
    about = "Ubuntu system updater",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Show help
    #[arg(short = 'h', long = "help", action = ArgAction::SetTrue)]
    pub help: bool,

    /// Show version information
    #[arg(short = 'v', long = "version", action = ArgAction::SetTrue)]
    pub version: bool,

    /// Create a Timeshift snapshot before updating
    #[arg(short = 's', long = "snapshot")]
    pub snapshot: bool,

    /// Do not update Snap packages
    #[arg(long = "no-snap")]
    pub no_snap: bool,

    /// Do not update Flatpak packages
    #[arg(long = "no-flatpak")]
    pub no_flatpak: bool,

    /// Do not check whether a reboot is required
    #[arg(long = "no-reboot")]
    pub no_reboot: bool,

    /// Run a distribution upgrade instead of a plain upgrade
    #[arg(long = "dist-upgrade")]
    pub dist_upgrade: bool,

    /// Print diagnostic logs to stderr
    #[arg(long)]
    pub verbose: bool,
}

/// (flags, catalog key) pairs listed in the help text.
const HELP_FLAGS: &[(&str, &str)] = &[
    ("-h, --help", "flag_help"),
    ("-v, --version", "flag_version"),
    ("-s, --snapshot", "flag_snapshot"),
    ("--no-snap", "flag_no_snap"),
    ("--no-flatpak", "flag_no_flatpak"),
    ("--no-reboot", "flag_no_reboot"),
    ("--dist-upgrade", "flag_dist_upgrade"),
    ("--verbose", "flag_verbose"),
];

/// Localized help text.
pub fn render_help(catalog: &Catalog, program: &str) -> String {
    let mut out = format!(
        "{}\n\n{}:\n",
        catalog.message("help_description"),
        catalog.message("description")
    );
    for line in catalog.message("help_desc_long").lines() {
        out.push_str(&format!("  {line}\n"));
    }
    out.push_str(&format!("\n{}\n\n", catalog.format("help_usage", &[&program])));

    out.push_str(&format!("{}\n", catalog.message("help_options")));
    for (flags, key) in HELP_FLAGS {
        out.push_str(&format!("  {flags:<16}{}\n", catalog.message(key)));
    }

    out.push_str(&format!("\n{}\n", catalog.message("help_examples")));
    let examples = [
        (program.to_string(), "help_example_1"),
        (format!("{program} -s"), "help_example_2"),
        (format!("{program} --no-snap --no-flatpak"), "help_example_3"),
    ];
    for (command, key) in &examples {
        out.push_str(&format!("  {command:<36}{}\n", catalog.message(key)));
    }

    out.push_str(&format!(
        "\n{}\n  NDXDev (NDXDev@gmail.com)\n",
        catalog.message("help_author")
    ));
    out.push_str(&format!("\n{}\n  MIT\n", catalog.message("help_license")));
    out
}

/// Version, build metadata and the active language.
pub fn render_version(catalog: &Catalog) -> String {
    format!(
        "uubu {VERSION}\nBuild time: {}\nGit commit: {}\n{}\nLanguage: {}\n",
        BUILD_TIME.unwrap_or("unknown"),
        GIT_COMMIT.unwrap_or("unknown"),
        catalog.message("license"),
        catalog.language()
    )
}
