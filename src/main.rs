mod agents;
mod cli;
mod config;
mod error;
mod utils;
mod workflow;

use agents::{PathLocator, PrivilegeCheck, RebootCheckStep, StepContext, SystemRunner, TcpProbe};
use anyhow::Context;
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use config::RunConfig;
use std::process;
use utils::catalog::{self, Catalog};
use utils::console::Console;
use workflow::Workflow;

fn run(cli: &Cli) -> anyhow::Result<()> {
    let language = catalog::detect_language();
    let catalog = Catalog::load(&language).context("loading message catalog")?;
    tracing::debug!("using '{}' messages", catalog.language());

    if cli.help {
        let program = std::env::args().next().unwrap_or_else(|| "uubu".to_string());
        print!("{}", cli::render_help(&catalog, &program));
        return Ok(());
    }

    if cli.version {
        print!("{}", cli::render_version(&catalog));
        return Ok(());
    }

    let config = RunConfig::from_cli(cli);
    tracing::debug!("{config:?}");

    let console = Console::stdio();
    let runner = SystemRunner::new();
    let ctx = StepContext {
        config: &config,
        catalog: &catalog,
        console: &console,
        runner: &runner,
        tools: &PathLocator,
    };

    Workflow::standard(
        PrivilegeCheck::current(),
        Box::new(TcpProbe::default()),
        RebootCheckStep::default(),
    )
    .run(&ctx)?;

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    utils::logging::initialize_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
