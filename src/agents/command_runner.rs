use crate::error::{Result, UubuError};
use rustix::pipe::{PipeFlags, pipe_with};
use std::fs::File;
use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};

/// Wrapper used for every command that needs elevated privileges.
pub const ELEVATION_PROGRAM: &str = "sudo";

/// Single seam through which the updater touches the system.
pub trait CommandRunner {
    /// Run `program` with `args`, wait for it and return stdout and stderr
    /// interleaved in the order they were written. Fails if the program
    /// cannot be started or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<String>;

    /// Same as [`CommandRunner::run`] but prefixed with the elevation wrapper.
    fn run_elevated(&self, program: &str, args: &[&str]) -> Result<String> {
        let mut elevated = Vec::with_capacity(args.len() + 1);
        elevated.push(program);
        elevated.extend_from_slice(args);
        self.run(ELEVATION_PROGRAM, &elevated)
    }
}

/// Runs real processes in the current environment and working directory.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    /// Spawn with stdout and stderr sharing one pipe, then drain it.
    fn spawn_combined(program: &str, args: &[&str]) -> io::Result<(ExitStatus, Vec<u8>)> {
        let (reader, writer) = pipe_with(PipeFlags::CLOEXEC)?;
        let stderr_writer = writer.try_clone()?;

        // The command owns the parent's write ends and is dropped right after
        // the spawn, so the read below sees EOF once the child exits.
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::from(writer))
            .stderr(Stdio::from(stderr_writer))
            .spawn()?;

        let mut raw = Vec::new();
        let drained = File::from(reader).read_to_end(&mut raw);
        let status = child.wait()?;
        drained?;
        Ok((status, raw))
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let command_line = command_line(program, args);
        tracing::debug!("running: {command_line}");

        let (status, raw) =
            Self::spawn_combined(program, args).map_err(|e| UubuError::Command {
                command: command_line.clone(),
                reason: format!("could not run: {e}"),
                output: String::new(),
            })?;
        let combined = String::from_utf8_lossy(&raw).into_owned();

        if !status.success() {
            tracing::debug!("{command_line} exited with {status}");
            return Err(UubuError::Command {
                command: command_line,
                reason: status.to_string(),
                output: combined,
            });
        }

        Ok(combined)
    }
}

pub fn command_line(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
