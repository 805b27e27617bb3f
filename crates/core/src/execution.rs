use std::collections::HashMap;
use std::process::{Command, Stdio};

use log::info;

use crate::config;
use crate::error::{Error, Result};

/// Builds a `<shell> -i -c "<command_line>"` invocation.
///
/// `-i` starts an interactive shell so the user's rc/profile files are read.
pub fn shell_command(shell: &str, command_line: &str, working_directory: Option<&String>) -> Command {
    let mut command = Command::new(shell);
    if let Some(working_directory) =
        config::expand_working_directory(&working_directory.cloned())
    {
        command.current_dir(working_directory);
    }
    command.args(["-i", "-c", command_line]);
    command
}

/// Executes a command with optional environment variables.
///
/// # Errors
///
/// Returns an error if command execution fails or exits with non-zero status.
pub fn execute_command<S: ::std::hash::BuildHasher>(
    mut command: Command,
    environment: Option<&HashMap<String, String, S>>,
) -> Result<()> {
    let mut command = command
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    if let Some(environment) = environment {
        info!("Executing with environment variables: {:?}", environment);
        command = command.envs(environment);
    };

    let subprocess_exit_success = command.spawn()?.wait()?.success();

    if subprocess_exit_success {
        Ok(())
    } else {
        Err(Error::SubProcessExit)
    }
}
