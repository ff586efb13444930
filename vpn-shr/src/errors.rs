//  ERRORS.rs
//    by Lut99
// 
//  Created:
//    02 Oct 2026, 10:14:09
//  Last edited:
//    18 Oct 2026, 10:02:31
//  Auto updated?
//    Yes
// 
//  Description:
//!   Defines the errors that may occur when running external commands.
// 

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FResult};
use std::process::ExitStatus;

use console::style;


/***** LIBRARY *****/
/// Errors that relate to running a single external command.
/// 
/// The `command` fields are the already-rendered command lines, so the error can outlive the invocation.
#[derive(Debug)]
pub enum CommandFailure {
    /// Failed to start the process (typically because the program is not installed).
    SpawnError{ command: String, err: std::io::Error },
    /// The spawned process did not expose one of its output pipes.
    MissingPipe{ command: String, what: &'static str },
    /// Failed to read a line from one of the output pipes.
    RelayError{ command: String, what: &'static str, err: std::io::Error },
    /// Failed to wait for the process to terminate.
    WaitError{ command: String, err: std::io::Error },
    /// The process terminated, but not successfully.
    JobFailure{ command: String, status: ExitStatus },
}
impl Display for CommandFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        use CommandFailure::*;
        match self {
            SpawnError{ command, .. }       => write!(f, "Failed to launch command '{command}'"),
            MissingPipe{ command, what }    => write!(f, "Command '{command}' has no {what} pipe to relay"),
            RelayError{ command, what, .. } => write!(f, "Failed to relay {what} of command '{command}'"),
            WaitError{ command, .. }        => write!(f, "Failed to wait for command '{command}' to complete"),
            JobFailure{ command, status }   => write!(f, "Command '{}' failed with {} (see output above)", style(command).bold(), match status.code() {
                Some(code) => format!("exit code {}", style(code).bold()),
                None       => "a non-zero exit status (terminated by signal?)".into(),
            }),
        }
    }
}
impl Error for CommandFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use CommandFailure::*;
        match self {
            SpawnError{ err, .. } => Some(err),
            MissingPipe{ .. }     => None,
            RelayError{ err, .. } => Some(err),
            WaitError{ err, .. }  => Some(err),
            JobFailure{ .. }      => None,
        }
    }
}
