//  JOBS.rs
//    by Lut99
//
//  Created:
//    02 Oct 2026, 10:20:55
//  Last edited:
//    14 Oct 2026, 16:37:12
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the runner for external commands. Commands are either
//!   run quietly to learn their exit status, or streamed, in which case
//!   every line they write is relayed to a [`LineSink`] while they run.
//

use std::borrow::Cow;
use std::fmt::{Display, Formatter, Result as FResult};
use std::io::Write as _;
use std::process::{ExitStatus, Stdio};

use log::debug;
use tokio::io::{AsyncBufReadExt as _, AsyncRead, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};

pub use crate::errors::CommandFailure as Error;


/***** HELPER FUNCTIONS *****/
/// Reads the given pipe line-by-line, handing every line to the given closure as soon as it is complete.
///
/// Lines are decoded lossily, so tools that emit the odd non-UTF-8 byte do not break the relay.
///
/// # Arguments
/// - `reader`: The pipe to read from.
/// - `emit`: The closure that is called for every line (without its line ending).
///
/// # Errors
/// This function errors if we failed to read from the pipe.
async fn relay(reader: impl AsyncRead + Unpin, mut emit: impl FnMut(&str)) -> Result<(), std::io::Error> {
    let mut lines = BufReader::new(reader).split(b'\n');
    while let Some(mut line) = lines.next_segment().await? {
        if line.last() == Some(&b'\r') { line.pop(); }
        emit(&String::from_utf8_lossy(&line));
    }
    Ok(())
}





/***** AUXILLARY *****/
/// Defines where the lines relayed from a streamed command end up.
pub trait LineSink: Send + Sync {
    /// Called for every line the command writes to its stdout.
    ///
    /// # Arguments
    /// - `line`: The line, without its line ending.
    fn stdout(&self, line: &str);
    /// Called for every line the command writes to its stderr.
    ///
    /// # Arguments
    /// - `line`: The line, without its line ending.
    fn stderr(&self, line: &str);
}



/// A [`LineSink`] that writes lines to the stdout and stderr of this process, respectively.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalSink;
impl LineSink for TerminalSink {
    fn stdout(&self, line: &str) {
        let mut handle = std::io::stdout().lock();
        // A closed terminal is not a reason to kill the command we are relaying
        let _ = writeln!(handle, "{line}");
    }

    fn stderr(&self, line: &str) {
        let mut handle = std::io::stderr().lock();
        let _ = writeln!(handle, "{line}");
    }
}



/// Describes a single external command to run.
///
/// Arguments are passed as-is to the program; there is no shell in between unless the invocation is built with [`Invocation::shell()`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invocation {
    /// The program to run. Resolved via `$PATH` if it is not a path.
    pub program : String,
    /// The arguments to pass to it, in order.
    pub args    : Vec<String>,
}

impl Invocation {
    /// Constructor for an Invocation without any arguments.
    ///
    /// # Arguments
    /// - `program`: The program to run.
    ///
    /// # Returns
    /// A new Invocation that calls `program` without arguments.
    #[inline]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program : program.into(),
            args    : vec![],
        }
    }

    /// Constructor for an Invocation that runs the given script in a `bash` shell.
    ///
    /// Use this only for steps that need shell features (sourcing, `&&`-chains, redirects).
    ///
    /// # Arguments
    /// - `script`: The script to pass to `bash -c`.
    ///
    /// # Returns
    /// A new Invocation for `bash -c <script>`.
    #[inline]
    pub fn shell(script: impl Into<String>) -> Self { Self::new("bash").arg("-c").arg(script) }

    /// Constructor for an Invocation that runs the given commands in one `bash` shell, chained with `&&`.
    ///
    /// The first failing command aborts the remainder and fails the whole invocation.
    ///
    /// # Arguments
    /// - `steps`: The (already shell-escaped) commands to chain.
    ///
    /// # Returns
    /// A new Invocation for `bash -c '<step1> && <step2> && ...'`.
    pub fn shell_chain(steps: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        let steps: Vec<String> = steps.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::shell(steps.join(" && "))
    }



    /// Appends a single argument.
    ///
    /// # Arguments
    /// - `arg`: The argument to append.
    ///
    /// # Returns
    /// Self for chaining.
    #[inline]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends multiple arguments.
    ///
    /// # Arguments
    /// - `args`: The arguments to append, in order.
    ///
    /// # Returns
    /// Self for chaining.
    #[inline]
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }



    /// Returns the script run by this invocation if it was built with [`Invocation::shell()`].
    #[inline]
    pub fn script(&self) -> Option<&str> {
        if self.program == "bash" && self.args.len() == 2 && self.args[0] == "-c" { Some(&self.args[1]) } else { None }
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        let quote = |s: &'_ str| -> String { shlex::try_quote(s).unwrap_or(Cow::Borrowed(s)).into_owned() };
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}





/***** LIBRARY *****/
/// Runs the given command quietly and reports whether it succeeded.
///
/// All of the command's standard streams are nulled. Failure to launch the command counts as unsuccessful.
///
/// # Arguments
/// - `invocation`: The command to run.
///
/// # Returns
/// True if the command exited with status zero, or false otherwise.
pub async fn status(invocation: &Invocation) -> bool {
    let mut cmd: Command = Command::new(&invocation.program);
    cmd.args(&invocation.args);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::null());

    debug!("Checking status of '{}'", invocation);
    match cmd.status().await {
        Ok(status) => {
            debug!("'{}' returned {}", invocation, status);
            status.success()
        },
        Err(err) => {
            debug!("Failed to launch '{}' ({}); assuming unsuccessful", invocation, err);
            false
        },
    }
}



/// Runs the given command and relays its output to the given sink while it runs.
///
/// Both the stdout and stderr pipes are drained concurrently with the wait for the process, and this function only returns once the process has terminated _and_ both pipes have been read to the end. Lines of a single stream are relayed in the order they are written; there is no ordering between the two streams.
///
/// # Arguments
/// - `invocation`: The command to run.
/// - `sink`: The [`LineSink`] that receives the command's output.
///
/// # Errors
/// This function errors if we failed to launch the command, failed to read its output, or if it terminated unsuccessfully.
pub async fn stream(invocation: &Invocation, sink: &dyn LineSink) -> Result<(), Error> {
    // Prepare the command
    let mut cmd: Command = Command::new(&invocation.program);
    cmd.args(&invocation.args);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    // Spawn it
    debug!("Running command '{}'", invocation);
    let mut child: Child = match cmd.spawn() {
        Ok(child) => child,
        Err(err)  => { return Err(Error::SpawnError{ command: invocation.to_string(), err }); },
    };
    let stdout: ChildStdout = match child.stdout.take() {
        Some(stdout) => stdout,
        None         => { return Err(Error::MissingPipe{ command: invocation.to_string(), what: "stdout" }); },
    };
    let stderr: ChildStderr = match child.stderr.take() {
        Some(stderr) => stderr,
        None         => { return Err(Error::MissingPipe{ command: invocation.to_string(), what: "stderr" }); },
    };

    // Drain both pipes while waiting for the process
    let (out_res, err_res, wait_res): (Result<(), std::io::Error>, Result<(), std::io::Error>, Result<ExitStatus, std::io::Error>) = tokio::join!(
        relay(stdout, |line| sink.stdout(line)),
        relay(stderr, |line| sink.stderr(line)),
        child.wait(),
    );

    // Analyse the result
    let status: ExitStatus = match wait_res {
        Ok(status) => status,
        Err(err)   => { return Err(Error::WaitError{ command: invocation.to_string(), err }); },
    };
    if let Err(err) = out_res { return Err(Error::RelayError{ command: invocation.to_string(), what: "stdout", err }); }
    if let Err(err) = err_res { return Err(Error::RelayError{ command: invocation.to_string(), what: "stderr", err }); }
    debug!("'{}' returned {}", invocation, status);
    if !status.success() { return Err(Error::JobFailure{ command: invocation.to_string(), status }); }

    // Done
    Ok(())
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;


    /// Remembers every line it is given.
    #[derive(Debug, Default)]
    struct CollectSink {
        stdout : Mutex<Vec<String>>,
        stderr : Mutex<Vec<String>>,
    }
    impl LineSink for CollectSink {
        fn stdout(&self, line: &str) { self.stdout.lock().unwrap().push(line.into()); }
        fn stderr(&self, line: &str) { self.stderr.lock().unwrap().push(line.into()); }
    }


    #[tokio::test]
    async fn test_stream_stdout_in_order() {
        let sink = CollectSink::default();
        stream(&Invocation::shell("echo A; echo B"), &sink).await.unwrap();
        assert_eq!(*sink.stdout.lock().unwrap(), vec![ "A".to_string(), "B".to_string() ]);
        assert!(sink.stderr.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stream_stderr_separately() {
        let sink = CollectSink::default();
        stream(&Invocation::shell("echo out; echo err1 >&2; echo err2 >&2"), &sink).await.unwrap();
        assert_eq!(*sink.stdout.lock().unwrap(), vec![ "out".to_string() ]);
        assert_eq!(*sink.stderr.lock().unwrap(), vec![ "err1".to_string(), "err2".to_string() ]);
    }

    #[tokio::test]
    async fn test_stream_last_line_without_newline() {
        let sink = CollectSink::default();
        stream(&Invocation::new("printf").arg("first\\nlast"), &sink).await.unwrap();
        assert_eq!(*sink.stdout.lock().unwrap(), vec![ "first".to_string(), "last".to_string() ]);
    }

    #[tokio::test]
    async fn test_stream_drains_both_pipes_fully() {
        // Enough output to fill a pipe buffer on both streams at the same time
        let sink = CollectSink::default();
        stream(&Invocation::shell("seq 1 20000; seq 1 20000 >&2"), &sink).await.unwrap();
        let stdout = sink.stdout.lock().unwrap();
        let stderr = sink.stderr.lock().unwrap();
        assert_eq!(stdout.len(), 20000);
        assert_eq!(stderr.len(), 20000);
        assert_eq!(stdout.last().map(String::as_str), Some("20000"));
    }

    #[tokio::test]
    async fn test_stream_nonexistent_program() {
        let sink = CollectSink::default();
        match stream(&Invocation::new("vpnctl-this-program-does-not-exist"), &sink).await {
            Err(Error::SpawnError{ .. }) => {},
            res                          => panic!("Expected a spawn error, got {res:?}"),
        }
    }

    #[tokio::test]
    async fn test_stream_nonzero_exit() {
        let sink = CollectSink::default();
        match stream(&Invocation::shell("echo before; exit 3"), &sink).await {
            Err(Error::JobFailure{ status, .. }) => assert_eq!(status.code(), Some(3)),
            res                                  => panic!("Expected a job failure, got {res:?}"),
        }
        // Output up to the failure is still relayed
        assert_eq!(*sink.stdout.lock().unwrap(), vec![ "before".to_string() ]);
    }

    #[tokio::test]
    async fn test_status() {
        assert!(status(&Invocation::new("true")).await);
        assert!(!status(&Invocation::new("false")).await);
        assert!(!status(&Invocation::new("vpnctl-this-program-does-not-exist")).await);
        assert!(status(&Invocation::new("test").args([ "-d", "/" ])).await);
    }

    #[test]
    fn test_invocation_display() {
        assert_eq!(Invocation::new("sudo").args([ "apt-get", "install", "-y", "openvpn" ]).to_string(), "sudo apt-get install -y openvpn");
        assert_eq!(Invocation::shell_chain([ "cd /etc/openvpn", "ls" ]).to_string(), "bash -c 'cd /etc/openvpn && ls'");
    }

    #[test]
    fn test_invocation_script() {
        let inv = Invocation::shell_chain([ "cd /tmp", "./clean-all" ]);
        assert_eq!(inv.script(), Some("cd /tmp && ./clean-all"));
        assert_eq!(Invocation::new("which").arg("openvpn").script(), None);
    }
}
