//  EXECUTOR.rs
//    by Lut99
//
//  Created:
//    04 Oct 2026, 10:15:38
//  Last edited:
//    15 Oct 2026, 10:33:51
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the [`Executor`], which is the seam between the
//!   provisioning logic and the external commands it runs.
//

use async_trait::async_trait;

use vpn_shr::jobs::{self, Invocation, LineSink, TerminalSink};


/***** LIBRARY *****/
/// Runs external commands on behalf of probes and steps.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Runs the given command quietly and returns whether it exited successfully.
    ///
    /// # Arguments
    /// - `invocation`: The (side-effect free) command to run.
    ///
    /// # Returns
    /// True if the command succeeded, false if it failed or could not be launched.
    async fn check(&self, invocation: &Invocation) -> bool;

    /// Runs the given command to completion while relaying its output.
    ///
    /// # Arguments
    /// - `invocation`: The command to run.
    ///
    /// # Errors
    /// This function errors if the command could not be launched or did not succeed.
    async fn run(&self, invocation: &Invocation) -> Result<(), jobs::Error>;
}



/// An [`Executor`] that runs commands on the local host.
#[derive(Debug, Default)]
pub struct LocalExecutor<S = TerminalSink> {
    /// Where the output of run commands ends up.
    sink : S,
}
impl<S> LocalExecutor<S> {
    /// Constructor for the LocalExecutor.
    ///
    /// # Arguments
    /// - `sink`: The [`LineSink`] that receives the output of commands.
    ///
    /// # Returns
    /// A new LocalExecutor instance.
    #[inline]
    pub fn new(sink: S) -> Self { Self{ sink } }
}
#[async_trait]
impl<S: LineSink> Executor for LocalExecutor<S> {
    #[inline]
    async fn check(&self, invocation: &Invocation) -> bool { jobs::status(invocation).await }

    #[inline]
    async fn run(&self, invocation: &Invocation) -> Result<(), jobs::Error> { jobs::stream(invocation, &self.sink).await }
}





/***** TESTING *****/
/// Provides an [`Executor`] for tests that records what it is asked to do instead of doing it.
#[cfg(test)]
pub(crate) mod mock {
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::Mutex;

    use super::*;


    /// Answers `test -f`/`test -d` by looking at the (temporary) filesystem and `which` by looking at a fixed set of installed programs. Runs are only recorded.
    #[derive(Debug, Default)]
    pub(crate) struct MockExecutor {
        /// The programs `which` finds.
        pub installed : HashSet<String>,
        /// Runs whose program or script contains any of these strings fail as if the program does not exist.
        pub failing   : Vec<String>,
        /// Every command given to `run`, in order.
        pub runs      : Mutex<Vec<Invocation>>,
        /// Every command given to `check`, in order.
        pub checks    : Mutex<Vec<Invocation>>,
    }
    impl MockExecutor {
        /// Constructor for a MockExecutor where `which` finds the given programs.
        pub(crate) fn with_installed(programs: &[&str]) -> Self {
            Self{ installed: programs.iter().map(|p| p.to_string()).collect(), ..Default::default() }
        }

        /// Returns a copy of all runs so far.
        pub(crate) fn runs(&self) -> Vec<Invocation> { self.runs.lock().unwrap().clone() }

        /// Returns the rendered command lines of all runs so far.
        pub(crate) fn run_lines(&self) -> Vec<String> { self.runs().iter().map(Invocation::to_string).collect() }
    }
    #[async_trait]
    impl Executor for MockExecutor {
        async fn check(&self, invocation: &Invocation) -> bool {
            self.checks.lock().unwrap().push(invocation.clone());
            let args: Vec<&str> = invocation.args.iter().map(String::as_str).collect();
            match (invocation.program.as_str(), args.as_slice()) {
                ("which", [ program ])    => self.installed.contains(*program),
                ("test", [ "-f", path ]) => Path::new(path).is_file(),
                ("test", [ "-d", path ]) => Path::new(path).is_dir(),
                _                        => panic!("MockExecutor cannot check '{invocation}'"),
            }
        }

        async fn run(&self, invocation: &Invocation) -> Result<(), jobs::Error> {
            self.runs.lock().unwrap().push(invocation.clone());
            let line: String = invocation.to_string();
            if self.failing.iter().any(|f| line.contains(f.as_str())) {
                return Err(jobs::Error::SpawnError{ command: line, err: std::io::Error::from(std::io::ErrorKind::NotFound) });
            }
            Ok(())
        }
    }
}
