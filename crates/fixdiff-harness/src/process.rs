//! External tool invocation
//!
//! [`ToolCommand::run`] feeds a string to a child process on stdin and
//! collects everything it writes. Stdin is written and stdout/stderr are
//! drained on helper threads so that neither side can block on a full pipe.
//! The child is owned by a guard that kills and reaps it on every exit path
//! that has not already waited for it.
//!
//! A timeout covers the whole run: waiting for the child and collecting its
//! pipes. A background process left behind by the tool can keep a pipe open
//! after the tool itself exits; that also ends in `Timeout`.

use crate::errors::{HarnessError, Result};
use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How to start an external tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    env: BTreeMap<String, String>,
    timeout: Option<Duration>,
}

/// Captured output of a successful run
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    /// Lossily decoded; tools often print warnings here even on success
    pub stderr: String,
    pub duration: Duration,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: BTreeMap::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_envs(mut self, vars: BTreeMap<String, String>) -> Self {
        self.env.extend(vars);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn envs(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run the tool with `input` on stdin and capture its output
    ///
    /// # Errors
    ///
    /// - `Spawn` if the program cannot be started
    /// - `ToolIo` if a pipe fails (a child that exits without reading its
    ///   input is not a failure)
    /// - `Timeout` if the configured timeout elapses; the child is killed
    /// - `ToolFailed` if the child exits unsuccessfully
    /// - `Decoding` if stdout is not valid UTF-8
    pub fn run(&self, input: &str) -> Result<ToolOutput> {
        let started = Instant::now();
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        tracing::debug!(program = %self.program, args = ?self.args, "spawning tool");
        let child = command.spawn().map_err(|source| HarnessError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        let mut guard = ChildGuard::new(child);

        let writer = guard.child.stdin.take().map(|mut stdin| {
            let input = input.to_owned();
            pipe_thread(move || stdin.write_all(input.as_bytes()))
        });
        let stdout_reader = guard.child.stdout.take().map(drain);
        let stderr_reader = guard.child.stderr.take().map(drain);

        // Pipe threads still running at the deadline are left detached.
        let deadline = self.timeout.map(|t| started + t);
        let status = guard
            .wait(deadline)
            .map_err(|e| self.io_error(e))?
            .ok_or_else(|| self.timeout_error())?;

        let written = finish(writer, deadline).ok_or_else(|| self.timeout_error())?;
        if let Err(e) = written {
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(self.io_error(e));
            }
        }
        let stdout = finish(stdout_reader, deadline)
            .ok_or_else(|| self.timeout_error())?
            .map_err(|e| self.io_error(e))?;
        let stderr = finish(stderr_reader, deadline)
            .ok_or_else(|| self.timeout_error())?
            .map_err(|e| self.io_error(e))?;
        let stderr = String::from_utf8_lossy(&stderr).into_owned();

        if !status.success() {
            return Err(HarnessError::ToolFailed {
                program: self.program.clone(),
                exit_code: status.code(),
                stderr,
            });
        }

        let stdout = String::from_utf8(stdout).map_err(|source| HarnessError::Decoding {
            program: self.program.clone(),
            source,
        })?;
        if !stderr.trim().is_empty() {
            tracing::debug!(program = %self.program, stderr = %stderr.trim(), "tool wrote to stderr");
        }

        Ok(ToolOutput {
            stdout,
            stderr,
            duration: started.elapsed(),
        })
    }

    fn timeout_error(&self) -> HarnessError {
        HarnessError::Timeout {
            program: self.program.clone(),
            timeout_ms: self.timeout.map_or(0, |t| t.as_millis() as u64),
        }
    }

    fn io_error(&self, source: io::Error) -> HarnessError {
        HarnessError::ToolIo {
            program: self.program.clone(),
            source,
        }
    }
}

/// Owns a running child until it has been waited for.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    /// Wait for exit; `None` when the deadline passed first.
    fn wait(&mut self, deadline: Option<Instant>) -> io::Result<Option<ExitStatus>> {
        let status = match deadline {
            None => Some(self.child.wait()?),
            Some(deadline) => loop {
                if let Some(status) = self.child.try_wait()? {
                    break Some(status);
                }
                if Instant::now() >= deadline {
                    break None;
                }
                thread::sleep(POLL_INTERVAL);
            },
        };
        self.reaped = status.is_some();
        Ok(status)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

type PipeResult<T> = Receiver<io::Result<T>>;

fn pipe_thread<T, F>(work: F) -> PipeResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(work());
    });
    rx
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> PipeResult<Vec<u8>> {
    pipe_thread(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

/// Result of a pipe thread; `None` when the deadline passed first.
fn finish<T: Default>(
    pipe: Option<PipeResult<T>>,
    deadline: Option<Instant>,
) -> Option<io::Result<T>> {
    let Some(rx) = pipe else {
        return Some(Ok(T::default()));
    };
    let received = match deadline {
        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
    };
    match received {
        Ok(result) => Some(result),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(Err(io::Error::other("pipe thread panicked"))),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ToolCommand {
        ToolCommand::new("sh").arg("-c").arg(script)
    }

    #[test]
    fn test_round_trips_stdin() {
        let output = ToolCommand::new("cat").run("a\nb\n").unwrap();
        assert_eq!(output.stdout, "a\nb\n");
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn test_large_input_does_not_deadlock() {
        let input = "x".repeat(1 << 20);
        let output = ToolCommand::new("cat").run(&input).unwrap();
        assert_eq!(output.stdout.len(), input.len());
    }

    #[test]
    fn test_tool_ignoring_stdin_is_fine() {
        let input = "y".repeat(1 << 20);
        let output = sh("echo ignored").run(&input).unwrap();
        assert_eq!(output.stdout, "ignored\n");
    }

    #[test]
    fn test_nonzero_exit_is_tool_failed() {
        let err = sh("echo oops >&2; exit 3").run("").unwrap_err();
        match err {
            HarnessError::ToolFailed {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr, "oops\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = ToolCommand::new("fixdiff-no-such-program")
            .run("")
            .unwrap_err();
        assert!(matches!(err, HarnessError::Spawn { .. }));
    }

    #[test]
    fn test_timeout_kills_child() {
        let started = Instant::now();
        let err = ToolCommand::new("sleep")
            .arg("5")
            .with_timeout(Duration::from_millis(100))
            .run("")
            .unwrap_err();
        assert!(matches!(err, HarnessError::Timeout { timeout_ms: 100, .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_timeout_covers_pipes_held_by_background_process() {
        let started = Instant::now();
        let err = sh("sleep 3 & echo hi")
            .with_timeout(Duration::from_millis(200))
            .run("")
            .unwrap_err();
        assert!(matches!(err, HarnessError::Timeout { timeout_ms: 200, .. }));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_without_timeout_waits_for_background_output() {
        let output = sh("(sleep 0.2; echo late) & echo early").run("").unwrap();
        assert_eq!(output.stdout, "early\nlate\n");
    }

    #[test]
    fn test_non_utf8_stdout_is_decoding_error() {
        let err = sh("printf '\\377\\376'").run("").unwrap_err();
        assert!(matches!(err, HarnessError::Decoding { .. }));
    }

    #[test]
    fn test_env_and_working_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = sh("printf '%s:' \"$FIXDIFF_TEST_VAR\"; pwd -P")
            .with_env("FIXDIFF_TEST_VAR", "set")
            .with_working_dir(dir.path())
            .run("")
            .unwrap();

        let expected_dir = dir.path().canonicalize().unwrap();
        assert_eq!(
            output.stdout,
            format!("set:{}\n", expected_dir.display())
        );
    }
}
