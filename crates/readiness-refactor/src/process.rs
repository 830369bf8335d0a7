use crate::error::{RefactorError, Result};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Everything the driver's diagnostics need, win or lose.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub elapsed_s: f64,
    pub timed_out: bool,
}

/// Builder for a dry-run subprocess invocation with a wall-clock timeout.
/// Modeled on the polling `spawn` + `try_wait` loop used elsewhere in this
/// codebase for subprocess supervision, but captures piped stdout/stderr so
/// the caller can parse tool output rather than discarding it.
pub struct CommandWithTimeout {
    command: Command,
    timeout: Duration,
}

impl CommandWithTimeout {
    pub fn new(program: &str) -> Self {
        let mut command = Command::new(program);
        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        Self {
            command,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.command.args(args);
        self
    }

    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    pub fn current_dir(&mut self, dir: &std::path::Path) -> &mut Self {
        self.command.current_dir(dir);
        self
    }

    /// Spawns the child, polls for completion, and kills it (draining
    /// whatever output had been buffered) if the deadline elapses first.
    pub fn execute(&mut self) -> Result<ProcessOutcome> {
        let start = Instant::now();
        let mut child: Child = self.command.spawn().map_err(RefactorError::Spawn)?;

        loop {
            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Ok(ProcessOutcome {
                    stdout: String::new(),
                    stderr: String::new(),
                    exit_code: None,
                    elapsed_s: elapsed.as_secs_f64(),
                    timed_out: true,
                });
            }

            match child.try_wait() {
                Ok(Some(status)) => {
                    let mut stdout = String::new();
                    let mut stderr = String::new();
                    if let Some(mut out) = child.stdout.take() {
                        let _ = out.read_to_string(&mut stdout);
                    }
                    if let Some(mut err) = child.stderr.take() {
                        let _ = err.read_to_string(&mut stderr);
                    }
                    return Ok(ProcessOutcome {
                        stdout,
                        stderr,
                        exit_code: status.code(),
                        elapsed_s: start.elapsed().as_secs_f64(),
                        timed_out: false,
                    });
                }
                Ok(None) => std::thread::sleep(Duration::from_millis(25)),
                Err(e) => return Err(RefactorError::Spawn(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_of_a_quick_command() {
        let outcome = CommandWithTimeout::new("echo").args(["hello"]).execute().unwrap();
        assert!(!outcome.timed_out);
        assert_eq!(outcome.stdout.trim(), "hello");
        assert_eq!(outcome.exit_code, Some(0));
    }

    #[test]
    fn kills_and_reports_timeout_for_long_running_commands() {
        let outcome = CommandWithTimeout::new("sleep")
            .args(["5"])
            .timeout(Duration::from_millis(50))
            .execute()
            .unwrap();
        assert!(outcome.timed_out);
        assert!(outcome.exit_code.is_none());
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let result = CommandWithTimeout::new("definitely-not-a-real-binary-xyz").execute();
        assert!(result.is_err());
    }
}
