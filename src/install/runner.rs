//! Bounded execution of the installer process.

use super::{InvocationError, ProcessError, ProcessOutcome, ResolvedCommand};
use crate::{AcquisitionOptions, Platform};
use async_trait::async_trait;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::time::timeout;

/// Runs a resolved install command and captures its outcome.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `command` for `platform`.
    ///
    /// Returns `Err` only when no process could be started. Every process
    /// that did start yields a [`ProcessOutcome`], with `error` set if it
    /// failed, timed out or overflowed the output cap.
    async fn run(
        &self,
        command: &ResolvedCommand,
        platform: Platform,
    ) -> Result<ProcessOutcome, InvocationError>;
}

/// Runs the installer through the platform's default shell.
///
/// The process inherits the caller's working directory. It is killed with
/// `SIGKILL` (or `TerminateProcess` on Windows) when it exceeds the timeout
/// or writes more than the output cap.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    timeout: Duration,
    max_buffer_bytes: usize,
}

enum Drained {
    Exited(ExitStatus),
    Overflowed,
}

impl ShellRunner {
    /// Create a runner bounded by `options`.
    pub fn new(options: &AcquisitionOptions) -> Self {
        Self {
            timeout: options.timeout,
            max_buffer_bytes: options.max_buffer_bytes,
        }
    }

    fn shell_command(command: &ResolvedCommand, platform: Platform) -> Command {
        let (shell, flag) = platform.capabilities().default_shell;
        let line = command.shell_line();

        let mut cmd = Command::new(shell);
        cmd.arg(flag);
        #[cfg(windows)]
        cmd.raw_arg(&line);
        #[cfg(not(windows))]
        cmd.arg(&line);

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(&AcquisitionOptions::default())
    }
}

#[async_trait]
impl ProcessRunner for ShellRunner {
    async fn run(
        &self,
        command: &ResolvedCommand,
        platform: Platform,
    ) -> Result<ProcessOutcome, InvocationError> {
        let mut cmd = Self::shell_command(command, platform);
        tracing::debug!(command = %command.shell_line(), "spawning install script");

        let mut child = cmd.spawn().map_err(InvocationError::Spawn)?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let drained = timeout(
            self.timeout,
            drain(&mut child, &mut stdout, &mut stderr, self.max_buffer_bytes),
        )
        .await;

        let error = match drained {
            Ok(Ok(Drained::Exited(status))) => status_error(status),
            Ok(Ok(Drained::Overflowed)) => {
                tracing::warn!(limit = self.max_buffer_bytes, "install script output overflowed");
                kill(&mut child).await;
                truncate_combined(&mut stdout, &mut stderr, self.max_buffer_bytes);
                Some(ProcessError::OutputLimitExceeded {
                    limit: self.max_buffer_bytes,
                })
            }
            Ok(Err(e)) => {
                kill(&mut child).await;
                Some(ProcessError::Io(e.to_string()))
            }
            Err(_) => {
                tracing::warn!(limit = ?self.timeout, "install script timed out");
                kill(&mut child).await;
                Some(ProcessError::TimedOut {
                    limit: self.timeout,
                })
            }
        };

        tracing::debug!(
            ?error,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            "install script finished"
        );

        Ok(ProcessOutcome {
            error,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

/// Read both pipes to EOF, then reap the child.
///
/// Stops early once the combined output exceeds `cap`.
async fn drain(
    child: &mut Child,
    stdout: &mut Vec<u8>,
    stderr: &mut Vec<u8>,
    cap: usize,
) -> io::Result<Drained> {
    let mut out_pipe = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("stdout was not captured"))?;
    let mut err_pipe = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("stderr was not captured"))?;

    let mut out_chunk = [0u8; 8192];
    let mut err_chunk = [0u8; 8192];
    let (mut out_open, mut err_open) = (true, true);

    while out_open || err_open {
        tokio::select! {
            read = out_pipe.read(&mut out_chunk), if out_open => match read? {
                0 => out_open = false,
                n => stdout.extend_from_slice(&out_chunk[..n]),
            },
            read = err_pipe.read(&mut err_chunk), if err_open => match read? {
                0 => err_open = false,
                n => stderr.extend_from_slice(&err_chunk[..n]),
            },
        }

        if stdout.len() + stderr.len() > cap {
            return Ok(Drained::Overflowed);
        }
    }

    Ok(Drained::Exited(child.wait().await?))
}

async fn kill(child: &mut Child) {
    if let Err(e) = child.kill().await {
        tracing::warn!(error = %e, "failed to kill install script");
    }
}

fn truncate_combined(stdout: &mut Vec<u8>, stderr: &mut Vec<u8>, cap: usize) {
    stdout.truncate(cap);
    stderr.truncate(cap - stdout.len());
}

fn status_error(status: ExitStatus) -> Option<ProcessError> {
    if status.success() {
        return None;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Some(ProcessError::Signaled { signal });
        }
    }

    Some(ProcessError::NonZeroExit {
        code: status.code().unwrap_or(-1),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::path::PathBuf;
    use std::time::Instant;

    /// A command line of the form `"sh" -c '<script>'`.
    fn inline_script(script: &str) -> ResolvedCommand {
        ResolvedCommand {
            executable_path: PathBuf::from("sh"),
            arguments: vec!["-c".to_string(), format!("'{}'", script)],
            shell_prefix: None,
        }
    }

    fn runner(timeout: Duration, max_buffer_bytes: usize) -> ShellRunner {
        ShellRunner::new(&AcquisitionOptions {
            timeout,
            max_buffer_bytes,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_captures_both_streams() {
        let outcome = ShellRunner::default()
            .run(&inline_script("echo Installed.; echo careful >&2"), Platform::Linux)
            .await
            .unwrap();
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.stdout, "Installed.\n");
        assert_eq!(outcome.stderr, "careful\n");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_process_error() {
        let outcome = ShellRunner::default()
            .run(&inline_script("exit 3"), Platform::Linux)
            .await
            .unwrap();
        assert_eq!(outcome.error, Some(ProcessError::NonZeroExit { code: 3 }));
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let start = Instant::now();
        let outcome = runner(Duration::from_millis(200), 500 * 1024)
            .run(&inline_script("echo started; sleep 10"), Platform::Linux)
            .await
            .unwrap();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(
            outcome.error,
            Some(ProcessError::TimedOut {
                limit: Duration::from_millis(200)
            })
        );
    }

    #[tokio::test]
    async fn test_output_cap_is_hard_failure() {
        let outcome = runner(Duration::from_secs(10), 100)
            .run(&inline_script("yes x | head -c 5000"), Platform::Linux)
            .await
            .unwrap();
        assert_eq!(
            outcome.error,
            Some(ProcessError::OutputLimitExceeded { limit: 100 })
        );
        assert!(outcome.stdout.len() + outcome.stderr.len() <= 100);
    }

    #[tokio::test]
    async fn test_missing_shell_is_invocation_error() {
        // Windows' default shell does not exist on Unix hosts.
        let result = ShellRunner::default()
            .run(&inline_script("true"), Platform::Windows)
            .await;
        assert!(matches!(result, Err(InvocationError::Spawn(_))));
    }

    #[test]
    fn test_status_error_mapping() {
        assert_eq!(status_error(ExitStatus::from_raw(0)), None);
        assert_eq!(
            status_error(ExitStatus::from_raw(3 << 8)),
            Some(ProcessError::NonZeroExit { code: 3 })
        );
        assert_eq!(
            status_error(ExitStatus::from_raw(libc::SIGKILL)),
            Some(ProcessError::Signaled {
                signal: libc::SIGKILL
            })
        );
    }

    #[test]
    fn test_truncate_combined() {
        let mut out = vec![b'a'; 80];
        let mut err = vec![b'b'; 80];
        truncate_combined(&mut out, &mut err, 100);
        assert_eq!(out.len(), 80);
        assert_eq!(err.len(), 20);
    }
}
