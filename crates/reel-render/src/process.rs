use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};

/// Captured result of a renderer run that finished on its own.
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

#[derive(Debug)]
pub enum ProcessOutcome {
    Exited(ProcessOutput),
    /// The deadline passed; the process and its descendants were killed.
    TimedOut,
}

/// Handle to a spawned renderer process.
///
/// The child is placed in its own process group so that a timeout can take
/// down everything it started, not just the direct child.
pub struct RenderProcess {
    child: Child,
    pid: Option<u32>,
}

impl RenderProcess {
    /// Spawn `command` with piped stdout/stderr and no stdin.
    pub fn spawn(mut command: Command) -> io::Result<Self> {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn()?;
        let pid = child.id();
        Ok(Self { child, pid })
    }

    pub fn id(&self) -> Option<u32> {
        self.pid
    }

    /// Wait up to `timeout` for the process to exit and its output pipes to
    /// close, then kill the whole process group if it has not.
    ///
    /// Exiting and draining the pipes share one deadline, so a descendant
    /// that keeps stdout open cannot stretch the wait past `timeout`.
    pub async fn wait_with_timeout(self, timeout: Duration) -> io::Result<ProcessOutcome> {
        let Self { mut child, pid } = self;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let run = async {
            let (status, stdout, stderr) =
                tokio::join!(child.wait(), read_pipe(stdout), read_pipe(stderr));
            Ok::<_, io::Error>(ProcessOutput {
                status: status?,
                stdout: stdout?,
                stderr: stderr?,
            })
        };
        let result = tokio::time::timeout(timeout, run).await;

        match result {
            Ok(output) => Ok(ProcessOutcome::Exited(output?)),
            Err(_) => {
                kill_process_tree(&mut child, pid).await;
                Ok(ProcessOutcome::TimedOut)
            }
        }
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

async fn kill_process_tree(child: &mut Child, pid: Option<u32>) {
    if let Some(pid) = pid {
        signal_process_group(pid);
    }

    match child.try_wait() {
        // Already reaped while draining pipes; only descendants were left.
        Ok(Some(_)) => {}
        _ => {
            if let Err(e) = child.kill().await {
                tracing::warn!("failed to kill renderer process: {}", e);
            }
        }
    }
}

#[cfg(unix)]
fn signal_process_group(pid: u32) {
    // The child leads its own group, so the negated pid reaches every
    // process it spawned.
    let rc = unsafe { libc::kill(-(pid as libc::pid_t), libc::SIGKILL) };
    if rc != 0 {
        tracing::debug!(pid, "killpg failed: {}", io::Error::last_os_error());
    }
}

#[cfg(not(unix))]
fn signal_process_group(_pid: u32) {}
