//! Child process execution with piped stdin and fully buffered output.

use std::io;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Captured result of one child process.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code (-1 when terminated by a signal).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Spawn `command`, write `input` to its stdin, close stdin and wait for it
/// to exit.
///
/// stdin is written concurrently with draining stdout and stderr, so large
/// inputs cannot deadlock against a full output pipe. A child that exits
/// without reading all of its input is not an error. When `timeout`
/// elapses the child is killed and a `TimedOut` error is returned.
pub async fn run_with_stdin(
    mut command: Command,
    input: Vec<u8>,
    timeout: Option<Duration>,
) -> io::Result<ToolOutput> {
    let start = Instant::now();

    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "child stdin was not captured"))?;

    let feed = async move {
        let written = stdin.write_all(&input).await;
        drop(stdin);
        match written {
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
            other => other,
        }
    };

    let run = async move {
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        fed?;
        output
    };

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, run).await.map_err(|_| {
            io::Error::new(
                io::ErrorKind::TimedOut,
                format!("timed out after {limit:?}"),
            )
        })??,
        None => run.await?,
    };

    Ok(ToolOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
