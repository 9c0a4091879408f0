// Synchronous child-process invocation with explicit output capture
//
// Spawn failure (missing executable) is an error; a non-zero exit is data
// the caller inspects. Children are always reaped before returning.

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};
use tracing::debug;

/// Maximum number of recent lines per stream retained by [`run_streamed`].
const OUTPUT_TAIL_LINES: usize = 200;

/// Captured result of a finished child process
#[derive(Debug)]
pub struct CommandOutput {
    /// Exit code; -1 if the child was killed by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Both streams joined for a human-readable report
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
            (false, true) => self.stdout.clone(),
            (true, _) => self.stderr.clone(),
        }
    }
}

/// Run a command to completion with stdout and stderr captured.
pub fn run_captured(command: &mut Command) -> Result<CommandOutput> {
    let output = command
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("Failed to run {:?}", command.get_program()))?;

    let result = CommandOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    debug!(program = ?command.get_program(), exit_code = result.exit_code, "Command finished");
    Ok(result)
}

/// Run a command to completion, writing `input` to its stdin first.
pub fn run_with_input(command: &mut Command, input: &str) -> Result<CommandOutput> {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to spawn {:?}", command.get_program()))?;

    {
        let mut stdin = child.stdin.take().expect("stdin was piped");
        stdin
            .write_all(input.as_bytes())
            .context("Failed to write to child stdin")?;
        // dropping stdin closes the pipe so the child sees EOF
    }

    let output = child
        .wait_with_output()
        .with_context(|| format!("Failed to wait for {:?}", command.get_program()))?;

    Ok(CommandOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Run a command, echoing its output lines as they arrive and keeping a
/// bounded tail of recent lines per stream for the exit report. Blocks until
/// the child exits.
pub fn run_streamed(command: &mut Command) -> Result<CommandOutput> {
    let mut child = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to spawn {:?}", command.get_program()))?;

    let stdout = child.stdout.take().expect("stdout was piped");
    let stderr = child.stderr.take().expect("stderr was piped");

    // Drain stderr on a helper thread so a full stderr pipe cannot block the child
    let stderr_task = std::thread::spawn(move || {
        let mut tail = VecDeque::new();
        for line in BufReader::new(stderr).lines().map_while(|l| l.ok()) {
            eprintln!("{}", line);
            push_tail(&mut tail, line);
        }
        tail
    });

    // Drain stdout on this thread
    let mut stdout_tail = VecDeque::new();
    for line in BufReader::new(stdout).lines().map_while(|l| l.ok()) {
        println!("{}", line);
        push_tail(&mut stdout_tail, line);
    }

    let stderr_tail = stderr_task.join().unwrap_or_default();
    let status = child
        .wait()
        .with_context(|| format!("Failed to wait for {:?}", command.get_program()))?;
    let exit_code = status.code().unwrap_or(-1);
    debug!(program = ?command.get_program(), exit_code, "Streamed command finished");

    Ok(CommandOutput {
        exit_code,
        stdout: join_lines(stdout_tail),
        stderr: join_lines(stderr_tail),
    })
}

fn push_tail(tail: &mut VecDeque<String>, line: String) {
    if tail.len() == OUTPUT_TAIL_LINES {
        tail.pop_front();
    }
    tail.push_back(line);
}

fn join_lines(tail: VecDeque<String>) -> String {
    Vec::from(tail).join("\n")
}
