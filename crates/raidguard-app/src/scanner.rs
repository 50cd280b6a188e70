//! Scanner invocation: the only blocking, external part of an execution.

use camino::Utf8Path;
use raidguard_settings::{OutputMode, ScannerSettings};
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const STDERR_EXCERPT_LEN: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to start {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited abnormally ({status}){}", stderr_suffix(.stderr))]
    ExitStatus {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("scanner did not finish within {}s", .timeout.as_secs_f64())]
    TimedOut { timeout: Duration },

    #[error("scanner I/O failed")]
    Io(#[from] io::Error),
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// Raw text produced by a scan, before interpretation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOutput {
    pub stdout: String,
}

/// Runs the external scanner against a policy artifact.
pub trait Scanner {
    fn scan(&self, artifact: &Utf8Path) -> Result<ScanOutput, ScanError>;
}

/// Scanner executed as a subprocess pipeline, without a shell.
///
/// `count` mode: `<program> -c <artifact> <subcommand> | <filter> -c -- <marker>`.
/// `raw` mode: `<program> -c <artifact> <subcommand>`.
///
/// The scanner must exit 0. The filter may exit 0 or 1 (no matching lines).
/// The timeout covers the processes and their pipes: output still held open
/// by a leftover background process when it expires fails the scan too.
#[derive(Clone, Debug)]
pub struct CommandScanner {
    settings: ScannerSettings,
    marker: String,
}

impl CommandScanner {
    pub fn new(settings: ScannerSettings, marker: impl Into<String>) -> Self {
        Self {
            settings,
            marker: marker.into(),
        }
    }
}

impl Scanner for CommandScanner {
    fn scan(&self, artifact: &Utf8Path) -> Result<ScanOutput, ScanError> {
        let settings = &self.settings;
        let mut pipeline = Pipeline::new(Deadline::after(settings.timeout));

        let mut scanner = Command::new(&settings.program);
        scanner
            .arg("-c")
            .arg(artifact.as_str())
            .arg(&settings.subcommand)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        pipeline.spawn(&settings.program, &mut scanner, &[0])?;

        if settings.output == OutputMode::Count {
            let upstream = pipeline.take_stdout()?;
            let mut filter = Command::new(&settings.filter_program);
            filter
                .args(["-c", "--", self.marker.as_str()])
                .stdin(Stdio::from(upstream))
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
            pipeline.spawn(&settings.filter_program, &mut filter, &[0, 1])?;
        }

        let stdout = spawn_reader(pipeline.take_stdout()?);
        pipeline.wait()?;

        let stdout = pipeline.deadline.receive(&stdout)?;
        pipeline.check_statuses()?;

        Ok(ScanOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
        })
    }
}

type Reader = Receiver<io::Result<Vec<u8>>>;

/// Point in time by which the whole scan must be done.
#[derive(Clone, Copy, Debug)]
struct Deadline {
    timeout: Duration,
    /// `None` when `now + timeout` is not representable; the scan is unbounded.
    at: Option<Instant>,
}

impl Deadline {
    fn after(timeout: Duration) -> Self {
        Self {
            timeout,
            at: Instant::now().checked_add(timeout),
        }
    }

    fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    fn timed_out(&self) -> ScanError {
        ScanError::TimedOut {
            timeout: self.timeout,
        }
    }

    /// Output collected by `reader`, waiting no longer than the deadline.
    fn receive(&self, reader: &Reader) -> Result<Vec<u8>, ScanError> {
        let received = match self.at {
            Some(at) => reader.recv_timeout(at.saturating_duration_since(Instant::now())),
            None => reader.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(bytes) => Ok(bytes?),
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    timeout_secs = self.timeout.as_secs_f64(),
                    "scanner output still open at deadline"
                );
                Err(self.timed_out())
            }
            Err(RecvTimeoutError::Disconnected) => Err(ScanError::Io(io::Error::other(
                "output reader stopped without a result",
            ))),
        }
    }
}

struct Stage {
    program: String,
    child: Child,
    accepted_codes: &'static [i32],
    stderr: Option<Reader>,
    status: Option<ExitStatus>,
}

/// Processes spawned for one scan. Dropping it kills whatever still runs.
struct Pipeline {
    deadline: Deadline,
    stages: Vec<Stage>,
}

impl Pipeline {
    fn new(deadline: Deadline) -> Self {
        Self {
            deadline,
            stages: Vec::new(),
        }
    }

    fn spawn(
        &mut self,
        program: &str,
        command: &mut Command,
        accepted_codes: &'static [i32],
    ) -> Result<(), ScanError> {
        debug!(program, "spawning");
        let mut child = command.spawn().map_err(|source| ScanError::Spawn {
            program: program.to_string(),
            source,
        })?;
        let stderr = child.stderr.take().map(spawn_reader);
        self.stages.push(Stage {
            program: program.to_string(),
            child,
            accepted_codes,
            stderr,
            status: None,
        });
        Ok(())
    }

    fn take_stdout(&mut self) -> Result<std::process::ChildStdout, ScanError> {
        self.stages
            .last_mut()
            .and_then(|stage| stage.child.stdout.take())
            .ok_or_else(|| ScanError::Io(io::Error::other("stdout of last stage is not piped")))
    }

    /// Poll every stage until all exited or the deadline passed.
    fn wait(&mut self) -> Result<(), ScanError> {
        loop {
            let mut running = false;
            for stage in self.stages.iter_mut().filter(|s| s.status.is_none()) {
                match stage.child.try_wait()? {
                    Some(status) => {
                        debug!(program = %stage.program, %status, "exited");
                        stage.status = Some(status);
                    }
                    None => running = true,
                }
            }
            if !running {
                return Ok(());
            }
            if self.deadline.expired() {
                warn!(
                    timeout_secs = self.deadline.timeout.as_secs_f64(),
                    "scanner timed out; killing"
                );
                self.kill_remaining();
                return Err(self.deadline.timed_out());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// First stage (in pipeline order) whose exit code is not accepted.
    fn check_statuses(&mut self) -> Result<(), ScanError> {
        let deadline = self.deadline;
        for stage in &mut self.stages {
            let Some(status) = stage.status else {
                continue;
            };
            let accepted = status
                .code()
                .is_some_and(|code| stage.accepted_codes.contains(&code));
            let stderr = match stage.stderr.take() {
                Some(reader) => deadline.receive(&reader)?,
                None => Vec::new(),
            };
            if !accepted {
                return Err(ScanError::ExitStatus {
                    program: stage.program.clone(),
                    status: status.to_string(),
                    stderr: stderr_excerpt(&stderr),
                });
            }
        }
        Ok(())
    }

    fn kill_remaining(&mut self) {
        for stage in self.stages.iter_mut().filter(|s| s.status.is_none()) {
            let _ = stage.child.kill();
            stage.status = stage.child.wait().ok();
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.kill_remaining();
    }
}

/// Drain `source` on a helper thread. A reader whose receiver was dropped
/// finishes on its own once the pipe closes.
fn spawn_reader<R: Read + Send + 'static>(mut source: R) -> Reader {
    let (tx, rx) = mpsc::sync_channel(1);
    thread::spawn(move || {
        let mut buf = Vec::new();
        let result = source.read_to_end(&mut buf).map(|_| buf);
        let _ = tx.send(result);
    });
    rx
}

fn stderr_excerpt(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .trim()
        .chars()
        .take(STDERR_EXCERPT_LEN)
        .collect()
}
