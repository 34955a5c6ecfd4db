use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};
use crate::drivers::table::parse_bundled;
use crate::drivers::{PipelineError, SampleTable};
/// Trait representing something that can produce the sample table on demand.
pub trait TableSource: Send {
    fn describe(&self) -> String;
    fn load(&mut self) -> Result<SampleTable, PipelineError>;
}
/// The data file shipped next to the executable.
pub struct FileSource {
    path: PathBuf,
}
impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}
impl TableSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }
    fn load(&mut self) -> Result<SampleTable, PipelineError> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| PipelineError::LoadFailure(format!("{}: {e}", self.path.display())))?;
        parse_bundled(&text)
    }
}
/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    result: Option<Result<SampleTable, PipelineError>>,
    delay: Duration,
}
impl ManualSource {
    pub fn new(table: SampleTable) -> Self {
        Self {
            result: Some(Ok(table)),
            delay: Duration::ZERO,
        }
    }
    pub fn failing(reason: &str) -> Self {
        Self {
            result: Some(Err(PipelineError::LoadFailure(reason.to_string()))),
            delay: Duration::ZERO,
        }
    }
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}
impl TableSource for ManualSource {
    fn describe(&self) -> String {
        "in-memory table".to_owned()
    }
    fn load(&mut self) -> Result<SampleTable, PipelineError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.result
            .take()
            .unwrap_or_else(|| Err(PipelineError::LoadFailure("source already drained".into())))
    }
}
/// A load running on a worker thread, bounded by a deadline.
pub struct PendingLoad {
    rx: Receiver<Result<SampleTable, PipelineError>>,
    deadline: Instant,
    origin: String,
}
impl PendingLoad {
    pub fn spawn(mut source: Box<dyn TableSource>, timeout: Duration, now: Instant) -> Self {
        let (tx, rx) = channel();
        let origin = source.describe();
        thread::spawn(move || {
            // The receiver may be gone after a timeout or teardown; nothing to do then.
            tx.send(source.load()).ok();
        });
        Self {
            rx,
            deadline: now + timeout,
            origin,
        }
    }
    pub fn origin(&self) -> &str {
        &self.origin
    }
    /// Returns the outcome once the worker finished or the deadline passed.
    pub fn poll(&self, now: Instant) -> Option<Result<SampleTable, PipelineError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Disconnected) => Some(Err(PipelineError::LoadFailure(format!(
                "{}: loader exited without a result",
                self.origin
            )))),
            Err(TryRecvError::Empty) if now >= self.deadline => Some(Err(
                PipelineError::LoadFailure(format!("{}: timed out", self.origin)),
            )),
            Err(TryRecvError::Empty) => None,
        }
    }
}
