/// Events emitted while the interaction pipeline runs.
///
/// A run is split into named phases. Phases that iterate over residues or residue
/// pairs open a task with a known step count and increment it once per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional callback.
///
/// The reporter is shared across worker threads, so the callback must be `Sync`.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Opens a task of `total_steps` items.
    pub fn start_task(&self, total_steps: usize) {
        self.report(Progress::TaskStart {
            total_steps: total_steps as u64,
        });
    }

    pub fn is_silent(&self) -> bool {
        self.callback.is_none()
    }
}

impl std::fmt::Debug for ProgressReporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("silent", &self.is_silent())
            .finish()
    }
}
