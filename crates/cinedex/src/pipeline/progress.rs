/// Events emitted while extracting or organizing.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Phase { message: String },
    Warning { message: String },
    Completed { summary: String },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Prints progress for a person watching the terminal. Warnings go to
/// stderr so they survive stdout redirection.
pub struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Phase { message } => println!("{}", message),
            ProgressEvent::Warning { message } => eprintln!("warning: {}", message),
            ProgressEvent::Completed { summary } => println!("{}", summary),
        }
    }
}

/// Records every event; used to assert on what a run reported.
#[derive(Default)]
pub struct RecordingProgress {
    events: std::sync::Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Warning { .. }))
            .count()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
