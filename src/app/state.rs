use super::terminal::Terminal;
use crate::search::SearchOutcome;
use crate::upload::{BatchEvent, BatchSummary, FileIntakeRegistry, IntakeReport, ItemStatus};
use derivative::Derivative;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Search,
    Upload,
}

/// Messages from background search work.
#[derive(Debug)]
pub enum SearchMessage {
    Connected(Result<usize, String>),
    Results(Result<SearchOutcome, String>),
}

#[derive(Derivative)]
#[derivative(Debug, Default)]
pub struct UploadState {
    pub registry: FileIntakeRegistry,
    /// Intake rejections waiting to be dismissed.
    pub notices: Vec<String>,
    pub is_uploading: bool,
    pub last_summary: Option<BatchSummary>,
    /// Outcomes seen so far in the running batch.
    pub progress: BatchSummary,
    pub error_message: Option<String>,
    #[derivative(Debug = "ignore")]
    pub event_receiver: Option<Receiver<BatchEvent>>,
}

impl UploadState {
    pub fn new(default_uploader: Option<String>) -> Self {
        Self {
            registry: FileIntakeRegistry::new(default_uploader),
            ..Self::default()
        }
    }

    pub fn record_intake(&mut self, report: IntakeReport) {
        if !report.accepted.is_empty() {
            log::info!("Added {} file(s)", report.accepted.len());
        }
        self.notices
            .extend(report.rejected.iter().map(|r| r.notice()));
    }

    /// Intake is refused while a batch is running.
    pub fn add_paths(&mut self, paths: &[PathBuf]) {
        if self.is_uploading {
            self.notices
                .push("Wait for the current upload to finish before adding files.".to_string());
            return;
        }
        let report = self
            .registry
            .submit_paths(paths.iter().map(|p| p.as_path()));
        self.record_intake(report);
    }

    pub fn begin(&mut self, receiver: Receiver<BatchEvent>, invalid: usize, already_uploaded: usize) {
        self.event_receiver = Some(receiver);
        self.is_uploading = true;
        self.error_message = None;
        self.progress = BatchSummary {
            invalid,
            already_uploaded,
            ..BatchSummary::default()
        };
    }

    /// Applies queued batch events. Returns true when anything changed.
    pub fn drain_events(&mut self) -> bool {
        let mut changed = false;
        loop {
            let Some(receiver) = &self.event_receiver else {
                return changed;
            };
            let event = match receiver.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => return changed,
                Err(TryRecvError::Disconnected) => {
                    log::error!("Upload worker stopped before finishing the batch");
                    let summary = self.progress;
                    self.finish(summary);
                    return true;
                }
            };

            changed = true;
            self.registry.apply(&event);
            match event {
                BatchEvent::Item { status, .. } => self.count(&status),
                BatchEvent::Finished(summary) => {
                    log::info!("Batch finished: {}", summary.describe());
                    self.finish(summary);
                }
            }
        }
    }

    fn count(&mut self, status: &ItemStatus) {
        match status {
            ItemStatus::Uploaded => {
                self.progress.attempted += 1;
                self.progress.uploaded += 1;
            }
            ItemStatus::Failed(_) | ItemStatus::NetworkError(_) => {
                self.progress.attempted += 1;
                self.progress.failed += 1;
            }
            _ => {}
        }
    }

    pub fn finish(&mut self, summary: BatchSummary) {
        self.is_uploading = false;
        self.event_receiver = None;
        self.error_message = if summary.failed > 0 || summary.invalid > 0 {
            Some("Some files were not uploaded. Fix them and press Upload All again.".to_string())
        } else {
            None
        };
        self.last_summary = Some(summary);
    }

    pub fn can_upload(&self) -> bool {
        !self.is_uploading && self.registry.pending_count() > 0
    }

    pub fn status_text(&self) -> String {
        let total = self.registry.len();
        let done = total - self.registry.pending_count();
        match (&self.last_summary, self.is_uploading) {
            (_, true) => format!("Uploading... {}/{} files uploaded", done, total),
            (Some(summary), false) => summary.describe(),
            (None, false) => format!("{} file(s) ready", total),
        }
    }
}

#[derive(Derivative)]
#[derivative(Debug, Default)]
pub struct SearchState {
    pub terminal: Terminal,
    pub query: String,
    pub is_searching: bool,
    pub connecting: bool,
    pub show_details: bool,
    pub focus_requested: bool,
    #[derivative(Debug = "ignore")]
    pub receiver: Option<Receiver<SearchMessage>>,
}

impl SearchState {
    pub fn busy(&self) -> bool {
        self.is_searching || self.connecting
    }
}
