mod coordinator;
pub mod form;
mod registry;
mod transport;
mod types;

pub use coordinator::BatchUploadCoordinator;
pub use registry::{candidates_in_folder, FileIntakeRegistry, IntakeReport};
pub use transport::HttpTransport;
pub use types::{BatchEvent, BatchSummary, CandidateFile, FileId, ItemStatus, TrackedFile};
