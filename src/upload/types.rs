use super::form::{self, FormCard};
use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

pub const PDF_MIME: &str = "application/pdf";

/// `name-size` key used to spot the same file being added twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(String);

impl FileId {
    pub fn new(name: &str, size: u64) -> Self {
        Self(format!("{}-{}", name, size))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file offered for intake, before the PDF and duplicate checks.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub mime: Option<String>,
}

impl CandidateFile {
    /// Inspects a file on disk, sniffing its MIME type from the leading bytes.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| Error::io(path, e))?;
        let mime = infer::get_from_path(path)
            .map_err(|e| Error::io(path, e))?
            .map(|kind| kind.mime_type().to_string());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            path: path.to_path_buf(),
            size: metadata.len(),
            mime,
        })
    }

    pub fn id(&self) -> FileId {
        FileId::new(&self.name, self.size)
    }

    pub fn is_pdf(&self) -> bool {
        self.mime.as_deref() == Some(PDF_MIME)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ItemStatus {
    #[default]
    Pending,
    /// Required fields left empty; nothing was sent.
    MissingInfo(Vec<&'static str>),
    Uploading,
    Uploaded,
    /// The server answered with a non-success status.
    Failed(String),
    /// No response: connection trouble or the file could not be read.
    NetworkError(String),
}

impl ItemStatus {
    pub fn from_outcome(outcome: &Result<()>) -> Self {
        match outcome {
            Ok(()) => ItemStatus::Uploaded,
            Err(e) if e.is_transport() => ItemStatus::NetworkError(e.to_string()),
            Err(Error::Rejected {
                message: Some(m), ..
            }) => ItemStatus::Failed(m.clone()),
            Err(e) => ItemStatus::Failed(e.to_string()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "Pending",
            ItemStatus::MissingInfo(_) => "❌ Missing Info!",
            ItemStatus::Uploading => "Uploading...",
            ItemStatus::Uploaded => "✅ Uploaded",
            ItemStatus::Failed(_) => "❌ Failed",
            ItemStatus::NetworkError(_) => "❌ Network Error",
        }
    }

    pub fn detail(&self) -> Option<String> {
        match self {
            ItemStatus::MissingInfo(fields) => {
                let labels: Vec<&str> = fields.iter().map(|name| form::label_for(name)).collect();
                Some(format!("Required: {}", labels.join(", ")))
            }
            ItemStatus::Failed(reason) | ItemStatus::NetworkError(reason) => Some(reason.clone()),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            ItemStatus::MissingInfo(_) | ItemStatus::Failed(_) | ItemStatus::NetworkError(_)
        )
    }
}

/// An accepted PDF together with its metadata form.
#[derive(Debug, Clone)]
pub struct TrackedFile {
    pub id: FileId,
    pub file: CandidateFile,
    pub card: FormCard,
    pub status: ItemStatus,
    pub uploaded: bool,
}

/// Snapshot of one pending item, taken when a batch starts.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadJob {
    pub id: FileId,
    pub file_name: String,
    pub path: PathBuf,
    pub fields: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Item { id: FileId, status: ItemStatus },
    Finished(BatchSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub attempted: usize,
    pub uploaded: usize,
    pub failed: usize,
    /// Items held back by validation.
    pub invalid: usize,
    pub already_uploaded: usize,
}

impl BatchSummary {
    pub fn describe(&self) -> String {
        format!(
            "Uploaded {}/{} | ❌ Failed: {} | ⚠ Missing info: {} | ⏩ Already uploaded: {}",
            self.uploaded, self.attempted, self.failed, self.invalid, self.already_uploaded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL_PDF: &[u8] = b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n%%EOF\n";

    #[test]
    fn identifier_joins_name_and_size() {
        assert_eq!(FileId::new("physics.pdf", 2048).as_str(), "physics.pdf-2048");
    }

    #[test]
    fn sniffs_pdf_from_content_not_extension() {
        let dir = tempfile::tempdir().unwrap();

        let real = dir.path().join("notes.bin");
        let mut f = std::fs::File::create(&real).unwrap();
        f.write_all(MINIMAL_PDF).unwrap();

        let fake = dir.path().join("fake.pdf");
        std::fs::write(&fake, b"just some text").unwrap();

        let real = CandidateFile::from_path(&real).unwrap();
        assert!(real.is_pdf());
        assert_eq!(real.name, "notes.bin");
        assert_eq!(real.size, MINIMAL_PDF.len() as u64);

        let fake = CandidateFile::from_path(&fake).unwrap();
        assert!(!fake.is_pdf());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CandidateFile::from_path(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn outcome_maps_to_status() {
        assert_eq!(ItemStatus::from_outcome(&Ok(())), ItemStatus::Uploaded);

        let rejected = Err(Error::Rejected {
            status: 400,
            message: Some("Missing file part".into()),
        });
        assert_eq!(
            ItemStatus::from_outcome(&rejected),
            ItemStatus::Failed("Missing file part".into())
        );

        let unreadable = Err(Error::io(
            "/tmp/x.pdf",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        ));
        assert!(matches!(
            ItemStatus::from_outcome(&unreadable),
            ItemStatus::NetworkError(_)
        ));
    }

    #[test]
    fn missing_info_names_fields_by_label() {
        let status = ItemStatus::MissingInfo(vec!["admin_name", "exam_year"]);
        assert_eq!(
            status.detail().as_deref(),
            Some("Required: Your Name, Exam Year")
        );
    }
}
