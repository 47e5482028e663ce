use super::form::FormCard;
use super::types::{BatchEvent, CandidateFile, FileId, ItemStatus, TrackedFile};
use ignore::Walk;
use indexmap::IndexMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    NotPdf(String),
    Duplicate(String),
    Unreadable(String),
}

impl Rejection {
    pub fn notice(&self) -> String {
        match self {
            Rejection::NotPdf(name) => format!("'{}' is not a PDF and will be ignored.", name),
            Rejection::Duplicate(name) => format!("'{}' has already been added.", name),
            Rejection::Unreadable(reason) => reason.clone(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct IntakeReport {
    pub accepted: Vec<FileId>,
    pub rejected: Vec<Rejection>,
}

/// Insertion-ordered set of accepted PDFs, keyed by `name-size`.
#[derive(Debug, Default)]
pub struct FileIntakeRegistry {
    files: IndexMap<FileId, TrackedFile>,
    default_uploader: Option<String>,
}

impl FileIntakeRegistry {
    pub fn new(default_uploader: Option<String>) -> Self {
        Self {
            files: IndexMap::new(),
            default_uploader,
        }
    }

    pub fn submit<I>(&mut self, candidates: I) -> IntakeReport
    where
        I: IntoIterator<Item = CandidateFile>,
    {
        let mut report = IntakeReport::default();

        for candidate in candidates {
            if !candidate.is_pdf() {
                log::info!(
                    "Rejected {} (type {})",
                    candidate.name,
                    candidate.mime.as_deref().unwrap_or("unknown")
                );
                report.rejected.push(Rejection::NotPdf(candidate.name));
                continue;
            }

            let id = candidate.id();
            if self.files.contains_key(&id) {
                log::info!("Rejected duplicate {}", id);
                report.rejected.push(Rejection::Duplicate(candidate.name));
                continue;
            }

            log::info!("Tracking {}", id);
            let card = FormCard::new(self.default_uploader.as_deref());
            self.files.insert(
                id.clone(),
                TrackedFile {
                    id: id.clone(),
                    file: candidate,
                    card,
                    status: ItemStatus::Pending,
                    uploaded: false,
                },
            );
            report.accepted.push(id);
        }

        report
    }

    /// Inspects `paths` on disk and submits them; unreadable paths are reported.
    pub fn submit_paths<'a, I>(&mut self, paths: I) -> IntakeReport
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut unreadable = Vec::new();
        let mut candidates = Vec::new();
        for path in paths {
            match CandidateFile::from_path(path) {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => {
                    log::warn!("{}", e);
                    unreadable.push(Rejection::Unreadable(e.to_string()));
                }
            }
        }

        let mut report = self.submit(candidates);
        report.rejected.extend(unreadable);
        report
    }

    pub fn apply(&mut self, event: &BatchEvent) {
        let BatchEvent::Item { id, status } = event else {
            return;
        };
        let Some(tracked) = self.files.get_mut(id) else {
            log::warn!("Status update for unknown file {}", id);
            return;
        };
        if tracked.uploaded {
            return;
        }
        if *status == ItemStatus::Uploaded {
            tracked.uploaded = true;
        }
        tracked.status = status.clone();
    }

    pub fn get(&self, id: &FileId) -> Option<&TrackedFile> {
        self.files.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedFile> {
        self.files.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrackedFile> {
        self.files.values_mut()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.files.values().filter(|f| !f.uploaded).count()
    }
}

/// Every regular file under `folder`, skipping whatever ignore files exclude.
pub fn candidates_in_folder(folder: &Path) -> Vec<std::path::PathBuf> {
    let mut paths: Vec<_> = Walk::new(folder)
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.into_path())
        .collect();
    paths.sort();
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn pdf(name: &str, size: u64) -> CandidateFile {
        CandidateFile {
            name: name.to_string(),
            path: PathBuf::from(format!("/papers/{}", name)),
            size,
            mime: Some("application/pdf".to_string()),
        }
    }

    #[test]
    fn non_pdf_creates_no_card() {
        let mut registry = FileIntakeRegistry::default();
        let mut image = pdf("scan.png", 10);
        image.mime = Some("image/png".into());
        let mut unknown = pdf("blob", 10);
        unknown.mime = None;

        let report = registry.submit(vec![image, unknown]);

        assert!(registry.is_empty());
        assert!(report.accepted.is_empty());
        assert_eq!(
            report.rejected[0].notice(),
            "'scan.png' is not a PDF and will be ignored."
        );
        assert_eq!(report.rejected[1], Rejection::NotPdf("blob".into()));
    }

    #[test]
    fn same_name_and_size_tracked_once() {
        let mut registry = FileIntakeRegistry::default();

        registry.submit(vec![pdf("maths.pdf", 500)]);
        let report = registry.submit(vec![pdf("maths.pdf", 500), pdf("maths.pdf", 501)]);

        assert_eq!(registry.len(), 2);
        assert_eq!(report.accepted, vec![FileId::new("maths.pdf", 501)]);
        assert_eq!(
            report.rejected,
            vec![Rejection::Duplicate("maths.pdf".into())]
        );
    }

    #[test]
    fn duplicates_within_one_drop_are_caught() {
        let mut registry = FileIntakeRegistry::default();
        let report = registry.submit(vec![pdf("a.pdf", 1), pdf("a.pdf", 1)]);
        assert_eq!(registry.len(), 1);
        assert_eq!(report.rejected.len(), 1);
    }

    #[test]
    fn cards_follow_insertion_order_and_prefill_uploader() {
        let mut registry = FileIntakeRegistry::new(Some("Alvido".into()));
        registry.submit(vec![pdf("z.pdf", 1), pdf("a.pdf", 2), pdf("m.pdf", 3)]);

        let names: Vec<_> = registry.iter().map(|f| f.file.name.as_str()).collect();
        assert_eq!(names, vec!["z.pdf", "a.pdf", "m.pdf"]);
        assert!(registry
            .iter()
            .all(|f| f.card.get("admin_name") == Some("Alvido")));
    }

    #[test]
    fn uploaded_flag_never_reverts() {
        let mut registry = FileIntakeRegistry::default();
        registry.submit(vec![pdf("a.pdf", 1)]);
        let id = FileId::new("a.pdf", 1);

        registry.apply(&BatchEvent::Item {
            id: id.clone(),
            status: ItemStatus::Uploaded,
        });
        registry.apply(&BatchEvent::Item {
            id: id.clone(),
            status: ItemStatus::Failed("late".into()),
        });

        let tracked = registry.get(&id).unwrap();
        assert!(tracked.uploaded);
        assert_eq!(tracked.status, ItemStatus::Uploaded);
        assert_eq!(registry.pending_count(), 0);
    }

    #[test]
    fn folder_intake_rejects_non_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("paper.pdf"), b"%PDF-1.4\n%%EOF\n").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"hello").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/other.pdf"), b"%PDF-1.5\n%%EOF\n").unwrap();

        let paths = candidates_in_folder(dir.path());
        assert_eq!(paths.len(), 3);

        let mut registry = FileIntakeRegistry::default();
        let report = registry.submit_paths(paths.iter().map(|p| p.as_path()));

        assert_eq!(registry.len(), 2);
        assert_eq!(
            report.rejected,
            vec![Rejection::NotPdf("readme.txt".into())]
        );
    }

    #[test]
    fn unreadable_path_is_reported_not_tracked() {
        let mut registry = FileIntakeRegistry::default();
        let report = registry.submit_paths([Path::new("/no/such/paper.pdf")]);
        assert!(registry.is_empty());
        assert!(matches!(report.rejected[0], Rejection::Unreadable(_)));
    }
}
