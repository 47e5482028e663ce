use super::registry::FileIntakeRegistry;
use super::transport::UploadTransport;
use super::types::{BatchEvent, BatchSummary, FileId, ItemStatus, UploadJob};
use std::sync::mpsc::Sender;

/// Validated work for one batch, plus the counts known before any request.
#[derive(Debug, Default)]
pub struct BatchPlan {
    pub jobs: Vec<UploadJob>,
    pub invalid: usize,
    pub already_uploaded: usize,
}

/// Uploads tracked files one at a time, in the order they were added.
pub struct BatchUploadCoordinator<T> {
    transport: T,
}

impl<T: UploadTransport> BatchUploadCoordinator<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Validates every item not yet uploaded. Incomplete forms are marked
    /// `MissingInfo` and left out; the rest become jobs in insertion order.
    pub fn prepare(registry: &mut FileIntakeRegistry) -> BatchPlan {
        let mut plan = BatchPlan::default();

        for tracked in registry.iter_mut() {
            if tracked.uploaded {
                plan.already_uploaded += 1;
                continue;
            }
            match tracked.card.validate() {
                Err(missing) => {
                    log::info!("{} is missing {}", tracked.id, missing.join(", "));
                    tracked.status = ItemStatus::MissingInfo(missing);
                    plan.invalid += 1;
                }
                Ok(()) => plan.jobs.push(UploadJob {
                    id: tracked.id.clone(),
                    file_name: tracked.file.name.clone(),
                    path: tracked.file.path.clone(),
                    fields: tracked.card.form_pairs(),
                }),
            }
        }

        plan
    }

    async fn upload_one(&self, job: &UploadJob) -> ItemStatus {
        let outcome = self.transport.upload(job).await;
        if let Err(e) = &outcome {
            log::warn!("Upload of {} failed: {}", job.id, e);
        } else {
            log::info!("Uploaded {}", job.id);
        }
        ItemStatus::from_outcome(&outcome)
    }

    /// Runs a prepared batch, streaming each status change over `events`.
    /// A final `BatchEvent::Finished` carries the summary.
    pub async fn run(&self, plan: BatchPlan, events: &Sender<BatchEvent>) -> BatchSummary {
        let mut summary = BatchSummary {
            invalid: plan.invalid,
            already_uploaded: plan.already_uploaded,
            ..BatchSummary::default()
        };

        for job in &plan.jobs {
            send(events, &job.id, ItemStatus::Uploading);
            let status = self.upload_one(job).await;
            tally(&mut summary, &status);
            send(events, &job.id, status);
        }

        events.send(BatchEvent::Finished(summary)).unwrap_or_default();
        summary
    }

    /// Prepares and runs a batch directly against `registry`.
    pub async fn upload_all(&self, registry: &mut FileIntakeRegistry) -> BatchSummary {
        let plan = Self::prepare(registry);
        let mut summary = BatchSummary {
            invalid: plan.invalid,
            already_uploaded: plan.already_uploaded,
            ..BatchSummary::default()
        };

        for job in &plan.jobs {
            registry.apply(&BatchEvent::Item {
                id: job.id.clone(),
                status: ItemStatus::Uploading,
            });
            let status = self.upload_one(job).await;
            tally(&mut summary, &status);
            registry.apply(&BatchEvent::Item {
                id: job.id.clone(),
                status,
            });
        }

        summary
    }
}

fn send(events: &Sender<BatchEvent>, id: &FileId, status: ItemStatus) {
    events
        .send(BatchEvent::Item {
            id: id.clone(),
            status,
        })
        .unwrap_or_default();
}

fn tally(summary: &mut BatchSummary, status: &ItemStatus) {
    summary.attempted += 1;
    if *status == ItemStatus::Uploaded {
        summary.uploaded += 1;
    } else {
        summary.failed += 1;
    }
}
