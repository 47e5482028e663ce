mod state;
mod terminal;
mod ui;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::search::{demo, SearchClient};
use crate::upload::{
    candidates_in_folder, BatchEvent, BatchSummary, BatchUploadCoordinator, HttpTransport,
    ItemStatus,
};
use eframe::{egui, App};
pub use state::{SearchMessage, SearchState, Tab, UploadState};
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use terminal::QueryAction;
use tokio::runtime::Runtime;

fn background_runtime() -> Result<Runtime> {
    Runtime::new().map_err(Error::Runtime)
}

pub struct PaperArchiveApp {
    tab: Tab,
    upload: UploadState,
    search: SearchState,
    transport: Option<HttpTransport>,
    search_client: Option<SearchClient>,
}

impl PaperArchiveApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        log::info!("Starting exam paper archive client for {}", config.server_url);

        let mut upload = UploadState::new(config.default_uploader.clone());
        let transport = match HttpTransport::new(&config) {
            Ok(transport) => Some(transport),
            Err(e) => {
                log::error!("Upload client unavailable: {}", e);
                upload.error_message = Some(format!("Uploads disabled: {}", e));
                None
            }
        };

        let search_client = match SearchClient::new(&config) {
            Ok(client) => Some(client),
            Err(e) => {
                log::error!("Search client unavailable: {}", e);
                None
            }
        };

        let mut app = Self {
            tab: Tab::default(),
            upload,
            search: SearchState::default(),
            transport,
            search_client,
        };
        app.connect();
        app
    }

    fn connect(&mut self) {
        self.search.terminal.welcome();

        let Some(client) = self.search_client.clone() else {
            self.search
                .terminal
                .connection_failed(demo::sample_papers().len());
            return;
        };

        let (sender, receiver) = std_mpsc::channel();
        self.search.receiver = Some(receiver);
        self.search.connecting = true;

        std::thread::spawn(move || {
            let result = match background_runtime() {
                Ok(rt) => rt.block_on(client.connect()),
                Err(e) => Err(e),
            };
            let message = SearchMessage::Connected(result.map_err(|e| e.to_string()));
            sender.send(message).unwrap_or_default();
        });
    }

    pub fn submit_query(&mut self) {
        if self.search.busy() {
            return;
        }
        let input = std::mem::take(&mut self.search.query);
        match QueryAction::parse(&input) {
            QueryAction::Empty => self.search.terminal.empty_query(),
            QueryAction::OpenUpload => {
                let demo = self.search_client.as_ref().map_or(true, |c| c.is_demo());
                self.search.terminal.opening_upload(demo);
                self.tab = Tab::Upload;
            }
            QueryAction::Search(query) => self.start_search(query),
        }
    }

    fn start_search(&mut self, query: String) {
        self.search.terminal.begin_search(&query);

        let client = match &self.search_client {
            Some(client) => client.clone(),
            None => {
                self.search.terminal.search_failed();
                return;
            }
        };

        let (sender, receiver) = std_mpsc::channel();
        self.search.receiver = Some(receiver);
        self.search.is_searching = true;

        std::thread::spawn(move || {
            let result = match background_runtime() {
                Ok(rt) => rt.block_on(client.search(&query)),
                Err(e) => Err(e),
            };
            let message = SearchMessage::Results(result.map_err(|e| e.to_string()));
            sender.send(message).unwrap_or_default();
        });
    }

    pub fn add_paths(&mut self, paths: &[PathBuf]) {
        self.upload.add_paths(paths);
    }

    pub fn add_folder(&mut self, folder: &Path) {
        log::info!("Scanning folder: {}", folder.display());
        let paths = candidates_in_folder(folder);
        if paths.is_empty() {
            self.upload
                .notices
                .push(format!("No files found in {}", folder.display()));
            return;
        }
        self.add_paths(&paths);
    }

    pub fn start_upload(&mut self) {
        let Some(transport) = self.transport.clone() else {
            self.upload.error_message = Some("Uploads are disabled; check the server URL.".into());
            return;
        };

        let plan = BatchUploadCoordinator::<HttpTransport>::prepare(&mut self.upload.registry);
        log::info!(
            "Starting batch: {} to upload, {} missing info, {} already uploaded",
            plan.jobs.len(),
            plan.invalid,
            plan.already_uploaded
        );

        if plan.jobs.is_empty() {
            self.upload.finish(BatchSummary {
                invalid: plan.invalid,
                already_uploaded: plan.already_uploaded,
                ..BatchSummary::default()
            });
            return;
        }

        let (sender, receiver) = std_mpsc::channel();
        self.upload
            .begin(receiver, plan.invalid, plan.already_uploaded);

        std::thread::spawn(move || match background_runtime() {
            Ok(rt) => {
                let coordinator = BatchUploadCoordinator::new(transport);
                rt.block_on(coordinator.run(plan, &sender));
            }
            Err(e) => {
                log::error!("{}", e);
                let mut summary = BatchSummary {
                    invalid: plan.invalid,
                    already_uploaded: plan.already_uploaded,
                    ..BatchSummary::default()
                };
                for job in plan.jobs {
                    summary.attempted += 1;
                    summary.failed += 1;
                    let status = ItemStatus::NetworkError(e.to_string());
                    sender
                        .send(BatchEvent::Item { id: job.id, status })
                        .unwrap_or_default();
                }
                sender
                    .send(BatchEvent::Finished(summary))
                    .unwrap_or_default();
            }
        });
    }

    fn drain_search_messages(&mut self) -> bool {
        let messages: Vec<SearchMessage> = match &self.search.receiver {
            Some(receiver) => receiver.try_iter().collect(),
            None => return false,
        };

        for message in &messages {
            match message {
                SearchMessage::Connected(Ok(count)) => {
                    let demo = self.search_client.as_ref().map_or(false, |c| c.is_demo());
                    self.search.terminal.connected(*count, demo);
                    self.search.connecting = false;
                }
                SearchMessage::Connected(Err(e)) => {
                    log::warn!("Connection to archives failed: {}", e);
                    if let Some(client) = &mut self.search_client {
                        client.enable_demo();
                    }
                    self.search
                        .terminal
                        .connection_failed(demo::sample_papers().len());
                    self.search.connecting = false;
                }
                SearchMessage::Results(Ok(outcome)) => {
                    self.search.terminal.show_outcome(outcome.clone());
                    self.search.is_searching = false;
                }
                SearchMessage::Results(Err(e)) => {
                    log::error!("Search error: {}", e);
                    self.search.terminal.search_failed();
                    self.search.is_searching = false;
                }
            }
        }

        if !self.search.busy() {
            self.search.receiver = None;
        }
        !messages.is_empty()
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let had_updates = self.upload.drain_events() | self.drain_search_messages();

        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.tab = Tab::Upload;
            self.add_paths(&dropped);
        }

        if had_updates || self.upload.is_uploading || self.search.busy() {
            ctx.request_repaint();
        }
    }
}

impl App for PaperArchiveApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
