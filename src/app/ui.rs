use super::terminal::{Terminal, TerminalLine};
use super::{PaperArchiveApp, Tab};
use crate::upload::form::FieldKind;
use crate::upload::TrackedFile;
use crate::utils::color::{self, palette, status_color};
use crate::utils::file_size::format_size;
use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;

const CARD_WIDTH: f32 = 380.0;

impl PaperArchiveApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading("Exam Paper Archive");
                ui.add_space(20.0);
                ui.selectable_value(&mut self.tab, Tab::Search, "🔎 Search");
                ui.selectable_value(&mut self.tab, Tab::Upload, "📤 Upload");
            });
            ui.add_space(8.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Search => self.render_search(ui),
            Tab::Upload => self.render_upload(ctx, ui),
        });

        self.render_uploader_details(ctx);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (open_search, escape, details) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(egui::Key::K),
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::F),
            )
        });

        if open_search {
            self.tab = Tab::Search;
            self.search.focus_requested = true;
        }
        if escape {
            self.search.show_details = false;
        }
        if details
            && !ctx.wants_keyboard_input()
            && self.tab == Tab::Search
            && self.search.terminal.latest_results().next().is_some()
        {
            self.search.show_details = true;
        }
    }

    fn render_search(&mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(palette(color::TERMINAL_BG))
            .inner_margin(12.0)
            .rounding(6.0)
            .show(ui, |ui| {
                ui.set_min_size(ui.available_size());

                let input_height = 28.0;
                egui::ScrollArea::vertical()
                    .max_height(ui.available_height() - input_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| render_terminal(ui, &self.search.terminal));

                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(super::terminal::USER_PROMPT)
                            .monospace()
                            .color(palette(color::TERMINAL_PROMPT)),
                    );
                    let busy = self.search.busy();
                    let input = egui::TextEdit::singleline(&mut self.search.query)
                        .font(egui::TextStyle::Monospace)
                        .text_color(palette(color::TERMINAL_TEXT))
                        .frame(false)
                        .desired_width(ui.available_width())
                        .hint_text("search papers (e.g. phy 3rd 2024) or 'upload'");
                    let response = ui.add_enabled(!busy, input);

                    if self.search.focus_requested {
                        response.request_focus();
                        self.search.focus_requested = false;
                    }
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        self.submit_query();
                    }
                    if busy {
                        ui.spinner();
                    }
                });
            });
    }

    fn render_upload(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let stroke_color = if hovering {
            palette(color::UPLOADING)
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke.color
        };

        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(if hovering {
                        "Release to add the files"
                    } else {
                        "Drag & drop PDF files here"
                    });
                    ui.add_space(8.0);
                    ui.add_enabled_ui(!self.upload.is_uploading, |ui| {
                        ui.horizontal(|ui| {
                            if ui.button("📄 Select Files").clicked() {
                                if let Some(paths) =
                                    FileDialog::new().add_filter("PDF", &["pdf"]).pick_files()
                                {
                                    self.add_paths(&paths);
                                }
                            }
                            if ui.button("📁 Add Folder").clicked() {
                                if let Some(folder) = FileDialog::new().pick_folder() {
                                    self.add_folder(&folder);
                                }
                            }
                        });
                    });
                });
            });

        self.render_notices(ui);
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            let button =
                egui::Button::new("📤 Upload All").min_size(egui::vec2(200.0, 40.0));
            if ui.add_enabled(self.upload.can_upload(), button).clicked() {
                self.start_upload();
            }
            if self.upload.is_uploading {
                ui.spinner();
            }
            ui.label(self.upload.status_text());
        });

        if let Some(error) = &self.upload.error_message {
            ui.colored_label(palette(color::FAILED), error);
        }

        ui.add_space(10.0);

        if self.upload.registry.is_empty() {
            ui.label(
                RichText::new("No papers added yet.")
                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );
            return;
        }

        let editable = !self.upload.is_uploading;
        egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.with_layout(egui::Layout::left_to_right(Align::Min), |ui| {
                    for tracked in self.upload.registry.iter_mut() {
                        render_card(ui, tracked, editable);
                    }
                });
            });
    }

    fn render_notices(&mut self, ui: &mut egui::Ui) {
        if self.upload.notices.is_empty() {
            return;
        }

        ui.add_space(8.0);
        let mut dismissed = None;
        ui.group(|ui| {
            for (index, notice) in self.upload.notices.iter().enumerate() {
                ui.horizontal(|ui| {
                    if ui.small_button("✖").clicked() {
                        dismissed = Some(index);
                    }
                    ui.colored_label(palette(color::UPLOADING), notice);
                });
            }
            if self.upload.notices.len() > 1 && ui.button("Dismiss all").clicked() {
                dismissed = Some(usize::MAX);
            }
        });

        match dismissed {
            Some(usize::MAX) => self.upload.notices.clear(),
            Some(index) => {
                self.upload.notices.remove(index);
            }
            None => {}
        }
    }

    fn render_uploader_details(&mut self, ctx: &egui::Context) {
        if !self.search.show_details {
            return;
        }

        let mut open = true;
        egui::Window::new("Paper Upload Details")
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().max_height(400.0).show(ui, |ui| {
                    for paper in self.search.terminal.latest_results() {
                        ui.label(RichText::new(paper.title()).strong());
                        ui.horizontal(|ui| {
                            ui.label("Uploader:");
                            ui.colored_label(palette(color::TERMINAL_LINK), paper.uploader());
                            ui.add_space(12.0);
                            ui.label("Date:");
                            ui.colored_label(palette(color::TERMINAL_LINK), paper.upload_month());
                        });
                        ui.separator();
                    }
                });
                ui.label(
                    RichText::new("Press Esc to close")
                        .small()
                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                );
            });

        self.search.show_details = open;
    }
}

fn render_terminal(ui: &mut egui::Ui, terminal: &Terminal) {
    for line in &terminal.lines {
        match line {
            TerminalLine::Comment(text) => {
                ui.label(
                    RichText::new(text)
                        .monospace()
                        .color(palette(color::TERMINAL_COMMENT)),
                );
            }
            TerminalLine::Text(text) => {
                ui.label(
                    RichText::new(text)
                        .monospace()
                        .color(palette(color::TERMINAL_TEXT)),
                );
            }
            TerminalLine::Command { prompt, command } => {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(*prompt)
                            .monospace()
                            .color(palette(color::TERMINAL_PROMPT)),
                    );
                    ui.label(RichText::new(command).monospace().color(Color32::WHITE));
                });
            }
            TerminalLine::Result(index) => {
                let Some(paper) = terminal.results.get(*index) else {
                    continue;
                };
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!("[{}]", paper.exam_year))
                            .monospace()
                            .color(palette(color::TERMINAL_TEXT)),
                    );
                    let link = egui::Label::new(
                        RichText::new(paper.title())
                            .monospace()
                            .underline()
                            .color(palette(color::TERMINAL_LINK)),
                    )
                    .sense(egui::Sense::click());

                    let response = ui
                        .add(link)
                        .on_hover_text(format!("Uploaded by {}", paper.uploader()));
                    if response.clicked() && !paper.url.is_empty() {
                        if let Err(e) = open::that(&paper.url) {
                            log::error!("Could not open {}: {}", paper.url, e);
                        }
                    }
                });
            }
        }
    }
}

fn render_card(ui: &mut egui::Ui, tracked: &mut TrackedFile, editable: bool) {
    let border = if tracked.status.is_error() {
        palette(color::FAILED)
    } else {
        ui.visuals().widgets.noninteractive.bg_stroke.color
    };

    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.5, border))
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            ui.vertical(|ui| {
                ui.label(RichText::new(&tracked.file.name).strong())
                    .on_hover_text(tracked.file.path.display().to_string());
                ui.label(
                    RichText::new(format_size(tracked.file.size))
                        .small()
                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                );
                ui.add_space(4.0);

                let badge = status_color(&tracked.status);
                egui::Frame::none()
                    .fill(badge)
                    .rounding(4.0)
                    .inner_margin(egui::Margin::symmetric(8.0, 4.0))
                    .show(ui, |ui| {
                        ui.label(RichText::new(tracked.status.label()).color(Color32::WHITE));
                    });
                if let Some(detail) = tracked.status.detail() {
                    ui.colored_label(badge, detail);
                }
                ui.add_space(8.0);

                let card_editable = editable && !tracked.uploaded;
                let id = tracked.id.clone();
                ui.add_enabled_ui(card_editable, |ui| {
                    egui::Grid::new(("fields", id.as_str()))
                        .num_columns(2)
                        .spacing([8.0, 6.0])
                        .show(ui, |ui| {
                            for (spec, value) in tracked.card.fields_mut() {
                                ui.label(spec.label);
                                match spec.kind {
                                    FieldKind::Text => {
                                        ui.add(
                                            egui::TextEdit::singleline(value)
                                                .hint_text(spec.hint)
                                                .desired_width(200.0),
                                        );
                                    }
                                    FieldKind::Select(options) => {
                                        let shown = if value.is_empty() {
                                            spec.hint.to_string()
                                        } else {
                                            value.clone()
                                        };
                                        egui::ComboBox::from_id_source((id.as_str(), spec.name))
                                            .selected_text(shown)
                                            .width(200.0)
                                            .show_ui(ui, |ui| {
                                                for option in options {
                                                    ui.selectable_value(
                                                        value,
                                                        option.to_string(),
                                                        *option,
                                                    );
                                                }
                                            });
                                    }
                                }
                                ui.end_row();
                            }
                        });
                });
            });
        });
}
