mod config_dialog;
mod notice;

use std::path::{Path, PathBuf};

use eframe::{egui, App, Frame, NativeOptions};
use egui::{Align2, RichText};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wadlauncher_core::{list_archives, ConfigEditor, Listing};
use wadlauncher_runexec::{EngineLauncher, LaunchError, LaunchSpec};
use wadlauncher_settings::{default_preferences_path, PreferencesStore};

use crate::config_dialog::ConfigDialog;
use crate::notice::NoticeQueue;

const APP_TITLE: &str = "WAD Launcher";
const DEFAULT_ENGINE_COMMAND: &str = "crispy-doom";
const ENGINE_LABEL_LIMIT: usize = 50;
const ENGINE_LABEL_KEEP: usize = 47;

/// First-run configuration, walked once after preferences load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetupStep {
    EngineCommand,
    WadDirectory,
    Done,
}

#[derive(Debug, Clone)]
struct EnginePrompt {
    input: String,
    initial_setup: bool,
}

enum PromptResult {
    Pending,
    Submitted(String),
    Cancelled,
}

struct LauncherApp {
    store: PreferencesStore,
    listing: Listing,
    selected: Option<usize>,
    setup: SetupStep,
    engine_prompt: Option<EnginePrompt>,
    config_dialog: Option<ConfigDialog>,
    notices: NoticeQueue,
}

impl LauncherApp {
    fn new(preferences_path: PathBuf) -> Self {
        let store = PreferencesStore::load(preferences_path);
        info!(path = %store.path().display(), "preferences loaded");
        let mut app = Self {
            store,
            listing: Listing::NotConfigured,
            selected: None,
            setup: SetupStep::EngineCommand,
            engine_prompt: None,
            config_dialog: None,
            notices: NoticeQueue::default(),
        };
        app.refresh_archives();
        app
    }

    fn engine_command(&self) -> Option<&str> {
        self.store.preferences().engine_command.as_deref()
    }

    /// Runs the next first-run step once the previous one is resolved.
    fn advance_setup(&mut self) {
        if self.engine_prompt.is_some() {
            return;
        }
        match self.setup {
            SetupStep::EngineCommand => {
                if self.store.preferences().needs_engine_command() {
                    self.engine_prompt = Some(EnginePrompt {
                        input: DEFAULT_ENGINE_COMMAND.to_string(),
                        initial_setup: true,
                    });
                } else {
                    self.setup = SetupStep::WadDirectory;
                }
            }
            SetupStep::WadDirectory => {
                self.setup = SetupStep::Done;
                if self.store.preferences().needs_wad_dir() && !self.choose_wad_dir() {
                    self.notices.info(
                        "Setup",
                        "No WAD directory selected. You can choose one later with \
                         \"Change WAD Directory\".",
                    );
                }
            }
            SetupStep::Done => {}
        }
    }

    fn refresh_archives(&mut self) {
        let dir = self.store.preferences().wad_dir.clone();
        self.listing = match list_archives(dir.as_deref()) {
            Ok(listing) => listing,
            Err(err) => {
                error!(error = %err, "archive listing failed");
                self.notices
                    .error("Error", format!("Could not read the WAD directory:\n{err}"));
                Listing::NotConfigured
            }
        };
        self.selected = if self.listing.entries().is_empty() {
            None
        } else {
            Some(0)
        };
    }

    /// Opens the folder picker and stores the choice. Returns whether a
    /// directory was chosen.
    fn choose_wad_dir(&mut self) -> bool {
        let initial = self.store.preferences().wad_dir.clone();
        let Some(dir) = pick_wad_dir(initial.as_deref()) else {
            return false;
        };
        if let Err(err) = self.store.update(|prefs| prefs.wad_dir = Some(dir)) {
            self.notices
                .error("Error", format!("Could not save preferences:\n{err}"));
        }
        self.refresh_archives();
        true
    }

    fn open_engine_prompt(&mut self) {
        self.engine_prompt = Some(EnginePrompt {
            input: self.engine_command().unwrap_or_default().to_string(),
            initial_setup: false,
        });
    }

    fn finish_engine_prompt(&mut self, ctx: &egui::Context, result: PromptResult, initial: bool) {
        let submitted = match result {
            PromptResult::Pending => return,
            PromptResult::Submitted(input) => input.trim().to_string(),
            PromptResult::Cancelled => {
                self.engine_prompt = None;
                if initial {
                    info!("initial engine setup cancelled, closing");
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                } else {
                    self.notices
                        .info("Cancelled", "The engine command was not changed.");
                }
                return;
            }
        };
        self.engine_prompt = None;

        if submitted.is_empty() {
            if initial {
                info!("empty engine command during initial setup, closing");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            } else {
                self.notices
                    .warning("Invalid Input", "The engine command cannot be empty.");
            }
            return;
        }

        match self
            .store
            .update(|prefs| prefs.engine_command = Some(submitted.clone()))
        {
            Ok(()) => {
                self.notices.info(
                    "Engine Configured",
                    format!("Engine command set to:\n{submitted}"),
                );
            }
            Err(err) => {
                self.notices
                    .error("Error", format!("Could not save preferences:\n{err}"));
            }
        }
        if initial {
            self.setup = SetupStep::WadDirectory;
        }
        self.refresh_archives();
    }

    fn open_config_editor(&mut self) {
        let stored = self
            .store
            .preferences()
            .config_file
            .clone()
            .filter(|path| path.is_file());
        let path = match stored {
            Some(path) => path,
            None => {
                let start = self.store.preferences().wad_dir.clone();
                let Some(path) = pick_config_file(start.as_deref()) else {
                    self.notices
                        .warning("No File", "No valid configuration file was selected.");
                    return;
                };
                let remembered = path.clone();
                if let Err(err) = self
                    .store
                    .update(|prefs| prefs.config_file = Some(remembered))
                {
                    self.notices
                        .error("Error", format!("Could not save preferences:\n{err}"));
                }
                path
            }
        };

        match ConfigEditor::open(&path) {
            Ok(editor) => self.config_dialog = Some(ConfigDialog::new(editor)),
            Err(err) => self.notices.error(
                "Error",
                format!("Could not load {}:\n{err}", path.display()),
            ),
        }
    }

    fn launch_selected(&mut self) {
        let Some(archive) = self
            .selected
            .and_then(|index| self.listing.entries().get(index))
            .map(|entry| entry.path.clone())
        else {
            self.notices
                .warning("No Selection", "Please select a WAD file from the list.");
            return;
        };
        let Some(command) = self.engine_command().map(str::to_string) else {
            self.notices
                .warning("No Engine", "Please configure the engine command first.");
            return;
        };

        let result = LaunchSpec::for_archive(&command, &archive)
            .and_then(|spec| EngineLauncher::launch(&spec).map(|engine| (spec, engine)));
        match result {
            Ok((spec, engine)) => {
                info!(pid = engine.pid, command = %spec.command_line(), "engine started");
            }
            Err(err) => {
                let body = match &err {
                    LaunchError::NotFound { program } => format!(
                        "The engine executable '{program}' was not found.\n\
                         Check the engine command with \"Configure Engine\"."
                    ),
                    LaunchError::Tokenize(_) | LaunchError::EmptyCommand => {
                        format!("The engine command could not be parsed:\n{err}")
                    }
                    _ => format!("Could not start the engine:\n{err}"),
                };
                self.notices.error("Launch Error", body);
            }
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("engine_header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Engine:").strong());
                match self.engine_command() {
                    Some(command) => {
                        ui.label(abbreviate_command(command)).on_hover_text(command);
                    }
                    None => {
                        ui.label(RichText::new("Not configured").italics().weak());
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Configure Engine").clicked() {
                        self.open_engine_prompt();
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    fn show_buttons(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("launcher_buttons").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let can_run =
                    !self.listing.entries().is_empty() && self.engine_command().is_some();
                if ui.add_enabled(can_run, egui::Button::new("Run")).clicked() {
                    self.launch_selected();
                }
                if ui.button("Edit Configuration").clicked() {
                    self.open_config_editor();
                }
                if ui.button("Change WAD Directory").clicked() {
                    self.choose_wad_dir();
                }
                if ui.button("Refresh").clicked() {
                    self.refresh_archives();
                }
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
            ui.add_space(6.0);
        });
    }

    fn show_archives(&mut self, ctx: &egui::Context) {
        let mut launch = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(dir) = &self.store.preferences().wad_dir {
                ui.label(RichText::new(dir.display().to_string()).weak());
                ui.separator();
            }
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match &self.listing {
                    Listing::NotConfigured => {
                        ui.label(
                            RichText::new("WAD directory not configured or missing.").italics(),
                        );
                    }
                    Listing::Archives(entries) if entries.is_empty() => {
                        ui.label(
                            RichText::new("No .WAD files found in this directory.").italics(),
                        );
                    }
                    Listing::Archives(entries) => {
                        for (index, entry) in entries.iter().enumerate() {
                            let selected = self.selected == Some(index);
                            let response =
                                ui.selectable_label(selected, entry.file_name.as_str());
                            if response.clicked() {
                                self.selected = Some(index);
                            }
                            if response.double_clicked() {
                                self.selected = Some(index);
                                launch = true;
                            }
                        }
                    }
                });
        });
        if launch {
            self.launch_selected();
        }
    }

    fn show_engine_prompt(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.engine_prompt.as_mut() else {
            return;
        };
        let initial = prompt.initial_setup;
        let mut result = PromptResult::Pending;
        egui::Window::new("Configure Engine")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Enter the command used to start the Doom engine:");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut prompt.input).desired_width(360.0),
                );
                let submitted_with_enter =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() || submitted_with_enter {
                        result = PromptResult::Submitted(prompt.input.clone());
                    }
                    if ui.button("Cancel").clicked() {
                        result = PromptResult::Cancelled;
                    }
                });
            });
        self.finish_engine_prompt(ctx, result, initial);
    }

    fn show_config_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.config_dialog.as_mut() else {
            return;
        };
        if !dialog.show(ctx, &mut self.notices) {
            self.config_dialog = None;
        }
    }
}

impl App for LauncherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if self.notices.is_empty() {
            self.advance_setup();
        }
        self.show_header(ctx);
        self.show_buttons(ctx);
        self.show_archives(ctx);
        self.show_engine_prompt(ctx);
        self.show_config_dialog(ctx);
        self.notices.show(ctx);
    }
}

/// Shortens long engine commands for the header label.
fn abbreviate_command(command: &str) -> String {
    if command.chars().count() > ENGINE_LABEL_LIMIT {
        let kept: String = command.chars().take(ENGINE_LABEL_KEEP).collect();
        format!("{kept}...")
    } else {
        command.to_string()
    }
}

fn pick_wad_dir(initial: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new().set_title("Select WAD Directory");
    if let Some(dir) = initial.filter(|dir| dir.is_dir()) {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_folder()
}

fn pick_config_file(initial: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Select Engine Configuration File")
        .add_filter("Config files", &["cfg"])
        .add_filter("All files", &["*"]);
    if let Some(dir) = initial.filter(|dir| dir.is_dir()) {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file()
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([550.0, 500.0])
            .with_title(APP_TITLE),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Box::new(LauncherApp::new(default_preferences_path()))),
    )
}
