//! RestoLens Main Application
//! Main window with sidebar navigation and chart panel.

use crate::charts::StaticChartRenderer;
use crate::config::AppConfig;
use crate::data::{SourceLoader, TablePreparer};
use crate::gui::{ChartView, Sidebar, SidebarAction};
use crate::stats::{SummaryCalculator, View, ViewSummary};
use egui::SidePanel;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use tracing::{error, warn};

/// Load cycle result from the background thread
enum LoadResult {
    Progress(String),
    Complete {
        row_count: usize,
        summaries: HashMap<View, Result<ViewSummary, String>>,
    },
    Error(String),
}

/// Main application window.
pub struct RestoLensApp {
    config: AppConfig,
    sidebar: Sidebar,
    chart_view: ChartView,

    /// One cached summary (or error) per view, replaced wholesale on reload.
    summaries: HashMap<View, Result<ViewSummary, String>>,

    // Async load cycle
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl RestoLensApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::load_or_default();
        let mut sidebar = Sidebar::new();
        sidebar.restaurants_path = config.restaurants_csv.clone();
        sidebar.lookup_path = config.country_workbook.clone();
        if let Some(label) = &config.last_view {
            match View::from_label(label) {
                Ok(view) => sidebar.selected = view,
                Err(e) => warn!("{e}, falling back to the default view"),
            }
        }

        let mut app = Self {
            config,
            sidebar,
            chart_view: ChartView::new(),
            summaries: HashMap::new(),
            load_rx: None,
            is_loading: false,
        };

        // Both sources remembered from last time: load right away.
        if app.sidebar.restaurants_path.is_some() && app.sidebar.lookup_path.is_some() {
            app.start_load();
        }
        app
    }

    fn handle_browse_restaurants(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.sidebar.restaurants_path = Some(path);
        }
    }

    fn handle_browse_lookup(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Excel Files", &["xlsx", "xls"])
            .pick_file()
        {
            self.sidebar.lookup_path = Some(path);
        }
    }

    /// Kick off the load cycle in a background thread.
    fn start_load(&mut self) {
        if self.is_loading {
            return;
        }
        let (Some(restaurants), Some(lookup)) = (
            self.sidebar.restaurants_path.clone(),
            self.sidebar.lookup_path.clone(),
        ) else {
            self.sidebar.set_status("Select both source files first");
            return;
        };

        self.summaries.clear();
        self.sidebar.row_count = None;
        self.is_loading = true;
        self.sidebar.set_status("Loading sources...");

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            Self::run_load(tx, restaurants, lookup);
        });
    }

    /// Load, prepare and summarize (called from the background thread).
    /// Preparation failures abort the cycle; per-view failures are cached
    /// per view so the rest of the menu still works.
    fn run_load(tx: Sender<LoadResult>, restaurants: PathBuf, lookup: PathBuf) {
        let _ = tx.send(LoadResult::Progress("Reading restaurant CSV...".to_string()));
        let restaurants = match SourceLoader::load_restaurants(&restaurants) {
            Ok(df) => df,
            Err(e) => {
                let _ = tx.send(LoadResult::Error(e.to_string()));
                return;
            }
        };

        let _ = tx.send(LoadResult::Progress("Reading country lookup...".to_string()));
        let lookup = match SourceLoader::load_country_lookup(&lookup) {
            Ok(df) => df,
            Err(e) => {
                let _ = tx.send(LoadResult::Error(e.to_string()));
                return;
            }
        };

        let _ = tx.send(LoadResult::Progress("Preparing cleaned table...".to_string()));
        let table = match TablePreparer::prepare(&restaurants, &lookup) {
            Ok(df) => df,
            Err(e) => {
                let _ = tx.send(LoadResult::Error(e.to_string()));
                return;
            }
        };

        let _ = tx.send(LoadResult::Progress("Computing summaries...".to_string()));
        let summaries: HashMap<View, Result<ViewSummary, String>> = View::ALL
            .par_iter()
            .map(|&view| {
                let summary = SummaryCalculator::compute(&table, view).map_err(|e| {
                    warn!(view = view.label(), "summary failed: {e}");
                    e.to_string()
                });
                (view, summary)
            })
            .collect();

        let _ = tx.send(LoadResult::Complete {
            row_count: table.height(),
            summaries,
        });
    }

    /// Poll the background thread.
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.sidebar.set_status(&status);
                    }
                    LoadResult::Complete {
                        row_count,
                        summaries,
                    } => {
                        self.summaries = summaries;
                        self.sidebar.row_count = Some(row_count);
                        self.sidebar
                            .set_status(&format!("Loaded {row_count} cleaned rows"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                        self.persist_config();
                    }
                    LoadResult::Error(error) => {
                        self.sidebar.set_status(&format!("Error: {error}"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Export the selected view as a PNG and open it.
    fn handle_export(&mut self) {
        let view = self.sidebar.selected;
        let Some(Ok(summary)) = self.summaries.get(&view) else {
            self.sidebar.set_status("Nothing to export yet");
            return;
        };

        let file_name = format!("{}.png", view.label().to_lowercase().replace(' ', "_"));
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        match StaticChartRenderer::render_to_file(view, summary, &path) {
            Ok(()) => {
                self.sidebar
                    .set_status(&format!("Exported {}", path.display()));
                if let Err(e) = open::that_detached(&path) {
                    warn!("could not open exported chart: {e}");
                }
            }
            Err(e) => {
                error!("export failed: {e}");
                self.sidebar.set_status(&format!("Error: {e}"));
            }
        }
    }

    fn persist_config(&mut self) {
        self.config.restaurants_csv = self.sidebar.restaurants_path.clone();
        self.config.country_workbook = self.sidebar.lookup_path.clone();
        self.config.last_view = Some(self.sidebar.selected.label().to_string());
        if let Err(e) = self.config.save() {
            warn!("could not save config: {e}");
        }
    }
}

impl eframe::App for RestoLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while the load cycle runs
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - navigation and data sources
        SidePanel::left("sidebar")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.sidebar.show(ui);

                    match action {
                        SidebarAction::BrowseRestaurants => self.handle_browse_restaurants(),
                        SidebarAction::BrowseLookup => self.handle_browse_lookup(),
                        SidebarAction::Load => self.start_load(),
                        SidebarAction::ViewSelected => self.persist_config(),
                        SidebarAction::ExportPng => self.handle_export(),
                        SidebarAction::None => {}
                    }
                });
            });

        // Central panel - the selected chart
        egui::CentralPanel::default().show(ctx, |ui| {
            let view = self.sidebar.selected;
            self.chart_view
                .show(ui, view, self.summaries.get(&view), self.is_loading);
        });
    }
}
