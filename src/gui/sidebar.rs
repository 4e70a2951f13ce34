//! Sidebar Widget
//! Left panel with data source pickers, the nine-view navigation menu and a
//! status line.

use crate::stats::View;
use egui::{Color32, RichText};
use std::path::PathBuf;

/// Left side navigation panel.
pub struct Sidebar {
    pub restaurants_path: Option<PathBuf>,
    pub lookup_path: Option<PathBuf>,
    pub selected: View,
    pub row_count: Option<usize>,
    pub status: String,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self {
            restaurants_path: None,
            lookup_path: None,
            selected: View::default(),
            row_count: None,
            status: "Ready".to_string(),
        }
    }
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    fn file_label(path: &Option<PathBuf>) -> (String, Color32) {
        match path {
            Some(path) => (
                path.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string()),
                Color32::WHITE,
            ),
            None => ("No file selected".to_string(), Color32::GRAY),
        }
    }

    /// Draw the sidebar
    pub fn show(&mut self, ui: &mut egui::Ui) -> SidebarAction {
        let mut action = SidebarAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🍴 RestoLens")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Restaurant Data Explorer")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Sources =====
        ui.label(RichText::new("📁 Data Sources").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let (text, color) = Self::file_label(&self.restaurants_path);
                    ui.label(RichText::new(text).size(12.0).color(color));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 CSV").clicked() {
                            action = SidebarAction::BrowseRestaurants;
                        }
                    });
                });
                ui.horizontal(|ui| {
                    let (text, color) = Self::file_label(&self.lookup_path);
                    ui.label(RichText::new(text).size(12.0).color(color));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 XLSX").clicked() {
                            action = SidebarAction::BrowseLookup;
                        }
                    });
                });
            });

        ui.add_space(8.0);

        ui.vertical_centered(|ui| {
            let load_enabled = self.restaurants_path.is_some() && self.lookup_path.is_some();
            ui.add_enabled_ui(load_enabled, |ui| {
                let button = egui::Button::new(RichText::new("▶ Load Data").size(15.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = SidebarAction::Load;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Navigation =====
        ui.label(RichText::new("🔎 Navigation").size(14.0).strong());
        ui.add_space(5.0);

        for view in View::ALL {
            if ui
                .radio_value(&mut self.selected, view, view.label())
                .changed()
            {
                action = SidebarAction::ViewSelected;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.row_count.is_some(), |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 28.0));
                if ui.add(button).clicked() {
                    action = SidebarAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        if let Some(rows) = self.row_count {
            ui.label(
                RichText::new(format!("Cleaned table: {rows} rows"))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
            ui.add_space(3.0);
        }

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by the sidebar
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarAction {
    None,
    BrowseRestaurants,
    BrowseLookup,
    Load,
    ViewSelected,
    ExportPng,
}
