//! Chart View Widget
//! Central panel showing the selected view's chart, or a placeholder when
//! there is nothing (or nothing valid) to draw.

use crate::charts::ChartPlotter;
use crate::stats::{View, ViewSummary};
use egui::{Color32, RichText, ScrollArea};

/// Central chart display area.
pub struct ChartView;

impl Default for ChartView {
    fn default() -> Self {
        Self
    }
}

impl ChartView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(
        &self,
        ui: &mut egui::Ui,
        view: View,
        summary: Option<&Result<ViewSummary, String>>,
        is_loading: bool,
    ) {
        match summary {
            None => {
                let message = if is_loading {
                    "Loading..."
                } else {
                    "Load the data sources to begin"
                };
                Self::placeholder(ui, message, Color32::GRAY);
            }
            // A per-view failure shows its reason without touching the session.
            Some(Err(message)) => {
                Self::placeholder(
                    ui,
                    &format!("Cannot compute this view: {message}"),
                    Color32::from_rgb(220, 53, 69),
                );
            }
            Some(Ok(summary)) if summary.is_empty() => {
                Self::placeholder(ui, "No rows to display", Color32::GRAY);
            }
            Some(Ok(summary)) => {
                egui::Frame::none()
                    .rounding(8.0)
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(16.0)
                    .show(ui, |ui| {
                        ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
                            ChartPlotter::draw(ui, view, summary);
                        });
                    });
            }
        }
    }

    fn placeholder(ui: &mut egui::Ui, message: &str, color: Color32) {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new(message).size(18.0).color(color));
        });
    }
}
