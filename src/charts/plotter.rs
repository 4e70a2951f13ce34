//! Chart Plotter Module
//! Draws the interactive chart for each view summary using egui_plot.

use crate::stats::{HistogramBin, PieSlice, RankedEntry, ScatterPoint, View, ViewSummary};
use egui::{Color32, FontId, RichText, Sense, Stroke, Vec2};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

/// Color palette for categorical series
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

const CHART_HEIGHT: f32 = 460.0;
const PIE_DIAMETER: f32 = 380.0;
const HEATMAP_CELL: f32 = 96.0;
/// Bubble radius buckets for the scatter, coarsest first.
const SCATTER_SIZE_TIERS: usize = 5;

/// Draws interactive charts from view summaries.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for a price tier (1-4).
    pub fn tier_color(tier: i64) -> Color32 {
        let idx = (tier - 1).rem_euclid(PALETTE.len() as i64) as usize;
        PALETTE[idx]
    }

    /// Draw the chart for one summary. Empty summaries are handled by the
    /// caller; this always has something to draw.
    pub fn draw(ui: &mut egui::Ui, view: View, summary: &ViewSummary) {
        ui.label(RichText::new(view.title()).size(18.0).strong());
        ui.add_space(10.0);

        match summary {
            ViewSummary::Ranked {
                entries,
                value_label,
            } => Self::draw_ranked(ui, view, entries, value_label),
            ViewSummary::Pie { slices } => Self::draw_pie(ui, slices),
            ViewSummary::Histogram {
                bins,
                curve,
                display_max,
            } => Self::draw_histogram(ui, view, bins, curve.as_deref(), *display_max),
            ViewSummary::Scatter { points } => Self::draw_scatter(ui, points),
            ViewSummary::Heatmap { labels, matrix } => Self::draw_heatmap(ui, labels, matrix),
        }
    }

    /// Horizontal bar chart, largest value on top.
    fn draw_ranked(ui: &mut egui::Ui, view: View, entries: &[RankedEntry], value_label: &str) {
        // Index 0 sits at the bottom of the plot, so reverse for top-down rank.
        let ordered: Vec<&RankedEntry> = entries.iter().rev().collect();
        let labels: Vec<String> = ordered.iter().map(|e| e.label.clone()).collect();

        let bars: Vec<Bar> = ordered
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let rank = ordered.len() - 1 - i;
                Bar::new(i as f64, entry.value)
                    .width(0.6)
                    .fill(PALETTE[rank % PALETTE.len()])
                    .name(&entry.label)
            })
            .collect();

        Plot::new(format!("ranked_{}", view.label()))
            .height(CHART_HEIGHT)
            .x_axis_label(value_label.to_string())
            .allow_scroll(false)
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 0.2 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal());
            });
    }

    /// Histogram bars with an optional density curve overlay.
    fn draw_histogram(
        ui: &mut egui::Ui,
        view: View,
        bins: &[HistogramBin],
        curve: Option<&[[f64; 2]]>,
        display_max: Option<f64>,
    ) {
        let x_label = if view == View::RatingDistribution {
            "Aggregate rating"
        } else {
            "Votes"
        };

        let bars: Vec<Bar> = bins
            .iter()
            .map(|bin| {
                Bar::new((bin.lower + bin.upper) / 2.0, bin.count as f64)
                    .width(bin.upper - bin.lower)
                    .fill(PALETTE[0].gamma_multiply(0.8))
            })
            .collect();

        let mut plot = Plot::new(format!("hist_{}", view.label()))
            .height(CHART_HEIGHT)
            .x_axis_label(x_label)
            .y_axis_label("Count")
            .allow_scroll(false);
        if let Some(max) = display_max {
            plot = plot.include_x(0.0).include_x(max);
        }

        plot.show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Count"));
            if let Some(curve) = curve {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(curve.iter().copied()))
                        .color(PALETTE[4])
                        .width(2.0)
                        .name("Density"),
                );
            }
        });
    }

    /// Bubble scatter: size follows votes, color follows price range,
    /// alpha-blended so overlapping points stay readable.
    fn draw_scatter(ui: &mut egui::Ui, points: &[ScatterPoint]) {
        let max_votes = points.iter().map(|p| p.votes).fold(1.0_f64, f64::max);

        let mut tiers: Vec<i64> = points.iter().map(|p| p.price_range).collect();
        tiers.sort_unstable();
        tiers.dedup();

        Plot::new("cost_vs_rating")
            .height(CHART_HEIGHT)
            .x_axis_label("Average Cost for Two")
            .y_axis_label("Aggregate Rating")
            .allow_scroll(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for &tier in &tiers {
                    let color = Self::tier_color(tier).gamma_multiply(0.6);
                    for size_tier in 0..SCATTER_SIZE_TIERS {
                        let lo = size_tier as f64 / SCATTER_SIZE_TIERS as f64;
                        let hi = (size_tier + 1) as f64 / SCATTER_SIZE_TIERS as f64;
                        let bucket: PlotPoints = points
                            .iter()
                            .filter(|p| {
                                let frac = p.votes / max_votes;
                                p.price_range == tier
                                    && frac >= lo
                                    && (frac < hi || size_tier == SCATTER_SIZE_TIERS - 1)
                            })
                            .map(|p| [p.cost, p.rating])
                            .collect();

                        let mut marks = Points::new(bucket)
                            .radius(2.0 + 8.0 * hi.sqrt() as f32)
                            .color(color);
                        if size_tier == 0 {
                            marks = marks.name(format!("Price range {tier}"));
                        }
                        plot_ui.points(marks);
                    }
                }
            });
    }

    /// Pie drawn with the painter as sector fans, plus a share legend.
    fn draw_pie(ui: &mut egui::Ui, slices: &[PieSlice]) {
        ui.horizontal(|ui| {
            let (response, painter) =
                ui.allocate_painter(Vec2::splat(PIE_DIAMETER), Sense::hover());
            let center = response.rect.center();
            let radius = PIE_DIAMETER / 2.0 - 8.0;

            // Matplotlib-style start angle, counter-clockwise.
            let mut angle = 140.0_f32.to_radians();
            for (i, slice) in slices.iter().enumerate() {
                let span = (slice.percent as f32 / 100.0) * std::f32::consts::TAU;
                let color = PALETTE[i % PALETTE.len()];

                let steps = ((span / 0.05).ceil() as usize).max(2);
                let mut outline = Vec::with_capacity(steps + 2);
                outline.push(center);
                for step in 0..=steps {
                    let a = angle + span * step as f32 / steps as f32;
                    // Screen y grows downward, so negate for counter-clockwise.
                    outline.push(center + radius * Vec2::new(a.cos(), -a.sin()));
                }
                painter.add(egui::Shape::convex_polygon(
                    outline,
                    color,
                    Stroke::new(1.0, Color32::WHITE),
                ));

                let mid = angle + span / 2.0;
                painter.text(
                    center + radius * 0.62 * Vec2::new(mid.cos(), -mid.sin()),
                    egui::Align2::CENTER_CENTER,
                    format!("{:.1}%", slice.percent),
                    FontId::proportional(14.0),
                    Color32::BLACK,
                );
                angle += span;
            }

            ui.add_space(20.0);

            ui.vertical(|ui| {
                ui.add_space(30.0);
                for (i, slice) in slices.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(Vec2::splat(14.0), Sense::hover());
                        ui.painter().rect_filled(rect, 3.0, PALETTE[i % PALETTE.len()]);
                        ui.label(
                            RichText::new(format!(
                                "Price range {}: {} restaurants ({:.1}%)",
                                slice.label, slice.count, slice.percent
                            ))
                            .size(13.0),
                        );
                    });
                    ui.add_space(4.0);
                }
            });
        });
    }

    /// Correlation heatmap drawn with the painter: colored cells with the
    /// coefficient printed in each.
    fn draw_heatmap(ui: &mut egui::Ui, labels: &[&'static str], matrix: &[Vec<f64>]) {
        let n = labels.len();
        let left_margin = 170.0;
        let top_margin = 30.0;

        let size = Vec2::new(
            left_margin + n as f32 * HEATMAP_CELL + 10.0,
            top_margin + n as f32 * HEATMAP_CELL + 10.0,
        );
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let origin = response.rect.min + Vec2::new(left_margin, top_margin);
        let text_color = ui.visuals().text_color();

        for (j, label) in labels.iter().enumerate() {
            painter.text(
                origin + Vec2::new((j as f32 + 0.5) * HEATMAP_CELL, -14.0),
                egui::Align2::CENTER_CENTER,
                Self::short_label(label),
                FontId::proportional(13.0),
                text_color,
            );
        }

        for (i, row) in matrix.iter().enumerate() {
            painter.text(
                origin + Vec2::new(-8.0, (i as f32 + 0.5) * HEATMAP_CELL),
                egui::Align2::RIGHT_CENTER,
                labels[i],
                FontId::proportional(13.0),
                text_color,
            );

            for (j, &value) in row.iter().enumerate() {
                let rect = egui::Rect::from_min_size(
                    origin + Vec2::new(j as f32 * HEATMAP_CELL, i as f32 * HEATMAP_CELL),
                    Vec2::splat(HEATMAP_CELL - 2.0),
                );
                painter.rect_filled(rect, 2.0, Self::heat_color(value));
                let cell_text = if value.is_nan() {
                    "–".to_string()
                } else {
                    format!("{value:.2}")
                };
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    cell_text,
                    FontId::proportional(14.0),
                    Color32::BLACK,
                );
            }
        }
    }

    fn short_label(label: &str) -> &str {
        match label {
            "Average Cost for two" => "Cost for two",
            "Aggregate rating" => "Rating",
            other => other,
        }
    }

    /// Diverging blue-white-red scale over [-1, 1]; NaN renders grey.
    fn heat_color(value: f64) -> Color32 {
        if value.is_nan() {
            return Color32::from_rgb(200, 200, 200);
        }
        let t = value.clamp(-1.0, 1.0);
        let lerp = |a: u8, b: u8, t: f64| (a as f64 + (b as f64 - a as f64) * t) as u8;
        if t < 0.0 {
            let t = -t;
            Color32::from_rgb(
                lerp(255, 59, t),
                lerp(255, 76, t),
                lerp(255, 192, t),
            )
        } else {
            Color32::from_rgb(
                lerp(255, 180, t),
                lerp(255, 4, t),
                lerp(255, 38, t),
            )
        }
    }
}
