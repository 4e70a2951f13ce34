//! Static Chart Renderer
//! Exports the selected view as a PNG image via plotters.
//!
//! The drawing is done in pixel space with primitives so every chart shape
//! (bars, pie, histogram, scatter, heatmap) shares one layout: title at the
//! top, plot area inside fixed margins.

use crate::stats::{HistogramBin, PieSlice, RankedEntry, ScatterPoint, View, ViewSummary};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const EXPORT_WIDTH: u32 = 1200;
pub const EXPORT_HEIGHT: u32 = 800;

const MARGIN_LEFT: i32 = 240;
const MARGIN_RIGHT: i32 = 60;
const MARGIN_TOP: i32 = 80;
const MARGIN_BOTTOM: i32 = 80;

// Mirrors the interactive palette
const PALETTE: [RGBColor; 10] = [
    RGBColor(52, 152, 219),
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(243, 156, 18),
    RGBColor(155, 89, 182),
    RGBColor(26, 188, 156),
    RGBColor(233, 30, 99),
    RGBColor(0, 188, 212),
    RGBColor(121, 85, 72),
    RGBColor(96, 125, 139),
];
const GRID: RGBColor = RGBColor(220, 220, 220);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("chart rendering failed: {0}")]
    Draw(String),
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Renders one view summary into a PNG file.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    pub fn render_to_file(
        view: View,
        summary: &ViewSummary,
        path: &Path,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (EXPORT_WIDTH, EXPORT_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        root.draw(&Text::new(
            view.title().to_string(),
            (40, 24),
            ("sans-serif", 30).into_font().color(&BLACK),
        ))
        .map_err(draw_err)?;

        if summary.is_empty() {
            root.draw(&Text::new(
                "No data to display".to_string(),
                ((EXPORT_WIDTH / 2) as i32, (EXPORT_HEIGHT / 2) as i32),
                ("sans-serif", 24)
                    .into_font()
                    .color(&RGBColor(120, 120, 120))
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            ))
            .map_err(draw_err)?;
            root.present().map_err(draw_err)?;
            return Ok(());
        }

        match summary {
            ViewSummary::Ranked {
                entries,
                value_label,
            } => Self::draw_ranked(&root, entries, value_label)?,
            ViewSummary::Pie { slices } => Self::draw_pie(&root, slices)?,
            ViewSummary::Histogram {
                bins,
                curve,
                display_max,
            } => Self::draw_histogram(&root, view, bins, curve.as_deref(), *display_max)?,
            ViewSummary::Scatter { points } => Self::draw_scatter(&root, points)?,
            ViewSummary::Heatmap { labels, matrix } => Self::draw_heatmap(&root, labels, matrix)?,
        }

        root.present().map_err(draw_err)?;
        info!(path = %path.display(), "exported chart image");
        Ok(())
    }

    fn plot_size() -> (f64, f64) {
        (
            (EXPORT_WIDTH as i32 - MARGIN_LEFT - MARGIN_RIGHT) as f64,
            (EXPORT_HEIGHT as i32 - MARGIN_TOP - MARGIN_BOTTOM) as f64,
        )
    }

    fn format_value(value: f64) -> String {
        if (value - value.round()).abs() < 1e-9 {
            format!("{value:.0}")
        } else {
            format!("{value:.2}")
        }
    }

    /// Horizontal bars, ranked top-down.
    fn draw_ranked(
        area: &Area<'_>,
        entries: &[RankedEntry],
        value_label: &str,
    ) -> Result<(), RenderError> {
        let (plot_w, plot_h) = Self::plot_size();
        let max = entries
            .iter()
            .map(|e| e.value)
            .fold(f64::MIN_POSITIVE, f64::max);
        let row_h = plot_h / entries.len() as f64;
        let gap = (row_h * 0.15) as i32;

        let label_style = ("sans-serif", 16)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        let value_style = ("sans-serif", 14)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));

        for (i, entry) in entries.iter().enumerate() {
            let y0 = MARGIN_TOP + (i as f64 * row_h) as i32 + gap;
            let y1 = MARGIN_TOP + ((i + 1) as f64 * row_h) as i32 - gap;
            let x1 = MARGIN_LEFT + (entry.value / max * plot_w) as i32;
            let mid = (y0 + y1) / 2;

            area.draw(&Rectangle::new(
                [(MARGIN_LEFT, y0), (x1, y1)],
                PALETTE[i % PALETTE.len()].filled(),
            ))
            .map_err(draw_err)?;
            area.draw(&Text::new(
                entry.label.clone(),
                (MARGIN_LEFT - 10, mid),
                label_style.clone(),
            ))
            .map_err(draw_err)?;
            area.draw(&Text::new(
                Self::format_value(entry.value),
                (x1 + 8, mid),
                value_style.clone(),
            ))
            .map_err(draw_err)?;
        }

        area.draw(&Text::new(
            value_label.to_string(),
            (
                MARGIN_LEFT + (plot_w / 2.0) as i32,
                EXPORT_HEIGHT as i32 - 36,
            ),
            ("sans-serif", 18)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top)),
        ))
        .map_err(draw_err)?;
        Ok(())
    }

    fn draw_histogram(
        area: &Area<'_>,
        view: View,
        bins: &[HistogramBin],
        curve: Option<&[[f64; 2]]>,
        display_max: Option<f64>,
    ) -> Result<(), RenderError> {
        let (plot_w, plot_h) = Self::plot_size();
        let x_min = if display_max.is_some() {
            0.0
        } else {
            bins.first().map(|b| b.lower).unwrap_or(0.0)
        };
        let x_max = display_max.unwrap_or_else(|| bins.last().map(|b| b.upper).unwrap_or(1.0));
        let mut y_max = bins.iter().map(|b| b.count as f64).fold(1.0, f64::max);
        if let Some(curve) = curve {
            y_max = curve.iter().map(|p| p[1]).fold(y_max, f64::max);
        }

        let map_x = |v: f64| MARGIN_LEFT + ((v - x_min) / (x_max - x_min) * plot_w) as i32;
        let map_y = |v: f64| MARGIN_TOP + (plot_h - v / y_max * plot_h) as i32;
        let base = MARGIN_TOP + plot_h as i32;

        Self::draw_axes(area, x_min, x_max, y_max, &map_x, &map_y)?;

        for bin in bins {
            if bin.count == 0 {
                continue;
            }
            area.draw(&Rectangle::new(
                [
                    (map_x(bin.lower), map_y(bin.count as f64)),
                    ((map_x(bin.upper) - 1).max(map_x(bin.lower)), base),
                ],
                PALETTE[0].mix(0.85).filled(),
            ))
            .map_err(draw_err)?;
        }

        if let Some(curve) = curve {
            let path: Vec<(i32, i32)> = curve
                .iter()
                .filter(|p| p[0] >= x_min && p[0] <= x_max)
                .map(|p| (map_x(p[0]), map_y(p[1])))
                .collect();
            area.draw(&PathElement::new(path, PALETTE[4].stroke_width(2)))
                .map_err(draw_err)?;
        }

        let x_label = if view == View::RatingDistribution {
            "Aggregate rating"
        } else {
            "Votes"
        };
        area.draw(&Text::new(
            x_label.to_string(),
            (
                MARGIN_LEFT + (plot_w / 2.0) as i32,
                EXPORT_HEIGHT as i32 - 36,
            ),
            ("sans-serif", 18)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top)),
        ))
        .map_err(draw_err)?;
        Ok(())
    }

    fn draw_scatter(area: &Area<'_>, points: &[ScatterPoint]) -> Result<(), RenderError> {
        let (plot_w, plot_h) = Self::plot_size();
        let x_max = points.iter().map(|p| p.cost).fold(1.0, f64::max) * 1.05;
        let y_max = points.iter().map(|p| p.rating).fold(1.0, f64::max) * 1.1;
        let max_votes = points.iter().map(|p| p.votes).fold(1.0, f64::max);

        let map_x = |v: f64| MARGIN_LEFT + (v / x_max * plot_w) as i32;
        let map_y = |v: f64| MARGIN_TOP + (plot_h - v / y_max * plot_h) as i32;

        Self::draw_axes(area, 0.0, x_max, y_max, &map_x, &map_y)?;

        for point in points {
            let radius = 2 + (6.0 * (point.votes / max_votes).sqrt()) as i32;
            let idx = (point.price_range - 1).rem_euclid(PALETTE.len() as i64) as usize;
            area.draw(&Circle::new(
                (map_x(point.cost), map_y(point.rating)),
                radius,
                PALETTE[idx].mix(0.45).filled(),
            ))
            .map_err(draw_err)?;
        }

        area.draw(&Text::new(
            "Average Cost for Two".to_string(),
            (
                MARGIN_LEFT + (plot_w / 2.0) as i32,
                EXPORT_HEIGHT as i32 - 36,
            ),
            ("sans-serif", 18)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top)),
        ))
        .map_err(draw_err)?;
        Ok(())
    }

    fn draw_pie(area: &Area<'_>, slices: &[PieSlice]) -> Result<(), RenderError> {
        let center = (
            (EXPORT_WIDTH / 2) as i32 - 160,
            (EXPORT_HEIGHT / 2) as i32 + 20,
        );
        let radius = 270.0_f64;

        let mut angle = 140.0_f64.to_radians();
        for (i, slice) in slices.iter().enumerate() {
            let span = slice.percent / 100.0 * std::f64::consts::TAU;
            let steps = ((span / 0.03).ceil() as usize).max(2);
            let mut outline = vec![center];
            for step in 0..=steps {
                let a = angle + span * step as f64 / steps as f64;
                outline.push((
                    center.0 + (radius * a.cos()) as i32,
                    center.1 - (radius * a.sin()) as i32,
                ));
            }
            area.draw(&Polygon::new(outline, PALETTE[i % PALETTE.len()].filled()))
                .map_err(draw_err)?;

            let mid = angle + span / 2.0;
            area.draw(&Text::new(
                format!("{:.1}%", slice.percent),
                (
                    center.0 + (radius * 0.62 * mid.cos()) as i32,
                    center.1 - (radius * 0.62 * mid.sin()) as i32,
                ),
                ("sans-serif", 18)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            ))
            .map_err(draw_err)?;
            angle += span;
        }

        let legend_x = (EXPORT_WIDTH / 2) as i32 + 180;
        let mut legend_y = (EXPORT_HEIGHT / 2) as i32 - slices.len() as i32 * 18;
        for (i, slice) in slices.iter().enumerate() {
            area.draw(&Rectangle::new(
                [(legend_x, legend_y), (legend_x + 16, legend_y + 16)],
                PALETTE[i % PALETTE.len()].filled(),
            ))
            .map_err(draw_err)?;
            area.draw(&Text::new(
                format!(
                    "Price range {}: {} ({:.1}%)",
                    slice.label, slice.count, slice.percent
                ),
                (legend_x + 26, legend_y + 8),
                ("sans-serif", 16)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Left, VPos::Center)),
            ))
            .map_err(draw_err)?;
            legend_y += 36;
        }
        Ok(())
    }

    fn draw_heatmap(
        area: &Area<'_>,
        labels: &[&'static str],
        matrix: &[Vec<f64>],
    ) -> Result<(), RenderError> {
        let cell = 130;
        let origin_x = MARGIN_LEFT + 20;
        let origin_y = MARGIN_TOP + 40;

        let header_style = ("sans-serif", 16)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        let row_style = ("sans-serif", 16)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        let cell_style = ("sans-serif", 18)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));

        for (j, label) in labels.iter().enumerate() {
            area.draw(&Text::new(
                label.to_string(),
                (origin_x + j as i32 * cell + cell / 2, origin_y - 10),
                header_style.clone(),
            ))
            .map_err(draw_err)?;
        }

        for (i, row) in matrix.iter().enumerate() {
            area.draw(&Text::new(
                labels[i].to_string(),
                (origin_x - 12, origin_y + i as i32 * cell + cell / 2),
                row_style.clone(),
            ))
            .map_err(draw_err)?;

            for (j, &value) in row.iter().enumerate() {
                let x0 = origin_x + j as i32 * cell;
                let y0 = origin_y + i as i32 * cell;
                area.draw(&Rectangle::new(
                    [(x0, y0), (x0 + cell - 2, y0 + cell - 2)],
                    Self::heat_color(value).filled(),
                ))
                .map_err(draw_err)?;
                let text = if value.is_nan() {
                    "-".to_string()
                } else {
                    format!("{value:.2}")
                };
                area.draw(&Text::new(
                    text,
                    (x0 + cell / 2, y0 + cell / 2),
                    cell_style.clone(),
                ))
                .map_err(draw_err)?;
            }
        }
        Ok(())
    }

    /// Axis lines, tick labels and light horizontal grid lines.
    fn draw_axes(
        area: &Area<'_>,
        x_min: f64,
        x_max: f64,
        y_max: f64,
        map_x: &dyn Fn(f64) -> i32,
        map_y: &dyn Fn(f64) -> i32,
    ) -> Result<(), RenderError> {
        let base = map_y(0.0);
        let tick_style = ("sans-serif", 13)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        let y_tick_style = ("sans-serif", 13)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));

        area.draw(&PathElement::new(
            vec![(map_x(x_min), base), (map_x(x_max), base)],
            BLACK.stroke_width(1),
        ))
        .map_err(draw_err)?;
        area.draw(&PathElement::new(
            vec![(map_x(x_min), map_y(y_max)), (map_x(x_min), base)],
            BLACK.stroke_width(1),
        ))
        .map_err(draw_err)?;

        const TICKS: usize = 5;
        for i in 0..=TICKS {
            let xv = x_min + (x_max - x_min) * i as f64 / TICKS as f64;
            area.draw(&Text::new(
                Self::format_value(xv),
                (map_x(xv), base + 6),
                tick_style.clone(),
            ))
            .map_err(draw_err)?;

            let yv = y_max * i as f64 / TICKS as f64;
            if i > 0 {
                area.draw(&PathElement::new(
                    vec![(map_x(x_min), map_y(yv)), (map_x(x_max), map_y(yv))],
                    GRID.stroke_width(1),
                ))
                .map_err(draw_err)?;
            }
            area.draw(&Text::new(
                Self::format_value(yv),
                (map_x(x_min) - 8, map_y(yv)),
                y_tick_style.clone(),
            ))
            .map_err(draw_err)?;
        }
        Ok(())
    }

    fn heat_color(value: f64) -> RGBColor {
        if value.is_nan() {
            return RGBColor(200, 200, 200);
        }
        let t = value.clamp(-1.0, 1.0);
        let lerp = |a: u8, b: u8, t: f64| (a as f64 + (b as f64 - a as f64) * t) as u8;
        if t < 0.0 {
            let t = -t;
            RGBColor(lerp(255, 59, t), lerp(255, 76, t), lerp(255, 192, t))
        } else {
            RGBColor(lerp(255, 180, t), lerp(255, 4, t), lerp(255, 38, t))
        }
    }
}
