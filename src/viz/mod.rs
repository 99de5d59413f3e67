//! Preview rendering: draw a packed layout to **SVG** or **PNG**.
//!
//! - One mark per placed circle (circle, inscribed square, or inscribed triangle)
//! - Item colors (`#RRGGBB`) with the Microsoft Office palette as fallback
//! - Larger marks first, smaller ones on top
//! - Shrink-to-fit `id` + value labels (SVG only; the bitmap backend needs embedded fonts)
//!
//! This is a preview of the layout, not a chart-styling engine.

pub mod text;
pub mod types;
pub mod util;

pub use text::{FontSpec, HeuristicMeasurer, TextExtent, TextMeasurer};
pub use types::{PreviewOptions, Shape};

use crate::models::PlacedCircle;
use anyhow::{Result, anyhow};
use log::debug;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;

use text::{FittedLabel, fit_label, truncate_to_width};
use util::{fill_color, format_value, label_color};

/// Render `circles` (laid out on a `width` x `height` canvas) to `out_path`.
/// The output format follows the extension: `.svg`, anything else is a bitmap.
pub fn render_preview<P: AsRef<Path>>(
    circles: &[PlacedCircle],
    width: f64,
    height: f64,
    out_path: P,
    opts: &PreviewOptions,
) -> Result<()> {
    if !(width > 0.0 && height > 0.0) {
        return Err(anyhow!("canvas must be positive, got {width}x{height}"));
    }
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = (
        width.ceil() as u32 + 2 * opts.margin,
        height.ceil() as u32 + 2 * opts.margin,
    );

    let is_svg = out_path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_preview(root, circles, opts, opts.draw_labels)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_preview(root, circles, opts, false)?;
    }
    debug!("wrote preview of {} circles to {}", circles.len(), out_path.display());
    Ok(())
}

fn draw_preview<DB>(
    root: DrawingArea<DB, Shift>,
    circles: &[PlacedCircle],
    opts: &PreviewOptions,
    labels: bool,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let m = opts.margin as i32;
    let area = root.margin(m, m, m, m);

    let mut draw_order: Vec<&PlacedCircle> = circles.iter().collect();
    draw_order.sort_by_key(|c| c.order);

    for c in &draw_order {
        let color = fill_color(c.color.as_deref(), c.order);
        draw_mark(&area, c, opts.shape, color)?;
    }

    if labels {
        let measurer = HeuristicMeasurer::default();
        for c in &draw_order {
            draw_label(&area, c, opts, &measurer)?;
        }
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_mark<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    c: &PlacedCircle,
    shape: Shape,
    color: RGBColor,
) -> Result<()> {
    let fill = color.filled();
    let outline = WHITE.stroke_width(1);
    let (cx, cy, r) = (c.x, c.y, c.radius);
    let px = |v: f64| v.round() as i32;
    match shape {
        Shape::Circle => {
            let rr = r.round().max(1.0) as i32;
            area.draw(&Circle::new((px(cx), px(cy)), rr, fill))
                .map_err(|e| anyhow!("{:?}", e))?;
            area.draw(&Circle::new((px(cx), px(cy)), rr, outline))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        Shape::Square => {
            let h = r / std::f64::consts::SQRT_2;
            let corners = [(px(cx - h), px(cy - h)), (px(cx + h), px(cy + h))];
            area.draw(&Rectangle::new(corners, fill))
                .map_err(|e| anyhow!("{:?}", e))?;
            area.draw(&Rectangle::new(corners, outline))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        Shape::Triangle => {
            let pts: Vec<(i32, i32)> = Shape::triangle_points(cx, cy, r)
                .iter()
                .map(|&(x, y)| (px(x), px(y)))
                .collect();
            area.draw(&Polygon::new(pts.clone(), fill))
                .map_err(|e| anyhow!("{:?}", e))?;
            let mut closed = pts;
            closed.push(closed[0]);
            area.draw(&PathElement::new(closed, outline))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }
    Ok(())
}

/// Label = id, plus the formatted value on its own line when there is room.
fn draw_label<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    c: &PlacedCircle,
    opts: &PreviewOptions,
    measurer: &dyn TextMeasurer,
) -> Result<()> {
    let (box_w, box_h, dy) = opts.shape.label_box(c.radius);
    let font = FontSpec::new("sans-serif", opts.max_font_px);
    let fitted = fit_label(
        measurer,
        &c.id,
        &font,
        box_w,
        box_h,
        opts.max_font_px,
        opts.min_font_px,
    )
    .or_else(|| truncated_label(measurer, &c.id, &font, box_w, box_h, opts.min_font_px));
    let Some(mut fitted) = fitted else {
        return Ok(());
    };

    let value = format_value(c.value, &opts.locale);
    let value_fits = measurer.measure(&value, &font.with_size(fitted.font_px)).width <= box_w;
    if value_fits && fitted.line_height * (fitted.lines.len() + 1) as f64 <= box_h {
        fitted.lines.push(value);
    }

    let color = label_color(fill_color(c.color.as_deref(), c.order));
    let style = TextStyle::from((FontFamily::SansSerif, fitted.font_px))
        .color(&color)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let block_h = fitted.line_height * fitted.lines.len() as f64;
    let top = c.y + dy - block_h / 2.0 + fitted.line_height / 2.0;
    for (i, line) in fitted.lines.iter().enumerate() {
        let y = top + i as f64 * fitted.line_height;
        area.draw(&Text::new(
            line.clone(),
            (c.x.round() as i32, y.round() as i32),
            style.clone(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// Single line at `min_px`, cut with an ellipsis. Used when the id cannot be
/// wrapped into the box without splitting a word.
fn truncated_label(
    measurer: &dyn TextMeasurer,
    id: &str,
    font: &FontSpec,
    box_w: f64,
    box_h: f64,
    min_px: f64,
) -> Option<FittedLabel> {
    let font = font.with_size(min_px);
    let line_height = measurer.measure("M", &font).height;
    if line_height > box_h {
        return None;
    }
    let line = truncate_to_width(measurer, id.trim(), &font, box_w);
    if !line.chars().any(|ch| ch != '…') {
        return None;
    }
    Some(FittedLabel {
        font_px: min_px,
        line_height,
        lines: vec![line],
    })
}
