//! Figure description and its rasterisation onto the terminal.
//!
//! A [`Figure`] is what the trajectory generator hands over: named point series with a
//! style each, axis labels, a title, grid and legend flags. [`draw_figure`] lays it out
//! inside the current terminal size, maps data to canvas pixels and composes the text
//! layer (title, ticks, legend) with the braille/ASCII layer.

use crate::config::{GlyphSet, RenderConfig};
use crate::model::Point;
use crate::render::{
    canvas_to_cells, draw_box, draw_text, draw_text_centered, fill_rect, Cell, CellBuffer,
    CellRect, Pixel, PixelCanvas, DIM, FG,
};
use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) fn to_color(self) -> Color {
        Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }

    /// Fades toward black, used for translucent text-layer elements.
    pub(crate) fn scaled(self, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb {
            r: (self.r as f32 * t) as u8,
            g: (self.g as f32 * t) as u8,
            b: (self.b as f32 * t) as u8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LineKind {
    None,
    Solid,
    Dashed,
    Dotted,
}

impl LineKind {
    /// (on, off) run lengths in pixels; `None` for a continuous line.
    fn pattern(self) -> Option<(f64, f64)> {
        match self {
            LineKind::Dashed => Some((5.0, 3.0)),
            LineKind::Dotted => Some((1.0, 2.0)),
            LineKind::None | LineKind::Solid => None,
        }
    }

    fn legend_sample(self) -> &'static str {
        match self {
            LineKind::None => "  ",
            LineKind::Solid => "──",
            LineKind::Dashed => "╌╌",
            LineKind::Dotted => "┈┈",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Marker {
    /// Filled disc, radius in braille dots.
    Disc { radius: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SeriesStyle {
    pub(crate) color: Rgb,
    pub(crate) line: LineKind,
    pub(crate) width: f32,
    pub(crate) alpha: f32,
    pub(crate) marker: Option<Marker>,
}

#[derive(Clone, Debug)]
pub(crate) struct Series {
    pub(crate) label: String,
    pub(crate) points: Vec<Point>,
    pub(crate) style: SeriesStyle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GridStyle {
    pub(crate) line: LineKind,
    pub(crate) alpha: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct Figure {
    pub(crate) title: String,
    pub(crate) x_label: String,
    pub(crate) y_label: String,
    pub(crate) series: Vec<Series>,
    pub(crate) equal_aspect: bool,
    pub(crate) grid: Option<GridStyle>,
    pub(crate) legend: bool,
}

impl Figure {
    /// Data bounds over every finite point of every series.
    pub(crate) fn bounds(&self) -> Option<Bounds> {
        let mut it = self
            .series
            .iter()
            .flat_map(|s| s.points.iter())
            .filter(|p| p.x.is_finite() && p.y.is_finite());
        let first = *it.next()?;
        let mut b = Bounds {
            min: first,
            max: first,
        };
        for p in it {
            b.min.x = b.min.x.min(p.x);
            b.min.y = b.min.y.min(p.y);
            b.max.x = b.max.x.max(p.x);
            b.max.y = b.max.y.max(p.y);
        }
        Some(b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Bounds {
    pub(crate) min: Point,
    pub(crate) max: Point,
}

impl Bounds {
    pub(crate) fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Width and height, never zero so a single point still gets a scale.
    pub(crate) fn span(&self) -> (f64, f64) {
        let fallback = |lo: f64, hi: f64| {
            let d = hi - lo;
            if d > 0.0 {
                d
            } else {
                lo.abs().max(hi.abs()).max(1.0)
            }
        };
        (
            fallback(self.min.x, self.max.x),
            fallback(self.min.y, self.max.y),
        )
    }
}

/* -----------------------------
   View (zoom / pan) and data -> pixel mapping
------------------------------ */

const MARGIN: f64 = 0.05;
const ZOOM_STEP: f64 = 1.25;
const PAN_STEP: f64 = 0.1;

/// Interactive view state of the figure scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct View {
    pub(crate) zoom: f64,
    /// Offset of the view centre, in fractions of the fitted data span.
    pub(crate) pan: Point,
}

impl Default for View {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::ORIGIN,
        }
    }
}

impl View {
    pub(crate) fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(1e4);
    }
    pub(crate) fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(0.1);
    }
    /// Moves the view by a tenth of what is currently visible.
    pub(crate) fn pan_by(&mut self, dx: i8, dy: i8) {
        self.pan.x += dx as f64 * PAN_STEP / self.zoom;
        self.pan.y += dy as f64 * PAN_STEP / self.zoom;
    }
    pub(crate) fn reset(&mut self) {
        *self = View::default();
    }
}

/// Affine map from data coordinates to pixels of a plot area (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Transform {
    center: Point,
    scale_x: f64,
    scale_y: f64,
    px_w: f64,
    px_h: f64,
}

impl Transform {
    /// Fits `bounds` plus a margin into a `px_w`×`px_h` pixel area.
    ///
    /// `pixel_aspect` is a pixel's height over its width; with `equal_aspect` one data unit
    /// covers the same physical length on both axes.
    pub(crate) fn fit(
        bounds: Bounds,
        px_w: f64,
        px_h: f64,
        pixel_aspect: f64,
        equal_aspect: bool,
        view: View,
    ) -> Self {
        let (dx, dy) = bounds.span();
        let (dx, dy) = (dx * (1.0 + 2.0 * MARGIN), dy * (1.0 + 2.0 * MARGIN));
        let c = bounds.center();
        let center = Point::new(c.x + view.pan.x * dx, c.y + view.pan.y * dy);

        let (scale_x, scale_y) = if equal_aspect {
            let s = (px_w / dx).min(px_h * pixel_aspect / dy);
            (s, s / pixel_aspect)
        } else {
            (px_w / dx, px_h / dy)
        };

        Self {
            center,
            scale_x: scale_x * view.zoom,
            scale_y: scale_y * view.zoom,
            px_w,
            px_h,
        }
    }

    pub(crate) fn to_px(&self, p: Point) -> (f64, f64) {
        (
            self.px_w * 0.5 + (p.x - self.center.x) * self.scale_x,
            self.px_h * 0.5 - (p.y - self.center.y) * self.scale_y,
        )
    }

    pub(crate) fn to_data(&self, px: f64, py: f64) -> Point {
        Point::new(
            self.center.x + (px - self.px_w * 0.5) / self.scale_x,
            self.center.y - (py - self.px_h * 0.5) / self.scale_y,
        )
    }

    /// Visible data range as (bottom-left, top-right).
    pub(crate) fn visible(&self) -> (Point, Point) {
        (self.to_data(0.0, self.px_h), self.to_data(self.px_w, 0.0))
    }
}

/* -----------------------------
   Ticks
------------------------------ */

/// Step of 1, 2 or 5 × 10ⁿ giving roughly `target` intervals over `span`.
pub(crate) fn nice_step(span: f64, target: usize) -> f64 {
    let raw = span / target.max(1) as f64;
    if !(raw > 0.0) || !raw.is_finite() {
        return 1.0;
    }
    let mag = 10f64.powi(raw.log10().floor() as i32);
    let norm = raw / mag;
    let f = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    f * mag
}

pub(crate) fn ticks(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let mut out = Vec::new();
    if !(step > 0.0) || !lo.is_finite() || !hi.is_finite() {
        return out;
    }
    let mut k = (lo / step).ceil();
    while k * step <= hi + step * 1e-9 && out.len() < 64 {
        let v = k * step;
        out.push(if v.abs() < step * 1e-9 { 0.0 } else { v });
        k += 1.0;
    }
    out
}

pub(crate) fn format_tick(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let a = v.abs();
    if !(1e-3..1e5).contains(&a) {
        format!("{:.1e}", v)
    } else if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        let s = format!("{:.3}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/* -----------------------------
   Rasteriser
------------------------------ */

/// Draws a pixel-space polyline; dash phase carries across segments.
fn stroke_polyline(
    canvas: &mut PixelCanvas,
    clip: (f64, f64, f64, f64),
    pts: &[(f64, f64)],
    style: &SeriesStyle,
    ink: Pixel,
) {
    let pattern = style.line.pattern();
    let thick = style.width.round().max(1.0) as i32;
    let mut travelled = 0.0f64;

    for (k, seg) in pts.windows(2).enumerate() {
        let (x0, y0) = seg[0];
        let (x1, y1) = seg[1];
        let len = (x1 - x0).hypot(y1 - y0);
        if !len.is_finite() {
            continue;
        }
        let steps = len.ceil().max(1.0) as usize;
        // later segments start where the previous one ended
        let first = if k == 0 { 0 } else { 1 };
        for i in first..=steps {
            let t = i as f64 / steps as f64;
            let d = travelled + len * t;
            if let Some((on, off)) = pattern {
                if d % (on + off) >= on {
                    continue;
                }
            }
            let x = x0 + (x1 - x0) * t;
            let y = y0 + (y1 - y0) * t;
            if x < clip.0 || y < clip.1 || x >= clip.2 || y >= clip.3 {
                continue;
            }
            stamp(canvas, x.floor() as i32, y.floor() as i32, thick, ink);
        }
        travelled += len;
    }
}

fn stamp(canvas: &mut PixelCanvas, x: i32, y: i32, thick: i32, ink: Pixel) {
    let lo = -(thick - 1) / 2;
    for dy in lo..lo + thick {
        for dx in lo..lo + thick {
            canvas.blend_over(x + dx, y + dy, ink);
        }
    }
}

fn fill_disc(
    canvas: &mut PixelCanvas,
    clip: (f64, f64, f64, f64),
    cx: f64,
    cy: f64,
    r: f64,
    ink: Pixel,
) {
    let ri = r.ceil() as i32;
    for dy in -ri..=ri {
        for dx in -ri..=ri {
            let (x, y) = (cx + dx as f64, cy + dy as f64);
            if (dx * dx + dy * dy) as f64 > r * r {
                continue;
            }
            if x < clip.0 || y < clip.1 || x >= clip.2 || y >= clip.3 {
                continue;
            }
            canvas.blend_over(x.floor() as i32, y.floor() as i32, ink);
        }
    }
}

/* -----------------------------
   Layout and composition
------------------------------ */

const Y_TICK_W: u16 = 9;

/// Cell rectangle of the data area for a terminal of `cols`×`rows`.
pub(crate) fn plot_area(cols: u16, rows: u16) -> Option<CellRect> {
    let r = CellRect {
        x0: Y_TICK_W + 3,
        y0: 2,
        x1: cols.saturating_sub(2),
        y1: rows.saturating_sub(4),
    };
    (r.width() >= 20 && r.height() >= 6).then_some(r)
}

/// Renders `fig` into the cell buffer, using `canvas` as the pixel layer.
pub(crate) fn draw_figure(
    buf: &mut CellBuffer,
    canvas: &mut PixelCanvas,
    fig: &Figure,
    view: View,
    config: RenderConfig,
) {
    buf.clear();
    canvas.clear();

    draw_text_centered(buf, 0, &fig.title, FG);
    draw_text(
        buf,
        1,
        buf.h.saturating_sub(1),
        "q close | +/- zoom | arrows pan | r reset view",
        DIM,
    );

    let Some(area) = plot_area(buf.w, buf.h) else {
        draw_text(buf, 1, 2, "Terminal too small for the plot.", FG);
        return;
    };
    let Some(bounds) = fig.bounds() else {
        draw_text(buf, area.x0, area.y0, "Nothing to plot.", FG);
        return;
    };

    let glyphs = config.glyphs;
    let (sx, sy) = glyphs.subpixels();
    let px_w = (area.width() as u32 * sx) as f64;
    let px_h = (area.height() as u32 * sy) as f64;
    let tf = Transform::fit(
        bounds,
        px_w,
        px_h,
        glyphs.pixel_aspect(),
        fig.equal_aspect,
        view,
    );

    draw_axes(buf, area, &tf, fig, glyphs);

    // series into the pixel layer, offset to the plot area
    let ox = (area.x0 as u32 * sx) as f64;
    let oy = (area.y0 as u32 * sy) as f64;
    let clip = (ox, oy, ox + px_w, oy + px_h);
    let dot = if glyphs == GlyphSet::Braille { 1.0 } else { 0.5 };
    for s in &fig.series {
        let ink = Pixel::from_rgb(s.style.color, s.style.alpha);
        let pts: Vec<(f64, f64)> = s
            .points
            .iter()
            .map(|p| {
                let (x, y) = tf.to_px(*p);
                (x + ox, y + oy)
            })
            .collect();
        if s.style.line != LineKind::None {
            stroke_polyline(canvas, clip, &pts, &s.style, ink);
        }
        if let Some(Marker::Disc { radius }) = s.style.marker {
            for &(x, y) in &pts {
                fill_disc(canvas, clip, x, y, radius as f64 * dot, ink);
            }
        }
    }
    canvas_to_cells(canvas, buf, area, glyphs);

    if fig.legend {
        draw_legend(buf, area, fig);
    }
}

fn draw_axes(buf: &mut CellBuffer, area: CellRect, tf: &Transform, fig: &Figure, glyphs: GlyphSet) {
    let (sx, sy) = glyphs.subpixels();
    let (lo, hi) = tf.visible();
    let axis = Rgb {
        r: 170,
        g: 170,
        b: 170,
    };

    // frame: left and bottom edges
    for y in area.y0..area.y1 {
        buf.set(area.x0 - 1, y, Cell::new('│', axis.to_color()));
    }
    for x in area.x0..area.x1 {
        buf.set(x, area.y1, Cell::new('─', axis.to_color()));
    }
    buf.set(area.x0 - 1, area.y1, Cell::new('└', axis.to_color()));

    let x_step = nice_step(hi.x - lo.x, (area.width() / 14).max(2) as usize);
    let y_step = nice_step(hi.y - lo.y, (area.height() / 4).max(2) as usize);
    let grid_fg = fig.grid.map(|g| {
        let every = if g.line == LineKind::Solid { 1 } else { 2 };
        (axis.scaled(g.alpha).to_color(), every)
    });

    for v in ticks(lo.x, hi.x, x_step) {
        let (px, _) = tf.to_px(Point::new(v, 0.0));
        let col = (px / sx as f64).floor();
        if col < 0.0 || col >= area.width() as f64 {
            continue;
        }
        let x = area.x0 + col as u16;
        if let Some((fg, every)) = grid_fg {
            for y in (area.y0..area.y1).step_by(every) {
                buf.set(x, y, Cell::new('·', fg));
            }
        }
        buf.set(x, area.y1, Cell::new('┴', axis.to_color()));
        let label = format_tick(v);
        let half = label.chars().count() as u16 / 2;
        draw_text(buf, x.saturating_sub(half), area.y1 + 1, &label, FG);
    }

    for v in ticks(lo.y, hi.y, y_step) {
        let (_, py) = tf.to_px(Point::new(0.0, v));
        let row = (py / sy as f64).floor();
        if row < 0.0 || row >= area.height() as f64 {
            continue;
        }
        let y = area.y0 + row as u16;
        if let Some((fg, every)) = grid_fg {
            for x in (area.x0..area.x1).step_by(every * 2) {
                buf.set(x, y, Cell::new('·', fg));
            }
        }
        buf.set(area.x0 - 1, y, Cell::new('┤', axis.to_color()));
        let label = format_tick(v);
        let len = label.chars().count() as u16;
        draw_text(buf, (area.x0 - 2).saturating_sub(len), y, &label, FG);
    }

    // axis labels: x centred under the ticks, y stacked down the first column
    let xl = fig.x_label.chars().count() as u16;
    let x = area.x0 + area.width().saturating_sub(xl) / 2;
    draw_text(buf, x, area.y1 + 2, &fig.x_label, FG);

    let yl: Vec<char> = fig.y_label.chars().collect();
    let y0 = area.y0 + area.height().saturating_sub(yl.len() as u16) / 2;
    for (i, ch) in yl.into_iter().enumerate() {
        let y = y0 + i as u16;
        if y >= area.y1 {
            break;
        }
        buf.set(0, y, Cell::new(ch, FG));
    }
}

fn draw_legend(buf: &mut CellBuffer, area: CellRect, fig: &Figure) {
    let entries: Vec<&Series> = fig.series.iter().filter(|s| !s.label.is_empty()).collect();
    if entries.is_empty() {
        return;
    }
    let text_w = entries
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0) as u16;
    let bw = (text_w + 7).min(area.width());
    let bh = (entries.len() as u16 + 2).min(area.height());
    let rect = CellRect {
        x0: area.x1 - bw,
        y0: area.y0,
        x1: area.x1,
        y1: area.y0 + bh,
    };
    fill_rect(buf, rect);
    draw_box(buf, rect, DIM);

    for (i, s) in entries.iter().enumerate() {
        let y = rect.y0 + 1 + i as u16;
        if y >= rect.y1 - 1 {
            break;
        }
        let sample = if s.style.marker.is_some() {
            " ●"
        } else {
            s.style.line.legend_sample()
        };
        draw_text(buf, rect.x0 + 1, y, sample, s.style.color.to_color());
        draw_text(buf, rect.x0 + 4, y, &s.label, FG);
        // keep long labels inside the frame
        buf.set(rect.x1 - 1, y, Cell::new('│', DIM));
    }
}
