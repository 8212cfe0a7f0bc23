use crate::config::{GlyphSet, RenderConfig};
use crate::form::{Focus, Form};
use crate::model::FieldId;
use crate::plot::Rgb;
use crossterm::{
    cursor, execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

pub(crate) const BG: Color = Color::Black;
pub(crate) const FG: Color = Color::White;
pub(crate) const DIM: Color = Color::DarkGrey;
pub(crate) const HI: Color = Color::Yellow;
pub(crate) const BAD: Color = Color::Red;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) inverse: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: FG,
            bg: BG,
            inverse: false,
        }
    }
}

impl Cell {
    pub(crate) fn new(ch: char, fg: Color) -> Self {
        Self {
            ch,
            fg,
            ..Self::default()
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    #[cfg(test)]
    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.w && y < self.h).then(|| self.cells[self.idx(x, y)])
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }
    /// Row contents as a string, for tests and debugging.
    #[cfg(test)]
    pub(crate) fn row_text(&self, y: u16) -> String {
        (0..self.w).filter_map(|x| self.get(x, y)).map(|c| c.ch).collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Pixel {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl Pixel {
    pub(crate) fn from_rgb(c: Rgb, alpha: f32) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: (alpha.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        }
    }
}

pub(crate) struct PixelCanvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) px: Vec<Pixel>,
}

impl PixelCanvas {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Pixel::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn clear(&mut self) {
        self.px.fill(Pixel::default());
    }
    pub(crate) fn get(&self, x: u32, y: u32) -> Pixel {
        if x >= self.w || y >= self.h {
            return Pixel::default();
        }
        self.px[self.idx(x, y)]
    }

    /// Source-over compositing; out-of-bounds writes are dropped.
    pub(crate) fn blend_over(&mut self, x: i32, y: i32, src: Pixel) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.w || y >= self.h {
            return;
        }
        let i = self.idx(x, y);
        let dst = self.px[i];

        let sa = src.a as f32 / 255.0;
        let da = dst.a as f32 / 255.0;

        let out_a = sa + da * (1.0 - sa);
        if out_a <= 1e-6 {
            self.px[i] = Pixel::default();
            return;
        }

        let blend = |sc: u8, dc: u8| -> u8 {
            let sc = sc as f32 / 255.0;
            let dc = dc as f32 / 255.0;
            let out = (sc * sa + dc * da * (1.0 - sa)) / out_a;
            (out.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
        };

        self.px[i] = Pixel {
            r: blend(src.r, dst.r),
            g: blend(src.g, dst.g),
            b: blend(src.b, dst.b),
            a: (out_a.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        };
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) config: RenderConfig,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    pub(crate) canvas: PixelCanvas,
}

impl Terminal {
    pub(crate) fn begin(config: RenderConfig) -> anyhow::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        let setup = execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )
        .and_then(|()| terminal::size());
        let (cols, rows) = match setup {
            Ok(size) => size,
            Err(e) => {
                // half-initialised: put the user's screen back before bailing
                let _ = execute!(out, LeaveAlternateScreen, cursor::Show, EnableLineWrap);
                let _ = terminal::disable_raw_mode();
                return Err(e.into());
            }
        };
        let (sx, sy) = config.glyphs.subpixels();

        Ok(Self {
            out,
            config,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            canvas: PixelCanvas::new(cols as u32 * sx, rows as u32 * sy),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        let screen = queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            SetAttribute(Attribute::Reset),
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )
        .and_then(|()| self.out.flush());
        let raw = terminal::disable_raw_mode();
        screen?;
        raw?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        let (sx, sy) = self.config.glyphs.subpixels();
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        self.canvas = PixelCanvas::new(c as u32 * sx, r as u32 * sy);
        execute!(self.out, terminal::Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_inverse = false;
        queue!(self.out, SetAttribute(Attribute::NoReverse))?;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                let (fg, bg) = if self.config.color {
                    (c.fg, c.bg)
                } else {
                    (Color::Reset, Color::Reset)
                };
                if last_fg != Some(fg) {
                    queue!(self.out, SetForegroundColor(fg))?;
                    last_fg = Some(fg);
                }
                if last_bg != Some(bg) {
                    queue!(self.out, SetBackgroundColor(bg))?;
                    last_bg = Some(bg);
                }
                if last_inverse != c.inverse {
                    let attr = if c.inverse {
                        Attribute::Reverse
                    } else {
                        Attribute::NoReverse
                    };
                    queue!(self.out, SetAttribute(attr))?;
                    last_inverse = c.inverse;
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(
            self.out,
            SetAttribute(Attribute::NoReverse),
            ResetColor,
            EndSynchronizedUpdate
        )?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Braille encoding: 2×4 pixels -> U+2800..U+28FF
------------------------------ */

fn braille_bit(dx: u32, dy: u32) -> u8 {
    // Dot mapping:
    // (0,0)=1 (0,1)=2 (0,2)=4 (0,3)=64
    // (1,0)=8 (1,1)=16 (1,2)=32 (1,3)=128
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

const INK_ALPHA: u8 = 32;

fn ascii_glyph(a: u8) -> char {
    match a {
        200..=u8::MAX => '#',
        120..=199 => '*',
        INK_ALPHA..=119 => '.',
        _ => ' ',
    }
}

/// Rectangle in cell coordinates, `x1`/`y1` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CellRect {
    pub(crate) x0: u16,
    pub(crate) y0: u16,
    pub(crate) x1: u16,
    pub(crate) y1: u16,
}

impl CellRect {
    pub(crate) fn width(&self) -> u16 {
        self.x1.saturating_sub(self.x0)
    }
    pub(crate) fn height(&self) -> u16 {
        self.y1.saturating_sub(self.y0)
    }
}

/// Copies inked canvas pixels inside `area` onto the cell layer. Cells with no ink keep
/// whatever text was drawn underneath.
pub(crate) fn canvas_to_cells(
    canvas: &PixelCanvas,
    out: &mut CellBuffer,
    area: CellRect,
    glyphs: GlyphSet,
) {
    let (sx, sy) = glyphs.subpixels();

    for cy in area.y0..area.y1.min(out.h) {
        for cx in area.x0..area.x1.min(out.w) {
            let px0 = cx as u32 * sx;
            let py0 = cy as u32 * sy;

            let mut mask: u8 = 0;
            let mut max_a: u8 = 0;
            let mut sum_r: u32 = 0;
            let mut sum_g: u32 = 0;
            let mut sum_b: u32 = 0;
            let mut ink_count: u32 = 0;

            for dy in 0..sy {
                for dx in 0..sx {
                    let p = canvas.get(px0 + dx, py0 + dy);
                    // threshold: treat alpha as ink
                    if p.a >= INK_ALPHA {
                        mask |= braille_bit(dx, dy);
                        max_a = max_a.max(p.a);
                        sum_r += p.r as u32;
                        sum_g += p.g as u32;
                        sum_b += p.b as u32;
                        ink_count += 1;
                    }
                }
            }

            if ink_count == 0 {
                continue;
            }

            let ch = match glyphs {
                GlyphSet::Braille => char::from_u32(0x2800 + mask as u32).unwrap_or(' '),
                GlyphSet::Ascii => ascii_glyph(max_a),
            };
            let fg = Color::Rgb {
                r: (sum_r / ink_count) as u8,
                g: (sum_g / ink_count) as u8,
                b: (sum_b / ink_count) as u8,
            };
            out.set(cx, cy, Cell::new(ch, fg));
        }
    }
}

/* -----------------------------
   Text and boxes
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell::new(ch, fg));
    }
}

pub(crate) fn draw_text_centered(buf: &mut CellBuffer, y: u16, s: &str, fg: Color) {
    let len = s.chars().count() as u16;
    let x = buf.w.saturating_sub(len) / 2;
    draw_text(buf, x, y, s, fg);
}

pub(crate) fn draw_box(buf: &mut CellBuffer, r: CellRect, fg: Color) {
    if r.width() < 2 || r.height() < 2 {
        return;
    }
    let (x1, y1) = (r.x1 - 1, r.y1 - 1);
    for x in r.x0..=x1 {
        buf.set(x, r.y0, Cell::new('─', fg));
        buf.set(x, y1, Cell::new('─', fg));
    }
    for y in r.y0..=y1 {
        buf.set(r.x0, y, Cell::new('│', fg));
        buf.set(x1, y, Cell::new('│', fg));
    }
    buf.set(r.x0, r.y0, Cell::new('┌', fg));
    buf.set(x1, r.y0, Cell::new('┐', fg));
    buf.set(r.x0, y1, Cell::new('└', fg));
    buf.set(x1, y1, Cell::new('┘', fg));
}

pub(crate) fn fill_rect(buf: &mut CellBuffer, r: CellRect) {
    for y in r.y0..r.y1 {
        for x in r.x0..r.x1 {
            buf.set(x, y, Cell::default());
        }
    }
}

/// Word-wraps `s` to `max_w` columns; explicit newlines are kept.
pub(crate) fn wrap(s: &str, max_w: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if max_w == 0 {
        return lines;
    }
    for para in s.split('\n') {
        let mut line = String::new();
        let mut used = 0;
        for word in para.split_whitespace() {
            if used > 0 && used + 1 + word.chars().count() > max_w {
                lines.push(std::mem::take(&mut line));
                used = 0;
            }
            if used > 0 {
                line.push(' ');
                used += 1;
            }
            // words wider than the box are hard-broken
            for ch in word.chars() {
                if used == max_w {
                    lines.push(std::mem::take(&mut line));
                    used = 0;
                }
                line.push(ch);
                used += 1;
            }
        }
        lines.push(line);
    }
    lines
}

/// Modal message box in the middle of the screen.
pub(crate) fn draw_center_box(buf: &mut CellBuffer, title: &str, body: &str) {
    let w = buf.w;
    let h = buf.h;

    let bw = 60.min(w.saturating_sub(4));
    let inner = bw.saturating_sub(4) as usize;
    let mut lines = wrap(body, inner);
    lines.push(String::new());
    lines.push("Press Enter to continue".to_string());

    let bh = (lines.len() as u16 + 4).min(h.saturating_sub(2));
    let x0 = (w - bw) / 2;
    let y0 = h.saturating_sub(bh) / 2;
    let rect = CellRect {
        x0,
        y0,
        x1: x0 + bw,
        y1: y0 + bh,
    };

    fill_rect(buf, rect);
    draw_box(buf, rect, FG);
    draw_text(buf, x0 + 2, y0 + 1, title, HI);

    let mut yy = y0 + 3;
    for (i, line) in lines.iter().enumerate() {
        if yy >= rect.y1.saturating_sub(1) {
            break;
        }
        let fg = if i + 1 == lines.len() { DIM } else { FG };
        draw_text(buf, x0 + 2, yy, line, fg);
        yy += 1;
    }
}

/* -----------------------------
   Parameter form
------------------------------ */

const FIELD_W: usize = 18;
const FORM_W: u16 = 66;
const FORM_H: u16 = 19;

const FORM_HINT: &str = "* Tip: set the magnification to 1 to see the true scale \
    (the Moon's path almost coincides with Earth's orbit).";

/// Visible slice of a field's text and the cursor column inside it.
fn field_window(text: &str, cursor: usize) -> (String, usize) {
    let start = (cursor + 1).saturating_sub(FIELD_W);
    let shown: String = text.chars().skip(start).take(FIELD_W).collect();
    (shown, cursor - start)
}

/// Draws the form centred on screen; labels of fields in `bad` are highlighted.
pub(crate) fn draw_form(buf: &mut CellBuffer, form: &Form, bad: &[FieldId]) {
    buf.clear();
    draw_text(buf, 1, 0, "Orbit simulator - parameters", FG);
    draw_text(
        buf,
        1,
        buf.h.saturating_sub(1),
        "Tab/Up/Down move | Enter generate | Esc quit",
        DIM,
    );

    let bw = FORM_W.min(buf.w);
    let bh = FORM_H.min(buf.h.saturating_sub(2));
    let x0 = (buf.w - bw) / 2;
    let y0 = 1 + buf.h.saturating_sub(2).saturating_sub(bh) / 2;
    let rect = CellRect {
        x0,
        y0,
        x1: x0 + bw,
        y1: y0 + bh,
    };
    draw_box(buf, rect, DIM);

    let heading = "Orbit parameters";
    let hx = x0 + bw.saturating_sub(heading.len() as u16) / 2;
    draw_text(buf, hx, y0 + 1, heading, FG);

    let field_x = (x0 + bw).saturating_sub(FIELD_W as u16 + 5);
    for (i, field) in form.fields().iter().enumerate() {
        let y = y0 + 3 + 2 * i as u16;
        let focused = form.focus() == Focus::Field(field.id);
        let label_fg = if bad.contains(&field.id) { BAD } else { FG };
        draw_text(buf, x0 + 3, y, field.id.label(), label_fg);

        draw_text(buf, field_x, y, "[", DIM);
        draw_text(buf, field_x + FIELD_W as u16 + 2, y, "]", DIM);
        let (shown, cur) = field_window(&field.text, field.cursor);
        let fg = if focused { HI } else { FG };
        draw_text(buf, field_x + 1, y, &shown, fg);
        if focused {
            let cx = field_x + 1 + cur as u16;
            let ch = shown.chars().nth(cur).unwrap_or(' ');
            buf.set(
                cx,
                y,
                Cell {
                    ch,
                    fg,
                    bg: BG,
                    inverse: true,
                },
            );
        }
    }

    let button = "[ Generate trajectory ]";
    let by = y0 + 3 + 2 * FieldId::ALL.len() as u16;
    let bx = x0 + bw.saturating_sub(button.len() as u16) / 2;
    if form.focus() == Focus::Submit {
        for (i, ch) in button.chars().enumerate() {
            buf.set(
                bx + i as u16,
                by,
                Cell {
                    ch,
                    fg: HI,
                    bg: BG,
                    inverse: true,
                },
            );
        }
    } else {
        draw_text(buf, bx, by, button, FG);
    }

    for (i, line) in wrap(FORM_HINT, bw.saturating_sub(6) as usize).iter().enumerate() {
        let y = by + 2 + i as u16;
        if y >= rect.y1.saturating_sub(1) {
            break;
        }
        draw_text(buf, x0 + 3, y, line, DIM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braille_cell_from_two_dots() {
        let mut canvas = PixelCanvas::new(4, 4);
        let ink = Pixel {
            r: 200,
            g: 100,
            b: 0,
            a: 255,
        };
        canvas.blend_over(0, 0, ink);
        canvas.blend_over(1, 3, ink);
        let mut buf = CellBuffer::new(2, 1);
        let area = CellRect {
            x0: 0,
            y0: 0,
            x1: 2,
            y1: 1,
        };
        canvas_to_cells(&canvas, &mut buf, area, GlyphSet::Braille);
        let c = buf.get(0, 0).unwrap();
        assert_eq!(c.ch, char::from_u32(0x2800 + 0x01 + 0x80).unwrap());
        assert_eq!(c.fg, Color::Rgb { r: 200, g: 100, b: 0 });
    }

    #[test]
    fn empty_cells_keep_underlying_text() {
        let canvas = PixelCanvas::new(4, 4);
        let mut buf = CellBuffer::new(2, 1);
        draw_text(&mut buf, 0, 0, "ab", FG);
        let area = CellRect {
            x0: 0,
            y0: 0,
            x1: 2,
            y1: 1,
        };
        canvas_to_cells(&canvas, &mut buf, area, GlyphSet::Braille);
        assert_eq!(buf.row_text(0), "ab");
    }

    #[test]
    fn faint_pixels_are_not_ink() {
        let mut canvas = PixelCanvas::new(1, 1);
        canvas.blend_over(0, 0, Pixel::from_rgb(Rgb { r: 1, g: 2, b: 3 }, 0.1));
        let mut buf = CellBuffer::new(1, 1);
        let area = CellRect {
            x0: 0,
            y0: 0,
            x1: 1,
            y1: 1,
        };
        canvas_to_cells(&canvas, &mut buf, area, GlyphSet::Ascii);
        assert_eq!(buf.get(0, 0).unwrap().ch, ' ');

        canvas.blend_over(0, 0, Pixel::from_rgb(Rgb { r: 1, g: 2, b: 3 }, 1.0));
        canvas_to_cells(&canvas, &mut buf, area, GlyphSet::Ascii);
        assert_eq!(buf.get(0, 0).unwrap().ch, '#');
    }

    #[test]
    fn blending_accumulates_alpha() {
        let mut canvas = PixelCanvas::new(1, 1);
        let half = Pixel::from_rgb(Rgb { r: 255, g: 255, b: 255 }, 0.5);
        canvas.blend_over(0, 0, half);
        canvas.blend_over(0, 0, half);
        assert!(canvas.get(0, 0).a > 180);
        canvas.blend_over(-1, 0, half);
        canvas.blend_over(5, 5, half);
    }

    #[test]
    fn wrap_respects_width_and_newlines() {
        let lines = wrap("one two three\nfour", 8);
        assert_eq!(lines, vec!["one two", "three", "four"]);
        assert!(wrap("x", 0).is_empty());
    }

    #[test]
    fn wrap_breaks_words_wider_than_the_line() {
        assert_eq!(wrap("ab abcdefghij", 4), vec!["ab", "abcd", "efgh", "ij"]);
        assert!(wrap(&"9".repeat(70), 56).iter().all(|l| l.chars().count() <= 56));
    }

    #[test]
    fn long_dialog_text_stays_inside_the_box() {
        let mut buf = CellBuffer::new(80, 24);
        let body = format!("Sun-Earth distance: \"{}\" is not a number", "9".repeat(70));
        draw_center_box(&mut buf, "Input error", &body);
        // 60 wide box centred in 80 columns: borders at 10 and 69
        let mut nines = 0;
        for y in 0..24 {
            let row: Vec<char> = buf.row_text(y).chars().collect();
            assert_ne!(row[69], '9', "row {y} overwrote the border");
            assert!(row[70..].iter().all(|&c| c != '9'), "row {y} ran past the box");
            nines += row[..69].iter().filter(|&&c| c == '9').count();
        }
        assert_eq!(nines, 70);
    }

    #[test]
    fn center_box_shows_title_and_body() {
        let mut buf = CellBuffer::new(80, 24);
        draw_center_box(&mut buf, "Input error", "Bad value");
        let all: String = (0..24).map(|y| buf.row_text(y)).collect::<Vec<_>>().join("\n");
        assert!(all.contains("Input error"));
        assert!(all.contains("Bad value"));
        assert!(all.contains("Press Enter to continue"));
        assert!(all.contains('┌'));
    }

    #[test]
    fn field_window_follows_cursor() {
        assert_eq!(field_window("12345", 5), ("12345".to_string(), 5));
        let long = "0123456789abcdefghijkl";
        let (shown, cur) = field_window(long, long.len());
        assert_eq!(shown.chars().count(), FIELD_W - 1);
        assert_eq!(cur, FIELD_W - 1);
        assert!(shown.ends_with("ijkl"));
        assert_eq!(field_window(long, 0).0, long[..FIELD_W]);
    }

    #[test]
    fn form_shows_defaults_and_button() {
        let mut buf = CellBuffer::new(80, 24);
        draw_form(&mut buf, &Form::default(), &[]);
        let all: Vec<String> = (0..24).map(|y| buf.row_text(y)).collect();
        assert!(all.iter().any(|r| r.contains("Orbit parameters")));
        assert!(all.iter().any(|r| r.contains("Sun-Earth mean distance (km):") && r.contains("149600000")));
        assert!(all.iter().any(|r| r.contains("27.32")));
        assert!(all.iter().any(|r| r.contains("[ Generate trajectory ]")));
        assert!(all.iter().any(|r| r.contains("* Tip:")));
        // focused field shows an inverse cursor cell
        assert!(buf.cells.iter().any(|c| c.inverse));
    }

    #[test]
    fn bad_fields_are_marked() {
        let mut buf = CellBuffer::new(80, 24);
        draw_form(&mut buf, &Form::default(), &[FieldId::Month]);
        assert!(buf.cells.iter().any(|c| c.ch == 'M' && c.fg == BAD));
    }
}
