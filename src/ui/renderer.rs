//! Presentation layer: double-buffered, diff-based terminal renderer.
//!
//! How it works:
//!   1. Compose the next frame into the `front` buffer (a grid of Cell)
//!   2. Compare each cell with the `back` buffer (previous frame)
//!   3. Emit terminal commands only for cells that changed
//!   4. Batch everything with `queue!` and flush once at the end
//!   5. Swap front/back
//!
//! Composition is a pure function of `App`, so it is tested against a
//! bare FrameBuffer without touching the terminal.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::app::{App, Screen};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for every empty cell. Using the same RGB for
    /// `Clear(ClearType::All)` keeps inter-row gaps the same color.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never produced by composition, so filling the back buffer with it
    /// forces a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            *self = FrameBuffer::new(w, h);
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). One column per char, clipped at the edge.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, bg: Color) {
        for row in y..y + h {
            for col in x..x + w {
                self.set(col, row, Cell::new(' ', Color::White, bg));
            }
        }
    }

    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }
}

// ── Layout ──

/// Terminal columns per fragment button, including the gap.
const SLOT_W: usize = 10;
/// Rows per grid line (button + spacer).
const SLOT_H: usize = 2;

const HUD_ROW: usize = 0;
const BOARD_ROW: usize = 2;
const LEFT: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const SLOT_BG: Color = Color::Rgb { r: 40, g: 60, b: 120 };
const CURSOR_BG: Color = Color::Rgb { r: 230, g: 190, b: 40 };
const SPENT_BG: Color = Color::Rgb { r: 30, g: 30, b: 45 };
const SOLVED: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const HEADER: Color = Color::Rgb { r: 255, g: 220, b: 50 };
const DIM: Color = Color::DarkGrey;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.sync_size(true)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, app: &App, force: bool) -> io::Result<()> {
        self.sync_size(force)?;

        self.front.clear();
        compose(&mut self.front, app);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    /// Track the terminal size. A change (or `force`) repaints everything.
    fn sync_size(&mut self, force: bool) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (tw, th) = (tw as usize, th as usize);
        if force || tw != self.term_w || th != self.term_h {
            self.term_w = tw;
            self.term_h = th;
            self.front.resize(tw, th);
            self.back.resize(tw, th);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        // Position the terminal cursor believes it is at, if contiguous.
        let mut pen: Option<(usize, usize)> = None;

        // Explicit base colors; ResetColor would fall back to the
        // terminal default, which may differ from BASE_BG.
        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if pen != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                pen = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

// ══════════════════════════════════════════════════════════════
//  Compose: build front buffer content
// ══════════════════════════════════════════════════════════════

fn compose(buf: &mut FrameBuffer, app: &App) {
    match app.screen {
        Screen::Playing => compose_board(buf, app),
        Screen::LevelUpPrompt => {
            compose_board(buf, app);
            compose_level_up_overlay(buf, app);
        }
        Screen::LoadFailed => compose_load_failed(buf, app),
        Screen::GameComplete => compose_game_complete(buf, app),
    }
}

fn compose_hud(buf: &mut FrameBuffer, app: &App) {
    let s = &app.session;
    let hud = format!(
        " WORDBITS  Level {:<3} Score {:<5} Streak {}/{}",
        s.level(),
        s.score(),
        s.correct_streak(),
        s.rules().level_up_streak,
    );
    buf.fill_row(HUD_ROW, HUD_BG);
    buf.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

    let source = format!("{} ", app.library.source_name());
    let x = buf.width.saturating_sub(source.chars().count());
    if x > hud.chars().count() {
        buf.put_str(x, HUD_ROW, &source, DIM, HUD_BG);
    }
}

fn compose_board(buf: &mut FrameBuffer, app: &App) {
    let s = &app.session;
    compose_hud(buf, app);

    // ── Clues and answers ──
    let clue_lines: Vec<String> = s.clues().iter().map(|c| c.display()).collect();
    let widest = clue_lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let answer_x = LEFT + widest.min(buf.width * 2 / 3).max(10) + 4;

    buf.put_str(LEFT, BOARD_ROW, "CLUES", HEADER, Color::Reset);
    buf.put_str(answer_x, BOARD_ROW, "ANSWERS", HEADER, Color::Reset);
    for (i, (line, slot)) in clue_lines.iter().zip(s.solutions()).enumerate() {
        let y = BOARD_ROW + 1 + i;
        buf.put_str(LEFT, y, &fit(line, answer_x - LEFT - 2), Color::White, Color::Reset);
        let fg = if slot.is_revealed() { SOLVED } else { DIM };
        buf.put_str(answer_x, y, &slot.display(), fg, Color::Reset);
    }

    // ── Current guess ──
    let guess_row = BOARD_ROW + 2 + s.clues().len();
    let caret = if (app.anim_tick / 4) % 2 == 0 { "_" } else { " " };
    buf.put_str(LEFT, guess_row, "Guess: ", DIM, Color::Reset);
    buf.put_str(
        LEFT + 7,
        guess_row,
        &format!("{}{caret}", s.guess_text()),
        Color::White,
        Color::Reset,
    );

    // ── Fragment grid ──
    let grid_row = guess_row + 2;
    let cols = app.columns;
    for frag in s.fragments().iter() {
        let slot = frag.id().0;
        let x = LEFT + (slot % cols) * SLOT_W;
        let y = grid_row + (slot / cols) * SLOT_H;
        let selected = slot == app.cursor;

        let (label, fg, bg) = match (frag.is_available(), selected) {
            (true, true) => (frag.text(), Color::Black, CURSOR_BG),
            (true, false) => (frag.text(), Color::White, SLOT_BG),
            (false, true) => ("", Color::Black, CURSOR_BG),
            (false, false) => ("", DIM, SPENT_BG),
        };
        let label = format!("{:^w$}", fit(label, SLOT_W - 2), w = SLOT_W - 2);
        buf.put_str(x, y, &label, fg, bg);
    }
    let rows = s.fragments().len().div_ceil(cols);

    // ── Message bar ──
    let msg_row = grid_row + rows * SLOT_H;
    if !app.message.is_empty() {
        buf.fill_row(msg_row, MSG_BG);
        buf.put_str(1, msg_row, &app.message, Color::Black, MSG_BG);
    }

    // ── Help bar ──
    if app.can_advance() && s.guess().is_empty() {
        buf.put_str(0, msg_row + 2, " Level done!  Enter: Next level  Q: Quit", SOLVED, Color::Reset);
    } else {
        let help = " Arrows/WASD: Move  Space: Pick  Enter: Submit  Bksp: Clear  Q: Quit";
        buf.put_str(0, msg_row + 2, help, DIM, Color::Reset);
    }
}

fn compose_level_up_overlay(buf: &mut FrameBuffer, app: &App) {
    let bg = Color::Rgb { r: 40, g: 40, b: 40 };
    let box_w = 44_usize.min(buf.width);
    let box_h = 7;
    let box_x = buf.width.saturating_sub(box_w) / 2;
    let box_y = BOARD_ROW + 2;

    buf.fill_rect(box_x, box_y, box_w, box_h, bg);
    let centered = |text: &str| box_x + box_w.saturating_sub(text.chars().count()) / 2;

    let title = if (app.anim_tick / 8) % 2 == 0 { "★ Well done! ★" } else { "  Well done!  " };
    buf.put_str(centered(title), box_y + 1, title, HEADER, bg);
    let ask = "Are you ready for the next level?";
    buf.put_str(centered(ask), box_y + 3, ask, Color::White, bg);
    let keys = "ENTER: Let's go!   ESC: Keep playing";
    buf.put_str(centered(keys), box_y + 5, keys, SOLVED, bg);
}

fn compose_load_failed(buf: &mut FrameBuffer, app: &App) {
    compose_hud(buf, app);
    let red = Color::Rgb { r: 255, g: 60, b: 60 };
    buf.put_str(LEFT, 3, "LEVEL COULD NOT BE LOADED", red, Color::Reset);
    let reason = app.failure.as_deref().unwrap_or("unknown error");
    buf.put_str(LEFT, 5, &fit(reason, buf.width.saturating_sub(LEFT * 2)), Color::White, Color::Reset);
    buf.put_str(LEFT, 7, "Q / ESC: Quit", DIM, Color::Reset);
}

fn compose_game_complete(buf: &mut FrameBuffer, app: &App) {
    compose_hud(buf, app);
    buf.put_str(LEFT, 3, "★ ALL LEVELS COMPLETE! ★", HEADER, Color::Reset);
    let score = format!("Final Score: {}", app.session.score());
    let levels = format!("Levels cleared: {}", app.library.len());
    buf.put_str(LEFT, 5, &score, Color::White, Color::Reset);
    buf.put_str(LEFT, 6, &levels, SOLVED, Color::Reset);
    buf.put_str(LEFT, 8, "ENTER / Q: Quit", DIM, Color::Reset);
}

/// Truncate to `width` chars, marking the cut with '…'.
fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('…');
    out
}
