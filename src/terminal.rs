use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Colors, Print, ResetColor, SetColors},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    alternate_screen: bool,
}

/// A single cell in the terminal buffer
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: None,
        bg: None,
    };

    fn colors(&self) -> (Option<Color>, Option<Color>) {
        (self.fg, self.bg)
    }
}

impl Terminal {
    /// Initialize the terminal for drawing
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = size()?;

        if alternate_screen {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
        }

        Ok(Self {
            width,
            height,
            buffer: Self::blank(width, height),
            alternate_screen,
        })
    }

    /// Buffer-only terminal of a fixed size (print mode, no tty needed)
    pub fn offscreen(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            buffer: Self::blank(width, height),
            alternate_screen: false,
        }
    }

    fn blank(width: u16, height: u16) -> Vec<Vec<Cell>> {
        vec![vec![Cell::BLANK; width as usize]; height as usize]
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Reallocate the buffer for new dimensions
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = Self::blank(width, height);
    }

    pub fn clear(&mut self) {
        self.buffer.iter_mut().flatten().for_each(|cell| *cell = Cell::BLANK);
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))
    }

    /// Set a character at position, keeping the cell's background
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(cell) = self.buffer.get_mut(y as usize).and_then(|row| row.get_mut(x as usize)) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg);
        }
    }

    /// Paint the background of every cell
    pub fn fill_background(&mut self, bg: Color) {
        self.buffer.iter_mut().flatten().for_each(|cell| cell.bg = Some(bg));
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.buffer.get(y as usize)?.get(x as usize)
    }

    /// Render the entire buffer to screen
    pub fn present(&self) -> io::Result<()> {
        let mut out = stdout().lock();
        self.write_cells(&mut out, true)?;
        out.flush()
    }

    /// Write the buffer as plain lines with ANSI colors (for print mode)
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.write_cells(out, false)?;
        out.flush()
    }

    /// Emits color changes only where they differ from the previous cell
    fn write_cells<W: Write>(&self, out: &mut W, positioned: bool) -> io::Result<()> {
        for (y, row) in self.buffer.iter().enumerate() {
            if positioned {
                queue!(out, MoveTo(0, y as u16))?;
            }
            let mut current = (None, None);
            for cell in row {
                if cell.colors() != current {
                    if current != (None, None) {
                        queue!(out, ResetColor)?;
                    }
                    let colors = Colors {
                        foreground: cell.fg,
                        background: cell.bg,
                    };
                    if colors.foreground.is_some() || colors.background.is_some() {
                        queue!(out, SetColors(colors))?;
                    }
                    current = cell.colors();
                }
                queue!(out, Print(cell.ch))?;
            }
            if current != (None, None) {
                queue!(out, ResetColor)?;
            }
            if !positioned {
                queue!(out, Print('\n'))?;
            }
        }
        Ok(())
    }

    /// Wait up to `timeout` for a keypress, returns (code, modifiers)
    pub fn poll_key(&self, timeout: Duration) -> io::Result<Option<(KeyCode, KeyModifiers)>> {
        if poll(timeout)? {
            if let Event::Key(key_event) = read()? {
                if key_event.kind != KeyEventKind::Release {
                    return Ok(Some((key_event.code, key_event.modifiers)));
                }
            }
        }
        Ok(None)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}
