use crate::terminal::Terminal;
use crossterm::style::Color;

pub const WAVE_HELP: &str = "\
TERMWAVE
─────────────────────────
 a/A     Amplitude -/+
 w/W     Wavelength -/+
 c/C     Cycles -/+
 s/S     Speed -/+
 1-9     Speed preset, 0 = still
 -       Reverse direction
 t/T     Thickness -/+
 e/E     Squareness -/+
 f       Sine / rounded
 d       Dark / light
 r       Reset
 Space   Pause/resume
 ?       Close help
 q/Esc   Quit
─────────────────────────";

const BORDER_COLOR: Color = Color::White;
const TEXT_COLOR: Color = Color::Grey;

/// Draw `help_text` in a bordered box centered on the terminal.
pub fn render_help_overlay(term: &mut Terminal, help_text: &str) {
    let lines: Vec<&str> = help_text.lines().collect();
    if lines.is_empty() {
        return;
    }

    let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
    let (width, height) = term.size();
    let left = (width as usize).saturating_sub(inner + 2) as i32 / 2;
    let top = (height as usize).saturating_sub(lines.len() + 2) as i32 / 2;

    let rule = "─".repeat(inner);
    term.set_str(left, top, &format!("┌{rule}┐"), Some(BORDER_COLOR));
    for (row, line) in (top + 1..).zip(&lines) {
        term.set(left, row, '│', Some(BORDER_COLOR));
        term.set_str(left + 1, row, &format!(" {:<w$} ", line, w = inner - 2), Some(TEXT_COLOR));
        term.set(left + inner as i32 + 1, row, '│', Some(BORDER_COLOR));
    }
    term.set_str(left, top + lines.len() as i32 + 1, &format!("└{rule}┘"), Some(BORDER_COLOR));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_is_centered_and_bordered() {
        let mut term = Terminal::offscreen(20, 6);
        render_help_overlay(&mut term, "ab\ncd");
        // box is 6 wide, 4 tall
        assert_eq!(term.get(7, 1).map(|c| c.ch), Some('┌'));
        assert_eq!(term.get(12, 4).map(|c| c.ch), Some('┘'));
        assert_eq!(term.get(9, 2).map(|c| c.ch), Some('a'));
    }

    #[test]
    fn empty_text_draws_nothing() {
        let mut term = Terminal::offscreen(10, 4);
        render_help_overlay(&mut term, "");
        assert_eq!(term.get(0, 0).map(|c| c.ch), Some(' '));
    }

    #[test]
    fn help_lists_quit() {
        assert!(WAVE_HELP.contains("Quit"));
    }
}
