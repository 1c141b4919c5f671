//! Interactive terminal host for the wave animation
//!
//! Controls:
//! - a/A w/W c/C s/S t/T e/E: Nudge amplitude, wavelength, cycles, speed, thickness, squareness
//! - 1-9: Speed preset, 0: Still, -: Reverse
//! - f: Toggle sine / rounded
//! - d: Toggle dark / light
//! - r: Reset
//! - Space: Pause
//! - ?: Help
//! - Q/Esc: Quit

use crate::canvas::BrailleCanvas;
use crate::colors;
use crate::config::{CurveFamily, FrameConfig, RunConfig, WaveParameter, WaveSettings};
use crate::help::{render_help_overlay, WAVE_HELP};
use crate::settings::SettingsStore;
use crate::terminal::Terminal;
use crate::wave::driver::{AnimationDriver, SettingsSlot};
use crate::wave::phase::{PhaseIntegrator, PhaseMode};
use crate::wave::scheduler::PacedScheduler;
use crossterm::event::{KeyCode, KeyModifiers};
use log::{debug, info};
use std::io;
use std::time::{Duration, Instant};

/// Rows reserved below the canvas for the status line
const STATUS_ROWS: u16 = 1;
/// Longest wait for input before checking the scheduler again
const MAX_POLL: Duration = Duration::from_millis(50);

/// What a keypress asks the host loop to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
    TogglePause,
    ToggleHelp,
    SettingsChanged,
}

/// Map a keypress onto the settings store
pub fn handle_key(code: KeyCode, modifiers: KeyModifiers, store: &mut SettingsStore) -> KeyAction {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    let nudge = |c: char| -> Option<(WaveParameter, i32)> {
        let param = match c.to_ascii_lowercase() {
            'a' => WaveParameter::Amplitude,
            'w' => WaveParameter::Wavelength,
            'c' => WaveParameter::Cycles,
            's' => WaveParameter::Speed,
            't' => WaveParameter::Thickness,
            'e' => WaveParameter::Squareness,
            _ => return None,
        };
        Some((param, if c.is_ascii_uppercase() { 1 } else { -1 }))
    };

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Char(' ') => return KeyAction::TogglePause,
        KeyCode::Char('?') | KeyCode::Char('h') => return KeyAction::ToggleHelp,
        KeyCode::Char('f') => store.toggle_family(),
        KeyCode::Char('d') => store.toggle_display_mode(),
        KeyCode::Char('r') => store.reset(),
        KeyCode::Char('-') => {
            let speed = store.settings().params.speed;
            store.set(WaveParameter::Speed, -speed);
        }
        // Number keys: speed presets (0 = still, 9 = fastest)
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let n = c.to_digit(10).unwrap_or(0) as f64;
            let sign = if store.settings().params.speed < 0.0 { -1.0 } else { 1.0 };
            store.set(WaveParameter::Speed, sign * n * 0.5);
        }
        KeyCode::Char(c) => match nudge(c) {
            Some((param, direction)) => store.step(param, direction),
            None => return KeyAction::None,
        },
        _ => return KeyAction::None,
    }
    KeyAction::SettingsChanged
}

/// One-line summary of the current settings
pub fn status_line(settings: &WaveSettings, paused: bool) -> String {
    let mut line = format!(" {}", settings.family.name());
    for param in WaveParameter::ALL {
        if param == WaveParameter::Squareness && settings.family != CurveFamily::Sine {
            continue;
        }
        let step = param.bounds().step;
        let decimals = if step >= 1.0 { 0 } else if step >= 0.1 { 1 } else { 2 };
        line.push_str(&format!(" │ {} {:.*}", param.label(), decimals, settings.params.get(param)));
    }
    line.push_str(if settings.mode.is_dark() { " │ dark" } else { " │ light" });
    if paused {
        line.push_str(" │ PAUSED");
    }
    line.push_str("   ? help");
    line
}

fn compose(term: &mut Terminal, canvas: &BrailleCanvas, settings: &WaveSettings, paused: bool, show_help: bool) {
    let (_, height) = term.size();
    term.clear();
    term.fill_background(colors::background_color(settings.mode));
    canvas.blit(term, 0);
    let status = status_line(settings, paused);
    term.set_str(0, height.saturating_sub(STATUS_ROWS) as i32, &status, Some(colors::status_color(settings.mode)));
    if show_help {
        render_help_overlay(term, WAVE_HELP);
    }
}

/// Run the interactive animation until the user quits
pub fn run(config: RunConfig) -> io::Result<()> {
    let mut term = Terminal::new(true)?;
    term.clear_screen()?;

    let slot = SettingsSlot::new(config.settings);
    let mut store = SettingsStore::new(config.settings, slot.clone());
    let mut scheduler = PacedScheduler::new(config.fps);
    let mut driver = AnimationDriver::new(slot, config.phase_mode);
    let mut canvas = BrailleCanvas::new();

    let (mut prev_w, mut prev_h) = term.size();
    let surface = BrailleCanvas::surface_for_cells(prev_w, prev_h.saturating_sub(STATUS_ROWS), config.scale);
    driver.start(Some(&mut canvas), surface, &mut scheduler);
    info!(
        "termwave running every {:?} at scale {}",
        scheduler.interval(),
        config.scale
    );

    let mut show_help = false;
    let mut dirty = true;

    loop {
        let (width, height) = crossterm::terminal::size().unwrap_or(term.size());

        if width != prev_w || height != prev_h {
            term.resize(width, height);
            term.clear_screen()?;
            prev_w = width;
            prev_h = height;
            let surface = BrailleCanvas::surface_for_cells(width, height.saturating_sub(STATUS_ROWS), config.scale);
            driver.resize(&mut canvas, surface);
            dirty = true;
        }

        let paused = !driver.is_running();
        let now = Instant::now();
        if let Some((handle, timestamp)) = scheduler.take_due(now) {
            driver.on_frame(handle, timestamp, Some(&mut canvas), &mut scheduler);
            dirty = true;
        } else if dirty && paused {
            driver.redraw(Some(&mut canvas));
        }

        if dirty {
            compose(&mut term, &canvas, &store.settings(), paused, show_help);
            term.present()?;
            dirty = false;
        }

        let timeout = scheduler
            .next_deadline()
            .map_or(MAX_POLL, |deadline| deadline.saturating_duration_since(Instant::now()))
            .min(MAX_POLL);

        if let Some((code, mods)) = term.poll_key(timeout)? {
            match handle_key(code, mods, &mut store) {
                KeyAction::Quit => break,
                KeyAction::TogglePause => {
                    if driver.is_running() {
                        driver.stop(&mut scheduler);
                        debug!("paused at phase {:.3}", driver.normalized_phase());
                    } else {
                        let (w, h) = term.size();
                        let surface = BrailleCanvas::surface_for_cells(w, h.saturating_sub(STATUS_ROWS), config.scale);
                        driver.start(Some(&mut canvas), surface, &mut scheduler);
                    }
                    dirty = true;
                }
                KeyAction::ToggleHelp => {
                    show_help = !show_help;
                    dirty = true;
                }
                KeyAction::SettingsChanged => {
                    debug!("settings now {:?}", store.settings());
                    dirty = true;
                }
                KeyAction::None => {}
            }
        }
    }

    driver.stop(&mut scheduler);
    info!("termwave exiting after {} frames", driver.frames());
    Ok(())
}

/// Render a single frame into an offscreen buffer
pub fn render_frame(config: &FrameConfig) -> Terminal {
    let mut term = Terminal::offscreen(config.width, config.height);
    let slot = SettingsSlot::new(config.settings);
    let store = SettingsStore::new(config.settings, slot.clone());
    let mut driver = AnimationDriver::with_integrator(slot, PhaseIntegrator::with_phase(PhaseMode::Timed, config.phase));

    let mut canvas = BrailleCanvas::new();
    driver.resize(&mut canvas, BrailleCanvas::surface_for_cells(config.width, config.height, config.scale));
    driver.redraw(Some(&mut canvas));

    canvas.blit(&mut term, 0);
    debug!("printed frame with {:?}", store.settings());
    term
}
