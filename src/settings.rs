use crate::config::{
    CurveFamily, DisplayMode, WaveParameter, WaveSettings, MIN_WAVELENGTH_TO_THICKNESS,
};
use crate::error::SettingsError;
use crate::wave::driver::SettingsSlot;
use crate::wave::phase::PhaseMode;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `config.toml`
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub wave: WaveFileSettings,
}

/// Optional overrides for the built-in defaults
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaveFileSettings {
    pub amplitude: Option<f64>,
    pub wavelength: Option<f64>,
    pub cycles: Option<f64>,
    pub speed: Option<f64>,
    pub thickness: Option<f64>,
    pub squareness: Option<f64>,
    pub family: Option<CurveFamily>,
    pub dark: Option<bool>,
    pub fps: Option<u32>,
    pub scale: Option<f64>,
    pub phase_mode: Option<PhaseMode>,
}

impl Settings {
    /// Load from the default location. A missing file yields the defaults.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            debug!("no settings file at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("termwave")
            .join("config.toml")
    }

    /// Layer the file's overrides on top of `base`
    pub fn apply(&self, base: WaveSettings) -> WaveSettings {
        let file = &self.wave;
        let mut settings = base;
        let overrides = [
            (WaveParameter::Amplitude, file.amplitude),
            (WaveParameter::Wavelength, file.wavelength),
            (WaveParameter::Cycles, file.cycles),
            (WaveParameter::Speed, file.speed),
            (WaveParameter::Thickness, file.thickness),
            (WaveParameter::Squareness, file.squareness),
        ];
        for (param, value) in overrides {
            if let Some(value) = value {
                settings.params.set(param, value);
            }
        }
        if let Some(family) = file.family {
            settings.family = family;
        }
        if let Some(dark) = file.dark {
            settings.mode = DisplayMode::from_dark(dark);
        }
        settings
    }
}

/// Owns the editable settings, enforces their constraints and publishes
/// every accepted change to the animation's snapshot slot.
pub struct SettingsStore {
    current: WaveSettings,
    defaults: WaveSettings,
    slot: SettingsSlot,
}

impl SettingsStore {
    pub fn new(defaults: WaveSettings, slot: SettingsSlot) -> Self {
        let defaults = constrain(defaults);
        slot.publish(defaults);
        Self {
            current: defaults,
            defaults,
            slot,
        }
    }

    pub fn settings(&self) -> WaveSettings {
        self.current
    }

    /// Set a parameter, clamped to its bounds
    pub fn set(&mut self, param: WaveParameter, value: f64) {
        let mut next = self.current;
        next.params.set(param, param.bounds().clamp(value));
        self.commit(next);
    }

    /// Nudge a parameter by `direction` steps
    pub fn step(&mut self, param: WaveParameter, direction: i32) {
        let bounds = param.bounds();
        let value = self.current.params.get(param) + bounds.step * direction as f64;
        // Snap to the step grid so repeated nudges do not drift
        let snapped = ((value - bounds.min) / bounds.step).round() * bounds.step + bounds.min;
        self.set(param, snapped);
    }

    pub fn set_family(&mut self, family: CurveFamily) {
        let mut next = self.current;
        next.family = family;
        self.commit(next);
    }

    pub fn toggle_family(&mut self) {
        self.set_family(self.current.family.toggled());
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        let mut next = self.current;
        next.mode = mode;
        self.commit(next);
    }

    pub fn toggle_display_mode(&mut self) {
        self.set_display_mode(self.current.mode.toggled());
    }

    /// Restore the startup settings
    pub fn reset(&mut self) {
        self.commit(self.defaults);
    }

    fn commit(&mut self, next: WaveSettings) {
        self.current = constrain(next);
        self.slot.publish(self.current);
    }
}

/// Clamp every parameter and keep the wavelength at least twice the thickness
fn constrain(mut settings: WaveSettings) -> WaveSettings {
    for param in WaveParameter::ALL {
        let value = settings.params.get(param);
        settings.params.set(param, param.bounds().clamp(value));
    }
    let params = &mut settings.params;
    let min_wavelength = params.thickness * MIN_WAVELENGTH_TO_THICKNESS;
    if params.wavelength < min_wavelength {
        params.wavelength = min_wavelength;
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn store() -> (SettingsStore, SettingsSlot) {
        let slot = SettingsSlot::default();
        (SettingsStore::new(WaveSettings::default(), slot.clone()), slot)
    }

    #[test]
    fn changes_are_published() {
        let (mut store, slot) = store();
        store.set(WaveParameter::Amplitude, 44.0);
        assert_eq!(slot.snapshot().params.amplitude, 44.0);
        store.toggle_display_mode();
        assert_eq!(slot.snapshot().mode, DisplayMode::Light);
        store.toggle_family();
        assert_eq!(slot.snapshot().family, CurveFamily::Rounded);
    }

    #[test]
    fn thicker_stroke_raises_wavelength() {
        let (mut store, slot) = store();
        store.set(WaveParameter::Wavelength, 10.0);
        store.set(WaveParameter::Thickness, 12.0);
        assert_eq!(slot.snapshot().params.wavelength, 24.0);
    }

    #[test]
    fn wavelength_cannot_drop_below_twice_thickness() {
        let (mut store, _) = store();
        store.set(WaveParameter::Thickness, 10.0);
        store.set(WaveParameter::Wavelength, 4.0);
        assert_eq!(store.settings().params.wavelength, 20.0);
    }

    #[test]
    fn values_are_clamped_to_bounds() {
        let (mut store, _) = store();
        store.set(WaveParameter::Cycles, 99.0);
        assert_eq!(store.settings().params.cycles, WaveParameter::Cycles.bounds().max);
        store.set(WaveParameter::Speed, -99.0);
        assert_eq!(store.settings().params.speed, WaveParameter::Speed.bounds().min);
    }

    #[test]
    fn steps_stay_on_grid() {
        let (mut store, _) = store();
        for _ in 0..7 {
            store.step(WaveParameter::Cycles, 1);
        }
        assert_abs_diff_eq!(store.settings().params.cycles, 3.2, epsilon = 1e-9);
        for _ in 0..40 {
            store.step(WaveParameter::Cycles, -1);
        }
        assert_eq!(store.settings().params.cycles, 0.0);
    }

    #[test]
    fn reset_restores_startup_values() {
        let slot = SettingsSlot::default();
        let mut startup = WaveSettings::default();
        startup.params.speed = -1.0;
        let mut store = SettingsStore::new(startup, slot.clone());
        store.set(WaveParameter::Speed, 4.0);
        store.set_display_mode(DisplayMode::Light);
        store.reset();
        assert_eq!(slot.snapshot(), startup);
    }

    #[test]
    fn parses_file_overrides() {
        let settings = Settings::parse(
            r#"
            [wave]
            amplitude = 12.0
            family = "rounded"
            dark = false
            phase_mode = "fixed-step"
            "#,
        )
        .unwrap();
        let applied = settings.apply(WaveSettings::default());
        assert_eq!(applied.params.amplitude, 12.0);
        assert_eq!(applied.family, CurveFamily::Rounded);
        assert_eq!(applied.mode, DisplayMode::Light);
        assert_eq!(settings.wave.phase_mode, Some(PhaseMode::FixedStep));
        assert_eq!(applied.params.wavelength, WaveSettings::default().params.wavelength);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Settings::parse("[wave]\namplitud = 3.0\n").is_err());
    }

    #[test]
    fn empty_file_is_default() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings.apply(WaveSettings::default()), WaveSettings::default());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = std::env::temp_dir().join("termwave-does-not-exist").join("config.toml");
        assert!(Settings::load_from(&path).is_ok());
    }
}
