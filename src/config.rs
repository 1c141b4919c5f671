use crate::wave::phase::PhaseMode;
use serde::Deserialize;

/// Minimum wavelength as a multiple of the stroke thickness
pub const MIN_WAVELENGTH_TO_THICKNESS: f64 = 2.0;

/// Accepted range for braille dots per logical unit
pub const MIN_SCALE: f64 = 0.25;
pub const MAX_SCALE: f64 = 8.0;

/// Bound a requested scale; unusable values fall back to 1.0
pub fn clamp_scale(scale: f64) -> f64 {
    if scale > 0.0 && scale.is_finite() {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    } else {
        1.0
    }
}

/// Shape of the wave for one frame. Replaced wholesale on every edit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeParameters {
    pub amplitude: f64,
    pub wavelength: f64,
    pub cycles: f64,
    pub speed: f64,
    pub thickness: f64,
    pub squareness: f64, // Sine family only
}

impl Default for ShapeParameters {
    fn default() -> Self {
        Self {
            amplitude: WaveParameter::Amplitude.bounds().default,
            wavelength: WaveParameter::Wavelength.bounds().default,
            cycles: WaveParameter::Cycles.bounds().default,
            speed: WaveParameter::Speed.bounds().default,
            thickness: WaveParameter::Thickness.bounds().default,
            squareness: WaveParameter::Squareness.bounds().default,
        }
    }
}

impl ShapeParameters {
    pub fn get(&self, param: WaveParameter) -> f64 {
        match param {
            WaveParameter::Amplitude => self.amplitude,
            WaveParameter::Wavelength => self.wavelength,
            WaveParameter::Cycles => self.cycles,
            WaveParameter::Speed => self.speed,
            WaveParameter::Thickness => self.thickness,
            WaveParameter::Squareness => self.squareness,
        }
    }

    pub fn set(&mut self, param: WaveParameter, value: f64) {
        match param {
            WaveParameter::Amplitude => self.amplitude = value,
            WaveParameter::Wavelength => self.wavelength = value,
            WaveParameter::Cycles => self.cycles = value,
            WaveParameter::Speed => self.speed = value,
            WaveParameter::Thickness => self.thickness = value,
            WaveParameter::Squareness => self.squareness = value,
        }
    }

    /// Length of the drawn span in logical units
    pub fn total_span(&self) -> f64 {
        self.cycles * self.wavelength
    }
}

/// Which curve generator draws the wave
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveFamily {
    #[default]
    Sine,    // Sampled sine with squareness, resampled by arc length
    Rounded, // Vertical sides joined by semicircles
}

impl CurveFamily {
    /// Parse a family name, accepting the same aliases as the CLI
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "sine" | "sin" | "smooth" => Some(CurveFamily::Sine),
            "rounded" | "round" | "square" | "segmented" | "parametric" => Some(CurveFamily::Rounded),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CurveFamily::Sine => "sine",
            CurveFamily::Rounded => "rounded",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            CurveFamily::Sine => CurveFamily::Rounded,
            CurveFamily::Rounded => CurveFamily::Sine,
        }
    }
}

/// Dark or light display. Only selects stroke colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    Dark,
    Light,
}

impl DisplayMode {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            DisplayMode::Dark
        } else {
            DisplayMode::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == DisplayMode::Dark
    }

    pub fn toggled(self) -> Self {
        Self::from_dark(!self.is_dark())
    }
}

/// Everything the renderer reads from the settings collaborator in one tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaveSettings {
    pub params: ShapeParameters,
    pub family: CurveFamily,
    pub mode: DisplayMode,
}

/// User-adjustable parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveParameter {
    Amplitude,
    Wavelength,
    Cycles,
    Speed,
    Thickness,
    Squareness,
}

/// Slider-style range for one parameter
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl ParameterBounds {
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }
}

impl WaveParameter {
    pub const ALL: [WaveParameter; 6] = [
        WaveParameter::Amplitude,
        WaveParameter::Wavelength,
        WaveParameter::Cycles,
        WaveParameter::Speed,
        WaveParameter::Thickness,
        WaveParameter::Squareness,
    ];

    /// Ranges are in braille dots at scale 1.0
    pub const fn bounds(self) -> ParameterBounds {
        match self {
            WaveParameter::Amplitude => ParameterBounds { min: 2.0, max: 200.0, step: 2.0, default: 30.0 },
            WaveParameter::Wavelength => ParameterBounds { min: 4.0, max: 400.0, step: 4.0, default: 80.0 },
            WaveParameter::Cycles => ParameterBounds { min: 0.0, max: 8.0, step: 0.1, default: 2.5 },
            WaveParameter::Speed => ParameterBounds { min: -5.0, max: 5.0, step: 0.2, default: 2.0 },
            WaveParameter::Thickness => ParameterBounds { min: 1.0, max: 20.0, step: 1.0, default: 2.0 },
            WaveParameter::Squareness => ParameterBounds { min: 0.0, max: 1.0, step: 0.05, default: 0.0 },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WaveParameter::Amplitude => "amp",
            WaveParameter::Wavelength => "wavelen",
            WaveParameter::Cycles => "cycles",
            WaveParameter::Speed => "speed",
            WaveParameter::Thickness => "thick",
            WaveParameter::Squareness => "square",
        }
    }
}

/// Configuration for the interactive animation
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub settings: WaveSettings,
    pub phase_mode: PhaseMode,
    pub fps: u32,
    pub scale: f64, // Dots per logical unit
}

/// Configuration for printing a single frame
#[derive(Clone, Debug)]
pub struct FrameConfig {
    pub settings: WaveSettings,
    pub phase: f64, // Normalized phase, in wavelengths
    pub width: u16,
    pub height: u16,
    pub scale: f64,
}
