use crate::domain::sentiment::{MoodBand, Tone};

/// Value Object - target drawing surface in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
}

impl ChartDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Value Object - space reserved around the plot for axis labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartMargins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for ChartMargins {
    fn default() -> Self {
        Self { top: 8.0, right: 8.0, bottom: 24.0, left: 56.0 }
    }
}

/// Value Object - Color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub const fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn to_hex(&self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self { a: alpha, ..*self }
    }

    /// CSS color string: `#rrggbb` when opaque, `rgba(...)` otherwise.
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            return format!("#{:06x}", self.to_hex());
        }
        let hex = self.to_hex();
        format!(
            "rgba({},{},{},{:.2})",
            (hex >> 16) & 0xFF,
            (hex >> 8) & 0xFF,
            hex & 0xFF,
            self.a.clamp(0.0, 1.0)
        )
    }

    pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

/// Colors for one chart instance. Passed in explicitly so charts with
/// different themes can live side by side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartTheme {
    pub background: Color,
    pub grid: Color,
    pub axis_text: Color,
    pub bullish: Color,
    pub bearish: Color,
    pub crosshair: Color,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background: Color::TRANSPARENT,
            grid: Color::from_hex(0x1F1F2E),
            axis_text: Color::from_hex(0xA0A0A0),
            bullish: Color::from_hex(0x22C55E),
            bearish: Color::from_hex(0xEF4444),
            crosshair: Color::from_hex(0x9893C4),
        }
    }
}

impl ChartTheme {
    pub fn candle_color(&self, bullish: bool) -> Color {
        if bullish { self.bullish } else { self.bearish }
    }
}

/// Dashboard-wide color table for non-chart views
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub positive: Color,
    pub negative: Color,
    pub caution: Color,
    pub muted: Color,
    pub accent: Color,
    /// ExtremeGreed, Greed, Neutral, Fear, ExtremeFear
    pub mood: [Color; 5],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            positive: Color::from_hex(0x2DD4A0),
            negative: Color::from_hex(0xF5476A),
            caution: Color::from_hex(0xD4AF37),
            muted: Color::from_hex(0x5C5888),
            accent: Color::from_hex(0x4F6EF7),
            mood: [
                Color::from_hex(0xEF4444),
                Color::from_hex(0xF97316),
                Color::from_hex(0xEAB308),
                Color::from_hex(0x22C55E),
                Color::from_hex(0x10B981),
            ],
        }
    }
}

impl Palette {
    pub fn tone(&self, tone: Tone) -> Color {
        match tone {
            Tone::Positive => self.positive,
            Tone::Caution => self.caution,
            Tone::Negative => self.negative,
        }
    }

    /// Green for `>= 0`, red otherwise; missing values are muted.
    pub fn change(&self, change: Option<f64>) -> Color {
        match change {
            Some(v) if v >= 0.0 => self.positive,
            Some(_) => self.negative,
            None => self.muted,
        }
    }

    pub fn mood(&self, band: MoodBand) -> Color {
        let index = match band {
            MoodBand::ExtremeGreed => 0,
            MoodBand::Greed => 1,
            MoodBand::Neutral => 2,
            MoodBand::Fear => 3,
            MoodBand::ExtremeFear => 4,
        };
        self.mood[index]
    }
}
