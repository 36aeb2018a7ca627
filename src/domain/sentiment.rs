//! Externally computed sentiment readings: Fear & Greed and the market mood index.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FearGreedReading {
    /// 0 (extreme fear) ..= 100 (extreme greed)
    pub value: u8,
    pub label: String,
    /// Unix seconds
    pub timestamp: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FearGreedIndex {
    pub current: Option<FearGreedReading>,
    /// Newest first, as served
    pub history: Vec<FearGreedReading>,
}

impl FearGreedIndex {
    /// Change of the current value against the oldest reading in the history window.
    pub fn trend(&self) -> Option<i16> {
        let current = self.current.as_ref()?;
        let oldest = self.history.last()?;
        Some(current.value as i16 - oldest.value as i16)
    }
}

/// Tone used to color a sentiment reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Caution,
    Negative,
}

/// Fear & Greed coloring: `>= 60` positive, `>= 40` caution, else negative.
pub fn fear_greed_tone(value: u8) -> Tone {
    match value {
        60.. => Tone::Positive,
        40..=59 => Tone::Caution,
        _ => Tone::Negative,
    }
}

/// Band of the composite mood score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodBand {
    ExtremeGreed,
    Greed,
    Neutral,
    Fear,
    ExtremeFear,
}

impl MoodBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            MoodBand::ExtremeGreed
        } else if score >= 55.0 {
            MoodBand::Greed
        } else if score >= 45.0 {
            MoodBand::Neutral
        } else if score >= 25.0 {
            MoodBand::Fear
        } else {
            MoodBand::ExtremeFear
        }
    }
}

/// Market mood index for one token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MmiReading {
    pub token: String,
    pub score: f64,
    pub signal: String,
    /// Flattened component scores (`sentiment.fear_greed`, `momentum`, ...)
    pub components: Vec<(String, f64)>,
    pub fear_greed_label: Option<String>,
}

impl MmiReading {
    pub fn band(&self) -> MoodBand {
        MoodBand::from_score(self.score)
    }

    /// Component lookup by full dotted path or by its last segment.
    pub fn component(&self, key: &str) -> Option<f64> {
        self.components
            .iter()
            .find(|(name, _)| name == key || name.rsplit('.').next() == Some(key))
            .map(|(_, value)| *value)
    }
}
