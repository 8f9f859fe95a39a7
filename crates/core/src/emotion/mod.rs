mod analyzer;
mod lexicon;


use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use analyzer::{EmotionAnalyzer, KeywordEmotionClassifier};
pub use lexicon::{Category, Lexicon, LexiconError};

pub const DEFAULT_INTENSITY_BASE: f32 = 0.6;
pub const DEFAULT_INTENSITY_STEP: f32 = 0.2;
pub const DEFAULT_INTENSITY_NO_MATCH: f32 = 0.7;

/// Closed set of emotion labels the classifier can produce.
///
/// `Neutral` is the fallback label and never a match target.
#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Fear,
    Surprise,
    Disgust,
    #[default]
    Neutral,
}

impl Emotion {
    /// Built-in declaration order.
    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Disgust,
        Emotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Disgust => "disgust",
            Emotion::Neutral => "neutral",
        }
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Emotion::Neutral)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown emotion: {0}")]
pub struct ParseEmotionError(pub String);

impl FromStr for Emotion {
    type Err = ParseEmotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str() == wanted)
            .ok_or_else(|| ParseEmotionError(s.to_owned()))
    }
}

/// Keyword-density intensity scoring.
///
/// `intensity = min(base + step * matches, 1.0)` when at least one trigger
/// matched, `no_match` otherwise.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct IntensityPolicy {
    pub base: f32,
    pub step: f32,
    pub no_match: f32,
}

impl IntensityPolicy {
    pub fn new(base: f32, step: f32, no_match: f32) -> Result<Self, ConfigError> {
        for (name, value) in [("base", base), ("step", step), ("no_match", no_match)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::IntensityOutOfRange { name, value });
            }
        }
        Ok(Self {
            base,
            step,
            no_match,
        })
    }

    pub fn score(&self, match_count: usize) -> f32 {
        if match_count == 0 {
            return clamp_unit(self.no_match);
        }
        let raw = self.base + self.step * match_count as f32;
        clamp_unit(raw.min(1.0))
    }
}

impl Default for IntensityPolicy {
    fn default() -> Self {
        Self {
            base: DEFAULT_INTENSITY_BASE,
            step: DEFAULT_INTENSITY_STEP,
            no_match: DEFAULT_INTENSITY_NO_MATCH,
        }
    }
}

/// Outcome of classifying one utterance.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct ClassificationResult {
    emotion: Emotion,
    intensity: f32,
    match_count: usize,
}

impl ClassificationResult {
    pub fn new(emotion: Emotion, intensity: f32, match_count: usize) -> Self {
        Self {
            emotion,
            intensity: clamp_unit(intensity),
            match_count,
        }
    }

    pub fn neutral(intensity: f32) -> Self {
        Self::new(Emotion::Neutral, intensity, 0)
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn match_count(&self) -> usize {
        self.match_count
    }

    /// Replaces the keyword-derived intensity with an externally supplied
    /// confidence, clamped to `[0, 1]`.
    pub fn with_intensity(self, confidence: f32) -> Self {
        Self::new(self.emotion, confidence, self.match_count)
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
