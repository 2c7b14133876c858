//! Encoder speed/compression presets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the nine named points on the encoder's speed vs. compression curve,
/// fastest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    #[default]
    Fast,
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl QualityPreset {
    /// All presets, fastest first.
    pub const ALL: [QualityPreset; 9] = [
        QualityPreset::Ultrafast,
        QualityPreset::Superfast,
        QualityPreset::Veryfast,
        QualityPreset::Faster,
        QualityPreset::Fast,
        QualityPreset::Medium,
        QualityPreset::Slow,
        QualityPreset::Slower,
        QualityPreset::Veryslow,
    ];

    /// The name the encoder expects after `-preset`.
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Ultrafast => "ultrafast",
            QualityPreset::Superfast => "superfast",
            QualityPreset::Veryfast => "veryfast",
            QualityPreset::Faster => "faster",
            QualityPreset::Fast => "fast",
            QualityPreset::Medium => "medium",
            QualityPreset::Slow => "slow",
            QualityPreset::Slower => "slower",
            QualityPreset::Veryslow => "veryslow",
        }
    }

    /// Parse a user-supplied preset name, substituting the default on error.
    ///
    /// An unknown name is never fatal: it is logged and replaced by
    /// [`QualityPreset::Fast`].
    pub fn resolve(name: &str) -> QualityPreset {
        match name.parse() {
            Ok(preset) => preset,
            Err(e) => {
                tracing::warn!(
                    "{}; using default preset \"{}\"",
                    e,
                    QualityPreset::default()
                );
                QualityPreset::default()
            }
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        QualityPreset::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = QualityPreset::ALL.iter().map(|p| p.as_str()).collect();
                format!(
                    "Unknown quality preset \"{}\" (expected one of: {})",
                    s,
                    names.join(", ")
                )
            })
    }
}
