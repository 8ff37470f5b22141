//! Difficulty presets for training and play

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::pipeline::TrainingConfig;

/// Learning rate shared by every preset
pub const DEFAULT_LEARNING_RATE: f64 = 0.5;

/// Discount factor shared by every preset
pub const DEFAULT_DISCOUNT: f64 = 0.9;

/// Bot strength.
///
/// At play time a difficulty is only an exploration rate for the same greedy
/// policy. For training it also selects how many episodes to run and how
/// steeply exploration anneals, and each difficulty keeps its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Effectively random play
    Easy,
    /// Mostly greedy with some randomness
    Medium,
    /// Fully greedy
    Hard,
}

/// Episode count and exploration anneal used to train one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingPreset {
    pub episodes: usize,
    pub epsilon_start: f64,
    pub epsilon_end: f64,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Exploration rate the bot uses when playing a human
    pub fn play_epsilon(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 0.25,
            Difficulty::Hard => 0.0,
        }
    }

    pub fn training_preset(self) -> TrainingPreset {
        match self {
            Difficulty::Easy => TrainingPreset {
                episodes: 300,
                epsilon_start: 0.6,
                epsilon_end: 0.3,
            },
            Difficulty::Medium => TrainingPreset {
                episodes: 4000,
                epsilon_start: 0.9,
                epsilon_end: 0.1,
            },
            Difficulty::Hard => TrainingPreset {
                episodes: 22000,
                epsilon_start: 1.0,
                epsilon_end: 0.01,
            },
        }
    }

    /// Full training configuration for this preset
    pub fn training_config(self) -> TrainingConfig {
        let preset = self.training_preset();
        TrainingConfig {
            learning_rate: DEFAULT_LEARNING_RATE,
            discount: DEFAULT_DISCOUNT,
            epsilon_start: preset.epsilon_start,
            epsilon_end: preset.epsilon_end,
            episodes: preset.episodes,
            ..TrainingConfig::default()
        }
    }

    /// Short lowercase name, also used in store file names
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(crate::Error::InvalidDifficulty {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognized_values() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!(" hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        for input in ["", "expert", "normal", "1"] {
            assert!(matches!(
                input.parse::<Difficulty>(),
                Err(crate::Error::InvalidDifficulty { .. })
            ));
        }
    }

    #[test]
    fn test_display_roundtrips() {
        for difficulty in Difficulty::ALL {
            assert_eq!(
                difficulty.to_string().parse::<Difficulty>().unwrap(),
                difficulty
            );
        }
    }

    #[test]
    fn test_play_epsilons() {
        assert_eq!(Difficulty::Easy.play_epsilon(), 1.0);
        assert_eq!(Difficulty::Medium.play_epsilon(), 0.25);
        assert_eq!(Difficulty::Hard.play_epsilon(), 0.0);
    }

    #[test]
    fn test_harder_presets_train_longer_and_anneal_further() {
        let easy = Difficulty::Easy.training_preset();
        let medium = Difficulty::Medium.training_preset();
        let hard = Difficulty::Hard.training_preset();

        assert!(easy.episodes < medium.episodes && medium.episodes < hard.episodes);
        assert!(easy.epsilon_end > medium.epsilon_end && medium.epsilon_end > hard.epsilon_end);
    }

    #[test]
    fn test_training_config_is_valid() {
        for difficulty in Difficulty::ALL {
            let config = difficulty.training_config();
            config.validate().unwrap();
            assert_eq!(config.learning_rate, 0.5);
            assert_eq!(config.discount, 0.9);
        }
    }
}
