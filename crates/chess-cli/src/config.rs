//! Configuration file loading for the terminal driver.
//!
//! Settings live in an optional `chess.toml`. Every field has a default, so a
//! missing file or a partial file is fine.

use chess_core::PieceKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// `default_promotion` is not one of queen, rook, bishop or knight.
    #[error("Invalid default promotion: {0}")]
    InvalidPromotion(String),
}

/// Driver settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter used when neither `--log-level` nor `RUST_LOG` is set.
    /// Defaults to "warn".
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Print the safe destinations after selecting a piece with `moves`.
    /// Defaults to true.
    #[serde(default = "default_show_hints")]
    pub show_hints: bool,
    /// Piece chosen when the promotion prompt is answered with an empty line.
    /// Defaults to "queen".
    #[serde(default = "default_promotion")]
    pub default_promotion: String,
    /// Draw the board with chess glyphs instead of letters.
    #[serde(default)]
    pub unicode_pieces: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_show_hints() -> bool {
    true
}

fn default_promotion() -> String {
    "queen".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            log_level: default_log_level(),
            show_hints: default_show_hints(),
            default_promotion: default_promotion(),
            unicode_pieces: false,
        }
    }
}

impl CliConfig {
    /// Loads the configuration.
    ///
    /// With an explicit `path` the file must exist. Without one,
    /// [`Self::config_path()`] is tried and a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML, or
    /// [`ConfigError::InvalidPromotion`] if `default_promotion` is unusable.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_toml(&std::fs::read_to_string(path)?)?,
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::from_toml(&std::fs::read_to_string(&path)?)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: CliConfig = toml::from_str(content)?;
        config.promotion_kind()?;
        Ok(config)
    }

    /// Returns the path to the default configuration file.
    ///
    /// Currently returns `chess.toml` in the current working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("chess.toml")
    }

    /// Returns the piece kind named by `default_promotion`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPromotion`] for a pawn, a king, or an
    /// unknown name.
    pub fn promotion_kind(&self) -> Result<PieceKind, ConfigError> {
        PieceKind::from_name(&self.default_promotion)
            .filter(|kind| PieceKind::PROMOTION_CHOICES.contains(kind))
            .ok_or_else(|| ConfigError::InvalidPromotion(self.default_promotion.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_content = r#"
log_level = "debug"
show_hints = false
default_promotion = "knight"
unicode_pieces = true
"#;

        let config = CliConfig::from_toml(toml_content).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(!config.show_hints);
        assert_eq!(config.default_promotion, "knight");
        assert!(config.unicode_pieces);
        assert_eq!(config.promotion_kind().unwrap(), PieceKind::Knight);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = CliConfig::from_toml("unicode_pieces = true\n").unwrap();
        assert_eq!(config.log_level, "warn");
        assert!(config.show_hints);
        assert_eq!(config.promotion_kind().unwrap(), PieceKind::Queen);

        let empty = CliConfig::from_toml("").unwrap();
        assert_eq!(empty, CliConfig::default());
    }

    #[test]
    fn promotion_accepts_letters() {
        let config = CliConfig::from_toml(r#"default_promotion = "R""#).unwrap();
        assert_eq!(config.promotion_kind().unwrap(), PieceKind::Rook);
    }

    #[test]
    fn promotion_to_king_is_rejected() {
        let err = CliConfig::from_toml(r#"default_promotion = "king""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPromotion(name) if name == "king"));

        let err = CliConfig::from_toml(r#"default_promotion = "wizard""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPromotion(_)));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = CliConfig::from_toml("show_hints = maybe").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn explicit_missing_file_is_a_read_error() {
        let path = Path::new("/nonexistent/chess-cli/chess.toml");
        let err = CliConfig::load(Some(path)).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }
}
