//! Settings loaded from TOML
//!
//! Read from ~/.config/stackfall/settings.toml (or platform equivalent)
//! unless a path is given explicitly.

use crate::bag::PieceColors;
use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Board};
use crate::color::parse_color;
use crate::error::ConfigError;
use crate::game::GameConfig;
use crate::tetromino::TetrominoType;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: BoardSettings,
    pub pieces: PieceSettings,
    pub gameplay: GameplaySettings,
    /// Keybindings
    pub keys: KeyBindings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub width: usize,
    pub height: usize,
}

/// Piece catalog and colors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceSettings {
    /// Identities dealt by the bag, e.g. ["I", "O", "T"]
    pub enabled: Vec<String>,
    /// Color for every piece without an override
    pub color: String,
    /// Per-identity overrides, e.g. { I = "cyan", O = "#ffff00" }
    pub colors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Interval between gravity ticks in milliseconds
    pub gravity_ms: u64,
    /// Fixed seed for the piece sequence
    pub seed: Option<u64>,
}

/// Key bindings (stored as strings for easy editing)
/// Each command can have one or more keys bound to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_down: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hard_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_ccw: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub new_game: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    if let [key] = keys {
        serializer.serialize_str(key)
    } else {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
        }
    }
}

impl Default for PieceSettings {
    fn default() -> Self {
        Self {
            enabled: TetrominoType::all()
                .iter()
                .map(|kind| kind.name().to_string())
                .collect(),
            color: "#8030c0".to_string(),
            colors: BTreeMap::new(),
        }
    }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            gravity_ms: 1000,
            seed: None,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            move_down: vec!["Down".to_string()],
            hard_drop: vec!["Space".to_string()],
            rotate: vec!["Up".to_string(), "r".to_string()],
            rotate_ccw: vec!["z".to_string()],
            new_game: vec!["n".to_string()],
            quit: vec!["q".to_string(), "Esc".to_string()],
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "stackfall", "stackfall")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the default settings file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load from an explicit file, or from the default location.
    ///
    /// An explicit file must exist and parse. A missing default file just
    /// means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let Some(path) = Self::default_path() else {
            return Ok(Self::default());
        };
        match Self::load_from(&path) {
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let settings = Self::from_toml(&contents)?;
        tracing::info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Render as TOML, e.g. to seed a settings file
    pub fn to_toml(&self) -> String {
        // Only strings, integers, lists and tables: serialization cannot fail
        toml::to_string_pretty(self).unwrap_or_default()
    }

    pub fn gravity(&self) -> Result<Duration, ConfigError> {
        match self.gameplay.gravity_ms {
            0 => Err(ConfigError::ZeroGravity),
            ms => Ok(Duration::from_millis(ms)),
        }
    }

    /// Validate everything the engine needs
    pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
        Board::check_size(self.board.width, self.board.height)?;

        let mut pieces = Vec::with_capacity(self.pieces.enabled.len());
        for name in &self.pieces.enabled {
            let kind = parse_piece(name)?;
            if !pieces.contains(&kind) {
                pieces.push(kind);
            }
        }
        if pieces.is_empty() {
            return Err(ConfigError::NoPieces);
        }

        let mut colors = PieceColors::uniform(parse_color(&self.pieces.color)?);
        for (name, color) in &self.pieces.colors {
            colors.set(parse_piece(name)?, parse_color(color)?);
        }

        Ok(GameConfig {
            width: self.board.width,
            height: self.board.height,
            pieces,
            colors,
            seed: self.gameplay.seed,
        })
    }
}

fn parse_piece(name: &str) -> Result<TetrominoType, ConfigError> {
    name.parse().map_err(ConfigError::UnknownPiece)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DEFAULT_PIECE_COLOR;
    use ratatui::style::Color;

    #[test]
    fn test_defaults_validate() {
        let config = Settings::default().game_config().unwrap();
        assert_eq!((config.width, config.height), (10, 20));
        assert_eq!(config.pieces.len(), 7);
        assert_eq!(config.colors.get(TetrominoType::Z), DEFAULT_PIECE_COLOR);
        assert_eq!(
            Settings::default().gravity().unwrap(),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
            [board]
            width = 12

            [keys]
            quit = "x"
            rotate = ["Up", "k"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.board.width, 12);
        assert_eq!(settings.board.height, 20);
        assert_eq!(settings.keys.quit, vec!["x"]);
        assert_eq!(settings.keys.rotate, vec!["Up", "k"]);
        assert_eq!(settings.keys.move_left, vec!["Left"]);
    }

    #[test]
    fn test_piece_colors() {
        let settings = Settings::from_toml(
            r##"
            [pieces]
            enabled = ["I", "o"]
            color = "white"
            colors = { I = "#00ffff" }
            "##,
        )
        .unwrap();
        let config = settings.game_config().unwrap();
        assert_eq!(config.pieces, vec![TetrominoType::I, TetrominoType::O]);
        assert_eq!(config.colors.get(TetrominoType::I), Color::Rgb(0, 255, 255));
        assert_eq!(config.colors.get(TetrominoType::O), Color::White);
    }

    #[test]
    fn test_invalid_settings_are_fatal() {
        let mut settings = Settings::default();
        settings.board.height = 0;
        assert!(matches!(settings.game_config(), Err(ConfigError::ZeroHeight)));

        let mut settings = Settings::default();
        settings.board.width = 40_000;
        assert!(matches!(
            settings.game_config(),
            Err(ConfigError::BoardTooLarge { width: 40_000, .. })
        ));

        let mut settings = Settings::default();
        settings.board.height = 1_000;
        assert!(matches!(
            settings.game_config(),
            Err(ConfigError::BoardTooLarge { height: 1_000, .. })
        ));

        let mut settings = Settings::default();
        settings.pieces.enabled.clear();
        assert!(matches!(settings.game_config(), Err(ConfigError::NoPieces)));

        let mut settings = Settings::default();
        settings.pieces.enabled = vec!["Q".to_string()];
        assert!(matches!(
            settings.game_config(),
            Err(ConfigError::UnknownPiece(_))
        ));

        let mut settings = Settings::default();
        settings.pieces.color = "nope".to_string();
        assert!(matches!(
            settings.game_config(),
            Err(ConfigError::InvalidColor(_))
        ));

        let mut settings = Settings::default();
        settings.gameplay.gravity_ms = 0;
        assert!(matches!(settings.gravity(), Err(ConfigError::ZeroGravity)));
    }

    #[test]
    fn test_negative_width_fails_to_parse() {
        let result = Settings::from_toml("[board]\nwidth = -3\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_toml_output_reads_back() {
        let text = Settings::default().to_toml();
        let settings = Settings::from_toml(&text).unwrap();
        assert_eq!(settings.keys.rotate, vec!["Up", "r"]);
        assert_eq!(settings.keys.quit, vec!["q", "Esc"]);
        assert_eq!(settings.pieces.enabled.len(), 7);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Settings::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
