//! UI preferences that outlive a session: locale, font size and theme.

use std::fmt;
use std::str::FromStr;

use crate::storage::{keys, KeyValueStore, StorageError, StoreOp};

pub const SUPPORTED_LOCALES: &[&str] = &["en", "hi", "fr", "de", "es"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(String);

impl Locale {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale("en".to_string())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        if SUPPORTED_LOCALES.contains(&code.as_str()) {
            Ok(Locale(code))
        } else {
            Err(format!(
                "Unsupported language '{s}'. Choose one of: {}",
                SUPPORTED_LOCALES.join(", ")
            ))
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(FontSize::Small),
            "medium" => Ok(FontSize::Medium),
            "large" => Ok(FontSize::Large),
            _ => Err(format!("Unknown font size '{s}'. Use small, medium or large")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(format!("Unknown theme '{s}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub locale: Locale,
    pub font_size: FontSize,
    pub theme: ThemeMode,
}

impl Preferences {
    /// Reads stored preferences. Missing or unrecognised values fall back to defaults.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let values = store.get_many(&[keys::LOCALE, keys::FONT_SIZE, keys::THEME]);

        Preferences {
            locale: parse_or_default(values[0].as_deref()),
            font_size: parse_or_default(values[1].as_deref()),
            theme: parse_or_default(values[2].as_deref()),
        }
    }

    pub fn to_ops(&self) -> Vec<StoreOp> {
        vec![
            StoreOp::set(keys::LOCALE, self.locale.as_str()),
            StoreOp::set(keys::FONT_SIZE, self.font_size.as_str()),
            StoreOp::set(keys::THEME, self.theme.as_str()),
        ]
    }

    pub fn set_locale(store: &dyn KeyValueStore, locale: &Locale) -> Result<(), StorageError> {
        store.set(keys::LOCALE, locale.as_str())
    }

    pub fn set_font_size(store: &dyn KeyValueStore, size: FontSize) -> Result<(), StorageError> {
        store.set(keys::FONT_SIZE, size.as_str())
    }

    /// Flips light/dark and returns the new mode.
    pub fn toggle_theme(store: &dyn KeyValueStore) -> Result<ThemeMode, StorageError> {
        let next = Self::load(store).theme.toggled();
        store.set(keys::THEME, next.as_str())?;
        Ok(next)
    }
}

fn parse_or_default<T: FromStr + Default>(value: Option<&str>) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or_default()
}

impl fmt::Display for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "language={} font={} theme={}",
            self.locale.as_str(),
            self.font_size.as_str(),
            self.theme.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_empty_store_reads_defaults() {
        let prefs = Preferences::load(&MemoryStore::new());
        assert_eq!(prefs.locale.as_str(), "en");
        assert_eq!(prefs.font_size, FontSize::Medium);
        assert_eq!(prefs.theme, ThemeMode::Light);
    }

    #[test]
    fn test_unrecognised_values_fall_back_to_defaults() {
        let store = MemoryStore::new();
        store
            .apply(&[
                StoreOp::set(keys::LOCALE, "klingon"),
                StoreOp::set(keys::FONT_SIZE, "huge"),
                StoreOp::set(keys::THEME, "sepia"),
            ])
            .unwrap();
        assert_eq!(Preferences::load(&store), Preferences::default());
    }

    #[test]
    fn test_setters_persist() {
        let store = MemoryStore::new();
        Preferences::set_locale(&store, &"FR".parse().unwrap()).unwrap();
        Preferences::set_font_size(&store, FontSize::Large).unwrap();

        let prefs = Preferences::load(&store);
        assert_eq!(prefs.locale.as_str(), "fr");
        assert_eq!(prefs.font_size, FontSize::Large);
    }

    #[test]
    fn test_toggle_theme_flips_each_time() {
        let store = MemoryStore::new();
        assert_eq!(Preferences::toggle_theme(&store).unwrap(), ThemeMode::Dark);
        assert_eq!(Preferences::toggle_theme(&store).unwrap(), ThemeMode::Light);
        assert_eq!(store.get(keys::THEME).as_deref(), Some("light"));
    }

    #[test]
    fn test_unsupported_locale_is_rejected() {
        assert!("xx".parse::<Locale>().is_err());
    }
}
