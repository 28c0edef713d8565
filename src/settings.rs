//! Global defaults and per-surface settings resolution.
//!
//! [`SettingsStore`] holds the process-wide defaults used by every new
//! activation. Updates go through [`SettingsStore::configure`], which merges a
//! partial [`SettingsUpdate`], validates the result and only then stores it.
//! [`SurfaceSettings::resolve`] layers a surface's own attributes on top of a
//! snapshot of those defaults.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use crate::error::NoiseError;
use crate::surface::Surface;
use crate::validate::{all_non_blank, non_blank, non_negative, single_line};

/// Default text handed to the image source.
pub const DEFAULT_CONTENT: &str = "STATIC";

/// Default character palette for replacement draws.
pub const DEFAULT_LETTERS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default font family handed to the image source.
pub const DEFAULT_FONT_FAMILY: &str = "monospace";

/// Default time between ticks.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;

/// CSS font weight keyword or numeric weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum FontWeight {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "bold")]
    Bold,
    #[serde(rename = "bolder")]
    Bolder,
    #[serde(rename = "lighter")]
    Lighter,
    #[serde(rename = "100")]
    W100,
    #[serde(rename = "200")]
    W200,
    #[serde(rename = "300")]
    W300,
    #[serde(rename = "400")]
    W400,
    #[serde(rename = "500")]
    W500,
    #[serde(rename = "600")]
    W600,
    #[serde(rename = "700")]
    W700,
    #[serde(rename = "800")]
    W800,
    #[default]
    #[serde(rename = "900")]
    W900,
}

impl FontWeight {
    /// All accepted weights, keywords first.
    pub const ALL: [FontWeight; 13] = [
        FontWeight::Normal,
        FontWeight::Bold,
        FontWeight::Bolder,
        FontWeight::Lighter,
        FontWeight::W100,
        FontWeight::W200,
        FontWeight::W300,
        FontWeight::W400,
        FontWeight::W500,
        FontWeight::W600,
        FontWeight::W700,
        FontWeight::W800,
        FontWeight::W900,
    ];

    /// The CSS token for this weight.
    pub fn as_str(&self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
            FontWeight::Bolder => "bolder",
            FontWeight::Lighter => "lighter",
            FontWeight::W100 => "100",
            FontWeight::W200 => "200",
            FontWeight::W300 => "300",
            FontWeight::W400 => "400",
            FontWeight::W500 => "500",
            FontWeight::W600 => "600",
            FontWeight::W700 => "700",
            FontWeight::W800 => "800",
            FontWeight::W900 => "900",
        }
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontWeight {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        FontWeight::ALL
            .iter()
            .copied()
            .find(|w| w.as_str().eq_ignore_ascii_case(token))
            .ok_or(NoiseError::Validation)
    }
}

/// Process-wide defaults for new activations.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSettings {
    /// Text rendered into the source image.
    pub content: String,
    /// Palette that replacement characters are drawn from.
    pub letters: String,
    /// Words that may be injected into runs of filled cells.
    pub words: Vec<String>,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub tick_interval_ms: u64,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            content: DEFAULT_CONTENT.to_string(),
            letters: DEFAULT_LETTERS.to_string(),
            words: Vec::new(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_weight: FontWeight::default(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl GlobalSettings {
    /// Check every validated field.
    pub fn is_valid(&self) -> bool {
        non_blank(&self.content)
            && non_blank(&self.letters)
            && single_line(&self.letters)
            && all_non_blank(&self.words)
            && self.words.iter().all(|w| single_line(w))
            && non_blank(&self.font_family)
    }

    /// Copy of `self` with every field present in `update` replaced.
    pub fn merged(&self, update: &SettingsUpdate) -> Self {
        let mut merged = self.clone();
        if let Some(content) = &update.content {
            merged.content = content.clone();
        }
        if let Some(letters) = &update.letters {
            merged.letters = letters.clone();
        }
        if let Some(words) = &update.words {
            merged.words = words.clone();
        }
        if let Some(font_family) = &update.font_family {
            merged.font_family = font_family.clone();
        }
        if let Some(font_weight) = update.font_weight {
            merged.font_weight = font_weight;
        }
        if let Some(tick_interval_ms) = update.tick_interval_ms {
            merged.tick_interval_ms = tick_interval_ms;
        }
        merged
    }
}

/// Partial update for [`GlobalSettings`]. `None` fields are left untouched.
///
/// Also the shape of the `[defaults]` table in the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsUpdate {
    pub content: Option<String>,
    pub letters: Option<String>,
    pub words: Option<Vec<String>>,
    pub font_family: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub tick_interval_ms: Option<u64>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == SettingsUpdate::default()
    }
}

/// Shared handle to the global settings.
///
/// Cloning the store clones the handle; all clones see the same settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    inner: Arc<RwLock<GlobalSettings>>,
}

impl SettingsStore {
    /// Create a store holding the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with explicit initial settings.
    pub fn with_settings(settings: GlobalSettings) -> Result<Self, NoiseError> {
        if !settings.is_valid() {
            return Err(NoiseError::Validation);
        }
        Ok(Self {
            inner: Arc::new(RwLock::new(settings)),
        })
    }

    /// Merge `update` into the stored settings.
    ///
    /// The merged value is validated before it is stored; on failure the
    /// store is left exactly as it was.
    pub fn configure(&self, update: SettingsUpdate) -> Result<(), NoiseError> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let merged = guard.merged(&update);
        if !merged.is_valid() {
            log::warn!("Rejected settings update: {:?}", update);
            return Err(NoiseError::Validation);
        }
        *guard = merged;
        log::debug!("Global settings updated: {:?}", *guard);
        Ok(())
    }

    /// A copy of the current settings.
    pub fn snapshot(&self) -> GlobalSettings {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Attribute names looked up on a surface.
pub mod attr {
    pub const TEXT: &str = "text";
    pub const FONT_FAMILY: &str = "font-family";
    pub const FONT_WEIGHT: &str = "font-weight";
    pub const LETTERS: &str = "letters";
    pub const WORDS: &str = "words";
    pub const ASPECT_RATIO: &str = "aspect-ratio";
    pub const INTERVAL: &str = "interval";
}

/// Settings for one surface after applying its attribute overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSettings {
    pub text: String,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub letters: String,
    pub words: Vec<String>,
    /// Height / width ratio; `None` means "use the image's own ratio".
    pub aspect_ratio: Option<f64>,
    pub tick_interval_ms: u64,
}

impl SurfaceSettings {
    /// Resolve settings for `surface`, falling back to `global` per field.
    ///
    /// Fails with [`NoiseError::Validation`] if an attribute cannot be parsed
    /// or the resolved settings do not validate.
    pub fn resolve(global: &GlobalSettings, surface: &dyn Surface) -> Result<Self, NoiseError> {
        let text = surface.attribute(attr::TEXT).unwrap_or_else(|| global.content.clone());
        let font_family = surface
            .attribute(attr::FONT_FAMILY)
            .unwrap_or_else(|| global.font_family.clone());
        let font_weight = match surface.attribute(attr::FONT_WEIGHT) {
            Some(raw) => raw.parse()?,
            None => global.font_weight,
        };
        let letters = surface
            .attribute(attr::LETTERS)
            .unwrap_or_else(|| global.letters.clone());
        let words = match surface.attribute(attr::WORDS) {
            Some(raw) => parse_words(&raw),
            None => global.words.clone(),
        };
        let aspect_ratio = surface
            .attribute(attr::ASPECT_RATIO)
            .map(|raw| parse_number(&raw))
            .transpose()?;
        let tick_interval_ms = match surface.attribute(attr::INTERVAL) {
            Some(raw) => {
                let ms = parse_number(&raw)?;
                if !non_negative(ms) {
                    return Err(NoiseError::Validation);
                }
                ms.round() as u64
            }
            None => global.tick_interval_ms,
        };

        let settings = Self {
            text,
            font_family,
            font_weight,
            letters,
            words,
            aspect_ratio,
            tick_interval_ms,
        };
        if settings.is_valid() {
            Ok(settings)
        } else {
            Err(NoiseError::Validation)
        }
    }

    pub fn is_valid(&self) -> bool {
        non_blank(&self.text)
            && non_blank(&self.font_family)
            && non_blank(&self.letters)
            && single_line(&self.letters)
            && all_non_blank(&self.words)
            && self.words.iter().all(|w| single_line(w))
            && self.aspect_ratio.map_or(true, non_negative)
    }
}

/// Split a comma separated word list. Entries are kept verbatim so that a
/// blank entry fails validation instead of being dropped.
fn parse_words(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|w| w.to_string()).collect()
}

fn parse_number(raw: &str) -> Result<f64, NoiseError> {
    raw.trim().parse::<f64>().map_err(|_| NoiseError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GlobalSettings::default().is_valid());
    }

    #[test]
    fn test_font_weight_parse() {
        assert_eq!("bold".parse::<FontWeight>().unwrap(), FontWeight::Bold);
        assert_eq!("BOLDER".parse::<FontWeight>().unwrap(), FontWeight::Bolder);
        assert_eq!(" 300 ".parse::<FontWeight>().unwrap(), FontWeight::W300);
        assert!("heavy".parse::<FontWeight>().is_err());
        assert!("950".parse::<FontWeight>().is_err());
    }

    #[test]
    fn test_font_weight_tokens_are_distinct() {
        for (i, a) in FontWeight::ALL.iter().enumerate() {
            for b in &FontWeight::ALL[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }

    #[test]
    fn test_merged_only_touches_present_fields() {
        let base = GlobalSettings::default();
        let update = SettingsUpdate {
            letters: Some("01".to_string()),
            ..Default::default()
        };
        let merged = base.merged(&update);
        assert_eq!(merged.letters, "01");
        assert_eq!(merged.content, base.content);
        assert_eq!(merged.tick_interval_ms, base.tick_interval_ms);
    }

    #[test]
    fn test_configure_rejects_blank_word_without_mutation() {
        let store = SettingsStore::new();
        let before = store.snapshot();
        let result = store.configure(SettingsUpdate {
            words: Some(vec!["ok".to_string(), "   ".to_string()]),
            letters: Some("xyz".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(NoiseError::Validation)));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_with_settings_validates() {
        let settings = GlobalSettings {
            font_family: String::new(),
            ..Default::default()
        };
        assert!(SettingsStore::with_settings(settings).is_err());
    }

    #[test]
    fn test_resolve_falls_back_to_global() {
        let surface = MemorySurface::new(120, 60);
        let global = GlobalSettings::default();
        let resolved = SurfaceSettings::resolve(&global, &surface).unwrap();
        assert_eq!(resolved.text, global.content);
        assert_eq!(resolved.letters, global.letters);
        assert_eq!(resolved.aspect_ratio, None);
        assert_eq!(resolved.tick_interval_ms, global.tick_interval_ms);
    }

    #[test]
    fn test_resolve_applies_overrides() {
        let surface = MemorySurface::new(120, 60);
        surface.set_attribute(attr::TEXT, "hello");
        surface.set_attribute(attr::FONT_WEIGHT, "bold");
        surface.set_attribute(attr::WORDS, "cat,dog");
        surface.set_attribute(attr::ASPECT_RATIO, "0.5");
        surface.set_attribute(attr::INTERVAL, "250");
        let resolved = SurfaceSettings::resolve(&GlobalSettings::default(), &surface).unwrap();
        assert_eq!(resolved.text, "hello");
        assert_eq!(resolved.font_weight, FontWeight::Bold);
        assert_eq!(resolved.words, vec!["cat".to_string(), "dog".to_string()]);
        assert_eq!(resolved.aspect_ratio, Some(0.5));
        assert_eq!(resolved.tick_interval_ms, 250);
    }

    #[test]
    fn test_resolve_rejects_invalid_attributes() {
        let cases = [
            (attr::TEXT, " "),
            (attr::LETTERS, ""),
            (attr::WORDS, "a,,b"),
            (attr::WORDS, "ok,a\nb"),
            (attr::LETTERS, "ab\n"),
            (attr::ASPECT_RATIO, "-1"),
            (attr::ASPECT_RATIO, "wide"),
            (attr::INTERVAL, "-5"),
            (attr::FONT_WEIGHT, "heavy"),
        ];
        for (name, value) in cases {
            let surface = MemorySurface::new(120, 60);
            surface.set_attribute(name, value);
            let result = SurfaceSettings::resolve(&GlobalSettings::default(), &surface);
            assert!(
                matches!(result, Err(NoiseError::Validation)),
                "{}={:?} should be rejected",
                name,
                value
            );
        }
    }

    #[test]
    fn test_parse_words_empty_attribute() {
        assert!(parse_words("").is_empty());
    }
}
