//! Player settings and preferences
//!
//! Persisted separately from progress through the same store.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, PersistError};

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Default,
    Ocean,
    Forest,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Default => "Default",
            Theme::Ocean => "Ocean",
            Theme::Forest => "Forest",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" | "standard" => Some(Theme::Default),
            "ocean" => Some(Theme::Ocean),
            "forest" => Some(Theme::Forest),
            _ => None,
        }
    }

    /// CSS class the page applies (empty for the default look)
    pub fn css_class(&self) -> &'static str {
        match self {
            Theme::Default => "",
            Theme::Ocean => "theme-ocean",
            Theme::Forest => "theme-forest",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub theme: Theme,
    /// Reduced motion (no gesture trail, no wobble)
    #[serde(default)]
    pub reduced_motion: bool,
    /// Play card games instead of the slice game
    #[serde(default)]
    pub prefer_cards: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Default,
            reduced_motion: false,
            prefer_cards: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "math_slice_settings_v1";

    /// Whether to draw the swipe trail
    pub fn show_trail(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings from the store
    pub fn load(store: &dyn KeyValueStore) -> Self {
        persistence::load_or_default(store, Self::STORAGE_KEY)
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistError> {
        persistence::save(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
