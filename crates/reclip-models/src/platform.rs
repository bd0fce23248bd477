//! Target platforms and the exhaustive per-platform table.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Short-form platforms clips are exported for.
///
/// Declaration order is the fixed processing order used by selection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(alias = "tik_tok")]
    TikTok,
    Shorts,
    Reels,
}

impl Platform {
    /// All platforms in processing order.
    pub const ALL: &'static [Platform] = &[Platform::TikTok, Platform::Shorts, Platform::Reels];

    /// Name as used in config keys and output paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::TikTok => "tiktok",
            Platform::Shorts => "shorts",
            Platform::Reels => "reels",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown platform name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown platform: {0}")]
pub struct ParsePlatformError(pub String);

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tiktok" | "tik_tok" => Ok(Platform::TikTok),
            "shorts" | "youtube_shorts" => Ok(Platform::Shorts),
            "reels" | "instagram_reels" => Ok(Platform::Reels),
            other => Err(ParsePlatformError(other.to_string())),
        }
    }
}

/// One value per platform, looked up by exhaustive match.
///
/// Every platform always has an entry, so lookups cannot fail at runtime.
/// When deserialized, all three keys are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlatformMap<T> {
    pub tiktok: T,
    pub shorts: T,
    pub reels: T,
}

impl<T> PlatformMap<T> {
    pub fn new(tiktok: T, shorts: T, reels: T) -> Self {
        Self {
            tiktok,
            shorts,
            reels,
        }
    }

    /// Same value for every platform.
    pub fn uniform(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(value.clone(), value.clone(), value)
    }

    pub fn get(&self, platform: Platform) -> &T {
        match platform {
            Platform::TikTok => &self.tiktok,
            Platform::Shorts => &self.shorts,
            Platform::Reels => &self.reels,
        }
    }

    pub fn get_mut(&mut self, platform: Platform) -> &mut T {
        match platform {
            Platform::TikTok => &mut self.tiktok,
            Platform::Shorts => &mut self.shorts,
            Platform::Reels => &mut self.reels,
        }
    }

    /// Iterate `(platform, value)` pairs in processing order.
    pub fn iter(&self) -> impl Iterator<Item = (Platform, &T)> {
        Platform::ALL.iter().map(move |p| (*p, self.get(*p)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Platform, &T) -> U) -> PlatformMap<U> {
        PlatformMap::new(
            f(Platform::TikTok, &self.tiktok),
            f(Platform::Shorts, &self.shorts),
            f(Platform::Reels, &self.reels),
        )
    }
}

impl<T: Default> Default for PlatformMap<T> {
    fn default() -> Self {
        Self::new(T::default(), T::default(), T::default())
    }
}
