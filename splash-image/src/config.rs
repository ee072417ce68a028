//! Splash screen configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use splash_core::{Size, IMAGE_HEIGHT, IMAGE_WIDTH};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashConfig {
    /// Splash artwork.
    pub image: ImageConfig,
    /// Window settings.
    pub window: WindowConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Splash artwork.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Image file, relative to the working directory.
    pub path: PathBuf,
    /// Logical width at 96 DPI.
    pub width: u32,
    /// Logical height at 96 DPI.
    pub height: u32,
}

/// Window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Registered window class name.
    pub class_name: String,
    /// Window title (not drawn; visible to accessibility tools).
    pub title: String,
    /// Keep the splash above all other windows.
    pub topmost: bool,
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("SplashScreen.png"),
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            class_name: "Splash Image".into(),
            title: "Splash Image".into(),
            topmost: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl ImageConfig {
    /// Logical artwork size; zero dimensions are raised to 1.
    pub fn logical_size(&self) -> Size {
        Size::new(self.width.max(1), self.height.max(1))
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl SplashConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("cannot read config {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Parse configuration text.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let cfg = SplashConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("SplashScreen.png"));
        assert!(text.contains("topmost"));
    }

    #[test]
    fn roundtrip_config() {
        let cfg = SplashConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed = SplashConfig::parse(&text).unwrap();
        assert_eq!(parsed.image.logical_size(), Size::new(780, 522));
        assert_eq!(parsed.window.class_name, "Splash Image");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let parsed = SplashConfig::parse("[image]\npath = \"art/boot.png\"\n").unwrap();
        assert_eq!(parsed.image.path, PathBuf::from("art/boot.png"));
        assert_eq!(parsed.image.width, 780);
        assert_eq!(parsed.logging.level, "info");
        assert!(parsed.window.topmost);
    }

    #[test]
    fn zero_logical_size_is_raised() {
        let mut cfg = SplashConfig::default();
        cfg.image.width = 0;
        assert_eq!(cfg.image.logical_size(), Size::new(1, 522));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let cfg = SplashConfig::load(Path::new("definitely/not/here/splash-image.toml"));
        assert_eq!(cfg.image.path, PathBuf::from("SplashScreen.png"));
    }

    #[test]
    fn invalid_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("splash-image-{}.toml", std::process::id()));
        std::fs::write(&path, "[image\nwidth = ").unwrap();
        let cfg = SplashConfig::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.image.width, 780);
    }

    #[test]
    fn unreadable_path_uses_defaults() {
        let dir = std::env::temp_dir();
        assert!(std::fs::read_to_string(&dir).is_err());
        let cfg = SplashConfig::load(&dir);
        assert_eq!(cfg.image.path, PathBuf::from("SplashScreen.png"));
        assert_eq!(cfg.window.class_name, "Splash Image");
    }
}
