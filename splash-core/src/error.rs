//! Error taxonomy for the splash screen.
//!
//! Every failure is fatal: startup errors prevent the splash from ever
//! appearing, composite errors tear it down. Each variant carries the
//! message reported by the failing subsystem.

use std::path::PathBuf;

use thiserror::Error;

/// The canonical error type for the splash screen.
#[derive(Debug, Error)]
pub enum SplashError {
    // ── Window subsystem ─────────────────────────────────────────
    /// The window class could not be registered.
    #[error("window class registration failed: {0}")]
    ClassRegistration(String),

    /// The layered popup window could not be created.
    #[error("window creation failed: {0}")]
    WindowCreation(String),

    /// Retrieving the next window message failed.
    #[error("message loop failed: {0}")]
    MessageLoop(String),

    /// The primary display resolution could not be queried.
    #[error("primary display resolution query failed")]
    ScreenQuery,

    // ── Graphics subsystem ───────────────────────────────────────
    /// The graphics subsystem (GDI+) failed to start.
    #[error("graphics subsystem startup failed: {0}")]
    GraphicsStartup(String),

    /// The splash image could not be decoded.
    #[error("failed to decode image {}: {reason}", path.display())]
    ImageDecode { path: PathBuf, reason: String },

    // ── Composite ────────────────────────────────────────────────
    /// The off-screen surface could not be allocated.
    #[error("surface allocation failed for {width}x{height}: {reason}")]
    SurfaceAllocation {
        width: u32,
        height: u32,
        reason: String,
    },

    /// Drawing the image into the off-screen surface failed.
    #[error("render failed: {0}")]
    Render(String),

    /// The per-pixel-alpha present call failed.
    #[error("present failed: {0}")]
    Present(String),

    // ── Lifecycle ────────────────────────────────────────────────
    /// `start` was called on a splash that already left `Uninitialized`.
    #[error("splash already started")]
    AlreadyStarted,

    // ── Platform ─────────────────────────────────────────────────
    /// The current platform has no windowing backend.
    #[error("unsupported platform: {0}")]
    Unsupported(&'static str),
}

/// The subsystem a [`SplashError`] originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    Window,
    Graphics,
    Image,
    Composite,
    Lifecycle,
    Platform,
}

impl SplashError {
    /// Classify the error by originating subsystem.
    pub fn subsystem(&self) -> Subsystem {
        match self {
            SplashError::ClassRegistration(_)
            | SplashError::WindowCreation(_)
            | SplashError::MessageLoop(_)
            | SplashError::ScreenQuery => Subsystem::Window,
            SplashError::GraphicsStartup(_) => Subsystem::Graphics,
            SplashError::ImageDecode { .. } => Subsystem::Image,
            SplashError::SurfaceAllocation { .. }
            | SplashError::Render(_)
            | SplashError::Present(_) => Subsystem::Composite,
            SplashError::AlreadyStarted => Subsystem::Lifecycle,
            SplashError::Unsupported(_) => Subsystem::Platform,
        }
    }

    /// Process exit status conveying the failing subsystem. Never 0.
    pub fn exit_code(&self) -> u8 {
        match self.subsystem() {
            Subsystem::Platform => 1,
            Subsystem::Window => 2,
            Subsystem::Graphics => 3,
            Subsystem::Image => 4,
            Subsystem::Composite => 5,
            Subsystem::Lifecycle => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = SplashError::SurfaceAllocation {
            width: 1170,
            height: 783,
            reason: "out of memory".into(),
        };
        assert!(e.to_string().contains("1170x783"));
        assert!(e.to_string().contains("out of memory"));

        let e = SplashError::ImageDecode {
            path: PathBuf::from("SplashScreen.png"),
            reason: "FileNotFound".into(),
        };
        assert!(e.to_string().contains("SplashScreen.png"));
    }

    #[test]
    fn exit_codes_distinguish_subsystems() {
        let codes = [
            SplashError::WindowCreation("x".into()).exit_code(),
            SplashError::GraphicsStartup("x".into()).exit_code(),
            SplashError::ImageDecode {
                path: PathBuf::new(),
                reason: "x".into(),
            }
            .exit_code(),
            SplashError::Present("x".into()).exit_code(),
        ];
        assert_eq!(codes, [2, 3, 4, 5]);
        assert_eq!(SplashError::ScreenQuery.exit_code(), 2);
        assert_eq!(SplashError::Render("x".into()).subsystem(), Subsystem::Composite);
        assert_eq!(SplashError::AlreadyStarted.exit_code(), 6);
    }

    #[test]
    fn exit_code_is_never_success() {
        let e = SplashError::Unsupported("linux");
        assert_ne!(e.exit_code(), 0);
    }
}
