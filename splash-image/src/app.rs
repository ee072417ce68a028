//! Startup sequence: window, graphics subsystem, first frame, message
//! loop, teardown.
//!
//! Locals are declared in acquisition order so they drop in reverse:
//! controller (surface, window DC, screen DC, image), then GDI+, then
//! the window itself.

use splash_core::SplashError;

use crate::config::SplashConfig;

/// Show the splash until the window is closed or a fatal error occurs.
pub fn run(config: &SplashConfig) -> Result<(), SplashError> {
    #[cfg(target_os = "windows")]
    {
        platform::run(config)
    }
    #[cfg(not(target_os = "windows"))]
    {
        let _ = config;
        Err(SplashError::Unsupported(std::env::consts::OS))
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use std::cell::RefCell;

    use splash_core::{Controller, SplashError};
    use tracing::info;

    use crate::config::SplashConfig;
    use crate::gdi::{GdiBackend, GdiplusSession};
    use crate::window::{self, SplashWindow};

    pub(super) fn run(config: &SplashConfig) -> Result<(), SplashError> {
        window::enable_per_monitor_dpi();

        let window = SplashWindow::<Controller<GdiBackend>>::create(&config.window)?;
        let _gdiplus = GdiplusSession::startup()?;

        let backend = GdiBackend::new(window.hwnd())?;
        let mut controller = Controller::new(backend, config.image.logical_size());
        controller.start(&config.image.path)?;
        if let Some(g) = controller.geometry() {
            info!(
                x = g.position.x,
                y = g.position.y,
                w = g.size.width,
                h = g.size.height,
                "splash shown"
            );
        }

        let controller = RefCell::new(controller);
        let attachment = window.attach(&controller);
        let pumped = window.run_message_loop();
        drop(attachment);

        let finished = controller.into_inner().finish();
        finished.and(pumped)
    }
}
