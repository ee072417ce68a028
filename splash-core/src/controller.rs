//! Splash lifecycle state machine.
//!
//! ```text
//! Uninitialized ──start()──► Running ──Close / fatal error──► Terminated
//!                               │ ▲
//!                               └─┘ DensityChanged: geometry + recomposite
//! ```
//!
//! The controller owns the compositor (and through it the backend) and
//! the decoded source image. Notifications arrive one at a time through
//! [`NotificationHandler::handle`]; a failed recomposite terminates the
//! splash and the error is surfaced by [`Controller::finish`].

use std::path::Path;

use tracing::{debug, error, info, trace};

use crate::backend::Backend;
use crate::compositor::{Compositor, SurfaceStats};
use crate::error::SplashError;
use crate::geometry::{Dpi, GeometryCalculator, Size, WindowGeometry};

/// Lifecycle phase of the splash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashState {
    Uninitialized,
    Running,
    Terminated,
}

/// Window-system notifications the splash reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// The window is being destroyed.
    Close,
    /// The display density changed.
    DensityChanged(Dpi),
    /// Anything else; carries the raw message id.
    Other(u32),
}

/// What the window procedure should do after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Fully handled.
    Handled,
    /// Handled; end the message loop.
    Quit,
    /// Forward to the platform's default handler.
    Default,
}

/// Single dispatch entry point used by the window procedure.
pub trait NotificationHandler {
    fn handle(&mut self, notification: Notification) -> Dispatch;
}

/// Owns every piece of mutable splash state.
pub struct Controller<B: Backend> {
    state: SplashState,
    calculator: GeometryCalculator,
    compositor: Compositor<B>,
    image: Option<B::Image>,
    geometry: Option<WindowGeometry>,
    failure: Option<SplashError>,
}

impl<B: Backend> Controller<B> {
    pub fn new(backend: B, logical: Size) -> Self {
        Self {
            state: SplashState::Uninitialized,
            calculator: GeometryCalculator::new(logical),
            compositor: Compositor::new(backend),
            image: None,
            geometry: None,
            failure: None,
        }
    }

    pub fn state(&self) -> SplashState {
        self.state
    }

    pub fn geometry(&self) -> Option<WindowGeometry> {
        self.geometry
    }

    pub fn surface_stats(&self) -> SurfaceStats {
        self.compositor.stats()
    }

    /// Load the image, draw the first frame and show the window.
    ///
    /// On failure the controller is `Terminated`, anything acquired so far
    /// is released, and the window is never shown. Only an `Uninitialized`
    /// controller can start; any later call is rejected.
    pub fn start(&mut self, image_path: &Path) -> Result<(), SplashError> {
        if self.state != SplashState::Uninitialized {
            return Err(SplashError::AlreadyStarted);
        }
        match self.first_frame(image_path) {
            Ok(()) => {
                self.compositor.backend_mut().show();
                self.state = SplashState::Running;
                info!(
                    path = %image_path.display(),
                    dpi = self.compositor.backend().initial_dpi().get(),
                    "splash running"
                );
                Ok(())
            }
            Err(e) => {
                self.terminate();
                Err(e)
            }
        }
    }

    fn first_frame(&mut self, image_path: &Path) -> Result<(), SplashError> {
        let image = self.compositor.backend_mut().load_image(image_path)?;
        let image = self.image.insert(image);
        let dpi = self.compositor.backend().initial_dpi();
        let geometry = self.calculator.compute(self.compositor.backend(), dpi)?;
        self.compositor.recomposite(&geometry, image)?;
        self.geometry = Some(geometry);
        Ok(())
    }

    /// Recompute geometry for `dpi` and redraw.
    fn redraw(&mut self, dpi: Dpi) -> Result<(), SplashError> {
        let geometry = self.calculator.compute(self.compositor.backend(), dpi)?;
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| SplashError::Render("source image not loaded".into()))?;
        self.compositor.recomposite(&geometry, image)?;
        self.geometry = Some(geometry);
        Ok(())
    }

    fn terminate(&mut self) {
        self.state = SplashState::Terminated;
        self.compositor.release_surface();
    }

    fn fail(&mut self, e: SplashError) -> Dispatch {
        error!("composite failed: {e}");
        self.terminate();
        self.failure = Some(e);
        Dispatch::Quit
    }

    /// Tear everything down and report the fatal error, if one occurred.
    ///
    /// Release order: off-screen surface and its drawing context, then
    /// the backend's window and screen contexts, then the source image.
    pub fn finish(self) -> Result<(), SplashError> {
        let Self {
            compositor,
            image,
            failure,
            ..
        } = self;
        let stats = compositor.stats();
        let backend = compositor.into_backend();
        drop(backend);
        drop(image);
        debug!(
            allocated = stats.allocated,
            presented = stats.presented,
            "splash resources released"
        );
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<B: Backend> NotificationHandler for Controller<B> {
    fn handle(&mut self, notification: Notification) -> Dispatch {
        if self.state != SplashState::Running {
            return Dispatch::Default;
        }
        match notification {
            Notification::Close => {
                info!("close received; terminating");
                self.terminate();
                Dispatch::Quit
            }
            Notification::DensityChanged(dpi) => {
                info!(dpi = dpi.get(), "display density changed");
                match self.redraw(dpi) {
                    Ok(()) => Dispatch::Handled,
                    Err(e) => self.fail(e),
                }
            }
            Notification::Other(msg) => {
                trace!("forwarding message {msg:#06x} to default handler");
                Dispatch::Default
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
