//! Off-screen surface management and presentation.
//!
//! The compositor keeps at most one live surface. Every recomposite
//! releases the previous surface before allocating the next, renders the
//! source image into the fresh buffer, and presents it in one blend so
//! no intermediate frame ever reaches the screen.

use tracing::debug;

use crate::backend::Backend;
use crate::error::SplashError;
use crate::geometry::WindowGeometry;

/// Allocation bookkeeping for the off-screen surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    pub allocated: u64,
    pub released: u64,
    pub presented: u64,
}

impl SurfaceStats {
    /// Surfaces currently alive (0 or 1).
    pub fn live(&self) -> u64 {
        self.allocated - self.released
    }
}

/// Owns the backend and the current off-screen surface.
///
/// `surface` is declared first so a live surface is dropped before the
/// backend's drawing contexts.
pub struct Compositor<B: Backend> {
    surface: Option<B::Surface>,
    backend: B,
    stats: SurfaceStats,
}

impl<B: Backend> Compositor<B> {
    pub fn new(backend: B) -> Self {
        Self {
            surface: None,
            backend,
            stats: SurfaceStats::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    /// Rebuild the off-screen surface for `geometry` and present it.
    ///
    /// A surface that was allocated but failed to render or present stays
    /// the live surface, so [`release_surface`](Self::release_surface)
    /// still frees it.
    pub fn recomposite(
        &mut self,
        geometry: &WindowGeometry,
        image: &B::Image,
    ) -> Result<(), SplashError> {
        self.release_surface();

        let surface = self.backend.allocate_surface(geometry.size)?;
        self.stats.allocated += 1;
        let surface = self.surface.insert(surface);

        self.backend.render_stretched(surface, image)?;
        self.backend.present(surface, geometry)?;
        self.stats.presented += 1;

        debug!(
            w = geometry.size.width,
            h = geometry.size.height,
            x = geometry.position.x,
            y = geometry.position.y,
            presented = self.stats.presented,
            "surface presented"
        );
        Ok(())
    }

    /// Release the live surface, if any.
    pub fn release_surface(&mut self) {
        if let Some(surface) = self.surface.take() {
            self.backend.release_surface(surface);
            self.stats.released += 1;
        }
    }

    /// Release the live surface and hand back the backend.
    pub fn into_backend(mut self) -> B {
        self.release_surface();
        self.backend
    }
}

// ── Tests ────────────────────────────────────────────────────────
