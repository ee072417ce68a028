//! The seam between the splash lifecycle and the platform.
//!
//! A backend owns the screen and window drawing contexts and knows how
//! to allocate, fill and present an off-screen surface. The controller
//! and compositor drive it; they never touch native handles.

use std::path::Path;

use crate::error::SplashError;
use crate::geometry::{Dpi, ScreenMetrics, Size, WindowGeometry};

/// Windowing and graphics capabilities consumed by the splash screen.
///
/// Dropping the backend releases its window drawing context and then the
/// screen drawing context.
pub trait Backend: ScreenMetrics {
    /// Off-screen pixel buffer with per-pixel alpha, plus its drawing context.
    type Surface;
    /// Decoded source artwork.
    type Image;

    /// Decode the image file at `path`.
    fn load_image(&mut self, path: &Path) -> Result<Self::Image, SplashError>;

    /// Density of the primary display at startup.
    fn initial_dpi(&self) -> Dpi;

    /// Allocate a new surface of exactly `size`.
    fn allocate_surface(&mut self, size: Size) -> Result<Self::Surface, SplashError>;

    /// Release a surface and its drawing context.
    fn release_surface(&mut self, surface: Self::Surface);

    /// Draw `image` stretched to fill `surface` completely.
    fn render_stretched(
        &mut self,
        surface: &mut Self::Surface,
        image: &Self::Image,
    ) -> Result<(), SplashError>;

    /// Push `surface` to the screen at `geometry.position` as a single
    /// per-pixel-alpha blend at full opacity.
    fn present(
        &mut self,
        surface: &Self::Surface,
        geometry: &WindowGeometry,
    ) -> Result<(), SplashError>;

    /// Make the window visible. Called once, after the first present.
    fn show(&mut self);
}
