//! DPI-correct window placement.
//!
//! The splash window is the logical image size scaled by `dpi / 96`,
//! centered on the primary display. Screen resolution is queried on
//! every call because it can change together with the density.

use tracing::{debug, warn};

use crate::error::SplashError;

/// Reference density (100% scaling).
pub const REFERENCE_DPI: u32 = 96;

/// Logical width of the splash artwork.
pub const IMAGE_WIDTH: u32 = 780;

/// Logical height of the splash artwork.
pub const IMAGE_HEIGHT: u32 = 522;

/// Device pixel density in dots per inch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dpi(u32);

impl Dpi {
    /// The reference density, 96 DPI.
    pub const REFERENCE: Dpi = Dpi(REFERENCE_DPI);

    /// Wrap a raw density reported by the platform.
    ///
    /// A zero density has no meaningful geometry and is clamped to
    /// [`Dpi::REFERENCE`].
    pub fn from_raw(raw: u32) -> Self {
        if raw == 0 {
            warn!("platform reported zero DPI; using {REFERENCE_DPI}");
            Self::REFERENCE
        } else {
            Self(raw)
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Scale a logical length, truncating toward zero.
    pub fn scale_length(self, logical: u32) -> u32 {
        let scaled = u64::from(logical) * u64::from(self.0) / u64::from(REFERENCE_DPI);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

/// Decode the density carried by a density-change notification.
///
/// The new DPI is packed into the high word of the first message
/// parameter (the low word holds the identical X-axis value).
pub fn dpi_from_wparam(wparam: usize) -> Dpi {
    Dpi::from_raw(((wparam >> 16) & 0xFFFF) as u32)
}

/// A size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A screen position in device pixels. May be negative when the window
/// is larger than the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Placement and size of the splash window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub position: Point,
    pub size: Size,
}

/// Source of the current primary display resolution.
pub trait ScreenMetrics {
    /// Current resolution of the primary display, in device pixels.
    fn primary_resolution(&self) -> Result<Size, SplashError>;
}

/// Compute the window geometry for `logical` content at `dpi` on a
/// display of `screen` pixels.
pub fn compute_geometry(logical: Size, dpi: Dpi, screen: Size) -> WindowGeometry {
    let size = Size {
        width: dpi.scale_length(logical.width),
        height: dpi.scale_length(logical.height),
    };
    WindowGeometry {
        position: Point {
            x: centered(screen.width, size.width),
            y: centered(screen.height, size.height),
        },
        size,
    }
}

fn centered(screen: u32, window: u32) -> i32 {
    let offset = (i64::from(screen) - i64::from(window)) / 2;
    i32::try_from(offset).unwrap_or(if offset < 0 { i32::MIN } else { i32::MAX })
}

/// Geometry calculator bound to the logical artwork dimensions.
#[derive(Debug, Clone, Copy)]
pub struct GeometryCalculator {
    logical: Size,
}

impl Default for GeometryCalculator {
    fn default() -> Self {
        Self::new(Size::new(IMAGE_WIDTH, IMAGE_HEIGHT))
    }
}

impl GeometryCalculator {
    pub fn new(logical: Size) -> Self {
        Self { logical }
    }

    /// Compute geometry for `dpi` against the display's current resolution.
    pub fn compute<S>(&self, screen: &S, dpi: Dpi) -> Result<WindowGeometry, SplashError>
    where
        S: ScreenMetrics + ?Sized,
    {
        let resolution = screen.primary_resolution()?;
        if resolution.width == 0 || resolution.height == 0 {
            return Err(SplashError::ScreenQuery);
        }
        let geometry = compute_geometry(self.logical, dpi, resolution);
        debug!(
            dpi = dpi.get(),
            screen_w = resolution.width,
            screen_h = resolution.height,
            x = geometry.position.x,
            y = geometry.position.y,
            w = geometry.size.width,
            h = geometry.size.height,
            "computed window geometry"
        );
        Ok(geometry)
    }
}

// ── Tests ────────────────────────────────────────────────────────
