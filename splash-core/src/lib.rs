//! # splash-core
//!
//! Platform-independent core of the splash screen.
//!
//! This crate contains:
//! - **Geometry**: `compute_geometry`, `GeometryCalculator`, `Dpi` — DPI-scaled,
//!   centered window placement
//! - **Compositor**: `Compositor` — single live off-screen surface, replaced
//!   (never reused) on every redraw and presented in one blend
//! - **Controller**: `Controller` — the `Uninitialized → Running → Terminated`
//!   lifecycle and the single notification dispatch function
//! - **Backend**: the `Backend` trait implemented by the platform layer
//! - **Error**: `SplashError` — typed, `thiserror`-based, mapped to exit codes

pub mod backend;
pub mod compositor;
pub mod controller;
pub mod error;
pub mod geometry;

#[cfg(test)]
mod mock;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use backend::Backend;
pub use compositor::{Compositor, SurfaceStats};
pub use controller::{Controller, Dispatch, Notification, NotificationHandler, SplashState};
pub use error::{SplashError, Subsystem};
pub use geometry::{
    compute_geometry, dpi_from_wparam, Dpi, GeometryCalculator, Point, ScreenMetrics, Size,
    WindowGeometry, IMAGE_HEIGHT, IMAGE_WIDTH, REFERENCE_DPI,
};
