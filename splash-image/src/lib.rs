//! # splash-image — Splash Screen
//!
//! Shows a borderless, per-pixel-alpha splash image centered on the
//! primary display and keeps it scaled when the display density
//! changes. The lifecycle and compositing rules live in `splash-core`;
//! this crate supplies the Win32 window, the GDI / GDI+ backend and the
//! configuration.

pub mod app;
pub mod config;

#[cfg(target_os = "windows")]
pub mod gdi;
#[cfg(target_os = "windows")]
pub mod window;
