//! GDI / GDI+ backend — decodes the artwork with GDI+, renders it into
//! a 32-bpp DIB section and pushes it with `UpdateLayeredWindow`.
//!
//! Every native handle is wrapped in a guard whose `Drop` releases it,
//! so failure paths free resources without extra bookkeeping.

use std::ffi::c_void;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

use tracing::{debug, trace};
use windows::Win32::Foundation::{COLORREF, HANDLE, HWND, POINT, SIZE};
use windows::Win32::Graphics::Gdi::{
    AC_SRC_ALPHA, AC_SRC_OVER, BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BLENDFUNCTION,
    CreateCompatibleDC, CreateDIBSection, DIB_RGB_COLORS, DeleteDC, DeleteObject, GetDC,
    GetDeviceCaps, HBITMAP, HDC, HGDIOBJ, LOGPIXELSX, ReleaseDC, SelectObject,
};
use windows::Win32::Graphics::GdiPlus::{
    GdipCreateFromHDC, GdipDeleteGraphics, GdipDisposeImage, GdipDrawImageRectI,
    GdipLoadImageFromFile, GdiplusShutdown, GdiplusStartup, GdiplusStartupInput, GpGraphics,
    GpImage, Status,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN, SW_SHOWNORMAL, ShowWindow, ULW_ALPHA,
    UpdateLayeredWindow,
};
use windows::core::PCWSTR;

use splash_core::{Backend, Dpi, ScreenMetrics, Size, SplashError, WindowGeometry};

// ── GDI+ status ──────────────────────────────────────────────────

fn status_name(code: i32) -> &'static str {
    match code {
        1 => "GenericError",
        2 => "InvalidParameter",
        3 => "OutOfMemory",
        4 => "ObjectBusy",
        5 => "InsufficientBuffer",
        6 => "NotImplemented",
        7 => "Win32Error",
        8 => "WrongState",
        10 => "FileNotFound",
        11 => "ValueOverflow",
        12 => "AccessDenied",
        13 => "UnknownImageFormat",
        18 => "GdiplusNotInitialized",
        _ => "Unknown",
    }
}

fn check(status: Status) -> Result<(), String> {
    if status.0 == 0 {
        Ok(())
    } else {
        Err(format!("GDI+ status {} ({})", status.0, status_name(status.0)))
    }
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

// ── GDI+ session ─────────────────────────────────────────────────

/// Keeps GDI+ started. Images must be dropped before the session.
pub struct GdiplusSession {
    token: usize,
}

impl GdiplusSession {
    pub fn startup() -> Result<Self, SplashError> {
        let input = GdiplusStartupInput {
            GdiplusVersion: 1,
            ..Default::default()
        };
        let mut token = 0usize;
        check(unsafe { GdiplusStartup(&mut token, &input, ptr::null_mut()) })
            .map_err(SplashError::GraphicsStartup)?;
        debug!("GDI+ started");
        Ok(Self { token })
    }
}

impl Drop for GdiplusSession {
    fn drop(&mut self) {
        unsafe { GdiplusShutdown(self.token) };
    }
}

/// A decoded GDI+ image.
pub struct GdiImage(*mut GpImage);

impl Drop for GdiImage {
    fn drop(&mut self) {
        unsafe {
            let _ = GdipDisposeImage(self.0);
        }
    }
}

// ── Device contexts ──────────────────────────────────────────────

struct ScreenDc(HDC);

impl Drop for ScreenDc {
    fn drop(&mut self) {
        unsafe {
            ReleaseDC(None, self.0);
        }
    }
}

struct WindowDc {
    hwnd: HWND,
    hdc: HDC,
}

impl Drop for WindowDc {
    fn drop(&mut self) {
        unsafe {
            ReleaseDC(self.hwnd, self.hdc);
        }
    }
}

/// Memory DC with a selected 32-bpp top-down DIB section.
pub struct GdiSurface {
    dc: HDC,
    bitmap: HBITMAP,
    previous: HGDIOBJ,
    size: Size,
}

impl Drop for GdiSurface {
    fn drop(&mut self) {
        unsafe {
            SelectObject(self.dc, self.previous);
            let _ = DeleteObject(self.bitmap);
            let _ = DeleteDC(self.dc);
        }
    }
}

// ── Backend ──────────────────────────────────────────────────────

/// Draws into the splash window through GDI and GDI+.
///
/// Field order is release order: window DC, then screen DC.
pub struct GdiBackend {
    hwnd: HWND,
    window_dc: WindowDc,
    screen_dc: ScreenDc,
}

impl GdiBackend {
    /// Acquire the screen and window device contexts for `hwnd`.
    pub fn new(hwnd: HWND) -> Result<Self, SplashError> {
        let screen = unsafe { GetDC(None) };
        if screen.is_invalid() {
            return Err(SplashError::WindowCreation("GetDC(screen) failed".into()));
        }
        let screen_dc = ScreenDc(screen);

        let hdc = unsafe { GetDC(hwnd) };
        if hdc.is_invalid() {
            return Err(SplashError::WindowCreation("GetDC(window) failed".into()));
        }

        Ok(Self {
            hwnd,
            window_dc: WindowDc { hwnd, hdc },
            screen_dc,
        })
    }
}

impl ScreenMetrics for GdiBackend {
    fn primary_resolution(&self) -> Result<Size, SplashError> {
        let (w, h) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        match (u32::try_from(w), u32::try_from(h)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok(Size::new(w, h)),
            _ => Err(SplashError::ScreenQuery),
        }
    }
}

impl Backend for GdiBackend {
    type Surface = GdiSurface;
    type Image = GdiImage;

    fn load_image(&mut self, path: &Path) -> Result<GdiImage, SplashError> {
        let wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();
        let mut image: *mut GpImage = ptr::null_mut();
        check(unsafe { GdipLoadImageFromFile(PCWSTR(wide.as_ptr()), &mut image) }).map_err(
            |reason| SplashError::ImageDecode {
                path: path.to_path_buf(),
                reason,
            },
        )?;
        debug!(path = %path.display(), "splash image decoded");
        Ok(GdiImage(image))
    }

    fn initial_dpi(&self) -> Dpi {
        let raw = unsafe { GetDeviceCaps(self.screen_dc.0, LOGPIXELSX) };
        Dpi::from_raw(u32::try_from(raw).unwrap_or(0))
    }

    fn allocate_surface(&mut self, size: Size) -> Result<GdiSurface, SplashError> {
        let fail = |reason: String| SplashError::SurfaceAllocation {
            width: size.width,
            height: size.height,
            reason,
        };

        let dc = unsafe { CreateCompatibleDC(self.window_dc.hdc) };
        if dc.is_invalid() {
            return Err(fail("CreateCompatibleDC failed".into()));
        }

        let bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: to_i32(size.width),
                // Negative height = top-down DIB (origin at top-left).
                biHeight: -to_i32(size.height),
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut bits: *mut c_void = ptr::null_mut();
        let bitmap = match unsafe {
            CreateDIBSection(dc, &bmi, DIB_RGB_COLORS, &mut bits, HANDLE::default(), 0)
        } {
            Ok(bitmap) if !bits.is_null() => bitmap,
            result => {
                unsafe {
                    if let Ok(bitmap) = result {
                        let _ = DeleteObject(bitmap);
                    }
                    let _ = DeleteDC(dc);
                }
                return Err(fail("CreateDIBSection failed".into()));
            }
        };

        let previous = unsafe { SelectObject(dc, bitmap) };
        trace!(w = size.width, h = size.height, "surface allocated");

        Ok(GdiSurface {
            dc,
            bitmap,
            previous,
            size,
        })
    }

    fn release_surface(&mut self, surface: GdiSurface) {
        trace!(w = surface.size.width, h = surface.size.height, "surface released");
        drop(surface);
    }

    fn render_stretched(
        &mut self,
        surface: &mut GdiSurface,
        image: &GdiImage,
    ) -> Result<(), SplashError> {
        let mut graphics: *mut GpGraphics = ptr::null_mut();
        check(unsafe { GdipCreateFromHDC(surface.dc, &mut graphics) })
            .map_err(|e| SplashError::Render(format!("GdipCreateFromHDC: {e}")))?;

        let drawn = unsafe {
            GdipDrawImageRectI(
                graphics,
                image.0,
                0,
                0,
                to_i32(surface.size.width),
                to_i32(surface.size.height),
            )
        };
        unsafe {
            let _ = GdipDeleteGraphics(graphics);
        }

        check(drawn).map_err(|e| SplashError::Render(format!("GdipDrawImageRectI: {e}")))
    }

    fn present(
        &mut self,
        surface: &GdiSurface,
        geometry: &WindowGeometry,
    ) -> Result<(), SplashError> {
        let dst = POINT {
            x: geometry.position.x,
            y: geometry.position.y,
        };
        let src = POINT { x: 0, y: 0 };
        let size = SIZE {
            cx: to_i32(surface.size.width),
            cy: to_i32(surface.size.height),
        };
        let blend = BLENDFUNCTION {
            BlendOp: AC_SRC_OVER as u8,
            BlendFlags: 0,
            SourceConstantAlpha: 255,
            AlphaFormat: AC_SRC_ALPHA as u8,
        };

        unsafe {
            UpdateLayeredWindow(
                self.hwnd,
                self.screen_dc.0,
                Some(&dst as *const POINT),
                Some(&size as *const SIZE),
                surface.dc,
                Some(&src as *const POINT),
                COLORREF(0),
                Some(&blend as *const BLENDFUNCTION),
                ULW_ALPHA,
            )
        }
        .map_err(|e| SplashError::Present(format!("UpdateLayeredWindow: {e}")))
    }

    fn show(&mut self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOWNORMAL);
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
