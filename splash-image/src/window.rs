//! Win32 splash window and message loop.
//!
//! Creates the layered popup HWND and routes its messages into a
//! [`NotificationHandler`]. The handler pointer lives in
//! `GWLP_USERDATA` only while an [`Attachment`] guard is alive.

use std::cell::RefCell;
use std::marker::PhantomData;

use tracing::{debug, warn};
use windows::Win32::Foundation::*;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext,
};
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::PCWSTR;

use splash_core::{Dispatch, Notification, NotificationHandler, SplashError, dpi_from_wparam};

use crate::config::WindowConfig;

/// Opt into per-monitor v2 DPI awareness so `WM_DPICHANGED` is delivered.
///
/// Must run before any window is created.
pub fn enable_per_monitor_dpi() {
    if let Err(e) =
        unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) }
    {
        warn!("per-monitor DPI awareness unavailable: {e}");
    }
}

/// Map a raw window message onto the splash notification set.
pub fn classify(msg: u32, wparam: WPARAM) -> Notification {
    match msg {
        WM_DESTROY => Notification::Close,
        WM_DPICHANGED => Notification::DensityChanged(dpi_from_wparam(wparam.0)),
        other => Notification::Other(other),
    }
}

unsafe extern "system" fn wndproc<H: NotificationHandler>(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let handler = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *const RefCell<H>;

    if handler.is_null() {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }

    // The attachment guard clears the pointer before the handler goes away.
    let handler = unsafe { &*handler };

    let dispatch = match handler.try_borrow_mut() {
        Ok(mut handler) => handler.handle(classify(msg, wparam)),
        // Sent synchronously by a call made while already dispatching.
        Err(_) => Dispatch::Default,
    };

    match dispatch {
        Dispatch::Handled => LRESULT(0),
        Dispatch::Quit => {
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }
        Dispatch::Default => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// The splash popup window, dispatching to handlers of type `H`.
pub struct SplashWindow<H> {
    hwnd: HWND,
    hinstance: HINSTANCE,
    class_name: Vec<u16>,
    _handler: PhantomData<H>,
}

/// Keeps a handler reachable from the window procedure.
pub struct Attachment<'a, H> {
    hwnd: HWND,
    _handler: PhantomData<&'a RefCell<H>>,
}

impl<H> Drop for Attachment<'_, H> {
    fn drop(&mut self) {
        unsafe {
            SetWindowLongPtrW(self.hwnd, GWLP_USERDATA, 0);
        }
    }
}

impl<H: NotificationHandler> SplashWindow<H> {
    /// Register the window class and create the hidden layered popup.
    pub fn create(config: &WindowConfig) -> Result<Self, SplashError> {
        let hinstance: HINSTANCE = unsafe { GetModuleHandleW(None) }
            .map_err(|e| SplashError::ClassRegistration(format!("GetModuleHandleW: {e}")))?
            .into();

        let class_name = wide(&config.class_name);
        let title = wide(&config.title);

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_DBLCLKS,
            lpfnWndProc: Some(wndproc::<H>),
            hInstance: hinstance,
            hIcon: unsafe { LoadIconW(None, IDI_APPLICATION) }.unwrap_or_default(),
            hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }.unwrap_or_default(),
            lpszClassName: PCWSTR(class_name.as_ptr()),
            ..Default::default()
        };

        if unsafe { RegisterClassExW(&wc) } == 0 {
            return Err(SplashError::ClassRegistration(
                windows::core::Error::from_win32().to_string(),
            ));
        }

        let mut ex_style = WS_EX_LAYERED;
        if config.topmost {
            ex_style |= WS_EX_TOPMOST;
        }

        let created = unsafe {
            CreateWindowExW(
                ex_style,
                PCWSTR(class_name.as_ptr()),
                PCWSTR(title.as_ptr()),
                WS_POPUP,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                None,
                None,
                hinstance,
                None,
            )
        };

        let hwnd = match created {
            Ok(hwnd) if !hwnd.is_invalid() => Ok(hwnd),
            Ok(_) => Err("CreateWindowExW returned invalid HWND".to_string()),
            Err(e) => Err(format!("CreateWindowExW: {e}")),
        }
        .map_err(|reason| {
            unsafe {
                let _ = UnregisterClassW(PCWSTR(class_name.as_ptr()), hinstance);
            }
            SplashError::WindowCreation(reason)
        })?;

        debug!(class = %config.class_name, topmost = config.topmost, "splash window created");

        Ok(Self {
            hwnd,
            hinstance,
            class_name,
            _handler: PhantomData,
        })
    }

    /// Route this window's messages to `handler` until the guard drops.
    pub fn attach<'a>(&self, handler: &'a RefCell<H>) -> Attachment<'a, H> {
        unsafe {
            SetWindowLongPtrW(
                self.hwnd,
                GWLP_USERDATA,
                handler as *const RefCell<H> as isize,
            );
        }
        Attachment {
            hwnd: self.hwnd,
            _handler: PhantomData,
        }
    }

    /// Block on the thread's message queue until `WM_QUIT`.
    pub fn run_message_loop(&self) -> Result<(), SplashError> {
        let mut msg = MSG::default();
        loop {
            let ret = unsafe { GetMessageW(&mut msg, None, 0, 0) };
            match ret.0 {
                0 => return Ok(()),
                -1 => {
                    return Err(SplashError::MessageLoop(
                        windows::core::Error::from_win32().to_string(),
                    ));
                }
                _ => unsafe {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                },
            }
        }
    }

    /// The raw window handle.
    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }
}

impl<H> Drop for SplashWindow<H> {
    fn drop(&mut self) {
        unsafe {
            if IsWindow(self.hwnd).as_bool() {
                let _ = DestroyWindow(self.hwnd);
            }
            let _ = UnregisterClassW(PCWSTR(self.class_name.as_ptr()), self.hinstance);
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
