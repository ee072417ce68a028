//! Recording backend for unit tests.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::backend::Backend;
use crate::error::SplashError;
use crate::geometry::{Dpi, ScreenMetrics, Size, WindowGeometry};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    LoadImage,
    ScreenQuery,
    Allocate(u32, Size),
    Release(u32),
    Render(u32, Size),
    Present(u32, WindowGeometry),
    Show,
    ReleaseTargets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Failure {
    LoadImage,
    Allocate,
    Render,
    Present,
}

#[derive(Debug)]
pub(crate) struct MockSurface {
    id: u32,
    size: Size,
}

#[derive(Debug)]
pub(crate) struct MockImage;

#[derive(Debug, Default)]
struct LogInner {
    calls: Vec<Call>,
    live: u32,
    max_live: u32,
    next_id: u32,
    screen: Size,
}

/// Shared view of everything the backend was asked to do.
#[derive(Debug, Clone, Default)]
pub(crate) struct Log(Rc<RefCell<LogInner>>);

impl Log {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub(crate) fn live(&self) -> u32 {
        self.0.borrow().live
    }

    pub(crate) fn max_live(&self) -> u32 {
        self.0.borrow().max_live
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().calls.iter().filter(|c| pred(*c)).count()
    }

    pub(crate) fn allocated_sizes(&self) -> Vec<Size> {
        self.0
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Allocate(_, size) => Some(*size),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn shown(&self) -> bool {
        self.0.borrow().calls.contains(&Call::Show)
    }

    pub(crate) fn set_screen(&self, screen: Size) {
        self.0.borrow_mut().screen = screen;
    }

    fn push(&self, call: Call) {
        self.0.borrow_mut().calls.push(call);
    }
}

pub(crate) struct MockBackend {
    log: Log,
    dpi: Dpi,
    failure: Option<(Failure, usize)>,
    attempts: usize,
}

impl MockBackend {
    pub(crate) fn new() -> Self {
        let log = Log::default();
        log.set_screen(Size::new(1920, 1080));
        Self {
            log,
            dpi: Dpi::REFERENCE,
            failure: None,
            attempts: 0,
        }
    }

    pub(crate) fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = Dpi::from_raw(dpi);
        self
    }

    /// Fail the first attempt of `failure`.
    pub(crate) fn failing(self, failure: Failure) -> Self {
        self.failing_after(failure, 0)
    }

    /// Let `successes` attempts of `failure` through, then fail.
    pub(crate) fn failing_after(mut self, failure: Failure, successes: usize) -> Self {
        self.failure = Some((failure, successes));
        self
    }

    pub(crate) fn log(&self) -> Log {
        self.log.clone()
    }

    fn should_fail(&mut self, op: Failure) -> bool {
        match self.failure {
            Some((failure, successes)) if failure == op => {
                self.attempts += 1;
                self.attempts > successes
            }
            _ => false,
        }
    }
}

impl ScreenMetrics for MockBackend {
    fn primary_resolution(&self) -> Result<Size, SplashError> {
        self.log.push(Call::ScreenQuery);
        Ok(self.log.0.borrow().screen)
    }
}

impl Backend for MockBackend {
    type Surface = MockSurface;
    type Image = MockImage;

    fn load_image(&mut self, path: &Path) -> Result<MockImage, SplashError> {
        self.log.push(Call::LoadImage);
        if self.should_fail(Failure::LoadImage) {
            return Err(SplashError::ImageDecode {
                path: path.to_path_buf(),
                reason: "FileNotFound".into(),
            });
        }
        Ok(MockImage)
    }

    fn initial_dpi(&self) -> Dpi {
        self.dpi
    }

    fn allocate_surface(&mut self, size: Size) -> Result<MockSurface, SplashError> {
        assert_eq!(self.log.live(), 0, "surface allocated while another is live");
        if self.should_fail(Failure::Allocate) {
            return Err(SplashError::SurfaceAllocation {
                width: size.width,
                height: size.height,
                reason: "CreateDIBSection failed".into(),
            });
        }
        let id = {
            let mut inner = self.log.0.borrow_mut();
            inner.next_id += 1;
            inner.live += 1;
            inner.max_live = inner.max_live.max(inner.live);
            inner.next_id
        };
        self.log.push(Call::Allocate(id, size));
        Ok(MockSurface { id, size })
    }

    fn release_surface(&mut self, surface: MockSurface) {
        self.log.0.borrow_mut().live -= 1;
        self.log.push(Call::Release(surface.id));
    }

    fn render_stretched(
        &mut self,
        surface: &mut MockSurface,
        _image: &MockImage,
    ) -> Result<(), SplashError> {
        if self.should_fail(Failure::Render) {
            return Err(SplashError::Render("GdipDrawImageRectI failed".into()));
        }
        self.log.push(Call::Render(surface.id, surface.size));
        Ok(())
    }

    fn present(
        &mut self,
        surface: &MockSurface,
        geometry: &WindowGeometry,
    ) -> Result<(), SplashError> {
        assert_eq!(surface.size, geometry.size, "stale surface presented");
        if self.should_fail(Failure::Present) {
            return Err(SplashError::Present("UpdateLayeredWindow failed".into()));
        }
        self.log.push(Call::Present(surface.id, *geometry));
        Ok(())
    }

    fn show(&mut self) {
        self.log.push(Call::Show);
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.log.push(Call::ReleaseTargets);
    }
}
