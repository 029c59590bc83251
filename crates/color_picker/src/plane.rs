use crate::color::{Rgb, clamp01};
use crate::error::{Error, Result};
use crate::gradient::GradientImage;
use tiny_skia::Pixmap;

/// A drawable the host shows behind the saturation/value area.
pub trait PlaneSurface {
    /// Receive the freshly rendered plane. Called with the same buffer on
    /// every redraw.
    fn present(&mut self, image: &GradientImage);

    /// The plane is about to be redrawn at a new size.
    fn resize(&mut self, _width: u32, _height: u32) {}

    /// Free the host-side resource. Never called twice.
    fn release(&mut self) {}
}

/// Creates plane surfaces, standing in for the host's texture / shader setup.
pub trait RenderBackend {
    /// `None` when the backend cannot draw a plane at all.
    fn create_plane_surface(&self, width: u32, height: u32) -> Option<Box<dyn PlaneSurface>>;
}

/// CPU backend blitting each frame into a [`Pixmap`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuBackend;

impl RenderBackend for CpuBackend {
    fn create_plane_surface(&self, width: u32, height: u32) -> Option<Box<dyn PlaneSurface>> {
        let surface = CpuSurface::new(width, height)?;
        Some(Box::new(surface))
    }
}

#[derive(Debug)]
pub struct CpuSurface {
    pixmap: Option<Pixmap>,
}

impl CpuSurface {
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            pixmap: Some(Pixmap::new(width, height)?),
        })
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }
}

impl PlaneSurface for CpuSurface {
    fn present(&mut self, image: &GradientImage) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        if !image.write_into(pixmap) {
            tracing::warn!(
                surface = ?(pixmap.width(), pixmap.height()),
                image = ?(image.width(), image.height()),
                "plane size does not match surface"
            );
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.pixmap.is_none() {
            return;
        }
        self.pixmap = Pixmap::new(width, height);
        if self.pixmap.is_none() {
            tracing::warn!(width, height, "cannot allocate plane pixmap");
        }
    }

    fn release(&mut self) {
        self.pixmap = None;
    }
}

/// Keeps the saturation/value plane of one picker up to date.
///
/// The plane buffer is allocated once and rewritten in place for each hue.
pub struct PlaneController {
    image: GradientImage,
    surface: Option<Box<dyn PlaneSurface>>,
    hue: f32,
    render_count: usize,
}

impl PlaneController {
    /// Create a controller drawing into a new surface from `backend`.
    ///
    /// Fails when the backend cannot provide a surface.
    pub fn new(backend: &dyn RenderBackend, width: u32, height: u32, hue: f32) -> Result<Self> {
        let surface = backend
            .create_plane_surface(width, height)
            .ok_or(Error::PlaneSurfaceUnavailable { width, height })?;

        let mut this = Self {
            image: GradientImage::new(width, height),
            surface: Some(surface),
            hue: clamp01(hue),
            render_count: 0,
        };
        this.redraw();
        Ok(this)
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn image(&self) -> &GradientImage {
        &self.image
    }

    /// How many times the plane has been rendered.
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn is_released(&self) -> bool {
        self.surface.is_none()
    }

    /// Re-render the plane for `hue` into the existing buffer.
    pub fn set_hue(&mut self, hue: f32) {
        if self.is_released() {
            tracing::trace!(hue, "set_hue on a released plane");
            return;
        }
        self.hue = clamp01(hue);
        self.redraw();
    }

    /// Reallocate the buffer for a new size and redraw.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.is_released() {
            return;
        }
        if (width, height) == (self.image.width(), self.image.height()) {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height);
        }
        self.image = GradientImage::new(width, height);
        self.redraw();
    }

    /// The drawn color under a normalized coordinate.
    pub fn sample(&self, u: f32, v: f32) -> Option<Rgb> {
        if self.is_released() {
            return None;
        }
        self.image.sample_normalized(u, v)
    }

    /// Free the surface and the buffer. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.release();
            self.image = GradientImage::new(0, 0);
            tracing::debug!(renders = self.render_count, "plane surface released");
        }
    }

    fn redraw(&mut self) {
        self.image.fill_saturation_value_plane(self.hue);
        self.render_count += 1;
        if let Some(surface) = self.surface.as_mut() {
            surface.present(&self.image);
        }
        tracing::trace!(hue = self.hue, "plane rendered");
    }
}

impl Drop for PlaneController {
    fn drop(&mut self) {
        self.release();
    }
}
