use crate::color::{Hsv, Rgb};
use crate::config::PickerConfig;
use crate::error::Result;
use crate::event::Subscription;
use crate::hue_strip::{HueStrip, HueStripRegistry};
use crate::model::{ColorPickerModel, HsvColorModel};
use crate::plane::{PlaneController, RenderBackend};
use crate::presenter::ColorPickerPresenter;
use crate::view::{PickerView, PointerEvent, SurfaceId, SurfaceRect};
use instant::Instant;
use std::rc::Rc;


/// Builds picker sessions that share one hue strip registry.
pub struct PickerFactory<B: RenderBackend> {
    config: PickerConfig,
    backend: B,
    hue_strips: HueStripRegistry,
}

impl<B: RenderBackend> PickerFactory<B> {
    /// Create a factory, failing on an invalid config.
    pub fn new(config: PickerConfig, backend: B) -> Result<Self> {
        Ok(Self {
            config: config.validated()?,
            backend,
            hue_strips: HueStripRegistry::new(),
        })
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn hue_strips(&self) -> &HueStripRegistry {
        &self.hue_strips
    }

    /// Open a session for the saturation/value surface `surface_id`.
    ///
    /// Fails when the backend cannot provide a plane surface, in which case
    /// nothing is acquired.
    pub fn create_session(&self, surface_id: SurfaceId, rect: SurfaceRect) -> Result<PickerSession> {
        let config = &self.config;
        let initial = config.initial;

        let plane = PlaneController::new(
            &self.backend,
            config.plane_width,
            config.plane_height,
            initial.hue(),
        )?;
        let hue_strip = self.hue_strips.acquire(config.hue_strip_width);

        let model = Rc::new(HsvColorModel::new(initial));
        let view = Rc::new(PickerView::new(
            surface_id,
            rect,
            plane,
            config.throttle_interval(),
        ));
        view.show_swatch(model.current_color());
        let presenter = ColorPickerPresenter::new(&model, &view);

        tracing::debug!(surface = surface_id.0, "picker session created");
        Ok(PickerSession {
            surface_id,
            model,
            view,
            presenter,
            hue_strip: Some(hue_strip),
        })
    }
}

/// One picker on screen: a model, a view and the presenter linking them.
///
/// A session is single-use. Once disposed, input is ignored and no further
/// colors are reported. Dropping a session disposes it.
pub struct PickerSession {
    surface_id: SurfaceId,
    model: Rc<HsvColorModel>,
    view: Rc<PickerView>,
    presenter: ColorPickerPresenter,
    hue_strip: Option<Rc<HueStrip>>,
}

impl PickerSession {
    pub fn model(&self) -> &Rc<HsvColorModel> {
        &self.model
    }

    pub fn view(&self) -> &Rc<PickerView> {
        &self.view
    }

    /// The shared hue gradient for the slider background, `None` once disposed.
    pub fn hue_strip(&self) -> Option<&Rc<HueStrip>> {
        self.hue_strip.as_ref()
    }

    pub fn hsv(&self) -> Hsv {
        self.model.hsv()
    }

    pub fn current_color(&self) -> Rgb {
        self.model.current_color()
    }

    /// Listen for picked colors.
    pub fn on_color_picked(&self, callback: impl Fn(&Rgb) + 'static) -> Subscription {
        self.view.on_color_picked().subscribe(callback)
    }

    /// Feed a hue slider value.
    pub fn set_hue(&self, value: f32, now: Instant) {
        self.view.handle_hue_input(value, now);
    }

    /// Feed a pointer event on the saturation/value plane.
    pub fn pointer(&self, event: &PointerEvent) -> bool {
        self.view.handle_pointer(event)
    }

    /// Run due plane redraws, call again at [`PickerSession::next_deadline`].
    pub fn tick(&self, now: Instant) -> bool {
        self.view.tick(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.view.next_deadline()
    }

    pub fn is_disposed(&self) -> bool {
        self.presenter.is_disposed()
    }

    /// Tear the session down: cut the presenter links, cancel the pending
    /// redraw, release the plane and the hue strip handle.
    pub fn dispose(&mut self) {
        if self.presenter.is_disposed() {
            return;
        }
        self.presenter.dispose();
        self.view.dispose();
        self.hue_strip = None;
        tracing::debug!(surface = self.surface_id.0, "picker session disposed");
    }
}

impl Drop for PickerSession {
    fn drop(&mut self) {
        self.dispose();
    }
}
