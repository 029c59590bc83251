use crate::color::{Rgb, clamp01};
use crate::event::Emitter;
use crate::plane::PlaneController;
use crate::throttle::Throttle;
use instant::Instant;
use std::{
    cell::{Cell, RefCell},
    time::Duration,
};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The rectangle of an interactive surface in its local space, y grows
/// upwards from the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Map a local position to `0.0..=1.0` on both axes of `rect`.
///
/// Positions outside the rectangle are clamped onto its edge, a zero-sized
/// axis maps to `0.0`.
pub fn normalize(local: Point, rect: SurfaceRect) -> (f32, f32) {
    (
        normalize_axis(local.x - rect.x, rect.width),
        normalize_axis(local.y - rect.y, rect.height),
    )
}

fn normalize_axis(offset: f32, size: f32) -> f32 {
    if size > 0.0 {
        clamp01(offset / size)
    } else {
        0.0
    }
}

/// Identifies the interactive element a pointer event was delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The element under the pointer, `None` when the hit test found nothing.
    pub target: Option<SurfaceId>,
    /// Position in screen space.
    pub position: Point,
}

impl PointerEvent {
    pub fn new(target: SurfaceId, position: Point) -> Self {
        Self {
            target: Some(target),
            position,
        }
    }
}

/// Converts screen positions into a surface's local space.
///
/// This is where the host applies camera and layout transforms.
pub trait LocalPointMapper {
    /// `None` when the position cannot be mapped onto the surface.
    fn to_local(&self, screen: Point, rect: &SurfaceRect) -> Option<Point>;
}

/// Screen and local space are the same.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMapper;

impl LocalPointMapper for IdentityMapper {
    fn to_local(&self, screen: Point, _: &SurfaceRect) -> Option<Point> {
        Some(screen)
    }
}

/// The presentation side of the picker.
pub trait ColorPickerView {
    /// Normalized hue in `0.0..=1.0`.
    fn on_hue_changed(&self) -> &Emitter<f32>;

    /// Normalized `(saturation, value)`.
    fn on_saturation_value_changed(&self) -> &Emitter<(f32, f32)>;

    /// Show `color` in the swatch and announce it to external listeners.
    fn update_color_display(&self, color: Rgb);

    /// Redraw the saturation/value plane for `hue`.
    fn update_hue_shader(&self, hue: f32);
}

/// Headless view adapter turning raw slider and pointer input into
/// normalized streams.
///
/// Plane redraws for hue changes are coalesced by a [`Throttle`] and applied
/// from [`PickerView::tick`]. The color path is not throttled.
pub struct PickerView {
    surface_id: SurfaceId,
    rect: Cell<SurfaceRect>,
    mapper: Box<dyn LocalPointMapper>,
    hue_changed: Emitter<f32>,
    saturation_value_changed: Emitter<(f32, f32)>,
    color_picked: Emitter<Rgb>,
    swatch: Cell<Option<Rgb>>,
    pointer: Cell<Option<Point>>,
    plane: RefCell<PlaneController>,
    hue_throttle: RefCell<Throttle<f32>>,
    disposed: Cell<bool>,
}

impl PickerView {
    pub fn new(
        surface_id: SurfaceId,
        rect: SurfaceRect,
        plane: PlaneController,
        throttle_interval: Duration,
    ) -> Self {
        Self {
            surface_id,
            rect: Cell::new(rect),
            mapper: Box::new(IdentityMapper),
            hue_changed: Emitter::new(),
            saturation_value_changed: Emitter::new(),
            color_picked: Emitter::new(),
            swatch: Cell::new(None),
            pointer: Cell::new(None),
            plane: RefCell::new(plane),
            hue_throttle: RefCell::new(Throttle::new(throttle_interval)),
            disposed: Cell::new(false),
        }
    }

    /// Set the screen to local mapping, default: [`IdentityMapper`]
    pub fn mapper(mut self, mapper: impl LocalPointMapper + 'static) -> Self {
        self.mapper = Box::new(mapper);
        self
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    pub fn rect(&self) -> SurfaceRect {
        self.rect.get()
    }

    /// Update the interactive rectangle after a layout change.
    pub fn set_rect(&self, rect: SurfaceRect) {
        self.rect.set(rect);
    }

    /// Fired with every color shown in the swatch.
    pub fn on_color_picked(&self) -> &Emitter<Rgb> {
        &self.color_picked
    }

    /// The color currently shown, `None` until a color is shown.
    pub fn swatch(&self) -> Option<Rgb> {
        self.swatch.get()
    }

    /// Show `color` in the swatch without notifying listeners.
    pub fn show_swatch(&self, color: Rgb) {
        if !self.is_disposed() {
            self.swatch.set(Some(color));
        }
    }

    /// Local position of the last accepted pointer event, for the marker.
    pub fn pointer_position(&self) -> Option<Point> {
        self.pointer.get()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Feed a hue slider value.
    ///
    /// The hue stream fires right away, the plane redraw waits for the
    /// throttle window to close.
    pub fn handle_hue_input(&self, value: f32, now: Instant) {
        if self.is_disposed() {
            return;
        }
        let hue = clamp01(value);
        self.hue_changed.emit(&hue);
        // A listener may have disposed the view.
        if !self.is_disposed() {
            self.hue_throttle.borrow_mut().push(hue, now);
        }
    }

    /// Feed a click or drag on the saturation/value surface.
    ///
    /// Returns `false` when the event was ignored, either because it targets
    /// another element or because it cannot be mapped onto the surface.
    pub fn handle_pointer(&self, event: &PointerEvent) -> bool {
        let Some(local) = self.local_point(event) else {
            return false;
        };

        let (saturation, value) = normalize(local, self.rect.get());
        self.pointer.set(Some(local));
        self.saturation_value_changed.emit(&(saturation, value));
        true
    }

    /// The color drawn on the plane under the pointer.
    pub fn sample_plane(&self, event: &PointerEvent) -> Option<Rgb> {
        let local = self.local_point(event)?;
        let (u, v) = normalize(local, self.rect.get());
        self.plane.borrow().sample(u, v)
    }

    /// Apply a throttled plane redraw if one is due. Returns whether the plane
    /// was redrawn.
    pub fn tick(&self, now: Instant) -> bool {
        if self.is_disposed() {
            return false;
        }
        let due = self.hue_throttle.borrow_mut().poll(now);
        match due {
            Some(hue) => {
                self.update_hue_shader(hue);
                true
            }
            None => false,
        }
    }

    /// When the next [`PickerView::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.hue_throttle.borrow().deadline()
    }

    pub fn plane_render_count(&self) -> usize {
        self.plane.borrow().render_count()
    }

    pub fn plane_hue(&self) -> f32 {
        self.plane.borrow().hue()
    }

    /// Borrow the plane controller, e.g. to export the current image.
    pub fn with_plane<R>(&self, f: impl FnOnce(&PlaneController) -> R) -> R {
        f(&self.plane.borrow())
    }

    /// Stop accepting input, drop the pending redraw and free the plane.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.hue_throttle.borrow_mut().cancel();
        self.plane.borrow_mut().release();
        self.pointer.set(None);
    }

    fn local_point(&self, event: &PointerEvent) -> Option<Point> {
        if self.is_disposed() {
            return None;
        }
        if event.target != Some(self.surface_id) {
            tracing::trace!(
                hit = ?event.target,
                surface = ?self.surface_id,
                "pointer event for another element"
            );
            return None;
        }
        let local = self.mapper.to_local(event.position, &self.rect.get());
        if local.is_none() {
            tracing::trace!(position = ?event.position, "pointer outside of the plane");
        }
        local
    }
}

impl ColorPickerView for PickerView {
    fn on_hue_changed(&self) -> &Emitter<f32> {
        &self.hue_changed
    }

    fn on_saturation_value_changed(&self) -> &Emitter<(f32, f32)> {
        &self.saturation_value_changed
    }

    fn update_color_display(&self, color: Rgb) {
        if self.is_disposed() {
            return;
        }
        self.swatch.set(Some(color));
        self.color_picked.emit(&color);
    }

    fn update_hue_shader(&self, hue: f32) {
        self.plane.borrow_mut().set_hue(hue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::render_saturation_value_plane;
    use crate::plane::tests::RecordingBackend;
    use std::rc::Rc;

    const SURFACE: SurfaceId = SurfaceId(1);
    const RECT: SurfaceRect = SurfaceRect::new(-50.0, -50.0, 100.0, 100.0);

    fn view() -> PickerView {
        let plane = PlaneController::new(&RecordingBackend::default(), 16, 16, 0.0).unwrap();
        PickerView::new(SURFACE, RECT, plane, Duration::from_millis(50))
    }

    fn collect<T: Clone + 'static>(
        emitter: &Emitter<T>,
    ) -> (Rc<RefCell<Vec<T>>>, crate::event::Subscription) {
        let values = Rc::new(RefCell::new(Vec::new()));
        let subscription = emitter.subscribe({
            let values = values.clone();
            move |v: &T| values.borrow_mut().push(v.clone())
        });
        (values, subscription)
    }

    #[test]
    fn test_normalize_corners_and_outside() {
        let rect = SurfaceRect::new(10.0, 20.0, 200.0, 100.0);
        assert_eq!(normalize(Point::new(10.0, 20.0), rect), (0.0, 0.0));
        assert_eq!(normalize(Point::new(210.0, 120.0), rect), (1.0, 1.0));
        assert_eq!(normalize(Point::new(110.0, 45.0), rect), (0.5, 0.25));
        assert_eq!(normalize(Point::new(-500.0, 900.0), rect), (0.0, 1.0));
        assert_eq!(
            normalize(Point::new(5.0, 5.0), SurfaceRect::new(0.0, 0.0, 0.0, 0.0)),
            (0.0, 0.0)
        );
    }

    #[test]
    fn test_pointer_emits_normalized_saturation_value() {
        let view = view();
        let (values, _subscription) = collect(view.on_saturation_value_changed());

        assert!(view.handle_pointer(&PointerEvent::new(SURFACE, Point::new(-50.0, -50.0))));
        assert!(view.handle_pointer(&PointerEvent::new(SURFACE, Point::new(50.0, 50.0))));
        assert!(view.handle_pointer(&PointerEvent::new(SURFACE, Point::new(30.0, -25.0))));

        assert_eq!(*values.borrow(), vec![(0.0, 0.0), (1.0, 1.0), (0.8, 0.25)]);
        assert_eq!(view.pointer_position(), Some(Point::new(30.0, -25.0)));
    }

    #[test]
    fn test_pointer_on_other_target_is_ignored() {
        let view = view();
        let (values, _subscription) = collect(view.on_saturation_value_changed());

        assert!(!view.handle_pointer(&PointerEvent::new(SurfaceId(2), Point::new(0.0, 0.0))));
        assert!(!view.handle_pointer(&PointerEvent {
            target: None,
            position: Point::new(0.0, 0.0),
        }));

        assert!(values.borrow().is_empty());
        assert_eq!(view.pointer_position(), None);
    }

    /// Local space is screen space shifted by (100, 100), points outside
    /// the rectangle do not map.
    struct OffsetMapper;

    impl LocalPointMapper for OffsetMapper {
        fn to_local(&self, screen: Point, rect: &SurfaceRect) -> Option<Point> {
            let local = Point::new(screen.x - 100.0, screen.y - 100.0);
            let inside = local.x >= rect.x
                && local.x <= rect.x + rect.width
                && local.y >= rect.y
                && local.y <= rect.y + rect.height;
            inside.then_some(local)
        }
    }

    #[test]
    fn test_unmappable_pointer_is_ignored() {
        let view = view().mapper(OffsetMapper);
        let (values, _subscription) = collect(view.on_saturation_value_changed());

        assert!(!view.handle_pointer(&PointerEvent::new(SURFACE, Point::new(0.0, 0.0))));
        assert!(view.handle_pointer(&PointerEvent::new(SURFACE, Point::new(100.0, 100.0))));

        assert_eq!(*values.borrow(), vec![(0.5, 0.5)]);
    }

    #[test]
    fn test_hue_input_is_immediate_and_plane_is_throttled() {
        let view = view();
        let (hues, _subscription) = collect(view.on_hue_changed());
        let start = Instant::now();

        for i in 0..5u64 {
            view.handle_hue_input(i as f32 * 0.1, start + Duration::from_millis(i * 10));
            view.tick(start + Duration::from_millis(i * 10));
        }

        assert_eq!(hues.borrow().len(), 5);
        assert_eq!(view.plane_render_count(), 1);
        assert_eq!(view.next_deadline(), Some(start + Duration::from_millis(50)));

        assert!(view.tick(start + Duration::from_millis(50)));
        assert_eq!(view.plane_render_count(), 2);
        assert_eq!(view.plane_hue(), 0.4);
        view.with_plane(|plane| {
            assert_eq!(plane.image(), &render_saturation_value_plane(16, 16, 0.4));
        });
        assert!(!view.tick(start + Duration::from_millis(200)));
    }

    #[test]
    fn test_hue_input_is_clamped() {
        let view = view();
        let (hues, _subscription) = collect(view.on_hue_changed());

        view.handle_hue_input(1.7, Instant::now());
        view.handle_hue_input(-0.2, Instant::now());

        assert_eq!(*hues.borrow(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_update_color_display_sets_swatch_and_notifies() {
        let view = view();
        let (picked, _subscription) = collect(view.on_color_picked());
        let red = Rgb::new(1.0, 0.0, 0.0);

        assert_eq!(view.swatch(), None);
        view.update_color_display(red);

        assert_eq!(view.swatch(), Some(red));
        assert_eq!(*picked.borrow(), vec![red]);
    }

    #[test]
    fn test_show_swatch_is_silent() {
        let view = view();
        let (picked, _subscription) = collect(view.on_color_picked());
        let blue = Rgb::new(0.0, 0.0, 1.0);

        view.show_swatch(blue);
        assert_eq!(view.swatch(), Some(blue));
        assert!(picked.borrow().is_empty());

        view.dispose();
        view.show_swatch(Rgb::BLACK);
        assert_eq!(view.swatch(), Some(blue));
    }

    #[test]
    fn test_sample_plane_reads_texture() {
        let view = view();
        view.update_hue_shader(0.0);

        let top_right = view.sample_plane(&PointerEvent::new(SURFACE, Point::new(50.0, 50.0)));
        assert_eq!(top_right, view.with_plane(|plane| plane.image().pixel(15, 15)));
        assert_eq!(
            view.sample_plane(&PointerEvent::new(SurfaceId(9), Point::new(0.0, 0.0))),
            None
        );
    }

    #[test]
    fn test_dispose_stops_everything() {
        let view = view();
        let (hues, _hue_subscription) = collect(view.on_hue_changed());
        let (picked, _picked_subscription) = collect(view.on_color_picked());
        let start = Instant::now();

        view.handle_hue_input(0.3, start);
        view.dispose();
        view.dispose();

        view.handle_hue_input(0.6, start);
        view.update_color_display(Rgb::BLACK);
        assert!(!view.handle_pointer(&PointerEvent::new(SURFACE, Point::new(0.0, 0.0))));
        assert!(!view.tick(start + Duration::from_secs(1)));

        assert_eq!(*hues.borrow(), vec![0.3]);
        assert!(picked.borrow().is_empty());
        assert_eq!(view.plane_render_count(), 1);
        assert_eq!(view.next_deadline(), None);
        assert!(view.with_plane(|plane| plane.is_released()));
    }
}
