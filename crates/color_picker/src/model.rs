use crate::color::{Hsv, Rgb};
use crate::event::Emitter;
use std::cell::Cell;

/// The state side of the picker.
///
/// Implementations keep a HSV triple, derive RGB from it and announce every
/// update through [`ColorPickerModel::color_changed`].
pub trait ColorPickerModel {
    /// Hue in `0.0..1.0`, a full turn reads back as 0.0.
    fn hue(&self) -> f32;
    fn saturation(&self) -> f32;
    fn value(&self) -> f32;

    /// The color for the current HSV triple.
    fn current_color(&self) -> Rgb;

    fn color_changed(&self) -> &Emitter<Rgb>;

    /// Clamp and store a new HSV triple, then emit the derived color.
    fn update_color(&self, h: f32, s: f32, v: f32);
}

#[derive(Debug, Default)]
pub struct HsvColorModel {
    hsv: Cell<Hsv>,
    color_changed: Emitter<Rgb>,
}

impl HsvColorModel {
    pub fn new(initial: Hsv) -> Self {
        Self {
            hsv: Cell::new(initial),
            color_changed: Emitter::new(),
        }
    }

    pub fn hsv(&self) -> Hsv {
        self.hsv.get()
    }
}

impl ColorPickerModel for HsvColorModel {
    fn hue(&self) -> f32 {
        self.hsv.get().hue()
    }

    fn saturation(&self) -> f32 {
        self.hsv.get().saturation()
    }

    fn value(&self) -> f32 {
        self.hsv.get().value()
    }

    fn current_color(&self) -> Rgb {
        self.hsv.get().to_rgb()
    }

    fn color_changed(&self) -> &Emitter<Rgb> {
        &self.color_changed
    }

    fn update_color(&self, h: f32, s: f32, v: f32) {
        let hsv = Hsv::new(h, s, v);
        self.hsv.set(hsv);

        let color = hsv.to_rgb();
        tracing::trace!(
            h = hsv.hue(),
            s = hsv.saturation(),
            v = hsv.value(),
            %color,
            "color updated"
        );
        self.color_changed.emit(&color);
    }
}
