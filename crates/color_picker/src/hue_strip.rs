use crate::gradient::{GradientImage, render_hue_strip};
use std::{
    cell::RefCell,
    collections::HashMap,
    ops::Deref,
    rc::{Rc, Weak},
};

/// The static hue gradient shown behind the hue slider.
///
/// Shared by every session of a [`HueStripRegistry`], freed when the last
/// handle is dropped.
#[derive(Debug)]
pub struct HueStrip {
    image: GradientImage,
}

impl HueStrip {
    pub fn image(&self) -> &GradientImage {
        &self.image
    }
}

impl Deref for HueStrip {
    type Target = GradientImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl Drop for HueStrip {
    fn drop(&mut self) {
        tracing::debug!(width = self.image.width(), "hue strip released");
    }
}

/// Hands out shared hue strips, one per width.
///
/// The registry only keeps weak references, so a strip lives exactly as long
/// as some session holds it.
#[derive(Debug, Default)]
pub struct HueStripRegistry {
    strips: RefCell<HashMap<u32, Weak<HueStrip>>>,
}

impl HueStripRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live strip for `width`, rendering it on first use.
    pub fn acquire(&self, width: u32) -> Rc<HueStrip> {
        let mut strips = self.strips.borrow_mut();
        if let Some(strip) = strips.get(&width).and_then(Weak::upgrade) {
            return strip;
        }

        tracing::debug!(width, "rendering hue strip");
        let strip = Rc::new(HueStrip {
            image: render_hue_strip(width),
        });
        strips.insert(width, Rc::downgrade(&strip));
        strips.retain(|_, strip| strip.strong_count() > 0);
        strip
    }

    /// Number of handles currently alive for `width`.
    pub fn holders(&self, width: u32) -> usize {
        self.strips
            .borrow()
            .get(&width)
            .map_or(0, Weak::strong_count)
    }

    pub fn is_loaded(&self, width: u32) -> bool {
        self.holders(width) > 0
    }
}
