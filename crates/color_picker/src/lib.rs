//! A headless HSV color picker.
//!
//! A [`PickerSession`] wires a [`HsvColorModel`] to a [`PickerView`] through a
//! [`ColorPickerPresenter`]. The view turns hue slider values and pointer
//! events on the saturation/value plane into normalized streams, the model
//! converts them to RGB, and every picked color is reported to listeners of
//! [`PickerSession::on_color_picked`].
//!
//! Drawing goes through a [`RenderBackend`], [`CpuBackend`] renders into
//! [`tiny_skia::Pixmap`]s.

mod color;
mod config;
mod error;
mod event;
mod gradient;
mod hue_strip;
mod model;
mod plane;
mod presenter;
mod session;
mod throttle;
mod view;

pub use color::{Hsv, Rgb, clamp01, hsv_to_rgb};
pub use config::{MAX_THROTTLE_MS, PickerConfig};
pub use error::{Error, Result};
pub use event::{Emitter, Subscription, SubscriptionSet};
pub use gradient::{GradientImage, pixel_index, render_hue_strip, render_saturation_value_plane};
pub use hue_strip::{HueStrip, HueStripRegistry};
pub use model::{ColorPickerModel, HsvColorModel};
pub use plane::{CpuBackend, CpuSurface, PlaneController, PlaneSurface, RenderBackend};
pub use presenter::ColorPickerPresenter;
pub use session::{PickerFactory, PickerSession};
pub use throttle::Throttle;
pub use view::{
    ColorPickerView, IdentityMapper, LocalPointMapper, PickerView, Point, PointerEvent, SurfaceId,
    SurfaceRect, normalize,
};
