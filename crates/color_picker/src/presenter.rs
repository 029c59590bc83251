use crate::event::SubscriptionSet;
use crate::model::ColorPickerModel;
use crate::view::ColorPickerView;
use std::rc::Rc;

/// Connects a model and a view.
///
/// - hue from the view updates the model hue, keeping saturation and value.
/// - saturation/value from the view updates those, keeping the hue.
/// - every model color goes to the view's display.
///
/// The presenter only holds weak references to both sides, and the three
/// links are torn down together by [`ColorPickerPresenter::dispose`] or on drop.
pub struct ColorPickerPresenter {
    subscriptions: SubscriptionSet,
}

impl ColorPickerPresenter {
    pub fn new<M, V>(model: &Rc<M>, view: &Rc<V>) -> Self
    where
        M: ColorPickerModel + 'static,
        V: ColorPickerView + 'static,
    {
        let subscriptions = [
            view.on_hue_changed().subscribe({
                let model = Rc::downgrade(model);
                move |hue| {
                    if let Some(model) = model.upgrade() {
                        model.update_color(*hue, model.saturation(), model.value());
                    }
                }
            }),
            view.on_saturation_value_changed().subscribe({
                let model = Rc::downgrade(model);
                move |(saturation, value)| {
                    if let Some(model) = model.upgrade() {
                        model.update_color(model.hue(), *saturation, *value);
                    }
                }
            }),
            model.color_changed().subscribe({
                let view = Rc::downgrade(view);
                move |color| {
                    if let Some(view) = view.upgrade() {
                        view.update_color_display(*color);
                    }
                }
            }),
        ]
        .into_iter()
        .collect();

        Self { subscriptions }
    }

    pub fn is_disposed(&self) -> bool {
        self.subscriptions.is_disposed()
    }

    /// Cut all three links. Safe to call more than once.
    pub fn dispose(&mut self) {
        if !self.subscriptions.is_disposed() {
            tracing::debug!("presenter disposed");
        }
        self.subscriptions.dispose();
    }
}

impl Drop for ColorPickerPresenter {
    fn drop(&mut self) {
        self.dispose();
    }
}
