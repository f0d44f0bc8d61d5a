use egui::Response;
use num::{CheckedAdd, CheckedSub};

/// Adjust a value with the mouse wheel while hovering the widget that
/// produced `resp`. Saturates at the type's bounds.
pub fn scroll_to_adjust<T>(ui: &egui::Ui, resp: &Response, val: &mut T, step: T)
where
    T: Copy + CheckedAdd + CheckedSub,
{
    if !resp.hovered() {
        return;
    }

    let scroll = ui.input(|i| {
        i.events.iter().find_map(|e| match e {
            egui::Event::MouseWheel { delta, .. } => Some(delta.y),
            _ => None,
        })
    });
    let Some(dy) = scroll else {
        return;
    };

    let next = if dy > 0. {
        val.checked_add(&step)
    } else {
        val.checked_sub(&step)
    };
    if let Some(next) = next {
        *val = next;
    }
}
