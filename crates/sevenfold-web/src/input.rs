use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Pointer travel (CSS px) below which a press-release pair counts as a click.
const CLICK_SLOP: f32 = 5.0;

/// A key press as reported by `KeyboardEvent.key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub repeat: bool,
}

/// Accumulated input state read each frame by the application.
/// Positions are CSS pixels relative to the canvas.
#[derive(Default)]
pub struct InputState {
    pub pointer: Vec2,
    pub drag_dx: f32,
    pub drag_dy: f32,
    pub scroll_delta: f32,
    pub left_button_down: bool,
    pub right_button_down: bool,
    press_at: Option<Vec2>,
    travel: f32,
    clicks: Vec<Vec2>,
    keys: Vec<KeyPress>,
    /// Raw pointer events forwarded to egui.
    egui_events: Vec<egui::Event>,
    /// Set on the first press or key; audio may only start after one.
    gesture: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_moved(&mut self, pos: Vec2, movement: Vec2) {
        self.pointer = pos;
        if self.left_button_down || self.right_button_down {
            self.drag_dx += movement.x;
            self.drag_dy += movement.y;
            self.travel += movement.length();
        }
        self.egui_events
            .push(egui::Event::PointerMoved(egui::pos2(pos.x, pos.y)));
    }

    pub fn button(&mut self, button: i16, pressed: bool, pos: Vec2) {
        self.pointer = pos;
        let egui_button = match button {
            0 => {
                self.left_button_down = pressed;
                if pressed {
                    self.press_at = Some(pos);
                    self.travel = 0.0;
                } else if let Some(start) = self.press_at.take() {
                    if self.travel.max(start.distance(pos)) < CLICK_SLOP {
                        self.clicks.push(pos);
                    }
                }
                egui::PointerButton::Primary
            }
            1 => egui::PointerButton::Middle,
            2 => {
                self.right_button_down = pressed;
                egui::PointerButton::Secondary
            }
            _ => return,
        };
        if pressed {
            self.gesture = true;
        }
        self.egui_events.push(egui::Event::PointerButton {
            pos: egui::pos2(pos.x, pos.y),
            button: egui_button,
            pressed,
            modifiers: egui::Modifiers::NONE,
        });
    }

    pub fn pointer_left(&mut self) {
        self.left_button_down = false;
        self.right_button_down = false;
        self.press_at = None;
        self.egui_events.push(egui::Event::PointerGone);
    }

    pub fn key(&mut self, key: String, repeat: bool) {
        self.gesture = true;
        self.keys.push(KeyPress { key, repeat });
    }

    pub fn take_clicks(&mut self) -> Vec<Vec2> {
        std::mem::take(&mut self.clicks)
    }

    pub fn take_keys(&mut self) -> Vec<KeyPress> {
        std::mem::take(&mut self.keys)
    }

    pub fn take_egui_events(&mut self) -> Vec<egui::Event> {
        std::mem::take(&mut self.egui_events)
    }

    /// True once, after the first user gesture.
    pub fn take_gesture(&mut self) -> bool {
        std::mem::take(&mut self.gesture)
    }

    /// Clear per-frame deltas (called after the camera consumes them).
    pub fn clear_deltas(&mut self) {
        self.drag_dx = 0.0;
        self.drag_dy = 0.0;
        self.scroll_delta = 0.0;
    }
}

fn offset(e: &web_sys::MouseEvent) -> Vec2 {
    Vec2::new(e.offset_x() as f32, e.offset_y() as f32)
}

/// Register pointer listeners on the canvas and keyboard listeners on the
/// window ONCE at init. Closures are leaked via `.forget()` since they live
/// for the app lifetime.
pub fn register_input_listeners(
    canvas: &web_sys::HtmlCanvasElement,
    state: Rc<RefCell<InputState>>,
) -> Result<(), JsValue> {
    let target: &web_sys::EventTarget = canvas.as_ref();

    // mousemove
    {
        let state = state.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
                let movement = Vec2::new(e.movement_x() as f32, e.movement_y() as f32);
                state.borrow_mut().pointer_moved(offset(&e), movement);
            });
        target.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // mousedown / mouseup
    for (name, pressed) in [("mousedown", true), ("mouseup", false)] {
        let state = state.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
                state.borrow_mut().button(e.button(), pressed, offset(&e));
            });
        target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // mouseleave
    {
        let state = state.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_e: web_sys::MouseEvent| {
                state.borrow_mut().pointer_left();
            });
        target.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // wheel (zoom)
    {
        let state = state.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::WheelEvent)>::new(move |e: web_sys::WheelEvent| {
                e.prevent_default();
                let mut s = state.borrow_mut();
                // deltaY is positive for scroll down (zoom out)
                let delta = -e.delta_y() as f32;
                s.scroll_delta += if e.delta_mode() == 1 {
                    delta * 20.0 // line mode
                } else {
                    delta / 3.0 // pixel mode
                };
            });
        // Non-passive so preventDefault works
        let options = web_sys::AddEventListenerOptions::new();
        options.set_passive(false);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        closure.forget();
    }

    // contextmenu (right drag pans)
    {
        let closure =
            Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
                e.prevent_default();
            });
        target.add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // keydown on the window so shortcuts work without canvas focus
    {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let closure =
            Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |e: web_sys::KeyboardEvent| {
                if e.ctrl_key() || e.meta_key() || e.alt_key() {
                    return;
                }
                if e.key() == "F3" {
                    e.prevent_default();
                }
                state.borrow_mut().key(e.key(), e.repeat());
            });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_without_travel() {
        let mut s = InputState::new();
        s.button(0, true, Vec2::new(100.0, 50.0));
        s.button(0, false, Vec2::new(101.0, 50.0));
        assert_eq!(s.take_clicks(), vec![Vec2::new(101.0, 50.0)]);
        assert!(s.take_clicks().is_empty());
        assert!(s.take_gesture());
        assert!(!s.take_gesture());
    }

    #[test]
    fn test_drag_is_not_a_click() {
        let mut s = InputState::new();
        s.button(0, true, Vec2::new(100.0, 50.0));
        s.pointer_moved(Vec2::new(130.0, 50.0), Vec2::new(30.0, 0.0));
        // returning to the start point still counts as a drag
        s.pointer_moved(Vec2::new(100.0, 50.0), Vec2::new(-30.0, 0.0));
        s.button(0, false, Vec2::new(100.0, 50.0));
        assert!(s.take_clicks().is_empty());
        assert_eq!(s.drag_dx, 0.0);
    }

    #[test]
    fn test_drag_deltas_only_while_pressed() {
        let mut s = InputState::new();
        s.pointer_moved(Vec2::new(10.0, 10.0), Vec2::new(4.0, 2.0));
        assert_eq!((s.drag_dx, s.drag_dy), (0.0, 0.0));

        s.button(2, true, Vec2::new(10.0, 10.0));
        s.pointer_moved(Vec2::new(14.0, 12.0), Vec2::new(4.0, 2.0));
        assert!(s.right_button_down);
        assert_eq!((s.drag_dx, s.drag_dy), (4.0, 2.0));

        s.clear_deltas();
        assert_eq!((s.drag_dx, s.drag_dy, s.scroll_delta), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_pointer_events_forwarded() {
        let mut s = InputState::new();
        s.pointer_moved(Vec2::new(1.0, 2.0), Vec2::ZERO);
        s.button(0, true, Vec2::new(1.0, 2.0));
        s.pointer_left();
        let events = s.take_egui_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[2], egui::Event::PointerGone));
        assert!(!s.left_button_down);
    }

    #[test]
    fn test_keys_queue() {
        let mut s = InputState::new();
        s.key("h".into(), false);
        s.key("w".into(), true);
        let keys = s.take_keys();
        assert_eq!(keys.len(), 2);
        assert!(keys[1].repeat);
        assert!(s.take_keys().is_empty());
    }
}
