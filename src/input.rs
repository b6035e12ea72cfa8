//////////////////////////////////////////////////
// Using

use winit::event::ElementState;
use winit::keyboard::{KeyCode, NativeKeyCode, PhysicalKey};

//////////////////////////////////////////////////
// Android constants

/// `android.view.MotionEvent` actions.
pub mod motion_action {
    pub const DOWN: i32 = 0;
    pub const UP: i32 = 1;
    pub const MOVE: i32 = 2;
    pub const CANCEL: i32 = 3;
    pub const OUTSIDE: i32 = 4;
    pub const POINTER_DOWN: i32 = 5;
    pub const POINTER_UP: i32 = 6;
}

/// `android.view.KeyEvent` actions.
pub mod key_action {
    pub const DOWN: i32 = 0;
    pub const UP: i32 = 1;
    pub const MULTIPLE: i32 = 2;
}

/// `android.view.KeyEvent` key codes the host translates.
pub mod keycode {
    pub const UNKNOWN: i32 = 0;
    pub const BACK: i32 = 4;
    pub const DIGIT_0: i32 = 7;
    pub const DPAD_UP: i32 = 19;
    pub const DPAD_DOWN: i32 = 20;
    pub const DPAD_LEFT: i32 = 21;
    pub const DPAD_RIGHT: i32 = 22;
    pub const VOLUME_UP: i32 = 24;
    pub const VOLUME_DOWN: i32 = 25;
    pub const A: i32 = 29;
    pub const COMMA: i32 = 55;
    pub const PERIOD: i32 = 56;
    pub const ALT_LEFT: i32 = 57;
    pub const ALT_RIGHT: i32 = 58;
    pub const SHIFT_LEFT: i32 = 59;
    pub const SHIFT_RIGHT: i32 = 60;
    pub const TAB: i32 = 61;
    pub const SPACE: i32 = 62;
    pub const ENTER: i32 = 66;
    pub const DEL: i32 = 67;
    pub const GRAVE: i32 = 68;
    pub const MINUS: i32 = 69;
    pub const EQUALS: i32 = 70;
    pub const LEFT_BRACKET: i32 = 71;
    pub const RIGHT_BRACKET: i32 = 72;
    pub const BACKSLASH: i32 = 73;
    pub const SEMICOLON: i32 = 74;
    pub const APOSTROPHE: i32 = 75;
    pub const SLASH: i32 = 76;
    pub const PAGE_UP: i32 = 92;
    pub const PAGE_DOWN: i32 = 93;
    pub const ESCAPE: i32 = 111;
    pub const FORWARD_DEL: i32 = 112;
    pub const CTRL_LEFT: i32 = 113;
    pub const CTRL_RIGHT: i32 = 114;
    pub const MOVE_HOME: i32 = 122;
    pub const MOVE_END: i32 = 123;
    pub const INSERT: i32 = 124;
    pub const F1: i32 = 131;
}

//////////////////////////////////////////////////
// Events

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub action: i32,
    pub key_code: i32,
    pub scan_code: i32,
    pub device_id: i32,
    /// Non-zero for auto-repeated presses, which keep the DOWN action.
    pub repeat_count: i32,
    pub long_press: bool,
    pub unicode_char: Option<char>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Location {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pointer {
    pub id: i32,
    pub location: Location,
}

/// A motion event as Android reports it: one masked action, the index of the
/// pointer it refers to and every pointer that is down.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionEvent {
    pub action_masked: i32,
    pub action_index: usize,
    pub pointers: Vec<Pointer>,
}

/// Single pointer change as the window system delivers it.
#[derive(Debug, Copy, Clone)]
pub struct TouchEvent {
    pub state: TouchState,
    pub location: Location,
    pub id: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TouchState {
    Down,
    Up,
    Move,
    Cancelled,
}

//////////////////////////////////////////////////
// Motion event

impl MotionEvent {
    pub fn action_pointer(&self) -> Option<&Pointer> {
        self.pointers.get(self.action_index)
    }
}

//////////////////////////////////////////////////
// Touch tracking

/// Rebuilds Android motion events from per-pointer touch changes.
///
/// Moves are batched until [`TouchTracker::flush`] or the next down, up or
/// cancel, so one MOVE event carries every pointer like on Android.
#[derive(Debug, Default)]
pub struct TouchTracker {
    pointers: Vec<Pointer>,
    moved: bool,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, touch: TouchEvent) -> Vec<MotionEvent> {
        let id = touch.id as i32;
        let mut events = Vec::with_capacity(2);

        match touch.state {
            TouchState::Move => {
                if let Some(pointer) = self.pointers.iter_mut().find(|pointer| pointer.id == id) {
                    pointer.location = touch.location;
                    self.moved = true;
                }
            }
            TouchState::Down => {
                events.extend(self.flush());
                self.pointers.retain(|pointer| pointer.id != id);
                let action = if self.pointers.is_empty() { motion_action::DOWN } else { motion_action::POINTER_DOWN };
                self.pointers.push(Pointer { id, location: touch.location });
                events.push(self.event(action, self.pointers.len() - 1));
            }
            TouchState::Up => {
                events.extend(self.flush());
                if let Some(index) = self.position(id) {
                    self.pointers[index].location = touch.location;
                    let action = if self.pointers.len() == 1 { motion_action::UP } else { motion_action::POINTER_UP };
                    events.push(self.event(action, index));
                    self.pointers.remove(index);
                }
            }
            TouchState::Cancelled => {
                // a cancel ends the whole gesture
                if let Some(index) = self.position(id) {
                    self.moved = false;
                    events.push(self.event(motion_action::CANCEL, index));
                    self.pointers.clear();
                }
            }
        }
        events
    }

    /// Emits the pending MOVE event, if any pointer moved since the last one.
    pub fn flush(&mut self) -> Option<MotionEvent> {
        if !std::mem::take(&mut self.moved) || self.pointers.is_empty() {
            return None;
        }
        Some(self.event(motion_action::MOVE, 0))
    }

    fn position(&self, id: i32) -> Option<usize> {
        self.pointers.iter().position(|pointer| pointer.id == id)
    }

    fn event(&self, action_masked: i32, action_index: usize) -> MotionEvent {
        MotionEvent {
            action_masked,
            action_index,
            pointers: self.pointers.clone(),
        }
    }
}

//////////////////////////////////////////////////
// Key codes

pub fn android_key_code(key: PhysicalKey) -> i32 {
    match key {
        PhysicalKey::Code(code) => key_code_of(code),
        PhysicalKey::Unidentified(NativeKeyCode::Android(code)) => code as i32,
        PhysicalKey::Unidentified(_) => keycode::UNKNOWN,
    }
}

fn key_code_of(code: KeyCode) -> i32 {
    use KeyCode::*;

    let letters = [
        KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
    ];
    let digits = [Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9];
    let functions = [F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12];

    if let Some(index) = letters.iter().position(|key| *key == code) {
        return keycode::A + index as i32;
    }
    if let Some(index) = digits.iter().position(|key| *key == code) {
        return keycode::DIGIT_0 + index as i32;
    }
    if let Some(index) = functions.iter().position(|key| *key == code) {
        return keycode::F1 + index as i32;
    }

    match code {
        BrowserBack => keycode::BACK,
        ArrowUp => keycode::DPAD_UP,
        ArrowDown => keycode::DPAD_DOWN,
        ArrowLeft => keycode::DPAD_LEFT,
        ArrowRight => keycode::DPAD_RIGHT,
        AudioVolumeUp => keycode::VOLUME_UP,
        AudioVolumeDown => keycode::VOLUME_DOWN,
        Comma => keycode::COMMA,
        Period => keycode::PERIOD,
        AltLeft => keycode::ALT_LEFT,
        AltRight => keycode::ALT_RIGHT,
        ShiftLeft => keycode::SHIFT_LEFT,
        ShiftRight => keycode::SHIFT_RIGHT,
        Tab => keycode::TAB,
        Space => keycode::SPACE,
        Enter | NumpadEnter => keycode::ENTER,
        Backspace => keycode::DEL,
        Backquote => keycode::GRAVE,
        Minus => keycode::MINUS,
        Equal => keycode::EQUALS,
        BracketLeft => keycode::LEFT_BRACKET,
        BracketRight => keycode::RIGHT_BRACKET,
        Backslash => keycode::BACKSLASH,
        Semicolon => keycode::SEMICOLON,
        Quote => keycode::APOSTROPHE,
        Slash => keycode::SLASH,
        PageUp => keycode::PAGE_UP,
        PageDown => keycode::PAGE_DOWN,
        Escape => keycode::ESCAPE,
        Delete => keycode::FORWARD_DEL,
        ControlLeft => keycode::CTRL_LEFT,
        ControlRight => keycode::CTRL_RIGHT,
        Home => keycode::MOVE_HOME,
        End => keycode::MOVE_END,
        Insert => keycode::INSERT,
        _ => keycode::UNKNOWN,
    }
}

//////////////////////////////////////////////////
// Conversions

impl From<winit::dpi::PhysicalPosition<f64>> for Location {
    fn from(e: winit::dpi::PhysicalPosition<f64>) -> Location {
        Location { x: e.x as f32, y: e.y as f32 }
    }
}

impl From<winit::event::Touch> for TouchEvent {
    fn from(e: winit::event::Touch) -> TouchEvent {
        let winit::event::Touch { phase, location, id, .. } = e;
        TouchEvent {
            state: phase.into(),
            location: location.into(),
            id,
        }
    }
}

impl From<winit::event::TouchPhase> for TouchState {
    fn from(e: winit::event::TouchPhase) -> TouchState {
        match e {
            winit::event::TouchPhase::Started => TouchState::Down,
            winit::event::TouchPhase::Ended => TouchState::Up,
            winit::event::TouchPhase::Moved => TouchState::Move,
            winit::event::TouchPhase::Cancelled => TouchState::Cancelled,
        }
    }
}

impl TryFrom<&winit::event::KeyEvent> for KeyEvent {
    type Error = ();

    fn try_from(e: &winit::event::KeyEvent) -> Result<KeyEvent, ()> {
        key_event(e.state, e.repeat, e.physical_key, e.text.as_deref()).ok_or(())
    }
}

/// Builds the Android key event for a winit key change, `None` for keys
/// without an Android key code.
pub fn key_event(state: ElementState, repeat: bool, physical_key: PhysicalKey, text: Option<&str>) -> Option<KeyEvent> {
    let key_code = android_key_code(physical_key);
    if key_code == keycode::UNKNOWN {
        return None;
    }
    // Android reports repeats as further DOWN events with a repeat count
    let action = match state {
        ElementState::Pressed => key_action::DOWN,
        ElementState::Released => key_action::UP,
    };
    Some(KeyEvent {
        action,
        key_code,
        // not exposed by the window system
        scan_code: 0,
        device_id: 0,
        repeat_count: i32::from(repeat),
        long_press: false,
        unicode_char: text.and_then(|text| text.chars().next()),
    })
}

//////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(state: TouchState, id: u64, x: f32, y: f32) -> TouchEvent {
        TouchEvent { state, location: Location { x, y }, id }
    }

    #[test]
    fn first_and_further_pointers() {
        let mut tracker = TouchTracker::new();

        let down = tracker.track(touch(TouchState::Down, 0, 10.0, 20.0));
        assert_eq!(down.len(), 1);
        assert_eq!(down[0].action_masked, motion_action::DOWN);
        assert_eq!(down[0].action_index, 0);

        let second = tracker.track(touch(TouchState::Down, 1, 30.0, 40.0));
        assert_eq!(second[0].action_masked, motion_action::POINTER_DOWN);
        assert_eq!(second[0].action_index, 1);
        assert_eq!(second[0].pointers.len(), 2);
    }

    #[test]
    fn last_pointer_up_is_up() {
        let mut tracker = TouchTracker::new();
        tracker.track(touch(TouchState::Down, 0, 0.0, 0.0));
        tracker.track(touch(TouchState::Down, 1, 5.0, 5.0));

        let up = tracker.track(touch(TouchState::Up, 0, 1.0, 1.0));
        assert_eq!(up[0].action_masked, motion_action::POINTER_UP);
        assert_eq!(up[0].action_pointer().unwrap().id, 0);

        let up = tracker.track(touch(TouchState::Up, 1, 6.0, 6.0));
        assert_eq!(up[0].action_masked, motion_action::UP);
        assert_eq!(up[0].action_pointer().unwrap().location, Location { x: 6.0, y: 6.0 });

        // the gesture is over, the next touch starts a new one
        let down = tracker.track(touch(TouchState::Down, 2, 0.0, 0.0));
        assert_eq!(down[0].action_masked, motion_action::DOWN);
        assert_eq!(down[0].pointers.len(), 1);
    }

    #[test]
    fn repeated_down_of_only_pointer_stays_down() {
        let mut tracker = TouchTracker::new();
        tracker.track(touch(TouchState::Down, 0, 0.0, 0.0));

        // a missed Up leaves a stale pointer with the same id behind
        let again = tracker.track(touch(TouchState::Down, 0, 3.0, 4.0));
        assert_eq!(again[0].action_masked, motion_action::DOWN);
        assert_eq!(again[0].action_index, 0);
        assert_eq!(again[0].pointers, [Pointer { id: 0, location: Location { x: 3.0, y: 4.0 } }]);
    }

    #[test]
    fn moves_are_batched() {
        let mut tracker = TouchTracker::new();
        tracker.track(touch(TouchState::Down, 0, 0.0, 0.0));
        tracker.track(touch(TouchState::Down, 1, 0.0, 0.0));

        assert!(tracker.track(touch(TouchState::Move, 0, 1.0, 1.0)).is_empty());
        assert!(tracker.track(touch(TouchState::Move, 1, 2.0, 2.0)).is_empty());

        let moved = tracker.flush().unwrap();
        assert_eq!(moved.action_masked, motion_action::MOVE);
        assert_eq!(moved.pointers.len(), 2);
        assert_eq!(moved.pointers[1].location, Location { x: 2.0, y: 2.0 });
        assert!(tracker.flush().is_none());
    }

    #[test]
    fn pending_move_precedes_up() {
        let mut tracker = TouchTracker::new();
        tracker.track(touch(TouchState::Down, 3, 0.0, 0.0));
        tracker.track(touch(TouchState::Move, 3, 4.0, 4.0));

        let events = tracker.track(touch(TouchState::Up, 3, 4.0, 4.0));
        let actions: Vec<i32> = events.iter().map(|event| event.action_masked).collect();
        assert_eq!(actions, [motion_action::MOVE, motion_action::UP]);
    }

    #[test]
    fn cancel_ends_gesture() {
        let mut tracker = TouchTracker::new();
        tracker.track(touch(TouchState::Down, 0, 0.0, 0.0));
        tracker.track(touch(TouchState::Down, 1, 0.0, 0.0));
        tracker.track(touch(TouchState::Move, 1, 3.0, 0.0));

        let cancel = tracker.track(touch(TouchState::Cancelled, 0, 0.0, 0.0));
        assert_eq!(cancel.len(), 1);
        assert_eq!(cancel[0].action_masked, motion_action::CANCEL);
        assert!(tracker.track(touch(TouchState::Cancelled, 1, 0.0, 0.0)).is_empty());
        assert!(tracker.flush().is_none());
    }

    #[test]
    fn unknown_pointers_are_ignored() {
        let mut tracker = TouchTracker::new();
        assert!(tracker.track(touch(TouchState::Move, 7, 0.0, 0.0)).is_empty());
        assert!(tracker.track(touch(TouchState::Up, 7, 0.0, 0.0)).is_empty());
        assert!(tracker.flush().is_none());
    }

    #[test]
    fn android_key_codes() {
        assert_eq!(android_key_code(PhysicalKey::Code(KeyCode::BrowserBack)), keycode::BACK);
        assert_eq!(android_key_code(PhysicalKey::Code(KeyCode::KeyA)), 29);
        assert_eq!(android_key_code(PhysicalKey::Code(KeyCode::KeyZ)), 54);
        assert_eq!(android_key_code(PhysicalKey::Code(KeyCode::Digit9)), 16);
        assert_eq!(android_key_code(PhysicalKey::Code(KeyCode::F12)), 142);
        assert_eq!(android_key_code(PhysicalKey::Code(KeyCode::Backspace)), keycode::DEL);
        assert_eq!(android_key_code(PhysicalKey::Unidentified(NativeKeyCode::Android(82))), 82);
        assert_eq!(android_key_code(PhysicalKey::Unidentified(NativeKeyCode::Unidentified)), keycode::UNKNOWN);
    }

    #[test]
    fn presses_and_repeats_are_down() {
        let key = PhysicalKey::Code(KeyCode::KeyA);

        let press = key_event(ElementState::Pressed, false, key, Some("a")).unwrap();
        assert_eq!(press.action, key_action::DOWN);
        assert_eq!(press.key_code, keycode::A);
        assert_eq!(press.repeat_count, 0);
        assert_eq!(press.unicode_char, Some('a'));

        let repeat = key_event(ElementState::Pressed, true, key, Some("a")).unwrap();
        assert_eq!(repeat.action, key_action::DOWN);
        assert_eq!(repeat.repeat_count, 1);

        let release = key_event(ElementState::Released, false, key, None).unwrap();
        assert_eq!(release.action, key_action::UP);
        assert_eq!(release.unicode_char, None);
    }

    #[test]
    fn keys_without_android_code_are_dropped() {
        let key = PhysicalKey::Code(KeyCode::CapsLock);
        assert!(key_event(ElementState::Pressed, false, key, None).is_none());

        let back = key_event(ElementState::Pressed, false, PhysicalKey::Code(KeyCode::BrowserBack), None).unwrap();
        assert_eq!(back.key_code, keycode::BACK);
        assert_eq!(back.scan_code, 0);
    }
}
