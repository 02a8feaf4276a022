/// Platform-agnostic input handling system
use std::collections::HashSet;

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    FocusLost,
}

/// Keys currently held down, by name
#[derive(Debug, Default, Clone)]
pub struct InputState {
    pub pressed_keys: HashSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                self.pressed_keys.insert(key.clone());
            }
            InputEvent::KeyUp(key) => {
                self.pressed_keys.remove(key.as_str());
            }
            InputEvent::FocusLost => {
                self.clear_keys();
            }
        }
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(key)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }
}

/// The six held/not-held flags the camera reads each frame
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputSnapshot {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
}

impl InputSnapshot {
    pub const IDLE: InputSnapshot = InputSnapshot {
        forward: false,
        back: false,
        left: false,
        right: false,
        yaw_left: false,
        yaw_right: false,
    };
}

/// Something the frame loop can poll for the latest key state
pub trait InputSource {
    /// Latest state, sampled once at the start of the camera update
    fn poll(&mut self) -> InputSnapshot;

    /// Re-acquire the device after a reset
    fn reacquire(&mut self) {}
}

/// A fixed snapshot replays the same keys every frame
impl InputSource for InputSnapshot {
    fn poll(&mut self) -> InputSnapshot {
        *self
    }
}

/// Key mapping configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: Vec<String>,
    pub backward: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub yaw_left: Vec<String>,
    pub yaw_right: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|k| k.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: keys(&["w", "ArrowUp"]),
            backward: keys(&["s", "ArrowDown"]),
            left: keys(&["a", "ArrowLeft"]),
            right: keys(&["d", "ArrowRight"]),
            yaw_left: keys(&["q"]),
            yaw_right: keys(&["e"]),
        }
    }
}

/// High-level input processor
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    fn any_pressed(input: &InputState, bound: &[String]) -> bool {
        bound.iter().any(|key| input.is_key_pressed(key))
    }

    pub fn snapshot(&self, input: &InputState) -> InputSnapshot {
        InputSnapshot {
            forward: Self::any_pressed(input, &self.bindings.forward),
            back: Self::any_pressed(input, &self.bindings.backward),
            left: Self::any_pressed(input, &self.bindings.left),
            right: Self::any_pressed(input, &self.bindings.right),
            yaw_left: Self::any_pressed(input, &self.bindings.yaw_left),
            yaw_right: Self::any_pressed(input, &self.bindings.yaw_right),
        }
    }
}

/// Polled keyboard: event-fed key state read through the bindings
#[derive(Debug, Default)]
pub struct Keyboard {
    pub state: InputState,
    processor: InputProcessor,
}

impl Keyboard {
    pub fn new(processor: InputProcessor) -> Self {
        Self {
            state: InputState::new(),
            processor,
        }
    }

    pub fn process_event(&mut self, event: &InputEvent) {
        self.state.process_event(event);
    }
}

impl InputSource for Keyboard {
    fn poll(&mut self) -> InputSnapshot {
        self.processor.snapshot(&self.state)
    }

    /// Held keys may have been released while the device was gone
    fn reacquire(&mut self) {
        self.state.clear_keys();
    }
}
