// CONTROLLER: Input, game logic, and update loop
pub mod input;
pub mod camera_controller;
pub mod frame_loop;

pub use input::{InputEvent, InputState, InputSnapshot, InputSource, InputProcessor, KeyBindings, Keyboard};
pub use camera_controller::CameraController;
pub use frame_loop::{Game, FrameReport};
