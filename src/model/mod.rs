// MODEL: Game state and data
pub mod geometry;
pub mod camera;
pub mod scene;
pub mod pursuit;

pub use geometry::{build_box, Face};
pub use camera::Camera;
pub use scene::{build_scene, Scene};
pub use pursuit::{GameOutcome, PursuitObject, PursuitStateMachine};
