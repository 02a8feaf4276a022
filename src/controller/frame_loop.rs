use tracing::{debug, info, trace, warn};

use super::camera_controller::CameraController;
use super::input::InputSource;
use crate::config::GameConfig;
use crate::model::{Camera, GameOutcome, PursuitStateMachine, Scene};
use crate::view::{Renderer, RendererFault};

/// What happened during one call to [`Game::render_frame`]
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub outcome: GameOutcome,
    /// Set only on the frame whose pursuit step ended the game
    pub finished: bool,
    /// First renderer fault of the frame, if any. The rest of that frame's
    /// renderer calls were skipped.
    pub fault: Option<RendererFault>,
}

/// Main game loop state: owns every piece of mutable game state and sequences
/// the per-frame update and draw calls
pub struct Game {
    config: GameConfig,
    scene: Scene,
    camera: Camera,
    camera_controller: CameraController,
    pursuit: PursuitStateMachine,
    reset_pending: bool,
    frame: u64,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let camera = Camera::from_settings(&config.camera);
        let camera_controller = CameraController::new(&config.camera);
        let pursuit = PursuitStateMachine::new(config.pursuit);
        let scene = Scene::new();
        info!(obstacles = scene.obstacles().len(), "game created");
        Self {
            scene,
            camera,
            camera_controller,
            pursuit,
            reset_pending: false,
            frame: 0,
            config,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn pursuit(&self) -> &PursuitStateMachine {
        &self.pursuit
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn outcome(&self) -> GameOutcome {
        self.pursuit.outcome()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Message to present when the host window closes, if the game ended
    pub fn closing_message(&self) -> Option<&'static str> {
        self.outcome().message()
    }

    /// The rendering device was reset: rebuild every mesh and re-acquire input
    pub fn on_device_reset(&mut self, input: &mut impl InputSource) {
        debug!(frame = self.frame, "device reset, rebuilding meshes");
        self.scene.rebuild();
        self.pursuit.rebuild_mesh();
        input.reacquire();
    }

    /// Run one frame: clear, begin, camera update, transforms, lights,
    /// pursuit step, draw, end, present.
    ///
    /// The simulation runs exactly once per call whatever the renderer does.
    /// A renderer fault skips the remaining renderer calls of this frame and
    /// schedules a reset before the next one.
    pub fn render_frame(&mut self, input: &mut impl InputSource, renderer: &mut impl Renderer) -> FrameReport {
        self.frame += 1;
        trace!(frame = self.frame, "frame start");

        let recovered = if self.reset_pending {
            self.recover(input, renderer)
        } else {
            Ok(())
        };

        let begun = recovered
            .and_then(|_| renderer.clear(self.config.background))
            .and_then(|_| renderer.begin_scene());

        let running = !self.outcome().is_terminal();
        let snapshot = input.poll();
        if running {
            self.camera_controller.update(&mut self.camera, &snapshot);
        }

        let staged = begun
            .and_then(|_| self.setup_matrices(renderer))
            .and_then(|_| renderer.configure_light(&self.config.lighting));

        let outcome = self.pursuit.advance(self.camera.position);
        let finished = running && outcome.is_terminal();
        if finished {
            info!(frame = self.frame, ?outcome, message = outcome.message(), "game over");
        }

        let fault = staged.and_then(|_| self.draw(renderer)).err();
        if let Some(fault) = &fault {
            warn!(frame = self.frame, %fault, "renderer fault, skipping the rest of the frame");
            self.reset_pending = true;
        }

        FrameReport { outcome, finished, fault }
    }

    fn recover(&mut self, input: &mut impl InputSource, renderer: &mut impl Renderer) -> Result<(), RendererFault> {
        renderer.reset()?;
        self.reset_pending = false;
        self.on_device_reset(input);
        Ok(())
    }

    fn setup_matrices(&self, renderer: &mut impl Renderer) -> Result<(), RendererFault> {
        renderer.set_view_transform(self.camera.view())?;
        renderer.set_projection_transform(Camera::projection(&self.config.projection))
    }

    fn draw(&self, renderer: &mut impl Renderer) -> Result<(), RendererFault> {
        for mesh in self.scene.obstacles() {
            renderer.submit_mesh(mesh, mesh.triangle_count())?;
        }
        let cube = self.pursuit.object().mesh();
        renderer.submit_mesh(cube, cube.triangle_count())?;
        renderer.end_scene()?;
        renderer.present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::InputSnapshot;
    use crate::utils::{BoxMesh, Color};
    use crate::view::LightSettings;
    use glam::{Mat4, Vec3};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear(Color),
        Begin,
        View(Mat4),
        Projection,
        Light,
        Submit(u32),
        End,
        Present,
        Reset,
    }

    /// Records every call; optionally fails the n-th submit
    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<Call>,
        fail_on_submit: Option<usize>,
        submits: usize,
        fail_with: Option<RendererFault>,
    }

    impl RecordingRenderer {
        fn failing_submit(n: usize, fault: RendererFault) -> Self {
            Self { fail_on_submit: Some(n), fail_with: Some(fault), ..Default::default() }
        }

        fn take(&mut self) -> Vec<Call> {
            std::mem::take(&mut self.calls)
        }
    }

    impl Renderer for RecordingRenderer {
        fn clear(&mut self, color: Color) -> Result<(), RendererFault> {
            self.calls.push(Call::Clear(color));
            Ok(())
        }
        fn begin_scene(&mut self) -> Result<(), RendererFault> {
            self.calls.push(Call::Begin);
            Ok(())
        }
        fn set_view_transform(&mut self, view: Mat4) -> Result<(), RendererFault> {
            self.calls.push(Call::View(view));
            Ok(())
        }
        fn set_projection_transform(&mut self, _projection: Mat4) -> Result<(), RendererFault> {
            self.calls.push(Call::Projection);
            Ok(())
        }
        fn configure_light(&mut self, _light: &LightSettings) -> Result<(), RendererFault> {
            self.calls.push(Call::Light);
            Ok(())
        }
        fn submit_mesh(&mut self, _mesh: &BoxMesh, triangle_count: u32) -> Result<(), RendererFault> {
            self.submits += 1;
            if self.fail_on_submit == Some(self.submits) {
                if let Some(fault) = self.fail_with.take() {
                    return Err(fault);
                }
            }
            self.calls.push(Call::Submit(triangle_count));
            Ok(())
        }
        fn end_scene(&mut self) -> Result<(), RendererFault> {
            self.calls.push(Call::End);
            Ok(())
        }
        fn present(&mut self) -> Result<(), RendererFault> {
            self.calls.push(Call::Present);
            Ok(())
        }
        fn reset(&mut self) -> Result<(), RendererFault> {
            self.calls.push(Call::Reset);
            Ok(())
        }
    }

    /// Input that counts how often it was sampled and re-acquired
    #[derive(Default)]
    struct CountingInput {
        snapshot: InputSnapshot,
        polls: usize,
        reacquired: usize,
    }

    impl InputSource for CountingInput {
        fn poll(&mut self) -> InputSnapshot {
            self.polls += 1;
            self.snapshot
        }
        fn reacquire(&mut self) {
            self.reacquired += 1;
        }
    }

    fn run_until_over(game: &mut Game, input: &mut impl InputSource, limit: usize) -> FrameReport {
        let mut renderer = RecordingRenderer::default();
        for _ in 0..limit {
            let report = game.render_frame(input, &mut renderer);
            renderer.take();
            if report.finished {
                return report;
            }
        }
        panic!("game did not finish within {limit} frames");
    }

    #[test]
    fn test_frame_call_order() {
        let mut game = Game::new(GameConfig::default());
        let mut renderer = RecordingRenderer::default();
        let report = game.render_frame(&mut InputSnapshot::default(), &mut renderer);

        assert_eq!(report, FrameReport { outcome: GameOutcome::InProgress, finished: false, fault: None });
        let calls = renderer.take();
        let mut expected = vec![
            Call::Clear(Color::BISQUE),
            Call::Begin,
            Call::View(game.camera().view()),
            Call::Projection,
            Call::Light,
        ];
        expected.extend(std::iter::repeat(Call::Submit(12)).take(40));
        expected.extend([Call::End, Call::Present]);
        assert_eq!(calls, expected);
    }

    #[test]
    fn test_camera_updates_before_view_is_set() {
        let mut game = Game::new(GameConfig::default());
        let mut renderer = RecordingRenderer::default();
        let mut input = InputSnapshot { forward: true, ..InputSnapshot::IDLE };
        game.render_frame(&mut input, &mut renderer);

        let moved = Camera::new(Vec3::new(0.0, 0.0, -9.8), Vec3::new(0.0, 0.0, 0.2));
        let view = renderer.take().into_iter().find_map(|c| match c {
            Call::View(m) => Some(m),
            _ => None,
        });
        let view = view.expect("view transform set");
        assert!(view.abs_diff_eq(moved.view(), 1e-5));
    }

    #[test]
    fn test_pursuit_advances_once_per_frame() {
        let mut game = Game::new(GameConfig::default());
        let mut renderer = RecordingRenderer::default();
        let mut input = CountingInput::default();
        for _ in 0..3 {
            game.render_frame(&mut input, &mut renderer);
        }
        assert_eq!(input.polls, 3);
        // sticky initial speed of 0.2, three steps along z
        let z = game.pursuit().object().position.z;
        assert!((z - 0.8).abs() < 1e-5);
        assert_eq!(game.frame_count(), 3);
    }

    #[test]
    fn test_fault_is_swallowed_and_recovered_next_frame() {
        let mut game = Game::new(GameConfig::default());
        let mut renderer = RecordingRenderer::failing_submit(5, RendererFault::DeviceLost);
        let mut input = CountingInput::default();

        let report = game.render_frame(&mut input, &mut renderer);
        assert_eq!(report.fault, Some(RendererFault::DeviceLost));
        assert_eq!(report.outcome, GameOutcome::InProgress);
        let calls = renderer.take();
        assert_eq!(calls.iter().filter(|c| **c == Call::Submit(12)).count(), 4);
        assert!(!calls.contains(&Call::End));
        assert!(!calls.contains(&Call::Present));
        // the simulation still stepped
        assert!((game.pursuit().object().position.z - 0.4).abs() < 1e-5);

        let report = game.render_frame(&mut input, &mut renderer);
        assert_eq!(report.fault, None);
        let calls = renderer.take();
        assert_eq!(calls[0], Call::Reset);
        assert_eq!(calls[1], Call::Clear(Color::BISQUE));
        assert_eq!(calls.last(), Some(&Call::Present));
        assert_eq!(input.reacquired, 1);

        // no further resets once recovered
        game.render_frame(&mut input, &mut renderer);
        assert!(!renderer.take().contains(&Call::Reset));
    }

    #[test]
    fn test_device_reset_rebuilds_meshes() {
        let mut game = Game::new(GameConfig::default());
        let mut input = CountingInput::default();
        let obstacles = game.scene().obstacles().to_vec();
        let cube = game.pursuit().object().mesh().clone();

        game.on_device_reset(&mut input);
        assert_eq!(game.scene().obstacles(), obstacles.as_slice());
        assert_eq!(game.pursuit().object().mesh(), &cube);
        assert_eq!(input.reacquired, 1);
        assert_eq!(game.pursuit().object().position, GameConfig::default().pursuit.start_position);
    }

    #[test]
    fn test_static_camera_loses_and_freezes() {
        let mut game = Game::new(GameConfig::default());
        let report = run_until_over(&mut game, &mut InputSnapshot::default(), 2000);
        assert_eq!(report.outcome, GameOutcome::Lost);
        assert_eq!(game.closing_message(), Some("You Lose! Thanks for Playing!"));

        let camera = *game.camera();
        let position = game.pursuit().object().position;
        let mut renderer = RecordingRenderer::default();
        let mut input = InputSnapshot { forward: true, yaw_left: true, ..InputSnapshot::IDLE };
        let report = game.render_frame(&mut input, &mut renderer);
        assert!(!report.finished);
        assert_eq!(report.outcome, GameOutcome::Lost);
        assert_eq!(*game.camera(), camera);
        assert_eq!(game.pursuit().object().position, position);
        // still drawn
        assert_eq!(renderer.take().last(), Some(&Call::Present));
    }

    #[test]
    fn test_following_camera_sees_the_turn() {
        // holding forward matches the object's initial speed, keeping the
        // distance inside the sticky band all the way to the turn
        let mut game = Game::new(GameConfig::default());
        let mut renderer = RecordingRenderer::default();
        let mut input = InputSnapshot { forward: true, ..InputSnapshot::IDLE };
        let mut turned_at = None;
        for _ in 0..500 {
            let report = game.render_frame(&mut input, &mut renderer);
            renderer.take();
            assert_eq!(report.outcome, GameOutcome::InProgress);
            let object = game.pursuit().object();
            if object.rotated_phase() && turned_at.is_none() {
                turned_at = Some(object.position);
            }
        }
        let turned_at = turned_at.expect("object turned");
        assert!(turned_at.z >= 95.0);
        let now = game.pursuit().object().position;
        assert_eq!(now.z, turned_at.z);
        assert!(now.x > turned_at.x);
    }

    #[test]
    fn test_closing_while_in_progress_has_no_message() {
        let game = Game::new(GameConfig::default());
        assert_eq!(game.closing_message(), None);
    }
}
