use std::sync::Arc;

use anyhow::anyhow;
use tracing::{error, info};
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use chase::controller::{InputEvent, InputProcessor, Keyboard};
use chase::view::{GpuContext, GpuRenderer};
use chase::{logging, Game, GameConfig};

/// Names the key bindings understand
fn key_name(code: KeyCode) -> Option<&'static str> {
    match code {
        KeyCode::KeyW => Some("w"),
        KeyCode::KeyA => Some("a"),
        KeyCode::KeyS => Some("s"),
        KeyCode::KeyD => Some("d"),
        KeyCode::KeyQ => Some("q"),
        KeyCode::KeyE => Some("e"),
        KeyCode::ArrowUp => Some("ArrowUp"),
        KeyCode::ArrowDown => Some("ArrowDown"),
        KeyCode::ArrowLeft => Some("ArrowLeft"),
        KeyCode::ArrowRight => Some("ArrowRight"),
        _ => None,
    }
}

struct App {
    window: Arc<Window>,
    renderer: GpuRenderer,
    game: Game,
    keyboard: Keyboard,
}

impl App {
    fn handle_key(&mut self, state: ElementState, key: PhysicalKey) {
        let PhysicalKey::Code(code) = key else { return };
        let Some(name) = key_name(code) else { return };
        let event = match state {
            ElementState::Pressed => InputEvent::KeyDown(name.to_string()),
            ElementState::Released => InputEvent::KeyUp(name.to_string()),
        };
        self.keyboard.process_event(&event);
    }

    /// The window changed size: the surface is rebuilt, so are the meshes
    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.renderer.resize(size.width, size.height);
        self.game.on_device_reset(&mut self.keyboard);
    }

    /// Run one frame. Returns false once the host should shut down.
    fn redraw(&mut self) -> bool {
        let report = self.game.render_frame(&mut self.keyboard, &mut self.renderer);
        if let Some(fault) = &report.fault {
            if !fault.is_transient() {
                error!(%fault, "unrecoverable renderer fault");
                return false;
            }
        }
        if report.finished {
            self.announce();
            return false;
        }
        true
    }

    /// Show the end-of-game message, if there is one
    fn announce(&self) {
        match self.game.closing_message() {
            Some(message) => {
                info!(message, frames = self.game.frame_count(), "closing");
                println!("{message}");
                self.window.set_title(message);
            }
            None => info!(frames = self.game.frame_count(), "closed before the chase ended"),
        }
    }
}

#[allow(deprecated)]
fn main() -> anyhow::Result<()> {
    logging::init();

    let config = GameConfig::default();
    let event_loop = EventLoop::new().map_err(|e| anyhow!("failed to create event loop: {e}"))?;
    let window_attributes = Window::default_attributes()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(config.window.width, config.window.height));
    let window = event_loop
        .create_window(window_attributes)
        .map_err(|e| anyhow!("failed to create window: {e}"))?;
    let window = Arc::new(window);

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let surface = instance
        .create_surface(window.clone())
        .map_err(|e| anyhow!("failed to create surface: {e}"))?;
    let size = window.inner_size();
    let gpu = pollster::block_on(GpuContext::new(&instance, surface, size.width, size.height))?;

    info!(title = %config.window.title, width = size.width, height = size.height, "starting");
    let mut app = App {
        window,
        renderer: GpuRenderer::new(gpu),
        game: Game::new(config),
        keyboard: Keyboard::new(InputProcessor::default()),
    };

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { ref event, window_id } if window_id == app.window.id() => match event {
                WindowEvent::CloseRequested => {
                    app.announce();
                    elwt.exit();
                }
                WindowEvent::Focused(false) => app.keyboard.process_event(&InputEvent::FocusLost),
                WindowEvent::KeyboardInput { event: KeyEvent { state, physical_key, .. }, .. } => {
                    app.handle_key(*state, *physical_key);
                }
                WindowEvent::Resized(physical_size) => app.resize(*physical_size),
                WindowEvent::RedrawRequested => {
                    if !app.redraw() {
                        elwt.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => app.window.request_redraw(),
            _ => {}
        })
        .map_err(|e| anyhow!("event loop failed: {e}"))?;

    Ok(())
}
