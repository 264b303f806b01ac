use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};
use log::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH, MAX_FRAME_TIME, PLAYER_SIZE, TICK};
use crate::map::GridMap;
use crate::movement::KeyState;
use crate::player::PlayerState;
use crate::raycaster::View;
use crate::render::Framebuffer;
use crate::scaler::{ScaleLut, blit_nearest_stretch, build_scale_lut};

mod config;
mod map;
mod minimap;
mod movement;
mod player;
mod raycaster;
mod render;
mod scaler;

type Surface = softbuffer::Surface<Rc<Window>, Rc<Window>>;

struct App {
    window: Option<Rc<Window>>,
    surface: Option<Surface>,
    // Set when window setup fails; main returns it after the loop exits
    fatal: Option<anyhow::Error>,

    map: GridMap,
    player: PlayerState,
    view: View,

    // Fixed DISPLAY_WIDTH x DISPLAY_HEIGHT frame, stretched to the window
    frame: Framebuffer,
    scale_lut: ScaleLut,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Input
    keys_down: HashSet<winit::keyboard::KeyCode>,
    last_tick: Instant,
    accumulator: Duration,
}

impl App {
    fn new(map: GridMap) -> Self {
        Self {
            window: None,
            surface: None,
            fatal: None,

            map,
            player: PlayerState::spawn(),
            view: View::default(),

            frame: Framebuffer::new(DISPLAY_WIDTH, DISPLAY_HEIGHT),
            scale_lut: ScaleLut::empty(),

            frame_counter: 0,
            last_fps_print: Instant::now(),

            keys_down: HashSet::new(),
            last_tick: Instant::now(),
            accumulator: Duration::ZERO,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title("Ray Casting")
            .with_inner_size(LogicalSize::new(DISPLAY_WIDTH as f64, DISPLAY_HEIGHT as f64));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| anyhow!("create window: {e}"))?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("softbuffer surface: {e}"))?;

        let size = window.inner_size();
        info!("window {}x{}, frame {}x{}", size.width, size.height, DISPLAY_WIDTH, DISPLAY_HEIGHT);
        self.scale_lut = build_scale_lut(size.width as usize, size.height as usize, DISPLAY_WIDTH, DISPLAY_HEIGHT);

        self.window = Some(window);
        self.surface = Some(surface);
        self.last_tick = Instant::now();
        Ok(())
    }

    /// Run as many fixed input steps as the elapsed time covers.
    fn tick(&mut self) {
        // Cap dt to avoid a burst of steps after a stall
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).min(MAX_FRAME_TIME);
        self.last_tick = now;
        self.accumulator += dt;

        let keys = KeyState::from_pressed(&self.keys_down);
        while self.accumulator >= TICK {
            movement::handle_input(&mut self.player, &self.map, keys);
            self.accumulator -= TICK;
        }
    }

    fn draw_frame(&mut self) {
        self.frame.clear();
        let slices = raycaster::cast_view(&self.map, &self.player, &self.view);
        render::draw_view(&mut self.frame, &slices);
        let minimap = minimap::layout(&self.map, &self.player, self.frame.width, self.frame.height);
        render::draw_minimap(&mut self.frame, &minimap, PLAYER_SIZE);
    }

    fn present(&mut self, id: WindowId) -> anyhow::Result<()> {
        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(nw), Some(nh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return Ok(()); // Minimized window, skip drawing
        };
        let (dw, dh) = (size.width as usize, size.height as usize);

        surface.resize(nw, nh).map_err(|e| anyhow!("resize surface: {e}"))?;
        if !self.scale_lut.fits(dw, dh) {
            self.scale_lut = build_scale_lut(dw, dh, self.frame.width, self.frame.height);
        }

        let mut buf = surface.buffer_mut().map_err(|e| anyhow!("buffer_mut: {e}"))?;
        blit_nearest_stretch(&mut buf, dw, &self.frame.pixels, self.frame.width, &self.scale_lut);
        buf.present().map_err(|e| anyhow!("present: {e}"))?;
        Ok(())
    }

    fn log_fps(&mut self) {
        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            debug!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            error!("{e:#}");
            self.fatal = Some(e);
            event_loop.exit();
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                // clear -> render -> input -> present
                self.draw_frame();
                self.tick();

                if let Err(e) = self.present(id) {
                    error!("{e:#}");
                }
                self.log_fps();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::Resized(new_size) => {
                let (dw, dh) = (new_size.width as usize, new_size.height as usize);
                self.scale_lut = build_scale_lut(dw, dh, self.frame.width, self.frame.height);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let map = GridMap::level().context("load built-in level")?;
    info!("map {}x{} cells of {} px", map.width(), map.height(), map.cell_size());

    let event_loop = EventLoop::new().map_err(|e| anyhow!("create event loop: {e}"))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(map);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("event loop: {e}"))?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
