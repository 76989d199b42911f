//! Platform runners (desktop via winit; Android behind the `android`
//! feature).
//!
//! A runner owns the window, the wgpu backend, the `Scheduler` and a
//! `Router`. Every redraw recomposes the root under the window's density,
//! renders the resulting scene and keeps the `Frame` for input routing until
//! the next redraw.

pub mod common;

#[cfg(feature = "android")]
pub mod android;

pub use common::{FocusChange, Router, dispatch_scroll, next_in_chain, top_hit_index};

#[cfg(any(feature = "desktop", feature = "android"))]
use travail_core::*;

#[cfg(feature = "desktop")]
use std::path::PathBuf;

/// Desktop window settings.
#[cfg(feature = "desktop")]
#[derive(Clone, Debug)]
pub struct DesktopOptions {
    pub title: String,
    /// Initial inner size in logical pixels (dp).
    pub size: (f64, f64),
    /// Root of the bundled resources (`<assets_dir>/drawable/<id>.png`).
    pub assets_dir: PathBuf,
}

#[cfg(feature = "desktop")]
impl Default for DesktopOptions {
    fn default() -> Self {
        Self {
            title: "Travail".to_string(),
            size: (412.0, 915.0),
            assets_dir: PathBuf::from("assets"),
        }
    }
}

/// Lines scrolled per wheel notch, in dp.
#[cfg(feature = "desktop")]
const WHEEL_LINE_DP: f32 = 40.0;

/// Maps a winit key to the subset the router understands.
#[cfg(any(feature = "desktop", feature = "android"))]
pub(crate) fn map_key(ev: &winit::event::KeyEvent, modifiers: Modifiers) -> Option<KeyEvent> {
    use winit::keyboard::{KeyCode, PhysicalKey};

    let key = match ev.physical_key {
        PhysicalKey::Code(KeyCode::Tab) => Key::Tab,
        PhysicalKey::Code(KeyCode::Enter) | PhysicalKey::Code(KeyCode::NumpadEnter) => Key::Enter,
        PhysicalKey::Code(KeyCode::Backspace) => Key::Backspace,
        PhysicalKey::Code(KeyCode::Delete) => Key::Delete,
        PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
        PhysicalKey::Code(KeyCode::ArrowLeft) => Key::ArrowLeft,
        PhysicalKey::Code(KeyCode::ArrowRight) => Key::ArrowRight,
        PhysicalKey::Code(KeyCode::Home) => Key::Home,
        PhysicalKey::Code(KeyCode::End) => Key::End,
        _ => Key::Character(ev.text.as_deref()?.to_string()),
    };
    Some(KeyEvent { key, modifiers })
}

#[cfg(any(feature = "desktop", feature = "android"))]
pub(crate) fn map_modifiers(state: winit::keyboard::ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

#[cfg(feature = "desktop")]
pub fn run_desktop_app(
    options: DesktopOptions,
    root: impl FnMut(&mut Scheduler) -> View + 'static,
) -> anyhow::Result<()> {
    use std::sync::Arc;

    use travail_render_wgpu::WgpuBackend;
    use winit::application::ApplicationHandler;
    use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
    use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
    use winit::event_loop::EventLoop;
    use winit::window::{ImePurpose, Window, WindowAttributes};

    struct App {
        root: Box<dyn FnMut(&mut Scheduler) -> View>,
        options: DesktopOptions,
        window: Option<Arc<Window>>,
        backend: Option<WgpuBackend>,
        sched: Scheduler,
        router: Router,
        frame_cache: Option<Frame>,
        mouse_pos: Vec2,
    }

    impl App {
        fn request_redraw(&self) {
            if let Some(w) = &self.window {
                w.request_redraw();
            }
        }

        fn set_ime(&self, change: FocusChange) {
            let Some(win) = &self.window else {
                return;
            };
            match change {
                FocusChange::TextField { rect, .. } => {
                    win.set_ime_allowed(true);
                    win.set_ime_purpose(ImePurpose::Normal);
                    win.set_ime_cursor_area(
                        PhysicalPosition::new(rect.x as f64, rect.y as f64),
                        PhysicalSize::new(rect.w as f64, rect.h as f64),
                    );
                }
                FocusChange::Other => win.set_ime_allowed(false),
                FocusChange::None => {}
            }
        }
    }

    impl ApplicationHandler<()> for App {
        fn resumed(&mut self, el: &winit::event_loop::ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }
            let (w, h) = self.options.size;
            match el.create_window(
                WindowAttributes::default()
                    .with_title(self.options.title.clone())
                    .with_inner_size(LogicalSize::new(w, h)),
            ) {
                Ok(win) => {
                    let w = Arc::new(win);
                    let size = w.inner_size();
                    self.sched.size = (size.width, size.height);
                    self.router.scale = w.scale_factor() as f32;
                    log::info!(
                        "window {}x{} @{}x",
                        size.width,
                        size.height,
                        self.router.scale
                    );
                    match WgpuBackend::new(w.clone(), self.options.assets_dir.clone()) {
                        Ok(b) => {
                            self.backend = Some(b);
                            self.window = Some(w);
                            self.request_redraw();
                        }
                        Err(e) => {
                            log::error!("Failed to create WGPU backend: {e:?}");
                            el.exit();
                        }
                    }
                }
                Err(e) => {
                    log::error!("Failed to create window: {e:?}");
                    el.exit();
                }
            }
        }

        fn window_event(
            &mut self,
            el: &winit::event_loop::ActiveEventLoop,
            _id: winit::window::WindowId,
            event: WindowEvent,
        ) {
            match event {
                WindowEvent::CloseRequested => {
                    log::info!("Window close requested");
                    el.exit();
                }
                WindowEvent::Resized(size) => {
                    self.sched.size = (size.width, size.height);
                    if let Some(b) = &mut self.backend {
                        b.configure_surface(size.width, size.height);
                    }
                    self.request_redraw();
                }
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    self.router.scale = scale_factor as f32;
                    self.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    self.mouse_pos = Vec2 {
                        x: position.x as f32,
                        y: position.y as f32,
                    };
                    if let Some(f) = &self.frame_cache
                        && self.router.pointer_moved(f, self.mouse_pos)
                    {
                        self.request_redraw();
                    }
                }
                WindowEvent::CursorLeft { .. } => {
                    self.router.interactions.hover = None;
                    self.router.pointer_cancel();
                    self.request_redraw();
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => {
                    let Some(f) = &self.frame_cache else {
                        return;
                    };
                    match state {
                        ElementState::Pressed => {
                            let change =
                                self.router
                                    .pointer_down(f, &mut self.sched.focused, self.mouse_pos);
                            self.set_ime(change);
                        }
                        ElementState::Released => self.router.pointer_up(f, self.mouse_pos),
                    }
                    self.request_redraw();
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let line = WHEEL_LINE_DP * self.router.scale;
                    let (mut dx, mut dy) = match delta {
                        MouseScrollDelta::LineDelta(x, y) => (-x * line, -y * line),
                        MouseScrollDelta::PixelDelta(p) => (-(p.x as f32), -(p.y as f32)),
                    };
                    // Shift turns a vertical wheel into horizontal scrolling.
                    if self.router.modifiers.shift && dx == 0.0 {
                        std::mem::swap(&mut dx, &mut dy);
                    }
                    log::trace!("wheel dx={dx} dy={dy}");
                    if let Some(f) = &self.frame_cache
                        && self
                            .router
                            .wheel(f, self.mouse_pos, Vec2 { x: dx, y: dy })
                    {
                        self.request_redraw();
                    }
                }
                WindowEvent::ModifiersChanged(m) => {
                    self.router.modifiers = map_modifiers(m.state());
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state != ElementState::Pressed {
                        return;
                    }
                    let Some(f) = &self.frame_cache else {
                        return;
                    };
                    let Some(key) = map_key(&event, self.router.modifiers) else {
                        return;
                    };
                    let before = self.sched.focused;
                    if self.router.key(f, &mut self.sched.focused, &key) {
                        if before != self.sched.focused {
                            let change = match self.sched.focused.and_then(|id| f.hit(id)) {
                                Some(h) if h.text.is_some() => FocusChange::TextField {
                                    id: h.id,
                                    rect: h.rect,
                                },
                                _ => FocusChange::Other,
                            };
                            self.set_ime(change);
                        }
                        self.request_redraw();
                    }
                }
                WindowEvent::Ime(ime) => {
                    use winit::event::Ime;
                    let ev = match ime {
                        Ime::Preedit(text, cursor) if text.is_empty() && cursor.is_none() => {
                            ImeEvent::Cancel
                        }
                        Ime::Preedit(text, cursor) => ImeEvent::Update { text, cursor },
                        Ime::Commit(text) => ImeEvent::Commit(text),
                        Ime::Disabled => ImeEvent::Cancel,
                        Ime::Enabled => return,
                    };
                    if let Some(f) = &self.frame_cache
                        && self.router.ime(f, self.sched.focused, &ev)
                    {
                        self.request_redraw();
                    }
                }
                WindowEvent::RedrawRequested => {
                    let Some(backend) = self.backend.as_mut() else {
                        return;
                    };
                    match self.router.compose(&mut self.sched, &mut *self.root) {
                        Ok(frame) => {
                            backend.frame(&frame.scene);
                            self.frame_cache = Some(frame);
                        }
                        Err(e) => {
                            log::error!("layout failed: {e}");
                        }
                    }
                }
                _ => {}
            }
        }
    }

    let event_loop = EventLoop::new()?;
    let mut app = App {
        root: Box::new(root),
        options,
        window: None,
        backend: None,
        sched: Scheduler::new(),
        router: Router::default(),
        frame_cache: None,
        mouse_pos: Vec2::default(),
    };
    event_loop.run_app(&mut app)?;
    Ok(())
}
