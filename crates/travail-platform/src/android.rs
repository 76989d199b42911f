use std::path::PathBuf;
use std::sync::Arc;

use travail_core::*;
use travail_render_wgpu::WgpuBackend;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, TouchPhase, WindowEvent};
use winit::event_loop::EventLoop;
use winit::platform::android::EventLoopBuilderExtAndroid;
use winit::platform::android::activity::AndroidApp;
use winit::window::{ImePurpose, Window, WindowAttributes};

use crate::{FocusChange, Router, map_key, map_modifiers};

#[derive(Clone, Debug)]
pub struct AndroidOptions {
    /// Where the drawables were unpacked. `None` uses the app's internal
    /// data directory.
    pub assets_dir: Option<PathBuf>,
    /// Finger travel (dp) after which a touch becomes a scroll, not a tap.
    pub touch_slop_dp: f32,
}

impl Default for AndroidOptions {
    fn default() -> Self {
        Self {
            assets_dir: None,
            touch_slop_dp: 6.0,
        }
    }
}

pub fn run_android_app(
    app: AndroidApp,
    root: impl FnMut(&mut Scheduler) -> View + 'static,
) -> anyhow::Result<()> {
    run_android_app_with_options(app, root, AndroidOptions::default())
}

pub fn run_android_app_with_options(
    app: AndroidApp,
    root: impl FnMut(&mut Scheduler) -> View + 'static,
    options: AndroidOptions,
) -> anyhow::Result<()> {
    let assets_dir = options
        .assets_dir
        .clone()
        .or_else(|| app.internal_data_path())
        .unwrap_or_else(|| PathBuf::from("assets"));
    log::info!("resources from {}", assets_dir.display());

    let event_loop = EventLoop::builder().with_android_app(app).build()?;

    struct AppState {
        root: Box<dyn FnMut(&mut Scheduler) -> View>,
        options: AndroidOptions,
        assets_dir: PathBuf,
        window: Option<Arc<Window>>,
        backend: Option<WgpuBackend>,
        sched: Scheduler,
        router: Router,
        frame_cache: Option<Frame>,
        prev_touch: Option<Vec2>,
    }

    impl AppState {
        fn request_redraw(&self) {
            if let Some(w) = &self.window {
                w.request_redraw();
            }
        }

        fn sync_window_size(&mut self, size: PhysicalSize<u32>) {
            self.sched.size = (size.width, size.height);
            if let Some(b) = &mut self.backend {
                b.configure_surface(size.width, size.height);
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
                        PhysicalPosition::new(rect.x as i32, rect.y as i32),
                        PhysicalSize::new(rect.w as u32, rect.h as u32),
                    );
                }
                FocusChange::Other => win.set_ime_allowed(false),
                FocusChange::None => {}
            }
        }
    }

    impl ApplicationHandler<()> for AppState {
        fn resumed(&mut self, el: &winit::event_loop::ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }
            match el.create_window(WindowAttributes::default().with_title("Travail")) {
                Ok(win) => {
                    let w = Arc::new(win);
                    self.router.scale = w.scale_factor() as f32;
                    self.sync_window_size(w.inner_size());
                    match WgpuBackend::new(w.clone(), self.assets_dir.clone()) {
                        Ok(b) => {
                            self.backend = Some(b);
                            self.window = Some(w);
                            self.request_redraw();
                        }
                        Err(e) => {
                            log::error!("WGPU backend init failed: {e:?}");
                            el.exit();
                        }
                    }
                }
                Err(e) => {
                    log::error!("Window create failed: {e:?}");
                    el.exit();
                }
            }
        }

        fn suspended(&mut self, _el: &winit::event_loop::ActiveEventLoop) {
            // The native window goes away; a new surface is built on resume.
            self.backend = None;
            self.window = None;
            self.frame_cache = None;
        }

        fn window_event(
            &mut self,
            el: &winit::event_loop::ActiveEventLoop,
            _id: winit::window::WindowId,
            event: WindowEvent,
        ) {
            match event {
                WindowEvent::CloseRequested => el.exit(),
                WindowEvent::Resized(size) => {
                    self.sync_window_size(size);
                    self.request_redraw();
                }
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    self.router.scale = scale_factor as f32;
                    self.request_redraw();
                }
                WindowEvent::Touch(t) => {
                    let pos = Vec2 {
                        x: t.location.x as f32,
                        y: t.location.y as f32,
                    };
                    let Some(f) = &self.frame_cache else {
                        return;
                    };
                    match t.phase {
                        TouchPhase::Started => {
                            let change = self.router.pointer_down(f, &mut self.sched.focused, pos);
                            self.set_ime(change);
                            self.prev_touch = Some(pos);
                        }
                        TouchPhase::Moved => {
                            if let Some(prev) = self.prev_touch {
                                let delta = Vec2 {
                                    x: pos.x - prev.x,
                                    y: pos.y - prev.y,
                                };
                                let slop = self.options.touch_slop_dp * self.router.scale;
                                self.router.drag(f, pos, delta, slop);
                            }
                            self.prev_touch = Some(pos);
                        }
                        TouchPhase::Ended => {
                            self.router.pointer_up(f, pos);
                            self.prev_touch = None;
                        }
                        TouchPhase::Cancelled => {
                            self.router.pointer_cancel();
                            self.prev_touch = None;
                        }
                    }
                    self.request_redraw();
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
                    if let Some(key) = map_key(&event, self.router.modifiers)
                        && self.router.key(f, &mut self.sched.focused, &key)
                    {
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
                        Err(e) => log::error!("layout failed: {e}"),
                    }
                }
                _ => {}
            }
        }
    }

    let mut state = AppState {
        root: Box::new(root),
        options,
        assets_dir,
        window: None,
        backend: None,
        sched: Scheduler::new(),
        router: Router::default(),
        frame_cache: None,
        prev_touch: None,
    };
    event_loop.run_app(&mut state)?;
    Ok(())
}
