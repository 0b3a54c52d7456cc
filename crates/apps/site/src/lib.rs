//! Browser entry point of the landing page.
//!
//! `boot` arms the bootstrapping gate; when it opens the sections are bound
//! to the scroll timeline, the 3D scene starts rendering and the window
//! listeners go live. `teardown` reverses all of it synchronously.

use console_error_panic_hook::set_once;
use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use gpu::{SceneConfig, SceneRenderer, Viewport};
use runtime::frame::FrameClock;
use runtime::gate::{BootGate, ReadyToken};
use runtime::signal::Signal;
use scene::choreographer::Choreographer;
use scene::pointer::PointerFollower;
use scene::scroll::{ScrollInput, ScrollTrack};
use scene::timeline::Timeline;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod config;
mod dom;
mod error;
mod http;
mod log;
mod wgpu;
mod widgets;

use crate::config::SiteConfig;
use crate::dom::{CANVAS_ID, Cursor, DomStage, DomSurface};
use crate::error::SiteError;
use crate::wgpu::{GpuContext, init_gpu_from_canvas_id, render_frame, resize_gpu};

type SharedRenderer = Rc<RefCell<SceneRenderer>>;

struct Booting {
    gate: BootGate,
    config: SiteConfig,
    // Dropping the handle clears the browser timer.
    _timer: Timeout,
}

struct Site {
    generation: u64,
    input: ScrollInput,
    scroll: Signal<f64>,
    /// Drawing-buffer size the GPU surface should match.
    backing: Viewport,
    clock: FrameClock,
    choreographer: Choreographer<DomSurface, SharedRenderer>,
    renderer: SharedRenderer,
    gpu: Option<GpuContext>,
    pointer: PointerFollower,
    cursor: Cursor,
    listeners: Vec<EventListener>,
    frame: Option<AnimationFrame>,
}

enum Lifecycle {
    Idle,
    Booting(Booting),
    Mounted(Box<Site>),
}

thread_local! {
    static STATE: RefCell<Lifecycle> = const { RefCell::new(Lifecycle::Idle) };
    static GENERATION: RefCell<u64> = const { RefCell::new(0) };
}

fn window() -> Result<web_sys::Window, SiteError> {
    web_sys::window().ok_or(SiteError::NoWindow)
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn viewport_size(window: &web_sys::Window) -> (f64, f64) {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    (w, h)
}

fn backing_size(window: &web_sys::Window) -> Viewport {
    let (w, h) = viewport_size(window);
    Viewport::backing(w, h, window.device_pixel_ratio())
}

fn track_height(document: &web_sys::Document) -> f64 {
    document
        .document_element()
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0)
}

fn with_site<T>(f: impl FnOnce(&mut Site) -> T) -> Option<T> {
    STATE.with(|state| match &mut *state.borrow_mut() {
        Lifecycle::Mounted(site) => Some(f(site)),
        _ => None,
    })
}

impl Site {
    fn on_scroll(&mut self, offset_px: f64) {
        self.input.on_scroll(offset_px);
    }

    fn on_resize(&mut self, (width, height): (f64, f64), backing: Viewport, track_px: f64, offset_px: f64) {
        self.input.on_resize(track_px, height, offset_px);
        self.renderer.borrow_mut().resize(width, height);
        self.backing = backing;
        if let Some(gpu) = &mut self.gpu {
            resize_gpu(gpu, backing);
        }
    }

    fn attach_gpu(&mut self, mut gpu: GpuContext) {
        // The window may have changed size while the adapter was pending.
        resize_gpu(&mut gpu, self.backing);
        self.gpu = Some(gpu);
    }

    fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.pointer.on_pointer_move(x, y);
        let mut renderer = self.renderer.borrow_mut();
        let ndc = renderer.viewport().pointer_ndc(x, y);
        renderer.set_pointer(ndc);
    }

    fn on_frame(&mut self, now_ms: f64) {
        let frame = self.clock.tick(now_ms);

        let progress = self.input.advance(frame.dt_s);
        if progress != self.scroll.get() {
            self.scroll.set(progress);
        }
        self.choreographer.sync();

        let uniforms = *self.renderer.borrow_mut().tick(&frame);
        if let Some(gpu) = &self.gpu
            && let Err(err) = render_frame(gpu, &uniforms)
        {
            tracing::debug!(%err, "frame skipped");
        }

        self.cursor.apply(&self.pointer.advance(frame.dt_s));
    }

    /// Offset that brings `id` to the start of its hold phase.
    fn offset_of(&self, id: &str) -> Option<f64> {
        let timeline = self.choreographer.timeline();
        let index = timeline.sections().iter().position(|s| s.id == id)?;
        let hold_start = timeline.windows(index)?.hold.start.0;
        Some(self.input.track().offset_for(hold_start))
    }

    fn unmount(mut self) {
        self.listeners.clear();
        self.frame = None;
        self.choreographer.teardown();
        self.renderer.borrow_mut().dispose();
        self.gpu = None;
        self.cursor.restore();
        tracing::info!(generation = self.generation, "site unmounted");
    }
}

fn schedule_frame(site: &mut Site) {
    site.frame = Some(request_animation_frame(|now_ms| {
        with_site(|site| {
            site.on_frame(now_ms);
            schedule_frame(site);
        });
    }));
}

fn install_listeners(window: &web_sys::Window) -> Vec<EventListener> {
    let scroll_window = window.clone();
    let on_scroll = EventListener::new(window, "scroll", move |_| {
        let offset = scroll_window.scroll_y().unwrap_or(0.0);
        with_site(|site| site.on_scroll(offset));
    });

    let resize_window = window.clone();
    let on_resize = EventListener::new(window, "resize", move |_| {
        let css = viewport_size(&resize_window);
        let backing = backing_size(&resize_window);
        let track = resize_window.document().map(|d| track_height(&d)).unwrap_or(0.0);
        let offset = resize_window.scroll_y().unwrap_or(0.0);
        with_site(|site| site.on_resize(css, backing, track, offset));
    });

    let on_pointer = EventListener::new(window, "mousemove", move |event| {
        let Some(event) = event.dyn_ref::<web_sys::MouseEvent>() else {
            return;
        };
        let (x, y) = (event.client_x() as f64, event.client_y() as f64);
        with_site(|site| site.on_pointer_move(x, y));
    });

    vec![on_scroll, on_resize, on_pointer]
}

/// Builds everything the gate was holding back. Requires the gate's token.
fn mount(_ready: ReadyToken, config: SiteConfig) -> Result<Site, SiteError> {
    let window = window()?;
    let document = window.document().ok_or(SiteError::NoDocument)?;

    let registry = config.registry();
    let timeline = Timeline::build_with(
        registry.sections(),
        registry.total_units(),
        &config.timeline_options(),
    )?;

    let (width, height) = viewport_size(&window);
    let renderer: SharedRenderer = Rc::new(RefCell::new(SceneRenderer::init(
        Viewport::new(width, height),
        SceneConfig::default(),
    )));

    let mut stage = DomStage::new(document.clone());
    let mut choreographer = Choreographer::mount(timeline, &mut stage, Some(renderer.clone()));

    let track = ScrollTrack::new(track_height(&document), height, registry.total_units());
    let input = ScrollInput::new(track, window.scroll_y().unwrap_or(0.0), config.scrub_seconds);
    let scroll = Signal::new("scroll-progress", input.progress());
    choreographer.attach_scroll(&scroll);
    choreographer.sync();

    let generation = GENERATION.with(|g| {
        let mut g = g.borrow_mut();
        *g += 1;
        *g
    });

    tracing::info!(
        generation,
        bound = choreographer.bound_count(),
        skipped = choreographer.skipped().len(),
        total_units = registry.total_units(),
        "site mounted"
    );

    Ok(Site {
        generation,
        input,
        scroll,
        backing: backing_size(&window),
        clock: FrameClock::new(),
        choreographer,
        renderer,
        gpu: None,
        pointer: PointerFollower::new(),
        cursor: Cursor::find(&document),
        listeners: install_listeners(&window),
        frame: None,
    })
}

fn start_gpu(site: &Site) {
    let generation = site.generation;
    let size = site.backing;
    let (vertices, indices, particles) = {
        let renderer = site.renderer.borrow();
        (
            renderer.gate_mesh().vertices.clone(),
            renderer.gate_mesh().line_indices.clone(),
            renderer.particles().to_vec(),
        )
    };
    spawn_local(async move {
        match init_gpu_from_canvas_id(CANVAS_ID, size, &vertices, &indices, &particles).await {
            Ok(ctx) => {
                // A teardown or re-boot while the adapter was pending wins.
                with_site(|site| {
                    if site.generation == generation {
                        site.attach_gpu(ctx);
                    }
                });
            }
            Err(err) => tracing::error!(%err, "scene renderer unavailable"),
        }
    });
}

fn on_gate_timer() {
    let previous = STATE.with(|state| std::mem::replace(&mut *state.borrow_mut(), Lifecycle::Idle));
    let mut booting = match previous {
        Lifecycle::Booting(booting) => booting,
        other => {
            STATE.with(|state| *state.borrow_mut() = other);
            return;
        }
    };
    let Some(token) = booting.gate.fire() else {
        return;
    };
    match mount(token, booting.config) {
        Ok(mut site) => {
            start_gpu(&site);
            schedule_frame(&mut site);
            STATE.with(|state| *state.borrow_mut() = Lifecycle::Mounted(Box::new(site)));
        }
        Err(err) => tracing::error!(%err, "mount failed"),
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Arms the bootstrapping gate. `config_json` is an optional JSON object of
/// [`SiteConfig`] overrides. Any earlier boot or mount is torn down first.
#[wasm_bindgen]
pub fn boot(config_json: Option<String>) -> Result<(), JsValue> {
    let config = SiteConfig::from_json(config_json.as_deref())?;
    log::init_logging(&config.log_level);
    widgets::set_api_key(config.api_key());
    teardown();

    let mut gate = BootGate::new(config.boot_delay_ms);
    gate.arm(now_ms());
    let timer = Timeout::new(config.boot_delay_ms, on_gate_timer);
    tracing::debug!(delay_ms = config.boot_delay_ms, "boot gate armed");

    STATE.with(|state| {
        *state.borrow_mut() = Lifecycle::Booting(Booting {
            gate,
            config,
            _timer: timer,
        });
    });
    Ok(())
}

/// Cancels a pending boot or unmounts the live site, restoring every
/// section's original inline style.
#[wasm_bindgen]
pub fn teardown() {
    let previous = STATE.with(|state| std::mem::replace(&mut *state.borrow_mut(), Lifecycle::Idle));
    match previous {
        Lifecycle::Idle => {}
        Lifecycle::Booting(mut booting) => booting.gate.cancel(),
        Lifecycle::Mounted(site) => (*site).unmount(),
    }
}

/// Smooth-scrolls so section `id` is fully on screen. Returns false when the
/// site is not mounted or the id is unknown.
#[wasm_bindgen]
pub fn scroll_to_section(id: &str) -> Result<bool, JsValue> {
    let Some(offset) = with_site(|site| site.offset_of(id)).flatten() else {
        return Ok(false);
    };
    let options = web_sys::ScrollToOptions::new();
    options.set_top(offset);
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    window()?.scroll_to_with_scroll_to_options(&options);
    Ok(true)
}

/// Current scrubbed progress in timeline units, or `None` before mount.
#[wasm_bindgen]
pub fn scroll_progress() -> Option<f64> {
    with_site(|site| site.scroll.get())
}

#[wasm_bindgen]
pub fn is_mounted() -> bool {
    with_site(|_| ()).is_some()
}
