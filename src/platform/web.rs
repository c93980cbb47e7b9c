//! Browser host: requestAnimationFrame scheduling and DOM listeners

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

use super::{FieldLoop, FrameId, FrameScheduler};
use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::renderer::CanvasSurface;
use crate::sim::Viewport;

type WebLoop = FieldLoop<CanvasSurface, RafScheduler>;

fn to_js(err: FieldError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Current window inner size in CSS pixels
fn window_viewport(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| {
        v.ok()
            .and_then(|v| v.as_f64())
            .map(|v| v.max(0.0) as u32)
            .unwrap_or(0)
    };
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// Schedules frames with `window.requestAnimationFrame`
pub struct RafScheduler {
    window: Window,
    /// Frame callback; set once the owning loop is shared
    callback: Option<Closure<dyn FnMut(f64)>>,
}

impl FrameScheduler for RafScheduler {
    fn request(&mut self) -> FrameId {
        let Some(callback) = self.callback.as_ref() else {
            log::warn!("Frame requested before callback was installed");
            return FrameId(0);
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => FrameId(id),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                FrameId(0)
            }
        }
    }

    fn cancel(&mut self, id: FrameId) {
        let _ = self.window.cancel_animation_frame(id.0);
    }
}

/// An attached DOM listener, removed again on drop
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, event: &'static str, closure: Closure<dyn FnMut(Event)>) -> Self {
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            event,
            closure,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Run `f` against the loop if it is still alive
fn with_loop(weak: &Weak<RefCell<WebLoop>>, f: impl FnOnce(&mut WebLoop)) {
    if let Some(lp) = weak.upgrade() {
        f(&mut lp.borrow_mut());
    }
}

/// Client coordinates to canvas-local coordinates
fn canvas_local(lp: &WebLoop, client_x: f64, client_y: f64) -> Option<Vec2> {
    let rect = lp.surface()?.canvas().get_bounding_client_rect();
    Some(Vec2::new(
        (client_x - rect.left()) as f32,
        (client_y - rect.top()) as f32,
    ))
}

/// Hero dot field mounted on a canvas element
#[wasm_bindgen]
pub struct ParticleField {
    window: Window,
    inner: Rc<RefCell<WebLoop>>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl ParticleField {
    /// Bind to the canvas with id `canvas_id`.
    ///
    /// A missing canvas or 2D context is not an error: the field is created
    /// but `start()` does nothing. An invalid stored config is replaced by
    /// the defaults inside `FieldConfig::load`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<ParticleField, JsValue> {
        let window = web_sys::window()
            .ok_or_else(|| to_js(FieldError::SurfaceUnavailable("no window".into())))?;
        let config = FieldConfig::load();

        let canvas = window
            .document()
            .and_then(|d| d.get_element_by_id(canvas_id))
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        let surface = match canvas {
            Some(canvas) => match CanvasSurface::new(canvas, config.hi_dpi) {
                Ok(surface) => Some(surface),
                Err(e) => {
                    log::warn!("{}", e);
                    None
                }
            },
            None => {
                log::warn!("Canvas #{} not found", canvas_id);
                None
            }
        };

        let scheduler = RafScheduler {
            window: window.clone(),
            callback: None,
        };
        let inner = Rc::new(RefCell::new(
            FieldLoop::new(config, surface, scheduler).map_err(to_js)?,
        ));

        let weak = Rc::downgrade(&inner);
        let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            with_loop(&weak, |lp| lp.frame(time));
        });
        inner.borrow_mut().scheduler_mut().callback = Some(callback);

        Ok(ParticleField {
            window,
            inner,
            listeners: Vec::new(),
        })
    }

    /// Mount: build the lattice, start ticking, attach listeners
    pub fn start(&mut self) -> bool {
        let viewport = window_viewport(&self.window);
        let running = self.inner.borrow_mut().start(viewport);
        if running && self.listeners.is_empty() {
            self.attach_listeners();
        }
        running
    }

    /// Unmount: cancel the pending frame and detach every listener
    pub fn stop(&mut self) {
        self.inner.borrow_mut().stop();
        self.listeners.clear();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.borrow().is_running()
    }

    /// Frames drawn since creation
    pub fn frames(&self) -> f64 {
        self.inner.borrow().frames() as f64
    }

    /// Validate a (possibly partial) JSON config, persist it to
    /// LocalStorage and relay out the field with it. An invalid config
    /// throws and leaves both the field and the stored copy unchanged.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, json: &str) -> Result<(), JsValue> {
        let config = FieldConfig::from_json(json).map_err(to_js)?;
        let mut lp = self.inner.borrow_mut();
        if let Some(surface) = lp.surface_mut() {
            surface.set_hi_dpi(config.hi_dpi);
        }
        lp.set_config(config.clone()).map_err(to_js)?;
        config.save();
        Ok(())
    }
}

impl ParticleField {
    fn attach_listeners(&mut self) {
        let window: &EventTarget = self.window.as_ref();

        // Resize - rebuild lattice and backing store
        {
            let weak = Rc::downgrade(&self.inner);
            let win = self.window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                let viewport = window_viewport(&win);
                with_loop(&weak, |lp| lp.resize(viewport));
            });
            self.listeners.push(Listener::attach(window, "resize", closure));
        }

        // Mouse move - the canvas ignores pointer events, so track the window
        {
            let weak = Rc::downgrade(&self.inner);
            let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                with_loop(&weak, |lp| {
                    if let Some(pos) =
                        canvas_local(lp, event.client_x() as f64, event.client_y() as f64)
                    {
                        lp.pointer_moved(pos);
                    }
                });
            });
            self.listeners.push(Listener::attach(window, "mousemove", closure));
        }

        // Mouse out with no related target - pointer left the document
        {
            let weak = Rc::downgrade(&self.inner);
            let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                let left_document = event
                    .dyn_ref::<MouseEvent>()
                    .is_some_and(|e| e.related_target().is_none());
                if left_document {
                    with_loop(&weak, |lp| lp.pointer_left());
                }
            });
            self.listeners.push(Listener::attach(window, "mouseout", closure));
        }

        // Touch move
        {
            let weak = Rc::downgrade(&self.inner);
            let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                let Some(touch) = event
                    .dyn_ref::<TouchEvent>()
                    .and_then(|e| e.touches().get(0))
                else {
                    return;
                };
                with_loop(&weak, |lp| {
                    if let Some(pos) =
                        canvas_local(lp, touch.client_x() as f64, touch.client_y() as f64)
                    {
                        lp.pointer_moved(pos);
                    }
                });
            });
            self.listeners.push(Listener::attach(window, "touchmove", closure));
        }

        // Touch end/cancel
        for event in ["touchend", "touchcancel"] {
            let weak = Rc::downgrade(&self.inner);
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                with_loop(&weak, |lp| lp.pointer_left());
            });
            self.listeners.push(Listener::attach(window, event, closure));
        }

        log::debug!("Attached {} listeners", self.listeners.len());
    }
}

impl Drop for ParticleField {
    fn drop(&mut self) {
        self.stop();
    }
}
