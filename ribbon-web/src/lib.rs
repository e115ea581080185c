/// Ribbon Web - WASM viewer rendering the ribbon surface with WebGL2
///
/// The page provides a canvas and, optionally, the control elements read in
/// `dom`. Pointer drags rotate the view, `w/a/s/d` move the user point.
use std::cell::RefCell;
use std::rc::Rc;

use ribbon_core::{ControlState, RenderConfig, RenderSession, SurfaceVariant, UserPointKey};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

pub mod context;
pub mod dom;
pub mod texture;

pub use context::WebGlContext;

struct AppState {
    session: RenderSession<WebGlContext>,
    controls: ControlState,
    document: Document,
}

impl AppState {
    fn draw(&mut self) {
        dom::read_controls(&self.document, &mut self.controls);
        self.session.draw(&self.controls);
    }

    fn rerender(&mut self) {
        dom::read_controls(&self.document, &mut self.controls);
        self.session.rerender(&self.controls);
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct SurfaceApp {
    state: Rc<RefCell<AppState>>,
}

#[wasm_bindgen]
impl SurfaceApp {
    /// Start a viewer on `canvas_id`. `options` is an optional JSON
    /// configuration document.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        textured: bool,
        options: Option<String>,
    ) -> Result<SurfaceApp, JsValue> {
        let document = dom::document()?;
        let config = match options {
            Some(json) => RenderConfig::from_json(&json).map_err(to_js)?,
            None => RenderConfig::default(),
        };

        let (canvas, gl) = match dom::acquire_context(&document, canvas_id) {
            Ok(pair) => pair,
            Err(e) => {
                log::error!("{e}");
                dom::report_failure(&document, "Sorry, could not get a WebGL graphics context.");
                return Err(to_js(e));
            }
        };

        let variant = if textured {
            SurfaceVariant::Textured
        } else {
            SurfaceVariant::Shaded
        };
        let texture_url = config.texture_url.clone();

        let mut controls = ControlState::new(config.scene.light_position);
        dom::read_controls(&document, &mut controls);

        let context = WebGlContext::new(gl.clone());
        let session = match RenderSession::new(context, config, variant, &controls) {
            Ok(session) => session,
            Err(e) => {
                log::error!("{e}");
                dom::report_failure(
                    &document,
                    &format!("Sorry, could not initialize the WebGL graphics context: {e}"),
                );
                return Err(to_js(e));
            }
        };

        let state = Rc::new(RefCell::new(AppState {
            session,
            controls,
            document: document.clone(),
        }));
        attach_listeners(&canvas, &document, &state)?;

        if textured {
            let state = state.clone();
            texture::load_texture(&gl, &texture_url, move || state.borrow_mut().draw())?;
        }

        state.borrow_mut().draw();
        Ok(SurfaceApp { state })
    }

    /// Draw one frame
    pub fn render(&self) {
        self.state.borrow_mut().draw();
    }

    /// Resample the surface, then draw
    pub fn rerender(&self) {
        self.state.borrow_mut().rerender();
    }

    pub fn set_detailed(&self, detailed: bool) {
        let mut state = self.state.borrow_mut();
        state.controls.detailed = detailed;
        let AppState { session, controls, .. } = &mut *state;
        session.rerender(controls);
    }

    /// Set the light position from any number of fields
    pub fn set_light_position(&self, fields: Vec<f32>) {
        let mut state = self.state.borrow_mut();
        state.controls.set_light_fields(&fields);
        let AppState { session, controls, .. } = &mut *state;
        session.draw(controls);
    }

    /// Texture rotation in degrees
    pub fn set_rotation_angle(&self, degrees: f32) {
        let mut state = self.state.borrow_mut();
        state.controls.rotation_angle = degrees;
        let AppState { session, controls, .. } = &mut *state;
        session.draw(controls);
    }

    /// Feed a key name; returns whether it moved the user point
    pub fn key_down(&self, key: &str) -> bool {
        match UserPointKey::from_key(key) {
            Some(key) => {
                let mut state = self.state.borrow_mut();
                state.controls.apply_key(key);
                state.draw();
                true
            }
            None => false,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.state.borrow().session.vertex_count()
    }
}

/// Wire pointer drags to the trackball, keys to the user point and the page
/// controls to redraws. Listeners live as long as the page.
fn attach_listeners(
    canvas: &HtmlCanvasElement,
    document: &Document,
    state: &Rc<RefCell<AppState>>,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;

    {
        let state = state.clone();
        let target = canvas.clone();
        let mousedown = Closure::wrap(Box::new(move |ev: MouseEvent| {
            let (width, height) = (target.client_width() as f32, target.client_height() as f32);
            state
                .borrow_mut()
                .session
                .rotator_mut()
                .begin_drag(ev.offset_x() as f32, ev.offset_y() as f32, width, height);
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }

    {
        let state = state.clone();
        let target = canvas.clone();
        let mousemove = Closure::wrap(Box::new(move |ev: MouseEvent| {
            let (width, height) = (target.client_width() as f32, target.client_height() as f32);
            let mut state = state.borrow_mut();
            let rotator = state.session.rotator_mut();
            if rotator.is_dragging()
                && rotator.drag_to(ev.offset_x() as f32, ev.offset_y() as f32, width, height)
            {
                state.draw();
            }
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
        mousemove.forget();
    }

    {
        let state = state.clone();
        let mouseup = Closure::wrap(Box::new(move |_ev: MouseEvent| {
            state.borrow_mut().session.rotator_mut().end_drag();
        }) as Box<dyn FnMut(_)>);
        window.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
        mouseup.forget();
    }

    {
        let state = state.clone();
        let keydown = Closure::wrap(Box::new(move |ev: KeyboardEvent| {
            // Leave typing in the control inputs alone
            if let Some(target) = ev.target() {
                if let Some(element) = target.dyn_ref::<web_sys::Element>() {
                    if element.tag_name() == "INPUT" {
                        return;
                    }
                }
            }
            if let Some(key) = UserPointKey::from_key(&ev.key()) {
                ev.prevent_default();
                let mut state = state.borrow_mut();
                state.controls.apply_key(key);
                state.draw();
            }
        }) as Box<dyn FnMut(_)>);
        window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        keydown.forget();
    }

    if let Some(surface_type) = document.get_element_by_id(dom::SURFACE_TYPE_ID) {
        let state = state.clone();
        let change = Closure::wrap(Box::new(move || {
            state.borrow_mut().rerender();
        }) as Box<dyn FnMut()>);
        surface_type.add_event_listener_with_callback("change", change.as_ref().unchecked_ref())?;
        change.forget();
    }

    for id in [dom::LIGHT_POSITION_ID, dom::ROTATION_ANGLE_ID] {
        if let Some(element) = document.get_element_by_id(id) {
            let state = state.clone();
            let input = Closure::wrap(Box::new(move || {
                state.borrow_mut().draw();
            }) as Box<dyn FnMut()>);
            element.add_event_listener_with_callback("input", input.as_ref().unchecked_ref())?;
            input.forget();
        }
    }

    Ok(())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ribbon-web loaded");

    Ok(())
}
