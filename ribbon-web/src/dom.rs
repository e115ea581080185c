/// Page lookups: canvas, context, control inputs and failure reporting
use ribbon_core::{ControlState, RenderError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, WebGl2RenderingContext as GL};

/// Element that receives the failure message when rendering cannot start
pub const CANVAS_HOLDER_ID: &str = "canvas-holder";
/// Checkbox selecting detailed sampling
pub const SURFACE_TYPE_ID: &str = "SurfaceType";
/// Container whose `<input>` children hold the light position
pub const LIGHT_POSITION_ID: &str = "lPos";
/// Numeric input holding the texture rotation angle in degrees
pub const ROTATION_ANGLE_ID: &str = "rotationAngle";

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Find the canvas and create a WebGL2 context on it
pub fn acquire_context(
    document: &Document,
    canvas_id: &str,
) -> Result<(HtmlCanvasElement, GL), RenderError> {
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| RenderError::NoContext(format!("missing #{canvas_id}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| RenderError::NoContext(format!("#{canvas_id} is not a canvas")))?;

    let gl = canvas
        .get_context("webgl2")
        .map_err(|e| RenderError::NoContext(format!("{e:?}")))?
        .ok_or_else(|| RenderError::NoContext("Browser does not support WebGL".to_string()))?
        .dyn_into::<GL>()
        .map_err(|_| RenderError::NoContext("unexpected context type".to_string()))?;

    Ok((canvas, gl))
}

/// Replace the canvas area with a static message
pub fn report_failure(document: &Document, message: &str) {
    match document.get_element_by_id(CANVAS_HOLDER_ID) {
        Some(holder) => holder.set_inner_html(&format!("<p>{message}</p>")),
        None => log::error!("{message}"),
    }
}

fn input(document: &Document, id: &str) -> Option<HtmlInputElement> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
}

fn number(input: &HtmlInputElement) -> f32 {
    input.value().trim().parse().unwrap_or(0.0)
}

/// Copy the page's control values into `controls`.
/// Controls without a matching element keep their current value.
pub fn read_controls(document: &Document, controls: &mut ControlState) {
    if let Some(checkbox) = input(document, SURFACE_TYPE_ID) {
        controls.detailed = checkbox.checked();
    }

    if let Some(container) = document.get_element_by_id(LIGHT_POSITION_ID) {
        let inputs = container.get_elements_by_tag_name("input");
        let fields: Vec<f32> = (0..inputs.length())
            .filter_map(|i| inputs.item(i))
            .filter_map(|element| element.dyn_into::<HtmlInputElement>().ok())
            .map(|input| number(&input))
            .collect();
        controls.set_light_fields(&fields);
    }

    if let Some(angle) = input(document, ROTATION_ANGLE_ID) {
        controls.rotation_angle = number(&angle);
    }
}
