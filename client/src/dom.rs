use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement, MouseEvent, Window};

use mapview_shared::{Mode, Point};

use crate::render::CanvasSurface;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// Like [`get_element`], for controls the page may leave out.
pub fn optional_element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

pub fn debug_enabled(window: &Window) -> bool {
    let search = window.location().search().ok().unwrap_or_default();
    search.contains("debug=1") || search.contains("debug=true")
}

pub fn set_tool_button(button: &HtmlButtonElement, active: bool) {
    let pressed = if active { "true" } else { "false" };
    let _ = button.set_attribute("aria-pressed", pressed);
}

pub fn set_canvas_mode(canvas: &HtmlCanvasElement, mode: Mode, dragging: bool) {
    let cursor = match mode {
        Mode::Interaction => {
            if dragging {
                "grabbing"
            } else {
                "grab"
            }
        }
        Mode::Drawing => "crosshair",
    };
    let _ = canvas.style().set_property("cursor", cursor);
}

pub fn container_size(container: &HtmlElement) -> (f64, f64) {
    (
        f64::from(container.offset_width()),
        f64::from(container.offset_height()),
    )
}

/// Size the backing store for the device pixel ratio while keeping drawing
/// coordinates in CSS pixels.
pub fn size_canvas(window: &Window, surface: &CanvasSurface, width: f64, height: f64) {
    let canvas = surface.canvas();
    let dpr = window.device_pixel_ratio();
    canvas.set_width((width * dpr) as u32);
    canvas.set_height((height * dpr) as u32);
    let style = canvas.style();
    let _ = style.set_property("width", &format!("{width}px"));
    let _ = style.set_property("height", &format!("{height}px"));
    let _ = surface.context().set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
}

/// Pointer position relative to the canvas origin, in CSS pixels.
pub fn event_to_screen(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    Point {
        x: f64::from(event.client_x()) - rect.left(),
        y: f64::from(event.client_y()) - rect.top(),
    }
}
