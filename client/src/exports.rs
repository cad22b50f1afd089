//! Functions callable from page scripts once the viewer has started.

use wasm_bindgen::prelude::*;

use mapview_shared::{Mode, Stroke};

use crate::state::{current, AppHandle};

fn app() -> Result<AppHandle, JsValue> {
    current().ok_or_else(|| js_sys::Error::new("Viewer has not started").into())
}

/// Switch between `"interaction"` (pan/zoom) and `"drawing"`.
#[wasm_bindgen(js_name = setMode)]
pub fn set_mode(name: &str) -> Result<(), JsValue> {
    let mode = Mode::from_name(name)
        .ok_or_else(|| js_sys::Error::new(&format!("Unknown mode: {name}")))?;
    app()?.set_mode(mode);
    Ok(())
}

#[wasm_bindgen(js_name = clearAnnotations)]
pub fn clear_annotations() -> Result<(), JsValue> {
    app()?.viewer.borrow_mut().clear();
    Ok(())
}

/// Replace all annotations with a JSON array of strokes
/// (`[{"color": "#rrggbb", "width": 3, "points": [{"x": 0, "y": 0}]}]`).
#[wasm_bindgen(js_name = loadAnnotations)]
pub fn load_annotations(json: &str) -> Result<(), JsValue> {
    let strokes: Vec<Stroke> = serde_json::from_str(json)
        .map_err(|err| js_sys::Error::new(&format!("Invalid annotations: {err}")))?;
    app()?.viewer.borrow_mut().initialize_strokes(strokes);
    Ok(())
}

#[wasm_bindgen]
pub fn redraw() -> Result<(), JsValue> {
    app()?.viewer.borrow_mut().redraw_all();
    Ok(())
}
