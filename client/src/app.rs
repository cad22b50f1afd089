use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Event, HtmlButtonElement, HtmlCanvasElement, HtmlElement,
    KeyboardEvent, PointerEvent, WheelEvent,
};

use mapview_shared::{clamp_viewport, InputEvent, Mode, PointerButton, Viewport, ViewerConfig};

use crate::dom::{
    container_size, debug_enabled, event_to_screen, get_element, optional_element, size_canvas,
};
use crate::loader::load_image;
use crate::render::CanvasSurface;
use crate::state::{install, AppHandle, ToolButtons};

const MAP_CONTAINER_ID: &str = "map";
/// Pixels moved per arrow-key press.
const KEY_PAN_STEP: f64 = 40.0;

fn document_ready_state(document: &web_sys::Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document_ready_state(&document).as_deref() == Some("complete") {
        started.set(true);
        return start_app();
    }

    let onload_started = started.clone();
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if onload_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let level = if debug_enabled(&window) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    if console_log::init_with_level(level).is_err() {
        web_sys::console::warn_1(&"Logger was already installed".into());
    }

    let container: HtmlElement = get_element(&document, MAP_CONTAINER_ID)?;
    let map_url = container
        .get_attribute("data-map-url")
        .ok_or_else(|| JsValue::from_str("Missing data-map-url on map container"))?;
    let config = container
        .get_attribute("data-config")
        .map(|text| ViewerConfig::from_json_or_default(&text))
        .unwrap_or_default();

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    container.append_child(&canvas)?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let (width, height) = container_size(&container);
    let viewport = Viewport::new(config, width, height, CanvasSurface::new(canvas.clone(), ctx));
    size_canvas(
        &window,
        viewport.surface(),
        viewport.state().width,
        viewport.state().height,
    );
    log::debug!(
        "Viewport {}x{} (container {width}x{height})",
        viewport.state().width,
        viewport.state().height
    );

    let app = AppHandle {
        viewer: Rc::new(RefCell::new(viewport)),
        tools: ToolButtons {
            pan: optional_element(&document, "mode-pan"),
            draw: optional_element(&document, "mode-draw"),
        },
    };
    install(app.clone());
    app.sync_ui(&app.viewer.borrow());

    wire_pointer_events(&app, &canvas)?;
    wire_wheel(&app, &canvas)?;
    wire_keyboard(&app, &window)?;
    wire_toolbar(&app, &document)?;

    {
        let resize_app = app.clone();
        let resize_window = window.clone();
        let resize_container = container.clone();
        let onresize = Closure::<dyn FnMut()>::new(move || {
            let mut viewer = resize_app.viewer.borrow_mut();
            let (width, height) = container_size(&resize_container);
            let (width, height) = clamp_viewport(&viewer.state().config, width, height);
            size_canvas(&resize_window, viewer.surface(), width, height);
            viewer.resize(width, height);
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    let load_app = app.clone();
    wasm_bindgen_futures::spawn_local(async move {
        match load_image(&map_url).await {
            Ok((image, size)) => {
                let mut viewer = load_app.viewer.borrow_mut();
                viewer.surface_mut().set_image(image);
                viewer.image_loaded(size);
            }
            Err(err) => log::error!("Failed to load map image {map_url}: {err:?}"),
        }
    });

    Ok(())
}

fn wire_pointer_events(app: &AppHandle, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    {
        let down_app = app.clone();
        let down_canvas = canvas.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let position = event_to_screen(&down_canvas, &event);
            let button = PointerButton::from_dom(event.button());
            if button == PointerButton::Primary {
                event.prevent_default();
            }
            let mut viewer = down_app.viewer.borrow_mut();
            viewer.handle_input(InputEvent::PointerDown { position, button });
            down_app.sync_ui(&viewer);
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_app = app.clone();
        let move_canvas = canvas.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let position = event_to_screen(&move_canvas, &event);
            move_app
                .viewer
                .borrow_mut()
                .handle_input(InputEvent::PointerMove { position });
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let stop_app = app.clone();
        let stop_canvas = canvas.clone();
        let onstop = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let input = if event.type_() == "pointerup" {
                InputEvent::PointerUp {
                    position: event_to_screen(&stop_canvas, &event),
                }
            } else {
                InputEvent::PointerLeave
            };
            let mut viewer = stop_app.viewer.borrow_mut();
            viewer.handle_input(input);
            stop_app.sync_ui(&viewer);
        });
        canvas.add_event_listener_with_callback("pointerup", onstop.as_ref().unchecked_ref())?;
        canvas
            .add_event_listener_with_callback("pointercancel", onstop.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback("pointerleave", onstop.as_ref().unchecked_ref())?;
        onstop.forget();
    }

    Ok(())
}

fn wire_wheel(app: &AppHandle, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let zoom_app = app.clone();
    let zoom_canvas = canvas.clone();
    let onwheel = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let wheel_event = match event.dyn_into::<WheelEvent>() {
            Ok(event) => event,
            Err(_) => return,
        };
        wheel_event.prevent_default();
        let position = event_to_screen(&zoom_canvas, &wheel_event);
        zoom_app.viewer.borrow_mut().handle_input(InputEvent::Wheel {
            position,
            delta_y: wheel_event.delta_y(),
        });
    });
    canvas.add_event_listener_with_callback("wheel", onwheel.as_ref().unchecked_ref())?;
    onwheel.forget();
    Ok(())
}

fn wire_keyboard(app: &AppHandle, window: &web_sys::Window) -> Result<(), JsValue> {
    let key_app = app.clone();
    let onkeydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        if event.meta_key() || event.ctrl_key() || event.alt_key() {
            return;
        }
        let mut viewer = key_app.viewer.borrow_mut();
        match event.key().as_str() {
            "+" | "=" => viewer.zoom_step(1),
            "-" | "_" => viewer.zoom_step(-1),
            "0" => viewer.reset_view(),
            "ArrowLeft" => viewer.pan_by(KEY_PAN_STEP, 0.0),
            "ArrowRight" => viewer.pan_by(-KEY_PAN_STEP, 0.0),
            "ArrowUp" => viewer.pan_by(0.0, KEY_PAN_STEP),
            "ArrowDown" => viewer.pan_by(0.0, -KEY_PAN_STEP),
            _ => return,
        }
        event.prevent_default();
    });
    window.add_event_listener_with_callback("keydown", onkeydown.as_ref().unchecked_ref())?;
    onkeydown.forget();
    Ok(())
}

fn wire_toolbar(app: &AppHandle, document: &web_sys::Document) -> Result<(), JsValue> {
    let mode_buttons = [
        (app.tools.pan.clone(), Mode::Interaction),
        (app.tools.draw.clone(), Mode::Drawing),
    ];
    for (button, mode) in mode_buttons {
        let Some(button) = button else {
            continue;
        };
        let click_app = app.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            click_app.set_mode(mode);
        });
        button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    if let Some(clear_button) = optional_element::<HtmlButtonElement>(document, "clear") {
        let clear_app = app.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            clear_app.viewer.borrow_mut().clear();
        });
        clear_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    if let Some(home_button) = optional_element::<HtmlButtonElement>(document, "home") {
        let home_app = app.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            home_app.viewer.borrow_mut().reset_view();
        });
        home_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    Ok(())
}
