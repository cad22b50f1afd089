use std::cell::RefCell;
use std::rc::Rc;

use web_sys::HtmlButtonElement;

use mapview_shared::{Mode, Viewport};

use crate::dom::{set_canvas_mode, set_tool_button};
use crate::render::CanvasSurface;

pub type SharedViewport = Rc<RefCell<Viewport<CanvasSurface>>>;

/// Optional toolbar controls found on the page.
#[derive(Clone, Default)]
pub struct ToolButtons {
    pub pan: Option<HtmlButtonElement>,
    pub draw: Option<HtmlButtonElement>,
}

/// Everything an event handler or JS export needs to reach the viewer.
#[derive(Clone)]
pub struct AppHandle {
    pub viewer: SharedViewport,
    pub tools: ToolButtons,
}

impl AppHandle {
    pub fn set_mode(&self, mode: Mode) {
        let mut viewer = self.viewer.borrow_mut();
        viewer.set_mode(mode);
        self.sync_ui(&viewer);
    }

    pub fn sync_ui(&self, viewer: &Viewport<CanvasSurface>) {
        let mode = viewer.mode();
        if let Some(button) = &self.tools.pan {
            set_tool_button(button, mode == Mode::Interaction);
        }
        if let Some(button) = &self.tools.draw {
            set_tool_button(button, mode == Mode::Drawing);
        }
        set_canvas_mode(
            viewer.surface().canvas(),
            mode,
            viewer.controller().is_dragging(),
        );
    }
}

thread_local! {
    static APP: RefCell<Option<AppHandle>> = const { RefCell::new(None) };
}

pub fn install(app: AppHandle) {
    APP.with(|slot| *slot.borrow_mut() = Some(app));
}

pub fn current() -> Option<AppHandle> {
    APP.with(|slot| slot.borrow().clone())
}
