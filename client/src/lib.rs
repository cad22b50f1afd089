mod app;
mod dom;
mod exports;
mod loader;
mod render;
mod state;

pub use app::run;
pub use exports::{clear_annotations, load_annotations, redraw, set_mode};
