mod app;
pub mod components;
pub(crate) mod form;
pub(crate) mod key_handler;
mod layout;

pub use app::App;
pub use layout::{Layout, LayoutAreas};
