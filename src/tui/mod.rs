pub mod app;
pub mod form;
pub mod input;
pub mod render;
pub mod theme;
pub mod undo;

pub use app::run;
