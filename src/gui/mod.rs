//! GUI module - Native chart windows

mod chart_window;

pub use chart_window::WindowRenderer;
