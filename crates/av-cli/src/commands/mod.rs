pub mod analyze;
pub mod format;
pub mod render;
