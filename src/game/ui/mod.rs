//! UI Module
//!
//! Screen-space overlays drawn with the label pass.

pub mod text;

pub use text::{draw_label, draw_text, get_char_bitmap, project_to_screen, text_width};
