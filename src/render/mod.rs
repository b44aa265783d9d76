pub mod colors;
pub mod compositor;
pub mod text;

pub use compositor::{compose, CloudItem, CloudStyle};
pub use text::TextRenderer;
