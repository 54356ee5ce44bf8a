pub mod text;

pub use text::{NormalizedText, MAX_TEXT_CHARS};
