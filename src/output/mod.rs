pub mod formatter;
pub mod write;

pub use formatter::{format_done, format_fetching, format_saved, should_use_colors};
pub use write::write_atomic;
