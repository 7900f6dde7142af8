//! PDF manipulation module

pub mod builder;
pub mod metadata;
pub mod page;
pub mod resize;

// Re-export commonly used items
pub use builder::OutputDocument;
pub use metadata::{count_pages, page_sizes};
pub use page::Rect;
pub use resize::{resize_one, ResizeOptions, ResizedDocument};
