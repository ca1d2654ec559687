//! PDF rendering modules for composition
//!
//! This module handles all PDF-specific operations:
//! - Creating XObjects from source pages and raster images
//! - Building output pages and the page tree
//! - Deep copying PDF objects

mod image;
mod page;
mod xobject;

pub use image::create_image_xobject;
pub use page::PageTreeBuilder;
pub(crate) use page::placement_command;
pub use xobject::{copy_object_deep, create_page_xobject, get_page_dimensions, page_media_box};
