//! Layout calculation modules for composition
//!
//! This module handles all the geometric calculations:
//! - Sheet composition (which source page goes into which cell)
//! - Grid cell rectangles
//! - Content placement (rotation-aware fit, scaling, centering)

mod compose;
mod grid;
mod placement;
mod types;

pub use compose::*;
pub use grid::*;
pub use placement::*;
pub use types::*;
