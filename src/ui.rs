//! Terminal presentation layer

pub mod input;
pub mod scroll;
mod view;

pub use input::{InputAction, InputBuffer};
pub use scroll::ScrollState;
pub use view::draw;
