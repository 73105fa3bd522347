//! Rendering collaborator seam.
//!
//! The draw pass hands every visible leaf to a [`Renderer`]. [`DrawList`]
//! records the calls for hosts with their own toolkit; [`AnsiRenderer`] paints
//! them into a terminal.

mod core;

pub use core::{
    AnsiRenderer, DrawList, DrawnElement, Element, ElementContent, InputSource, Renderer,
    RendererSettings,
};
