//! Review document rendering
//!
//! Renders an annotated incident batch and its statistical summary into a
//! human-readable document through a handlebars template. A built-in
//! markdown template is embedded; a custom template path can be configured
//! instead.

mod renderer;

pub use renderer::{format_duration, ReviewContext, ReviewRenderer, DEFAULT_TEMPLATE};
