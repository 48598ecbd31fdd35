//! Collaborators around the graph core.
//!
//! - `acquire`: turn a directory, `.zip` upload or repository URL into a local tree.
//! - `render`: hand DOT text to Graphviz to produce an image.

pub mod acquire;
pub mod render;

pub use acquire::{AcquiredInput, Acquirer, AcquisitionError, InputSource, DEFAULT_BRANCH};
pub use render::{GraphvizRenderer, RenderError, Renderer};
