pub mod config;
pub mod dot;
pub mod list;
pub mod render;
pub mod util;

pub use config::*;
pub use dot::*;
pub use list::*;
pub use render::*;
pub use util::*;
