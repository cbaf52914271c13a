pub mod config_manager;
pub mod direction;
pub mod error;
pub mod text;

pub use config_manager::*;
pub use direction::*;
pub use error::*;
pub use text::*;
