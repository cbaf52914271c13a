pub mod graph;
pub mod intersection;
pub mod loader;
pub mod prompt;
pub mod traversal;
pub mod vertex;


pub use graph::*;
pub use intersection::*;
pub use loader::*;
pub use prompt::*;
pub use traversal::*;
pub use vertex::*;
