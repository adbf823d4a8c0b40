pub mod render;
pub mod tokens;

// Re-export key types for easier usage
pub use render::*;
pub use tokens::*;
