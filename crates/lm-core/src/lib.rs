pub mod color;
pub mod document;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;

pub use color::Color;
pub use document::{Document, DocumentChange, DocumentModel, ZOrder};
pub use error::DocumentError;
pub use geometry::Bounds;
pub use id::ObjectId;
pub use model::*;

// Re-export kurbo's point so downstream crates don't need a direct dependency
pub use kurbo::Point;
