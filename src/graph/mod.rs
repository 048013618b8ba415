/// In-memory graph model that reference searches write usage edges into.
pub mod scene;

pub use scene::{SceneEdge, SceneGraph};
