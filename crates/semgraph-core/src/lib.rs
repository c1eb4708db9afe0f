pub mod error;
pub mod graph;
pub mod id;
pub mod iri;
pub mod predicate;
pub mod vertex;
pub mod vocab;

// Re-export commonly used types
pub use error::GraphError;
pub use graph::{Direction, GraphStore};
pub use id::{EdgeId, VertexId};
pub use iri::Iri;
pub use predicate::PredicateRegistry;
pub use vertex::{Vertex, VertexKind};
