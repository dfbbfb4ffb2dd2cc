// Code generation module: type mapping, declarations, batching and output
pub mod batch;
pub mod declaration;
pub mod output;
pub mod pipeline;
pub mod type_mapper;


pub use batch::*;
pub use declaration::*;
pub use output::*;
pub use pipeline::*;
pub use type_mapper::{TypeKind, TypeMapping, TypeRule};
