//! Schema introspection adapters.
//!
//! Reads the persistence schema from disk and turns one declared model into a
//! [`ModelDescriptor`](modforge_core::ModelDescriptor).

pub mod adapter;
pub mod prisma;
pub mod reader;

pub use adapter::Adapter;
pub use prisma::{PrismaAdapter, introspect_prisma_model, parse_prisma_schema};
pub use reader::{SchemaText, read_schema};

pub use modforge_core::ModelDescriptor;
