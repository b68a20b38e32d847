//! Rust code generation modules.

pub mod collections;
pub mod enums;
pub mod names;
pub mod naming;
pub mod structs;
pub mod types;

pub use collections::CollectionGenerator;
pub use enums::EnumGenerator;
pub use names::{IdentScope, ModuleNames};
pub use structs::{StructGenerator, StructKind};
