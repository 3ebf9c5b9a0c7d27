//! The fixed set of structural queries the engine compiles at startup.

pub mod calls;
pub mod declarations;
pub mod identifiers;
pub mod imports;
