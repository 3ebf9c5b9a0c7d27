pub mod completion;
pub mod diagnostic;
pub mod editing;
pub mod position;
pub mod symbol;

pub use completion::*;
pub use diagnostic::*;
pub use editing::*;
pub use position::*;
pub use symbol::*;
