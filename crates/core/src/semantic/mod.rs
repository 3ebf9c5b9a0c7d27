//! Semantic highlighting: the token legend and the tree-walking encoder.

pub mod encoder;
pub mod legend;

pub use encoder::{RawToken, SemanticTokenEncoder, decode, delta_encode, encode};
pub use legend::{TOKEN_MODIFIERS, TOKEN_TYPES, TokenModifier, TokenType, modifier_bitmask, modifiers_in};
