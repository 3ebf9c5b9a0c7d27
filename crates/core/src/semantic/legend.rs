//! The fixed token type and modifier legends sent to the editor once at startup.
//! Token data refers to types by index and to modifiers by bit position.

macro_rules! legend {
    ($(#[$meta:meta])* $name:ident, $list:ident, { $($variant:ident => $text:literal,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u32)]
        pub enum $name {
            $($variant,)*
        }

        pub const $list: &[&str] = &[$($text,)*];

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub fn as_str(self) -> &'static str {
                $list[self as usize]
            }

            pub fn index(self) -> u32 {
                self as u32
            }

            pub fn from_index(index: u32) -> Option<$name> {
                Self::ALL.get(index as usize).copied()
            }

            pub fn from_name(name: &str) -> Option<$name> {
                Self::ALL.iter().copied().find(|v| v.as_str() == name)
            }
        }
    };
}

legend!(
    /// Semantic token types, in legend order.
    TokenType, TOKEN_TYPES, {
    Namespace => "namespace",
    Type => "type",
    Class => "class",
    Enum => "enum",
    Interface => "interface",
    Struct => "struct",
    TypeParameter => "typeParameter",
    Parameter => "parameter",
    Variable => "variable",
    Property => "property",
    EnumMember => "enumMember",
    Event => "event",
    Function => "function",
    Method => "method",
    Macro => "macro",
    Keyword => "keyword",
    Modifier => "modifier",
    Comment => "comment",
    String => "string",
    Number => "number",
    Regexp => "regexp",
    Operator => "operator",
    Decorator => "decorator",
});

legend!(
    /// Semantic token modifiers; entry `i` is bit `1 << i` of a token's bitmask.
    TokenModifier, TOKEN_MODIFIERS, {
    Declaration => "declaration",
    Definition => "definition",
    Readonly => "readonly",
    Static => "static",
    Deprecated => "deprecated",
    Abstract => "abstract",
    Async => "async",
    Modification => "modification",
    Documentation => "documentation",
    DefaultLibrary => "defaultLibrary",
});

impl TokenModifier {
    pub fn bit(self) -> u32 {
        1 << self.index()
    }
}

/// Bitmask with the bit of every listed modifier set.
pub fn modifier_bitmask(modifiers: &[TokenModifier]) -> u32 {
    modifiers.iter().fold(0, |mask, m| mask | m.bit())
}

/// Modifiers whose bits are set in `mask`, in legend order.
pub fn modifiers_in(mask: u32) -> Vec<TokenModifier> {
    TokenModifier::ALL
        .iter()
        .copied()
        .filter(|m| mask & m.bit() != 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_order_is_fixed() {
        assert_eq!(TOKEN_TYPES.len(), 23);
        assert_eq!(TokenType::Namespace.index(), 0);
        assert_eq!(TokenType::Method.index(), 13);
        assert_eq!(TokenType::Decorator.index(), 22);
        assert_eq!(TokenType::TypeParameter.as_str(), "typeParameter");
        assert_eq!(TOKEN_MODIFIERS.len(), 10);
        assert_eq!(TokenModifier::DefaultLibrary.index(), 9);
    }

    #[test]
    fn test_name_lookup() {
        assert_eq!(TokenType::from_name("enumMember"), Some(TokenType::EnumMember));
        assert_eq!(TokenType::from_name("bogus"), None);
        assert_eq!(TokenType::from_index(2), Some(TokenType::Class));
        assert_eq!(TokenType::from_index(23), None);
        assert_eq!(TokenModifier::from_name("readonly"), Some(TokenModifier::Readonly));
    }

    #[test]
    fn test_bitmask() {
        let mask = modifier_bitmask(&[TokenModifier::Declaration, TokenModifier::Static]);
        assert_eq!(mask, 0b1001);
        assert_eq!(modifiers_in(mask), [TokenModifier::Declaration, TokenModifier::Static]);
        assert_eq!(modifier_bitmask(&[]), 0);
    }
}
