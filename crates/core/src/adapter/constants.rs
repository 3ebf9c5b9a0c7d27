use xtc_api::{CompletionKind, SymbolKind};

/// Keywords offered by completion.
pub const KEYWORDS: &[&str] = &[
    "module", "package", "import", "as", "class", "interface", "mixin", "service", "const",
    "enum", "public", "private", "protected", "static", "abstract", "extends", "implements",
    "incorporates", "delegates", "into", "if", "else", "switch", "case", "default", "for",
    "while", "do", "break", "continue", "return", "try", "catch", "finally", "throw", "using",
    "assert", "new", "this", "super", "outer", "is", "val", "var", "construct", "function",
    "typedef",
];

/// Types from the core library that every module can name.
pub const BUILT_IN_TYPES: &[&str] = &[
    "Int", "Int8", "Int16", "Int32", "Int64", "Int128", "IntN", "UInt", "UInt8", "UInt16",
    "UInt32", "UInt64", "UInt128", "UIntN", "Dec", "Dec32", "Dec64", "Dec128", "DecN", "Float",
    "Float16", "Float32", "Float64", "Float128", "FloatN", "String", "Char", "Boolean", "Bit",
    "Byte", "Object", "Enum", "Exception", "Const", "Service", "Module", "Package", "Array",
    "List", "Set", "Map", "Range", "Interval", "Tuple", "Function", "Method", "Property", "Type",
    "Class", "Nullable", "Orderable", "Hashable", "Stringable", "Iterator", "Iterable",
    "Collection", "Sequence", "void", "Null", "True", "False",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

pub fn completion_kind(kind: SymbolKind) -> CompletionKind {
    match kind {
        SymbolKind::Module | SymbolKind::Package => CompletionKind::Module,
        SymbolKind::Class
        | SymbolKind::Enum
        | SymbolKind::Const
        | SymbolKind::Mixin
        | SymbolKind::Service => CompletionKind::Class,
        SymbolKind::Interface => CompletionKind::Interface,
        SymbolKind::Method | SymbolKind::Constructor => CompletionKind::Method,
        SymbolKind::Property => CompletionKind::Property,
        SymbolKind::Parameter | SymbolKind::TypeParameter => CompletionKind::Variable,
    }
}
