crate::decl_indices!(IdentifierIndices, {
    identifier => "identifier",
});

pub const IDENTIFIERS_SCM: &str = include_str!("identifiers.scm");
