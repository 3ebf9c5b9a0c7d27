crate::decl_indices!(ImportIndices, {
    import => "import",
    path => "path",
});

pub const IMPORTS_SCM: &str = include_str!("imports.scm");
