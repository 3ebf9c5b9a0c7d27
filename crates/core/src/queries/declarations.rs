crate::decl_indices!(DeclarationIndices, {
    name => "name",
    module => "module",
    package => "package",
    class => "class",
    interface => "interface",
    mixin => "mixin",
    service => "service",
    constant => "const",
    enumeration => "enum",
    method => "method",
    property => "property",
    constructor => "constructor",
});

pub const DECLARATIONS_SCM: &str = include_str!("declarations.scm");
