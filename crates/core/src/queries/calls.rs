crate::decl_indices!(CallIndices, {
    call => "call",
    callee => "callee",
});

pub const CALLS_SCM: &str = include_str!("calls.scm");
