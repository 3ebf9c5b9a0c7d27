mod common;

use common::{all_backends, find_symbol, uri};
use xtc_api::{Severity, SymbolKind};

#[test]
fn given_module_only_when_compile_then_single_module_symbol() {
    for (label, adapter) in all_backends() {
        let result = adapter.compile(&uri("app"), "module myapp {\n}");

        assert!(result.diagnostics.is_empty(), "{label}: {:?}", result.diagnostics);
        assert_eq!(result.symbols.len(), 1, "{label}");
        assert_eq!(result.symbols[0].name, "myapp", "{label}");
        assert_eq!(result.symbols[0].kind, SymbolKind::Module, "{label}");
        assert!(result.symbols[0].children.is_empty(), "{label}");
    }
}

#[test]
fn given_unclosed_braces_when_compile_then_error_reported_and_class_still_found() {
    let source = "module myapp {\n    class Person {\n";
    for (label, adapter) in all_backends() {
        let doc = uri("broken");
        let result = adapter.compile(&doc, source);

        assert!(!result.success, "{label}");
        assert!(
            result.diagnostics.iter().any(|d| d.severity == Severity::Error),
            "{label}"
        );

        let person = adapter
            .find_symbol_at(&doc, 1, 10)
            .unwrap_or_else(|| panic!("{label}: no symbol at Person"));
        assert_eq!(person.name, "Person", "{label}");
        assert_eq!(person.kind, SymbolKind::Class, "{label}");
    }
}

#[test]
fn given_position_past_end_when_lookup_then_none() {
    for (label, adapter) in all_backends() {
        let doc = uri("small");
        adapter.compile(&doc, "module myapp {\n    class Person {\n    }\n}\n");

        assert!(adapter.find_symbol_at(&doc, 9999, 0).is_none(), "{label}");
        assert!(adapter.get_hover_info(&doc, 9999, 0).is_none(), "{label}");
        assert!(adapter.find_definition(&doc, 9999, 0).is_none(), "{label}");
        assert!(adapter.find_references(&doc, 9999, 0, true).is_empty(), "{label}");
    }
}

#[test]
fn given_nested_declarations_when_compile_then_outline_is_nested() {
    let adapter = xtc_core::TreeAdapter::new().unwrap();
    let source = "module shop {
    class Cart {
        Int count = 0;
        void add(String item) {
        }
    }
}
";
    let result = xtc_api::CompilerAdapter::compile(&adapter, &uri("shop"), source);

    assert_eq!(result.symbols.len(), 1);
    let cart = &result.symbols[0].children[0];
    assert_eq!(cart.name, "Cart");
    assert_eq!(cart.qualified_name, "shop.Cart");
    let members: Vec<_> = cart.children.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(members, ["count", "add"]);

    let add = find_symbol(&result, "add").unwrap();
    assert_eq!(add.type_signature.as_deref(), Some("void add(String item)"));
    assert_eq!(add.qualified_name, "shop.Cart.add");
}

#[test]
fn given_recompile_when_diagnostics_fixed_then_replaced_not_merged() {
    for (label, adapter) in all_backends() {
        let doc = uri("edit");
        let broken = adapter.compile(&doc, "module myapp {\n    class Person {\n");
        assert!(!broken.diagnostics.is_empty(), "{label}");

        let fixed = adapter.compile(&doc, "module myapp {\n    class Person {\n    }\n}\n");
        assert!(fixed.diagnostics.is_empty(), "{label}: {:?}", fixed.diagnostics);
        assert!(fixed.success, "{label}");
    }
}

#[test]
fn given_closed_document_when_lookup_then_nothing_cached() {
    for (label, adapter) in all_backends() {
        let doc = uri("closed");
        adapter.compile(&doc, "module myapp {\n    class Person {\n    }\n}\n");
        assert!(adapter.find_symbol_at(&doc, 1, 10).is_some(), "{label}");

        adapter.close_document(&doc);
        assert!(adapter.find_symbol_at(&doc, 1, 10).is_none(), "{label}");
    }
}
