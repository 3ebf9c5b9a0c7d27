mod common;

use common::{all_backends, uri};
use std::thread;
use xtc_api::SymbolKind;

fn document(i: usize) -> String {
    format!("module m{i} {{\n    class C{i} {{\n        Int value{i};\n    }}\n}}\n")
}

#[test]
fn given_many_documents_when_compiled_in_parallel_then_each_result_is_its_own() {
    for (label, adapter) in all_backends() {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let adapter = adapter.clone();
                thread::spawn(move || {
                    for _ in 0..4 {
                        let result = adapter.compile(&uri(&format!("doc{i}")), &document(i));
                        assert!(result.success);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for i in 0..16 {
            let symbol = adapter
                .find_symbol_at(&uri(&format!("doc{i}")), 1, 11)
                .unwrap_or_else(|| panic!("{label}: doc{i} lost its class"));
            assert_eq!(symbol.name, format!("C{i}"), "{label}");
            assert_eq!(symbol.kind, SymbolKind::Class, "{label}");
        }
    }
}

#[test]
fn given_parallel_reads_and_closes_when_racing_then_no_panics() {
    let (_, adapter) = all_backends().remove(0);
    for i in 0..8 {
        adapter.compile(&uri(&format!("r{i}")), &document(i));
    }

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let adapter = adapter.clone();
            thread::spawn(move || {
                let doc = uri(&format!("r{i}"));
                for _ in 0..20 {
                    let _ = adapter.get_hover_info(&doc, 1, 11);
                    let _ = adapter.get_completions(&doc, 2, 0);
                    let _ = adapter.find_references(&doc, 1, 11, true);
                }
                if i % 2 == 0 {
                    adapter.close_document(&doc);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(adapter.find_symbol_at(&uri("r0"), 1, 11).is_none());
    assert!(adapter.find_symbol_at(&uri("r1"), 1, 11).is_some());
}
