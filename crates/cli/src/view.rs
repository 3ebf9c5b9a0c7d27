use tabled::settings::Style;
use tabled::{Table, Tabled};
use xtc_api::SymbolInfo;

/// One outline entry, indented by nesting depth.
#[derive(Tabled)]
pub struct OutlineRow {
    pub kind: String,
    pub name: String,
    pub line: usize,
    pub signature: String,
}

/// One decoded semantic token.
#[derive(Tabled, Debug, PartialEq, Eq)]
pub struct TokenRow {
    pub line: u32,
    pub column: u32,
    pub length: u32,
    #[tabled(rename = "type")]
    pub token_type: String,
    pub modifiers: String,
}

pub fn outline_rows(symbols: &[SymbolInfo]) -> Vec<OutlineRow> {
    fn push(symbol: &SymbolInfo, depth: usize, out: &mut Vec<OutlineRow>) {
        out.push(OutlineRow {
            kind: symbol.kind.to_string(),
            name: format!("{}{}", "  ".repeat(depth), symbol.name),
            line: symbol.location.range.start_line + 1,
            signature: symbol.type_signature.clone().unwrap_or_else(|| "-".to_string()),
        });
        for child in &symbol.children {
            push(child, depth + 1, out);
        }
    }

    let mut rows = Vec::new();
    for symbol in symbols {
        push(symbol, 0, &mut rows);
    }
    rows
}

pub fn table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::psql()).to_string()
}
