// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use gdls::{DiagnosticSeverity, SourceRange};
use tower_lsp::lsp_types::{
    self as lsp,
    Position,
    Range,
};

pub fn convert_range(range: SourceRange) -> Range {
    Range {
        start: Position {
            line: range.start().line() as u32,
            character: range.start().column() as u32,
        },
        end: Position {
            line: range.end().line() as u32,
            character: range.end().column() as u32,
        },
    }
}

pub fn convert_diagnostic(diagnostic: &gdls::Diagnostic) -> lsp::Diagnostic {
    lsp::Diagnostic {
        range: convert_range(diagnostic.range),
        severity: Some(match diagnostic.severity {
            DiagnosticSeverity::Error => lsp::DiagnosticSeverity::ERROR,
            DiagnosticSeverity::Warning => lsp::DiagnosticSeverity::WARNING,
        }),
        source: Some("gdls".to_string()),
        message: diagnostic.message.clone(),
        ..lsp::Diagnostic::default()
    }
}

pub fn convert_location(location: &gdls::Location) -> Option<lsp::Location> {
    Some(lsp::Location {
        uri: lsp::Url::parse(&location.uri).ok()?,
        range: convert_range(location.range),
    })
}

pub fn convert_symbol_kind(kind: gdls::OutlineSymbolKind) -> lsp::SymbolKind {
    use gdls::OutlineSymbolKind;

    match kind {
        OutlineSymbolKind::File => lsp::SymbolKind::FILE,
        OutlineSymbolKind::Namespace => lsp::SymbolKind::NAMESPACE,
        OutlineSymbolKind::Class => lsp::SymbolKind::CLASS,
        OutlineSymbolKind::Object => lsp::SymbolKind::OBJECT,
        OutlineSymbolKind::Event => lsp::SymbolKind::EVENT,
        OutlineSymbolKind::Variable => lsp::SymbolKind::VARIABLE,
        OutlineSymbolKind::Constant => lsp::SymbolKind::CONSTANT,
        OutlineSymbolKind::Struct => lsp::SymbolKind::STRUCT,
        OutlineSymbolKind::Field => lsp::SymbolKind::FIELD,
        OutlineSymbolKind::Function => lsp::SymbolKind::FUNCTION,
        OutlineSymbolKind::Module => lsp::SymbolKind::MODULE,
    }
}

pub fn convert_outline_symbol(symbol: &gdls::OutlineSymbol) -> lsp::DocumentSymbol {
    #[allow(deprecated)]
    lsp::DocumentSymbol {
        name: symbol.name.clone(),
        detail: if symbol.detail.is_empty() {
            None
        } else {
            Some(symbol.detail.clone())
        },
        kind: convert_symbol_kind(symbol.kind),
        tags: None,
        deprecated: None,
        range: convert_range(symbol.range),
        selection_range: convert_range(symbol.range),
        children: if symbol.children.is_empty() {
            None
        } else {
            Some(symbol.children.iter().map(convert_outline_symbol).collect())
        },
    }
}
