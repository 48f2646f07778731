// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

#![deny(elided_lifetimes_in_paths)]

//! Language front-end and analysis for Godot source assets: a lexer and
//! error-tolerant parser for the TSCN scene format, a parser and semantic
//! analyzer for the GDShader language, and the document workspace plus
//! position-based query services an LSP server is built on.

pub mod analysis;
pub mod gdshader;
pub mod tscn;
mod util;

pub use self::{
    analysis::{
        document_diagnostics,
        document_symbols,
        find_definition,
        find_references,
        folding_ranges,
        hover,
        tscn_diagnostics,
        tscn_semantic_tokens,
        Diagnostic,
        DiagnosticSeverity,
        Document,
        DocumentKind,
        FoldingRange,
        Location,
        OutlineSymbol,
        OutlineSymbolKind,
        Workspace,
    },
    util::{
        find_project_root,
        path_to_uri,
        resolve_resource_path,
        uri_to_path,
        SourceLocation,
        SourceRange,
    },
};
