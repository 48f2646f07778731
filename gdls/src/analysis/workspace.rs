// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;

use crate::gdshader::{SemanticError, ShaderAnalysis, ShaderAnalyzer, ShaderDocument, ShaderParser};
use crate::tscn::{TscnDocument, TscnParser};

/// The family a document belongs to, inferred from its URI suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Tscn,
    GdShader,
    Unknown,
}

impl DocumentKind {
    #[must_use]
    pub fn from_uri(uri: &str) -> Self {
        let uri = uri.to_lowercase();
        if uri.ends_with(".tscn") || uri.ends_with(".escn") {
            return Self::Tscn;
        }
        if uri.ends_with(".gdshader") || uri.ends_with(".gdshaderinc") {
            return Self::GdShader;
        }
        Self::Unknown
    }
}

/// An open document together with everything derived from its content. The
/// struct is immutable after publication; updates replace the whole value.
#[derive(Debug)]
pub struct Document {
    pub uri: String,
    pub content: String,
    pub kind: DocumentKind,
    pub tscn: Option<TscnDocument>,
    pub shader: Option<ShaderDocument>,
    pub shader_analysis: Option<ShaderAnalysis>,
    pub version: i32,
}

impl Document {
    fn parse(uri: &str, content: String) -> Self {
        let kind = DocumentKind::from_uri(uri);

        let mut doc = Self {
            uri: uri.to_string(),
            content,
            kind,
            tscn: None,
            shader: None,
            shader_analysis: None,
            version: 0,
        };

        match kind {
            DocumentKind::Tscn => {
                doc.tscn = Some(TscnParser::parse(&doc.content));
            }
            DocumentKind::GdShader => {
                let shader = ShaderParser::parse(&doc.content);
                doc.shader_analysis = Some(ShaderAnalyzer::analyze(&shader));
                doc.shader = Some(shader);
            }
            DocumentKind::Unknown => {}
        }

        doc
    }

    #[must_use]
    pub fn shader_errors(&self) -> &[SemanticError] {
        self.shader_analysis
            .as_ref()
            .map(|analysis| analysis.errors.as_slice())
            .unwrap_or_default()
    }

    /// Converts a line/character position to a byte offset, clamping past
    /// the end of the line.
    #[must_use]
    pub fn position_to_offset(&self, line: usize, character: usize) -> usize {
        let mut offset = 0;

        for (index, line_content) in self.content.split('\n').enumerate() {
            if index == line {
                return offset + character.min(line_content.len());
            }
            offset += line_content.len() + 1;
        }

        offset.min(self.content.len())
    }

    /// Converts a byte offset back to a line/character position.
    #[must_use]
    pub fn offset_to_position(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.content.len());

        let mut line = 0;
        let mut line_start = 0;
        for (index, byte) in self.content.bytes().enumerate().take(offset) {
            if byte == b'\n' {
                line += 1;
                line_start = index + 1;
            }
        }

        (line, offset - line_start)
    }
}

/// The per-process store of open documents and workspace folders. Reads may
/// run concurrently; writes replace documents atomically.
#[derive(Debug, Default)]
pub struct Workspace {
    documents: DashMap<String, Arc<Document>>,
    folders: RwLock<Vec<String>>,
}

impl Workspace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&self, uri: impl Into<String>) {
        self.folders.write().expect("folder lock poisoned").push(uri.into());
    }

    #[must_use]
    pub fn folders(&self) -> Vec<String> {
        self.folders.read().expect("folder lock poisoned").clone()
    }

    /// Parses and stores a newly opened document at version 1.
    pub fn open(&self, uri: &str, content: String) -> Arc<Document> {
        let mut doc = Document::parse(uri, content);
        doc.version = 1;

        if doc.kind == DocumentKind::Unknown {
            log::warn!("opened document with unrecognized extension: {uri}");
        }

        let doc = Arc::new(doc);
        self.documents.insert(uri.to_string(), Arc::clone(&doc));
        doc
    }

    /// Reparses a document, bumping its version. Unknown URIs behave like
    /// [`Workspace::open`].
    pub fn update(&self, uri: &str, content: String) -> Arc<Document> {
        let mut doc = Document::parse(uri, content);
        doc.version = match self.documents.get(uri) {
            Some(existing) => existing.version + 1,
            None => 1,
        };

        let doc = Arc::new(doc);
        self.documents.insert(uri.to_string(), Arc::clone(&doc));
        doc
    }

    pub fn close(&self, uri: &str) {
        self.documents.remove(uri);
    }

    #[must_use]
    pub fn get(&self, uri: &str) -> Option<Arc<Document>> {
        self.documents.get(uri).map(|entry| Arc::clone(entry.value()))
    }

    #[must_use]
    pub fn all(&self) -> Vec<Arc<Document>> {
        self.documents.iter().map(|entry| Arc::clone(entry.value())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_kind_from_uri() {
        assert_eq!(DocumentKind::from_uri("file:///a/b.tscn"), DocumentKind::Tscn);
        assert_eq!(DocumentKind::from_uri("file:///a/b.ESCN"), DocumentKind::Tscn);
        assert_eq!(DocumentKind::from_uri("file:///a/b.gdshader"), DocumentKind::GdShader);
        assert_eq!(DocumentKind::from_uri("file:///a/b.gdshaderinc"), DocumentKind::GdShader);
        assert_eq!(DocumentKind::from_uri("file:///a/b.gd"), DocumentKind::Unknown);
    }

    #[test]
    fn open_update_close_cycle() {
        let workspace = Workspace::new();

        let doc = workspace.open("file:///scene.tscn", "[gd_scene format=3]".into());
        assert_eq!(doc.version, 1);
        assert!(doc.tscn.is_some());

        let doc = workspace.update("file:///scene.tscn", "[gd_scene format=3]\n".into());
        assert_eq!(doc.version, 2);

        workspace.close("file:///scene.tscn");
        assert!(workspace.get("file:///scene.tscn").is_none());
    }

    #[test]
    fn update_of_unknown_document_starts_at_version_one() {
        let workspace = Workspace::new();
        let doc = workspace.update("file:///fresh.gdshader", "shader_type spatial;".into());
        assert_eq!(doc.version, 1);
        assert!(doc.shader.is_some());
        assert!(doc.shader_analysis.is_some());
    }

    #[test]
    fn readers_keep_old_snapshots() {
        let workspace = Workspace::new();
        let before = workspace.open("file:///scene.tscn", "[gd_scene format=3]".into());
        let _after = workspace.update("file:///scene.tscn", "[gd_scene format=2]".into());

        // The previously obtained Arc still sees the old parse.
        assert_eq!(before.tscn.as_ref().unwrap().descriptor.as_ref().unwrap().format, 3);
        assert_eq!(
            workspace.get("file:///scene.tscn").unwrap()
                .tscn.as_ref().unwrap()
                .descriptor.as_ref().unwrap()
                .format,
            2,
        );
    }

    #[test]
    fn shader_documents_carry_semantic_errors() {
        let workspace = Workspace::new();
        let doc = workspace.open(
            "file:///shader.gdshader",
            "shader_type canvas_item;\nvoid fragment() { int y = 1.5; }".into(),
        );

        assert!(!doc.shader_errors().is_empty());
    }

    #[test]
    fn position_offset_round_trip() {
        let workspace = Workspace::new();
        let doc = workspace.open("file:///scene.tscn", "[gd_scene format=3]\nabc = 1".into());

        let offset = doc.position_to_offset(1, 4);
        assert_eq!(offset, 24);
        assert_eq!(doc.offset_to_position(offset), (1, 4));
    }
}
