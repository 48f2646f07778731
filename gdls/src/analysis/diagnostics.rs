// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::collections::HashSet;

use crate::tscn::{TscnDocument, TscnValue};
use crate::SourceRange;

use super::{Document, DocumentKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub range: SourceRange,
    pub severity: DiagnosticSeverity,
    pub message: String,
}

impl Diagnostic {
    fn error(range: SourceRange, message: String) -> Self {
        Self {
            range,
            severity: DiagnosticSeverity::Error,
            message,
        }
    }

    fn warning(range: SourceRange, message: String) -> Self {
        Self {
            range,
            severity: DiagnosticSeverity::Warning,
            message,
        }
    }
}

/// All diagnostics for one document, in publication order.
#[must_use]
pub fn document_diagnostics(document: &Document) -> Vec<Diagnostic> {
    match document.kind {
        DocumentKind::Tscn => {
            document.tscn.as_ref().map(tscn_diagnostics).unwrap_or_default()
        }
        DocumentKind::GdShader => {
            let mut diagnostics = Vec::new();

            if let Some(shader) = &document.shader {
                for error in &shader.errors {
                    diagnostics.push(Diagnostic::error(error.range, error.message.clone()));
                }
            }
            for error in document.shader_errors() {
                diagnostics.push(Diagnostic::error(error.range, error.message.clone()));
            }

            diagnostics
        }
        DocumentKind::Unknown => Vec::new(),
    }
}

/// The TSCN cross-reference pass: parse errors, format check, resource
/// reference validation, parent validation and duplicate-ID detection.
#[must_use]
pub fn tscn_diagnostics(doc: &TscnDocument) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for error in &doc.errors {
        diagnostics.push(Diagnostic::error(error.range, error.message()));
    }

    if let Some(descriptor) = &doc.descriptor {
        if descriptor.format != 3 {
            diagnostics.push(Diagnostic::error(
                descriptor.range,
                "Only format=3 (Godot 4.x) is supported".to_string(),
            ));
        }
    }

    check_resource_references(doc, &mut diagnostics);
    check_parent_references(doc, &mut diagnostics);
    check_duplicate_ids(doc, &mut diagnostics);

    diagnostics
}

fn check_resource_references(doc: &TscnDocument, diagnostics: &mut Vec<Diagnostic>) {
    let ext_ids: HashSet<&str> = doc.ext_resources.iter().map(|ext| ext.id.as_str()).collect();
    let sub_ids: HashSet<&str> = doc.sub_resources.iter().map(|sub| sub.id.as_str()).collect();

    let mut check_value = |value: &TscnValue| {
        let TscnValue::ResourceRef(reference) = value else {
            return;
        };

        let valid = match reference.ref_type {
            crate::tscn::ResourceRefKind::ExtResource => ext_ids.contains(reference.id.as_str()),
            crate::tscn::ResourceRefKind::SubResource => sub_ids.contains(reference.id.as_str()),
        };

        if !valid {
            diagnostics.push(Diagnostic::error(
                reference.range,
                format!("Reference to undefined resource: {}", reference.id),
            ));
        }
    };

    for sub in &doc.sub_resources {
        for property in &sub.properties {
            walk_value(&property.value, &mut check_value);
        }
    }

    for node in &doc.nodes {
        if let Some(instance) = &node.instance {
            check_value(instance);
        }
        for property in &node.properties {
            walk_value(&property.value, &mut check_value);
        }
    }
}

fn check_parent_references(doc: &TscnDocument, diagnostics: &mut Vec<Diagnostic>) {
    let mut node_paths = HashSet::new();
    let mut root_name = "";

    for node in &doc.nodes {
        if node.parent.is_empty() {
            root_name = &node.name;
            node_paths.insert(String::new());
            node_paths.insert(".".to_string());
        } else {
            node_paths.insert(node.path());
        }
    }

    for node in &doc.nodes {
        if node.parent.is_empty() || node.parent == "." {
            continue;
        }

        if !node_paths.contains(&node.parent) && node.parent != root_name {
            diagnostics.push(Diagnostic::warning(
                node.range,
                format!("Parent node not found: {}", node.parent),
            ));
        }
    }
}

fn check_duplicate_ids(doc: &TscnDocument, diagnostics: &mut Vec<Diagnostic>) {
    let mut ext_ids = HashSet::new();
    for ext in &doc.ext_resources {
        if !ext_ids.insert(&ext.id) {
            diagnostics.push(Diagnostic::error(
                ext.range,
                format!("Duplicate external resource ID: {}", ext.id),
            ));
        }
    }

    let mut sub_ids = HashSet::new();
    for sub in &doc.sub_resources {
        if !sub_ids.insert(&sub.id) {
            diagnostics.push(Diagnostic::error(
                sub.range,
                format!("Duplicate sub-resource ID: {}", sub.id),
            ));
        }
    }
}

/// Recursively visits a value and every value nested inside it.
pub fn walk_value(value: &TscnValue, visit: &mut impl FnMut(&TscnValue)) {
    visit(value);

    match value {
        TscnValue::Array(array) => {
            for element in &array.values {
                walk_value(element, visit);
            }
        }
        TscnValue::Dict(dict) => {
            for entry in &dict.entries {
                walk_value(&entry.key, visit);
                walk_value(&entry.value, visit);
            }
        }
        TscnValue::Typed(typed) => {
            for argument in &typed.arguments {
                walk_value(argument, visit);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tscn::TscnParser;

    fn diagnostics_for(source: &str) -> Vec<Diagnostic> {
        tscn_diagnostics(&TscnParser::parse(source))
    }

    #[test]
    fn clean_scene_has_no_diagnostics() {
        let diagnostics = diagnostics_for(concat!(
            "[gd_scene load_steps=2 format=3]\n",
            "[ext_resource type=\"Texture2D\" path=\"res://t.png\" id=\"1_a\"]\n",
            "[node name=\"Root\" type=\"Node3D\"]\n",
            "texture = ExtResource(\"1_a\")\n",
        ));
        assert!(diagnostics.is_empty(), "got: {diagnostics:?}");
    }

    #[test]
    fn unsupported_format_is_reported() {
        let diagnostics = diagnostics_for("[gd_scene format=2]");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Only format=3 (Godot 4.x) is supported");
        assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Error);
    }

    #[test]
    fn undefined_resource_reference() {
        let diagnostics = diagnostics_for(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "script = ExtResource(\"1_missing\")\n",
        ));
        assert!(diagnostics.iter().any(|diagnostic| {
            diagnostic.message == "Reference to undefined resource: 1_missing"
        }));
    }

    #[test]
    fn references_nested_in_arrays_and_dicts_are_checked() {
        let diagnostics = diagnostics_for(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "data = { \"shape\": [SubResource(\"nope\")] }\n",
        ));
        assert!(diagnostics.iter().any(|diagnostic| {
            diagnostic.message == "Reference to undefined resource: nope"
        }));
    }

    #[test]
    fn missing_parent_is_a_warning() {
        let diagnostics = diagnostics_for(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "[node name=\"Child\" type=\"Node\" parent=\"Ghost\"]\n",
        ));

        let warning = diagnostics.iter()
            .find(|diagnostic| diagnostic.message == "Parent node not found: Ghost")
            .expect("expected a parent warning");
        assert_eq!(warning.severity, DiagnosticSeverity::Warning);
    }

    #[test]
    fn valid_parent_chains_pass() {
        let diagnostics = diagnostics_for(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "[node name=\"Arm\" type=\"Node\" parent=\".\"]\n",
            "[node name=\"Hand\" type=\"Node\" parent=\"Arm\"]\n",
            "[node name=\"Finger\" type=\"Node\" parent=\"Arm/Hand\"]\n",
        ));
        assert!(diagnostics.is_empty(), "got: {diagnostics:?}");
    }

    #[test]
    fn duplicate_ids_are_reported_at_later_occurrences() {
        let diagnostics = diagnostics_for(concat!(
            "[gd_scene format=3]\n",
            "[ext_resource type=\"Script\" path=\"res://a.gd\" id=\"1\"]\n",
            "[ext_resource type=\"Script\" path=\"res://b.gd\" id=\"1\"]\n",
            "[sub_resource type=\"BoxShape3D\" id=\"S\"]\n",
            "[sub_resource type=\"BoxShape3D\" id=\"S\"]\n",
        ));

        let ext = diagnostics.iter()
            .find(|diagnostic| diagnostic.message == "Duplicate external resource ID: 1")
            .expect("expected an ext duplicate");
        assert_eq!(ext.range.start().line(), 2);

        assert!(diagnostics.iter().any(|diagnostic| {
            diagnostic.message == "Duplicate sub-resource ID: S"
        }));
    }

    #[test]
    fn parse_errors_become_diagnostics() {
        let diagnostics = diagnostics_for(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "data = { \"key\" 1 }\n",
        ));
        assert!(!diagnostics.is_empty());
        assert!(diagnostics.iter().all(|diagnostic| diagnostic.severity == DiagnosticSeverity::Error));
    }
}
