// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::collections::HashMap;

use crate::tscn::SceneNode;
use crate::SourceRange;

use super::{Document, DocumentKind};

/// A protocol-neutral outline symbol; the LSP layer maps the kind onto the
/// client's `SymbolKind` table.
#[derive(Debug, Clone)]
pub struct OutlineSymbol {
    pub name: String,
    pub detail: String,
    pub kind: OutlineSymbolKind,
    pub range: SourceRange,
    pub children: Vec<OutlineSymbol>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineSymbolKind {
    File,
    Namespace,
    Class,
    Object,
    Event,
    Variable,
    Constant,
    Struct,
    Field,
    Function,
    Module,
}

/// A foldable region spanning whole lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldingRange {
    pub start_line: usize,
    pub end_line: usize,
}

/// The outline tree for a document: the reconstructed node hierarchy plus
/// resource and connection groups for TSCN, the top-level declarations for
/// GDShader.
#[must_use]
pub fn document_symbols(document: &Document) -> Vec<OutlineSymbol> {
    match document.kind {
        DocumentKind::Tscn => document.tscn.as_ref().map(tscn_symbols).unwrap_or_default(),
        DocumentKind::GdShader => document.shader.as_ref().map(shader_symbols).unwrap_or_default(),
        DocumentKind::Unknown => Vec::new(),
    }
}

fn tscn_symbols(ast: &crate::tscn::TscnDocument) -> Vec<OutlineSymbol> {
    let mut symbols = Vec::new();

    symbols.extend(node_tree(&ast.nodes));

    if !ast.ext_resources.is_empty() {
        let children: Vec<OutlineSymbol> = ast.ext_resources.iter()
            .map(|ext| OutlineSymbol {
                name: ext.id.clone(),
                detail: format!("{} - {}", ext.resource_type, ext.path),
                kind: OutlineSymbolKind::File,
                range: ext.range,
                children: Vec::new(),
            })
            .collect();

        symbols.push(OutlineSymbol {
            name: "External Resources".to_string(),
            detail: String::new(),
            kind: OutlineSymbolKind::Namespace,
            range: children[0].range,
            children,
        });
    }

    if !ast.sub_resources.is_empty() {
        let children: Vec<OutlineSymbol> = ast.sub_resources.iter()
            .map(|sub| OutlineSymbol {
                name: sub.id.clone(),
                detail: sub.resource_type.clone(),
                kind: OutlineSymbolKind::Object,
                range: sub.range,
                children: Vec::new(),
            })
            .collect();

        symbols.push(OutlineSymbol {
            name: "Sub Resources".to_string(),
            detail: String::new(),
            kind: OutlineSymbolKind::Namespace,
            range: children[0].range,
            children,
        });
    }

    if !ast.connections.is_empty() {
        let children: Vec<OutlineSymbol> = ast.connections.iter()
            .map(|connection| OutlineSymbol {
                name: format!("{} -> {}", connection.signal, connection.method),
                detail: format!("{} -> {}", connection.from, connection.to),
                kind: OutlineSymbolKind::Event,
                range: connection.range,
                children: Vec::new(),
            })
            .collect();

        symbols.push(OutlineSymbol {
            name: "Connections".to_string(),
            detail: String::new(),
            kind: OutlineSymbolKind::Namespace,
            range: children[0].range,
            children,
        });
    }

    symbols
}

/// Rebuilds the scene tree from parent paths and returns the root symbol.
fn node_tree(nodes: &[SceneNode]) -> Vec<OutlineSymbol> {
    let mut children_of: HashMap<String, Vec<&SceneNode>> = HashMap::new();
    let mut root = None;

    for node in nodes {
        if node.parent.is_empty() {
            root = Some(node);
            continue;
        }

        let parent_path = if node.parent == "." {
            String::new()
        } else {
            node.parent.clone()
        };
        children_of.entry(parent_path).or_default().push(node);
    }

    let Some(root) = root else {
        return Vec::new();
    };

    vec![build_node_symbol(root, "", &children_of)]
}

fn build_node_symbol(
    node: &SceneNode,
    path: &str,
    children_of: &HashMap<String, Vec<&SceneNode>>,
) -> OutlineSymbol {
    let detail = if node.node_type.is_empty() {
        "(instance)".to_string()
    } else {
        node.node_type.clone()
    };

    let kind = if node.node_type.is_empty() {
        OutlineSymbolKind::Module
    } else {
        OutlineSymbolKind::Class
    };

    let mut symbol = OutlineSymbol {
        name: node.name.clone(),
        detail,
        kind,
        range: node.range,
        children: Vec::new(),
    };

    if let Some(children) = children_of.get(path) {
        for child in children {
            let child_path = if path.is_empty() {
                child.name.clone()
            } else {
                format!("{path}/{}", child.name)
            };
            symbol.children.push(build_node_symbol(child, &child_path, children_of));
        }
    }

    symbol
}

fn shader_symbols(ast: &crate::gdshader::ShaderDocument) -> Vec<OutlineSymbol> {
    let mut symbols = Vec::new();

    for uniform in &ast.uniforms {
        symbols.push(OutlineSymbol {
            name: uniform.name.clone(),
            detail: format!("uniform {}", uniform.ty.name),
            kind: OutlineSymbolKind::Variable,
            range: uniform.range,
            children: Vec::new(),
        });
    }

    for varying in &ast.varyings {
        symbols.push(OutlineSymbol {
            name: varying.name.clone(),
            detail: format!("varying {}", varying.ty.name),
            kind: OutlineSymbolKind::Variable,
            range: varying.range,
            children: Vec::new(),
        });
    }

    for constant in &ast.constants {
        symbols.push(OutlineSymbol {
            name: constant.name.clone(),
            detail: format!("const {}", constant.ty.name),
            kind: OutlineSymbolKind::Constant,
            range: constant.range,
            children: Vec::new(),
        });
    }

    for decl in &ast.structs {
        let members = decl.members.iter()
            .map(|member| OutlineSymbol {
                name: member.name.clone(),
                detail: member.ty.name.clone(),
                kind: OutlineSymbolKind::Field,
                range: member.range,
                children: Vec::new(),
            })
            .collect();

        symbols.push(OutlineSymbol {
            name: decl.name.clone(),
            detail: "struct".to_string(),
            kind: OutlineSymbolKind::Struct,
            range: decl.range,
            children: members,
        });
    }

    for function in &ast.functions {
        symbols.push(OutlineSymbol {
            name: function.name.clone(),
            detail: function.return_type.name.clone(),
            kind: OutlineSymbolKind::Function,
            range: function.range,
            children: Vec::new(),
        });
    }

    symbols
}

/// Folding regions: one per sub_resource or node whose properties span
/// more than one line.
#[must_use]
pub fn folding_ranges(document: &Document) -> Vec<FoldingRange> {
    let Some(ast) = document.tscn.as_ref() else {
        return Vec::new();
    };

    let mut ranges = Vec::new();

    for sub in &ast.sub_resources {
        if !sub.properties.is_empty() && sub.range.end().line() > sub.range.start().line() {
            ranges.push(FoldingRange {
                start_line: sub.range.start().line(),
                end_line: sub.range.end().line(),
            });
        }
    }

    for node in &ast.nodes {
        if !node.properties.is_empty() && node.range.end().line() > node.range.start().line() {
            ranges.push(FoldingRange {
                start_line: node.range.start().line(),
                end_line: node.range.end().line(),
            });
        }
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Workspace;

    fn open(uri: &str, source: &str) -> std::sync::Arc<Document> {
        let workspace = Workspace::new();
        workspace.open(uri, source.to_string())
    }

    #[test]
    fn node_tree_is_hierarchical() {
        let doc = open("file:///a.tscn", concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "[node name=\"Arm\" type=\"Node3D\" parent=\".\"]\n",
            "[node name=\"Hand\" type=\"Node3D\" parent=\"Arm\"]\n",
        ));

        let symbols = document_symbols(&doc);
        let root = symbols.iter().find(|symbol| symbol.name == "Root").expect("expected the root");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "Arm");
        assert_eq!(root.children[0].children[0].name, "Hand");
    }

    #[test]
    fn resources_and_connections_are_grouped() {
        let doc = open("file:///a.tscn", concat!(
            "[gd_scene format=3]\n",
            "[ext_resource type=\"Script\" path=\"res://s.gd\" id=\"1\"]\n",
            "[sub_resource type=\"BoxShape3D\" id=\"Box\"]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "[connection signal=\"pressed\" from=\".\" to=\".\" method=\"_on_pressed\"]\n",
        ));

        let symbols = document_symbols(&doc);
        let groups: Vec<&str> = symbols.iter().map(|symbol| symbol.name.as_str()).collect();
        assert!(groups.contains(&"External Resources"));
        assert!(groups.contains(&"Sub Resources"));
        assert!(groups.contains(&"Connections"));
    }

    #[test]
    fn shader_outline_lists_declarations() {
        let doc = open("file:///a.gdshader", concat!(
            "shader_type spatial;\n",
            "uniform float strength;\n",
            "varying vec3 world_pos;\n",
            "const float SCALE = 2.0;\n",
            "struct Light { vec3 position; };\n",
            "void vertex() { }\n",
        ));

        let symbols = document_symbols(&doc);
        let names: Vec<&str> = symbols.iter().map(|symbol| symbol.name.as_str()).collect();
        assert_eq!(names, ["strength", "world_pos", "SCALE", "Light", "vertex"]);

        let light = symbols.iter().find(|symbol| symbol.name == "Light").unwrap();
        assert_eq!(light.children.len(), 1);
        assert_eq!(light.children[0].name, "position");
    }

    #[test]
    fn folding_covers_multi_line_sections() {
        let doc = open("file:///a.tscn", concat!(
            "[gd_scene format=3]\n",
            "[sub_resource type=\"StandardMaterial3D\" id=\"M\"]\n",
            "albedo_color = Color(1, 0.5, 0.3, 1)\n",
            "roughness = 0.4\n",
            "[node name=\"Root\" type=\"Node\"]\n",
        ));

        let ranges = folding_ranges(&doc);
        assert_eq!(ranges, vec![FoldingRange { start_line: 1, end_line: 3 }]);
    }
}
