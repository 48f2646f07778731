// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::tscn::{ResourceRefKind, SceneNode, TscnDocument, TscnValue};
use crate::util::resolve_resource_path;
use crate::{SourceLocation, SourceRange};

use super::Document;

/// A resolved target: a range inside some document.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub uri: String,
    pub range: SourceRange,
}

/// Resolves go-to-definition for a TSCN document position: resource
/// references jump to their declaring section, `ext_resource` sections jump
/// to the referenced file, and `parent` paths jump to the parent node.
#[must_use]
pub fn find_definition(
    document: &Document,
    folders: &[String],
    line: usize,
    column: usize,
) -> Option<Location> {
    let ast = document.tscn.as_ref()?;

    for sub in &ast.sub_resources {
        for property in &sub.properties {
            if let Some(location) = definition_in_value(&property.value, ast, &document.uri, line, column) {
                return Some(location);
            }
        }
    }

    for node in &ast.nodes {
        if let Some(instance) = &node.instance {
            if let Some(location) = definition_in_value(instance, ast, &document.uri, line, column) {
                return Some(location);
            }
        }
        for property in &node.properties {
            if let Some(location) = definition_in_value(&property.value, ast, &document.uri, line, column) {
                return Some(location);
            }
        }
    }

    for ext in &ast.ext_resources {
        if ext.range.contains(line, column) {
            let target = resolve_resource_path(&ext.path, &document.uri, folders)?;
            return Some(Location {
                uri: target,
                range: SourceLocation::ZERO.as_zero_range(),
            });
        }
    }

    for node in &ast.nodes {
        if node.range.contains(line, column) && !node.parent.is_empty() && node.parent != "." {
            return find_node_by_path(ast, &node.parent, &document.uri);
        }
    }

    None
}

fn definition_in_value(
    value: &TscnValue,
    ast: &TscnDocument,
    uri: &str,
    line: usize,
    column: usize,
) -> Option<Location> {
    match value {
        TscnValue::ResourceRef(reference) => {
            if !reference.range.contains(line, column) {
                return None;
            }

            match reference.ref_type {
                ResourceRefKind::ExtResource => {
                    ast.ext_resources.iter()
                        .find(|ext| ext.id == reference.id)
                        .map(|ext| Location {
                            uri: uri.to_string(),
                            range: ext.range,
                        })
                }
                ResourceRefKind::SubResource => {
                    ast.sub_resources.iter()
                        .find(|sub| sub.id == reference.id)
                        .map(|sub| Location {
                            uri: uri.to_string(),
                            range: sub.range,
                        })
                }
            }
        }

        TscnValue::Array(array) => {
            array.values.iter()
                .find_map(|element| definition_in_value(element, ast, uri, line, column))
        }

        TscnValue::Dict(dict) => {
            dict.entries.iter()
                .find_map(|entry| definition_in_value(&entry.value, ast, uri, line, column))
        }

        TscnValue::Typed(typed) => {
            typed.arguments.iter()
                .find_map(|argument| definition_in_value(argument, ast, uri, line, column))
        }

        _ => None,
    }
}

fn find_node_by_path(ast: &TscnDocument, path: &str, uri: &str) -> Option<Location> {
    ast.nodes.iter()
        .find(|node| node.path() == path)
        .map(|node| Location {
            uri: uri.to_string(),
            range: node.range,
        })
}

/// Finds every reference to the entity at the given position: resource
/// declarations list their `ResourceRef` uses; nodes list the nodes
/// parented to them and the connections naming them.
#[must_use]
pub fn find_references(
    document: &Document,
    line: usize,
    column: usize,
    include_declaration: bool,
) -> Vec<Location> {
    let Some(ast) = document.tscn.as_ref() else {
        return Vec::new();
    };
    let uri = document.uri.as_str();

    for ext in &ast.ext_resources {
        if ext.range.contains(line, column) {
            let mut locations = Vec::new();
            if include_declaration {
                locations.push(Location {
                    uri: uri.to_string(),
                    range: ext.range,
                });
            }
            locations.extend(resource_references(ast, &ext.id, ResourceRefKind::ExtResource, uri));
            return locations;
        }
    }

    for sub in &ast.sub_resources {
        if sub.range.contains(line, column) {
            let mut locations = Vec::new();
            if include_declaration {
                locations.push(Location {
                    uri: uri.to_string(),
                    range: sub.range,
                });
            }
            locations.extend(resource_references(ast, &sub.id, ResourceRefKind::SubResource, uri));
            return locations;
        }
    }

    for node in &ast.nodes {
        if node.range.contains(line, column) {
            let mut locations = Vec::new();
            if include_declaration {
                locations.push(Location {
                    uri: uri.to_string(),
                    range: node.range,
                });
            }
            locations.extend(node_references(ast, node, uri));
            return locations;
        }
    }

    Vec::new()
}

fn resource_references(
    ast: &TscnDocument,
    id: &str,
    ref_type: ResourceRefKind,
    uri: &str,
) -> Vec<Location> {
    let mut locations = Vec::new();

    let mut visit = |value: &TscnValue| {
        if let TscnValue::ResourceRef(reference) = value {
            if reference.ref_type == ref_type && reference.id == id {
                locations.push(Location {
                    uri: uri.to_string(),
                    range: reference.range,
                });
            }
        }
    };

    for sub in &ast.sub_resources {
        for property in &sub.properties {
            super::walk_value(&property.value, &mut visit);
        }
    }

    for node in &ast.nodes {
        if let Some(instance) = &node.instance {
            super::walk_value(instance, &mut visit);
        }
        for property in &node.properties {
            super::walk_value(&property.value, &mut visit);
        }
    }

    locations
}

fn node_references(ast: &TscnDocument, target: &SceneNode, uri: &str) -> Vec<Location> {
    let path = target.path();
    let mut locations = Vec::new();

    for node in &ast.nodes {
        if node.parent == path || (path.is_empty() && node.parent == ".") {
            locations.push(Location {
                uri: uri.to_string(),
                range: node.range,
            });
        }
    }

    for connection in &ast.connections {
        if connection.from == path || connection.to == path {
            locations.push(Location {
                uri: uri.to_string(),
                range: connection.range,
            });
        }
    }

    locations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Workspace;

    fn open(source: &str) -> std::sync::Arc<Document> {
        let workspace = Workspace::new();
        workspace.open("file:///scene.tscn", source.to_string())
    }

    #[test]
    fn definition_of_ext_resource_reference() {
        let doc = open(concat!(
            "[ext_resource type=\"Script\" path=\"res://S.gd\" id=\"1\"]\n",
            "[node name=\"N\" type=\"Node\"]\n",
            "script = ExtResource(\"1\")\n",
        ));

        // Inside the "1" argument on line 2.
        let location = find_definition(&doc, &[], 2, 22).expect("expected a definition");
        assert_eq!(location.uri, "file:///scene.tscn");
        assert_eq!(location.range, doc.tscn.as_ref().unwrap().ext_resources[0].range);
    }

    #[test]
    fn definition_of_sub_resource_reference() {
        let doc = open(concat!(
            "[gd_scene format=3]\n",
            "[sub_resource type=\"BoxShape3D\" id=\"Box\"]\n",
            "[node name=\"N\" type=\"Node\"]\n",
            "shape = SubResource(\"Box\")\n",
        ));

        let location = find_definition(&doc, &[], 3, 21).expect("expected a definition");
        assert_eq!(location.range, doc.tscn.as_ref().unwrap().sub_resources[0].range);
    }

    #[test]
    fn definition_of_parent_path() {
        let doc = open(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "[node name=\"Arm\" type=\"Node\" parent=\".\"]\n",
            "[node name=\"Hand\" type=\"Node\" parent=\"Arm\"]\n",
        ));

        let location = find_definition(&doc, &[], 3, 5).expect("expected a definition");
        assert_eq!(location.range, doc.tscn.as_ref().unwrap().nodes[1].range);
    }

    #[test]
    fn references_of_sub_resource_declaration() {
        let doc = open(concat!(
            "[gd_scene format=3]\n",
            "[sub_resource type=\"BoxShape3D\" id=\"Box\"]\n",
            "[node name=\"A\" type=\"Node\"]\n",
            "shape = SubResource(\"Box\")\n",
            "[node name=\"B\" type=\"Node\" parent=\".\"]\n",
            "extra = [SubResource(\"Box\")]\n",
        ));

        let locations = find_references(&doc, 1, 2, true);
        assert_eq!(locations.len(), 3);

        let without_declaration = find_references(&doc, 1, 2, false);
        assert_eq!(without_declaration.len(), 2);
    }

    #[test]
    fn references_of_a_node_include_children_and_connections() {
        let doc = open(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "[node name=\"Button\" type=\"Button\" parent=\".\"]\n",
            "[node name=\"Icon\" type=\"Sprite2D\" parent=\"Button\"]\n",
            "[connection signal=\"pressed\" from=\"Button\" to=\".\" method=\"_on_pressed\"]\n",
        ));

        // On the Button node declaration (line 2).
        let locations = find_references(&doc, 2, 3, false);
        assert_eq!(locations.len(), 2);
    }
}
