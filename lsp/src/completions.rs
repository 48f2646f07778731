// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use gdls::gdshader::builtins;
use gdls::{Document, DocumentKind};
use tower_lsp::lsp_types::{
    CompletionItem,
    CompletionItemKind,
    InsertTextFormat,
};

/// Context-sensitive completions for the cursor position.
pub fn completions(document: &Document, line: usize, column: usize) -> Vec<CompletionItem> {
    let Some(line_text) = document.content.split('\n').nth(line) else {
        return Vec::new();
    };

    let prefix: String = line_text.chars().take(column).collect();

    match document.kind {
        DocumentKind::Tscn => tscn_completions(document, &prefix, line_text),
        DocumentKind::GdShader => gdshader_completions(&prefix),
        DocumentKind::Unknown => Vec::new(),
    }
}

fn tscn_completions(document: &Document, prefix: &str, line_text: &str) -> Vec<CompletionItem> {
    if prefix.contains("type=\"") && !prefix.ends_with('"') {
        return node_type_completions();
    }

    if prefix.contains("ExtResource(\"") && !prefix.ends_with("\")") {
        return ext_resource_id_completions(document);
    }

    if prefix.contains("SubResource(\"") && !prefix.ends_with("\")") {
        return sub_resource_id_completions(document);
    }

    if prefix.contains("parent=\"") && !prefix.ends_with('"') {
        return node_path_completions(document);
    }

    if prefix.trim_end().ends_with('=') {
        return value_completions();
    }

    if prefix.trim().is_empty() || !line_text.contains('=') {
        return property_completions();
    }

    Vec::new()
}

const NODE_TYPES: &[&str] = &[
    "Node", "Node2D", "Node3D",
    "CharacterBody2D", "RigidBody2D", "StaticBody2D", "Area2D",
    "CollisionShape2D", "CollisionPolygon2D",
    "CharacterBody3D", "RigidBody3D", "StaticBody3D", "Area3D",
    "CollisionShape3D", "CollisionPolygon3D",
    "Sprite2D", "AnimatedSprite2D", "Polygon2D", "Line2D",
    "TileMap", "TileMapLayer",
    "MeshInstance3D", "MultiMeshInstance3D", "Sprite3D",
    "CSGBox3D", "CSGSphere3D", "CSGCylinder3D", "CSGMesh3D",
    "Camera2D", "Camera3D",
    "DirectionalLight3D", "OmniLight3D", "SpotLight3D",
    "PointLight2D", "DirectionalLight2D",
    "AudioStreamPlayer", "AudioStreamPlayer2D", "AudioStreamPlayer3D",
    "AnimationPlayer", "AnimationTree",
    "Control", "Container", "Panel", "Label", "RichTextLabel",
    "Button", "TextureButton", "LinkButton", "OptionButton", "MenuButton",
    "CheckBox", "CheckButton", "SpinBox", "HSlider", "VSlider",
    "ProgressBar", "TextureProgressBar",
    "TextEdit", "LineEdit", "CodeEdit",
    "Tree", "ItemList", "TabContainer", "TabBar",
    "ScrollContainer", "HBoxContainer", "VBoxContainer", "GridContainer",
    "MarginContainer", "CenterContainer", "AspectRatioContainer",
    "ColorRect", "TextureRect", "NinePatchRect",
    "SubViewport", "SubViewportContainer",
    "NavigationAgent2D", "NavigationAgent3D",
    "NavigationRegion2D", "NavigationRegion3D",
    "Path2D", "Path3D", "PathFollow2D", "PathFollow3D",
    "GPUParticles2D", "GPUParticles3D", "CPUParticles2D", "CPUParticles3D",
    "Timer", "HTTPRequest", "RayCast2D", "RayCast3D",
    "Skeleton2D", "Skeleton3D", "BoneAttachment3D",
    "CanvasLayer", "ParallaxBackground", "ParallaxLayer",
    "WorldEnvironment", "RemoteTransform2D", "RemoteTransform3D",
];

fn node_type_completions() -> Vec<CompletionItem> {
    NODE_TYPES.iter()
        .map(|name| CompletionItem {
            label: (*name).to_string(),
            kind: Some(CompletionItemKind::CLASS),
            detail: Some("Godot Node Type".to_string()),
            ..CompletionItem::default()
        })
        .collect()
}

fn ext_resource_id_completions(document: &Document) -> Vec<CompletionItem> {
    let Some(ast) = document.tscn.as_ref() else {
        return Vec::new();
    };

    ast.ext_resources.iter()
        .map(|ext| CompletionItem {
            label: ext.id.clone(),
            kind: Some(CompletionItemKind::REFERENCE),
            detail: Some(format!("{} - {}", ext.resource_type, ext.path)),
            ..CompletionItem::default()
        })
        .collect()
}

fn sub_resource_id_completions(document: &Document) -> Vec<CompletionItem> {
    let Some(ast) = document.tscn.as_ref() else {
        return Vec::new();
    };

    ast.sub_resources.iter()
        .map(|sub| CompletionItem {
            label: sub.id.clone(),
            kind: Some(CompletionItemKind::REFERENCE),
            detail: Some(sub.resource_type.clone()),
            ..CompletionItem::default()
        })
        .collect()
}

fn node_path_completions(document: &Document) -> Vec<CompletionItem> {
    let Some(ast) = document.tscn.as_ref() else {
        return Vec::new();
    };

    let mut items = vec![CompletionItem {
        label: ".".to_string(),
        kind: Some(CompletionItemKind::VALUE),
        detail: Some("Scene root".to_string()),
        ..CompletionItem::default()
    }];

    for node in &ast.nodes {
        if node.parent.is_empty() {
            continue;
        }

        items.push(CompletionItem {
            label: node.path(),
            kind: Some(CompletionItemKind::VALUE),
            detail: Some(node.node_type.clone()),
            ..CompletionItem::default()
        });
    }

    items
}

fn value_completions() -> Vec<CompletionItem> {
    let constructors = [
        ("Vector2", "Vector2($1, $2)", "2D vector"),
        ("Vector3", "Vector3($1, $2, $3)", "3D vector"),
        ("Vector4", "Vector4($1, $2, $3, $4)", "4D vector"),
        ("Color", "Color($1, $2, $3, $4)", "RGBA color"),
        ("Transform2D", "Transform2D($1, $2, $3, $4, $5, $6)", "2D transform"),
        ("Transform3D", "Transform3D($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)", "3D transform"),
        ("Quaternion", "Quaternion($1, $2, $3, $4)", "Rotation quaternion"),
        ("NodePath", "NodePath(\"$1\")", "Path to a node"),
        ("ExtResource", "ExtResource(\"$1\")", "External resource reference"),
        ("SubResource", "SubResource(\"$1\")", "Internal resource reference"),
    ];

    let mut items: Vec<CompletionItem> = constructors.iter()
        .map(|(label, insert, detail)| CompletionItem {
            label: (*label).to_string(),
            kind: Some(CompletionItemKind::FUNCTION),
            detail: Some((*detail).to_string()),
            insert_text: Some((*insert).to_string()),
            insert_text_format: Some(InsertTextFormat::SNIPPET),
            ..CompletionItem::default()
        })
        .collect();

    for (label, detail) in [("true", "Boolean true"), ("false", "Boolean false"), ("null", "Null value")] {
        items.push(CompletionItem {
            label: label.to_string(),
            kind: Some(CompletionItemKind::KEYWORD),
            detail: Some(detail.to_string()),
            ..CompletionItem::default()
        });
    }

    items
}

fn property_completions() -> Vec<CompletionItem> {
    let properties = [
        ("transform", "Node transform (Transform2D or Transform3D)"),
        ("position", "Node position (Vector2 or Vector3)"),
        ("rotation", "Node rotation"),
        ("scale", "Node scale (Vector2 or Vector3)"),
        ("visible", "Node visibility"),
        ("modulate", "Color modulation"),
        ("z_index", "2D draw order"),
        ("process_mode", "Processing mode"),
        ("script", "Attached script"),
        ("mesh", "MeshInstance3D mesh"),
        ("shape", "CollisionShape shape"),
        ("texture", "Sprite texture"),
        ("material", "Material override"),
    ];

    properties.iter()
        .map(|(label, detail)| CompletionItem {
            label: (*label).to_string(),
            kind: Some(CompletionItemKind::PROPERTY),
            detail: Some((*detail).to_string()),
            ..CompletionItem::default()
        })
        .collect()
}

const SHADER_KEYWORDS: &[&str] = &[
    "shader_type", "render_mode", "uniform", "varying", "const", "global",
    "group_uniforms", "if", "else", "for", "while", "do", "switch", "case",
    "default", "break", "continue", "return", "discard", "struct",
    "void", "bool", "int", "uint", "float",
    "vec2", "vec3", "vec4", "bvec2", "bvec3", "bvec4",
    "ivec2", "ivec3", "ivec4", "uvec2", "uvec3", "uvec4",
    "mat2", "mat3", "mat4",
    "sampler2D", "sampler2DArray", "sampler3D", "samplerCube",
];

fn gdshader_completions(prefix: &str) -> Vec<CompletionItem> {
    let mut items = Vec::new();

    // After a ':' the only sensible completions are uniform hints.
    if prefix.contains(':') {
        for (name, description) in builtins::UNIFORM_HINTS {
            items.push(CompletionItem {
                label: (*name).to_string(),
                kind: Some(CompletionItemKind::ENUM_MEMBER),
                detail: Some((*description).to_string()),
                ..CompletionItem::default()
            });
        }
        return items;
    }

    for keyword in SHADER_KEYWORDS {
        items.push(CompletionItem {
            label: (*keyword).to_string(),
            kind: Some(CompletionItemKind::KEYWORD),
            ..CompletionItem::default()
        });
    }

    for function in builtins::FUNCTIONS {
        items.push(CompletionItem {
            label: function.name.to_string(),
            kind: Some(CompletionItemKind::FUNCTION),
            detail: Some(function.description.to_string()),
            ..CompletionItem::default()
        });
    }

    for constant in builtins::CONSTANTS {
        items.push(CompletionItem {
            label: constant.name.to_string(),
            kind: Some(CompletionItemKind::CONSTANT),
            detail: Some(constant.description.to_string()),
            ..CompletionItem::default()
        });
    }

    items
}
