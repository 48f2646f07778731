// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt::Write;

use crate::gdshader::{self, builtins, ShaderDocument};
use crate::tscn::{
    Connection,
    ExtResource,
    Property,
    SceneDescriptor,
    SceneNode,
    SubResource,
    TscnDocument,
    TscnValue,
};

use super::{Document, DocumentKind};

/// Markdown hover text for the innermost entity at the given position.
#[must_use]
pub fn hover(document: &Document, line: usize, column: usize) -> Option<String> {
    match document.kind {
        DocumentKind::Tscn => {
            let ast = document.tscn.as_ref()?;
            tscn_hover(ast, line, column)
        }
        DocumentKind::GdShader => {
            let ast = document.shader.as_ref()?;
            gdshader_hover(document, ast, line, column)
        }
        DocumentKind::Unknown => None,
    }
}

fn tscn_hover(ast: &TscnDocument, line: usize, column: usize) -> Option<String> {
    for ext in &ast.ext_resources {
        if ext.range.contains(line, column) {
            return Some(format_ext_resource(ext));
        }
    }

    for sub in &ast.sub_resources {
        if sub.range.contains(line, column) {
            for property in &sub.properties {
                if property.range.contains(line, column) {
                    return Some(format_property(property));
                }
            }
            return Some(format_sub_resource(sub));
        }
    }

    for node in &ast.nodes {
        if node.range.contains(line, column) {
            for property in &node.properties {
                if property.range.contains(line, column) {
                    return Some(format_property(property));
                }
            }
            return Some(format_node(node, ast));
        }
    }

    for connection in &ast.connections {
        if connection.range.contains(line, column) {
            return Some(format_connection(connection));
        }
    }

    if let Some(descriptor) = &ast.descriptor {
        if descriptor.range.contains(line, column) {
            return Some(format_descriptor(descriptor));
        }
    }

    None
}

fn format_ext_resource(ext: &ExtResource) -> String {
    let mut text = String::from("### External Resource\n\n");
    _ = write!(text, "**Type:** `{}`\n\n", ext.resource_type);
    _ = write!(text, "**Path:** `{}`\n\n", ext.path);
    _ = write!(text, "**ID:** `{}`\n\n", ext.id);
    if !ext.uid.is_empty() {
        _ = writeln!(text, "**UID:** `{}`", ext.uid);
    }
    text
}

fn format_sub_resource(sub: &SubResource) -> String {
    let mut text = String::from("### Internal Resource\n\n");
    _ = write!(text, "**Type:** `{}`\n\n", sub.resource_type);
    _ = write!(text, "**ID:** `{}`\n\n", sub.id);
    if let Some(description) = godot_type_description(&sub.resource_type) {
        _ = writeln!(text, "_{description}_");
    }
    text
}

fn format_node(node: &SceneNode, ast: &TscnDocument) -> String {
    let mut text = String::from("### Scene Node\n\n");
    _ = write!(text, "**Name:** `{}`\n\n", node.name);

    if !node.node_type.is_empty() {
        _ = write!(text, "**Type:** `{}`\n\n", node.node_type);
        if let Some(description) = godot_type_description(&node.node_type) {
            _ = write!(text, "_{description}_\n\n");
        }
    } else if let Some(TscnValue::ResourceRef(reference)) = &node.instance {
        if let Some(ext) = ast.ext_resources.iter().find(|ext| ext.id == reference.id) {
            _ = write!(text, "**Instance of:** `{}`\n\n", ext.path);
        }
    }

    if node.parent.is_empty() {
        text.push_str("**Parent:** _(scene root)_\n\n");
    } else {
        _ = write!(text, "**Parent:** `{}`\n\n", node.parent);
    }

    if !node.groups.is_empty() {
        _ = write!(text, "**Groups:** `{}`\n\n", node.groups.join("`, `"));
    }

    text
}

fn format_property(property: &Property) -> String {
    let mut text = String::new();
    _ = write!(text, "### Property: `{}`\n\n", property.key);
    _ = write!(text, "**Type:** `{}`\n\n", property.value.type_name());

    let preview = value_preview(&property.value);
    if !preview.is_empty() {
        _ = writeln!(text, "**Value:** `{preview}`");
    }

    text
}

fn format_connection(connection: &Connection) -> String {
    let mut text = String::from("### Signal Connection\n\n");
    _ = write!(text, "**Signal:** `{}`\n\n", connection.signal);
    _ = write!(text, "**From:** `{}`\n\n", connection.from);
    _ = write!(text, "**To:** `{}`\n\n", connection.to);
    _ = writeln!(text, "**Method:** `{}`", connection.method);
    text
}

fn format_descriptor(descriptor: &SceneDescriptor) -> String {
    let mut text = String::new();
    if descriptor.kind == "gd_scene" {
        text.push_str("### Scene File\n\n");
    } else {
        text.push_str("### Resource File\n\n");
        if !descriptor.resource_type.is_empty() {
            _ = write!(text, "**Type:** `{}`\n\n", descriptor.resource_type);
        }
    }

    _ = write!(text, "**Format:** `{}` (Godot 4.x)\n\n", descriptor.format);
    if let Some(load_steps) = descriptor.load_steps {
        _ = write!(text, "**Load Steps:** `{load_steps}`\n\n");
    }
    if !descriptor.uid.is_empty() {
        _ = writeln!(text, "**UID:** `{}`", descriptor.uid);
    }
    text
}

fn value_preview(value: &TscnValue) -> String {
    match value {
        TscnValue::String(string) => {
            if string.value.chars().count() > 50 {
                let truncated: String = string.value.chars().take(50).collect();
                format!("\"{truncated}...\"")
            } else {
                format!("\"{}\"", string.value)
            }
        }
        TscnValue::Number(number) => number.raw.clone(),
        TscnValue::Bool(boolean) => boolean.value.to_string(),
        TscnValue::Null(..) => "null".to_string(),
        TscnValue::Typed(typed) => format!("{}(...)", typed.type_name),
        TscnValue::ResourceRef(reference) => format!("{}(\"{}\")", reference.ref_type, reference.id),
        TscnValue::Array(array) => format!("[...] ({} items)", array.values.len()),
        TscnValue::Dict(dict) => format!("{{...}} ({} entries)", dict.entries.len()),
        TscnValue::Ident(ident) => ident.name.clone(),
    }
}

fn gdshader_hover(document: &Document, ast: &ShaderDocument, line: usize, column: usize) -> Option<String> {
    if let Some(shader_type) = &ast.shader_type {
        if shader_type.range.contains(line, column) {
            return Some(format_shader_type(&shader_type.name));
        }
    }

    if let Some(render_modes) = &ast.render_modes {
        if render_modes.range.contains(line, column) {
            let mut text = String::from("### Render Modes\n\n");
            for mode in &render_modes.modes {
                _ = writeln!(text, "- `{mode}`");
            }
            return Some(text);
        }
    }

    for uniform in &ast.uniforms {
        if uniform.range.contains(line, column) {
            return Some(format_uniform(uniform));
        }
    }

    for varying in &ast.varyings {
        if varying.range.contains(line, column) {
            return Some(format_varying(varying));
        }
    }

    for constant in &ast.constants {
        if constant.range.contains(line, column) {
            return Some(format_shader_constant(constant));
        }
    }

    // Function ranges cover their bodies; only the header produces a
    // function hover so identifiers inside the body can still resolve to
    // the built-in registries below.
    for function in &ast.functions {
        if !function.range.contains(line, column) {
            continue;
        }

        let in_body = function.body
            .as_ref()
            .is_some_and(|body| body.range.contains(line, column));
        if !in_body {
            return Some(format_function(function));
        }
    }

    for decl in &ast.structs {
        if decl.range.contains(line, column) {
            return Some(format_struct(decl));
        }
    }

    builtin_hover(document, line, column)
}

fn format_shader_type(name: &str) -> String {
    let mut text = String::from("### Shader Type\n\n");
    _ = write!(text, "**Type:** `{name}`\n\n");

    let description = match name {
        "spatial" => Some("3D shader for MeshInstance3D and other 3D nodes. Supports vertex, fragment, and light functions."),
        "canvas_item" => Some("2D shader for CanvasItem nodes like Sprite2D, Control, etc. Supports vertex, fragment, and light functions."),
        "particles" => Some("Shader for GPUParticles2D/3D. Supports start and process functions for particle behavior."),
        "sky" => Some("Shader for Sky resource. Used for rendering sky backgrounds."),
        "fog" => Some("Shader for FogVolume. Used for volumetric fog effects."),
        _ => None,
    };

    if let Some(description) = description {
        _ = writeln!(text, "_{description}_");
    }

    text
}

fn format_uniform(uniform: &gdshader::UniformDecl) -> String {
    let mut text = String::from("### Uniform Variable\n\n");
    _ = write!(text, "**Name:** `{}`\n\n", uniform.name);
    _ = write!(text, "**Type:** `{}`\n\n", uniform.ty.name);

    if uniform.is_global {
        text.push_str("**Scope:** `global`\n\n");
    }

    if !uniform.group.is_empty() {
        _ = write!(text, "**Group:** `{}`\n\n", uniform.group);
    }

    if !uniform.hints.is_empty() {
        text.push_str("**Hints:**\n");
        for hint in &uniform.hints {
            match builtins::uniform_hint(&hint.name) {
                Some(description) => _ = writeln!(text, "- `{}`: {description}", hint.name),
                None => _ = writeln!(text, "- `{}`", hint.name),
            }
        }
    }

    if !uniform.doc_comment.is_empty() {
        _ = write!(text, "\n_{}_\n", uniform.doc_comment);
    }

    text
}

fn format_varying(varying: &gdshader::VaryingDecl) -> String {
    let mut text = String::from("### Varying Variable\n\n");
    _ = write!(text, "**Name:** `{}`\n\n", varying.name);
    _ = write!(text, "**Type:** `{}`\n\n", varying.ty.name);

    if !varying.interpolation.is_empty() {
        _ = write!(text, "**Interpolation:** `{}`\n\n", varying.interpolation);
    }

    text.push_str("_Passed between vertex and fragment shaders._\n");
    text
}

fn format_shader_constant(constant: &gdshader::ConstDecl) -> String {
    let mut text = String::from("### Constant\n\n");
    _ = write!(text, "**Name:** `{}`\n\n", constant.name);
    _ = writeln!(text, "**Type:** `{}`", constant.ty.name);
    text
}

fn format_function(function: &gdshader::FunctionDecl) -> String {
    let mut text = String::from("### Function\n\n");

    let params: Vec<String> = function.params.iter()
        .map(|param| {
            if param.qualifier.is_empty() {
                format!("{} {}", param.ty.name, param.name)
            } else {
                format!("{} {} {}", param.qualifier, param.ty.name, param.name)
            }
        })
        .collect();

    _ = write!(text, "```gdshader\n{} {}({})\n```\n\n",
        function.return_type.name, function.name, params.join(", "));

    let stage_note = match function.name.as_str() {
        "vertex" => Some("Runs for each vertex. Used to transform vertex positions."),
        "fragment" => Some("Runs for each pixel. Used to determine final color."),
        "light" => Some("Runs for each light affecting a pixel."),
        "start" => Some("Runs once when a particle spawns."),
        "process" => Some("Runs each frame for each particle."),
        "sky" => Some("Runs for each pixel of the sky."),
        "fog" => Some("Runs for each sample in the fog volume."),
        _ => None,
    };

    if let Some(note) = stage_note {
        _ = writeln!(text, "_{note}_");
    }

    text
}

fn format_struct(decl: &gdshader::StructDecl) -> String {
    let mut text = String::from("### Struct\n\n");
    _ = write!(text, "**Name:** `{}`\n\n", decl.name);

    if !decl.members.is_empty() {
        text.push_str("**Members:**\n");
        for member in &decl.members {
            _ = writeln!(text, "- `{} {}`", member.ty.name, member.name);
        }
    }

    text
}

/// Falls back to the identifier under the cursor and looks it up in the
/// built-in registries.
fn builtin_hover(document: &Document, line: usize, column: usize) -> Option<String> {
    let word = word_at(&document.content, line, column)?;

    if let Some(constant) = builtins::constant(&word) {
        let mut text = String::from("### Built-in Constant\n\n");
        _ = write!(text, "```gdshader\nconst {} {} = {}\n```\n\n",
            constant.ty, constant.name, constant.value);
        _ = writeln!(text, "_{}_", constant.description);
        return Some(text);
    }

    if let Some(function) = builtins::function(&word) {
        let mut text = String::from("### Built-in Function\n\n");
        text.push_str("```gdshader\n");
        for signature in function.signatures {
            _ = writeln!(text, "{} {}({})", signature.ret, function.name, signature.params.join(", "));
        }
        text.push_str("```\n\n");
        _ = writeln!(text, "_{}_", function.description);
        return Some(text);
    }

    None
}

/// The identifier-character run around the cursor position.
fn word_at(content: &str, line: usize, column: usize) -> Option<String> {
    let line_content = content.split('\n').nth(line)?;
    let chars: Vec<char> = line_content.chars().collect();
    if column >= chars.len() {
        return None;
    }

    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';

    let mut start = column;
    while start > 0 && is_ident(chars[start - 1]) {
        start -= 1;
    }

    let mut end = column;
    while end < chars.len() && is_ident(chars[end]) {
        end += 1;
    }

    if start == end {
        return None;
    }

    Some(chars[start..end].iter().collect())
}

/// Short descriptions for common Godot node and resource type names.
fn godot_type_description(type_name: &str) -> Option<&'static str> {
    let description = match type_name {
        // Nodes
        "Node" => "Base class for all scene objects",
        "Node2D" => "A 2D game object",
        "Node3D" => "A 3D game object (formerly Spatial)",
        "Control" => "Base class for all UI-related nodes",
        "Camera2D" => "Camera node for 2D scenes",
        "Camera3D" => "Camera node for 3D scenes",
        "CharacterBody2D" => "2D physics body for character movement",
        "CharacterBody3D" => "3D physics body for character movement",
        "RigidBody2D" => "2D physics body with rigid body dynamics",
        "RigidBody3D" => "3D physics body with rigid body dynamics",
        "StaticBody2D" => "2D physics body that doesn't move",
        "StaticBody3D" => "3D physics body that doesn't move",
        "Area2D" => "2D area for detecting overlaps",
        "Area3D" => "3D area for detecting overlaps",
        "CollisionShape2D" => "2D collision shape for physics",
        "CollisionShape3D" => "3D collision shape for physics",
        "Sprite2D" => "2D sprite node",
        "Sprite3D" => "3D sprite node",
        "MeshInstance3D" => "Instance of a 3D mesh",
        "AnimationPlayer" => "Node for playing animations",
        "AnimationTree" => "Node for blending animations",
        "AudioStreamPlayer" => "Plays audio non-positionally",
        "AudioStreamPlayer2D" => "Plays audio with 2D positioning",
        "AudioStreamPlayer3D" => "Plays audio with 3D positioning",
        "Label" => "Displays text",
        "Button" => "Clickable button",
        "TextEdit" => "Multi-line text editor",
        "LineEdit" => "Single-line text input",
        "Timer" => "Counts down and emits timeout signal",
        "Path2D" => "Contains a Curve2D path",
        "Path3D" => "Contains a Curve3D path",
        "PathFollow2D" => "Follows a Path2D",
        "PathFollow3D" => "Follows a Path3D",
        "Skeleton3D" => "3D skeleton for mesh deformation",
        "BoneAttachment3D" => "Attaches nodes to skeleton bones",
        "GPUParticles2D" => "2D GPU-accelerated particles",
        "GPUParticles3D" => "3D GPU-accelerated particles",
        "DirectionalLight3D" => "Directional light source",
        "OmniLight3D" => "Omnidirectional point light",
        "SpotLight3D" => "Spotlight",

        // Resources
        "BoxShape3D" => "3D box collision shape",
        "SphereShape3D" => "3D sphere collision shape",
        "CapsuleShape3D" => "3D capsule collision shape",
        "CylinderShape3D" => "3D cylinder collision shape",
        "BoxMesh" => "Box primitive mesh",
        "SphereMesh" => "Sphere primitive mesh",
        "CapsuleMesh" => "Capsule primitive mesh",
        "CylinderMesh" => "Cylinder primitive mesh",
        "PlaneMesh" => "Plane primitive mesh",
        "ArrayMesh" => "Mesh from vertex arrays",
        "StandardMaterial3D" => "PBR material for 3D",
        "ShaderMaterial" => "Custom shader material",
        "Texture2D" => "2D texture resource",
        "Animation" => "Animation resource",
        "AnimationLibrary" => "Collection of animations",
        "PackedScene" => "Serialized scene",
        "Script" => "GDScript or other script",
        "AudioStream" => "Audio data resource",
        "Font" => "Font resource",
        "Theme" => "UI theme resource",

        _ => return None,
    };

    Some(description)
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
    fn ext_resource_hover() {
        let doc = open("file:///a.tscn", concat!(
            "[gd_scene format=3]\n",
            "[ext_resource type=\"Texture2D\" path=\"res://t.png\" id=\"1_a\"]\n",
        ));

        let text = hover(&doc, 1, 5).expect("expected hover text");
        assert!(text.contains("External Resource"));
        assert!(text.contains("res://t.png"));
    }

    #[test]
    fn node_hover_includes_type_description() {
        let doc = open("file:///a.tscn", concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Player\" type=\"CharacterBody3D\"]\n",
        ));

        let text = hover(&doc, 1, 8).expect("expected hover text");
        assert!(text.contains("Scene Node"));
        assert!(text.contains("3D physics body for character movement"));
        assert!(text.contains("_(scene root)_"));
    }

    #[test]
    fn property_hover_shows_type_and_preview() {
        let doc = open("file:///a.tscn", concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node3D\"]\n",
            "position = Vector3(1, 2, 3)\n",
        ));

        let text = hover(&doc, 2, 3).expect("expected hover text");
        assert!(text.contains("Property: `position`"));
        assert!(text.contains("`Vector3`"));
        assert!(text.contains("Vector3(...)"));
    }

    #[test]
    fn shader_uniform_hover_includes_doc_comment() {
        let doc = open("file:///a.gdshader", concat!(
            "shader_type spatial;\n",
            "/** How bright the rim light is. */\n",
            "uniform float rim_strength : hint_range(0.0, 1.0);\n",
        ));

        let text = hover(&doc, 2, 16).expect("expected hover text");
        assert!(text.contains("Uniform Variable"));
        assert!(text.contains("rim_strength"));
        assert!(text.contains("hint_range"));
        assert!(text.contains("How bright the rim light is."));
    }

    #[test]
    fn builtin_function_hover_inside_function_body() {
        let doc = open("file:///a.gdshader", concat!(
            "shader_type spatial;\n",
            "void fragment() {\n",
            "  ALBEDO = mix(vec3(0.0), vec3(1.0), 0.5);\n",
            "}\n",
        ));

        // On the `mix` call inside the fragment body.
        let text = hover(&doc, 2, 12).expect("expected hover text");
        assert!(text.contains("Built-in Function"), "got: {text}");
        assert!(text.contains("Linearly interpolates"));
    }

    #[test]
    fn builtin_constant_hover() {
        let doc = open("file:///a.gdshader", concat!(
            "shader_type spatial;\n",
            "void vertex() { float x = PI; }\n",
        ));

        let text = hover(&doc, 1, 27).expect("expected hover text");
        assert!(text.contains("Built-in Constant"));
        assert!(text.contains("3.14159"));
    }

    #[test]
    fn function_header_hover() {
        let doc = open("file:///a.gdshader", concat!(
            "shader_type spatial;\n",
            "void fragment() {\n",
            "  ALBEDO = vec3(1.0);\n",
            "}\n",
        ));

        let text = hover(&doc, 1, 6).expect("expected hover text");
        assert!(text.contains("### Function"));
        assert!(text.contains("Runs for each pixel."));
    }

    #[test]
    fn word_extraction() {
        assert_eq!(word_at("ALBEDO = mix(a, b, c);", 0, 10), Some("mix".to_string()));
        assert_eq!(word_at("float x;", 0, 2), Some("float".to_string()));
        assert_eq!(word_at("  ;  ", 0, 2), None);
        assert_eq!(word_at("abc", 1, 0), None);
    }
}
