// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! End-to-end scenarios driven through the workspace, mirroring how the
//! LSP layer uses the crate.

use gdls::gdshader::{ShaderAnalyzer, ShaderParser};
use gdls::tscn::{TscnParser, TscnValue, MAX_ERRORS};
use gdls::{
    find_definition,
    path_to_uri,
    tscn_diagnostics,
    uri_to_path,
    DiagnosticSeverity,
    Workspace,
};

#[test]
fn minimal_tscn_document() {
    let doc = TscnParser::parse("[gd_scene format=3]");

    let descriptor = doc.descriptor.as_ref().expect("expected a descriptor");
    assert_eq!(descriptor.kind, "gd_scene");
    assert_eq!(descriptor.format, 3);
    assert!(doc.errors.is_empty());
}

#[test]
fn ext_resource_path_range_includes_quotes() {
    let doc = TscnParser::parse(concat!(
        "[gd_scene format=3]\n",
        "[ext_resource type=\"Texture2D\" uid=\"uid://abc\" path=\"res://texture.png\" id=\"1_abc\"]",
    ));

    let ext = &doc.ext_resources[0];
    assert_eq!(ext.path, "res://texture.png");

    let width = ext.path_range.end().column() - ext.path_range.start().column();
    assert_eq!(width, 19);
}

#[test]
fn malformed_dict_terminates_with_errors() {
    let doc = TscnParser::parse(concat!(
        "[node name=\"Root\" type=\"Node\"]\n",
        "data = { \"key1\" \"missing_colon\", \"key2\": 123 }\n",
    ));

    assert_eq!(doc.nodes.len(), 1);
    assert!(!doc.errors.is_empty());
}

#[test]
fn error_cap_bounds_malformed_input() {
    let mut input = String::from("[node name=\"Root\" type=\"Node\"]\n");
    for _ in 0..200 {
        input.push_str("@@invalid@@\n");
    }

    let doc = TscnParser::parse(&input);
    assert!(doc.errors.len() <= MAX_ERRORS);
}

#[test]
fn gdshader_type_mismatch_diagnostic() {
    let shader = ShaderParser::parse(concat!(
        "shader_type canvas_item;\n",
        "void fragment() { float x = 1; int y = x; }\n",
    ));
    let analysis = ShaderAnalyzer::analyze(&shader);

    let error = analysis.errors.iter()
        .find(|error| error.message.contains("'int' with 'float'"))
        .expect("expected an initialization error");
    assert_eq!(error.range.start().line(), 1);
}

#[test]
fn swizzle_assignability() {
    let shader = ShaderParser::parse(concat!(
        "shader_type spatial;\n",
        "void vertex() {\n",
        "  vec3 v;\n",
        "  v.xxx = vec3(1);\n",
        "  v.xy = vec2(1);\n",
        "}\n",
    ));
    let analysis = ShaderAnalyzer::analyze(&shader);

    assert_eq!(analysis.errors.len(), 1);
    assert!(analysis.errors[0].message.contains("duplicate components"));
    assert_eq!(analysis.errors[0].range.start().line(), 3);
}

#[test]
fn windows_path_conversions() {
    assert_eq!(uri_to_path("file:///C:/a/b.tscn"), "C:/a/b.tscn");
    assert_eq!(path_to_uri("C:/a/b.tscn"), "file:///C:/a/b.tscn");
}

#[test]
fn definition_of_ext_resource_reference() {
    let workspace = Workspace::new();
    let doc = workspace.open("file:///scene.tscn", concat!(
        "[ext_resource type=\"Script\" path=\"res://S.gd\" id=\"1\"]\n",
        "[node name=\"N\" type=\"Node\"]\n",
        "script = ExtResource(\"1\")\n",
    ).to_string());

    // Column inside the quoted "1" on line 2.
    let location = find_definition(&doc, &[], 2, 22).expect("expected a definition");
    let expected = doc.tscn.as_ref().unwrap().ext_resources[0].range;
    assert_eq!(location.range, expected);
    assert_eq!(location.uri, "file:///scene.tscn");
}

#[test]
fn totality_on_pathological_inputs() {
    let inputs = [
        "[".repeat(2000),
        "{".repeat(2000),
        "\"".repeat(999),
        "[node name=\"R\" type=\"N\"]\ndata = ".to_string() + &"[".repeat(500),
        "a=[{a:[{".repeat(200),
        "&&&&&&&&".repeat(100),
        "\u{1F4A5} ident \u{1F4A5}".repeat(50),
    ];

    for input in &inputs {
        let doc = TscnParser::parse(input);
        assert!(doc.errors.len() <= MAX_ERRORS);
    }

    let shader_inputs = [
        "{".repeat(2000),
        "((((((((".repeat(250),
        "shader_type spatial; void v() { ".to_string() + &"if(".repeat(300),
        "/* unterminated".to_string(),
        "void void void void".repeat(100),
    ];

    for input in &shader_inputs {
        let shader = ShaderParser::parse(input);
        _ = ShaderAnalyzer::analyze(&shader);
    }
}

#[test]
fn parse_is_deterministic() {
    let source = concat!(
        "[gd_scene load_steps=4 format=3 uid=\"uid://x\"]\n",
        "[ext_resource type=\"Texture2D\" path=\"res://t.png\" id=\"1_a\"]\n",
        "[sub_resource type=\"StandardMaterial3D\" id=\"M_1\"]\n",
        "albedo_color = Color(1, 0.5, 0.3, 1)\n",
        "[node name=\"Root\" type=\"Node3D\"]\n",
        "[node name=\"Child\" type=\"Sprite3D\" parent=\".\"]\n",
        "transform = Transform3D(1,0,0, 0,1,0, 0,0,1, 0,0,0)\n",
        "script = ExtResource(\"1_a\")\n",
    );

    let first = TscnParser::parse(source);
    let second = TscnParser::parse(source);
    assert_eq!(format!("{first:?}"), format!("{second:?}"));
    assert!(first.errors.is_empty());

    let shader_source = "shader_type spatial;\nvoid vertex() { float x = broken_ref; }\n";
    let first = ShaderAnalyzer::analyze(&ShaderParser::parse(shader_source));
    let second = ShaderAnalyzer::analyze(&ShaderParser::parse(shader_source));
    assert_eq!(first.errors, second.errors);
}

#[test]
fn shader_lex_round_trip_modulo_whitespace() {
    let source = concat!(
        "shader_type spatial;\n",
        "uniform float strength = 0.5;\n",
        "void vertex() { VERTEX.y += sin(TIME) * strength; }\n",
    );

    let tokens = gdls::gdshader::ShaderLexer::new(source).tokenize();
    let joined: String = tokens.iter().map(|token| token.literal.as_str()).collect();

    let strip = |text: &str| -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    };
    assert_eq!(strip(&joined), strip(source));
}

#[test]
fn tscn_value_ranges_nest_inside_property_ranges() {
    let doc = TscnParser::parse(concat!(
        "[gd_scene format=3]\n",
        "[node name=\"Root\" type=\"Node\"]\n",
        "data = { \"list\": [1, 2, Vector2(3, 4)] }\n",
    ));

    fn assert_nested(outer: gdls::SourceRange, value: &TscnValue) {
        let range = value.range();
        assert!(outer.start() <= range.start(), "{range} escapes {outer}");
        assert!(range.end() <= outer.end(), "{range} escapes {outer}");

        match value {
            TscnValue::Array(array) => {
                for element in &array.values {
                    assert_nested(range, element);
                }
            }
            TscnValue::Dict(dict) => {
                for entry in &dict.entries {
                    assert_nested(range, &entry.key);
                    assert_nested(range, &entry.value);
                }
            }
            TscnValue::Typed(typed) => {
                for argument in &typed.arguments {
                    assert_nested(range, argument);
                }
            }
            _ => {}
        }
    }

    let property = &doc.nodes[0].properties[0];
    assert_nested(property.range, &property.value);
}

#[test]
fn workspace_supports_concurrent_readers() {
    use std::sync::Arc;
    use std::thread;

    let workspace = Arc::new(Workspace::new());
    workspace.open("file:///scene.tscn", "[gd_scene format=3]".to_string());

    let mut handles = Vec::new();

    for _ in 0..4 {
        let workspace = Arc::clone(&workspace);
        handles.push(thread::spawn(move || {
            for _ in 0..200 {
                if let Some(doc) = workspace.get("file:///scene.tscn") {
                    assert!(doc.tscn.is_some());
                }
            }
        }));
    }

    {
        let workspace = Arc::clone(&workspace);
        handles.push(thread::spawn(move || {
            for index in 0..200 {
                workspace.update(
                    "file:///scene.tscn",
                    format!("[gd_scene format=3]\n; revision {index}"),
                );
            }
        }));
    }

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }

    let doc = workspace.get("file:///scene.tscn").expect("document still present");
    assert!(doc.version >= 1);
}

#[test]
fn unsupported_format_yields_error_diagnostic() {
    let diagnostics = tscn_diagnostics(&TscnParser::parse("[gd_scene format=2]"));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Error);
    assert_eq!(diagnostics[0].message, "Only format=3 (Godot 4.x) is supported");
}
