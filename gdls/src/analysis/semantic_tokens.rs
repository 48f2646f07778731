// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::tscn::{Property, TscnDocument, TscnValue};

/// The semantic-token legend, in index order.
pub const TOKEN_TYPES: [&str; 9] = [
    "keyword",
    "type",
    "string",
    "number",
    "property",
    "function",
    "comment",
    "variable",
    "parameter",
];

/// Declared but currently unused by the builder.
pub const TOKEN_MODIFIERS: [&str; 3] = [
    "declaration",
    "definition",
    "reference",
];

const TOKEN_TYPE_KEYWORD: u32 = 0;
const TOKEN_TYPE_STRING: u32 = 2;
const TOKEN_TYPE_NUMBER: u32 = 3;
const TOKEN_TYPE_PROPERTY: u32 = 4;
const TOKEN_TYPE_FUNCTION: u32 = 5;
const TOKEN_TYPE_COMMENT: u32 = 6;
const TOKEN_TYPE_VARIABLE: u32 = 7;

#[derive(Debug, Clone, Copy)]
struct SemanticToken {
    line: u32,
    start_char: u32,
    length: u32,
    token_type: u32,
    modifiers: u32,
}

/// Builds the delta-encoded LSP semantic-token stream for a TSCN document:
/// five `u32`s per token, positions relative to the previous token.
#[must_use]
pub fn tscn_semantic_tokens(ast: &TscnDocument) -> Vec<u32> {
    let mut tokens = collect_tokens(ast);

    tokens.sort_by(|a, b| {
        a.line.cmp(&b.line).then(a.start_char.cmp(&b.start_char))
    });

    let mut data = Vec::with_capacity(tokens.len() * 5);
    let mut previous_line = 0;
    let mut previous_char = 0;

    for token in tokens {
        let delta_line = token.line - previous_line;
        let delta_char = if delta_line == 0 {
            token.start_char - previous_char
        } else {
            token.start_char
        };

        data.extend_from_slice(&[delta_line, delta_char, token.length, token.token_type, token.modifiers]);
        previous_line = token.line;
        previous_char = token.start_char;
    }

    data
}

fn collect_tokens(ast: &TscnDocument) -> Vec<SemanticToken> {
    let mut tokens = Vec::new();

    if let Some(descriptor) = &ast.descriptor {
        tokens.push(section_keyword(
            descriptor.range.start().line(),
            descriptor.range.start().column(),
            descriptor.kind.len(),
        ));
    }

    for ext in &ast.ext_resources {
        tokens.push(section_keyword(
            ext.range.start().line(),
            ext.range.start().column(),
            "ext_resource".len(),
        ));
    }

    for sub in &ast.sub_resources {
        tokens.push(section_keyword(
            sub.range.start().line(),
            sub.range.start().column(),
            "sub_resource".len(),
        ));

        for property in &sub.properties {
            push_property(&mut tokens, property);
        }
    }

    for node in &ast.nodes {
        tokens.push(section_keyword(
            node.range.start().line(),
            node.range.start().column(),
            "node".len(),
        ));

        for property in &node.properties {
            push_property(&mut tokens, property);
        }
    }

    for connection in &ast.connections {
        tokens.push(section_keyword(
            connection.range.start().line(),
            connection.range.start().column(),
            "connection".len(),
        ));
    }

    for comment in &ast.comments {
        tokens.push(SemanticToken {
            line: comment.range.start().line() as u32,
            start_char: comment.range.start().column() as u32,
            length: (comment.range.end().column() - comment.range.start().column()) as u32,
            token_type: TOKEN_TYPE_COMMENT,
            modifiers: 0,
        });
    }

    tokens
}

/// A section header keyword; the start column skips the opening `[`.
fn section_keyword(line: usize, column: usize, length: usize) -> SemanticToken {
    SemanticToken {
        line: line as u32,
        start_char: column as u32 + 1,
        length: length as u32,
        token_type: TOKEN_TYPE_KEYWORD,
        modifiers: 0,
    }
}

fn push_property(tokens: &mut Vec<SemanticToken>, property: &Property) {
    tokens.push(SemanticToken {
        line: property.key_range.start().line() as u32,
        start_char: property.key_range.start().column() as u32,
        length: (property.key_range.end().column() - property.key_range.start().column()) as u32,
        token_type: TOKEN_TYPE_PROPERTY,
        modifiers: 0,
    });

    push_value(tokens, &property.value);
}

fn push_value(tokens: &mut Vec<SemanticToken>, value: &TscnValue) {
    match value {
        TscnValue::String(string) => {
            tokens.push(SemanticToken {
                line: string.range.start().line() as u32,
                start_char: string.range.start().column() as u32,
                length: (string.range.end().column() - string.range.start().column()) as u32,
                token_type: TOKEN_TYPE_STRING,
                modifiers: 0,
            });
        }

        TscnValue::Number(number) => {
            tokens.push(SemanticToken {
                line: number.range.start().line() as u32,
                start_char: number.range.start().column() as u32,
                length: (number.range.end().column() - number.range.start().column()) as u32,
                token_type: TOKEN_TYPE_NUMBER,
                modifiers: 0,
            });
        }

        TscnValue::Typed(typed) => {
            tokens.push(SemanticToken {
                line: typed.type_range.start().line() as u32,
                start_char: typed.type_range.start().column() as u32,
                length: (typed.type_range.end().column() - typed.type_range.start().column()) as u32,
                token_type: TOKEN_TYPE_FUNCTION,
                modifiers: 0,
            });
            for argument in &typed.arguments {
                push_value(tokens, argument);
            }
        }

        TscnValue::ResourceRef(reference) => {
            tokens.push(SemanticToken {
                line: reference.range.start().line() as u32,
                start_char: reference.range.start().column() as u32,
                length: reference.ref_type.as_str().len() as u32,
                token_type: TOKEN_TYPE_FUNCTION,
                modifiers: 0,
            });
            tokens.push(SemanticToken {
                line: reference.id_range.start().line() as u32,
                start_char: reference.id_range.start().column() as u32,
                length: (reference.id_range.end().column() - reference.id_range.start().column()) as u32,
                token_type: TOKEN_TYPE_VARIABLE,
                modifiers: 0,
            });
        }

        TscnValue::Array(array) => {
            for element in &array.values {
                push_value(tokens, element);
            }
        }

        TscnValue::Dict(dict) => {
            for entry in &dict.entries {
                push_value(tokens, &entry.key);
                push_value(tokens, &entry.value);
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tscn::TscnParser;

    #[test]
    fn minimal_scene_emits_one_keyword_token() {
        let ast = TscnParser::parse("[gd_scene format=3]");
        let data = tscn_semantic_tokens(&ast);

        // One token: (Δline, Δchar, length, type, modifiers).
        assert_eq!(data, vec![0, 1, 8, TOKEN_TYPE_KEYWORD, 0]);
    }

    #[test]
    fn delta_encoding_between_lines() {
        let ast = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "speed = 10\n",
        ));

        let data = tscn_semantic_tokens(&ast);
        assert_eq!(data.len() % 5, 0);

        // gd_scene keyword, node keyword, property key, number value.
        assert_eq!(data.len(), 20);

        // First token is absolute.
        assert_eq!(&data[0..5], &[0, 1, 8, TOKEN_TYPE_KEYWORD, 0]);
        // Second token: next line, char 1 again.
        assert_eq!(&data[5..10], &[1, 1, 4, TOKEN_TYPE_KEYWORD, 0]);
        // Property key on the following line at column 0.
        assert_eq!(&data[10..15], &[1, 0, 5, TOKEN_TYPE_PROPERTY, 0]);
        // The value on the same line encodes a relative start.
        assert_eq!(&data[15..20], &[0, 8, 2, TOKEN_TYPE_NUMBER, 0]);
    }

    #[test]
    fn resource_refs_emit_function_and_variable_tokens() {
        let ast = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[ext_resource type=\"Script\" path=\"res://s.gd\" id=\"1\"]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "script = ExtResource(\"1\")\n",
        ));

        let data = tscn_semantic_tokens(&ast);
        let types: Vec<u32> = data.chunks(5).map(|chunk| chunk[3]).collect();

        assert!(types.contains(&TOKEN_TYPE_FUNCTION));
        assert!(types.contains(&TOKEN_TYPE_VARIABLE));
        assert!(types.contains(&TOKEN_TYPE_PROPERTY));
    }

    #[test]
    fn tokens_are_sorted_by_position() {
        let ast = TscnParser::parse(concat!(
            "; leading comment\n",
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "a = 1\n",
            "b = Color(1, 0.5, 0.25, 1)\n",
        ));

        let data = tscn_semantic_tokens(&ast);
        // Delta lines are always non-negative by construction; verify the
        // stream decodes to monotonically increasing positions.
        let mut line = 0u32;
        let mut character = 0u32;
        let mut previous = (0u32, 0u32);
        for chunk in data.chunks(5) {
            line += chunk[0];
            character = if chunk[0] == 0 { character + chunk[1] } else { chunk[1] };
            assert!((line, character) >= previous, "tokens went backwards");
            previous = (line, character);
        }
    }
}
