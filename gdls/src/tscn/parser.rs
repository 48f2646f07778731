// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::{SourceLocation, SourceRange};

use super::{
    ArrayValue,
    BoolValue,
    Connection,
    DictEntry,
    DictValue,
    ExtResource,
    IdentValue,
    NullValue,
    NumberValue,
    Property,
    ResourceRef,
    ResourceRefKind,
    SceneDescriptor,
    SceneNode,
    StringValue,
    SubResource,
    TscnComment,
    TscnDocument,
    TscnLexer,
    TscnParseError,
    TscnParseErrorKind,
    TscnToken,
    TscnTokenKind,
    TscnValue,
    TypedValue,
};

/// Errors are capped to keep malformed input from exhausting memory.
pub const MAX_ERRORS: usize = 100;

/// Parses TSCN tokens into a [`TscnDocument`]. The parser always terminates
/// and produces a best-effort AST; syntax problems are collected into the
/// document's error list.
pub struct TscnParser {
    tokens: Vec<TscnToken>,
    cursor: usize,

    comments: Vec<TscnComment>,
    errors: Vec<TscnParseError>,
}

impl TscnParser {
    pub fn parse(input: &str) -> TscnDocument {
        let tokens = TscnLexer::new(input).collect_all();

        let mut parser = Self {
            tokens,
            cursor: 0,
            comments: Vec::new(),
            errors: Vec::new(),
        };

        parser.parse_document()
    }

    fn parse_document(&mut self) -> TscnDocument {
        let mut doc = TscnDocument::default();

        while !self.is_at_end() {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }

            match &self.current().kind {
                TscnTokenKind::Comment(..) => self.parse_comment(),
                TscnTokenKind::LeftBracket => self.parse_section(&mut doc),
                TscnTokenKind::Identifier(..) => {
                    // Top-level properties occur in .tres-style files.
                    _ = self.parse_property();
                }
                other => {
                    self.add_error(TscnParseErrorKind::UnexpectedToken {
                        token: other.to_string(),
                    });
                    self.advance();
                }
            }
        }

        doc.comments = std::mem::take(&mut self.comments);
        doc.errors = std::mem::take(&mut self.errors);
        doc
    }

    fn parse_comment(&mut self) {
        if let TscnTokenKind::Comment(text) = &self.current().kind {
            self.comments.push(TscnComment {
                range: self.current().range(),
                text: text.clone(),
            });
        }
        self.advance();
    }

    fn parse_section(&mut self, doc: &mut TscnDocument) {
        let start = self.current().begin;
        self.advance();

        let TscnTokenKind::Identifier(section_kind) = &self.current().kind else {
            self.add_error(TscnParseErrorKind::ExpectedSectionType);
            self.skip_to_next_section();
            return;
        };

        let section_kind = section_kind.clone();
        self.advance();

        match section_kind.as_str() {
            "gd_scene" | "gd_resource" => doc.descriptor = Some(self.parse_descriptor(start, section_kind)),
            "ext_resource" => {
                let ext = self.parse_ext_resource(start);
                doc.ext_resources.push(ext);
            }
            "sub_resource" => {
                let sub = self.parse_sub_resource(start);
                doc.sub_resources.push(sub);
            }
            "node" => {
                let node = self.parse_node(start);
                doc.nodes.push(node);
            }
            "connection" => {
                let connection = self.parse_connection(start);
                doc.connections.push(connection);
            }
            "resource" => self.parse_resource_section(),
            _ => {
                self.add_error(TscnParseErrorKind::UnknownSectionType {
                    name: section_kind,
                });
                self.skip_to_next_section();
            }
        }
    }

    fn parse_descriptor(&mut self, start: SourceLocation, kind: String) -> SceneDescriptor {
        let mut descriptor = SceneDescriptor {
            range: SourceRange::ZERO,
            kind,
            load_steps: None,
            format: 3,
            uid: String::new(),
            resource_type: String::new(),
        };

        self.parse_header_attributes(|parser, key| {
            match key {
                "load_steps" => {
                    if let TscnTokenKind::Number(raw) = &parser.current().kind {
                        descriptor.load_steps = Some(raw.parse().unwrap_or_default());
                        parser.advance();
                    }
                }
                "format" => {
                    if let TscnTokenKind::Number(raw) = &parser.current().kind {
                        descriptor.format = raw.parse().unwrap_or_default();
                        parser.advance();
                    }
                }
                "uid" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        descriptor.uid = value.clone();
                        parser.advance();
                    }
                }
                "type" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        descriptor.resource_type = value.clone();
                        parser.advance();
                    }
                }
                _ => {
                    _ = parser.parse_value();
                }
            }
        });

        self.consume_right_bracket();
        descriptor.range = SourceRange::new(start, self.previous_token_end());
        descriptor
    }

    fn parse_ext_resource(&mut self, start: SourceLocation) -> ExtResource {
        let mut ext = ExtResource::default();

        self.parse_header_attributes(|parser, key| {
            match key {
                "type" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        ext.resource_type = value.clone();
                        parser.advance();
                    }
                }
                "uid" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        ext.uid = value.clone();
                        parser.advance();
                    }
                }
                "path" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        ext.path = value.clone();
                        ext.path_range = parser.current().range();
                        parser.advance();
                    }
                }
                "id" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        ext.id = value.clone();
                        parser.advance();
                    }
                }
                _ => {
                    _ = parser.parse_value();
                }
            }
        });

        self.consume_right_bracket();
        ext.range = SourceRange::new(start, self.previous_token_end());
        ext
    }

    fn parse_sub_resource(&mut self, start: SourceLocation) -> SubResource {
        let mut sub = SubResource::default();

        self.parse_header_attributes(|parser, key| {
            match key {
                "type" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        sub.resource_type = value.clone();
                        parser.advance();
                    }
                }
                "id" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        sub.id = value.clone();
                        parser.advance();
                    }
                }
                _ => {
                    _ = parser.parse_value();
                }
            }
        });

        let mut end = self.current().end;
        self.consume_right_bracket();

        sub.properties = self.parse_section_properties();
        if let Some(last) = sub.properties.last() {
            end = last.range.end();
        }

        sub.range = SourceRange::new(start, end);
        sub
    }

    fn parse_node(&mut self, start: SourceLocation) -> SceneNode {
        let mut node = SceneNode::default();

        self.parse_header_attributes(|parser, key| {
            match key {
                "name" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        node.name = value.clone();
                        parser.advance();
                    }
                }
                "type" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        node.node_type = value.clone();
                        parser.advance();
                    }
                }
                "parent" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        node.parent = value.clone();
                        parser.advance();
                    }
                }
                "instance" => node.instance = parser.parse_value(),
                "instance_placeholder" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        node.instance_placeholder = value.clone();
                        parser.advance();
                    }
                }
                "owner" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        node.owner = value.clone();
                        parser.advance();
                    }
                }
                "index" => {
                    if let TscnTokenKind::Number(raw) = &parser.current().kind {
                        node.index = Some(raw.parse().unwrap_or_default());
                        parser.advance();
                    }
                }
                "groups" => {
                    if let Some(TscnValue::Array(array)) = parser.parse_value() {
                        for value in array.values {
                            if let TscnValue::String(group) = value {
                                node.groups.push(group.value);
                            }
                        }
                    }
                }
                _ => {
                    _ = parser.parse_value();
                }
            }
        });

        let mut end = self.current().end;
        self.consume_right_bracket();

        node.properties = self.parse_section_properties();
        if let Some(last) = node.properties.last() {
            end = last.range.end();
        }

        node.range = SourceRange::new(start, end);
        node
    }

    fn parse_connection(&mut self, start: SourceLocation) -> Connection {
        let mut connection = Connection::default();

        self.parse_header_attributes(|parser, key| {
            match key {
                "signal" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        connection.signal = value.clone();
                        parser.advance();
                    }
                }
                "from" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        connection.from = value.clone();
                        parser.advance();
                    }
                }
                "to" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        connection.to = value.clone();
                        parser.advance();
                    }
                }
                "method" => {
                    if let TscnTokenKind::String(value) = &parser.current().kind {
                        connection.method = value.clone();
                        parser.advance();
                    }
                }
                "flags" => {
                    if let TscnTokenKind::Number(raw) = &parser.current().kind {
                        connection.flags = Some(raw.parse().unwrap_or_default());
                        parser.advance();
                    }
                }
                "binds" => {
                    if let Some(TscnValue::Array(array)) = parser.parse_value() {
                        connection.binds = array.values;
                    }
                }
                _ => {
                    _ = parser.parse_value();
                }
            }
        });

        self.consume_right_bracket();
        connection.range = SourceRange::new(start, self.previous_token_end());
        connection
    }

    /// `[resource]` sections in .tres files carry top-level properties; they
    /// are parsed for error reporting but not materialised on the AST.
    fn parse_resource_section(&mut self) {
        while !self.is_at_end() && self.current().kind != TscnTokenKind::RightBracket {
            self.advance();
        }
        self.consume_right_bracket();

        _ = self.parse_section_properties();
    }

    /// Parses the `key=value` attributes of a section header up to the
    /// closing `]`. Only interpreted keys are kept; unknown attribute values
    /// are parsed and discarded.
    fn parse_header_attributes(&mut self, mut on_attribute: impl FnMut(&mut Self, &str)) {
        while self.current().kind != TscnTokenKind::RightBracket && !self.is_at_end() {
            let TscnTokenKind::Identifier(key) = &self.current().kind else {
                break;
            };

            let key = key.clone();
            self.advance();

            if self.current().kind != TscnTokenKind::Equals {
                self.add_error(TscnParseErrorKind::ExpectedEqualsAfterKey);
                continue;
            }
            self.advance();

            on_attribute(self, &key);
        }
    }

    /// Parses the properties that follow a section header, up to the next
    /// `[` or end of file.
    fn parse_section_properties(&mut self) -> Vec<Property> {
        let mut properties = Vec::new();

        self.skip_newlines();
        while !self.is_at_end() && self.current().kind != TscnTokenKind::LeftBracket {
            match &self.current().kind {
                TscnTokenKind::Comment(..) => self.parse_comment(),
                TscnTokenKind::Identifier(..) => {
                    if let Some(property) = self.parse_property() {
                        properties.push(property);
                    }
                }
                TscnTokenKind::Newline => self.advance(),
                _ => break,
            }
        }

        properties
    }

    fn parse_property(&mut self) -> Option<Property> {
        let key_start = self.current().begin;

        // Keys may contain slash-separated segments like `bones/0/position`.
        let mut key = String::new();
        loop {
            match &self.current().kind {
                TscnTokenKind::Identifier(part) => {
                    key.push_str(part);
                    self.advance();
                }
                TscnTokenKind::Number(part) => {
                    key.push_str(part);
                    self.advance();
                }
                TscnTokenKind::Slash => {
                    key.push('/');
                    self.advance();
                }
                _ => break,
            }
        }

        let key_end = self.previous_token_end();

        if self.current().kind != TscnTokenKind::Equals {
            self.add_error(TscnParseErrorKind::ExpectedEqualsAfterPropertyKey);
            return None;
        }
        self.advance();

        let value = self.parse_value()?;

        Some(Property {
            range: SourceRange::new(key_start, value.range().end()),
            key,
            key_range: SourceRange::new(key_start, key_end),
            value,
        })
    }

    fn parse_value(&mut self) -> Option<TscnValue> {
        match &self.current().kind {
            TscnTokenKind::String(value) => {
                let value = StringValue {
                    range: self.current().range(),
                    value: value.clone(),
                };
                self.advance();
                Some(TscnValue::String(value))
            }

            TscnTokenKind::Number(raw) => {
                let raw = raw.clone();
                let is_int = !raw.contains(['.', 'e', 'E'])
                    && raw != "inf"
                    && raw != "nan"
                    && raw != "-inf";
                let value = NumberValue {
                    range: self.current().range(),
                    value: raw.parse().unwrap_or_default(),
                    is_int,
                    raw,
                };
                self.advance();
                Some(TscnValue::Number(value))
            }

            TscnTokenKind::Bool(value) => {
                let value = BoolValue {
                    range: self.current().range(),
                    value: *value,
                };
                self.advance();
                Some(TscnValue::Bool(value))
            }

            TscnTokenKind::Null => {
                let value = NullValue {
                    range: self.current().range(),
                };
                self.advance();
                Some(TscnValue::Null(value))
            }

            TscnTokenKind::LeftBracket => Some(self.parse_array()),
            TscnTokenKind::LeftBrace => Some(self.parse_dict()),
            TscnTokenKind::Identifier(..) => Some(self.parse_typed_or_ident()),

            _ => None,
        }
    }

    fn parse_array(&mut self) -> TscnValue {
        let start = self.current().begin;
        self.advance();

        let mut values = Vec::new();
        while self.current().kind != TscnTokenKind::RightBracket && !self.is_at_end() {
            self.skip_newlines();
            if self.current().kind == TscnTokenKind::RightBracket {
                break;
            }

            match self.parse_value() {
                Some(value) => values.push(value),
                None => {
                    // Skip the offending token to guarantee forward progress.
                    self.advance();
                }
            }

            self.skip_newlines();
            if self.current().kind == TscnTokenKind::Comma {
                self.advance();
            }
        }

        let end = self.current().end;
        self.consume_right_bracket();

        TscnValue::Array(ArrayValue {
            range: SourceRange::new(start, end),
            values,
        })
    }

    fn parse_dict(&mut self) -> TscnValue {
        let start = self.current().begin;
        self.advance();

        let mut entries = Vec::new();
        while self.current().kind != TscnTokenKind::RightBrace && !self.is_at_end() {
            self.skip_newlines();
            if self.current().kind == TscnTokenKind::RightBrace {
                break;
            }

            let key_start = self.current().begin;
            let key = match &self.current().kind {
                TscnTokenKind::String(value) => {
                    let key = TscnValue::String(StringValue {
                        range: self.current().range(),
                        value: value.clone(),
                    });
                    self.advance();
                    key
                }
                TscnTokenKind::Identifier(name) => {
                    let key = TscnValue::Ident(IdentValue {
                        range: self.current().range(),
                        name: name.clone(),
                    });
                    self.advance();
                    key
                }
                _ => {
                    self.add_error(TscnParseErrorKind::ExpectedDictionaryKey);
                    self.advance();
                    continue;
                }
            };

            if self.current().kind != TscnTokenKind::Colon {
                self.add_error(TscnParseErrorKind::ExpectedColonAfterDictionaryKey);

                // Recover at the next comma, closing brace or newline.
                while !self.is_at_end()
                    && self.current().kind != TscnTokenKind::Comma
                    && self.current().kind != TscnTokenKind::RightBrace
                    && self.current().kind != TscnTokenKind::Newline
                {
                    self.advance();
                }
                continue;
            }
            self.advance();

            match self.parse_value() {
                Some(value) => entries.push(DictEntry {
                    range: SourceRange::new(key_start, value.range().end()),
                    key,
                    value,
                }),
                None => {
                    if self.current().kind != TscnTokenKind::Comma
                        && self.current().kind != TscnTokenKind::RightBrace
                    {
                        self.advance();
                    }
                }
            }

            self.skip_newlines();
            if self.current().kind == TscnTokenKind::Comma {
                self.advance();
            }
        }

        let end = self.current().end;
        if self.current().kind == TscnTokenKind::RightBrace {
            self.advance();
        }

        TscnValue::Dict(DictValue {
            range: SourceRange::new(start, end),
            entries,
        })
    }

    fn parse_typed_or_ident(&mut self) -> TscnValue {
        let start = self.current().begin;
        let type_range = self.current().range();
        let name = match &self.current().kind {
            TscnTokenKind::Identifier(name) => name.clone(),
            _ => String::new(),
        };
        self.advance();

        if self.current().kind != TscnTokenKind::LeftParen {
            return TscnValue::Ident(IdentValue {
                range: type_range,
                name,
            });
        }
        self.advance();

        // ExtResource("id") and SubResource("id") become resource
        // references instead of typed constructor values.
        let ref_type = match name.as_str() {
            "ExtResource" => Some(ResourceRefKind::ExtResource),
            "SubResource" => Some(ResourceRefKind::SubResource),
            _ => None,
        };

        if let Some(ref_type) = ref_type {
            if let TscnTokenKind::String(id) = &self.current().kind {
                let id = id.clone();
                let id_range = self.current().range();
                self.advance();

                let mut end = self.current().end;
                if self.current().kind == TscnTokenKind::RightParen {
                    self.advance();
                    end = self.previous_token_end();
                }

                return TscnValue::ResourceRef(ResourceRef {
                    range: SourceRange::new(start, end),
                    ref_type,
                    id,
                    id_range,
                });
            }
        }

        let mut arguments = Vec::new();
        while self.current().kind != TscnTokenKind::RightParen && !self.is_at_end() {
            match self.parse_value() {
                Some(value) => arguments.push(value),
                None => {
                    if self.current().kind != TscnTokenKind::RightParen
                        && self.current().kind != TscnTokenKind::Comma
                    {
                        self.advance();
                    }
                }
            }

            if self.current().kind == TscnTokenKind::Comma {
                self.advance();
            }
        }

        let mut end = self.current().end;
        if self.current().kind == TscnTokenKind::RightParen {
            self.advance();
            end = self.previous_token_end();
        }

        TscnValue::Typed(TypedValue {
            range: SourceRange::new(start, end),
            type_name: name,
            type_range,
            arguments,
        })
    }

    fn skip_newlines(&mut self) {
        loop {
            match &self.current().kind {
                TscnTokenKind::Newline => self.advance(),
                TscnTokenKind::Comment(..) => self.parse_comment(),
                _ => break,
            }
        }
    }

    fn skip_to_next_section(&mut self) {
        while !self.is_at_end() && self.current().kind != TscnTokenKind::LeftBracket {
            self.advance();
        }
    }

    fn consume_right_bracket(&mut self) {
        if self.current().kind == TscnTokenKind::RightBracket {
            self.advance();
        }
    }

    fn current(&self) -> &TscnToken {
        &self.tokens[self.cursor]
    }

    fn advance(&mut self) {
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
    }

    fn previous_token_end(&self) -> SourceLocation {
        if self.cursor > 0 {
            self.tokens[self.cursor - 1].end
        } else {
            self.current().end
        }
    }

    fn is_at_end(&self) -> bool {
        self.current().kind == TscnTokenKind::EndOfFile
    }

    fn add_error(&mut self, kind: TscnParseErrorKind) {
        if self.errors.len() >= MAX_ERRORS {
            return;
        }

        self.errors.push(TscnParseError {
            range: self.current().range(),
            kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_scene() {
        let doc = TscnParser::parse("[gd_scene format=3]");

        let descriptor = doc.descriptor.expect("expected a descriptor");
        assert_eq!(descriptor.kind, "gd_scene");
        assert_eq!(descriptor.format, 3);
        assert!(doc.errors.is_empty());
    }

    #[test]
    fn descriptor_with_uid_and_load_steps() {
        let doc = TscnParser::parse("[gd_scene load_steps=4 format=3 uid=\"uid://cecaux1sm7mo0\"]");

        let descriptor = doc.descriptor.expect("expected a descriptor");
        assert_eq!(descriptor.load_steps, Some(4));
        assert_eq!(descriptor.uid, "uid://cecaux1sm7mo0");
    }

    #[test]
    fn ext_resource_path_range_covers_quotes() {
        let doc = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[ext_resource type=\"Texture2D\" uid=\"uid://abc\" path=\"res://texture.png\" id=\"1_abc\"]",
        ));

        assert_eq!(doc.ext_resources.len(), 1);
        let ext = &doc.ext_resources[0];
        assert_eq!(ext.resource_type, "Texture2D");
        assert_eq!(ext.path, "res://texture.png");
        assert_eq!(ext.id, "1_abc");
        assert_eq!(ext.path_range.start().line(), 1);

        let len = ext.path_range.end().column() - ext.path_range.start().column();
        assert_eq!(len, "\"res://texture.png\"".len());
    }

    #[test]
    fn sub_resource_with_properties() {
        let doc = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[sub_resource type=\"SphereShape3D\" id=\"SphereShape3D_abc\"]\n",
            "radius = 1.5",
        ));

        assert_eq!(doc.sub_resources.len(), 1);
        let sub = &doc.sub_resources[0];
        assert_eq!(sub.resource_type, "SphereShape3D");
        assert_eq!(sub.id, "SphereShape3D_abc");
        assert_eq!(sub.properties.len(), 1);
        assert_eq!(sub.properties[0].key, "radius");
    }

    #[test]
    fn node_hierarchy() {
        let doc = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Player\" type=\"CharacterBody3D\"]\n",
            "[node name=\"Arm\" type=\"Node3D\" parent=\".\"]\n",
            "[node name=\"Hand\" type=\"Node3D\" parent=\"Arm\"]",
        ));

        assert_eq!(doc.nodes.len(), 3);
        assert_eq!(doc.nodes[0].parent, "");
        assert_eq!(doc.nodes[1].parent, ".");
        assert_eq!(doc.nodes[2].parent, "Arm");
        assert_eq!(doc.nodes[0].path(), "");
        assert_eq!(doc.nodes[1].path(), "Arm");
        assert_eq!(doc.nodes[2].path(), "Arm/Hand");
    }

    #[test]
    fn connection_section() {
        let doc = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "[connection signal=\"pressed\" from=\"Button\" to=\".\" method=\"_on_button_pressed\"]",
        ));

        assert_eq!(doc.connections.len(), 1);
        let connection = &doc.connections[0];
        assert_eq!(connection.signal, "pressed");
        assert_eq!(connection.from, "Button");
        assert_eq!(connection.to, ".");
        assert_eq!(connection.method, "_on_button_pressed");
    }

    #[test]
    fn typed_values() {
        let doc = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node3D\"]\n",
            "transform = Transform3D(1, 0, 0, 0, 1, 0, 0, 0, 1, 1, 2, 3)\n",
            "position = Vector3(1.5, 2.0, 3.0)",
        ));

        let node = &doc.nodes[0];
        assert_eq!(node.properties.len(), 2);

        let TscnValue::Typed(transform) = &node.properties[0].value else {
            panic!("expected a typed value for transform");
        };
        assert_eq!(transform.type_name, "Transform3D");
        assert_eq!(transform.arguments.len(), 12);

        let TscnValue::Typed(position) = &node.properties[1].value else {
            panic!("expected a typed value for position");
        };
        assert_eq!(position.type_name, "Vector3");
        assert_eq!(position.arguments.len(), 3);
    }

    #[test]
    fn resource_references() {
        let doc = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[ext_resource type=\"Script\" path=\"res://script.gd\" id=\"1_abc\"]\n",
            "[sub_resource type=\"BoxShape3D\" id=\"BoxShape_123\"]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "script = ExtResource(\"1_abc\")\n",
            "shape = SubResource(\"BoxShape_123\")",
        ));

        let node = &doc.nodes[0];

        let TscnValue::ResourceRef(script) = &node.properties[0].value else {
            panic!("expected a resource reference for script");
        };
        assert_eq!(script.ref_type, ResourceRefKind::ExtResource);
        assert_eq!(script.id, "1_abc");

        let TscnValue::ResourceRef(shape) = &node.properties[1].value else {
            panic!("expected a resource reference for shape");
        };
        assert_eq!(shape.ref_type, ResourceRefKind::SubResource);
        assert_eq!(shape.id, "BoxShape_123");
    }

    #[test]
    fn arrays_and_dicts() {
        let doc = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "values = [1, 2, 3]\n",
            "data = {\n",
            "\"key1\": 123,\n",
            "\"key2\": \"value\"\n",
            "}",
        ));

        let node = &doc.nodes[0];

        let TscnValue::Array(values) = &node.properties[0].value else {
            panic!("expected an array");
        };
        assert_eq!(values.values.len(), 3);

        let TscnValue::Dict(data) = &node.properties[1].value else {
            panic!("expected a dict");
        };
        assert_eq!(data.entries.len(), 2);
    }

    #[test]
    fn string_name_dict_keys() {
        let doc = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[sub_resource type=\"AnimationLibrary\" id=\"AnimationLibrary_abc\"]\n",
            "_data = {\n",
            "&\"RESET\": SubResource(\"Animation_reset\"),\n",
            "&\"walk\": SubResource(\"Animation_walk\")\n",
            "}",
        ));

        let sub = &doc.sub_resources[0];
        let TscnValue::Dict(data) = &sub.properties[0].value else {
            panic!("expected a dict for _data");
        };
        assert_eq!(data.entries.len(), 2);

        let TscnValue::String(first_key) = &data.entries[0].key else {
            panic!("expected a string key");
        };
        assert_eq!(first_key.value, "RESET");
    }

    #[test]
    fn slashed_property_keys() {
        let doc = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Skeleton\" type=\"Skeleton3D\"]\n",
            "bones/0/position = Vector3(0, 1, 0)",
        ));

        let node = &doc.nodes[0];
        assert_eq!(node.properties[0].key, "bones/0/position");
    }

    #[test]
    fn number_int_detection() {
        let doc = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "a = 3\n",
            "b = 3.5\n",
            "c = 1e3\n",
            "d = inf\n",
            "e = -inf\n",
            "f = nan",
        ));

        let ints: Vec<bool> = doc.nodes[0].properties.iter()
            .map(|property| match &property.value {
                TscnValue::Number(number) => number.is_int,
                other => panic!("expected a number, got {other:?}"),
            })
            .collect();

        assert_eq!(ints, [true, false, false, false, false, false]);
    }

    #[test]
    fn malformed_dict_recovers() {
        let doc = TscnParser::parse(concat!(
            "[node name=\"Root\" type=\"Node\"]\n",
            "data = { \"key1\" \"missing_colon\", \"key2\": 123 }",
        ));

        assert_eq!(doc.nodes.len(), 1);
        assert!(!doc.errors.is_empty());
    }

    #[test]
    fn malformed_array_recovers() {
        let doc = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "values = [1, 2, $$, 3]",
        ));

        assert!(doc.descriptor.is_some());
        assert_eq!(doc.nodes.len(), 1);
    }

    #[test]
    fn deeply_nested_malformed_input_terminates() {
        let doc = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[node name=\"Root\" type=\"Node\"]\n",
            "data = {\"a\": {\"b\": {\"c\": [1, 2, {\"d\" \"missing_colon\"}]}}",
        ));

        assert!(doc.descriptor.is_some());
    }

    #[test]
    fn error_cap_is_honoured() {
        let mut input = String::from("[gd_scene format=3]\n[node name=\"Root\" type=\"Node\"]\n");
        for _ in 0..200 {
            input.push_str("@@invalid@@\n");
        }

        let doc = TscnParser::parse(&input);
        assert!(doc.descriptor.is_some());
        assert!(doc.errors.len() <= MAX_ERRORS);
    }

    #[test]
    fn unknown_section_skips_to_next() {
        let doc = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "[bogus_section whatever=1]\n",
            "[node name=\"Root\" type=\"Node\"]",
        ));

        assert_eq!(doc.nodes.len(), 1);
        assert!(doc.errors.iter().any(|error| {
            matches!(&error.kind, TscnParseErrorKind::UnknownSectionType { name } if name == "bogus_section")
        }));
    }

    #[test]
    fn comments_are_collected() {
        let doc = TscnParser::parse(concat!(
            "[gd_scene format=3]\n",
            "; This is a comment\n",
            "[node name=\"Root\" type=\"Node\"]",
        ));

        assert_eq!(doc.comments.len(), 1);
        assert_eq!(doc.comments[0].text, " This is a comment");
    }
}
