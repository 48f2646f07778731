// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

mod ast;
mod lexer;
mod parser;
mod token;

pub use self::{
    ast::{
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
        TscnParseError,
        TscnParseErrorKind,
        TscnValue,
        TypedValue,
    },
    lexer::TscnLexer,
    parser::{TscnParser, MAX_ERRORS},
    token::{TscnToken, TscnTokenKind},
};
