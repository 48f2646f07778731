// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt::{Display, Formatter};

use crate::{SourceLocation, SourceRange};

#[derive(Debug, Clone, PartialEq)]
pub enum TscnTokenKind {
    Newline,
    Comment(String),

    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,

    Equals,
    Colon,
    Comma,
    Slash,

    Identifier(String),
    String(String),
    Number(String),
    Bool(bool),
    Null,

    EndOfFile,
    Error(String),
}

impl TscnTokenKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Newline => "newline",
            Self::Comment(..) => "comment",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::Equals => "=",
            Self::Colon => ":",
            Self::Comma => ",",
            Self::Slash => "/",
            Self::Identifier(..) => "identifier",
            Self::String(..) => "string",
            Self::Number(..) => "number",
            Self::Bool(..) => "bool",
            Self::Null => "null",
            Self::EndOfFile => "end of file",
            Self::Error(..) => "error",
        }
    }
}

impl Display for TscnTokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Comment(text) => f.write_fmt(format_args!(";{text}")),
            Self::Identifier(name) => f.write_str(name),
            Self::String(value) => f.write_fmt(format_args!("\"{value}\"")),
            Self::Number(raw) => f.write_str(raw),
            Self::Bool(value) => value.fmt(f),
            Self::Error(value) => f.write_str(value),
            other => f.write_str(other.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TscnToken {
    pub kind: TscnTokenKind,
    pub begin: SourceLocation,
    pub end: SourceLocation,
}

impl TscnToken {
    #[must_use]
    pub fn range(&self) -> SourceRange {
        SourceRange::new(self.begin, self.end)
    }

    #[must_use]
    pub fn is(&self, kind: &TscnTokenKind) -> bool {
        std::mem::discriminant(&self.kind) == std::mem::discriminant(kind)
    }
}
