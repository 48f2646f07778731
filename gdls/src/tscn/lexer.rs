// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::str::CharIndices;

use crate::SourceLocation;

use super::{TscnToken, TscnTokenKind};

/// Tokenizes TSCN source text. Whitespace is skipped, but newlines are
/// emitted as tokens since the parser uses them as property boundaries.
pub struct TscnLexer<'source> {
    input: &'source str,
    chars: CharIndices<'source>,

    current: Option<(SourceLocation, char)>,
    line: usize,
    column: usize,
}

impl<'source> TscnLexer<'source> {
    pub fn new(input: &'source str) -> Self {
        Self {
            input,
            chars: input.char_indices(),
            current: None,
            line: 0,
            column: 0,
        }
    }

    pub fn next(&mut self) -> TscnToken {
        self.skip_whitespace();

        let begin = self.current_location();

        let Some(ch) = self.peek_char() else {
            return TscnToken {
                kind: TscnTokenKind::EndOfFile,
                begin,
                end: begin,
            };
        };

        match ch {
            '[' => self.consume_single_char(TscnTokenKind::LeftBracket),
            ']' => self.consume_single_char(TscnTokenKind::RightBracket),
            '(' => self.consume_single_char(TscnTokenKind::LeftParen),
            ')' => self.consume_single_char(TscnTokenKind::RightParen),
            '{' => self.consume_single_char(TscnTokenKind::LeftBrace),
            '}' => self.consume_single_char(TscnTokenKind::RightBrace),
            '=' => self.consume_single_char(TscnTokenKind::Equals),
            ':' => self.consume_single_char(TscnTokenKind::Colon),
            ',' => self.consume_single_char(TscnTokenKind::Comma),
            '/' => self.consume_single_char(TscnTokenKind::Slash),
            '\n' => self.consume_single_char(TscnTokenKind::Newline),
            ';' => self.consume_comment(),
            '"' => self.consume_string(begin),

            '&' => {
                // StringName literal: &"name" tokenizes as a plain string.
                if self.peek_second_char() == Some('"') {
                    self.consume_char();
                    self.consume_string(begin)
                } else {
                    self.consume_single_char(TscnTokenKind::Error("&".into()))
                }
            }

            '-' | '+' => {
                match self.peek_second_char() {
                    Some(next) if next.is_ascii_digit() || next == '.' => self.consume_number(),
                    _ => self.consume_single_char(TscnTokenKind::Error(ch.to_string())),
                }
            }

            c if c.is_ascii_digit() || c == '.' => self.consume_number(),

            c if is_identifier_start(c) => self.consume_identifier(),

            c => self.consume_single_char(TscnTokenKind::Error(c.to_string())),
        }
    }

    pub fn collect_all(mut self) -> Vec<TscnToken> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next();
            let done = token.kind == TscnTokenKind::EndOfFile;
            tokens.push(token);
            if done {
                break;
            }
        }

        tokens
    }

    fn consume_single_char(&mut self, kind: TscnTokenKind) -> TscnToken {
        let begin = self.current_location();
        self.consume_char();

        TscnToken {
            kind,
            begin,
            end: self.current_location(),
        }
    }

    fn consume_comment(&mut self) -> TscnToken {
        let begin = self.current_location();
        self.consume_char();

        let text_begin = self.current_location().offset();
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }

            self.consume_char();
        }

        let end = self.current_location();
        TscnToken {
            kind: TscnTokenKind::Comment(self.input[text_begin..end.offset()].to_string()),
            begin,
            end,
        }
    }

    fn consume_string(&mut self, begin: SourceLocation) -> TscnToken {
        self.consume_char();

        let mut value = String::new();

        loop {
            let Some(c) = self.peek_char() else {
                return TscnToken {
                    kind: TscnTokenKind::Error("unterminated string".into()),
                    begin,
                    end: self.current_location(),
                };
            };

            match c {
                '"' => {
                    self.consume_char();
                    break;
                }

                '\n' => {
                    return TscnToken {
                        kind: TscnTokenKind::Error("unterminated string".into()),
                        begin,
                        end: self.current_location(),
                    };
                }

                '\\' => {
                    self.consume_char();
                    match self.peek_char() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),

                        Some(other) => {
                            value.push('\\');
                            value.push(other);
                        }

                        None => continue,
                    }
                    self.consume_char();
                }

                c => {
                    value.push(c);
                    self.consume_char();
                }
            }
        }

        TscnToken {
            kind: TscnTokenKind::String(value),
            begin,
            end: self.current_location(),
        }
    }

    fn consume_number(&mut self) -> TscnToken {
        let begin = self.current_location();

        if matches!(self.peek_char(), Some('-') | Some('+')) {
            self.consume_char();
        }

        if self.consume_keyword("inf") || self.consume_keyword("nan") {
            let end = self.current_location();
            return TscnToken {
                kind: TscnTokenKind::Number(self.input[begin.offset()..end.offset()].to_string()),
                begin,
                end,
            };
        }

        let mut has_digits = false;
        while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
            self.consume_char();
            has_digits = true;
        }

        if self.peek_char() == Some('.') {
            if matches!(self.peek_second_char(), Some(c) if c.is_ascii_digit()) {
                self.consume_char();
                while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                    self.consume_char();
                }
            } else if !has_digits {
                self.consume_char();
                return TscnToken {
                    kind: TscnTokenKind::Error("invalid number".into()),
                    begin,
                    end: self.current_location(),
                };
            }
        }

        if matches!(self.peek_char(), Some('e') | Some('E')) {
            self.consume_char();
            if matches!(self.peek_char(), Some('-') | Some('+')) {
                self.consume_char();
            }
            while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                self.consume_char();
            }
        }

        let end = self.current_location();
        TscnToken {
            kind: TscnTokenKind::Number(self.input[begin.offset()..end.offset()].to_string()),
            begin,
            end,
        }
    }

    fn consume_identifier(&mut self) -> TscnToken {
        let begin = self.current_location();

        while matches!(self.peek_char(), Some(c) if is_identifier_part(c)) {
            self.consume_char();
        }

        let end = self.current_location();
        let value = &self.input[begin.offset()..end.offset()];

        let kind = match value {
            "true" => TscnTokenKind::Bool(true),
            "false" => TscnTokenKind::Bool(false),
            "null" => TscnTokenKind::Null,
            "inf" | "nan" => TscnTokenKind::Number(value.to_string()),
            _ => TscnTokenKind::Identifier(value.to_string()),
        };

        TscnToken {
            kind,
            begin,
            end,
        }
    }

    /// Consumes `keyword` when the upcoming input matches it at a word
    /// boundary.
    fn consume_keyword(&mut self, keyword: &str) -> bool {
        let offset = self.current_location().offset();
        let remaining = &self.input[offset..];

        if !remaining.starts_with(keyword) {
            return false;
        }

        if let Some(next) = remaining[keyword.len()..].chars().next() {
            if is_identifier_part(next) {
                return false;
            }
        }

        for _ in 0..keyword.chars().count() {
            self.consume_char();
        }

        true
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(' ') | Some('\t') | Some('\r')) {
            self.consume_char();
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        if let Some((_, c)) = self.current {
            return Some(c);
        }

        self.current = self.chars.next()
            .map(|(offset, char)| {
                let location = SourceLocation::new(offset, self.line, self.column);

                if char == '\n' {
                    self.line += 1;
                    self.column = 0;
                } else {
                    self.column += 1;
                }

                (location, char)
            });
        Some(self.current?.1)
    }

    fn peek_second_char(&mut self) -> Option<char> {
        _ = self.peek_char();
        self.chars.clone().next().map(|(_, c)| c)
    }

    fn consume_char(&mut self) {
        self.current = None;
        _ = self.peek_char();
    }

    fn current_location(&mut self) -> SourceLocation {
        _ = self.peek_char();
        match self.current {
            Some((location, _)) => location,
            None => SourceLocation::new(self.input.len(), self.line, self.column),
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '@'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '@'
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lex(input: &str) -> Vec<TscnTokenKind> {
        TscnLexer::new(input)
            .collect_all()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[rstest]
    #[case("[", TscnTokenKind::LeftBracket)]
    #[case("]", TscnTokenKind::RightBracket)]
    #[case("=", TscnTokenKind::Equals)]
    #[case("node", TscnTokenKind::Identifier("node".into()))]
    #[case("@path", TscnTokenKind::Identifier("@path".into()))]
    #[case("true", TscnTokenKind::Bool(true))]
    #[case("false", TscnTokenKind::Bool(false))]
    #[case("null", TscnTokenKind::Null)]
    #[case("123", TscnTokenKind::Number("123".into()))]
    #[case("-2.5e10", TscnTokenKind::Number("-2.5e10".into()))]
    #[case("inf", TscnTokenKind::Number("inf".into()))]
    #[case("-inf", TscnTokenKind::Number("-inf".into()))]
    #[case("nan", TscnTokenKind::Number("nan".into()))]
    #[case(".5", TscnTokenKind::Number(".5".into()))]
    #[case("\"hello\"", TscnTokenKind::String("hello".into()))]
    #[case(r#""a\nb""#, TscnTokenKind::String("a\nb".into()))]
    #[case(r#""a\"b""#, TscnTokenKind::String("a\"b".into()))]
    #[case(r#"&"RESET""#, TscnTokenKind::String("RESET".into()))]
    fn single_token(#[case] input: &str, #[case] expected: TscnTokenKind) {
        let tokens = lex(input);
        assert_eq!(tokens[0], expected, "input: {input}");
        assert_eq!(tokens.last(), Some(&TscnTokenKind::EndOfFile));
    }

    #[test]
    fn unterminated_string_is_error() {
        let tokens = lex("\"abc");
        assert!(matches!(tokens[0], TscnTokenKind::Error(..)));
    }

    #[test]
    fn newlines_are_tokens() {
        let tokens = lex("a\nb");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1], TscnTokenKind::Newline);
    }

    #[test]
    fn comment_text_excludes_semicolon() {
        let tokens = lex("; hello");
        assert_eq!(tokens[0], TscnTokenKind::Comment(" hello".into()));
    }

    #[test]
    fn string_name_range_includes_ampersand() {
        let tokens = TscnLexer::new("&\"walk\"").collect_all();
        assert_eq!(tokens[0].begin.column(), 0);
        assert_eq!(tokens[0].end.column(), 7);
    }

    #[test]
    fn lone_dot_advances() {
        let tokens = lex(". . .");
        assert_eq!(tokens.iter().filter(|t| matches!(t, TscnTokenKind::Error(..))).count(), 3);
    }
}
