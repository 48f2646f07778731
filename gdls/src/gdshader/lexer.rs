// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::str::CharIndices;

use crate::SourceLocation;

use super::{ShaderToken, ShaderTokenKind};

/// Tokenizes GDShader source text. Newlines and comments are emitted as
/// tokens; [`ShaderLexer::tokenize_filtered`] drops both for the parser.
pub struct ShaderLexer<'source> {
    input: &'source str,
    chars: CharIndices<'source>,

    current: Option<(SourceLocation, char)>,
    line: usize,
    column: usize,
}

impl<'source> ShaderLexer<'source> {
    pub fn new(input: &'source str) -> Self {
        Self {
            input,
            chars: input.char_indices(),
            current: None,
            line: 0,
            column: 0,
        }
    }

    pub fn next_token(&mut self) -> ShaderToken {
        self.skip_whitespace();

        let begin = self.current_location();

        let Some(ch) = self.peek_char() else {
            return self.token_at(begin, ShaderTokenKind::EndOfFile);
        };

        match ch {
            '\n' => self.single(begin, ShaderTokenKind::Newline),
            '(' => self.single(begin, ShaderTokenKind::LeftParen),
            ')' => self.single(begin, ShaderTokenKind::RightParen),
            '{' => self.single(begin, ShaderTokenKind::LeftBrace),
            '}' => self.single(begin, ShaderTokenKind::RightBrace),
            '[' => self.single(begin, ShaderTokenKind::LeftBracket),
            ']' => self.single(begin, ShaderTokenKind::RightBracket),
            ';' => self.single(begin, ShaderTokenKind::Semicolon),
            ',' => self.single(begin, ShaderTokenKind::Comma),
            ':' => self.single(begin, ShaderTokenKind::Colon),
            '?' => self.single(begin, ShaderTokenKind::Question),
            '~' => self.single(begin, ShaderTokenKind::Tilde),

            '.' => {
                if matches!(self.peek_second_char(), Some(c) if c.is_ascii_digit()) {
                    self.consume_number(begin)
                } else {
                    self.single(begin, ShaderTokenKind::Dot)
                }
            }

            '+' => self.with_suffixes(begin, ShaderTokenKind::Plus, &[
                ('+', ShaderTokenKind::Increment),
                ('=', ShaderTokenKind::PlusAssign),
            ]),
            '-' => self.with_suffixes(begin, ShaderTokenKind::Minus, &[
                ('-', ShaderTokenKind::Decrement),
                ('=', ShaderTokenKind::MinusAssign),
            ]),
            '*' => self.with_suffixes(begin, ShaderTokenKind::Star, &[
                ('=', ShaderTokenKind::StarAssign),
            ]),
            '%' => self.with_suffixes(begin, ShaderTokenKind::Percent, &[
                ('=', ShaderTokenKind::PercentAssign),
            ]),
            '&' => self.with_suffixes(begin, ShaderTokenKind::Ampersand, &[
                ('&', ShaderTokenKind::AndAnd),
                ('=', ShaderTokenKind::AmpAssign),
            ]),
            '|' => self.with_suffixes(begin, ShaderTokenKind::Pipe, &[
                ('|', ShaderTokenKind::OrOr),
                ('=', ShaderTokenKind::PipeAssign),
            ]),
            '^' => self.with_suffixes(begin, ShaderTokenKind::Caret, &[
                ('=', ShaderTokenKind::CaretAssign),
            ]),
            '!' => self.with_suffixes(begin, ShaderTokenKind::Bang, &[
                ('=', ShaderTokenKind::NotEqual),
            ]),
            '=' => self.with_suffixes(begin, ShaderTokenKind::Assign, &[
                ('=', ShaderTokenKind::EqualEqual),
            ]),

            '<' => self.consume_angle(begin, ShaderTokenKind::Less, ShaderTokenKind::LessEqual,
                ShaderTokenKind::ShiftLeft, ShaderTokenKind::ShiftLeftAssign, '<'),
            '>' => self.consume_angle(begin, ShaderTokenKind::Greater, ShaderTokenKind::GreaterEqual,
                ShaderTokenKind::ShiftRight, ShaderTokenKind::ShiftRightAssign, '>'),

            '/' => {
                match self.peek_second_char() {
                    Some('/') => self.consume_line_comment(begin),
                    Some('*') => self.consume_block_comment(begin),
                    Some('=') => {
                        self.consume_char();
                        self.consume_char();
                        self.token_at(begin, ShaderTokenKind::SlashAssign)
                    }
                    _ => self.single(begin, ShaderTokenKind::Slash),
                }
            }

            c if c.is_alphabetic() || c == '_' => self.consume_identifier(begin),
            c if c.is_ascii_digit() => self.consume_number(begin),

            _ => {
                self.consume_char();
                self.token_at(begin, ShaderTokenKind::Error)
            }
        }
    }

    /// All tokens, including comments and newlines, terminated by the
    /// end-of-file token.
    pub fn tokenize(mut self) -> Vec<ShaderToken> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let done = token.kind == ShaderTokenKind::EndOfFile;
            tokens.push(token);
            if done {
                break;
            }
        }

        tokens
    }

    /// The parser's stream: comments and newlines filtered out.
    pub fn tokenize_filtered(self) -> Vec<ShaderToken> {
        self.tokenize()
            .into_iter()
            .filter(|token| {
                !token.kind.is_comment() && token.kind != ShaderTokenKind::Newline
            })
            .collect()
    }

    fn single(&mut self, begin: SourceLocation, kind: ShaderTokenKind) -> ShaderToken {
        self.consume_char();
        self.token_at(begin, kind)
    }

    fn with_suffixes(
        &mut self,
        begin: SourceLocation,
        plain: ShaderTokenKind,
        suffixes: &[(char, ShaderTokenKind)],
    ) -> ShaderToken {
        self.consume_char();

        for &(suffix, kind) in suffixes {
            if self.peek_char() == Some(suffix) {
                self.consume_char();
                return self.token_at(begin, kind);
            }
        }

        self.token_at(begin, plain)
    }

    fn consume_angle(
        &mut self,
        begin: SourceLocation,
        plain: ShaderTokenKind,
        equal: ShaderTokenKind,
        double: ShaderTokenKind,
        double_assign: ShaderTokenKind,
        repeat: char,
    ) -> ShaderToken {
        self.consume_char();

        if self.peek_char() == Some('=') {
            self.consume_char();
            return self.token_at(begin, equal);
        }

        if self.peek_char() == Some(repeat) {
            self.consume_char();
            if self.peek_char() == Some('=') {
                self.consume_char();
                return self.token_at(begin, double_assign);
            }
            return self.token_at(begin, double);
        }

        self.token_at(begin, plain)
    }

    fn consume_identifier(&mut self, begin: SourceLocation) -> ShaderToken {
        while matches!(self.peek_char(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.consume_char();
        }

        let literal = self.literal_since(begin);
        let kind = ShaderTokenKind::lookup_keyword(&literal).unwrap_or(ShaderTokenKind::Identifier);

        ShaderToken {
            kind,
            literal,
            location: begin,
        }
    }

    fn consume_number(&mut self, begin: SourceLocation) -> ShaderToken {
        // Hex literal.
        if self.peek_char() == Some('0') && matches!(self.peek_second_char(), Some('x') | Some('X')) {
            self.consume_char();
            self.consume_char();
            while matches!(self.peek_char(), Some(c) if c.is_ascii_hexdigit()) {
                self.consume_char();
            }

            return ShaderToken {
                kind: ShaderTokenKind::IntLiteral,
                literal: self.literal_since(begin),
                location: begin,
            };
        }

        let mut is_float = self.peek_char() == Some('.');

        while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
            self.consume_char();
        }

        if self.peek_char() == Some('.')
            && matches!(self.peek_second_char(), Some(c) if c.is_ascii_digit())
        {
            is_float = true;
            self.consume_char();
            while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                self.consume_char();
            }
        }

        if matches!(self.peek_char(), Some('e') | Some('E')) {
            is_float = true;
            self.consume_char();
            if matches!(self.peek_char(), Some('+') | Some('-')) {
                self.consume_char();
            }
            while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                self.consume_char();
            }
        }

        if matches!(self.peek_char(), Some('f') | Some('F')) {
            is_float = true;
            self.consume_char();
        }

        if matches!(self.peek_char(), Some('u') | Some('U')) {
            self.consume_char();
        }

        ShaderToken {
            kind: if is_float { ShaderTokenKind::FloatLiteral } else { ShaderTokenKind::IntLiteral },
            literal: self.literal_since(begin),
            location: begin,
        }
    }

    fn consume_line_comment(&mut self, begin: SourceLocation) -> ShaderToken {
        self.consume_char();
        self.consume_char();

        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.consume_char();
        }

        ShaderToken {
            kind: ShaderTokenKind::LineComment,
            literal: self.literal_since(begin),
            location: begin,
        }
    }

    fn consume_block_comment(&mut self, begin: SourceLocation) -> ShaderToken {
        self.consume_char();
        self.consume_char();

        // `/**` starts a doc comment, but `/**/` is just an empty block.
        let is_doc = self.peek_char() == Some('*') && self.peek_second_char() != Some('/');
        let mut kind = if is_doc {
            ShaderTokenKind::DocComment
        } else {
            ShaderTokenKind::BlockComment
        };

        loop {
            match self.peek_char() {
                None => {
                    kind = ShaderTokenKind::Error;
                    break;
                }
                Some('*') if self.peek_second_char() == Some('/') => {
                    self.consume_char();
                    self.consume_char();
                    break;
                }
                Some(..) => self.consume_char(),
            }
        }

        ShaderToken {
            kind,
            literal: self.literal_since(begin),
            location: begin,
        }
    }

    fn token_at(&mut self, begin: SourceLocation, kind: ShaderTokenKind) -> ShaderToken {
        ShaderToken {
            kind,
            literal: self.literal_since(begin),
            location: begin,
        }
    }

    fn literal_since(&mut self, begin: SourceLocation) -> String {
        let end = self.current_location().offset();
        self.input[begin.offset()..end].to_string()
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

/// Extracts the text of a `/** */` doc comment: each line is trimmed of
/// leading `*` and whitespace, and blank lines are dropped.
#[must_use]
pub fn extract_doc_comment(comment: &str) -> String {
    if comment.len() < 5 {
        return String::new();
    }

    let content = &comment[3..comment.len() - 2];

    content.lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(input: &str) -> Vec<ShaderTokenKind> {
        ShaderLexer::new(input)
            .tokenize_filtered()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[rstest]
    #[case("<<=", ShaderTokenKind::ShiftLeftAssign)]
    #[case(">>=", ShaderTokenKind::ShiftRightAssign)]
    #[case("<<", ShaderTokenKind::ShiftLeft)]
    #[case("<=", ShaderTokenKind::LessEqual)]
    #[case("==", ShaderTokenKind::EqualEqual)]
    #[case("!=", ShaderTokenKind::NotEqual)]
    #[case("++", ShaderTokenKind::Increment)]
    #[case("--", ShaderTokenKind::Decrement)]
    #[case("&&", ShaderTokenKind::AndAnd)]
    #[case("||", ShaderTokenKind::OrOr)]
    #[case("/=", ShaderTokenKind::SlashAssign)]
    #[case("shader_type", ShaderTokenKind::ShaderType)]
    #[case("group_uniforms", ShaderTokenKind::GroupUniforms)]
    #[case("sampler2DArray", ShaderTokenKind::Sampler2DArray)]
    #[case("my_var", ShaderTokenKind::Identifier)]
    #[case("123", ShaderTokenKind::IntLiteral)]
    #[case("0x1F", ShaderTokenKind::IntLiteral)]
    #[case("12u", ShaderTokenKind::IntLiteral)]
    #[case("1.5", ShaderTokenKind::FloatLiteral)]
    #[case(".5", ShaderTokenKind::FloatLiteral)]
    #[case("1e-3", ShaderTokenKind::FloatLiteral)]
    #[case("1.0f", ShaderTokenKind::FloatLiteral)]
    #[case("2f", ShaderTokenKind::FloatLiteral)]
    fn single_token(#[case] input: &str, #[case] expected: ShaderTokenKind) {
        let tokens = kinds(input);
        assert_eq!(tokens[0], expected, "input: {input}");
    }

    #[test]
    fn comments_have_kinds() {
        let tokens: Vec<_> = ShaderLexer::new("// line\n/* block */\n/** doc */")
            .tokenize()
            .into_iter()
            .map(|token| token.kind)
            .collect();

        assert!(tokens.contains(&ShaderTokenKind::LineComment));
        assert!(tokens.contains(&ShaderTokenKind::BlockComment));
        assert!(tokens.contains(&ShaderTokenKind::DocComment));
    }

    #[test]
    fn empty_block_comment_is_not_doc() {
        let tokens = ShaderLexer::new("/**/").tokenize();
        assert_eq!(tokens[0].kind, ShaderTokenKind::BlockComment);
    }

    #[test]
    fn unterminated_block_comment_is_error() {
        let tokens = ShaderLexer::new("/* never closed").tokenize();
        assert_eq!(tokens[0].kind, ShaderTokenKind::Error);
    }

    #[test]
    fn doc_comment_extraction() {
        let text = extract_doc_comment("/**\n * The strength of the effect.\n * Second line.\n */");
        assert_eq!(text, "The strength of the effect.\nSecond line.");
    }

    #[test]
    fn member_dot_is_not_a_float() {
        let tokens = kinds("v.xyz");
        assert_eq!(tokens[..3], [
            ShaderTokenKind::Identifier,
            ShaderTokenKind::Dot,
            ShaderTokenKind::Identifier,
        ]);
    }

    #[test]
    fn positions_are_zero_based() {
        let tokens = ShaderLexer::new("float x;\nfloat y;").tokenize_filtered();
        assert_eq!(tokens[0].location.line(), 0);
        assert_eq!(tokens[0].location.column(), 0);
        assert_eq!(tokens[3].location.line(), 1);
        assert_eq!(tokens[4].location.column(), 6);
    }
}
