// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::{SourceLocation, SourceRange};

use super::{
    extract_doc_comment,
    ArrayExpr,
    BinaryExpr,
    BinaryOp,
    BlockStmt,
    BreakStmt,
    CallExpr,
    CaseClause,
    ConstDecl,
    ContinueStmt,
    DiscardStmt,
    DoWhileStmt,
    EmptyStmt,
    Expr,
    ExprStmt,
    ForStmt,
    FunctionDecl,
    IdentExpr,
    IfStmt,
    IndexExpr,
    LiteralExpr,
    LiteralKind,
    MemberExpr,
    ParamDecl,
    RenderModeDecl,
    ReturnStmt,
    ShaderComment,
    ShaderDocument,
    ShaderLexer,
    ShaderParseError,
    ShaderToken,
    ShaderTokenKind,
    ShaderTypeDecl,
    Stmt,
    StructDecl,
    StructMember,
    SwitchStmt,
    TernaryExpr,
    TypeSpec,
    UnaryExpr,
    UnaryOp,
    UniformDecl,
    UniformHint,
    VarDeclStmt,
    VarDeclarator,
    VaryingDecl,
    WhileStmt,
};

/// Parses GDShader source into a [`ShaderDocument`]. Recursive descent with
/// an explicit precedence ladder; always terminates with a best-effort AST.
pub struct ShaderParser {
    tokens: Vec<ShaderToken>,
    cursor: usize,
    last_end: SourceLocation,

    errors: Vec<ShaderParseError>,
    comments: Vec<ShaderComment>,
    /// Pending `/** */` text, attached to the next uniform declaration.
    last_doc: String,
    /// Active `group_uniforms` group.
    current_group: String,
}

impl ShaderParser {
    pub fn parse(input: &str) -> ShaderDocument {
        let tokens = ShaderLexer::new(input).tokenize();

        let mut parser = Self {
            tokens,
            cursor: 0,
            last_end: SourceLocation::ZERO,
            errors: Vec::new(),
            comments: Vec::new(),
            last_doc: String::new(),
            current_group: String::new(),
        };

        parser.skip_trivia();
        parser.parse_document()
    }

    fn parse_document(&mut self) -> ShaderDocument {
        let mut doc = ShaderDocument::default();

        // shader_type must be the first statement.
        if self.check(ShaderTokenKind::ShaderType) {
            doc.shader_type = Some(self.parse_shader_type());
        }

        if self.check(ShaderTokenKind::RenderMode) {
            doc.render_modes = Some(self.parse_render_mode());
        }

        while !self.is_at_end() {
            if !self.parse_declaration(&mut doc) {
                self.synchronize();
            }
        }

        doc.errors = std::mem::take(&mut self.errors);
        doc.comments = std::mem::take(&mut self.comments);
        doc
    }

    fn parse_shader_type(&mut self) -> ShaderTypeDecl {
        let start = self.current().range().start();
        self.advance();

        let mut decl = ShaderTypeDecl {
            range: SourceRange::new(start, self.last_end),
            name: String::new(),
        };

        if self.check(ShaderTokenKind::Identifier) {
            decl.name = self.advance().literal;
        } else {
            self.error("expected shader type (spatial, canvas_item, particles, sky, or fog)");
            return decl;
        }

        self.expect(ShaderTokenKind::Semicolon, "expected ';' after shader_type");
        decl.range = SourceRange::new(start, self.last_end);
        decl
    }

    fn parse_render_mode(&mut self) -> RenderModeDecl {
        let start = self.current().range().start();
        self.advance();

        let mut decl = RenderModeDecl {
            range: SourceRange::new(start, self.last_end),
            modes: Vec::new(),
        };

        loop {
            if self.check(ShaderTokenKind::Identifier) {
                decl.modes.push(self.advance().literal);
            } else {
                self.error("expected render mode identifier");
                break;
            }

            if !self.match_token(ShaderTokenKind::Comma) {
                break;
            }
        }

        self.expect(ShaderTokenKind::Semicolon, "expected ';' after render_mode");
        decl.range = SourceRange::new(start, self.last_end);
        decl
    }

    /// Parses one top-level declaration into `doc`. Returns false when the
    /// parser should synchronize before continuing.
    fn parse_declaration(&mut self, doc: &mut ShaderDocument) -> bool {
        match self.current().kind {
            ShaderTokenKind::GroupUniforms => {
                self.parse_group_uniforms();
                true
            }

            ShaderTokenKind::Struct => {
                match self.parse_struct_decl() {
                    Some(decl) => {
                        doc.structs.push(decl);
                        true
                    }
                    None => false,
                }
            }

            ShaderTokenKind::Global => {
                self.advance();
                if self.check(ShaderTokenKind::Uniform) {
                    match self.parse_uniform_decl(true) {
                        Some(decl) => {
                            doc.uniforms.push(decl);
                            return true;
                        }
                        None => return false,
                    }
                }
                self.error("expected 'uniform' after 'global'");
                false
            }

            ShaderTokenKind::Uniform => {
                match self.parse_uniform_decl(false) {
                    Some(decl) => {
                        doc.uniforms.push(decl);
                        true
                    }
                    None => false,
                }
            }

            ShaderTokenKind::Flat | ShaderTokenKind::Smooth => {
                let interpolation = self.advance().literal;
                if self.check(ShaderTokenKind::Varying) {
                    match self.parse_varying_decl(interpolation) {
                        Some(decl) => {
                            doc.varyings.push(decl);
                            return true;
                        }
                        None => return false,
                    }
                }
                self.error("expected 'varying' after interpolation qualifier");
                false
            }

            ShaderTokenKind::Varying => {
                match self.parse_varying_decl(String::new()) {
                    Some(decl) => {
                        doc.varyings.push(decl);
                        true
                    }
                    None => false,
                }
            }

            ShaderTokenKind::Const => {
                match self.parse_const_decl() {
                    Some(decl) => {
                        doc.constants.push(decl);
                        true
                    }
                    None => false,
                }
            }

            _ => {
                match self.parse_function_decl() {
                    Some(decl) => {
                        doc.functions.push(decl);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// `group_uniforms name(.subgroup)? ;` is tracked for uniform grouping
    /// but not materialised as its own AST node.
    fn parse_group_uniforms(&mut self) {
        self.advance();

        let mut group = String::new();
        if self.check(ShaderTokenKind::Identifier) {
            group = self.advance().literal;

            if self.match_token(ShaderTokenKind::Dot) {
                if self.check(ShaderTokenKind::Identifier) {
                    let subgroup = self.advance().literal;
                    group = format!("{group}.{subgroup}");
                }
            }
        }

        self.expect(ShaderTokenKind::Semicolon, "expected ';' after group_uniforms");
        self.current_group = group;
    }

    fn parse_struct_decl(&mut self) -> Option<StructDecl> {
        let start = self.current().range().start();
        self.advance();

        if !self.check(ShaderTokenKind::Identifier) {
            self.error("expected struct name");
            return None;
        }
        let name = self.advance().literal;

        if !self.expect(ShaderTokenKind::LeftBrace, "expected '{' after struct name") {
            return None;
        }

        let mut members = Vec::new();
        while !self.check(ShaderTokenKind::RightBrace) && !self.is_at_end() {
            let before = self.cursor;
            match self.parse_struct_member() {
                Some(member) => members.push(member),
                None => {
                    if self.cursor == before {
                        self.advance();
                    }
                }
            }
        }

        self.expect(ShaderTokenKind::RightBrace, "expected '}' after struct members");
        self.expect(ShaderTokenKind::Semicolon, "expected ';' after struct declaration");

        Some(StructDecl {
            range: SourceRange::new(start, self.last_end),
            name,
            members,
        })
    }

    fn parse_struct_member(&mut self) -> Option<StructMember> {
        let start = self.current().range().start();
        let ty = self.parse_type_spec()?;

        if !self.check(ShaderTokenKind::Identifier) {
            self.error("expected member name");
            return None;
        }
        let name = self.advance().literal;

        self.expect(ShaderTokenKind::Semicolon, "expected ';' after struct member");

        Some(StructMember {
            range: SourceRange::new(start, self.last_end),
            ty,
            name,
        })
    }

    fn parse_uniform_decl(&mut self, is_global: bool) -> Option<UniformDecl> {
        let start = self.current().range().start();
        self.advance();

        let doc_comment = std::mem::take(&mut self.last_doc);

        let mut ty = self.parse_type_spec()?;

        if !self.check(ShaderTokenKind::Identifier) {
            self.error("expected uniform name");
            return None;
        }
        let name = self.advance().literal;

        self.parse_array_suffix(&mut ty);

        let mut hints = Vec::new();
        if self.match_token(ShaderTokenKind::Colon) {
            hints = self.parse_hints();
        }

        let mut default_value = None;
        if self.match_token(ShaderTokenKind::Assign) {
            default_value = Some(self.parse_expression());
        }

        self.expect(ShaderTokenKind::Semicolon, "expected ';' after uniform declaration");

        Some(UniformDecl {
            range: SourceRange::new(start, self.last_end),
            is_global,
            ty,
            name,
            hints,
            default_value,
            doc_comment,
            group: self.current_group.clone(),
        })
    }

    fn parse_hints(&mut self) -> Vec<UniformHint> {
        let mut hints = Vec::new();

        while self.check(ShaderTokenKind::Identifier) {
            let token = self.advance();
            let mut hint = UniformHint {
                range: token.range(),
                name: token.literal,
                arguments: Vec::new(),
            };

            if self.match_token(ShaderTokenKind::LeftParen) {
                while !self.check(ShaderTokenKind::RightParen) && !self.is_at_end() {
                    hint.arguments.push(self.parse_expression());
                    if !self.match_token(ShaderTokenKind::Comma) {
                        break;
                    }
                }
                self.expect(ShaderTokenKind::RightParen, "expected ')' after hint arguments");
                hint.range = SourceRange::new(hint.range.start(), self.last_end);
            }

            hints.push(hint);

            if !self.match_token(ShaderTokenKind::Comma) {
                break;
            }

            // A '=' after the comma starts the default value, not a hint.
            if self.check(ShaderTokenKind::Assign) {
                break;
            }
        }

        hints
    }

    fn parse_varying_decl(&mut self, interpolation: String) -> Option<VaryingDecl> {
        let start = self.current().range().start();
        self.advance();

        let mut ty = self.parse_type_spec()?;

        if !self.check(ShaderTokenKind::Identifier) {
            self.error("expected varying name");
            return None;
        }
        let name = self.advance().literal;

        self.parse_array_suffix(&mut ty);

        self.expect(ShaderTokenKind::Semicolon, "expected ';' after varying declaration");

        Some(VaryingDecl {
            range: SourceRange::new(start, self.last_end),
            interpolation,
            ty,
            name,
        })
    }

    fn parse_const_decl(&mut self) -> Option<ConstDecl> {
        let start = self.current().range().start();
        self.advance();

        let ty = self.parse_type_spec()?;

        if !self.check(ShaderTokenKind::Identifier) {
            self.error("expected constant name");
            return None;
        }
        let name = self.advance().literal;

        let mut decl = ConstDecl {
            range: SourceRange::new(start, self.last_end),
            ty,
            name,
            value: None,
        };

        if !self.expect(ShaderTokenKind::Assign, "expected '=' in constant declaration") {
            return Some(decl);
        }

        decl.value = Some(self.parse_expression());
        self.expect(ShaderTokenKind::Semicolon, "expected ';' after constant declaration");
        decl.range = SourceRange::new(start, self.last_end);
        Some(decl)
    }

    fn parse_function_decl(&mut self) -> Option<FunctionDecl> {
        let start = self.current().range().start();
        let return_type = self.parse_type_spec()?;

        if !self.check(ShaderTokenKind::Identifier) {
            self.error("expected identifier after type");
            return None;
        }
        let name = self.advance().literal;

        if !self.check(ShaderTokenKind::LeftParen) {
            self.error("global variables are not supported; use uniform or const");
            return None;
        }
        self.advance();

        let mut params = Vec::new();
        while !self.check(ShaderTokenKind::RightParen) && !self.is_at_end() {
            let before = self.cursor;
            if let Some(param) = self.parse_param_decl() {
                params.push(param);
            } else if self.cursor == before {
                self.advance();
            }

            if !self.match_token(ShaderTokenKind::Comma) {
                break;
            }
        }

        self.expect(ShaderTokenKind::RightParen, "expected ')' after function parameters");

        let body = if self.check(ShaderTokenKind::LeftBrace) {
            Some(self.parse_block_stmt())
        } else {
            self.error("expected '{' for function body");
            None
        };

        Some(FunctionDecl {
            range: SourceRange::new(start, self.last_end),
            return_type,
            name,
            params,
            body,
        })
    }

    fn parse_param_decl(&mut self) -> Option<ParamDecl> {
        let start = self.current().range().start();

        let qualifier = match self.current().kind {
            ShaderTokenKind::In
            | ShaderTokenKind::Out
            | ShaderTokenKind::Inout
            | ShaderTokenKind::Const => self.advance().literal,
            _ => String::new(),
        };

        let mut ty = self.parse_type_spec()?;

        if !self.check(ShaderTokenKind::Identifier) {
            self.error("expected parameter name");
            return None;
        }
        let name = self.advance().literal;

        self.parse_array_suffix(&mut ty);

        Some(ParamDecl {
            range: SourceRange::new(start, self.last_end),
            qualifier,
            ty,
            name,
        })
    }

    fn parse_type_spec(&mut self) -> Option<TypeSpec> {
        let start = self.current().range();

        let precision = if self.current().kind.is_precision() {
            self.advance().literal
        } else {
            String::new()
        };

        let name = if self.current().kind.is_type() || self.check(ShaderTokenKind::Identifier) {
            self.advance().literal
        } else {
            self.error("expected type name");
            return None;
        };

        Some(TypeSpec {
            range: SourceRange::new(start.start(), self.last_end),
            precision,
            name,
            array_size: None,
        })
    }

    /// Parses a trailing `[ size? ]` onto a declared type.
    fn parse_array_suffix(&mut self, ty: &mut TypeSpec) {
        if !self.match_token(ShaderTokenKind::LeftBracket) {
            return;
        }

        if !self.check(ShaderTokenKind::RightBracket) {
            ty.array_size = Some(Box::new(self.parse_expression()));
        }

        self.expect(ShaderTokenKind::RightBracket, "expected ']' after array size");
    }

    fn parse_block_stmt(&mut self) -> BlockStmt {
        let start = self.current().range().start();
        self.advance();

        let mut statements = Vec::new();
        while !self.check(ShaderTokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.parse_statement());
        }

        self.expect(ShaderTokenKind::RightBrace, "expected '}' after block");

        BlockStmt {
            range: SourceRange::new(start, self.last_end),
            statements,
        }
    }

    fn parse_statement(&mut self) -> Stmt {
        match self.current().kind {
            ShaderTokenKind::LeftBrace => Stmt::Block(self.parse_block_stmt()),
            ShaderTokenKind::If => self.parse_if_stmt(),
            ShaderTokenKind::For => self.parse_for_stmt(),
            ShaderTokenKind::While => self.parse_while_stmt(),
            ShaderTokenKind::Do => self.parse_do_while_stmt(),
            ShaderTokenKind::Switch => self.parse_switch_stmt(),
            ShaderTokenKind::Return => self.parse_return_stmt(),

            ShaderTokenKind::Break => {
                let range = self.current().range();
                self.advance();
                self.expect(ShaderTokenKind::Semicolon, "expected ';' after break");
                Stmt::Break(BreakStmt { range })
            }

            ShaderTokenKind::Continue => {
                let range = self.current().range();
                self.advance();
                self.expect(ShaderTokenKind::Semicolon, "expected ';' after continue");
                Stmt::Continue(ContinueStmt { range })
            }

            ShaderTokenKind::Discard => {
                let range = self.current().range();
                self.advance();
                self.expect(ShaderTokenKind::Semicolon, "expected ';' after discard");
                Stmt::Discard(DiscardStmt { range })
            }

            ShaderTokenKind::Semicolon => {
                let range = self.current().range();
                self.advance();
                Stmt::Empty(EmptyStmt { range })
            }

            ShaderTokenKind::Const => self.parse_var_decl_stmt(true),

            _ => {
                if self.is_type_start() {
                    self.parse_var_decl_stmt(false)
                } else {
                    self.parse_expr_stmt()
                }
            }
        }
    }

    /// Whether the current token can start a variable declaration.
    fn is_type_start(&self) -> bool {
        if self.current().kind.is_type() || self.current().kind.is_precision() {
            return true;
        }

        // A custom struct type followed by a variable name.
        self.check(ShaderTokenKind::Identifier)
            && self.peek_next().kind == ShaderTokenKind::Identifier
    }

    fn parse_var_decl_stmt(&mut self, is_const: bool) -> Stmt {
        let start = self.current().range().start();

        if is_const {
            self.advance();
        }

        let Some(ty) = self.parse_type_spec() else {
            return Stmt::Empty(EmptyStmt {
                range: SourceRange::new(start, self.last_end),
            });
        };

        let mut declarators = Vec::new();
        loop {
            let declarator_start = self.current().range().start();

            if !self.check(ShaderTokenKind::Identifier) {
                self.error("expected variable name");
                break;
            }
            let name = self.advance().literal;

            let mut array_size = None;
            if self.match_token(ShaderTokenKind::LeftBracket) {
                if !self.check(ShaderTokenKind::RightBracket) {
                    array_size = Some(self.parse_expression());
                }
                self.expect(ShaderTokenKind::RightBracket, "expected ']' after array size");
            }

            let mut init = None;
            if self.match_token(ShaderTokenKind::Assign) {
                init = Some(self.parse_expression());
            }

            declarators.push(VarDeclarator {
                range: SourceRange::new(declarator_start, self.last_end),
                name,
                array_size,
                init,
            });

            if !self.match_token(ShaderTokenKind::Comma) {
                break;
            }
        }

        self.expect(ShaderTokenKind::Semicolon, "expected ';' after variable declaration");

        Stmt::VarDecl(VarDeclStmt {
            range: SourceRange::new(start, self.last_end),
            is_const,
            ty,
            declarators,
        })
    }

    fn parse_if_stmt(&mut self) -> Stmt {
        let start = self.current().range().start();
        self.advance();

        self.expect(ShaderTokenKind::LeftParen, "expected '(' after 'if'");
        let condition = self.parse_expression();
        self.expect(ShaderTokenKind::RightParen, "expected ')' after if condition");

        let then_branch = Box::new(self.parse_statement());

        let mut else_branch = None;
        if self.match_token(ShaderTokenKind::Else) {
            else_branch = Some(Box::new(self.parse_statement()));
        }

        Stmt::If(IfStmt {
            range: SourceRange::new(start, self.last_end),
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_for_stmt(&mut self) -> Stmt {
        let start = self.current().range().start();
        self.advance();

        self.expect(ShaderTokenKind::LeftParen, "expected '(' after 'for'");

        let init = if self.check(ShaderTokenKind::Semicolon) {
            self.advance();
            None
        } else if self.is_type_start() {
            Some(Box::new(self.parse_var_decl_stmt(false)))
        } else {
            Some(Box::new(self.parse_expr_stmt()))
        };

        let condition = if self.check(ShaderTokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.expect(ShaderTokenKind::Semicolon, "expected ';' after for condition");

        let post = if self.check(ShaderTokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.expect(ShaderTokenKind::RightParen, "expected ')' after for clauses");

        let body = Box::new(self.parse_statement());

        Stmt::For(ForStmt {
            range: SourceRange::new(start, self.last_end),
            init,
            condition,
            post,
            body,
        })
    }

    fn parse_while_stmt(&mut self) -> Stmt {
        let start = self.current().range().start();
        self.advance();

        self.expect(ShaderTokenKind::LeftParen, "expected '(' after 'while'");
        let condition = self.parse_expression();
        self.expect(ShaderTokenKind::RightParen, "expected ')' after while condition");

        let body = Box::new(self.parse_statement());

        Stmt::While(WhileStmt {
            range: SourceRange::new(start, self.last_end),
            condition,
            body,
        })
    }

    fn parse_do_while_stmt(&mut self) -> Stmt {
        let start = self.current().range().start();
        self.advance();

        let body = Box::new(self.parse_statement());

        self.expect(ShaderTokenKind::While, "expected 'while' after do body");
        self.expect(ShaderTokenKind::LeftParen, "expected '(' after 'while'");
        let condition = self.parse_expression();
        self.expect(ShaderTokenKind::RightParen, "expected ')' after while condition");
        self.expect(ShaderTokenKind::Semicolon, "expected ';' after do-while");

        Stmt::DoWhile(DoWhileStmt {
            range: SourceRange::new(start, self.last_end),
            body,
            condition,
        })
    }

    fn parse_switch_stmt(&mut self) -> Stmt {
        let start = self.current().range().start();
        self.advance();

        self.expect(ShaderTokenKind::LeftParen, "expected '(' after 'switch'");
        let scrutinee = self.parse_expression();
        self.expect(ShaderTokenKind::RightParen, "expected ')' after switch expression");

        self.expect(ShaderTokenKind::LeftBrace, "expected '{' after switch");

        let mut cases = Vec::new();
        while !self.check(ShaderTokenKind::RightBrace) && !self.is_at_end() {
            let before = self.cursor;
            match self.parse_case_clause() {
                Some(clause) => cases.push(clause),
                None => {
                    if self.cursor == before {
                        self.advance();
                    }
                }
            }
        }

        self.expect(ShaderTokenKind::RightBrace, "expected '}' after switch cases");

        Stmt::Switch(SwitchStmt {
            range: SourceRange::new(start, self.last_end),
            scrutinee,
            cases,
        })
    }

    fn parse_case_clause(&mut self) -> Option<CaseClause> {
        let start = self.current().range().start();

        let mut values = Vec::new();
        if self.match_token(ShaderTokenKind::Case) {
            values.push(self.parse_expression());
        } else if !self.match_token(ShaderTokenKind::Default) {
            self.error("expected 'case' or 'default'");
            return None;
        }

        self.expect(ShaderTokenKind::Colon, "expected ':' after case/default");

        let mut body = Vec::new();
        while !self.check(ShaderTokenKind::Case)
            && !self.check(ShaderTokenKind::Default)
            && !self.check(ShaderTokenKind::RightBrace)
            && !self.is_at_end()
        {
            body.push(self.parse_statement());
        }

        Some(CaseClause {
            range: SourceRange::new(start, self.last_end),
            values,
            body,
        })
    }

    fn parse_return_stmt(&mut self) -> Stmt {
        let start = self.current().range().start();
        self.advance();

        let value = if self.check(ShaderTokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression())
        };

        self.expect(ShaderTokenKind::Semicolon, "expected ';' after return");

        Stmt::Return(ReturnStmt {
            range: SourceRange::new(start, self.last_end),
            value,
        })
    }

    fn parse_expr_stmt(&mut self) -> Stmt {
        let start = self.current().range().start();
        let expr = self.parse_expression();
        self.expect(ShaderTokenKind::Semicolon, "expected ';' after expression");

        Stmt::Expr(ExprStmt {
            range: SourceRange::new(start, self.last_end),
            expr,
        })
    }

    fn parse_expression(&mut self) -> Expr {
        self.parse_ternary()
    }

    fn parse_ternary(&mut self) -> Expr {
        let expr = self.parse_or();

        if self.match_token(ShaderTokenKind::Question) {
            let then_branch = self.parse_expression();
            self.expect(ShaderTokenKind::Colon, "expected ':' in ternary expression");
            let else_branch = self.parse_ternary();

            return Expr::Ternary(TernaryExpr {
                range: SourceRange::new(expr.range().start(), else_branch.range().end()),
                condition: Box::new(expr),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            });
        }

        expr
    }

    fn parse_binary_level(
        &mut self,
        operators: &[ShaderTokenKind],
        next: fn(&mut Self) -> Expr,
    ) -> Expr {
        let mut expr = next(self);

        loop {
            let Some(&kind) = operators.iter().find(|&&kind| self.check(kind)) else {
                break;
            };
            self.advance();

            let op = BinaryOp::from_token(kind).expect("operator table entries map to binary ops");
            let right = next(self);

            expr = Expr::Binary(BinaryExpr {
                range: SourceRange::new(expr.range().start(), right.range().end()),
                left: Box::new(expr),
                op,
                right: Box::new(right),
            });
        }

        expr
    }

    fn parse_or(&mut self) -> Expr {
        self.parse_binary_level(&[ShaderTokenKind::OrOr], Self::parse_and)
    }

    fn parse_and(&mut self) -> Expr {
        self.parse_binary_level(&[ShaderTokenKind::AndAnd], Self::parse_bit_or)
    }

    fn parse_bit_or(&mut self) -> Expr {
        self.parse_binary_level(&[ShaderTokenKind::Pipe], Self::parse_bit_xor)
    }

    fn parse_bit_xor(&mut self) -> Expr {
        self.parse_binary_level(&[ShaderTokenKind::Caret], Self::parse_bit_and)
    }

    fn parse_bit_and(&mut self) -> Expr {
        self.parse_binary_level(&[ShaderTokenKind::Ampersand], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Expr {
        self.parse_binary_level(
            &[ShaderTokenKind::EqualEqual, ShaderTokenKind::NotEqual],
            Self::parse_relational,
        )
    }

    fn parse_relational(&mut self) -> Expr {
        self.parse_binary_level(
            &[
                ShaderTokenKind::Less,
                ShaderTokenKind::Greater,
                ShaderTokenKind::LessEqual,
                ShaderTokenKind::GreaterEqual,
            ],
            Self::parse_shift,
        )
    }

    fn parse_shift(&mut self) -> Expr {
        self.parse_binary_level(
            &[ShaderTokenKind::ShiftLeft, ShaderTokenKind::ShiftRight],
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> Expr {
        self.parse_binary_level(
            &[ShaderTokenKind::Plus, ShaderTokenKind::Minus],
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> Expr {
        self.parse_binary_level(
            &[ShaderTokenKind::Star, ShaderTokenKind::Slash, ShaderTokenKind::Percent],
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Expr {
        let op = match self.current().kind {
            ShaderTokenKind::Bang => Some(UnaryOp::Not),
            ShaderTokenKind::Tilde => Some(UnaryOp::BitNot),
            ShaderTokenKind::Minus => Some(UnaryOp::Negate),
            ShaderTokenKind::Plus => Some(UnaryOp::Plus),
            ShaderTokenKind::Increment => Some(UnaryOp::Increment),
            ShaderTokenKind::Decrement => Some(UnaryOp::Decrement),
            _ => None,
        };

        if let Some(op) = op {
            let start = self.current().range().start();
            self.advance();
            let operand = self.parse_unary();

            return Expr::Unary(UnaryExpr {
                range: SourceRange::new(start, operand.range().end()),
                op,
                operand: Box::new(operand),
                prefix: true,
            });
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();

        loop {
            if self.match_token(ShaderTokenKind::LeftParen) {
                let mut arguments = Vec::new();
                while !self.check(ShaderTokenKind::RightParen) && !self.is_at_end() {
                    arguments.push(self.parse_expression());
                    if !self.match_token(ShaderTokenKind::Comma) {
                        break;
                    }
                }
                self.expect(ShaderTokenKind::RightParen, "expected ')' after arguments");

                expr = Expr::Call(CallExpr {
                    range: SourceRange::new(expr.range().start(), self.last_end),
                    callee: Box::new(expr),
                    arguments,
                });
            } else if self.match_token(ShaderTokenKind::LeftBracket) {
                let index = self.parse_expression();
                self.expect(ShaderTokenKind::RightBracket, "expected ']' after index");

                expr = Expr::Index(IndexExpr {
                    range: SourceRange::new(expr.range().start(), self.last_end),
                    base: Box::new(expr),
                    index: Box::new(index),
                });
            } else if self.match_token(ShaderTokenKind::Dot) {
                if !self.check(ShaderTokenKind::Identifier) {
                    self.error("expected member name after '.'");
                    break;
                }

                let member_token = self.advance();
                expr = Expr::Member(MemberExpr {
                    range: SourceRange::new(expr.range().start(), member_token.range().end()),
                    base: Box::new(expr),
                    member: member_token.literal,
                });
            } else if self.match_token(ShaderTokenKind::Increment) {
                expr = Expr::Unary(UnaryExpr {
                    range: expr.range(),
                    op: UnaryOp::Increment,
                    operand: Box::new(expr),
                    prefix: false,
                });
            } else if self.match_token(ShaderTokenKind::Decrement) {
                expr = Expr::Unary(UnaryExpr {
                    range: expr.range(),
                    op: UnaryOp::Decrement,
                    operand: Box::new(expr),
                    prefix: false,
                });
            } else if self.current().kind.is_assignment_op() {
                let op = BinaryOp::from_token(self.current().kind)
                    .expect("assignment tokens map to binary ops");
                self.advance();

                let right = self.parse_expression();
                expr = Expr::Binary(BinaryExpr {
                    range: SourceRange::new(expr.range().start(), right.range().end()),
                    left: Box::new(expr),
                    op,
                    right: Box::new(right),
                });
            } else {
                break;
            }
        }

        expr
    }

    fn parse_primary(&mut self) -> Expr {
        let token = self.current().clone();

        match token.kind {
            ShaderTokenKind::True | ShaderTokenKind::False => {
                self.advance();
                Expr::Literal(LiteralExpr {
                    range: token.range(),
                    kind: LiteralKind::Bool,
                    value: token.literal,
                })
            }

            ShaderTokenKind::IntLiteral => {
                self.advance();
                Expr::Literal(LiteralExpr {
                    range: token.range(),
                    kind: LiteralKind::Int,
                    value: token.literal,
                })
            }

            ShaderTokenKind::FloatLiteral => {
                self.advance();
                Expr::Literal(LiteralExpr {
                    range: token.range(),
                    kind: LiteralKind::Float,
                    value: token.literal,
                })
            }

            ShaderTokenKind::Identifier => {
                self.advance();
                Expr::Ident(IdentExpr {
                    range: token.range(),
                    name: token.literal,
                })
            }

            ShaderTokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression();
                self.expect(ShaderTokenKind::RightParen, "expected ')' after expression");
                expr
            }

            ShaderTokenKind::LeftBrace => self.parse_array_initializer(),

            kind if kind.is_type() => {
                self.advance();

                // A type name followed by `(` is a constructor call.
                if self.match_token(ShaderTokenKind::LeftParen) {
                    let mut arguments = Vec::new();
                    while !self.check(ShaderTokenKind::RightParen) && !self.is_at_end() {
                        arguments.push(self.parse_expression());
                        if !self.match_token(ShaderTokenKind::Comma) {
                            break;
                        }
                    }
                    self.expect(ShaderTokenKind::RightParen, "expected ')' after constructor arguments");

                    return Expr::Call(CallExpr {
                        range: SourceRange::new(token.range().start(), self.last_end),
                        callee: Box::new(Expr::Ident(IdentExpr {
                            range: token.range(),
                            name: token.literal,
                        })),
                        arguments,
                    });
                }

                Expr::Ident(IdentExpr {
                    range: token.range(),
                    name: token.literal,
                })
            }

            _ => {
                self.error(&format!("unexpected token: {}", token.literal));
                self.advance();
                Expr::Ident(IdentExpr {
                    range: token.range(),
                    name: token.literal,
                })
            }
        }
    }

    fn parse_array_initializer(&mut self) -> Expr {
        let start = self.current().range().start();
        self.advance();

        let mut elements = Vec::new();
        while !self.check(ShaderTokenKind::RightBrace) && !self.is_at_end() {
            elements.push(self.parse_expression());
            if !self.match_token(ShaderTokenKind::Comma) {
                break;
            }
        }

        self.expect(ShaderTokenKind::RightBrace, "expected '}' after array initializer");

        Expr::Array(ArrayExpr {
            range: SourceRange::new(start, self.last_end),
            elements,
        })
    }

    /// Skips tokens until the next `;` or the start of a declaration.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            match self.current().kind {
                ShaderTokenKind::Semicolon => {
                    self.advance();
                    return;
                }

                ShaderTokenKind::Struct
                | ShaderTokenKind::Uniform
                | ShaderTokenKind::Varying
                | ShaderTokenKind::Const
                | ShaderTokenKind::Void
                | ShaderTokenKind::Bool
                | ShaderTokenKind::Int
                | ShaderTokenKind::Uint
                | ShaderTokenKind::Float
                | ShaderTokenKind::Vec2
                | ShaderTokenKind::Vec3
                | ShaderTokenKind::Vec4
                | ShaderTokenKind::Mat2
                | ShaderTokenKind::Mat3
                | ShaderTokenKind::Mat4 => return,

                _ => self.advance(),
            };
        }
    }

    fn current(&self) -> &ShaderToken {
        &self.tokens[self.cursor]
    }

    /// The next significant token after the current one.
    fn peek_next(&self) -> &ShaderToken {
        let mut index = self.cursor + 1;
        while index < self.tokens.len() - 1 {
            let kind = self.tokens[index].kind;
            if kind != ShaderTokenKind::Newline && !kind.is_comment() {
                break;
            }
            index += 1;
        }

        &self.tokens[index.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> ShaderToken {
        let token = self.current().clone();
        if token.kind != ShaderTokenKind::EndOfFile {
            self.last_end = token.range().end();
        }

        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }

        self.skip_trivia();
        token
    }

    /// Collects comments and skips newlines so the grammar only ever sees
    /// significant tokens. Doc comments set the pending uniform docs.
    fn skip_trivia(&mut self) {
        while self.cursor < self.tokens.len() - 1 {
            let token = &self.tokens[self.cursor];
            match token.kind {
                ShaderTokenKind::Newline => {
                    self.cursor += 1;
                }
                ShaderTokenKind::LineComment | ShaderTokenKind::BlockComment => {
                    self.comments.push(ShaderComment {
                        range: token.range(),
                        text: token.literal.clone(),
                        is_doc: false,
                    });
                    self.cursor += 1;
                }
                ShaderTokenKind::DocComment => {
                    self.comments.push(ShaderComment {
                        range: token.range(),
                        text: token.literal.clone(),
                        is_doc: true,
                    });
                    self.last_doc = extract_doc_comment(&token.literal);
                    self.cursor += 1;
                }
                _ => break,
            }
        }
    }

    fn check(&self, kind: ShaderTokenKind) -> bool {
        self.current().kind == kind
    }

    fn match_token(&mut self, kind: ShaderTokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn expect(&mut self, kind: ShaderTokenKind, message: &str) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }

        self.error(message);
        false
    }

    fn is_at_end(&self) -> bool {
        self.current().kind == ShaderTokenKind::EndOfFile
    }

    fn error(&mut self, message: &str) {
        self.errors.push(ShaderParseError {
            range: self.current().range(),
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_type_and_render_mode() {
        let doc = ShaderParser::parse("shader_type spatial;\nrender_mode unshaded, cull_disabled;\n");

        assert_eq!(doc.shader_type.as_ref().map(|t| t.name.as_str()), Some("spatial"));
        let modes = doc.render_modes.expect("expected render modes");
        assert_eq!(modes.modes, ["unshaded", "cull_disabled"]);
        assert!(doc.errors.is_empty());
    }

    #[test]
    fn uniform_with_hints_and_default() {
        let doc = ShaderParser::parse(concat!(
            "shader_type canvas_item;\n",
            "uniform vec4 tint : source_color, hint_range(0.0, 1.0) = vec4(1.0);\n",
        ));

        assert_eq!(doc.uniforms.len(), 1);
        let uniform = &doc.uniforms[0];
        assert_eq!(uniform.name, "tint");
        assert_eq!(uniform.ty.name, "vec4");
        assert_eq!(uniform.hints.len(), 2);
        assert_eq!(uniform.hints[0].name, "source_color");
        assert_eq!(uniform.hints[1].name, "hint_range");
        assert_eq!(uniform.hints[1].arguments.len(), 2);
        assert!(uniform.default_value.is_some());
        assert!(doc.errors.is_empty());
    }

    #[test]
    fn doc_comment_attaches_to_uniform() {
        let doc = ShaderParser::parse(concat!(
            "shader_type spatial;\n",
            "/** The strength of the effect. */\n",
            "uniform float strength;\n",
        ));

        assert_eq!(doc.uniforms[0].doc_comment, "The strength of the effect.");
        assert!(doc.comments.iter().any(|comment| comment.is_doc));
    }

    #[test]
    fn group_uniforms_does_not_break_following_declaration() {
        let doc = ShaderParser::parse(concat!(
            "shader_type spatial;\n",
            "group_uniforms Light;\n",
            "uniform float brightness;\n",
        ));

        assert!(doc.errors.is_empty(), "errors: {:?}", doc.errors);
        assert_eq!(doc.uniforms.len(), 1);
        assert_eq!(doc.uniforms[0].group, "Light");
    }

    #[test]
    fn global_uniform() {
        let doc = ShaderParser::parse("shader_type spatial;\nglobal uniform float time_scale;\n");
        assert!(doc.uniforms[0].is_global);
    }

    #[test]
    fn varying_with_interpolation() {
        let doc = ShaderParser::parse("shader_type spatial;\nflat varying int id;\nvarying vec3 world_pos;\n");

        assert_eq!(doc.varyings.len(), 2);
        assert_eq!(doc.varyings[0].interpolation, "flat");
        assert_eq!(doc.varyings[1].interpolation, "");
    }

    #[test]
    fn struct_declaration() {
        let doc = ShaderParser::parse(concat!(
            "shader_type spatial;\n",
            "struct Light {\n",
            "  vec3 position;\n",
            "  float intensity;\n",
            "};\n",
        ));

        assert_eq!(doc.structs.len(), 1);
        let decl = &doc.structs[0];
        assert_eq!(decl.name, "Light");
        assert_eq!(decl.members.len(), 2);
        assert_eq!(decl.members[0].name, "position");
        assert_eq!(decl.members[1].ty.name, "float");
    }

    #[test]
    fn function_with_parameters_and_body() {
        let doc = ShaderParser::parse(concat!(
            "shader_type spatial;\n",
            "float add(in float a, float b) {\n",
            "  return a + b;\n",
            "}\n",
        ));

        assert_eq!(doc.functions.len(), 1);
        let function = &doc.functions[0];
        assert_eq!(function.name, "add");
        assert_eq!(function.params.len(), 2);
        assert_eq!(function.params[0].qualifier, "in");
        assert_eq!(function.params[1].qualifier, "");

        let body = function.body.as_ref().expect("expected a body");
        assert_eq!(body.statements.len(), 1);
        assert!(matches!(body.statements[0], Stmt::Return(..)));
    }

    #[test]
    fn precedence_of_arithmetic() {
        let doc = ShaderParser::parse("shader_type spatial;\nvoid vertex() { float x = 1.0 + 2.0 * 3.0; }\n");

        let body = doc.functions[0].body.as_ref().unwrap();
        let Stmt::VarDecl(decl) = &body.statements[0] else {
            panic!("expected a variable declaration");
        };

        let Some(Expr::Binary(add)) = &decl.declarators[0].init else {
            panic!("expected a binary initializer");
        };
        assert_eq!(add.op, BinaryOp::Add);

        let Expr::Binary(mul) = add.right.as_ref() else {
            panic!("expected the right operand to be the multiplication");
        };
        assert_eq!(mul.op, BinaryOp::Mul);
    }

    #[test]
    fn assignment_is_right_associative() {
        let doc = ShaderParser::parse("shader_type spatial;\nvoid vertex() { a = b = 1; }\n");

        let body = doc.functions[0].body.as_ref().unwrap();
        let Stmt::Expr(stmt) = &body.statements[0] else {
            panic!("expected an expression statement");
        };

        let Expr::Binary(outer) = &stmt.expr else {
            panic!("expected an assignment");
        };
        assert_eq!(outer.op, BinaryOp::Assign);
        assert!(matches!(outer.right.as_ref(), Expr::Binary(inner) if inner.op == BinaryOp::Assign));
    }

    #[test]
    fn postfix_chain() {
        let doc = ShaderParser::parse("shader_type spatial;\nvoid vertex() { v.xy[0]++; }\n");

        let body = doc.functions[0].body.as_ref().unwrap();
        let Stmt::Expr(stmt) = &body.statements[0] else {
            panic!("expected an expression statement");
        };

        let Expr::Unary(unary) = &stmt.expr else {
            panic!("expected a postfix unary");
        };
        assert!(!unary.prefix);
        assert!(matches!(unary.operand.as_ref(), Expr::Index(..)));
    }

    #[test]
    fn ternary_expression() {
        let doc = ShaderParser::parse("shader_type spatial;\nvoid vertex() { float x = true ? 1.0 : 2.0; }\n");

        let body = doc.functions[0].body.as_ref().unwrap();
        let Stmt::VarDecl(decl) = &body.statements[0] else {
            panic!("expected a variable declaration");
        };
        assert!(matches!(decl.declarators[0].init, Some(Expr::Ternary(..))));
    }

    #[test]
    fn control_flow_statements() {
        let doc = ShaderParser::parse(concat!(
            "shader_type spatial;\n",
            "void vertex() {\n",
            "  for (int i = 0; i < 10; i++) { continue; }\n",
            "  while (true) { break; }\n",
            "  do { } while (false);\n",
            "  switch (3) {\n",
            "    case 1: break;\n",
            "    default: break;\n",
            "  }\n",
            "}\n",
        ));

        assert!(doc.errors.is_empty(), "errors: {:?}", doc.errors);
        let body = doc.functions[0].body.as_ref().unwrap();
        assert_eq!(body.statements.len(), 4);

        let Stmt::Switch(switch) = &body.statements[3] else {
            panic!("expected a switch");
        };
        assert_eq!(switch.cases.len(), 2);
        assert_eq!(switch.cases[0].values.len(), 1);
        assert!(switch.cases[1].values.is_empty());
    }

    #[test]
    fn array_declarations() {
        let doc = ShaderParser::parse(concat!(
            "shader_type spatial;\n",
            "uniform float weights[4];\n",
            "void vertex() { float data[3] = { 1.0, 2.0, 3.0 }; }\n",
        ));

        assert!(doc.uniforms[0].ty.array_size.is_some());

        let body = doc.functions[0].body.as_ref().unwrap();
        let Stmt::VarDecl(decl) = &body.statements[0] else {
            panic!("expected a variable declaration");
        };
        assert!(decl.declarators[0].array_size.is_some());
        assert!(matches!(decl.declarators[0].init, Some(Expr::Array(..))));
    }

    #[test]
    fn multi_line_expressions_parse() {
        let doc = ShaderParser::parse(concat!(
            "shader_type spatial;\n",
            "void vertex() {\n",
            "  vec3 v = vec3(\n",
            "    1.0,\n",
            "    2.0,\n",
            "    3.0\n",
            "  );\n",
            "}\n",
        ));

        assert!(doc.errors.is_empty(), "errors: {:?}", doc.errors);
    }

    #[test]
    fn missing_shader_type_is_tolerated_by_parser() {
        let doc = ShaderParser::parse("void vertex() { }\n");
        assert!(doc.shader_type.is_none());
        assert_eq!(doc.functions.len(), 1);
    }

    #[test]
    fn synchronizes_after_garbage() {
        let doc = ShaderParser::parse(concat!(
            "shader_type spatial;\n",
            "??? garbage ???;\n",
            "uniform float ok;\n",
        ));

        assert!(!doc.errors.is_empty());
        assert_eq!(doc.uniforms.len(), 1);
    }

    #[test]
    fn nested_ranges_stay_inside_parents() {
        let doc = ShaderParser::parse(concat!(
            "shader_type spatial;\n",
            "void vertex() {\n",
            "  if (true) {\n",
            "    float x = 1.0 + 2.0;\n",
            "  }\n",
            "}\n",
        ));

        let function = &doc.functions[0];
        let body = function.body.as_ref().unwrap();
        let function_range = function.range;
        let body_range = body.range;

        assert!(function_range.start() <= body_range.start());
        assert!(body_range.end() <= function_range.end());

        let Stmt::If(if_stmt) = &body.statements[0] else {
            panic!("expected an if statement");
        };
        assert!(body_range.start() <= if_stmt.range.start());
        assert!(if_stmt.range.end() <= body_range.end());
        assert!(if_stmt.condition.range().start() >= if_stmt.range.start());
        assert!(if_stmt.then_branch.range().end() <= if_stmt.range.end());
    }
}
