// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::collections::HashMap;
use std::fmt::Display;

use crate::{SourceLocation, SourceRange};

use super::{
    binary_op_result_type,
    builtins,
    can_implicitly_convert,
    index_result_type,
    swizzle_has_duplicates,
    unary_op_result_type,
    validate_swizzle,
    ArrayExpr,
    BinaryExpr,
    BinaryOp,
    CallExpr,
    ConstDecl,
    Expr,
    FunctionDecl,
    IdentExpr,
    IndexExpr,
    LiteralKind,
    MemberExpr,
    ShaderDocument,
    ShaderKind,
    Stmt,
    StructDecl,
    StructField,
    TernaryExpr,
    Type,
    TypeSpec,
    UnaryExpr,
    UnaryOp,
    UniformDecl,
    VarDeclStmt,
    VaryingDecl,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SemanticError {
    pub range: SourceRange,
    pub message: String,
}

impl Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{}:{}: {}",
            self.range.start().line() + 1,
            self.range.start().column() + 1,
            self.message,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Constant,
    Uniform,
    Varying,
    Function,
    Struct,
    Parameter,
    BuiltinVariable,
    BuiltinFunction,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub kind: SymbolKind,
    pub range: SourceRange,
    pub constant: bool,
    pub read_only: bool,
    pub write_only: bool,
    pub qualifiers: Vec<String>,
    pub function: Option<FunctionSymbol>,
}

impl Symbol {
    fn new(name: String, ty: Type, kind: SymbolKind) -> Self {
        Self {
            name,
            ty,
            kind,
            range: SourceRange::ZERO,
            constant: false,
            read_only: false,
            write_only: false,
            qualifiers: Vec::new(),
            function: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionSymbol {
    pub params: Vec<Symbol>,
    pub return_type: Type,
}

/// The retained result of analyzing one shader document: the diagnostics
/// plus the global symbols and struct types for workspace queries.
#[derive(Debug, Default)]
pub struct ShaderAnalysis {
    pub shader_kind: Option<ShaderKind>,
    pub errors: Vec<SemanticError>,
    pub global_symbols: HashMap<String, Symbol>,
    pub structs: HashMap<String, Type>,
}

/// Three-pass semantic analyzer: struct registration, top-level symbol
/// registration, then function body analysis.
pub struct ShaderAnalyzer<'doc> {
    doc: &'doc ShaderDocument,
    shader_kind: Option<ShaderKind>,

    /// Scope stack; index 0 is the global scope.
    scopes: Vec<HashMap<String, Symbol>>,
    structs: HashMap<String, Type>,
    errors: Vec<SemanticError>,

    current_stage: String,
    current_return_type: Option<Type>,
    loop_depth: usize,
    switch_depth: usize,
}

impl<'doc> ShaderAnalyzer<'doc> {
    pub fn analyze(doc: &'doc ShaderDocument) -> ShaderAnalysis {
        let mut analyzer = Self {
            doc,
            shader_kind: None,
            scopes: vec![HashMap::new()],
            structs: HashMap::new(),
            errors: Vec::new(),
            current_stage: String::new(),
            current_return_type: None,
            loop_depth: 0,
            switch_depth: 0,
        };

        analyzer.run();

        ShaderAnalysis {
            shader_kind: analyzer.shader_kind,
            errors: analyzer.errors,
            global_symbols: analyzer.scopes.swap_remove(0),
            structs: analyzer.structs,
        }
    }

    fn run(&mut self) {
        let doc = self.doc;

        match &doc.shader_type {
            Some(decl) => self.shader_kind = ShaderKind::from_name(&decl.name),
            None => {
                self.add_error(
                    SourceLocation::ZERO.as_zero_range(),
                    "missing shader_type declaration".to_string(),
                );
            }
        }

        for constant in builtins::CONSTANTS {
            let mut symbol = Symbol::new(
                constant.name.to_string(),
                Type::from_name(constant.ty).unwrap_or(Type::Error),
                SymbolKind::Constant,
            );
            symbol.constant = true;
            symbol.read_only = true;
            _ = self.define(symbol);
        }

        // Pass 1: struct types.
        for decl in &doc.structs {
            self.register_struct(decl);
        }

        // Pass 2: top-level symbols.
        for decl in &doc.uniforms {
            self.register_uniform(decl);
        }
        for decl in &doc.varyings {
            self.register_varying(decl);
        }
        for decl in &doc.constants {
            self.register_constant(decl);
        }
        for decl in &doc.functions {
            self.register_function(decl);
        }

        for decl in &doc.uniforms {
            self.check_uniform_default(decl);
        }

        // Pass 3: function bodies.
        for decl in &doc.functions {
            self.analyze_function(decl);
        }
    }

    fn add_error(&mut self, range: SourceRange, message: String) {
        self.errors.push(SemanticError {
            range,
            message,
        });
    }

    fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    /// Defines a symbol in the innermost scope. Redefinition in the same
    /// scope is an error; shadowing an outer scope is allowed.
    fn define(&mut self, symbol: Symbol) -> Result<(), String> {
        let scope = self.scopes.last_mut().expect("scope stack is never empty");

        if let Some(existing) = scope.get(&symbol.name) {
            return Err(format!(
                "symbol '{}' already defined at line {}",
                symbol.name,
                existing.range.start().line() + 1,
            ));
        }

        scope.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn register_struct(&mut self, decl: &StructDecl) {
        if self.structs.contains_key(&decl.name) {
            self.add_error(decl.range, format!("struct '{}' already defined", decl.name));
            return;
        }

        let mut fields = Vec::with_capacity(decl.members.len());
        for member in &decl.members {
            let field_type = match self.resolve_type(&member.ty) {
                Some(ty) => ty,
                None => {
                    self.add_error(member.ty.range, format!("unknown type '{}'", member.ty.name));
                    Type::Error
                }
            };
            fields.push(StructField {
                name: member.name.clone(),
                ty: field_type,
            });
        }

        let struct_type = Type::struct_of(decl.name.clone(), fields);
        self.structs.insert(decl.name.clone(), struct_type.clone());

        let mut symbol = Symbol::new(decl.name.clone(), struct_type, SymbolKind::Struct);
        symbol.range = decl.range;
        _ = self.define(symbol);
    }

    fn register_uniform(&mut self, decl: &UniformDecl) {
        let ty = match self.resolve_type(&decl.ty) {
            Some(ty) => ty,
            None => {
                self.add_error(decl.ty.range, format!("unknown type '{}'", decl.ty.name));
                Type::Error
            }
        };

        let mut symbol = Symbol::new(decl.name.clone(), ty, SymbolKind::Uniform);
        symbol.range = decl.range;
        symbol.read_only = true;
        symbol.qualifiers.push("uniform".to_string());

        if let Err(message) = self.define(symbol) {
            self.add_error(decl.range, message);
        }
    }

    fn register_varying(&mut self, decl: &VaryingDecl) {
        let ty = match self.resolve_type(&decl.ty) {
            Some(ty) => ty,
            None => {
                self.add_error(decl.ty.range, format!("unknown type '{}'", decl.ty.name));
                Type::Error
            }
        };

        let mut symbol = Symbol::new(decl.name.clone(), ty, SymbolKind::Varying);
        symbol.range = decl.range;
        symbol.qualifiers.push("varying".to_string());
        if !decl.interpolation.is_empty() {
            symbol.qualifiers.push(decl.interpolation.clone());
        }

        if let Err(message) = self.define(symbol) {
            self.add_error(decl.range, message);
        }
    }

    fn register_constant(&mut self, decl: &ConstDecl) {
        let ty = match self.resolve_type(&decl.ty) {
            Some(ty) => ty,
            None => {
                self.add_error(decl.ty.range, format!("unknown type '{}'", decl.ty.name));
                Type::Error
            }
        };

        if let Some(value) = &decl.value {
            let init_type = self.analyze_expr(value);
            if ty != init_type && !can_implicitly_convert(&init_type, &ty) {
                self.add_error(decl.range, format!(
                    "cannot initialize '{}' of type '{}' with '{}'",
                    decl.name, ty, init_type,
                ));
            }
        }

        let mut symbol = Symbol::new(decl.name.clone(), ty, SymbolKind::Constant);
        symbol.range = decl.range;
        symbol.constant = true;
        symbol.read_only = true;
        symbol.qualifiers.push("const".to_string());

        if let Err(message) = self.define(symbol) {
            self.add_error(decl.range, message);
        }
    }

    fn register_function(&mut self, decl: &FunctionDecl) {
        let return_type = match self.resolve_type(&decl.return_type) {
            Some(ty) => ty,
            None => {
                self.add_error(
                    decl.return_type.range,
                    format!("unknown type '{}'", decl.return_type.name),
                );
                Type::Error
            }
        };

        let mut params = Vec::with_capacity(decl.params.len());
        for param in &decl.params {
            let param_type = match self.resolve_type(&param.ty) {
                Some(ty) => ty,
                None => {
                    self.add_error(param.ty.range, format!("unknown type '{}'", param.ty.name));
                    Type::Error
                }
            };

            let mut symbol = Symbol::new(param.name.clone(), param_type, SymbolKind::Parameter);
            symbol.range = param.range;
            symbol.qualifiers.push(param.qualifier.clone());
            params.push(symbol);
        }

        let mut symbol = Symbol::new(decl.name.clone(), return_type.clone(), SymbolKind::Function);
        symbol.range = decl.range;
        symbol.function = Some(FunctionSymbol {
            params,
            return_type,
        });

        if let Err(message) = self.define(symbol) {
            self.add_error(decl.range, message);
        }
    }

    fn check_uniform_default(&mut self, decl: &UniformDecl) {
        let Some(default) = &decl.default_value else {
            return;
        };

        let ty = self.resolve_type(&decl.ty).unwrap_or(Type::Error);
        let default_type = self.analyze_expr(default);

        if ty != Type::Error
            && ty != default_type
            && !can_implicitly_convert(&default_type, &ty)
        {
            self.add_error(default.range(), format!(
                "cannot initialize '{}' of type '{}' with '{}'",
                decl.name, ty, default_type,
            ));
        }
    }

    fn analyze_function(&mut self, decl: &FunctionDecl) {
        self.current_return_type = self.resolve_type(&decl.return_type);
        self.current_stage = match decl.name.as_str() {
            "vertex" | "fragment" | "light" | "start" | "process" | "sky" | "fog" => {
                decl.name.clone()
            }
            _ => String::new(),
        };

        self.enter_scope();
        self.register_builtin_variables();

        for param in &decl.params {
            let param_type = self.resolve_type(&param.ty).unwrap_or(Type::Error);

            let mut symbol = Symbol::new(param.name.clone(), param_type, SymbolKind::Parameter);
            symbol.range = param.range;
            symbol.qualifiers.push(param.qualifier.clone());
            symbol.read_only = param.qualifier == "in";
            symbol.write_only = param.qualifier == "out";
            _ = self.define(symbol);
        }

        if let Some(body) = &decl.body {
            self.analyze_block(body);
        }

        self.exit_scope();
        self.current_stage.clear();
        self.current_return_type = None;
    }

    /// Registers the built-in variables of the current shader type and
    /// stage into the function scope.
    fn register_builtin_variables(&mut self) {
        let Some(kind) = self.shader_kind else {
            return;
        };

        for variable in builtins::stage_variables(kind, &self.current_stage) {
            let Some(ty) = Type::from_name(variable.ty) else {
                continue;
            };

            let mut symbol = Symbol::new(variable.name.to_string(), ty, SymbolKind::BuiltinVariable);
            symbol.read_only = variable.read_write == "in";
            _ = self.define(symbol);
        }
    }

    fn resolve_type(&mut self, spec: &TypeSpec) -> Option<Type> {
        let base = Type::from_name(&spec.name)
            .or_else(|| self.structs.get(&spec.name).cloned())?;

        if let Some(size_expr) = &spec.array_size {
            let size = self.evaluate_const_expr(size_expr);
            return Some(Type::array_of(base, size));
        }

        Some(base)
    }

    /// Best-effort constant evaluation for array sizes; `-1` when unknown.
    fn evaluate_const_expr(&self, expr: &Expr) -> i64 {
        match expr {
            Expr::Literal(literal) if literal.kind == LiteralKind::Int => {
                literal.value.parse().unwrap_or(0)
            }
            _ => -1,
        }
    }

    fn analyze_block(&mut self, block: &super::BlockStmt) {
        self.enter_scope();
        for statement in &block.statements {
            self.analyze_stmt(statement);
        }
        self.exit_scope();
    }

    fn analyze_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.analyze_block(block),

            Stmt::VarDecl(decl) => self.analyze_var_decl(decl),

            Stmt::Expr(stmt) => {
                self.analyze_expr(&stmt.expr);
            }

            Stmt::If(stmt) => {
                let cond_type = self.analyze_expr(&stmt.condition);
                if cond_type != Type::Bool {
                    self.add_error(stmt.condition.range(), format!(
                        "condition must be a boolean expression, got '{cond_type}'",
                    ));
                }
                self.analyze_stmt(&stmt.then_branch);
                if let Some(else_branch) = &stmt.else_branch {
                    self.analyze_stmt(else_branch);
                }
            }

            Stmt::For(stmt) => {
                self.enter_scope();
                self.loop_depth += 1;
                if let Some(init) = &stmt.init {
                    self.analyze_stmt(init);
                }
                if let Some(condition) = &stmt.condition {
                    let cond_type = self.analyze_expr(condition);
                    if cond_type != Type::Bool {
                        self.add_error(
                            condition.range(),
                            "for condition must be a boolean expression".to_string(),
                        );
                    }
                }
                if let Some(post) = &stmt.post {
                    self.analyze_expr(post);
                }
                self.analyze_stmt(&stmt.body);
                self.loop_depth -= 1;
                self.exit_scope();
            }

            Stmt::While(stmt) => {
                let cond_type = self.analyze_expr(&stmt.condition);
                if cond_type != Type::Bool {
                    self.add_error(
                        stmt.condition.range(),
                        "while condition must be a boolean expression".to_string(),
                    );
                }
                self.loop_depth += 1;
                self.analyze_stmt(&stmt.body);
                self.loop_depth -= 1;
            }

            Stmt::DoWhile(stmt) => {
                self.loop_depth += 1;
                self.analyze_stmt(&stmt.body);
                self.loop_depth -= 1;
                let cond_type = self.analyze_expr(&stmt.condition);
                if cond_type != Type::Bool {
                    self.add_error(
                        stmt.condition.range(),
                        "do-while condition must be a boolean expression".to_string(),
                    );
                }
            }

            Stmt::Switch(stmt) => {
                let scrutinee_type = self.analyze_expr(&stmt.scrutinee);
                if !scrutinee_type.is_integer() {
                    self.add_error(
                        stmt.scrutinee.range(),
                        "switch expression must be an integer type".to_string(),
                    );
                }

                self.switch_depth += 1;
                for case in &stmt.cases {
                    for value in &case.values {
                        let case_type = self.analyze_expr(value);
                        if !case_type.is_integer() {
                            self.add_error(
                                value.range(),
                                "case value must be an integer".to_string(),
                            );
                        }
                    }
                    for statement in &case.body {
                        self.analyze_stmt(statement);
                    }
                }
                self.switch_depth -= 1;
            }

            Stmt::Return(stmt) => {
                let Some(return_type) = self.current_return_type.clone() else {
                    self.add_error(stmt.range, "return statement outside function".to_string());
                    return;
                };

                match &stmt.value {
                    Some(value) => {
                        let value_type = self.analyze_expr(value);
                        if return_type == Type::Void {
                            self.add_error(
                                stmt.range,
                                "void function should not return a value".to_string(),
                            );
                        } else if return_type != value_type
                            && !can_implicitly_convert(&value_type, &return_type)
                        {
                            self.add_error(stmt.range, format!(
                                "cannot return '{value_type}' from function returning '{return_type}'",
                            ));
                        }
                    }
                    None => {
                        if return_type != Type::Void {
                            self.add_error(
                                stmt.range,
                                "non-void function must return a value".to_string(),
                            );
                        }
                    }
                }
            }

            Stmt::Break(stmt) => {
                if self.loop_depth == 0 && self.switch_depth == 0 {
                    self.add_error(stmt.range, "break statement outside loop or switch".to_string());
                }
            }

            Stmt::Continue(stmt) => {
                if self.loop_depth == 0 {
                    self.add_error(stmt.range, "continue statement outside loop".to_string());
                }
            }

            Stmt::Discard(stmt) => {
                if self.current_stage != "fragment" {
                    self.add_error(stmt.range, "discard can only be used in fragment stage".to_string());
                }
            }

            Stmt::Empty(..) => {}
        }
    }

    fn analyze_var_decl(&mut self, stmt: &VarDeclStmt) {
        let base_type = match self.resolve_type(&stmt.ty) {
            Some(ty) => ty,
            None => {
                self.add_error(stmt.ty.range, format!("unknown type '{}'", stmt.ty.name));
                Type::Error
            }
        };

        for declarator in &stmt.declarators {
            let mut decl_type = base_type.clone();
            if let Some(size_expr) = &declarator.array_size {
                let size = self.evaluate_const_expr(size_expr);
                decl_type = Type::array_of(base_type.clone(), size);
            }

            if let Some(init) = &declarator.init {
                let init_type = self.analyze_expr(init);
                if decl_type != init_type && !can_implicitly_convert(&init_type, &decl_type) {
                    self.add_error(declarator.range, format!(
                        "cannot initialize '{}' of type '{}' with '{}'",
                        declarator.name, decl_type, init_type,
                    ));
                }
            }

            let mut symbol = Symbol::new(declarator.name.clone(), decl_type, SymbolKind::Variable);
            symbol.range = declarator.range;
            symbol.constant = stmt.is_const;
            symbol.read_only = stmt.is_const;

            if let Err(message) = self.define(symbol) {
                self.add_error(declarator.range, message);
            }
        }
    }

    fn analyze_expr(&mut self, expr: &Expr) -> Type {
        match expr {
            Expr::Literal(literal) => match literal.kind {
                LiteralKind::Int => Type::Int,
                LiteralKind::Float => Type::Float,
                LiteralKind::Bool => Type::Bool,
            },

            Expr::Ident(ident) => self.analyze_ident(ident),
            Expr::Binary(binary) => self.analyze_binary(binary),
            Expr::Unary(unary) => self.analyze_unary(unary),
            Expr::Ternary(ternary) => self.analyze_ternary(ternary),
            Expr::Call(call) => self.analyze_call(call),
            Expr::Index(index) => self.analyze_index(index),
            Expr::Member(member) => self.analyze_member(member),
            Expr::Array(array) => self.analyze_array(array),
        }
    }

    fn analyze_ident(&mut self, expr: &IdentExpr) -> Type {
        if let Some(constant) = builtins::constant(&expr.name) {
            return Type::from_name(constant.ty).unwrap_or(Type::Error);
        }

        match self.lookup(&expr.name) {
            Some(symbol) => symbol.ty.clone(),
            None => {
                self.add_error(expr.range, format!("undefined symbol '{}'", expr.name));
                Type::Error
            }
        }
    }

    fn analyze_binary(&mut self, expr: &BinaryExpr) -> Type {
        let left_type = self.analyze_expr(&expr.left);
        let right_type = self.analyze_expr(&expr.right);

        if expr.op.is_assignment() {
            self.check_assignable(&expr.left);

            if expr.op == BinaryOp::Assign {
                if left_type != right_type && !can_implicitly_convert(&right_type, &left_type) {
                    self.add_error(expr.range, format!(
                        "cannot assign '{right_type}' to '{left_type}'",
                    ));
                }
            } else {
                let result = binary_op_result_type(expr.op.underlying(), &left_type, &right_type);
                if result == Type::Error {
                    self.add_error(expr.range, format!(
                        "invalid operands for '{}': '{left_type}' and '{right_type}'",
                        expr.op,
                    ));
                }
            }

            return left_type;
        }

        let result = binary_op_result_type(expr.op, &left_type, &right_type);
        if result == Type::Error {
            self.add_error(expr.range, format!(
                "invalid operands for '{}': '{left_type}' and '{right_type}'",
                expr.op,
            ));
        }
        result
    }

    fn analyze_unary(&mut self, expr: &UnaryExpr) -> Type {
        let operand_type = self.analyze_expr(&expr.operand);

        if matches!(expr.op, UnaryOp::Increment | UnaryOp::Decrement) {
            self.check_assignable(&expr.operand);
        }

        let result = unary_op_result_type(expr.op, &operand_type);
        if result == Type::Error {
            self.add_error(expr.range, format!(
                "invalid operand for '{}': '{operand_type}'",
                expr.op,
            ));
        }
        result
    }

    fn analyze_ternary(&mut self, expr: &TernaryExpr) -> Type {
        let cond_type = self.analyze_expr(&expr.condition);
        if cond_type != Type::Bool {
            self.add_error(expr.condition.range(), format!(
                "ternary condition must be boolean, got '{cond_type}'",
            ));
        }

        let then_type = self.analyze_expr(&expr.then_branch);
        let else_type = self.analyze_expr(&expr.else_branch);

        if then_type == else_type {
            return then_type;
        }
        if can_implicitly_convert(&else_type, &then_type) {
            return then_type;
        }
        if can_implicitly_convert(&then_type, &else_type) {
            return else_type;
        }

        self.add_error(expr.range, format!(
            "incompatible types in ternary expression: '{then_type}' and '{else_type}'",
        ));
        Type::Error
    }

    fn analyze_call(&mut self, expr: &CallExpr) -> Type {
        let Expr::Ident(callee) = expr.callee.as_ref() else {
            self.add_error(expr.range, "expected function name".to_string());
            return Type::Error;
        };
        let name = callee.name.as_str();

        if Type::is_builtin_type_name(name) {
            return self.analyze_constructor(name, expr);
        }

        if let Some(builtin) = builtins::function(name) {
            return self.analyze_builtin_call(builtin, expr);
        }

        let Some(symbol) = self.lookup(name).cloned() else {
            self.add_error(expr.range, format!("undefined function '{name}'"));
            return Type::Error;
        };

        let Some(function) = (symbol.kind == SymbolKind::Function)
            .then_some(symbol.function.as_ref())
            .flatten()
        else {
            self.add_error(expr.range, format!("'{name}' is not a function"));
            return Type::Error;
        };

        if expr.arguments.len() != function.params.len() {
            self.add_error(expr.range, format!(
                "function '{name}' expects {} arguments, got {}",
                function.params.len(),
                expr.arguments.len(),
            ));
            return function.return_type.clone();
        }

        for (index, argument) in expr.arguments.iter().enumerate() {
            let argument_type = self.analyze_expr(argument);
            let param = &function.params[index];
            let qualifier = param.qualifiers.first().map(String::as_str).unwrap_or("");

            if qualifier == "out" || qualifier == "inout" {
                self.check_assignable(argument);
            }

            if param.ty != argument_type && !can_implicitly_convert(&argument_type, &param.ty) {
                self.add_error(argument.range(), format!(
                    "argument {}: cannot convert '{argument_type}' to '{}'",
                    index + 1,
                    param.ty,
                ));
            }
        }

        function.return_type.clone()
    }

    /// Validates a type-constructor call: scalars take exactly one
    /// argument, vectors take a splat scalar or components summing to their
    /// size, matrices take a diagonal scalar, another matrix, or components
    /// summing to `size * size`.
    fn analyze_constructor(&mut self, type_name: &str, expr: &CallExpr) -> Type {
        let Some(target) = Type::from_name(type_name) else {
            return Type::Error;
        };

        if expr.arguments.is_empty() {
            self.add_error(expr.range, "type constructor requires at least one argument".to_string());
            return target;
        }

        let argument_types: Vec<Type> = expr.arguments.iter()
            .map(|argument| self.analyze_expr(argument))
            .collect();

        if target.is_scalar() {
            if expr.arguments.len() != 1 {
                self.add_error(expr.range, "scalar constructor requires exactly one argument".to_string());
            }
            return target;
        }

        if target.is_vector() {
            let size = target.vector_size();
            let mut total_components = 0;
            for argument_type in &argument_types {
                if argument_type.is_scalar() {
                    total_components += 1;
                } else if argument_type.is_vector() {
                    total_components += argument_type.vector_size();
                } else {
                    self.add_error(expr.range, format!(
                        "invalid argument type '{argument_type}' for vector constructor",
                    ));
                }
            }

            // A single scalar splats across all components.
            if expr.arguments.len() == 1 && argument_types[0].is_scalar() {
                return target;
            }

            if total_components != size {
                self.add_error(expr.range, format!(
                    "vector constructor requires {size} components, got {total_components}",
                ));
            }
            return target;
        }

        if target.is_matrix() {
            let size = target.matrix_size();

            // A single scalar fills the diagonal.
            if expr.arguments.len() == 1 && argument_types[0].is_scalar() {
                return target;
            }

            let mut total_components = 0;
            for argument_type in &argument_types {
                if argument_type.is_scalar() {
                    total_components += 1;
                } else if argument_type.is_vector() {
                    total_components += argument_type.vector_size();
                } else if argument_type.is_matrix() {
                    total_components += argument_type.matrix_size() * argument_type.matrix_size();
                }
            }

            let expected = size * size;
            let from_matrix = expr.arguments.len() == 1 && argument_types[0].is_matrix();
            if total_components != expected && !from_matrix {
                self.add_error(expr.range, format!(
                    "matrix constructor requires {expected} components, got {total_components}",
                ));
            }
            return target;
        }

        target
    }

    /// Resolves a built-in call against its overload table: the first
    /// signature whose parameters each accept the argument by equality or
    /// implicit conversion wins.
    fn analyze_builtin_call(&mut self, builtin: &'static builtins::BuiltinFunction, expr: &CallExpr) -> Type {
        let argument_types: Vec<Type> = expr.arguments.iter()
            .map(|argument| self.analyze_expr(argument))
            .collect();

        for signature in builtin.signatures {
            if signature.params.len() != argument_types.len() {
                continue;
            }

            let matches = signature.params.iter()
                .zip(&argument_types)
                .all(|(param_name, argument_type)| {
                    match Type::from_name(param_name) {
                        Some(param_type) => {
                            param_type == *argument_type
                                || can_implicitly_convert(argument_type, &param_type)
                        }
                        None => false,
                    }
                });

            if matches {
                return Type::from_name(signature.ret).unwrap_or(Type::Error);
            }
        }

        let rendered: Vec<String> = argument_types.iter().map(Type::to_string).collect();
        self.add_error(expr.range, format!(
            "no matching overload for '{}({})'",
            builtin.name,
            rendered.join(", "),
        ));

        // Fall back to the first signature so analysis can continue.
        builtin.signatures.first()
            .and_then(|signature| Type::from_name(signature.ret))
            .unwrap_or(Type::Error)
    }

    fn analyze_index(&mut self, expr: &IndexExpr) -> Type {
        let base_type = self.analyze_expr(&expr.base);
        let index_type = self.analyze_expr(&expr.index);

        if !index_type.is_integer() {
            self.add_error(expr.index.range(), format!(
                "index must be an integer, got '{index_type}'",
            ));
        }

        let result = index_result_type(&base_type);
        if result == Type::Error {
            self.add_error(expr.range, format!("cannot index type '{base_type}'"));
        }
        result
    }

    fn analyze_member(&mut self, expr: &MemberExpr) -> Type {
        let base_type = self.analyze_expr(&expr.base);

        if base_type.is_vector() {
            return match validate_swizzle(&base_type, &expr.member) {
                Ok(result) => result,
                Err(message) => {
                    self.add_error(expr.range, message);
                    Type::Error
                }
            };
        }

        if let Type::Struct(struct_type) = &base_type {
            for field in &struct_type.fields {
                if field.name == expr.member {
                    return field.ty.clone();
                }
            }
            self.add_error(expr.range, format!(
                "struct '{}' has no field '{}'",
                struct_type.name, expr.member,
            ));
            return Type::Error;
        }

        if base_type.is_matrix() {
            self.add_error(
                expr.range,
                "cannot use member access on matrix type, use index instead".to_string(),
            );
            return Type::Error;
        }

        self.add_error(expr.range, format!(
            "cannot access member '{}' on type '{base_type}'",
            expr.member,
        ));
        Type::Error
    }

    fn analyze_array(&mut self, expr: &ArrayExpr) -> Type {
        if expr.elements.is_empty() {
            self.add_error(expr.range, "empty array initializer".to_string());
            return Type::Error;
        }

        let element_type = self.analyze_expr(&expr.elements[0]);
        for element in &expr.elements[1..] {
            let ty = self.analyze_expr(element);
            if ty != element_type && !can_implicitly_convert(&ty, &element_type) {
                self.add_error(element.range(), format!(
                    "array element type mismatch: expected '{element_type}', got '{ty}'",
                ));
            }
        }

        Type::array_of(element_type, expr.elements.len() as i64)
    }

    /// An expression is assignable when it names a writable place: a
    /// non-constant identifier, an index into one, or a swizzle without
    /// repeated components.
    fn check_assignable(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => {
                let Some(symbol) = self.lookup(&ident.name) else {
                    // The undefined-symbol error is already reported.
                    return;
                };

                if symbol.constant || symbol.read_only {
                    let name = ident.name.clone();
                    self.add_error(ident.range, format!("cannot assign to '{name}' (read-only)"));
                }
            }

            Expr::Index(index) => self.check_assignable(&index.base),

            Expr::Member(member) => {
                let base_type = self.analyze_expr(&member.base);
                if base_type.is_vector() && swizzle_has_duplicates(&member.member) {
                    self.add_error(
                        member.range,
                        "cannot assign to swizzle with duplicate components".to_string(),
                    );
                    return;
                }
                self.check_assignable(&member.base);
            }

            other => {
                self.add_error(other.range(), "expression is not assignable".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdshader::ShaderParser;

    fn analyze(source: &str) -> Vec<SemanticError> {
        let doc = ShaderParser::parse(source);
        assert!(doc.errors.is_empty(), "parse errors: {:?}", doc.errors);
        ShaderAnalyzer::analyze(&doc).errors
    }

    fn assert_clean(source: &str) {
        let errors = analyze(source);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn missing_shader_type_is_reported_at_origin() {
        let doc = ShaderParser::parse("void vertex() { }\n");
        let analysis = ShaderAnalyzer::analyze(&doc);
        assert!(analysis.errors.iter().any(|error| {
            error.message == "missing shader_type declaration"
                && error.range.start().line() == 0
                && error.range.start().column() == 0
        }));
    }

    #[test]
    fn float_to_int_initialization_is_rejected() {
        let errors = analyze(concat!(
            "shader_type canvas_item;\n",
            "void fragment() { float x = 1; int y = x; }\n",
        ));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "cannot initialize 'y' of type 'int' with 'float'");
        assert_eq!(errors[0].range.start().line(), 1);
    }

    #[test]
    fn int_to_float_initialization_is_allowed() {
        assert_clean("shader_type canvas_item;\nvoid fragment() { float x = 1; }\n");
    }

    #[test]
    fn duplicate_swizzle_assignment_is_rejected() {
        let errors = analyze(concat!(
            "shader_type spatial;\n",
            "void vertex() {\n",
            "  vec3 v;\n",
            "  v.xxx = vec3(1);\n",
            "  v.xy = vec2(1);\n",
            "}\n",
        ));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "cannot assign to swizzle with duplicate components");
    }

    #[test]
    fn undefined_symbol() {
        let errors = analyze("shader_type spatial;\nvoid vertex() { float x = missing; }\n");
        assert!(errors.iter().any(|error| error.message == "undefined symbol 'missing'"));
    }

    #[test]
    fn builtin_constants_resolve() {
        assert_clean("shader_type spatial;\nvoid vertex() { float x = PI + TAU + E; }\n");
    }

    #[test]
    fn duplicate_declaration_cites_prior_line() {
        let errors = analyze(concat!(
            "shader_type spatial;\n",
            "uniform float speed;\n",
            "uniform float speed;\n",
        ));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "symbol 'speed' already defined at line 2");
    }

    #[test]
    fn shadowing_in_nested_scope_is_allowed() {
        assert_clean(concat!(
            "shader_type spatial;\n",
            "void vertex() {\n",
            "  float x = 1.0;\n",
            "  { float x = 2.0; }\n",
            "}\n",
        ));
    }

    #[test]
    fn redefinition_in_same_scope_is_rejected() {
        let errors = analyze(concat!(
            "shader_type spatial;\n",
            "void vertex() { float x = 1.0; float x = 2.0; }\n",
        ));
        assert!(errors.iter().any(|error| error.message.starts_with("symbol 'x' already defined")));
    }

    #[test]
    fn discard_outside_fragment_is_rejected() {
        let errors = analyze("shader_type spatial;\nvoid vertex() { discard; }\n");
        assert!(errors.iter().any(|error| error.message == "discard can only be used in fragment stage"));

        assert_clean("shader_type spatial;\nvoid fragment() { discard; }\n");
    }

    #[test]
    fn break_and_continue_contexts() {
        let errors = analyze("shader_type spatial;\nvoid vertex() { break; continue; }\n");
        assert!(errors.iter().any(|error| error.message == "break statement outside loop or switch"));
        assert!(errors.iter().any(|error| error.message == "continue statement outside loop"));

        assert_clean(concat!(
            "shader_type spatial;\n",
            "void vertex() { for (int i = 0; i < 4; i++) { continue; } }\n",
        ));
    }

    #[test]
    fn switch_requires_integer_scrutinee_and_cases() {
        let errors = analyze(concat!(
            "shader_type spatial;\n",
            "void vertex() { switch (1.0) { case 1: break; } }\n",
        ));
        assert!(errors.iter().any(|error| error.message == "switch expression must be an integer type"));

        assert_clean(concat!(
            "shader_type spatial;\n",
            "void vertex() { int i = 2; switch (i) { case 1: break; default: break; } }\n",
        ));
    }

    #[test]
    fn return_type_checking() {
        let errors = analyze("shader_type spatial;\nfloat half_of(float x) { return; }\n");
        assert!(errors.iter().any(|error| error.message == "non-void function must return a value"));

        let errors = analyze("shader_type spatial;\nvoid vertex() { return 1.0; }\n");
        assert!(errors.iter().any(|error| error.message == "void function should not return a value"));

        let errors = analyze("shader_type spatial;\nint pick() { return 1.5; }\n");
        assert!(errors.iter().any(|error| error.message == "cannot return 'float' from function returning 'int'"));
    }

    #[test]
    fn builtin_overload_resolution() {
        assert_clean("shader_type spatial;\nvoid vertex() { vec3 v = mix(vec3(0.0), vec3(1.0), 0.5); }\n");

        let errors = analyze("shader_type spatial;\nvoid vertex() { float x = dot(1.0, vec3(1.0)); }\n");
        assert!(errors.iter().any(|error| error.message == "no matching overload for 'dot(float, vec3)'"));
    }

    #[test]
    fn user_function_calls() {
        assert_clean(concat!(
            "shader_type spatial;\n",
            "float double_it(float x) { return x * 2.0; }\n",
            "void vertex() { float y = double_it(1.0); }\n",
        ));

        let errors = analyze(concat!(
            "shader_type spatial;\n",
            "float double_it(float x) { return x * 2.0; }\n",
            "void vertex() { float y = double_it(1.0, 2.0); }\n",
        ));
        assert!(errors.iter().any(|error| {
            error.message == "function 'double_it' expects 1 arguments, got 2"
        }));
    }

    #[test]
    fn out_parameters_require_writable_arguments() {
        let errors = analyze(concat!(
            "shader_type spatial;\n",
            "void produce(out float value) { value = 1.0; }\n",
            "const float FIXED = 2.0;\n",
            "void vertex() { produce(FIXED); }\n",
        ));
        assert!(errors.iter().any(|error| error.message == "cannot assign to 'FIXED' (read-only)"));
    }

    #[test]
    fn constructor_shapes() {
        assert_clean("shader_type spatial;\nvoid vertex() { vec3 a = vec3(1.0); vec3 b = vec3(1.0, 2.0, 3.0); vec4 c = vec4(a, 1.0); mat3 m = mat3(1.0); }\n");

        let errors = analyze("shader_type spatial;\nvoid vertex() { vec3 v = vec3(1.0, 2.0); }\n");
        assert!(errors.iter().any(|error| error.message == "vector constructor requires 3 components, got 2"));
    }

    #[test]
    fn struct_field_access() {
        assert_clean(concat!(
            "shader_type spatial;\n",
            "struct Light { vec3 position; float intensity; };\n",
            "void vertex() { Light light; float i = light.intensity; }\n",
        ));

        let errors = analyze(concat!(
            "shader_type spatial;\n",
            "struct Light { vec3 position; };\n",
            "void vertex() { Light light; float i = light.intensity; }\n",
        ));
        assert!(errors.iter().any(|error| error.message == "struct 'Light' has no field 'intensity'"));
    }

    #[test]
    fn builtin_stage_variables_are_available() {
        assert_clean("shader_type spatial;\nvoid fragment() { ALBEDO = vec3(1.0); }\n");

        // VERTEX is a different type per shader kind.
        assert_clean("shader_type canvas_item;\nvoid vertex() { VERTEX = vec2(0.0); }\n");
    }

    #[test]
    fn particles_stage_variables_are_registered() {
        assert_clean("shader_type particles;\nvoid start() { VELOCITY = vec3(0.0, 1.0, 0.0); }\n");
        assert_clean("shader_type particles;\nvoid process() { CUSTOM.x += DELTA; }\n");
    }

    #[test]
    fn read_only_builtins_reject_writes() {
        let errors = analyze("shader_type spatial;\nvoid fragment() { TIME = 1.0; }\n");
        assert!(errors.iter().any(|error| error.message == "cannot assign to 'TIME' (read-only)"));
    }

    #[test]
    fn ternary_branch_types_must_join() {
        let errors = analyze("shader_type spatial;\nvoid vertex() { float x = true ? 1.0 : vec3(1.0); }\n");
        assert!(errors.iter().any(|error| {
            error.message == "incompatible types in ternary expression: 'float' and 'vec3'"
        }));
    }

    #[test]
    fn array_literals_join_element_types() {
        assert_clean("shader_type spatial;\nvoid vertex() { float data[3] = { 1.0, 2.0, 3.0 }; }\n");

        let errors = analyze("shader_type spatial;\nvoid vertex() { float data[2] = { 1.0, true }; }\n");
        assert!(errors.iter().any(|error| {
            error.message == "array element type mismatch: expected 'float', got 'bool'"
        }));
    }

    #[test]
    fn uniform_defaults_are_type_checked() {
        assert_clean("shader_type spatial;\nuniform float strength = 1.0;\n");

        let errors = analyze("shader_type spatial;\nuniform int mode = 1.5;\n");
        assert!(errors.iter().any(|error| {
            error.message == "cannot initialize 'mode' of type 'int' with 'float'"
        }));
    }

    #[test]
    fn analysis_retains_global_symbols_and_structs() {
        let doc = ShaderParser::parse(concat!(
            "shader_type spatial;\n",
            "struct Light { vec3 position; };\n",
            "uniform float speed;\n",
            "void vertex() { }\n",
        ));

        let analysis = ShaderAnalyzer::analyze(&doc);
        assert_eq!(analysis.shader_kind, Some(ShaderKind::Spatial));
        assert!(analysis.global_symbols.contains_key("speed"));
        assert!(analysis.global_symbols.contains_key("vertex"));
        assert!(analysis.structs.contains_key("Light"));
    }

    #[test]
    fn deterministic_across_runs() {
        let source = concat!(
            "shader_type spatial;\n",
            "void vertex() { float x = missing_a + missing_b; int y = 1.5; }\n",
        );

        let first = analyze(source);
        let second = analyze(source);
        assert_eq!(first, second);
    }
}
