// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

mod ast;
pub mod builtins;
mod lexer;
mod parser;
mod semantics;
mod token;
mod types;

pub use self::{
    ast::{
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
        ShaderParseError,
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
    },
    builtins::{BuiltinConstant, BuiltinFunction, BuiltinVariable, FunctionSignature, ShaderKind},
    lexer::{extract_doc_comment, ShaderLexer},
    parser::ShaderParser,
    semantics::{
        FunctionSymbol,
        SemanticError,
        ShaderAnalysis,
        ShaderAnalyzer,
        Symbol,
        SymbolKind,
    },
    token::{ShaderToken, ShaderTokenKind},
    types::{
        binary_op_result_type,
        can_explicitly_convert,
        can_implicitly_convert,
        common_type,
        index_result_type,
        swizzle_has_duplicates,
        unary_op_result_type,
        validate_swizzle,
        ArrayType,
        StructField,
        StructType,
        Type,
    },
};
