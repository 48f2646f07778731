// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt::{Display, Formatter};

use crate::{SourceLocation, SourceRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderTokenKind {
    EndOfFile,
    Error,
    Newline,

    LineComment,
    BlockComment,
    DocComment,

    Identifier,
    IntLiteral,
    FloatLiteral,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,

    // Operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Ampersand,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Question,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    EqualEqual,
    NotEqual,
    AndAnd,
    OrOr,
    ShiftLeft,
    ShiftRight,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
    Increment,
    Decrement,

    // Keywords
    ShaderType,
    RenderMode,
    Uniform,
    Varying,
    Const,
    Global,
    GroupUniforms,
    In,
    Out,
    Inout,
    Lowp,
    Mediump,
    Highp,
    Flat,
    Smooth,
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Return,
    Discard,
    Struct,
    True,
    False,

    // Built-in type keywords
    Void,
    Bool,
    Int,
    Uint,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Bvec2,
    Bvec3,
    Bvec4,
    Ivec2,
    Ivec3,
    Ivec4,
    Uvec2,
    Uvec3,
    Uvec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler2D,
    ISampler2D,
    USampler2D,
    Sampler2DArray,
    ISampler2DArray,
    USampler2DArray,
    Sampler3D,
    ISampler3D,
    USampler3D,
    SamplerCube,
    SamplerCubeArray,
    SamplerExternalOES,
}

impl ShaderTokenKind {
    /// Maps an identifier spelling to its keyword kind, if it is one.
    #[must_use]
    pub fn lookup_keyword(ident: &str) -> Option<Self> {
        Some(match ident {
            "shader_type" => Self::ShaderType,
            "render_mode" => Self::RenderMode,
            "uniform" => Self::Uniform,
            "varying" => Self::Varying,
            "const" => Self::Const,
            "global" => Self::Global,
            "group_uniforms" => Self::GroupUniforms,
            "in" => Self::In,
            "out" => Self::Out,
            "inout" => Self::Inout,
            "lowp" => Self::Lowp,
            "mediump" => Self::Mediump,
            "highp" => Self::Highp,
            "flat" => Self::Flat,
            "smooth" => Self::Smooth,
            "if" => Self::If,
            "else" => Self::Else,
            "for" => Self::For,
            "while" => Self::While,
            "do" => Self::Do,
            "switch" => Self::Switch,
            "case" => Self::Case,
            "default" => Self::Default,
            "break" => Self::Break,
            "continue" => Self::Continue,
            "return" => Self::Return,
            "discard" => Self::Discard,
            "struct" => Self::Struct,
            "true" => Self::True,
            "false" => Self::False,
            "void" => Self::Void,
            "bool" => Self::Bool,
            "int" => Self::Int,
            "uint" => Self::Uint,
            "float" => Self::Float,
            "vec2" => Self::Vec2,
            "vec3" => Self::Vec3,
            "vec4" => Self::Vec4,
            "bvec2" => Self::Bvec2,
            "bvec3" => Self::Bvec3,
            "bvec4" => Self::Bvec4,
            "ivec2" => Self::Ivec2,
            "ivec3" => Self::Ivec3,
            "ivec4" => Self::Ivec4,
            "uvec2" => Self::Uvec2,
            "uvec3" => Self::Uvec3,
            "uvec4" => Self::Uvec4,
            "mat2" => Self::Mat2,
            "mat3" => Self::Mat3,
            "mat4" => Self::Mat4,
            "sampler2D" => Self::Sampler2D,
            "isampler2D" => Self::ISampler2D,
            "usampler2D" => Self::USampler2D,
            "sampler2DArray" => Self::Sampler2DArray,
            "isampler2DArray" => Self::ISampler2DArray,
            "usampler2DArray" => Self::USampler2DArray,
            "sampler3D" => Self::Sampler3D,
            "isampler3D" => Self::ISampler3D,
            "usampler3D" => Self::USampler3D,
            "samplerCube" => Self::SamplerCube,
            "samplerCubeArray" => Self::SamplerCubeArray,
            "samplerExternalOES" => Self::SamplerExternalOES,
            _ => return None,
        })
    }

    /// True for built-in type keywords.
    #[must_use]
    pub const fn is_type(&self) -> bool {
        matches!(self,
            Self::Void | Self::Bool | Self::Int | Self::Uint | Self::Float
            | Self::Vec2 | Self::Vec3 | Self::Vec4
            | Self::Bvec2 | Self::Bvec3 | Self::Bvec4
            | Self::Ivec2 | Self::Ivec3 | Self::Ivec4
            | Self::Uvec2 | Self::Uvec3 | Self::Uvec4
            | Self::Mat2 | Self::Mat3 | Self::Mat4
            | Self::Sampler2D | Self::ISampler2D | Self::USampler2D
            | Self::Sampler2DArray | Self::ISampler2DArray | Self::USampler2DArray
            | Self::Sampler3D | Self::ISampler3D | Self::USampler3D
            | Self::SamplerCube | Self::SamplerCubeArray | Self::SamplerExternalOES)
    }

    #[must_use]
    pub const fn is_precision(&self) -> bool {
        matches!(self, Self::Lowp | Self::Mediump | Self::Highp)
    }

    #[must_use]
    pub const fn is_interpolation(&self) -> bool {
        matches!(self, Self::Flat | Self::Smooth)
    }

    #[must_use]
    pub const fn is_assignment_op(&self) -> bool {
        matches!(self,
            Self::Assign | Self::PlusAssign | Self::MinusAssign | Self::StarAssign
            | Self::SlashAssign | Self::PercentAssign | Self::AmpAssign
            | Self::PipeAssign | Self::CaretAssign
            | Self::ShiftLeftAssign | Self::ShiftRightAssign)
    }

    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment | Self::DocComment)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShaderToken {
    pub kind: ShaderTokenKind,
    pub literal: String,
    pub location: SourceLocation,
}

impl ShaderToken {
    /// The token's span, derived from its location and literal length.
    /// Columns count code points.
    #[must_use]
    pub fn range(&self) -> SourceRange {
        let end = SourceLocation::new(
            self.location.offset() + self.literal.len(),
            self.location.line(),
            self.location.column() + self.literal.chars().count(),
        );
        SourceRange::new(self.location, end)
    }
}

impl Display for ShaderToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.literal)
    }
}
