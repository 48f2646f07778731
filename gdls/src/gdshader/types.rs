// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt::Display;
use std::sync::Arc;

use super::{BinaryOp, UnaryOp};

/// A GDShader type. Primitive types are unit variants; structs and arrays
/// are shared heap entities with identity by name and element type.
#[derive(Debug, Clone)]
pub enum Type {
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
    Sampler2DArray,
    Sampler3D,
    SamplerCube,
    SamplerCubeArray,
    SamplerExternalOes,
    ISampler2D,
    ISampler2DArray,
    ISampler3D,
    USampler2D,
    USampler2DArray,
    USampler3D,
    Struct(Arc<StructType>),
    Array(Arc<ArrayType>),
    Error,
}

#[derive(Debug)]
pub struct StructType {
    pub name: String,
    pub fields: Vec<StructField>,
}

#[derive(Debug)]
pub struct StructField {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug)]
pub struct ArrayType {
    pub element: Type,
    /// `-1` means unsized.
    pub size: i64,
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Struct(a), Self::Struct(b)) => a.name == b.name,
            (Self::Array(a), Self::Array(b)) => a.size == b.size && a.element == b.element,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Eq for Type {}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Struct(s) => f.write_str(&s.name),
            Self::Array(a) => {
                if a.size < 0 {
                    f.write_fmt(format_args!("{}[]", a.element))
                } else {
                    f.write_fmt(format_args!("{}[{}]", a.element, a.size))
                }
            }
            Self::Error => f.write_str("error"),
            other => f.write_str(other.primitive_name()),
        }
    }
}

impl Type {
    fn primitive_name(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::Bvec2 => "bvec2",
            Self::Bvec3 => "bvec3",
            Self::Bvec4 => "bvec4",
            Self::Ivec2 => "ivec2",
            Self::Ivec3 => "ivec3",
            Self::Ivec4 => "ivec4",
            Self::Uvec2 => "uvec2",
            Self::Uvec3 => "uvec3",
            Self::Uvec4 => "uvec4",
            Self::Mat2 => "mat2",
            Self::Mat3 => "mat3",
            Self::Mat4 => "mat4",
            Self::Sampler2D => "sampler2D",
            Self::Sampler2DArray => "sampler2DArray",
            Self::Sampler3D => "sampler3D",
            Self::SamplerCube => "samplerCube",
            Self::SamplerCubeArray => "samplerCubeArray",
            Self::SamplerExternalOes => "samplerExternalOES",
            Self::ISampler2D => "isampler2D",
            Self::ISampler2DArray => "isampler2DArray",
            Self::ISampler3D => "isampler3D",
            Self::USampler2D => "usampler2D",
            Self::USampler2DArray => "usampler2DArray",
            Self::USampler3D => "usampler3D",
            _ => "unknown",
        }
    }

    /// Resolves a built-in type name. Unknown names (struct types) yield
    /// `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
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
            "sampler2DArray" => Self::Sampler2DArray,
            "sampler3D" => Self::Sampler3D,
            "samplerCube" => Self::SamplerCube,
            "samplerCubeArray" => Self::SamplerCubeArray,
            "samplerExternalOES" => Self::SamplerExternalOes,
            "isampler2D" => Self::ISampler2D,
            "isampler2DArray" => Self::ISampler2DArray,
            "isampler3D" => Self::ISampler3D,
            "usampler2D" => Self::USampler2D,
            "usampler2DArray" => Self::USampler2DArray,
            "usampler3D" => Self::USampler3D,
            _ => return None,
        })
    }

    #[must_use]
    pub fn is_builtin_type_name(name: &str) -> bool {
        Self::from_name(name).is_some()
    }

    #[must_use]
    pub fn array_of(element: Type, size: i64) -> Self {
        Self::Array(Arc::new(ArrayType { element, size }))
    }

    #[must_use]
    pub fn struct_of(name: String, fields: Vec<StructField>) -> Self {
        Self::Struct(Arc::new(StructType { name, fields }))
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Bool | Self::Int | Self::Uint | Self::Float)
    }

    #[must_use]
    pub const fn is_vector(&self) -> bool {
        matches!(self,
            Self::Vec2 | Self::Vec3 | Self::Vec4
            | Self::Bvec2 | Self::Bvec3 | Self::Bvec4
            | Self::Ivec2 | Self::Ivec3 | Self::Ivec4
            | Self::Uvec2 | Self::Uvec3 | Self::Uvec4)
    }

    #[must_use]
    pub const fn is_matrix(&self) -> bool {
        matches!(self, Self::Mat2 | Self::Mat3 | Self::Mat4)
    }

    #[must_use]
    pub const fn is_sampler(&self) -> bool {
        matches!(self,
            Self::Sampler2D | Self::Sampler2DArray | Self::Sampler3D
            | Self::SamplerCube | Self::SamplerCubeArray | Self::SamplerExternalOes
            | Self::ISampler2D | Self::ISampler2DArray | Self::ISampler3D
            | Self::USampler2D | Self::USampler2DArray | Self::USampler3D)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Uint | Self::Float)
    }

    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Int | Self::Uint)
    }

    /// Component count for vectors, 0 otherwise.
    #[must_use]
    pub const fn vector_size(&self) -> usize {
        match self {
            Self::Vec2 | Self::Bvec2 | Self::Ivec2 | Self::Uvec2 => 2,
            Self::Vec3 | Self::Bvec3 | Self::Ivec3 | Self::Uvec3 => 3,
            Self::Vec4 | Self::Bvec4 | Self::Ivec4 | Self::Uvec4 => 4,
            _ => 0,
        }
    }

    /// Dimension for square matrices, 0 otherwise.
    #[must_use]
    pub const fn matrix_size(&self) -> usize {
        match self {
            Self::Mat2 => 2,
            Self::Mat3 => 3,
            Self::Mat4 => 4,
            _ => 0,
        }
    }

    /// The scalar component type of vectors and matrices.
    #[must_use]
    pub fn component_type(&self) -> Option<Self> {
        match self {
            Self::Vec2 | Self::Vec3 | Self::Vec4 => Some(Self::Float),
            Self::Bvec2 | Self::Bvec3 | Self::Bvec4 => Some(Self::Bool),
            Self::Ivec2 | Self::Ivec3 | Self::Ivec4 => Some(Self::Int),
            Self::Uvec2 | Self::Uvec3 | Self::Uvec4 => Some(Self::Uint),
            Self::Mat2 | Self::Mat3 | Self::Mat4 => Some(Self::Float),
            _ => None,
        }
    }

    /// The vector type with the given component type and size.
    #[must_use]
    pub fn vector_with_size(component: &Type, size: usize) -> Self {
        match (component, size) {
            (Self::Float, 2) => Self::Vec2,
            (Self::Float, 3) => Self::Vec3,
            (Self::Float, 4) => Self::Vec4,
            (Self::Int, 2) => Self::Ivec2,
            (Self::Int, 3) => Self::Ivec3,
            (Self::Int, 4) => Self::Ivec4,
            (Self::Uint, 2) => Self::Uvec2,
            (Self::Uint, 3) => Self::Uvec3,
            (Self::Uint, 4) => Self::Uvec4,
            (Self::Bool, 2) => Self::Bvec2,
            (Self::Bool, 3) => Self::Bvec3,
            (Self::Bool, 4) => Self::Bvec4,
            _ => Self::Error,
        }
    }
}

/// Implicit conversions: `int→float`, `uint→float`, `int→uint`, and their
/// element-wise vector analogues.
#[must_use]
pub fn can_implicitly_convert(src: &Type, dst: &Type) -> bool {
    if src == dst {
        return true;
    }

    matches!((src, dst),
        (Type::Int, Type::Float)
        | (Type::Uint, Type::Float)
        | (Type::Int, Type::Uint)
        | (Type::Ivec2, Type::Vec2)
        | (Type::Ivec3, Type::Vec3)
        | (Type::Ivec4, Type::Vec4)
        | (Type::Uvec2, Type::Vec2)
        | (Type::Uvec3, Type::Vec3)
        | (Type::Uvec4, Type::Vec4))
}

/// Explicit conversions additionally allow scalar↔scalar, same-size
/// vector↔vector and matrix↔matrix, and `float→int/uint`.
#[must_use]
pub fn can_explicitly_convert(src: &Type, dst: &Type) -> bool {
    if can_implicitly_convert(src, dst) {
        return true;
    }

    if src.is_scalar() && dst.is_scalar() {
        return true;
    }

    if src.is_vector() && dst.is_vector() {
        return src.vector_size() == dst.vector_size();
    }

    if src.is_matrix() && dst.is_matrix() {
        return src.matrix_size() == dst.matrix_size();
    }

    matches!((src, dst), (Type::Float, Type::Int) | (Type::Float, Type::Uint))
}

/// The join of two types for arithmetic: numeric promotion prefers `float`,
/// then `uint`; vector-scalar promotes when the scalar converts to the
/// vector's component; same-size vectors take the common component.
#[must_use]
pub fn common_type(left: &Type, right: &Type) -> Option<Type> {
    if left == right {
        return Some(left.clone());
    }

    if left.is_numeric() && right.is_numeric() {
        if *left == Type::Float || *right == Type::Float {
            return Some(Type::Float);
        }
        if *left == Type::Uint || *right == Type::Uint {
            return Some(Type::Uint);
        }
        return Some(Type::Int);
    }

    if left.is_vector() && right.is_scalar() {
        if let Some(component) = left.component_type() {
            if can_implicitly_convert(right, &component) {
                return Some(left.clone());
            }
        }
    }
    if right.is_vector() && left.is_scalar() {
        if let Some(component) = right.component_type() {
            if can_implicitly_convert(left, &component) {
                return Some(right.clone());
            }
        }
    }

    if left.is_vector() && right.is_vector() && left.vector_size() == right.vector_size() {
        let left_component = left.component_type()?;
        let right_component = right.component_type()?;
        let common = common_type(&left_component, &right_component)?;
        return Some(Type::vector_with_size(&common, left.vector_size()));
    }

    None
}

/// The result type of a non-assignment binary operation; [`Type::Error`]
/// when the operands are invalid.
#[must_use]
pub fn binary_op_result_type(op: BinaryOp, left: &Type, right: &Type) -> Type {
    if *left == Type::Error || *right == Type::Error {
        return Type::Error;
    }

    match op {
        BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
            if left.is_numeric() && right.is_numeric() {
                return Type::Bool;
            }
            if left.is_vector() && right.is_vector() && left.vector_size() == right.vector_size() {
                return Type::vector_with_size(&Type::Bool, left.vector_size());
            }
            Type::Error
        }

        BinaryOp::Equal | BinaryOp::NotEqual => {
            if left == right
                || can_implicitly_convert(left, right)
                || can_implicitly_convert(right, left)
            {
                if left.is_vector() {
                    return Type::vector_with_size(&Type::Bool, left.vector_size());
                }
                return Type::Bool;
            }
            Type::Error
        }

        BinaryOp::And | BinaryOp::Or => {
            if *left == Type::Bool && *right == Type::Bool {
                return Type::Bool;
            }
            Type::Error
        }

        BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor
        | BinaryOp::ShiftLeft | BinaryOp::ShiftRight => {
            if left.is_integer() && right.is_integer() {
                return common_type(left, right).unwrap_or(Type::Error);
            }

            match left {
                Type::Ivec2 if matches!(right, Type::Ivec2 | Type::Int) => Type::Ivec2,
                Type::Ivec3 if matches!(right, Type::Ivec3 | Type::Int) => Type::Ivec3,
                Type::Ivec4 if matches!(right, Type::Ivec4 | Type::Int) => Type::Ivec4,
                Type::Uvec2 if matches!(right, Type::Uvec2 | Type::Uint) => Type::Uvec2,
                Type::Uvec3 if matches!(right, Type::Uvec3 | Type::Uint) => Type::Uvec3,
                Type::Uvec4 if matches!(right, Type::Uvec4 | Type::Uint) => Type::Uvec4,
                _ => Type::Error,
            }
        }

        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
            // Linear-algebra products come before the numeric rules.
            if left.is_matrix() && right.is_vector() && left.matrix_size() == right.vector_size() {
                return right.clone();
            }
            if left.is_vector() && right.is_matrix() && right.matrix_size() == left.vector_size() {
                return left.clone();
            }
            if left.is_matrix() && right.is_matrix() && left.matrix_size() == right.matrix_size() {
                return left.clone();
            }
            if left.is_matrix() && *right == Type::Float {
                return left.clone();
            }
            if right.is_matrix() && *left == Type::Float {
                return right.clone();
            }

            common_type(left, right).unwrap_or(Type::Error)
        }

        BinaryOp::Mod => {
            if left.is_integer() && right.is_integer() {
                return common_type(left, right).unwrap_or(Type::Error);
            }
            Type::Error
        }

        // Assignment operators are handled by the analyzer.
        _ => Type::Error,
    }
}

/// The result type of a unary operation; [`Type::Error`] when invalid.
#[must_use]
pub fn unary_op_result_type(op: UnaryOp, operand: &Type) -> Type {
    if *operand == Type::Error {
        return Type::Error;
    }

    match op {
        UnaryOp::Negate => {
            if operand.is_numeric() || operand.is_vector() || operand.is_matrix() {
                return operand.clone();
            }
        }

        UnaryOp::Not => {
            if matches!(operand, Type::Bool | Type::Bvec2 | Type::Bvec3 | Type::Bvec4) {
                return operand.clone();
            }
        }

        UnaryOp::BitNot => {
            if operand.is_integer() {
                return operand.clone();
            }
            if matches!(operand,
                Type::Ivec2 | Type::Ivec3 | Type::Ivec4
                | Type::Uvec2 | Type::Uvec3 | Type::Uvec4)
            {
                return operand.clone();
            }
        }

        UnaryOp::Increment | UnaryOp::Decrement => {
            if operand.is_numeric() {
                return operand.clone();
            }
            if operand.is_vector() {
                if let Some(component) = operand.component_type() {
                    if component.is_numeric() {
                        return operand.clone();
                    }
                }
            }
        }

        UnaryOp::Plus => {}
    }

    Type::Error
}

/// The result of indexing: element for arrays, component for vectors, and
/// a column vector for matrices.
#[must_use]
pub fn index_result_type(base: &Type) -> Type {
    match base {
        Type::Array(array) => array.element.clone(),
        Type::Vec2 | Type::Vec3 | Type::Vec4 => Type::Float,
        Type::Ivec2 | Type::Ivec3 | Type::Ivec4 => Type::Int,
        Type::Uvec2 | Type::Uvec3 | Type::Uvec4 => Type::Uint,
        Type::Bvec2 | Type::Bvec3 | Type::Bvec4 => Type::Bool,
        Type::Mat2 => Type::Vec2,
        Type::Mat3 => Type::Vec3,
        Type::Mat4 => Type::Vec4,
        _ => Type::Error,
    }
}

fn swizzle_index(c: char) -> Option<(usize, usize)> {
    // (component index, character set)
    match c {
        'x' => Some((0, 0)),
        'y' => Some((1, 0)),
        'z' => Some((2, 0)),
        'w' => Some((3, 0)),
        'r' => Some((0, 1)),
        'g' => Some((1, 1)),
        'b' => Some((2, 1)),
        'a' => Some((3, 1)),
        's' => Some((0, 2)),
        't' => Some((1, 2)),
        'p' => Some((2, 2)),
        'q' => Some((3, 2)),
        _ => None,
    }
}

/// Validates a swizzle pattern on a vector type and returns its result
/// type: the component type for one character, a vector otherwise.
pub fn validate_swizzle(vector: &Type, swizzle: &str) -> Result<Type, String> {
    if !vector.is_vector() {
        return Err("swizzle can only be applied to vector types".to_string());
    }

    let size = vector.vector_size();
    let length = swizzle.chars().count();
    if length == 0 || length > 4 {
        return Err("swizzle must have 1-4 components".to_string());
    }

    let mut seen_set = None;
    for c in swizzle.chars() {
        let Some((index, set)) = swizzle_index(c) else {
            return Err(format!("invalid swizzle character '{c}'"));
        };

        match seen_set {
            None => seen_set = Some(set),
            Some(seen) if seen != set => {
                return Err("cannot mix swizzle sets (xyzw, rgba, stpq)".to_string());
            }
            _ => {}
        }

        if index >= size {
            return Err(format!("swizzle component '{c}' invalid for {vector}"));
        }
    }

    let component = vector.component_type().unwrap_or(Type::Error);
    if length == 1 {
        return Ok(component);
    }

    Ok(Type::vector_with_size(&component, length))
}

/// Whether a swizzle pattern repeats a component, which makes the member
/// expression readable but not assignable.
#[must_use]
pub fn swizzle_has_duplicates(swizzle: &str) -> bool {
    let mut seen = [false; 128];
    for c in swizzle.chars() {
        let index = c as usize;
        if index < seen.len() {
            if seen[index] {
                return true;
            }
            seen[index] = true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn implicit_conversions() {
        assert!(can_implicitly_convert(&Type::Int, &Type::Float));
        assert!(can_implicitly_convert(&Type::Uint, &Type::Float));
        assert!(can_implicitly_convert(&Type::Int, &Type::Uint));
        assert!(can_implicitly_convert(&Type::Ivec3, &Type::Vec3));
        assert!(!can_implicitly_convert(&Type::Float, &Type::Int));
        assert!(!can_implicitly_convert(&Type::Vec2, &Type::Vec3));
    }

    #[test]
    fn explicit_conversions() {
        assert!(can_explicitly_convert(&Type::Float, &Type::Int));
        assert!(can_explicitly_convert(&Type::Bool, &Type::Float));
        assert!(can_explicitly_convert(&Type::Vec3, &Type::Ivec3));
        assert!(!can_explicitly_convert(&Type::Vec2, &Type::Vec3));
        assert!(!can_explicitly_convert(&Type::Mat2, &Type::Mat3));
    }

    #[rstest]
    #[case(Type::Int, Type::Float, Some(Type::Float))]
    #[case(Type::Int, Type::Uint, Some(Type::Uint))]
    #[case(Type::Int, Type::Int, Some(Type::Int))]
    #[case(Type::Vec3, Type::Float, Some(Type::Vec3))]
    #[case(Type::Ivec2, Type::Vec2, Some(Type::Vec2))]
    #[case(Type::Vec2, Type::Vec3, None)]
    #[case(Type::Bool, Type::Int, None)]
    fn common_type_join(#[case] left: Type, #[case] right: Type, #[case] expected: Option<Type>) {
        assert_eq!(common_type(&left, &right), expected);
    }

    #[test]
    fn unary_minus_preserves_numeric_types() {
        for ty in [Type::Int, Type::Uint, Type::Float, Type::Vec3, Type::Mat4] {
            assert_eq!(unary_op_result_type(UnaryOp::Negate, &ty), ty);
        }
        assert_eq!(unary_op_result_type(UnaryOp::Negate, &Type::Bool), Type::Error);
        assert_eq!(unary_op_result_type(UnaryOp::Not, &Type::Bool), Type::Bool);
    }

    #[test]
    fn vector_addition_preserves_type() {
        for ty in [Type::Vec2, Type::Vec3, Type::Vec4, Type::Ivec3, Type::Uvec2] {
            assert_eq!(binary_op_result_type(BinaryOp::Add, &ty, &ty), ty);
        }
    }

    #[rstest]
    #[case(Type::Mat2, Type::Vec2)]
    #[case(Type::Mat3, Type::Vec3)]
    #[case(Type::Mat4, Type::Vec4)]
    fn matrix_vector_products(#[case] matrix: Type, #[case] vector: Type) {
        assert_eq!(binary_op_result_type(BinaryOp::Mul, &matrix, &vector), vector);
        assert_eq!(binary_op_result_type(BinaryOp::Mul, &vector, &matrix), vector);
        assert_eq!(binary_op_result_type(BinaryOp::Mul, &matrix, &matrix), matrix);
        assert_eq!(binary_op_result_type(BinaryOp::Mul, &matrix, &Type::Float), matrix);
    }

    #[test]
    fn mismatched_matrix_vector_is_error() {
        assert_eq!(binary_op_result_type(BinaryOp::Mul, &Type::Mat3, &Type::Vec2), Type::Error);
    }

    #[test]
    fn comparisons_yield_bool() {
        assert_eq!(binary_op_result_type(BinaryOp::Less, &Type::Int, &Type::Float), Type::Bool);
        assert_eq!(binary_op_result_type(BinaryOp::Less, &Type::Vec3, &Type::Vec3), Type::Bvec3);
        assert_eq!(binary_op_result_type(BinaryOp::Less, &Type::Bool, &Type::Bool), Type::Error);
    }

    #[test]
    fn modulo_requires_integers() {
        assert_eq!(binary_op_result_type(BinaryOp::Mod, &Type::Int, &Type::Uint), Type::Uint);
        assert_eq!(binary_op_result_type(BinaryOp::Mod, &Type::Float, &Type::Float), Type::Error);
    }

    #[test]
    fn bitwise_vector_forms() {
        assert_eq!(binary_op_result_type(BinaryOp::BitAnd, &Type::Ivec3, &Type::Int), Type::Ivec3);
        assert_eq!(binary_op_result_type(BinaryOp::ShiftLeft, &Type::Uvec2, &Type::Uvec2), Type::Uvec2);
        assert_eq!(binary_op_result_type(BinaryOp::BitOr, &Type::Vec2, &Type::Vec2), Type::Error);
    }

    #[test]
    fn index_results() {
        assert_eq!(index_result_type(&Type::Vec3), Type::Float);
        assert_eq!(index_result_type(&Type::Ivec2), Type::Int);
        assert_eq!(index_result_type(&Type::Mat3), Type::Vec3);
        assert_eq!(index_result_type(&Type::array_of(Type::Float, 4)), Type::Float);
        assert_eq!(index_result_type(&Type::Float), Type::Error);
    }

    #[rstest]
    #[case(Type::Vec3, "x", Ok(Type::Float))]
    #[case(Type::Vec3, "xy", Ok(Type::Vec2))]
    #[case(Type::Vec4, "rgba", Ok(Type::Vec4))]
    #[case(Type::Ivec2, "yx", Ok(Type::Ivec2))]
    #[case(Type::Vec3, "xxx", Ok(Type::Vec3))]
    fn valid_swizzles(#[case] vector: Type, #[case] swizzle: &str, #[case] expected: Result<Type, String>) {
        assert_eq!(validate_swizzle(&vector, swizzle), expected);
    }

    #[test]
    fn invalid_swizzles() {
        assert!(validate_swizzle(&Type::Vec2, "z").is_err());
        assert!(validate_swizzle(&Type::Vec3, "xr").is_err());
        assert!(validate_swizzle(&Type::Vec3, "xyzwx").is_err());
        assert!(validate_swizzle(&Type::Float, "x").is_err());
        assert!(validate_swizzle(&Type::Vec3, "m").is_err());
    }

    #[test]
    fn duplicate_swizzle_detection() {
        assert!(swizzle_has_duplicates("xxx"));
        assert!(swizzle_has_duplicates("xyx"));
        assert!(!swizzle_has_duplicates("xyz"));
        assert!(!swizzle_has_duplicates("xy"));
    }

    #[test]
    fn struct_identity_is_by_name() {
        let a = Type::struct_of("Light".into(), Vec::new());
        let b = Type::struct_of("Light".into(), Vec::new());
        let c = Type::struct_of("Camera".into(), Vec::new());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn array_identity() {
        assert_eq!(Type::array_of(Type::Float, 3), Type::array_of(Type::Float, 3));
        assert_ne!(Type::array_of(Type::Float, 3), Type::array_of(Type::Float, 4));
        assert_ne!(Type::array_of(Type::Float, 3), Type::array_of(Type::Int, 3));
    }
}
