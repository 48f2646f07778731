// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! The static registries that define the GDShader language surface: the
//! built-in functions with their overloads, the built-in constants, the
//! per-shader-type per-stage variables and the uniform hints. The semantic
//! analyzer, hover and completion all read from these tables.

use std::fmt::Display;

use strum::AsRefStr;

/// A built-in function with one or more overload signatures.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub description: &'static str,
    pub signatures: &'static [FunctionSignature],
}

/// One overload, expressed over type names.
#[derive(Debug, Clone, Copy)]
pub struct FunctionSignature {
    pub params: &'static [&'static str],
    pub ret: &'static str,
}

/// A built-in constant such as `PI`.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinConstant {
    pub name: &'static str,
    pub ty: &'static str,
    pub description: &'static str,
    pub value: &'static str,
}

/// A built-in variable available inside a particular shader stage.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinVariable {
    pub name: &'static str,
    pub ty: &'static str,
    pub description: &'static str,
    /// `"in"`, `"out"` or `"inout"`.
    pub read_write: &'static str,
}

/// The document-level shader type selecting the available built-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ShaderKind {
    Spatial,
    CanvasItem,
    Particles,
    Sky,
    Fog,
}

impl ShaderKind {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "spatial" => Self::Spatial,
            "canvas_item" => Self::CanvasItem,
            "particles" => Self::Particles,
            "sky" => Self::Sky,
            "fog" => Self::Fog,
            _ => return None,
        })
    }

    /// The stage function names valid for this shader type.
    #[must_use]
    pub const fn stages(&self) -> &'static [&'static str] {
        match self {
            Self::Spatial | Self::CanvasItem => &["vertex", "fragment", "light"],
            Self::Particles => &["start", "process"],
            Self::Sky => &["sky"],
            Self::Fog => &["fog"],
        }
    }
}

impl Display for ShaderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Looks up a built-in function by name.
#[must_use]
pub fn function(name: &str) -> Option<&'static BuiltinFunction> {
    FUNCTIONS.iter().find(|function| function.name == name)
}

/// Looks up a built-in constant by name.
#[must_use]
pub fn constant(name: &str) -> Option<&'static BuiltinConstant> {
    CONSTANTS.iter().find(|constant| constant.name == name)
}

/// Looks up a uniform hint description by hint name.
#[must_use]
pub fn uniform_hint(name: &str) -> Option<&'static str> {
    UNIFORM_HINTS.iter()
        .find(|(hint, _)| *hint == name)
        .map(|(_, description)| *description)
}

/// The built-in variables for one `(shader type, stage)` pair. The stage is
/// the name of the stage function (`vertex`, `fragment`, `light`, `start`,
/// `process`, `sky`, `fog`).
#[must_use]
pub fn stage_variables(kind: ShaderKind, stage: &str) -> &'static [BuiltinVariable] {
    match (kind, stage) {
        (ShaderKind::Spatial, "vertex") => SPATIAL_VERTEX_VARIABLES,
        (ShaderKind::Spatial, "fragment") => SPATIAL_FRAGMENT_VARIABLES,
        (ShaderKind::Spatial, "light") => SPATIAL_LIGHT_VARIABLES,
        (ShaderKind::CanvasItem, "vertex") => CANVAS_ITEM_VERTEX_VARIABLES,
        (ShaderKind::CanvasItem, "fragment") => CANVAS_ITEM_FRAGMENT_VARIABLES,
        (ShaderKind::CanvasItem, "light") => CANVAS_ITEM_LIGHT_VARIABLES,
        (ShaderKind::Particles, "start" | "process") => PARTICLES_VARIABLES,
        (ShaderKind::Sky, "sky") => SKY_VARIABLES,
        (ShaderKind::Fog, "fog") => FOG_VARIABLES,
        _ => &[],
    }
}

/// Every built-in variable reachable for a shader type, across all of its
/// stages. Later stages do not shadow earlier ones; duplicates keep the
/// first occurrence.
#[must_use]
pub fn variables_for_shader_kind(kind: ShaderKind) -> Vec<&'static BuiltinVariable> {
    let mut result: Vec<&'static BuiltinVariable> = Vec::new();

    for stage in kind.stages() {
        for variable in stage_variables(kind, stage) {
            if !result.iter().any(|existing| existing.name == variable.name) {
                result.push(variable);
            }
        }
    }

    result
}

const fn sig(params: &'static [&'static str], ret: &'static str) -> FunctionSignature {
    FunctionSignature { params, ret }
}

/// `(float) -> float` and the component-wise vec2/vec3/vec4 overloads.
const COMPONENT_WISE_FLOAT: &[FunctionSignature] = &[
    sig(&["float"], "float"),
    sig(&["vec2"], "vec2"),
    sig(&["vec3"], "vec3"),
    sig(&["vec4"], "vec4"),
];

pub const FUNCTIONS: &[BuiltinFunction] = &[
    // Trigonometric functions
    BuiltinFunction {
        name: "radians",
        description: "Converts degrees to radians",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "degrees",
        description: "Converts radians to degrees",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "sin",
        description: "Returns the sine of the angle",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "cos",
        description: "Returns the cosine of the angle",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "tan",
        description: "Returns the tangent of the angle",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "asin",
        description: "Returns the arc-sine of the parameter",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "acos",
        description: "Returns the arc-cosine of the parameter",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "atan",
        description: "Returns the arc-tangent of the parameter(s)",
        signatures: &[
            sig(&["float"], "float"),
            sig(&["float", "float"], "float"),
            sig(&["vec2"], "vec2"),
            sig(&["vec3"], "vec3"),
            sig(&["vec4"], "vec4"),
        ],
    },
    BuiltinFunction {
        name: "sinh",
        description: "Returns the hyperbolic sine",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "cosh",
        description: "Returns the hyperbolic cosine",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "tanh",
        description: "Returns the hyperbolic tangent",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "asinh",
        description: "Returns the inverse hyperbolic sine",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "acosh",
        description: "Returns the inverse hyperbolic cosine",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "atanh",
        description: "Returns the inverse hyperbolic tangent",
        signatures: COMPONENT_WISE_FLOAT,
    },

    // Exponential functions
    BuiltinFunction {
        name: "pow",
        description: "Returns x raised to the power of y",
        signatures: &[
            sig(&["float", "float"], "float"),
            sig(&["vec2", "vec2"], "vec2"),
            sig(&["vec3", "vec3"], "vec3"),
            sig(&["vec4", "vec4"], "vec4"),
        ],
    },
    BuiltinFunction {
        name: "exp",
        description: "Returns e raised to the power of x",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "exp2",
        description: "Returns 2 raised to the power of x",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "log",
        description: "Returns the natural logarithm",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "log2",
        description: "Returns the base-2 logarithm",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "sqrt",
        description: "Returns the square root",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "inversesqrt",
        description: "Returns the inverse square root",
        signatures: COMPONENT_WISE_FLOAT,
    },

    // Common functions
    BuiltinFunction {
        name: "abs",
        description: "Returns the absolute value",
        signatures: &[
            sig(&["float"], "float"),
            sig(&["vec2"], "vec2"),
            sig(&["vec3"], "vec3"),
            sig(&["vec4"], "vec4"),
            sig(&["int"], "int"),
            sig(&["ivec2"], "ivec2"),
            sig(&["ivec3"], "ivec3"),
            sig(&["ivec4"], "ivec4"),
        ],
    },
    BuiltinFunction {
        name: "sign",
        description: "Returns the sign of the value (-1, 0, or 1)",
        signatures: &[
            sig(&["float"], "float"),
            sig(&["vec2"], "vec2"),
            sig(&["vec3"], "vec3"),
            sig(&["vec4"], "vec4"),
            sig(&["int"], "int"),
            sig(&["ivec2"], "ivec2"),
            sig(&["ivec3"], "ivec3"),
            sig(&["ivec4"], "ivec4"),
        ],
    },
    BuiltinFunction {
        name: "floor",
        description: "Returns the largest integer less than or equal to x",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "ceil",
        description: "Returns the smallest integer greater than or equal to x",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "round",
        description: "Returns the nearest integer",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "roundEven",
        description: "Returns the nearest even integer",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "trunc",
        description: "Returns the integer part of x",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "fract",
        description: "Returns the fractional part of x",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "mod",
        description: "Returns x modulo y",
        signatures: &[
            sig(&["float", "float"], "float"),
            sig(&["vec2", "float"], "vec2"),
            sig(&["vec2", "vec2"], "vec2"),
            sig(&["vec3", "float"], "vec3"),
            sig(&["vec3", "vec3"], "vec3"),
            sig(&["vec4", "float"], "vec4"),
            sig(&["vec4", "vec4"], "vec4"),
        ],
    },
    BuiltinFunction {
        name: "min",
        description: "Returns the minimum of two values",
        signatures: &[
            sig(&["float", "float"], "float"),
            sig(&["vec2", "vec2"], "vec2"),
            sig(&["vec2", "float"], "vec2"),
            sig(&["vec3", "vec3"], "vec3"),
            sig(&["vec3", "float"], "vec3"),
            sig(&["vec4", "vec4"], "vec4"),
            sig(&["vec4", "float"], "vec4"),
            sig(&["int", "int"], "int"),
            sig(&["uint", "uint"], "uint"),
        ],
    },
    BuiltinFunction {
        name: "max",
        description: "Returns the maximum of two values",
        signatures: &[
            sig(&["float", "float"], "float"),
            sig(&["vec2", "vec2"], "vec2"),
            sig(&["vec2", "float"], "vec2"),
            sig(&["vec3", "vec3"], "vec3"),
            sig(&["vec3", "float"], "vec3"),
            sig(&["vec4", "vec4"], "vec4"),
            sig(&["vec4", "float"], "vec4"),
            sig(&["int", "int"], "int"),
            sig(&["uint", "uint"], "uint"),
        ],
    },
    BuiltinFunction {
        name: "clamp",
        description: "Clamps x to the range [minVal, maxVal]",
        signatures: &[
            sig(&["float", "float", "float"], "float"),
            sig(&["vec2", "vec2", "vec2"], "vec2"),
            sig(&["vec2", "float", "float"], "vec2"),
            sig(&["vec3", "vec3", "vec3"], "vec3"),
            sig(&["vec3", "float", "float"], "vec3"),
            sig(&["vec4", "vec4", "vec4"], "vec4"),
            sig(&["vec4", "float", "float"], "vec4"),
            sig(&["int", "int", "int"], "int"),
            sig(&["uint", "uint", "uint"], "uint"),
        ],
    },
    BuiltinFunction {
        name: "mix",
        description: "Linearly interpolates between x and y",
        signatures: &[
            sig(&["float", "float", "float"], "float"),
            sig(&["vec2", "vec2", "float"], "vec2"),
            sig(&["vec2", "vec2", "vec2"], "vec2"),
            sig(&["vec3", "vec3", "float"], "vec3"),
            sig(&["vec3", "vec3", "vec3"], "vec3"),
            sig(&["vec4", "vec4", "float"], "vec4"),
            sig(&["vec4", "vec4", "vec4"], "vec4"),
        ],
    },
    BuiltinFunction {
        name: "step",
        description: "Returns 0.0 if x < edge, otherwise 1.0",
        signatures: &[
            sig(&["float", "float"], "float"),
            sig(&["float", "vec2"], "vec2"),
            sig(&["float", "vec3"], "vec3"),
            sig(&["float", "vec4"], "vec4"),
            sig(&["vec2", "vec2"], "vec2"),
            sig(&["vec3", "vec3"], "vec3"),
            sig(&["vec4", "vec4"], "vec4"),
        ],
    },
    BuiltinFunction {
        name: "smoothstep",
        description: "Performs smooth Hermite interpolation",
        signatures: &[
            sig(&["float", "float", "float"], "float"),
            sig(&["float", "float", "vec2"], "vec2"),
            sig(&["float", "float", "vec3"], "vec3"),
            sig(&["float", "float", "vec4"], "vec4"),
            sig(&["vec2", "vec2", "vec2"], "vec2"),
            sig(&["vec3", "vec3", "vec3"], "vec3"),
            sig(&["vec4", "vec4", "vec4"], "vec4"),
        ],
    },

    // Geometric functions
    BuiltinFunction {
        name: "length",
        description: "Returns the length of a vector",
        signatures: &[
            sig(&["float"], "float"),
            sig(&["vec2"], "float"),
            sig(&["vec3"], "float"),
            sig(&["vec4"], "float"),
        ],
    },
    BuiltinFunction {
        name: "distance",
        description: "Returns the distance between two points",
        signatures: &[
            sig(&["float", "float"], "float"),
            sig(&["vec2", "vec2"], "float"),
            sig(&["vec3", "vec3"], "float"),
            sig(&["vec4", "vec4"], "float"),
        ],
    },
    BuiltinFunction {
        name: "dot",
        description: "Returns the dot product of two vectors",
        signatures: &[
            sig(&["float", "float"], "float"),
            sig(&["vec2", "vec2"], "float"),
            sig(&["vec3", "vec3"], "float"),
            sig(&["vec4", "vec4"], "float"),
        ],
    },
    BuiltinFunction {
        name: "cross",
        description: "Returns the cross product of two vectors",
        signatures: &[
            sig(&["vec3", "vec3"], "vec3"),
        ],
    },
    BuiltinFunction {
        name: "normalize",
        description: "Returns a normalized vector",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "reflect",
        description: "Reflects a vector about a normal",
        signatures: &[
            sig(&["float", "float"], "float"),
            sig(&["vec2", "vec2"], "vec2"),
            sig(&["vec3", "vec3"], "vec3"),
            sig(&["vec4", "vec4"], "vec4"),
        ],
    },
    BuiltinFunction {
        name: "refract",
        description: "Refracts a vector through a surface",
        signatures: &[
            sig(&["float", "float", "float"], "float"),
            sig(&["vec2", "vec2", "float"], "vec2"),
            sig(&["vec3", "vec3", "float"], "vec3"),
            sig(&["vec4", "vec4", "float"], "vec4"),
        ],
    },
    BuiltinFunction {
        name: "faceforward",
        description: "Returns N if dot(Nref, I) < 0, otherwise -N",
        signatures: &[
            sig(&["float", "float", "float"], "float"),
            sig(&["vec2", "vec2", "vec2"], "vec2"),
            sig(&["vec3", "vec3", "vec3"], "vec3"),
            sig(&["vec4", "vec4", "vec4"], "vec4"),
        ],
    },

    // Matrix functions
    BuiltinFunction {
        name: "matrixCompMult",
        description: "Component-wise matrix multiplication",
        signatures: &[
            sig(&["mat2", "mat2"], "mat2"),
            sig(&["mat3", "mat3"], "mat3"),
            sig(&["mat4", "mat4"], "mat4"),
        ],
    },
    BuiltinFunction {
        name: "transpose",
        description: "Returns the transpose of a matrix",
        signatures: &[
            sig(&["mat2"], "mat2"),
            sig(&["mat3"], "mat3"),
            sig(&["mat4"], "mat4"),
        ],
    },
    BuiltinFunction {
        name: "inverse",
        description: "Returns the inverse of a matrix",
        signatures: &[
            sig(&["mat2"], "mat2"),
            sig(&["mat3"], "mat3"),
            sig(&["mat4"], "mat4"),
        ],
    },
    BuiltinFunction {
        name: "determinant",
        description: "Returns the determinant of a matrix",
        signatures: &[
            sig(&["mat2"], "float"),
            sig(&["mat3"], "float"),
            sig(&["mat4"], "float"),
        ],
    },
    BuiltinFunction {
        name: "outerProduct",
        description: "Returns the outer product of two vectors",
        signatures: &[
            sig(&["vec2", "vec2"], "mat2"),
            sig(&["vec3", "vec3"], "mat3"),
            sig(&["vec4", "vec4"], "mat4"),
        ],
    },

    // Texture functions
    BuiltinFunction {
        name: "texture",
        description: "Samples a texture",
        signatures: &[
            sig(&["sampler2D", "vec2"], "vec4"),
            sig(&["sampler2D", "vec2", "float"], "vec4"),
            sig(&["sampler2DArray", "vec3"], "vec4"),
            sig(&["sampler3D", "vec3"], "vec4"),
            sig(&["samplerCube", "vec3"], "vec4"),
        ],
    },
    BuiltinFunction {
        name: "textureSize",
        description: "Returns the size of a texture",
        signatures: &[
            sig(&["sampler2D", "int"], "ivec2"),
            sig(&["sampler2DArray", "int"], "ivec3"),
            sig(&["sampler3D", "int"], "ivec3"),
            sig(&["samplerCube", "int"], "ivec2"),
        ],
    },
    BuiltinFunction {
        name: "textureLod",
        description: "Samples a texture with explicit LOD",
        signatures: &[
            sig(&["sampler2D", "vec2", "float"], "vec4"),
            sig(&["sampler2DArray", "vec3", "float"], "vec4"),
            sig(&["sampler3D", "vec3", "float"], "vec4"),
            sig(&["samplerCube", "vec3", "float"], "vec4"),
        ],
    },
    BuiltinFunction {
        name: "textureProj",
        description: "Samples a texture with projection",
        signatures: &[
            sig(&["sampler2D", "vec3"], "vec4"),
            sig(&["sampler2D", "vec4"], "vec4"),
        ],
    },
    BuiltinFunction {
        name: "texelFetch",
        description: "Fetches a single texel",
        signatures: &[
            sig(&["sampler2D", "ivec2", "int"], "vec4"),
            sig(&["sampler2DArray", "ivec3", "int"], "vec4"),
            sig(&["sampler3D", "ivec3", "int"], "vec4"),
        ],
    },
    BuiltinFunction {
        name: "textureGrad",
        description: "Samples a texture with explicit gradients",
        signatures: &[
            sig(&["sampler2D", "vec2", "vec2", "vec2"], "vec4"),
            sig(&["sampler3D", "vec3", "vec3", "vec3"], "vec4"),
            sig(&["samplerCube", "vec3", "vec3", "vec3"], "vec4"),
        ],
    },

    // Derivative functions
    BuiltinFunction {
        name: "dFdx",
        description: "Returns the partial derivative with respect to x",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "dFdy",
        description: "Returns the partial derivative with respect to y",
        signatures: COMPONENT_WISE_FLOAT,
    },
    BuiltinFunction {
        name: "fwidth",
        description: "Returns abs(dFdx) + abs(dFdy)",
        signatures: COMPONENT_WISE_FLOAT,
    },

    // Boolean functions
    BuiltinFunction {
        name: "lessThan",
        description: "Component-wise less than comparison",
        signatures: &[
            sig(&["vec2", "vec2"], "bvec2"),
            sig(&["vec3", "vec3"], "bvec3"),
            sig(&["vec4", "vec4"], "bvec4"),
            sig(&["ivec2", "ivec2"], "bvec2"),
            sig(&["ivec3", "ivec3"], "bvec3"),
            sig(&["ivec4", "ivec4"], "bvec4"),
        ],
    },
    BuiltinFunction {
        name: "greaterThan",
        description: "Component-wise greater than comparison",
        signatures: &[
            sig(&["vec2", "vec2"], "bvec2"),
            sig(&["vec3", "vec3"], "bvec3"),
            sig(&["vec4", "vec4"], "bvec4"),
            sig(&["ivec2", "ivec2"], "bvec2"),
            sig(&["ivec3", "ivec3"], "bvec3"),
            sig(&["ivec4", "ivec4"], "bvec4"),
        ],
    },
    BuiltinFunction {
        name: "equal",
        description: "Component-wise equality comparison",
        signatures: &[
            sig(&["vec2", "vec2"], "bvec2"),
            sig(&["vec3", "vec3"], "bvec3"),
            sig(&["vec4", "vec4"], "bvec4"),
            sig(&["ivec2", "ivec2"], "bvec2"),
            sig(&["ivec3", "ivec3"], "bvec3"),
            sig(&["ivec4", "ivec4"], "bvec4"),
            sig(&["bvec2", "bvec2"], "bvec2"),
            sig(&["bvec3", "bvec3"], "bvec3"),
            sig(&["bvec4", "bvec4"], "bvec4"),
        ],
    },
    BuiltinFunction {
        name: "notEqual",
        description: "Component-wise inequality comparison",
        signatures: &[
            sig(&["vec2", "vec2"], "bvec2"),
            sig(&["vec3", "vec3"], "bvec3"),
            sig(&["vec4", "vec4"], "bvec4"),
            sig(&["ivec2", "ivec2"], "bvec2"),
            sig(&["ivec3", "ivec3"], "bvec3"),
            sig(&["ivec4", "ivec4"], "bvec4"),
            sig(&["bvec2", "bvec2"], "bvec2"),
            sig(&["bvec3", "bvec3"], "bvec3"),
            sig(&["bvec4", "bvec4"], "bvec4"),
        ],
    },
    BuiltinFunction {
        name: "any",
        description: "Returns true if any component is true",
        signatures: &[
            sig(&["bvec2"], "bool"),
            sig(&["bvec3"], "bool"),
            sig(&["bvec4"], "bool"),
        ],
    },
    BuiltinFunction {
        name: "all",
        description: "Returns true if all components are true",
        signatures: &[
            sig(&["bvec2"], "bool"),
            sig(&["bvec3"], "bool"),
            sig(&["bvec4"], "bool"),
        ],
    },
    BuiltinFunction {
        name: "not",
        description: "Component-wise logical NOT",
        signatures: &[
            sig(&["bvec2"], "bvec2"),
            sig(&["bvec3"], "bvec3"),
            sig(&["bvec4"], "bvec4"),
        ],
    },

    // Bit-reinterpret functions
    BuiltinFunction {
        name: "floatBitsToInt",
        description: "Reinterprets float bits as int",
        signatures: &[
            sig(&["float"], "int"),
            sig(&["vec2"], "ivec2"),
            sig(&["vec3"], "ivec3"),
            sig(&["vec4"], "ivec4"),
        ],
    },
    BuiltinFunction {
        name: "floatBitsToUint",
        description: "Reinterprets float bits as uint",
        signatures: &[
            sig(&["float"], "uint"),
            sig(&["vec2"], "uvec2"),
            sig(&["vec3"], "uvec3"),
            sig(&["vec4"], "uvec4"),
        ],
    },
    BuiltinFunction {
        name: "intBitsToFloat",
        description: "Reinterprets int bits as float",
        signatures: &[
            sig(&["int"], "float"),
            sig(&["ivec2"], "vec2"),
            sig(&["ivec3"], "vec3"),
            sig(&["ivec4"], "vec4"),
        ],
    },
    BuiltinFunction {
        name: "uintBitsToFloat",
        description: "Reinterprets uint bits as float",
        signatures: &[
            sig(&["uint"], "float"),
            sig(&["uvec2"], "vec2"),
            sig(&["uvec3"], "vec3"),
            sig(&["uvec4"], "vec4"),
        ],
    },

    // Pack/unpack functions
    BuiltinFunction {
        name: "packHalf2x16",
        description: "Packs two floats into a uint",
        signatures: &[sig(&["vec2"], "uint")],
    },
    BuiltinFunction {
        name: "unpackHalf2x16",
        description: "Unpacks a uint into two floats",
        signatures: &[sig(&["uint"], "vec2")],
    },
    BuiltinFunction {
        name: "packUnorm2x16",
        description: "Packs two normalized floats into a uint",
        signatures: &[sig(&["vec2"], "uint")],
    },
    BuiltinFunction {
        name: "unpackUnorm2x16",
        description: "Unpacks a uint into two normalized floats",
        signatures: &[sig(&["uint"], "vec2")],
    },
    BuiltinFunction {
        name: "packSnorm2x16",
        description: "Packs two signed normalized floats into a uint",
        signatures: &[sig(&["vec2"], "uint")],
    },
    BuiltinFunction {
        name: "unpackSnorm2x16",
        description: "Unpacks a uint into two signed normalized floats",
        signatures: &[sig(&["uint"], "vec2")],
    },
];

pub const CONSTANTS: &[BuiltinConstant] = &[
    BuiltinConstant {
        name: "PI",
        ty: "float",
        description: "The mathematical constant pi (3.14159...)",
        value: "3.14159265358979323846",
    },
    BuiltinConstant {
        name: "TAU",
        ty: "float",
        description: "The mathematical constant tau (2 * pi)",
        value: "6.28318530717958647692",
    },
    BuiltinConstant {
        name: "E",
        ty: "float",
        description: "Euler's number (2.71828...)",
        value: "2.71828182845904523536",
    },
];

const fn var(name: &'static str, ty: &'static str, description: &'static str, read_write: &'static str) -> BuiltinVariable {
    BuiltinVariable {
        name,
        ty,
        description,
        read_write,
    }
}

pub const SPATIAL_VERTEX_VARIABLES: &[BuiltinVariable] = &[
    var("VERTEX", "vec3", "Vertex position in local space", "inout"),
    var("NORMAL", "vec3", "Vertex normal in local space", "inout"),
    var("TANGENT", "vec3", "Vertex tangent in local space", "inout"),
    var("BINORMAL", "vec3", "Vertex binormal in local space", "inout"),
    var("UV", "vec2", "Primary UV coordinates", "inout"),
    var("UV2", "vec2", "Secondary UV coordinates", "inout"),
    var("COLOR", "vec4", "Vertex color", "inout"),
    var("POINT_SIZE", "float", "Point size for point rendering", "inout"),
    var("INSTANCE_ID", "int", "Instance ID for instanced rendering", "in"),
    var("VERTEX_ID", "int", "Vertex ID", "in"),
    var("INSTANCE_CUSTOM", "vec4", "Instance custom data", "in"),
    var("MODEL_MATRIX", "mat4", "Model matrix (world transform)", "in"),
    var("MODEL_NORMAL_MATRIX", "mat3", "Normal matrix", "in"),
    var("VIEW_MATRIX", "mat4", "View matrix", "in"),
    var("INV_VIEW_MATRIX", "mat4", "Inverse view matrix", "in"),
    var("PROJECTION_MATRIX", "mat4", "Projection matrix", "inout"),
    var("INV_PROJECTION_MATRIX", "mat4", "Inverse projection matrix", "in"),
    var("MODELVIEW_MATRIX", "mat4", "Model-view matrix", "in"),
    var("MODELVIEW_NORMAL_MATRIX", "mat3", "Model-view normal matrix", "in"),
    var("VIEWPORT_SIZE", "vec2", "Viewport size in pixels", "in"),
    var("OUTPUT_IS_SRGB", "bool", "True if output is sRGB", "in"),
    var("NODE_POSITION_WORLD", "vec3", "Node position in world space", "in"),
    var("CAMERA_POSITION_WORLD", "vec3", "Camera position in world space", "in"),
    var("CAMERA_DIRECTION_WORLD", "vec3", "Camera direction in world space", "in"),
    var("CAMERA_VISIBLE_LAYERS", "uint", "Camera visible layers bitmask", "in"),
    var("POSITION", "vec4", "Output position in clip space", "out"),
    var("TIME", "float", "Time since start", "in"),
];

pub const SPATIAL_FRAGMENT_VARIABLES: &[BuiltinVariable] = &[
    var("VERTEX", "vec3", "Vertex position in view space", "in"),
    var("FRAGCOORD", "vec4", "Fragment coordinates", "in"),
    var("FRONT_FACING", "bool", "True if front face", "in"),
    var("NORMAL", "vec3", "Normal in view space", "inout"),
    var("TANGENT", "vec3", "Tangent in view space", "in"),
    var("BINORMAL", "vec3", "Binormal in view space", "in"),
    var("UV", "vec2", "Primary UV coordinates", "in"),
    var("UV2", "vec2", "Secondary UV coordinates", "in"),
    var("COLOR", "vec4", "Vertex color", "in"),
    var("ALBEDO", "vec3", "Albedo color", "out"),
    var("ALPHA", "float", "Alpha value", "out"),
    var("METALLIC", "float", "Metallic value", "out"),
    var("ROUGHNESS", "float", "Roughness value", "out"),
    var("SPECULAR", "float", "Specular value", "out"),
    var("RIM", "float", "Rim lighting intensity", "out"),
    var("RIM_TINT", "float", "Rim tint", "out"),
    var("CLEARCOAT", "float", "Clearcoat intensity", "out"),
    var("CLEARCOAT_ROUGHNESS", "float", "Clearcoat roughness", "out"),
    var("ANISOTROPY", "float", "Anisotropy intensity", "out"),
    var("ANISOTROPY_FLOW", "vec2", "Anisotropy flow direction", "out"),
    var("SSS_STRENGTH", "float", "Subsurface scattering strength", "out"),
    var("SSS_TRANSMITTANCE_COLOR", "vec4", "SSS transmittance color", "out"),
    var("SSS_TRANSMITTANCE_DEPTH", "float", "SSS transmittance depth", "out"),
    var("SSS_TRANSMITTANCE_BOOST", "float", "SSS transmittance boost", "out"),
    var("BACKLIGHT", "vec3", "Backlight color", "out"),
    var("AO", "float", "Ambient occlusion", "out"),
    var("AO_LIGHT_AFFECT", "float", "AO light affect", "out"),
    var("EMISSION", "vec3", "Emission color", "out"),
    var("NORMAL_MAP", "vec3", "Normal map", "out"),
    var("NORMAL_MAP_DEPTH", "float", "Normal map depth", "out"),
    var("ALPHA_SCISSOR_THRESHOLD", "float", "Alpha scissor threshold", "out"),
    var("ALPHA_HASH_SCALE", "float", "Alpha hash scale", "out"),
    var("ALPHA_ANTIALIASING_EDGE", "float", "Alpha antialiasing edge", "out"),
    var("ALPHA_TEXTURE_COORDINATE", "vec2", "Alpha texture coordinate", "out"),
    var("FOG", "vec4", "Fog color and density", "out"),
    var("MODEL_MATRIX", "mat4", "Model matrix", "in"),
    var("MODEL_NORMAL_MATRIX", "mat3", "Model normal matrix", "in"),
    var("VIEW_MATRIX", "mat4", "View matrix", "in"),
    var("INV_VIEW_MATRIX", "mat4", "Inverse view matrix", "in"),
    var("PROJECTION_MATRIX", "mat4", "Projection matrix", "in"),
    var("INV_PROJECTION_MATRIX", "mat4", "Inverse projection matrix", "in"),
    var("VIEWPORT_SIZE", "vec2", "Viewport size", "in"),
    var("NODE_POSITION_WORLD", "vec3", "Node world position", "in"),
    var("CAMERA_POSITION_WORLD", "vec3", "Camera world position", "in"),
    var("CAMERA_DIRECTION_WORLD", "vec3", "Camera world direction", "in"),
    var("CAMERA_VISIBLE_LAYERS", "uint", "Camera visible layers", "in"),
    var("VIEW", "vec3", "View direction", "in"),
    var("TIME", "float", "Time since start", "in"),
    var("SCREEN_UV", "vec2", "Screen UV coordinates", "in"),
    var("SCREEN_PIXEL_SIZE", "vec2", "Screen pixel size", "in"),
    var("DEPTH", "float", "Output depth", "out"),
];

pub const SPATIAL_LIGHT_VARIABLES: &[BuiltinVariable] = &[
    var("ALBEDO", "vec3", "Albedo from fragment", "in"),
    var("ROUGHNESS", "float", "Roughness from fragment", "in"),
    var("METALLIC", "float", "Metallic from fragment", "in"),
    var("SPECULAR", "float", "Specular from fragment", "in"),
    var("BACKLIGHT", "vec3", "Backlight from fragment", "in"),
    var("AO", "float", "AO from fragment", "in"),
    var("LIGHT", "vec3", "Light direction", "in"),
    var("LIGHT_COLOR", "vec3", "Light color", "in"),
    var("ATTENUATION", "float", "Light attenuation", "in"),
    var("SHADOW_ATTENUATION", "vec3", "Shadow attenuation", "in"),
    var("LIGHT_IS_DIRECTIONAL", "bool", "Is directional light", "in"),
    var("VIEW", "vec3", "View direction", "in"),
    var("NORMAL", "vec3", "Normal in view space", "in"),
    var("DIFFUSE_LIGHT", "vec3", "Diffuse light output", "out"),
    var("SPECULAR_LIGHT", "vec3", "Specular light output", "out"),
    var("ALPHA", "float", "Alpha output", "out"),
];

pub const CANVAS_ITEM_VERTEX_VARIABLES: &[BuiltinVariable] = &[
    var("VERTEX", "vec2", "Vertex position", "inout"),
    var("UV", "vec2", "UV coordinates", "inout"),
    var("COLOR", "vec4", "Vertex color", "inout"),
    var("POINT_SIZE", "float", "Point size", "inout"),
    var("MODEL_MATRIX", "mat4", "Model matrix", "in"),
    var("CANVAS_MATRIX", "mat4", "Canvas matrix", "in"),
    var("SCREEN_MATRIX", "mat4", "Screen matrix", "in"),
    var("INSTANCE_CUSTOM", "vec4", "Instance custom data", "in"),
    var("INSTANCE_ID", "int", "Instance ID", "in"),
    var("VERTEX_ID", "int", "Vertex ID", "in"),
    var("AT_LIGHT_PASS", "bool", "Is light pass", "in"),
    var("TEXTURE_PIXEL_SIZE", "vec2", "Texture pixel size", "in"),
    var("TIME", "float", "Time", "in"),
];

pub const CANVAS_ITEM_FRAGMENT_VARIABLES: &[BuiltinVariable] = &[
    var("FRAGCOORD", "vec4", "Fragment coordinates", "in"),
    var("UV", "vec2", "UV coordinates", "in"),
    var("COLOR", "vec4", "Color output", "inout"),
    var("NORMAL", "vec3", "Normal for 2D lighting", "out"),
    var("NORMAL_MAP", "vec3", "Normal map", "out"),
    var("NORMAL_MAP_DEPTH", "float", "Normal map depth", "out"),
    var("TEXTURE", "sampler2D", "Main texture", "in"),
    var("TEXTURE_PIXEL_SIZE", "vec2", "Texture pixel size", "in"),
    var("SCREEN_UV", "vec2", "Screen UV", "in"),
    var("SCREEN_PIXEL_SIZE", "vec2", "Screen pixel size", "in"),
    var("POINT_COORD", "vec2", "Point coordinate", "in"),
    var("AT_LIGHT_PASS", "bool", "Is light pass", "in"),
    var("TIME", "float", "Time", "in"),
    var("SPECULAR_SHININESS", "vec4", "Specular shininess", "in"),
    var("VERTEX", "vec2", "Vertex position", "in"),
];

pub const CANVAS_ITEM_LIGHT_VARIABLES: &[BuiltinVariable] = &[
    var("FRAGCOORD", "vec4", "Fragment coordinates", "in"),
    var("NORMAL", "vec3", "Normal", "in"),
    var("COLOR", "vec4", "Color from fragment", "in"),
    var("UV", "vec2", "UV coordinates", "in"),
    var("SPECULAR_SHININESS", "vec4", "Specular shininess", "in"),
    var("LIGHT_COLOR", "vec4", "Light color", "in"),
    var("LIGHT_POSITION", "vec3", "Light position", "in"),
    var("LIGHT_DIRECTION", "vec3", "Light direction", "in"),
    var("LIGHT_IS_DIRECTIONAL", "bool", "Is directional light", "in"),
    var("LIGHT_ENERGY", "float", "Light energy", "in"),
    var("LIGHT_VERTEX", "vec3", "Light vertex", "in"),
    var("LIGHT", "vec4", "Light output", "out"),
    var("SHADOW_MODULATE", "vec4", "Shadow modulate", "in"),
    var("SCREEN_UV", "vec2", "Screen UV", "in"),
    var("TEXTURE", "sampler2D", "Main texture", "in"),
    var("TEXTURE_PIXEL_SIZE", "vec2", "Texture pixel size", "in"),
    var("POINT_COORD", "vec2", "Point coordinate", "in"),
    var("TIME", "float", "Time", "in"),
];

pub const PARTICLES_VARIABLES: &[BuiltinVariable] = &[
    var("COLOR", "vec4", "Particle color", "inout"),
    var("VELOCITY", "vec3", "Particle velocity", "inout"),
    var("MASS", "float", "Particle mass", "inout"),
    var("ACTIVE", "bool", "Is particle active", "inout"),
    var("RESTART", "bool", "Restart flag", "in"),
    var("CUSTOM", "vec4", "Custom data", "inout"),
    var("TRANSFORM", "mat4", "Particle transform", "inout"),
    var("LIFETIME", "float", "Particle lifetime", "in"),
    var("DELTA", "float", "Delta time", "in"),
    var("NUMBER", "uint", "Particle number", "in"),
    var("INDEX", "int", "Particle index", "in"),
    var("EMISSION_TRANSFORM", "mat4", "Emission transform", "in"),
    var("RANDOM_SEED", "uint", "Random seed", "in"),
    var("TIME", "float", "Time", "in"),
    var("INTERPOLATE_TO_END", "float", "Interpolation to end", "in"),
    var("AMOUNT_RATIO", "float", "Amount ratio", "in"),
];

pub const SKY_VARIABLES: &[BuiltinVariable] = &[
    var("RADIANCE", "vec3", "Radiance output", "out"),
    var("IRRADIANCE", "vec3", "Irradiance output", "out"),
    var("FOG", "vec4", "Fog output", "out"),
    var("AT_CUBEMAP_PASS", "bool", "Is cubemap pass", "in"),
    var("AT_HALF_RES_PASS", "bool", "Is half res pass", "in"),
    var("AT_QUARTER_RES_PASS", "bool", "Is quarter res pass", "in"),
    var("EYEDIR", "vec3", "Eye direction", "in"),
    var("HALF_RES_COLOR", "vec4", "Half res color", "in"),
    var("QUARTER_RES_COLOR", "vec4", "Quarter res color", "in"),
    var("SCREEN_UV", "vec2", "Screen UV", "in"),
    var("SKY_COORDS", "vec2", "Sky coordinates", "in"),
    var("TIME", "float", "Time", "in"),
    var("POSITION", "vec3", "World position", "in"),
    var("LIGHT0_ENABLED", "bool", "Light 0 enabled", "in"),
    var("LIGHT0_DIRECTION", "vec3", "Light 0 direction", "in"),
    var("LIGHT0_ENERGY", "float", "Light 0 energy", "in"),
    var("LIGHT0_COLOR", "vec3", "Light 0 color", "in"),
    var("LIGHT0_SIZE", "float", "Light 0 size", "in"),
    var("LIGHT1_ENABLED", "bool", "Light 1 enabled", "in"),
    var("LIGHT1_DIRECTION", "vec3", "Light 1 direction", "in"),
    var("LIGHT1_ENERGY", "float", "Light 1 energy", "in"),
    var("LIGHT1_COLOR", "vec3", "Light 1 color", "in"),
    var("LIGHT1_SIZE", "float", "Light 1 size", "in"),
    var("LIGHT2_ENABLED", "bool", "Light 2 enabled", "in"),
    var("LIGHT2_DIRECTION", "vec3", "Light 2 direction", "in"),
    var("LIGHT2_ENERGY", "float", "Light 2 energy", "in"),
    var("LIGHT2_COLOR", "vec3", "Light 2 color", "in"),
    var("LIGHT2_SIZE", "float", "Light 2 size", "in"),
    var("LIGHT3_ENABLED", "bool", "Light 3 enabled", "in"),
    var("LIGHT3_DIRECTION", "vec3", "Light 3 direction", "in"),
    var("LIGHT3_ENERGY", "float", "Light 3 energy", "in"),
    var("LIGHT3_COLOR", "vec3", "Light 3 color", "in"),
    var("LIGHT3_SIZE", "float", "Light 3 size", "in"),
];

pub const FOG_VARIABLES: &[BuiltinVariable] = &[
    var("WORLD_POSITION", "vec3", "World position", "in"),
    var("OBJECT_POSITION", "vec3", "Object position", "in"),
    var("UVW", "vec3", "UVW coordinates", "in"),
    var("SIZE", "vec3", "Size", "in"),
    var("SDF", "float", "Signed distance field", "in"),
    var("ALBEDO", "vec3", "Albedo output", "out"),
    var("DENSITY", "float", "Density output", "out"),
    var("EMISSION", "vec3", "Emission output", "out"),
    var("TIME", "float", "Time", "in"),
];

/// Uniform hint names with hover descriptions.
pub const UNIFORM_HINTS: &[(&str, &str)] = &[
    ("source_color", "Used as albedo or color (sRGB conversion applied)"),
    ("hint_range", "Restricts value to range: hint_range(min, max[, step])"),
    ("hint_normal", "Used as normal map"),
    ("hint_default_white", "Default to opaque white"),
    ("hint_default_black", "Default to opaque black"),
    ("hint_default_transparent", "Default to transparent black"),
    ("hint_anisotropy", "Used as flowmap for anisotropy"),
    ("hint_roughness_r", "Roughness stored in red channel"),
    ("hint_roughness_g", "Roughness stored in green channel"),
    ("hint_roughness_b", "Roughness stored in blue channel"),
    ("hint_roughness_a", "Roughness stored in alpha channel"),
    ("hint_roughness_normal", "Roughness guided by normal map"),
    ("hint_roughness_gray", "Roughness from grayscale"),
    ("hint_screen_texture", "Screen texture sampler"),
    ("hint_depth_texture", "Depth texture sampler"),
    ("hint_normal_roughness_texture", "Normal roughness texture (Forward+ only)"),
    ("filter_nearest", "Use nearest filtering"),
    ("filter_linear", "Use linear filtering"),
    ("filter_nearest_mipmap", "Use nearest filtering with mipmaps"),
    ("filter_linear_mipmap", "Use linear filtering with mipmaps"),
    ("filter_nearest_mipmap_anisotropic", "Use nearest filtering with anisotropic mipmaps"),
    ("filter_linear_mipmap_anisotropic", "Use linear filtering with anisotropic mipmaps"),
    ("repeat_enable", "Enable texture repeat"),
    ("repeat_disable", "Disable texture repeat"),
    ("hint_enum", "Display as dropdown: hint_enum(\"Option1\", \"Option2\", ...)"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdshader::Type;

    #[test]
    fn every_signature_names_real_types() {
        for function in FUNCTIONS {
            assert!(!function.signatures.is_empty(), "{} has no signatures", function.name);
            for signature in function.signatures {
                assert!(
                    Type::from_name(signature.ret).is_some(),
                    "{}: unknown return type {}", function.name, signature.ret,
                );
                for param in signature.params {
                    assert!(
                        Type::from_name(param).is_some(),
                        "{}: unknown parameter type {}", function.name, param,
                    );
                }
            }
        }
    }

    #[test]
    fn every_stage_variable_names_a_real_type() {
        for kind in [ShaderKind::Spatial, ShaderKind::CanvasItem, ShaderKind::Particles, ShaderKind::Sky, ShaderKind::Fog] {
            for stage in kind.stages() {
                for variable in stage_variables(kind, stage) {
                    assert!(
                        Type::from_name(variable.ty).is_some(),
                        "{kind}/{stage}: unknown type {} for {}", variable.ty, variable.name,
                    );
                    assert!(matches!(variable.read_write, "in" | "out" | "inout"));
                }
            }
        }
    }

    #[test]
    fn function_lookup() {
        assert!(function("mix").is_some());
        assert!(function("texture").is_some());
        assert!(function("no_such_function").is_none());
    }

    #[test]
    fn constants_are_floats() {
        for constant in CONSTANTS {
            assert_eq!(constant.ty, "float");
        }
        assert!(constant("PI").is_some());
        assert!(constant("TAU").is_some());
        assert!(constant("E").is_some());
    }

    #[test]
    fn shader_kind_names_round_trip() {
        for kind in [ShaderKind::Spatial, ShaderKind::CanvasItem, ShaderKind::Particles, ShaderKind::Sky, ShaderKind::Fog] {
            assert_eq!(ShaderKind::from_name(kind.as_ref()), Some(kind));
        }
        assert_eq!(ShaderKind::from_name("volumetric"), None);
    }

    #[test]
    fn particles_variables_are_shared_between_stages() {
        assert_eq!(
            stage_variables(ShaderKind::Particles, "start").len(),
            stage_variables(ShaderKind::Particles, "process").len(),
        );
    }

    #[test]
    fn uniform_hint_lookup() {
        assert!(uniform_hint("source_color").is_some());
        assert!(uniform_hint("hint_range").is_some());
        assert!(uniform_hint("bogus_hint").is_none());
    }
}
