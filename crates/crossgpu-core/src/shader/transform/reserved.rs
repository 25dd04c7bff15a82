// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Reserved words of the destination languages.

use crate::shader::api::TargetKind;
use std::collections::HashSet;
use std::sync::OnceLock;

const HLSL_RESERVED: &[&str] = &[
    // Keywords
    "AppendStructuredBuffer", "asm", "asm_fragment", "BlendState", "bool", "break", "Buffer",
    "ByteAddressBuffer", "case", "cbuffer", "centroid", "class", "column_major", "compile",
    "compile_fragment", "CompileShader", "const", "continue", "ComputeShader",
    "ConsumeStructuredBuffer", "default", "DepthStencilState", "DepthStencilView", "discard",
    "do", "double", "DomainShader", "dword", "else", "export", "extern", "false", "float", "for",
    "fxgroup", "GeometryShader", "groupshared", "half", "HullShader", "if", "in", "inline",
    "inout", "InputPatch", "int", "interface", "line", "lineadj", "linear", "LineStream",
    "matrix", "min16float", "min10float", "min16int", "min12int", "min16uint", "namespace",
    "nointerpolation", "noperspective", "NULL", "out", "OutputPatch", "packoffset", "pass",
    "pixelfragment", "PixelShader", "point", "PointStream", "precise", "RasterizerState",
    "RenderTargetView", "return", "register", "row_major", "RWBuffer", "RWByteAddressBuffer",
    "RWStructuredBuffer", "RWTexture1D", "RWTexture1DArray", "RWTexture2D", "RWTexture2DArray",
    "RWTexture3D", "sample", "sampler", "SamplerState", "SamplerComparisonState", "shared",
    "snorm", "stateblock", "stateblock_state", "static", "string", "struct", "switch",
    "StructuredBuffer", "tbuffer", "technique", "technique10", "technique11", "texture",
    "Texture1D", "Texture1DArray", "Texture2D", "Texture2DArray", "Texture2DMS",
    "Texture2DMSArray", "Texture3D", "TextureCube", "TextureCubeArray", "true", "typedef",
    "triangle", "triangleadj", "TriangleStream", "uint", "uniform", "unorm", "unsigned",
    "vector", "vertexfragment", "VertexShader", "void", "volatile", "while",
    // Intrinsics that would be shadowed
    "abs", "clamp", "cross", "dot", "frac", "lerp", "max", "min", "mul", "normalize", "pow",
    "rsqrt", "saturate", "sqrt",
];

const MSL_RESERVED: &[&str] = &[
    // C++14
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "class", "compl", "const", "constexpr", "const_cast", "continue",
    "decltype", "default", "delete", "do", "double", "dynamic_cast", "else", "enum", "explicit",
    "export", "extern", "false", "float", "for", "friend", "goto", "if", "inline", "int", "long",
    "mutable", "namespace", "new", "noexcept", "not", "not_eq", "nullptr", "operator", "or",
    "or_eq", "private", "protected", "public", "register", "reinterpret_cast", "return",
    "short", "signed", "sizeof", "static", "static_assert", "static_cast", "struct", "switch",
    "template", "this", "thread_local", "throw", "true", "try", "typedef", "typeid", "typename",
    "union", "unsigned", "using", "virtual", "void", "volatile", "wchar_t", "while", "xor",
    "xor_eq",
    // Metal
    "kernel", "vertex", "fragment", "compute", "device", "constant", "threadgroup", "thread",
    "threadgroup_imageblock", "ray_data", "object_data", "metal", "main", "stage_in", "half",
    "uchar", "ushort", "uint", "ulong", "size_t", "ptrdiff_t", "array", "packed_float2",
    "packed_float3", "packed_float4", "sampler", "texture1d", "texture1d_array", "texture2d",
    "texture2d_array", "texture2d_ms", "texture3d", "texturecube", "texturecube_array",
    "depth2d", "depth2d_array", "depth2d_ms", "depthcube", "access", "read", "write",
    "read_write", "assert", "NAN", "INFINITY",
];

fn table(target: TargetKind) -> &'static HashSet<&'static str> {
    static HLSL: OnceLock<HashSet<&'static str>> = OnceLock::new();
    static MSL: OnceLock<HashSet<&'static str>> = OnceLock::new();

    match target {
        TargetKind::Hlsl => HLSL.get_or_init(|| HLSL_RESERVED.iter().copied().collect()),
        TargetKind::Msl => MSL.get_or_init(|| MSL_RESERVED.iter().copied().collect()),
    }
}

/// Whether `ident` is reserved in `target`.
pub fn is_reserved(target: TargetKind, ident: &str) -> bool {
    table(target).contains(ident)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_words_are_target_specific() {
        assert!(is_reserved(TargetKind::Hlsl, "cbuffer"));
        assert!(!is_reserved(TargetKind::Msl, "cbuffer"));
        assert!(is_reserved(TargetKind::Msl, "kernel"));
        assert!(!is_reserved(TargetKind::Hlsl, "kernel"));
        assert!(is_reserved(TargetKind::Msl, "main"));
        assert!(!is_reserved(TargetKind::Hlsl, "main"));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(is_reserved(TargetKind::Hlsl, "Texture2D"));
        assert!(!is_reserved(TargetKind::Hlsl, "texture2d"));
    }
}
