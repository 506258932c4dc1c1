use kpp_ir::NodeKind;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::{ProcessError, TransformErrorKind, TransformRegistry};

fn apply(config: &ProcessorConfig, source: &str) -> (Processor, TextureTransform) {
    let mut processor = Processor::load(config.clone(), source).unwrap();
    let mut transform = TextureTransform::new(config);
    transform.apply(&mut processor).unwrap();
    (processor, transform)
}

fn rewrite(platform: Platform, source: &str) -> String {
    let (processor, _) = apply(&ProcessorConfig::new("t.kpp", platform), source);
    processor.emit_to_string()
}

fn fail(source: &str) -> TransformError {
    let config = ProcessorConfig::new("t.kpp", Platform::OpenCl);
    let mut processor = Processor::load(config.clone(), source).unwrap();
    TextureTransform::new(&config).apply(&mut processor).unwrap_err()
}

#[test]
fn keyword_signatures() {
    assert_eq!(
        Signature::from_keyword("Texture2Dn"),
        Some(Signature {
            kind: TextureKind::Texture,
            dims: 2,
            mode: ReadMode::Normalized
        })
    );
    assert_eq!(
        Signature::from_keyword("Surface3D"),
        Some(Signature {
            kind: TextureKind::Surface,
            dims: 3,
            mode: ReadMode::Raw
        })
    );
    for text in ["Texture4Dn", "Texture2Dx", "Texture2D", "Surface2Dn", "texture2Dn"] {
        assert_eq!(Signature::from_keyword(text), None, "{text}");
    }
}

#[test]
fn same_signature_is_declared_once() {
    let (processor, transform) = apply(
        &ProcessorConfig::new("t.kpp", Platform::OpenCl),
        "float sample(Texture2Dn<float> a);\nTexture2Dn<float> b;\n",
    );
    assert_eq!(
        processor.emit_to_string(),
        "typedef __kpp_cl_texture_type(float, 2, __kpp_cl_read_norm) __TextureTypeName_0__;\n\
         float sample(__TextureTypeName_0__ a);\n\
         __TextureTypeName_0__ b;\n"
    );
    assert_eq!(transform.types().len(), 1);
    assert_eq!(transform.types()[0].refs.len(), 2);
    assert_eq!(transform.types()[0].texel, "float");
}

#[test]
fn read_mode_distinguishes_types() {
    assert_eq!(
        rewrite(
            Platform::OpenCl,
            "Texture2Dn<float> a;\nTexture2Du<float> b;\n"
        ),
        "typedef __kpp_cl_texture_type(float, 2, __kpp_cl_read_norm) __TextureTypeName_0__;\n\
         __TextureTypeName_0__ a;\n\
         typedef __kpp_cl_texture_type(float, 2, __kpp_cl_read_raw) __TextureTypeName_1__;\n\
         __TextureTypeName_1__ b;\n"
    );
}

#[test]
fn texel_spelling_is_normalized() {
    let (processor, transform) = apply(
        &ProcessorConfig::new("t.kpp", Platform::OpenCl),
        "Texture1Du<unsigned int> a;\nTexture1Du< unsigned  int > b;\n",
    );
    assert_eq!(transform.types().len(), 1);
    assert_eq!(
        processor.emit_to_string(),
        "typedef __kpp_cl_texture_type(unsigned int, 1, __kpp_cl_read_raw) __TextureTypeName_0__;\n\
         __TextureTypeName_0__ a;\n\
         __TextureTypeName_0__ b;\n"
    );
}

#[test]
fn file_scope_declaration_keeps_declarator() {
    assert_eq!(
        rewrite(Platform::Cuda, "Texture3Du<int> g;\n"),
        "typedef __kpp_cuda_texture_type(int, 3, cudaReadModeElementType) __TextureTypeName_0__;\n\
         __TextureTypeName_0__ g;\n"
    );
}

#[test]
fn typedef_and_local_contexts() {
    assert_eq!(
        rewrite(
            Platform::OpenCl,
            "typedef Texture2Dn<float4> Tex;\nvoid f() {\n  Surface1D s;\n}\n"
        ),
        "typedef __kpp_cl_texture_type(float4, 2, __kpp_cl_read_norm) __TextureTypeName_0__;\n\
         typedef __TextureTypeName_0__ Tex;\n\
         typedef __kpp_cl_surface_type(1) __SurfaceTypeName_0__;\n\
         void f() {\n  __SurfaceTypeName_0__ s;\n}\n"
    );
}

#[test]
fn opencl_kernel_parameter_is_a_macro() {
    let (processor, transform) = apply(
        &ProcessorConfig::new("t.kpp", Platform::OpenCl),
        "kernel void k(Texture2Dn<float> tex) { }\n",
    );
    assert_eq!(
        processor.emit_to_string(),
        "typedef __kpp_cl_texture_type(float, 2, __kpp_cl_read_norm) __TextureTypeName_0__;\n\
         kernel void k(__kpp_cl_kernel_texture_norm(2, tex)) { }\n"
    );
    assert!(transform.global_var("k", "tex").is_none());
    assert_eq!(
        transform.kernels(),
        &[KernelTextures {
            name: "k".to_string(),
            params: vec![BoundParam {
                binding: "tex".to_string(),
                kind: TextureKind::Texture,
                dims: 2,
                mode: ReadMode::Normalized,
            }],
        }]
    );
}

#[test]
fn cuda_kernel_gets_global_and_binding() {
    let (processor, transform) = apply(
        &ProcessorConfig::new("t.kpp", Platform::Cuda),
        "kernel void k(Texture2Dn<float> tex) { }\n",
    );
    assert_eq!(
        processor.emit_to_string(),
        "typedef __kpp_cuda_texture_type(float, 2, cudaReadModeNormalizedFloat) __TextureTypeName_0__;\n\
         __kpp_cuda_texture_global(__TextureTypeName_0__, __TextureVar_k_tex__);\n\
         kernel void k(__kpp_cuda_kernel_texture_norm(2, tex)) {\n    \
         __kpp_cuda_texture_bind(__TextureTypeName_0__, tex, __TextureVar_k_tex__); }\n"
    );
    let global = transform.global_var("k", "tex").unwrap();
    assert_eq!(global.name, "__TextureVar_k_tex__");
    assert_eq!(transform.types()[0].global_var("k", "tex"), Some(global));

    let tree = processor.tree();
    let kinds: Vec<_> = tree
        .children(tree.root())
        .filter_map(|n| tree.kind(n))
        .collect();
    assert_eq!(
        kinds,
        vec![NodeKind::UserTokens, NodeKind::UserTokens, NodeKind::FunctionDefn]
    );
    let func = tree.children(tree.root()).last().unwrap();
    let body = kpp_parse::function_body(tree, func).unwrap();
    assert_eq!(tree.kind(tree.first_child(body).unwrap()), Some(NodeKind::UserTokens));
}

#[test]
fn kernel_inside_extern_c_block() {
    let (processor, transform) = apply(
        &ProcessorConfig::new("t.kpp", Platform::Cuda),
        "extern \"C\" {\n__global__ void k(Texture2Dn<float> tex) { }\n}\n",
    );
    assert_eq!(
        processor.emit_to_string(),
        "extern \"C\" {\n\
         typedef __kpp_cuda_texture_type(float, 2, cudaReadModeNormalizedFloat) __TextureTypeName_0__;\n\
         __kpp_cuda_texture_global(__TextureTypeName_0__, __TextureVar_k_tex__);\n\
         __global__ void k(__kpp_cuda_kernel_texture_norm(2, tex)) {\n    \
         __kpp_cuda_texture_bind(__TextureTypeName_0__, tex, __TextureVar_k_tex__); }\n\
         }\n"
    );
    assert!(transform.global_var("k", "tex").is_some());
    assert_eq!(transform.kernels().len(), 1);
    assert_eq!(transform.kernels()[0].name, "k");
}

#[test]
fn synthesized_lines_follow_crlf() {
    assert_eq!(
        rewrite(
            Platform::Cuda,
            "int a;\r\nkernel void k(Texture2Dn<float> tex) { }\r\n"
        ),
        "int a;\r\n\
         typedef __kpp_cuda_texture_type(float, 2, cudaReadModeNormalizedFloat) __TextureTypeName_0__;\r\n\
         __kpp_cuda_texture_global(__TextureTypeName_0__, __TextureVar_k_tex__);\r\n\
         kernel void k(__kpp_cuda_kernel_texture_norm(2, tex)) {\r\n    \
         __kpp_cuda_texture_bind(__TextureTypeName_0__, tex, __TextureVar_k_tex__); }\r\n"
    );
}

#[test]
fn bindings_follow_parameter_order() {
    let source = "extern \"C\" __global__ void blur(Texture2Du<int> a, Texture2Dn<float> b, Texture2Du<int> c)\n\
                  {\n  int x = 0;\n}\n";
    let (processor, transform) = apply(&ProcessorConfig::new("t.kpp", Platform::Cuda), source);
    let text = processor.emit_to_string();
    let body = text.split_once("{\n").unwrap().1;
    assert_eq!(
        body,
        "  __kpp_cuda_texture_bind(__TextureTypeName_0__, a, __TextureVar_blur_a__);\n  \
         __kpp_cuda_texture_bind(__TextureTypeName_1__, b, __TextureVar_blur_b__);\n  \
         __kpp_cuda_texture_bind(__TextureTypeName_0__, c, __TextureVar_blur_c__);\n  \
         int x = 0;\n}\n"
    );
    let bindings: Vec<_> = transform.kernels()[0]
        .params
        .iter()
        .map(|p| p.binding.as_str())
        .collect();
    assert_eq!(
        bindings,
        vec!["__TextureVar_blur_a__", "__TextureVar_blur_b__", "__TextureVar_blur_c__"]
    );
}

#[test]
fn surface_kernel_parameter() {
    assert_eq!(
        rewrite(Platform::Cuda, "kernel void s(Surface2D out) { }\n"),
        "typedef __kpp_cuda_surface_type(2) __SurfaceTypeName_0__;\n\
         __kpp_cuda_surface_global(__SurfaceTypeName_0__, __SurfaceVar_s_out__);\n\
         kernel void s(__kpp_cuda_kernel_surface(2, out)) {\n    \
         __kpp_cuda_surface_bind(__SurfaceTypeName_0__, out, __SurfaceVar_s_out__); }\n"
    );
}

#[test]
fn kernel_prototype_has_no_bindings() {
    let (processor, transform) = apply(
        &ProcessorConfig::new("t.kpp", Platform::Cuda),
        "__global__ void k(Texture2Dn<float> tex, int n);\n",
    );
    assert_eq!(
        processor.emit_to_string(),
        "typedef __kpp_cuda_texture_type(float, 2, cudaReadModeNormalizedFloat) __TextureTypeName_0__;\n\
         __global__ void k(__kpp_cuda_kernel_texture_norm(2, tex), int n);\n"
    );
    assert!(transform.kernels().is_empty());
}

#[test]
fn side_table_lists_params_in_source_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tex.bin");
    let config = ProcessorConfig::new("t.kpp", Platform::OpenCl).with_binary(&path);
    apply(
        &config,
        "kernel void first(Texture2Du<int> a, Surface1D s, Texture2Dn<float> b, Texture2Du<int> c) { }\n\
         void helper(Texture2Du<int> h) { }\n\
         kernel void second(Texture3Dn<half> v) { }\n",
    );
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], side_table::TAG);
    let kernels = side_table::decode(&bytes).unwrap();
    let summary: Vec<(String, Vec<(String, u8, u8, u8)>)> = kernels
        .into_iter()
        .map(|k| {
            let params = k
                .params
                .into_iter()
                .map(|p| (p.binding, p.kind.tag(), p.dims, p.mode.tag()))
                .collect();
            (k.name, params)
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            (
                "first".to_string(),
                vec![
                    ("a".to_string(), 0, 2, b'u'),
                    ("s".to_string(), 1, 1, b'u'),
                    ("b".to_string(), 0, 2, b'n'),
                    ("c".to_string(), 0, 2, b'u'),
                ]
            ),
            ("second".to_string(), vec![("v".to_string(), 0, 3, b'n')]),
        ]
    );
}

#[test]
fn side_table_byte_layout() {
    let bytes = side_table::encode(&[KernelTextures {
        name: "k".to_string(),
        params: vec![BoundParam {
            binding: "t".to_string(),
            kind: TextureKind::Surface,
            dims: 2,
            mode: ReadMode::Normalized,
        }],
    }]);
    let mut expected = b"KPPTEX01".to_vec();
    expected.extend_from_slice(&[1, 0, 0, 0, 1, 0, 0, 0, b'k', 1, 0, 0, 0]);
    expected.extend_from_slice(&[1, 0, 0, 0, b't', 1, 2, b'u']);
    assert_eq!(bytes, expected);
    assert_eq!(side_table::decode(b"KPPTEX00"), Err(SideTableError::BadTag));
    assert_eq!(
        side_table::decode(&bytes[..bytes.len() - 1]),
        Err(SideTableError::Truncated)
    );
}

#[test]
fn unwritable_side_table_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProcessorConfig::new("t.kpp", Platform::Cuda)
        .with_binary(dir.path().join("missing").join("tex.bin"));
    let mut processor = Processor::load(config.clone(), "int x;\n").unwrap();
    let err = TextureTransform::new(&config)
        .apply(&mut processor)
        .unwrap_err();
    assert!(matches!(err.kind, TransformErrorKind::SideTable { .. }));
}

#[test]
fn structural_errors_are_line_tagged() {
    let cases: [(&str, u32, fn(&TransformErrorKind) -> bool); 6] = [
        ("int a;\nTexture2Dn x;\n", 2, |k| {
            matches!(k, TransformErrorKind::MissingOpenAngle { .. })
        }),
        ("Texture2Dn<> x;\n", 1, |k| {
            matches!(k, TransformErrorKind::MissingTexelType { .. })
        }),
        ("\n\nTexture2Dn<float x;\n", 3, |k| {
            matches!(k, TransformErrorKind::MissingCloseAngle { .. })
        }),
        ("Texture1Du<unsigned signed> t;\n", 1, |k| {
            matches!(k, TransformErrorKind::BadSignedness { word } if word == "signed")
        }),
        ("Texture1Du<unsigned> t;\n", 1, |k| {
            matches!(k, TransformErrorKind::BadSignedness { word } if word == "unsigned")
        }),
        ("void f(int n,\n       Texture2Dn<float>);\n", 2, |k| {
            matches!(k, TransformErrorKind::MissingParamName { .. })
        }),
    ];
    for (source, line, check) in cases {
        let err = fail(source);
        assert_eq!(err.line, line, "{source:?}");
        assert!(check(&err.kind), "{source:?}: {err}");
    }
}

#[test]
fn failed_pass_keeps_earlier_transforms() {
    let config = ProcessorConfig::new("t.kpp", Platform::OpenCl);
    let source = "int ok;\nTexture2Dn<> x;\n";
    let mut processor = Processor::load(config, source).unwrap();
    let err = processor
        .apply_transforms(&TransformRegistry::with_builtin())
        .unwrap_err();
    let ProcessError::Transform { transform, error } = err else {
        panic!("expected a transform error");
    };
    assert_eq!(transform, NAME);
    assert_eq!(error.line, 2);
    assert_eq!(
        processor.emit_to_string(),
        "#include \"kpp/prologue_opencl.h\"\nint ok;\nTexture2Dn<> x;\n"
    );
}

#[test]
fn files_without_textures_are_untouched() {
    let source = "kernel void k(float* p) { p[0] = 1.0f; }\n";
    assert_eq!(rewrite(Platform::Cuda, source), source);
}

proptest! {
    #[test]
    fn every_occurrence_is_rewritten(decls in prop::collection::vec(
        prop_oneof![
            Just("Texture2Dn<float>"),
            Just("Texture2Du<float>"),
            Just("Texture1Du<unsigned char>"),
            Just("Texture3Dn<half>"),
            Just("Surface2D"),
        ],
        1..10,
    )) {
        let body: String = decls
            .iter()
            .enumerate()
            .map(|(i, ty)| format!("{ty} v{i};\n"))
            .collect();
        let source = format!("{body}kernel void k() {{\n{body}}}\n");
        let out = rewrite(Platform::OpenCl, &source);

        let list = kpp_lexer::lex(&out).unwrap();
        let leftover = list
            .iter()
            .filter(|&id| Signature::from_keyword(list.text(id)).is_some())
            .count();
        prop_assert_eq!(leftover, 0);

        let distinct: std::collections::HashSet<_> = decls.iter().collect();
        prop_assert_eq!(out.matches("typedef ").count(), distinct.len());
        // the rewritten file parses again
        prop_assert!(kpp_parse::parse(&list).is_ok());
    }
}
