//! Type declaration and occurrence rewriting.

use kpp_ir::{NodeId, NodeKind, TokenId, TokenKind, TokenRange};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use super::{
    BoundParam, KernelTextures, RefContext, Signature, TextureGlobalVar, TextureKind,
    TextureRef, TextureType,
};
use crate::run::RunBuilder;
use crate::{MacroVocabulary, Processor, TransformError, TransformErrorKind};

const DEFAULT_INDENT: usize = 4;

fn internal(what: &'static str) -> TransformError {
    TransformError::new(0, TransformErrorKind::Internal(what))
}

fn finish(run: RunBuilder<'_>) -> Result<TokenRange, TransformError> {
    run.finish()?.ok_or_else(|| internal("synthesized an empty run"))
}

/// Per-file counters for synthesized type names.
#[derive(Default)]
pub(super) struct NameCounters {
    textures: u32,
    surfaces: u32,
}

impl NameCounters {
    fn next(&mut self, kind: TextureKind) -> String {
        let counter = match kind {
            TextureKind::Texture => &mut self.textures,
            TextureKind::Surface => &mut self.surfaces,
        };
        let name = format!("__{}TypeName_{}__", kind.stem(), counter);
        *counter += 1;
        name
    }
}

/// Declare the canonical type for one occurrence group ahead of the
/// file-scope container of its earliest occurrence.
pub(super) fn declare_type(
    processor: &mut Processor,
    vocabulary: &MacroVocabulary,
    counters: &mut NameCounters,
    refs: Vec<TextureRef>,
) -> Result<TextureType, TransformError> {
    let representative = refs
        .iter()
        .min_by_key(|r| r.line)
        .ok_or_else(|| internal("empty occurrence group"))?;
    let list = processor.tokens();
    let keyword = list.text(representative.keyword).to_string();
    let signature =
        Signature::from_keyword(&keyword).ok_or_else(|| internal("not a texture keyword"))?;
    let texel = representative
        .texel
        .iter()
        .map(|&id| list.text(id))
        .collect::<Vec<_>>()
        .join(" ");
    let line = representative.line;
    let container = processor
        .tree()
        .container(representative.node)
        .ok_or_else(|| TransformError::new(line, TransformErrorKind::NoContainer { keyword }))?;

    let name = counters.next(signature.kind);
    let dims = signature.dims.to_string();
    let run = {
        let args: SmallVec<[&str; 3]> = match signature.kind {
            TextureKind::Texture => SmallVec::from_buf([
                texel.as_str(),
                dims.as_str(),
                vocabulary.read_mode(signature.mode),
            ]),
            TextureKind::Surface => SmallVec::from_iter([dims.as_str()]),
        };
        let run = processor
            .run(line)
            .punct(TokenKind::Typedef)
            .space()
            .call(vocabulary.type_macro(signature.kind), &args)
            .space()
            .symbol(name.as_str())
            .punct(TokenKind::Semicolon)
            .eol();
        finish(run)?
    };
    let declaration = processor.insert_user_node_before(container, run)?;

    Ok(TextureType {
        signature,
        texel,
        name,
        declaration,
        refs,
        globals: Vec::new(),
    })
}

/// Kernel-definition bookkeeping shared across occurrences.
#[derive(Default)]
struct KernelState {
    /// Function -> last local binding inserted into its body.
    last_binding: FxHashMap<NodeId, NodeId>,
    /// Function -> index into the kernel list.
    index: FxHashMap<NodeId, usize>,
}

/// Rewrite every occurrence of every type, in source order.
pub(super) fn rewrite_refs(
    processor: &mut Processor,
    vocabulary: &MacroVocabulary,
    bind_globals: bool,
    types: &mut [TextureType],
    kernels: &mut Vec<KernelTextures>,
) -> Result<(), TransformError> {
    let mut order: Vec<(TokenId, usize, usize)> = types
        .iter()
        .enumerate()
        .flat_map(|(t, ty)| {
            ty.refs
                .iter()
                .enumerate()
                .map(move |(r, found)| (found.keyword, t, r))
        })
        .collect();
    order.sort_unstable();

    let mut state = KernelState::default();
    for (_, t, r) in order {
        let found = types[t].refs[r].clone();
        let ty = &types[t];
        let RefContext::KernelParam {
            function,
            function_name,
            definition,
        } = &found.context
        else {
            let run = finish(processor.run(found.line).symbol(ty.name.as_str()))?;
            processor.replace_tokens(TokenRange::new(found.keyword, found.end), Some(run))?;
            continue;
        };

        let param = found
            .param
            .as_ref()
            .ok_or_else(|| internal("kernel parameter without a name"))?;
        let signature = ty.signature;
        let param_macro = vocabulary.kernel_param_macro(signature.kind, signature.mode);
        let dims = signature.dims.to_string();
        let run = processor
            .run(found.line)
            .call(param_macro, &[dims.as_str(), param.text.as_str()]);
        let run = finish(run)?;
        processor.replace_tokens(TokenRange::new(found.keyword, param.last), Some(run))?;
        trace!(function = %function_name, param = %param.text, "rewrote kernel parameter");

        if !definition {
            continue;
        }
        let mut binding = param.text.clone();
        if bind_globals {
            let global = format!(
                "__{}Var_{}_{}__",
                signature.kind.stem(),
                function_name,
                param.text
            );
            declare_global(processor, vocabulary, ty, *function, &global, found.line)?;
            bind_local(
                processor,
                vocabulary,
                ty,
                *function,
                [param.text.as_str(), global.as_str()],
                &mut state,
                found.line,
            )?;
            types[t].globals.push(TextureGlobalVar {
                function: function_name.clone(),
                param: param.text.clone(),
                name: global.clone(),
            });
            binding = global;
        }

        let index = *state.index.entry(*function).or_insert_with(|| {
            kernels.push(KernelTextures {
                name: function_name.clone(),
                params: Vec::new(),
            });
            kernels.len() - 1
        });
        kernels[index].params.push(BoundParam {
            binding,
            kind: signature.kind,
            dims: signature.dims,
            mode: signature.mode,
        });
    }
    Ok(())
}

/// `<global macro>(Type, global);` ahead of the kernel.
fn declare_global(
    processor: &mut Processor,
    vocabulary: &MacroVocabulary,
    ty: &TextureType,
    function: NodeId,
    global: &str,
    line: u32,
) -> Result<(), TransformError> {
    let container = processor
        .tree()
        .container(function)
        .ok_or_else(|| internal("kernel is not attached to the tree"))?;
    let run = processor
        .run(line)
        .call(
            vocabulary.global_macro(ty.signature.kind),
            &[ty.name.as_str(), global],
        )
        .punct(TokenKind::Semicolon)
        .eol();
    let run = finish(run)?;
    processor.insert_user_node_before(container, run)?;
    Ok(())
}

/// `<bind macro>(Type, param, global);` at the top of the kernel body,
/// after bindings already made for the same kernel.
fn bind_local(
    processor: &mut Processor,
    vocabulary: &MacroVocabulary,
    ty: &TextureType,
    function: NodeId,
    [param, global]: [&str; 2],
    state: &mut KernelState,
    line: u32,
) -> Result<(), TransformError> {
    let body = kpp_parse::function_body(processor.tree(), function)
        .ok_or_else(|| internal("kernel definition has no body"))?;
    let indent = body_indent(processor, body);
    let run = processor
        .run(line)
        .eol()
        .indent(indent)
        .call(
            vocabulary.bind_macro(ty.signature.kind),
            &[ty.name.as_str(), param, global],
        )
        .punct(TokenKind::Semicolon);
    let run = finish(run)?;
    let node = match state.last_binding.get(&function) {
        Some(&previous) => processor.insert_user_node_after(previous, run)?,
        None => processor.insert_user_node_first_child(body, run)?,
    };
    state.last_binding.insert(function, node);
    Ok(())
}

/// Width of the whitespace before the body's first original statement.
fn body_indent(processor: &Processor, body: NodeId) -> usize {
    let tree = processor.tree();
    let list = processor.tokens();
    tree.children(body)
        .filter(|&c| tree.kind(c) != Some(NodeKind::UserTokens))
        .find_map(|c| tree.tokens(c))
        .and_then(|range| list.prev(range.first))
        .filter(|&id| list.kind(id) == Some(TokenKind::Whitespace))
        .map_or(DEFAULT_INDENT, |id| list.text(id).len())
}
