use kpp_lexer::lex;
use pretty_assertions::assert_eq;

use super::*;
use crate::parse;

fn first_function(source: &str) -> (TokenList, NodeTree, NodeId) {
    let list = lex(source).unwrap();
    let tree = parse(&list).unwrap();
    let func = tree
        .children(tree.root())
        .find(|&n| tree.kind(n).is_some_and(NodeKind::is_function))
        .unwrap();
    (list, tree, func)
}

#[test]
fn opencl_kernel() {
    let (list, tree, func) = first_function("kernel void k(int a) { }");
    assert!(is_kernel(&list, &tree, func));
    assert_eq!(list.text(function_name(&list, &tree, func).unwrap()), "k");
}

#[test]
fn cuda_kernel_forms() {
    for source in [
        "extern \"C\" __global__ void blur(float* p) { }",
        "__global__ void blur(float* p) { }",
        "__kernel void blur(float* p);",
    ] {
        let (list, tree, func) = first_function(source);
        assert!(is_kernel(&list, &tree, func), "{source}");
        assert_eq!(list.text(function_name(&list, &tree, func).unwrap()), "blur");
    }
}

#[test]
fn plain_functions_are_not_kernels() {
    for source in [
        "void helper(int a) { }",
        "extern \"C\" void helper(int a);",
        "static kernel_like(int a) { }",
    ] {
        let (list, tree, func) = first_function(source);
        assert!(!is_kernel(&list, &tree, func), "{source}");
    }
}

#[test]
fn name_skips_launch_bounds() {
    let (list, tree, func) =
        first_function("__global__ void __launch_bounds__(256) scan(int* p) { }");
    assert_eq!(list.text(function_name(&list, &tree, func).unwrap()), "scan");
    assert!(is_kernel(&list, &tree, func));
}

#[test]
fn params_and_body_children() {
    let (list, tree, func) = first_function("void f(int a) { return; }");
    let params = function_params(&tree, func).unwrap();
    let range = tree.tokens(params).unwrap();
    assert_eq!(list.text(range.first), "(");
    assert_eq!(list.text(range.last), ")");
    let body = function_body(&tree, func).unwrap();
    assert_eq!(list.text(tree.tokens(body).unwrap().first), "{");
}

#[test]
fn declarations_have_no_body() {
    let (_, tree, func) = first_function("int g(void);");
    assert!(function_body(&tree, func).is_none());
    assert!(function_params(&tree, func).is_some());
}
