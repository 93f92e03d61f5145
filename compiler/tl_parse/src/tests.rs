//! Grammar coverage: one s-expression per construct.

use pretty_assertions::assert_eq;
use tl_ir::{Point, TextRange};

use crate::{parse, ContentChange, Document, SyntaxKind};

/// S-expression of a source that must parse cleanly.
fn sexp(source: &str) -> String {
    let tree = parse(source);
    assert!(tree.errors().is_empty(), "{source:?}: {:?}", tree.errors());
    tree.to_sexp()
}

/// S-expression of the value of `x = <expr>`.
fn expr(source: &str) -> String {
    let full = sexp(&format!("x = {source}"));
    let prefix = "(program (var_assignment (assignment_variables (identifier)) value: (expressions ";
    full.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(")))"))
        .unwrap_or_else(|| panic!("unexpected shape: {full}"))
        .to_owned()
}

#[test]
fn test_precedence() {
    assert_eq!(
        expr("a + b * c ^ d ^ e"),
        "(binary_op left: (identifier) right: (binary_op left: (identifier) right: \
         (binary_op left: (identifier) right: (binary_op left: (identifier) right: (identifier)))))"
    );
}

#[test]
fn test_left_associative() {
    assert_eq!(
        expr("a - b - c"),
        "(binary_op left: (binary_op left: (identifier) right: (identifier)) right: (identifier))"
    );
}

#[test]
fn test_concat_is_right_associative() {
    assert_eq!(
        expr("a .. b .. c"),
        "(binary_op left: (identifier) right: (binary_op left: (identifier) right: (identifier)))"
    );
}

#[test]
fn test_unary_binds_looser_than_power() {
    assert_eq!(
        expr("-a ^ 2"),
        "(unary_op operand: (binary_op left: (identifier) right: (number)))"
    );
    assert_eq!(
        expr("not a == b"),
        "(binary_op left: (unary_op operand: (identifier)) right: (identifier))"
    );
}

#[test]
fn test_cast_and_is() {
    assert_eq!(
        expr("y as number"),
        "(cast_expression left: (identifier) type: (simple_type name: (identifier)))"
    );
    assert_eq!(
        sexp("if x is string then end"),
        "(program (if_statement condition: (is_expression left: (identifier) \
         type: (simple_type name: (identifier)))))"
    );
}

#[test]
fn test_method_call_with_string_argument() {
    assert_eq!(
        sexp("obj:method \"s\""),
        "(program (function_call called_object: (method_index object: (identifier) \
         key: (identifier)) arguments: (arguments (string))))"
    );
}

#[test]
fn test_table_constructor() {
    assert_eq!(
        expr("{ 1, x = 2, [k] = 3; }"),
        "(table_constructor (field value: (number)) (field key: (identifier) value: (number)) \
         (field key: (identifier) value: (number)))"
    );
}

#[test]
fn test_anonymous_function_argument() {
    assert_eq!(
        sexp("f(function(a) return a end)"),
        "(program (function_call called_object: (identifier) arguments: (arguments \
         (anon_function parameters: (parameters (parameter name: (identifier))) \
         body: (block (return_statement (expressions (identifier))))))))"
    );
}

#[test]
fn test_generic_function() {
    assert_eq!(
        sexp("local function id<T>(x: T): T return x end"),
        "(program (function_statement name: (identifier) typeargs: (typeargs \
         (typearg name: (identifier))) parameters: (parameters (parameter name: (identifier) \
         type: (simple_type name: (identifier)))) return_type: (return_type \
         (simple_type name: (identifier))) body: (block (return_statement \
         (expressions (identifier))))))"
    );
}

#[test]
fn test_dotted_function_name() {
    assert_eq!(
        sexp("function a.b:c() end"),
        "(program (function_statement name: (method_index object: (index object: (identifier) \
         key: (identifier)) key: (identifier)) parameters: (parameters)))"
    );
}

#[test]
fn test_global_declarations() {
    assert_eq!(
        sexp("global function g() end\nglobal count: integer = 0"),
        "(program (function_statement name: (identifier) parameters: (parameters)) \
         (var_declaration (var_declarators (var name: (identifier))) type: (type_annotation \
         (simple_type name: (identifier))) value: (expressions (number))))"
    );
}

#[test]
fn test_attribute() {
    assert_eq!(
        sexp("local x <const> = 1"),
        "(program (var_declaration (var_declarators (var name: (identifier) \
         (attribute name: (identifier)))) value: (expressions (number))))"
    );
}

#[test]
fn test_table_types() {
    assert_eq!(
        sexp("local a, b: {string: integer}, {number, string}"),
        "(program (var_declaration (var_declarators (var name: (identifier)) \
         (var name: (identifier))) type: (type_annotation (table_type key: (simple_type \
         name: (identifier)) value: (simple_type name: (identifier))) (table_type \
         (simple_type name: (identifier)) (simple_type name: (identifier))))))"
    );
}

#[test]
fn test_nested_generic_closes_split_angle() {
    let source = "local x: Map<string, List<integer>>= nil";
    assert_eq!(
        sexp(source),
        "(program (var_declaration (var_declarators (var name: (identifier))) type: \
         (type_annotation (simple_type name: (identifier) typeargs: (type_list \
         (simple_type name: (identifier)) (simple_type name: (identifier) typeargs: \
         (type_list (simple_type name: (identifier))))))) value: (expressions (nil))))"
    );
    let tree = parse(source);
    let closing: Vec<_> = tree
        .leaves()
        .filter(|leaf| leaf.text() == ">")
        .map(|leaf| leaf.span().start)
        .collect();
    assert_eq!(closing, vec![33, 34]);
}

#[test]
fn test_union_with_nil() {
    assert_eq!(
        sexp("local u: string | nil"),
        "(program (var_declaration (var_declarators (var name: (identifier))) type: \
         (type_annotation (type_union (simple_type name: (identifier)) (simple_type (nil))))))"
    );
}

#[test]
fn test_interface_declaration() {
    let source = "local interface I<T> is Base, {T}\n  type K = string\n  enum Color \"red\" end\nend";
    assert_eq!(
        sexp(source),
        "(program (interface_declaration name: (identifier) typeargs: (typeargs \
         (typearg name: (identifier))) (interface_list (simple_type name: (identifier)) \
         (table_type (simple_type name: (identifier)))) body: (record_body (type_declaration \
         name: (identifier) value: (simple_type name: (identifier))) (enum_declaration \
         name: (identifier) body: (enum_body (string))))))"
    );
}

#[test]
fn test_record_body_entries() {
    let source = "local record R\n  userdata\n  {number}\n  metamethod __add: function(R, R): R\n  [\"k\"]: string\nend";
    assert_eq!(
        sexp(source),
        "(program (record_declaration name: (identifier) body: (record_body \
         (record_array_type type: (simple_type name: (identifier))) (record_field \
         name: (identifier) type: (function_type parameters: (parameters (parameter \
         type: (simple_type name: (identifier))) (parameter type: (simple_type \
         name: (identifier)))) return_type: (return_type (simple_type name: (identifier))))) \
         (record_field key: (string) type: (simple_type name: (identifier))))))"
    );
}

#[test]
fn test_record_where_clause() {
    let tree = parse("local record Cat is Animal where self.kind == \"cat\"\nend");
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    let record = tree.root().child(0).unwrap();
    assert!(record.child_of_kind(SyntaxKind::WhereClause).is_some());
    assert!(record.child_of_kind(SyntaxKind::InterfaceList).is_some());
}

#[test]
fn test_type_alias_of_require() {
    assert_eq!(
        sexp("local type M = require(\"mod\")"),
        "(program (type_declaration name: (identifier) value: (function_call \
         called_object: (identifier) arguments: (arguments (string)))))"
    );
}

#[test]
fn test_anonymous_record_alias() {
    let tree = parse("local type P = record\n  x: number\nend");
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    let decl = tree.root().child(0).unwrap();
    assert_eq!(decl.kind(), SyntaxKind::TypeDeclaration);
    assert_eq!(
        decl.child_by_field(crate::Field::Value).unwrap().kind(),
        SyntaxKind::RecordDeclaration
    );
}

#[test]
fn test_loops_and_labels() {
    assert_eq!(
        sexp(
            "while true do break end repeat x() until done \
             for k, v in pairs(t) do end goto top ::top::"
        ),
        "(program (while_statement condition: (true) body: (block (break_statement))) \
         (repeat_statement body: (block (function_call called_object: (identifier) \
         arguments: (arguments))) condition: (identifier)) (generic_for_statement \
         name: (identifier) name: (identifier) (expressions (function_call called_object: \
         (identifier) arguments: (arguments (identifier))))) (goto_statement \
         name: (identifier)) (label_statement name: (identifier)))"
    );
}

#[test]
fn test_bare_expression_is_error() {
    let tree = parse("x");
    assert_eq!(tree.to_sexp(), "(program (ERROR (identifier)))");
    assert_eq!(
        tree.errors()[0].message,
        "syntax error, expected assignment or call, found end of file"
    );
}

#[test]
fn test_unfinished_string() {
    let tree = parse("local s = 'abc");
    assert_eq!(
        tree.to_sexp(),
        "(program (var_declaration (var_declarators (var name: (identifier))) \
         value: (expressions (ERROR))))"
    );
    assert_eq!(
        tree.errors()[0].message,
        "unfinished string, found unterminated string"
    );
}

#[test]
fn test_missing_end() {
    let tree = parse("if x then y()");
    assert_eq!(tree.errors().len(), 1);
    assert_eq!(tree.errors()[0].message, "expected 'end', found end of file");
    assert_eq!(tree.root().child(0).unwrap().kind(), SyntaxKind::IfStatement);
}

#[test]
fn test_recovery_continues_after_garbage() {
    let tree = parse("local x = 1\n) ) )\nlocal y = 2");
    let kinds: Vec<_> = tree.root().children().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::VarDeclaration,
            SyntaxKind::Error,
            SyntaxKind::VarDeclaration
        ]
    );
}

#[test]
fn test_deep_nesting_on_a_small_stack() {
    let worker = std::thread::Builder::new()
        .stack_size(2 << 20)
        .spawn(|| {
            let depth = 20_000;
            let open = "(".repeat(depth);
            let source = format!("x = {open}1{}\nlocal y = 2\n", ")".repeat(depth));

            let mut doc = Document::new("file:///deep.tl", source);
            assert!(doc.tree().errors().is_empty());
            let sexp = doc.tree().to_sexp();
            assert_eq!(sexp.matches("parenthesized_expression").count(), depth);

            // The nested statement is carried over by copying.
            let two = TextRange::new(Point::new(1, 10), Point::new(1, 11));
            doc.apply_edits(&[ContentChange::replace(two, "3")]);
            assert_eq!(doc.last_parse().reused_count, 1);
            assert_eq!(doc.tree().to_sexp(), sexp);

            let unclosed = parse(&format!("x = {open}1"));
            assert!(!unclosed.errors().is_empty());
        })
        .unwrap();
    worker.join().unwrap();
}
