//! Integration tests for end-to-end compilation.
//!
//! These tests build small units by hand and run them through the whole
//! pipeline: type checking, the fatal gate, and lowering into an in-memory
//! module with its debug record.

use lowerc::{
    ast::{
        ast::NodeWrapper,
        expressions::{CastExpr, IntegerLiteral, VariableExpr},
        statements::{FnDeclStmt, ReturnStmt, VarDeclStmt},
    },
    pipeline::{check, compile, CompileOptions},
    scope::scope::Scopes,
    types::registry::TypeRegistry,
    Span, MK_NODE, MK_SPAN,
};

fn span(line: u32) -> Span {
    MK_SPAN!("demo.lw", line, 5, line, 30)
}

/// fn main() { let x: i32 = 300 as i64; }
fn narrowing_main(types: &mut TypeRegistry, scopes: &mut Scopes) -> NodeWrapper {
    let void_type = types.void_type();
    let i32_type = types.lookup("i32").unwrap();
    let i64_type = types.lookup("i64").unwrap();

    let global = scopes.global();
    let mut function = FnDeclStmt::new(scopes, global, "main", vec![], void_type, span(1));
    let body = function.body_scope;
    let literal = MK_NODE!(IntegerLiteral::new(body, 300, i64_type, span(2)));
    function.push(MK_NODE!(VarDeclStmt::new(
        scopes,
        body,
        "x",
        Some(i32_type),
        Some(literal),
        span(2)
    )));
    MK_NODE!(function)
}

/// fn widen(byte: u8) -> u32 { let copy = byte; return copy; }
fn widen(types: &mut TypeRegistry, scopes: &mut Scopes) -> NodeWrapper {
    let u8_type = types.lookup("u8").unwrap();
    let u32_type = types.lookup("u32").unwrap();

    let global = scopes.global();
    let mut function = FnDeclStmt::new(
        scopes,
        global,
        "widen",
        vec![(String::from("byte"), u8_type, MK_SPAN!("demo.lw", 4, 11, 4, 19))],
        u32_type,
        span(4),
    );
    let body = function.body_scope;
    let byte = MK_NODE!(VariableExpr::new(scopes, body, "byte", span(5)));
    function.push(MK_NODE!(VarDeclStmt::new(
        scopes,
        body,
        "copy",
        None,
        Some(byte),
        span(5)
    )));
    let copy = MK_NODE!(VariableExpr::new(scopes, body, "copy", span(6)));
    function.push(MK_NODE!(ReturnStmt::new(body, Some(copy), span(6))));
    MK_NODE!(function)
}

fn options() -> CompileOptions {
    CompileOptions {
        module_name: String::from("demo"),
        source_file: String::from("demo.lw"),
        ..Default::default()
    }
}

#[test]
fn test_compile_module() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let mut unit = vec![
        narrowing_main(&mut types, &mut scopes),
        widen(&mut types, &mut scopes),
    ];

    let compiled = compile(&mut unit, &mut types, &mut scopes, &options()).unwrap();

    assert!(compiled.diagnostics.is_empty());
    insta::assert_snapshot!(compiled.module.to_string(), @r"
    module demo

    fn main() -> void {
    bb0:
      %0 = query.addr
      %1 = const i64 300
      %2 = trunc %1 to i32
      ret void
    }

    fn widen(i8 %4) -> i32 {
    bb0:
      %5 = query.addr
      %6 = zext %4 to i32
      ret %6
    }
    ");
}

#[test]
fn test_declaration_initializer_becomes_cast() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let i32_type = types.lookup("i32").unwrap();
    let mut unit = vec![narrowing_main(&mut types, &mut scopes)];

    let diagnostics = check(&mut unit, &mut types, &mut scopes);
    assert!(!diagnostics.has_fatal());

    let function = unit[0].downcast_ref::<FnDeclStmt>().unwrap();
    let decl = function.body[0].downcast_ref::<VarDeclStmt>().unwrap();
    let initializer = decl.initializer.as_ref().unwrap();
    assert_eq!(
        initializer.downcast_ref::<CastExpr>().unwrap().dest_type,
        i32_type
    );
}

#[test]
fn test_debug_info_recorded() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let mut unit = vec![widen(&mut types, &mut scopes)];

    let compiled = compile(&mut unit, &mut types, &mut scopes, &options()).unwrap();
    let debug_info = compiled.debug_info;

    assert_eq!(debug_info.file, "demo.lw");
    assert_eq!(debug_info.subprograms[0].name, "widen");
    assert_eq!(debug_info.subprograms[0].line, 4);
    let names = debug_info
        .variables
        .iter()
        .map(|variable| variable.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["byte", "copy"]);
    assert_eq!(debug_info.find_variable("copy").unwrap().line, 5);
    let byte = debug_info.find_variable("byte").unwrap();
    assert_eq!((byte.line, byte.col), (4, 11));
}

#[test]
fn test_debug_info_disabled() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let mut unit = vec![widen(&mut types, &mut scopes)];
    let options = CompileOptions {
        emit_debug_info: false,
        ..options()
    };

    let compiled = compile(&mut unit, &mut types, &mut scopes, &options).unwrap();

    assert!(compiled.debug_info.subprograms.is_empty());
    assert!(compiled.debug_info.variables.is_empty());
    assert_eq!(compiled.module.functions().len(), 1);
}

#[test]
fn test_fatal_errors_skip_lowering() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let bool_type = types.bool_type();
    let i64_type = types.lookup("i64").unwrap();

    let global = scopes.global();
    let mut function = FnDeclStmt::new(
        &mut scopes,
        global,
        "broken",
        vec![],
        bool_type,
        span(1),
    );
    let body = function.body_scope;
    let literal = MK_NODE!(IntegerLiteral::new(body, 1, i64_type, span(2)));
    function.push(MK_NODE!(ReturnStmt::new(body, Some(literal), span(2))));
    function.push(MK_NODE!(VarDeclStmt::new(
        &mut scopes,
        body,
        "nothing",
        None,
        None,
        span(3)
    )));
    let mut unit = vec![narrowing_main(&mut types, &mut scopes), MK_NODE!(function)];

    let diagnostics = compile(&mut unit, &mut types, &mut scopes, &options()).unwrap_err();

    assert!(diagnostics.has_fatal());
    let messages = diagnostics
        .iter()
        .map(|error| error.to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        messages,
        vec![
            "demo.lw:2:5: error: value of type 'i64' is not compatible with return type 'bool'",
            "demo.lw:3:5: error: object 'nothing' has unknown type",
        ]
    );
}

#[test]
fn test_undeclared_variable() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let i32_type = types.lookup("i32").unwrap();

    let global = scopes.global();
    let function = FnDeclStmt::new(&mut scopes, global, "main", vec![], i32_type, span(1));
    let body = function.body_scope;
    let missing = MK_NODE!(VariableExpr::new(&scopes, body, "missing", span(2)));
    let function = function.with_body(vec![MK_NODE!(ReturnStmt::new(body, Some(missing), span(2)))]);
    let mut unit = vec![MK_NODE!(function)];

    let diagnostics = compile(&mut unit, &mut types, &mut scopes, &options()).unwrap_err();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.count("VariableNotDeclared"), 1);
}

#[test]
fn test_top_level_statements_are_not_lowered() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let i32_type = types.lookup("i32").unwrap();
    let global = scopes.global();

    let literal = MK_NODE!(IntegerLiteral::new(global, 1, i32_type, span(2)));
    let mut unit = vec![
        MK_NODE!(ReturnStmt::new(global, None, span(1))),
        MK_NODE!(VarDeclStmt::new(
            &mut scopes,
            global,
            "x",
            Some(i32_type),
            Some(literal),
            span(2)
        )),
    ];

    let diagnostics = compile(&mut unit, &mut types, &mut scopes, &options()).unwrap_err();

    assert!(diagnostics.has_fatal());
    assert_eq!(diagnostics.count("OutsideFunction"), 2);
    assert_eq!(
        diagnostics.iter().next().unwrap().to_string(),
        "demo.lw:1:5: error: return statement outside of a function"
    );
}
