//! Unit tests for the node tree: cast insertion and traversal.

use crate::{
    scope::scope::Scopes,
    type_checker::type_checker::TypeChecker,
    types::registry::TypeRegistry,
    Span, MK_NODE, MK_SPAN,
};

use super::{
    ast::{Node, NodeType},
    cast::cast,
    expressions::{AddressOfExpr, BooleanLiteral, CastExpr, IntegerLiteral, VariableExpr},
    statements::{BlockStmt, ExpressionStmt, FnDeclStmt, ReturnStmt, VarDeclStmt},
    walk::{count_nodes, dump, walk},
};

fn span() -> Span {
    MK_SPAN!("test.lw", 2, 5, 2, 12)
}

#[test]
fn test_cast_keeps_node_of_destination_type() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let i32_type = types.lookup("i32").unwrap();
    let literal = MK_NODE!(IntegerLiteral::new(scopes.global(), 3, i32_type, span()));

    let type_checker = TypeChecker::new(&mut types, &mut scopes);
    let result = cast(literal, i32_type, &type_checker);

    assert_eq!(result.get_node_type(), NodeType::IntegerLiteral);
}

#[test]
fn test_cast_wraps_other_types() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let i16_type = types.lookup("i16").unwrap();
    let u64_type = types.lookup("u64").unwrap();
    let literal = MK_NODE!(IntegerLiteral::new(scopes.global(), 3, i16_type, span()));

    let type_checker = TypeChecker::new(&mut types, &mut scopes);
    let result = cast(literal, u64_type, &type_checker);

    let wrapper = result.downcast_ref::<CastExpr>().unwrap();
    assert_eq!(wrapper.dest_type, u64_type);
    assert_eq!(wrapper.span, span());
    assert_eq!(wrapper.value.get_type(), Some(i16_type));
}

#[test]
fn test_cast_is_not_nested() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let i16_type = types.lookup("i16").unwrap();
    let i64_type = types.lookup("i64").unwrap();
    let literal = MK_NODE!(IntegerLiteral::new(scopes.global(), 3, i16_type, span()));

    let type_checker = TypeChecker::new(&mut types, &mut scopes);
    let once = cast(literal, i64_type, &type_checker);
    let twice = cast(once, i64_type, &type_checker);

    let wrapper = twice.downcast_ref::<CastExpr>().unwrap();
    assert_eq!(wrapper.value.get_node_type(), NodeType::IntegerLiteral);
}

#[test]
fn test_cast_expression_trivially_compatible_only_with_destination() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let i8_type = types.lookup("i8").unwrap();
    let i32_type = types.lookup("i32").unwrap();
    let global = scopes.global();
    let wrapper = CastExpr::new(
        global,
        MK_NODE!(IntegerLiteral::new(global, 1, i8_type, span())),
        i32_type,
        span(),
    );

    let type_checker = TypeChecker::new(&mut types, &mut scopes);
    assert!(wrapper.trivially_compatible(&type_checker, i32_type));
    assert!(!wrapper.trivially_compatible(&type_checker, i8_type));
    assert_eq!(wrapper.get_type(), Some(i32_type));
}

#[test]
fn test_can_implicit_cast() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let i32_type = types.lookup("i32").unwrap();
    let bool_type = types.bool_type();
    let global = scopes.global();
    let mut flag = BooleanLiteral::new(global, false, span());
    let number = IntegerLiteral::new(global, 1, i32_type, span());

    let mut type_checker = TypeChecker::new(&mut types, &mut scopes);
    flag.type_check(&mut type_checker);

    assert!(flag.can_implicit_cast(&type_checker, i32_type));
    assert!(!number.can_implicit_cast(&type_checker, bool_type));
}

#[test]
fn test_variable_resolved_at_construction() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let i8_type = types.lookup("i8").unwrap();
    let i64_type = types.lookup("i64").unwrap();
    let body = scopes.create_function_scope(scopes.global(), types.void_type());

    let mut first = VarDeclStmt::new(&mut scopes, body, "x", Some(i8_type), None, span());
    let mut before = VariableExpr::new(&scopes, body, "x", span());
    let mut second = VarDeclStmt::new(&mut scopes, body, "x", Some(i64_type), None, span());
    let mut after = VariableExpr::new(&scopes, body, "x", span());

    assert_eq!(before.symbol, Some(first.symbol));
    assert_eq!(after.symbol, Some(second.symbol));

    let mut type_checker = TypeChecker::new(&mut types, &mut scopes);
    first.type_check(&mut type_checker);
    second.type_check(&mut type_checker);
    before.type_check(&mut type_checker);
    after.type_check(&mut type_checker);

    assert_eq!(before.get_type(), Some(i8_type));
    assert_eq!(after.get_type(), Some(i64_type));
}

#[test]
fn test_address_of_type() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let u8_type = types.lookup("u8").unwrap();
    let body = scopes.create_function_scope(scopes.global(), types.void_type());

    let mut decl = VarDeclStmt::new(&mut scopes, body, "byte", Some(u8_type), None, span());
    let mut address = AddressOfExpr::new(
        body,
        MK_NODE!(VariableExpr::new(&scopes, body, "byte", span())),
        span(),
    );

    let mut type_checker = TypeChecker::new(&mut types, &mut scopes);
    decl.type_check(&mut type_checker);
    address.type_check(&mut type_checker);

    assert_eq!(address.get_type(), type_checker.types.lookup("u8*"));
}

#[test]
fn test_function_declares_parameters() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let i32_type = types.lookup("i32").unwrap();
    let bool_type = types.bool_type();
    let global = scopes.global();

    let function = FnDeclStmt::new(
        &mut scopes,
        global,
        "pick",
        vec![
            (String::from("a"), i32_type, span()),
            (String::from("b"), bool_type, span()),
        ],
        i32_type,
        span(),
    );

    let a = scopes.resolve(function.body_scope, "a").unwrap();
    assert_eq!(scopes.symbol(a).ty, Some(i32_type));
    assert_eq!(scopes.resolve(global, "a"), None);
    assert_eq!(
        scopes.get_current_return_type(function.body_scope),
        Some(i32_type)
    );
    assert_eq!(function.params[1].symbol, scopes.resolve(function.body_scope, "b").unwrap());
}

#[test]
fn test_walk_is_pre_order() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let i32_type = types.lookup("i32").unwrap();
    let global = scopes.global();
    let mut function = FnDeclStmt::new(&mut scopes, global, "main", vec![], i32_type, span());
    let body = function.body_scope;
    let block = scopes.create_scope(body);

    function.push(MK_NODE!(BlockStmt::new(
        block,
        vec![MK_NODE!(ExpressionStmt::new(MK_NODE!(BooleanLiteral::new(
            block,
            true,
            span()
        ))))],
        span(),
    )));
    function.push(MK_NODE!(ReturnStmt::new(
        body,
        Some(MK_NODE!(IntegerLiteral::new(body, 0, i32_type, span()))),
        span(),
    )));

    let mut visited = vec![];
    walk(&function, 0, &mut |node, depth| {
        visited.push((node.get_node_type(), depth))
    });

    assert_eq!(
        visited,
        vec![
            (NodeType::FnDeclStmt, 0),
            (NodeType::BlockStmt, 1),
            (NodeType::ExpressionStmt, 2),
            (NodeType::BooleanLiteral, 3),
            (NodeType::ReturnStmt, 1),
            (NodeType::IntegerLiteral, 2),
        ]
    );
}

#[test]
fn test_dump_after_check() {
    let mut types = TypeRegistry::new();
    let mut scopes = Scopes::new();
    let i16_type = types.lookup("i16").unwrap();
    let i64_type = types.lookup("i64").unwrap();
    let body = scopes.create_function_scope(scopes.global(), types.void_type());

    let mut unit = vec![
        MK_NODE!(VarDeclStmt::new(
            &mut scopes,
            body,
            "small",
            Some(i16_type),
            None,
            span()
        )),
        MK_NODE!(VarDeclStmt::new(
            &mut scopes,
            body,
            "wide",
            Some(i64_type),
            Some(MK_NODE!(IntegerLiteral::new(body, 5, i16_type, span()))),
            span()
        )),
    ];

    let mut type_checker = TypeChecker::new(&mut types, &mut scopes);
    type_checker.check(&mut unit);

    assert_eq!(count_nodes(&unit), 4);
    insta::assert_snapshot!(dump(&unit, type_checker.types), @r"
    VarDeclStmt: i16
    VarDeclStmt: i64
      Cast: i64
        IntegerLiteral: i16
    ");
}
