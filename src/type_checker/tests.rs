use crate::{
    ast::{
        ast::{Declaration, Program, Variable},
        expressions::{Expr, ExprKind},
        statements::StmtKind,
        types::Type,
    },
    parser::parser::parse_source,
    semantics::{
        analyze,
        context::{CompilationContext, Options},
        diagnostics::{Diagnostic, Severity},
    },
    symbols::binding::Binding,
    Position,
};

use super::type_checker::check_types;

fn check(source: &str) -> (Program, CompilationContext) {
    let mut program = parse_source(source).unwrap();
    let mut context = CompilationContext::new();
    analyze(&mut program, &mut context);
    (program, context)
}

fn errors(context: &mut CompilationContext) -> Vec<String> {
    context
        .sort_and_report()
        .iter()
        .filter(|d| d.is_error())
        .map(Diagnostic::message)
        .collect()
}

/// The local variables declared at the top of `main`, in order.
fn locals<'a>(program: &'a Program) -> Vec<&'a Variable> {
    program
        .functions()
        .find(|f| f.name.name == "main")
        .unwrap()
        .locals()
        .collect()
}

fn initializer<'a>(program: &'a Program, index: usize) -> &'a Expr {
    locals(program)[index].initializer.as_ref().unwrap()
}

#[test]
fn test_literal_and_operator_types() {
    let (program, mut context) = check(
        "fn main() {
    a: int = 1 + 2 * 3 % 4;
    b: bool = 1 < 2 && true || false;
    c: string = \"a\" + \"b\";
    d: bool = 1 >= 2;
}",
    );

    assert!(errors(&mut context).is_empty());
    assert_eq!(initializer(&program, 0).ty, Some(Type::Int));
    assert_eq!(initializer(&program, 1).ty, Some(Type::Boolean));
    assert_eq!(initializer(&program, 2).ty, Some(Type::String));
    assert_eq!(initializer(&program, 3).ty, Some(Type::Boolean));

    let ExprKind::Binary { left, right, .. } = &initializer(&program, 1).kind else {
        panic!("expected a binary expression");
    };
    assert_eq!(left.ty, Some(Type::Boolean));
    assert_eq!(right.ty, Some(Type::Boolean));
}

#[test]
fn test_type_checking_is_idempotent() {
    let mut program = parse_source(
        "class Node { next: Node; fn value(): int { ret 1; } fn link(): Node { ret next; } }
fn main() {
    n: Node = new Node();
    xs: int[] = [1, 2, 3];
    s: string = \"total \" + xs[0] + n.link().value();
    if (xs[1] == 2) { print(s); }
}",
    )
    .unwrap();
    let mut context = CompilationContext::new();
    let symbols = analyze(&mut program, &mut context);
    let first = program.clone();

    let mut again = CompilationContext::new();
    check_types(&mut program, &symbols, &mut again);

    assert_eq!(program, first);
    assert_eq!(again.diagnostics(), context.diagnostics());
    assert_eq!(again.warning_count(), 2);

    let errors = context.error_count();
    let warnings = context.warning_count();
    check_types(&mut program, &symbols, &mut context);
    assert_eq!(context.error_count(), errors);
    assert_eq!(context.warning_count(), warnings);
    assert_eq!(program, first);
}

#[test]
fn test_rechecking_keeps_deferred_call_errors_once() {
    let mut program = parse_source(
        "class N { fn f(): int { ret 1; } }
fn main() {
    n: N = new N();
    a: int = n.f().g();
}",
    )
    .unwrap();
    let mut context = CompilationContext::new();
    let symbols = analyze(&mut program, &mut context);
    let first = context.diagnostics().to_vec();
    assert_eq!(context.error_count(), 1);

    check_types(&mut program, &symbols, &mut context);

    assert_eq!(context.diagnostics(), first.as_slice());
    assert_eq!(context.error_count(), 1);
    assert_eq!(
        errors(&mut context),
        vec!["Cannot call g on a value of type int"]
    );
}

#[test]
fn test_call_argument_mismatch() {
    let (_, mut context) = check(
        "fn f(a: int, b: string) { }
fn main() {
    f(1);
    f(\"x\", \"y\");
    f(1, \"ok\");
}",
    );

    let diagnostics = context.sort_and_report().to_vec();
    assert_eq!(diagnostics.len(), 2);

    assert_eq!(
        diagnostics[0].message(),
        "Function f(a: int, b: string): void cannot be called with (int)"
    );
    assert_eq!(diagnostics[0].position, Position::new(3, 5));

    assert_eq!(
        diagnostics[1].message(),
        "Function f(a: int, b: string): void cannot be called with (string, string)"
    );
    assert_eq!(diagnostics[1].position, Position::new(4, 5));
}

#[test]
fn test_builtin_calls_are_checked() {
    let (_, mut context) = check("fn main() { print(1); n: int = random(1, 10); }");

    assert_eq!(
        errors(&mut context),
        vec!["Function print(value: string): void cannot be called with (int)"]
    );
}

#[test]
fn test_call_result_has_declared_return_type() {
    let (program, mut context) = check("fn one(): int { ret 1; } fn main() { s: string = one(); }");

    assert_eq!(
        errors(&mut context),
        vec!["Cannot initialize s of type string with int"]
    );
    assert_eq!(initializer(&program, 0).ty, Some(Type::Int));
}

#[test]
fn test_string_concatenation_warns() {
    let (program, mut context) = check(
        "fn main() {
    s: string = \"a\" + 1;
    t: string = \"a\" + \"b\";
    n: int = 1 + true;
}",
    );

    let diagnostics = context.sort_and_report().to_vec();
    assert_eq!(diagnostics.len(), 2);

    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(
        diagnostics[0].message(),
        "Implicit conversion to string in concatenation"
    );
    assert_eq!(diagnostics[0].position, Position::new(2, 21));

    assert_eq!(diagnostics[1].severity, Severity::Error);
    assert_eq!(
        diagnostics[1].message(),
        "Operator + cannot be applied to int and bool"
    );

    assert!(context.has_errors());
    assert_eq!(initializer(&program, 0).ty, Some(Type::String));
    assert_eq!(initializer(&program, 2).ty, Some(Type::Int));
}

#[test]
fn test_disabled_warnings() {
    let mut program = parse_source("fn main() { s: string = 1 + \"a\"; }").unwrap();
    let mut context = CompilationContext::with_options(Options {
        warnings_enabled: false,
    });

    analyze(&mut program, &mut context);

    assert!(context.diagnostics().is_empty());
}

#[test]
fn test_operand_errors() {
    let (_, mut context) = check(
        "fn main() {
    a: bool = \"a\" != 1;
    b: bool = 1 == 1;
    c: bool = true && 1;
    d: int = \"x\" - 1;
    e: bool = \"a\" < \"b\";
}",
    );

    assert_eq!(
        errors(&mut context),
        vec![
            "Operator != cannot be applied to string and int",
            "Operator && cannot be applied to bool and int",
            "Operator - cannot be applied to string and int",
            "Operator < cannot be applied to string and string",
        ]
    );
}

#[test]
fn test_conditions_must_be_boolean() {
    let (_, mut context) = check(
        "fn main() {
    if (1) { } else if (true) { }
    while (\"x\") { }
    for (i: int = 0; i; i++) { }
}",
    );

    assert_eq!(
        errors(&mut context),
        vec![
            "Condition must be boolean type but got int",
            "Condition must be boolean type but got string",
            "Condition must be boolean type but got int",
        ]
    );
}

#[test]
fn test_return_checks() {
    let (_, mut context) = check(
        "fn a(): int { ret \"x\"; }
fn b(): int { }
fn c() { ret 1; }
fn d(x: int): int { if (x < 0) { ret; } ret x; }
fn e() { if (true) { ret; } }",
    );

    assert_eq!(
        errors(&mut context),
        vec![
            "Function a must return int but returns string",
            "Function b must return a value of type int",
            "Function c is void but returns a value",
            "Function d must return a value of type int",
        ]
    );
}

#[test]
fn test_assignments_follow_inheritance() {
    let (_, mut context) = check(
        "class Animal { }
class Dog ext Animal { }
fn main() {
    a: Animal = new Dog();
    d: Dog = new Animal();
    a = new Dog();
    x: int = 0;
    x = \"s\";
}",
    );

    assert_eq!(
        errors(&mut context),
        vec![
            "Cannot initialize d of type Dog with Animal",
            "Cannot assign string to x of type int",
        ]
    );
}

#[test]
fn test_array_checks() {
    let (program, mut context) = check(
        "fn main() {
    xs: int[] = [1, 2];
    ys: int[] = [1, \"a\"];
    xs[0] = \"s\";
    xs[\"i\"] = 1;
    n: int = 5;
    n[0] = 1;
    z: int = n[0];
    e: int[] = [];
    k: int[] = new int[\"3\"];
    names: string[] = new string[2];
    first: string = names[0];
}",
    );

    assert_eq!(
        errors(&mut context),
        vec![
            "Array literal elements must all be int or all be string",
            "Cannot assign string to xs[] of type int",
            "Index expression must evaluate to be of Type int but got string",
            "Array expression must evaluate to an array type but got int",
            "Array expression must evaluate to an array type but got int",
            "Array length must be of type int but got string",
        ]
    );
    assert_eq!(initializer(&program, 4).ty, Some(Type::IntArray));
    assert_eq!(initializer(&program, 7).ty, Some(Type::String));
}

#[test]
fn test_increment_requires_int() {
    let (_, mut context) = check(
        "fn main() {
    s: string = \"a\";
    s++;
    b: bool = true;
    n: int = b++;
    i: int = 0;
    i++;
}",
    );

    assert_eq!(
        errors(&mut context),
        vec![
            "Operand of ++ must be of type int but got string",
            "Operand of ++ must be of type int but got bool",
        ]
    );
}

#[test]
fn test_property_initializers_are_checked() {
    let (_, mut context) = check("class C { p: int = \"x\"; q: string = \"y\"; }");

    assert_eq!(
        errors(&mut context),
        vec!["Cannot initialize p of type int with string"]
    );
}

#[test]
fn test_interface_implementation() {
    let (_, mut context) = check(
        "interface Named { fn name(): string; }
interface Shape ext Named { fn area(): int; }
class Square use Shape {
    fn area(): string { ret \"x\"; }
}
class Circle use Shape {
    fn area(): int { ret 3; }
    fn name(): string { ret \"circle\"; }
}",
    );

    assert_eq!(
        errors(&mut context),
        vec![
            "Class Square does not implement function name of interface Named",
            "Function area of class Square does not match its declaration in interface Shape",
        ]
    );
}

#[test]
fn test_inherited_method_satisfies_interface() {
    let (_, mut context) = check(
        "interface Named { fn name(): string; }
class Base { fn name(): string { ret \"base\"; } }
class Child ext Base use Named { }",
    );

    assert!(errors(&mut context).is_empty());
}

#[test]
fn test_deferred_receiver_calls() {
    let (program, mut context) = check(
        "class Node { fn next(): Node { ret new Node(); } fn value(): int { ret 1; } }
fn main() {
    n: Node = new Node();
    v: int = n.next().value();
    w: int = n.next().missing();
    x: int = 3;
    y: int = x.value();
}",
    );

    assert_eq!(
        errors(&mut context),
        vec![
            "Function missing not declared in Node",
            "Cannot call value on a value of type int",
        ]
    );

    let ExprKind::Call(call) = &initializer(&program, 1).kind else {
        panic!("expected a call");
    };
    assert!(matches!(call.name.binding, Some(Binding::Function(_))));
    assert_eq!(initializer(&program, 1).ty, Some(Type::Int));
}

#[test]
fn test_unresolved_names_do_not_cascade() {
    let (_, mut context) = check("fn main() { x: int = y + 1; z: int = missing(1) * 2; y.f(); }");

    assert_eq!(
        errors(&mut context),
        vec![
            "Variable y not declared",
            "Function missing not declared",
            "Variable y not declared",
        ]
    );
}

#[test]
fn test_unresolved_names_skip_checks_in_any_context() {
    let (program, mut context) = check(
        "class Shelf { }
fn takes(s: string, b: bool) { }
fn main() {
    s: string = y;
    if (y) { }
    t: string = missing();
    b: bool = y && true;
    u: string = y + \"!\";
    takes(y, true);
    w: Shelf = new Crate();
    xs: string[] = [y, \"a\"];
    s = y;
}",
    );

    assert_eq!(
        errors(&mut context),
        vec![
            "Variable y not declared",
            "Variable y not declared",
            "Function missing not declared",
            "Variable y not declared",
            "Variable y not declared",
            "Variable y not declared",
            "Crate not declared",
            "Variable y not declared",
            "Variable y not declared",
        ]
    );
    assert_eq!(initializer(&program, 0).ty, None);
    assert_eq!(initializer(&program, 1).ty, None);
    assert_eq!(initializer(&program, 2).ty, Some(Type::Boolean));
    assert_eq!(initializer(&program, 3).ty, Some(Type::String));
    assert_eq!(initializer(&program, 4).ty, None);
    assert_eq!(initializer(&program, 5).ty, None);
}

#[test]
fn test_duplicate_functions_are_checked_once() {
    let (program, mut context) = check("fn f(): int { ret 1; } fn f(): int { ret \"x\"; }");

    assert_eq!(errors(&mut context), vec!["Function f already defined"]);

    let Declaration::Function(second) = &program.declarations[1] else {
        panic!("expected a function");
    };
    assert_eq!(second.return_expr.as_ref().unwrap().ty, None);
}

#[test]
fn test_nested_statements_are_checked() {
    let (program, mut context) = check(
        "fn main() {
    total: int = 0;
    for (i: int = 0; i < 10; i++) {
        if (i % 2 == 0) { total = total + i; } else { total = \"odd\"; }
    }
}",
    );

    assert_eq!(
        errors(&mut context),
        vec!["Cannot assign string to total of type int"]
    );

    let body = &program.functions().next().unwrap().body;
    let StmtKind::For { condition, .. } = &body.statements[1].kind else {
        panic!("expected a for loop");
    };
    assert_eq!(condition.ty, Some(Type::Boolean));
}
