use std::collections::HashMap;

use crate::{ast::types::Type, Position};

use super::{
    binding::{ClassId, FunctionId, InterfaceId, ScopeId},
    scope::ScopeKind,
    symbol_program::{
        FunctionOwner, Insertion, SymbolClass, SymbolFunction, SymbolInterface, SymbolProgram,
        SymbolVariable,
    },
};

fn variable(name: &str, ty: Type, scope: ScopeId) -> SymbolVariable {
    SymbolVariable {
        name: name.to_string(),
        ty,
        ordinal: 0,
        position: Position::null(),
        scope,
    }
}

fn class(program: &mut SymbolProgram, name: &str, parent: Option<&str>) -> ClassId {
    let scope = program.add_scope(ScopeKind::Class, program.root());
    program
        .add_class(SymbolClass {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            interfaces: vec![],
            functions: HashMap::new(),
            scope,
            ordinal: 0,
            position: Position::null(),
        })
        .id()
}

fn function(
    program: &mut SymbolProgram,
    name: &str,
    parameters: &[(&str, Type)],
    return_type: Type,
    parent: ScopeId,
    owner: FunctionOwner,
) -> Insertion<FunctionId> {
    let scope = program.add_scope(ScopeKind::Function, parent);
    let parameters = parameters
        .iter()
        .map(|(name, ty)| program.declare_variable(variable(name, ty.clone(), scope)).id())
        .collect();

    let class = match owner {
        FunctionOwner::Class(class) => Some(class),
        _ => None,
    };

    program.add_function(
        SymbolFunction {
            name: name.to_string(),
            parameters,
            return_type,
            ordinal: 0,
            position: Position::null(),
            class,
            scope: Some(scope),
            builtin: owner == FunctionOwner::Builtin,
        },
        owner,
    )
}

fn interface(program: &mut SymbolProgram, name: &str, extends: &[&str]) -> InterfaceId {
    program
        .add_interface(SymbolInterface {
            name: name.to_string(),
            extends: extends.iter().map(|s| s.to_string()).collect(),
            functions: vec![],
            ordinal: 0,
            position: Position::null(),
        })
        .id()
}

#[test]
fn test_duplicate_variable_keeps_first() {
    let mut program = SymbolProgram::new();
    let root = program.root();

    let first = program.declare_variable(variable("x", Type::Int, root));
    let second = program.declare_variable(variable("x", Type::String, root));

    assert!(!first.is_duplicate());
    assert!(second.is_duplicate());
    assert_eq!(program.lookup_variable(root, "x"), Some(first.id()));
    assert_eq!(program.variable(second.id()).ty, Type::String);
}

#[test]
fn test_lookup_walks_to_enclosing_scopes() {
    let mut program = SymbolProgram::new();
    let root = program.root();
    let outer = program.add_scope(ScopeKind::Function, root);
    let inner = program.add_scope(ScopeKind::Block, outer);

    let global = program.declare_variable(variable("g", Type::Int, root)).id();
    let shadowed = program.declare_variable(variable("x", Type::Int, outer)).id();
    let shadow = program.declare_variable(variable("x", Type::String, inner)).id();

    assert_eq!(program.lookup_variable(inner, "g"), Some(global));
    assert_eq!(program.lookup_variable(inner, "x"), Some(shadow));
    assert_eq!(program.lookup_variable(outer, "x"), Some(shadowed));
    assert_eq!(program.lookup_variable(root, "x"), None);
}

#[test]
fn test_nested_scopes_inherit_owner() {
    let mut program = SymbolProgram::new();
    let point = class(&mut program, "Point", None);
    let class_scope = program.class(point).scope;

    let method = function(
        &mut program,
        "norm",
        &[],
        Type::Int,
        class_scope,
        FunctionOwner::Class(point),
    )
    .id();

    let function_scope = program.function(method).scope.unwrap();
    let body = program.add_scope(ScopeKind::Block, function_scope);

    assert_eq!(program.scope(body).class, Some(point));
    assert_eq!(program.scope(body).function, Some(method));
    assert_eq!(program.scope(body).parent, Some(function_scope));
}

#[test]
fn test_inherited_properties_are_visible() {
    let mut program = SymbolProgram::new();
    let animal = class(&mut program, "Animal", None);
    let dog = class(&mut program, "Dog", Some("Animal"));

    let animal_scope = program.class(animal).scope;
    let name = program
        .declare_variable(variable("name", Type::String, animal_scope))
        .id();

    let dog_scope = program.class(dog).scope;
    let body = program.add_scope(ScopeKind::Block, dog_scope);

    assert_eq!(program.lookup_variable(body, "name"), Some(name));
    assert_eq!(program.ancestors(dog), vec![animal]);
}

#[test]
fn test_duplicate_class_is_not_reachable() {
    let mut program = SymbolProgram::new();
    let first = class(&mut program, "A", None);

    let scope = program.add_scope(ScopeKind::Class, program.root());
    let second = program.add_class(SymbolClass {
        name: "A".to_string(),
        parent: None,
        interfaces: vec![],
        functions: HashMap::new(),
        scope,
        ordinal: 1,
        position: Position::null(),
    });

    assert!(second.is_duplicate());
    assert_eq!(program.lookup_class("A"), Some(first));
    assert_eq!(program.scope(scope).class, Some(second.id()));
}

#[test]
fn test_inheritance_cycle_terminates() {
    let mut program = SymbolProgram::new();
    let a = class(&mut program, "A", Some("B"));
    let b = class(&mut program, "B", Some("A"));
    let c = class(&mut program, "C", Some("A"));

    assert!(program.has_inheritance_cycle(a));
    assert!(program.has_inheritance_cycle(b));
    assert!(!program.has_inheritance_cycle(c));
    assert_eq!(program.ancestors(c), vec![a, b]);
    assert_eq!(program.lookup_method(c, "missing"), None);
}

#[test]
fn test_function_lookup_order() {
    let mut program = SymbolProgram::new();
    let root = program.root();

    let builtin = function(
        &mut program,
        "print",
        &[("value", Type::String)],
        Type::Void,
        root,
        FunctionOwner::Builtin,
    )
    .id();
    let global = function(&mut program, "run", &[], Type::Void, root, FunctionOwner::Program).id();

    let shape = class(&mut program, "Shape", None);
    let shape_scope = program.class(shape).scope;
    let method = function(
        &mut program,
        "run",
        &[],
        Type::Int,
        shape_scope,
        FunctionOwner::Class(shape),
    )
    .id();

    let square = class(&mut program, "Square", Some("Shape"));

    assert_eq!(program.lookup_function("run", None), Some(global));
    assert_eq!(program.lookup_function("run", Some(square)), Some(method));
    assert_eq!(program.lookup_function("print", Some(square)), Some(builtin));
    assert_eq!(program.lookup_function("missing", Some(square)), None);
}

#[test]
fn test_duplicate_method_is_reported() {
    let mut program = SymbolProgram::new();
    let shape = class(&mut program, "Shape", None);
    let scope = program.class(shape).scope;

    let first = function(&mut program, "area", &[], Type::Int, scope, FunctionOwner::Class(shape));
    let second = function(&mut program, "area", &[], Type::Void, scope, FunctionOwner::Class(shape));

    assert!(!first.is_duplicate());
    assert!(second.is_duplicate());
    assert_eq!(program.lookup_method(shape, "area"), Some(first.id()));
}

#[test]
fn test_interface_closure_and_implementation() {
    let mut program = SymbolProgram::new();
    let root = program.root();

    let named = interface(&mut program, "Named", &[]);
    let pet = interface(&mut program, "Pet", &["Named", "Pet"]);
    let signature = function(
        &mut program,
        "name",
        &[],
        Type::String,
        root,
        FunctionOwner::Interface(named),
    )
    .id();

    let animal = class(&mut program, "Animal", None);
    let dog = class(&mut program, "Dog", Some("Animal"));

    let scope = program.add_scope(ScopeKind::Class, program.root());
    let cat = program
        .add_class(SymbolClass {
            name: "Cat".to_string(),
            parent: Some("Dog".to_string()),
            interfaces: vec!["Pet".to_string()],
            functions: HashMap::new(),
            scope,
            ordinal: 0,
            position: Position::null(),
        })
        .id();

    assert_eq!(program.ancestors(cat), vec![dog, animal]);
    assert_eq!(program.interface_closure(pet), vec![pet, named]);
    assert_eq!(program.lookup_interface_function(pet, "name"), Some(signature));
    assert!(program.class_implements(cat, named));
    assert!(!program.class_implements(dog, pet));
}

#[test]
fn test_assignability() {
    let mut program = SymbolProgram::new();
    interface(&mut program, "Named", &[]);

    let scope = program.add_scope(ScopeKind::Class, program.root());
    program.add_class(SymbolClass {
        name: "Animal".to_string(),
        parent: None,
        interfaces: vec!["Named".to_string()],
        functions: HashMap::new(),
        scope,
        ordinal: 0,
        position: Position::null(),
    });
    class(&mut program, "Dog", Some("Animal"));

    let ty = |name: &str| Type::Identifier(name.to_string());

    assert!(program.is_assignable(&Type::Int, &Type::Int));
    assert!(!program.is_assignable(&Type::Int, &Type::String));
    assert!(!program.is_assignable(&Type::IntArray, &Type::StringArray));
    assert!(program.is_assignable(&ty("Animal"), &ty("Dog")));
    assert!(!program.is_assignable(&ty("Dog"), &ty("Animal")));
    assert!(program.is_assignable(&ty("Named"), &ty("Dog")));
    assert!(!program.is_assignable(&ty("Named"), &Type::String));
}

#[test]
fn test_signature_and_function_type() {
    let mut program = SymbolProgram::new();
    let root = program.root();
    let id = function(
        &mut program,
        "f",
        &[("a", Type::Int), ("b", Type::String)],
        Type::Void,
        root,
        FunctionOwner::Program,
    )
    .id();

    assert_eq!(program.signature(id), "f(a: int, b: string): void");
    assert_eq!(
        program.function_type(id),
        Type::Function {
            parameters: vec![Type::Int, Type::String],
            return_type: Box::new(Type::Void),
        }
    );
}

#[test]
fn test_dump_scopes() {
    let mut program = SymbolProgram::new();
    let root = program.root();
    program.declare_variable(variable("y", Type::Boolean, root));
    program.declare_variable(variable("x", Type::Int, root));

    let block = program.add_scope(ScopeKind::Function, root);
    program.declare_variable(variable("s", Type::StringArray, block));
    program.add_scope(ScopeKind::Block, block);

    assert_eq!(
        program.dump_scopes(),
        "Program #0 [x: int, y: bool]\n  Function #1 [s: string[]]\n    Block #2 []\n"
    );
}
