use std::{
    collections::{HashMap, HashSet},
    fmt::Write,
};

use crate::{ast::types::Type, Position};

use super::{
    binding::{ClassId, FunctionId, InterfaceId, ScopeId, VariableId},
    scope::{Scope, ScopeKind},
};

#[derive(Debug, Clone)]
pub struct SymbolVariable {
    pub name: String,
    pub ty: Type,
    pub ordinal: usize,
    pub position: Position,
    pub scope: ScopeId,
}

#[derive(Debug, Clone)]
pub struct SymbolFunction {
    pub name: String,
    /// Parameters in declaration order; calls match them positionally.
    pub parameters: Vec<VariableId>,
    pub return_type: Type,
    pub ordinal: usize,
    pub position: Position,
    pub class: Option<ClassId>,
    pub scope: Option<ScopeId>,
    pub builtin: bool,
}

#[derive(Debug, Clone)]
pub struct SymbolClass {
    pub name: String,
    pub parent: Option<String>,
    pub interfaces: Vec<String>,
    pub functions: HashMap<String, FunctionId>,
    /// Holds the properties.
    pub scope: ScopeId,
    pub ordinal: usize,
    pub position: Position,
}

impl SymbolClass {
    pub fn ty(&self) -> Type {
        Type::Identifier(self.name.clone())
    }
}

#[derive(Debug, Clone)]
pub struct SymbolInterface {
    pub name: String,
    pub extends: Vec<String>,
    pub functions: Vec<FunctionId>,
    pub ordinal: usize,
    pub position: Position,
}

impl SymbolInterface {
    pub fn ty(&self) -> Type {
        Type::Identifier(self.name.clone())
    }
}

/// Outcome of adding a named symbol to a table.
///
/// A duplicate is still allocated so its members have somewhere to live,
/// but it is not reachable by name; the first declaration stays live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion<T> {
    Inserted(T),
    Duplicate(T),
}

impl<T: Copy> Insertion<T> {
    pub fn id(&self) -> T {
        match self {
            Insertion::Inserted(id) | Insertion::Duplicate(id) => *id,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Insertion::Duplicate(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionOwner {
    Program,
    Builtin,
    Class(ClassId),
    Interface(InterfaceId),
}

/// Every symbol of one compilation unit, stored in index arenas.
#[derive(Debug, Clone)]
pub struct SymbolProgram {
    classes: Vec<SymbolClass>,
    interfaces: Vec<SymbolInterface>,
    functions: Vec<SymbolFunction>,
    variables: Vec<SymbolVariable>,
    scopes: Vec<Scope>,

    class_lookup: HashMap<String, ClassId>,
    interface_lookup: HashMap<String, InterfaceId>,
    function_lookup: HashMap<String, FunctionId>,
    builtin_lookup: HashMap<String, FunctionId>,
}

impl Default for SymbolProgram {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolProgram {
    pub fn new() -> Self {
        SymbolProgram {
            classes: vec![],
            interfaces: vec![],
            functions: vec![],
            variables: vec![],
            scopes: vec![Scope::new(ScopeId(0), ScopeKind::Program, None)],
            class_lookup: HashMap::new(),
            interface_lookup: HashMap::new(),
            function_lookup: HashMap::new(),
            builtin_lookup: HashMap::new(),
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn class(&self, id: ClassId) -> &SymbolClass {
        &self.classes[id.0]
    }

    pub fn interface(&self, id: InterfaceId) -> &SymbolInterface {
        &self.interfaces[id.0]
    }

    pub fn function(&self, id: FunctionId) -> &SymbolFunction {
        &self.functions[id.0]
    }

    pub fn variable(&self, id: VariableId) -> &SymbolVariable {
        &self.variables[id.0]
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &SymbolClass)> {
        self.classes.iter().enumerate().map(|(i, c)| (ClassId(i), c))
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn add_scope(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        let mut scope = Scope::new(id, kind, Some(parent));
        scope.class = self.scopes[parent.0].class;
        scope.function = self.scopes[parent.0].function;
        self.scopes.push(scope);
        id
    }

    pub fn declare_variable(&mut self, variable: SymbolVariable) -> Insertion<VariableId> {
        let id = VariableId(self.variables.len());
        let scope = variable.scope;
        let inserted = self.scopes[scope.0].declare(&variable.name, id).is_ok();
        self.variables.push(variable);

        if inserted {
            Insertion::Inserted(id)
        } else {
            Insertion::Duplicate(id)
        }
    }

    pub fn add_class(&mut self, class: SymbolClass) -> Insertion<ClassId> {
        let id = ClassId(self.classes.len());
        let name = class.name.clone();
        let scope = class.scope;
        self.classes.push(class);
        self.scopes[scope.0].class = Some(id);

        if self.class_lookup.contains_key(&name) {
            Insertion::Duplicate(id)
        } else {
            self.class_lookup.insert(name, id);
            Insertion::Inserted(id)
        }
    }

    pub fn add_interface(&mut self, interface: SymbolInterface) -> Insertion<InterfaceId> {
        let id = InterfaceId(self.interfaces.len());
        let name = interface.name.clone();
        self.interfaces.push(interface);

        if self.interface_lookup.contains_key(&name) {
            Insertion::Duplicate(id)
        } else {
            self.interface_lookup.insert(name, id);
            Insertion::Inserted(id)
        }
    }

    pub fn add_function(
        &mut self,
        function: SymbolFunction,
        owner: FunctionOwner,
    ) -> Insertion<FunctionId> {
        let id = FunctionId(self.functions.len());
        let name = function.name.clone();
        self.functions.push(function);

        if let Some(scope) = self.functions[id.0].scope {
            self.scopes[scope.0].function = Some(id);
        }

        let inserted = match owner {
            FunctionOwner::Program => insert_new(&mut self.function_lookup, name, id),
            FunctionOwner::Builtin => insert_new(&mut self.builtin_lookup, name, id),
            FunctionOwner::Class(class) => {
                insert_new(&mut self.classes[class.0].functions, name, id)
            }
            FunctionOwner::Interface(interface) => {
                let exists = self.interfaces[interface.0]
                    .functions
                    .iter()
                    .any(|f| self.functions[f.0].name == name);
                if !exists {
                    self.interfaces[interface.0].functions.push(id);
                }
                !exists
            }
        };

        if inserted {
            Insertion::Inserted(id)
        } else {
            Insertion::Duplicate(id)
        }
    }

    pub fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.class_lookup.get(name).copied()
    }

    pub fn lookup_interface(&self, name: &str) -> Option<InterfaceId> {
        self.interface_lookup.get(name).copied()
    }

    pub fn lookup_program_function(&self, name: &str) -> Option<FunctionId> {
        self.function_lookup.get(name).copied()
    }

    pub fn lookup_builtin(&self, name: &str) -> Option<FunctionId> {
        self.builtin_lookup.get(name).copied()
    }

    /// Walks the scope chain outward from `scope`. A class scope also
    /// searches the property scopes of its ancestors before moving on.
    pub fn lookup_variable(&self, scope: ScopeId, name: &str) -> Option<VariableId> {
        let mut current = Some(scope);

        while let Some(id) = current {
            let scope = &self.scopes[id.0];

            if let Some(variable) = scope.get(name) {
                return Some(variable);
            }

            if scope.kind == ScopeKind::Class {
                if let Some(class) = scope.class {
                    let inherited = self
                        .ancestors(class)
                        .into_iter()
                        .find_map(|ancestor| self.scope(self.class(ancestor).scope).get(name));
                    if inherited.is_some() {
                        return inherited;
                    }
                }
            }

            current = scope.parent;
        }

        None
    }

    /// Parent, grandparent and so on. Stops at an undeclared parent or when
    /// the chain loops back on itself.
    pub fn ancestors(&self, class: ClassId) -> Vec<ClassId> {
        let mut visited = HashSet::from([class]);
        let mut result = vec![];
        let mut current = class;

        while let Some(parent) = self
            .class(current)
            .parent
            .as_deref()
            .and_then(|name| self.lookup_class(name))
        {
            if !visited.insert(parent) {
                break;
            }
            result.push(parent);
            current = parent;
        }

        result
    }

    pub fn has_inheritance_cycle(&self, class: ClassId) -> bool {
        let mut visited = HashSet::from([class]);
        let mut current = class;

        while let Some(parent) = self
            .class(current)
            .parent
            .as_deref()
            .and_then(|name| self.lookup_class(name))
        {
            if parent == class {
                return true;
            }
            if !visited.insert(parent) {
                return false;
            }
            current = parent;
        }

        false
    }

    pub fn lookup_method(&self, class: ClassId, name: &str) -> Option<FunctionId> {
        std::iter::once(class)
            .chain(self.ancestors(class))
            .find_map(|c| self.class(c).functions.get(name).copied())
    }

    /// Resolves a call without a receiver: the class chain first, then
    /// program functions, then built-ins.
    pub fn lookup_function(&self, name: &str, class: Option<ClassId>) -> Option<FunctionId> {
        class
            .and_then(|class| self.lookup_method(class, name))
            .or_else(|| self.lookup_program_function(name))
            .or_else(|| self.lookup_builtin(name))
    }

    /// The interface and every interface it extends, without repeats.
    pub fn interface_closure(&self, interface: InterfaceId) -> Vec<InterfaceId> {
        let mut result = vec![interface];
        let mut next = 0;

        while next < result.len() {
            let current = result[next];
            next += 1;

            for parent in &self.interface(current).extends {
                if let Some(parent) = self.lookup_interface(parent) {
                    if !result.contains(&parent) {
                        result.push(parent);
                    }
                }
            }
        }

        result
    }

    pub fn lookup_interface_function(
        &self,
        interface: InterfaceId,
        name: &str,
    ) -> Option<FunctionId> {
        self.interface_closure(interface)
            .into_iter()
            .flat_map(|i| self.interface(i).functions.iter().copied())
            .find(|f| self.function(*f).name == name)
    }

    pub fn class_implements(&self, class: ClassId, interface: InterfaceId) -> bool {
        std::iter::once(class)
            .chain(self.ancestors(class))
            .flat_map(|c| self.class(c).interfaces.iter())
            .filter_map(|name| self.lookup_interface(name))
            .any(|used| self.interface_closure(used).contains(&interface))
    }

    /// Whether a value of type `actual` may be stored where `expected` is
    /// declared. Types must match exactly, except that a class value fits a
    /// slot typed as one of its ancestors or implemented interfaces.
    pub fn is_assignable(&self, expected: &Type, actual: &Type) -> bool {
        if expected == actual {
            return true;
        }

        let (Type::Identifier(expected), Type::Identifier(actual)) = (expected, actual) else {
            return false;
        };

        let Some(actual) = self.lookup_class(actual) else {
            return false;
        };

        if let Some(expected) = self.lookup_class(expected) {
            return self.ancestors(actual).contains(&expected);
        }

        match self.lookup_interface(expected) {
            Some(expected) => self.class_implements(actual, expected),
            None => false,
        }
    }

    pub fn function_type(&self, id: FunctionId) -> Type {
        let function = self.function(id);
        Type::Function {
            parameters: function
                .parameters
                .iter()
                .map(|p| self.variable(*p).ty.clone())
                .collect(),
            return_type: Box::new(function.return_type.clone()),
        }
    }

    /// Human readable signature, e.g. `f(a: int, b: string): void`.
    pub fn signature(&self, id: FunctionId) -> String {
        let function = self.function(id);
        let parameters = function
            .parameters
            .iter()
            .map(|p| {
                let variable = self.variable(*p);
                format!("{}: {}", variable.name, variable.ty)
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!("{}({}): {}", function.name, parameters, function.return_type)
    }

    /// Renders the scope tree, one scope per line, children indented.
    pub fn dump_scopes(&self) -> String {
        let mut children: HashMap<ScopeId, Vec<ScopeId>> = HashMap::new();
        for scope in &self.scopes {
            if let Some(parent) = scope.parent {
                children.entry(parent).or_default().push(scope.id);
            }
        }

        let mut out = String::new();
        let mut stack = vec![(self.root(), 0usize)];

        while let Some((id, depth)) = stack.pop() {
            let scope = self.scope(id);
            let mut names: Vec<String> = scope
                .variables()
                .map(|(name, v)| format!("{}: {}", name, self.variable(*v).ty))
                .collect();
            names.sort();

            let _ = writeln!(
                out,
                "{}{:?} #{} [{}]",
                "  ".repeat(depth),
                scope.kind,
                id.0,
                names.join(", ")
            );

            if let Some(nested) = children.get(&id) {
                for child in nested.iter().rev() {
                    stack.push((*child, depth + 1));
                }
            }
        }

        out
    }
}

fn insert_new<K, V>(map: &mut HashMap<K, V>, key: K, value: V) -> bool
where
    K: std::hash::Hash + Eq,
{
    if map.contains_key(&key) {
        false
    } else {
        map.insert(key, value);
        true
    }
}
