use std::collections::HashMap;

use super::binding::{ClassId, FunctionId, ScopeId, VariableId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    Class,
    Function,
    Block,
}

/// One level of lexical nesting. Parents are arena indices, so the tree
/// holds no back references.
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub class: Option<ClassId>,
    pub function: Option<FunctionId>,
    variables: HashMap<String, VariableId>,
}

impl Scope {
    pub fn new(id: ScopeId, kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Scope {
            id,
            kind,
            parent,
            class: None,
            function: None,
            variables: HashMap::new(),
        }
    }

    /// Inserts `name` unless it is already declared here, in which case the
    /// existing variable is returned as the error.
    pub fn declare(&mut self, name: &str, variable: VariableId) -> Result<(), VariableId> {
        if let Some(existing) = self.variables.get(name) {
            return Err(*existing);
        }

        self.variables.insert(name.to_string(), variable);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<VariableId> {
        self.variables.get(name).copied()
    }

    pub fn variables(&self) -> impl Iterator<Item = (&String, &VariableId)> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
