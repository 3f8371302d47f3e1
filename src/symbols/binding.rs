//! Arena indices and the [`Binding`] an identifier resolves to.

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub usize);

        impl $name {
            pub fn index(&self) -> usize {
                self.0
            }
        }
    };
}

define_id!(ClassId);
define_id!(InterfaceId);
define_id!(FunctionId);
define_id!(VariableId);
define_id!(ScopeId);

/// The symbol table entry an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Class(ClassId),
    Interface(InterfaceId),
    Function(FunctionId),
    Variable(VariableId),
}

impl Binding {
    pub fn as_variable(&self) -> Option<VariableId> {
        match self {
            Binding::Variable(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<FunctionId> {
        match self {
            Binding::Function(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            Binding::Class(id) => Some(*id),
            _ => None,
        }
    }
}
