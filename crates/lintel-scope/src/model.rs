use lintel_syntax::{NodeId, NodeRef};
use rustc_hash::FxHashMap;

use crate::globals::Ambient;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(
    /// Index of a [`Scope`] in its [`ScopeManager`].
    ScopeId
);
arena_id!(
    /// Index of a [`Variable`] in its [`ScopeManager`].
    VariableId
);
arena_id!(
    /// Index of a [`Reference`] in its [`ScopeManager`].
    ReferenceId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    /// Created below the global scope when the file has `import`s.
    Module,
    Function,
    Block,
    /// The head of a `for` loop declaring `let`/`const` bindings.
    For,
    Catch,
    Class,
}

impl ScopeKind {
    /// Scopes receiving hoisted `var` declarations.
    pub fn is_function_like(self) -> bool {
        matches!(self, ScopeKind::Global | ScopeKind::Module | ScopeKind::Function)
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    /// The node creating this scope.
    pub node: NodeId,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Variables declared in this scope, in declaration order.
    pub variables: Vec<VariableId>,
    /// References occurring directly in this scope.
    pub references: Vec<ReferenceId>,
    /// References that could not be resolved in this scope.
    pub through: Vec<ReferenceId>,
    pub(crate) set: FxHashMap<String, VariableId>,
}

impl Scope {
    pub(crate) fn new(kind: ScopeKind, node: NodeId, parent: Option<ScopeId>) -> Self {
        Self {
            kind,
            node,
            parent,
            children: Vec::new(),
            variables: Vec::new(),
            references: Vec::new(),
            through: Vec::new(),
            set: FxHashMap::default(),
        }
    }

    /// The variable named `name` declared directly in this scope.
    pub fn get(&self, name: &str) -> Option<VariableId> {
        self.set.get(name).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Var,
    Let,
    Const,
    FunctionName,
    ClassName,
    Parameter,
    CatchClause,
    ImportBinding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Definition {
    pub kind: DefinitionKind,
    /// The identifier being declared.
    pub name: NodeId,
    /// The declaring node: declarator, function, class, catch clause,
    /// import specifier. Parameters point at their function.
    pub node: NodeId,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub scope: ScopeId,
    pub defs: Vec<Definition>,
    pub references: Vec<ReferenceId>,
    /// `Some` when the host environment provides the binding.
    pub ambient: Option<Ambient>,
}

impl Variable {
    pub fn is_ambient(&self) -> bool {
        self.ambient.is_some()
    }

    pub fn is_declared(&self) -> bool {
        !self.defs.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadWrite {
    Read,
    Write,
    ReadWrite,
}

impl ReadWrite {
    pub fn is_read(self) -> bool {
        matches!(self, ReadWrite::Read | ReadWrite::ReadWrite)
    }

    pub fn is_write(self) -> bool {
        matches!(self, ReadWrite::Write | ReadWrite::ReadWrite)
    }
}

#[derive(Debug, Clone)]
pub struct Reference {
    pub identifier: NodeId,
    pub name: String,
    /// The scope in which the identifier occurs.
    pub scope: ScopeId,
    pub flags: ReadWrite,
    /// Whether the write comes from a declaration initializer or a
    /// parameter default.
    pub init: bool,
    /// The declared or ambient variable this resolves to. Unresolved
    /// references are recorded on an implicit global instead.
    pub resolved: Option<VariableId>,
}

impl Reference {
    pub fn is_read(&self) -> bool {
        self.flags.is_read()
    }

    pub fn is_write(&self) -> bool {
        self.flags.is_write()
    }

    pub fn is_read_only(&self) -> bool {
        self.flags == ReadWrite::Read
    }

    pub fn is_write_only(&self) -> bool {
        self.flags == ReadWrite::Write
    }
}

/// The result of analyzing a tree: every scope, variable and reference.
#[derive(Debug, Clone)]
pub struct ScopeManager {
    pub(crate) scopes: Vec<Scope>,
    pub(crate) variables: Vec<Variable>,
    pub(crate) references: Vec<Reference>,
    pub(crate) acquired: FxHashMap<NodeId, ScopeId>,
    pub(crate) implicit: Vec<VariableId>,
}

impl ScopeManager {
    pub fn global_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    pub fn reference(&self, id: ReferenceId) -> &Reference {
        &self.references[id.index()]
    }

    pub fn scopes(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes.iter().enumerate().map(|(i, scope)| (ScopeId::from_index(i), scope))
    }

    /// Every declared or ambient variable of every scope. Implicit globals
    /// and bindings like `arguments` are left out.
    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.scopes
            .iter()
            .flat_map(|scope| scope.variables.iter())
            .map(|id| (*id, self.variable(*id)))
            .filter(|(_, variable)| variable.is_declared() || variable.is_ambient())
    }

    /// The scope created by `node`, if any.
    pub fn acquire(&self, node: NodeId) -> Option<ScopeId> {
        self.acquired.get(&node).copied()
    }

    /// The innermost scope containing `node`.
    pub fn scope_of(&self, node: NodeRef<'_>) -> ScopeId {
        std::iter::once(node)
            .chain(node.ancestors())
            .find_map(|n| self.acquire(n.id()))
            .unwrap_or(self.global_scope())
    }

    /// Walk outward from `scope` looking for a variable named `name`.
    pub fn find_variable(&self, scope: ScopeId, name: &str) -> Option<VariableId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(variable) = scope.get(name) {
                return Some(variable);
            }
            current = scope.parent;
        }
        None
    }

    /// References that neither a declaration nor an ambient binding resolve.
    pub fn through(&self) -> &[ReferenceId] {
        &self.scope(self.global_scope()).through
    }

    /// Variables created for unresolved identifiers, in order of first use.
    pub fn implicit_globals(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.implicit.iter().map(|id| (*id, self.variable(*id)))
    }

    /// The variable an identifier node declares or refers to.
    pub fn variable_of(&self, identifier: NodeId) -> Option<VariableId> {
        self.variables
            .iter()
            .position(|variable| {
                variable.defs.iter().any(|def| def.name == identifier)
                    || variable
                        .references
                        .iter()
                        .any(|reference| self.reference(*reference).identifier == identifier)
            })
            .map(VariableId::from_index)
    }
}
