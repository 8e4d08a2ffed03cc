use lintel_syntax::{DeclarationKind, Field, NodeKind, NodeRef, Tree};
use rustc_hash::FxHashMap;

use crate::globals::{Ambient, Globals};
use crate::model::{
    Definition, DefinitionKind, ReadWrite, Reference, ReferenceId, Scope, ScopeId, ScopeKind,
    ScopeManager, Variable, VariableId,
};

/// Build the scope tree of `tree` in a single traversal.
///
/// `globals` are declared in the outermost scope before anything else, so
/// that identifiers matching them resolve to ambient variables.
pub fn analyze(tree: &Tree, globals: &Globals) -> ScopeManager {
    let mut analyzer = Analyzer {
        manager: ScopeManager {
            scopes: Vec::new(),
            variables: Vec::new(),
            references: Vec::new(),
            acquired: FxHashMap::default(),
            implicit: Vec::new(),
        },
        stack: Vec::new(),
        implicit_by_name: FxHashMap::default(),
    };
    analyzer.program(tree.root(), globals);
    tracing::trace!(
        scopes = analyzer.manager.scopes.len(),
        variables = analyzer.manager.variables.len(),
        references = analyzer.manager.references.len(),
        "Scope analysis finished"
    );
    analyzer.manager
}

struct Analyzer {
    manager: ScopeManager,
    /// Open scopes, innermost last.
    stack: Vec<ScopeId>,
    implicit_by_name: FxHashMap<String, VariableId>,
}

impl Analyzer {
    // Scope bookkeeping ----------------------------------------------------

    fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(self.manager.global_scope())
    }

    fn open(&mut self, kind: ScopeKind, node: NodeRef<'_>) -> ScopeId {
        let parent = self.stack.last().copied();
        let id = ScopeId::from_index(self.manager.scopes.len());
        self.manager.scopes.push(Scope::new(kind, node.id(), parent));
        if let Some(parent) = parent {
            self.manager.scopes[parent.index()].children.push(id);
        }
        self.manager.acquired.insert(node.id(), id);
        self.stack.push(id);
        id
    }

    /// Resolve the references left in the innermost scope against its own
    /// variables and hand the rest to the parent.
    fn close(&mut self) {
        let Some(id) = self.stack.pop() else {
            return;
        };
        let pending = std::mem::take(&mut self.manager.scopes[id.index()].through);
        let mut unresolved = Vec::new();
        for reference in pending {
            let name = &self.manager.references[reference.index()].name;
            match self.manager.scopes[id.index()].get(name) {
                Some(variable) => self.resolve(reference, variable),
                None => unresolved.push(reference),
            }
        }

        match self.stack.last() {
            Some(parent) => self.manager.scopes[parent.index()].through.extend(unresolved),
            None => {
                for reference in &unresolved {
                    self.add_implicit(*reference);
                }
                self.manager.scopes[id.index()].through = unresolved;
            }
        }
    }

    fn resolve(&mut self, reference: ReferenceId, variable: VariableId) {
        self.manager.references[reference.index()].resolved = Some(variable);
        self.manager.variables[variable.index()].references.push(reference);
    }

    fn add_implicit(&mut self, reference: ReferenceId) {
        let name = self.manager.references[reference.index()].name.clone();
        let variable = match self.implicit_by_name.get(&name).copied() {
            Some(variable) => variable,
            None => {
                let id = self.new_variable(name.clone(), self.manager.global_scope(), None);
                self.manager.implicit.push(id);
                self.implicit_by_name.insert(name, id);
                id
            }
        };
        self.manager.variables[variable.index()].references.push(reference);
    }

    fn new_variable(
        &mut self,
        name: String,
        scope: ScopeId,
        ambient: Option<Ambient>,
    ) -> VariableId {
        let id = VariableId::from_index(self.manager.variables.len());
        self.manager.variables.push(Variable {
            name,
            scope,
            defs: Vec::new(),
            references: Vec::new(),
            ambient,
        });
        id
    }

    /// A binding the language creates without a declaration, like the
    /// `arguments` of a function.
    fn declare_implicit(&mut self, scope: ScopeId, name: &str) {
        let variable = self.new_variable(name.to_string(), scope, None);
        let scope = &mut self.manager.scopes[scope.index()];
        scope.set.insert(name.to_string(), variable);
        scope.variables.push(variable);
    }

    /// Declare `name` in `scope`, augmenting an existing variable of the same
    /// name (redeclaration, or shadowing of an ambient binding).
    fn declare(
        &mut self,
        scope: ScopeId,
        name: NodeRef<'_>,
        kind: DefinitionKind,
        node: NodeRef<'_>,
    ) {
        let Some(text) = name.name() else {
            return;
        };
        let variable = match self.manager.scopes[scope.index()].get(text) {
            Some(variable) => variable,
            None => {
                let variable = self.new_variable(text.to_string(), scope, None);
                let scope = &mut self.manager.scopes[scope.index()];
                scope.set.insert(text.to_string(), variable);
                scope.variables.push(variable);
                variable
            }
        };
        self.manager.variables[variable.index()].defs.push(Definition {
            kind,
            name: name.id(),
            node: node.id(),
        });
    }

    fn reference(&mut self, identifier: NodeRef<'_>, flags: ReadWrite, init: bool) {
        let Some(name) = identifier.name() else {
            return;
        };
        let scope = self.current();
        let id = ReferenceId::from_index(self.manager.references.len());
        self.manager.references.push(Reference {
            identifier: identifier.id(),
            name: name.to_string(),
            scope,
            flags,
            init,
            resolved: None,
        });
        let scope = &mut self.manager.scopes[scope.index()];
        scope.references.push(id);
        scope.through.push(id);
    }

    /// The nearest scope receiving `var` declarations.
    fn function_scope(&self) -> ScopeId {
        self.stack
            .iter()
            .rev()
            .copied()
            .find(|id| self.manager.scopes[id.index()].kind.is_function_like())
            .unwrap_or(self.manager.global_scope())
    }

    // Traversal ------------------------------------------------------------

    fn program(&mut self, root: NodeRef<'_>, globals: &Globals) {
        let global = self.open(ScopeKind::Global, root);
        for (name, ambient) in globals.iter() {
            let variable = self.new_variable(name.to_string(), global, Some(ambient));
            let scope = &mut self.manager.scopes[global.index()];
            scope.set.insert(name.to_string(), variable);
            scope.variables.push(variable);
        }

        let is_module = root.fields(Field::Body).any(|s| s.kind() == NodeKind::ImportDeclaration);
        if is_module {
            // The program node resolves to the module scope from here on.
            self.open(ScopeKind::Module, root);
        }

        for statement in root.children() {
            self.visit(statement);
        }

        if is_module {
            self.close();
        }
        self.close();
    }

    fn visit(&mut self, node: NodeRef<'_>) {
        match node.kind() {
            NodeKind::Identifier => self.reference(node, ReadWrite::Read, false),
            NodeKind::VariableDeclaration => self.variable_declaration(node, false),
            NodeKind::FunctionDeclaration => {
                if let Some(id) = node.field(Field::Id) {
                    let scope = self.current();
                    self.declare(scope, id, DefinitionKind::FunctionName, node);
                }
                self.function(node);
            }
            NodeKind::FunctionExpression | NodeKind::ArrowFunctionExpression => self.function(node),
            NodeKind::ClassDeclaration => {
                if let Some(id) = node.field(Field::Id) {
                    let scope = self.current();
                    self.declare(scope, id, DefinitionKind::ClassName, node);
                }
                self.class(node);
            }
            NodeKind::ClassExpression => self.class(node),
            NodeKind::MethodDefinition => {
                self.property_key(node);
                if let Some(value) = node.field(Field::Value) {
                    self.visit(value);
                }
            }
            NodeKind::BlockStatement => {
                self.open(ScopeKind::Block, node);
                for statement in node.children() {
                    self.visit(statement);
                }
                self.close();
            }
            NodeKind::ForStatement => self.for_statement(node),
            NodeKind::ForInStatement | NodeKind::ForOfStatement => self.for_in_of(node),
            NodeKind::CatchClause => {
                self.open(ScopeKind::Catch, node);
                if let Some(param) = node.field(Field::Param) {
                    let scope = self.current();
                    self.declare_pattern(scope, param, DefinitionKind::CatchClause, node);
                    self.pattern_defaults(param);
                }
                if let Some(body) = node.field(Field::Body) {
                    self.visit(body);
                }
                self.close();
            }
            NodeKind::ImportDeclaration => {
                let scope = self.current();
                for specifier in node.fields(Field::Specifiers) {
                    if let Some(local) = specifier.field(Field::Local) {
                        self.declare(scope, local, DefinitionKind::ImportBinding, specifier);
                    }
                }
            }
            NodeKind::AssignmentExpression => self.assignment(node),
            NodeKind::UpdateExpression => match node.field(Field::Argument) {
                Some(argument) if argument.kind() == NodeKind::Identifier => {
                    self.reference(argument, ReadWrite::ReadWrite, false);
                }
                Some(argument) => self.visit(argument),
                None => {}
            },
            NodeKind::MemberExpression => {
                if let Some(object) = node.field(Field::Object) {
                    self.visit(object);
                }
                if node.detail().is_computed()
                    && let Some(property) = node.field(Field::Property)
                {
                    self.visit(property);
                }
            }
            NodeKind::Property => {
                self.property_key(node);
                if let Some(value) = node.field(Field::Value) {
                    self.visit(value);
                }
            }
            _ => {
                for child in node.children() {
                    self.visit(child);
                }
            }
        }
    }

    /// Visit the key of a property or method only when it is computed.
    fn property_key(&mut self, node: NodeRef<'_>) {
        if node.detail().is_computed()
            && let Some(key) = node.field(Field::Key)
        {
            self.visit(key);
        }
    }

    fn variable_declaration(&mut self, node: NodeRef<'_>, in_for_in_of: bool) {
        let Some(kind) = node.detail().declaration_kind() else {
            return;
        };
        let (scope, definition) = match kind {
            DeclarationKind::Var => (self.function_scope(), DefinitionKind::Var),
            DeclarationKind::Let => (self.current(), DefinitionKind::Let),
            DeclarationKind::Const => (self.current(), DefinitionKind::Const),
        };
        for declarator in node.fields(Field::Declarations) {
            let Some(id) = declarator.field(Field::Id) else {
                continue;
            };
            self.declare_pattern(scope, id, definition, declarator);
            let init = declarator.field(Field::Init);
            if init.is_some() || in_for_in_of {
                for identifier in pattern_identifiers(id) {
                    self.reference(identifier, ReadWrite::Write, true);
                }
            }
            self.pattern_defaults(id);
            if let Some(init) = init {
                self.visit(init);
            }
        }
    }

    fn declare_pattern(
        &mut self,
        scope: ScopeId,
        pattern: NodeRef<'_>,
        kind: DefinitionKind,
        node: NodeRef<'_>,
    ) {
        for identifier in pattern_identifiers(pattern) {
            self.declare(scope, identifier, kind, node);
        }
    }

    /// Visit the expressions nested in a pattern: default values, computed
    /// keys and member expression targets.
    fn pattern_defaults(&mut self, pattern: NodeRef<'_>) {
        match pattern.kind() {
            NodeKind::AssignmentPattern => {
                if let Some(left) = pattern.field(Field::Left) {
                    self.pattern_defaults(left);
                }
                if let Some(right) = pattern.field(Field::Right) {
                    self.visit(right);
                }
            }
            NodeKind::ArrayPattern => {
                for element in pattern.children() {
                    self.pattern_defaults(element);
                }
            }
            NodeKind::ObjectPattern => {
                for property in pattern.children() {
                    self.property_key(property);
                    if let Some(value) = property.field(Field::Value) {
                        self.pattern_defaults(value);
                    }
                }
            }
            NodeKind::MemberExpression => self.visit(pattern),
            _ => {}
        }
    }

    fn function(&mut self, node: NodeRef<'_>) {
        let scope = self.open(ScopeKind::Function, node);
        if node.kind() != NodeKind::ArrowFunctionExpression {
            self.declare_implicit(scope, "arguments");
        }
        if node.kind() == NodeKind::FunctionExpression
            && let Some(id) = node.field(Field::Id)
        {
            self.declare(scope, id, DefinitionKind::FunctionName, node);
        }

        for param in node.fields(Field::Params) {
            self.declare_pattern(scope, param, DefinitionKind::Parameter, node);
            if param.kind() == NodeKind::AssignmentPattern
                && let Some(left) = param.field(Field::Left)
            {
                for identifier in pattern_identifiers(left) {
                    self.reference(identifier, ReadWrite::Write, true);
                }
            }
            self.pattern_defaults(param);
        }

        if let Some(body) = node.field(Field::Body) {
            if body.kind() == NodeKind::BlockStatement {
                // The function scope doubles as the scope of its body.
                for statement in body.children() {
                    self.visit(statement);
                }
            } else {
                self.visit(body);
            }
        }
        self.close();
    }

    fn class(&mut self, node: NodeRef<'_>) {
        let scope = self.open(ScopeKind::Class, node);
        // The class body sees its own name, also for declarations which bind
        // it in the enclosing scope as well.
        if let Some(id) = node.field(Field::Id) {
            self.declare(scope, id, DefinitionKind::ClassName, node);
        }
        if let Some(super_class) = node.field(Field::SuperClass) {
            self.visit(super_class);
        }
        if let Some(body) = node.field(Field::Body) {
            for member in body.children() {
                self.visit(member);
            }
        }
        self.close();
    }

    fn for_statement(&mut self, node: NodeRef<'_>) {
        let lexical = node
            .field(Field::Init)
            .is_some_and(is_lexical_declaration);
        if lexical {
            self.open(ScopeKind::For, node);
        }
        for child in node.children() {
            self.visit(child);
        }
        if lexical {
            self.close();
        }
    }

    fn for_in_of(&mut self, node: NodeRef<'_>) {
        let Some(left) = node.field(Field::Left) else {
            return;
        };
        let lexical = is_lexical_declaration(left);
        if lexical {
            self.open(ScopeKind::For, node);
        }
        if left.kind() == NodeKind::VariableDeclaration {
            self.variable_declaration(left, true);
        } else {
            self.assignment_target(left);
        }
        if let Some(right) = node.field(Field::Right) {
            self.visit(right);
        }
        if let Some(body) = node.field(Field::Body) {
            self.visit(body);
        }
        if lexical {
            self.close();
        }
    }

    fn assignment(&mut self, node: NodeRef<'_>) {
        let Some(left) = node.field(Field::Left) else {
            return;
        };
        if node.detail().operator() == Some("=") {
            self.assignment_target(left);
        } else if left.kind() == NodeKind::Identifier {
            self.reference(left, ReadWrite::ReadWrite, false);
        } else {
            self.visit(left);
        }
        if let Some(right) = node.field(Field::Right) {
            self.visit(right);
        }
    }

    /// A plain assignment target: identifiers are written, anything else
    /// nested in the pattern is evaluated.
    fn assignment_target(&mut self, pattern: NodeRef<'_>) {
        for identifier in pattern_identifiers(pattern) {
            self.reference(identifier, ReadWrite::Write, false);
        }
        self.pattern_defaults(pattern);
    }
}

fn is_lexical_declaration(node: NodeRef<'_>) -> bool {
    matches!(
        node.detail().declaration_kind(),
        Some(DeclarationKind::Let | DeclarationKind::Const)
    )
}

/// The identifiers bound by a pattern, in source order. Member expressions
/// in assignment patterns bind nothing.
pub fn pattern_identifiers(pattern: NodeRef<'_>) -> Vec<NodeRef<'_>> {
    let mut identifiers = Vec::new();
    collect_pattern_identifiers(pattern, &mut identifiers);
    identifiers
}

fn collect_pattern_identifiers<'t>(pattern: NodeRef<'t>, out: &mut Vec<NodeRef<'t>>) {
    match pattern.kind() {
        NodeKind::Identifier => out.push(pattern),
        NodeKind::AssignmentPattern => {
            if let Some(left) = pattern.field(Field::Left) {
                collect_pattern_identifiers(left, out);
            }
        }
        NodeKind::ArrayPattern => {
            for element in pattern.children() {
                collect_pattern_identifiers(element, out);
            }
        }
        NodeKind::ObjectPattern => {
            for property in pattern.children() {
                if let Some(value) = property.field(Field::Value) {
                    collect_pattern_identifiers(value, out);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_source(source: &str) -> (Tree, ScopeManager) {
        let tree = Tree::parse(source).unwrap();
        let manager = analyze(&tree, &Globals::builtin());
        (tree, manager)
    }

    fn find(manager: &ScopeManager, name: &str) -> Vec<VariableId> {
        manager
            .variables()
            .filter(|(_, v)| v.name == name)
            .map(|(id, _)| id)
            .collect()
    }

    #[test]
    fn test_assignment_to_undeclared_is_implicit_global() {
        let (_tree, manager) = analyze_source("foo = 1");
        let implicit: Vec<_> = manager.implicit_globals().collect();
        assert_eq!(implicit.len(), 1);
        let (_, foo) = implicit[0];
        assert_eq!(foo.name, "foo");
        assert!(foo.defs.is_empty());
        assert!(foo.ambient.is_none());
        assert_eq!(foo.references.len(), 1);
        let reference = manager.reference(foo.references[0]);
        assert!(reference.is_write_only());
        assert_eq!(reference.resolved, None);
        assert_eq!(manager.through(), foo.references.as_slice());
        assert!(find(&manager, "foo").is_empty());
    }

    #[test]
    fn test_outer_variable_resolves_from_inner_scope() {
        let (_tree, manager) = analyze_source("let x = 1;\nfunction f() { return x; }");
        let x = find(&manager, "x");
        assert_eq!(x.len(), 1);
        let variable = manager.variable(x[0]);
        assert_eq!(variable.scope, manager.global_scope());
        assert_eq!(variable.references.len(), 2);
        let read = manager.reference(variable.references[1]);
        assert!(read.is_read_only());
        assert_eq!(manager.scope(read.scope).kind, ScopeKind::Function);
        assert_eq!(read.resolved, Some(x[0]));
        assert!(manager.through().is_empty());
    }

    #[test]
    fn test_shadowing() {
        let (_tree, manager) = analyze_source("var a = 1; { let a = 2; a; } a;");
        let a = find(&manager, "a");
        assert_eq!(a.len(), 2);
        let outer = manager.variable(a[0]);
        let inner = manager.variable(a[1]);
        assert_eq!(manager.scope(inner.scope).kind, ScopeKind::Block);
        // Declaration write plus the read after the block.
        assert_eq!(outer.references.len(), 2);
        assert_eq!(inner.references.len(), 2);
    }

    #[test]
    fn test_var_hoists_out_of_blocks() {
        let (_tree, manager) =
            analyze_source("function f() { use(v); if (ok) { var v = 1; } }");
        let v = find(&manager, "v");
        let variable = manager.variable(v[0]);
        assert_eq!(manager.scope(variable.scope).kind, ScopeKind::Function);
        assert_eq!(variable.references.len(), 2);
        let names: Vec<&str> = manager
            .through()
            .iter()
            .map(|r| manager.reference(*r).name.as_str())
            .collect();
        assert_eq!(names, vec!["use", "ok"]);
    }

    #[test]
    fn test_block_scoped_let_does_not_leak() {
        let (_tree, manager) = analyze_source("{ let inner = 1; } inner;");
        assert_eq!(manager.through().len(), 1);
        let (_, implicit) = manager.implicit_globals().next().unwrap();
        assert_eq!(implicit.name, "inner");
    }

    #[test]
    fn test_ambient_bindings() {
        let (_tree, manager) = analyze_source("Math.max(a, b.c); var Array = 1;");
        let math = manager.variable(find(&manager, "Math")[0]);
        assert_eq!(math.ambient, Some(Ambient::ReadOnly));
        assert_eq!(math.references.len(), 1);
        assert!(!math.is_declared());

        // A declaration augments the ambient variable.
        let array = find(&manager, "Array");
        assert_eq!(array.len(), 1);
        let array = manager.variable(array[0]);
        assert!(array.is_ambient());
        assert_eq!(array.defs.len(), 1);

        // `c` is a property name, not a reference.
        let unresolved: Vec<&str> = manager
            .implicit_globals()
            .map(|(_, variable)| variable.name.as_str())
            .collect();
        assert_eq!(unresolved, vec!["a", "b"]);
    }

    #[test]
    fn test_read_write_flags() {
        let (_tree, manager) = analyze_source("let n = 0; n += 1; n++; n = 2; n;");
        let n = manager.variable(find(&manager, "n")[0]);
        let flags: Vec<(ReadWrite, bool)> = n
            .references
            .iter()
            .map(|r| {
                let reference = manager.reference(*r);
                (reference.flags, reference.init)
            })
            .collect();
        assert_eq!(
            flags,
            vec![
                (ReadWrite::Write, true),
                (ReadWrite::ReadWrite, false),
                (ReadWrite::ReadWrite, false),
                (ReadWrite::Write, false),
                (ReadWrite::Read, false),
            ]
        );
    }

    #[test]
    fn test_declaration_kinds() {
        let source = "import d, { x as y } from 'm';\n\
                      function f(p, [q = d] = []) { try {} catch (e) {} }\n\
                      class K {}\n\
                      const c = function g() { return g; };";
        let (tree, manager) = analyze_source(source);
        let kinds: Vec<(String, DefinitionKind)> = manager
            .variables()
            .filter(|(_, v)| !v.is_ambient())
            .flat_map(|(_, v)| v.defs.iter().map(move |d| (v.name.clone(), d.kind)))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("d".to_string(), DefinitionKind::ImportBinding),
                ("y".to_string(), DefinitionKind::ImportBinding),
                ("f".to_string(), DefinitionKind::FunctionName),
                ("K".to_string(), DefinitionKind::ClassName),
                ("c".to_string(), DefinitionKind::Const),
                ("p".to_string(), DefinitionKind::Parameter),
                ("q".to_string(), DefinitionKind::Parameter),
                ("e".to_string(), DefinitionKind::CatchClause),
                ("K".to_string(), DefinitionKind::ClassName),
                ("g".to_string(), DefinitionKind::FunctionName),
            ]
        );
        assert_eq!(manager.scope(ScopeId::from_index(1)).kind, ScopeKind::Module);
        assert!(manager.through().is_empty());

        let g = manager.variable(find(&manager, "g")[0]);
        assert_eq!(g.references.len(), 1);
        let class = tree.root().children().nth(2).unwrap();
        assert_eq!(manager.scope(manager.acquire(class.id()).unwrap()).kind, ScopeKind::Class);
    }

    #[test]
    fn test_for_scopes() {
        let (tree, manager) =
            analyze_source("for (let i = 0; i < 3; i++) {}\nfor (const k of ks) k;");
        let loops: Vec<NodeRef<'_>> = tree.root().children().collect();
        for node in &loops {
            let scope = manager.acquire(node.id()).unwrap();
            assert_eq!(manager.scope(scope).kind, ScopeKind::For);
        }
        let k = manager.variable(find(&manager, "k")[0]);
        let first = manager.reference(k.references[0]);
        assert!(first.is_write_only() && first.init);
        assert_eq!(manager.through().len(), 1);
    }

    #[test]
    fn test_arguments_of_functions() {
        let (_tree, manager) = analyze_source(
            "function f() { return arguments.length; }\n\
             const g = function () { return () => arguments[0]; };\n\
             const h = () => arguments;",
        );
        let names: Vec<&str> = manager
            .through()
            .iter()
            .map(|r| manager.reference(*r).name.as_str())
            .collect();
        assert_eq!(names, vec!["arguments"]);

        let scopes: Vec<ScopeId> = manager
            .scopes()
            .filter(|(_, scope)| scope.kind == ScopeKind::Function)
            .map(|(id, _)| id)
            .collect();
        assert_eq!(scopes.len(), 4);

        // One for `f`, one for the function expression, none for arrows.
        let declared: Vec<(ScopeId, usize)> = scopes
            .iter()
            .filter_map(|scope| {
                let id = manager.scope(*scope).get("arguments")?;
                Some((*scope, manager.variable(id).references.len()))
            })
            .collect();
        assert_eq!(declared, vec![(scopes[0], 1), (scopes[1], 1)]);

        // Not a declaration of the program.
        assert!(find(&manager, "arguments").is_empty());
    }

    #[test]
    fn test_class_name_is_bound_inside_the_class() {
        let (tree, manager) = analyze_source("class A { m() { return A; } }\nA;");
        let class = tree.root().children().next().unwrap();
        let class_scope = manager.acquire(class.id()).unwrap();

        let inner = manager.scope(class_scope).get("A").unwrap();
        let outer = manager.scope(manager.global_scope()).get("A").unwrap();
        assert_ne!(inner, outer);
        assert_eq!(manager.find_variable(class_scope, "A"), Some(inner));
        assert_eq!(manager.variable(inner).references.len(), 1);
        assert_eq!(manager.variable(outer).references.len(), 1);
        assert!(manager.through().is_empty());
    }

    #[test]
    fn test_scope_of() {
        let (tree, manager) = analyze_source("function f(a) { return a; }");
        let function = tree.root().field(Field::Body).unwrap();
        let ret = function.field(Field::Body).unwrap().field(Field::Body).unwrap();
        let scope = manager.scope_of(ret);
        assert_eq!(manager.scope(scope).kind, ScopeKind::Function);
        assert_eq!(manager.scope(scope).node, function.id());
        assert!(manager.find_variable(scope, "f").is_some());
        assert!(manager.find_variable(scope, "a").is_some());
        assert!(manager.find_variable(manager.global_scope(), "a").is_none());
    }
}
