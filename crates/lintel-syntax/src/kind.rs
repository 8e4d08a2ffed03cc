use std::fmt;

macro_rules! node_kinds {
    ($($kind:ident),+ $(,)?) => {
        /// The closed set of node kinds produced by the parser. Names follow
        /// ESTree, and are the names used in selectors.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeKind {
            $($kind),+
        }

        impl NodeKind {
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$kind),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(NodeKind::$kind => stringify!($kind)),+
                }
            }

            pub fn from_name(name: &str) -> Option<NodeKind> {
                match name {
                    $(stringify!($kind) => Some(NodeKind::$kind),)+
                    _ => None,
                }
            }
        }
    };
}

node_kinds! {
    Program,
    // Statements and declarations
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    ClassDeclaration,
    ImportDeclaration,
    ImportSpecifier,
    ImportDefaultSpecifier,
    ImportNamespaceSpecifier,
    ExpressionStatement,
    BlockStatement,
    EmptyStatement,
    DebuggerStatement,
    ReturnStatement,
    BreakStatement,
    ContinueStatement,
    ThrowStatement,
    IfStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    TryStatement,
    CatchClause,
    // Classes
    ClassBody,
    MethodDefinition,
    // Expressions
    Identifier,
    Literal,
    ThisExpression,
    Super,
    ArrayExpression,
    ObjectExpression,
    Property,
    FunctionExpression,
    ArrowFunctionExpression,
    ClassExpression,
    UnaryExpression,
    UpdateExpression,
    BinaryExpression,
    LogicalExpression,
    AssignmentExpression,
    ConditionalExpression,
    CallExpression,
    NewExpression,
    MemberExpression,
    SequenceExpression,
    // Patterns
    ArrayPattern,
    ObjectPattern,
    AssignmentPattern,
}

impl NodeKind {
    /// Dense index, for tables keyed by kind.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn is_function(self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration
                | NodeKind::FunctionExpression
                | NodeKind::ArrowFunctionExpression
        )
    }

    pub fn is_loop(self) -> bool {
        matches!(
            self,
            NodeKind::WhileStatement
                | NodeKind::DoWhileStatement
                | NodeKind::ForStatement
                | NodeKind::ForInStatement
                | NodeKind::ForOfStatement
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named child slots. A node may hold several children in the same slot
/// (`params`, `body` of a block, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Init,
    Left,
    Right,
    Argument,
    Test,
    Consequent,
    Alternate,
    Body,
    Callee,
    Arguments,
    Object,
    Property,
    Key,
    Value,
    Update,
    Params,
    Elements,
    Properties,
    Declarations,
    Expressions,
    Expression,
    Block,
    Handler,
    Param,
    Finalizer,
    SuperClass,
    Specifiers,
    Source,
    Local,
    Imported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Var => "var",
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Number,
    String,
    Boolean,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Constructor,
    Method,
}

/// Non-child information carried by some node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Detail {
    #[default]
    None,
    /// Unary, update, binary, logical and assignment expressions.
    Operator {
        operator: &'static str,
        prefix: bool,
    },
    Declaration(DeclarationKind),
    Member {
        computed: bool,
    },
    Property {
        computed: bool,
        shorthand: bool,
    },
    Method {
        kind: MethodKind,
        is_static: bool,
    },
    Literal(LiteralKind),
}

impl Detail {
    pub fn operator(&self) -> Option<&'static str> {
        match self {
            Detail::Operator { operator, .. } => Some(*operator),
            _ => None,
        }
    }

    pub fn declaration_kind(&self) -> Option<DeclarationKind> {
        match self {
            Detail::Declaration(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        match self {
            Detail::Member { computed } | Detail::Property { computed, .. } => *computed,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_name(kind.as_str()), Some(*kind));
        }
        assert_eq!(NodeKind::from_name("Expression"), None);
        assert_eq!(NodeKind::ALL[NodeKind::Literal.index()], NodeKind::Literal);
    }
}
