use crate::error::ParseError;
use crate::kind::{DeclarationKind, Detail, Field, LiteralKind, MethodKind, NodeKind};
use crate::text::TextRange;
use crate::token::{Token, TokenKind};
use crate::tree::{Node, NodeId};

type ParseResult<T = NodeId> = Result<T, ParseError>;
type Children = Vec<(Field, NodeId)>;

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=", "&&=", "||=",
    "??=",
];

const BINARY_OPERATORS: &[(&str, u8)] = &[
    ("??", 1),
    ("||", 2),
    ("&&", 3),
    ("|", 4),
    ("^", 5),
    ("&", 6),
    ("==", 7),
    ("!=", 7),
    ("===", 7),
    ("!==", 7),
    ("<", 8),
    (">", 8),
    ("<=", 8),
    (">=", 8),
    ("instanceof", 8),
    ("in", 8),
    ("<<", 9),
    (">>", 9),
    (">>>", 9),
    ("+", 10),
    ("-", 10),
    ("*", 11),
    ("/", 11),
    ("%", 11),
    ("**", 12),
];

const UNARY_OPERATORS: &[&str] = &["!", "~", "+", "-", "typeof", "void", "delete"];

/// Nesting of statements, expressions and patterns past which parsing
/// gives up. Keeps the recursive descent, and every recursive walk over the
/// resulting tree, well within a thread's stack.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Recursive-descent parser over the significant tokens of a file.
///
/// Nodes are allocated bottom-up: a node is pushed to the arena once all of
/// its children are, and the children's parent links are set at that point.
pub(crate) struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    /// Whether a line break separates token `i` from the previous one.
    newline_before: Vec<bool>,
    pos: usize,
    nodes: Vec<Node>,
    /// Set while parsing the head of a `for` statement, where `in` ends the
    /// left-hand side instead of being an operator.
    no_in: bool,
    /// Current nesting, see [`MAX_NESTING_DEPTH`].
    depth: usize,
}

impl<'s> Parser<'s> {
    pub(crate) fn new(source: &'s str, all_tokens: &[Token]) -> Self {
        let mut tokens = Vec::with_capacity(all_tokens.len());
        let mut newline_before = Vec::with_capacity(all_tokens.len());
        let mut saw_newline = false;
        for token in all_tokens {
            match token.kind {
                TokenKind::Newline => saw_newline = true,
                TokenKind::BlockComment if token.text(source).contains('\n') => saw_newline = true,
                kind if kind.is_trivia() => {}
                _ => {
                    tokens.push(*token);
                    newline_before.push(saw_newline);
                    saw_newline = false;
                }
            }
        }
        Self {
            source,
            tokens,
            newline_before,
            pos: 0,
            nodes: Vec::new(),
            no_in: false,
            depth: 0,
        }
    }

    pub(crate) fn parse_program(mut self) -> ParseResult<(Vec<Node>, NodeId)> {
        let mut body = Vec::new();
        while !self.at_eof() {
            let statement =
                if self.at("import") { self.parse_import()? } else { self.parse_statement()? };
            body.push((Field::Body, statement));
        }
        let range = TextRange::new(0, self.source.len());
        let root = self.alloc(NodeKind::Program, range, Detail::None, body);
        Ok((self.nodes, root))
    }

    // Token cursor ---------------------------------------------------------

    fn cur(&self) -> Token {
        self.tokens[self.pos]
    }

    fn peek_text(&self, n: usize) -> &'s str {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        self.tokens[index].text(self.source)
    }

    fn cur_text(&self) -> &'s str {
        self.cur().text(self.source)
    }

    fn at(&self, text: &str) -> bool {
        let token = self.cur();
        matches!(token.kind, TokenKind::Punctuator | TokenKind::Keyword)
            && token.text(self.source) == text
    }

    fn at_contextual(&self, word: &str) -> bool {
        self.cur().kind == TokenKind::Identifier && self.cur_text() == word
    }

    fn at_eof(&self) -> bool {
        self.cur().kind == TokenKind::Eof
    }

    fn has_newline_before(&self) -> bool {
        self.newline_before[self.pos]
    }

    fn bump(&mut self) -> Token {
        let token = self.cur();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, text: &str) -> bool {
        let found = self.at(text);
        if found {
            self.bump();
        }
        found
    }

    fn expect(&mut self, text: &str) -> ParseResult<Token> {
        if self.at(text) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(&format!("expected `{text}`")))
        }
    }

    fn expect_contextual(&mut self, word: &str) -> ParseResult<()> {
        if self.at_contextual(word) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(&format!("expected `{word}`")))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.cur();
        let found = if token.kind == TokenKind::Eof {
            "end of file".to_string()
        } else {
            format!("`{}`", token.text(self.source))
        };
        ParseError::new(format!("{expected}, found {found}"), token.range.start())
    }

    /// Automatic semicolon insertion, in its simple form.
    fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.eat(";") || self.at("}") || self.at_eof() || self.has_newline_before() {
            Ok(())
        } else {
            Err(self.unexpected("expected `;`"))
        }
    }

    fn with_no_in<T>(
        &mut self,
        no_in: bool,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = std::mem::replace(&mut self.no_in, no_in);
        let result = parse(self);
        self.no_in = saved;
        result
    }

    /// Run `parse` one nesting level deeper.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::new("nesting too deep", self.start()));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // Arena ----------------------------------------------------------------

    fn start(&self) -> usize {
        self.cur().range.start()
    }

    /// End of the last consumed token. At the end of input the cursor stays
    /// on `Eof`, so this remains the end of the last real token.
    fn prev_end(&self) -> usize {
        self.pos.checked_sub(1).map_or(0, |prev| self.tokens[prev].range.end())
    }

    fn alloc(
        &mut self,
        kind: NodeKind,
        range: TextRange,
        detail: Detail,
        children: Children,
    ) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        for (_, child) in &children {
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes.push(Node { kind, range, parent: None, detail, children });
        id
    }

    fn finish(
        &mut self,
        kind: NodeKind,
        start: usize,
        detail: Detail,
        children: Children,
    ) -> NodeId {
        let range = TextRange::new(start, self.prev_end());
        self.alloc(kind, range, detail, children)
    }

    fn kind_of(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    fn leaf(&mut self, kind: NodeKind, detail: Detail) -> NodeId {
        let token = self.bump();
        self.alloc(kind, token.range, detail, Vec::new())
    }

    // Statements -----------------------------------------------------------

    fn parse_statement(&mut self) -> ParseResult {
        self.nested(Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> ParseResult {
        let token = self.cur();
        match (token.kind, token.text(self.source)) {
            (TokenKind::Punctuator, "{") => self.parse_block(),
            (TokenKind::Punctuator, ";") => Ok(self.leaf(NodeKind::EmptyStatement, Detail::None)),
            (TokenKind::Keyword, "var" | "let" | "const") => self.parse_variable_declaration(true),
            (TokenKind::Keyword, "function") => self.parse_function(NodeKind::FunctionDeclaration),
            (TokenKind::Keyword, "class") => self.parse_class(NodeKind::ClassDeclaration),
            (TokenKind::Keyword, "if") => self.parse_if(),
            (TokenKind::Keyword, "while") => self.parse_while(),
            (TokenKind::Keyword, "do") => self.parse_do_while(),
            (TokenKind::Keyword, "for") => self.parse_for(),
            (TokenKind::Keyword, "return") => self.parse_return(),
            (TokenKind::Keyword, "break") => self.parse_keyword_statement(NodeKind::BreakStatement),
            (TokenKind::Keyword, "continue") => {
                self.parse_keyword_statement(NodeKind::ContinueStatement)
            }
            (TokenKind::Keyword, "debugger") => {
                self.parse_keyword_statement(NodeKind::DebuggerStatement)
            }
            (TokenKind::Keyword, "throw") => self.parse_throw(),
            (TokenKind::Keyword, "try") => self.parse_try(),
            (TokenKind::Keyword, "import") => Err(ParseError::new(
                "`import` declarations are only allowed at the top level",
                token.range.start(),
            )),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_block(&mut self) -> ParseResult {
        let start = self.start();
        self.expect("{")?;
        let mut body = Vec::new();
        while !self.at("}") && !self.at_eof() {
            body.push((Field::Body, self.parse_statement()?));
        }
        self.expect("}")?;
        Ok(self.finish(NodeKind::BlockStatement, start, Detail::None, body))
    }

    fn parse_expression_statement(&mut self) -> ParseResult {
        let start = self.start();
        let expression = self.parse_expression_in()?;
        self.consume_semicolon()?;
        Ok(self.finish(
            NodeKind::ExpressionStatement,
            start,
            Detail::None,
            vec![(Field::Expression, expression)],
        ))
    }

    fn parse_variable_declaration(&mut self, in_statement: bool) -> ParseResult {
        let start = self.start();
        let kind = match self.bump().text(self.source) {
            "var" => DeclarationKind::Var,
            "let" => DeclarationKind::Let,
            _ => DeclarationKind::Const,
        };
        let mut declarations = Vec::new();
        loop {
            let declarator_start = self.start();
            let mut fields = vec![(Field::Id, self.parse_binding_target()?)];
            if self.eat("=") {
                fields.push((Field::Init, self.parse_assignment()?));
            }
            let declarator =
                self.finish(NodeKind::VariableDeclarator, declarator_start, Detail::None, fields);
            declarations.push((Field::Declarations, declarator));
            if !self.eat(",") {
                break;
            }
        }
        if in_statement {
            self.consume_semicolon()?;
        }
        Ok(self.finish(
            NodeKind::VariableDeclaration,
            start,
            Detail::Declaration(kind),
            declarations,
        ))
    }

    fn parse_if(&mut self) -> ParseResult {
        let start = self.start();
        self.bump();
        let mut children = vec![(Field::Test, self.parse_paren_expression()?)];
        children.push((Field::Consequent, self.parse_statement()?));
        if self.eat("else") {
            children.push((Field::Alternate, self.parse_statement()?));
        }
        Ok(self.finish(NodeKind::IfStatement, start, Detail::None, children))
    }

    fn parse_paren_expression(&mut self) -> ParseResult {
        self.expect("(")?;
        let expression = self.parse_expression_in()?;
        self.expect(")")?;
        Ok(expression)
    }

    fn parse_while(&mut self) -> ParseResult {
        let start = self.start();
        self.bump();
        let test = self.parse_paren_expression()?;
        let body = self.parse_statement()?;
        Ok(self.finish(
            NodeKind::WhileStatement,
            start,
            Detail::None,
            vec![(Field::Test, test), (Field::Body, body)],
        ))
    }

    fn parse_do_while(&mut self) -> ParseResult {
        let start = self.start();
        self.bump();
        let body = self.parse_statement()?;
        self.expect("while")?;
        let test = self.parse_paren_expression()?;
        self.eat(";");
        Ok(self.finish(
            NodeKind::DoWhileStatement,
            start,
            Detail::None,
            vec![(Field::Body, body), (Field::Test, test)],
        ))
    }

    fn parse_for(&mut self) -> ParseResult {
        let start = self.start();
        self.bump();
        self.expect("(")?;

        let init = if self.at(";") {
            None
        } else if self.at("var") || self.at("let") || self.at("const") {
            Some(self.with_no_in(true, |p| p.parse_variable_declaration(false))?)
        } else {
            Some(self.with_no_in(true, Self::parse_expression)?)
        };

        let mut children = Vec::new();
        if let Some(left) = init {
            let is_of = self.at_contextual("of");
            if is_of || self.at("in") {
                if self.kind_of(left) != NodeKind::VariableDeclaration {
                    self.reinterpret_as_pattern(left)?;
                }
                self.bump();
                let right = if is_of {
                    self.with_no_in(false, Self::parse_assignment)?
                } else {
                    self.parse_expression_in()?
                };
                self.expect(")")?;
                let body = self.parse_statement()?;
                let kind = if is_of { NodeKind::ForOfStatement } else { NodeKind::ForInStatement };
                return Ok(self.finish(
                    kind,
                    start,
                    Detail::None,
                    vec![(Field::Left, left), (Field::Right, right), (Field::Body, body)],
                ));
            }
            children.push((Field::Init, left));
        }

        self.expect(";")?;
        if !self.at(";") {
            children.push((Field::Test, self.parse_expression_in()?));
        }
        self.expect(";")?;
        if !self.at(")") {
            children.push((Field::Update, self.parse_expression_in()?));
        }
        self.expect(")")?;
        children.push((Field::Body, self.parse_statement()?));
        Ok(self.finish(NodeKind::ForStatement, start, Detail::None, children))
    }

    fn parse_return(&mut self) -> ParseResult {
        let start = self.start();
        self.bump();
        let mut children = Vec::new();
        if !self.at(";") && !self.at("}") && !self.at_eof() && !self.has_newline_before() {
            children.push((Field::Argument, self.parse_expression_in()?));
        }
        self.consume_semicolon()?;
        Ok(self.finish(NodeKind::ReturnStatement, start, Detail::None, children))
    }

    fn parse_throw(&mut self) -> ParseResult {
        let start = self.start();
        self.bump();
        if self.has_newline_before() {
            return Err(ParseError::new("illegal newline after `throw`", self.start()));
        }
        let argument = self.parse_expression_in()?;
        self.consume_semicolon()?;
        Ok(self.finish(
            NodeKind::ThrowStatement,
            start,
            Detail::None,
            vec![(Field::Argument, argument)],
        ))
    }

    /// `break`, `continue` and `debugger`.
    fn parse_keyword_statement(&mut self, kind: NodeKind) -> ParseResult {
        let start = self.start();
        self.bump();
        self.consume_semicolon()?;
        Ok(self.finish(kind, start, Detail::None, Vec::new()))
    }

    fn parse_try(&mut self) -> ParseResult {
        let start = self.start();
        self.bump();
        let mut children = vec![(Field::Block, self.parse_block()?)];

        if self.at("catch") {
            let handler_start = self.start();
            self.bump();
            let mut handler = Vec::new();
            if self.eat("(") {
                handler.push((Field::Param, self.parse_binding_target()?));
                self.expect(")")?;
            }
            handler.push((Field::Body, self.parse_block()?));
            let clause = self.finish(NodeKind::CatchClause, handler_start, Detail::None, handler);
            children.push((Field::Handler, clause));
        }
        if self.eat("finally") {
            children.push((Field::Finalizer, self.parse_block()?));
        }
        if children.len() == 1 {
            return Err(self.unexpected("expected `catch` or `finally`"));
        }
        Ok(self.finish(NodeKind::TryStatement, start, Detail::None, children))
    }

    fn parse_import(&mut self) -> ParseResult {
        let start = self.start();
        self.bump();
        let mut children = Vec::new();

        if self.cur().kind != TokenKind::String {
            let mut more = true;
            if self.cur().kind == TokenKind::Identifier {
                let spec_start = self.start();
                let local = self.parse_identifier()?;
                let specifier = self.finish(
                    NodeKind::ImportDefaultSpecifier,
                    spec_start,
                    Detail::None,
                    vec![(Field::Local, local)],
                );
                children.push((Field::Specifiers, specifier));
                more = self.eat(",");
            }
            if more {
                if self.at("*") {
                    let spec_start = self.start();
                    self.bump();
                    self.expect_contextual("as")?;
                    let local = self.parse_identifier()?;
                    let specifier = self.finish(
                        NodeKind::ImportNamespaceSpecifier,
                        spec_start,
                        Detail::None,
                        vec![(Field::Local, local)],
                    );
                    children.push((Field::Specifiers, specifier));
                } else if self.eat("{") {
                    while !self.at("}") {
                        children.push((Field::Specifiers, self.parse_import_specifier()?));
                        if !self.eat(",") {
                            break;
                        }
                    }
                    self.expect("}")?;
                } else {
                    return Err(self.unexpected("expected import specifiers"));
                }
            }
            self.expect_contextual("from")?;
        }

        if self.cur().kind != TokenKind::String {
            return Err(self.unexpected("expected a module specifier"));
        }
        let source = self.leaf(NodeKind::Literal, Detail::Literal(LiteralKind::String));
        children.push((Field::Source, source));
        self.consume_semicolon()?;
        Ok(self.finish(NodeKind::ImportDeclaration, start, Detail::None, children))
    }

    fn parse_import_specifier(&mut self) -> ParseResult {
        let start = self.start();
        let imported_token = self.cur();
        let imported = self.parse_identifier_name()?;
        let fields = if self.at_contextual("as") {
            self.bump();
            vec![(Field::Imported, imported), (Field::Local, self.parse_identifier()?)]
        } else if imported_token.kind == TokenKind::Identifier {
            vec![(Field::Local, imported)]
        } else {
            let name = imported_token.text(self.source);
            return Err(ParseError::new(
                format!("`{name}` cannot be imported without a local name"),
                imported_token.range.start(),
            ));
        };
        Ok(self.finish(NodeKind::ImportSpecifier, start, Detail::None, fields))
    }

    // Functions and classes ------------------------------------------------

    fn parse_function(&mut self, kind: NodeKind) -> ParseResult {
        let start = self.start();
        self.expect("function")?;
        let mut children = Vec::new();
        if self.cur().kind == TokenKind::Identifier {
            children.push((Field::Id, self.parse_identifier()?));
        } else if kind == NodeKind::FunctionDeclaration {
            return Err(self.unexpected("expected a function name"));
        }
        self.parse_function_rest(&mut children)?;
        Ok(self.finish(kind, start, Detail::None, children))
    }

    /// Parameter list and body.
    fn parse_function_rest(&mut self, children: &mut Children) -> ParseResult<()> {
        self.expect("(")?;
        self.with_no_in(false, |p| {
            while !p.at(")") {
                children.push((Field::Params, p.parse_binding_element()?));
                if !p.eat(",") {
                    break;
                }
            }
            Ok(())
        })?;
        self.expect(")")?;
        children.push((Field::Body, self.parse_function_body()?));
        Ok(())
    }

    fn parse_function_body(&mut self) -> ParseResult {
        self.with_no_in(false, Self::parse_block)
    }

    fn parse_class(&mut self, kind: NodeKind) -> ParseResult {
        let start = self.start();
        self.expect("class")?;
        let mut children = Vec::new();
        if self.cur().kind == TokenKind::Identifier {
            children.push((Field::Id, self.parse_identifier()?));
        } else if kind == NodeKind::ClassDeclaration {
            return Err(self.unexpected("expected a class name"));
        }
        if self.eat("extends") {
            children.push((Field::SuperClass, self.parse_lhs()?));
        }

        let body_start = self.start();
        self.expect("{")?;
        let mut members = Vec::new();
        while !self.at("}") && !self.at_eof() {
            if self.eat(";") {
                continue;
            }
            members.push((Field::Body, self.parse_method()?));
        }
        self.expect("}")?;
        let body = self.finish(NodeKind::ClassBody, body_start, Detail::None, members);
        children.push((Field::Body, body));
        Ok(self.finish(kind, start, Detail::None, children))
    }

    fn parse_method(&mut self) -> ParseResult {
        let start = self.start();
        let is_static = self.at_contextual("static") && self.peek_text(1) != "(";
        if is_static {
            self.bump();
        }
        let key_token = self.cur();
        let (key, computed) = self.parse_property_key()?;
        let kind = if !computed && !is_static && key_token.text(self.source) == "constructor" {
            MethodKind::Constructor
        } else {
            MethodKind::Method
        };
        let value = self.parse_method_function()?;
        Ok(self.finish(
            NodeKind::MethodDefinition,
            start,
            Detail::Method { kind, is_static },
            vec![(Field::Key, key), (Field::Value, value)],
        ))
    }

    /// The `(params) { body }` part of a method, as a function expression.
    fn parse_method_function(&mut self) -> ParseResult {
        let start = self.start();
        let mut children = Vec::new();
        self.parse_function_rest(&mut children)?;
        Ok(self.finish(NodeKind::FunctionExpression, start, Detail::None, children))
    }

    fn is_arrow_ahead(&self) -> bool {
        let token = self.cur();
        if token.kind == TokenKind::Identifier {
            return self.peek_text(1) == "=>";
        }
        if !self.at("(") {
            return false;
        }
        let mut depth = 0usize;
        for (i, token) in self.tokens[self.pos..].iter().enumerate() {
            if token.kind != TokenKind::Punctuator {
                continue;
            }
            match token.text(self.source) {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => {
                    depth -= 1;
                    if depth == 0 {
                        return self.peek_text(i + 1) == "=>";
                    }
                }
                _ => {}
            }
        }
        false
    }

    fn parse_arrow(&mut self) -> ParseResult {
        let start = self.start();
        let mut children = Vec::new();
        if self.cur().kind == TokenKind::Identifier {
            children.push((Field::Params, self.parse_identifier()?));
        } else {
            self.expect("(")?;
            self.with_no_in(false, |p| {
                while !p.at(")") {
                    children.push((Field::Params, p.parse_binding_element()?));
                    if !p.eat(",") {
                        break;
                    }
                }
                Ok(())
            })?;
            self.expect(")")?;
        }
        self.expect("=>")?;
        let body =
            if self.at("{") { self.parse_function_body()? } else { self.parse_assignment()? };
        children.push((Field::Body, body));
        Ok(self.finish(NodeKind::ArrowFunctionExpression, start, Detail::None, children))
    }

    // Patterns -------------------------------------------------------------

    fn parse_binding_target(&mut self) -> ParseResult {
        if self.at("[") {
            self.nested(Self::parse_array_pattern)
        } else if self.at("{") {
            self.nested(Self::parse_object_pattern)
        } else {
            self.parse_identifier()
        }
    }

    /// A binding target with an optional default value.
    fn parse_binding_element(&mut self) -> ParseResult {
        let start = self.start();
        let target = self.parse_binding_target()?;
        if !self.eat("=") {
            return Ok(target);
        }
        let value = self.parse_assignment()?;
        Ok(self.finish(
            NodeKind::AssignmentPattern,
            start,
            Detail::None,
            vec![(Field::Left, target), (Field::Right, value)],
        ))
    }

    fn parse_array_pattern(&mut self) -> ParseResult {
        let start = self.start();
        self.expect("[")?;
        let mut elements = Vec::new();
        while !self.at("]") {
            if self.eat(",") {
                continue;
            }
            elements.push((Field::Elements, self.parse_binding_element()?));
            if !self.at("]") {
                self.expect(",")?;
            }
        }
        self.expect("]")?;
        Ok(self.finish(NodeKind::ArrayPattern, start, Detail::None, elements))
    }

    fn parse_object_pattern(&mut self) -> ParseResult {
        let start = self.start();
        self.expect("{")?;
        let mut properties = Vec::new();
        while !self.at("}") {
            properties.push((Field::Properties, self.parse_binding_property()?));
            if !self.eat(",") {
                break;
            }
        }
        self.expect("}")?;
        Ok(self.finish(NodeKind::ObjectPattern, start, Detail::None, properties))
    }

    fn parse_binding_property(&mut self) -> ParseResult {
        let start = self.start();
        let key_token = self.cur();
        let (key, computed) = self.parse_property_key()?;
        if self.eat(":") {
            let value = self.parse_binding_element()?;
            return Ok(self.finish(
                NodeKind::Property,
                start,
                Detail::Property { computed, shorthand: false },
                vec![(Field::Key, key), (Field::Value, value)],
            ));
        }
        if computed || key_token.kind != TokenKind::Identifier {
            return Err(self.unexpected("expected `:`"));
        }
        let value = if self.eat("=") {
            let default = self.parse_assignment()?;
            self.finish(
                NodeKind::AssignmentPattern,
                start,
                Detail::None,
                vec![(Field::Left, key), (Field::Right, default)],
            )
        } else {
            key
        };
        Ok(self.finish(
            NodeKind::Property,
            start,
            Detail::Property { computed: false, shorthand: true },
            vec![(Field::Value, value)],
        ))
    }

    /// Reinterpret an expression on the left of `=` (or in a `for-in/of`
    /// head) as an assignment target.
    fn reinterpret_as_pattern(&mut self, id: NodeId) -> ParseResult<()> {
        let node = &self.nodes[id.index()];
        match node.kind {
            NodeKind::Identifier
            | NodeKind::MemberExpression
            | NodeKind::ArrayPattern
            | NodeKind::ObjectPattern
            | NodeKind::AssignmentPattern => Ok(()),
            NodeKind::ArrayExpression => {
                let elements: Vec<NodeId> = node.children.iter().map(|(_, c)| *c).collect();
                self.nodes[id.index()].kind = NodeKind::ArrayPattern;
                for element in elements {
                    self.reinterpret_as_pattern(element)?;
                }
                Ok(())
            }
            NodeKind::ObjectExpression => {
                let properties: Vec<NodeId> = node.children.iter().map(|(_, c)| *c).collect();
                self.nodes[id.index()].kind = NodeKind::ObjectPattern;
                for property in properties {
                    let value = self.nodes[property.index()]
                        .children
                        .iter()
                        .find(|(field, _)| *field == Field::Value)
                        .map(|(_, value)| *value);
                    if let Some(value) = value {
                        self.reinterpret_as_pattern(value)?;
                    }
                }
                Ok(())
            }
            NodeKind::AssignmentExpression if node.detail.operator() == Some("=") => {
                let target = &mut self.nodes[id.index()];
                target.kind = NodeKind::AssignmentPattern;
                target.detail = Detail::None;
                Ok(())
            }
            _ => Err(ParseError::new("invalid assignment target", node.range.start())),
        }
    }

    fn check_simple_target(&self, id: NodeId) -> ParseResult<()> {
        let node = &self.nodes[id.index()];
        match node.kind {
            NodeKind::Identifier | NodeKind::MemberExpression => Ok(()),
            _ => Err(ParseError::new("invalid assignment target", node.range.start())),
        }
    }

    // Expressions ----------------------------------------------------------

    fn parse_expression_in(&mut self) -> ParseResult {
        self.with_no_in(false, Self::parse_expression)
    }

    fn parse_expression(&mut self) -> ParseResult {
        let start = self.start();
        let first = self.parse_assignment()?;
        if !self.at(",") {
            return Ok(first);
        }
        let mut expressions = vec![(Field::Expressions, first)];
        while self.eat(",") {
            expressions.push((Field::Expressions, self.parse_assignment()?));
        }
        Ok(self.finish(NodeKind::SequenceExpression, start, Detail::None, expressions))
    }

    fn parse_assignment(&mut self) -> ParseResult {
        self.nested(Self::parse_assignment_inner)
    }

    fn parse_assignment_inner(&mut self) -> ParseResult {
        if self.is_arrow_ahead() {
            return self.parse_arrow();
        }
        let start = self.start();
        let left = self.parse_conditional()?;

        let token = self.cur();
        if token.kind != TokenKind::Punctuator {
            return Ok(left);
        }
        let text = token.text(self.source);
        let Some(operator) = ASSIGNMENT_OPERATORS.iter().find(|op| **op == text).copied() else {
            return Ok(left);
        };
        if operator == "=" {
            self.reinterpret_as_pattern(left)?;
        } else {
            self.check_simple_target(left)?;
        }
        self.bump();
        let right = self.parse_assignment()?;
        Ok(self.finish(
            NodeKind::AssignmentExpression,
            start,
            Detail::Operator { operator, prefix: false },
            vec![(Field::Left, left), (Field::Right, right)],
        ))
    }

    fn parse_conditional(&mut self) -> ParseResult {
        let start = self.start();
        let test = self.parse_binary(0)?;
        if !self.eat("?") {
            return Ok(test);
        }
        let consequent = self.with_no_in(false, Self::parse_assignment)?;
        self.expect(":")?;
        let alternate = self.parse_assignment()?;
        Ok(self.finish(
            NodeKind::ConditionalExpression,
            start,
            Detail::None,
            vec![
                (Field::Test, test),
                (Field::Consequent, consequent),
                (Field::Alternate, alternate),
            ],
        ))
    }

    fn binary_operator(&self) -> Option<(&'static str, u8)> {
        let token = self.cur();
        if !matches!(token.kind, TokenKind::Punctuator | TokenKind::Keyword) {
            return None;
        }
        let text = token.text(self.source);
        if text == "in" && self.no_in {
            return None;
        }
        BINARY_OPERATORS.iter().find(|(op, _)| *op == text).copied()
    }

    /// Precedence climbing. `**` is right-associative.
    fn parse_binary(&mut self, min_precedence: u8) -> ParseResult {
        let start = self.start();
        let mut left = self.parse_unary()?;
        while let Some((operator, precedence)) = self.binary_operator() {
            if precedence < min_precedence {
                break;
            }
            self.bump();
            let next_min = if operator == "**" { precedence } else { precedence + 1 };
            let right = self.nested(|p| p.parse_binary(next_min))?;
            let kind = if matches!(operator, "&&" | "||" | "??") {
                NodeKind::LogicalExpression
            } else {
                NodeKind::BinaryExpression
            };
            left = self.finish(
                kind,
                start,
                Detail::Operator { operator, prefix: false },
                vec![(Field::Left, left), (Field::Right, right)],
            );
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult {
        let start = self.start();
        let token = self.cur();
        if matches!(token.kind, TokenKind::Punctuator | TokenKind::Keyword) {
            let text = token.text(self.source);
            if let Some(operator) = UNARY_OPERATORS.iter().find(|op| **op == text).copied() {
                self.bump();
                let argument = self.nested(Self::parse_unary)?;
                return Ok(self.finish(
                    NodeKind::UnaryExpression,
                    start,
                    Detail::Operator { operator, prefix: true },
                    vec![(Field::Argument, argument)],
                ));
            }
            if let Some(operator) = update_operator(text) {
                self.bump();
                let argument = self.nested(Self::parse_unary)?;
                self.check_simple_target(argument)?;
                return Ok(self.finish(
                    NodeKind::UpdateExpression,
                    start,
                    Detail::Operator { operator, prefix: true },
                    vec![(Field::Argument, argument)],
                ));
            }
        }

        let argument = self.parse_lhs()?;
        let token = self.cur();
        if token.kind == TokenKind::Punctuator && !self.has_newline_before() {
            if let Some(operator) = update_operator(token.text(self.source)) {
                self.check_simple_target(argument)?;
                self.bump();
                return Ok(self.finish(
                    NodeKind::UpdateExpression,
                    start,
                    Detail::Operator { operator, prefix: false },
                    vec![(Field::Argument, argument)],
                ));
            }
        }
        Ok(argument)
    }

    /// Calls, member accesses and `new`.
    fn parse_lhs(&mut self) -> ParseResult {
        let start = self.start();
        let callee = if self.at("new") { self.parse_new()? } else { self.parse_primary()? };
        self.parse_member_tail(start, callee, true)
    }

    fn parse_new(&mut self) -> ParseResult {
        let start = self.start();
        self.bump();
        let callee_start = self.start();
        let callee =
            if self.at("new") { self.nested(Self::parse_new)? } else { self.parse_primary()? };
        let callee = self.parse_member_tail(callee_start, callee, false)?;
        let mut children = vec![(Field::Callee, callee)];
        if self.at("(") {
            self.parse_arguments(&mut children)?;
        }
        Ok(self.finish(NodeKind::NewExpression, start, Detail::None, children))
    }

    fn parse_member_tail(&mut self, start: usize, mut object: NodeId, calls: bool) -> ParseResult {
        loop {
            if self.eat(".") {
                let property = self.parse_identifier_name()?;
                object = self.finish(
                    NodeKind::MemberExpression,
                    start,
                    Detail::Member { computed: false },
                    vec![(Field::Object, object), (Field::Property, property)],
                );
            } else if self.eat("[") {
                let property = self.parse_expression_in()?;
                self.expect("]")?;
                object = self.finish(
                    NodeKind::MemberExpression,
                    start,
                    Detail::Member { computed: true },
                    vec![(Field::Object, object), (Field::Property, property)],
                );
            } else if calls && self.at("(") {
                let mut children = vec![(Field::Callee, object)];
                self.parse_arguments(&mut children)?;
                object = self.finish(NodeKind::CallExpression, start, Detail::None, children);
            } else {
                return Ok(object);
            }
        }
    }

    fn parse_arguments(&mut self, children: &mut Children) -> ParseResult<()> {
        self.expect("(")?;
        self.with_no_in(false, |p| {
            while !p.at(")") {
                children.push((Field::Arguments, p.parse_assignment()?));
                if !p.eat(",") {
                    break;
                }
            }
            Ok(())
        })?;
        self.expect(")")?;
        Ok(())
    }

    fn parse_primary(&mut self) -> ParseResult {
        let token = self.cur();
        match (token.kind, token.text(self.source)) {
            (TokenKind::Identifier, _) => self.parse_identifier(),
            (TokenKind::Number, _) => {
                Ok(self.leaf(NodeKind::Literal, Detail::Literal(LiteralKind::Number)))
            }
            (TokenKind::String, _) => {
                Ok(self.leaf(NodeKind::Literal, Detail::Literal(LiteralKind::String)))
            }
            (TokenKind::Keyword, "true" | "false") => {
                Ok(self.leaf(NodeKind::Literal, Detail::Literal(LiteralKind::Boolean)))
            }
            (TokenKind::Keyword, "null") => {
                Ok(self.leaf(NodeKind::Literal, Detail::Literal(LiteralKind::Null)))
            }
            (TokenKind::Keyword, "this") => Ok(self.leaf(NodeKind::ThisExpression, Detail::None)),
            (TokenKind::Keyword, "super") => Ok(self.leaf(NodeKind::Super, Detail::None)),
            (TokenKind::Keyword, "function") => self.parse_function(NodeKind::FunctionExpression),
            (TokenKind::Keyword, "class") => self.parse_class(NodeKind::ClassExpression),
            (TokenKind::Punctuator, "(") => self.parse_paren_expression(),
            (TokenKind::Punctuator, "[") => self.parse_array_literal(),
            (TokenKind::Punctuator, "{") => self.parse_object_literal(),
            _ => Err(self.unexpected("expected an expression")),
        }
    }

    fn parse_identifier(&mut self) -> ParseResult {
        if self.cur().kind != TokenKind::Identifier {
            return Err(self.unexpected("expected an identifier"));
        }
        Ok(self.leaf(NodeKind::Identifier, Detail::None))
    }

    /// An identifier in a position where keywords are allowed (`a.default`).
    fn parse_identifier_name(&mut self) -> ParseResult {
        if !matches!(self.cur().kind, TokenKind::Identifier | TokenKind::Keyword) {
            return Err(self.unexpected("expected a property name"));
        }
        Ok(self.leaf(NodeKind::Identifier, Detail::None))
    }

    fn parse_array_literal(&mut self) -> ParseResult {
        let start = self.start();
        self.bump();
        let elements = self.with_no_in(false, |p| {
            let mut elements = Vec::new();
            while !p.at("]") {
                if p.eat(",") {
                    continue;
                }
                elements.push((Field::Elements, p.parse_assignment()?));
                if !p.at("]") {
                    p.expect(",")?;
                }
            }
            Ok(elements)
        })?;
        self.expect("]")?;
        Ok(self.finish(NodeKind::ArrayExpression, start, Detail::None, elements))
    }

    fn parse_object_literal(&mut self) -> ParseResult {
        let start = self.start();
        self.bump();
        let properties = self.with_no_in(false, |p| {
            let mut properties = Vec::new();
            while !p.at("}") {
                properties.push((Field::Properties, p.parse_property()?));
                if !p.eat(",") {
                    break;
                }
            }
            Ok(properties)
        })?;
        self.expect("}")?;
        Ok(self.finish(NodeKind::ObjectExpression, start, Detail::None, properties))
    }

    fn parse_property(&mut self) -> ParseResult {
        let start = self.start();
        let key_token = self.cur();
        let (key, computed) = self.parse_property_key()?;

        if self.eat(":") {
            let value = self.parse_assignment()?;
            return Ok(self.finish(
                NodeKind::Property,
                start,
                Detail::Property { computed, shorthand: false },
                vec![(Field::Key, key), (Field::Value, value)],
            ));
        }
        if self.at("(") {
            let value = self.parse_method_function()?;
            return Ok(self.finish(
                NodeKind::Property,
                start,
                Detail::Property { computed, shorthand: false },
                vec![(Field::Key, key), (Field::Value, value)],
            ));
        }
        if computed || key_token.kind != TokenKind::Identifier {
            return Err(self.unexpected("expected `:`"));
        }
        // `{ a = 1 }` is only valid once the literal becomes a pattern.
        let value = if self.eat("=") {
            let default = self.parse_assignment()?;
            self.finish(
                NodeKind::AssignmentExpression,
                start,
                Detail::Operator { operator: "=", prefix: false },
                vec![(Field::Left, key), (Field::Right, default)],
            )
        } else {
            key
        };
        Ok(self.finish(
            NodeKind::Property,
            start,
            Detail::Property { computed: false, shorthand: true },
            vec![(Field::Value, value)],
        ))
    }

    /// Returns the key and whether it is computed (`[expr]`).
    fn parse_property_key(&mut self) -> ParseResult<(NodeId, bool)> {
        let token = self.cur();
        match token.kind {
            TokenKind::Punctuator if self.at("[") => {
                self.bump();
                let key = self.with_no_in(false, Self::parse_assignment)?;
                self.expect("]")?;
                Ok((key, true))
            }
            TokenKind::String => {
                Ok((self.leaf(NodeKind::Literal, Detail::Literal(LiteralKind::String)), false))
            }
            TokenKind::Number => {
                Ok((self.leaf(NodeKind::Literal, Detail::Literal(LiteralKind::Number)), false))
            }
            TokenKind::Identifier | TokenKind::Keyword => {
                Ok((self.parse_identifier_name()?, false))
            }
            _ => Err(self.unexpected("expected a property name")),
        }
    }
}

fn update_operator(text: &str) -> Option<&'static str> {
    match text {
        "++" => Some("++"),
        "--" => Some("--"),
        _ => None,
    }
}
