//! Selectors subscribe rule callbacks to positions in the tree.
//!
//! ```text
//! BinaryExpression[operator="=="]
//! VariableDeclaration[kind=var]:exit
//! ForStatement > VariableDeclaration, ForInStatement VariableDeclaration
//! *
//! ```
//!
//! A selector is a comma separated list of alternatives. An alternative is a
//! chain of compounds joined by `>` (parent) or whitespace (ancestor); the
//! last compound names the node the callback receives. A compound is a node
//! kind or `*`, followed by attribute tests. `:exit` at the end of an
//! alternative fires the callback after the node's children were visited.

use lintel_syntax::{Detail, NodeKind, NodeRef};

use crate::error::SelectorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Enter,
    Exit,
}

/// A parsed selector string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub(crate) alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(selector: &str) -> Result<Selector, SelectorError> {
        SelectorParser { input: selector, pos: 0 }.parse()
    }

    /// Whether any alternative matches `node` in `phase`.
    pub fn matches(&self, node: NodeRef<'_>, phase: Phase) -> bool {
        self.alternatives
            .iter()
            .any(|alternative| alternative.phase == phase && alternative.matches(node))
    }
}

/// One alternative of a selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Complex {
    pub(crate) phase: Phase,
    /// Compounds from the outermost to the subject. The combinator of a
    /// part relates it to the part before it; the first one is unused.
    parts: Vec<(Combinator, Compound)>,
}

impl Complex {
    /// The kind of the nodes this alternative can match, `None` for `*`.
    pub(crate) fn subject_kind(&self) -> Option<NodeKind> {
        self.parts.last().and_then(|(_, compound)| compound.kind)
    }

    pub(crate) fn matches(&self, node: NodeRef<'_>) -> bool {
        self.matches_at(node, self.parts.len() - 1)
    }

    fn matches_at(&self, node: NodeRef<'_>, index: usize) -> bool {
        let (combinator, compound) = &self.parts[index];
        if !compound.matches(node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => node
                .parent()
                .is_some_and(|parent| self.matches_at(parent, index - 1)),
            Combinator::Descendant => node
                .ancestors()
                .any(|ancestor| self.matches_at(ancestor, index - 1)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    kind: Option<NodeKind>,
    attributes: Vec<Attribute>,
}

impl Compound {
    fn matches(&self, node: NodeRef<'_>) -> bool {
        self.kind.is_none_or(|kind| node.kind() == kind)
            && self.attributes.iter().all(|attribute| attribute.matches(node))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeName {
    Operator,
    Kind,
    Name,
    Prefix,
    Computed,
}

impl AttributeName {
    fn from_str(name: &str) -> Option<Self> {
        match name {
            "operator" => Some(AttributeName::Operator),
            "kind" => Some(AttributeName::Kind),
            "name" => Some(AttributeName::Name),
            "prefix" => Some(AttributeName::Prefix),
            "computed" => Some(AttributeName::Computed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Attribute {
    name: AttributeName,
    /// `None` tests for presence (or truth, for boolean attributes).
    value: Option<String>,
}

impl Attribute {
    fn matches(&self, node: NodeRef<'_>) -> bool {
        let actual: Option<String> = match self.name {
            AttributeName::Operator => node.detail().operator().map(str::to_string),
            AttributeName::Kind => node
                .detail()
                .declaration_kind()
                .map(|kind| kind.as_str().to_string()),
            AttributeName::Name => node.name().map(str::to_string),
            AttributeName::Prefix => match node.detail() {
                Detail::Operator { prefix, .. } => Some(prefix.to_string()),
                _ => None,
            },
            AttributeName::Computed => match node.detail() {
                Detail::Member { .. } | Detail::Property { .. } => {
                    Some(node.detail().is_computed().to_string())
                }
                _ => None,
            },
        };

        match (&self.value, actual) {
            (Some(expected), Some(actual)) => *expected == actual,
            (None, Some(actual)) => {
                !matches!(self.name, AttributeName::Prefix | AttributeName::Computed)
                    || actual == "true"
            }
            (_, None) => false,
        }
    }
}

struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    fn parse(mut self) -> Result<Selector, SelectorError> {
        let mut alternatives = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek().is_none() {
                return Err(if alternatives.is_empty() {
                    SelectorError::Empty
                } else {
                    SelectorError::UnexpectedEnd { expected: "a selector after `,`" }
                });
            }
            alternatives.push(self.complex()?);
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some(',') => self.pos += 1,
                Some(found) => return Err(SelectorError::Unexpected { found, offset: self.pos }),
            }
        }
        Ok(Selector { alternatives })
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        let mut parts = vec![(Combinator::Descendant, self.compound()?)];
        loop {
            if self.eat(":") {
                self.expect_word("exit")?;
                self.skip_whitespace();
                return match self.peek() {
                    None | Some(',') => Ok(Complex { phase: Phase::Exit, parts }),
                    Some(_) => Err(SelectorError::MisplacedExit),
                };
            }

            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(found) => return Err(SelectorError::Unexpected { found, offset: self.pos }),
            };
            parts.push((combinator, self.compound()?));
        }
        Ok(Complex { phase: Phase::Enter, parts })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let kind = if self.eat("*") {
            None
        } else {
            let name = self.identifier("a node kind")?;
            let kind = NodeKind::from_name(name)
                .ok_or_else(|| SelectorError::UnknownKind(name.to_string()))?;
            Some(kind)
        };

        let mut attributes = Vec::new();
        while self.eat("[") {
            self.skip_whitespace();
            let name = self.identifier("an attribute name")?;
            let name = AttributeName::from_str(name)
                .ok_or_else(|| SelectorError::UnknownAttribute(name.to_string()))?;
            self.skip_whitespace();
            let value = if self.eat("=") {
                self.skip_whitespace();
                let value = self.value()?;
                self.skip_whitespace();
                Some(value)
            } else {
                None
            };
            if !self.eat("]") {
                return Err(self.unexpected("`]`"));
            }
            attributes.push(Attribute { name, value });
        }

        Ok(Compound { kind, attributes })
    }

    fn value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let rest = &self.input[self.pos..];
                let end = rest
                    .find(quote)
                    .ok_or(SelectorError::UnexpectedEnd { expected: "a closing quote" })?;
                let value = rest[..end].to_string();
                self.pos += end + 1;
                Ok(value)
            }
            _ => {
                let rest = &self.input[self.pos..];
                let end = rest
                    .find(|c: char| c == ']' || c.is_whitespace())
                    .unwrap_or(rest.len());
                if end == 0 {
                    return Err(self.unexpected("an attribute value"));
                }
                self.pos += end;
                Ok(rest[..end].to_string())
            }
        }
    }

    fn identifier(&mut self, expected: &'static str) -> Result<&'a str, SelectorError> {
        let input = self.input;
        let rest = &input[self.pos..];
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(self.unexpected(expected));
        }
        self.pos += end;
        Ok(&rest[..end])
    }

    fn expect_word(&mut self, word: &'static str) -> Result<(), SelectorError> {
        let start = self.pos;
        match self.identifier("`exit`") {
            Ok(found) if found == word => Ok(()),
            Ok(_) => {
                self.pos = start;
                Err(self.unexpected("`exit`"))
            }
            Err(err) => Err(err),
        }
    }

    fn unexpected(&self, expected: &'static str) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected { found, offset: self.pos },
            None => SelectorError::UnexpectedEnd { expected },
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.input[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Returns whether any whitespace was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let rest = &self.input[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
        rest.len() != trimmed.len()
    }
}

#[cfg(test)]
mod tests {
    use lintel_syntax::{Tree, WalkEvent};

    use super::*;

    /// Text of the nodes entered (or exited) that `selector` matches.
    fn matching(source: &str, selector: &str) -> Vec<String> {
        let selector = Selector::parse(selector).unwrap();
        let tree = Tree::parse(source).unwrap();
        tree.walk()
            .filter_map(|event| match event {
                WalkEvent::Enter(node) if selector.matches(node, Phase::Enter) => {
                    Some(node.text().to_string())
                }
                WalkEvent::Exit(node) if selector.matches(node, Phase::Exit) => {
                    Some(format!("exit {}", node.text()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_kind_and_attributes() {
        let source = "a == b; c === d; e != null; var x = 1; let y = 2;";
        assert_eq!(matching(source, "BinaryExpression[operator=\"==\"]"), vec!["a == b"]);
        assert_eq!(
            matching(source, "BinaryExpression[operator='==='], BinaryExpression[operator=!=]"),
            vec!["c === d", "e != null"]
        );
        assert_eq!(matching(source, "VariableDeclaration[kind=var]"), vec!["var x = 1;"]);
        assert_eq!(matching(source, "Identifier[name=\"y\"]"), vec!["y"]);
    }

    #[test]
    fn test_boolean_attributes() {
        let source = "i++; --j; o.p; o[q];";
        assert_eq!(matching(source, "UpdateExpression[prefix]"), vec!["--j"]);
        assert_eq!(matching(source, "UpdateExpression[prefix=false]"), vec!["i++"]);
        assert_eq!(matching(source, "MemberExpression[computed]"), vec!["o[q]"]);
        assert_eq!(matching(source, "MemberExpression[computed=false]"), vec!["o.p"]);
    }

    #[test]
    fn test_combinators() {
        let source = "function f() { if (a) { b(); } } c();";
        assert_eq!(
            matching(source, "FunctionDeclaration CallExpression"),
            vec!["b()"]
        );
        assert_eq!(
            matching(source, "Program > ExpressionStatement > CallExpression"),
            vec!["c()"]
        );
        assert_eq!(
            matching(source, "IfStatement > BlockStatement CallExpression > Identifier"),
            vec!["b"]
        );
        assert!(matching(source, "IfStatement > CallExpression").is_empty());
    }

    #[test]
    fn test_exit_phase_and_wildcard() {
        let source = "{ x; }";
        assert_eq!(matching(source, "BlockStatement:exit"), vec!["exit { x; }"]);
        assert_eq!(
            matching(source, "BlockStatement, BlockStatement:exit"),
            vec!["{ x; }", "exit { x; }"]
        );
        assert_eq!(
            matching(source, "BlockStatement > *"),
            vec!["x;"]
        );
        let selector = Selector::parse("*").unwrap();
        assert_eq!(selector.alternatives[0].subject_kind(), None);
    }

    #[test]
    fn test_invalid_selectors() {
        assert_eq!(Selector::parse("  "), Err(SelectorError::Empty));
        assert_eq!(
            Selector::parse("Expression"),
            Err(SelectorError::UnknownKind("Expression".to_string()))
        );
        assert_eq!(
            Selector::parse("Identifier[type=x]"),
            Err(SelectorError::UnknownAttribute("type".to_string()))
        );
        assert_eq!(
            Selector::parse("Identifier:exit > Literal"),
            Err(SelectorError::MisplacedExit)
        );
        assert_eq!(
            Selector::parse("Identifier:enter"),
            Err(SelectorError::Unexpected { found: 'e', offset: 11 })
        );
        assert_eq!(
            Selector::parse("Identifier[name=\"x]"),
            Err(SelectorError::UnexpectedEnd { expected: "a closing quote" })
        );
        assert_eq!(
            Selector::parse("Identifier,"),
            Err(SelectorError::UnexpectedEnd { expected: "a selector after `,`" })
        );
        assert_eq!(
            Selector::parse("Identifier]"),
            Err(SelectorError::Unexpected { found: ']', offset: 10 })
        );
    }
}
