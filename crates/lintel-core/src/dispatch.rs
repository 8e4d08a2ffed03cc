//! Single-pass dispatch of rule listeners.
//!
//! Every active rule hands over its listeners, each a selector string and a
//! callback. The dispatcher parses the selectors once, sorts the listeners
//! into per-kind tables, and then walks the tree a single time, calling the
//! listeners whose selector matches the node being entered or left.

use lintel_syntax::{NodeKind, NodeRef, Tree, WalkEvent};

use crate::error::EngineError;
use crate::selector::{Phase, Selector};

pub type Callback<'a> = Box<dyn FnMut(NodeRef<'a>) -> anyhow::Result<()> + 'a>;

/// The listeners of one rule, in the order they were added.
#[derive(Default)]
pub struct Listeners<'a> {
    entries: Vec<(String, Callback<'a>)>,
}

impl<'a> Listeners<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `callback` on every node matching `selector`.
    pub fn on(
        mut self,
        selector: &str,
        callback: impl FnMut(NodeRef<'a>) -> anyhow::Result<()> + 'a,
    ) -> Self {
        self.entries.push((selector.to_string(), Box::new(callback)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Listeners<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(selector, _)| selector))
            .finish()
    }
}

struct Listener<'a> {
    selector: Selector,
    callback: Callback<'a>,
}

/// (rule index, listener index)
type Candidate = (usize, usize);

pub struct Dispatcher<'a> {
    rules: Vec<&'static str>,
    listeners: Vec<Vec<Listener<'a>>>,
    /// Indexed by [`NodeKind::index`]. Candidates are sorted by rule, then
    /// by listener.
    enter: Vec<Vec<Candidate>>,
    exit: Vec<Vec<Candidate>>,
}

impl<'a> Dispatcher<'a> {
    /// Build the dispatch plan. Rules are called in the order given here.
    pub fn new(rules: Vec<(&'static str, Listeners<'a>)>) -> Result<Self, EngineError> {
        let mut dispatcher = Dispatcher {
            rules: Vec::with_capacity(rules.len()),
            listeners: Vec::with_capacity(rules.len()),
            enter: vec![Vec::new(); NodeKind::ALL.len()],
            exit: vec![Vec::new(); NodeKind::ALL.len()],
        };

        for (rule_index, (rule, listeners)) in rules.into_iter().enumerate() {
            let mut parsed = Vec::with_capacity(listeners.len());

            for (listener_index, (source, callback)) in listeners.entries.into_iter().enumerate() {
                let selector =
                    Selector::parse(&source).map_err(|reason| EngineError::InvalidSelector {
                        rule: rule.to_string(),
                        selector: source.clone(),
                        reason,
                    })?;

                for alternative in &selector.alternatives {
                    let table = match alternative.phase {
                        Phase::Enter => &mut dispatcher.enter,
                        Phase::Exit => &mut dispatcher.exit,
                    };
                    let candidate = (rule_index, listener_index);
                    match alternative.subject_kind() {
                        Some(kind) => push_unique(&mut table[kind.index()], candidate),
                        None => {
                            for candidates in table.iter_mut() {
                                push_unique(candidates, candidate);
                            }
                        }
                    }
                }

                parsed.push(Listener { selector, callback });
            }

            dispatcher.rules.push(rule);
            dispatcher.listeners.push(parsed);
        }

        tracing::trace!(
            rules = dispatcher.rules.len(),
            listeners = dispatcher.listeners.iter().map(Vec::len).sum::<usize>(),
            "Built dispatch plan"
        );

        Ok(dispatcher)
    }

    /// Walk `tree` once, entering and leaving every node.
    pub fn run(&mut self, tree: &'a Tree) -> Result<(), EngineError> {
        for event in tree.walk() {
            let (node, phase) = match event {
                WalkEvent::Enter(node) => (node, Phase::Enter),
                WalkEvent::Exit(node) => (node, Phase::Exit),
            };
            let candidates = match phase {
                Phase::Enter => &self.enter[node.kind().index()],
                Phase::Exit => &self.exit[node.kind().index()],
            };

            for &(rule_index, listener_index) in candidates {
                let listener = &mut self.listeners[rule_index][listener_index];
                if !listener.selector.matches(node, phase) {
                    continue;
                }
                if let Err(source) = (listener.callback)(node) {
                    let location = tree.line_col(node.range().start());
                    return Err(EngineError::RuleFault {
                        rule: self.rules[rule_index].to_string(),
                        kind: node.kind(),
                        line: location.line,
                        column: location.column,
                        source,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Candidates are pushed in sorted order, so a duplicate can only be the
/// last one (a selector list whose alternatives share a subject kind).
fn push_unique(candidates: &mut Vec<Candidate>, candidate: Candidate) {
    if candidates.last() != Some(&candidate) {
        candidates.push(candidate);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn record<'a>(log: &'a RefCell<Vec<String>>, tag: &'static str) -> Callback<'a> {
        Box::new(move |node: NodeRef<'a>| {
            log.borrow_mut().push(format!("{tag}:{}", node.text()));
            Ok(())
        })
    }

    fn listeners<'a>(
        log: &'a RefCell<Vec<String>>,
        entries: &[(&str, &'static str)],
    ) -> Listeners<'a> {
        let mut listeners = Listeners::new();
        for (selector, tag) in entries {
            listeners = listeners.on(selector, record(log, *tag));
        }
        listeners
    }

    #[test]
    fn test_enter_exit_and_rule_order() {
        let tree = Tree::parse("a + b;").unwrap();
        let log = RefCell::new(Vec::new());
        let first = listeners(&log, &[("BinaryExpression:exit", "1-exit"), ("Identifier", "1")]);
        let second = listeners(&log, &[("BinaryExpression", "2-enter"), ("Identifier", "2")]);
        let mut dispatcher = Dispatcher::new(vec![("first", first), ("second", second)]).unwrap();
        dispatcher.run(&tree).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["2-enter:a + b", "1:a", "2:a", "1:b", "2:b", "1-exit:a + b"]
        );
    }

    #[test]
    fn test_selector_list_fires_once_per_node() {
        let tree = Tree::parse("x;").unwrap();
        let log = RefCell::new(Vec::new());
        let mut dispatcher = Dispatcher::new(vec![(
            "rule",
            listeners(&log, &[("Identifier, Identifier[name=x], *", "hit")]),
        )])
        .unwrap();
        dispatcher.run(&tree).unwrap();

        // Program, ExpressionStatement, then the identifier only once.
        assert_eq!(*log.borrow(), vec!["hit:x;", "hit:x;", "hit:x"]);
    }

    #[test]
    fn test_relational_selectors() {
        let tree = Tree::parse("for (var i = 0;;) { var j; }").unwrap();
        let log = RefCell::new(Vec::new());
        let mut dispatcher = Dispatcher::new(vec![(
            "rule",
            listeners(
                &log,
                &[
                    ("ForStatement > VariableDeclaration", "head"),
                    ("ForStatement VariableDeclaration", "any"),
                ],
            ),
        )])
        .unwrap();
        dispatcher.run(&tree).unwrap();

        assert_eq!(*log.borrow(), vec!["head:var i = 0", "any:var i = 0", "any:var j;"]);
    }

    #[test]
    fn test_invalid_selector() {
        let log = RefCell::new(Vec::new());
        let Err(error) = Dispatcher::new(vec![("rule", listeners(&log, &[("Nope", "x")]))]) else {
            panic!("expected an invalid selector");
        };
        insta::assert_snapshot!(
            error,
            @"rule `rule` has an invalid selector `Nope`: unknown node kind `Nope`"
        );
    }

    #[test]
    fn test_callback_error_aborts() {
        let tree = Tree::parse("a;\nb;").unwrap();
        let calls = RefCell::new(0);
        let mut dispatcher = Dispatcher::new(vec![(
            "broken",
            Listeners::new().on("Identifier", |node| {
                *calls.borrow_mut() += 1;
                anyhow::ensure!(node.text() != "b", "cannot handle `b`");
                Ok(())
            }),
        )])
        .unwrap();

        let error = dispatcher.run(&tree).unwrap_err();
        insta::assert_snapshot!(error, @"rule `broken` failed on `Identifier` at 2:1");
        assert_eq!(*calls.borrow(), 2);
    }
}
