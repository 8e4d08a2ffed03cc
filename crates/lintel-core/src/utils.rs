use lintel_syntax::{NodeKind, NodeRef, TextRange, Token, TokenKind, Tree};

/// The range to delete in order to remove `range` from `source` cleanly.
///
/// If nothing but whitespace surrounds `range` on its line, the whole line
/// goes (line ending included). Otherwise the whitespace just before
/// `range` goes with it.
pub fn removal_range(source: &str, range: TextRange) -> TextRange {
    let line_start = source[..range.start()].rfind('\n').map_or(0, |pos| pos + 1);
    let line_end = source[range.end()..]
        .find('\n')
        .map_or(source.len(), |pos| range.end() + pos + 1);

    let before = &source[line_start..range.start()];
    let after = &source[range.end()..line_end];

    if before.trim().is_empty() && after.trim().is_empty() {
        TextRange::new(line_start, line_end)
    } else {
        let trimmed = before.trim_end().len();
        TextRange::new(line_start + trimmed, range.end())
    }
}

/// Whether a statement can be removed without leaving its parent without a
/// body (`if (x) debugger;`).
pub fn is_in_statement_list(node: NodeRef<'_>) -> bool {
    node.parent().is_some_and(|parent| {
        matches!(parent.kind(), NodeKind::Program | NodeKind::BlockStatement)
    })
}

/// The first non-trivia token of `node` whose text is `text`.
pub fn find_token<'t>(tree: &'t Tree, range: TextRange, text: &str) -> Option<&'t Token> {
    tree.tokens_in(range).iter().find(|token| {
        !token.kind.is_trivia() && token.kind != TokenKind::Eof && token.text(tree.source()) == text
    })
}
