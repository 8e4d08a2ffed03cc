mod directive;

pub use directive::DIRECTIVE_PREFIX;
pub use directive::Directive;
pub use directive::DirectiveError;
pub use directive::LintDirective;
pub use directive::parse_comment_directive;
