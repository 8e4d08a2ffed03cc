use std::sync::Arc;

use crate::rule_table::Rule;

pub(crate) mod eqeqeq;
pub(crate) mod max_depth;
pub(crate) mod no_debugger;
pub(crate) mod no_extra_semi;
pub(crate) mod no_global_assign;
pub(crate) mod no_undef;
pub(crate) mod no_unused_vars;
pub(crate) mod no_var;
pub(crate) mod prefer_const;
pub(crate) mod semi;

/// The rules shipped with lintel, in registration order.
pub fn builtin_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(no_undef::no_undef::NoUndef),
        Arc::new(no_global_assign::no_global_assign::NoGlobalAssign),
        Arc::new(no_unused_vars::no_unused_vars::NoUnusedVars),
        Arc::new(eqeqeq::eqeqeq::Eqeqeq),
        Arc::new(no_extra_semi::no_extra_semi::NoExtraSemi),
        Arc::new(semi::semi::Semi),
        Arc::new(no_var::no_var::NoVar),
        Arc::new(prefer_const::prefer_const::PreferConst),
        Arc::new(max_depth::max_depth::MaxDepth),
        Arc::new(no_debugger::no_debugger::NoDebugger),
    ]
}
