pub(crate) mod max_depth;
