pub(crate) mod no_global_assign;
