pub(crate) mod no_var;
