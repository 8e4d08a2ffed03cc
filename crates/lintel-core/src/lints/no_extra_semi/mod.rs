pub(crate) mod no_extra_semi;
