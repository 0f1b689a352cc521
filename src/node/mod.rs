pub(crate) mod flags;
pub(crate) mod iter;
pub(crate) mod kind;
pub(crate) mod tree;
