pub(crate) mod cell;
pub(crate) mod queue;
