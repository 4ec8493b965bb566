pub(crate) mod tiler;
pub(crate) mod units;
