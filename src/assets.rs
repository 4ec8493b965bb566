pub(crate) mod background;
pub(crate) mod decode;
pub(crate) mod overlay;
