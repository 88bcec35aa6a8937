pub(crate) mod chapters;
pub(crate) mod snapshot;
pub(crate) mod style;
