pub(crate) mod elements;
pub(crate) mod registry;
pub(crate) mod scene;
pub(crate) mod svg;
