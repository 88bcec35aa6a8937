pub(crate) mod connector;
pub(crate) mod placement;
pub(crate) mod projection;
