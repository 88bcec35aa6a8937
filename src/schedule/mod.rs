pub(crate) mod appearance;
pub(crate) mod phases;
pub(crate) mod plan;
pub(crate) mod remote;
