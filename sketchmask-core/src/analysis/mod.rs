pub(crate) mod analyzer;
pub(crate) mod feather;
pub(crate) mod guidance;
pub(crate) mod options;
pub(crate) mod structure;
