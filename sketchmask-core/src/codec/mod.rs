pub(crate) mod encoded;
pub(crate) mod limits;
pub(crate) mod mask;
