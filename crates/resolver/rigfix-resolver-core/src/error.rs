use rigfix_animation::AssetError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    /// The controller graph references an object the cloner cannot handle.
    #[error("unknown type referenced from animator: {type_name}")]
    UnsupportedReference { type_name: String },
    #[error(transparent)]
    Asset(#[from] AssetError),
}
