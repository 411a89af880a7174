use thiserror::Error;

use crate::ids::ObjectRef;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("no {0:?} in the asset store")]
    Missing(ObjectRef),
    #[error("expected a {expected}, found {found:?}")]
    UnexpectedKind {
        expected: &'static str,
        found: ObjectRef,
    },
}
