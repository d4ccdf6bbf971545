//! DOM operation errors

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node not found")]
    NotFound,

    #[error("node is not an element")]
    NotAnElement,

    #[error("node is not a child of the given parent")]
    NotAChild,

    #[error("operation would create a cycle")]
    HierarchyRequest,
}
