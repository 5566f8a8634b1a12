use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum FacetNavError {
    #[error("Illegal name: {0}")]
    IllegalName(String),

    #[error("Namespace error: {0}")]
    Namespace(String),

    #[error("Malformed path: {0}")]
    MalformedPath(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Tantivy error: {0}")]
    Tantivy(String),
}

pub type Result<T> = std::result::Result<T, FacetNavError>;

impl FacetNavError {
    /// True for the failures a name lookup can produce: illegal name,
    /// unknown namespace prefix or a path where a single name was expected.
    pub fn is_name_error(&self) -> bool {
        matches!(
            self,
            FacetNavError::IllegalName(_)
                | FacetNavError::Namespace(_)
                | FacetNavError::MalformedPath(_)
        )
    }
}

impl From<std::io::Error> for FacetNavError {
    fn from(e: std::io::Error) -> Self {
        FacetNavError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for FacetNavError {
    fn from(e: serde_json::Error) -> Self {
        FacetNavError::Json(e.to_string())
    }
}

#[cfg(feature = "tantivy-engine")]
impl From<tantivy::TantivyError> for FacetNavError {
    fn from(e: tantivy::TantivyError) -> Self {
        FacetNavError::Tantivy(e.to_string())
    }
}
