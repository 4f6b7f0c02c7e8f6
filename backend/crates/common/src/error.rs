use thiserror::Error;

#[derive(Debug, Error)]
pub enum NextupError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type NextupResult<T> = Result<T, NextupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_prefix() {
        let err = NextupError::Validation("expected a JSON array".to_string());
        assert_eq!(err.to_string(), "validation error: expected a JSON array");

        let err = NextupError::Upstream("HTTP 503".to_string());
        assert_eq!(err.to_string(), "upstream error: HTTP 503");
    }
}
