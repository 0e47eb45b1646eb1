use thiserror::Error;

/// Failures raised by geometric queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The operation has no implementation for this curve representation.
    /// Raised instead of a silent wrong answer, NURBS curves in particular.
    #[error("{operation} is not implemented for {curve} curves")]
    Unsupported {
        operation: &'static str,
        curve: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, GeometryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeometryError::Unsupported {
            operation: "is_containing_points",
            curve: "Nurbs",
        };
        assert_eq!(
            err.to_string(),
            "is_containing_points is not implemented for Nurbs curves"
        );
    }
}
