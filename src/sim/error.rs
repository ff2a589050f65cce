//! Construction-time errors for geometry and bodies
//!
//! Anything that can go wrong in the collision core goes wrong when a value is
//! built. Queries and steps never fail.

use thiserror::Error;

/// Rejected geometry or body construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{what} must be finite, got {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("rectangle corners are inverted: ({top_x}, {top_y}) to ({bottom_x}, {bottom_y})")]
    InvertedCorners {
        top_x: f64,
        top_y: f64,
        bottom_x: f64,
        bottom_y: f64,
    },

    #[error("rectangle extent must be non-negative, got width {width} and height {height}")]
    NegativeExtent { width: f64, height: f64 },

    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("tolerance epsilon must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("block layout produces {count} blocks, more than the limit of {limit}")]
    TooManyBlocks { count: usize, limit: usize },
}

/// Reject NaN and infinities with a descriptive error
pub(crate) fn ensure_finite(what: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::NonFinite { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("x", 3.5), Ok(3.5));
        assert!(matches!(
            ensure_finite("x", f64::NAN),
            Err(GeometryError::NonFinite { what: "x", .. })
        ));
        assert!(ensure_finite("y", f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = GeometryError::NonPositiveRadius(0.0);
        assert_eq!(err.to_string(), "radius must be positive, got 0");
    }
}
