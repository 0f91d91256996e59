use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An argument outside the domain a routine is defined on
    InvalidParameter {
        parameter: String,
        value: String,
        constraint: String,
    },

    /// Two collections that must line up do not
    DimensionMismatch {
        expected: usize,
        got: usize,
        context: String,
    },

    /// The boundary line `-w0/w1 * x` has no slope when `w1 == 0`
    DegenerateBoundary { weights: Vec<f64> },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter {
                parameter,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}' = '{}': must satisfy {}",
                    parameter, value, constraint
                )
            }
            Error::DimensionMismatch {
                expected,
                got,
                context,
            } => {
                write!(
                    f,
                    "Dimension mismatch in {}: expected {}, got {}",
                    context, expected, got
                )
            }
            Error::DegenerateBoundary { weights } => {
                write!(
                    f,
                    "Cannot draw decision boundary for weights {:?}: second weight is zero",
                    weights
                )
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    pub fn dimension_mismatch(expected: usize, got: usize, context: impl Into<String>) -> Self {
        Error::DimensionMismatch {
            expected,
            got,
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_parameter() {
        let err = Error::invalid_parameter("size", 0, "size > 0");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'size' = '0': must satisfy size > 0"
        );
    }

    #[test]
    fn display_dimension_mismatch() {
        let err = Error::dimension_mismatch(4, 3, "labels");
        assert_eq!(err.to_string(), "Dimension mismatch in labels: expected 4, got 3");
    }
}
