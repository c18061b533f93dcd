use thiserror::Error;

/// Errors raised by the tax engine.
///
/// Every variant is detected before any computation starts, so the engine
/// never hands back a partially-populated result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxEngineError {
    /// A monetary field was negative. `field` is the wire name of the field.
    #[error("invalid input: '{field}' must be a non-negative amount")]
    InvalidInput { field: &'static str },

    /// An amount exceeded [`crate::MAX_AMOUNT`], or a sum of amounts
    /// overflowed. `field` is the wire name of the offending field.
    #[error("invalid input: '{field}' exceeds the largest supported amount")]
    AmountTooLarge { field: &'static str },

    /// A mandatory field was absent or zero.
    #[error("missing required field '{0}'")]
    MissingRequiredField(&'static str),

    /// No rule table exists for the requested financial year.
    #[error("unsupported tax year '{0}'")]
    UnsupportedTaxYear(String),

    /// A rule table failed validation.
    #[error("invalid tax rules for {year}: {reason}")]
    InvalidRules { year: String, reason: String },
}

impl TaxEngineError {
    /// Stable machine-readable code, used by the HTTP layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::AmountTooLarge { .. } => "AMOUNT_TOO_LARGE",
            Self::MissingRequiredField(_) => "MISSING_REQUIRED_FIELD",
            Self::UnsupportedTaxYear(_) => "UNSUPPORTED_TAX_YEAR",
            Self::InvalidRules { .. } => "INVALID_RULES",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn invalid_input_message_names_field() {
        let err = TaxEngineError::InvalidInput {
            field: "deduction80C_elss",
        };

        assert_eq!(
            err.to_string(),
            "invalid input: 'deduction80C_elss' must be a non-negative amount"
        );
    }

    #[test]
    fn codes_are_distinct() {
        let codes = [
            TaxEngineError::InvalidInput { field: "basic" }.code(),
            TaxEngineError::AmountTooLarge { field: "basic" }.code(),
            TaxEngineError::MissingRequiredField("basic").code(),
            TaxEngineError::UnsupportedTaxYear("1999-00".to_string()).code(),
            TaxEngineError::InvalidRules {
                year: "2024-25".to_string(),
                reason: "x".to_string(),
            }
            .code(),
        ];

        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
