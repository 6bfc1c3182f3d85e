//! Argument checks shared by every ledger operation.

use crate::error::OperationError;

/// Fail with an arity error unless exactly `expected` arguments were supplied.
pub fn validate_arg_count(
    operation: &str,
    args: &[String],
    expected: usize,
) -> Result<(), OperationError> {
    if args.len() != expected {
        return Err(OperationError::Arity {
            operation: operation.to_string(),
            expected,
        });
    }
    Ok(())
}

/// True iff `value` is present and non-empty after trimming whitespace.
///
/// Doubles as the stored-record existence predicate: a key whose stored value is
/// blank is indistinguishable from an absent key.
pub fn validate_non_empty(value: Option<&str>) -> bool {
    matches!(value, Some(s) if !s.trim().is_empty())
}

/// Parse a decimal argument with standard float rules. Whitespace is not trimmed.
///
/// Only finite amounts are accepted; `inf` and `NaN` have no JSON number form.
pub fn parse_amount(operation: &str, input: &str) -> Result<f64, OperationError> {
    let parse_error = |reason: String| OperationError::Parse {
        operation: operation.to_string(),
        input: input.to_string(),
        reason,
    };
    let amount = input
        .parse::<f64>()
        .map_err(|e| parse_error(e.to_string()))?;
    if !amount.is_finite() {
        return Err(parse_error("amount must be finite".to_string()));
    }
    Ok(amount)
}
