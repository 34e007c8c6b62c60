//! Statistical aggregate functions
//!
//! These accept any mix of scalar and range arguments. Ranges arrive already
//! expanded to their numeric members (non-numeric cells dropped); scalar
//! non-numeric arguments are ignored rather than rejected, matching the
//! permissive aggregation policy.

use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::Value;

/// Flatten arguments to the numeric values they contribute
fn numeric_values(args: &[Value]) -> Vec<f64> {
    let mut out = Vec::new();
    for arg in args {
        match arg {
            Value::Number(n) => out.push(*n),
            Value::Range(values) => out.extend_from_slice(values),
            _ => {} // Ignore non-numeric scalars
        }
    }
    out
}

/// SUM - 0 for an empty list
pub fn fn_sum(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(numeric_values(args).iter().sum()))
}

/// AVERAGE - errors on an empty list
pub fn fn_average(args: &[Value]) -> FormulaResult<Value> {
    let values = numeric_values(args);
    if values.is_empty() {
        return Err(FormulaError::Evaluation("AVERAGE of no values".into()));
    }
    Ok(Value::Number(
        values.iter().sum::<f64>() / values.len() as f64,
    ))
}

/// COUNT - number of numeric members (may be 0)
pub fn fn_count(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(numeric_values(args).len() as f64))
}

/// MAX - errors on an empty list
pub fn fn_max(args: &[Value]) -> FormulaResult<Value> {
    numeric_values(args)
        .into_iter()
        .reduce(f64::max)
        .map(Value::Number)
        .ok_or_else(|| FormulaError::Evaluation("MAX of no values".into()))
}

/// MIN - errors on an empty list
pub fn fn_min(args: &[Value]) -> FormulaResult<Value> {
    numeric_values(args)
        .into_iter()
        .reduce(f64::min)
        .map(Value::Number)
        .ok_or_else(|| FormulaError::Evaluation("MIN of no values".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: FormulaResult<Value>) -> f64 {
        match v.unwrap() {
            Value::Number(n) => n,
            other => panic!("expected number, got {:?}", other),
        }
    }

    #[test]
    fn test_sum() {
        assert_eq!(
            num(fn_sum(&[Value::Number(1.0), Value::Number(2.0)])),
            3.0
        );
        assert_eq!(num(fn_sum(&[Value::Range(vec![10.0, 20.0, 30.0])])), 60.0);
        // Mixed scalar + range
        assert_eq!(
            num(fn_sum(&[Value::Number(5.0), Value::Range(vec![1.0, 2.0])])),
            8.0
        );
        // Empty range sums to zero
        assert_eq!(num(fn_sum(&[Value::Range(vec![])])), 0.0);
        // Non-numeric scalars are ignored
        assert_eq!(
            num(fn_sum(&[Value::Number(1.0), Value::String("x".into())])),
            1.0
        );
    }

    #[test]
    fn test_average() {
        assert_eq!(num(fn_average(&[Value::Range(vec![10.0, 20.0, 30.0])])), 20.0);
        assert!(fn_average(&[Value::Range(vec![])]).is_err());
    }

    #[test]
    fn test_count() {
        assert_eq!(
            num(fn_count(&[
                Value::Number(1.0),
                Value::String("a".into()),
                Value::Range(vec![2.0, 3.0])
            ])),
            3.0
        );
        assert_eq!(num(fn_count(&[Value::Range(vec![])])), 0.0);
    }

    #[test]
    fn test_max_min() {
        let args = [Value::Range(vec![5.0, 2.0, 8.0, 1.0])];
        assert_eq!(num(fn_max(&args)), 8.0);
        assert_eq!(num(fn_min(&args)), 1.0);

        assert!(fn_max(&[Value::Range(vec![])]).is_err());
        assert!(fn_min(&[Value::Range(vec![])]).is_err());
    }
}
