//! Logical functions

use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::Value;

/// IF(condition, if_true, [if_false])
pub fn fn_if(args: &[Value]) -> FormulaResult<Value> {
    let condition = args
        .first()
        .ok_or_else(|| FormulaError::Argument("IF requires a condition".into()))?
        .to_bool()?;

    if condition {
        args.get(1)
            .cloned()
            .ok_or_else(|| FormulaError::Argument("IF requires a true branch".into()))
    } else {
        Ok(args.get(2).cloned().unwrap_or(Value::Boolean(false)))
    }
}

/// Truth values an argument contributes: scalars yield one, ranges one per member
fn truth_values(arg: &Value) -> FormulaResult<Vec<bool>> {
    match arg {
        Value::Range(values) => Ok(values.iter().map(|n| *n != 0.0).collect()),
        v => Ok(vec![v.to_bool()?]),
    }
}

/// AND(...) - true unless any argument is falsy
pub fn fn_and(args: &[Value]) -> FormulaResult<Value> {
    for arg in args {
        if truth_values(arg)?.into_iter().any(|b| !b) {
            return Ok(Value::Boolean(false));
        }
    }
    Ok(Value::Boolean(true))
}

/// OR(...) - false unless any argument is truthy
pub fn fn_or(args: &[Value]) -> FormulaResult<Value> {
    for arg in args {
        if truth_values(arg)?.into_iter().any(|b| b) {
            return Ok(Value::Boolean(true));
        }
    }
    Ok(Value::Boolean(false))
}

/// NOT(value)
pub fn fn_not(args: &[Value]) -> FormulaResult<Value> {
    let value = args
        .first()
        .ok_or_else(|| FormulaError::Argument("NOT requires 1 argument".into()))?
        .to_bool()?;
    Ok(Value::Boolean(!value))
}
