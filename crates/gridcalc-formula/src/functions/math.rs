//! Scalar math functions

use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::Value;

/// Fetch a required numeric argument
fn number_arg(args: &[Value], idx: usize, function: &str) -> FormulaResult<f64> {
    match args.get(idx) {
        Some(v) => v.to_number(),
        None => Err(FormulaError::Argument(format!(
            "{} is missing argument {}",
            function,
            idx + 1
        ))),
    }
}

/// ABS(number)
pub fn fn_abs(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(number_arg(args, 0, "ABS")?.abs()))
}

/// SQRT(number) - errors on negative input, no complex results
pub fn fn_sqrt(args: &[Value]) -> FormulaResult<Value> {
    let x = number_arg(args, 0, "SQRT")?;
    if x < 0.0 {
        return Err(FormulaError::Argument(
            "SQRT of a negative number".into(),
        ));
    }
    Ok(Value::Number(x.sqrt()))
}

/// POWER(base, exponent)
pub fn fn_power(args: &[Value]) -> FormulaResult<Value> {
    let base = number_arg(args, 0, "POWER")?;
    let exp = number_arg(args, 1, "POWER")?;
    let result = base.powf(exp);
    if result.is_finite() {
        Ok(Value::Number(result))
    } else {
        Err(FormulaError::Evaluation("POWER out of range".into()))
    }
}

/// MOD(number, divisor) - result has the same sign as the divisor
/// (Excel semantics: number - divisor * FLOOR(number / divisor))
pub fn fn_mod(args: &[Value]) -> FormulaResult<Value> {
    let number = number_arg(args, 0, "MOD")?;
    let divisor = number_arg(args, 1, "MOD")?;

    if divisor == 0.0 {
        return Err(FormulaError::Evaluation("MOD by zero".into()));
    }

    Ok(Value::Number(number - divisor * (number / divisor).floor()))
}

/// ROUND(number, [num_digits]) - rounds half away from zero
pub fn fn_round(args: &[Value]) -> FormulaResult<Value> {
    let number = number_arg(args, 0, "ROUND")?;
    let num_digits = match args.get(1) {
        Some(v) => v.to_number()? as i32,
        None => 0,
    };

    // Negative digits round to the left of the decimal point
    let multiplier = 10_f64.powi(num_digits);
    let result = if number >= 0.0 {
        (number * multiplier + 0.5).floor() / multiplier
    } else {
        (number * multiplier - 0.5).ceil() / multiplier
    };

    Ok(Value::Number(result))
}

/// CEILING(number)
pub fn fn_ceiling(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(number_arg(args, 0, "CEILING")?.ceil()))
}

/// FLOOR(number)
pub fn fn_floor(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(number_arg(args, 0, "FLOOR")?.floor()))
}

/// LOG10(number) - errors on non-positive input
pub fn fn_log10(args: &[Value]) -> FormulaResult<Value> {
    let x = number_arg(args, 0, "LOG10")?;
    if x <= 0.0 {
        return Err(FormulaError::Argument(
            "LOG10 of a non-positive number".into(),
        ));
    }
    Ok(Value::Number(x.log10()))
}

/// SIN(angle) - angle in radians
pub fn fn_sin(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(number_arg(args, 0, "SIN")?.sin()))
}

/// COS(angle) - angle in radians
pub fn fn_cos(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(number_arg(args, 0, "COS")?.cos()))
}

/// TAN(angle) - angle in radians
pub fn fn_tan(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(number_arg(args, 0, "TAN")?.tan()))
}

/// PI()
pub fn fn_pi(_args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(std::f64::consts::PI))
}

/// E()
pub fn fn_e(_args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(std::f64::consts::E))
}

/// RANDOM() - uniform in [0, 1); volatile
pub fn fn_random(_args: &[Value]) -> FormulaResult<Value> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    Ok(Value::Number(rng.gen::<f64>()))
}

/// RANDBETWEEN(bottom, top) - uniform integer, both bounds inclusive; volatile
pub fn fn_randbetween(args: &[Value]) -> FormulaResult<Value> {
    use rand::Rng;

    let bottom = number_arg(args, 0, "RANDBETWEEN")?.ceil() as i64;
    let top = number_arg(args, 1, "RANDBETWEEN")?.floor() as i64;

    if bottom > top {
        return Err(FormulaError::Argument(
            "RANDBETWEEN bounds are reversed".into(),
        ));
    }

    let mut rng = rand::thread_rng();
    Ok(Value::Number(rng.gen_range(bottom..=top) as f64))
}
