//! Formula evaluator
//!
//! Walks a parsed AST against an [`EvaluationContext`] and produces a typed
//! value. Internal code is `Result`-based and exception-free; the public
//! [`evaluate`] entry point is total and collapses every failure to the
//! `"#ERROR!"` sentinel.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::context::EvaluationContext;
use crate::error::{FormulaError, FormulaResult};
use crate::functions::FunctionRegistry;
use crate::parser::parse_formula;
use gridcalc_core::CellValue;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Global function registry (lazily initialized, read-only after init)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

fn function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Value types during formula evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
    /// Numeric members of an expanded range, row-major
    Range(Vec<f64>),
}

impl Value {
    /// Force conversion to a number for arithmetic
    pub fn to_number(&self) -> FormulaResult<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Boolean(true) => Ok(1.0),
            Value::Boolean(false) => Ok(0.0),
            Value::String(s) => s.trim().parse().map_err(|_| {
                FormulaError::Evaluation(format!("Cannot convert '{}' to number", s))
            }),
            Value::Range(_) => Err(FormulaError::Evaluation(
                "Range used where a single value is required".into(),
            )),
        }
    }

    /// Force conversion to a boolean for conditions
    pub fn to_bool(&self) -> FormulaResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            Value::Number(n) => Ok(*n != 0.0),
            _ => Err(FormulaError::Evaluation(format!(
                "Cannot convert {:?} to boolean",
                self
            ))),
        }
    }

    /// Convert to display text for concatenation
    pub fn as_string(&self) -> String {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Value::String(s) => s.clone(),
            Value::Boolean(true) => "TRUE".to_string(),
            Value::Boolean(false) => "FALSE".to_string(),
            Value::Range(_) => String::new(),
        }
    }
}

/// Evaluate a formula string against a context
///
/// Total: for every input string and every context this returns a
/// [`CellValue`], never panics and never returns a `Result`. Inputs that do
/// not start with `=` pass through unchanged as string literals.
///
/// # Example
/// ```rust
/// use gridcalc_formula::{evaluate, CellValue, EvaluationContext};
///
/// let ctx = EvaluationContext::new();
/// assert_eq!(evaluate("=(2+3)*4", &ctx), CellValue::Number(20.0));
/// assert_eq!(evaluate("=SQRT(-1)", &ctx), CellValue::Error);
/// assert_eq!(evaluate("hello", &ctx), CellValue::String("hello".into()));
/// ```
pub fn evaluate(formula: &str, ctx: &EvaluationContext) -> CellValue {
    if !formula.trim_start().starts_with('=') {
        return CellValue::String(formula.to_string());
    }

    match parse_formula(formula).and_then(|expr| eval_expr(&expr, ctx)) {
        Ok(value) => finish(value),
        Err(_) => CellValue::Error,
    }
}

/// Convert a final evaluation value into a public cell value
fn finish(value: Value) -> CellValue {
    match value {
        Value::Number(n) if n.is_finite() => CellValue::Number(n),
        Value::Number(_) => CellValue::Error,
        Value::String(s) => CellValue::String(s),
        Value::Boolean(b) => CellValue::Boolean(b),
        // A bare range is not a scalar result
        Value::Range(_) => CellValue::Error,
    }
}

/// Evaluate a formula expression
pub(crate) fn eval_expr(expr: &Expr, ctx: &EvaluationContext) -> FormulaResult<Value> {
    match expr {
        // === Literals ===
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::String(s) => Ok(Value::String(s.clone())),
        Expr::Boolean(b) => Ok(Value::Boolean(*b)),

        // === References ===
        // Missing and non-numeric cells read as zero in arithmetic contexts
        Expr::CellRef(addr) => Ok(Value::Number(ctx.number_at(addr).unwrap_or(0.0))),

        Expr::RangeRef(range) => Ok(Value::Range(ctx.expand_range(range))),

        // === Operators ===
        Expr::BinaryOp { op, left, right } => eval_binary_op(*op, left, right, ctx),

        Expr::UnaryOp { op, operand } => eval_unary_op(*op, operand, ctx),

        // === Functions ===
        Expr::Function { name, args } => eval_function(name, args, ctx),
    }
}

/// Evaluate a binary operation
fn eval_binary_op(
    op: BinaryOperator,
    left: &Expr,
    right: &Expr,
    ctx: &EvaluationContext,
) -> FormulaResult<Value> {
    let left_val = eval_expr(left, ctx)?;
    let right_val = eval_expr(right, ctx)?;

    match op {
        BinaryOperator::Add => {
            Ok(Value::Number(left_val.to_number()? + right_val.to_number()?))
        }
        BinaryOperator::Subtract => {
            Ok(Value::Number(left_val.to_number()? - right_val.to_number()?))
        }
        BinaryOperator::Multiply => {
            Ok(Value::Number(left_val.to_number()? * right_val.to_number()?))
        }
        BinaryOperator::Divide => {
            let l = left_val.to_number()?;
            let r = right_val.to_number()?;
            if r == 0.0 {
                return Err(FormulaError::Evaluation("Division by zero".into()));
            }
            Ok(Value::Number(l / r))
        }
        BinaryOperator::Power => {
            let result = left_val.to_number()?.powf(right_val.to_number()?);
            if result.is_finite() {
                Ok(Value::Number(result))
            } else {
                Err(FormulaError::Evaluation("Numeric overflow in '^'".into()))
            }
        }

        BinaryOperator::Equal => Ok(Value::Boolean(
            compare_values(&left_val, &right_val) == Ordering::Equal,
        )),
        BinaryOperator::NotEqual => Ok(Value::Boolean(
            compare_values(&left_val, &right_val) != Ordering::Equal,
        )),
        BinaryOperator::LessThan => Ok(Value::Boolean(
            compare_values(&left_val, &right_val) == Ordering::Less,
        )),
        BinaryOperator::LessEqual => Ok(Value::Boolean(
            compare_values(&left_val, &right_val) != Ordering::Greater,
        )),
        BinaryOperator::GreaterThan => Ok(Value::Boolean(
            compare_values(&left_val, &right_val) == Ordering::Greater,
        )),
        BinaryOperator::GreaterEqual => Ok(Value::Boolean(
            compare_values(&left_val, &right_val) != Ordering::Less,
        )),

        BinaryOperator::Concat => Ok(Value::String(
            left_val.as_string() + &right_val.as_string(),
        )),
    }
}

/// Compare two values for ordering (Excel-style)
///
/// Numbers sort before strings, strings before booleans; string comparison
/// is case-insensitive.
fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.partial_cmp(r).unwrap_or(Ordering::Equal),
        (Value::String(l), Value::String(r)) => l.to_lowercase().cmp(&r.to_lowercase()),
        (Value::Boolean(l), Value::Boolean(r)) => l.cmp(r),

        (Value::Number(_), Value::String(_)) => Ordering::Less,
        (Value::String(_), Value::Number(_)) => Ordering::Greater,
        (Value::Number(_), Value::Boolean(_)) => Ordering::Less,
        (Value::Boolean(_), Value::Number(_)) => Ordering::Greater,
        (Value::String(_), Value::Boolean(_)) => Ordering::Less,
        (Value::Boolean(_), Value::String(_)) => Ordering::Greater,

        _ => Ordering::Equal,
    }
}

/// Evaluate a unary operation
fn eval_unary_op(
    op: UnaryOperator,
    operand: &Expr,
    ctx: &EvaluationContext,
) -> FormulaResult<Value> {
    let val = eval_expr(operand, ctx)?;

    match op {
        UnaryOperator::Negate => Ok(Value::Number(-val.to_number()?)),
        UnaryOperator::Percent => Ok(Value::Number(val.to_number()? / 100.0)),
    }
}

/// Evaluate a function call
fn eval_function(name: &str, args: &[Expr], ctx: &EvaluationContext) -> FormulaResult<Value> {
    // Lookup is case-sensitive: "sum" is an unknown function
    let func = function_registry()
        .get(name)
        .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

    if args.len() < func.min_args {
        return Err(FormulaError::ArgumentCount {
            function: name.to_string(),
            expected: format!("at least {}", func.min_args),
            actual: args.len(),
        });
    }

    if let Some(max) = func.max_args {
        if args.len() > max {
            return Err(FormulaError::ArgumentCount {
                function: name.to_string(),
                expected: format!("at most {}", max),
                actual: args.len(),
            });
        }
    }

    let mut evaluated_args = Vec::with_capacity(args.len());
    for arg in args {
        evaluated_args.push(eval_expr(arg, ctx)?);
    }

    (func.implementation)(&evaluated_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn eval(formula: &str) -> CellValue {
        evaluate(formula, &EvaluationContext::new())
    }

    fn sample_ctx() -> EvaluationContext {
        let mut ctx = EvaluationContext::new();
        ctx.set("A1", 10).unwrap();
        ctx.set("A2", 20).unwrap();
        ctx.set("A3", 30).unwrap();
        ctx.set("B1", 4).unwrap();
        ctx.set("C1", "note").unwrap();
        ctx
    }

    #[test]
    fn test_literal_passthrough() {
        assert_eq!(eval("hello"), CellValue::String("hello".into()));
        assert_eq!(eval("42"), CellValue::String("42".into()));
        assert_eq!(eval(""), CellValue::String("".into()));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("=2+3"), CellValue::Number(5.0));
        assert_eq!(eval("=(2+3)*4"), CellValue::Number(20.0));
        assert_eq!(eval("=15/3"), CellValue::Number(5.0));
        assert_eq!(eval("=10-3"), CellValue::Number(7.0));
        assert_eq!(eval("=2^10"), CellValue::Number(1024.0));
        assert_eq!(eval("=2+3*4-5"), CellValue::Number(9.0));
    }

    #[test]
    fn test_unary() {
        assert_eq!(eval("=-5"), CellValue::Number(-5.0));
        assert_eq!(eval("=--5"), CellValue::Number(5.0));
        assert_eq!(eval("=50%"), CellValue::Number(0.5));
    }

    #[test]
    fn test_comparison() {
        assert_eq!(eval("=1<2"), CellValue::Boolean(true));
        assert_eq!(eval("=1>2"), CellValue::Boolean(false));
        assert_eq!(eval("=5=5"), CellValue::Boolean(true));
        assert_eq!(eval("=5<>5"), CellValue::Boolean(false));
        assert_eq!(eval("=5<=5"), CellValue::Boolean(true));
        assert_eq!(eval("=5>=6"), CellValue::Boolean(false));
    }

    #[test]
    fn test_concatenation() {
        assert_eq!(
            eval("=\"Hello \"&\"World\""),
            CellValue::String("Hello World".into())
        );
        assert_eq!(eval("=\"Value: \"&42"), CellValue::String("Value: 42".into()));
    }

    #[test]
    fn test_cell_references() {
        let ctx = sample_ctx();
        assert_eq!(evaluate("=A1", &ctx), CellValue::Number(10.0));
        assert_eq!(evaluate("=A1+A2", &ctx), CellValue::Number(30.0));
        assert_eq!(evaluate("=A1*B1", &ctx), CellValue::Number(40.0));
    }

    #[test]
    fn test_missing_reference_reads_as_zero() {
        let ctx = sample_ctx();
        assert_eq!(evaluate("=Z99+1", &ctx), CellValue::Number(1.0));
        // Non-numeric cell also reads as zero
        assert_eq!(evaluate("=C1+5", &ctx), CellValue::Number(5.0));
    }

    #[test]
    fn test_range_aggregation() {
        let ctx = sample_ctx();
        assert_eq!(evaluate("=SUM(A1:A3)", &ctx), CellValue::Number(60.0));
        assert_eq!(evaluate("=AVERAGE(A1:A3)", &ctx), CellValue::Number(20.0));
        assert_eq!(evaluate("=MAX(A1:A3)", &ctx), CellValue::Number(30.0));
        assert_eq!(evaluate("=MIN(A1:A3)", &ctx), CellValue::Number(10.0));
        assert_eq!(evaluate("=COUNT(A1:A3)", &ctx), CellValue::Number(3.0));
        // Reversed range behaves identically
        assert_eq!(evaluate("=SUM(A3:A1)", &ctx), CellValue::Number(60.0));
    }

    #[test]
    fn test_range_with_gaps() {
        let mut ctx = EvaluationContext::new();
        ctx.set("A1", 10).unwrap();
        ctx.set("A3", 30).unwrap();
        ctx.set("A4", "text").unwrap();
        assert_eq!(evaluate("=SUM(A1:A5)", &ctx), CellValue::Number(40.0));
        assert_eq!(evaluate("=COUNT(A1:A5)", &ctx), CellValue::Number(2.0));
        assert_eq!(evaluate("=AVERAGE(A1:A5)", &ctx), CellValue::Number(20.0));
    }

    #[test]
    fn test_empty_range_aggregates() {
        let ctx = EvaluationContext::new();
        assert_eq!(evaluate("=SUM(A1:A5)", &ctx), CellValue::Number(0.0));
        assert_eq!(evaluate("=COUNT(A1:A5)", &ctx), CellValue::Number(0.0));
        assert_eq!(evaluate("=AVERAGE(A1:A5)", &ctx), CellValue::Error);
        assert_eq!(evaluate("=MAX(A1:A5)", &ctx), CellValue::Error);
        assert_eq!(evaluate("=MIN(A1:A5)", &ctx), CellValue::Error);
    }

    #[test]
    fn test_scalar_functions() {
        assert_eq!(eval("=POWER(2,3)"), CellValue::Number(8.0));
        assert_eq!(eval("=SQRT(16)"), CellValue::Number(4.0));
        assert_eq!(eval("=ROUND(3.14159,2)"), CellValue::Number(3.14));
        assert_eq!(eval("=MOD(10,3)"), CellValue::Number(1.0));
        assert_eq!(eval("=ABS(-7)"), CellValue::Number(7.0));
        assert_eq!(eval("=CEILING(1.2)"), CellValue::Number(2.0));
        assert_eq!(eval("=FLOOR(1.8)"), CellValue::Number(1.0));
        assert_eq!(eval("=LOG10(100)"), CellValue::Number(2.0));
        assert_eq!(eval("=SIN(0)"), CellValue::Number(0.0));
        assert_eq!(eval("=COS(0)"), CellValue::Number(1.0));
    }

    #[test]
    fn test_constants() {
        assert_eq!(eval("=PI()"), CellValue::Number(std::f64::consts::PI));
        assert_eq!(eval("=E()"), CellValue::Number(std::f64::consts::E));
    }

    #[test]
    fn test_volatile_functions_in_bounds() {
        for _ in 0..20 {
            match eval("=RANDOM()") {
                CellValue::Number(n) => assert!((0.0..1.0).contains(&n)),
                other => panic!("RANDOM() returned {:?}", other),
            }
            match eval("=RANDBETWEEN(1,6)") {
                CellValue::Number(n) => {
                    assert!((1.0..=6.0).contains(&n));
                    assert_eq!(n.fract(), 0.0);
                }
                other => panic!("RANDBETWEEN returned {:?}", other),
            }
        }
    }

    #[test]
    fn test_error_containment() {
        assert_eq!(eval("=SQRT(-1)"), CellValue::Error);
        assert_eq!(eval("=INVALID_FUNCTION()"), CellValue::Error);
        assert_eq!(eval("=1/0"), CellValue::Error);
        assert_eq!(eval("=MOD(5,0)"), CellValue::Error);
        assert_eq!(eval("=LOG10(0)"), CellValue::Error);
        assert_eq!(eval("=(2+3"), CellValue::Error);
        assert_eq!(eval("=2+"), CellValue::Error);
        assert_eq!(eval("=\"a\"+1"), CellValue::Error);
        assert_eq!(eval("=A1:A3"), CellValue::Error); // Bare range
        assert_eq!(eval("=sum(1,2)"), CellValue::Error); // Case-sensitive dispatch
        assert_eq!(eval("=SUM()"), CellValue::Error); // Too few arguments
        assert_eq!(eval("=SQRT(1,2)"), CellValue::Error); // Too many arguments
    }

    #[test]
    fn test_idempotence() {
        let ctx = sample_ctx();
        for formula in ["=A1+A2", "=SUM(A1:A3)", "=POWER(B1,2)", "=(A1>5)"] {
            assert_eq!(evaluate(formula, &ctx), evaluate(formula, &ctx));
        }
    }

    #[test]
    fn test_logical_functions() {
        assert_eq!(eval("=IF(TRUE,1,2)"), CellValue::Number(1.0));
        assert_eq!(eval("=IF(FALSE,1,2)"), CellValue::Number(2.0));
        assert_eq!(
            eval("=IF(1>0,\"Yes\",\"No\")"),
            CellValue::String("Yes".into())
        );
        assert_eq!(eval("=AND(TRUE,TRUE)"), CellValue::Boolean(true));
        assert_eq!(eval("=AND(TRUE,FALSE)"), CellValue::Boolean(false));
        assert_eq!(eval("=OR(FALSE,TRUE)"), CellValue::Boolean(true));
        assert_eq!(eval("=NOT(TRUE)"), CellValue::Boolean(false));
    }

    #[test]
    fn test_conditional_on_cells() {
        let ctx = sample_ctx();
        assert_eq!(
            evaluate("=IF(A1>5,A1*B1,0)", &ctx),
            CellValue::Number(40.0)
        );
        assert_eq!(evaluate("=IF(A1>50,A1*B1,0)", &ctx), CellValue::Number(0.0));
    }

    #[test]
    fn test_nested_functions() {
        let ctx = sample_ctx();
        assert_eq!(
            evaluate("=ROUND(AVERAGE(A1:A3)/7,2)", &ctx),
            CellValue::Number(2.86)
        );
        assert_eq!(
            evaluate("=SQRT(POWER(A1,2))", &ctx),
            CellValue::Number(10.0)
        );
    }
}
