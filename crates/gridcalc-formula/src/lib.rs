//! # gridcalc-formula
//!
//! Formula parser and evaluator for gridcalc.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Formula evaluation against a caller-supplied cell context
//! - Built-in arithmetic, statistical and trigonometric functions
//! - Dependency extraction for calculation chains
//!
//! Evaluation is total: malformed input, unknown functions, domain errors
//! and arithmetic faults all surface as the single in-band sentinel value
//! `"#ERROR!"` rather than a panic or an `Err` at the public boundary.
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_formula::{evaluate, CellValue, EvaluationContext};
//!
//! let mut ctx = EvaluationContext::new();
//! ctx.set("A1", 10).unwrap();
//! ctx.set("A2", 20).unwrap();
//! ctx.set("A3", 30).unwrap();
//!
//! assert_eq!(evaluate("=SUM(A1:A3)", &ctx), CellValue::Number(60.0));
//! assert_eq!(evaluate("=1/0", &ctx), CellValue::Error);
//! ```

pub mod ast;
pub mod context;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use context::EvaluationContext;
pub use dependency::{extract_dependencies, DependencyGraph};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, Value};
pub use parser::parse_formula;

// Re-exported so engine consumers only need one crate
pub use gridcalc_core::{CellAddress, CellRange, CellValue, ERROR_SENTINEL};
