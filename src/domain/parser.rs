//! Formula parsing and argument resolution.
//!
//! A formula is a single function call over a range or a comma list; there
//! are no operators and no nesting. The argument text is classified exactly
//! once into tagged shapes (literal, cell reference, range) before any grid
//! access happens.
//!
//! # BNF Grammar
//!
//! ```bnf
//! formula := "=" call
//! call    := IDENT "(" args ")"
//! args    := range | list | ""
//! range   := cellref ":" cellref
//! list    := arg ("," arg)*
//! arg     := cellref | literal
//! cellref := LETTER DIGIT+
//! IDENT   := [A-Za-z0-9_]+
//! ```
//!
//! A colon anywhere in the argument text puts the whole text in range mode;
//! mixing a range into a comma list is not supported.

use std::collections::HashMap;
use std::fmt;

use super::errors::{DomainError, DomainResult};
use super::models::{CellAddress, Grid, Range};

/// A formula body decomposed into function name and raw argument text.
///
/// # Examples
///
/// ```
/// use gridcalc::domain::Formula;
///
/// let formula = Formula::parse("SUM(A1:A3)").unwrap();
/// assert_eq!(formula.name, "SUM");
/// assert_eq!(formula.args, "A1:A3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    /// Function name as written (dispatch is case-insensitive).
    pub name: String,
    /// Raw text between the parentheses.
    pub args: String,
}

impl Formula {
    /// Splits `NAME(ARGS)` into its parts: NAME is the word characters
    /// before the first `(`, ARGS everything up to the trailing `)`.
    /// Any other shape is a malformed formula.
    pub fn parse(body: &str) -> DomainResult<Formula> {
        let text = body.trim();
        let rest = text.strip_suffix(')').ok_or(DomainError::MalformedFormula)?;
        let open = rest.find('(').ok_or(DomainError::MalformedFormula)?;

        let name = &rest[..open];
        let args = &rest[open + 1..];
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(DomainError::MalformedFormula);
        }

        Ok(Formula {
            name: name.to_string(),
            args: args.to_string(),
        })
    }
}

/// One parsed argument, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgExpr {
    /// Plain text passed through to the function after trimming.
    Literal(String),
    /// A single cell reference, read from the grid at resolution time.
    CellRef(CellAddress),
    /// An inclusive rectangle expanded in row-major order.
    Range(Range),
}

/// Classifies an argument string into tagged argument shapes.
///
/// A colon switches the entire string into range mode (`START:END`, both
/// endpoints trimmed and decoded). Otherwise the string is a comma list
/// whose trimmed tokens are either single-cell references or literals.
/// An empty string is an empty argument list.
pub fn parse_args(args: &str) -> DomainResult<Vec<ArgExpr>> {
    if args.trim().is_empty() {
        return Ok(Vec::new());
    }

    if let Some((start, end)) = args.split_once(':') {
        let start = CellAddress::parse(start.trim())?;
        let end = CellAddress::parse(end.trim())?;
        return Ok(vec![ArgExpr::Range(Range::new(start, end))]);
    }

    args.split(',')
        .map(|token| {
            let token = token.trim();
            if is_reference_shaped(token) {
                Ok(ArgExpr::CellRef(CellAddress::parse(token)?))
            } else {
                Ok(ArgExpr::Literal(token.to_string()))
            }
        })
        .collect()
}

/// One uppercase letter followed by one or more digits. Tokens of this
/// shape are treated as references; everything else stays literal, so a
/// lowercase `a1` is just text.
pub(crate) fn is_reference_shaped(token: &str) -> bool {
    let mut bytes = token.bytes();
    matches!(bytes.next(), Some(b) if b.is_ascii_uppercase())
        && token.len() >= 2
        && bytes.all(|b| b.is_ascii_digit())
}

/// Expands parsed arguments into a flat ordered sequence of values against
/// a grid snapshot. Reads outside the grid resolve to empty strings.
pub fn resolve_args(args: &[ArgExpr], grid: &Grid) -> Vec<String> {
    let mut values = Vec::new();
    for arg in args {
        match arg {
            ArgExpr::Literal(text) => values.push(text.clone()),
            ArgExpr::CellRef(addr) => values.push(grid.value_at(*addr).to_string()),
            ArgExpr::Range(range) => {
                values.extend(range.cells().map(|addr| grid.value_at(addr).to_string()));
            }
        }
    }
    values
}

/// Scalar result of a function call.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A value is numeric when its trimmed form is non-empty and parses as a
/// float. This single rule drives SUM coercion, AVERAGE filtering and
/// COUNT alike.
fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        trimmed.parse().ok()
    }
}

/// Function signature for registered functions. Functions are total over
/// their resolved arguments; the only dispatch-time failure is an unknown
/// name, raised by the caller.
pub type FunctionImpl = fn(&[String]) -> Value;

/// Registry of the built-in functions, keyed case-insensitively.
///
/// # Examples
///
/// ```
/// use gridcalc::domain::{FunctionRegistry, Value};
///
/// let registry = FunctionRegistry::new();
/// let sum = registry.get_function("sum").unwrap();
/// let args = vec!["2".to_string(), "3".to_string(), "x".to_string()];
/// assert_eq!(sum(&args), Value::Number(5.0));
/// ```
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionImpl>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };
        registry.register_builtin_functions();
        registry
    }

    pub fn register_function(&mut self, name: &str, func: FunctionImpl) {
        self.functions.insert(name.to_uppercase(), func);
    }

    pub fn get_function(&self, name: &str) -> Option<&FunctionImpl> {
        self.functions.get(&name.to_uppercase())
    }

    fn register_builtin_functions(&mut self) {
        self.register_function("SUM", |args| {
            Value::Number(args.iter().filter_map(|v| parse_number(v)).sum())
        });

        self.register_function("AVERAGE", |args| {
            let numbers: Vec<f64> = args.iter().filter_map(|v| parse_number(v)).collect();
            if numbers.is_empty() {
                Value::Number(0.0)
            } else {
                Value::Number(numbers.iter().sum::<f64>() / numbers.len() as f64)
            }
        });

        self.register_function("COUNT", |args| {
            Value::Number(args.iter().filter_map(|v| parse_number(v)).count() as f64)
        });

        self.register_function("TRIM", |args| {
            Value::Text(args.first().map(|v| v.trim().to_string()).unwrap_or_default())
        });

        self.register_function("UPPER", |args| {
            Value::Text(args.first().map(|v| v.to_uppercase()).unwrap_or_default())
        });

        self.register_function("LOWER", |args| {
            Value::Text(args.first().map(|v| v.to_lowercase()).unwrap_or_default())
        });
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
