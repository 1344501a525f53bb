//! Formula evaluation and relative reference translation.
//!
//! [`FormulaEvaluator`] is the single entry point the application uses to
//! turn stored cell content into displayed content: non-formulas pass
//! through, formulas are parsed, resolved against the grid snapshot and
//! dispatched, and every failure is absorbed into an `#ERROR: <message>`
//! string. Reference translation runs independently of evaluation, when a
//! cell is copied to a new location.
//!
//! # Examples
//!
//! ```
//! use gridcalc::domain::{FormulaEvaluator, Grid};
//!
//! let mut grid = Grid::default();
//! grid.set(0, 0, "2".to_string());
//! grid.set(1, 0, "3".to_string());
//!
//! let evaluator = FormulaEvaluator::new(&grid);
//! assert_eq!(evaluator.evaluate_formula("=SUM(A1:A2)"), "5");
//! assert_eq!(evaluator.evaluate_formula("plain text"), "plain text");
//! assert_eq!(
//!     evaluator.evaluate_formula("=FOO(A1)"),
//!     "#ERROR: Unknown function: FOO"
//! );
//! ```

use super::errors::{DomainError, DomainResult};
use super::models::{CellAddress, Grid};
use super::parser::{self, Formula, FunctionRegistry, Value};

/// True when stored cell content is a formula rather than a literal.
pub fn is_formula(content: &str) -> bool {
    content.starts_with('=')
}

/// Stateless formula evaluator over a point-in-time grid snapshot.
///
/// The evaluator never mutates the grid; callers apply the returned value
/// back into storage themselves.
pub struct FormulaEvaluator<'a> {
    grid: &'a Grid,
}

impl<'a> FormulaEvaluator<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    /// Evaluates stored cell content into displayable content.
    ///
    /// Content starting with `=` is evaluated as a formula; any failure is
    /// rendered as `#ERROR: <message>` instead of propagating. Anything
    /// else is returned unchanged.
    pub fn evaluate_formula(&self, content: &str) -> String {
        match content.strip_prefix('=') {
            Some(body) => match self.evaluate(body) {
                Ok(value) => value.to_string(),
                Err(err) => format!("#ERROR: {}", err),
            },
            None => content.to_string(),
        }
    }

    /// Evaluates a formula body (leading `=` already stripped) to a scalar.
    pub fn evaluate(&self, body: &str) -> DomainResult<Value> {
        let formula = Formula::parse(body)?;

        let registry = FunctionRegistry::new();
        let func = registry
            .get_function(&formula.name)
            .ok_or_else(|| DomainError::UnknownFunction(formula.name.clone()))?;

        let args = parser::parse_args(&formula.args)?;
        let values = parser::resolve_args(&args, self.grid);
        Ok(func(&values))
    }
}

/// Rewrites every cell reference in a formula body by the row/column delta
/// between `source` and `target`.
///
/// The body is scanned as tokens: a maximal alphanumeric word is a
/// reference only when it is exactly one uppercase letter followed by
/// digits, so function names and literals are never rewritten. References
/// shifted outside the grid stay as computed (resolution later reads them
/// as empty), but a shift that leaves the encodable range entirely --
/// row before 1, column before A or past Z -- fails with `InvalidAddress`.
pub fn translate_references(
    body: &str,
    source: CellAddress,
    target: CellAddress,
) -> DomainResult<String> {
    let row_delta = target.row as i64 - source.row as i64;
    let col_delta = target.col as i64 - source.col as i64;

    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_ascii_alphanumeric() {
            let mut end = start + ch.len_utf8();
            chars.next();
            while let Some(&(idx, c)) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    end = idx + c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }

            let word = &body[start..end];
            if parser::is_reference_shaped(word) {
                out.push_str(&shift_reference(word, row_delta, col_delta)?);
            } else {
                out.push_str(word);
            }
        } else {
            out.push(ch);
            chars.next();
        }
    }

    Ok(out)
}

fn shift_reference(token: &str, row_delta: i64, col_delta: i64) -> DomainResult<String> {
    let addr = CellAddress::parse(token)?;
    let row = addr.row as i64 + row_delta;
    let col = addr.col as i64 + col_delta;

    if row < 0 || col < 0 || col >= CellAddress::MAX_COLS as i64 {
        return Err(DomainError::InvalidAddress(token.to_string()));
    }

    Ok(CellAddress::new(row as usize, col as usize).to_string())
}

/// Content to store at `target` when copying a cell from `source`.
///
/// Literals are returned verbatim; formulas get their references
/// translated. When translation fails the source content is returned
/// unchanged rather than dropped, so a copy never loses data.
pub fn content_for_copy(content: &str, source: CellAddress, target: CellAddress) -> String {
    match content.strip_prefix('=') {
        Some(body) => match translate_references(body, source, target) {
            Ok(translated) => format!("={}", translated),
            Err(_) => content.to_string(),
        },
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(label: &str) -> CellAddress {
        CellAddress::parse(label).unwrap()
    }

    fn sample_grid() -> Grid {
        let mut grid = Grid::default();
        grid.set(0, 0, "10".to_string());
        grid.set(0, 1, "20".to_string());
        grid.set(0, 2, "30".to_string());
        grid.set(1, 0, "5".to_string());
        grid.set(1, 1, "15".to_string());
        grid
    }

    #[test]
    fn test_non_formula_passthrough() {
        let grid = sample_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        assert_eq!(evaluator.evaluate_formula("hello"), "hello");
        assert_eq!(evaluator.evaluate_formula("123"), "123");
        assert_eq!(evaluator.evaluate_formula(""), "");
    }

    #[test]
    fn test_sum_over_range_and_list() {
        let grid = sample_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        assert_eq!(evaluator.evaluate_formula("=SUM(A1:C1)"), "60");
        assert_eq!(evaluator.evaluate_formula("=SUM(A1,B1,C1)"), "60");
        assert_eq!(evaluator.evaluate_formula("=SUM(A1:B2)"), "50");
        assert_eq!(evaluator.evaluate_formula("=SUM(5,10,15)"), "30");
        assert_eq!(evaluator.evaluate_formula("=SUM()"), "0");
    }

    #[test]
    fn test_average_and_count() {
        let grid = sample_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        assert_eq!(evaluator.evaluate_formula("=AVERAGE(A1:C1)"), "20");
        // D1:E1 is empty, so the numeric subset is empty and the result 0.
        assert_eq!(evaluator.evaluate_formula("=AVERAGE(D1:E1)"), "0");
        assert_eq!(evaluator.evaluate_formula("=COUNT(A1,B1,x,)"), "2");
    }

    #[test]
    fn test_text_functions() {
        let mut grid = Grid::default();
        grid.set(0, 0, "  Mixed Case  ".to_string());
        let evaluator = FormulaEvaluator::new(&grid);

        assert_eq!(evaluator.evaluate_formula("=TRIM(A1)"), "Mixed Case");
        assert_eq!(evaluator.evaluate_formula("=UPPER(A1)"), "  MIXED CASE  ");
        assert_eq!(evaluator.evaluate_formula("=LOWER(A1)"), "  mixed case  ");
        assert_eq!(evaluator.evaluate_formula("=UPPER(hello)"), "HELLO");
        assert_eq!(evaluator.evaluate_formula("=TRIM()"), "");
    }

    #[test]
    fn test_case_insensitive_dispatch() {
        let grid = sample_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        assert_eq!(evaluator.evaluate_formula("=sum(A1,B1)"), "30");
        assert_eq!(evaluator.evaluate_formula("=Sum(A1,B1)"), "30");
        assert_eq!(evaluator.evaluate_formula("=average(A1,B1)"), "15");
    }

    #[test]
    fn test_unknown_function_error() {
        let grid = sample_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        assert_eq!(
            evaluator.evaluate_formula("=FOO(A1)"),
            "#ERROR: Unknown function: FOO"
        );
    }

    #[test]
    fn test_malformed_formula_error() {
        let grid = sample_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        assert_eq!(
            evaluator.evaluate_formula("=A1+B1"),
            "#ERROR: Invalid formula format"
        );
        assert_eq!(
            evaluator.evaluate_formula("=SUM"),
            "#ERROR: Invalid formula format"
        );
    }

    #[test]
    fn test_invalid_reference_error() {
        let grid = sample_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        assert_eq!(
            evaluator.evaluate_formula("=SUM(A0:B2)"),
            "#ERROR: Invalid cell reference: A0"
        );
    }

    #[test]
    fn test_out_of_bounds_range_is_lenient() {
        let grid = sample_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        // Rows 21..40 are outside the default 20x20 grid and read as empty.
        assert_eq!(evaluator.evaluate_formula("=SUM(A1:A40)"), "15");
        assert_eq!(evaluator.evaluate_formula("=COUNT(A21:A40)"), "0");
    }

    #[test]
    fn test_translate_column_shift() {
        let translated = translate_references("SUM(A1:A3)", addr("B5"), addr("C5")).unwrap();
        assert_eq!(translated, "SUM(B1:B3)");
    }

    #[test]
    fn test_translate_row_and_column_shift() {
        let translated = translate_references("SUM(A1,B2,C3)", addr("A1"), addr("C4")).unwrap();
        assert_eq!(translated, "SUM(C4,D5,E6)");
    }

    #[test]
    fn test_translate_round_trip() {
        let original = "AVERAGE(B2:C4)";
        let there = translate_references(original, addr("A1"), addr("D6")).unwrap();
        let back = translate_references(&there, addr("D6"), addr("A1")).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_translate_leaves_non_references_alone() {
        let translated =
            translate_references("SUM(A1,hello,b2,AA1,A1B2)", addr("A1"), addr("B2")).unwrap();
        assert_eq!(translated, "SUM(B2,hello,b2,AA1,A1B2)");
    }

    #[test]
    fn test_translate_off_grid_stays_as_computed() {
        // Row 100 is outside any default grid but still encodable.
        let translated = translate_references("SUM(A99)", addr("A1"), addr("A3")).unwrap();
        assert_eq!(translated, "SUM(A101)");
    }

    #[test]
    fn test_translate_fails_outside_codec_range() {
        assert_eq!(
            translate_references("SUM(A1)", addr("B1"), addr("A1")),
            Err(DomainError::InvalidAddress("A1".to_string()))
        );
        assert_eq!(
            translate_references("SUM(Z1)", addr("A1"), addr("B1")),
            Err(DomainError::InvalidAddress("Z1".to_string()))
        );
        assert_eq!(
            translate_references("SUM(A1)", addr("A5"), addr("A1")),
            Err(DomainError::InvalidAddress("A1".to_string()))
        );
    }

    #[test]
    fn test_content_for_copy_literal_verbatim() {
        assert_eq!(content_for_copy("42", addr("A1"), addr("B9")), "42");
        assert_eq!(content_for_copy("", addr("A1"), addr("B9")), "");
    }

    #[test]
    fn test_content_for_copy_translates_formula() {
        assert_eq!(
            content_for_copy("=SUM(A1:A3)", addr("B5"), addr("C5")),
            "=SUM(B1:B3)"
        );
    }

    #[test]
    fn test_content_for_copy_keeps_content_on_failure() {
        // Shifting A1 left of column A cannot be encoded; the content is
        // passed through unchanged instead of being dropped.
        assert_eq!(
            content_for_copy("=SUM(A1)", addr("B1"), addr("A1")),
            "=SUM(A1)"
        );
    }

    #[test]
    fn test_is_formula() {
        assert!(is_formula("=SUM(A1)"));
        assert!(!is_formula("SUM(A1)"));
        assert!(!is_formula(""));
    }
}
