//! The retained expression AST for `CHECK` predicates.
//!
//! Lives in `rowsmith-core` (rather than `rowsmith-expr`) because
//! [`crate::schema::TableConstraint::Check`] needs to hold one without a
//! cyclic crate dependency. `rowsmith-expr` owns the parser that produces
//! this tree and the evaluator that walks it; this module is data only.

use rust_decimal::Decimal;

/// A literal value appearing in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Decimal(Decimal),
    String(String),
    Date(String),
    Bool(bool),
    Null,
}

/// Binary operators, ordered roughly by the precedence table in §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// A builtin function name recognized by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuncName {
    Extract,
    Date,
    Length,
    CurrentDate,
    Upper,
    Lower,
}

/// The part requested by `EXTRACT(part FROM ...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

/// A parsed `CHECK` (or any other scalar/boolean) expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprAst {
    Literal(Literal),
    ColumnRef(String),
    UnaryOp(UnaryOp, Box<ExprAst>),
    BinaryOp(BinOp, Box<ExprAst>, Box<ExprAst>),
    Between(Box<ExprAst>, Box<ExprAst>, Box<ExprAst>),
    In(Box<ExprAst>, Vec<ExprAst>),
    Like(Box<ExprAst>, String),
    Regex(Box<ExprAst>, String, bool),
    IsNull(Box<ExprAst>, bool),
    FuncCall(FuncName, Vec<ExprAst>, Option<DatePart>),
}

impl ExprAst {
    /// Column names referenced anywhere in this expression (deduplicated order of appearance).
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            ExprAst::Literal(_) => {}
            ExprAst::ColumnRef(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name.as_str());
                }
            }
            ExprAst::UnaryOp(_, e) => e.collect_columns(out),
            ExprAst::BinaryOp(_, l, r) => {
                l.collect_columns(out);
                r.collect_columns(out);
            }
            ExprAst::Between(e, lo, hi) => {
                e.collect_columns(out);
                lo.collect_columns(out);
                hi.collect_columns(out);
            }
            ExprAst::In(e, list) => {
                e.collect_columns(out);
                for item in list {
                    item.collect_columns(out);
                }
            }
            ExprAst::Like(e, _) => e.collect_columns(out),
            ExprAst::Regex(e, _, _) => e.collect_columns(out),
            ExprAst::IsNull(e, _) => e.collect_columns(out),
            ExprAst::FuncCall(_, args, _) => {
                for a in args {
                    a.collect_columns(out);
                }
            }
        }
    }

    /// Split a top-level `AND` spine into its conjuncts (§4.3: "scan conjunctive
    /// top-level `AND` spine"). A non-`AND` expression is a single conjunct.
    pub fn conjuncts(&self) -> Vec<&ExprAst> {
        let mut out = Vec::new();
        self.push_conjuncts(&mut out);
        out
    }

    fn push_conjuncts<'a>(&'a self, out: &mut Vec<&'a ExprAst>) {
        if let ExprAst::BinaryOp(BinOp::And, l, r) = self {
            l.push_conjuncts(out);
            r.push_conjuncts(out);
        } else {
            out.push(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referenced_columns_deduplicates() {
        let expr = ExprAst::BinaryOp(
            BinOp::And,
            Box::new(ExprAst::BinaryOp(
                BinOp::Gt,
                Box::new(ExprAst::ColumnRef("age".into())),
                Box::new(ExprAst::Literal(Literal::Int(0))),
            )),
            Box::new(ExprAst::BinaryOp(
                BinOp::Lt,
                Box::new(ExprAst::ColumnRef("age".into())),
                Box::new(ExprAst::Literal(Literal::Int(120))),
            )),
        );
        assert_eq!(expr.referenced_columns(), vec!["age"]);
    }

    #[test]
    fn conjuncts_splits_top_level_and_only() {
        let inner_or = ExprAst::BinaryOp(
            BinOp::Or,
            Box::new(ExprAst::ColumnRef("a".into())),
            Box::new(ExprAst::ColumnRef("b".into())),
        );
        let expr = ExprAst::BinaryOp(
            BinOp::And,
            Box::new(inner_or.clone()),
            Box::new(ExprAst::ColumnRef("c".into())),
        );
        let parts = expr.conjuncts();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], &inner_or);
    }
}
