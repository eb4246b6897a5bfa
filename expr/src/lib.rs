//! Parser, three-valued evaluator, and domain extractor for `CHECK`
//! predicates (spec §4.2, §4.3).

pub mod domain;
pub mod error;
pub mod eval;
mod lexer;
pub mod parser;

pub use domain::{default_domain_for_type, extract_domain};
pub use error::ExprParseError;
pub use eval::{eval_bool, eval_value, EvalContext, Tri};
pub use parser::parse;
