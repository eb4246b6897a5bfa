//! Pratt/precedence-climbing parser over the §4.2 grammar, producing the
//! retained [`rowsmith_core::ExprAst`] tree.

use rowsmith_core::expr::{BinOp, DatePart, ExprAst, FuncName, Literal, UnaryOp};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ExprParseError;
use crate::lexer::{self, Token, TokenKind};

pub fn parse(input: &str) -> Result<ExprAst, ExprParseError> {
    let tokens = lexer::lex(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    parser.expect_eof()?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_ident_upper(&self) -> Option<String> {
        match self.peek() {
            TokenKind::Ident(s) => Some(s.to_ascii_uppercase()),
            _ => None,
        }
    }

    fn advance(&mut self) -> TokenKind {
        let tok = self.tokens[self.pos].kind.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at_pos(&self) -> usize {
        self.tokens[self.pos].pos
    }

    fn err(&self, expected: &str) -> ExprParseError {
        ExprParseError {
            pos: self.at_pos(),
            expected: expected.to_string(),
            found: format!("{:?}", self.peek()),
        }
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.peek_ident_upper().as_deref() == Some(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<(), ExprParseError> {
        if self.eat_keyword(kw) {
            Ok(())
        } else {
            Err(self.err(kw))
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ExprParseError> {
        if self.peek() == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.err(&format!("{kind:?}")))
        }
    }

    fn expect_eof(&self) -> Result<(), ExprParseError> {
        if matches!(self.peek(), TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.err("<eof>"))
        }
    }

    // OR
    fn parse_or(&mut self) -> Result<ExprAst, ExprParseError> {
        let mut lhs = self.parse_and()?;
        while self.eat_keyword("OR") {
            let rhs = self.parse_and()?;
            lhs = ExprAst::BinaryOp(BinOp::Or, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    // AND
    fn parse_and(&mut self) -> Result<ExprAst, ExprParseError> {
        let mut lhs = self.parse_not()?;
        while self.eat_keyword("AND") {
            let rhs = self.parse_not()?;
            lhs = ExprAst::BinaryOp(BinOp::And, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    // NOT
    fn parse_not(&mut self) -> Result<ExprAst, ExprParseError> {
        if self.eat_keyword("NOT") {
            let inner = self.parse_not()?;
            return Ok(ExprAst::UnaryOp(UnaryOp::Not, Box::new(inner)));
        }
        self.parse_comparison()
    }

    // comparison / BETWEEN / IN / LIKE / IS NULL / regex
    fn parse_comparison(&mut self) -> Result<ExprAst, ExprParseError> {
        let lhs = self.parse_additive()?;

        if self.eat_keyword("BETWEEN") {
            let lo = self.parse_additive()?;
            self.expect_keyword("AND")?;
            let hi = self.parse_additive()?;
            return Ok(ExprAst::Between(Box::new(lhs), Box::new(lo), Box::new(hi)));
        }
        if self.eat_keyword("IN") {
            self.expect(&TokenKind::LParen)?;
            let mut items = Vec::new();
            if self.peek() != &TokenKind::RParen {
                loop {
                    items.push(self.parse_additive()?);
                    if self.peek() == &TokenKind::Comma {
                        self.advance();
                        continue;
                    }
                    break;
                }
            }
            self.expect(&TokenKind::RParen)?;
            return Ok(ExprAst::In(Box::new(lhs), items));
        }
        if self.eat_keyword("LIKE") {
            let pattern = self.expect_string_literal()?;
            return Ok(ExprAst::Like(Box::new(lhs), pattern));
        }
        if self.eat_keyword("REGEXP") {
            let pattern = self.expect_string_literal()?;
            return Ok(ExprAst::Regex(Box::new(lhs), pattern, false));
        }
        if self.peek() == &TokenKind::Tilde {
            self.advance();
            let pattern = self.expect_string_literal()?;
            return Ok(ExprAst::Regex(Box::new(lhs), pattern, false));
        }
        if self.eat_keyword("IS") {
            let negated = self.eat_keyword("NOT");
            self.expect_keyword("NULL")?;
            return Ok(ExprAst::IsNull(Box::new(lhs), negated));
        }

        let op = match self.peek() {
            TokenKind::Eq => Some(BinOp::Eq),
            TokenKind::NotEq => Some(BinOp::NotEq),
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::LtEq => Some(BinOp::LtEq),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::GtEq => Some(BinOp::GtEq),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let rhs = self.parse_additive()?;
            return Ok(ExprAst::BinaryOp(op, Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<ExprAst, ExprParseError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = ExprAst::BinaryOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<ExprAst, ExprParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = ExprAst::BinaryOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<ExprAst, ExprParseError> {
        if self.peek() == &TokenKind::Minus {
            self.advance();
            let inner = self.parse_unary()?;
            return Ok(ExprAst::UnaryOp(UnaryOp::Neg, Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<ExprAst, ExprParseError> {
        match self.peek().clone() {
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_or()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Number(n) => {
                self.advance();
                if n.contains('.') {
                    let d = Decimal::from_str(&n)
                        .map_err(|_| self.err("numeric literal"))?;
                    Ok(ExprAst::Literal(Literal::Decimal(d)))
                } else {
                    let v: i64 = n.parse().map_err(|_| self.err("integer literal"))?;
                    Ok(ExprAst::Literal(Literal::Int(v)))
                }
            }
            TokenKind::StringLit(s) => {
                self.advance();
                Ok(ExprAst::Literal(Literal::String(s)))
            }
            TokenKind::Ident(name) => self.parse_ident_led(name),
            _ => Err(self.err("expression")),
        }
    }

    fn parse_ident_led(&mut self, name: String) -> Result<ExprAst, ExprParseError> {
        let upper = name.to_ascii_uppercase();
        match upper.as_str() {
            "TRUE" => {
                self.advance();
                return Ok(ExprAst::Literal(Literal::Bool(true)));
            }
            "FALSE" => {
                self.advance();
                return Ok(ExprAst::Literal(Literal::Bool(false)));
            }
            "NULL" => {
                self.advance();
                return Ok(ExprAst::Literal(Literal::Null));
            }
            "DATE" => {
                self.advance();
                // `DATE 'yyyy-mm-dd'` literal form, or `DATE(expr)` function call.
                if let TokenKind::StringLit(s) = self.peek().clone() {
                    self.advance();
                    return Ok(ExprAst::Literal(Literal::Date(s)));
                }
                if self.peek() == &TokenKind::LParen {
                    let args = self.parse_call_args()?;
                    return Ok(ExprAst::FuncCall(FuncName::Date, args, None));
                }
                return Err(self.err("string literal or '(' after DATE"));
            }
            "CURRENT_DATE" => {
                self.advance();
                if self.peek() == &TokenKind::LParen {
                    self.parse_call_args()?;
                }
                return Ok(ExprAst::FuncCall(FuncName::CurrentDate, Vec::new(), None));
            }
            "EXTRACT" => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let part_name = self.expect_ident()?.to_ascii_uppercase();
                let part = match part_name.as_str() {
                    "YEAR" => DatePart::Year,
                    "MONTH" => DatePart::Month,
                    "DAY" => DatePart::Day,
                    "HOUR" => DatePart::Hour,
                    "MINUTE" => DatePart::Minute,
                    "SECOND" => DatePart::Second,
                    _ => return Err(self.err("YEAR|MONTH|DAY|HOUR|MINUTE|SECOND")),
                };
                self.expect_keyword("FROM")?;
                let arg = self.parse_or()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(ExprAst::FuncCall(FuncName::Extract, vec![arg], Some(part)));
            }
            "LENGTH" => {
                self.advance();
                let args = self.parse_call_args()?;
                return Ok(ExprAst::FuncCall(FuncName::Length, args, None));
            }
            "UPPER" => {
                self.advance();
                let args = self.parse_call_args()?;
                return Ok(ExprAst::FuncCall(FuncName::Upper, args, None));
            }
            "LOWER" => {
                self.advance();
                let args = self.parse_call_args()?;
                return Ok(ExprAst::FuncCall(FuncName::Lower, args, None));
            }
            _ => {}
        }
        self.advance();
        Ok(ExprAst::ColumnRef(name))
    }

    fn parse_call_args(&mut self) -> Result<Vec<ExprAst>, ExprParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.peek() != &TokenKind::RParen {
            loop {
                args.push(self.parse_or()?);
                if self.peek() == &TokenKind::Comma {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    fn expect_ident(&mut self) -> Result<String, ExprParseError> {
        match self.peek().clone() {
            TokenKind::Ident(s) => {
                self.advance();
                Ok(s)
            }
            _ => Err(self.err("identifier")),
        }
    }

    fn expect_string_literal(&mut self) -> Result<String, ExprParseError> {
        match self.peek().clone() {
            TokenKind::StringLit(s) => {
                self.advance();
                Ok(s)
            }
            _ => Err(self.err("string literal")),
        }
    }
}
