use super::lexer::{tokenize, Spanned, Token};
use crate::{Error, Result, Value};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Lit(Value),
    Ident(String),
    Field(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::In => "in",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

pub(crate) fn is_keyword(ident: &str) -> bool {
    matches!(
        ident,
        "true" | "false" | "nil" | "null" | "and" | "or" | "not" | "in"
    )
}

pub(crate) fn parse(src: &str) -> Result<Expr> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        src,
        tokens: &tokens,
        pos: 0,
    };

    if tokens.is_empty() {
        return Err(parser.error("empty expression"));
    }

    let expr = parser.or()?;

    if let Some(tok) = parser.tokens.get(parser.pos) {
        return Err(parser.error(format!(
            "unexpected `{}` at offset {}",
            &src[tok.start..tok.end],
            tok.start
        )));
    }

    Ok(expr)
}

struct Parser<'a> {
    src: &'a str,
    tokens: &'a [Spanned],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Ident(ident)) if ident == keyword)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(tok)
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<()> {
        match self.bump() {
            Some(tok) if tok == expected => Ok(()),
            _ => Err(self.error(format!("expected {what}"))),
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::expression_evaluation_failed(self.src, message)
    }

    fn or(&mut self) -> Result<Expr> {
        let mut lhs = self.and()?;
        while matches!(self.peek(), Some(Token::OrOr)) || self.peek_keyword("or") {
            self.pos += 1;
            let rhs = self.and()?;
            lhs = Expr::Binary(BinaryOp::Or, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr> {
        let mut lhs = self.equality()?;
        while matches!(self.peek(), Some(Token::AndAnd)) || self.peek_keyword("and") {
            self.pos += 1;
            let rhs = self.equality()?;
            lhs = Expr::Binary(BinaryOp::And, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<Expr> {
        let mut lhs = self.comparison()?;
        loop {
            let op = match self.peek() {
                Some(Token::EqEq) => BinaryOp::Eq,
                Some(Token::Ne) => BinaryOp::Ne,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.comparison()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn comparison(&mut self) -> Result<Expr> {
        let mut lhs = self.additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::Le) => BinaryOp::Le,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::Ge) => BinaryOp::Ge,
                Some(Token::Ident(ident)) if ident == "in" => BinaryOp::In,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.additive()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn additive(&mut self) -> Result<Expr> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.multiplicative()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn multiplicative(&mut self) -> Result<Expr> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Expr> {
        if matches!(self.peek(), Some(Token::Bang)) || self.peek_keyword("not") {
            self.pos += 1;
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(self.unary()?)));
        }

        if matches!(self.peek(), Some(Token::Minus)) {
            self.pos += 1;
            return Ok(match self.unary()? {
                Expr::Lit(Value::I64(v)) => Expr::Lit(Value::I64(-v)),
                Expr::Lit(Value::F64(v)) => Expr::Lit(Value::F64(-v)),
                operand => Expr::Unary(UnaryOp::Neg, Box::new(operand)),
            });
        }

        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr> {
        let mut expr = self.primary()?;
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.pos += 1;
                    match self.bump() {
                        Some(Token::Ident(field)) => {
                            expr = Expr::Field(Box::new(expr), field);
                        }
                        _ => return Err(self.error("expected field name after `.`")),
                    }
                }
                Some(Token::LBracket) => {
                    self.pos += 1;
                    let index = self.or()?;
                    self.expect(Token::RBracket, "`]`")?;
                    expr = Expr::Index(Box::new(expr), Box::new(index));
                }
                _ => return Ok(expr),
            }
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.bump() {
            Some(Token::Int(v)) => Ok(Expr::Lit(Value::I64(v))),
            Some(Token::Float(v)) => Ok(Expr::Lit(Value::F64(v))),
            Some(Token::Str(v)) => Ok(Expr::Lit(Value::String(v))),
            Some(Token::LParen) => {
                let expr = self.or()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(expr)
            }
            Some(Token::Ident(ident)) => match ident.as_str() {
                "true" => Ok(Expr::Lit(Value::Bool(true))),
                "false" => Ok(Expr::Lit(Value::Bool(false))),
                "nil" | "null" => Ok(Expr::Lit(Value::Null)),
                keyword if is_keyword(keyword) => {
                    Err(self.error(format!("unexpected keyword `{keyword}`")))
                }
                _ if matches!(self.peek(), Some(Token::LParen)) => {
                    self.pos += 1;
                    let mut args = Vec::new();
                    if !matches!(self.peek(), Some(Token::RParen)) {
                        loop {
                            args.push(self.or()?);
                            if matches!(self.peek(), Some(Token::Comma)) {
                                self.pos += 1;
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(Token::RParen, "`)`")?;
                    Ok(Expr::Call(ident, args))
                }
                _ => Ok(Expr::Ident(ident)),
            },
            Some(_) => {
                let tok = &self.tokens[self.pos - 1];
                Err(self.error(format!(
                    "unexpected `{}` at offset {}",
                    &self.src[tok.start..tok.end],
                    tok.start
                )))
            }
            None => Err(self.error("unexpected end of expression")),
        }
    }
}
