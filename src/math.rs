use crate::error::Error;
use crate::Result;
use logos_iter::{LogosIter, PeekableLexer};

type Lexer<'a> = PeekableLexer<'a, logos::Lexer<'a, Token>, Token>;

#[derive(logos::Logos, Debug, Copy, Clone, Eq, PartialEq)]
enum Token {
    #[regex(r"([0-9]+(\.[0-9]+)?)|(\.[0-9]+)")]
    Number,
    #[regex(r"[a-z]+")]
    Ident,

    #[token("**")]
    #[token("^")]
    Pow,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token(",")]
    Comma,

    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

/// Evaluates an arithmetic expression with standard precedence, `**`
/// exponentiation, and the math function set the notation supports.
pub(crate) fn evaluate(src: &str) -> Result<f64> {
    let mut eval = Evaluator {
        lexer: LogosIter::peekable_lexer(<Token as logos::Logos>::lexer(src)),
    };
    let value = eval.expression()?;
    match eval.lexer.next() {
        None => Ok(value),
        Some(_) => Err(unexpected(&mut eval.lexer)),
    }
}

fn unexpected(lexer: &mut Lexer<'_>) -> Error {
    Error::invalid_argument(
        "expression",
        format!("unexpected {:?} in arithmetic", lexer.slice()),
    )
}

struct Evaluator<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Evaluator<'a> {
    fn matches(&mut self, kind: Token) -> bool {
        self.lexer.peek().map_or(false, |&peeked| peeked == kind)
    }

    fn consume(&mut self, expected: Token) -> Result<()> {
        if self.matches(expected) {
            self.lexer.next();
            Ok(())
        } else {
            self.lexer.next();
            Err(unexpected(&mut self.lexer))
        }
    }

    fn expression(&mut self) -> Result<f64> {
        self.additive()
    }

    fn additive(&mut self) -> Result<f64> {
        let mut lhs = self.multiplicative()?;
        loop {
            if self.matches(Token::Plus) {
                self.lexer.next();
                lhs += self.multiplicative()?;
            } else if self.matches(Token::Minus) {
                self.lexer.next();
                lhs -= self.multiplicative()?;
            } else {
                return Ok(lhs);
            }
        }
    }

    fn multiplicative(&mut self) -> Result<f64> {
        let mut lhs = self.unary()?;
        loop {
            if self.matches(Token::Star) {
                self.lexer.next();
                lhs *= self.unary()?;
            } else if self.matches(Token::Slash) {
                self.lexer.next();
                lhs /= self.unary()?;
            } else if self.matches(Token::Percent) {
                self.lexer.next();
                lhs %= self.unary()?;
            } else {
                return Ok(lhs);
            }
        }
    }

    fn unary(&mut self) -> Result<f64> {
        if self.matches(Token::Minus) {
            self.lexer.next();
            Ok(-self.unary()?)
        } else if self.matches(Token::Plus) {
            self.lexer.next();
            self.unary()
        } else {
            self.power()
        }
    }

    fn power(&mut self) -> Result<f64> {
        let base = self.atom()?;
        if self.matches(Token::Pow) {
            self.lexer.next();
            // Right-associative; the exponent may carry its own sign.
            let exponent = self.unary()?;
            Ok(base.powf(exponent))
        } else {
            Ok(base)
        }
    }

    fn atom(&mut self) -> Result<f64> {
        match self.lexer.peek() {
            Some(Token::Number) => {
                self.lexer.next();
                self.lexer
                    .slice()
                    .parse()
                    .map_err(|e| Error::invalid_argument("expression", e))
            }
            Some(Token::LeftParen) => {
                self.lexer.next();
                let value = self.expression()?;
                self.consume(Token::RightParen)?;
                Ok(value)
            }
            Some(Token::Ident) => self.call(),
            _ => {
                self.lexer.next();
                Err(unexpected(&mut self.lexer))
            }
        }
    }

    fn call(&mut self) -> Result<f64> {
        self.lexer.next();
        let name = self.lexer.slice().to_string();
        self.consume(Token::LeftParen)?;
        let first = self.expression()?;
        let value = if matches!(name.as_str(), "pow" | "min" | "max") {
            self.consume(Token::Comma)?;
            let second = self.expression()?;
            match name.as_str() {
                "pow" => first.powf(second),
                "min" => first.min(second),
                "max" => first.max(second),
                _ => unreachable!(),
            }
        } else {
            apply(&name, first)?
        };
        self.consume(Token::RightParen)?;
        Ok(value)
    }
}

fn apply(name: &str, x: f64) -> Result<f64> {
    Ok(match name {
        "abs" => x.abs(),
        "ceil" => x.ceil(),
        "cos" => x.cos(),
        "exp" => x.exp(),
        "floor" => x.floor(),
        "log" => x.ln(),
        // Half-way values round toward positive infinity.
        "round" => (x + 0.5).floor(),
        "sign" => {
            if x == 0.0 {
                0.0
            } else {
                x.signum()
            }
        }
        "sin" => x.sin(),
        "sqrt" => x.sqrt(),
        "tan" => x.tan(),
        _ => {
            return Err(Error::invalid_argument(
                "expression",
                format!("unknown function {:?}", name),
            ))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(src: &str, expected: f64) {
        assert_eq!(evaluate(src).unwrap(), expected, "evaluating {:?}", src);
    }

    #[test]
    fn test_precedence() {
        check("2+3*4", 14.0);
        check("(2+3)*4", 20.0);
        check("10-4-3", 3.0);
        check("20/2/5", 2.0);
        check("7%3", 1.0);
        check("2*3+4*5", 26.0);
    }

    #[test]
    fn test_exponent() {
        check("2**3", 8.0);
        check("2^3", 8.0);
        check("2**3**2", 512.0);
        check("2**-1", 0.5);
        check("-2**2", -4.0);
        check("3*2**2", 12.0);
    }

    #[test]
    fn test_unary_chains() {
        check("-2", -2.0);
        check("5--2", 7.0);
        check("5+-2", 3.0);
        check("--2", 2.0);
    }

    #[test]
    fn test_functions() {
        check("floor(3.7)", 3.0);
        check("ceil(3.2)", 4.0);
        check("abs(-4)", 4.0);
        check("round(2.5)", 3.0);
        check("round(-2.5)", -2.0);
        check("sign(-3)", -1.0);
        check("sign(0)", 0.0);
        check("sqrt(16)", 4.0);
        check("pow(2,10)", 1024.0);
        check("min(3,7)", 3.0);
        check("max(3,7)", 7.0);
        check("2+floor(3.7)*2", 8.0);
        assert!((evaluate("cos(0)").unwrap() - 1.0).abs() < 1e-12);
        assert!((evaluate("log(exp(1))").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_errors() {
        assert!(evaluate("2+").is_err());
        assert!(evaluate("blah(2)").is_err());
        assert!(evaluate("pow(2)").is_err());
        assert!(evaluate("(2").is_err());
    }

    #[test]
    fn test_division_by_zero_is_ieee() {
        assert_eq!(evaluate("1/0").unwrap(), f64::INFINITY);
        assert!(evaluate("0/0").unwrap().is_nan());
    }
}
