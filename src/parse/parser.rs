use super::ast::{self, ExpressionNode};
use super::error::{SourcePosition, SyntaxError};
use super::lexer::{lexer, Lexer, TokenKind};
use crate::compare::{CompareOperator, ComparePoint};
use crate::description::{Description, DescriptionKind};
use crate::dice::{Die, FudgeDie, PercentileDie, StandardDie};
use crate::error::Error;
use crate::group::RollGroup;
use crate::math;
use crate::modifier::{
    CriticalFailureModifier, CriticalSuccessModifier, DropModifier, End, ExplodeModifier,
    KeepModifier, MaxModifier, MinModifier, ModifierList, ReRollModifier, SortDirection,
    SortModifier, TargetModifier, UniqueModifier,
};
use crate::Result;
use logos_iter::LogosIter;
use vec1::Vec1;

/// Parses a notation string into its expression node list.
pub fn parse(notation: &str) -> Result<Vec<ExpressionNode>> {
    if notation.trim().is_empty() {
        return Err(Error::Notation);
    }
    Parser::new(notation).parse()
}

pub struct Parser<'a> {
    src: &'a str,
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    const OPERATORS: &'static [TokenKind] = &[
        TokenKind::StarStar,
        TokenKind::Caret,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::Percent,
        TokenKind::Plus,
        TokenKind::Minus,
    ];

    const COMPARE_STARTS: &'static [TokenKind] = &[
        TokenKind::LessEqual,
        TokenKind::GreaterEqual,
        TokenKind::EqualEqual,
        TokenKind::Equal,
        TokenKind::LessGreater,
        TokenKind::BangEqual,
        TokenKind::Less,
        TokenKind::Greater,
    ];

    const DIE_STARTS: &'static [TokenKind] = &[
        TokenKind::DieMarker,
        TokenKind::PercentileSides,
        TokenKind::FudgeSides,
    ];

    const FUNCTIONS: &'static [TokenKind] = &[
        TokenKind::Abs,
        TokenKind::Ceil,
        TokenKind::Cos,
        TokenKind::Exp,
        TokenKind::Floor,
        TokenKind::Log,
        TokenKind::Round,
        TokenKind::Sign,
        TokenKind::Sin,
        TokenKind::Sqrt,
        TokenKind::Tan,
        TokenKind::Pow,
        TokenKind::Min,
        TokenKind::Max,
    ];

    const DESCRIPTIONS: &'static [TokenKind] = &[
        TokenKind::InlineDescription,
        TokenKind::BlockDescription,
        TokenKind::BracketDescription,
    ];

    pub fn new(s: &'a str) -> Self {
        Self {
            src: s,
            lexer: lexer(s),
        }
    }

    pub fn parse(mut self) -> Result<Vec<ExpressionNode>> {
        let mut nodes = self.parse_expression()?;
        self.attach_trailing_descriptions(&mut nodes)?;
        if self.lexer.peek().is_some() {
            return self.unexpected_token(Self::OPERATORS);
        }
        Ok(nodes)
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        self.lexer.peek().map_or(false, |&peeked| peeked == kind)
    }

    fn matches_any(&mut self, options: &[TokenKind]) -> bool {
        self.lexer
            .peek()
            .map_or(false, |peeked| options.contains(peeked))
    }

    fn consume(&mut self, expected: TokenKind) -> Result<()> {
        if self.matches(expected) {
            self.lexer.next();
            Ok(())
        } else {
            self.unexpected_token(&[expected])
        }
    }

    fn unexpected_token<T>(&mut self, expected: &[TokenKind]) -> Result<T> {
        self.lexer.next();
        let expected = expected
            .iter()
            .map(|kind| kind.to_str().to_string())
            .collect();
        Err(self.syntax_error(expected))
    }

    fn syntax_error(&mut self, expected: Vec<String>) -> Error {
        let expected =
            Vec1::try_from_vec(expected).unwrap_or_else(|_| Vec1::new("<unknown>".to_string()));
        Error::Syntax(SyntaxError {
            pos: SourcePosition::new(self.src, self.lexer.span()),
            expected,
        })
    }

    /// The token's slice, converted through `f64` so oversized integer
    /// literals degrade gracefully instead of failing to parse.
    fn slice_as_int(&mut self) -> i64 {
        let value: f64 = self.lexer.slice().parse().unwrap_or(f64::MAX);
        if value >= i64::MAX as f64 {
            i64::MAX
        } else {
            value as i64
        }
    }

    fn parse_expression(&mut self) -> Result<Vec<ExpressionNode>> {
        let mut nodes = self.parse_factor()?;
        while self.matches_any(Self::OPERATORS) {
            let kind = self.lexer.next().expect("operator peeked");
            let op = match kind {
                // The caret is an alias for exponentiation.
                TokenKind::Caret | TokenKind::StarStar => "**",
                _ => self.lexer.slice(),
            };
            nodes.push(ExpressionNode::Operator(op.to_string()));
            nodes.extend(self.parse_factor()?);
        }
        Ok(nodes)
    }

    fn parse_factor(&mut self) -> Result<Vec<ExpressionNode>> {
        match self.lexer.peek().copied() {
            Some(TokenKind::Integer) => {
                self.lexer.next();
                let value = self.slice_as_int();
                if self.matches_any(Self::DIE_STARTS) {
                    Ok(vec![self.parse_die(value)?])
                } else {
                    Ok(vec![ExpressionNode::Number(value as f64)])
                }
            }
            Some(TokenKind::Decimal) => {
                self.lexer.next();
                let value: f64 = self
                    .lexer
                    .slice()
                    .parse()
                    .map_err(|e| Error::invalid_argument("number", e))?;
                Ok(vec![ExpressionNode::Number(value)])
            }
            Some(TokenKind::Minus) => {
                self.lexer.next();
                let value = self.parse_number()?;
                Ok(vec![ExpressionNode::Number(-value)])
            }
            Some(TokenKind::DieMarker | TokenKind::PercentileSides | TokenKind::FudgeSides) => {
                Ok(vec![self.parse_die(1)?])
            }
            Some(TokenKind::LeftParen) => self.parse_parenthesized(),
            Some(TokenKind::LeftBrace) => Ok(vec![self.parse_group()?]),
            Some(kind) if Self::FUNCTIONS.contains(&kind) => self.parse_function(),
            _ => self.unexpected_token(&[
                TokenKind::Integer,
                TokenKind::Decimal,
                TokenKind::DieMarker,
                TokenKind::LeftParen,
                TokenKind::LeftBrace,
            ]),
        }
    }

    fn parse_parenthesized(&mut self) -> Result<Vec<ExpressionNode>> {
        self.consume(TokenKind::LeftParen)?;
        let inner = self.parse_expression()?;
        self.consume(TokenKind::RightParen)?;

        if self.matches_any(Self::DIE_STARTS) {
            // `(2*3)d6`: the quantity evaluates at parse time.
            let qty = self.evaluate_pure(&inner, "die quantity")?;
            Ok(vec![self.parse_die(qty)?])
        } else {
            let mut nodes = vec![ExpressionNode::Operator("(".to_string())];
            nodes.extend(inner);
            nodes.push(ExpressionNode::Operator(")".to_string()));
            Ok(nodes)
        }
    }

    fn evaluate_pure(&mut self, nodes: &[ExpressionNode], what: &'static str) -> Result<i64> {
        if nodes
            .iter()
            .any(|n| matches!(n, ExpressionNode::Die(_) | ExpressionNode::Group(_)))
        {
            return Err(self.syntax_error(vec![format!("a plain arithmetic expression for {}", what)]));
        }
        let value = math::evaluate(&ast::notation(nodes))?;
        if value.fract() != 0.0 {
            return Err(Error::invalid_argument(
                what,
                format!("{} is not an integer", value),
            ));
        }
        Ok(value as i64)
    }

    fn parse_die(&mut self, qty: i64) -> Result<ExpressionNode> {
        let kind = self.lexer.next().expect("die token peeked");
        let die = match kind {
            TokenKind::DieMarker => {
                let sides = match self.lexer.peek() {
                    Some(TokenKind::Integer) => {
                        self.lexer.next();
                        self.slice_as_int()
                    }
                    Some(TokenKind::LeftParen) => {
                        self.lexer.next();
                        let inner = self.parse_expression()?;
                        self.consume(TokenKind::RightParen)?;
                        self.evaluate_pure(&inner, "die sides")?
                    }
                    _ => {
                        return self.unexpected_token(&[TokenKind::Integer, TokenKind::LeftParen])
                    }
                };
                Die::Standard(StandardDie::new(qty, sides)?)
            }
            TokenKind::PercentileSides => Die::Percentile(PercentileDie::new(qty)?),
            TokenKind::FudgeSides => {
                let non_blanks = if self.lexer.slice() == "dF.1" { 1 } else { 2 };
                Die::Fudge(FudgeDie::new(qty, non_blanks)?)
            }
            _ => unreachable!("parse_die called on a non-die token"),
        };

        let modifiers = self.parse_modifiers(true)?;
        let mut die = if modifiers.is_empty() {
            die
        } else {
            die.with_modifiers(modifiers)
        };
        if let Some(description) = self.parse_descriptions()? {
            die = die.with_description(description);
        }
        Ok(ExpressionNode::Die(die))
    }

    fn parse_group(&mut self) -> Result<ExpressionNode> {
        self.consume(TokenKind::LeftBrace)?;
        let mut expressions = vec![self.parse_expression()?];
        while self.matches(TokenKind::Comma) {
            self.lexer.next();
            expressions.push(self.parse_expression()?);
        }
        self.consume(TokenKind::RightBrace)?;

        let modifiers = self.parse_modifiers(false)?;
        let mut group = RollGroup::new(expressions);
        if !modifiers.is_empty() {
            group = group.with_modifiers(modifiers);
        }
        if let Some(description) = self.parse_descriptions()? {
            group = group.with_description(description);
        }
        Ok(ExpressionNode::Group(group))
    }

    fn parse_function(&mut self) -> Result<Vec<ExpressionNode>> {
        let kind = self.lexer.next().expect("function token peeked");
        let name = self.lexer.slice().to_string();
        self.consume(TokenKind::LeftParen)?;

        let mut nodes = vec![ExpressionNode::Operator(format!("{}(", name))];
        nodes.extend(self.parse_expression()?);
        if matches!(kind, TokenKind::Pow | TokenKind::Min | TokenKind::Max) {
            self.consume(TokenKind::Comma)?;
            nodes.push(ExpressionNode::Operator(",".to_string()));
            nodes.extend(self.parse_expression()?);
        }
        self.consume(TokenKind::RightParen)?;
        nodes.push(ExpressionNode::Operator(")".to_string()));
        Ok(nodes)
    }

    /// Parses the modifier chain after a die (`dice`) or brace group.
    /// Groups only admit keep, drop, sorting, and target.
    fn parse_modifiers(&mut self, dice: bool) -> Result<ModifierList> {
        let mut list = ModifierList::new();
        loop {
            let Some(&kind) = self.lexer.peek() else {
                break;
            };
            match kind {
                TokenKind::Bang if dice => {
                    self.lexer.next();
                    let compound = if self.matches(TokenKind::Bang) {
                        self.lexer.next();
                        true
                    } else {
                        false
                    };
                    let penetrate = if self.matches(TokenKind::Penetrate) {
                        self.lexer.next();
                        true
                    } else {
                        false
                    };
                    let cp = self.parse_optional_compare_point()?;
                    list.add(ExplodeModifier::new(cp, compound, penetrate));
                }
                // `!=` is an explode whose compare point starts with `=`.
                TokenKind::BangEqual if dice => {
                    self.lexer.next();
                    let value = self.parse_number()?;
                    let cp = ComparePoint::new(CompareOperator::Equal, value)?;
                    list.add(ExplodeModifier::new(Some(cp), false, false));
                }
                TokenKind::ReRoll | TokenKind::ReRollOnce if dice => {
                    let once = kind == TokenKind::ReRollOnce;
                    self.lexer.next();
                    let cp = self.parse_optional_compare_point()?;
                    list.add(ReRollModifier::new(once, cp));
                }
                TokenKind::Unique | TokenKind::UniqueOnce if dice => {
                    let once = kind == TokenKind::UniqueOnce;
                    self.lexer.next();
                    let cp = self.parse_optional_compare_point()?;
                    list.add(UniqueModifier::new(once, cp));
                }
                TokenKind::Keep | TokenKind::KeepHighest | TokenKind::KeepLowest => {
                    self.lexer.next();
                    let end = if kind == TokenKind::KeepLowest {
                        End::Lowest
                    } else {
                        End::Highest
                    };
                    let qty = self.parse_modifier_qty()?;
                    list.add(KeepModifier::new(end, qty)?);
                }
                TokenKind::DieMarker | TokenKind::DropHighest | TokenKind::DropLowest => {
                    self.lexer.next();
                    let end = if kind == TokenKind::DropHighest {
                        End::Highest
                    } else {
                        End::Lowest
                    };
                    let qty = self.parse_modifier_qty()?;
                    list.add(DropModifier::new(end, qty)?);
                }
                TokenKind::CriticalSuccess if dice => {
                    self.lexer.next();
                    let cp = self.parse_optional_compare_point()?;
                    list.add(CriticalSuccessModifier::new(cp));
                    // `cs>=18f<=2` pairs a failure point with the
                    // success one.
                    if self.matches(TokenKind::FailMarker) {
                        self.lexer.next();
                        let cp = self.parse_compare_point()?;
                        list.add(CriticalFailureModifier::new(Some(cp)));
                    }
                }
                TokenKind::CriticalFailure if dice => {
                    self.lexer.next();
                    let cp = self.parse_optional_compare_point()?;
                    list.add(CriticalFailureModifier::new(cp));
                }
                TokenKind::Sort | TokenKind::SortAscending | TokenKind::SortDescending => {
                    self.lexer.next();
                    let direction = if kind == TokenKind::SortDescending {
                        SortDirection::Descending
                    } else {
                        SortDirection::Ascending
                    };
                    list.add(SortModifier::new(direction));
                }
                TokenKind::Min if dice => {
                    self.lexer.next();
                    let value = self.parse_number()?;
                    list.add(MinModifier::new(value)?);
                }
                TokenKind::Max if dice => {
                    self.lexer.next();
                    let value = self.parse_number()?;
                    list.add(MaxModifier::new(value)?);
                }
                _ if Self::COMPARE_STARTS.contains(&kind) => {
                    let success = self.parse_compare_point()?;
                    let failure = if self.matches(TokenKind::FailMarker) {
                        self.lexer.next();
                        Some(self.parse_compare_point()?)
                    } else {
                        None
                    };
                    list.add(TargetModifier::new(success, failure));
                }
                _ => break,
            }
        }
        Ok(list)
    }

    fn parse_modifier_qty(&mut self) -> Result<i64> {
        self.consume(TokenKind::Integer)?;
        Ok(self.slice_as_int())
    }

    fn parse_optional_compare_point(&mut self) -> Result<Option<ComparePoint>> {
        if self.matches_any(Self::COMPARE_STARTS) {
            Ok(Some(self.parse_compare_point()?))
        } else {
            Ok(None)
        }
    }

    fn parse_compare_point(&mut self) -> Result<ComparePoint> {
        let Some(&kind) = self.lexer.peek() else {
            return self.unexpected_token(Self::COMPARE_STARTS);
        };
        let operator = match kind {
            TokenKind::LessEqual => CompareOperator::LessThanOrEqual,
            TokenKind::GreaterEqual => CompareOperator::GreaterThanOrEqual,
            TokenKind::EqualEqual | TokenKind::Equal => CompareOperator::Equal,
            TokenKind::LessGreater | TokenKind::BangEqual => CompareOperator::NotEqual,
            TokenKind::Less => CompareOperator::LessThan,
            TokenKind::Greater => CompareOperator::GreaterThan,
            _ => return self.unexpected_token(Self::COMPARE_STARTS),
        };
        self.lexer.next();
        let value = self.parse_number()?;
        ComparePoint::new(operator, value)
    }

    /// A number literal with an optional leading minus.
    fn parse_number(&mut self) -> Result<f64> {
        let negative = if self.matches(TokenKind::Minus) {
            self.lexer.next();
            true
        } else {
            false
        };
        match self.lexer.peek() {
            Some(TokenKind::Integer | TokenKind::Decimal) => {
                self.lexer.next();
                let value: f64 = self
                    .lexer
                    .slice()
                    .parse()
                    .map_err(|e| Error::invalid_argument("number", e))?;
                Ok(if negative { -value } else { value })
            }
            _ => self.unexpected_token(&[TokenKind::Integer, TokenKind::Decimal]),
        }
    }

    fn parse_descriptions(&mut self) -> Result<Option<Description>> {
        let mut first: Option<Description> = None;
        while self.matches_any(Self::DESCRIPTIONS) {
            let kind = self.lexer.next().expect("description peeked");
            let slice = self.lexer.slice();
            let (text, desc_kind) = match kind {
                TokenKind::InlineDescription => {
                    let text = slice.trim_start_matches(|c| c == '#' || c == '/');
                    (text, DescriptionKind::Inline)
                }
                TokenKind::BlockDescription => {
                    (&slice[2..slice.len() - 2], DescriptionKind::Multiline)
                }
                TokenKind::BracketDescription => {
                    (&slice[1..slice.len() - 1], DescriptionKind::Multiline)
                }
                _ => unreachable!("description token peeked"),
            };
            let description = Description::new(text.trim(), desc_kind)?;
            // Later descriptions on the same term are discarded.
            if first.is_none() {
                first = Some(description);
            }
        }
        Ok(first)
    }

    /// A description after operators or numbers still belongs to the
    /// nearest preceding die or group.
    fn attach_trailing_descriptions(&mut self, nodes: &mut [ExpressionNode]) -> Result<()> {
        let Some(description) = self.parse_descriptions()? else {
            return Ok(());
        };
        let target = nodes.iter_mut().rev().find(|n| {
            matches!(n, ExpressionNode::Die(_) | ExpressionNode::Group(_))
        });
        match target {
            Some(ExpressionNode::Die(die)) => die.set_description_if_empty(description),
            Some(ExpressionNode::Group(group)) => group.set_description_if_empty(description),
            _ => {
                return Err(
                    self.syntax_error(vec!["a dice term before the description".to_string()])
                )
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::Rollable;
    use crate::modifier::Modifier;

    fn parse_ok(s: &str) -> Vec<ExpressionNode> {
        parse(s).unwrap()
    }

    fn single_die(s: &str) -> Die {
        let nodes = parse_ok(s);
        assert_eq!(nodes.len(), 1, "expected one node for {:?}", s);
        match nodes.into_iter().next() {
            Some(ExpressionNode::Die(die)) => die,
            other => panic!("expected a die for {:?}, got {:?}", s, other),
        }
    }

    fn single_group(s: &str) -> RollGroup {
        match parse_ok(s).into_iter().next() {
            Some(ExpressionNode::Group(group)) => group,
            other => panic!("expected a group for {:?}, got {:?}", s, other),
        }
    }

    #[test]
    fn test_parse_numbers_and_operators() {
        assert_eq!(
            parse_ok("2 + 3"),
            vec![
                ExpressionNode::Number(2.0),
                ExpressionNode::Operator("+".to_string()),
                ExpressionNode::Number(3.0),
            ]
        );
        assert_eq!(parse_ok("-2"), vec![ExpressionNode::Number(-2.0)]);
        assert_eq!(parse_ok("3.5"), vec![ExpressionNode::Number(3.5)]);
    }

    #[test]
    fn test_caret_canonicalizes() {
        let nodes = parse_ok("2^3");
        assert_eq!(nodes[1], ExpressionNode::Operator("**".to_string()));
    }

    #[test]
    fn test_parse_dice() {
        assert_eq!(single_die("4d6").notation(), "4d6");
        assert_eq!(single_die("d20").notation(), "1d20");
        assert_eq!(single_die("2d%").notation(), "2d%");
        assert_eq!(single_die("dF").notation(), "1dF.2");
        assert_eq!(single_die("3dF.1").notation(), "3dF.1");
    }

    #[test]
    fn test_parse_dice_with_expression_qty_and_sides() {
        assert_eq!(single_die("(2*3)d6").notation(), "6d6");
        assert_eq!(single_die("2d(3+3)").notation(), "2d6");
        assert!(parse("(1d4)d6").is_err());
        assert!(parse("2d(1d4)").is_err());
    }

    #[test]
    fn test_parse_modifiers() {
        assert_eq!(single_die("4d6!").notation(), "4d6!");
        assert_eq!(single_die("4d6!!").notation(), "4d6!!");
        assert_eq!(single_die("4d6!p").notation(), "4d6!p");
        assert_eq!(single_die("4d6!>5").notation(), "4d6!>5");
        assert_eq!(single_die("4d6!=5").notation(), "4d6!=5");
        assert_eq!(single_die("4d6r").notation(), "4d6r");
        assert_eq!(single_die("1d6ro<2").notation(), "1d6ro<2");
        assert_eq!(single_die("4d6u").notation(), "4d6u");
        assert_eq!(single_die("4d6uo=3").notation(), "4d6uo=3");
        assert_eq!(single_die("4d6kh2").notation(), "4d6kh2");
        assert_eq!(single_die("4d6k2").notation(), "4d6kh2");
        assert_eq!(single_die("4d6dl1").notation(), "4d6dl1");
        assert_eq!(single_die("4d6d1").notation(), "4d6dl1");
        assert_eq!(single_die("4d6min2max5").notation(), "4d6min2max5");
        assert_eq!(single_die("4d6sa").notation(), "4d6sa");
        assert_eq!(single_die("4d6s").notation(), "4d6sa");
        assert_eq!(single_die("2d20cs>=18").notation(), "2d20cs>=18");
        assert_eq!(single_die("2d20cf<=2").notation(), "2d20cf<=2");
    }

    #[test]
    fn test_parse_target() {
        let die = single_die("4d6>4");
        let mods: Vec<String> = die.modifiers().iter().map(Modifier::name).collect();
        assert_eq!(mods, vec!["target"]);
        assert_eq!(die.notation(), "4d6>4");

        assert_eq!(single_die("4d6>=5f<=1").notation(), "4d6>=5f<=1");
        assert_eq!(single_die("4dF>-1").notation(), "4dF.2>-1");
    }

    #[test]
    fn test_crit_success_with_failure_point() {
        let die = single_die("2d20cs>=18f<=2");
        let mods: Vec<String> = die.modifiers().iter().map(Modifier::name).collect();
        assert_eq!(mods, vec!["critical-success", "critical-failure"]);
    }

    #[test]
    fn test_modifier_ordering_is_by_pipeline() {
        let die = single_die("4d6kh2!min2");
        let orders: Vec<u8> = die.modifiers().iter().map(Modifier::order).collect();
        assert_eq!(orders, vec![1, 3, 6]);
    }

    #[test]
    fn test_parse_group() {
        let group = single_group("{4d6+4, 2d10}kh1");
        assert_eq!(group.expressions().len(), 2);
        assert_eq!(group.notation(), "{4d6+4, 2d10}kh1");

        assert_eq!(single_group("{1d6}>3").notation(), "{1d6}>3");
        assert_eq!(single_group("{2d6, 3d4}sd").notation(), "{2d6, 3d4}sd");
    }

    #[test]
    fn test_group_rejects_dice_only_modifiers() {
        assert!(parse("{1d6}!").is_err());
        assert!(parse("{1d6}r").is_err());
        assert!(parse("{1d6}u").is_err());
    }

    #[test]
    fn test_parse_math_functions() {
        let nodes = parse_ok("2d6 + floor(3.7)");
        assert_eq!(nodes[2], ExpressionNode::Operator("floor(".to_string()));
        assert_eq!(nodes[3], ExpressionNode::Number(3.7));
        assert_eq!(nodes[4], ExpressionNode::Operator(")".to_string()));

        let nodes = parse_ok("pow(2, 3)");
        assert_eq!(
            ast::notation(&nodes),
            "pow(2,3)"
        );
    }

    #[test]
    fn test_parse_parentheses() {
        let nodes = parse_ok("(4d6+2)*3");
        assert_eq!(nodes[0], ExpressionNode::Operator("(".to_string()));
        assert_eq!(nodes[4], ExpressionNode::Operator(")".to_string()));
        assert_eq!(nodes[5], ExpressionNode::Operator("*".to_string()));
    }

    #[test]
    fn test_parse_descriptions() {
        let die = single_die("4d6 # to hit");
        assert_eq!(die.description().unwrap().text(), "to hit");

        let die = single_die("4d6 [fire] [ice]");
        assert_eq!(die.description().unwrap().text(), "fire");

        let die = single_die("4d6 /* multi\nline */");
        assert_eq!(die.description().unwrap().text(), "multi\nline");

        let group = single_group("{1d6} // group note");
        assert_eq!(group.description().unwrap().text(), "group note");
    }

    #[test]
    fn test_trailing_description_attaches_to_last_die() {
        let nodes = parse_ok("4d6+2 # damage");
        match &nodes[0] {
            ExpressionNode::Die(die) => {
                assert_eq!(die.description().unwrap().text(), "damage");
            }
            other => panic!("expected die, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_notation() {
        assert_eq!(parse(""), Err(Error::Notation));
        assert_eq!(parse("   "), Err(Error::Notation));
    }

    #[test]
    fn test_syntax_errors_carry_position() {
        let err = parse("4d6q2").unwrap_err();
        match err {
            Error::Syntax(syntax) => {
                assert_eq!(syntax.pos.offset, 3);
                assert_eq!(syntax.pos.line, 1);
                assert_eq!(syntax.pos.column, 4);
            }
            other => panic!("expected syntax error, got {}", other),
        }

        assert!(parse("4d").is_err());
        assert!(parse("{1d6").is_err());
        assert!(parse("4d6kh").is_err());
    }

    #[test]
    fn test_out_of_range_dice() {
        assert!(matches!(parse("0d6"), Err(Error::OutOfRange { .. })));
        assert!(matches!(parse("1000d6"), Err(Error::OutOfRange { .. })));
        assert!(matches!(parse("4d0"), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn test_notation_round_trip() {
        for notation in [
            "4d6",
            "4d6!p>5",
            "4d6!!",
            "2d20kh1",
            "4d6dl1sa",
            "2d%r<10",
            "1dF.1",
            "{4d6+4, 2d10}kh1",
            "4d6>=5f<=1",
            "4d6min2max5",
        ] {
            let first = parse(notation).unwrap();
            let reconstructed = ast::notation(&first);
            let second = parse(&reconstructed).unwrap();
            assert_eq!(
                ast::notation(&second),
                reconstructed,
                "round-tripping {:?}",
                notation
            );
        }
    }
}
