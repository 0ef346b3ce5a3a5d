use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// The comparison half of a compare point.
///
/// Parsing normalizes the aliases the notation accepts: `==` is `=`,
/// and `!` / `<>` are `!=`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CompareOperator {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl CompareOperator {
    pub fn compare(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Equal => lhs == rhs,
            Self::NotEqual => lhs != rhs,
            Self::LessThan => lhs < rhs,
            Self::GreaterThan => lhs > rhs,
            Self::LessThanOrEqual => lhs <= rhs,
            Self::GreaterThanOrEqual => lhs >= rhs,
        }
    }
}

impl FromStr for CompareOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" | "==" => Ok(Self::Equal),
            "!=" | "<>" | "!" => Ok(Self::NotEqual),
            "<" => Ok(Self::LessThan),
            ">" => Ok(Self::GreaterThan),
            "<=" => Ok(Self::LessThanOrEqual),
            ">=" => Ok(Self::GreaterThanOrEqual),
            _ => Err(Error::InvalidOperator(s.to_string())),
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThanOrEqual => ">=",
        };
        f.write_str(s)
    }
}

/// An `(operator, value)` predicate over rolled values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ComparePoint {
    operator: CompareOperator,
    value: f64,
}

impl ComparePoint {
    pub fn new(operator: CompareOperator, value: f64) -> Result<Self, Error> {
        if !value.is_finite() {
            return Err(Error::invalid_argument(
                "compare point value",
                format!("{} is not finite", value),
            ));
        }
        Ok(Self { operator, value })
    }

    pub(crate) fn equal_to(value: f64) -> Self {
        // Values fed from die bounds are always finite.
        Self {
            operator: CompareOperator::Equal,
            value,
        }
    }

    pub fn operator(&self) -> CompareOperator {
        self.operator
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// NaN on either side never matches, not even for `!=`.
    pub fn matches(&self, x: f64) -> bool {
        if x.is_nan() || self.value.is_nan() {
            return false;
        }
        self.operator.compare(x, self.value)
    }
}

impl fmt::Display for ComparePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.operator, f)?;
        if self.value.fract() == 0.0 {
            write!(f, "{}", self.value as i64)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

impl FromStr for ComparePoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() || *c == '-' || *c == '.')
            .map(|(i, _)| i)
            .ok_or(Error::MissingArgument("compare point value"))?;
        if split == 0 {
            return Err(Error::MissingArgument("compare point operator"));
        }
        let operator = s[..split].parse()?;
        let value: f64 = s[split..]
            .parse()
            .map_err(|e| Error::invalid_argument("compare point value", e))?;
        Self::new(operator, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_aliases() {
        assert_eq!("=".parse::<CompareOperator>().unwrap(), CompareOperator::Equal);
        assert_eq!("==".parse::<CompareOperator>().unwrap(), CompareOperator::Equal);
        assert_eq!("!=".parse::<CompareOperator>().unwrap(), CompareOperator::NotEqual);
        assert_eq!("<>".parse::<CompareOperator>().unwrap(), CompareOperator::NotEqual);
        assert_eq!("!".parse::<CompareOperator>().unwrap(), CompareOperator::NotEqual);
        assert_eq!(
            "~".parse::<CompareOperator>(),
            Err(Error::InvalidOperator("~".to_string()))
        );
    }

    #[test]
    fn test_matches() {
        let cp = ComparePoint::new(CompareOperator::GreaterThanOrEqual, 4.0).unwrap();
        assert!(cp.matches(4.0));
        assert!(cp.matches(5.0));
        assert!(!cp.matches(3.9));
        assert!(!cp.matches(f64::NAN));

        let ne = ComparePoint::new(CompareOperator::NotEqual, 1.0).unwrap();
        assert!(ne.matches(2.0));
        assert!(!ne.matches(1.0));
        assert!(!ne.matches(f64::NAN));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(ComparePoint::new(CompareOperator::Equal, f64::INFINITY).is_err());
        assert!(ComparePoint::new(CompareOperator::Equal, f64::NAN).is_err());
    }

    #[test]
    fn test_display() {
        let cp = ComparePoint::new(CompareOperator::GreaterThanOrEqual, 4.0).unwrap();
        assert_eq!(cp.to_string(), ">=4");
        let cp = ComparePoint::new(CompareOperator::LessThan, 2.5).unwrap();
        assert_eq!(cp.to_string(), "<2.5");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            ">=4".parse::<ComparePoint>().unwrap(),
            ComparePoint::new(CompareOperator::GreaterThanOrEqual, 4.0).unwrap()
        );
        assert_eq!(
            "<>-1".parse::<ComparePoint>().unwrap(),
            ComparePoint::new(CompareOperator::NotEqual, -1.0).unwrap()
        );
        assert_eq!(
            ">".parse::<ComparePoint>(),
            Err(Error::MissingArgument("compare point value"))
        );
    }
}
