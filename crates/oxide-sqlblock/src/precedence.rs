//! Operators and their precedence.
//!
//! Ranks follow the PostgreSQL operator precedence table, extended with the
//! list and ordering tokens used to build clause bodies. An operand is
//! parenthesized only when the enclosing operator ranks strictly higher than
//! the operand's own top-level operator.

use crate::expr::RawDangerous;

/// Where an operator's token goes relative to its operand(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    /// `left <op> right`
    Infix,
    /// `<op> operand`
    Prefix,
    /// `operand <op>`
    Postfix,
    /// `<op>(operand)`, self-delimiting.
    Wrap,
}

/// An SQL operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    // Logical
    And,
    Or,
    Not,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Is,
    IsNot,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Neg,
    Sqrt,
    Abs,
    Factorial,

    // Strings, arrays and text search
    Like,
    Ilike,
    Cat,
    Contains,
    ContainedBy,
    Overlap,
    Matches,
    In,

    // Keyword infixes used inside function arguments
    From,
    For,
    AtTimeZone,

    // Types, aliases, ordering and lists
    Cast,
    As,
    On,
    Asc,
    Desc,
    Comma,

    /// Trusted operator text supplied by the caller, spacing included.
    Raw(String),
}

impl Operator {
    /// Returns the SQL text of the operator, including surrounding spaces.
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
            Self::Not => "not",
            Self::Eq => " = ",
            Self::Ne => " != ",
            Self::Lt => " < ",
            Self::Le => " <= ",
            Self::Gt => " > ",
            Self::Ge => " >= ",
            Self::Is => " is ",
            Self::IsNot => " is not ",
            Self::Add => " + ",
            Self::Sub => " - ",
            Self::Mul => " * ",
            Self::Div => " / ",
            Self::Mod => " % ",
            Self::Pow => " ^ ",
            Self::Neg => "-",
            Self::Sqrt => "|/ ",
            Self::Abs => "@ ",
            Self::Factorial => "!",
            Self::Like => " LIKE ",
            Self::Ilike => " ILIKE ",
            Self::Cat => " || ",
            Self::Contains => " @> ",
            Self::ContainedBy => " <@ ",
            Self::Overlap => " && ",
            Self::Matches => " @@ ",
            Self::In => " in ",
            Self::From => " from ",
            Self::For => " for ",
            Self::AtTimeZone => " AT TIME ZONE ",
            Self::Cast => "::",
            Self::As => " AS ",
            Self::On => " ON ",
            Self::Asc => " ASC",
            Self::Desc => " DESC",
            Self::Comma => ", ",
            Self::Raw(s) => s,
        }
    }

    /// Returns the fixity of the operator.
    #[must_use]
    pub const fn fixity(&self) -> Fixity {
        match self {
            Self::Not => Fixity::Wrap,
            Self::Neg | Self::Sqrt | Self::Abs => Fixity::Prefix,
            Self::Factorial | Self::Asc | Self::Desc => Fixity::Postfix,
            _ => Fixity::Infix,
        }
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Cast => 140,
            Self::Neg | Self::Sqrt | Self::Abs | Self::Factorial => 130,
            Self::AtTimeZone => 120,
            Self::Pow => 110,
            Self::Mul | Self::Div | Self::Mod => 100,
            Self::Add | Self::Sub => 90,
            Self::Cat
            | Self::Contains
            | Self::ContainedBy
            | Self::Overlap
            | Self::Matches
            | Self::Raw(_) => 80,
            Self::In | Self::Like | Self::Ilike => 70,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 60,
            Self::Is | Self::IsNot => 50,
            // Unused for bracketing: `not(...)` is wrapped, so its block
            // reports no precedence.
            Self::Not => 40,
            Self::And => 30,
            Self::Or => 20,
            Self::From | Self::For => 10,
            Self::On => 8,
            Self::As => 6,
            Self::Asc | Self::Desc => 4,
            Self::Comma => 0,
        }
    }
}

impl From<RawDangerous> for Operator {
    fn from(raw: RawDangerous) -> Self {
        Self::Raw(raw.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        assert!(Operator::Mul.precedence() > Operator::Add.precedence());
        assert!(Operator::And.precedence() > Operator::Or.precedence());
        assert!(Operator::Eq.precedence() > Operator::And.precedence());
        assert!(Operator::Cast.precedence() > Operator::Abs.precedence());
        assert!(Operator::Abs.precedence() > Operator::Pow.precedence());
        assert_eq!(Operator::Neg.precedence(), Operator::Sqrt.precedence());
    }

    #[test]
    fn test_lists_bind_loosest() {
        for op in [Operator::And, Operator::Or, Operator::Desc, Operator::As] {
            assert!(op.precedence() > Operator::Comma.precedence());
        }
    }

    #[test]
    fn test_fixity() {
        assert_eq!(Operator::Eq.fixity(), Fixity::Infix);
        assert_eq!(Operator::Abs.fixity(), Fixity::Prefix);
        assert_eq!(Operator::Factorial.fixity(), Fixity::Postfix);
        assert_eq!(Operator::Not.fixity(), Fixity::Wrap);
    }

    #[test]
    fn test_raw_operator_token() {
        let op = Operator::from(RawDangerous::new(" foobar "));
        assert_eq!(op.token(), " foobar ");
        assert_eq!(op.fixity(), Fixity::Infix);
    }
}
