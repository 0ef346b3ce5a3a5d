use crate::dice::{Die, Rollable};
use crate::group::RollGroup;
use crate::results::fmt_num;
use std::fmt;

/// One element of a parsed expression: rollable terms interleaved with
/// the operators and literal numbers around them.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    Die(Die),
    Group(RollGroup),
    Number(f64),
    Operator(String),
}

impl ExpressionNode {
    pub fn notation(&self) -> String {
        match self {
            Self::Die(die) => die.notation(),
            Self::Group(group) => group.notation(),
            Self::Number(n) => fmt_num(*n),
            Self::Operator(op) => op.clone(),
        }
    }
}

impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}

/// Reconstructs notation for a node list.
pub fn notation(nodes: &[ExpressionNode]) -> String {
    nodes.iter().map(ExpressionNode::notation).collect()
}
