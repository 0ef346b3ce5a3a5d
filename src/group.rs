use crate::description::Description;
use crate::generator::NumberGenerator;
use crate::modifier::ModifierList;
use crate::parse::ast::{self, ExpressionNode};
use crate::results::ResultGroup;
use crate::roll::roll_expression;
use crate::Result;
use std::fmt;

/// A brace group: comma-separated sub-expressions rolled together, with
/// the group's own modifier map applied to the combined result.
#[derive(Debug, Clone, PartialEq)]
pub struct RollGroup {
    expressions: Vec<Vec<ExpressionNode>>,
    modifiers: ModifierList,
    description: Option<Description>,
}

impl RollGroup {
    pub fn new(expressions: Vec<Vec<ExpressionNode>>) -> Self {
        Self {
            expressions,
            modifiers: ModifierList::new(),
            description: None,
        }
    }

    pub fn with_modifiers(mut self, modifiers: ModifierList) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    pub(crate) fn set_description_if_empty(&mut self, description: Description) {
        if self.description.is_none() {
            self.description = Some(description);
        }
    }

    pub fn expressions(&self) -> &[Vec<ExpressionNode>] {
        &self.expressions
    }

    pub fn modifiers(&self) -> &ModifierList {
        &self.modifiers
    }

    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    pub fn notation(&self) -> String {
        let subs: Vec<String> = self.expressions.iter().map(|e| ast::notation(e)).collect();
        format!("{{{}}}{}", subs.join(", "), self.modifiers.notation())
    }

    /// Rolls every sub-expression, then runs the group modifiers over
    /// the combined result.
    pub fn roll(&self, gen: &mut NumberGenerator) -> Result<ResultGroup> {
        let subs = self
            .expressions
            .iter()
            .map(|nodes| roll_expression(nodes, gen))
            .collect::<Result<Vec<_>>>()?;

        let mut group = ResultGroup::roll_group(subs);
        for modifier in self.modifiers.iter() {
            modifier.run_on_group(&mut group)?;
        }
        Ok(group)
    }
}

impl fmt::Display for RollGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}
