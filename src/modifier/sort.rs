use crate::results::{ResultGroup, ResultNode, RollResults};
use crate::Result;
use std::cmp::Ordering;
use std::fmt::{self, Write};

/// Orders rolls by value; on groups, recurses into nested containers
/// and orders a brace group's sub-expressions too.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SortModifier {
    direction: SortDirection,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::Ascending => 'a',
            Self::Descending => 'd',
        })
    }
}

impl SortModifier {
    pub fn new(direction: SortDirection) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub(crate) fn notation(&self) -> String {
        format!("s{}", self.direction)
    }

    fn compare(&self, a: f64, b: f64) -> Ordering {
        let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub(crate) fn run(&self, results: &mut RollResults) {
        results
            .rolls_mut()
            .sort_by(|a, b| self.compare(a.value(), b.value()));
    }

    pub(crate) fn run_group(&self, group: &mut ResultGroup) -> Result<()> {
        for node in group.results_mut() {
            match node {
                ResultNode::Results(results) => self.run(results),
                ResultNode::Group(sub) => self.run_group(sub)?,
                _ => {}
            }
        }

        if group.is_roll_group() {
            let mut keys = Vec::with_capacity(group.results().len());
            for node in group.results() {
                keys.push(match node {
                    ResultNode::Group(sub) => sub.value()?,
                    ResultNode::Results(results) => results.value(),
                    ResultNode::Number(n) => *n,
                    ResultNode::Operator(_) => 0.0,
                });
            }

            let mut order: Vec<usize> = (0..keys.len()).collect();
            order.sort_by(|&a, &b| self.compare(keys[a], keys[b]));

            let mut old: Vec<Option<ResultNode>> =
                group.results_mut().drain(..).map(Some).collect();
            *group.results_mut() = order
                .into_iter()
                .map(|i| old[i].take().expect("each index moved once"))
                .collect();
        }
        Ok(())
    }
}
