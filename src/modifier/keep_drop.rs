use crate::error::Error;
use crate::results::{ResultGroup, ResultNode, RollResults};
use crate::Result;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::{self, Write};

use super::Flag;

/// Which end of the sorted rolls a keep/drop quantity counts from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum End {
    Highest,
    Lowest,
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::Highest => 'h',
            Self::Lowest => 'l',
        })
    }
}

/// Marks everything outside the kept quantity as dropped.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeepModifier {
    end: End,
    qty: u32,
}

impl KeepModifier {
    pub fn new(end: End, qty: i64) -> Result<Self> {
        Ok(Self {
            end,
            qty: check_qty("keep quantity", qty)?,
        })
    }

    pub fn end(&self) -> End {
        self.end
    }

    pub fn qty(&self) -> u32 {
        self.qty
    }

    pub(crate) fn notation(&self) -> String {
        format!("k{}{}", self.end, self.qty)
    }

    pub(crate) fn run(&self, results: &mut RollResults) {
        let values: Vec<f64> = results.rolls().iter().map(|r| r.value()).collect();
        for i in drop_indexes(&values, self.end, self.qty as usize, true) {
            drop_roll(&mut results.rolls_mut()[i]);
        }
    }

    pub(crate) fn run_group(&self, group: &mut ResultGroup) -> Result<()> {
        run_on_group(group, self.end, self.qty as usize, true)
    }
}

/// Marks the dropped quantity as dropped, keeping the rest.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DropModifier {
    end: End,
    qty: u32,
}

impl DropModifier {
    pub fn new(end: End, qty: i64) -> Result<Self> {
        Ok(Self {
            end,
            qty: check_qty("drop quantity", qty)?,
        })
    }

    pub fn end(&self) -> End {
        self.end
    }

    pub fn qty(&self) -> u32 {
        self.qty
    }

    pub(crate) fn notation(&self) -> String {
        format!("d{}{}", self.end, self.qty)
    }

    pub(crate) fn run(&self, results: &mut RollResults) {
        let values: Vec<f64> = results.rolls().iter().map(|r| r.value()).collect();
        for i in drop_indexes(&values, self.end, self.qty as usize, false) {
            drop_roll(&mut results.rolls_mut()[i]);
        }
    }

    pub(crate) fn run_group(&self, group: &mut ResultGroup) -> Result<()> {
        run_on_group(group, self.end, self.qty as usize, false)
    }
}

fn check_qty(name: &'static str, qty: i64) -> Result<u32> {
    if qty < 1 {
        return Err(Error::out_of_range(
            name,
            format!("must be a positive integer, got {}", qty),
        ));
    }
    u32::try_from(qty).map_err(|_| Error::out_of_range(name, format!("{} is too large", qty)))
}

fn drop_roll(roll: &mut crate::results::RollResult) {
    roll.add_flag(Flag::Drop);
    roll.set_use_in_total(false);
}

/// The indexes to drop: sort ascending by value (stable, so ties break
/// by original position) and slice off the unwanted end.
fn drop_indexes(values: &[f64], end: End, qty: usize, keep: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let n = order.len();
    let range = match (keep, end) {
        (true, End::Highest) => 0..n.saturating_sub(qty),
        (true, End::Lowest) => qty.min(n)..n,
        (false, End::Lowest) => 0..qty.min(n),
        (false, End::Highest) => n.saturating_sub(qty)..n,
    };
    order[range].to_vec()
}

fn run_on_group(group: &mut ResultGroup, end: End, qty: usize, keep: bool) -> Result<()> {
    let sub_count = group
        .results()
        .iter()
        .filter(|n| matches!(n, ResultNode::Group(_)))
        .count();

    if sub_count == 1 {
        // A single sub-expression flattens to its individual rolls.
        let mut values = Vec::new();
        for_each_roll(group, |roll| values.push(roll.value()));
        let to_drop: HashSet<usize> = drop_indexes(&values, end, qty, keep).into_iter().collect();
        let mut index = 0;
        for_each_roll_mut(group, |roll| {
            if to_drop.contains(&index) {
                drop_roll(roll);
            }
            index += 1;
        });
    } else {
        // Multiple sub-expressions are kept or dropped wholesale, keyed
        // by their summed value.
        let mut values = Vec::new();
        for node in group.results() {
            if let ResultNode::Group(sub) = node {
                values.push(sub.value()?);
            }
        }
        let to_drop: HashSet<usize> = drop_indexes(&values, end, qty, keep).into_iter().collect();
        let mut index = 0;
        for node in group.results_mut() {
            if let ResultNode::Group(sub) = node {
                if to_drop.contains(&index) {
                    sub.add_flag(Flag::Drop);
                    sub.set_use_in_total(false);
                }
                index += 1;
            }
        }
    }
    Ok(())
}

fn for_each_roll(group: &ResultGroup, mut f: impl FnMut(&crate::results::RollResult)) {
    for node in group.results() {
        if let ResultNode::Group(sub) = node {
            for child in sub.results() {
                if let ResultNode::Results(results) = child {
                    for roll in results.rolls() {
                        f(roll);
                    }
                }
            }
        }
    }
}

fn for_each_roll_mut(group: &mut ResultGroup, mut f: impl FnMut(&mut crate::results::RollResult)) {
    for node in group.results_mut() {
        if let ResultNode::Group(sub) = node {
            for child in sub.results_mut() {
                if let ResultNode::Results(results) = child {
                    for roll in results.rolls_mut() {
                        f(roll);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::RollResult;

    fn results(values: &[i64]) -> RollResults {
        values.iter().map(|&v| RollResult::new(v)).collect()
    }

    fn kept_values(rolls: &RollResults) -> Vec<f64> {
        rolls
            .rolls()
            .iter()
            .filter(|r| r.use_in_total())
            .map(|r| r.value())
            .collect()
    }

    #[test]
    fn test_keep_highest() {
        let mut rolls = results(&[1, 5, 2, 6]);
        KeepModifier::new(End::Highest, 2).unwrap().run(&mut rolls);

        assert_eq!(kept_values(&rolls), vec![5.0, 6.0]);
        assert!(rolls.rolls()[0].modifiers().contains(Flag::Drop));
        assert!(rolls.rolls()[2].modifiers().contains(Flag::Drop));
        assert_eq!(rolls.value(), 11.0);
    }

    #[test]
    fn test_keep_lowest() {
        let mut rolls = results(&[1, 5, 2, 6]);
        KeepModifier::new(End::Lowest, 1).unwrap().run(&mut rolls);
        assert_eq!(kept_values(&rolls), vec![1.0]);
    }

    #[test]
    fn test_drop_lowest() {
        let mut rolls = results(&[4, 1, 3]);
        DropModifier::new(End::Lowest, 1).unwrap().run(&mut rolls);
        assert_eq!(kept_values(&rolls), vec![4.0, 3.0]);
    }

    #[test]
    fn test_drop_highest() {
        let mut rolls = results(&[4, 1, 3]);
        DropModifier::new(End::Highest, 2).unwrap().run(&mut rolls);
        assert_eq!(kept_values(&rolls), vec![1.0]);
    }

    #[test]
    fn test_keep_more_than_available() {
        let mut rolls = results(&[4, 1]);
        KeepModifier::new(End::Highest, 5).unwrap().run(&mut rolls);
        assert_eq!(kept_values(&rolls), vec![4.0, 1.0]);
    }

    #[test]
    fn test_stable_tie_break() {
        let mut rolls = results(&[3, 3, 3]);
        KeepModifier::new(End::Highest, 2).unwrap().run(&mut rolls);
        // The earliest tied roll is the one dropped.
        assert!(rolls.rolls()[0].modifiers().contains(Flag::Drop));
        assert!(rolls.rolls()[1].use_in_total());
        assert!(rolls.rolls()[2].use_in_total());
    }

    #[test]
    fn test_rejects_bad_qty() {
        assert!(matches!(
            KeepModifier::new(End::Highest, 0),
            Err(Error::OutOfRange { .. })
        ));
        assert!(matches!(
            DropModifier::new(End::Lowest, -2),
            Err(Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_group_multiple_subs_keep_by_sum() {
        let sub1 = ResultGroup::new(vec![
            ResultNode::Results(results(&[3, 3, 3, 3])),
            ResultNode::Operator("+".to_string()),
            ResultNode::Number(4.0),
        ]);
        let sub2 = ResultGroup::new(vec![ResultNode::Results(results(&[9, 10]))]);
        let mut group = ResultGroup::roll_group(vec![sub1, sub2]);

        KeepModifier::new(End::Highest, 1)
            .unwrap()
            .run_group(&mut group)
            .unwrap();

        let subs: Vec<&ResultGroup> = group
            .results()
            .iter()
            .filter_map(|n| match n {
                ResultNode::Group(g) => Some(g),
                _ => None,
            })
            .collect();
        assert!(!subs[0].use_in_total());
        assert!(subs[0].modifiers().contains(Flag::Drop));
        assert!(subs[1].use_in_total());
        assert_eq!(group.value().unwrap(), 19.0);
    }

    #[test]
    fn test_group_single_sub_flattens_to_rolls() {
        let sub = ResultGroup::new(vec![
            ResultNode::Results(results(&[1, 5])),
            ResultNode::Operator("+".to_string()),
            ResultNode::Results(results(&[2, 6])),
        ]);
        let mut group = ResultGroup::roll_group(vec![sub]);

        KeepModifier::new(End::Highest, 2)
            .unwrap()
            .run_group(&mut group)
            .unwrap();

        let mut dropped = Vec::new();
        for_each_roll(&group, |roll| dropped.push(!roll.use_in_total()));
        assert_eq!(dropped, vec![true, false, true, false]);
    }
}
