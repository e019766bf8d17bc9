//! Derived views computed in memory from stored rows

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A skill name and how many times it appears across all projects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSkill {
    pub name: String,
    pub count: usize,
}

impl TopSkill {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Count every occurrence of every skill name across the given tag lists.
///
/// Result is sorted by count descending. Equal counts keep the order in
/// which the names were first encountered.
pub fn count_skill_usage<I, L, S>(lists: I) -> Vec<TopSkill>
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<TopSkill> = Vec::new();

    for list in lists {
        for name in list {
            let name = name.as_ref();
            match positions.get(name) {
                Some(&idx) => counts[idx].count += 1,
                None => {
                    positions.insert(name.to_string(), counts.len());
                    counts.push(TopSkill::new(name, 1));
                }
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sorted_by_frequency() {
        let lists = vec![vec!["React", "Next.js"], vec!["React"], vec!["Rust"]];
        assert_eq!(
            count_skill_usage(lists),
            vec![
                TopSkill::new("React", 2),
                TopSkill::new("Next.js", 1),
                TopSkill::new("Rust", 1),
            ]
        );
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let lists = vec![vec!["Go", "Zig"], vec!["Zig", "Go"], vec!["C"]];
        let names: Vec<String> = count_skill_usage(lists).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Go", "Zig", "C"]);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let lists = vec![vec!["Rust"], vec!["rust"], vec!["Rust"]];
        assert_eq!(
            count_skill_usage(lists),
            vec![TopSkill::new("Rust", 2), TopSkill::new("rust", 1)]
        );
    }

    #[test]
    fn test_empty_input() {
        let lists: Vec<Vec<String>> = vec![vec![], vec![]];
        assert!(count_skill_usage(lists).is_empty());
    }
}
