use tabled::{Table, Tabled, settings::Style};

use crate::query::TopSkill;
use crate::storage::DbStats;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Table")]
    pub label: String,
    #[tabled(rename = "Rows")]
    pub value: String,
}

#[derive(Tabled)]
struct TopSkillRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Skill")]
    name: String,
    #[tabled(rename = "Projects")]
    count: usize,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            label: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("profiles", &stats.profiles.to_string());
    builder.add_row("skills", &stats.skills.to_string());
    builder.add_row("projects", &stats.projects.to_string());
    builder.add_row("work_experience", &stats.work.to_string());
    builder.build()
}

pub fn top_skills_table(skills: &[TopSkill]) -> String {
    if skills.is_empty() {
        return String::new();
    }

    let rows: Vec<TopSkillRow> = skills
        .iter()
        .enumerate()
        .map(|(i, skill)| TopSkillRow {
            rank: i + 1,
            name: skill.name.clone(),
            count: skill.count,
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_table_lists_every_table() {
        let table = stats_table(&DbStats {
            profiles: 1,
            skills: 19,
            projects: 6,
            work: 2,
        });
        assert!(table.contains("work_experience"));
        assert!(table.contains("19"));
    }

    #[test]
    fn test_top_skills_table_ranks() {
        let table = top_skills_table(&[TopSkill::new("React", 2), TopSkill::new("Rust", 1)]);
        assert!(table.contains("React"));
        assert!(table.contains("Projects"));
        assert!(top_skills_table(&[]).is_empty());
    }
}
