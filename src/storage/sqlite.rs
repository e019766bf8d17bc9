//! SQLite storage implementation

use std::path::Path;

use chrono::Utc;
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};

use super::schema;
use crate::model::{
    NewProject, NewSkill, NewWorkExperience, Profile, ProfileInput, ProfileWithRelations, Project,
    Skill, WorkExperience,
};
use crate::{Error, Result};

const PROFILE_COLUMNS: &str = "id, name, email, education, github_url, linkedin_url, portfolio_url, avatar_url, created_at, updated_at";
const SKILL_COLUMNS: &str = "id, profile_id, name, proficiency, years_experience";
const PROJECT_COLUMNS: &str = "id, profile_id, title, description, link, skills_used, start_date, end_date, created_at";
const WORK_COLUMNS: &str = "id, profile_id, company, role, start_date, end_date, description, is_current";

// Skills with no years value sort after those with one
const SKILL_ORDER: &str = "ORDER BY years_experience IS NULL, years_experience DESC, id ASC";
const PROJECT_ORDER: &str = "ORDER BY created_at DESC, id DESC";
const WORK_ORDER: &str = "ORDER BY start_date DESC, id DESC";

/// SQLite-backed storage for portfolio content
pub struct PortfolioStore {
    conn: Connection,
}

impl PortfolioStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        self.register_functions()?;
        self.conn.execute_batch(schema::ENABLE_FOREIGN_KEYS)?;
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// `casefold(text)` lowercases with full Unicode rules; SQLite's own
    /// `lower()` and `LIKE` only fold ASCII
    fn register_functions(&self) -> Result<()> {
        self.conn.create_scalar_function(
            "casefold",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let value: Option<String> = ctx.get(0)?;
                Ok(value.map(|v| v.to_lowercase()))
            },
        )?;
        Ok(())
    }

    // ========== Profile Operations ==========

    /// Fetch the profile together with its ordered skills, projects and work history.
    ///
    /// When several profiles exist the one with the lowest id is returned.
    pub fn get_profile_with_relations(&self) -> Result<ProfileWithRelations> {
        let profile = self
            .conn
            .query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY id ASC LIMIT 1"),
                [],
                |row| self.row_to_profile(row),
            )
            .optional()?
            .ok_or_else(|| Error::NotFound("Profile".to_string()))?;

        let skills = self.query_skills(
            &format!("SELECT {SKILL_COLUMNS} FROM skills WHERE profile_id = ?1 {SKILL_ORDER}"),
            params![profile.id],
        )?;
        let projects = self.query_projects(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE profile_id = ?1 {PROJECT_ORDER}"),
            params![profile.id],
        )?;
        let work = self.query_work(
            &format!("SELECT {WORK_COLUMNS} FROM work_experience WHERE profile_id = ?1 {WORK_ORDER}"),
            params![profile.id],
        )?;

        Ok(ProfileWithRelations {
            profile,
            skills,
            projects,
            work,
        })
    }

    /// Get a profile by id
    pub fn get_profile(&self, id: i64) -> Result<Option<Profile>> {
        self.conn
            .query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"),
                [id],
                |row| self.row_to_profile(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a profile by its unique email
    pub fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
        self.conn
            .query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE email = ?1"),
                [email],
                |row| self.row_to_profile(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert a new profile, rejecting a duplicate email with `Error::Conflict`
    pub fn create_profile(&self, input: &ProfileInput) -> Result<Profile> {
        if self.find_profile_by_email(&input.email)?.is_some() {
            return Err(duplicate_email());
        }

        let now = Utc::now();
        self.conn
            .execute(
                r#"
                INSERT INTO profiles (name, email, education, github_url, linkedin_url, portfolio_url, avatar_url, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
                "#,
                params![
                    input.name,
                    input.email,
                    input.education,
                    input.github_url,
                    input.linkedin_url,
                    input.portfolio_url,
                    input.avatar_url,
                    now,
                ],
            )
            .map_err(map_constraint)?;

        let id = self.conn.last_insert_rowid();
        self.get_profile(id)?
            .ok_or_else(|| Error::NotFound(format!("Profile with ID {id}")))
    }

    /// Overwrite every caller-supplied field of a profile
    pub fn update_profile(&self, id: i64, input: &ProfileInput) -> Result<Profile> {
        if self.get_profile(id)?.is_none() {
            return Err(Error::NotFound(format!("Profile with ID {id}")));
        }
        if let Some(other) = self.find_profile_by_email(&input.email)? {
            if other.id != id {
                return Err(duplicate_email());
            }
        }

        let changed = self
            .conn
            .execute(
                r#"
                UPDATE profiles
                SET name = ?2, email = ?3, education = ?4, github_url = ?5, linkedin_url = ?6,
                    portfolio_url = ?7, avatar_url = ?8, updated_at = ?9
                WHERE id = ?1
                "#,
                params![
                    id,
                    input.name,
                    input.email,
                    input.education,
                    input.github_url,
                    input.linkedin_url,
                    input.portfolio_url,
                    input.avatar_url,
                    Utc::now(),
                ],
            )
            .map_err(map_constraint)?;

        if changed == 0 {
            return Err(Error::NotFound(format!("Profile with ID {id}")));
        }
        self.get_profile(id)?
            .ok_or_else(|| Error::NotFound(format!("Profile with ID {id}")))
    }

    /// Delete a profile; skills, projects and work entries cascade
    pub fn delete_profile(&self, id: i64) -> Result<()> {
        let deleted = self.conn.execute("DELETE FROM profiles WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Profile with ID {id}")));
        }
        Ok(())
    }

    /// Count all profiles
    pub fn count_profiles(&self) -> Result<usize> {
        self.count("profiles")
    }

    fn row_to_profile(&self, row: &rusqlite::Row) -> rusqlite::Result<Profile> {
        Ok(Profile {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            education: row.get(3)?,
            github_url: row.get(4)?,
            linkedin_url: row.get(5)?,
            portfolio_url: row.get(6)?,
            avatar_url: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    // ========== Skill Operations ==========

    pub fn insert_skill(&self, profile_id: i64, skill: &NewSkill) -> Result<Skill> {
        self.conn.execute(
            "INSERT INTO skills (profile_id, name, proficiency, years_experience) VALUES (?1, ?2, ?3, ?4)",
            params![profile_id, skill.name, skill.proficiency, skill.years_experience],
        )?;

        Ok(Skill {
            id: self.conn.last_insert_rowid(),
            profile_id,
            name: skill.name.clone(),
            proficiency: skill.proficiency.clone(),
            years_experience: skill.years_experience,
        })
    }

    /// All skills, most experienced first
    pub fn list_skills(&self) -> Result<Vec<Skill>> {
        self.query_skills(&format!("SELECT {SKILL_COLUMNS} FROM skills {SKILL_ORDER}"), [])
    }

    /// Skills whose name contains `query` (case-insensitive), at most `limit`
    pub fn search_skills(&self, query: &str, limit: usize) -> Result<Vec<Skill>> {
        self.query_skills(
            &format!(
                "SELECT {SKILL_COLUMNS} FROM skills WHERE {} ORDER BY id LIMIT ?2",
                contains("name")
            ),
            params![query, limit as i64],
        )
    }

    pub fn count_skills(&self) -> Result<usize> {
        self.count("skills")
    }

    fn query_skills<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Skill>> {
        let mut stmt = self.conn.prepare(sql)?;
        let skills = stmt
            .query_map(params, |row| self.row_to_skill(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(skills)
    }

    fn row_to_skill(&self, row: &rusqlite::Row) -> rusqlite::Result<Skill> {
        Ok(Skill {
            id: row.get(0)?,
            profile_id: row.get(1)?,
            name: row.get(2)?,
            proficiency: row.get(3)?,
            years_experience: row.get(4)?,
        })
    }

    // ========== Project Operations ==========

    pub fn insert_project(&self, profile_id: i64, project: &NewProject) -> Result<Project> {
        let skills_used = serde_json::to_string(&project.skills_used)?;
        let created_at = Utc::now();

        self.conn.execute(
            r#"
            INSERT INTO projects (profile_id, title, description, link, skills_used, start_date, end_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                profile_id,
                project.title,
                project.description,
                project.link,
                skills_used,
                project.start_date,
                project.end_date,
                created_at,
            ],
        )?;

        Ok(Project {
            id: self.conn.last_insert_rowid(),
            profile_id,
            title: project.title.clone(),
            description: project.description.clone(),
            link: project.link.clone(),
            skills_used: project.skills_used.clone(),
            start_date: project.start_date,
            end_date: project.end_date,
            created_at,
        })
    }

    /// List projects newest first.
    ///
    /// With `skill`, keeps only projects whose `skills_used` list contains
    /// exactly that string (case-sensitive membership, not substring).
    /// An empty filter is treated as no filter.
    pub fn list_projects(&self, skill: Option<&str>) -> Result<Vec<Project>> {
        match skill.filter(|s| !s.is_empty()) {
            Some(skill) => self.query_projects(
                &format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects
                     WHERE EXISTS (SELECT 1 FROM json_each(projects.skills_used) WHERE json_each.value = ?1)
                     {PROJECT_ORDER}"
                ),
                [skill],
            ),
            None => self.query_projects(
                &format!("SELECT {PROJECT_COLUMNS} FROM projects {PROJECT_ORDER}"),
                [],
            ),
        }
    }

    /// Get a project by id, failing with `Error::NotFound` when absent
    pub fn get_project(&self, id: i64) -> Result<Project> {
        self.conn
            .query_row(
                &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
                [id],
                |row| self.row_to_project(row),
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Project with ID {id}")))
    }

    /// Projects whose title or description contains `query` (case-insensitive)
    pub fn search_projects(&self, query: &str, limit: usize) -> Result<Vec<Project>> {
        self.query_projects(
            &format!(
                "SELECT {PROJECT_COLUMNS} FROM projects
                 WHERE {} OR {}
                 ORDER BY id LIMIT ?2",
                contains("title"),
                contains("description")
            ),
            params![query, limit as i64],
        )
    }

    /// The `skills_used` list of every project, in id order
    pub fn all_skills_used(&self) -> Result<Vec<Vec<String>>> {
        let mut stmt = self.conn.prepare("SELECT skills_used FROM projects ORDER BY id")?;
        let lists = stmt
            .query_map([], |row| decode_skills_used(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lists)
    }

    pub fn count_projects(&self) -> Result<usize> {
        self.count("projects")
    }

    fn query_projects<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(sql)?;
        let projects = stmt
            .query_map(params, |row| self.row_to_project(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(projects)
    }

    fn row_to_project(&self, row: &rusqlite::Row) -> rusqlite::Result<Project> {
        Ok(Project {
            id: row.get(0)?,
            profile_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            link: row.get(4)?,
            skills_used: decode_skills_used(row, 5)?,
            start_date: row.get(6)?,
            end_date: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    // ========== Work Experience Operations ==========

    pub fn insert_work(&self, profile_id: i64, work: &NewWorkExperience) -> Result<WorkExperience> {
        self.conn.execute(
            r#"
            INSERT INTO work_experience (profile_id, company, role, start_date, end_date, description, is_current)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                profile_id,
                work.company,
                work.role,
                work.start_date,
                work.end_date,
                work.description,
                work.is_current,
            ],
        )?;

        Ok(WorkExperience {
            id: self.conn.last_insert_rowid(),
            profile_id,
            company: work.company.clone(),
            role: work.role.clone(),
            start_date: work.start_date,
            end_date: work.end_date,
            description: work.description.clone(),
            is_current: work.is_current,
        })
    }

    /// All work entries, most recent start first
    pub fn list_work(&self) -> Result<Vec<WorkExperience>> {
        self.query_work(&format!("SELECT {WORK_COLUMNS} FROM work_experience {WORK_ORDER}"), [])
    }

    /// Work entries whose company, role or description contains `query` (case-insensitive)
    pub fn search_work(&self, query: &str, limit: usize) -> Result<Vec<WorkExperience>> {
        self.query_work(
            &format!(
                "SELECT {WORK_COLUMNS} FROM work_experience
                 WHERE {} OR {} OR {}
                 ORDER BY id LIMIT ?2",
                contains("company"),
                contains("role"),
                contains("description")
            ),
            params![query, limit as i64],
        )
    }

    pub fn count_work(&self) -> Result<usize> {
        self.count("work_experience")
    }

    fn query_work<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<WorkExperience>> {
        let mut stmt = self.conn.prepare(sql)?;
        let work = stmt
            .query_map(params, |row| self.row_to_work(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(work)
    }

    fn row_to_work(&self, row: &rusqlite::Row) -> rusqlite::Result<WorkExperience> {
        Ok(WorkExperience {
            id: row.get(0)?,
            profile_id: row.get(1)?,
            company: row.get(2)?,
            role: row.get(3)?,
            start_date: row.get(4)?,
            end_date: row.get(5)?,
            description: row.get(6)?,
            is_current: row.get(7)?,
        })
    }

    // ========== Bulk Operations ==========

    /// Begin a transaction for bulk operations
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", [])?;
        Ok(())
    }

    /// Commit a transaction
    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    /// Rollback a transaction
    pub fn rollback(&mut self) -> Result<()> {
        self.conn.execute("ROLLBACK", [])?;
        Ok(())
    }

    /// Delete all data (for re-seeding)
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM work_experience", [])?;
        self.conn.execute("DELETE FROM projects", [])?;
        self.conn.execute("DELETE FROM skills", [])?;
        self.conn.execute("DELETE FROM profiles", [])?;
        Ok(())
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            profiles: self.count_profiles()?,
            skills: self.count_skills()?,
            projects: self.count_projects()?,
            work: self.count_work()?,
        })
    }

    fn count(&self, table: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn duplicate_email() -> Error {
    Error::Conflict("Profile with this email already exists".to_string())
}

/// The only constraint profile writes can trip is the unique email
fn map_constraint(err: rusqlite::Error) -> Error {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => duplicate_email(),
        _ => err.into(),
    }
}

fn decode_skills_used(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Case-insensitive literal substring test of `column` against `?1`
fn contains(column: &str) -> String {
    format!("instr(casefold({column}), casefold(?1)) > 0")
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbStats {
    pub profiles: usize,
    pub skills: usize,
    pub projects: usize,
    pub work: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Profiles: {}", self.profiles)?;
        writeln!(f, "  Skills: {}", self.skills)?;
        writeln!(f, "  Projects: {}", self.projects)?;
        writeln!(f, "  Work: {}", self.work)
    }
}
