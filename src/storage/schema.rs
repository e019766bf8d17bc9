//! Database schema definitions

/// Foreign keys are off by default in SQLite and must be enabled per connection
pub const ENABLE_FOREIGN_KEYS: &str = "PRAGMA foreign_keys = ON";

/// SQL to create the profiles table
pub const CREATE_PROFILES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS profiles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    education TEXT,
    github_url TEXT,
    linkedin_url TEXT,
    portfolio_url TEXT,
    avatar_url TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL to create the skills table
pub const CREATE_SKILLS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS skills (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    profile_id INTEGER NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    proficiency TEXT,
    years_experience INTEGER CHECK (years_experience IS NULL OR years_experience >= 0)
)
"#;

/// SQL to create the projects table
///
/// `skills_used` holds a JSON array of strings
pub const CREATE_PROJECTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    profile_id INTEGER NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT,
    link TEXT,
    skills_used TEXT NOT NULL DEFAULT '[]',
    start_date TEXT,
    end_date TEXT,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the work_experience table
pub const CREATE_WORK_EXPERIENCE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS work_experience (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    profile_id INTEGER NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    company TEXT NOT NULL,
    role TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT,
    description TEXT,
    is_current INTEGER NOT NULL DEFAULT 0
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_skills_profile ON skills(profile_id)",
    "CREATE INDEX IF NOT EXISTS idx_skills_years ON skills(years_experience)",
    "CREATE INDEX IF NOT EXISTS idx_projects_profile ON projects(profile_id)",
    "CREATE INDEX IF NOT EXISTS idx_projects_created ON projects(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_work_profile ON work_experience(profile_id)",
    "CREATE INDEX IF NOT EXISTS idx_work_start ON work_experience(start_date)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_PROFILES_TABLE,
        CREATE_SKILLS_TABLE,
        CREATE_PROJECTS_TABLE,
        CREATE_WORK_EXPERIENCE_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
