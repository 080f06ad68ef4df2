use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::gateway::Gateway;
use crate::models::{
    Employer, EmployerSummary, Internship, InternshipSummary, Job, Organization,
    OrganizationSummary, Program, ProgramSummary, Student, StudentOrganization, StudentSummary,
};

/// SQLite-backed store. Holds only the file location; every call opens,
/// uses and drops its own connection.
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Open the store at `path`, or at the per-user data directory when `None`.
    pub fn open(path: Option<PathBuf>) -> StoreResult<Self> {
        let path = match path {
            Some(p) => p,
            None => Self::default_path(),
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the database, used for logs as well.
    pub fn data_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn default_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "journey") {
            proj_dirs.data_dir().join("journey.db")
        } else {
            PathBuf::from("journey.db")
        }
    }

    fn connect(&self) -> StoreResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    pub fn init(&self) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS programs (
                program_id TEXT PRIMARY KEY,
                program_name TEXT NOT NULL,
                level TEXT,
                department TEXT
            );

            CREATE TABLE IF NOT EXISTS students (
                student_id TEXT PRIMARY KEY,
                program_id TEXT NOT NULL REFERENCES programs(program_id),
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT,
                entry_term TEXT,
                grad_term TEXT,
                status TEXT NOT NULL CHECK (status IN ('Current', 'Alumni')),
                citizenship_country TEXT,
                linkedin_url TEXT
            );

            CREATE TABLE IF NOT EXISTS employers (
                employer_id TEXT PRIMARY KEY,
                employer_name TEXT,
                industry TEXT,
                city TEXT,
                state TEXT,
                country TEXT,
                website TEXT
            );

            CREATE TABLE IF NOT EXISTS internships (
                internship_id TEXT PRIMARY KEY,
                student_id TEXT NOT NULL REFERENCES students(student_id),
                employer_id TEXT NOT NULL REFERENCES employers(employer_id),
                title TEXT NOT NULL,
                mode TEXT CHECK (mode IN ('Virtual', 'In-Person', 'Hybrid')),
                city TEXT,
                state TEXT,
                country TEXT,
                start_date TEXT,
                end_date TEXT,
                is_related_to_program INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS jobs (
                job_id TEXT PRIMARY KEY,
                student_id TEXT NOT NULL REFERENCES students(student_id),
                employer_id TEXT NOT NULL REFERENCES employers(employer_id),
                title TEXT NOT NULL,
                job_level TEXT,
                job_type TEXT,
                employment_status TEXT,
                city TEXT,
                state TEXT,
                country TEXT,
                start_date TEXT,
                end_date TEXT,
                job_sequence INTEGER NOT NULL DEFAULT 1 CHECK (job_sequence >= 1),
                source_internship_id TEXT REFERENCES internships(internship_id)
            );

            CREATE TABLE IF NOT EXISTS organizations (
                org_id TEXT PRIMARY KEY,
                org_name TEXT NOT NULL,
                org_type TEXT
            );

            CREATE TABLE IF NOT EXISTS student_organizations (
                student_org_id TEXT PRIMARY KEY,
                student_id TEXT NOT NULL REFERENCES students(student_id),
                org_id TEXT NOT NULL REFERENCES organizations(org_id),
                role TEXT,
                start_date TEXT,
                end_date TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_students_program ON students(program_id);
            CREATE INDEX IF NOT EXISTS idx_internships_student ON internships(student_id);
            CREATE INDEX IF NOT EXISTS idx_jobs_student ON jobs(student_id);
            "#,
        )?;
        info!(path = %self.path.display(), "schema ready");
        Ok(())
    }

    pub fn ensure_initialized(&self) -> StoreResult<()> {
        let conn = self.connect()?;
        let tables: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='jobs'",
            [],
            |row| row.get(0),
        )?;
        if tables == 0 {
            return Err(StoreError::NotInitialized);
        }
        Ok(())
    }

    // --- Read helpers ---

    pub fn list_programs(&self) -> StoreResult<Vec<ProgramSummary>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT program_id, program_name FROM programs ORDER BY program_id")?;
        let rows = stmt.query_map([], |row| {
            Ok(ProgramSummary {
                program_id: row.get(0)?,
                program_name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn list_students(&self) -> StoreResult<Vec<StudentSummary>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT student_id, first_name, last_name, email
             FROM students
             ORDER BY first_name, last_name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StudentSummary {
                student_id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                email: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn list_employers(&self) -> StoreResult<Vec<EmployerSummary>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT employer_id, employer_name FROM employers ORDER BY employer_name")?;
        let rows = stmt.query_map([], |row| {
            Ok(EmployerSummary {
                employer_id: row.get(0)?,
                employer_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn internships_for_student(&self, student_id: &str) -> StoreResult<Vec<InternshipSummary>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT internship_id, title FROM internships WHERE student_id = ?1")?;
        let rows = stmt.query_map([student_id], |row| {
            Ok(InternshipSummary {
                internship_id: row.get(0)?,
                title: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn list_organizations(&self) -> StoreResult<Vec<OrganizationSummary>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT org_id, org_name FROM organizations ORDER BY org_name")?;
        let rows = stmt.query_map([], |row| {
            Ok(OrganizationSummary {
                org_id: row.get(0)?,
                org_name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // --- Organizations ---

    pub fn add_organization(&self, org: &Organization) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO organizations (org_id, org_name, org_type) VALUES (?1, ?2, ?3)",
            params![org.org_id, org.org_name, org.org_type],
        )
        .map_err(|e| StoreError::classify(e, "organization", &org.org_id))?;
        info!(org = %org.org_id, "organization added");
        Ok(())
    }

    pub fn add_student_org_link(&self, link: &StudentOrganization) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO student_organizations
             (student_org_id, student_id, org_id, role, start_date, end_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                link.student_org_id,
                link.student_id,
                link.org_id,
                link.role,
                link.start_date,
                link.end_date,
            ],
        )
        .map_err(|e| StoreError::classify(e, "student organization", &link.student_org_id))?;
        info!(student = %link.student_id, org = %link.org_id, "organization link added");
        Ok(())
    }
}

impl Gateway for Database {
    fn upsert_program(&self, program: &Program) -> StoreResult<()> {
        let conn = self.connect()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO programs (program_id, program_name, level, department)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                program.program_id,
                program.program_name,
                program.level,
                program.department,
            ],
        )?;
        debug!(program = %program.program_id, inserted, "upsert program");
        Ok(())
    }

    fn insert_student(&self, student: &Student) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO students
             (student_id, program_id, first_name, last_name, email,
              entry_term, grad_term, status, citizenship_country, linkedin_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                student.student_id,
                student.program_id,
                student.first_name,
                student.last_name,
                student.email,
                student.entry_term,
                student.grad_term,
                student.status.as_str(),
                student.citizenship_country,
                student.linkedin_url,
            ],
        )
        .map_err(|e| StoreError::classify(e, "student", &student.student_id))?;
        debug!(student = %student.student_id, "insert student");
        Ok(())
    }

    fn upsert_employer(&self, employer: &Employer) -> StoreResult<()> {
        let conn = self.connect()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO employers
             (employer_id, employer_name, industry, city, state, country, website)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                employer.employer_id,
                employer.employer_name,
                employer.industry,
                employer.city,
                employer.state,
                employer.country,
                employer.website,
            ],
        )?;
        debug!(employer = %employer.employer_id, inserted, "upsert employer");
        Ok(())
    }

    fn insert_internship(&self, internship: &Internship) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO internships
             (internship_id, student_id, employer_id, title, mode,
              city, state, country, start_date, end_date, is_related_to_program)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                internship.internship_id,
                internship.student_id,
                internship.employer_id,
                internship.title,
                internship.mode.as_str(),
                internship.city,
                internship.state,
                internship.country,
                internship.start_date,
                internship.end_date,
                i64::from(internship.is_related_to_program),
            ],
        )
        .map_err(|e| StoreError::classify(e, "internship", &internship.internship_id))?;
        debug!(internship = %internship.internship_id, "insert internship");
        Ok(())
    }

    fn insert_job(&self, job: &Job) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO jobs
             (job_id, student_id, employer_id, title, job_level, job_type,
              employment_status, city, state, country,
              start_date, end_date, job_sequence, source_internship_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                job.job_id,
                job.student_id,
                job.employer_id,
                job.title,
                job.job_level,
                job.job_type,
                job.employment_status,
                job.city,
                job.state,
                job.country,
                job.start_date,
                job.end_date,
                job.sequence,
                job.source_internship_id,
            ],
        )
        .map_err(|e| StoreError::classify(e, "job", &job.job_id))?;
        debug!(job = %job.job_id, "insert job");
        Ok(())
    }
}
