use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StudentStatus {
    #[default]
    Current,
    Alumni,
}

impl StudentStatus {
    pub const ALL: [StudentStatus; 2] = [StudentStatus::Current, StudentStatus::Alumni];

    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Current => "Current",
            StudentStatus::Alumni => "Alumni",
        }
    }

    /// Label shown on the status radio in the wizard.
    pub fn label(&self) -> &'static str {
        match self {
            StudentStatus::Current => "Still studying (current student)",
            StudentStatus::Alumni => "Graduated (alumni)",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InternshipMode {
    #[default]
    Virtual,
    #[serde(rename = "In-Person")]
    InPerson,
    Hybrid,
}

impl InternshipMode {
    pub const ALL: [InternshipMode; 3] = [
        InternshipMode::Virtual,
        InternshipMode::InPerson,
        InternshipMode::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InternshipMode::Virtual => "Virtual",
            InternshipMode::InPerson => "In-Person",
            InternshipMode::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for InternshipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub program_id: String,
    pub program_name: String,
    pub level: Option<String>,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    pub program_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub entry_term: String,
    pub grad_term: String,
    pub status: StudentStatus,
    pub citizenship_country: String,
    pub linkedin_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employer {
    pub employer_id: String,
    pub employer_name: String,
    pub industry: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub website: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Internship {
    pub internship_id: String,
    pub student_id: String,
    pub employer_id: String,
    pub title: String,
    pub mode: InternshipMode,
    pub city: String,
    pub state: String,
    pub country: String,
    pub start_date: String,
    pub end_date: String,
    pub is_related_to_program: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub student_id: String,
    pub employer_id: String,
    pub title: String,
    pub job_level: String,
    pub job_type: String,
    pub employment_status: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub start_date: String,
    pub end_date: Option<String>, // None = current job
    pub sequence: u32,             // 1 = first job
    pub source_internship_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub org_id: String,
    pub org_name: String,
    pub org_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentOrganization {
    pub student_org_id: String,
    pub student_id: String,
    pub org_id: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
}

// --- Listing rows (narrow projections used by the read helpers) ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub program_id: String,
    pub program_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerSummary {
    pub employer_id: String,
    pub employer_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternshipSummary {
    pub internship_id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub org_id: String,
    pub org_name: String,
}
