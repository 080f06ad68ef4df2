//! Editable field sets for the three wizard steps.
//!
//! A form is what the user is typing; a draft is the same form after it
//! passed its step's validation, with every text field trimmed.

use std::fmt;

use crate::models::{InternshipMode, StudentStatus};
use crate::wizard::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Yes/No or checked/unchecked.
    Toggle,
    /// Cycles through a closed set of options.
    Choice,
    /// Positive integer.
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    // Step 1
    Status,
    StudentId,
    FirstName,
    LastName,
    ProgramId,
    ProgramName,
    EntryTerm,
    GradTerm,
    Citizenship,
    Email,
    Linkedin,
    // Step 2
    HasInternship,
    InternshipId,
    InternshipTitle,
    InternshipEmployerId,
    InternshipEmployerName,
    InternshipMode,
    InternshipCity,
    InternshipState,
    InternshipCountry,
    InternshipStart,
    InternshipEnd,
    InternshipRelated,
    InternshipIndustry,
    InternshipWebsite,
    // Step 3
    HasJob,
    JobId,
    JobTitle,
    JobEmployerId,
    JobEmployerName,
    JobLevel,
    JobType,
    EmploymentStatus,
    JobCity,
    JobState,
    JobCountry,
    JobStart,
    JobEnd,
    JobSequence,
    CameFromInternship,
    SourceInternshipId,
    JobIndustry,
    JobWebsite,
}

impl FieldId {
    pub fn label(&self) -> &'static str {
        match self {
            FieldId::Status => "Current status",
            FieldId::StudentId => "Student ID",
            FieldId::FirstName => "First Name",
            FieldId::LastName => "Last Name",
            FieldId::ProgramId => "Program ID",
            FieldId::ProgramName => "Program Name",
            FieldId::EntryTerm => "Entry Term",
            FieldId::GradTerm => "Graduation Term (if graduated)",
            FieldId::Citizenship => "Citizenship Country",
            FieldId::Email => "Email",
            FieldId::Linkedin => "LinkedIn URL (optional)",
            FieldId::HasInternship => "Completed an internship during the program?",
            FieldId::InternshipId => "Internship ID",
            FieldId::InternshipTitle => "Internship Title",
            FieldId::InternshipEmployerId => "Internship Employer ID",
            FieldId::InternshipEmployerName => "Internship Employer Name",
            FieldId::InternshipMode => "Internship Mode",
            FieldId::InternshipCity => "City",
            FieldId::InternshipState => "State",
            FieldId::InternshipCountry => "Country",
            FieldId::InternshipStart => "Start Date (YYYY-MM-DD)",
            FieldId::InternshipEnd => "End Date (YYYY-MM-DD)",
            FieldId::InternshipRelated => "Related to your program of study?",
            FieldId::InternshipIndustry => "Employer Industry (optional)",
            FieldId::InternshipWebsite => "Employer Website (optional)",
            FieldId::HasJob => "Have (or got) a job after this program?",
            FieldId::JobId => "Job ID",
            FieldId::JobTitle => "Job Title",
            FieldId::JobEmployerId => "Job Employer ID",
            FieldId::JobEmployerName => "Job Employer Name",
            FieldId::JobLevel => "Job Level",
            FieldId::JobType => "Job Type / Role",
            FieldId::EmploymentStatus => "Employment Status",
            FieldId::JobCity => "Job City",
            FieldId::JobState => "Job State",
            FieldId::JobCountry => "Job Country",
            FieldId::JobStart => "Job Start Date (YYYY-MM-DD)",
            FieldId::JobEnd => "Job End Date (blank if current)",
            FieldId::JobSequence => "Job Sequence (1 = first job)",
            FieldId::CameFromInternship => "Did this job come from your internship?",
            FieldId::SourceInternshipId => "Which internship ID does it come from?",
            FieldId::JobIndustry => "Job Employer Industry (optional)",
            FieldId::JobWebsite => "Job Employer Website (optional)",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldId::HasInternship
            | FieldId::InternshipRelated
            | FieldId::HasJob
            | FieldId::CameFromInternship => FieldKind::Toggle,
            FieldId::Status | FieldId::InternshipMode => FieldKind::Choice,
            FieldId::JobSequence => FieldKind::Number,
            _ => FieldKind::Text,
        }
    }

    pub fn step(&self) -> Step {
        if StudentForm::FIELDS.contains(self) {
            Step::StudentInfo
        } else if *self == FieldId::HasInternship || InternshipForm::FIELDS.contains(self) {
            Step::Internship
        } else {
            Step::Job
        }
    }

    pub fn is_required(&self) -> bool {
        StudentForm::REQUIRED.contains(self)
            || InternshipForm::REQUIRED.contains(self)
            || JobForm::REQUIRED.contains(self)
    }
}

/// A required field left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: FieldId,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is required.", self.field.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Insert(char),
    Backspace,
    Clear,
    /// Toggle, next option, or +1.
    Next,
    /// Toggle, previous option, or -1.
    Prev,
}

fn edit_text(value: &mut String, edit: Edit) {
    match edit {
        Edit::Insert(c) => value.push(c),
        Edit::Backspace => {
            value.pop();
        }
        Edit::Clear => value.clear(),
        Edit::Next | Edit::Prev => {}
    }
}

fn edit_toggle(value: &mut bool, edit: Edit) {
    match edit {
        Edit::Next | Edit::Prev | Edit::Insert(' ') => *value = !*value,
        _ => {}
    }
}

fn edit_number(value: &mut u32, edit: Edit) {
    *value = match edit {
        Edit::Next => value.saturating_add(1),
        Edit::Prev => value.saturating_sub(1),
        Edit::Insert(c) => match c.to_digit(10) {
            Some(d) => value.saturating_mul(10).saturating_add(d),
            None => *value,
        },
        Edit::Backspace => *value / 10,
        Edit::Clear => 1,
    }
    .max(1);
}

fn cycle<T: Copy + PartialEq>(options: &[T], current: T, edit: Edit) -> T {
    let len = options.len();
    let idx = options.iter().position(|o| *o == current).unwrap_or(0);
    match edit {
        Edit::Next | Edit::Insert(' ') => options[(idx + 1) % len],
        Edit::Prev => options[(idx + len - 1) % len],
        _ => current,
    }
}

fn missing(pairs: &[(FieldId, &str)]) -> Vec<FieldError> {
    pairs
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| FieldError { field: *field })
        .collect()
}

fn on_off(value: bool) -> String {
    let label = if value { "Yes" } else { "No" };
    label.to_string()
}

/// Generates the by-field accessors for a form's free-text fields.
macro_rules! text_fields {
    ($form:ty { $($id:ident => $field:ident),* $(,)? }) => {
        impl $form {
            fn text(&self, field: FieldId) -> Option<&String> {
                match field {
                    $(FieldId::$id => Some(&self.$field),)*
                    _ => None,
                }
            }

            fn text_mut(&mut self, field: FieldId) -> Option<&mut String> {
                match field {
                    $(FieldId::$id => Some(&mut self.$field),)*
                    _ => None,
                }
            }
        }
    };
}

// --- Step 1 ---

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub status: StudentStatus,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub program_id: String,
    pub program_name: String,
    pub entry_term: String,
    pub grad_term: String,
    pub citizenship: String,
    pub email: String,
    pub linkedin: String,
}

impl StudentForm {
    pub const FIELDS: [FieldId; 11] = [
        FieldId::Status,
        FieldId::StudentId,
        FieldId::FirstName,
        FieldId::LastName,
        FieldId::ProgramId,
        FieldId::ProgramName,
        FieldId::EntryTerm,
        FieldId::GradTerm,
        FieldId::Citizenship,
        FieldId::Email,
        FieldId::Linkedin,
    ];

    pub const REQUIRED: [FieldId; 5] = [
        FieldId::StudentId,
        FieldId::FirstName,
        FieldId::LastName,
        FieldId::ProgramId,
        FieldId::ProgramName,
    ];

    pub fn edit(&mut self, field: FieldId, edit: Edit) {
        if field == FieldId::Status {
            self.status = cycle(&StudentStatus::ALL, self.status, edit);
        } else if let Some(text) = self.text_mut(field) {
            edit_text(text, edit);
        }
    }

    pub fn display(&self, field: FieldId) -> Option<String> {
        if field == FieldId::Status {
            return Some(self.status.label().to_string());
        }
        self.text(field).cloned()
    }

    pub fn validate(&self) -> Vec<FieldError> {
        missing(&[
            (FieldId::StudentId, self.student_id.as_str()),
            (FieldId::FirstName, self.first_name.as_str()),
            (FieldId::LastName, self.last_name.as_str()),
            (FieldId::ProgramId, self.program_id.as_str()),
            (FieldId::ProgramName, self.program_name.as_str()),
        ])
    }

    pub fn trimmed(&self) -> Self {
        let mut out = self.clone();
        for field in Self::FIELDS {
            if let Some(text) = out.text_mut(field) {
                *text = text.trim().to_string();
            }
        }
        out
    }
}

text_fields!(StudentForm {
    StudentId => student_id,
    FirstName => first_name,
    LastName => last_name,
    ProgramId => program_id,
    ProgramName => program_name,
    EntryTerm => entry_term,
    GradTerm => grad_term,
    Citizenship => citizenship,
    Email => email,
    Linkedin => linkedin,
});

// --- Step 2 ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternshipForm {
    pub internship_id: String,
    pub title: String,
    pub employer_id: String,
    pub employer_name: String,
    pub mode: InternshipMode,
    pub city: String,
    pub state: String,
    pub country: String,
    pub start_date: String,
    pub end_date: String,
    pub is_related: bool,
    pub industry: String,
    pub website: String,
}

impl Default for InternshipForm {
    fn default() -> Self {
        Self {
            internship_id: String::new(),
            title: String::new(),
            employer_id: String::new(),
            employer_name: String::new(),
            mode: InternshipMode::default(),
            city: String::new(),
            state: String::new(),
            country: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            is_related: true,
            industry: String::new(),
            website: String::new(),
        }
    }
}

impl InternshipForm {
    pub const FIELDS: [FieldId; 13] = [
        FieldId::InternshipId,
        FieldId::InternshipTitle,
        FieldId::InternshipEmployerId,
        FieldId::InternshipEmployerName,
        FieldId::InternshipMode,
        FieldId::InternshipCity,
        FieldId::InternshipState,
        FieldId::InternshipCountry,
        FieldId::InternshipStart,
        FieldId::InternshipEnd,
        FieldId::InternshipRelated,
        FieldId::InternshipIndustry,
        FieldId::InternshipWebsite,
    ];

    pub const REQUIRED: [FieldId; 3] = [
        FieldId::InternshipId,
        FieldId::InternshipEmployerId,
        FieldId::InternshipTitle,
    ];

    pub fn edit(&mut self, field: FieldId, edit: Edit) {
        match field {
            FieldId::InternshipMode => self.mode = cycle(&InternshipMode::ALL, self.mode, edit),
            FieldId::InternshipRelated => edit_toggle(&mut self.is_related, edit),
            _ => {
                if let Some(text) = self.text_mut(field) {
                    edit_text(text, edit);
                }
            }
        }
    }

    pub fn display(&self, field: FieldId) -> Option<String> {
        match field {
            FieldId::InternshipMode => Some(self.mode.to_string()),
            FieldId::InternshipRelated => Some(on_off(self.is_related)),
            _ => self.text(field).cloned(),
        }
    }

    pub fn validate(&self) -> Vec<FieldError> {
        missing(&[
            (FieldId::InternshipId, self.internship_id.as_str()),
            (FieldId::InternshipEmployerId, self.employer_id.as_str()),
            (FieldId::InternshipTitle, self.title.as_str()),
        ])
    }

    pub fn trimmed(&self) -> Self {
        let mut out = self.clone();
        for field in Self::FIELDS {
            if let Some(text) = out.text_mut(field) {
                *text = text.trim().to_string();
            }
        }
        out
    }
}

text_fields!(InternshipForm {
    InternshipId => internship_id,
    InternshipTitle => title,
    InternshipEmployerId => employer_id,
    InternshipEmployerName => employer_name,
    InternshipCity => city,
    InternshipState => state,
    InternshipCountry => country,
    InternshipStart => start_date,
    InternshipEnd => end_date,
    InternshipIndustry => industry,
    InternshipWebsite => website,
});

// --- Step 3 ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobForm {
    pub job_id: String,
    pub title: String,
    pub employer_id: String,
    pub employer_name: String,
    pub job_level: String,
    pub job_type: String,
    pub employment_status: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub start_date: String,
    pub end_date: String,
    pub sequence: u32,
    pub came_from_internship: bool,
    pub source_internship_id: String,
    pub industry: String,
    pub website: String,
}

impl Default for JobForm {
    fn default() -> Self {
        Self {
            job_id: String::new(),
            title: String::new(),
            employer_id: String::new(),
            employer_name: String::new(),
            job_level: String::new(),
            job_type: String::new(),
            employment_status: "Employed".to_string(),
            city: String::new(),
            state: String::new(),
            country: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            sequence: 1,
            came_from_internship: false,
            source_internship_id: String::new(),
            industry: String::new(),
            website: String::new(),
        }
    }
}

impl JobForm {
    pub const FIELDS: [FieldId; 17] = [
        FieldId::JobId,
        FieldId::JobTitle,
        FieldId::JobEmployerId,
        FieldId::JobEmployerName,
        FieldId::JobLevel,
        FieldId::JobType,
        FieldId::EmploymentStatus,
        FieldId::JobCity,
        FieldId::JobState,
        FieldId::JobCountry,
        FieldId::JobStart,
        FieldId::JobEnd,
        FieldId::JobSequence,
        FieldId::CameFromInternship,
        FieldId::SourceInternshipId,
        FieldId::JobIndustry,
        FieldId::JobWebsite,
    ];

    pub const REQUIRED: [FieldId; 3] = [FieldId::JobId, FieldId::JobEmployerId, FieldId::JobTitle];


    pub fn edit(&mut self, field: FieldId, edit: Edit) {
        match field {
            FieldId::JobSequence => edit_number(&mut self.sequence, edit),
            FieldId::CameFromInternship => edit_toggle(&mut self.came_from_internship, edit),
            _ => {
                if let Some(text) = self.text_mut(field) {
                    edit_text(text, edit);
                }
            }
        }
    }

    pub fn display(&self, field: FieldId) -> Option<String> {
        match field {
            FieldId::JobSequence => Some(self.sequence.to_string()),
            FieldId::CameFromInternship => Some(on_off(self.came_from_internship)),
            _ => self.text(field).cloned(),
        }
    }

    pub fn validate(&self) -> Vec<FieldError> {
        missing(&[
            (FieldId::JobId, self.job_id.as_str()),
            (FieldId::JobEmployerId, self.employer_id.as_str()),
            (FieldId::JobTitle, self.title.as_str()),
        ])
    }

    pub fn trimmed(&self) -> Self {
        let mut out = self.clone();
        for field in Self::FIELDS {
            if let Some(text) = out.text_mut(field) {
                *text = text.trim().to_string();
            }
        }
        out
    }
}

text_fields!(JobForm {
    JobId => job_id,
    JobTitle => title,
    JobEmployerId => employer_id,
    JobEmployerName => employer_name,
    JobLevel => job_level,
    JobType => job_type,
    EmploymentStatus => employment_status,
    JobCity => city,
    JobState => state,
    JobCountry => country,
    JobStart => start_date,
    JobEnd => end_date,
    SourceInternshipId => source_internship_id,
    JobIndustry => industry,
    JobWebsite => website,
});

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_student() -> StudentForm {
        StudentForm {
            student_id: "S100".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            program_id: "MSBA".to_string(),
            program_name: "MS Business Analytics".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_each_required_student_field_is_checked() {
        for field in StudentForm::REQUIRED {
            let mut form = filled_student();
            *form.text_mut(field).unwrap() = "   ".to_string();
            let errors = form.validate();
            assert_eq!(errors, vec![FieldError { field }], "field {:?}", field);
            assert!(errors[0].to_string().contains(field.label()));
        }
        assert!(filled_student().validate().is_empty());
    }

    #[test]
    fn test_each_required_internship_field_is_checked() {
        let filled = InternshipForm {
            internship_id: "INT001".to_string(),
            title: "Data Analyst Intern".to_string(),
            employer_id: "EMP001".to_string(),
            ..Default::default()
        };
        for field in InternshipForm::REQUIRED {
            let mut form = filled.clone();
            form.edit(field, Edit::Clear);
            assert_eq!(form.validate(), vec![FieldError { field }]);
        }
    }

    #[test]
    fn test_each_required_job_field_is_checked() {
        let filled = JobForm {
            job_id: "JOB001".to_string(),
            title: "Data Analyst".to_string(),
            employer_id: "EMP002".to_string(),
            ..Default::default()
        };
        for field in JobForm::REQUIRED {
            let mut form = filled.clone();
            form.edit(field, Edit::Clear);
            form.edit(field, Edit::Insert('\t'));
            assert_eq!(form.validate(), vec![FieldError { field }]);
        }
    }

    #[test]
    fn test_empty_form_reports_in_field_order() {
        let messages: Vec<String> = InternshipForm::default()
            .validate()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            messages,
            vec![
                "Internship ID is required.",
                "Internship Employer ID is required.",
                "Internship Title is required.",
            ]
        );
    }

    #[test]
    fn test_trimmed() {
        let form = StudentForm {
            student_id: "  S100 ".to_string(),
            email: " a@b.edu\n".to_string(),
            ..filled_student()
        };
        let trimmed = form.trimmed();
        assert_eq!(trimmed.student_id, "S100");
        assert_eq!(trimmed.email, "a@b.edu");
    }

    #[test]
    fn test_defaults() {
        let internship = InternshipForm::default();
        assert_eq!(internship.mode, InternshipMode::Virtual);
        assert!(internship.is_related);

        let job = JobForm::default();
        assert_eq!(job.sequence, 1);
        assert_eq!(job.employment_status, "Employed");
        assert!(!job.came_from_internship);

        assert_eq!(StudentForm::default().status, StudentStatus::Current);
    }

    #[test]
    fn test_sequence_stays_positive() {
        let mut job = JobForm::default();
        job.edit(FieldId::JobSequence, Edit::Prev);
        assert_eq!(job.sequence, 1);
        job.edit(FieldId::JobSequence, Edit::Next);
        assert_eq!(job.sequence, 2);
        job.edit(FieldId::JobSequence, Edit::Insert('3'));
        assert_eq!(job.sequence, 23);
        job.edit(FieldId::JobSequence, Edit::Insert('x'));
        assert_eq!(job.sequence, 23);
        job.edit(FieldId::JobSequence, Edit::Backspace);
        job.edit(FieldId::JobSequence, Edit::Backspace);
        assert_eq!(job.sequence, 1);
    }

    #[test]
    fn test_choice_cycles() {
        let mut form = InternshipForm::default();
        form.edit(FieldId::InternshipMode, Edit::Next);
        assert_eq!(form.mode, InternshipMode::InPerson);
        form.edit(FieldId::InternshipMode, Edit::Prev);
        form.edit(FieldId::InternshipMode, Edit::Prev);
        assert_eq!(form.mode, InternshipMode::Hybrid);

        let mut student = StudentForm::default();
        student.edit(FieldId::Status, Edit::Next);
        assert_eq!(student.status, StudentStatus::Alumni);
        assert_eq!(student.display(FieldId::Status).unwrap(), "Graduated (alumni)");
    }

    #[test]
    fn test_field_metadata() {
        assert_eq!(FieldId::JobSequence.kind(), FieldKind::Number);
        assert_eq!(FieldId::HasInternship.step(), Step::Internship);
        assert_eq!(FieldId::SourceInternshipId.step(), Step::Job);
        assert!(FieldId::ProgramName.is_required());
        assert!(!FieldId::Email.is_required());
    }
}
