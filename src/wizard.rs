//! The three-step survey flow: Student Info, Internship, Job Outcome.
//!
//! One [`Wizard`] per interactive session. It owns the forms being edited,
//! the drafts accepted by each step's Next, and the Yes/No answers for the
//! optional internship and job sections.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::forms::{Edit, FieldError, FieldId, InternshipForm, JobForm, StudentForm};
use crate::gateway::{Gateway, Placement, Submission};
use crate::models::{Employer, Internship, Job, Program, Student};

/// Department stamped onto programs created from the survey.
pub const DEFAULT_DEPARTMENT: &str = "Eberhardt School of Business";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    StudentInfo,
    Internship,
    Job,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::StudentInfo, Step::Internship, Step::Job];

    pub fn number(&self) -> u8 {
        match self {
            Step::StudentInfo => 1,
            Step::Internship => 2,
            Step::Job => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::StudentInfo => "Step 1 · Student Info",
            Step::Internship => "Step 2 · Internship",
            Step::Job => "Step 3 · Job Outcome",
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Please fix the following before we can save to the database:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("Something went wrong while saving: {0}")]
    Persistence(#[from] StoreError),

    #[error("Submit is only available on {}.", Step::Job.title())]
    NotOnFinalStep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub student_id: String,
    pub writes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: Step,
    pub student_form: StudentForm,
    pub internship_form: InternshipForm,
    pub job_form: JobForm,
    student: Option<StudentForm>,
    internship: Option<InternshipForm>,
    has_internship: bool,
    job: Option<JobForm>,
    has_job: bool,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn has_internship(&self) -> bool {
        self.has_internship
    }

    pub fn student_draft(&self) -> Option<&StudentForm> {
        self.student.as_ref()
    }

    pub fn internship_draft(&self) -> Option<&InternshipForm> {
        self.internship.as_ref()
    }

    /// The "came from internship" question is only asked when an internship
    /// was accepted in step 2.
    fn offers_internship_source(&self) -> bool {
        self.has_internship && self.internship.is_some()
    }

    /// Fields shown on the current step, in display order.
    pub fn visible_fields(&self) -> Vec<FieldId> {
        match self.step {
            Step::StudentInfo => StudentForm::FIELDS.to_vec(),
            Step::Internship => {
                let mut fields = vec![FieldId::HasInternship];
                if self.has_internship {
                    fields.extend(InternshipForm::FIELDS);
                }
                fields
            }
            Step::Job => {
                let mut fields = vec![FieldId::HasJob];
                if self.has_job {
                    fields.extend(JobForm::FIELDS.into_iter().filter(|f| match f {
                        FieldId::CameFromInternship => self.offers_internship_source(),
                        FieldId::SourceInternshipId => {
                            self.offers_internship_source() && self.job_form.came_from_internship
                        }
                        _ => true,
                    }));
                }
                fields
            }
        }
    }

    pub fn display(&self, field: FieldId) -> String {
        let value = match field {
            FieldId::HasInternship => Some(yes_no(self.has_internship)),
            FieldId::HasJob => Some(yes_no(self.has_job)),
            _ => match field.step() {
                Step::StudentInfo => self.student_form.display(field),
                Step::Internship => self.internship_form.display(field),
                Step::Job => self.job_form.display(field),
            },
        };
        value.unwrap_or_default()
    }

    pub fn edit(&mut self, field: FieldId, edit: Edit) {
        match field {
            FieldId::HasInternship => toggle(&mut self.has_internship, edit),
            FieldId::HasJob => toggle(&mut self.has_job, edit),
            FieldId::CameFromInternship => {
                self.job_form.edit(field, edit);
                if self.job_form.came_from_internship && self.job_form.source_internship_id.is_empty() {
                    if let Some(internship) = &self.internship {
                        self.job_form.source_internship_id = internship.internship_id.clone();
                    }
                }
            }
            _ => match field.step() {
                Step::StudentInfo => self.student_form.edit(field, edit),
                Step::Internship => self.internship_form.edit(field, edit),
                Step::Job => self.job_form.edit(field, edit),
            },
        }
    }

    /// Validate the current step and move forward. On failure the step and
    /// every draft are left untouched.
    pub fn next(&mut self) -> Result<Step, Vec<FieldError>> {
        match self.step {
            Step::StudentInfo => {
                let errors = self.student_form.validate();
                if !errors.is_empty() {
                    debug!(count = errors.len(), "student info rejected");
                    return Err(errors);
                }
                self.student = Some(self.student_form.trimmed());
                self.step = Step::Internship;
            }
            Step::Internship => {
                if self.has_internship {
                    let errors = self.internship_form.validate();
                    if !errors.is_empty() {
                        debug!(count = errors.len(), "internship rejected");
                        return Err(errors);
                    }
                    self.internship = Some(self.internship_form.trimmed());
                } else {
                    self.internship = None;
                }
                self.step = Step::Job;
            }
            Step::Job => {}
        }
        info!(step = self.step.number(), "advanced");
        Ok(self.step)
    }

    pub fn back(&mut self) -> Step {
        self.step = match self.step {
            Step::StudentInfo | Step::Internship => Step::StudentInfo,
            Step::Job => Step::Internship,
        };
        debug!(step = self.step.number(), "went back");
        self.step
    }

    /// Re-check every step's drafts and write them through `gateway`.
    ///
    /// Success resets the wizard for the next respondent. A persistence
    /// failure keeps all drafts so Submit can be retried; writes made before
    /// the failure stay committed.
    pub fn submit(&mut self, gateway: &dyn Gateway) -> Result<SubmitReceipt, SubmitError> {
        if self.step != Step::Job {
            return Err(SubmitError::NotOnFinalStep);
        }
        self.job = self.has_job.then(|| self.job_form.trimmed());

        let submission = self.submission().map_err(|errors| {
            debug!(count = errors.len(), "submission rejected");
            SubmitError::Validation(errors)
        })?;

        match submission.save(gateway) {
            Ok(writes) => {
                let receipt = SubmitReceipt {
                    student_id: submission.student.student_id,
                    writes,
                };
                *self = Wizard::default();
                Ok(receipt)
            }
            Err(e) => {
                warn!("submission failed, drafts kept: {}", e);
                Err(SubmitError::Persistence(e))
            }
        }
    }

    /// Build the records to write from the drafts, or list everything missing.
    pub fn submission(&self) -> Result<Submission, Vec<String>> {
        let mut errors = Vec::new();
        let blank = StudentForm::default();
        let student = self.student.as_ref().unwrap_or(&blank);
        collect(&mut errors, Step::StudentInfo, student.validate());

        let internship = if self.has_internship {
            match &self.internship {
                Some(draft) => {
                    collect(&mut errors, Step::Internship, draft.validate());
                    Some(draft)
                }
                None => {
                    errors.push("Internship data missing (Step 2).".to_string());
                    None
                }
            }
        } else {
            None
        };

        let job = if self.has_job {
            match &self.job {
                Some(draft) => {
                    collect(&mut errors, Step::Job, draft.validate());
                    Some(draft)
                }
                None => {
                    errors.push("Job data missing (Step 3).".to_string());
                    None
                }
            }
        } else {
            None
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let source_internship_id = if self.offers_internship_source() {
            job.filter(|j| j.came_from_internship)
                .map(|j| j.source_internship_id.trim().to_string())
                .filter(|id| !id.is_empty())
        } else {
            None
        };

        Ok(Submission {
            program: Program {
                program_id: student.program_id.clone(),
                program_name: student.program_name.clone(),
                level: None,
                department: DEFAULT_DEPARTMENT.to_string(),
            },
            student: Student {
                student_id: student.student_id.clone(),
                program_id: student.program_id.clone(),
                first_name: student.first_name.clone(),
                last_name: student.last_name.clone(),
                email: student.email.clone(),
                entry_term: student.entry_term.clone(),
                grad_term: student.grad_term.clone(),
                status: student.status,
                citizenship_country: student.citizenship.clone(),
                linkedin_url: student.linkedin.clone(),
            },
            internship: internship.map(|i| Placement {
                employer: Employer {
                    employer_id: i.employer_id.clone(),
                    employer_name: i.employer_name.clone(),
                    industry: i.industry.clone(),
                    city: i.city.clone(),
                    state: i.state.clone(),
                    country: i.country.clone(),
                    website: i.website.clone(),
                },
                record: Internship {
                    internship_id: i.internship_id.clone(),
                    student_id: student.student_id.clone(),
                    employer_id: i.employer_id.clone(),
                    title: i.title.clone(),
                    mode: i.mode,
                    city: i.city.clone(),
                    state: i.state.clone(),
                    country: i.country.clone(),
                    start_date: i.start_date.clone(),
                    end_date: i.end_date.clone(),
                    is_related_to_program: i.is_related,
                },
            }),
            job: job.map(|j| Placement {
                employer: Employer {
                    employer_id: j.employer_id.clone(),
                    employer_name: j.employer_name.clone(),
                    industry: j.industry.clone(),
                    city: j.city.clone(),
                    state: j.state.clone(),
                    country: j.country.clone(),
                    website: j.website.clone(),
                },
                record: Job {
                    job_id: j.job_id.clone(),
                    student_id: student.student_id.clone(),
                    employer_id: j.employer_id.clone(),
                    title: j.title.clone(),
                    job_level: j.job_level.clone(),
                    job_type: j.job_type.clone(),
                    employment_status: j.employment_status.clone(),
                    city: j.city.clone(),
                    state: j.state.clone(),
                    country: j.country.clone(),
                    start_date: j.start_date.clone(),
                    end_date: Some(j.end_date.clone()).filter(|d| !d.is_empty()),
                    sequence: j.sequence.max(1),
                    source_internship_id,
                },
            }),
        })
    }
}

fn collect(errors: &mut Vec<String>, step: Step, found: Vec<FieldError>) {
    errors.extend(
        found
            .into_iter()
            .map(|e| format!("Step {}: {}", step.number(), e)),
    );
}

fn toggle(value: &mut bool, edit: Edit) {
    if matches!(edit, Edit::Next | Edit::Prev | Edit::Insert(' ')) {
        *value = !*value;
    }
}

fn yes_no(value: bool) -> String {
    let label = if value { "Yes" } else { "No" };
    label.to_string()
}
