//! Persistence contract for a finished wizard run.
//!
//! A [`Submission`] turns into a fixed sequence of writes:
//! program, student, then (employer, internship) and (employer, job) when
//! present. Each write commits on its own; a failure stops the sequence and
//! leaves earlier writes in place.

use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::models::{Employer, Internship, Job, Program, Student};

pub trait Gateway {
    /// Insert the program unless its id already exists.
    fn upsert_program(&self, program: &Program) -> StoreResult<()>;

    /// Fresh insert; a repeated student id is a duplicate error.
    fn insert_student(&self, student: &Student) -> StoreResult<()>;

    /// Insert the employer unless its id already exists.
    fn upsert_employer(&self, employer: &Employer) -> StoreResult<()>;

    fn insert_internship(&self, internship: &Internship) -> StoreResult<()>;

    fn insert_job(&self, job: &Job) -> StoreResult<()>;
}

/// Validated records ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub program: Program,
    pub student: Student,
    pub internship: Option<Placement<Internship>>,
    pub job: Option<Placement<Job>>,
}

/// An internship or job together with the employer it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<T> {
    pub employer: Employer,
    pub record: T,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Write<'a> {
    Program(&'a Program),
    Student(&'a Student),
    Employer(&'a Employer),
    Internship(&'a Internship),
    Job(&'a Job),
}

impl Write<'_> {
    pub fn entity(&self) -> &'static str {
        match self {
            Write::Program(_) => "program",
            Write::Student(_) => "student",
            Write::Employer(_) => "employer",
            Write::Internship(_) => "internship",
            Write::Job(_) => "job",
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Write::Program(p) => &p.program_id,
            Write::Student(s) => &s.student_id,
            Write::Employer(e) => &e.employer_id,
            Write::Internship(i) => &i.internship_id,
            Write::Job(j) => &j.job_id,
        }
    }

    fn apply(&self, gateway: &dyn Gateway) -> StoreResult<()> {
        match self {
            Write::Program(p) => gateway.upsert_program(p),
            Write::Student(s) => gateway.insert_student(s),
            Write::Employer(e) => gateway.upsert_employer(e),
            Write::Internship(i) => gateway.insert_internship(i),
            Write::Job(j) => gateway.insert_job(j),
        }
    }
}

impl Submission {
    /// Writes in foreign-key order.
    pub fn plan(&self) -> Vec<Write<'_>> {
        let mut writes = vec![Write::Program(&self.program), Write::Student(&self.student)];
        if let Some(internship) = &self.internship {
            writes.push(Write::Employer(&internship.employer));
            writes.push(Write::Internship(&internship.record));
        }
        if let Some(job) = &self.job {
            writes.push(Write::Employer(&job.employer));
            writes.push(Write::Job(&job.record));
        }
        writes
    }

    /// Runs the plan against `gateway`, stopping at the first failure.
    /// Returns the number of writes performed.
    pub fn save(&self, gateway: &dyn Gateway) -> StoreResult<usize> {
        let plan = self.plan();
        for (done, write) in plan.iter().enumerate() {
            debug!(entity = write.entity(), key = write.key(), "writing");
            if let Err(e) = write.apply(gateway) {
                warn!(
                    entity = write.entity(),
                    key = write.key(),
                    committed = done,
                    "submission stopped: {}",
                    e
                );
                return Err(e);
            }
        }
        info!(
            student = %self.student.student_id,
            writes = plan.len(),
            "submission saved"
        );
        Ok(plan.len())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::models::{InternshipMode, StudentStatus};
    use std::cell::RefCell;

    /// Records every call as "entity:key"; fails on the call whose label matches `fail_on`.
    #[derive(Default)]
    pub(crate) struct RecordingGateway {
        pub calls: RefCell<Vec<String>>,
        pub fail_on: Option<String>,
    }

    impl RecordingGateway {
        fn record(&self, entity: &'static str, key: &str) -> StoreResult<()> {
            let label = format!("{}:{}", entity, key);
            self.calls.borrow_mut().push(label.clone());
            if self.fail_on.as_deref() == Some(label.as_str()) {
                return Err(StoreError::Duplicate {
                    entity,
                    id: key.to_string(),
                    detail: "UNIQUE constraint failed".to_string(),
                });
            }
            Ok(())
        }
    }

    impl Gateway for RecordingGateway {
        fn upsert_program(&self, program: &Program) -> StoreResult<()> {
            self.record("program", &program.program_id)
        }
        fn insert_student(&self, student: &Student) -> StoreResult<()> {
            self.record("student", &student.student_id)
        }
        fn upsert_employer(&self, employer: &Employer) -> StoreResult<()> {
            self.record("employer", &employer.employer_id)
        }
        fn insert_internship(&self, internship: &Internship) -> StoreResult<()> {
            self.record("internship", &internship.internship_id)
        }
        fn insert_job(&self, job: &Job) -> StoreResult<()> {
            self.record("job", &job.job_id)
        }
    }

    fn employer(id: &str) -> Employer {
        Employer {
            employer_id: id.to_string(),
            employer_name: String::new(),
            industry: String::new(),
            city: String::new(),
            state: String::new(),
            country: String::new(),
            website: String::new(),
        }
    }

    fn submission(with_internship: bool, with_job: bool) -> Submission {
        Submission {
            program: Program {
                program_id: "MSBA".to_string(),
                program_name: "MS Business Analytics".to_string(),
                level: None,
                department: "Eberhardt School of Business".to_string(),
            },
            student: Student {
                student_id: "S100".to_string(),
                program_id: "MSBA".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: String::new(),
                entry_term: String::new(),
                grad_term: String::new(),
                status: StudentStatus::Current,
                citizenship_country: String::new(),
                linkedin_url: String::new(),
            },
            internship: with_internship.then(|| Placement {
                employer: employer("EMP001"),
                record: Internship {
                    internship_id: "INT001".to_string(),
                    student_id: "S100".to_string(),
                    employer_id: "EMP001".to_string(),
                    title: "Data Analyst Intern".to_string(),
                    mode: InternshipMode::Virtual,
                    city: String::new(),
                    state: String::new(),
                    country: String::new(),
                    start_date: String::new(),
                    end_date: String::new(),
                    is_related_to_program: true,
                },
            }),
            job: with_job.then(|| Placement {
                employer: employer("EMP002"),
                record: Job {
                    job_id: "JOB001".to_string(),
                    student_id: "S100".to_string(),
                    employer_id: "EMP002".to_string(),
                    title: "Data Analyst".to_string(),
                    job_level: String::new(),
                    job_type: String::new(),
                    employment_status: "Employed".to_string(),
                    city: String::new(),
                    state: String::new(),
                    country: String::new(),
                    start_date: String::new(),
                    end_date: None,
                    sequence: 1,
                    source_internship_id: None,
                },
            }),
        }
    }

    #[test]
    fn test_full_submission_order() {
        let gateway = RecordingGateway::default();
        let written = submission(true, true).save(&gateway).unwrap();

        assert_eq!(written, 6);
        assert_eq!(
            *gateway.calls.borrow(),
            vec![
                "program:MSBA",
                "student:S100",
                "employer:EMP001",
                "internship:INT001",
                "employer:EMP002",
                "job:JOB001",
            ]
        );
    }

    #[test]
    fn test_plan_skips_absent_sections() {
        let sub = submission(false, true);
        let entities: Vec<&str> = sub.plan().iter().map(|w| w.entity()).collect();
        assert_eq!(entities, vec!["program", "student", "employer", "job"]);

        let sub = submission(false, false);
        assert_eq!(sub.plan().len(), 2);
    }

    #[test]
    fn test_failure_stops_sequence() {
        let gateway = RecordingGateway {
            fail_on: Some("internship:INT001".to_string()),
            ..Default::default()
        };
        let err = submission(true, true).save(&gateway).unwrap_err();

        assert!(err.is_duplicate());
        // Earlier writes happened, later ones never ran.
        assert_eq!(
            *gateway.calls.borrow(),
            vec!["program:MSBA", "student:S100", "employer:EMP001", "internship:INT001"]
        );
    }
}
