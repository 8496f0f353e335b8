use serde::{Deserialize, Serialize};

use crate::models::records::{Company, CompanyForm, Worker, WorkerForm};

/// Youngest and oldest accepted worker age.
pub const MIN_AGE: u32 = 16;
pub const MAX_AGE: u32 = 100;

/// Why a submitted record was not stored. A rejection is an ordinary value
/// handed back to the user, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub blank_fields: Vec<String>,
    pub problems: Vec<String>,
}

impl ValidationReport {
    fn new() -> Self {
        Self {
            blank_fields: Vec::new(),
            problems: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.blank_fields.is_empty() && self.problems.is_empty()
    }

    /// One-line, user-facing summary.
    pub fn message(&self) -> String {
        let mut parts = Vec::new();
        if !self.blank_fields.is_empty() {
            parts.push(format!(
                "All fields are required (empty: {})",
                self.blank_fields.join(", ")
            ));
        }
        parts.extend(self.problems.iter().cloned());
        parts.join("; ")
    }

    fn check_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.blank_fields.push(field.to_string());
        }
    }
}

pub fn validate_company(form: &CompanyForm) -> Result<Company, ValidationReport> {
    let mut report = ValidationReport::new();
    report.check_blank("name", &form.name);
    report.check_blank("job_type", &form.job_type);
    report.check_blank("description", &form.description);
    report.check_blank("location", &form.location);

    if !report.passed() {
        return Err(report);
    }

    Ok(Company {
        name: form.name.trim().to_string(),
        job_type: form.job_type.trim().to_string(),
        description: form.description.trim().to_string(),
        location: form.location.trim().to_string(),
    })
}

pub fn validate_worker(form: &WorkerForm) -> Result<Worker, ValidationReport> {
    let mut report = ValidationReport::new();
    report.check_blank("name", &form.name);
    report.check_blank("age", &form.age);
    report.check_blank("resume", &form.resume);
    report.check_blank("location", &form.location);

    let age = parse_age(&form.age);
    if let Err(problem) = &age {
        if !form.age.trim().is_empty() {
            report.problems.push(problem.clone());
        }
    }

    match age {
        Ok(age) if report.passed() => Ok(Worker {
            name: form.name.trim().to_string(),
            age,
            resume: form.resume.trim().to_string(),
            location: form.location.trim().to_string(),
        }),
        _ => Err(report),
    }
}

/// Parses a whole-number age within `MIN_AGE..=MAX_AGE`.
pub fn parse_age(raw: &str) -> Result<u32, String> {
    let age: u32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("age must be a whole number, got '{}'", raw.trim()))?;

    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(format!("age must be between {MIN_AGE} and {MAX_AGE}, got {age}"));
    }
    Ok(age)
}
