use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{split_csv, trim_skills, RequestQueryDto};
use crate::models::jobmodel::*;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobDto {
    #[validate(length(min = 10, max = 100, message = "Title must be between 10 and 100 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub difficulty: Difficulty,

    #[validate(range(min = 0.0, message = "Budget cannot be negative"))]
    pub budget: f64,

    pub budget_type: BudgetType,

    #[serde(default)]
    pub skills_required: Vec<String>,
}

impl CreateJobDto {
    pub fn trimmed(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.skills_required = trim_skills(self.skills_required);
        self
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobDto {
    #[validate(length(min = 10, max = 100, message = "Title must be between 10 and 100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,

    pub difficulty: Option<Difficulty>,

    #[validate(range(min = 0.0, message = "Budget cannot be negative"))]
    pub budget: Option<f64>,

    pub budget_type: Option<BudgetType>,

    pub skills_required: Option<Vec<String>>,
}

impl UpdateJobDto {
    pub fn trimmed(mut self) -> Self {
        self.title = self.title.map(|title| title.trim().to_string());
        self.description = self.description.map(|d| d.trim().to_string());
        self.skills_required = self.skills_required.map(trim_skills);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct JobData {
    pub job: Job,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateJobStatusDto {
    pub status: JobStatus,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ListJobsQueryDto {
    pub status: Option<JobStatus>,
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50, message = "Limit must be between 1 and 50"))]
    pub limit: Option<usize>,
}

impl ListJobsQueryDto {
    pub fn pagination(&self) -> RequestQueryDto {
        RequestQueryDto {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_budget_bounds", skip_on_field_errors = true))]
pub struct SearchJobsQueryDto {
    pub skills: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub budget_type: Option<BudgetType>,
    #[validate(range(min = 0.0, message = "Minimum budget cannot be negative"))]
    pub min_budget: Option<f64>,
    #[validate(range(min = 0.0, message = "Maximum budget cannot be negative"))]
    pub max_budget: Option<f64>,
    pub status: Option<JobStatus>,
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50, message = "Limit must be between 1 and 50"))]
    pub limit: Option<usize>,
}

fn validate_budget_bounds(query: &SearchJobsQueryDto) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (query.min_budget, query.max_budget) {
        if min > max {
            let mut err = ValidationError::new("budget_range");
            err.message = Some("Minimum budget cannot exceed maximum budget".into());
            return Err(err);
        }
    }
    Ok(())
}

impl SearchJobsQueryDto {
    /// Absent or blank criteria do not constrain; status defaults to open.
    pub fn filter(&self) -> JobFilter {
        let skills = self
            .skills
            .as_deref()
            .map(split_csv)
            .filter(|skills| !skills.is_empty());

        JobFilter {
            client_id: None,
            skills,
            difficulty: self.difficulty,
            budget_type: self.budget_type,
            min_budget: self.min_budget,
            max_budget: self.max_budget,
            status: Some(self.status.unwrap_or(JobStatus::Open)),
        }
    }

    pub fn pagination(&self) -> RequestQueryDto {
        RequestQueryDto {
            page: self.page,
            limit: self.limit,
        }
    }
}
