use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "job_difficulty", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Entry,
    Intermediate,
    Expert,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "budget_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BudgetType {
    Fixed,
    Hourly,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn to_str(&self) -> &str {
        match self {
            JobStatus::Open => "open",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub budget: f64,
    pub budget_type: BudgetType,
    pub skills_required: Vec<String>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conjunctive job filter. `None` fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub client_id: Option<Uuid>,
    pub skills: Option<Vec<String>>,
    pub difficulty: Option<Difficulty>,
    pub budget_type: Option<BudgetType>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    pub status: Option<JobStatus>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        self.client_id.map_or(true, |id| job.client_id == id)
            && self.skills.as_ref().map_or(true, |skills| {
                job.skills_required.iter().any(|s| skills.contains(s))
            })
            && self.difficulty.map_or(true, |d| job.difficulty == d)
            && self.budget_type.map_or(true, |b| job.budget_type == b)
            && self.min_budget.map_or(true, |min| job.budget >= min)
            && self.max_budget.map_or(true, |max| job.budget <= max)
            && self.status.map_or(true, |s| job.status == s)
    }
}
