use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
pub struct PortfolioItem {
    #[validate(length(min = 1, max = 100, message = "Portfolio title must be between 1 and 100 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Portfolio link is required"))]
    pub link: String,
    #[validate(length(max = 500, message = "Portfolio description cannot exceed 500 characters"))]
    pub desc: Option<String>,
}

#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub hourly_rate: f64,
    pub portfolio: Json<Vec<PortfolioItem>>,
    pub rating: f64,
    pub review_count: i32,
    pub total_jobs: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FreelancerProfile {
    pub fn has_any_skill(&self, wanted: &[String]) -> bool {
        self.skills.iter().any(|skill| wanted.contains(skill))
    }
}
