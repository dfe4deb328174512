use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{split_csv, trim_skills, RequestQueryDto};
use crate::models::freelancermodel::{FreelancerProfile, PortfolioItem};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFreelancerProfileDto {
    #[validate(length(min = 1, max = 100, message = "Title is required and must not exceed 100 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Bio cannot exceed 2000 characters"))]
    pub bio: Option<String>,

    #[serde(default)]
    pub skills: Vec<String>,

    #[validate(range(min = 0.0, message = "Hourly rate cannot be negative"))]
    pub hourly_rate: f64,

    #[serde(default)]
    #[validate]
    pub portfolio: Vec<PortfolioItem>,
}

impl CreateFreelancerProfileDto {
    pub fn trimmed(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.bio = self.bio.map(|bio| bio.trim().to_string());
        self.skills = trim_skills(self.skills);
        self
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFreelancerProfileDto {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Bio cannot exceed 2000 characters"))]
    pub bio: Option<String>,

    pub skills: Option<Vec<String>>,

    #[validate(range(min = 0.0, message = "Hourly rate cannot be negative"))]
    pub hourly_rate: Option<f64>,
}

impl UpdateFreelancerProfileDto {
    pub fn trimmed(mut self) -> Self {
        self.title = self.title.map(|title| title.trim().to_string());
        self.bio = self.bio.map(|bio| bio.trim().to_string());
        self.skills = self.skills.map(trim_skills);
        self
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct SearchFreelancersQueryDto {
    pub skills: Option<String>,
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50, message = "Limit must be between 1 and 50"))]
    pub limit: Option<usize>,
}

impl SearchFreelancersQueryDto {
    pub fn skills(&self) -> Vec<String> {
        self.skills.as_deref().map(split_csv).unwrap_or_default()
    }

    pub fn pagination(&self) -> RequestQueryDto {
        RequestQueryDto {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FreelancerData {
    pub freelancer: FreelancerProfile,
}
