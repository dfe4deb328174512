use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::Store,
    dtos::{
        freelancerdtos::{CreateFreelancerProfileDto, UpdateFreelancerProfileDto},
        PageDto, RequestQueryDto,
    },
    models::{
        freelancermodel::{FreelancerProfile, PortfolioItem},
        usermodel::{User, UserRole},
    },
    service::{error::ServiceError, gate},
};

#[derive(Debug, Clone)]
pub struct FreelancerService {
    db_client: Arc<dyn Store>,
}

impl FreelancerService {
    pub fn new(db_client: Arc<dyn Store>) -> Self {
        Self { db_client }
    }

    pub async fn create_profile(
        &self,
        user: &User,
        body: CreateFreelancerProfileDto,
    ) -> Result<FreelancerProfile, ServiceError> {
        gate::require_role(
            user,
            UserRole::Freelancer,
            "Only freelancers can create a freelancer profile",
        )?;

        let profile = self
            .db_client
            .save_freelancer_profile(
                user.id,
                &body.title,
                body.bio.as_deref(),
                &body.skills,
                body.hourly_rate,
                &body.portfolio,
            )
            .await?;

        tracing::info!(user_id = %user.id, profile_id = %profile.id, "freelancer profile created");
        Ok(profile)
    }

    pub async fn get_my_profile(&self, user: &User) -> Result<FreelancerProfile, ServiceError> {
        self.db_client
            .get_freelancer_profile_by_user(user.id)
            .await?
            .ok_or(ServiceError::FreelancerProfileNotFound)
    }

    pub async fn get_profile(&self, profile_id: Uuid) -> Result<FreelancerProfile, ServiceError> {
        self.db_client
            .get_freelancer_profile(profile_id)
            .await?
            .ok_or(ServiceError::FreelancerProfileNotFound)
    }

    pub async fn list_profiles(
        &self,
        query: &RequestQueryDto,
    ) -> Result<PageDto<FreelancerProfile>, ServiceError> {
        let (page, limit) = (query.page(), query.limit());
        let (profiles, total) = self.db_client.get_freelancer_profiles(page, limit).await?;
        Ok(PageDto::new("freelancers", profiles, total, page, limit))
    }

    pub async fn search_by_skills(
        &self,
        skills: &[String],
        query: &RequestQueryDto,
    ) -> Result<PageDto<FreelancerProfile>, ServiceError> {
        if skills.is_empty() {
            return Err(ServiceError::Validation(
                "Skills query parameter is required".to_string(),
            ));
        }

        let (page, limit) = (query.page(), query.limit());
        let (profiles, total) = self
            .db_client
            .search_freelancer_profiles(skills, page, limit)
            .await?;
        Ok(PageDto::new("freelancers", profiles, total, page, limit))
    }

    pub async fn update_profile(
        &self,
        user: &User,
        body: UpdateFreelancerProfileDto,
    ) -> Result<FreelancerProfile, ServiceError> {
        let mut profile = self.get_my_profile(user).await?;

        if let Some(title) = body.title {
            profile.title = title;
        }
        if let Some(bio) = body.bio {
            profile.bio = Some(bio);
        }
        if let Some(skills) = body.skills {
            profile.skills = skills;
        }
        if let Some(hourly_rate) = body.hourly_rate {
            profile.hourly_rate = hourly_rate;
        }

        self.db_client
            .update_freelancer_profile(&profile)
            .await?
            .ok_or(ServiceError::FreelancerProfileNotFound)
    }

    pub async fn delete_profile(&self, user: &User) -> Result<(), ServiceError> {
        if !self.db_client.delete_freelancer_profile(user.id).await? {
            return Err(ServiceError::FreelancerProfileNotFound);
        }
        tracing::info!(user_id = %user.id, "freelancer profile deleted");
        Ok(())
    }

    pub async fn add_portfolio_item(
        &self,
        user: &User,
        item: PortfolioItem,
    ) -> Result<FreelancerProfile, ServiceError> {
        self.db_client
            .add_portfolio_item(user.id, &item)
            .await?
            .ok_or(ServiceError::FreelancerProfileNotFound)
    }

    pub async fn remove_portfolio_item(
        &self,
        user: &User,
        index: usize,
    ) -> Result<FreelancerProfile, ServiceError> {
        let profile = self.get_my_profile(user).await?;
        if index >= profile.portfolio.len() {
            return Err(ServiceError::PortfolioItemNotFound(index));
        }

        self.db_client
            .remove_portfolio_item(user.id, index)
            .await?
            .ok_or(ServiceError::PortfolioItemNotFound(index))
    }
}
