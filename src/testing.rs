//! Fixtures shared by the unit tests.

use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::filter::LevelFilter;
use uuid::Uuid;

use crate::{
    config::{Config, StorageBackend},
    db::{memory::MemoryStore, Store},
    dtos::{
        freelancerdtos::CreateFreelancerProfileDto, jobdtos::CreateJobDto,
        proposaldtos::CreateProposalDto, userdtos::RegisterUserDto,
    },
    models::{
        contractmodel::{Contract, ContractStatus},
        freelancermodel::PortfolioItem,
        jobmodel::{BudgetType, Difficulty},
        usermodel::{User, UserRole},
    },
    service::{
        contract_service::ContractService, freelancer_service::FreelancerService,
        identity_service::IdentityService, job_service::JobService,
        proposal_service::ProposalService,
    },
};

pub const PASSWORD: &str = "secret123";

pub fn test_config() -> Config {
    Config {
        database_url: None,
        storage: StorageBackend::Memory,
        jwt_secret: "access-secret-for-tests".to_string(),
        jwt_refresh_secret: "refresh-secret-for-tests".to_string(),
        jwt_maxage: 15,
        jwt_refresh_maxage: 60,
        port: 0,
        frontend_url: "http://localhost:5173".to_string(),
        log_level: LevelFilter::OFF,
    }
}

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub identity: IdentityService,
    pub freelancers: FreelancerService,
    pub jobs: JobService,
    pub proposals: ProposalService,
    pub contracts: ContractService,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let db_client: Arc<dyn Store> = store.clone();

        TestContext {
            identity: IdentityService::new(db_client.clone(), test_config()),
            freelancers: FreelancerService::new(db_client.clone()),
            jobs: JobService::new(db_client.clone()),
            proposals: ProposalService::new(db_client.clone()),
            contracts: ContractService::new(db_client),
            store,
        }
    }

    /// Registers `name` with `role`, using `{name}@example.com`.
    pub async fn user(&self, name: &str, role: UserRole) -> User {
        let email = format!("{}@example.com", name);
        let (user, _) = self
            .identity
            .register(register_dto(name, &email, Some(role)))
            .await
            .unwrap();
        user
    }
}

pub fn register_dto(username: &str, email: &str, role: Option<UserRole>) -> RegisterUserDto {
    RegisterUserDto {
        username: username.to_string(),
        fullname: format!("{} Tester", username),
        email: email.to_string(),
        password: PASSWORD.to_string(),
        role,
    }
}

pub fn user_with_role(role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        username: format!("{}-user", role.to_str()),
        fullname: "Test User".to_string(),
        email: format!("{}@example.com", role.to_str()),
        password: String::new(),
        role,
        profile_picture: None,
        refresh_token: None,
        client_rating: 0.0,
        client_review_count: 0,
        created_at: now,
        updated_at: now,
    }
}

pub fn contract_between(client: &User, freelancer: &User) -> Contract {
    let now = Utc::now();
    Contract {
        id: Uuid::new_v4(),
        job_id: Uuid::new_v4(),
        client_id: client.id,
        freelancer_id: freelancer.id,
        proposal_id: Uuid::new_v4(),
        amount: 500.0,
        status: ContractStatus::Active,
        start_date: now,
        end_date: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn freelancer_profile_dto(skills: &[&str]) -> CreateFreelancerProfileDto {
    CreateFreelancerProfileDto {
        title: "Backend engineer".to_string(),
        bio: Some("Builds APIs".to_string()),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        hourly_rate: 60.0,
        portfolio: Vec::new(),
    }
}

pub fn portfolio_item(title: &str) -> PortfolioItem {
    PortfolioItem {
        title: title.to_string(),
        link: format!("https://example.com/{}", title.to_lowercase()),
        desc: None,
    }
}

pub fn job_dto(budget: f64) -> CreateJobDto {
    CreateJobDto {
        title: "Build a REST API in Rust".to_string(),
        description: "Users, jobs and contracts over Postgres".to_string(),
        difficulty: Difficulty::Intermediate,
        budget,
        budget_type: BudgetType::Fixed,
        skills_required: vec!["rust".to_string(), "sql".to_string()],
    }
}

pub fn proposal_dto(job_id: Uuid, bid_amount: f64) -> CreateProposalDto {
    CreateProposalDto {
        job_id,
        cover_letter: "I have shipped several axum services before.".to_string(),
        bid_amount,
        estimated_time: "2 days".to_string(),
    }
}
