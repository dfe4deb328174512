pub mod config;
pub mod db;
pub mod dtos;
pub mod error;
pub mod extract;
pub mod handler;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod utils;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use config::Config;
use db::Store;
use service::{
    contract_service::ContractService, freelancer_service::FreelancerService,
    identity_service::IdentityService, job_service::JobService,
    proposal_service::ProposalService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<dyn Store>,
    pub identity_service: Arc<IdentityService>,
    pub freelancer_service: Arc<FreelancerService>,
    pub job_service: Arc<JobService>,
    pub proposal_service: Arc<ProposalService>,
    pub contract_service: Arc<ContractService>,
}

impl AppState {
    pub fn new(db_client: Arc<dyn Store>, config: Config) -> Self {
        let identity_service = Arc::new(IdentityService::new(db_client.clone(), config.clone()));
        let freelancer_service = Arc::new(FreelancerService::new(db_client.clone()));
        let job_service = Arc::new(JobService::new(db_client.clone()));
        let proposal_service = Arc::new(ProposalService::new(db_client.clone()));
        let contract_service = Arc::new(ContractService::new(db_client.clone()));

        Self {
            env: config,
            db_client,
            identity_service,
            freelancer_service,
            job_service,
            proposal_service,
            contract_service,
        }
    }
}
