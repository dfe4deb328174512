pub mod contract_service;
pub mod error;
pub mod freelancer_service;
pub mod gate;
pub mod identity_service;
pub mod job_service;
pub mod proposal_service;
