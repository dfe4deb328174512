pub mod auth;
pub mod contracts;
pub mod freelancers;
pub mod jobs;
pub mod proposals;
pub mod users;
