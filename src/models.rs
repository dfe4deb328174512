pub mod contractmodel;
pub mod freelancermodel;
pub mod jobmodel;
pub mod proposalmodel;
pub mod usermodel;
