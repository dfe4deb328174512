//! Role, ownership and party checks. Every failure is a 403; a missing or
//! invalid identity never reaches here, the auth middleware answers 401.

use uuid::Uuid;

use super::error::ServiceError;
use crate::models::{contractmodel::Contract, usermodel::{User, UserRole}};

pub fn require_role(user: &User, role: UserRole, message: &str) -> Result<(), ServiceError> {
    if user.role != role {
        return Err(ServiceError::Forbidden(message.to_string()));
    }
    Ok(())
}

pub fn require_owner(user: &User, owner_id: Uuid, message: &str) -> Result<(), ServiceError> {
    if user.id != owner_id {
        return Err(ServiceError::Forbidden(message.to_string()));
    }
    Ok(())
}

pub fn require_party(user: &User, contract: &Contract, message: &str) -> Result<(), ServiceError> {
    if !contract.is_party(user.id) {
        return Err(ServiceError::Forbidden(message.to_string()));
    }
    Ok(())
}

/// Passes when the user is any one of `allowed`.
pub fn require_any_of(user: &User, allowed: &[Uuid], message: &str) -> Result<(), ServiceError> {
    if !allowed.contains(&user.id) {
        return Err(ServiceError::Forbidden(message.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{contract_between, user_with_role};

    #[test]
    fn role_gate() {
        let client = user_with_role(UserRole::Client);
        assert!(require_role(&client, UserRole::Client, "no").is_ok());
        assert!(matches!(
            require_role(&client, UserRole::Freelancer, "Only freelancers can do this"),
            Err(ServiceError::Forbidden(message)) if message == "Only freelancers can do this"
        ));
    }

    #[test]
    fn ownership_gate() {
        let client = user_with_role(UserRole::Client);
        assert!(require_owner(&client, client.id, "no").is_ok());
        assert!(require_owner(&client, Uuid::new_v4(), "no").is_err());
    }

    #[test]
    fn party_gate() {
        let client = user_with_role(UserRole::Client);
        let freelancer = user_with_role(UserRole::Freelancer);
        let outsider = user_with_role(UserRole::Client);
        let contract = contract_between(&client, &freelancer);

        assert!(require_party(&client, &contract, "no").is_ok());
        assert!(require_party(&freelancer, &contract, "no").is_ok());
        assert!(require_party(&outsider, &contract, "no").is_err());
    }

    #[test]
    fn any_of_gate() {
        let user = user_with_role(UserRole::Freelancer);
        assert!(require_any_of(&user, &[Uuid::new_v4(), user.id], "no").is_ok());
        assert!(require_any_of(&user, &[Uuid::new_v4()], "no").is_err());
    }
}
