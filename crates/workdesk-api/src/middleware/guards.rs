//! Role and membership checks applied by the services

use workdesk_db::entities::user::{self, CompanyRole};

use crate::error::{ServiceError, ServiceResult};

/// Company administrators only
pub fn require_admin(user: &user::Model) -> ServiceResult<()> {
    if user.company_role == CompanyRole::Admin {
        Ok(())
    } else {
        Err(ServiceError::forbidden("Only company admins can do this"))
    }
}

/// Managers and admins
pub fn require_manager(user: &user::Model) -> ServiceResult<()> {
    if user.company_role.is_manager_or_above() {
        Ok(())
    } else {
        Err(ServiceError::forbidden("Only managers and admins can do this"))
    }
}

/// Returns the caller's company id, or Forbidden when they have none
pub fn require_company(user: &user::Model) -> ServiceResult<i32> {
    user.company_id
        .ok_or_else(|| ServiceError::forbidden("You are not a member of any company"))
}

/// Caller must belong to `company_id`
pub fn require_member_of(user: &user::Model, company_id: i32) -> ServiceResult<()> {
    if require_company(user)? == company_id {
        Ok(())
    } else {
        Err(ServiceError::forbidden("You are not a member of this company"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with(role: CompanyRole, company_id: Option<i32>) -> user::Model {
        user::Model {
            id: 1,
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "ann@example.com".to_string(),
            password_hash: String::new(),
            company_role: role,
            company_id,
            department_id: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_guard() {
        assert!(require_admin(&user_with(CompanyRole::Admin, None)).is_ok());
        assert!(matches!(
            require_admin(&user_with(CompanyRole::Manager, None)),
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[test]
    fn test_manager_guard_accepts_admins() {
        assert!(require_manager(&user_with(CompanyRole::Manager, None)).is_ok());
        assert!(require_manager(&user_with(CompanyRole::Admin, None)).is_ok());
        assert!(require_manager(&user_with(CompanyRole::Employee, None)).is_err());
    }

    #[test]
    fn test_membership_guards() {
        let member = user_with(CompanyRole::Employee, Some(3));

        assert_eq!(require_company(&member).unwrap(), 3);
        assert!(require_member_of(&member, 3).is_ok());
        assert!(require_member_of(&member, 4).is_err());
        assert!(require_company(&user_with(CompanyRole::Employee, None)).is_err());
    }
}
