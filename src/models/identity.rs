// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Identity slots and registered identities.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Lowest-privilege access level; assigned when none is given.
pub const BASE_ACCESS_LEVEL: i64 = 5;

/// A reserved identity ID, created before full registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, Validate)]
pub struct IrSlot {
    #[validate(length(min = 1, max = 18))]
    pub ir_id: String,
}

/// Registered identity as returned by the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Identity {
    pub ir_id: String,
    pub ir_name: String,
    pub ir_email: String,
    /// 1 = admin ... 5 = base. Stored, not enforced.
    pub ir_access_level: i64,
    pub status: bool,
    pub plan_count: i64,
    /// Activity count
    pub dr_count: i64,
    pub info_count: i64,
    pub name_list: i64,
    /// Creation date in the reference timezone (`DD-MM-YYYY`)
    pub started_date: String,
    pub weekly_info_target: Option<i64>,
    pub weekly_plan_target: Option<i64>,
    pub weekly_uv_target: Option<i64>,
}

/// Elevated levels (anything above base level) may carry a UV target.
pub fn is_elevated_level(level: i64) -> bool {
    level < BASE_ACCESS_LEVEL
}

/// Stored credentials, only read for password verification.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Credentials {
    pub ir_id: String,
    pub ir_password: String,
}

fn default_access_level() -> i64 {
    BASE_ACCESS_LEVEL
}

/// Registration payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_uv_target_on_register"))]
pub struct RegisterIdentity {
    #[validate(length(min = 1, max = 18))]
    pub ir_id: String,
    #[validate(length(min = 1, max = 45))]
    pub ir_name: String,
    #[validate(email)]
    pub ir_email: String,
    #[validate(length(min = 8, max = 64))]
    pub ir_password: String,
    #[serde(default = "default_access_level")]
    #[validate(range(min = 1, max = 5))]
    pub ir_access_level: i64,
    #[validate(range(min = 0, max = 10_000))]
    pub weekly_info_target: Option<i64>,
    #[validate(range(min = 0, max = 10_000))]
    pub weekly_plan_target: Option<i64>,
    #[validate(range(min = 0, max = 10_000))]
    pub weekly_uv_target: Option<i64>,
}

fn validate_uv_target_on_register(payload: &RegisterIdentity) -> Result<(), ValidationError> {
    if payload.weekly_uv_target.is_some() && !is_elevated_level(payload.ir_access_level) {
        return Err(ValidationError::new("uv_target_requires_elevated_access"));
    }
    Ok(())
}

/// Login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub ir_id: String,
    pub ir_password: String,
}

/// Partial identity update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateIdentity {
    #[validate(length(min = 1, max = 45))]
    pub ir_name: Option<String>,
    #[validate(email)]
    pub ir_email: Option<String>,
    pub status: Option<bool>,
    #[validate(range(min = 1, max = 5))]
    pub ir_access_level: Option<i64>,
    #[validate(range(min = 0))]
    pub plan_count: Option<i64>,
    #[validate(range(min = 0))]
    pub dr_count: Option<i64>,
    #[validate(range(min = 0))]
    pub info_count: Option<i64>,
    #[validate(range(min = 0))]
    pub name_list: Option<i64>,
    #[validate(range(min = 0, max = 10_000))]
    pub weekly_info_target: Option<i64>,
    #[validate(range(min = 0, max = 10_000))]
    pub weekly_plan_target: Option<i64>,
    #[validate(range(min = 0, max = 10_000))]
    pub weekly_uv_target: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_levels_below_base_are_elevated() {
        assert!(is_elevated_level(1));
        assert!(is_elevated_level(BASE_ACCESS_LEVEL - 1));
        assert!(!is_elevated_level(BASE_ACCESS_LEVEL));
    }

    fn registration() -> RegisterIdentity {
        RegisterIdentity {
            ir_id: "IR001".to_string(),
            ir_name: "Asha".to_string(),
            ir_email: "asha@example.com".to_string(),
            ir_password: "secretpw".to_string(),
            ir_access_level: BASE_ACCESS_LEVEL,
            weekly_info_target: None,
            weekly_plan_target: None,
            weekly_uv_target: None,
        }
    }

    #[test]
    fn test_registration_validates() {
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn test_registration_rejects_bad_fields() {
        let mut payload = registration();
        payload.ir_id = "X".repeat(19);
        assert!(payload.validate().is_err());

        let mut payload = registration();
        payload.ir_password = "short".to_string();
        assert!(payload.validate().is_err());

        let mut payload = registration();
        payload.ir_email = "not-an-email".to_string();
        assert!(payload.validate().is_err());

        let mut payload = registration();
        payload.ir_access_level = 6;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_uv_target_requires_elevated_level() {
        let mut payload = registration();
        payload.weekly_uv_target = Some(3);
        assert!(payload.validate().is_err());

        payload.ir_access_level = 2;
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_access_level_defaults_to_base() {
        let payload: RegisterIdentity = serde_json::from_value(serde_json::json!({
            "ir_id": "IR002",
            "ir_name": "Ravi",
            "ir_email": "ravi@example.com",
            "ir_password": "longenough"
        }))
        .unwrap();
        assert_eq!(payload.ir_access_level, BASE_ACCESS_LEVEL);
    }
}
