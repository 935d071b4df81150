use crate::shared::validation::{is_valid_email, require_min_chars, ValidationErrors};
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MIN_USERNAME_CHARS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !is_valid_email(&self.email) {
            errors.add("email", "Invalid email address");
        }
        require_min_chars(&mut errors, "password", &self.password, MIN_PASSWORD_CHARS);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_min_chars(&mut errors, "username", self.username.trim(), MIN_USERNAME_CHARS);
        if !is_valid_email(&self.email) {
            errors.add("email", "Invalid email address");
        }
        require_min_chars(&mut errors, "password", &self.password, MIN_PASSWORD_CHARS);
        errors.into_result()
    }
}

/// Body of `POST /change-password`. Passwords here are numeric PINs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let fields = [
            ("current_password", &self.current_password),
            ("new_password", &self.new_password),
            ("confirm_password", &self.confirm_password),
        ];
        for (field, value) in fields {
            require_min_chars(&mut errors, field, value, MIN_PASSWORD_CHARS);
            if !value.chars().all(|c| c.is_ascii_digit()) {
                errors.add(field, "Password must be numbers");
            }
        }
        if self.confirm_password != self.new_password {
            errors.add("confirm_password", "Passwords do not match");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangePasswordResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ if !self.username.is_empty() => self.username.clone(),
            _ => self.email.clone(),
        }
    }
}

/// Response of `POST /login` and `POST /register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_rules() {
        let request = RegisterRequest {
            username: "mg".into(),
            email: "mg@example.com".into(),
            password: "1234567".into(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.get("username").is_some());
        assert!(errors.get("password").is_some());
        assert!(errors.get("email").is_none());
    }

    #[test]
    fn test_sign_in_rules() {
        let ok = LoginRequest {
            email: "aung@example.com".into(),
            password: "correct horse".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = LoginRequest {
            email: "aung".into(),
            password: "x".into(),
        };
        assert_eq!(bad.validate().unwrap_err().len(), 2);
    }

    #[test]
    fn test_change_password_rules() {
        let ok = ChangePasswordRequest {
            current_password: "12345678".into(),
            new_password: "87654321".into(),
            confirm_password: "87654321".into(),
        };
        assert!(ok.validate().is_ok());

        let short = ChangePasswordRequest {
            current_password: "1234".into(),
            ..ok.clone()
        };
        assert_eq!(
            short.validate().unwrap_err().get("current_password"),
            Some("Must be at least 8 characters")
        );

        let letters = ChangePasswordRequest {
            new_password: "abcdefgh".into(),
            confirm_password: "abcdefgh".into(),
            ..ok.clone()
        };
        let errors = letters.validate().unwrap_err();
        assert_eq!(errors.get("new_password"), Some("Password must be numbers"));
        assert_eq!(errors.get("confirm_password"), Some("Password must be numbers"));
        assert!(errors.get("current_password").is_none());
    }

    #[test]
    fn test_change_password_confirmation_must_match() {
        let request = ChangePasswordRequest {
            current_password: "12345678".into(),
            new_password: "87654321".into(),
            confirm_password: "87654320".into(),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["currentPassword"], "12345678");
        assert_eq!(json["confirmPassword"], "87654320");
    }

    #[test]
    fn test_display_name() {
        let user: User = serde_json::from_str(
            r#"{"id":"1","username":"aung","email":"a@b.co","firstName":"Aung","lastName":"Ko"}"#,
        )
        .unwrap();
        assert_eq!(user.display_name(), "Aung Ko");
    }
}
