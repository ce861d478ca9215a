//! Password policy enforcement for new passwords.

use larder_core::config::auth::AuthConfig;
use larder_core::error::AppError;
use zxcvbn::Score;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    min_score: Score,
}

impl PasswordValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            min_score: score_from(config.password_min_score),
        }
    }

    /// Returns the first violated rule, if any. The entropy estimate runs
    /// last, after the cheap character-class rules.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::validation(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AppError::validation(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Password must contain at least one digit",
            ));
        }

        if !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err(AppError::validation(
                "Password must contain at least one special character",
            ));
        }

        let estimate = zxcvbn::zxcvbn(password, &[]);
        if estimate.score() < self.min_score {
            return Err(AppError::validation(
                "Password is too easy to guess, please choose a stronger one",
            ));
        }

        Ok(())
    }
}

/// Clamp a configured score onto the zxcvbn scale.
fn score_from(value: u8) -> Score {
    match value {
        0 => Score::Zero,
        1 => Score::One,
        2 => Score::Two,
        3 => Score::Three,
        _ => Score::Four,
    }
}
