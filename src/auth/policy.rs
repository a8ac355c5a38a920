//! Password strength rules checked before a password is ever hashed.

use lazy_static::lazy_static;
use regex::Regex;

/// A single password requirement that was not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    TooShort { min: usize },
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
}

impl PasswordRule {
    pub fn message(&self) -> String {
        match self {
            PasswordRule::TooShort { min } => {
                format!("Password must be at least {min} characters long")
            }
            PasswordRule::MissingUppercase => {
                "Password must contain at least one uppercase letter".into()
            }
            PasswordRule::MissingLowercase => {
                "Password must contain at least one lowercase letter".into()
            }
            PasswordRule::MissingDigit => "Password must contain at least one digit".into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Returns every violated rule, in a stable order.
    pub fn check(&self, password: &str) -> Result<(), Vec<PasswordRule>> {
        let mut violated = Vec::new();

        // length is measured in characters, not bytes
        if password.chars().count() < self.min_length {
            violated.push(PasswordRule::TooShort {
                min: self.min_length,
            });
        }
        if !password.chars().any(char::is_uppercase) {
            violated.push(PasswordRule::MissingUppercase);
        }
        if !password.chars().any(char::is_lowercase) {
            violated.push(PasswordRule::MissingLowercase);
        }
        // decimal digits only; `is_numeric` would also accept things like '½'
        if !password.chars().any(|c| c.is_ascii_digit()) {
            violated.push(PasswordRule::MissingDigit);
        }

        if violated.is_empty() {
            Ok(())
        } else {
            Err(violated)
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}
