//! Input checks for the sign-in and sign-up forms.

use crate::error::TrackerError;

/// Email/password pair entered at login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(invalid("Please enter both email and password."));
        }
        check_email(&self.email)
    }
}

/// Fields of the account creation form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
}

impl Registration {
    pub fn validate(&self) -> Result<(), TrackerError> {
        let fields = [
            &self.first_name,
            &self.last_name,
            &self.username,
            &self.email,
            &self.password,
            &self.repeat_password,
        ];
        if fields.iter().any(|f| f.is_empty()) {
            return Err(TrackerError::MissingFields);
        }
        check_email(&self.email)?;
        if self.password != self.repeat_password {
            return Err(invalid("Passwords do not match."));
        }
        Ok(())
    }
}

fn check_email(email: &str) -> Result<(), TrackerError> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(invalid("Please enter a valid email address."))
    }
}

fn invalid(message: &str) -> TrackerError {
    TrackerError::InvalidInput(message.to_string())
}
