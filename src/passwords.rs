use crate::error::InvalidInputError;
use crate::set_membership::SetMembership;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStatus {
    Invalid,
    AlreadyUsed,
    Unique,
}

impl Display for PasswordStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PasswordStatus::Invalid => "invalid",
            PasswordStatus::AlreadyUsed => "already used",
            PasswordStatus::Unique => "unique",
        })
    }
}

pub fn validate_password(password: &str) -> Result<&str, InvalidInputError> {
    if password.trim().is_empty() {
        Err(InvalidInputError::Empty)
    } else {
        Ok(password)
    }
}

/// Classifies each password against `seen`, recording the unique ones.
///
/// Invalid passwords never touch the filter. Results keep the input order,
/// including repeated passwords.
pub fn check_password_uniqueness<F, I, S>(
    seen: &mut F,
    passwords: I,
) -> Vec<(String, PasswordStatus)>
where
    F: SetMembership,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    passwords
        .into_iter()
        .map(|password| {
            let password = password.as_ref();
            let status = match validate_password(password) {
                Err(_) => PasswordStatus::Invalid,
                Ok(valid) if seen.contains(valid) => PasswordStatus::AlreadyUsed,
                Ok(valid) => {
                    seen.insert(valid);
                    PasswordStatus::Unique
                }
            };
            tracing::trace!(%status, "checked password");
            (password.to_owned(), status)
        })
        .collect()
}
