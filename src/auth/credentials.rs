use std::fmt;

/// How passwords are written to and compared against the `users` table.
///
/// `Plaintext` keeps the stored value equal to what the caller passed in and
/// compares in SQL. `Bcrypt` stores a bcrypt hash and verifies in process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordPolicy {
    #[default]
    Plaintext,
    Bcrypt,
}

impl PasswordPolicy {
    /// Produces the value to store in the `password` column.
    pub fn prepare(&self, password: &str) -> Result<String, bcrypt::BcryptError> {
        match self {
            PasswordPolicy::Plaintext => Ok(password.to_string()),
            PasswordPolicy::Bcrypt => bcrypt::hash(password, bcrypt::DEFAULT_COST),
        }
    }

    pub fn verify(&self, password: &str, stored: &str) -> bool {
        match self {
            PasswordPolicy::Plaintext => password == stored,
            // A malformed stored hash never matches
            PasswordPolicy::Bcrypt => bcrypt::verify(password, stored).unwrap_or(false),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PasswordPolicy::Plaintext => "plaintext",
            PasswordPolicy::Bcrypt => "bcrypt",
        }
    }
}

impl fmt::Display for PasswordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
