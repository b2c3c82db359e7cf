use serde::Serialize;

/// A full row of the `users` table.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub birthdate: String,
    pub contact: String,
    pub student_class: String,
    pub login: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbUser {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub birthdate: Option<String>,
    pub contact: Option<String>,
    pub student_class: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
}

impl From<DbUser> for User {
    fn from(user: DbUser) -> Self {
        Self {
            id: user.id.unwrap_or_default(),
            name: user.name.unwrap_or_default(),
            birthdate: user.birthdate.unwrap_or_default(),
            contact: user.contact.unwrap_or_default(),
            student_class: user.student_class.unwrap_or_default(),
            login: user.login.unwrap_or_default(),
            password: user.password.unwrap_or_default(),
        }
    }
}

/// The (id, name, login) projection returned by user listings.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub login: String,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbUserSummary {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub login: Option<String>,
}

impl From<DbUserSummary> for UserSummary {
    fn from(user: DbUserSummary) -> Self {
        Self {
            id: user.id.unwrap_or_default(),
            name: user.name.unwrap_or_default(),
            login: user.login.unwrap_or_default(),
        }
    }
}

