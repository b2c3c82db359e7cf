use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::{info, instrument, warn};

use crate::{
    auth::{DbUser, DbUserSummary, PasswordPolicy, User, UserSummary},
    config::StoreConfig,
    database::CURRENT_SCHEMA,
    error::{Operation, ResultExt, StorageError},
    models::{DbGradeEntry, GradeEntry},
};

/// Handle to the school database.
///
/// Every operation borrows one pooled connection for the duration of a single
/// statement, so each call is atomic on its own and the connection goes back
/// to the pool on every exit path. Cloning is cheap and shares the pool.
#[derive(Clone, Debug)]
pub struct SchoolStore {
    pool: Pool<Sqlite>,
    password_policy: PasswordPolicy,
}

impl SchoolStore {
    /// Opens (creating if missing) the database named by `config.database_url`.
    #[instrument(skip(config), fields(database_url = %config.database_url))]
    pub async fn open(config: &StoreConfig) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .during(Operation::OpeningDatabase)?;

        let in_memory = is_in_memory(&config.database_url);
        Self::connect_with(options, config, in_memory).await
    }

    /// Opens (creating if missing) the database file at `path`. Everything in
    /// `config` except the URL applies.
    #[instrument(skip(path, config), fields(path = %path.as_ref().display()))]
    pub async fn open_path(
        path: impl AsRef<Path>,
        config: &StoreConfig,
    ) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new().filename(path.as_ref());
        Self::connect_with(options, config, false).await
    }

    /// A private in-memory database that lives as long as the store.
    pub async fn open_in_memory() -> Result<Self, StorageError> {
        Self::open(&StoreConfig::new("sqlite::memory:")).await
    }

    async fn connect_with(
        options: SqliteConnectOptions,
        config: &StoreConfig,
        in_memory: bool,
    ) -> Result<Self, StorageError> {
        // sqlx turns foreign keys on by default; the schema treats them as advisory
        let options = options
            .create_if_missing(true)
            .foreign_keys(config.enforce_foreign_keys)
            .busy_timeout(config.busy_timeout);

        // An in-memory database disappears with its last connection, so keep
        // exactly one open for the life of the pool.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .during(Operation::OpeningDatabase)?;

        info!(
            foreign_keys = config.enforce_foreign_keys,
            password_policy = %config.password_policy,
            "Opened school database"
        );

        Ok(Self {
            pool,
            password_policy: config.password_policy,
        })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        self.password_policy
    }

    pub async fn close(self) {
        self.pool.close().await;
    }

    /// Creates the `users`, `schedules`, `students` and `grades` tables if they
    /// are absent. Safe to call on every startup.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), StorageError> {
        info!("Initializing database schema");
        sqlx::raw_sql(CURRENT_SCHEMA)
            .execute(&self.pool)
            .await
            .during(Operation::Initializing)?;

        Ok(())
    }

    /// Names of the user tables currently present, sorted.
    #[instrument(skip(self))]
    pub async fn table_names(&self) -> Result<Vec<String>, StorageError> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .during(Operation::InspectingSchema)
    }

    /// Registers a user and returns its id. Logins are not required to be
    /// unique.
    #[instrument(skip(self, password))]
    pub async fn add_user(
        &self,
        name: &str,
        birthdate: &str,
        contact: &str,
        student_class: &str,
        login: &str,
        password: &str,
    ) -> Result<i64, StorageError> {
        info!("Adding user");
        let stored_password = self
            .password_policy
            .prepare(password)
            .during(Operation::AddingUser)?;

        let res = sqlx::query(
            "INSERT INTO users (name, birthdate, contact, student_class, login, password)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(birthdate)
        .bind(contact)
        .bind(student_class)
        .bind(login)
        .bind(stored_password)
        .execute(&self.pool)
        .await
        .during(Operation::AddingUser)?;

        Ok(res.last_insert_rowid())
    }

    /// Returns the lowest-id user whose login and password both match.
    #[instrument(skip(self, password))]
    pub async fn authenticate_user(
        &self,
        login: &str,
        password: &str,
    ) -> Result<Option<User>, StorageError> {
        info!("Authenticating user");
        let user = match self.password_policy {
            PasswordPolicy::Plaintext => sqlx::query_as::<_, DbUser>(
                "SELECT id, name, birthdate, contact, student_class, login, password
                 FROM users
                 WHERE login = ? AND password = ?
                 ORDER BY id
                 LIMIT 1",
            )
            .bind(login)
            .bind(password)
            .fetch_optional(&self.pool)
            .await
            .during(Operation::AuthenticatingUser)?
            .map(User::from),
            PasswordPolicy::Bcrypt => {
                let candidates = sqlx::query_as::<_, DbUser>(
                    "SELECT id, name, birthdate, contact, student_class, login, password
                     FROM users
                     WHERE login = ?
                     ORDER BY id",
                )
                .bind(login)
                .fetch_all(&self.pool)
                .await
                .during(Operation::AuthenticatingUser)?;

                candidates
                    .into_iter()
                    .map(User::from)
                    .find(|user| self.password_policy.verify(password, &user.password))
            }
        };

        match &user {
            Some(user) => info!(user_id = user.id, "Authentication successful"),
            None => warn!("Authentication failed"),
        }

        Ok(user)
    }

    /// All users as (id, name, login), ordered by id.
    #[instrument(skip(self))]
    pub async fn get_users(&self) -> Result<Vec<UserSummary>, StorageError> {
        info!("Getting all users");
        let rows = sqlx::query_as::<_, DbUserSummary>("SELECT id, name, login FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .during(Operation::GettingUsers)?;

        Ok(rows.into_iter().map(UserSummary::from).collect())
    }

    /// Appends a schedule for the user. Earlier schedules are kept.
    #[instrument(skip(self, content))]
    pub async fn add_schedule(&self, user_id: i64, content: &str) -> Result<i64, StorageError> {
        info!("Adding schedule");
        let res = sqlx::query("INSERT INTO schedules (user_id, schedule) VALUES (?, ?)")
            .bind(user_id)
            .bind(content)
            .execute(&self.pool)
            .await
            .during(Operation::AddingSchedule)?;

        Ok(res.last_insert_rowid())
    }

    /// The most recently added schedule for the user, if any.
    #[instrument(skip(self))]
    pub async fn get_schedule(&self, user_id: i64) -> Result<Option<String>, StorageError> {
        info!("Getting latest schedule");
        let schedule = sqlx::query_scalar::<_, Option<String>>(
            "SELECT schedule FROM schedules
             WHERE user_id = ?
             ORDER BY id DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .during(Operation::GettingSchedule)?;

        Ok(schedule.flatten())
    }

    #[instrument(skip(self))]
    pub async fn add_student(
        &self,
        name: &str,
        grade: &str,
        class_letter: &str,
    ) -> Result<i64, StorageError> {
        info!("Adding student");
        let res = sqlx::query("INSERT INTO students (name, grade, class_letter) VALUES (?, ?, ?)")
            .bind(name)
            .bind(grade)
            .bind(class_letter)
            .execute(&self.pool)
            .await
            .during(Operation::AddingStudent)?;

        Ok(res.last_insert_rowid())
    }

    #[instrument(skip(self))]
    pub async fn add_grade(
        &self,
        student_id: i64,
        subject: &str,
        grade: i64,
    ) -> Result<i64, StorageError> {
        info!("Adding grade");
        let res = sqlx::query("INSERT INTO grades (student_id, subject, grade) VALUES (?, ?, ?)")
            .bind(student_id)
            .bind(subject)
            .bind(grade)
            .execute(&self.pool)
            .await
            .during(Operation::AddingGrade)?;

        Ok(res.last_insert_rowid())
    }

    /// Grades for the student in insertion order, or `None` when the student
    /// has none. Never returns `Some` of an empty vector.
    #[instrument(skip(self))]
    pub async fn get_grades(&self, student_id: i64) -> Result<Option<Vec<GradeEntry>>, StorageError> {
        info!("Getting grades");
        let rows = sqlx::query_as::<_, DbGradeEntry>(
            "SELECT subject, grade FROM grades
             WHERE student_id = ?
             ORDER BY id",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .during(Operation::GettingGrades)?;

        if rows.is_empty() {
            return Ok(None);
        }

        Ok(Some(rows.into_iter().map(GradeEntry::from).collect()))
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
