#[cfg(test)]
pub mod test_store {
    use crate::auth::PasswordPolicy;
    use crate::config::StoreConfig;
    use crate::db::SchoolStore;
    use crate::error::StorageError;
    use std::collections::HashMap;
    use std::sync::Once;
    use tempfile::TempDir;

    static INIT: Once = Once::new();
    pub static STANDARD_PASSWORD: &str = "password123";

    pub fn init_test_logging() {
        INIT.call_once(|| {
            let _ = env_logger::builder()
                .parse_filters("debug")
                .is_test(true)
                .try_init();
        });
    }

    #[derive(Default)]
    pub struct TestStoreBuilder {
        on_disk: bool,
        policy: PasswordPolicy,
        enforce_foreign_keys: bool,
        users: Vec<TestUser>,
        students: Vec<TestStudent>,
        schedules: Vec<TestSchedule>,
        grades: Vec<TestGrade>,
    }

    pub struct TestUser {
        pub name: String,
        pub login: String,
        pub password: String,
        pub student_class: String,
    }

    pub struct TestStudent {
        pub name: String,
        pub grade: String,
        pub class_letter: String,
    }

    pub struct TestSchedule {
        pub login: String,
        pub content: String,
    }

    pub struct TestGrade {
        pub student_name: String,
        pub subject: String,
        pub grade: i64,
    }

    impl TestStoreBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        /// Backs the store with a file in a temporary directory instead of memory.
        pub fn on_disk(mut self) -> Self {
            self.on_disk = true;
            self
        }

        pub fn password_policy(mut self, policy: PasswordPolicy) -> Self {
            self.policy = policy;
            self
        }

        pub fn enforce_foreign_keys(mut self) -> Self {
            self.enforce_foreign_keys = true;
            self
        }

        pub fn user(self, name: &str, login: &str) -> Self {
            self.user_with_password(name, login, STANDARD_PASSWORD)
        }

        pub fn user_with_password(mut self, name: &str, login: &str, password: &str) -> Self {
            self.users.push(TestUser {
                name: name.to_string(),
                login: login.to_string(),
                password: password.to_string(),
                student_class: "5A".to_string(),
            });
            self
        }

        pub fn student(mut self, name: &str, grade: &str, class_letter: &str) -> Self {
            self.students.push(TestStudent {
                name: name.to_string(),
                grade: grade.to_string(),
                class_letter: class_letter.to_string(),
            });
            self
        }

        pub fn schedule(mut self, login: &str, content: &str) -> Self {
            self.schedules.push(TestSchedule {
                login: login.to_string(),
                content: content.to_string(),
            });
            self
        }

        pub fn grade(mut self, student_name: &str, subject: &str, grade: i64) -> Self {
            self.grades.push(TestGrade {
                student_name: student_name.to_string(),
                subject: subject.to_string(),
                grade,
            });
            self
        }

        pub async fn build(self) -> Result<TestStore, StorageError> {
            init_test_logging();

            let config = StoreConfig::default()
                .with_password_policy(self.policy)
                .with_foreign_keys(self.enforce_foreign_keys);

            let (store, dir) = if self.on_disk {
                let dir = tempfile::tempdir().expect("Failed to create temp dir");
                let store = SchoolStore::open_path(dir.path().join("school.db"), &config).await?;
                (store, Some(dir))
            } else {
                let config = StoreConfig {
                    database_url: "sqlite::memory:".to_string(),
                    ..config
                };
                (SchoolStore::open(&config).await?, None)
            };

            store.initialize().await?;

            let mut user_id_map: HashMap<String, i64> = HashMap::new();
            let mut student_id_map: HashMap<String, i64> = HashMap::new();

            for user in &self.users {
                let user_id = store
                    .add_user(
                        &user.name,
                        "2000-01-01",
                        &format!("{}@school.test", user.login),
                        &user.student_class,
                        &user.login,
                        &user.password,
                    )
                    .await?;

                user_id_map.entry(user.login.clone()).or_insert(user_id);
            }

            for student in &self.students {
                let student_id = store
                    .add_student(&student.name, &student.grade, &student.class_letter)
                    .await?;

                student_id_map.insert(student.name.clone(), student_id);
            }

            for schedule in &self.schedules {
                if let Some(user_id) = user_id_map.get(&schedule.login) {
                    store.add_schedule(*user_id, &schedule.content).await?;
                }
            }

            for grade in &self.grades {
                if let Some(student_id) = student_id_map.get(&grade.student_name) {
                    store
                        .add_grade(*student_id, &grade.subject, grade.grade)
                        .await?;
                }
            }

            Ok(TestStore {
                store,
                user_id_map,
                student_id_map,
                dir,
            })
        }
    }

    pub struct TestStore {
        pub store: SchoolStore,
        pub user_id_map: HashMap<String, i64>,
        pub student_id_map: HashMap<String, i64>,
        pub dir: Option<TempDir>,
    }

    impl TestStore {
        pub fn user_id(&self, login: &str) -> Option<i64> {
            self.user_id_map.get(login).copied()
        }

        pub fn student_id(&self, name: &str) -> Option<i64> {
            self.student_id_map.get(name).copied()
        }

        pub async fn row_count(&self, table: &str) -> i64 {
            sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(self.store.pool())
                .await
                .expect("Failed to count rows")
        }
    }
}
