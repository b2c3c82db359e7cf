#[cfg(test)]
mod tests {
    use crate::error::{Operation, ResultExt, StorageError};

    #[test]
    fn test_message_names_operation() {
        let result: Result<(), sqlx::Error> = Err(sqlx::Error::RowNotFound);

        let err = result.during(Operation::AddingUser).unwrap_err();

        assert_eq!(err.operation(), Operation::AddingUser);
        assert_eq!(
            err.to_string(),
            format!("failed while adding user: {}", sqlx::Error::RowNotFound)
        );
        assert!(matches!(err, StorageError::Database { .. }));
    }

    #[test]
    fn test_source_is_preserved() {
        let result: Result<(), sqlx::Error> = Err(sqlx::Error::PoolClosed);

        let err = result.during(Operation::GettingGrades).unwrap_err();

        let source = std::error::Error::source(&err).expect("Expected a source error");
        assert_eq!(source.to_string(), sqlx::Error::PoolClosed.to_string());
    }

    #[test]
    fn test_operation_phrases() {
        assert_eq!(Operation::Initializing.to_string(), "initializing the database");
        assert_eq!(Operation::AuthenticatingUser.to_string(), "authenticating user");
        assert_eq!(Operation::GettingUsers.to_string(), "getting users");
        assert_eq!(Operation::AddingSchedule.to_string(), "adding schedule");
        assert_eq!(Operation::GettingSchedule.to_string(), "getting schedule");
        assert_eq!(Operation::AddingStudent.to_string(), "adding student");
        assert_eq!(Operation::AddingGrade.to_string(), "adding grade");
    }
}
