//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Domain(_) | ApplicationError::Roster { .. } => {
                    crate::exitcode::DATAERR
                }
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { source, .. } => {
                    if source.downcast_ref::<std::io::Error>().is_some() {
                        crate::exitcode::NOINPUT
                    } else {
                        crate::exitcode::SOFTWARE
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn given_unknown_employee_when_mapping_exit_code_then_dataerr() {
        let err = CliError::from(ApplicationError::from(DomainError::UnknownEmployee(7)));
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(err.to_string(), "unknown employee: 7");
    }

    #[test]
    fn given_usage_error_when_mapping_exit_code_then_usage() {
        assert_eq!(
            CliError::Usage("no roster".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }

    #[test]
    fn given_failed_read_when_mapping_exit_code_then_noinput() {
        let err = CliError::from(ApplicationError::OperationFailed {
            context: "read roster: /org/roster.toml".into(),
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )),
        });
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_failed_serialization_when_mapping_exit_code_then_software() {
        let err = CliError::from(ApplicationError::OperationFailed {
            context: "serialize roster".into(),
            source: Box::new(std::fmt::Error),
        });
        assert_eq!(err.exit_code(), crate::exitcode::SOFTWARE);
    }
}
