use thiserror::Error;

use crate::ingest::SourceKind;

/// An ingested source (or the catalog handed to the scorer) broke its input contract.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DataContractError {
    #[error("{kind} data is missing required column `{column}`")]
    MissingColumn { kind: SourceKind, column: String },
    #[error("{kind} data is missing required field `{field}`")]
    MissingField { kind: SourceKind, field: String },
    #[error("{kind} data is malformed: {message}")]
    Malformed { kind: SourceKind, message: String },
    #[error("could not read {kind} file `{path}`: {message}")]
    Io { kind: SourceKind, path: String, message: String },
    #[error("vendor catalog entry #{index} has no product name")]
    MissingProductName { index: usize },
    #[error("vendor catalog lists product `{name}` more than once")]
    DuplicateProduct { name: String },
}

impl DataContractError {
    pub fn source_kind(&self) -> SourceKind {
        match self {
            Self::MissingColumn { kind, .. }
            | Self::MissingField { kind, .. }
            | Self::Malformed { kind, .. }
            | Self::Io { kind, .. } => *kind,
            Self::MissingProductName { .. } | Self::DuplicateProduct { .. } => SourceKind::Vendor,
        }
    }
}

/// The natural-language interpreter could not produce an acceptable candidate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterpreterFailure {
    #[error("feedback instruction is empty")]
    EmptyInstruction,
    #[error("interpreter response is not valid JSON: {0}")]
    UnparsableResponse(String),
    #[error("interpreter candidate is malformed: {0}")]
    InvalidCandidate(String),
    #[error("interpreter did not answer within {0}s")]
    Timeout(u64),
    #[error("interpreter transport failure: {0}")]
    Transport(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    DataContract(#[from] DataContractError),
    #[error(transparent)]
    Interpreter(#[from] InterpreterFailure),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<DataContractError> for ApplicationError {
    fn from(value: DataContractError) -> Self {
        Self::Domain(DomainError::DataContract(value))
    }
}

impl From<InterpreterFailure> for ApplicationError {
    fn from(value: InterpreterFailure) -> Self {
        Self::Domain(DomainError::Interpreter(value))
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The input data could not be processed. Check the named source and try again."
            }
            Self::ServiceUnavailable { .. } => {
                "The assistant could not apply that feedback. The current assortment is unchanged."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::ServiceUnavailable { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(DomainError::DataContract(error)) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Domain(DomainError::Interpreter(InterpreterFailure::EmptyInstruction)) => {
                Self::BadRequest {
                    message: InterpreterFailure::EmptyInstruction.to_string(),
                    correlation_id: "unassigned".to_owned(),
                }
            }
            ApplicationError::Domain(DomainError::Interpreter(error)) => Self::ServiceUnavailable {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Persistence(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DataContractError, InterfaceError, InterpreterFailure};
    use crate::ingest::SourceKind;

    #[test]
    fn data_contract_error_maps_to_bad_request_naming_the_source() {
        let interface = ApplicationError::from(DataContractError::MissingColumn {
            kind: SourceKind::Sales,
            column: "total_units_sold".to_owned(),
        })
        .into_interface("run-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ref message,
            } if correlation_id == "run-1" && message.contains("sales") && message.contains("total_units_sold")
        ));
    }

    #[test]
    fn interpreter_failure_maps_to_service_unavailable() {
        let interface =
            ApplicationError::from(InterpreterFailure::UnparsableResponse("not json".to_owned()))
                .into_interface("run-2");

        assert!(matches!(interface, InterfaceError::ServiceUnavailable { .. }));
        assert_eq!(
            interface.user_message(),
            "The assistant could not apply that feedback. The current assortment is unchanged."
        );
    }

    #[test]
    fn empty_instruction_is_a_bad_request() {
        let interface =
            ApplicationError::from(InterpreterFailure::EmptyInstruction).into_interface("run-3");

        assert!(matches!(interface, InterfaceError::BadRequest { .. }));
    }

    #[test]
    fn persistence_error_maps_to_internal() {
        let interface =
            ApplicationError::Persistence("disk full".to_owned()).into_interface("run-4");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.message(), "disk full");
        assert_eq!(interface.user_message(), "An unexpected internal error occurred.");
    }

    #[test]
    fn catalog_violations_are_attributed_to_the_vendor_source() {
        let error = DataContractError::DuplicateProduct { name: "Desk Lamp".to_owned() };
        assert_eq!(error.source_kind(), SourceKind::Vendor);
    }
}
