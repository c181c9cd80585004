//! Status object returned by the kernel library's validation entry points.

use super::{Support, Unsupported};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Ok,
    RuntimeError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelStatus {
    code: ErrorCode,
    description: String,
}

impl KernelStatus {
    pub fn ok() -> Self {
        Self {
            code: ErrorCode::Ok,
            description: String::new(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::RuntimeError,
            description: description.into(),
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        self.code
    }

    pub fn error_description(&self) -> &str {
        &self.description
    }

    pub fn is_ok(&self) -> bool {
        self.code == ErrorCode::Ok
    }
}

impl From<KernelStatus> for Support {
    fn from(status: KernelStatus) -> Self {
        match status.code {
            ErrorCode::Ok => Ok(()),
            ErrorCode::RuntimeError => Err(Unsupported::new(status.description)),
        }
    }
}
