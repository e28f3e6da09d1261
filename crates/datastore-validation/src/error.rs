//! Validation error: a client-facing message and the parameters it concerns
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub params: Vec<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, params: &[&str]) -> Self {
        Self {
            message: message.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn concerns(&self, param: &str) -> bool {
        self.params.iter().any(|p| p == param)
    }
}
