use std::{collections::BTreeMap, error::Error};

use serde::Serialize;

pub mod client;
pub mod database;

pub use client::Client;

#[derive(Debug)]
pub enum RequestError {
    /// A referenced entity does not exist. Carries the entity label used in
    /// the reported message, e.g. "Building" for "Building not found".
    NotFound { entity: &'static str },
    /// Structurally valid input that does not select a meaningful query.
    BadRequest(String),
    /// Malformed or missing input, with a field-level error map.
    Validation(ValidationErrors),
    Other(Box<dyn Error + Send + Sync>),
}

impl RequestError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn other<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::NotFound => Self::NotFound { entity: "Record" },
            database::DatabaseError::Other(why) => Self::Other(why),
        }
    }
}

impl From<ValidationErrors> for RequestError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

pub type RequestResult<O> = Result<O, RequestError>;

/// Field-keyed validation failures, serialized as
/// `{"message": ..., "errors": {field: [messages]}}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
    pub message: String,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single<S: Into<String>>(field: &str, message: S) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// The overall message stays the first recorded failure.
    pub fn add<S: Into<String>>(&mut self, field: &str, message: S) {
        let message = message.into();
        if self.message.is_empty() {
            self.message = message.clone();
        }
        self.errors.entry(field.to_owned()).or_default().push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
