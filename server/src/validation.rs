//! Optional payload checks applied before the store is called.
//!
//! Off by default: the store's schema is the only gatekeeper, so an empty
//! `username` is accepted just like any other string. With
//! `strict_payloads` enabled, blank required text fields are refused.

use crate::model::{TodoInput, UserInput};

/// Whether create/update payloads get checked beyond deserialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadPolicy {
    #[default]
    Permissive,
    Strict,
}

impl PayloadPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Permissive
        }
    }

    /// Name of the first offending field, if the payload is refused.
    pub fn check<P: Validate>(self, payload: &P) -> Result<(), &'static str> {
        match self {
            Self::Permissive => Ok(()),
            Self::Strict => payload.validate(),
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), &'static str>;
}

fn require_text(field: &'static str, value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err(field);
    }
    Ok(())
}

impl Validate for UserInput {
    fn validate(&self) -> Result<(), &'static str> {
        require_text("username", &self.username)?;
        require_text("firstname", &self.firstname)?;
        require_text("lastname", &self.lastname)?;
        require_text("password", &self.password)
    }
}

impl Validate for TodoInput {
    fn validate(&self) -> Result<(), &'static str> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)
    }
}
