//! The two sides of a comparison and the options placed on them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::factor::{parse_factors, Factor};
use crate::domain::foundation::ValidationError;

/// Which side of the comparison an option sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Single-letter label used in prompts and verdicts.
    pub fn label(&self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One option with its weighted pros and cons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionInput {
    pub name: String,
    pub pros: Vec<Factor>,
    pub cons: Vec<Factor>,
}

impl OptionInput {
    pub fn new(name: impl Into<String>, pros: Vec<Factor>, cons: Vec<Factor>) -> Self {
        Self {
            name: name.into(),
            pros,
            cons,
        }
    }

    /// Number of factors on both lists.
    pub fn factor_count(&self) -> usize {
        self.pros.len() + self.cons.len()
    }

    /// Checks the option can take part in an analysis.
    ///
    /// The name must not be blank and at least one pro or con must be present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if self.factor_count() == 0 {
            return Err(ValidationError::empty_field("pros_or_cons"));
        }
        Ok(())
    }
}

/// Raw, unparsed option text as entered by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDraft {
    pub name: String,
    pub pros_text: String,
    pub cons_text: String,
}

impl OptionDraft {
    pub fn new(
        name: impl Into<String>,
        pros_text: impl Into<String>,
        cons_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pros_text: pros_text.into(),
            cons_text: cons_text.into(),
        }
    }

    /// Parses both factor lists. The name is trimmed.
    pub fn parse(&self) -> OptionInput {
        OptionInput::new(
            self.name.trim(),
            parse_factors(&self.pros_text),
            parse_factors(&self.cons_text),
        )
    }
}
