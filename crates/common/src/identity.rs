//! The authenticated identity and its role.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role. Determines which views are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,

    /// Clinician accounts are called "dermatologist" on the wire.
    #[serde(rename = "dermatologist")]
    Clinician,
}

impl Role {
    /// Wire spelling of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Clinician => "dermatologist",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in user. An identity always carries exactly one role.
///
/// The remote user object carries more fields (email, age, gender); only
/// the ones the client core needs are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub role: Role,
}
