//! Status enums for phenoview.
//!
//! `QcStatus` travels on the wire as its numeric code so that existing
//! visualisation clients keep reading `0`/`1`/`2`.

use std::borrow::Cow;
use std::fmt;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// QcStatus
// ---------------------------------------------------------------------------

/// Quality-control status of a context+parameter's data.
///
/// ```text
/// no QC record          → pending (1)
/// state done, 0 issues  → done    (0)
/// any unresolved issue  → issues  (2, wins over done)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum QcStatus {
    Done,
    #[default]
    Pending,
    Issues,
}

impl QcStatus {
    /// Numeric code used by existing visualisation clients.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Done => 0,
            Self::Pending => 1,
            Self::Issues => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Pending => "pending",
            Self::Issues => "issues",
        }
    }
}

impl From<QcStatus> for u8 {
    fn from(status: QcStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for QcStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Done),
            1 => Ok(Self::Pending),
            2 => Ok(Self::Issues),
            other => Err(format!("unknown QC status code {other}")),
        }
    }
}

impl JsonSchema for QcStatus {
    fn schema_name() -> Cow<'static, str> {
        "QcStatus".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "description": "QC status code: 0 = done, 1 = pending, 2 = issues.",
            "type": "integer",
            "enum": [0, 1, 2]
        })
    }
}

impl fmt::Display for QcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
