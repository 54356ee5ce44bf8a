//! Baby-shelf capacity check: issuers with a public float under $75 million
//! may sell at most a third of that float under a shelf in any 12 months.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const BABY_SHELF_FLOAT_THRESHOLD: f64 = 75_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum DilutionVerdict {
    Restricted {
        /// Maximum aggregate issuance over a rolling 12-month window
        max_issuance_12m: f64,
    },
    Unrestricted,
}

impl DilutionVerdict {
    pub fn is_restricted(&self) -> bool {
        matches!(self, DilutionVerdict::Restricted { .. })
    }
}

impl fmt::Display for DilutionVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DilutionVerdict::Restricted { max_issuance_12m } => {
                write!(f, "restricted (12-month cap ${:.2})", max_issuance_12m)
            }
            DilutionVerdict::Unrestricted => write!(f, "unrestricted"),
        }
    }
}

/// The threshold is exclusive: a float of exactly $75M is unrestricted.
pub fn evaluate_dilution_policy(public_float: f64) -> DilutionVerdict {
    if public_float < BABY_SHELF_FLOAT_THRESHOLD {
        DilutionVerdict::Restricted {
            max_issuance_12m: public_float / 3.0,
        }
    } else {
        DilutionVerdict::Unrestricted
    }
}
