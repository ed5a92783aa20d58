//! Authorization verdicts.

use serde::Serialize;

use crate::media::Encoding;

/// Outcome of one authorization decision. Exactly one variant holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Authorized(Encoding),
    Denied(Denial),
}

impl Verdict {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Verdict::Authorized(_))
    }

    /// Label used for the verdict metric.
    pub fn outcome(&self) -> &'static str {
        match self {
            Verdict::Authorized(_) => "authorized",
            Verdict::Denied(Denial::CatalogUnavailable) => "catalog_unavailable",
            Verdict::Denied(Denial::NoMatchingEncodings) => "no_matching_encodings",
        }
    }
}

/// Business denial. Not a process fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The descriptor could not be fetched or decoded.
    CatalogUnavailable,
    /// The descriptor has no encoding the current policy admits.
    NoMatchingEncodings,
}

impl Denial {
    /// Numeric code carried in the JSON denial body.
    pub fn code(self) -> i32 {
        match self {
            Denial::CatalogUnavailable => 0,
            Denial::NoMatchingEncodings => 306,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Denial::CatalogUnavailable => "catalog unavailable",
            Denial::NoMatchingEncodings => "no matching encodings",
        }
    }

    pub fn body(self) -> DenialBody {
        DenialBody {
            code: self.code(),
            message: self.message(),
        }
    }
}

/// Wire shape: `{"code": <int>, "message": <string>}`.
#[derive(Debug, Clone, Serialize)]
pub struct DenialBody {
    pub code: i32,
    pub message: &'static str,
}
