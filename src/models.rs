use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A dataset fetched from an external authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Spdx,
    Fsf,
    OpenDefinition,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Spdx => write!(f, "SPDX"),
            Source::Fsf => write!(f, "FSF"),
            Source::OpenDefinition => write!(f, "Open Definition"),
        }
    }
}

/// An approval authority a license can be recognized by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Authority {
    /// Open Source Initiative, via the SPDX `isOsiApproved` flag.
    Osi,
    /// Free Software Foundation license list.
    Fsf,
    /// Open Definition conformant licenses.
    OpenDefinition,
}

impl Authority {
    pub const ALL: [Authority; 3] = [Authority::Osi, Authority::Fsf, Authority::OpenDefinition];

    /// The dataset this authority's approvals are read from.
    pub fn source(self) -> Source {
        match self {
            Authority::Osi => Source::Spdx,
            Authority::Fsf => Source::Fsf,
            Authority::OpenDefinition => Source::OpenDefinition,
        }
    }

    /// Front matter key a record uses to declare this authority's approval.
    pub fn declared_field(self) -> &'static str {
        match self {
            Authority::Osi => "osi-approved",
            Authority::Fsf => "fsf-approved",
            Authority::OpenDefinition => "od-approved",
        }
    }
}

impl std::fmt::Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Authority::Osi => write!(f, "OSI"),
            Authority::Fsf => write!(f, "FSF"),
            Authority::OpenDefinition => write!(f, "Open Definition"),
        }
    }
}

/// One normalized fact from an authority list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityEntry {
    /// Normalized identifier or name used for joining.
    pub key: String,
    /// The authority's own label for the license.
    pub display_name: String,
    pub source: Authority,
}

/// One license document of the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// SPDX identifier as stored, e.g. `MIT`.
    pub identifier: String,
    pub title: String,
    #[serde(default)]
    pub hidden: bool,
    /// Basename of the source document, e.g. `mit` for `mit.txt`.
    pub spdx_lcase: String,
    /// Rule group name → tags referenced by this license.
    #[serde(default)]
    pub rules: BTreeMap<String, Vec<String>>,
    /// Every other declared metadata field.
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl LicenseRecord {
    /// The approval flag this record declares for `authority`, if any.
    pub fn declared_approval(&self, authority: Authority) -> Option<bool> {
        self.fields
            .get(authority.declared_field())
            .and_then(serde_json::Value::as_bool)
    }
}

/// A mismatch found while reconciling a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Discrepancy {
    /// Declared approval flag disagrees with the authority's list.
    ApprovalMismatch {
        license: String,
        authority: Authority,
        declared: bool,
        recognized: bool,
    },
    /// Tag is not defined in the named rule group.
    UnknownRuleTag {
        license: String,
        group: String,
        tag: String,
    },
    /// Metadata field is not part of the field schema.
    UnknownField { license: String, field: String },
    /// Identifier does not exist in the SPDX license list.
    UnknownIdentifier { license: String },
    /// Shown license is approved by none of the authorities.
    Unapproved { license: String },
    /// Document basename does not match the lowercased identifier.
    FilenameMismatch { license: String, spdx_lcase: String },
}

impl Discrepancy {
    /// Identifier of the record the discrepancy was found on.
    pub fn license(&self) -> &str {
        match self {
            Discrepancy::ApprovalMismatch { license, .. }
            | Discrepancy::UnknownRuleTag { license, .. }
            | Discrepancy::UnknownField { license, .. }
            | Discrepancy::UnknownIdentifier { license }
            | Discrepancy::Unapproved { license }
            | Discrepancy::FilenameMismatch { license, .. } => license,
        }
    }
}

impl std::fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Discrepancy::ApprovalMismatch {
                license,
                authority,
                declared,
                recognized,
            } => write!(
                f,
                "{}: declares {} approval = {} but the {} list says {}",
                license, authority, declared, authority, recognized
            ),
            Discrepancy::UnknownRuleTag {
                license,
                group,
                tag,
            } => write!(f, "{}: unknown {} tag `{}`", license, group, tag),
            Discrepancy::UnknownField { license, field } => {
                write!(f, "{}: unknown field `{}`", license, field)
            }
            Discrepancy::UnknownIdentifier { license } => {
                write!(f, "{}: not an SPDX license identifier", license)
            }
            Discrepancy::Unapproved { license } => {
                write!(f, "{}: not approved by OSI, FSF or Open Definition", license)
            }
            Discrepancy::FilenameMismatch {
                license,
                spdx_lcase,
            } => write!(f, "{}: stored as `{}`", license, spdx_lcase),
        }
    }
}
