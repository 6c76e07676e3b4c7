use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declared type of a canonical field; selects the comparison rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Date,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Date => write!(f, "date"),
        }
    }
}

/// The fixed bond-attribute vocabulary.
///
/// Declaration order is the canonical comparison order: `Ord` follows it, so a
/// `BTreeMap<CanonicalField, _>` iterates fields in the order reports show them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Isin,
    Issuer,
    IssueAmount,
    FaceValue,
    CouponRate,
    Currency,
    IssueDate,
    MaturityDate,
    SettlementDate,
    PaymentFrequency,
    DayCountConvention,
    SecurityType,
    Seniority,
    Tenor,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 14] = [
        Self::Isin,
        Self::Issuer,
        Self::IssueAmount,
        Self::FaceValue,
        Self::CouponRate,
        Self::Currency,
        Self::IssueDate,
        Self::MaturityDate,
        Self::SettlementDate,
        Self::PaymentFrequency,
        Self::DayCountConvention,
        Self::SecurityType,
        Self::Seniority,
        Self::Tenor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Isin => "isin",
            Self::Issuer => "issuer",
            Self::IssueAmount => "issue_amount",
            Self::FaceValue => "face_value",
            Self::CouponRate => "coupon_rate",
            Self::Currency => "currency",
            Self::IssueDate => "issue_date",
            Self::MaturityDate => "maturity_date",
            Self::SettlementDate => "settlement_date",
            Self::PaymentFrequency => "payment_frequency",
            Self::DayCountConvention => "day_count_convention",
            Self::SecurityType => "security_type",
            Self::Seniority => "seniority",
            Self::Tenor => "tenor",
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Self::IssueAmount | Self::FaceValue | Self::CouponRate => FieldType::Number,
            Self::IssueDate | Self::MaturityDate | Self::SettlementDate => FieldType::Date,
            Self::Isin
            | Self::Issuer
            | Self::Currency
            | Self::PaymentFrequency
            | Self::DayCountConvention
            | Self::SecurityType
            | Self::Seniority
            | Self::Tenor => FieldType::String,
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A name outside the canonical vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown canonical field: '{}'", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for CanonicalField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
