use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Alias-table entry used to label trades. Never compared.
pub const TRADE_ID: &str = "trade_id";

/// Canonical name → alternative booking-key spellings, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aliases for the booking exports this system is fed by default.
    pub fn bond_defaults() -> Self {
        const DEFAULTS: &[(&str, &[&str])] = &[
            ("isin", &["ISIN", "Isin"]),
            ("issuer", &["Issuer", "IssuerName", "IssuingEntity"]),
            ("issue_amount", &["IssueAmount", "IssueSize", "TotalAmount"]),
            ("face_value", &["NominalAmountPerBond", "FaceValue", "Denomination", "ParValue"]),
            ("coupon_rate", &["Coupon", "CouponRate", "InterestRate", "Rate"]),
            ("currency", &["Currency", "Ccy"]),
            ("issue_date", &["IssueDate", "IssuanceDate"]),
            ("maturity_date", &["Maturity", "MaturityDate"]),
            ("settlement_date", &["SettlementDate", "SettleDate"]),
            ("payment_frequency", &["InterestPaymentFrequency", "PaymentFrequency", "Frequency"]),
            ("day_count_convention", &["DayCountFraction", "DayCount", "DayCountConvention"]),
            ("security_type", &["SecurityType"]),
            ("seniority", &["Seniority"]),
            ("tenor", &["Tenor"]),
            (TRADE_ID, &["TradeID", "TradeId", "TradeRef", "Id"]),
        ];

        let mut table = Self::new();
        for (canonical, aliases) in DEFAULTS {
            table.set(*canonical, aliases.iter().map(|a| a.to_string()).collect());
        }
        table
    }

    /// Replace the alias list for `canonical`.
    pub fn set(&mut self, canonical: impl Into<String>, aliases: Vec<String>) {
        self.entries.insert(canonical.into(), aliases);
    }

    /// Append aliases after the existing ones, skipping exact duplicates.
    pub fn extend(&mut self, canonical: impl Into<String>, aliases: impl IntoIterator<Item = String>) {
        let list = self.entries.entry(canonical.into()).or_default();
        for alias in aliases {
            if !list.contains(&alias) {
                list.push(alias);
            }
        }
    }

    pub fn with(mut self, canonical: impl Into<String>, aliases: &[&str]) -> Self {
        self.set(canonical, aliases.iter().map(|a| a.to_string()).collect());
        self
    }

    /// Aliases for `canonical`; empty for unknown names.
    pub fn aliases_for(&self, canonical: &str) -> &[String] {
        self.entries.get(canonical).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.entries.contains_key(canonical)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
