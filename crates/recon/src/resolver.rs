use crate::alias::AliasTable;
use crate::model::{BookingRecord, FieldValue};

/// Outcome of looking up a canonical field in one booking record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    Found { key: &'a str, value: &'a FieldValue },
    NotFound,
}

impl<'a> Resolution<'a> {
    pub fn value(&self) -> Option<&'a FieldValue> {
        match self {
            Self::Found { value, .. } => Some(*value),
            Self::NotFound => None,
        }
    }

    pub fn key(&self) -> Option<&'a str> {
        match self {
            Self::Found { key, .. } => Some(*key),
            Self::NotFound => None,
        }
    }
}

/// Find the booking key holding `canonical_name`.
///
/// Candidates are the canonical name followed by its aliases in priority order.
/// Every candidate is first tried as an exact key; only if none hits are the
/// candidates retried case-insensitively against the record's (sorted) keys.
/// Null, empty and whitespace-only values never count as a hit.
pub fn resolve<'a>(
    canonical_name: &str,
    record: &'a BookingRecord,
    aliases: &AliasTable,
) -> Resolution<'a> {
    let candidates = || {
        std::iter::once(canonical_name)
            .chain(aliases.aliases_for(canonical_name).iter().map(String::as_str))
    };

    for candidate in candidates() {
        if let Some((key, Some(value))) = record.entry(candidate).map(|(k, v)| (k, present(v))) {
            return Resolution::Found { key, value };
        }
    }

    for candidate in candidates() {
        let wanted = candidate.to_lowercase();
        for (key, value) in record.entries() {
            if key.to_lowercase() != wanted {
                continue;
            }
            if let Some(value) = present(value) {
                return Resolution::Found { key, value };
            }
        }
    }

    Resolution::NotFound
}

fn present(value: Option<&FieldValue>) -> Option<&FieldValue> {
    value.filter(|v| !v.is_blank())
}
