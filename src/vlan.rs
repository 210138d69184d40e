//! VLAN range codec.
//!
//! VLAN membership travels in compressed range notation (`"10-20"`,
//! `"10..20"`, `"30"`) but is compared as an explicit set of IDs. [`VlanSet`]
//! is the canonical in-memory form: decoding expands ranges, encoding emits
//! the unique minimal sorted list of contiguous runs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

use crate::error::ConfigError;

/// URL-encoded comma joining VLAN tokens inside a request path.
const PATH_SEPARATOR: &str = "%2C";

/// Lowest usable VLAN ID.
pub const MIN_VLAN_ID: u16 = 1;

/// Highest usable VLAN ID.
pub const MAX_VLAN_ID: u16 = 4094;

/// A set of VLAN IDs in canonical (expanded, sorted) form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VlanSet(BTreeSet<u16>);

/// One member of a VLAN list inside a request payload.
///
/// Singletons travel as integers and runs as `"lo..hi"` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VlanMember {
    /// A single VLAN ID.
    Id(u16),
    /// An inclusive run in `lo..hi` notation.
    Range(String),
}

/// Raw token as it may appear in a snapshot document.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawToken {
    Id(u64),
    Text(String),
}

impl RawToken {
    fn into_text(self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Text(text) => text,
        }
    }
}

impl VlanSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Decodes range tokens (`"N"`, `"N-M"`, `"N..M"`) into an explicit set.
    ///
    /// # Errors
    ///
    /// Returns a parse error if a token is malformed or its upper bound is
    /// below its lower bound.
    pub fn decode<S: AsRef<str>>(tokens: &[S]) -> Result<Self, ConfigError> {
        let mut ids = BTreeSet::new();
        for token in tokens {
            ids.extend(decode_token(token.as_ref())?);
        }
        Ok(Self(ids))
    }

    /// Groups the set into maximal runs of consecutive IDs.
    #[must_use]
    pub fn runs(&self) -> Vec<(u16, u16)> {
        let mut runs: Vec<(u16, u16)> = Vec::new();
        for &id in &self.0 {
            match runs.last_mut() {
                Some((_, hi)) if u32::from(*hi) + 1 == u32::from(id) => *hi = id,
                _ => runs.push((id, id)),
            }
        }
        runs
    }

    /// Encodes the set in minimal range notation (`"lo-hi"` or `"lo"`).
    #[must_use]
    pub fn encode(&self) -> Vec<String> {
        self.runs()
            .into_iter()
            .map(|(lo, hi)| {
                if lo == hi {
                    lo.to_string()
                } else {
                    format!("{lo}-{hi}")
                }
            })
            .collect()
    }

    /// Encodes the set as payload members.
    #[must_use]
    pub fn wire_members(&self) -> Vec<VlanMember> {
        self.runs()
            .into_iter()
            .map(|(lo, hi)| {
                if lo == hi {
                    VlanMember::Id(lo)
                } else {
                    VlanMember::Range(format!("{lo}..{hi}"))
                }
            })
            .collect()
    }

    /// Encodes the set for use as a list key inside a request path.
    ///
    /// `-` collides with path syntax, so runs use `..` and tokens are joined
    /// with a URL-encoded comma.
    #[must_use]
    pub fn path_key(&self) -> String {
        self.runs()
            .into_iter()
            .map(|(lo, hi)| {
                if lo == hi {
                    lo.to_string()
                } else {
                    format!("{lo}..{hi}")
                }
            })
            .collect::<Vec<_>>()
            .join(PATH_SEPARATOR)
    }

    /// IDs in `self` but not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0.difference(&other.0).copied().collect())
    }

    /// IDs present in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        Self(self.0.intersection(&other.0).copied().collect())
    }

    /// IDs present in either set.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).copied().collect())
    }

    /// Returns true if the set holds no IDs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of IDs in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if `id` is a member.
    #[must_use]
    pub fn contains(&self, id: u16) -> bool {
        self.0.contains(&id)
    }

    /// Iterates the IDs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }
}

fn decode_token(token: &str) -> Result<RangeInclusive<u16>, ConfigError> {
    let trimmed = token.trim();
    let (lo, hi) = match trimmed.split_once("..").or_else(|| trimmed.split_once('-')) {
        Some((lo, hi)) => (parse_id(lo, token)?, parse_id(hi, token)?),
        None => {
            let id = parse_id(trimmed, token)?;
            (id, id)
        }
    };

    if hi < lo {
        return Err(ConfigError::parse(format!(
            "Invalid VLAN range '{token}': end is lower than start"
        )));
    }

    Ok(lo..=hi)
}

fn parse_id(part: &str, token: &str) -> Result<u16, ConfigError> {
    part.trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::parse(format!("Invalid VLAN range token '{token}'")))
}

/// Decodes range tokens into an explicit set.
///
/// # Errors
///
/// Returns a parse error on malformed tokens.
pub fn decode<S: AsRef<str>>(tokens: &[S]) -> Result<VlanSet, ConfigError> {
    VlanSet::decode(tokens)
}

/// Encodes an explicit set of IDs in minimal range notation.
#[must_use]
pub fn encode(ids: &VlanSet) -> Vec<String> {
    ids.encode()
}

/// Ranges present in `a` but not in `b` ("VLANs to add").
///
/// # Errors
///
/// Returns a parse error on malformed tokens.
pub fn difference<S: AsRef<str>>(a: &[S], b: &[S]) -> Result<Vec<String>, ConfigError> {
    Ok(VlanSet::decode(a)?.difference(&VlanSet::decode(b)?).encode())
}

/// Ranges present in both `a` and `b` ("VLANs already present").
///
/// # Errors
///
/// Returns a parse error on malformed tokens.
pub fn intersection<S: AsRef<str>>(a: &[S], b: &[S]) -> Result<Vec<String>, ConfigError> {
    Ok(VlanSet::decode(a)?.intersection(&VlanSet::decode(b)?).encode())
}

impl FromIterator<u16> for VlanSet {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for VlanSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode().join(","))
    }
}

impl Serialize for VlanSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.encode())
    }
}

impl<'de> Deserialize<'de> for VlanSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tokens: Vec<String> = Option::<Vec<RawToken>>::deserialize(deserializer)?
            .unwrap_or_default()
            .into_iter()
            .map(RawToken::into_text)
            .collect();
        Self::decode(&tokens).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_all_notations() {
        let set = VlanSet::decode(&["10-12", "20..21", "30", " 40 "]).unwrap();
        let ids: Vec<u16> = set.iter().collect();
        assert_eq!(ids, vec![10, 11, 12, 20, 21, 30, 40]);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(VlanSet::decode(&["abc"]).is_err());
        assert!(VlanSet::decode(&["10-"]).is_err());
        assert!(VlanSet::decode(&["-5"]).is_err());
        assert!(VlanSet::decode(&["20-10"]).is_err());
        assert!(VlanSet::decode(&["1..x"]).is_err());
    }

    #[test]
    fn test_encode_minimal_runs() {
        let set: VlanSet = [5, 1, 2, 3, 7, 8].into_iter().collect();
        assert_eq!(set.encode(), vec!["1-3", "5", "7-8"]);
    }

    #[test]
    fn test_round_trip_and_idempotence() {
        // every subset of a 10-bit window
        for mask in 0u32..1024 {
            let set: VlanSet = (0..10u16)
                .filter(|bit| mask & (1 << bit) != 0)
                .map(|bit| bit + 100)
                .collect();
            let encoded = set.encode();
            let decoded = VlanSet::decode(&encoded).unwrap();
            assert_eq!(decoded, set);
            assert_eq!(decoded.encode(), encoded);
        }
    }

    #[test]
    fn test_difference_and_intersection() {
        let have = ["10-12", "20"];
        let want = ["11", "20", "30"];
        assert_eq!(difference(&want, &have).unwrap(), vec!["30"]);
        assert_eq!(intersection(&want, &have).unwrap(), vec!["11", "20"]);
    }

    #[test]
    fn test_wire_and_path_forms() {
        let set = VlanSet::decode(&["11", "20-25"]).unwrap();
        assert_eq!(
            set.wire_members(),
            vec![VlanMember::Id(11), VlanMember::Range(String::from("20..25"))]
        );
        assert_eq!(set.path_key(), "11%2C20..25");
    }

    #[test]
    fn test_deserialize_mixed_tokens() {
        let set: VlanSet = serde_json::from_str(r#"[5, "7-9", "12..13"]"#).unwrap();
        assert_eq!(set.encode(), vec!["5", "7-9", "12-13"]);

        let empty: VlanSet = serde_json::from_str("null").unwrap();
        assert!(empty.is_empty());

        let bad: std::result::Result<VlanSet, _> = serde_json::from_str(r#"["9-3"]"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_serialize_compressed() {
        let set: VlanSet = [1, 2, 3, 10].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["1-3","10"]"#);
    }
}
