//! Datatype classification lattice (§4.3).
//!
//! Classification only ever narrows: starting from the permitted set, a word removes every type
//! it fails to satisfy. Emission precedence is ipaddress > base64 > hex > datetime > integer >
//! float > string.

use std::collections::BTreeSet;
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataType {
    String,
    Integer,
    Float,
    IpAddress,
    DateTime,
    Base64,
    Hex,
}

impl DataType {
    /// Emission precedence, highest first.
    pub const PRECEDENCE: [DataType; 7] = [
        DataType::IpAddress,
        DataType::Base64,
        DataType::Hex,
        DataType::DateTime,
        DataType::Integer,
        DataType::Float,
        DataType::String,
    ];

    /// The types a fresh node may hold before any word has been observed (§3: initial set).
    pub fn initial_set() -> BTreeSet<DataType> {
        [DataType::String, DataType::Integer, DataType::Float, DataType::IpAddress]
            .into_iter()
            .collect()
    }

    pub fn full_set() -> BTreeSet<DataType> {
        DataType::PRECEDENCE.into_iter().collect()
    }

    fn matches(self, word: &[u8]) -> bool {
        match self {
            DataType::String => true,
            DataType::Integer => is_integer(word),
            DataType::Float => is_float(word),
            DataType::IpAddress => is_ipaddress(word),
            DataType::DateTime => is_datetime(word),
            DataType::Base64 => is_base64(word),
            DataType::Hex => is_hex(word),
        }
    }
}

/// Narrows `candidates` in place by removing any type that `word` does not satisfy.
pub fn narrow(candidates: &mut BTreeSet<DataType>, word: &[u8]) {
    candidates.retain(|dt| dt.matches(word));
}

/// Pick the most specific type present in `candidates`, per emission precedence.
pub fn dominant(candidates: &BTreeSet<DataType>) -> DataType {
    DataType::PRECEDENCE
        .into_iter()
        .find(|dt| candidates.contains(dt))
        .unwrap_or(DataType::String)
}

fn is_integer(word: &[u8]) -> bool {
    let s = match std::str::from_utf8(word) {
        Ok(s) => s,
        Err(_) => return false,
    };
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())
}

fn is_float(word: &[u8]) -> bool {
    let s = match std::str::from_utf8(word) {
        Ok(s) => s,
        Err(_) => return false,
    };
    if s.parse::<f64>().is_err() {
        return false;
    }
    if !s.ends_with(|c: char| c.is_ascii_digit()) {
        return false;
    }
    let without_dot = s.replacen('.', "", 1);
    let body = without_dot.strip_prefix(['+', '-']).unwrap_or(&without_dot);
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())
}

fn is_hex(word: &[u8]) -> bool {
    if word.is_empty() {
        return false;
    }
    let s = match std::str::from_utf8(word) {
        Ok(s) => s,
        Err(_) => return false,
    };
    if s.len() % 2 == 0 {
        if hex::decode(s).is_ok() {
            return true;
        }
    }
    i128::from_str_radix(s.trim_start_matches(['+', '-']), 16).is_ok()
}

fn is_datetime(word: &[u8]) -> bool {
    let s = match std::str::from_utf8(word) {
        Ok(s) => s,
        Err(_) => return false,
    };
    if !s.contains(':') {
        return false;
    }
    chrono::DateTime::parse_from_rfc3339(s).is_ok()
        || chrono::DateTime::parse_from_rfc2822(s).is_ok()
        || chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
        || chrono::NaiveTime::parse_from_str(s, "%H:%M:%S").is_ok()
}

fn is_base64(word: &[u8]) -> bool {
    !word.is_empty() && base64::decode(word).is_ok()
}

fn is_ipaddress(word: &[u8]) -> bool {
    std::str::from_utf8(word)
        .ok()
        .and_then(|s| s.parse::<IpAddr>().ok())
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_integers() {
        let mut set = DataType::full_set();
        for w in ["0", "-5", "42"] {
            narrow(&mut set, w.as_bytes());
        }
        assert!(set.contains(&DataType::Integer));
        assert!(!set.contains(&DataType::IpAddress));
    }

    #[test]
    fn classifies_ipv4() {
        let mut set = DataType::full_set();
        narrow(&mut set, b"192.168.0.1");
        assert!(set.contains(&DataType::IpAddress));
        assert!(!set.contains(&DataType::Integer));
    }

    #[test]
    fn narrowing_never_adds_types() {
        let mut set: BTreeSet<DataType> = [DataType::Integer].into_iter().collect();
        narrow(&mut set, b"not-an-integer");
        assert!(set.is_empty());
    }

    #[test]
    fn precedence_prefers_ipaddress_over_integer() {
        let set: BTreeSet<DataType> = [DataType::IpAddress, DataType::Integer].into_iter().collect();
        assert_eq!(dominant(&set), DataType::IpAddress);
    }
}
