// src/utils/id_generator.rs
use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdType {
    Trip,
    CheckIn,
    Transaction,
    Earning,
    Withdrawal,
    Contact,
    SosAlert,
}

impl IdType {
    pub const ALL: [IdType; 7] = [
        IdType::Trip,
        IdType::CheckIn,
        IdType::Transaction,
        IdType::Earning,
        IdType::Withdrawal,
        IdType::Contact,
        IdType::SosAlert,
    ];

    pub fn to_prefix(&self) -> &'static str {
        match self {
            IdType::Trip => "trp",
            IdType::CheckIn => "chk",
            IdType::Transaction => "txn",
            IdType::Earning => "ern",
            IdType::Withdrawal => "wdr",
            IdType::Contact => "ctc",
            IdType::SosAlert => "sos",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.to_prefix() == prefix)
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_prefix())
    }
}

pub struct IdGenerator;

impl IdGenerator {
    /// Generate a unique ID with format: {prefix}-{yymmdd}-{5 alphanumeric chars}
    pub fn generate(id_type: IdType) -> String {
        Self::generate_with_timestamp(id_type, Utc::now())
    }

    /// Generate ID with a specific timestamp (useful for testing)
    pub fn generate_with_timestamp(id_type: IdType, timestamp: DateTime<Utc>) -> String {
        let date_part = timestamp.format("%y%m%d").to_string();
        format!("{}-{}-{}", id_type.to_prefix(), date_part, Self::random_suffix(5))
    }

    fn random_suffix(n: usize) -> String {
        const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::rng();
        (0..n)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect()
    }

    pub fn parse_id(id: &str) -> Option<ParsedId> {
        let mut parts = id.split('-');
        let (prefix, date_part, suffix) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() || date_part.len() != 6 || suffix.len() != 5 {
            return None;
        }
        if !date_part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if !suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }

        let id_type = IdType::from_prefix(prefix)?;
        let year = 2000 + date_part[0..2].parse::<i32>().ok()?;
        let month = date_part[2..4].parse::<u32>().ok()?;
        let day = date_part[4..6].parse::<u32>().ok()?;
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single()?;

        Some(ParsedId {
            id_type,
            year,
            month,
            day,
            random_suffix: suffix.to_string(),
        })
    }

    /// Validate if an ID matches the expected format and type
    pub fn validate_id(id: &str, expected_type: Option<IdType>) -> bool {
        match Self::parse_id(id) {
            Some(parsed) => expected_type.is_none_or(|expected| parsed.id_type == expected),
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedId {
    pub id_type: IdType,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub random_suffix: String,
}

impl ParsedId {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.with_ymd_and_hms(self.year, self.month, self.day, 0, 0, 0).single()
    }
}
