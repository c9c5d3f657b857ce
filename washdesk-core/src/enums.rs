//! Enum types for washdesk records

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Booking lifecycle. Bookings are created by the customer-facing system and
/// only move forward from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn all() -> &'static [BookingStatus] {
        &[
            BookingStatus::Pending,
            BookingStatus::Accepted,
            BookingStatus::Completed,
        ]
    }

    /// Only pending bookings can be accepted.
    pub fn can_accept(&self) -> bool {
        matches!(self, BookingStatus::Pending)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "accepted" => Ok(BookingStatus::Accepted),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(DecodeError::UnknownStatus {
                kind: "booking",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl EnquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnquiryStatus::Pending => "pending",
            EnquiryStatus::Completed => "completed",
            EnquiryStatus::Cancelled => "cancelled",
        }
    }

    pub fn all() -> &'static [EnquiryStatus] {
        &[
            EnquiryStatus::Pending,
            EnquiryStatus::Completed,
            EnquiryStatus::Cancelled,
        ]
    }
}

impl fmt::Display for EnquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnquiryStatus {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(EnquiryStatus::Pending),
            "completed" => Ok(EnquiryStatus::Completed),
            "cancelled" => Ok(EnquiryStatus::Cancelled),
            other => Err(DecodeError::UnknownStatus {
                kind: "enquiry",
                value: other.to_string(),
            }),
        }
    }
}

/// Which side of the organisation a person belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
    #[default]
    Worker,
    Staff,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("Accepted".parse::<BookingStatus>(), Ok(BookingStatus::Accepted));
        assert_eq!(" cancelled ".parse::<EnquiryStatus>(), Ok(EnquiryStatus::Cancelled));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = "archived".parse::<BookingStatus>().unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownStatus {
                kind: "booking",
                value: "archived".to_string()
            }
        );
    }

    #[test]
    fn test_status_display_matches_wire_form() {
        for status in BookingStatus::all() {
            let wire = serde_json::to_string(status).unwrap();
            assert_eq!(wire, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_only_pending_bookings_accept() {
        assert!(BookingStatus::Pending.can_accept());
        assert!(!BookingStatus::Accepted.can_accept());
        assert!(!BookingStatus::Completed.can_accept());
    }
}
