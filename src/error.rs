// src/error.rs
use std::fmt;
use uuid::Uuid;

#[derive(Debug)]
pub enum Error {
    Validation(String),
    NotFound(String),
    AlreadySettled(Uuid),
    IneligibleWinner(Uuid),
    BidTooHigh { bid: i64, floor: i64 },
    InvalidAmount,
    Storage(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "Validation failed: {}", msg),
            Self::NotFound(what) => write!(f, "Not found: {}", what),
            Self::AlreadySettled(hand) => {
                write!(f, "Hand {} has already been settled", hand)
            }
            Self::IneligibleWinner(person) => {
                write!(f, "Person {} has already won a hand in this pool", person)
            }
            Self::BidTooHigh { bid, floor } => write!(
                f,
                "Bid {} must not exceed the projected payout {} required by the minimum interest",
                bid, floor
            ),
            Self::InvalidAmount => write!(f, "Invalid amount"),
            Self::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
