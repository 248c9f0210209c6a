use crate::record::{columns, columns_from};
use crate::tree::{Node, Tree};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Communication types whose payload has no textual rendering.
const WITHOUT_TEXT: &[&str] = &[
    "106", "108", "111", "113", "114", "115", "121", "122", "123", "124", "125", "126",
];

/// Decomposes the 8-character transaction code shared by moves and informations.
pub trait TransactionCode {
    fn transaction_code(&self) -> Option<&str>;

    fn transaction_type(&self) -> Option<&str> {
        self.transaction_code().and_then(|c| c.get(0..1))
    }

    fn transaction_family(&self) -> Option<&str> {
        self.transaction_code().and_then(|c| c.get(1..3))
    }

    fn transaction_transaction(&self) -> Option<&str> {
        self.transaction_code().and_then(|c| c.get(3..5))
    }

    fn transaction_category(&self) -> Option<&str> {
        self.transaction_code().and_then(|c| c.get(5..8))
    }
}

/// The structured type tag of a communication payload, if it carries one.
pub(crate) fn communication_type(raw: &str) -> Option<&str> {
    if raw.starts_with('1') {
        Some(columns(raw, 1..4))
    } else {
        None
    }
}

/// A movement record and its details.
#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq)]
pub struct Move {
    pub sequence: Option<String>,
    pub detail_sequence: Option<String>,
    pub bank_reference: Option<String>,
    pub amount: Option<Decimal>,
    pub value_date: Option<NaiveDate>,
    pub transaction_code: Option<String>,
    pub raw_communication: Option<String>,
    pub entry_date: Option<NaiveDate>,
    pub statement_number: Option<String>,
    pub customer_reference: Option<String>,
    pub counterparty_bic: Option<String>,
    pub r_transaction: Option<String>,
    pub r_reason: Option<String>,
    pub category_purpose: Option<String>,
    pub purpose: Option<String>,
    pub counterparty_account: Option<String>,
    pub counterparty_name: Option<String>,
    pub moves: Tree<Move>,
}

impl Move {
    pub fn communication_type(&self) -> Option<&str> {
        communication_type(self.raw_communication.as_deref()?)
    }

    /// The readable part of the communication.
    ///
    /// Returns `None` for communication types that have no textual
    /// representation, which is not the same as an empty communication.
    pub fn communication(&self) -> Option<&str> {
        let raw = self.raw_communication.as_deref().unwrap_or("");
        match self.communication_type() {
            None => Some(columns_from(raw, 1).trim_end()),
            // ISO 11649 creditor reference, passed through undecoded
            Some("100") => Some(columns_from(raw, 4)),
            Some("101") | Some("102") | Some("103") => Some(columns(raw, 4..16).trim_end()),
            Some("105") => Some(columns(raw, 49..61).trim_end()),
            Some("127") => Some(columns(raw, 83..145)),
            Some(code) if WITHOUT_TEXT.contains(&code) => None,
            Some(_) => Some(columns_from(raw, 1).trim_end()),
        }
    }

    pub fn find_move(&self, sequence: &str, detail_sequence: &str) -> Option<&Move> {
        self.moves.find(sequence, detail_sequence)
    }
}

impl TransactionCode for Move {
    fn transaction_code(&self) -> Option<&str> {
        self.transaction_code.as_deref()
    }
}

impl Node for Move {
    fn sequence(&self) -> &str {
        self.sequence.as_deref().unwrap_or("")
    }

    fn detail_sequence(&self) -> &str {
        self.detail_sequence.as_deref().unwrap_or("")
    }

    fn children(&self) -> &Tree<Move> {
        &self.moves
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Node::sequence(self), Node::detail_sequence(self))
    }
}
