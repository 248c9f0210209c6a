//! Information records: structured remittance data attached to a bank reference.
//!
//! The payload of an information record is interpreted according to its
//! communication type. Accessors that do not apply to the stored type return
//! [`CodaError::NotApplicable`], which callers can tell apart from a payload
//! that fails to decode.

use crate::decode;
use crate::error::{CodaError, Result};
use crate::record::{columns, columns_from};
use crate::transaction::{self, TransactionCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq)]
pub struct Information {
    pub sequence: Option<String>,
    pub detail_sequence: Option<String>,
    pub bank_reference: Option<String>,
    pub transaction_code: Option<String>,
    pub raw_communication: Option<String>,
}

/// Free-text record; one line per entity.
#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq)]
pub struct FreeCommunication {
    pub sequence: Option<String>,
    pub detail_sequence: Option<String>,
    pub text: Option<String>,
}

impl Information {
    fn raw(&self) -> &str {
        self.raw_communication.as_deref().unwrap_or("")
    }

    pub fn communication_type(&self) -> Option<&str> {
        transaction::communication_type(self.raw())
    }

    /// Everything after the type header of a structured payload.
    ///
    /// Types without a dedicated accessor (`010`, `011`, `100`) are only
    /// available this way.
    pub fn payload(&self) -> Option<&str> {
        self.communication_type()?;
        Some(columns_from(self.raw(), 4))
    }

    /// Returns the raw payload if its type is one of `types`.
    fn gated(&self, attribute: &'static str, types: &[&str]) -> Result<&str> {
        match self.communication_type() {
            Some(code) if types.contains(&code) => Ok(self.raw()),
            other => Err(CodaError::NotApplicable {
                attribute,
                communication_type: other.map(str::to_string),
            }),
        }
    }

    pub fn name(&self) -> Result<&str> {
        let raw = self.gated("name", &["001", "008", "009"])?;
        Ok(columns(raw, 4..74).trim_end())
    }

    pub fn street(&self) -> Result<&str> {
        let raw = self.gated("street", &["001"])?;
        Ok(columns(raw, 74..109).trim_end())
    }

    pub fn locality(&self) -> Result<&str> {
        let raw = self.gated("locality", &["001"])?;
        Ok(columns(raw, 109..144).trim_end())
    }

    pub fn code_id(&self) -> Result<&str> {
        let raw = self.gated("code_id", &["001", "008", "009"])?;
        let range = if self.communication_type() == Some("001") {
            144..179
        } else {
            74..109
        };
        Ok(columns(raw, range).trim_end())
    }

    pub fn communication(&self) -> Result<&str> {
        let raw = self.gated("communication", &["002"])?;
        Ok(columns_from(raw, 4))
    }

    pub fn counterparty_banker(&self) -> Result<&str> {
        let raw = self.gated("counterparty_banker", &["004"])?;
        Ok(columns_from(raw, 4).trim_end())
    }

    pub fn correspondent_data(&self) -> Result<&str> {
        let raw = self.gated("correspondent_data", &["005"])?;
        Ok(columns_from(raw, 4))
    }

    pub fn description(&self) -> Result<&str> {
        let raw = self.gated("description", &["006"])?;
        Ok(columns(raw, 4..34))
    }

    pub fn currency(&self) -> Result<&str> {
        let raw = self.gated("currency", &["006"])?;
        Ok(columns(raw, 34..37))
    }

    /// Signed amount; the sign flag sits after the digits, at column 53.
    pub fn amount(&self) -> Result<Decimal> {
        let raw = self.gated("amount", &["006"])?;
        let sign = columns(raw, 53..54);
        if sign.is_empty() {
            return Err(CodaError::format("amount", raw));
        }
        decode::amount("amount", &format!("{}{}", sign, columns(raw, 37..52)))
    }

    pub fn category(&self) -> Result<&str> {
        let raw = self.gated("category", &["006"])?;
        Ok(columns(raw, 53..56))
    }

    pub fn coin_number(&self) -> Result<u32> {
        let raw = self.gated("coin_number", &["007"])?;
        decode::integer("coin_number", columns(raw, 4..11))
    }

    pub fn coin(&self) -> Result<Decimal> {
        let raw = self.gated("coin", &["007"])?;
        decode::thousandths("coin", columns(raw, 11..17))
    }

    pub fn total_amount(&self) -> Result<Decimal> {
        let raw = self.gated("total_amount", &["007"])?;
        decode::thousandths("total_amount", columns(raw, 17..32))
    }
}

impl TransactionCode for Information {
    fn transaction_code(&self) -> Option<&str> {
        self.transaction_code.as_deref()
    }
}

impl fmt::Display for Information {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.sequence.as_deref().unwrap_or(""),
            self.detail_sequence.as_deref().unwrap_or("")
        )
    }
}
