use crate::error::{CodaError, Result};
use crate::information::{FreeCommunication, Information};
use crate::record::columns;
use crate::transaction::Move;
use crate::tree::{PreOrder, Tree};
use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// One account statement, from its header record to its trailer.
#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq)]
pub struct Statement {
    pub creation_date: Option<NaiveDate>,
    pub bank_id: Option<u32>,
    pub duplicate: Option<bool>,
    pub file_reference: Option<String>,
    pub address: Option<String>,
    pub bic: Option<String>,
    pub company_id: Option<String>,
    pub reference: Option<String>,
    pub related_reference: Option<String>,
    pub version: Option<u32>,

    pub account_structure: Option<String>,
    pub old_sequence: Option<String>,
    /// Account number, currency and country as one block, laid out by `account_structure`.
    pub raw_account: Option<String>,
    pub opening_balance: Option<Decimal>,
    pub opening_balance_date: Option<NaiveDate>,
    pub account_holder_name: Option<String>,
    pub account_description: Option<String>,
    pub coda_sequence: Option<String>,

    pub new_sequence: Option<String>,
    pub closing_balance: Option<Decimal>,
    pub closing_balance_date: Option<NaiveDate>,

    pub number_records: Option<u32>,
    pub total_debit: Option<Decimal>,
    pub total_credit: Option<Decimal>,

    pub moves: Tree<Move>,
    /// Keyed by bank reference, in the order each reference first appears.
    pub informations: IndexMap<String, Vec<Information>>,
    pub free_communications: Vec<FreeCommunication>,
}

/// Running sums kept while a statement is being read.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Totals {
    pub credit: Decimal,
    pub debit: Decimal,
    /// Physical records seen so far, the header included.
    pub records: u32,
}

impl Totals {
    pub fn add(&mut self, amount: Decimal) {
        if amount > Decimal::new(0, 3) {
            self.credit += amount;
        } else {
            self.debit -= amount;
        }
    }
}

impl Statement {
    pub fn find_move(&self, sequence: &str, detail_sequence: &str) -> Option<&Move> {
        self.moves.find(sequence, detail_sequence)
    }

    /// Every move, detail and sub-detail in file order.
    pub fn all_moves(&self) -> PreOrder<'_, Move> {
        self.moves.flatten()
    }

    /// Every information, grouped by bank reference in order of first appearance.
    pub fn all_informations(&self) -> impl Iterator<Item = &Information> {
        self.informations.values().flatten()
    }

    pub fn find_information(&self, sequence: &str, detail_sequence: &str) -> Option<&Information> {
        self.all_informations().find(|i| {
            i.sequence.as_deref() == Some(sequence)
                && i.detail_sequence.as_deref() == Some(detail_sequence)
        })
    }

    pub fn account(&self) -> Option<&str> {
        let range = match self.account_structure.as_deref()? {
            "0" => 0..12,
            "1" | "3" => 0..34,
            "2" => 0..31,
            _ => return None,
        };
        self.account_slice(range).map(str::trim_end)
    }

    pub fn account_currency(&self) -> Option<&str> {
        let range = match self.account_structure.as_deref()? {
            "0" => 13..16,
            "1" | "2" | "3" => 34..37,
            _ => return None,
        };
        self.account_slice(range)
    }

    /// Only Belgian account structures carry a country code.
    pub fn account_country(&self) -> Option<&str> {
        match self.account_structure.as_deref()? {
            "0" => self.account_slice(17..19),
            _ => None,
        }
    }

    fn account_slice(&self, range: Range<usize>) -> Option<&str> {
        self.raw_account.as_deref().map(|raw| columns(raw, range))
    }

    // Validates the accumulated totals against the trailer
    pub fn validate(&self, totals: &Totals) -> Result<()> {
        let total_credit = required(self.total_credit, "total credit")?;
        let total_debit = required(self.total_debit, "total debit")?;
        let declared_records = required(self.number_records, "number of records")?;
        let opening = required(self.opening_balance, "opening balance")?;
        let closing = required(self.closing_balance, "closing balance")?;

        if totals.credit != total_credit {
            return Err(CodaError::CreditMismatch {
                declared: total_credit,
                computed: totals.credit,
            });
        }
        if totals.debit != total_debit {
            return Err(CodaError::DebitMismatch {
                declared: total_debit,
                computed: totals.debit,
            });
        }
        if closing - opening != total_credit - total_debit {
            return Err(CodaError::BalanceMismatch {
                opening,
                closing,
                total_credit,
                total_debit,
            });
        }
        let counted = totals.records.saturating_sub(1);
        if declared_records != counted {
            return Err(CodaError::RecordCountMismatch {
                declared: declared_records,
                counted,
            });
        }
        Ok(())
    }
}

fn required<T: Copy>(value: Option<T>, what: &str) -> Result<T> {
    value.ok_or_else(|| CodaError::Structural(format!("statement has no {}", what)))
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let old = self.old_sequence.as_deref().unwrap_or("");
        match self.new_sequence.as_deref() {
            Some(new) if new != old => write!(f, "{} - {}", old, new),
            _ => f.write_str(old),
        }
    }
}
