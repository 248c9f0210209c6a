//! Column layouts of every record kind.
//!
//! Each entry names a field, its half-open character range on the physical
//! line, the decoder applied to that range and the entity slot it fills.
//! Records are merged into entities with one of two policies: [`check_all`]
//! for fields that must agree wherever they are repeated, and [`extend_all`]
//! for article fields, where text split over several records is joined.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::ops::Range;

use crate::decode;
use crate::error::{CodaError, Result};
use crate::information::{FreeCommunication, Information};
use crate::record::Record;
use crate::statement::Statement;
use crate::transaction::Move;

pub(crate) enum Field<E> {
    Date(&'static str, Range<usize>, fn(&mut E) -> &mut Option<NaiveDate>),
    Amount(&'static str, Range<usize>, fn(&mut E) -> &mut Option<Decimal>),
    Integer(&'static str, Range<usize>, fn(&mut E) -> &mut Option<u32>),
    /// True when the column holds the given character.
    Flag(&'static str, Range<usize>, char, fn(&mut E) -> &mut Option<bool>),
    /// Right-trimmed text.
    Text(&'static str, Range<usize>, fn(&mut E) -> &mut Option<String>),
    /// Text kept exactly as it appears on the line.
    Raw(&'static str, Range<usize>, fn(&mut E) -> &mut Option<String>),
}

impl<E> Field<E> {
    #[cfg(test)]
    pub fn name(&self) -> &'static str {
        match *self {
            Field::Date(name, ..)
            | Field::Amount(name, ..)
            | Field::Integer(name, ..)
            | Field::Flag(name, ..)
            | Field::Text(name, ..)
            | Field::Raw(name, ..) => name,
        }
    }

    /// Stores the decoded value, or checks it against a value stored earlier.
    pub fn check(&self, entity: &mut E, record: &Record<'_>) -> Result<()> {
        match *self {
            Field::Date(name, ref range, slot) => {
                let value = decode::date(name, record.slice(range.clone()))?;
                checked(name, slot(entity), value)
            }
            Field::Amount(name, ref range, slot) => {
                let value = decode::amount(name, record.slice(range.clone()))?;
                checked(name, slot(entity), value)
            }
            Field::Integer(name, ref range, slot) => {
                let value = decode::integer(name, record.slice(range.clone()))?;
                checked(name, slot(entity), value)
            }
            Field::Flag(name, ref range, set, slot) => {
                let value = record.slice(range.clone()).starts_with(set);
                checked(name, slot(entity), value)
            }
            Field::Text(name, ref range, slot) => {
                let value = decode::text(record.slice(range.clone()));
                checked(name, slot(entity), value)
            }
            Field::Raw(name, ref range, slot) => {
                let value = record.slice(range.clone()).to_string();
                checked(name, slot(entity), value)
            }
        }
    }

    /// Stores the decoded value, appending text to what earlier records left.
    pub fn extend(&self, entity: &mut E, record: &Record<'_>) -> Result<()> {
        match *self {
            Field::Date(name, ref range, slot) => {
                *slot(entity) = Some(decode::date(name, record.slice(range.clone()))?);
            }
            Field::Amount(name, ref range, slot) => {
                *slot(entity) = Some(decode::amount(name, record.slice(range.clone()))?);
            }
            Field::Integer(name, ref range, slot) => {
                *slot(entity) = Some(decode::integer(name, record.slice(range.clone()))?);
            }
            Field::Flag(_, ref range, set, slot) => {
                *slot(entity) = Some(record.slice(range.clone()).starts_with(set));
            }
            Field::Text(_, ref range, slot) => {
                appended(slot(entity), &decode::text(record.slice(range.clone())));
            }
            Field::Raw(_, ref range, slot) => {
                appended(slot(entity), record.slice(range.clone()));
            }
        }
        Ok(())
    }
}

fn checked<T: PartialEq + Display>(field: &'static str, slot: &mut Option<T>, value: T) -> Result<()> {
    match slot {
        Some(stored) if *stored != value => Err(CodaError::Inconsistent {
            field,
            stored: stored.to_string(),
            found: value.to_string(),
        }),
        Some(_) => Ok(()),
        None => {
            *slot = Some(value);
            Ok(())
        }
    }
}

fn appended(slot: &mut Option<String>, value: &str) {
    match slot {
        Some(text) if !text.is_empty() => text.push_str(value),
        _ => *slot = Some(value.to_string()),
    }
}

pub(crate) fn check_all<E>(fields: &[Field<E>], entity: &mut E, record: &Record<'_>) -> Result<()> {
    for field in fields {
        field.check(entity, record)?;
    }
    Ok(())
}

pub(crate) fn extend_all<E>(fields: &[Field<E>], entity: &mut E, record: &Record<'_>) -> Result<()> {
    for field in fields {
        field.extend(entity, record)?;
    }
    Ok(())
}

pub(crate) static HEADER: &[Field<Statement>] = &[
    Field::Integer("version", 127..128, |s| &mut s.version),
    Field::Date("creation_date", 5..11, |s| &mut s.creation_date),
    Field::Integer("bank_id", 11..14, |s| &mut s.bank_id),
    Field::Flag("duplicate", 16..17, 'D', |s| &mut s.duplicate),
    Field::Text("file_reference", 24..34, |s| &mut s.file_reference),
    Field::Text("address", 34..60, |s| &mut s.address),
    Field::Text("bic", 60..71, |s| &mut s.bic),
    Field::Raw("company_id", 71..82, |s| &mut s.company_id),
    Field::Text("reference", 88..104, |s| &mut s.reference),
    Field::Text("related_reference", 105..120, |s| &mut s.related_reference),
];

pub(crate) static TRAILER: &[Field<Statement>] = &[
    Field::Integer("number_records", 16..22, |s| &mut s.number_records),
    Field::Amount("total_debit", 22..37, |s| &mut s.total_debit),
    Field::Amount("total_credit", 37..52, |s| &mut s.total_credit),
];

pub(crate) static OPENING_BALANCE: &[Field<Statement>] = &[
    Field::Raw("account_structure", 1..2, |s| &mut s.account_structure),
    Field::Raw("old_sequence", 2..5, |s| &mut s.old_sequence),
    Field::Raw("raw_account", 5..42, |s| &mut s.raw_account),
    Field::Amount("opening_balance", 43..58, |s| &mut s.opening_balance),
    Field::Date("opening_balance_date", 58..64, |s| &mut s.opening_balance_date),
    Field::Text("account_holder_name", 64..90, |s| &mut s.account_holder_name),
    Field::Text("account_description", 90..125, |s| &mut s.account_description),
    Field::Raw("coda_sequence", 125..128, |s| &mut s.coda_sequence),
];

pub(crate) static CLOSING_BALANCE: &[Field<Statement>] = &[
    Field::Raw("new_sequence", 1..4, |s| &mut s.new_sequence),
    Field::Raw("raw_account", 4..41, |s| &mut s.raw_account),
    Field::Amount("closing_balance", 41..57, |s| &mut s.closing_balance),
    Field::Date("closing_balance_date", 57..63, |s| &mut s.closing_balance_date),
];

pub(crate) static MOVE_COMMON: &[Field<Move>] = &[
    Field::Raw("sequence", 2..6, |m| &mut m.sequence),
    Field::Raw("detail_sequence", 6..10, |m| &mut m.detail_sequence),
];

static MOVE_ARTICLE_1: &[Field<Move>] = &[
    Field::Raw("bank_reference", 10..31, |m| &mut m.bank_reference),
    Field::Amount("amount", 31..47, |m| &mut m.amount),
    Field::Date("value_date", 47..53, |m| &mut m.value_date),
    Field::Raw("transaction_code", 53..61, |m| &mut m.transaction_code),
    Field::Raw("communication", 61..115, |m| &mut m.raw_communication),
    Field::Date("entry_date", 115..121, |m| &mut m.entry_date),
    Field::Raw("statement_number", 121..124, |m| &mut m.statement_number),
];

static MOVE_ARTICLE_2: &[Field<Move>] = &[
    Field::Raw("communication", 10..63, |m| &mut m.raw_communication),
    Field::Text("customer_reference", 63..98, |m| &mut m.customer_reference),
    Field::Text("counterparty_bic", 98..109, |m| &mut m.counterparty_bic),
    Field::Text("r_transaction", 112..113, |m| &mut m.r_transaction),
    Field::Text("r_reason", 113..117, |m| &mut m.r_reason),
    Field::Text("category_purpose", 117..121, |m| &mut m.category_purpose),
    Field::Text("purpose", 121..125, |m| &mut m.purpose),
];

static MOVE_ARTICLE_3: &[Field<Move>] = &[
    Field::Text("counterparty_account", 10..47, |m| &mut m.counterparty_account),
    Field::Text("counterparty_name", 47..82, |m| &mut m.counterparty_name),
    Field::Raw("communication", 82..125, |m| &mut m.raw_communication),
];

pub(crate) static INFORMATION_COMMON: &[Field<Information>] = &[
    Field::Raw("sequence", 2..6, |i| &mut i.sequence),
    Field::Raw("detail_sequence", 6..10, |i| &mut i.detail_sequence),
];

static INFORMATION_ARTICLE_1: &[Field<Information>] = &[
    Field::Raw("bank_reference", 10..31, |i| &mut i.bank_reference),
    Field::Raw("transaction_code", 31..39, |i| &mut i.transaction_code),
    Field::Raw("communication", 39..113, |i| &mut i.raw_communication),
];

static INFORMATION_ARTICLE_2: &[Field<Information>] = &[
    Field::Raw("communication", 10..115, |i| &mut i.raw_communication),
];

static INFORMATION_ARTICLE_3: &[Field<Information>] = &[
    Field::Raw("communication", 10..100, |i| &mut i.raw_communication),
];

pub(crate) static FREE_COMMUNICATION: &[Field<FreeCommunication>] = &[
    Field::Raw("sequence", 2..6, |c| &mut c.sequence),
    Field::Raw("detail_sequence", 6..10, |c| &mut c.detail_sequence),
    Field::Text("text", 32..112, |c| &mut c.text),
];

pub(crate) fn move_article(article: char) -> Option<&'static [Field<Move>]> {
    match article {
        '1' => Some(MOVE_ARTICLE_1),
        '2' => Some(MOVE_ARTICLE_2),
        '3' => Some(MOVE_ARTICLE_3),
        _ => None,
    }
}

pub(crate) fn information_article(article: char) -> Option<&'static [Field<Information>]> {
    match article {
        '1' => Some(INFORMATION_ARTICLE_1),
        '2' => Some(INFORMATION_ARTICLE_2),
        '3' => Some(INFORMATION_ARTICLE_3),
        _ => None,
    }
}
