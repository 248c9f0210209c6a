use chrono::NaiveDate;
use rust_decimal::Decimal;

use nom::bytes::complete::take_while_m_n;
use nom::character::complete::digit1;
use nom::combinator::{all_consuming, map_res};
use nom::sequence::tuple;
use nom::IResult;

use crate::error::{CodaError, Result};

fn two_digits(input: &str) -> IResult<&str, u32> {
	map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_digit()), |s: &str| {
		s.parse::<u32>()
	})(input)
}

fn ddmmyy(input: &str) -> IResult<&str, (u32, u32, u32)> {
	all_consuming(tuple((two_digits, two_digits, two_digits)))(input)
}

fn unsigned(input: &str) -> IResult<&str, &str> {
	all_consuming(digit1)(input)
}

/// Parses a `DDMMYY` date. Two-digit years below 69 belong to the 2000s.
pub fn date(field: &'static str, raw: &str) -> Result<NaiveDate> {
	let (_, (day, month, year)) = ddmmyy(raw).map_err(|_| CodaError::format(field, raw))?;
	let year = if year < 69 { 2000 + year } else { 1900 + year };
	NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| CodaError::format(field, raw))
}

/// Parses a sign flag (`1` is negative) followed by an amount in thousandths.
pub fn amount(field: &'static str, raw: &str) -> Result<Decimal> {
	let mut chars = raw.chars();
	let sign = chars.next().ok_or_else(|| CodaError::format(field, raw))?;
	let value = thousandths(field, chars.as_str())?;
	Ok(if sign == '1' { -value } else { value })
}

/// Parses an unsigned amount in thousandths.
pub fn thousandths(field: &'static str, raw: &str) -> Result<Decimal> {
	let (_, digits) = unsigned(raw).map_err(|_| CodaError::format(field, raw))?;
	let value: i64 = digits
		.parse()
		.map_err(|_| CodaError::format(field, raw))?;
	Ok(Decimal::new(value, 3))
}

pub fn integer(field: &'static str, raw: &str) -> Result<u32> {
	let (_, digits) = unsigned(raw).map_err(|_| CodaError::format(field, raw))?;
	digits.parse().map_err(|_| CodaError::format(field, raw))
}

/// Removes trailing whitespace only.
pub fn text(raw: &str) -> String {
	raw.trim_end().to_string()
}
