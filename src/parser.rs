use crate::decode;
use crate::error::{CodaError, Result};
use crate::information::{FreeCommunication, Information};
use crate::record::{Record, RecordKind};
use crate::schema::{self, check_all, extend_all};
use crate::statement::{Statement, Totals};
use crate::transaction::{Move, TransactionCode};

use log::{debug, trace, warn};
use std::io::BufRead;

/// The only CODA format version this decoder reads.
pub const SUPPORTED_VERSION: u32 = 2;

/// Where the most recent article-1 move was attached.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Depth {
	Move,
	Detail,
	SubDetail,
}

/// Decoder state threaded through every physical line of one file.
#[derive(Default, Debug)]
pub struct Parser {
	statements: Vec<Statement>,
	statement: Option<Statement>,
	depth: Option<Depth>,
	information: Option<String>,
	totals: Totals,
	line: usize,
}

impl Parser {
	pub fn new() -> Self {
		Parser::default()
	}

	pub fn parse<R: BufRead>(mut self, reader: R) -> Result<Vec<Statement>> {
		for line in reader.lines() {
			self.feed(&line?)?;
		}
		self.finish()
	}

	/// Processes one physical line.
	pub fn feed(&mut self, line: &str) -> Result<()> {
		self.line += 1;
		let record = Record::new(line);
		let kind = match record.kind() {
			Some(kind) => kind,
			None => return Ok(()),
		};
		trace!("line {}: {:?}", self.line, kind);

		let number = self.line;
		self.dispatch(kind, &record).map_err(|e| {
			debug!("line {}: {}", number, e);
			e
		})
	}

	/// Returns the decoded statements once the input is exhausted.
	pub fn finish(self) -> Result<Vec<Statement>> {
		if let Some(statement) = self.statement {
			return Err(CodaError::Structural(format!(
				"statement {} is not closed by a trailer record",
				statement
			)));
		}
		Ok(self.statements)
	}

	fn dispatch(&mut self, kind: RecordKind, record: &Record<'_>) -> Result<()> {
		match kind {
			RecordKind::Header => self.open(record)?,
			RecordKind::OpeningBalance => check_all(schema::OPENING_BALANCE, self.current()?, record)?,
			RecordKind::Move(article) => self.parse_move(article, record)?,
			RecordKind::Information(article) => self.parse_information(article, record)?,
			RecordKind::FreeCommunication => {
				let mut communication = FreeCommunication::default();
				extend_all(schema::FREE_COMMUNICATION, &mut communication, record)?;
				self.current()?.free_communications.push(communication);
			}
			RecordKind::ClosingBalance => check_all(schema::CLOSING_BALANCE, self.current()?, record)?,
			RecordKind::Trailer => return self.close(record),
			RecordKind::Unknown(c) => warn!("line {}: skipping record of unknown type {:?}", self.line, c),
		}
		self.totals.records += 1;
		Ok(())
	}

	fn current(&mut self) -> Result<&mut Statement> {
		self.statement.as_mut().ok_or_else(outside_statement)
	}

	fn open(&mut self, record: &Record<'_>) -> Result<()> {
		if let Some(open) = &self.statement {
			return Err(CodaError::Structural(format!(
				"header found before the trailer of statement {}",
				open
			)));
		}

		let version = record.slice(127..128);
		if decode::integer("version", version).ok() != Some(SUPPORTED_VERSION) {
			return Err(CodaError::UnsupportedVersion(version.to_string()));
		}

		let mut statement = Statement::default();
		check_all(schema::HEADER, &mut statement, record)?;
		debug!(
			"line {}: statement header from bank {:?} created {:?}",
			self.line,
			statement.bank_id,
			statement.creation_date
		);

		self.statement = Some(statement);
		self.depth = None;
		self.information = None;
		self.totals = Totals::default();
		Ok(())
	}

	fn close(&mut self, record: &Record<'_>) -> Result<()> {
		let mut statement = self.statement.take().ok_or_else(outside_statement)?;
		check_all(schema::TRAILER, &mut statement, record)?;
		statement.validate(&self.totals)?;
		debug!(
			"line {}: statement {} closed with {} moves and {} records",
			self.line,
			statement,
			statement.moves.len(),
			self.totals.records.saturating_sub(1)
		);

		self.statements.push(statement);
		self.depth = None;
		self.information = None;
		self.totals = Totals::default();
		Ok(())
	}

	fn parse_move(&mut self, article: char, record: &Record<'_>) -> Result<()> {
		let fields = schema::move_article(article)
			.ok_or_else(|| CodaError::Structural(format!("unknown move article {:?}", article)))?;

		if article == '1' {
			let mut new = Move::default();
			check_all(schema::MOVE_COMMON, &mut new, record)?;
			extend_all(fields, &mut new, record)?;
			return self.attach(new);
		}

		let depth = self.depth;
		let statement = self.current()?;
		let current = current_move(statement, depth).ok_or_else(|| {
			CodaError::Structural(format!("move article {} without an opening article 1", article))
		})?;
		check_all(schema::MOVE_COMMON, current, record)?;
		extend_all(fields, current, record)
	}

	/// Places a new move by its transaction type and adds it to the running totals.
	fn attach(&mut self, new: Move) -> Result<()> {
		let kind = new.transaction_type().and_then(|t| t.chars().next());
		let statement = self.statement.as_mut().ok_or_else(outside_statement)?;

		let depth = match kind {
			Some('0'..='3') => {
				self.totals.add(new.amount.unwrap_or_default());
				statement.moves.push(new);
				Depth::Move
			}
			Some('5'..='8') => {
				let parent = statement
					.moves
					.last_mut()
					.ok_or_else(|| CodaError::Structural(format!("detail {} has no move", new)))?;
				same_sequence(parent, &new)?;
				parent.moves.push(new);
				Depth::Detail
			}
			Some('9') => {
				let parent = statement
					.moves
					.last_mut()
					.and_then(|m| m.moves.last_mut())
					.ok_or_else(|| CodaError::Structural(format!("sub-detail {} has no detail", new)))?;
				same_sequence(parent, &new)?;
				parent.moves.push(new);
				Depth::SubDetail
			}
			_ => {
				return Err(CodaError::Structural(format!(
					"unknown transaction type in code {:?} of move {}",
					new.transaction_code.as_deref().unwrap_or(""),
					new
				)))
			}
		};
		self.depth = Some(depth);
		Ok(())
	}

	fn parse_information(&mut self, article: char, record: &Record<'_>) -> Result<()> {
		let fields = schema::information_article(article).ok_or_else(|| {
			CodaError::Structural(format!("unknown information article {:?}", article))
		})?;
		let statement = self.statement.as_mut().ok_or_else(outside_statement)?;

		if article == '1' {
			let mut information = Information::default();
			check_all(schema::INFORMATION_COMMON, &mut information, record)?;
			extend_all(fields, &mut information, record)?;
			let key = information.bank_reference.clone().unwrap_or_default();
			statement
				.informations
				.entry(key.clone())
				.or_default()
				.push(information);
			self.information = Some(key);
			return Ok(());
		}

		let current = self
			.information
			.as_ref()
			.and_then(|key| statement.informations.get_mut(key))
			.and_then(|informations| informations.last_mut())
			.ok_or_else(|| {
				CodaError::Structural(format!(
					"information article {} without an opening article 1",
					article
				))
			})?;
		check_all(schema::INFORMATION_COMMON, current, record)?;
		extend_all(fields, current, record)
	}
}

fn current_move(statement: &mut Statement, depth: Option<Depth>) -> Option<&mut Move> {
	let top = statement.moves.last_mut()?;
	match depth? {
		Depth::Move => Some(top),
		Depth::Detail => top.moves.last_mut(),
		Depth::SubDetail => top.moves.last_mut()?.moves.last_mut(),
	}
}

fn same_sequence(parent: &Move, child: &Move) -> Result<()> {
	if parent.sequence != child.sequence {
		return Err(CodaError::Structural(format!(
			"detail {} does not belong to move {}",
			child, parent
		)));
	}
	Ok(())
}

fn outside_statement() -> CodaError {
	CodaError::Structural("record outside of a statement".to_string())
}
