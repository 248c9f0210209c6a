//! Decoder for CODA, the fixed-width bank statement format used by Belgian banks.
//!
//! A file holds one or more statements. Each statement is opened by a header
//! record, carries its moves, informations and free communications, and is
//! closed by a trailer whose totals are checked against what was read.

mod decode;
mod record;
mod schema;

pub mod encoding;
pub mod error;
pub mod information;
pub mod parser;
pub mod statement;
pub mod transaction;
pub mod tree;

pub use encoding::Encoding;
pub use error::{CodaError, Result};
pub use information::{FreeCommunication, Information};
pub use parser::Parser;
pub use statement::Statement;
pub use transaction::{Move, TransactionCode};
pub use tree::{Node, Tree};

use serde::{Deserialize, Serialize};
use std::io::{BufRead, Cursor};

/// Every statement of one CODA file, in file order.
#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq)]
pub struct Coda {
    pub statements: Vec<Statement>,
}

impl Coda {
    pub fn from_lines<I>(lines: I) -> Result<Coda>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut parser = Parser::new();
        for line in lines {
            parser.feed(line.as_ref())?;
        }
        Ok(Coda {
            statements: parser.finish()?,
        })
    }

    pub fn parse_str(input: &str) -> Result<Coda> {
        Coda::from_lines(input.lines())
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Coda> {
        Ok(Coda {
            statements: Parser::new().parse(reader)?,
        })
    }

    /// Decodes raw file contents in the given character set.
    pub fn from_bytes(bytes: &[u8], encoding: Encoding) -> Result<Coda> {
        let text = encoding.decode(bytes)?;
        Coda::from_reader(Cursor::new(text))
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
