use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid UTF-8 input: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// A scalar field does not match its grammar.
    #[error("Invalid {field}: {value:?}")]
    Format { field: &'static str, value: String },

    /// The header's version column, as found.
    #[error("Unsupported CODA version {0:?}")]
    UnsupportedVersion(String),

    /// A field repeated on a continuation record disagrees with the stored value.
    #[error("Inconsistent {field}: stored {stored:?}, found {found:?}")]
    Inconsistent {
        field: &'static str,
        stored: String,
        found: String,
    },

    #[error("Malformed file: {0}")]
    Structural(String),

    #[error(
        "Wrong balance: {closing} - {opening} does not match credit {total_credit} - debit {total_debit}"
    )]
    BalanceMismatch {
        opening: Decimal,
        closing: Decimal,
        total_credit: Decimal,
        total_debit: Decimal,
    },

    #[error("Wrong total credit: declared {declared}, computed {computed}")]
    CreditMismatch { declared: Decimal, computed: Decimal },

    #[error("Wrong total debit: declared {declared}, computed {computed}")]
    DebitMismatch { declared: Decimal, computed: Decimal },

    #[error("Wrong number of records: declared {declared}, counted {counted}")]
    RecordCountMismatch { declared: u32, counted: u32 },

    /// The accessor does not apply to this communication type.
    #[error("{attribute} is not available for communication type {communication_type:?}")]
    NotApplicable {
        attribute: &'static str,
        communication_type: Option<String>,
    },
}

impl CodaError {
    pub(crate) fn format(field: &'static str, value: &str) -> Self {
        CodaError::Format {
            field,
            value: value.to_string(),
        }
    }

    /// True for errors raised by type-gated accessors rather than by decoding.
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, CodaError::NotApplicable { .. })
    }
}

pub type Result<T> = std::result::Result<T, CodaError>;
