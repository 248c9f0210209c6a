use crate::error::{CodaError, Result};
use encoding_rs::{UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Character set of a CODA file. Banks deliver windows-1252 unless told otherwise.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    #[serde(rename = "windows-1252")]
    Windows1252,
    #[serde(rename = "utf-8")]
    Utf8,
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::Windows1252
    }
}

impl Encoding {
    /// Decodes a whole file. Windows-1252 maps every byte, so only UTF-8 can fail.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            Encoding::Utf8 => Ok(String::from_utf8(bytes.to_vec())?),
            Encoding::Windows1252 => {
                let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
                Ok(text.into_owned())
            }
        }
    }
}

impl FromStr for Encoding {
    type Err = CodaError;

    /// Accepts any WHATWG label of the two supported encodings.
    fn from_str(s: &str) -> Result<Self> {
        match encoding_rs::Encoding::for_label(s.trim().as_bytes()) {
            Some(encoding) if encoding == WINDOWS_1252 => Ok(Encoding::Windows1252),
            Some(encoding) if encoding == UTF_8 => Ok(Encoding::Utf8),
            _ => Err(CodaError::format("encoding", s)),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Windows1252 => f.write_str("windows-1252"),
            Encoding::Utf8 => f.write_str("utf-8"),
        }
    }
}
