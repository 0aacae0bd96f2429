use std::{
    error::Error,
    fmt::{Display, Formatter},
};

/// Catch-all result type for the programs and argument parsing.
pub type RadarMapResult<T> = Result<T, Box<dyn Error>>;

/// The different ways loading radar data can go wrong.
#[derive(Debug, Clone, PartialEq)]
pub enum RadarMapError {
    /// The header row is missing a column no record can be built without.
    Schema { missing: &'static str },
    /// A single data row could not be turned into a record. Never fatal.
    RowParse { row: usize, reason: String },
    /// The raw text could not be retrieved.
    Transport(String),
}

/// Coarse classification of a [RadarMapError] so callers can decide how to recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
pub enum ErrorKind {
    Schema,
    RowParse,
    Transport,
}

impl RadarMapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Schema { .. } => ErrorKind::Schema,
            Self::RowParse { .. } => ErrorKind::RowParse,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }
}

impl Display for RadarMapError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::Schema { missing } => write!(f, "column '{}' not found in header", missing),
            Self::RowParse { row, reason } => write!(f, "row {}: {}", row, reason),
            Self::Transport(msg) => write!(f, "unable to fetch radar data: {}", msg),
        }
    }
}

impl Error for RadarMapError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_kinds_are_distinguishable() {
        let schema = RadarMapError::Schema { missing: "Latitude" };
        let row = RadarMapError::RowParse {
            row: 3,
            reason: "bad latitude".to_owned(),
        };
        let transport = RadarMapError::Transport("timed out".to_owned());

        assert_eq!(schema.kind(), ErrorKind::Schema);
        assert_eq!(row.kind(), ErrorKind::RowParse);
        assert_eq!(transport.kind(), ErrorKind::Transport);

        let name: &'static str = transport.kind().into();
        assert_eq!(name, "Transport");
        assert_eq!(schema.to_string(), "column 'Latitude' not found in header");
    }
}
