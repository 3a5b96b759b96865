//! Single-line encoding of maze layouts for clipboard transfer.

#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_chase_core::MazeLayout;

const LAYOUT_DOMAIN: &str = "maze";
const LAYOUT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const LAYOUT_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a layout into a single-line string suitable for clipboard
/// transfer: `maze:v1:<cols>x<rows>:<base64 json>`.
#[must_use]
pub(crate) fn encode(layout: &MazeLayout) -> String {
    let json = serde_json::to_vec(layout).expect("maze layout serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!(
        "{LAYOUT_HEADER}:{}x{}:{encoded}",
        layout.width(),
        layout.height()
    )
}

/// Decodes a layout from the provided string representation.
pub(crate) fn decode(value: &str) -> Result<MazeLayout, LayoutTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LayoutTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

    if domain != LAYOUT_DOMAIN {
        return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != LAYOUT_VERSION {
        return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (columns, rows) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LayoutTransferError::InvalidEncoding)?;
    let layout: MazeLayout =
        serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

    if layout.width() != columns as usize || layout.height() != rows as usize {
        return Err(LayoutTransferError::DimensionMismatch {
            declared: (columns, rows),
            actual: (layout.width() as u32, layout.height() as u32),
        });
    }

    Ok(layout)
}

fn parse_dimensions(value: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(value.to_owned());
    let (columns, rows) = value.split_once('x').ok_or_else(invalid)?;
    let columns = columns.parse().map_err(|_| invalid())?;
    let rows = rows.parse().map_err(|_| invalid())?;
    Ok((columns, rows))
}

/// Errors that can occur while decoding layout transfer strings.
#[derive(Debug)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded layout.
    MissingPrefix,
    /// The encoded layout did not contain a version segment.
    MissingVersion,
    /// The encoded layout did not include grid dimensions.
    MissingDimensions,
    /// The encoded layout did not include the payload segment.
    MissingPayload,
    /// The encoded layout used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded layout used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded layout.
    InvalidDimensions(String),
    /// The declared dimensions disagree with the decoded grid.
    DimensionMismatch {
        /// Dimensions announced in the header, as `(columns, rows)`.
        declared: (u32, u32),
        /// Dimensions of the decoded cell grid, as `(columns, rows)`.
        actual: (u32, u32),
    },
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for LayoutTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "layout string was empty"),
            Self::MissingPrefix => write!(f, "layout string is missing the prefix"),
            Self::MissingVersion => write!(f, "layout string is missing the version"),
            Self::MissingDimensions => write!(f, "layout string is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "layout string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "layout prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "layout version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::DimensionMismatch { declared, actual } => write!(
                f,
                "layout header declares {}x{} but the payload grid is {}x{}",
                declared.0, declared.1, actual.0, actual.1
            ),
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode layout payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not deserialise layout payload: {error}")
            }
        }
    }
}

impl Error for LayoutTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}
