//! Output format selection and rendering for the machine listing.
//!
//! Format expressions follow the familiar template shape: unset for the
//! default table, `json` for structured output, a bare `{{.Field}}` template
//! for a headerless projection, or `table {{.Field}} ...` for a table limited
//! to the given fields. Field references resolve against an enumerated set of
//! reporter fields and unknown names fail before any output is written.

mod fields;
mod render;

use crate::CorralResult;

pub use fields::*;
pub use render::*;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The canonical column order of the default table.
pub const DEFAULT_COLUMNS: [Field; 5] = [
    Field::Name,
    Field::LastUp,
    Field::CreatedAt,
    Field::Memory,
    Field::DiskSize,
];

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The selected output format of a machine listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFormat {
    /// A human table: one optional header row, one row per machine.
    Table {
        /// The columns to render, in order.
        fields: Vec<Field>,
        /// Whether the header row is rendered.
        heading: bool,
    },

    /// Machine names only, one per line, no header.
    Quiet,

    /// The structured JSON document over the full reporter sequence.
    Json,

    /// A bare field projection: one row per machine, no header.
    Projection {
        /// The fields to render, in order.
        fields: Vec<Field>,
    },
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Parses the listing flags into a [`ListFormat`].
///
/// Quiet mode wins over an explicit format expression. Fails fast on a
/// malformed template or an unknown field so nothing is emitted for an
/// invalid request.
pub fn parse_format(
    format: Option<&str>,
    quiet: bool,
    noheading: bool,
) -> CorralResult<ListFormat> {
    if quiet {
        return Ok(ListFormat::Quiet);
    }

    let format = match format {
        None => {
            return Ok(ListFormat::Table {
                fields: DEFAULT_COLUMNS.to_vec(),
                heading: !noheading,
            })
        }
        Some(format) => format.trim(),
    };

    if format == "json" {
        return Ok(ListFormat::Json);
    }

    if let Some(template) = format.strip_prefix("table ") {
        return Ok(ListFormat::Table {
            fields: parse_template(template)?,
            heading: !noheading,
        });
    }

    Ok(ListFormat::Projection {
        fields: parse_template(format)?,
    })
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
