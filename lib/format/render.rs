use chrono::{DateTime, Utc};
use comfy_table::{presets, Table};

use crate::{report::Reporter, CorralError, CorralResult};

use super::ListFormat;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Renders the reporter sequence in the selected format.
///
/// Pure over its inputs: the returned text is fully materialized before
/// anything is shown to the user, so a failure here never leaves partial
/// output behind. An empty result means the caller should print nothing at
/// all (quiet or headerless listings of an empty inventory).
pub fn render(
    reporters: &[Reporter],
    format: &ListFormat,
    now: DateTime<Utc>,
) -> CorralResult<String> {
    let rendered = match format {
        ListFormat::Quiet => reporters
            .iter()
            .map(Reporter::display_name)
            .collect::<Vec<_>>()
            .join("\n"),

        ListFormat::Json => {
            serde_json::to_string_pretty(reporters).map_err(CorralError::ReporterEncode)?
        }

        ListFormat::Projection { fields } => reporters
            .iter()
            .map(|reporter| {
                fields
                    .iter()
                    .map(|field| field.value(reporter, now))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n"),

        ListFormat::Table { fields, heading } => {
            let mut table = Table::new();
            table.load_preset(presets::NOTHING);

            if *heading {
                table.set_header(fields.iter().map(|field| field.header()).collect::<Vec<_>>());
            }
            for reporter in reporters {
                table.add_row(
                    fields
                        .iter()
                        .map(|field| field.value(reporter, now))
                        .collect::<Vec<_>>(),
                );
            }

            table.to_string()
        }
    };

    Ok(rendered)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
