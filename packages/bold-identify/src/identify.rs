//! Identification service that ties request, parsing and table assembly
//! together.

use reqwest::blocking::Client;

use crate::config::{ClientOptions, Database};
use crate::error::Result;
use crate::http::{create_client, fetch};
use crate::parse::parse_response;
use crate::table::Table;
use crate::types::{Identification, Query};

/// Identify one or more sequences against the BOLD identification engine.
///
/// Sequences are sent one after another, each as its own request. The output
/// has one entry per input, in input order; a failure for one sequence is
/// reported in its slot and does not stop the remaining requests.
///
/// # Arguments
/// * `sequences` - Nucleotide sequences to identify
/// * `db` - Database selector, forwarded as-is
/// * `options` - Transport options and raw-response mode
///
/// # Returns
/// One `Result<Identification>` per input sequence, or an error if the HTTP
/// client cannot be built from `options`
pub fn identify<I, S>(
    sequences: I,
    db: &Database,
    options: &ClientOptions,
) -> Result<Vec<Result<Identification>>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let client = create_client(options)?;

    let results = sequences
        .into_iter()
        .enumerate()
        .map(|(index, sequence)| {
            let result = identify_with(&client, sequence.as_ref(), db, options);
            if let Err(e) = &result {
                tracing::warn!(index, error = %e, "Identification failed");
            }
            result
        })
        .collect();

    Ok(results)
}

/// Identify a single sequence.
///
/// # Examples
/// ```no_run
/// use bold_identify::{identify_one, ClientOptions, Database};
///
/// let result = identify_one("ACGT", &Database::Cox1, &ClientOptions::default()).unwrap();
/// if let Some(table) = result.as_table() {
///     println!("{} matches", table.len());
/// }
/// ```
pub fn identify_one(
    sequence: &str,
    db: &Database,
    options: &ClientOptions,
) -> Result<Identification> {
    let client = create_client(options)?;
    identify_with(&client, sequence, db, options)
}

/// Identify a single sequence with an existing client.
pub fn identify_with(
    client: &Client,
    sequence: &str,
    db: &Database,
    options: &ClientOptions,
) -> Result<Identification> {
    let query = Query::new(sequence, db.clone());
    let response = fetch(client, &options.base_url, &query)?;

    if options.raw_response {
        return Ok(Identification::Raw(response));
    }

    let records = parse_response(&response.body)?;
    Ok(Identification::Table(Table::from_records(&records)))
}
