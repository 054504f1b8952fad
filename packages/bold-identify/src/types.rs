//! Core data types for identification requests and results.

use serde::Serialize;

use crate::config::Database;
use crate::table::Table;

/// Scalar fields of a `<match>` element, in output order.
pub const MATCH_FIELDS: [&str; 6] = [
    "ID",
    "sequencedescription",
    "database",
    "citation",
    "taxonomicidentification",
    "similarity",
];

/// Flattened specimen columns, in output order.
pub const SPECIMEN_FIELDS: [&str; 4] = [
    "specimen_url",
    "specimen_country",
    "specimen_lat",
    "specimen_lon",
];

/// One identification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Nucleotide sequence, sent as-is.
    pub sequence: String,
    pub db: Database,
}

impl Query {
    pub fn new(sequence: impl Into<String>, db: Database) -> Self {
        Self {
            sequence: sequence.into(),
            db,
        }
    }

    /// Query parameters with empty values left out.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        [("sequence", self.sequence.as_str()), ("db", self.db.as_str())]
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }
}

/// Voucher specimen behind a match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Specimen {
    pub url: Option<String>,
    pub country: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// A single `<match>` returned by the identification engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    pub sequencedescription: Option<String>,
    pub database: Option<String>,
    pub citation: Option<String>,
    pub taxonomicidentification: Option<String>,
    /// Similarity to the query, as reported (e.g. "0.9876").
    pub similarity: Option<String>,
    pub specimen: Specimen,
}

impl MatchRecord {
    /// Similarity parsed as a number, if present and numeric.
    #[must_use]
    pub fn similarity_value(&self) -> Option<f64> {
        self.similarity.as_deref()?.trim().parse().ok()
    }

    /// All ten columns of the flattened record, in output order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, Option<&str>); 10] {
        let [id, description, database, citation, taxon, similarity] = MATCH_FIELDS;
        let [url, country, lat, lon] = SPECIMEN_FIELDS;
        [
            (id, self.id.as_deref()),
            (description, self.sequencedescription.as_deref()),
            (database, self.database.as_deref()),
            (citation, self.citation.as_deref()),
            (taxon, self.taxonomicidentification.as_deref()),
            (similarity, self.similarity.as_deref()),
            (url, self.specimen.url.as_deref()),
            (country, self.specimen.country.as_deref()),
            (lat, self.specimen.lat.as_deref()),
            (lon, self.specimen.lon.as_deref()),
        ]
    }
}

/// Response as received from the identification engine, after status and
/// content-type checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawResponse {
    pub status: u16,
    /// Final URL, including the query string.
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Result for one input sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Identification {
    /// Parsed matches.
    Table(Table),
    /// Unparsed response, returned in raw-response mode.
    Raw(RawResponse),
}

impl Identification {
    #[must_use]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(table) => Some(table),
            Self::Raw(_) => None,
        }
    }

    #[must_use]
    pub fn as_raw(&self) -> Option<&RawResponse> {
        match self {
            Self::Raw(raw) => Some(raw),
            Self::Table(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        let query = Query::new("ACGT", Database::Cox1Species);
        assert_eq!(
            query.params(),
            vec![("sequence", "ACGT"), ("db", "COX1_SPECIES")]
        );
    }

    #[test]
    fn test_query_params_drop_empty_values() {
        let query = Query::new("ACGT", Database::Other(String::new()));
        assert_eq!(query.params(), vec![("sequence", "ACGT")]);

        let query = Query::new("", Database::Cox1);
        assert_eq!(query.params(), vec![("db", "COX1")]);
    }

    #[test]
    fn test_similarity_value() {
        let record = MatchRecord {
            similarity: Some(" 0.9876 ".to_string()),
            ..Default::default()
        };
        assert_eq!(record.similarity_value(), Some(0.9876));

        let record = MatchRecord {
            similarity: Some("n/a".to_string()),
            ..Default::default()
        };
        assert_eq!(record.similarity_value(), None);
        assert_eq!(MatchRecord::default().similarity_value(), None);
    }

    #[test]
    fn test_fields_order() {
        let record = MatchRecord {
            id: Some("GBMIN1".to_string()),
            specimen: Specimen {
                lon: Some("4.9".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let fields = record.fields();
        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "ID",
                "sequencedescription",
                "database",
                "citation",
                "taxonomicidentification",
                "similarity",
                "specimen_url",
                "specimen_country",
                "specimen_lat",
                "specimen_lon",
            ]
        );
        assert_eq!(fields[0].1, Some("GBMIN1"));
        assert_eq!(fields[3].1, None);
        assert_eq!(fields[9].1, Some("4.9"));
    }
}
