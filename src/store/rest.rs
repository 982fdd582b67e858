use super::{NoteMap, NotesStore, StoreError};
use crate::calendar::{DateKey, MonthCursor};
use crate::config::RestConfig;
use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A notes table served over a PostgREST-style HTTP API (as exposed by
/// Supabase), with one row per date
#[derive(Clone, Debug)]
pub(crate) struct RestStore {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct NoteRow {
    date: String,
    note: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
struct UpsertRow {
    date: DateKey,
    note: String,
    updated_at: String,
}

impl RestStore {
    pub(crate) fn new(config: &RestConfig) -> Result<RestStore, StoreError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(RestStore {
            client,
            endpoint: endpoint(&config.url, &config.table),
            api_key: config.api_key.clone(),
        })
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("apikey", key).bearer_auth(key),
            None => req,
        }
    }
}

impl NotesStore for RestStore {
    fn fetch_month(&mut self, cursor: MonthCursor) -> Result<NoteMap, StoreError> {
        let req = self.client.get(&self.endpoint).query(&[
            ("select", String::from("date,note")),
            ("date", format!("gte.{}", cursor.first_key())),
            ("date", format!("lte.{}", cursor.last_key())),
        ]);
        let rows = check_status(self.authorize(req).send()?)?.json::<Vec<NoteRow>>()?;
        debug!("event=rest_fetch month={cursor} rows={}", rows.len());
        rows_to_notes(rows)
    }

    fn upsert_note(&mut self, key: DateKey, text: &str) -> Result<(), StoreError> {
        let row = UpsertRow {
            date: key,
            note: text.to_owned(),
            updated_at: OffsetDateTime::now_utc().format(&Rfc3339)?,
        };
        let req = self
            .client
            .post(&self.endpoint)
            .query(&[("on_conflict", "date")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[row]);
        check_status(self.authorize(req).send()?)?;
        debug!("event=rest_upsert date={key}");
        Ok(())
    }
}

fn endpoint(url: &str, table: &str) -> String {
    format!("{}/rest/v1/{table}", url.trim_end_matches('/'))
}

fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

// A null note is stored the same as an empty one
fn rows_to_notes(rows: Vec<NoteRow>) -> Result<NoteMap, StoreError> {
    let mut notes = NoteMap::new();
    for row in rows {
        notes.insert(row.date.parse::<DateKey>()?, row.note.unwrap_or_default());
    }
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_endpoint() {
        assert_eq!(
            endpoint("https://abc.supabase.co/", "calendar_notes"),
            "https://abc.supabase.co/rest/v1/calendar_notes"
        );
        assert_eq!(
            endpoint("http://localhost:3000", "notes"),
            "http://localhost:3000/rest/v1/notes"
        );
    }

    #[test]
    fn test_rows_to_notes() {
        let rows = serde_json::from_str::<Vec<NoteRow>>(
            r#"[
                {"date": "2024-02-14", "note": "dentist"},
                {"date": "2024-02-15", "note": null}
            ]"#,
        )
        .unwrap();
        let notes = rows_to_notes(rows).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[&DateKey::from(date!(2024 - 02 - 14))], "dentist");
        assert_eq!(notes[&DateKey::from(date!(2024 - 02 - 15))], "");
    }

    #[test]
    fn test_rows_with_bad_date() {
        let rows = vec![NoteRow {
            date: String::from("14/02/2024"),
            note: Some(String::from("dentist")),
        }];
        assert!(matches!(
            rows_to_notes(rows),
            Err(StoreError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_upsert_row_json() {
        let row = UpsertRow {
            date: DateKey::from(date!(2024 - 03 - 05)),
            note: String::from("hello"),
            updated_at: String::from("2024-03-05T10:00:00Z"),
        };
        assert_eq!(
            serde_json::to_value([row]).unwrap(),
            serde_json::json!([{
                "date": "2024-03-05",
                "note": "hello",
                "updated_at": "2024-03-05T10:00:00Z",
            }])
        );
    }
}
