use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

/// Wire and storage format for calendar dates: 8 zero-padded digits, `YYYYMMDD`.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Parse a `YYYYMMDD` string.
///
/// chrono's `%Y` also accepts signs and wider years, so the fixed width is
/// checked up front.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// A persisted task row.
///
/// `id` travels as a JSON string (`"id":"42"`) to match what the web UI expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    #[serde(serialize_with = "id_as_string")]
    pub id: i64,
    /// `YYYYMMDD`.
    pub date: String,
    pub title: String,
    pub comment: String,
    /// Recurrence rule; empty for one-off tasks.
    pub repeat: String,
}

fn id_as_string<S: Serializer>(id: &i64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&id.to_string())
}

/// A task id as clients send it: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Num(i64),
    Str(String),
}

/// Task fields as submitted by a client, before validation and date normalisation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub repeat: String,
}

impl NewTask {
    pub fn into_task(self, id: i64) -> Task {
        Task {
            id,
            date: self.date,
            title: self.title,
            comment: self.comment,
            repeat: self.repeat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_fixed_width() {
        let d = parse_date("20240229").expect("leap day");
        assert_eq!(format_date(d), "20240229");
    }

    #[test]
    fn parse_date_rejects_malformed() {
        assert!(parse_date("").is_none());
        assert!(parse_date("2024011").is_none());
        assert!(parse_date("+2024011").is_none());
        assert!(parse_date("20230229").is_none());
        assert!(parse_date("2024-01-01").is_none());
    }

    #[test]
    fn task_id_serializes_as_string() {
        let task = NewTask {
            date: "20240101".into(),
            title: "write report".into(),
            ..Default::default()
        }
        .into_task(7);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["comment"], "");
    }

    #[test]
    fn raw_id_accepts_string_or_number() {
        assert_eq!(serde_json::from_str::<RawId>("12").unwrap(), RawId::Num(12));
        assert_eq!(
            serde_json::from_str::<RawId>(r#""12""#).unwrap(),
            RawId::Str("12".into())
        );
        assert!(serde_json::from_str::<RawId>("true").is_err());
    }
}
