use agate_types::{
    Advert, AdvertDraft, Campaign, CampaignDraft, CampaignManager, CampaignManagerDraft,
    CampaignState, Client, ClientDraft, Entity, RecordId, Staff, StaffDraft, StaffGrade,
    StaffGradeDraft,
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, Row};

/// Table bootstrap, run on every open. Not a migration system: an existing
/// table is left as it is.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS clients (
    client_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    address         TEXT NOT NULL,
    contact_details TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS staff_grades (
    grade_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    grade_name TEXT NOT NULL,
    pay_rate   INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS staff (
    staff_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    role       TEXT NOT NULL,
    grade_id   INTEGER NOT NULL REFERENCES staff_grades (grade_id),
    start_date TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS campaign_manager (
    manager_id INTEGER PRIMARY KEY AUTOINCREMENT,
    staff_id   INTEGER NOT NULL REFERENCES staff (staff_id)
);
CREATE TABLE IF NOT EXISTS campaigns (
    campaign_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id         INTEGER NOT NULL REFERENCES clients (client_id),
    title             TEXT NOT NULL,
    start_date        TEXT NOT NULL,
    end_date          TEXT NOT NULL,
    estimated_cost    REAL NOT NULL,
    actual_cost       REAL NOT NULL,
    completion_status INTEGER NOT NULL CHECK (completion_status IN (0, 1)),
    current_state     TEXT NOT NULL
        CHECK (current_state IN ('not started', 'in progress', 'completed', 'cancelled')),
    manager_id        INTEGER REFERENCES campaign_manager (manager_id),
    budget            INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS adverts (
    advert_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    campaign_id INTEGER NOT NULL REFERENCES campaigns (campaign_id),
    progress    TEXT NOT NULL,
    run_date    TEXT NOT NULL
);
";

pub(super) fn bootstrap(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

/// Row mapping between an entity and its table.
///
/// Rows are always selected as the identifier followed by [`Self::COLUMNS`]
/// in order, and [`Self::bind`] yields one value per column in that order.
pub trait SqlEntity: Entity {
    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn bind(draft: &Self::Draft) -> Vec<Value>;
}

fn text(s: &str) -> Value {
    Value::Text(s.to_owned())
}

fn date_value(date: NaiveDate) -> Value {
    Value::Text(date.format("%Y-%m-%d").to_string())
}

fn timestamp_value(ts: DateTime<Utc>) -> Value {
    Value::Text(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn date_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|err| conversion_error(idx, err))
}

fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| conversion_error(idx, err))
}

fn state_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<CampaignState> {
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|err| conversion_error(idx, err))
}

impl SqlEntity for Client {
    const TABLE: &'static str = "clients";
    const ID_COLUMN: &'static str = "client_id";
    const COLUMNS: &'static [&'static str] = &["name", "address", "contact_details"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Client::from_draft(
            row.get(0)?,
            ClientDraft {
                name: row.get(1)?,
                address: row.get(2)?,
                contact_details: row.get(3)?,
            },
        ))
    }

    fn bind(draft: &ClientDraft) -> Vec<Value> {
        vec![
            text(&draft.name),
            text(&draft.address),
            text(&draft.contact_details),
        ]
    }
}

impl SqlEntity for StaffGrade {
    const TABLE: &'static str = "staff_grades";
    const ID_COLUMN: &'static str = "grade_id";
    const COLUMNS: &'static [&'static str] = &["grade_name", "pay_rate"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(StaffGrade::from_draft(
            row.get(0)?,
            StaffGradeDraft {
                grade_name: row.get(1)?,
                pay_rate: row.get(2)?,
            },
        ))
    }

    fn bind(draft: &StaffGradeDraft) -> Vec<Value> {
        vec![text(&draft.grade_name), Value::Integer(draft.pay_rate)]
    }
}

impl SqlEntity for Staff {
    const TABLE: &'static str = "staff";
    const ID_COLUMN: &'static str = "staff_id";
    const COLUMNS: &'static [&'static str] = &["name", "role", "grade_id", "start_date"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Staff::from_draft(
            row.get(0)?,
            StaffDraft {
                name: row.get(1)?,
                role: row.get(2)?,
                grade_id: row.get(3)?,
                start_date: date_at(row, 4)?,
            },
        ))
    }

    fn bind(draft: &StaffDraft) -> Vec<Value> {
        vec![
            text(&draft.name),
            text(&draft.role),
            Value::Integer(draft.grade_id),
            date_value(draft.start_date),
        ]
    }
}

impl SqlEntity for CampaignManager {
    const TABLE: &'static str = "campaign_manager";
    const ID_COLUMN: &'static str = "manager_id";
    const COLUMNS: &'static [&'static str] = &["staff_id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(CampaignManager::from_draft(
            row.get(0)?,
            CampaignManagerDraft {
                staff_id: row.get(1)?,
            },
        ))
    }

    fn bind(draft: &CampaignManagerDraft) -> Vec<Value> {
        vec![Value::Integer(draft.staff_id)]
    }
}

impl SqlEntity for Campaign {
    const TABLE: &'static str = "campaigns";
    const ID_COLUMN: &'static str = "campaign_id";
    const COLUMNS: &'static [&'static str] = &[
        "client_id",
        "title",
        "start_date",
        "end_date",
        "estimated_cost",
        "actual_cost",
        "completion_status",
        "current_state",
        "manager_id",
        "budget",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Campaign::from_draft(
            row.get(0)?,
            CampaignDraft {
                client_id: row.get(1)?,
                title: row.get(2)?,
                start_date: date_at(row, 3)?,
                end_date: date_at(row, 4)?,
                estimated_cost: row.get(5)?,
                actual_cost: row.get(6)?,
                completion_status: row.get(7)?,
                current_state: state_at(row, 8)?,
                manager_id: row.get::<_, Option<RecordId>>(9)?,
                budget: row.get(10)?,
            },
        ))
    }

    fn bind(draft: &CampaignDraft) -> Vec<Value> {
        vec![
            Value::Integer(draft.client_id),
            text(&draft.title),
            date_value(draft.start_date),
            date_value(draft.end_date),
            Value::Real(draft.estimated_cost),
            Value::Real(draft.actual_cost),
            Value::Integer(i64::from(draft.completion_status)),
            text(draft.current_state.as_str()),
            draft.manager_id.map_or(Value::Null, Value::Integer),
            Value::Integer(draft.budget),
        ]
    }
}

impl SqlEntity for Advert {
    const TABLE: &'static str = "adverts";
    const ID_COLUMN: &'static str = "advert_id";
    const COLUMNS: &'static [&'static str] = &["campaign_id", "progress", "run_date"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Advert::from_draft(
            row.get(0)?,
            AdvertDraft {
                campaign_id: row.get(1)?,
                progress: row.get(2)?,
                run_date: timestamp_at(row, 3)?,
            },
        ))
    }

    fn bind(draft: &AdvertDraft) -> Vec<Value> {
        vec![
            Value::Integer(draft.campaign_id),
            text(&draft.progress),
            timestamp_value(draft.run_date),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bind_matches_columns<E: SqlEntity>(draft: &E::Draft) {
        assert_eq!(
            E::bind(draft).len(),
            E::COLUMNS.len(),
            "{} bind/column mismatch",
            E::TABLE
        );
    }

    #[test]
    fn bind_width_matches_columns() {
        assert_bind_matches_columns::<Client>(&ClientDraft::default());
        assert_bind_matches_columns::<StaffGrade>(&StaffGradeDraft::default());
        assert_bind_matches_columns::<CampaignManager>(&CampaignManagerDraft::default());
        assert_bind_matches_columns::<Staff>(&StaffDraft {
            name: "Dana".into(),
            role: "designer".into(),
            grade_id: 1,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        });
        assert_bind_matches_columns::<Advert>(&AdvertDraft {
            campaign_id: 1,
            progress: "booked".into(),
            run_date: Utc::now(),
        });
        assert_bind_matches_columns::<Campaign>(&CampaignDraft {
            client_id: 1,
            title: "Launch".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            estimated_cost: 0.0,
            actual_cost: 0.0,
            completion_status: false,
            current_state: CampaignState::NotStarted,
            manager_id: None,
            budget: 0,
        });
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        bootstrap(&conn).unwrap();
        bootstrap(&conn).unwrap();
    }
}
