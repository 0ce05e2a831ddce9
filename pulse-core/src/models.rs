use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A discrete bookable start time from the fixed, insertion-ordered catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSlot {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Cardio,
    Strength,
    Group,
    Premium,
    Yoga,
}

impl ZoneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneKind::Cardio => "cardio",
            ZoneKind::Strength => "strength",
            ZoneKind::Group => "group",
            ZoneKind::Premium => "premium",
            ZoneKind::Yoga => "yoga",
        }
    }
}

impl std::str::FromStr for ZoneKind {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cardio" => Ok(ZoneKind::Cardio),
            "strength" => Ok(ZoneKind::Strength),
            "group" => Ok(ZoneKind::Group),
            "premium" => Ok(ZoneKind::Premium),
            "yoga" => Ok(ZoneKind::Yoga),
            other => Err(crate::CoreError::ValidationError(format!(
                "unknown zone kind: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ZoneKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trainer {
    pub id: i64,
    pub name: String,
    pub specialty: String,
}

/// A persisted booking row. Append-only; the ledger is the single source of
/// truth for conflict checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: i64,
    pub trainer_id: i64,
    pub zone_id: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub duration_minutes: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a booking that has not been written yet.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: i64,
    pub trainer_id: i64,
    pub zone_id: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub duration_minutes: i64,
    pub kind: String,
}

impl NewBooking {
    /// Stamp the pending booking with an id and creation time.
    pub fn into_booking(self) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            trainer_id: self.trainer_id,
            zone_id: self.zone_id,
            date: self.date,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            kind: self.kind,
            created_at: Utc::now(),
        }
    }
}

/// A booking joined with human-readable client, trainer, and zone names.
/// This is the reporting shape and the read-after-write success payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: Uuid,
    pub client: String,
    pub trainer: String,
    pub zone: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub duration_minutes: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "admin" => Ok(Role::Admin),
            other => Err(crate::CoreError::ValidationError(format!(
                "unknown role: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_zone_kind_round_trip() {
        for kind in [
            ZoneKind::Cardio,
            ZoneKind::Strength,
            ZoneKind::Group,
            ZoneKind::Premium,
            ZoneKind::Yoga,
        ] {
            assert_eq!(ZoneKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(ZoneKind::from_str("sauna").is_err());
    }

    #[test]
    fn test_booking_serializes_type_field() {
        let booking = NewBooking {
            user_id: 2,
            trainer_id: 1,
            zone_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            start_time: "10:00".to_string(),
            duration_minutes: 60,
            kind: "personal".to_string(),
        }
        .into_booking();

        let value = serde_json::to_value(&booking).unwrap();
        assert_eq!(value["type"], "personal");
        assert_eq!(value["date"], "2026-09-01");
        assert_eq!(value["start_time"], "10:00");
    }
}
