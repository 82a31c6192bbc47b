// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Watched-item activity model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Kind of event recorded against a watched item.
///
/// Stored and transmitted as its string tag (e.g. `"RATING_CHANGED"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityType {
    AddedWatched,
    RemovedWatched,
    RatingChanged,
    StatusChanged,
    ThoughtsChanged,
    ThoughtsRemoved,
    ImportedWatched,
    /// Imported rating. With no rating it marks the original import of the
    /// content on the platform the user imported from.
    ImportedRating,
    SeasonAdded,
    SeasonRemoved,
    SeasonRatingChanged,
    SeasonStatusChanged,
}

impl ActivityType {
    pub const ALL: [ActivityType; 12] = [
        ActivityType::AddedWatched,
        ActivityType::RemovedWatched,
        ActivityType::RatingChanged,
        ActivityType::StatusChanged,
        ActivityType::ThoughtsChanged,
        ActivityType::ThoughtsRemoved,
        ActivityType::ImportedWatched,
        ActivityType::ImportedRating,
        ActivityType::SeasonAdded,
        ActivityType::SeasonRemoved,
        ActivityType::SeasonRatingChanged,
        ActivityType::SeasonStatusChanged,
    ];

    /// String tag used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::AddedWatched => "ADDED_WATCHED",
            ActivityType::RemovedWatched => "REMOVED_WATCHED",
            ActivityType::RatingChanged => "RATING_CHANGED",
            ActivityType::StatusChanged => "STATUS_CHANGED",
            ActivityType::ThoughtsChanged => "THOUGHTS_CHANGED",
            ActivityType::ThoughtsRemoved => "THOUGHTS_REMOVED",
            ActivityType::ImportedWatched => "IMPORTED_WATCHED",
            ActivityType::ImportedRating => "IMPORTED_RATING",
            ActivityType::SeasonAdded => "SEASON_ADDED",
            ActivityType::SeasonRemoved => "SEASON_REMOVED",
            ActivityType::SeasonRatingChanged => "SEASON_RATING_CHANGED",
            ActivityType::SeasonStatusChanged => "SEASON_STATUS_CHANGED",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known activity tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown activity type: {0}")]
pub struct UnknownActivityType(pub String);

impl FromStr for ActivityType {
    type Err = UnknownActivityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownActivityType(s.to_string()))
    }
}

/// Stored activity record.
///
/// Never updated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Store-assigned id (also used as document ID), increasing with insertion order
    pub id: u64,
    /// Owner. Only ever taken from the authenticated caller.
    pub user_id: u64,
    /// Watched-list item this event concerns
    pub watched_id: u64,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Payload, meaning depends on `activity_type` (new rating, new status, ...)
    pub data: String,
    /// When the event happened, if the user set it
    pub custom_date: Option<DateTime<Utc>>,
    /// When the record was stored
    pub created_at: DateTime<Utc>,
}

/// A fully populated activity that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub user_id: u64,
    pub watched_id: u64,
    pub activity_type: ActivityType,
    pub data: String,
    pub custom_date: Option<DateTime<Utc>>,
}

impl NewActivity {
    /// Attach the store-assigned fields.
    pub fn into_activity(self, id: u64, created_at: DateTime<Utc>) -> Activity {
        Activity {
            id,
            user_id: self.user_id,
            watched_id: self.watched_id,
            activity_type: self.activity_type,
            data: self.data,
            custom_date: self.custom_date,
            created_at,
        }
    }
}

/// Request body for adding an activity.
///
/// There is deliberately no owner field: any `userId` sent by a client is
/// dropped during deserialization.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivityAddRequest {
    pub watched_id: u64,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[validate(length(min = 1, message = "data must not be empty"))]
    pub data: String,
    #[serde(default)]
    pub custom_date: Option<DateTime<Utc>>,
}
