// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Climbing route model for storage and display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A climbing route on one wall panel.
///
/// Stored at `routes/{panelType}/{routeId}`; field names stay camelCase
/// on the wire for compatibility with the mobile clients.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClimbingRoute {
    /// Document key (set from the store path on reads)
    #[serde(default)]
    pub id: String,
    /// Route name/title
    #[validate(length(min = 1, message = "route name must not be empty"))]
    pub name: String,
    /// Hold color display name (e.g. "Rosso")
    pub color: String,
    /// Hold color as hex; derived from `color` when absent
    #[serde(default)]
    pub color_hex: Option<String>,
    /// Grade 1 (easiest) to 9 (hardest); also the aggregation bucket key
    #[validate(range(min = 1, max = 9, message = "difficulty must be 1-9"))]
    pub difficulty: u8,
    /// Wall panel this route belongs to (partition key)
    pub panel_type: String,
    /// When the route was set
    pub created_date: DateTime<Utc>,
    /// Whether the route is currently on the wall
    pub is_active: bool,
}

impl ClimbingRoute {
    /// Display hex for the hold color, falling back to the name lookup
    /// when the setter did not record one.
    pub fn display_hex(&self) -> &str {
        match self.color_hex.as_deref() {
            Some(hex) if !hex.is_empty() => hex,
            _ => hex_for_color(&self.color),
        }
    }
}

/// Hex code for a hold color display name. Unknown names render gray.
pub fn hex_for_color(name: &str) -> &'static str {
    match name.to_lowercase().as_str() {
        "rosso" | "red" => "#E53935",
        "giallo" | "yellow" => "#FDD835",
        "verde" | "green" => "#43A047",
        "blu" | "blue" => "#1E88E5",
        "arancione" | "orange" => "#FB8C00",
        "viola" | "purple" => "#8E24AA",
        "rosa" | "pink" => "#EC407A",
        "nero" | "black" => "#212121",
        "bianco" | "white" => "#FAFAFA",
        "marrone" | "brown" => "#6D4C41",
        _ => "#9E9E9E",
    }
}

/// Display color for a difficulty grade (green → orange → red bands).
pub fn hex_for_difficulty(difficulty: u8) -> &'static str {
    match difficulty {
        1..=3 => "#43A047",
        4..=6 => "#FB8C00",
        _ => "#E53935",
    }
}
