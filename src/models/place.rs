// Pickup locations as returned by terminal listings
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Country {
    #[serde(rename = "EE", alias = "ee")]
    Ee,
    #[serde(rename = "FI", alias = "fi")]
    Fi,
    #[serde(rename = "LV", alias = "lv")]
    Lv,
    #[serde(rename = "LT", alias = "lt")]
    Lt,
}

impl Country {
    pub fn as_str(&self) -> &'static str {
        match self {
            Country::Ee => "EE",
            Country::Fi => "FI",
            Country::Lv => "LV",
            Country::Lt => "LT",
        }
    }

    // Order payloads use lowercase country codes
    pub fn as_lowercase(&self) -> &'static str {
        match self {
            Country::Ee => "ee",
            Country::Fi => "fi",
            Country::Lv => "lv",
            Country::Lt => "lt",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of location requested from a listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalType {
    /// Automated parcel terminal (APT).
    ParcelTerminal,
    PostOffice,
}

impl TerminalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalType::ParcelTerminal => "APT",
            TerminalType::PostOffice => "PO",
        }
    }
}

impl fmt::Display for TerminalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceFilter {
    Express,
}

impl PlaceFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceFilter::Express => "express",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    #[serde(alias = "APT")]
    Apt,
    #[serde(alias = "IPB")]
    Ipb,
    #[serde(alias = "PO")]
    Po,
    #[serde(alias = "PUDO")]
    Pudo,
}

/// Pickup location from the JSON API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    #[serde(deserialize_with = "text::scalar")]
    pub place_id: String,
    pub name: String,
    pub city: String,
    pub address: String,
    pub country: Country,
    pub postalcode: String,
    pub routingcode: String,
    pub availability: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: PlaceKind,
    #[serde(deserialize_with = "text::number")]
    pub lat: f64,
    #[serde(deserialize_with = "text::number")]
    pub lng: f64,
    #[serde(deserialize_with = "text::scalar")]
    pub group_id: String,
    pub group_name: String,
    #[serde(deserialize_with = "text::number")]
    pub group_sort: i64,
    pub created_date: String,
    pub updated_date: String,
}

/// Pickup location from the legacy XML API. Identifiers are numeric there.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Destination {
    #[serde(deserialize_with = "text::number")]
    pub place_id: u32,
    #[serde(deserialize_with = "text::string")]
    pub name: String,
    #[serde(deserialize_with = "text::string")]
    pub city: String,
    #[serde(deserialize_with = "text::string")]
    pub address: String,
    pub country: Country,
    #[serde(deserialize_with = "text::string")]
    pub postalcode: String,
    #[serde(deserialize_with = "text::string")]
    pub routingcode: String,
    #[serde(deserialize_with = "text::string")]
    pub availability: String,
    #[serde(deserialize_with = "text::string")]
    pub description: String,
    #[serde(deserialize_with = "text::number")]
    pub lat: f64,
    #[serde(deserialize_with = "text::number")]
    pub lng: f64,
}
