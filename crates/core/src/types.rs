//! Records exchanged with the booking API
//!
//! Field names follow the backend's camelCase JSON. The client treats these
//! as plain data: nothing here enforces a lifecycle, the backend owns that.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Treat an explicit `null` the same as a missing field
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Dates sometimes arrive as `2025-10-10T00:00:00`; only the day matters here.
mod flexible_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, de::Error};

    pub fn parse(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
        let day = raw.split('T').next().unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse(&raw).map_err(D::Error::custom))
            .transpose()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub photos: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub contact_info: Option<ContactInfo>,
    #[serde(default, deserialize_with = "nullable")]
    pub active: bool,
}

/// A hotel as returned by the search endpoint, with its lowest room price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelSearchResult {
    #[serde(flatten)]
    pub hotel: Hotel,
    #[serde(default)]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: u64,
    #[serde(rename = "type")]
    pub room_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub base_price: Decimal,
    #[serde(default, deserialize_with = "nullable")]
    pub capacity: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub photos: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub amenities: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub total_count: u32,
}

/// A room priced for a specific stay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPrice {
    #[serde(flatten)]
    pub room: Room,
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// Hotel detail page payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelInfo {
    pub hotel: Hotel,
    #[serde(default, deserialize_with = "nullable")]
    pub rooms: Vec<RoomPrice>,
}

/// One day of availability for a room type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDay {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "nullable")]
    pub booked_count: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub reserved_count: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub total_count: u32,
    #[serde(default)]
    pub surge_factor: Option<Decimal>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "nullable")]
    pub closed: bool,
}

impl InventoryDay {
    /// Rooms neither booked nor held for a pending booking
    pub const fn available(&self) -> u32 {
        self.total_count
            .saturating_sub(self.booked_count)
            .saturating_sub(self.reserved_count)
    }
}

/// Bulk inventory edit over an inclusive date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpdate {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub surge_factor: Decimal,
    pub closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Reserved,
    GuestsAdded,
    PaymentsPending,
    Confirmed,
    Cancelled,
    Expired,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Reserved => "RESERVED",
            Self::GuestsAdded => "GUESTS_ADDED",
            Self::PaymentsPending => "PAYMENTS_PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MALE" => Ok(Self::Male),
            "FEMALE" => Ok(Self::Female),
            "OTHER" => Ok(Self::Other),
            other => Err(format!("unknown gender '{other}', expected MALE, FEMALE or OTHER")),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Other => "OTHER",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "flexible_date::deserialize_option")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: u64,
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub check_in_date: NaiveDate,
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub check_out_date: NaiveDate,
    #[serde(default, deserialize_with = "nullable")]
    pub rooms_count: u32,
    #[serde(default)]
    pub amount: Option<Decimal>,
    pub booking_status: BookingStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub guests: Vec<Guest>,
}

impl Booking {
    /// Number of nights between check-in and check-out
    pub fn nights(&self) -> i64 {
        (self.check_out_date - self.check_in_date).num_days()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "flexible_date::deserialize_option")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelReport {
    #[serde(default, deserialize_with = "nullable")]
    pub booking_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub total_revenue: Decimal,
    #[serde(default, deserialize_with = "nullable")]
    pub avg_revenue: Decimal,
}

/// Spring-style page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

// Request bodies

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Token pair returned by login and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
}

/// Search form; also what gets persisted as the last search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSearchRequest {
    pub city: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rooms_count: u32,
    pub page: u32,
    pub size: u32,
}

impl HotelSearchRequest {
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// First page of results for a city, which the backend stores lowercased
    pub fn new(
        city: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        rooms_count: u32,
    ) -> Self {
        Self {
            city: city.trim().to_lowercase(),
            start_date,
            end_date,
            rooms_count,
            page: 0,
            size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelInfoRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rooms_count: u32,
}

impl From<&HotelSearchRequest> for HotelInfoRequest {
    fn from(search: &HotelSearchRequest) -> Self {
        Self {
            start_date: search.start_date,
            end_date: search.end_date,
            rooms_count: search.rooms_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInitRequest {
    pub hotel_id: u64,
    pub room_id: u64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub rooms_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestRequest {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl ProfileUpdateRequest {
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.date_of_birth.is_none() && self.gender.is_none()
    }
}

/// Create/update body for a hotel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelRequest {
    pub name: String,
    pub city: String,
    pub photos: Vec<String>,
    pub amenities: Vec<String>,
    pub contact_info: ContactInfo,
    pub active: bool,
}

impl HotelRequest {
    /// Lowercase city and location, trim amenities and drop blank entries
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.city = self.city.trim().to_lowercase();
        self.contact_info.location = self
            .contact_info
            .location
            .map(|location| location.trim().to_lowercase());
        self.amenities = trim_list(self.amenities);
        self.photos = trim_list(self.photos);
        self
    }
}

/// Create/update body for a room type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRequest {
    #[serde(rename = "type")]
    pub room_type: String,
    pub base_price: Decimal,
    pub capacity: u32,
    pub photos: Vec<String>,
    pub amenities: Vec<String>,
    pub total_count: u32,
}

impl RoomRequest {
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.room_type = self.room_type.trim().to_string();
        self.amenities = trim_list(self.amenities);
        self.photos = trim_list(self.photos);
        self
    }
}

fn trim_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
