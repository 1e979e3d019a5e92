//! Hotel manager API client methods
//!
//! Everything under `/admin` requires the `HOTEL_MANAGER` role; the backend
//! answers 403 otherwise.

use super::{ClientError, StayNestClient};
use staynest_core::types::{
    Booking, Hotel, HotelReport, HotelRequest, InventoryDay, InventoryUpdate, Room, RoomRequest,
};

impl StayNestClient {
    // Hotels

    /// Hotels owned by the current manager
    pub async fn admin_hotels(&self) -> Result<Vec<Hotel>, ClientError> {
        let req = self.request(reqwest::Method::GET, "/admin/hotels");
        self.execute(req).await
    }

    /// Create a hotel; new hotels start inactive
    pub async fn create_hotel(&self, request: &HotelRequest) -> Result<Hotel, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/admin/hotels")
            .json(request);
        self.execute(req).await
    }

    pub async fn admin_hotel(&self, hotel_id: u64) -> Result<Hotel, ClientError> {
        let req = self.request(reqwest::Method::GET, &format!("/admin/hotels/{hotel_id}"));
        self.execute(req).await
    }

    pub async fn update_hotel(
        &self,
        hotel_id: u64,
        request: &HotelRequest,
    ) -> Result<(), ClientError> {
        let req = self
            .request(reqwest::Method::PUT, &format!("/admin/hotels/{hotel_id}"))
            .json(request);
        self.execute_empty(req).await
    }

    pub async fn delete_hotel(&self, hotel_id: u64) -> Result<(), ClientError> {
        let req = self.request(reqwest::Method::DELETE, &format!("/admin/hotels/{hotel_id}"));
        self.execute_empty(req).await
    }

    /// Make a hotel visible to search, which also opens its inventory
    pub async fn activate_hotel(&self, hotel_id: u64) -> Result<(), ClientError> {
        let req = self.request(
            reqwest::Method::PATCH,
            &format!("/admin/hotels/{hotel_id}/activate"),
        );
        self.execute_empty(req).await
    }

    pub async fn hotel_report(&self, hotel_id: u64) -> Result<HotelReport, ClientError> {
        let req = self.request(
            reqwest::Method::GET,
            &format!("/admin/hotels/{hotel_id}/reports"),
        );
        self.execute(req).await
    }

    pub async fn hotel_bookings(&self, hotel_id: u64) -> Result<Vec<Booking>, ClientError> {
        let req = self.request(
            reqwest::Method::GET,
            &format!("/admin/hotels/{hotel_id}/bookings"),
        );
        self.execute(req).await
    }

    // Rooms

    pub async fn rooms(&self, hotel_id: u64) -> Result<Vec<Room>, ClientError> {
        let req = self.request(
            reqwest::Method::GET,
            &format!("/admin/hotels/{hotel_id}/rooms"),
        );
        self.execute(req).await
    }

    pub async fn create_room(
        &self,
        hotel_id: u64,
        request: &RoomRequest,
    ) -> Result<Room, ClientError> {
        let req = self
            .request(
                reqwest::Method::POST,
                &format!("/admin/hotels/{hotel_id}/rooms"),
            )
            .json(request);
        self.execute(req).await
    }

    pub async fn room(&self, hotel_id: u64, room_id: u64) -> Result<Room, ClientError> {
        let req = self.request(
            reqwest::Method::GET,
            &format!("/admin/hotels/{hotel_id}/rooms/{room_id}"),
        );
        self.execute(req).await
    }

    pub async fn update_room(
        &self,
        hotel_id: u64,
        room_id: u64,
        request: &RoomRequest,
    ) -> Result<(), ClientError> {
        let req = self
            .request(
                reqwest::Method::PUT,
                &format!("/admin/hotels/{hotel_id}/rooms/{room_id}"),
            )
            .json(request);
        self.execute_empty(req).await
    }

    pub async fn delete_room(&self, hotel_id: u64, room_id: u64) -> Result<(), ClientError> {
        let req = self.request(
            reqwest::Method::DELETE,
            &format!("/admin/hotels/{hotel_id}/rooms/{room_id}"),
        );
        self.execute_empty(req).await
    }

    // Inventory

    /// Per-day inventory of a room type
    pub async fn room_inventory(&self, room_id: u64) -> Result<Vec<InventoryDay>, ClientError> {
        let req = self.request(
            reqwest::Method::GET,
            &format!("/admin/inventory/rooms/{room_id}"),
        );
        self.execute(req).await
    }

    /// Apply a surge factor and open/closed flag to a date range
    pub async fn update_inventory(
        &self,
        room_id: u64,
        update: &InventoryUpdate,
    ) -> Result<(), ClientError> {
        let req = self
            .request(
                reqwest::Method::PATCH,
                &format!("/admin/inventory/rooms/{room_id}"),
            )
            .json(update);
        self.execute_empty(req).await
    }
}
