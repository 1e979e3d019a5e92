//! Booking API client methods

use super::{ClientError, StayNestClient};
use staynest_core::types::{Booking, BookingInitRequest};

impl StayNestClient {
    /// Reserve rooms; the booking starts in `RESERVED`
    pub async fn init_booking(&self, request: &BookingInitRequest) -> Result<Booking, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/bookings/init")
            .json(request);
        self.execute(req).await
    }

    /// Attach saved guests to a booking
    pub async fn add_guests(
        &self,
        booking_id: u64,
        guest_ids: &[u64],
    ) -> Result<Booking, ClientError> {
        let req = self
            .request(
                reqwest::Method::POST,
                &format!("/bookings/{booking_id}/addGuests"),
            )
            .json(guest_ids);
        self.execute(req).await
    }

    pub async fn cancel_booking(&self, booking_id: u64) -> Result<(), ClientError> {
        let req = self
            .request(
                reqwest::Method::POST,
                &format!("/bookings/{booking_id}/cancel"),
            )
            .json(&serde_json::json!({}));
        self.execute_empty(req).await
    }
}
