//! Screens of the booking front end, rendered as plain text
//!
//! Every page passes the route guard first, then issues its requests and
//! prints either the result or a one-line notification.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use staynest_core::types::{
    Booking, BookingInitRequest, ContactInfo, Guest, GuestRequest, Hotel, HotelInfoRequest,
    HotelRequest, HotelSearchRequest, HotelSearchResult, InventoryUpdate, LoginRequest,
    ProfileUpdateRequest, Room, RoomRequest, SignupRequest,
};
use staynest_core::validation::{
    validate_date_range, validate_email, validate_not_empty, validate_password_strength,
    validate_positive, validate_stay,
};
use staynest_core::{
    FileStore, KeyValueStore, Navigation, Route, RouteGuard, Session, keys, load_json, save_json,
};
use staynest_http::{LoginRedirect, StayNestClient};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::commands::{HotelArgs, RoomArgs, StayArgs};
use crate::config::CliConfig;

/// Tells the user their session is gone once the client gives up refreshing
struct TerminalRedirect;

impl LoginRedirect for TerminalRedirect {
    fn redirect_to_login(&self) {
        warn!("Refresh failed, stored credentials cleared");
    }
}

/// Shared state of one CLI invocation
pub struct App {
    session: Session,
    client: StayNestClient,
}

impl App {
    pub fn open(settings: &CliConfig, state_dir: &Path) -> Result<Self> {
        let file_store = FileStore::open(state_dir)
            .with_context(|| format!("Failed to open storage in {}", state_dir.display()))?;
        debug!("Credentials kept in {}", file_store.path().display());
        let store: Arc<dyn KeyValueStore> = Arc::new(file_store);
        let session = Session::restore(store.clone())?;
        let client = settings
            .api
            .builder()
            .storage(store)
            .redirect(Arc::new(TerminalRedirect))
            .build()?;
        debug!("Using API at {}", client.base_url());
        Ok(Self { session, client })
    }

    fn store(&self) -> &dyn KeyValueStore {
        self.session.store().as_ref()
    }

    /// Pass the route guard or stop with a login prompt
    fn enter(&self, route: Route) -> Result<()> {
        match RouteGuard::new(&self.session).navigate(route) {
            Navigation::Render(_) => Ok(()),
            Navigation::Redirect(target) => {
                bail!("{route} requires a logged-in user, redirected to {target}. Run `staynest login` first")
            }
        }
    }

    // Auth

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        self.enter(Route::Login)?;
        validate_email(email)?;
        validate_not_empty(password, "password")?;

        let token = self
            .client
            .login(&LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;
        let user = self.session.login(&token.access_token)?;

        println!("Welcome back, {}!", user.display_name());
        println!("Continue at {}", Route::landing_for(&user));
        Ok(())
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<()> {
        self.enter(Route::Signup)?;
        validate_not_empty(name, "name")?;
        validate_email(email)?;
        validate_password_strength(password)?;

        let created = self
            .client
            .signup(&SignupRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
                name: name.trim().to_string(),
            })
            .await?;

        println!(
            "Account created for {}. Log in with `staynest login`.",
            created.email.as_deref().unwrap_or(email)
        );
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.session.logout()?;
        println!("Logged out.");
        Ok(())
    }

    /// Trade the saved refresh cookie for a new access token
    pub async fn refresh(&self) -> Result<()> {
        let token = self.client.refresh().await?;
        let user = self.session.login(&token.access_token)?;
        println!("Session renewed for {}.", user.display_name());
        Ok(())
    }

    pub fn whoami(&self) {
        let Some(user) = self.session.current() else {
            println!("Not logged in.");
            return;
        };
        println!("{}", user.display_name());
        if let Some(email) = &user.email {
            println!("  email: {email}");
        }
        println!(
            "  role:  {}",
            user.role.as_ref().map_or("-", |role| role.as_str())
        );
        if let Some(expires_at) = user.expires_at {
            let now = chrono::Utc::now().timestamp();
            let state = if user.is_expired_at(now) { "expired" } else { "valid" };
            println!("  token: {state}");
            debug!("Access token expires at {expires_at}");
        }
    }

    /// Where a front-end path would land for the current session
    pub fn open_path(&self, path: &str) {
        let route = Route::parse(path);
        match RouteGuard::new(&self.session).navigate(route) {
            Navigation::Render(Route::NotFound) => println!("{path}: page not found"),
            Navigation::Render(route) => println!("{path}: renders {route}"),
            Navigation::Redirect(target) => println!("{path}: redirects to {target}"),
        }
    }

    // Search and booking

    pub async fn search(&self, request: HotelSearchRequest) -> Result<()> {
        self.enter(Route::Home)?;
        validate_not_empty(&request.city, "city")?;
        validate_stay(request.start_date, request.end_date)?;
        validate_positive(request.rooms_count, "rooms")?;
        save_json(self.store(), keys::LAST_SEARCH, &request)?;

        let page = self.client.search_hotels(&request).await?;
        save_json(self.store(), keys::HOTELS_LIST, &page.content)?;
        save_json(self.store(), keys::SEARCH_PARAMS, &request)?;

        self.enter(Route::SearchResults)?;
        print_results(&request, &page.content);
        if page.total_pages > page.number + 1 {
            println!(
                "Page {} of {}; use --page {} for more.",
                page.number + 1,
                page.total_pages,
                page.number + 1
            );
        }
        Ok(())
    }

    /// Show the persisted results of the last search without refetching
    pub fn results(&self) -> Result<()> {
        self.enter(Route::SearchResults)?;
        let params: Option<HotelSearchRequest> = load_json(self.store(), keys::SEARCH_PARAMS)?;
        let hotels: Option<Vec<HotelSearchResult>> = load_json(self.store(), keys::HOTELS_LIST)?;

        match (params, hotels) {
            (Some(params), Some(hotels)) => print_results(&params, &hotels),
            _ => println!("No saved search. Run `staynest search` first."),
        }
        Ok(())
    }

    pub async fn hotel_info(&self, hotel_id: u64, stay: &StayArgs) -> Result<()> {
        self.enter(Route::HotelInfo { hotel_id })?;
        let request = self.resolve_stay(stay)?;

        let info = self.client.hotel_info(hotel_id, &request).await?;
        self.remember_stay(&request)?;

        print_hotel(&info.hotel);
        println!(
            "Rooms for {} to {} ({} room(s)):",
            request.start_date, request.end_date, request.rooms_count
        );
        if info.rooms.is_empty() {
            println!("  none available");
        }
        for room in &info.rooms {
            println!(
                "  #{} {} - sleeps {} - {}",
                room.room.id,
                room.room.room_type,
                room.room.capacity,
                money(room.price)
            );
        }
        Ok(())
    }

    pub async fn book(&self, hotel_id: u64, room_id: u64, stay: &StayArgs) -> Result<()> {
        self.enter(Route::HotelInfo { hotel_id })?;
        let request = self.resolve_stay(stay)?;

        let booking = self
            .client
            .init_booking(&BookingInitRequest {
                hotel_id,
                room_id,
                check_in_date: request.start_date,
                check_out_date: request.end_date,
                rooms_count: request.rooms_count,
            })
            .await?;

        self.enter(Route::BookingDetails)?;
        println!("Booking #{} reserved.", booking.id);
        print_booking(&booking);
        println!(
            "Add guests with `staynest booking add-guests {} --guest <id>`.",
            booking.id
        );
        Ok(())
    }

    pub async fn add_guests(&self, booking_id: u64, guest_ids: &[u64]) -> Result<()> {
        self.enter(Route::BookingDetails)?;
        if guest_ids.is_empty() {
            bail!("Select at least one guest");
        }

        let booking = self.client.add_guests(booking_id, guest_ids).await?;
        println!("Guests added to booking #{}.", booking.id);
        print_booking(&booking);
        Ok(())
    }

    pub async fn cancel_booking(&self, booking_id: u64) -> Result<()> {
        self.enter(Route::BookingDetails)?;
        self.client.cancel_booking(booking_id).await?;
        println!("Booking #{booking_id} cancelled.");
        Ok(())
    }

    /// Explicit flags win over the persisted search
    fn resolve_stay(&self, stay: &StayArgs) -> Result<HotelInfoRequest> {
        let saved: Option<HotelSearchRequest> = load_json(self.store(), keys::SEARCH_PARAMS)?;
        let request = merge_stay(saved.as_ref(), stay)?;
        validate_stay(request.start_date, request.end_date)?;
        validate_positive(request.rooms_count, "rooms")?;
        Ok(request)
    }

    fn remember_stay(&self, stay: &HotelInfoRequest) -> Result<()> {
        let mut params: HotelSearchRequest = load_json(self.store(), keys::SEARCH_PARAMS)?
            .unwrap_or_else(|| {
                HotelSearchRequest::new("", stay.start_date, stay.end_date, stay.rooms_count)
            });
        params.start_date = stay.start_date;
        params.end_date = stay.end_date;
        params.rooms_count = stay.rooms_count;
        save_json(self.store(), keys::SEARCH_PARAMS, &params)?;
        Ok(())
    }

    // User profile

    pub async fn my_bookings(&self) -> Result<()> {
        self.enter(Route::UserProfile)?;
        let bookings = self.client.my_bookings().await?;
        print_bookings(&bookings);
        Ok(())
    }

    pub async fn profile(&self) -> Result<()> {
        self.enter(Route::UserProfile)?;
        let profile = self.client.profile().await?;
        println!("{}", profile.name.as_deref().unwrap_or("-"));
        println!("  email:         {}", profile.email.as_deref().unwrap_or("-"));
        println!(
            "  date of birth: {}",
            profile
                .date_of_birth
                .map_or_else(|| "-".to_string(), |date| date.to_string())
        );
        println!(
            "  gender:        {}",
            profile
                .gender
                .map_or_else(|| "-".to_string(), |gender| gender.to_string())
        );
        Ok(())
    }

    pub async fn update_profile(&self, update: ProfileUpdateRequest) -> Result<()> {
        self.enter(Route::UserProfile)?;
        if update.is_empty() {
            bail!("Nothing to update; pass --name, --date-of-birth or --gender");
        }
        if let Some(name) = &update.name {
            validate_not_empty(name, "name")?;
        }
        self.client.update_profile(&update).await?;
        println!("Profile updated.");
        Ok(())
    }

    pub async fn guests(&self) -> Result<()> {
        self.enter(Route::UserProfile)?;
        let guests = self.client.guests().await?;
        if guests.is_empty() {
            println!("No saved guests.");
        }
        for guest in &guests {
            print_guest(guest);
        }
        Ok(())
    }

    pub async fn add_guest(&self, request: GuestRequest) -> Result<()> {
        self.enter(Route::UserProfile)?;
        validate_not_empty(&request.name, "name")?;
        let guest = self.client.add_guest(&request).await?;
        println!("Guest saved.");
        print_guest(&guest);
        Ok(())
    }

    pub async fn update_guest(&self, guest_id: u64, request: GuestRequest) -> Result<()> {
        self.enter(Route::UserProfile)?;
        validate_not_empty(&request.name, "name")?;
        self.client.update_guest(guest_id, &request).await?;
        println!("Guest #{guest_id} updated.");
        Ok(())
    }

    pub async fn remove_guest(&self, guest_id: u64) -> Result<()> {
        self.enter(Route::UserProfile)?;
        self.client.delete_guest(guest_id).await?;
        println!("Guest #{guest_id} removed.");
        Ok(())
    }

    // Manager dashboard

    pub async fn admin_hotels(&self) -> Result<()> {
        self.enter(Route::ManagerDashboard)?;
        let hotels = self.client.admin_hotels().await?;
        if hotels.is_empty() {
            println!("No hotels yet. Create one with `staynest admin hotels create`.");
        }
        for hotel in &hotels {
            println!(
                "#{} {} ({}) - {}",
                hotel.id,
                hotel.name,
                hotel.city.as_deref().unwrap_or("-"),
                if hotel.active { "active" } else { "inactive" }
            );
        }
        Ok(())
    }

    pub async fn create_hotel(&self, args: &HotelArgs) -> Result<()> {
        self.enter(Route::ManagerDashboard)?;
        let request = hotel_request(None, args)?;
        let hotel = self.client.create_hotel(&request).await?;
        println!("Hotel #{} created. Activate it to open bookings.", hotel.id);
        Ok(())
    }

    pub async fn admin_hotel(&self, hotel_id: u64) -> Result<()> {
        self.enter(Route::ManagerHotel { hotel_id })?;
        let hotel = self.client.admin_hotel(hotel_id).await?;
        print_hotel(&hotel);
        Ok(())
    }

    /// Fetch the hotel, apply the given fields and send the whole record back
    pub async fn update_hotel(&self, hotel_id: u64, args: &HotelArgs) -> Result<()> {
        self.enter(Route::ManagerHotel { hotel_id })?;
        let current = self.client.admin_hotel(hotel_id).await?;
        let request = hotel_request(Some(&current), args)?;
        self.client.update_hotel(hotel_id, &request).await?;
        println!("Hotel #{hotel_id} updated.");
        Ok(())
    }

    pub async fn delete_hotel(&self, hotel_id: u64) -> Result<()> {
        self.enter(Route::ManagerHotel { hotel_id })?;
        self.client.delete_hotel(hotel_id).await?;
        println!("Hotel #{hotel_id} deleted.");
        Ok(())
    }

    pub async fn activate_hotel(&self, hotel_id: u64) -> Result<()> {
        self.enter(Route::ManagerHotel { hotel_id })?;
        self.client.activate_hotel(hotel_id).await?;
        println!("Hotel #{hotel_id} activated.");
        Ok(())
    }

    pub async fn hotel_report(&self, hotel_id: u64) -> Result<()> {
        self.enter(Route::ManagerHotel { hotel_id })?;
        let report = self.client.hotel_report(hotel_id).await?;
        println!("Hotel #{hotel_id} report");
        println!("  bookings:        {}", report.booking_count);
        println!("  total revenue:   {}", report.total_revenue.round_dp(2));
        println!("  average revenue: {}", report.avg_revenue.round_dp(2));
        Ok(())
    }

    pub async fn hotel_bookings(&self, hotel_id: u64) -> Result<()> {
        self.enter(Route::ManagerHotel { hotel_id })?;
        let bookings = self.client.hotel_bookings(hotel_id).await?;
        print_bookings(&bookings);
        Ok(())
    }

    pub async fn rooms(&self, hotel_id: u64) -> Result<()> {
        self.enter(Route::ManagerHotel { hotel_id })?;
        let rooms = self.client.rooms(hotel_id).await?;
        if rooms.is_empty() {
            println!("No rooms yet.");
        }
        for room in &rooms {
            print_room(room);
        }
        Ok(())
    }

    pub async fn create_room(&self, hotel_id: u64, args: &RoomArgs) -> Result<()> {
        self.enter(Route::ManagerHotel { hotel_id })?;
        let request = room_request(None, args)?;
        let room = self.client.create_room(hotel_id, &request).await?;
        println!("Room #{} created.", room.id);
        Ok(())
    }

    pub async fn room(&self, hotel_id: u64, room_id: u64) -> Result<()> {
        self.enter(Route::ManagerRoom { hotel_id, room_id })?;
        let room = self.client.room(hotel_id, room_id).await?;
        print_room(&room);
        Ok(())
    }

    pub async fn update_room(&self, hotel_id: u64, room_id: u64, args: &RoomArgs) -> Result<()> {
        self.enter(Route::ManagerRoom { hotel_id, room_id })?;
        let current = self.client.room(hotel_id, room_id).await?;
        let request = room_request(Some(&current), args)?;
        self.client.update_room(hotel_id, room_id, &request).await?;
        println!("Room #{room_id} updated.");
        Ok(())
    }

    pub async fn delete_room(&self, hotel_id: u64, room_id: u64) -> Result<()> {
        self.enter(Route::ManagerRoom { hotel_id, room_id })?;
        self.client.delete_room(hotel_id, room_id).await?;
        println!("Room #{room_id} deleted.");
        Ok(())
    }

    pub async fn inventory(&self, hotel_id: u64, room_id: u64) -> Result<()> {
        self.enter(Route::ManagerRoom { hotel_id, room_id })?;
        let days = self.client.room_inventory(room_id).await?;
        if days.is_empty() {
            println!("No inventory. Activate the hotel to open it.");
        }
        for day in &days {
            println!(
                "{}  {:>3} free of {:<3} surge {:<5} {}{}",
                day.date,
                day.available(),
                day.total_count,
                day.surge_factor.unwrap_or(Decimal::ONE),
                money(day.price),
                if day.closed { "  closed" } else { "" }
            );
        }
        Ok(())
    }

    pub async fn update_inventory(
        &self,
        hotel_id: u64,
        room_id: u64,
        update: InventoryUpdate,
    ) -> Result<()> {
        self.enter(Route::ManagerRoom { hotel_id, room_id })?;
        validate_date_range(update.start_date, update.end_date)?;
        if update.surge_factor <= Decimal::ZERO {
            bail!("surge factor must be positive");
        }
        self.client.update_inventory(room_id, &update).await?;
        println!(
            "Inventory updated for {} to {}.",
            update.start_date, update.end_date
        );
        Ok(())
    }
}

/// Combine explicit stay flags with the persisted search parameters
fn merge_stay(saved: Option<&HotelSearchRequest>, stay: &StayArgs) -> Result<HotelInfoRequest> {
    let start_date = stay.start_date.or(saved.map(|s| s.start_date));
    let end_date = stay.end_date.or(saved.map(|s| s.end_date));
    let rooms_count = stay.rooms.or(saved.map(|s| s.rooms_count));

    match (start_date, end_date, rooms_count) {
        (Some(start_date), Some(end_date), Some(rooms_count)) => Ok(HotelInfoRequest {
            start_date,
            end_date,
            rooms_count,
        }),
        _ => bail!("No stay selected. Run `staynest search` or pass --start-date, --end-date and --rooms"),
    }
}

fn hotel_request(current: Option<&Hotel>, args: &HotelArgs) -> Result<HotelRequest> {
    let current_contact = current
        .and_then(|hotel| hotel.contact_info.clone())
        .unwrap_or_default();
    let name = args
        .name
        .clone()
        .or_else(|| current.map(|hotel| hotel.name.clone()))
        .unwrap_or_default();
    let city = args
        .city
        .clone()
        .or_else(|| current.and_then(|hotel| hotel.city.clone()))
        .unwrap_or_default();
    validate_not_empty(&name, "name")?;
    validate_not_empty(&city, "city")?;

    let request = HotelRequest {
        name,
        city,
        photos: pick_list(&args.photos, current.map(|hotel| &hotel.photos)),
        amenities: pick_list(&args.amenities, current.map(|hotel| &hotel.amenities)),
        contact_info: ContactInfo {
            address: args.address.clone().or(current_contact.address),
            phone_number: args.phone.clone().or(current_contact.phone_number),
            email: args.email.clone().or(current_contact.email),
            location: args.location.clone().or(current_contact.location),
        },
        // New hotels stay hidden until activated
        active: current.is_some_and(|hotel| hotel.active),
    };
    if let Some(email) = &request.contact_info.email {
        validate_email(email)?;
    }
    Ok(request.normalized())
}

fn room_request(current: Option<&Room>, args: &RoomArgs) -> Result<RoomRequest> {
    let room_type = args
        .room_type
        .clone()
        .or_else(|| current.map(|room| room.room_type.clone()))
        .unwrap_or_default();
    validate_not_empty(&room_type, "type")?;

    let (Some(base_price), Some(capacity), Some(total_count)) = (
        args.base_price.or(current.map(|room| room.base_price)),
        args.capacity.or(current.map(|room| room.capacity)),
        args.total_count.or(current.map(|room| room.total_count)),
    ) else {
        bail!("--base-price, --capacity and --total-count are required for a new room");
    };
    if base_price <= Decimal::ZERO {
        bail!("base price must be positive");
    }
    validate_positive(capacity, "capacity")?;
    validate_positive(total_count, "total-count")?;

    Ok(RoomRequest {
        room_type,
        base_price,
        capacity,
        photos: pick_list(&args.photos, current.map(|room| &room.photos)),
        amenities: pick_list(&args.amenities, current.map(|room| &room.amenities)),
        total_count,
    }
    .normalized())
}

fn pick_list(given: &[String], current: Option<&Vec<String>>) -> Vec<String> {
    if given.is_empty() {
        current.cloned().unwrap_or_default()
    } else {
        given.to_vec()
    }
}

fn money(amount: Option<Decimal>) -> String {
    amount.map_or_else(|| "price unavailable".to_string(), |amount| format!("${}", amount.round_dp(2)))
}

fn print_results(params: &HotelSearchRequest, hotels: &[HotelSearchResult]) {
    println!(
        "Stays in {} from {} to {} ({} room(s)):",
        params.city, params.start_date, params.end_date, params.rooms_count
    );
    if hotels.is_empty() {
        println!("  no hotels found");
    }
    for result in hotels {
        println!(
            "  #{} {} - from {}",
            result.hotel.id,
            result.hotel.name,
            money(result.price)
        );
    }
}

fn print_hotel(hotel: &Hotel) {
    println!("#{} {}", hotel.id, hotel.name);
    if let Some(city) = &hotel.city {
        println!("  city:      {city}");
    }
    if let Some(contact) = &hotel.contact_info {
        for (label, value) in [
            ("address", &contact.address),
            ("location", &contact.location),
            ("phone", &contact.phone_number),
            ("email", &contact.email),
        ] {
            if let Some(value) = value {
                println!("  {:<10} {value}", format!("{label}:"));
            }
        }
    }
    if !hotel.amenities.is_empty() {
        println!("  amenities: {}", hotel.amenities.join(", "));
    }
    println!("  status:    {}", if hotel.active { "active" } else { "inactive" });
}

fn print_room(room: &Room) {
    println!(
        "#{} {} - sleeps {} - {} rooms - base ${}",
        room.id,
        room.room_type,
        room.capacity,
        room.total_count,
        room.base_price.round_dp(2)
    );
    if !room.amenities.is_empty() {
        println!("  amenities: {}", room.amenities.join(", "));
    }
}

fn print_guest(guest: &Guest) {
    println!(
        "#{} {} ({}{})",
        guest.id,
        guest.name,
        guest
            .gender
            .map_or_else(|| "-".to_string(), |gender| gender.to_string()),
        guest
            .date_of_birth
            .map_or_else(String::new, |date| format!(", born {date}"))
    );
}

fn print_booking(booking: &Booking) {
    println!(
        "  {} to {} ({} night(s), {} room(s)) - {} - {}",
        booking.check_in_date,
        booking.check_out_date,
        booking.nights(),
        booking.rooms_count,
        booking.booking_status,
        money(booking.amount)
    );
    for guest in &booking.guests {
        println!("    guest #{} {}", guest.id, guest.name);
    }
}

fn print_bookings(bookings: &[Booking]) {
    if bookings.is_empty() {
        println!("No bookings.");
    }
    for booking in bookings {
        println!("Booking #{}", booking.id);
        print_booking(booking);
    }
}

/// Parse a `YYYY-MM-DD` flag value
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
