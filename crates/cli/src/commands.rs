//! CLI commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use staynest_core::types::{
    Gender, GuestRequest, HotelSearchRequest, InventoryUpdate, ProfileUpdateRequest,
};
use std::path::PathBuf;
use tracing::debug;

use crate::config::CliConfig;
use crate::pages::{App, parse_date};

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the access token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "STAYNEST_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// At least 8 characters with upper and lower case, a digit and one of @$!%*?&
        #[arg(long, env = "STAYNEST_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Renew the access token from the saved refresh cookie
    Refresh,

    /// Show the logged-in user
    Whoami,

    /// Show where a front-end path leads for the current session
    Open {
        /// Path such as /manager-dashboard
        path: String,
    },

    /// Search hotels with rooms available for a stay
    Search {
        #[arg(long)]
        city: String,

        #[arg(long, value_parser = parse_date)]
        start_date: NaiveDate,

        #[arg(long, value_parser = parse_date)]
        end_date: NaiveDate,

        #[arg(long, default_value_t = 1)]
        rooms: u32,

        /// Zero-based result page
        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = HotelSearchRequest::DEFAULT_PAGE_SIZE)]
        size: u32,
    },

    /// Show the results of the last search again
    Results,

    /// Show a hotel and its room prices for the stay
    Hotel {
        hotel_id: u64,

        #[command(flatten)]
        stay: StayArgs,
    },

    /// Reserve a room
    Book {
        #[arg(long)]
        hotel: u64,

        #[arg(long)]
        room: u64,

        #[command(flatten)]
        stay: StayArgs,
    },

    /// Manage one booking
    Booking {
        #[command(subcommand)]
        command: BookingCommands,
    },

    /// List my bookings
    Bookings,

    /// Show or edit my profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Manage saved guests
    Guests {
        #[command(subcommand)]
        command: GuestCommands,
    },

    /// Hotel manager dashboard
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

/// Stay selection; unset values come from the last search
#[derive(Args, Debug, Clone, Default)]
pub struct StayArgs {
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,

    #[arg(long, value_parser = parse_date)]
    pub end_date: Option<NaiveDate>,

    #[arg(long)]
    pub rooms: Option<u32>,
}

#[derive(Subcommand)]
pub enum BookingCommands {
    /// Attach saved guests to a booking
    AddGuests {
        booking_id: u64,

        /// Guest id, repeatable
        #[arg(long = "guest", required = true)]
        guests: Vec<u64>,
    },

    Cancel { booking_id: u64 },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    Show,

    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long, value_parser = parse_date)]
        date_of_birth: Option<NaiveDate>,

        /// MALE, FEMALE or OTHER
        #[arg(long)]
        gender: Option<Gender>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct GuestArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, value_parser = parse_date)]
    pub date_of_birth: NaiveDate,

    /// MALE, FEMALE or OTHER
    #[arg(long)]
    pub gender: Gender,
}

impl From<GuestArgs> for GuestRequest {
    fn from(args: GuestArgs) -> Self {
        Self {
            name: args.name.trim().to_string(),
            date_of_birth: args.date_of_birth,
            gender: args.gender,
        }
    }
}

#[derive(Subcommand)]
pub enum GuestCommands {
    List,

    Add(GuestArgs),

    Update {
        guest_id: u64,

        #[command(flatten)]
        guest: GuestArgs,
    },

    Remove { guest_id: u64 },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Hotels you manage
    Hotels {
        #[command(subcommand)]
        command: HotelCommands,
    },

    /// Room types of a hotel
    Rooms {
        #[command(subcommand)]
        command: RoomCommands,
    },

    /// Daily availability and pricing of a room type
    Inventory {
        #[command(subcommand)]
        command: InventoryCommands,
    },
}

/// Hotel fields; on update, unset fields keep their current value
#[derive(Args, Debug, Clone, Default)]
pub struct HotelArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Photo URL, repeatable
    #[arg(long = "photo")]
    pub photos: Vec<String>,

    /// Amenity, repeatable or comma separated
    #[arg(long = "amenity", value_delimiter = ',')]
    pub amenities: Vec<String>,
}

#[derive(Subcommand)]
pub enum HotelCommands {
    List,

    Create(HotelArgs),

    Show { hotel_id: u64 },

    Update {
        hotel_id: u64,

        #[command(flatten)]
        hotel: HotelArgs,
    },

    Delete { hotel_id: u64 },

    /// Open a hotel for bookings
    Activate { hotel_id: u64 },

    /// Booking count and revenue
    Report { hotel_id: u64 },

    /// Bookings made at a hotel
    Bookings { hotel_id: u64 },
}

/// Room fields; on update, unset fields keep their current value
#[derive(Args, Debug, Clone, Default)]
pub struct RoomArgs {
    #[arg(long = "type")]
    pub room_type: Option<String>,

    #[arg(long)]
    pub base_price: Option<Decimal>,

    #[arg(long)]
    pub capacity: Option<u32>,

    #[arg(long)]
    pub total_count: Option<u32>,

    /// Photo URL, repeatable
    #[arg(long = "photo")]
    pub photos: Vec<String>,

    /// Amenity, repeatable or comma separated
    #[arg(long = "amenity", value_delimiter = ',')]
    pub amenities: Vec<String>,
}

#[derive(Subcommand)]
pub enum RoomCommands {
    List { hotel_id: u64 },

    Create {
        hotel_id: u64,

        #[command(flatten)]
        room: RoomArgs,
    },

    Show { hotel_id: u64, room_id: u64 },

    Update {
        hotel_id: u64,
        room_id: u64,

        #[command(flatten)]
        room: RoomArgs,
    },

    Delete { hotel_id: u64, room_id: u64 },
}

#[derive(Subcommand)]
pub enum InventoryCommands {
    Show { hotel_id: u64, room_id: u64 },

    /// Set surge pricing or close a date range
    Update {
        hotel_id: u64,
        room_id: u64,

        #[arg(long, value_parser = parse_date)]
        start_date: NaiveDate,

        #[arg(long, value_parser = parse_date)]
        end_date: NaiveDate,

        #[arg(long, default_value_t = Decimal::ONE)]
        surge_factor: Decimal,

        /// Stop selling rooms on these dates
        #[arg(long)]
        closed: bool,
    },
}

impl Commands {
    pub async fn execute(self, settings: CliConfig, state_dir: PathBuf) -> Result<()> {
        debug!("State directory: {}", state_dir.display());
        let app = App::open(&settings, &state_dir)?;

        match self {
            Self::Login { email, password } => app.login(&email, &password).await,
            Self::Signup {
                name,
                email,
                password,
            } => app.signup(&name, &email, &password).await,
            Self::Logout => app.logout(),
            Self::Refresh => app.refresh().await,
            Self::Whoami => {
                app.whoami();
                Ok(())
            }
            Self::Open { path } => {
                app.open_path(&path);
                Ok(())
            }
            Self::Search {
                city,
                start_date,
                end_date,
                rooms,
                page,
                size,
            } => {
                let mut request = HotelSearchRequest::new(&city, start_date, end_date, rooms);
                request.page = page;
                request.size = size;
                app.search(request).await
            }
            Self::Results => app.results(),
            Self::Hotel { hotel_id, stay } => app.hotel_info(hotel_id, &stay).await,
            Self::Book { hotel, room, stay } => app.book(hotel, room, &stay).await,
            Self::Booking { command } => command.execute(&app).await,
            Self::Bookings => app.my_bookings().await,
            Self::Profile { command } => command.execute(&app).await,
            Self::Guests { command } => command.execute(&app).await,
            Self::Admin { command } => command.execute(&app).await,
        }
    }
}

impl BookingCommands {
    pub async fn execute(self, app: &App) -> Result<()> {
        match self {
            Self::AddGuests { booking_id, guests } => app.add_guests(booking_id, &guests).await,
            Self::Cancel { booking_id } => app.cancel_booking(booking_id).await,
        }
    }
}

impl ProfileCommands {
    pub async fn execute(self, app: &App) -> Result<()> {
        match self {
            Self::Show => app.profile().await,
            Self::Update {
                name,
                date_of_birth,
                gender,
            } => {
                app.update_profile(ProfileUpdateRequest {
                    name: name.map(|name| name.trim().to_string()),
                    date_of_birth,
                    gender,
                })
                .await
            }
        }
    }
}

impl GuestCommands {
    pub async fn execute(self, app: &App) -> Result<()> {
        match self {
            Self::List => app.guests().await,
            Self::Add(guest) => app.add_guest(guest.into()).await,
            Self::Update { guest_id, guest } => app.update_guest(guest_id, guest.into()).await,
            Self::Remove { guest_id } => app.remove_guest(guest_id).await,
        }
    }
}

impl AdminCommands {
    pub async fn execute(self, app: &App) -> Result<()> {
        match self {
            Self::Hotels { command } => match command {
                HotelCommands::List => app.admin_hotels().await,
                HotelCommands::Create(hotel) => app.create_hotel(&hotel).await,
                HotelCommands::Show { hotel_id } => app.admin_hotel(hotel_id).await,
                HotelCommands::Update { hotel_id, hotel } => {
                    app.update_hotel(hotel_id, &hotel).await
                }
                HotelCommands::Delete { hotel_id } => app.delete_hotel(hotel_id).await,
                HotelCommands::Activate { hotel_id } => app.activate_hotel(hotel_id).await,
                HotelCommands::Report { hotel_id } => app.hotel_report(hotel_id).await,
                HotelCommands::Bookings { hotel_id } => app.hotel_bookings(hotel_id).await,
            },
            Self::Rooms { command } => match command {
                RoomCommands::List { hotel_id } => app.rooms(hotel_id).await,
                RoomCommands::Create { hotel_id, room } => app.create_room(hotel_id, &room).await,
                RoomCommands::Show { hotel_id, room_id } => app.room(hotel_id, room_id).await,
                RoomCommands::Update {
                    hotel_id,
                    room_id,
                    room,
                } => app.update_room(hotel_id, room_id, &room).await,
                RoomCommands::Delete { hotel_id, room_id } => {
                    app.delete_room(hotel_id, room_id).await
                }
            },
            Self::Inventory { command } => match command {
                InventoryCommands::Show { hotel_id, room_id } => {
                    app.inventory(hotel_id, room_id).await
                }
                InventoryCommands::Update {
                    hotel_id,
                    room_id,
                    start_date,
                    end_date,
                    surge_factor,
                    closed,
                } => {
                    app.update_inventory(
                        hotel_id,
                        room_id,
                        InventoryUpdate {
                            start_date,
                            end_date,
                            surge_factor,
                            closed,
                        },
                    )
                    .await
                }
            },
        }
    }
}
