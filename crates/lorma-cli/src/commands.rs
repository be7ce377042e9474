//! Main commands enum and primary subcommands.
//!
//! This module defines the available commands for the CLI tool.

use chrono::NaiveTime;
use clap::{Args, Subcommand};

use lorma_core::{MacroType, Money, OrderState, Role, UserProfile};

use crate::config_commands::ConfigCommand;

/// Available commands for the delivery system.
#[derive(Subcommand)]
pub enum Commands {
    /// Show resolved paths for data, database and .env file
    Paths,

    /// Register accounts, sign in and manage credit
    User {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Register restaurants and change opening hours
    Restaurant {
        #[command(subcommand)]
        command: RestaurantCommand,
    },

    /// Manage the shared catalogue of food types
    FoodType {
        #[command(subcommand)]
        command: FoodTypeCommand,
    },

    /// Browse or edit a restaurant menu
    Menu {
        #[command(subcommand)]
        command: MenuCommand,
    },

    /// Place orders and drive them through delivery
    Order {
        #[command(subcommand)]
        command: OrderCommand,
    },

    /// Review restaurants
    Review {
        #[command(subcommand)]
        command: ReviewCommand,
    },

    /// Show the admin dashboard
    Stats {
        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration and business settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Personal details collected when creating an account.
///
/// Every field is optional at parse time; missing ones are reported by the
/// account validation with a field-specific message.
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// First name
    #[arg(long = "first-name")]
    pub first_name: Option<String>,
    /// Last name
    #[arg(long)]
    pub surname: Option<String>,
    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,
    /// Email address
    #[arg(long)]
    pub email: Option<String>,
    /// City of the delivery address
    #[arg(long)]
    pub city: Option<String>,
    /// Street of the delivery address
    #[arg(long)]
    pub street: Option<String>,
    /// House number of the delivery address
    #[arg(long = "house-number")]
    pub house_number: Option<String>,
}

impl ProfileArgs {
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            name: self.first_name.unwrap_or_default(),
            surname: self.surname.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            street: self.street.unwrap_or_default(),
            house_number: self.house_number.unwrap_or_default(),
        }
    }
}

/// Account commands.
#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a new account
    Register {
        /// Username of the new account
        username: String,
        /// Role: client, deliveryman, restaurant or admin
        #[arg(short, long, default_value = "client")]
        role: Role,
        /// Password of the new account (prompted when missing)
        #[arg(long = "new-password", env = "LORMA_NEW_PASSWORD", hide_env_values = true)]
        new_password: Option<String>,
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Check credentials and show who is signed in
    Login,
    /// Show an account (your own unless you are an admin)
    Show {
        /// Account to show
        username: Option<String>,
    },
    /// List accounts (admin only)
    List {
        /// Only accounts with this role
        #[arg(short, long)]
        role: Option<Role>,
    },
    /// Add credit to your client account
    TopUp {
        /// Amount in euro, e.g. 15 or 12.50
        amount: Money,
    },
    /// Change your password
    Passwd,
}

/// Restaurant commands.
#[derive(Subcommand)]
pub enum RestaurantCommand {
    /// Register a restaurant
    ///
    /// Signed in as a restaurant account, registers that account's
    /// restaurant. With --owner, creates the owner account as well.
    Register {
        /// Business name
        name: String,
        /// Italian VAT number (11 digits)
        #[arg(long = "vat-id")]
        vat_id: String,
        /// Opening time, HH:MM
        #[arg(long, value_parser = parse_time)]
        opens: NaiveTime,
        /// Closing time, HH:MM (before the opening time means past midnight)
        #[arg(long, value_parser = parse_time)]
        closes: NaiveTime,
        /// Create this owner account together with the restaurant
        #[arg(long)]
        owner: Option<String>,
        /// Password of the new owner account (prompted when missing)
        #[arg(long = "new-password", env = "LORMA_NEW_PASSWORD", hide_env_values = true)]
        new_password: Option<String>,
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// List all restaurants
    List,
    /// Show a restaurant with its menu and rating
    Show {
        /// Restaurant name
        name: String,
    },
    /// Change the opening hours of your restaurant
    Hours {
        /// Opening time, HH:MM
        #[arg(long, value_parser = parse_time)]
        opens: NaiveTime,
        /// Closing time, HH:MM
        #[arg(long, value_parser = parse_time)]
        closes: NaiveTime,
    },
}

/// Food type commands.
#[derive(Subcommand)]
pub enum FoodTypeCommand {
    /// Add a food type (admins and restaurants)
    Add {
        /// Food type name, e.g. pizza
        name: String,
        /// dish or drink
        #[arg(short = 'm', long = "macro", default_value = "dish")]
        macro_type: MacroType,
    },
    /// List all food types
    List,
}

/// Menu commands.
#[derive(Subcommand)]
pub enum MenuCommand {
    /// Show the menu of a restaurant
    List {
        /// Restaurant name
        restaurant: String,
    },
    /// Add an item to your menu
    Add {
        /// Item name
        name: String,
        /// Price in euro
        #[arg(long)]
        price: Money,
        /// Food type name
        #[arg(short = 't', long = "type")]
        food_type: String,
    },
    /// Change an item of your menu
    Update {
        /// Food ID
        id: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New price in euro
        #[arg(long)]
        price: Option<Money>,
        /// New food type
        #[arg(short = 't', long = "type")]
        food_type: Option<String>,
    },
    /// Take an item off your menu
    Remove {
        /// Food ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Order commands.
#[derive(Subcommand)]
pub enum OrderCommand {
    /// Place an order (clients)
    Place {
        /// Restaurant name
        restaurant: String,
        /// Item to order as FOOD_ID or FOOD_IDxQUANTITY (repeatable)
        #[arg(short, long = "item", value_parser = parse_order_line, required = true)]
        items: Vec<(i64, u32)>,
    },
    /// List the orders you are part of
    List {
        /// Only orders in this state
        #[arg(short, long)]
        state: Option<OrderState>,
    },
    /// Show one order with its lines
    Show {
        /// Order ID
        id: i64,
    },
    /// Mark an order ready for pickup (restaurant)
    Ready {
        /// Order ID
        id: i64,
    },
    /// Take a ready order (deliveryman)
    Accept {
        /// Order ID
        id: i64,
    },
    /// Hand over an accepted order (assigned deliveryman)
    Deliver {
        /// Order ID
        id: i64,
    },
    /// Cancel an order and refund the client
    Cancel {
        /// Order ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Review commands.
#[derive(Subcommand)]
pub enum ReviewCommand {
    /// Review a restaurant (clients)
    Add {
        /// Restaurant name
        restaurant: String,
        /// Vote from 1 to 5
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        vote: u8,
        /// Optional comment
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// List the reviews of a restaurant
    List {
        /// Restaurant name
        restaurant: String,
    },
    /// Delete a review (author or admin)
    Delete {
        /// Review ID
        id: i64,
    },
}

/// Parse an `HH:MM` time.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| format!("'{s}' is not a time in HH:MM format"))
}

/// Parse `ID` or `IDxQUANTITY` (also `ID:QUANTITY`) into an order line.
pub fn parse_order_line(s: &str) -> Result<(i64, u32), String> {
    let s = s.trim();
    let (id, quantity) = match s.split_once(['x', 'X', ':']) {
        Some((id, quantity)) => (id.trim(), quantity.trim()),
        None => (s, "1"),
    };
    let id = id
        .parse::<i64>()
        .map_err(|_| format!("'{id}' is not a food ID"))?;
    let quantity = quantity
        .parse::<u32>()
        .map_err(|_| format!("'{quantity}' is not a quantity"))?;
    Ok((id, quantity))
}
