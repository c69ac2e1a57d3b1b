use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "shelfline")]
#[command(about = "Warehouse and store floor dashboard from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and remember the token
    Login {
        username: String,
        /// Prompted for on stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        username: String,
        email: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored token
    Logout,

    /// Show who is signed in
    Status,

    /// Inbound stock
    #[command(alias = "wh")]
    Warehouse {
        #[command(subcommand)]
        command: WarehouseCommand,
    },

    /// Stock on the floor
    Store {
        #[command(subcommand)]
        command: StoreCommand,
    },

    /// Store totals
    Reports,

    /// Demand forecast for one product
    Forecast { product: i64 },

    /// Generated inventory insights
    Insights,
}

#[derive(Subcommand, Debug)]
pub enum WarehouseCommand {
    #[command(alias = "ls")]
    List,

    /// Register a received batch
    Add {
        product_id: i64,
        quantity: i64,
        batch_code: String,
        /// YYYY-MM-DD
        expire_date: NaiveDate,
    },

    /// Move units of a batch to the store floor
    Move {
        item_id: i64,
        quantity: i64,
        price: f64,
    },

    /// Move by scanned barcode
    MoveBarcode {
        barcode: String,
        quantity: i64,
        price: f64,
    },

    #[command(alias = "rm")]
    Remove {
        #[arg(required = true)]
        item_ids: Vec<i64>,
    },

    /// Bulk import from a CSV file
    Upload { path: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum StoreCommand {
    #[command(alias = "ls")]
    List,

    Sales,

    /// Record a sale
    Sell {
        item_id: i64,
        quantity: i64,
        /// Defaults to the discounted shelf price
        #[arg(long)]
        price: Option<f64>,
    },

    Discount {
        item_id: i64,
        percentage: f64,
        /// Last day of the discount
        #[arg(long)]
        until: Option<NaiveDate>,
    },

    Expire { item_id: i64 },

    #[command(alias = "rm")]
    Remove {
        item_id: i64,
        #[arg(long)]
        reason: Option<String>,
    },
}
