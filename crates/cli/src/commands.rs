use std::io::{self, BufRead, Write};

use anyhow::Context;

use shelfline_auth::RegisterRequest;
use shelfline_client::{ClientError, Dashboard};
use shelfline_core::{DomainError, ProductId, StoreItemId, WarehouseItemId};
use shelfline_inventory::{NewWarehouseItem, StoreItem, format_currency};

use crate::args::{Commands, StoreCommand, WarehouseCommand};

pub async fn run(command: Commands, dash: &Dashboard) -> anyhow::Result<()> {
    match command {
        Commands::Login { username, password } => {
            let password = password_or_prompt(password)?;
            let user = dash.auth.login(&username, &password).await?;
            println!("Signed in as {} <{}>", user.username, user.email);
        }
        Commands::Register {
            username,
            email,
            full_name,
            password,
        } => {
            let password = password_or_prompt(password)?;
            let user = dash
                .auth
                .register(RegisterRequest {
                    username,
                    email,
                    password,
                    full_name,
                })
                .await?;
            println!("Registered {}. Run `shelfline login {}` next.", user.email, user.username);
        }
        Commands::Logout => {
            dash.auth.logout().await;
            println!("Signed out");
        }
        Commands::Status => status(dash).await?,
        Commands::Warehouse { command } => warehouse(command, dash).await?,
        Commands::Store { command } => store(command, dash).await?,
        Commands::Reports => {
            let r = dash.reports.fetch().await?;
            println!("Sales:        {}", r.total_sales);
            println!("Revenue:      {}", format_currency(r.total_revenue));
            println!("Units sold:   {}", r.items_sold);
            println!("Active:       {}", r.active_items);
            println!("Discounted:   {}", r.discounted_items);
            println!("Expired:      {}", r.expired_items);
            println!("Removed:      {}", r.removed_items);
        }
        Commands::Forecast { product } => {
            let points = dash.predictions.fetch_forecast(ProductId::new(product)).await?;
            if points.is_empty() {
                println!("No forecast yet for product {product}");
            }
            for p in points {
                let band = match (p.lower_bound, p.upper_bound) {
                    (Some(lo), Some(hi)) => format!(" [{lo:.1} .. {hi:.1}]"),
                    _ => String::new(),
                };
                println!("{} .. {}  {:>8.1}{band}", p.period_start, p.period_end, p.forecast_qty);
            }
        }
        Commands::Insights => {
            for insight in dash.predictions.fetch_insights().await? {
                println!("[{:?}] {}: {}", insight.severity, insight.title, insight.message);
            }
        }
    }
    Ok(())
}

async fn status(dash: &Dashboard) -> anyhow::Result<()> {
    if !dash.auth.check_auth() {
        println!("Not signed in");
        return Ok(());
    }
    let user = match dash.auth.current_user() {
        Some(user) => user,
        None => dash.auth.verify().await?,
    };
    let initials = dash.auth.initials().unwrap_or_default();
    println!("[{initials}] {} <{}>", user.username, user.email);
    if let Some(role) = user.role {
        println!("Role: {role}");
    }
    Ok(())
}

async fn warehouse(cmd: WarehouseCommand, dash: &Dashboard) -> anyhow::Result<()> {
    match cmd {
        WarehouseCommand::List => {
            for item in dash.warehouse.fetch_items().await? {
                println!(
                    "{:>6}  {:<24} {:>6}  {:<12} {}  {:?}",
                    item.id, item.product.name, item.quantity, item.batch_code, item.expire_date, item.urgency_level
                );
            }
        }
        WarehouseCommand::Add {
            product_id,
            quantity,
            batch_code,
            expire_date,
        } => {
            let item = dash
                .warehouse
                .add_item(NewWarehouseItem {
                    product_id: ProductId::new(product_id),
                    quantity,
                    batch_code,
                    expire_date,
                })
                .await?;
            println!("Added batch {} as item {}", item.batch_code, item.id);
        }
        WarehouseCommand::Move {
            item_id,
            quantity,
            price,
        } => {
            let moved = dash
                .warehouse
                .move_to_store(WarehouseItemId::new(item_id), quantity, price)
                .await?;
            println!("Moved {} x {} to store item {}", moved.quantity, moved.product.name, moved.id);
        }
        WarehouseCommand::MoveBarcode {
            barcode,
            quantity,
            price,
        } => {
            let moved = dash.warehouse.move_by_barcode(&barcode, quantity, price).await?;
            println!("Moved {} x {} to store item {}", moved.quantity, moved.product.name, moved.id);
        }
        WarehouseCommand::Remove { item_ids } => {
            let ids = item_ids.into_iter().map(WarehouseItemId::new).collect();
            let summary = dash.warehouse.remove_items(ids).await?;
            println!("Deleted {} item(s)", summary.deleted);
        }
        WarehouseCommand::Upload { path } => {
            let contents = std::fs::read(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload.csv".to_string());
            let summary = dash.warehouse.upload_csv(&file_name, contents).await?;
            println!("Created {}, skipped {}", summary.created, summary.skipped);
            for error in summary.errors {
                println!("  {error}");
            }
        }
    }
    Ok(())
}

async fn store(cmd: StoreCommand, dash: &Dashboard) -> anyhow::Result<()> {
    match cmd {
        StoreCommand::List => {
            for item in dash.store.fetch_items().await? {
                print_store_item(&item);
            }
        }
        StoreCommand::Sales => {
            for sale in dash.store.fetch_sales().await? {
                let total = sale.total.unwrap_or(sale.price * sale.quantity as f64);
                let when = sale.sold_at.map(|t| t.to_string()).unwrap_or_default();
                println!(
                    "{:>6}  item {:>6}  {:>4} x {:>10}  = {:>10}  {when}",
                    sale.id,
                    sale.store_item_id,
                    sale.quantity,
                    format_currency(sale.price),
                    format_currency(total)
                );
            }
        }
        StoreCommand::Sell {
            item_id,
            quantity,
            price,
        } => {
            let item_id = StoreItemId::new(item_id);
            let price = match price {
                Some(price) => price,
                None => shelf_price(dash, item_id).await?,
            };
            let sale = dash.store.record_sale(item_id, quantity, price).await?;
            println!(
                "Sold {} for {}",
                sale.quantity,
                format_currency(sale.total.unwrap_or(price * quantity as f64))
            );
        }
        StoreCommand::Discount {
            item_id,
            percentage,
            until,
        } => {
            let discount = dash
                .store
                .apply_discount(StoreItemId::new(item_id), percentage, until)
                .await?;
            println!("{}% off store item {}", discount.percentage, discount.store_item_id);
        }
        StoreCommand::Expire { item_id } => {
            let item = dash.store.expire_item(StoreItemId::new(item_id)).await?;
            println!("Expired {} ({} left on shelf)", item.product.name, item.quantity);
        }
        StoreCommand::Remove { item_id, reason } => {
            let removed = dash.store.remove_item(StoreItemId::new(item_id), reason).await?;
            println!("Removed {} unit(s) of store item {}", removed.quantity, removed.store_item_id);
        }
    }
    Ok(())
}

async fn shelf_price(dash: &Dashboard, item_id: StoreItemId) -> Result<f64, ClientError> {
    let items = dash.store.fetch_items().await?;
    items
        .iter()
        .find(|i| i.id == item_id)
        .map(StoreItem::effective_price)
        .ok_or(ClientError::Domain(DomainError::NotFound))
}

fn print_store_item(item: &StoreItem) {
    let price = match item.best_discount() {
        Some(pct) => format!(
            "{} (-{pct}% from {})",
            format_currency(item.effective_price()),
            format_currency(item.price)
        ),
        None => format_currency(item.price),
    };
    println!("{:>6}  {:<24} {:>6}  {price}", item.id, item.product.name, item.quantity);
}

fn password_or_prompt(password: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("reading password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
