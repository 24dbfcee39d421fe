use std::cell::Cell;
use std::rc::Rc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use wishstore::cli::{Cli, Command, OutputFormat};
use wishstore::config::Config;
use wishstore::{CollectionItem, FileSlot, Wishlist};

fn setup_logging(verbose: bool) -> Result<()> {
    // RUST_LOG wins when set; --verbose raises it to debug, otherwise warn is the fallback
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) if verbose => filter.add_directive(tracing::Level::DEBUG.into()),
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("debug"),
        Err(_) => EnvFilter::new("warn"),
    };

    // Logs go to stderr so command output on stdout stays scriptable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
    Ok(())
}

fn format_price(currency: &str, amount: f64) -> String {
    format!("{}{:.2}", currency, amount)
}

fn print_item(item: &CollectionItem, currency: &str) {
    let mut line = format!(
        "{} {} {}",
        item.id.to_string().yellow(),
        item.name.bold(),
        format_price(currency, item.price).green()
    );
    if item.discount() > 0.0 {
        line.push_str(&format!(
            " {} {}",
            format_price(currency, item.original_price).strikethrough().dimmed(),
            format!("-{}%", item.discount_percent()).cyan()
        ));
    }
    let tags: Vec<&str> = [&item.origin, &item.fabric, &item.category]
        .into_iter()
        .filter_map(|t| t.as_deref())
        .collect();
    if !tags.is_empty() {
        line.push_str(&format!(" [{}]", tags.join(", ")).dimmed().to_string());
    }
    println!("{}", line);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    debug!(slot_dir = %config.slot_dir.display(), slot_key = %config.slot_key, "wishstore starting");

    let slot = FileSlot::open(&config.slot_dir).context("Failed to open slot directory")?;
    let mut wishlist: Wishlist<FileSlot> = Wishlist::open(slot, config.slot_key.clone())?;
    let changed_count = Rc::new(Cell::new(None));
    let sink = changed_count.clone();
    wishlist.subscribe(move |change| {
        if change.kind.is_mutation() {
            sink.set(Some(change.count()));
        } else {
            debug!(change = %change.kind, "Wishlist unchanged");
        }
    });

    match cli.command {
        Command::Add(args) => {
            let item = CollectionItem::from(args);
            let name = item.name.clone();
            if wishlist.add(item)? {
                println!("{} Saved: {}", "✓".green(), name.cyan());
            } else {
                println!("{} Already saved: {}", "•".yellow(), name);
            }
        }
        Command::Remove { id } => match wishlist.remove(&id)? {
            Some(item) => println!("{} Removed: {}", "✓".green(), item.name.cyan()),
            None => println!("{} Not saved: {}", "•".yellow(), id),
        },
        Command::Toggle(args) => {
            let item = CollectionItem::from(args);
            let name = item.name.clone();
            if wishlist.toggle(item)? {
                println!("{} Saved: {}", "✓".green(), name.cyan());
            } else {
                println!("{} Removed: {}", "✓".green(), name.cyan());
            }
        }
        Command::Contains { id } => {
            println!("{}", if wishlist.contains(&id) { "yes" } else { "no" });
        }
        Command::List { format } => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(wishlist.items())?);
            }
            OutputFormat::Text => {
                if wishlist.is_empty() {
                    println!("Wishlist is empty");
                } else {
                    for item in wishlist.items() {
                        print_item(item, &config.currency);
                    }
                }
            }
        },
        Command::Count => {
            println!("{}", wishlist.count());
        }
        Command::Clear => {
            wishlist.clear()?;
            println!("{} Cleared wishlist", "✓".green());
        }
    }

    if let Some(count) = changed_count.get() {
        println!("{}", format!("Wishlist now has {} item(s)", count).dimmed());
    }

    Ok(())
}
