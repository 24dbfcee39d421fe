//! CLI argument parsing for wishstore

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::item::CollectionItem;

#[derive(Parser, Debug)]
#[command(name = "ws")]
#[command(author, version, about = "Persisted storefront wishlist", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save a product to the wishlist (kept as-is if the id is already saved)
    Add(ItemArgs),

    /// Remove a product by id
    Remove {
        #[arg(required = true)]
        id: u64,
    },

    /// Remove the product if saved, otherwise save it
    Toggle(ItemArgs),

    /// Check whether a product id is saved
    Contains {
        #[arg(required = true)]
        id: u64,
    },

    /// List saved products in the order they were added
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the number of saved products
    Count,

    /// Remove every saved product
    Clear,
}

#[derive(Args, Debug, Clone)]
pub struct ItemArgs {
    /// Product id
    #[arg(long)]
    pub id: u64,

    /// Product name
    #[arg(long)]
    pub name: String,

    /// Current price
    #[arg(long)]
    pub price: f64,

    /// Pre-discount price (defaults to the current price)
    #[arg(long)]
    pub original_price: Option<f64>,

    /// Image URI or path
    #[arg(long, default_value = "")]
    pub image: String,

    #[arg(long)]
    pub origin: Option<String>,

    #[arg(long)]
    pub fabric: Option<String>,

    #[arg(long)]
    pub category: Option<String>,
}

impl From<ItemArgs> for CollectionItem {
    fn from(args: ItemArgs) -> Self {
        let mut item = CollectionItem::new(
            args.id,
            args.name,
            args.price,
            args.original_price.unwrap_or(args.price),
            args.image,
        );
        item.origin = args.origin;
        item.fabric = args.fabric;
        item.category = args.category;
        item
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
