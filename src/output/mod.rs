//! Output module for crawl results
//!
//! This module handles:
//! - Writing extracted products to a JSON file
//! - Printing a short product summary and crawl statistics

mod json;
pub mod stats;

pub use json::{read_products_json, write_agent_output_json, write_products_json};
pub use stats::{print_crawl_stats, CrawlStats};

use crate::extract::Product;

/// Number of products shown by [`print_product_summary`]
pub const SUMMARY_LIMIT: usize = 5;

/// Prints the first few products to stdout
///
/// # Arguments
///
/// * `products` - The extracted products
pub fn print_product_summary(products: &[Product]) {
    println!("=== Extracted {} products ===\n", products.len());

    for (i, product) in products.iter().take(SUMMARY_LIMIT).enumerate() {
        println!("{}. {}", i + 1, product.name);
        println!("   URL: {}", product.url);
        if let Some(price) = &product.price {
            match &product.currency {
                Some(currency) => println!("   Price: {} {}", price, currency),
                None => println!("   Price: {}", price),
            }
        }
        if let Some(category) = &product.category {
            println!("   Category: {}", category);
        }
        println!();
    }

    if products.len() > SUMMARY_LIMIT {
        println!("... and {} more", products.len() - SUMMARY_LIMIT);
    }
}
