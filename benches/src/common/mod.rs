use std::fs::File;
use std::io::Write;
use std::path::Path;

const COUNTRIES: [&str; 8] = ["USA", "UK", "France", "Germany", "Japan", "Brazil", "India", "Canada"];
const CATEGORIES: [&str; 4] = ["Electronics", "Books", "Clothing", "Home"];

/// Generate a sales CSV with the full column set
///
/// Rows cycle deterministically through `num_products` products and
/// `num_regions` regions; roughly one row in `zero_stock_every` reports zero stock.
pub fn generate_sales_csv(
    num_rows: usize,
    num_products: usize,
    num_regions: usize,
    zero_stock_every: usize,
) -> String {
    let mut csv = String::from(
        "transaction_id,transaction_date,user_id,country,region,product_id,product_name,category,price,quantity,total_price,stock_quantity,added_date\n",
    );

    for i in 0..num_rows {
        let product = i % num_products.max(1);
        let quantity = (i % 5) + 1;
        let price = format!("{}.{:02}", (product % 500) + 1, i % 100);
        let total = format!("{}.{:02}", ((product % 500) + 1) * quantity, (i * quantity) % 100);
        let stock = if zero_stock_every > 0 && i % zero_stock_every == 0 {
            0
        } else {
            (i * 7) % 1_000
        };

        csv.push_str(&format!(
            "TXN{i:08},{}-{:02}-{:02},USER{:05},{},Region{:03},PROD{product:05},Product {product},{},{price},{quantity},{total},{stock},2020-01-01\n",
            2021 + (i % 3),
            (i % 12) + 1,
            (i % 28) + 1,
            i % 10_000,
            COUNTRIES[i % COUNTRIES.len()],
            i % num_regions.max(1),
            CATEGORIES[product % CATEGORIES.len()],
        ));
    }

    csv
}

/// Generate a sales CSV and write it to a file
pub fn generate_sales_file<P: AsRef<Path>>(
    path: P,
    num_rows: usize,
    num_products: usize,
    num_regions: usize,
    zero_stock_every: usize,
) -> std::io::Result<()> {
    let csv = generate_sales_csv(num_rows, num_products, num_regions, zero_stock_every);
    let mut file = File::create(path)?;
    file.write_all(csv.as_bytes())?;
    Ok(())
}
