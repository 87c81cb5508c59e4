//! Demo catalog for local development

use domain_products::models::CreateProduct;
use domain_products::{MongoProductRepository, ProductFilter, ProductService};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{info, warn};

/// (name, price, quantity, in stock)
const CATALOG: &[(&str, &str, i64, bool)] = &[
    // Electronics
    ("iPhone 12 Pro Max", "6500.00", 15, true),
    ("iPhone 13 Pro Max", "7500.00", 8, true),
    ("iPhone 14 Pro Max", "8500.00", 10, true),
    ("iPhone 15 Pro Max", "10500.00", 3, false),
    ("Samsung Galaxy S23 Ultra", "7200.00", 12, true),
    ("MacBook Air M2", "9800.00", 5, true),
    ("Dell XPS 13", "7900.00", 4, true),
    ("Lenovo IdeaPad 3", "3200.00", 20, true),
    ("AirPods Pro", "1899.90", 30, true),
    ("Apple Watch Series 9", "4299.00", 9, true),
    // Sports
    ("Nike Air Max 90", "899.99", 25, true),
    ("Adidas Ultraboost", "999.90", 18, true),
    ("New Balance 574", "599.90", 22, true),
    ("Bola de Futebol Adidas", "149.90", 40, true),
    ("Raquete de Tênis Wilson", "459.00", 7, true),
    ("Bicicleta Caloi Elite", "5200.00", 2, true),
    // Household
    ("Cafeteira Nespresso", "499.00", 14, true),
    ("Fritadeira Airfryer Philips", "549.90", 16, true),
    ("Aspirador Robô Xiaomi", "1799.00", 6, false),
    ("Perfume Chanel No 5", "1250.00", 11, true),
    ("Secador de Cabelo Taiff", "189.90", 19, true),
    ("Livro Rust in Action", "89.90", 50, true),
    ("Curso Online de Rust", "297.00", 100, true),
    ("Mochila Samsonite", "680.00", 13, true),
    ("Garrafa Térmica Stanley", "229.90", 35, true),
];

/// Products in the demo catalog
pub fn catalog() -> eyre::Result<Vec<CreateProduct>> {
    CATALOG
        .iter()
        .map(|&(name, price, quantity, status)| -> eyre::Result<CreateProduct> {
            Ok(CreateProduct {
                name: name.to_string(),
                price: Decimal::from_str(price)?,
                quantity,
                status,
            })
        })
        .collect()
}

/// Load the demo catalog, clearing the collection first unless `keep` is set
pub async fn run(repository: MongoProductRepository, keep: bool) -> eyre::Result<()> {
    if !keep {
        let deleted = repository.clear().await?;
        info!(deleted, "Existing products removed");
    }

    let service = ProductService::new(repository);
    let products = catalog()?;
    let total = products.len();
    let mut created = 0;

    for input in products {
        let name = input.name.clone();
        match service.create(input).await {
            Ok(product) => {
                created += 1;
                info!(id = %product.id, name = %product.name, price = %product.price, "Product created");
            }
            Err(e) => warn!(name = %name, error = %e, "Failed to create product"),
        }
    }

    info!(created, total, "Catalog loaded");

    let all = service.list(ProductFilter::default()).await?.len();
    let in_range = service
        .query_by_price_range(Decimal::from(5000), Decimal::from(8000))
        .await?
        .len();
    let luxury = service.get_luxury_products().await?.len();
    let affordable = service.get_affordable_products().await?.len();
    let iphones = service.search_products("iphone").await?.len();

    info!(
        all,
        in_range,
        luxury,
        affordable,
        iphones,
        "Store summary (range 5000-8000, luxury > 5000, affordable < 500)"
    );

    Ok(())
}
