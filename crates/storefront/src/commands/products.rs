//! Catalog command handlers.

use std::sync::Arc;

use tabled::Tabled;

use storefront_core::{CatalogFilter, CategoryFilter, Product, ProductId, Storefront};

use crate::cli::{GlobalOpts, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: u32,
}

impl From<&Arc<Product>> for ProductRow {
    fn from(p: &Arc<Product>) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            category: p.category.clone(),
            price: util::money(p.price),
            stock: p.stock,
        }
    }
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    name: String,
}

fn detail(p: &Arc<Product>, color: bool) -> String {
    let stock = if p.in_stock() {
        output::status_text(&format!("{} in stock", p.stock), true, color)
    } else {
        output::status_text("out of stock", false, color)
    };
    [
        format!("{}  {}", output::label("Name:       ", color), p.name),
        format!("{}  {}", output::label("ID:         ", color), p.id),
        format!("{}  {}", output::label("Category:   ", color), p.category),
        format!("{}  {}", output::label("Price:      ", color), util::money(p.price)),
        format!("{}  {stock}", output::label("Stock:      ", color)),
        format!("{}  {}", output::label("Image:      ", color), p.image),
        String::new(),
        p.description.clone(),
    ]
    .join("\n")
}

pub async fn handle(
    storefront: &Storefront,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProductsCommand::List { category, search } => {
            ensure_products(storefront).await?;
            let filter = CatalogFilter::new(
                CategoryFilter::from(category.as_deref()),
                search.as_deref().unwrap_or_default(),
            );
            let products = storefront.filter_products(filter).to_vec();
            let out = output::render_list(
                &global.format(),
                &products,
                |p| ProductRow::from(p),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Show { id } => {
            let product = storefront.product(&ProductId::from(id)).await?;
            let color = output::should_color(&global.color_mode());
            let out = output::render_single(
                &global.format(),
                &product,
                |p| detail(p, color),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

pub async fn categories(storefront: &Storefront, global: &GlobalOpts) -> Result<(), CliError> {
    let catalog = storefront.catalog();
    if catalog.categories_snapshot().is_empty() {
        // Surface the real error instead of an empty table.
        catalog.load_categories().await?;
    }
    let categories = catalog.categories_snapshot();
    let out = output::render_list(
        &global.format(),
        categories.as_slice(),
        |c| CategoryRow { name: c.clone() },
        String::clone,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

/// The start-up load is non-fatal; for a listing an empty catalog after a
/// failed load should report the failure.
async fn ensure_products(storefront: &Storefront) -> Result<(), CliError> {
    if storefront.catalog().products_snapshot().is_empty() {
        storefront.catalog().load_products().await?;
    }
    Ok(())
}
