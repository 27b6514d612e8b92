//! Cart command handlers.
//!
//! Every mutation prints the backend's cart as reloaded after the change,
//! so what the user sees is always the server's view.

use tabled::Tabled;

use storefront_core::{Cart, CartItem, CartMutation, ProductId, Storefront};

use crate::cli::{CartArgs, CartCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct CartRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Product")]
    name: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Unit price")]
    price: String,
}

impl From<&CartItem> for CartRow {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.product.id.to_string(),
            name: item.product.name.clone(),
            quantity: item.quantity,
            price: util::money(item.product.price),
        }
    }
}

fn render_cart(cart: &Cart, global: &GlobalOpts) -> String {
    let format = global.format();
    match format {
        OutputFormat::Table => {
            if cart.is_empty() {
                return "Your cart is empty.".into();
            }
            let rows: Vec<CartRow> = cart.items.iter().map(CartRow::from).collect();
            let color = output::should_color(&global.color_mode());
            format!(
                "{}\n{} {}  ({} items)",
                output::render_table(&rows),
                output::label("Total:", color),
                util::money(cart.total),
                cart.item_count()
            )
        }
        OutputFormat::Plain => output::render_list(
            &format,
            &cart.items,
            |i| CartRow::from(i),
            |i| format!("{}\t{}", i.product.id, i.quantity),
        ),
        _ => output::render_single(&format, cart, |_| String::new(), |_| String::new()),
    }
}

pub async fn handle(
    storefront: &Storefront,
    args: CartArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (action, id, outcome) = match args.command {
        CartCommand::Show => {
            if storefront.current_session().is_none() {
                return Err(CliError::LoginRequired);
            }
            // start() already reconciled the cart; an explicit reload
            // reports failures that start() only logged.
            storefront.reload_cart().await?;
            if storefront.current_session().is_none() {
                return Err(CliError::LoginRequired);
            }
            let out = render_cart(&storefront.cart_snapshot(), global);
            output::print_output(&out, global.quiet);
            return Ok(());
        }
        CartCommand::Add { id } => {
            let id = ProductId::from(id);
            let outcome = storefront.add_to_cart(&id).await;
            ("add", id, outcome)
        }
        CartCommand::Update { id, quantity } => {
            let id = ProductId::from(id);
            let outcome = storefront.update_cart_quantity(&id, quantity).await;
            ("update", id, outcome)
        }
        CartCommand::Remove { id } => {
            let id = ProductId::from(id);
            let outcome = storefront.remove_from_cart(&id).await;
            ("remove", id, outcome)
        }
    };

    match outcome {
        // The storefront opened its login modal; the CLI equivalent is
        // telling the user to run `login`.
        CartMutation::LoginRequired => Err(CliError::LoginRequired),
        CartMutation::Applied => {
            output::notice(&format!("✓ Cart {action}: {id}"), global.quiet);
            let out = render_cart(&storefront.cart_snapshot(), global);
            output::print_output(&out, global.quiet);
            Ok(())
        }
        CartMutation::Failed => {
            let out = render_cart(&storefront.cart_snapshot(), global);
            output::print_output(&out, global.quiet);
            Err(CliError::CartMutationFailed {
                action: action.into(),
                product: id.to_string(),
            })
        }
    }
}
