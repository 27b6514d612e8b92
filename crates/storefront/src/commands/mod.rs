//! Command dispatch: bridges CLI args -> storefront operations -> output.

pub mod auth;
pub mod cart;
pub mod config_cmd;
pub mod products;
pub mod system;
pub mod util;

use storefront_core::Storefront;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    storefront: &Storefront,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Products(args) => products::handle(storefront, args, global).await,
        Command::Categories => products::categories(storefront, global).await,
        Command::Cart(args) => cart::handle(storefront, args, global).await,
        Command::Login(args) => auth::login(storefront, args, global).await,
        Command::Register(args) => auth::register(storefront, args, global).await,
        Command::Logout => auth::logout(storefront, global),
        Command::Whoami => auth::whoami(storefront, global),
        Command::Health => system::health(storefront, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
