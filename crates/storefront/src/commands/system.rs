//! Backend health.

use storefront_core::Storefront;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn health(storefront: &Storefront, global: &GlobalOpts) -> Result<(), CliError> {
    let health = storefront.health().await?;
    let color = output::should_color(&global.color_mode());
    let out = output::render_single(
        &global.format(),
        &health,
        |h| {
            let status = output::status_text(&h.status, h.is_healthy(), color);
            match h.message {
                Some(ref msg) => format!("{status}  {msg}\n{}", storefront.config().base_url),
                None => format!("{status}\n{}", storefront.config().base_url),
            }
        },
        |h| h.status.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
