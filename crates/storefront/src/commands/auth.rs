//! Login / registration / session command handlers.

use storefront_core::{CoreError, Storefront, User};

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn login(
    storefront: &Storefront,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email = util::text_or_prompt(args.email, "Email")?;
    let password = util::secret_or_prompt(args.password)?;

    storefront.auth().open_login();
    let session = storefront
        .login(&email, &password)
        .await
        .map_err(|e| auth_error(storefront, e))?;

    let user = session.user();
    output::notice(
        &format!("✓ Logged in as {} <{}>", user.name, user.email),
        global.quiet,
    );
    Ok(())
}

pub async fn register(
    storefront: &Storefront,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let name = util::text_or_prompt(args.name, "Name")?;
    let email = util::text_or_prompt(args.email, "Email")?;
    let password = util::secret_or_prompt(args.password)?;

    storefront.auth().open_register();
    let session = storefront
        .register(&name, &email, &password)
        .await
        .map_err(|e| auth_error(storefront, e))?;

    let user = session.user();
    output::notice(
        &format!("✓ Account created for {} <{}>", user.name, user.email),
        global.quiet,
    );
    Ok(())
}

/// Prefer the message the auth flow put in front of the user.
fn auth_error(storefront: &Storefront, err: CoreError) -> CliError {
    match err {
        CoreError::ValidationFailed { message } => CliError::Validation {
            field: "credentials".into(),
            reason: message,
        },
        CoreError::ConnectionFailed { .. } | CoreError::Timeout | CoreError::Storage(_) => {
            err.into()
        }
        other => match storefront.auth_view().error {
            Some(message) => CliError::AuthFailed { message },
            None => other.into(),
        },
    }
}

pub fn logout(storefront: &Storefront, global: &GlobalOpts) -> Result<(), CliError> {
    let was = storefront.current_session();
    storefront.logout();
    match was {
        Some(session) => output::notice(
            &format!("✓ Logged out {}", session.user().email),
            global.quiet,
        ),
        None => output::notice("Not logged in", global.quiet),
    }
    Ok(())
}

pub fn whoami(storefront: &Storefront, global: &GlobalOpts) -> Result<(), CliError> {
    let session = storefront
        .current_session()
        .ok_or(CliError::LoginRequired)?;
    let user: &User = session.user();
    let out = output::render_single(
        &global.format(),
        user,
        |u| format!("{} <{}>\nID: {}", u.name, u.email, u.id),
        |u| u.email.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
