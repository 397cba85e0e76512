//! Print the argon2 hash of a staff password, for `[[auth.staff]]`
//! entries or the `staff_accounts` table.
//!
//! Usage: hash-password <password>

use anyhow::{bail, Context};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let password = match (args.next(), args.next()) {
        (Some(password), None) => password,
        _ => bail!("usage: hash-password <password>"),
    };

    let hash = gatepass_server::services::auth::hash_password(&password)
        .context("Failed to hash password")?;
    println!("{}", hash);
    Ok(())
}
