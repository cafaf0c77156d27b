//! List the first page of contacts with the blocking client.
//!
//! Reads `X_API_KEY`, `OCTA_AGENT_EMAIL` and `OCTA_BASE_URL` from the
//! environment or a `.env` file.
//!
//! ```sh
//! RUST_LOG=octadesk=debug cargo run --example list_contacts --features full
//! ```

use octadesk::{ListContactsParams, blocking};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    octadesk::init_tracing();

    let client = blocking::Client::from_env()?;

    if !client.health_check()? {
        eprintln!("Credentials rejected by {}", client.as_async().base_url());
        std::process::exit(1);
    }

    let contacts = client.contacts().list(&ListContactsParams::default())?;
    for contact in &contacts {
        println!(
            "{:<38} {}",
            contact.id.as_deref().unwrap_or("-"),
            contact.name.as_deref().unwrap_or("(no name)")
        );
    }
    println!("{} contact(s)", contacts.len());

    Ok(())
}
