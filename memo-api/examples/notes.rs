use memo_api::Client;
use memo_auth::{AuthClient, CredentialStore, Settings};

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::new()?;
    let base_url = settings.resolve_base_url();

    let auth = AuthClient::new(base_url.clone(), CredentialStore::new()?);
    let client = Client::new(base_url, auth);

    for note in client.list_notes().await? {
        println!("#{} {}", note.id, note.title);
    }

    Ok(())
}
