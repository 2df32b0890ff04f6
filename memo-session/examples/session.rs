use anyhow::Result;
use memo_api::Client;
use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let mut session = memo_session::start().await?;

    if !session.session().is_authenticated() {
        session
            .login("alice", &SecretString::from("password"))
            .await?;
    }

    if let Some(user) = &session.session().user {
        println!("Signed in as {} <{}>", user.username, user.email);
    }

    let notes = Client::new(session.auth().base_url(), session.auth().clone());
    for note in notes.list_notes().await? {
        println!("#{} {}", note.id, note.title);
    }

    Ok(())
}
