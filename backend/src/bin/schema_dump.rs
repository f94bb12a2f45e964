//! Print the GraphQL schema definition language.

use std::io::Write;
use std::sync::Arc;

use mockable::DefaultClock;
use user_admin::domain::UserDirectoryService;
use user_admin::inbound::graphql::build_schema;
use user_admin::outbound::persistence::InMemoryUserRepository;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let repository = Arc::new(InMemoryUserRepository::new(Arc::new(DefaultClock)));
    let schema = build_schema(Arc::new(UserDirectoryService::new(repository)));
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", schema.sdl())?;
    Ok(())
}
