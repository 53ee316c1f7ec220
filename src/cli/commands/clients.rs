//! List clients command handler

use crate::config::Config;
use crate::db::Store;
use crate::domain::Role;

pub async fn cmd_list_clients(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let clients = store.list_users_by_role(Role::Client).await?;

    if clients.is_empty() {
        println!("No clients registered.");
        return Ok(());
    }

    println!("Clients ({} total)", clients.len());
    println!("{:-<70}", "");

    for client in clients {
        println!("{:>5}  {:<30} {}", client.id.value(), client.name, client.email);
    }

    Ok(())
}
