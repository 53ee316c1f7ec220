mod clients;
mod init;
mod serve;

pub use clients::cmd_list_clients;
pub use init::cmd_init;
pub use serve::cmd_serve;
