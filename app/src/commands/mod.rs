pub mod config_check;
pub mod config_show;
pub mod db_ping;
pub mod init;
