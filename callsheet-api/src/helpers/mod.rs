pub mod database;
pub mod password;
pub mod session;
pub mod uploads;
pub mod validation;
