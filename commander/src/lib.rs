pub mod commander;
pub mod config;
pub mod link;
pub mod logger;
pub mod modes;
pub mod setpoint;
pub mod watchdog;
