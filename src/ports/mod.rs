//! Port traits: the seams between the domain and the outside world.

pub mod analysis_port;
pub mod config_port;
pub mod price_port;
pub mod report_port;
