pub mod intake_use_case;
pub mod ports;
pub mod validation;

pub use intake_use_case::IntakeService;
pub use ports::LeadSinkPort;
