pub mod error;
pub mod http;
pub mod partner;
pub mod validation;
