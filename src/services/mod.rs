pub mod identity;
pub mod stats;
pub mod validator;
