pub mod gate;
pub mod identity;
pub mod issuer;
pub mod validator;
