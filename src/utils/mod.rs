pub mod paths;
pub mod random;
pub mod validation;
