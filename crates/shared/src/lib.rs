pub mod appearance;
pub mod cell;
pub mod domain;
pub mod error;
