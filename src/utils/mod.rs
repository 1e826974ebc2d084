pub mod calc;
pub mod parse;
pub mod quote;
