pub mod columns;
pub mod convert;
pub mod parse;
