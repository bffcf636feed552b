pub mod diagnostics;
pub mod json;
