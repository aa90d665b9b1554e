pub mod interpretation;
pub mod quota;
pub mod range;
pub mod report;
pub mod test;
