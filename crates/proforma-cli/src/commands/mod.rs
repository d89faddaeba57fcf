pub mod fees;
pub mod profile;
pub mod proforma;
