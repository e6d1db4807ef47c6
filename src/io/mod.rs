//! Thin adapters over the two export formats. They only lift files into
//! plain row and record values; all reconciliation happens in
//! [`crate::merge`].

pub mod excel_read;
pub mod xml_read;
