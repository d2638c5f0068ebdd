//! Residential mortgage calculators: level-payment amortisation, the 28/36
//! affordability inversion, and side-by-side loan cost comparison.

pub mod affordability;
pub mod amortization;
pub mod comparison;
