pub mod development_charges;
