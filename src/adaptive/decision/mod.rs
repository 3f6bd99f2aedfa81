pub mod policy;

pub use policy::InterventionPolicy;
