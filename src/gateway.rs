pub mod factory;
pub mod lookup;
pub mod openlibrary;
