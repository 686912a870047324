pub mod repository;
pub mod store;

pub use repository::LineRepository;
pub use store::LineStore;
