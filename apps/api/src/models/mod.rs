pub mod feedback;
pub mod user;
