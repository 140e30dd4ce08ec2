pub mod auth;
pub mod classes;
pub mod health;
pub mod learning_materials;
pub mod students;
pub mod subjects;
pub mod users;
