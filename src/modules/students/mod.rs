pub mod controller;
pub mod router;

pub use router::{init_students_router, init_user_probe_router};
