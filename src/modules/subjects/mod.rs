pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_manage_subjects_router, init_subjects_router};
pub use service::SubjectService;
