pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_classes_router, init_manage_classes_router};
pub use service::ClassService;
