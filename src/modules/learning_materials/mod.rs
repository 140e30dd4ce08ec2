pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_learning_materials_router, init_manage_learning_materials_router};
pub use service::LearningMaterialService;
