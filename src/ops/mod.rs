pub mod guard;
pub mod session;
pub mod task_ops;
pub mod view;
