pub mod repository;
mod view_model;

pub use view_model::DashboardViewModel;
