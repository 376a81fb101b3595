mod form;
pub mod repository;
mod view_model;

pub use form::{AttendanceForm, DETAILS_MAX_CHARS};
pub use view_model::AttendanceViewModel;
