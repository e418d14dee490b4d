pub mod attachments;
pub mod auth;
pub mod courses;
pub mod deadlines;
pub mod enrollments;
pub mod feedback;
pub mod grades;
pub mod resources;
pub mod schedules;
pub mod users;
