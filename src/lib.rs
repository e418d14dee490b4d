//! Course management API: teachers publish courses, students apply for
//! enrollment, and teachers review applications and manage the course's
//! schedules, materials, deadlines, feedback and grades.

pub mod config;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;
