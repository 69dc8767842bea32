// External API clients module
pub mod steam;
