mod models;

pub use models::{ConvertRequest, ConvertResponse, ResponseBody};

/// Path the form posts to, relative to the configured origin.
pub const SUBMIT_PATH: &str = "/";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
