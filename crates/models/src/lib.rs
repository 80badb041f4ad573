pub mod course_data;
pub mod days;
pub mod numeric;
pub mod subject;
pub mod term;
pub mod time;
pub mod units;
