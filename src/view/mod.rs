//! Presentation layer: view models and the HTML page

pub mod marking;
pub mod page;
pub mod scores;

pub use page::ExaminerPage;
