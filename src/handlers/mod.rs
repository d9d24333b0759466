pub mod forms;
pub mod images;
pub mod orders;
