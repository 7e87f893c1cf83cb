pub mod announcement;
pub mod change;
pub mod markup;
pub mod page;
