pub mod leave;
pub mod monthly;
pub mod weekly;
pub mod yearly;
