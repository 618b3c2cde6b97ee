pub mod growth;
pub mod header;
pub mod prayers;
pub mod qaza;
pub mod statusbar;
pub mod tasks;
pub mod weekly;
