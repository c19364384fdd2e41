pub mod diagnosis;
pub mod io;
pub mod network;
pub mod system;
