pub mod demo;
pub mod simulate;
pub mod util;
