mod sfid;

pub use sfid::*;
