mod lock;
mod mutex;
#[cfg(test)]
mod tests;

pub use lock::*;
