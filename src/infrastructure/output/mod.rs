//! Output file infrastructure module

mod file;

pub use file::FileOutputs;
