pub mod codec;
pub mod executor;
pub mod storage;
pub mod types;
pub mod utils;

pub use storage::reader::YxdbReader;
pub use types::error::{ErrorKind, Result, YxdbError};
