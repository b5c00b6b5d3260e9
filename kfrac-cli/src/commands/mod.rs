//! Command implementations for KFrac CLI.

pub mod compress;
pub mod decompress;
pub mod info;

pub use compress::{MethodArg, cmd_compress};
pub use decompress::cmd_decompress;
pub use info::cmd_info;
pub use test::cmd_test;
