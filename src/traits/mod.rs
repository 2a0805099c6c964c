pub mod filesystem;
pub mod output;

pub use filesystem::{FileSystem, RealFileSystem};
pub use output::{Output, TerminalOutput};

#[cfg(test)]
pub use filesystem::MockFileSystem;
#[cfg(test)]
pub use output::{MockOutput, OutputMessage};
