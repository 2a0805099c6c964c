pub mod inputs;
pub mod parse;
pub mod post;
pub mod render;

pub use inputs::{CommentArgs, GitHubArgs};
pub use parse::{ParseCommand, ParseFormat};
pub use post::PostCommand;
pub use render::RenderCommand;
