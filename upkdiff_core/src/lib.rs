pub mod classify;
pub mod decompress;
pub mod diff;
pub mod package;
pub mod preview;
pub mod tar;

pub use classify::classify;
pub use decompress::decompress;
pub use diff::DiffEngine;
pub use package::{build_package, parse_package};
pub use preview::{preview, preview_with_defaults, Preview};
pub use tar::{read_entries, RawEntry};
