//! # Command-Line Interface
//!
//! Parses global flags, resolves the named command from the registry and
//! drives it against the store.
//!
//! ```bash
//! bucketview --db app.db create users
//! bucketview --db app.db set users.alice A
//! bucketview --db app.db get users.alice -e alice.bin
//! ```
//!
//! ## Global Flags
//!
//! | Flag | Env | Purpose |
//! |------|-----|---------|
//! | `--db`, `-d` | `BUCKETVIEW_DB` | store file |
//! | `--format` | `BUCKETVIEW_FORMAT` | `text` (default) or `json` |
//! | `--config`, `-c` | | configuration file |
//! | `--verbose`, `-v` | | debug logging on stderr |
//!
//! Global flags go before the command name; everything after it belongs to
//! the command.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;

pub use app::{run, Cli};
pub use output::{Output, OutputFormat};
