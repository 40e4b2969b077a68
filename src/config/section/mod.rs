//! Configuration section definitions.
//!
//! Each module corresponds to a section in `routecss.toml`:
//!
//! | Module  | TOML Section | Purpose                                     |
//! |---------|--------------|---------------------------------------------|
//! | `paths` | `[paths]`    | Source tree, stylesheet, output, artifacts  |
//! | `tool`  | `[tool]`     | CSS tool candidates, timeouts, build mode   |
//! | `theme` | `[theme]`    | Theme table forwarded to the tool config    |
//! | `watch` | `[watch]`    | Debounce timing and extra watched paths     |

mod paths;
mod theme;
mod tool;
mod watch;

pub use paths::PathsConfig;
pub use theme::ThemeConfig;
pub use tool::ToolConfig;
pub use watch::WatchConfig;
