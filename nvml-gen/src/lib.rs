/*!
Generates `nvml/src/raw_api/mod.rs`, one thin `unsafe` wrapper per NVML entry
point, from three declaration files kept next to the `nvml` crate:

* `types.idl` registers the public handle and struct types raw C types are
  converted to
* `entry_points.idl` declares the entry points themselves
* `aliases.idl` maps unversioned names onto the revision whose declaration
  they share

```text
nvml-gen --sources nvml/idl --output nvml/src/raw_api/mod.rs
```

Output is deterministic: the same sources always render the same file.
*/

pub mod idl;
pub mod render;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const TYPES_FILE: &str = "types.idl";
pub const ENTRY_POINTS_FILE: &str = "entry_points.idl";
pub const ALIASES_FILE: &str = "aliases.idl";

#[derive(Error, Debug)]
pub enum GenError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}:{line}: {message}", file.display())]
    Parse {
        file: PathBuf,
        line: usize,
        message: String,
    },
    #[error("alias `{alias}` shares the declaration of `{target}`, but `{other}` takes different parameters")]
    SignatureMismatch {
        alias: String,
        target: String,
        other: String,
    },
}

/// Render the raw API from the declaration files in `sources`.
pub fn generate(sources: &Path) -> Result<String, GenError> {
    let types_path = sources.join(TYPES_FILE);
    let types = idl::parse_types(&types_path, &read(&types_path)?)?;

    let entry_points_path = sources.join(ENTRY_POINTS_FILE);
    let functions = idl::parse_entry_points(&entry_points_path, &read(&entry_points_path)?)?;

    let aliases_path = sources.join(ALIASES_FILE);
    let aliases = idl::parse_aliases(&aliases_path, &read(&aliases_path)?)?;

    log::debug!(
        "{} types, {} entry points, {} aliases",
        types.len(),
        functions.len(),
        aliases.len()
    );

    let wrappers = render::wrappers(&entry_points_path, &aliases_path, &functions, &aliases)?;
    render::render(&entry_points_path, &types, &wrappers)
}

fn read(path: &Path) -> Result<String, GenError> {
    fs::read_to_string(path).map_err(|source| GenError::Io {
        path: path.to_owned(),
        source,
    })
}
