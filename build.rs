use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const ENV_PREFIX: &str = "READECK_SUMMARY_";

fn source_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut pending = vec![root.to_path_buf()];
    let mut files = Vec::new();
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Every `READECK_SUMMARY_<NAME>` token in `source`, trailing underscores dropped.
fn env_names(source: &str) -> impl Iterator<Item = String> + '_ {
    source.match_indices(ENV_PREFIX).filter_map(|(start, _)| {
        let tail = &source[start + ENV_PREFIX.len()..];
        let len = tail
            .bytes()
            .take_while(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || *b == b'_')
            .count();
        let name = tail[..len].trim_end_matches('_');
        (!name.is_empty()).then(|| format!("{ENV_PREFIX}{name}"))
    })
}

fn render_allowlist(names: &BTreeSet<String>) -> String {
    let mut out = String::from("pub const GENERATED_ENV_ALLOWLIST: &[&str] = &[\n");
    for name in names {
        out.push_str(&format!("    {name:?},\n"));
    }
    out.push_str("];\n");
    out
}

fn main() -> std::io::Result<()> {
    let mut names = BTreeSet::new();
    for file in source_files(Path::new("src"))? {
        names.extend(env_names(&fs::read_to_string(&file)?));
    }

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").expect("cargo sets OUT_DIR"));
    fs::write(out_dir.join("env_allowlist.rs"), render_allowlist(&names))?;

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_default();
    println!("cargo:rustc-env=BUILD_ID={version}+{stamp:x}");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src");
    Ok(())
}
