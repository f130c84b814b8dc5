//! Operand parsing and source enumeration
//!
//! The command takes two operands, each `-f <file>` or `-d <directory>`.
//! Every operand expands to a list of source files, and the pairs to compare
//! are the cross product of the left and right lists. Directory entries are
//! always reported before a single file.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// What an operand names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Directory,
}

impl SourceKind {
    fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "-f" => Some(SourceKind::File),
            "-d" => Some(SourceKind::Directory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub kind: SourceKind,
    pub path: PathBuf,
}

/// One audio file taking part in the comparison
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Source {
    /// Canonical path, used as the store key
    pub key: String,
    pub path: PathBuf,
    /// Short name used when reporting
    pub name: String,
}

impl Source {
    fn from_path(path: &Path) -> Result<Self> {
        let canonical = path
            .canonicalize()
            .with_context(|| format!("{} does not exist or is not supported", path.display()))?;
        let name = canonical
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| canonical.display().to_string());
        Ok(Self {
            key: canonical.display().to_string(),
            path: canonical,
            name,
        })
    }
}

/// Split the raw operand list into the left and right operands
pub fn parse_operands(args: &[String]) -> Result<(Operand, Operand)> {
    let [kind_a, path_a, kind_b, path_b] = args else {
        bail!("Wrong number of arguments");
    };

    let (Some(kind_a), Some(kind_b)) = (SourceKind::from_flag(kind_a), SourceKind::from_flag(kind_b))
    else {
        bail!("Incorrect arguments");
    };

    Ok((
        Operand {
            kind: kind_a,
            path: PathBuf::from(path_a),
        },
        Operand {
            kind: kind_b,
            path: PathBuf::from(path_b),
        },
    ))
}

impl Operand {
    /// Expand the operand into its source files.
    ///
    /// Directories contribute their regular files in sorted order;
    /// subdirectories are ignored.
    pub fn sources(&self) -> Result<Vec<Source>> {
        match self.kind {
            SourceKind::File => Ok(vec![Source::from_path(&self.path)?]),
            SourceKind::Directory => {
                if !self.path.is_dir() {
                    bail!("Directory {} not found", self.path.display());
                }

                let mut files: Vec<PathBuf> = std::fs::read_dir(&self.path)
                    .with_context(|| format!("Failed to read directory {}", self.path.display()))?
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.path())
                    .filter(|path| path.is_file())
                    .collect();
                files.sort();

                log::info!("Found {} files in {}", files.len(), self.path.display());

                files.iter().map(|p| Source::from_path(p)).collect()
            }
        }
    }
}

/// Every pair to compare, in reporting order.
///
/// Pairs follow operand order, except that a file compared against a
/// directory is reported with the directory entry first.
pub fn plan_pairs<'a>(
    left_kind: SourceKind,
    left: &'a [Source],
    right_kind: SourceKind,
    right: &'a [Source],
) -> Vec<(&'a Source, &'a Source)> {
    if left_kind == SourceKind::File && right_kind == SourceKind::Directory {
        return right
            .iter()
            .flat_map(|r| left.iter().map(move |l| (r, l)))
            .collect();
    }

    left.iter()
        .flat_map(|l| right.iter().map(move |r| (l, r)))
        .collect()
}

/// Distinct sources across both operands, each fingerprinted once
pub fn unique_sources(left: &[Source], right: &[Source]) -> Vec<Source> {
    let mut all: Vec<Source> = left.iter().chain(right).cloned().collect();
    all.sort();
    all.dedup_by(|a, b| a.key == b.key);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("audiomatch-cli-{}-{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn source(key: &str) -> Source {
        Source {
            key: key.to_string(),
            path: PathBuf::from(key),
            name: key.trim_start_matches('/').to_string(),
        }
    }

    #[test]
    fn test_parse_operands() {
        let (a, b) = parse_operands(&args(&["-d", "refs", "-f", "q.mp3"])).unwrap();
        assert_eq!(a.kind, SourceKind::Directory);
        assert_eq!(a.path, PathBuf::from("refs"));
        assert_eq!(b.kind, SourceKind::File);
        assert_eq!(b.path, PathBuf::from("q.mp3"));
    }

    #[test]
    fn test_wrong_number_of_arguments() {
        let err = parse_operands(&args(&["-f", "a.wav", "-f"])).unwrap_err();
        assert_eq!(err.to_string(), "Wrong number of arguments");
    }

    #[test]
    fn test_incorrect_arguments() {
        let err = parse_operands(&args(&["-x", "a.wav", "-f", "b.wav"])).unwrap_err();
        assert_eq!(err.to_string(), "Incorrect arguments");
    }

    #[test]
    fn test_missing_directory() {
        let operand = Operand {
            kind: SourceKind::Directory,
            path: PathBuf::from("/definitely/not/here"),
        };
        let err = operand.sources().unwrap_err();
        assert!(err.to_string().starts_with("Directory /definitely/not/here not found"));
    }

    #[test]
    fn test_directory_lists_files_only() {
        let dir = scratch_dir("listing");
        std::fs::write(dir.join("b.wav"), b"").unwrap();
        std::fs::write(dir.join("a.wav"), b"").unwrap();
        std::fs::create_dir_all(dir.join("nested")).unwrap();

        let operand = Operand {
            kind: SourceKind::Directory,
            path: dir.clone(),
        };
        let names: Vec<String> = operand.sources().unwrap().into_iter().map(|s| s.name).collect();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(names, vec!["a.wav", "b.wav"]);
    }

    #[test]
    fn test_missing_file() {
        let operand = Operand {
            kind: SourceKind::File,
            path: PathBuf::from("/definitely/not/here.wav"),
        };
        let err = operand.sources().unwrap_err();
        assert!(err.to_string().contains("does not exist or is not supported"));
    }

    #[test]
    fn test_plan_pairs_cross_product() {
        let left = vec![source("/a"), source("/b")];
        let right = vec![source("/x"), source("/y"), source("/z")];
        let pairs = plan_pairs(SourceKind::Directory, &left, SourceKind::Directory, &right);
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0].0.key, "/a");
        assert_eq!(pairs[0].1.key, "/x");
        assert_eq!(pairs[5].0.key, "/b");
        assert_eq!(pairs[5].1.key, "/z");
    }

    #[test]
    fn test_plan_pairs_directory_then_file() {
        let dir = vec![source("/ref1"), source("/ref2")];
        let file = vec![source("/query")];
        let pairs = plan_pairs(SourceKind::Directory, &dir, SourceKind::File, &file);
        let keys: Vec<(&str, &str)> = pairs.iter().map(|(l, r)| (l.key.as_str(), r.key.as_str())).collect();
        assert_eq!(keys, vec![("/ref1", "/query"), ("/ref2", "/query")]);
    }

    #[test]
    fn test_plan_pairs_file_then_directory_reports_entry_first() {
        let file = vec![source("/query")];
        let dir = vec![source("/ref1"), source("/ref2")];
        let pairs = plan_pairs(SourceKind::File, &file, SourceKind::Directory, &dir);
        let keys: Vec<(&str, &str)> = pairs.iter().map(|(l, r)| (l.key.as_str(), r.key.as_str())).collect();
        assert_eq!(keys, vec![("/ref1", "/query"), ("/ref2", "/query")]);
    }

    #[test]
    fn test_plan_pairs_two_files() {
        let a = vec![source("/a")];
        let b = vec![source("/b")];
        let pairs = plan_pairs(SourceKind::File, &a, SourceKind::File, &b);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.key, "/a");
        assert_eq!(pairs[0].1.key, "/b");
    }

    #[test]
    fn test_unique_sources() {
        let left = vec![source("/b"), source("/a")];
        let right = vec![source("/a")];
        let keys: Vec<String> = unique_sources(&left, &right).into_iter().map(|s| s.key).collect();
        assert_eq!(keys, vec!["/a", "/b"]);
    }
}
