//! The table of command names the shell knows about.

use crate::env::Environment;
use crate::trie::PrefixTree;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How a known command name is run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Builtin,
    External(PathBuf),
}

/// Every command name the shell can run, indexed for completion.
///
/// Built once when the shell starts: builtins first, then the executables found in each
/// `PATH` directory, in `PATH` order. The first registration of a name wins, so builtins
/// shadow executables and earlier directories shadow later ones.
#[derive(Debug, Default, Clone)]
pub struct CommandRepository {
    tree: PrefixTree,
    commands: HashMap<String, CommandKind>,
}

impl CommandRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `builtins` and every executable on the environment's `PATH`.
    pub fn from_env(env: &Environment, builtins: &[&str]) -> Self {
        let mut repository = Self::new();
        for name in builtins {
            repository.add_builtin(name);
        }
        if let Some(search_paths) = env.get_var("PATH") {
            for dir in std::env::split_paths(search_paths) {
                repository.add_directory(&dir);
            }
        }
        debug!(commands = repository.len(), "command repository built");
        repository
    }

    pub fn add_builtin(&mut self, name: &str) -> bool {
        self.add(name, CommandKind::Builtin)
    }

    pub fn add_external(&mut self, name: &str, path: impl Into<PathBuf>) -> bool {
        self.add(name, CommandKind::External(path.into()))
    }

    /// Registers the executables directly inside `dir`. Unreadable directories are skipped.
    ///
    /// Returns how many new names were added.
    pub fn add_directory(&mut self, dir: &Path) -> usize {
        let Ok(entries) = fs::read_dir(dir) else {
            debug!(dir = %dir.display(), "skipping unreadable PATH entry");
            return 0;
        };

        let mut added = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if !is_executable(&path) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let name = name.to_string();
            if self.add_external(&name, path) {
                added += 1;
            }
        }
        added
    }

    fn add(&mut self, name: &str, kind: CommandKind) -> bool {
        if name.is_empty() || self.commands.contains_key(name) {
            return false;
        }
        self.tree.insert(name);
        self.commands.insert(name.to_string(), kind);
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandKind> {
        self.commands.get(name)
    }

    /// The command names, for completion.
    pub fn tree(&self) -> &PrefixTree {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::make_unique_temp_dir;

    #[cfg(unix)]
    fn touch_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_builtins_shadow_externals() {
        let mut repo = CommandRepository::new();
        assert!(repo.add_builtin("echo"));
        assert!(!repo.add_external("echo", "/bin/echo"));
        assert!(repo.add_external("ls", "/bin/ls"));

        assert_eq!(repo.lookup("echo"), Some(&CommandKind::Builtin));
        assert_eq!(
            repo.lookup("ls"),
            Some(&CommandKind::External(PathBuf::from("/bin/ls")))
        );
        assert_eq!(repo.lookup("nope"), None);
        assert_eq!(repo.len(), 2);
        assert!(repo.tree().search("ls"));
        assert!(repo.tree().search("echo"));
    }

    #[test]
    #[cfg(unix)]
    fn test_path_order_decides_duplicates() {
        let first = make_unique_temp_dir("first");
        let second = make_unique_temp_dir("second");
        touch_executable(&first.join("tool"));
        touch_executable(&second.join("tool"));
        touch_executable(&second.join("other"));
        // Not executable, not a command.
        fs::write(second.join("notes.txt"), "x").unwrap();
        fs::create_dir_all(second.join("subdir")).unwrap();

        let path = std::env::join_paths([&first, &second]).unwrap();
        let mut vars = HashMap::new();
        vars.insert("PATH".to_string(), path.to_string_lossy().to_string());
        let env = Environment::with_vars(vars, std::env::temp_dir());

        let repo = CommandRepository::from_env(&env, &["cd", "pwd"]);
        assert_eq!(
            repo.lookup("tool"),
            Some(&CommandKind::External(first.join("tool")))
        );
        assert_eq!(
            repo.lookup("other"),
            Some(&CommandKind::External(second.join("other")))
        );
        assert_eq!(repo.lookup("notes.txt"), None);
        assert_eq!(repo.lookup("subdir"), None);
        assert_eq!(repo.lookup("cd"), Some(&CommandKind::Builtin));
        assert_eq!(repo.len(), 4);

        let _ = fs::remove_dir_all(first);
        let _ = fs::remove_dir_all(second);
    }

    #[test]
    fn test_missing_path_directory_is_skipped() {
        let mut repo = CommandRepository::new();
        let missing = std::env::temp_dir().join(format!("tabshell_missing_{}", std::process::id()));
        assert_eq!(repo.add_directory(&missing), 0);
        assert!(repo.is_empty());
    }
}
